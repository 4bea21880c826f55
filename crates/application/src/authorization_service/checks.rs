use super::*;

impl AuthorizationService {
    /// Returns whether the user holds the role.
    pub async fn check_role(&self, user_id: UserId, role_name: &str) -> AppResult<bool> {
        let role = RoleName::new(role_name)?;
        let granted = self.repository.user_has_role(user_id, &role).await?;

        debug!(user_id = %user_id, role = %role, granted, "checked user role");
        Ok(granted)
    }

    /// Returns whether any role held by the user grants the permission.
    ///
    /// A user without roles is reported as not granted, but an unknown
    /// permission still fails with [`AppError::PermissionNotFound`].
    pub async fn check_permission(
        &self,
        user_id: UserId,
        permission_name: &str,
    ) -> AppResult<bool> {
        let permission = PermissionName::new(permission_name)?;
        let granted = self
            .repository
            .user_has_permission(user_id, &permission)
            .await?;

        debug!(
            user_id = %user_id,
            permission = %permission,
            granted,
            "checked user permission"
        );
        Ok(granted)
    }

    /// Returns whether the role grants the permission.
    pub async fn check_role_permission(
        &self,
        role_name: &str,
        permission_name: &str,
    ) -> AppResult<bool> {
        let role = RoleName::new(role_name)?;
        let permission = PermissionName::new(permission_name)?;
        let granted = self
            .repository
            .role_has_permission(&role, &permission)
            .await?;

        debug!(
            role = %role,
            permission = %permission,
            granted,
            "checked role permission"
        );
        Ok(granted)
    }

    /// Ensures the user has the permission through one of their roles.
    pub async fn require_permission(
        &self,
        user_id: UserId,
        permission_name: &str,
    ) -> AppResult<()> {
        if self.check_permission(user_id, permission_name).await? {
            return Ok(());
        }

        warn!(
            user_id = %user_id,
            permission = permission_name.trim(),
            "permission denied"
        );
        Err(AppError::Forbidden(format!(
            "user '{user_id}' is missing permission '{}'",
            permission_name.trim()
        )))
    }
}
