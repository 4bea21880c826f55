use super::*;

impl AuthorizationService {
    /// Creates a permission. Creating an existing permission is a no-op.
    pub async fn create_permission(&self, permission_name: &str) -> AppResult<()> {
        let permission = PermissionName::new(permission_name)?;
        self.repository.create_permission(&permission).await?;

        info!(permission = %permission, "permission ensured");
        Ok(())
    }

    /// Grants every listed permission to the role.
    ///
    /// Already granted pairs are skipped. When the role or any permission does
    /// not exist the whole batch fails and nothing is granted.
    pub async fn assign_permissions<S: AsRef<str>>(
        &self,
        role_name: &str,
        permission_names: &[S],
    ) -> AppResult<()> {
        let role = RoleName::new(role_name)?;
        let mut permissions: Vec<PermissionName> = Vec::with_capacity(permission_names.len());
        for permission_name in permission_names {
            let permission = PermissionName::new(permission_name.as_ref())?;
            if !permissions.contains(&permission) {
                permissions.push(permission);
            }
        }

        self.repository
            .assign_permissions(&role, permissions.as_slice())
            .await?;

        info!(
            role = %role,
            permission_count = permissions.len(),
            "permissions assigned to role"
        );
        Ok(())
    }

    /// Removes the permission from every role the user holds.
    ///
    /// Other users holding the same roles lose the permission as well.
    pub async fn revoke_permission(&self, user_id: UserId, permission_name: &str) -> AppResult<()> {
        let permission = PermissionName::new(permission_name)?;
        self.repository
            .revoke_permission(user_id, &permission)
            .await?;

        info!(
            user_id = %user_id,
            permission = %permission,
            "permission revoked from user roles"
        );
        Ok(())
    }

    /// Removes a single role-permission binding.
    pub async fn revoke_role_permission(
        &self,
        role_name: &str,
        permission_name: &str,
    ) -> AppResult<()> {
        let role = RoleName::new(role_name)?;
        let permission = PermissionName::new(permission_name)?;
        self.repository
            .revoke_role_permission(&role, &permission)
            .await?;

        info!(role = %role, permission = %permission, "permission revoked from role");
        Ok(())
    }

    /// Returns every permission name.
    pub async fn get_permissions(&self) -> AppResult<Vec<String>> {
        self.repository.list_permissions().await.map(into_names)
    }

    /// Deletes a permission.
    ///
    /// Fails with [`AppError::PermissionInUse`] while any role grants it.
    pub async fn delete_permission(&self, permission_name: &str) -> AppResult<()> {
        let permission = PermissionName::new(permission_name)?;
        self.repository.delete_permission(&permission).await?;

        info!(permission = %permission, "permission deleted");
        Ok(())
    }
}
