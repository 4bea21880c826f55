use super::*;

impl AuthorizationService {
    /// Creates a role. Creating an existing role is a no-op.
    pub async fn create_role(&self, role_name: &str) -> AppResult<()> {
        let role = RoleName::new(role_name)?;
        self.repository.create_role(&role).await?;

        info!(role = %role, "role ensured");
        Ok(())
    }

    /// Assigns an existing role to a user.
    ///
    /// Fails with [`AppError::RoleAlreadyAssigned`] when the user already holds it.
    pub async fn assign_role(&self, user_id: UserId, role_name: &str) -> AppResult<()> {
        let role = RoleName::new(role_name)?;
        self.repository.assign_role(user_id, &role).await?;

        info!(user_id = %user_id, role = %role, "role assigned");
        Ok(())
    }

    /// Removes a role from a user. Removing a role the user does not hold is not an error.
    pub async fn revoke_role(&self, user_id: UserId, role_name: &str) -> AppResult<()> {
        let role = RoleName::new(role_name)?;
        self.repository.revoke_role(user_id, &role).await?;

        info!(user_id = %user_id, role = %role, "role revoked");
        Ok(())
    }

    /// Returns every role name.
    pub async fn get_roles(&self) -> AppResult<Vec<String>> {
        self.repository.list_roles().await.map(into_names)
    }

    /// Returns the role names held by a user.
    pub async fn get_user_roles(&self, user_id: UserId) -> AppResult<Vec<String>> {
        self.repository
            .list_user_roles(user_id)
            .await
            .map(into_names)
    }

    /// Deletes a role and its permission bindings.
    ///
    /// Fails with [`AppError::RoleInUse`] while any user holds the role.
    pub async fn delete_role(&self, role_name: &str) -> AppResult<()> {
        let role = RoleName::new(role_name)?;
        self.repository.delete_role(&role).await?;

        info!(role = %role, "role deleted");
        Ok(())
    }
}
