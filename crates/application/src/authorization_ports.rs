use async_trait::async_trait;

use rolegate_core::{AppResult, UserId};
use rolegate_domain::{PermissionName, RoleName};

/// Repository port for role, permission and binding storage.
///
/// Every method is expected to be atomic with respect to concurrent callers.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Creates a role unless one with the same name exists.
    async fn create_role(&self, role: &RoleName) -> AppResult<()>;

    /// Creates a permission unless one with the same name exists.
    async fn create_permission(&self, permission: &PermissionName) -> AppResult<()>;

    /// Binds every permission to the role, skipping existing bindings.
    ///
    /// Fails without binding anything when the role or any permission is missing.
    async fn assign_permissions(
        &self,
        role: &RoleName,
        permissions: &[PermissionName],
    ) -> AppResult<()>;

    /// Assigns an existing role to a user.
    async fn assign_role(&self, user_id: UserId, role: &RoleName) -> AppResult<()>;

    /// Returns whether the user holds the role.
    async fn user_has_role(&self, user_id: UserId, role: &RoleName) -> AppResult<bool>;

    /// Returns whether any role held by the user grants the permission.
    async fn user_has_permission(
        &self,
        user_id: UserId,
        permission: &PermissionName,
    ) -> AppResult<bool>;

    /// Returns whether the role grants the permission.
    async fn role_has_permission(
        &self,
        role: &RoleName,
        permission: &PermissionName,
    ) -> AppResult<bool>;

    /// Removes a role from a user if held.
    async fn revoke_role(&self, user_id: UserId, role: &RoleName) -> AppResult<()>;

    /// Unbinds the permission from every role the user holds.
    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission: &PermissionName,
    ) -> AppResult<()>;

    /// Unbinds the permission from the role if bound.
    async fn revoke_role_permission(
        &self,
        role: &RoleName,
        permission: &PermissionName,
    ) -> AppResult<()>;

    /// Lists every role name ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<RoleName>>;

    /// Lists the role names held by a user ordered by name.
    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<RoleName>>;

    /// Lists every permission name ordered by name.
    async fn list_permissions(&self) -> AppResult<Vec<PermissionName>>;

    /// Deletes a role no user holds, together with its permission bindings.
    async fn delete_role(&self, role: &RoleName) -> AppResult<()>;

    /// Deletes a permission no role grants.
    async fn delete_permission(&self, permission: &PermissionName) -> AppResult<()>;
}
