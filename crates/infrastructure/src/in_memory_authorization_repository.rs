use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use rolegate_application::AuthorizationRepository;
use rolegate_core::{AppError, AppResult, UserId};
use rolegate_domain::{
    Permission, PermissionId, PermissionName, Role, RoleId, RoleName, RolePermission, UserRole,
};
use tokio::sync::RwLock;


/// In-memory authorization repository implementation.
///
/// All tables live behind a single lock, so every operation is atomic.
#[derive(Debug, Default)]
pub struct InMemoryAuthorizationRepository {
    state: RwLock<AuthorizationTables>,
}

#[derive(Debug, Default)]
struct AuthorizationTables {
    last_role_id: i64,
    last_permission_id: i64,
    roles: BTreeMap<RoleName, Role>,
    permissions: BTreeMap<PermissionName, Permission>,
    role_permissions: BTreeSet<RolePermission>,
    user_roles: BTreeSet<UserRole>,
}

impl AuthorizationTables {
    fn role_id(&self, role: &RoleName) -> AppResult<RoleId> {
        self.roles
            .get(role)
            .map(Role::id)
            .ok_or_else(|| AppError::RoleNotFound(role.to_string()))
    }

    fn permission_id(&self, permission: &PermissionName) -> AppResult<PermissionId> {
        self.permissions
            .get(permission)
            .map(Permission::id)
            .ok_or_else(|| AppError::PermissionNotFound(permission.to_string()))
    }

    fn held_role_ids(&self, user_id: UserId) -> BTreeSet<RoleId> {
        self.user_roles
            .iter()
            .filter(|binding| binding.user_id == user_id)
            .map(|binding| binding.role_id)
            .collect()
    }
}

impl InMemoryAuthorizationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryAuthorizationRepository {
    async fn create_role(&self, role: &RoleName) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.roles.contains_key(role) {
            return Ok(());
        }

        state.last_role_id += 1;
        let role_id = RoleId::new(state.last_role_id);
        state
            .roles
            .insert(role.clone(), Role::new(role_id, role.clone()));
        Ok(())
    }

    async fn create_permission(&self, permission: &PermissionName) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.permissions.contains_key(permission) {
            return Ok(());
        }

        state.last_permission_id += 1;
        let permission_id = PermissionId::new(state.last_permission_id);
        state.permissions.insert(
            permission.clone(),
            Permission::new(permission_id, permission.clone()),
        );
        Ok(())
    }

    async fn assign_permissions(
        &self,
        role: &RoleName,
        permissions: &[PermissionName],
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let role_id = state.role_id(role)?;
        let permission_ids = permissions
            .iter()
            .map(|permission| state.permission_id(permission))
            .collect::<AppResult<Vec<_>>>()?;

        state
            .role_permissions
            .extend(permission_ids.into_iter().map(|permission_id| RolePermission {
                role_id,
                permission_id,
            }));
        Ok(())
    }

    async fn assign_role(&self, user_id: UserId, role: &RoleName) -> AppResult<()> {
        let mut state = self.state.write().await;
        let role_id = state.role_id(role)?;

        if !state.user_roles.insert(UserRole { user_id, role_id }) {
            return Err(AppError::RoleAlreadyAssigned {
                user_id,
                role: role.to_string(),
            });
        }

        Ok(())
    }

    async fn user_has_role(&self, user_id: UserId, role: &RoleName) -> AppResult<bool> {
        let state = self.state.read().await;
        let role_id = state.role_id(role)?;

        Ok(state.user_roles.contains(&UserRole { user_id, role_id }))
    }

    async fn user_has_permission(
        &self,
        user_id: UserId,
        permission: &PermissionName,
    ) -> AppResult<bool> {
        let state = self.state.read().await;
        let permission_id = state.permission_id(permission)?;

        Ok(state
            .held_role_ids(user_id)
            .into_iter()
            .any(|role_id| {
                state.role_permissions.contains(&RolePermission {
                    role_id,
                    permission_id,
                })
            }))
    }

    async fn role_has_permission(
        &self,
        role: &RoleName,
        permission: &PermissionName,
    ) -> AppResult<bool> {
        let state = self.state.read().await;
        let role_id = state.role_id(role)?;
        let permission_id = state.permission_id(permission)?;

        Ok(state.role_permissions.contains(&RolePermission {
            role_id,
            permission_id,
        }))
    }

    async fn revoke_role(&self, user_id: UserId, role: &RoleName) -> AppResult<()> {
        let mut state = self.state.write().await;
        let role_id = state.role_id(role)?;

        state.user_roles.remove(&UserRole { user_id, role_id });
        Ok(())
    }

    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission: &PermissionName,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let permission_id = state.permission_id(permission)?;
        let held_role_ids = state.held_role_ids(user_id);

        state.role_permissions.retain(|binding| {
            !(binding.permission_id == permission_id && held_role_ids.contains(&binding.role_id))
        });
        Ok(())
    }

    async fn revoke_role_permission(
        &self,
        role: &RoleName,
        permission: &PermissionName,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let role_id = state.role_id(role)?;
        let permission_id = state.permission_id(permission)?;

        state.role_permissions.remove(&RolePermission {
            role_id,
            permission_id,
        });
        Ok(())
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleName>> {
        Ok(self.state.read().await.roles.keys().cloned().collect())
    }

    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<RoleName>> {
        let state = self.state.read().await;
        let held_role_ids = state.held_role_ids(user_id);

        Ok(state
            .roles
            .values()
            .filter(|role| held_role_ids.contains(&role.id()))
            .map(|role| role.name().clone())
            .collect())
    }

    async fn list_permissions(&self) -> AppResult<Vec<PermissionName>> {
        Ok(self.state.read().await.permissions.keys().cloned().collect())
    }

    async fn delete_role(&self, role: &RoleName) -> AppResult<()> {
        let mut state = self.state.write().await;
        let role_id = state.role_id(role)?;

        if state
            .user_roles
            .iter()
            .any(|binding| binding.role_id == role_id)
        {
            return Err(AppError::RoleInUse(role.to_string()));
        }

        state
            .role_permissions
            .retain(|binding| binding.role_id != role_id);
        state.roles.remove(role);
        Ok(())
    }

    async fn delete_permission(&self, permission: &PermissionName) -> AppResult<()> {
        let mut state = self.state.write().await;
        let permission_id = state.permission_id(permission)?;

        if state
            .role_permissions
            .iter()
            .any(|binding| binding.permission_id == permission_id)
        {
            return Err(AppError::PermissionInUse(permission.to_string()));
        }

        state.permissions.remove(permission);
        Ok(())
    }
}
