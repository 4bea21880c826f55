use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use rolegate_core::{AppError, AppResult, UserId};
use rolegate_domain::{PermissionName, RoleName};
use tokio::sync::Mutex;

use crate::AuthorizationRepository;

use super::AuthorizationService;

#[derive(Default)]
struct FakeAuthorizationRepository {
    calls: Mutex<Vec<String>>,
    known_permissions: BTreeSet<String>,
    granted: BTreeSet<(i64, String)>,
    roles: Vec<RoleName>,
    assigned_batches: Mutex<Vec<(RoleName, Vec<PermissionName>)>>,
    held: Mutex<BTreeSet<(i64, String)>>,
}

impl FakeAuthorizationRepository {
    async fn record(&self, call: impl Into<String>) {
        self.calls.lock().await.push(call.into());
    }

    fn ensure_permission(&self, permission: &PermissionName) -> AppResult<()> {
        if self.known_permissions.contains(permission.as_str()) {
            Ok(())
        } else {
            Err(AppError::PermissionNotFound(permission.to_string()))
        }
    }
}

#[async_trait]
impl AuthorizationRepository for FakeAuthorizationRepository {
    async fn create_role(&self, role: &RoleName) -> AppResult<()> {
        self.record(format!("create_role:{role}")).await;
        Ok(())
    }

    async fn create_permission(&self, permission: &PermissionName) -> AppResult<()> {
        self.record(format!("create_permission:{permission}")).await;
        Ok(())
    }

    async fn assign_permissions(
        &self,
        role: &RoleName,
        permissions: &[PermissionName],
    ) -> AppResult<()> {
        self.record(format!("assign_permissions:{role}")).await;
        self.assigned_batches
            .lock()
            .await
            .push((role.clone(), permissions.to_vec()));
        Ok(())
    }

    async fn assign_role(&self, user_id: UserId, role: &RoleName) -> AppResult<()> {
        self.record(format!("assign_role:{user_id}:{role}")).await;
        let inserted = self
            .held
            .lock()
            .await
            .insert((user_id.as_i64(), role.to_string()));
        if inserted {
            Ok(())
        } else {
            Err(AppError::RoleAlreadyAssigned {
                user_id,
                role: role.to_string(),
            })
        }
    }

    async fn user_has_role(&self, user_id: UserId, role: &RoleName) -> AppResult<bool> {
        Ok(self
            .held
            .lock()
            .await
            .contains(&(user_id.as_i64(), role.to_string())))
    }

    async fn user_has_permission(
        &self,
        user_id: UserId,
        permission: &PermissionName,
    ) -> AppResult<bool> {
        self.ensure_permission(permission)?;
        Ok(self
            .granted
            .contains(&(user_id.as_i64(), permission.to_string())))
    }

    async fn role_has_permission(
        &self,
        role: &RoleName,
        permission: &PermissionName,
    ) -> AppResult<bool> {
        self.ensure_permission(permission)?;
        Ok(self
            .assigned_batches
            .lock()
            .await
            .iter()
            .any(|(stored_role, permissions)| {
                stored_role == role && permissions.contains(permission)
            }))
    }

    async fn revoke_role(&self, user_id: UserId, role: &RoleName) -> AppResult<()> {
        self.record(format!("revoke_role:{user_id}:{role}")).await;
        self.held
            .lock()
            .await
            .remove(&(user_id.as_i64(), role.to_string()));
        Ok(())
    }

    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission: &PermissionName,
    ) -> AppResult<()> {
        self.ensure_permission(permission)?;
        self.record(format!("revoke_permission:{user_id}:{permission}"))
            .await;
        Ok(())
    }

    async fn revoke_role_permission(
        &self,
        role: &RoleName,
        permission: &PermissionName,
    ) -> AppResult<()> {
        self.ensure_permission(permission)?;
        self.record(format!("revoke_role_permission:{role}:{permission}"))
            .await;
        Ok(())
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleName>> {
        Ok(self.roles.clone())
    }

    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<RoleName>> {
        self.held
            .lock()
            .await
            .iter()
            .filter(|(stored_user_id, _)| *stored_user_id == user_id.as_i64())
            .map(|(_, role)| RoleName::new(role.as_str()))
            .collect()
    }

    async fn list_permissions(&self) -> AppResult<Vec<PermissionName>> {
        self.known_permissions
            .iter()
            .map(|permission| PermissionName::new(permission.as_str()))
            .collect()
    }

    async fn delete_role(&self, role: &RoleName) -> AppResult<()> {
        self.record(format!("delete_role:{role}")).await;
        Ok(())
    }

    async fn delete_permission(&self, permission: &PermissionName) -> AppResult<()> {
        self.record(format!("delete_permission:{permission}")).await;
        Ok(())
    }
}

fn service_with(
    repository: FakeAuthorizationRepository,
) -> (AuthorizationService, Arc<FakeAuthorizationRepository>) {
    let repository = Arc::new(repository);
    (AuthorizationService::new(repository.clone()), repository)
}

fn repository_granting(user_id: i64, permission: &str) -> FakeAuthorizationRepository {
    FakeAuthorizationRepository {
        known_permissions: BTreeSet::from([permission.to_owned(), "unused".to_owned()]),
        granted: BTreeSet::from([(user_id, permission.to_owned())]),
        ..FakeAuthorizationRepository::default()
    }
}

#[tokio::test]
async fn blank_role_name_is_rejected_before_reaching_repository() {
    let (service, repository) = service_with(FakeAuthorizationRepository::default());

    let result = service.create_role("   ").await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(repository.calls.lock().await.is_empty());
}

#[tokio::test]
async fn names_are_trimmed_before_storage() {
    let (service, repository) = service_with(FakeAuthorizationRepository::default());

    let result = service.create_permission("  permission-a ").await;

    assert!(result.is_ok());
    assert_eq!(
        repository.calls.lock().await.as_slice(),
        ["create_permission:permission-a".to_owned()]
    );
}

#[tokio::test]
async fn assign_permissions_deduplicates_names_in_input_order() {
    let (service, repository) = service_with(FakeAuthorizationRepository::default());

    let result = service
        .assign_permissions("role-a", &["permission-b", "permission-a", " permission-b"])
        .await;

    assert!(result.is_ok());
    let batches = repository.assigned_batches.lock().await;
    assert_eq!(batches.len(), 1);
    let names = batches[0]
        .1
        .iter()
        .map(PermissionName::as_str)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["permission-b", "permission-a"]);
}

#[tokio::test]
async fn assign_permissions_rejects_blank_entries_without_partial_writes() {
    let (service, repository) = service_with(FakeAuthorizationRepository::default());

    let result = service
        .assign_permissions("role-a", &["permission-a", ""])
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(repository.assigned_batches.lock().await.is_empty());
}

#[tokio::test]
async fn second_role_assignment_is_a_conflict() {
    let (service, _) = service_with(FakeAuthorizationRepository::default());
    let user_id = UserId::new(1);

    let first = service.assign_role(user_id, "role-a").await;
    let second = service.assign_role(user_id, "role-a").await;

    assert!(first.is_ok());
    assert!(matches!(
        second,
        Err(AppError::RoleAlreadyAssigned { ref role, .. }) if role == "role-a"
    ));
    assert!(matches!(service.check_role(user_id, "role-a").await, Ok(true)));
}

#[tokio::test]
async fn require_permission_allows_granted_user() {
    let (service, _) = service_with(repository_granting(1, "permission-a"));

    let result = service
        .require_permission(UserId::new(1), "permission-a")
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn require_permission_forbids_user_without_grant() {
    let (service, _) = service_with(repository_granting(1, "permission-a"));

    let result = service
        .require_permission(UserId::new(2), "permission-a")
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn require_permission_propagates_unknown_permission() {
    let (service, _) = service_with(repository_granting(1, "permission-a"));

    let result = service
        .require_permission(UserId::new(1), "permission-c")
        .await;

    assert!(matches!(
        result,
        Err(AppError::PermissionNotFound(ref name)) if name == "permission-c"
    ));
}

#[tokio::test]
async fn listing_returns_plain_names() {
    let roles = vec![
        RoleName::new("role-a").unwrap_or_else(|error| panic!("{error}")),
        RoleName::new("role-b").unwrap_or_else(|error| panic!("{error}")),
    ];
    let (service, _) = service_with(FakeAuthorizationRepository {
        roles,
        ..repository_granting(1, "permission-a")
    });

    let listed_roles = service.get_roles().await.unwrap_or_default();
    let listed_permissions = service.get_permissions().await.unwrap_or_default();

    assert_eq!(listed_roles, vec!["role-a".to_owned(), "role-b".to_owned()]);
    assert_eq!(
        listed_permissions,
        vec!["permission-a".to_owned(), "unused".to_owned()]
    );
}

#[tokio::test]
async fn revoke_role_removes_membership() {
    let (service, _) = service_with(FakeAuthorizationRepository::default());
    let user_id = UserId::new(5);

    assert!(service.assign_role(user_id, "role-a").await.is_ok());
    assert!(service.revoke_role(user_id, "role-a").await.is_ok());

    assert!(matches!(service.check_role(user_id, "role-a").await, Ok(false)));
    assert!(service.get_user_roles(user_id).await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn delete_operations_validate_names() {
    let (service, repository) = service_with(FakeAuthorizationRepository::default());

    assert!(matches!(
        service.delete_role("").await,
        Err(AppError::Validation(_))
    ));
    assert!(service.delete_permission("permission-a").await.is_ok());

    assert_eq!(
        repository.calls.lock().await.as_slice(),
        ["delete_permission:permission-a".to_owned()]
    );
}
