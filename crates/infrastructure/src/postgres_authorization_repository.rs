use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres};

use rolegate_application::AuthorizationRepository;
use rolegate_core::{AppError, AppResult, UserId};
use rolegate_domain::{PermissionId, PermissionName, RoleId, RoleName};

use crate::{AuthorizationStoreOptions, TableNames, synchronize_schema};

mod checks;
mod permissions;
mod roles;


/// PostgreSQL-backed repository for roles, permissions and their bindings.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
    tables: Arc<TableNames>,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository over tables that already exist.
    #[must_use]
    pub fn new(pool: PgPool, tables: TableNames) -> Self {
        Self {
            pool,
            tables: Arc::new(tables),
        }
    }

    /// Validates the options, synchronizes the schema and returns the repository.
    pub async fn initialize(pool: PgPool, options: &AuthorizationStoreOptions) -> AppResult<Self> {
        let tables = TableNames::try_from(options)?;
        synchronize_schema(&pool, &tables).await?;

        Ok(Self::new(pool, tables))
    }

    /// Returns the resolved table names.
    #[must_use]
    pub fn tables(&self) -> &TableNames {
        &self.tables
    }
}

/// Row lock taken while resolving a name inside a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowLock {
    Unlocked,
    Share,
    Update,
}

impl RowLock {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Unlocked => "",
            Self::Share => "FOR SHARE",
            Self::Update => "FOR UPDATE",
        }
    }
}

async fn find_role_id<'e, E>(
    executor: E,
    tables: &TableNames,
    role: &RoleName,
    lock: RowLock,
) -> AppResult<RoleId>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "SELECT id FROM {} WHERE name = $1 {}",
        tables.roles,
        lock.as_sql()
    );

    sqlx::query_scalar::<_, i64>(sql.as_str())
        .bind(role.as_str())
        .fetch_optional(executor)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role: {error}")))?
        .map(RoleId::new)
        .ok_or_else(|| AppError::RoleNotFound(role.to_string()))
}

async fn find_permission_id<'e, E>(
    executor: E,
    tables: &TableNames,
    permission: &PermissionName,
    lock: RowLock,
) -> AppResult<PermissionId>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "SELECT id FROM {} WHERE name = $1 {}",
        tables.permissions,
        lock.as_sql()
    );

    sqlx::query_scalar::<_, i64>(sql.as_str())
        .bind(permission.as_str())
        .fetch_optional(executor)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve permission: {error}")))?
        .map(PermissionId::new)
        .ok_or_else(|| AppError::PermissionNotFound(permission.to_string()))
}

fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(database_error) = error
        && database_error.code().as_deref() == Some("23503")
    {
        return true;
    }

    false
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn create_role(&self, role: &RoleName) -> AppResult<()> {
        self.create_role_impl(role).await
    }

    async fn create_permission(&self, permission: &PermissionName) -> AppResult<()> {
        self.create_permission_impl(permission).await
    }

    async fn assign_permissions(
        &self,
        role: &RoleName,
        permissions: &[PermissionName],
    ) -> AppResult<()> {
        self.assign_permissions_impl(role, permissions).await
    }

    async fn assign_role(&self, user_id: UserId, role: &RoleName) -> AppResult<()> {
        self.assign_role_impl(user_id, role).await
    }

    async fn user_has_role(&self, user_id: UserId, role: &RoleName) -> AppResult<bool> {
        self.user_has_role_impl(user_id, role).await
    }

    async fn user_has_permission(
        &self,
        user_id: UserId,
        permission: &PermissionName,
    ) -> AppResult<bool> {
        self.user_has_permission_impl(user_id, permission).await
    }

    async fn role_has_permission(
        &self,
        role: &RoleName,
        permission: &PermissionName,
    ) -> AppResult<bool> {
        self.role_has_permission_impl(role, permission).await
    }

    async fn revoke_role(&self, user_id: UserId, role: &RoleName) -> AppResult<()> {
        self.revoke_role_impl(user_id, role).await
    }

    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission: &PermissionName,
    ) -> AppResult<()> {
        self.revoke_permission_impl(user_id, permission).await
    }

    async fn revoke_role_permission(
        &self,
        role: &RoleName,
        permission: &PermissionName,
    ) -> AppResult<()> {
        self.revoke_role_permission_impl(role, permission).await
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleName>> {
        self.list_roles_impl().await
    }

    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<RoleName>> {
        self.list_user_roles_impl(user_id).await
    }

    async fn list_permissions(&self) -> AppResult<Vec<PermissionName>> {
        self.list_permissions_impl().await
    }

    async fn delete_role(&self, role: &RoleName) -> AppResult<()> {
        self.delete_role_impl(role).await
    }

    async fn delete_permission(&self, permission: &PermissionName) -> AppResult<()> {
        self.delete_permission_impl(permission).await
    }
}
