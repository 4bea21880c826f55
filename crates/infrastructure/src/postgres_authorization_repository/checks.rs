use super::*;

impl PostgresAuthorizationRepository {
    pub(super) async fn user_has_role_impl(
        &self,
        user_id: UserId,
        role: &RoleName,
    ) -> AppResult<bool> {
        let role_id = find_role_id(&self.pool, &self.tables, role, RowLock::Unlocked).await?;

        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE user_id = $1 AND role_id = $2)",
            self.tables.user_roles
        );
        sqlx::query_scalar::<_, bool>(sql.as_str())
            .bind(user_id.as_i64())
            .bind(role_id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to check user role: {error}")))
    }

    pub(super) async fn user_has_permission_impl(
        &self,
        user_id: UserId,
        permission: &PermissionName,
    ) -> AppResult<bool> {
        let permission_id =
            find_permission_id(&self.pool, &self.tables, permission, RowLock::Unlocked).await?;

        let sql = format!(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM {} AS user_roles
                INNER JOIN {} AS role_permissions
                    ON role_permissions.role_id = user_roles.role_id
                WHERE user_roles.user_id = $1
                    AND role_permissions.permission_id = $2
            )
            "#,
            self.tables.user_roles, self.tables.role_permissions
        );
        sqlx::query_scalar::<_, bool>(sql.as_str())
            .bind(user_id.as_i64())
            .bind(permission_id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to check user permission: {error}"))
            })
    }

    pub(super) async fn role_has_permission_impl(
        &self,
        role: &RoleName,
        permission: &PermissionName,
    ) -> AppResult<bool> {
        let role_id = find_role_id(&self.pool, &self.tables, role, RowLock::Unlocked).await?;
        let permission_id =
            find_permission_id(&self.pool, &self.tables, permission, RowLock::Unlocked).await?;

        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE role_id = $1 AND permission_id = $2)",
            self.tables.role_permissions
        );
        sqlx::query_scalar::<_, bool>(sql.as_str())
            .bind(role_id.as_i64())
            .bind(permission_id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to check role permission: {error}"))
            })
    }
}
