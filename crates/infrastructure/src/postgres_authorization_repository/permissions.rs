use std::collections::HashMap;

use super::*;

impl PostgresAuthorizationRepository {
    pub(super) async fn create_permission_impl(
        &self,
        permission: &PermissionName,
    ) -> AppResult<()> {
        let sql = format!(
            r#"
            INSERT INTO {} (name)
            VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            "#,
            self.tables.permissions
        );

        sqlx::query(sql.as_str())
            .bind(permission.as_str())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to create permission: {error}")))?;

        Ok(())
    }

    pub(super) async fn assign_permissions_impl(
        &self,
        role: &RoleName,
        permissions: &[PermissionName],
    ) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let role_id = find_role_id(&mut *transaction, &self.tables, role, RowLock::Share).await?;

        let sql = format!(
            "SELECT id, name FROM {} WHERE name = ANY($1) FOR SHARE",
            self.tables.permissions
        );
        let names = permissions
            .iter()
            .map(PermissionName::as_str)
            .collect::<Vec<_>>();
        let ids_by_name = sqlx::query_as::<_, (i64, String)>(sql.as_str())
            .bind(names)
            .fetch_all(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to resolve permissions: {error}")))?
            .into_iter()
            .map(|(id, name)| (name, id))
            .collect::<HashMap<_, _>>();

        let mut permission_ids = Vec::with_capacity(permissions.len());
        for permission in permissions {
            let permission_id = ids_by_name
                .get(permission.as_str())
                .copied()
                .ok_or_else(|| AppError::PermissionNotFound(permission.to_string()))?;
            permission_ids.push(permission_id);
        }

        let sql = format!(
            r#"
            INSERT INTO {} (role_id, permission_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT (role_id, permission_id) DO NOTHING
            "#,
            self.tables.role_permissions
        );
        sqlx::query(sql.as_str())
            .bind(role_id.as_i64())
            .bind(permission_ids)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to persist role permissions: {error}"))
            })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }

    pub(super) async fn revoke_permission_impl(
        &self,
        user_id: UserId,
        permission: &PermissionName,
    ) -> AppResult<()> {
        let permission_id =
            find_permission_id(&self.pool, &self.tables, permission, RowLock::Unlocked).await?;

        let sql = format!(
            r#"
            DELETE FROM {} AS role_permissions
            USING {} AS user_roles
            WHERE role_permissions.role_id = user_roles.role_id
                AND user_roles.user_id = $1
                AND role_permissions.permission_id = $2
            "#,
            self.tables.role_permissions, self.tables.user_roles
        );
        sqlx::query(sql.as_str())
            .bind(user_id.as_i64())
            .bind(permission_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to revoke permission: {error}")))?;

        Ok(())
    }

    pub(super) async fn revoke_role_permission_impl(
        &self,
        role: &RoleName,
        permission: &PermissionName,
    ) -> AppResult<()> {
        let role_id = find_role_id(&self.pool, &self.tables, role, RowLock::Unlocked).await?;
        let permission_id =
            find_permission_id(&self.pool, &self.tables, permission, RowLock::Unlocked).await?;

        let sql = format!(
            "DELETE FROM {} WHERE role_id = $1 AND permission_id = $2",
            self.tables.role_permissions
        );
        sqlx::query(sql.as_str())
            .bind(role_id.as_i64())
            .bind(permission_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to revoke role permission: {error}"))
            })?;

        Ok(())
    }

    pub(super) async fn list_permissions_impl(&self) -> AppResult<Vec<PermissionName>> {
        let sql = format!(
            r#"SELECT name FROM {} ORDER BY name COLLATE "C""#,
            self.tables.permissions
        );

        sqlx::query_scalar::<_, String>(sql.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?
            .into_iter()
            .map(|name| {
                PermissionName::new(name.as_str()).map_err(|error| {
                    AppError::Internal(format!("invalid stored permission name '{name}': {error}"))
                })
            })
            .collect()
    }

    pub(super) async fn delete_permission_impl(
        &self,
        permission: &PermissionName,
    ) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let permission_id =
            find_permission_id(&mut *transaction, &self.tables, permission, RowLock::Update)
                .await?;

        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE permission_id = $1)",
            self.tables.role_permissions
        );
        let in_use = sqlx::query_scalar::<_, bool>(sql.as_str())
            .bind(permission_id.as_i64())
            .fetch_one(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to inspect permission usage: {error}"))
            })?;

        if in_use {
            return Err(AppError::PermissionInUse(permission.to_string()));
        }

        let sql = format!("DELETE FROM {} WHERE id = $1", self.tables.permissions);
        sqlx::query(sql.as_str())
            .bind(permission_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                if is_foreign_key_violation(&error) {
                    return AppError::PermissionInUse(permission.to_string());
                }

                AppError::Internal(format!("failed to delete permission: {error}"))
            })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }
}
