use super::*;

impl PostgresAuthorizationRepository {
    pub(super) async fn create_role_impl(&self, role: &RoleName) -> AppResult<()> {
        let sql = format!(
            r#"
            INSERT INTO {} (name)
            VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            "#,
            self.tables.roles
        );

        sqlx::query(sql.as_str())
            .bind(role.as_str())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to create role: {error}")))?;

        Ok(())
    }

    pub(super) async fn assign_role_impl(&self, user_id: UserId, role: &RoleName) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let role_id = find_role_id(&mut *transaction, &self.tables, role, RowLock::Share).await?;

        let sql = format!(
            r#"
            INSERT INTO {} (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
            self.tables.user_roles
        );
        let rows_affected = sqlx::query(sql.as_str())
            .bind(user_id.as_i64())
            .bind(role_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to assign role: {error}")))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::RoleAlreadyAssigned {
                user_id,
                role: role.to_string(),
            });
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }

    pub(super) async fn revoke_role_impl(&self, user_id: UserId, role: &RoleName) -> AppResult<()> {
        let role_id = find_role_id(&self.pool, &self.tables, role, RowLock::Unlocked).await?;

        let sql = format!(
            "DELETE FROM {} WHERE user_id = $1 AND role_id = $2",
            self.tables.user_roles
        );
        sqlx::query(sql.as_str())
            .bind(user_id.as_i64())
            .bind(role_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to revoke role: {error}")))?;

        Ok(())
    }

    pub(super) async fn list_roles_impl(&self) -> AppResult<Vec<RoleName>> {
        let sql = format!(
            r#"SELECT name FROM {} ORDER BY name COLLATE "C""#,
            self.tables.roles
        );

        let names = sqlx::query_scalar::<_, String>(sql.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        decode_role_names(names)
    }

    pub(super) async fn list_user_roles_impl(&self, user_id: UserId) -> AppResult<Vec<RoleName>> {
        let sql = format!(
            r#"
            SELECT roles.name
            FROM {} AS user_roles
            INNER JOIN {} AS roles
                ON roles.id = user_roles.role_id
            WHERE user_roles.user_id = $1
            ORDER BY roles.name COLLATE "C"
            "#,
            self.tables.user_roles, self.tables.roles
        );

        let names = sqlx::query_scalar::<_, String>(sql.as_str())
            .bind(user_id.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list user roles: {error}")))?;

        decode_role_names(names)
    }

    pub(super) async fn delete_role_impl(&self, role: &RoleName) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let role_id = find_role_id(&mut *transaction, &self.tables, role, RowLock::Update).await?;

        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE role_id = $1)",
            self.tables.user_roles
        );
        let in_use = sqlx::query_scalar::<_, bool>(sql.as_str())
            .bind(role_id.as_i64())
            .fetch_one(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to inspect role usage: {error}")))?;

        if in_use {
            return Err(AppError::RoleInUse(role.to_string()));
        }

        let sql = format!(
            "DELETE FROM {} WHERE role_id = $1",
            self.tables.role_permissions
        );
        sqlx::query(sql.as_str())
            .bind(role_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to revoke role permissions: {error}"))
            })?;

        let sql = format!("DELETE FROM {} WHERE id = $1", self.tables.roles);
        sqlx::query(sql.as_str())
            .bind(role_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                if is_foreign_key_violation(&error) {
                    return AppError::RoleInUse(role.to_string());
                }

                AppError::Internal(format!("failed to delete role: {error}"))
            })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }
}

fn decode_role_names(names: Vec<String>) -> AppResult<Vec<RoleName>> {
    names
        .into_iter()
        .map(|name| {
            RoleName::new(name.as_str()).map_err(|error| {
                AppError::Internal(format!("invalid stored role name '{name}': {error}"))
            })
        })
        .collect()
}
