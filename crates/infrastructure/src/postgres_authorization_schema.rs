use rolegate_core::{AppError, AppResult};
use sqlx::PgPool;
use tracing::info;

use crate::TableNames;

/// Creates the authorization tables and indexes when they are missing.
///
/// Runs in one transaction holding an advisory lock keyed by the table
/// prefix, so concurrent initializers for the same prefix serialize.
pub async fn synchronize_schema(pool: &PgPool, tables: &TableNames) -> AppResult<()> {
    let mut transaction = pool
        .begin()
        .await
        .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(format!("rolegate:{}", tables.prefix().as_str()))
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to acquire schema lock: {error}")))?;

    for statement in schema_statements(tables) {
        sqlx::query(statement.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to synchronize authorization schema: {error}"))
            })?;
    }

    transaction
        .commit()
        .await
        .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))?;

    info!(
        table_prefix = tables.prefix().as_str(),
        "authorization schema synchronized"
    );
    Ok(())
}

fn schema_statements(tables: &TableNames) -> Vec<String> {
    let TableNames {
        roles,
        permissions,
        role_permissions,
        user_roles,
        ..
    } = tables;
    let prefix = tables.prefix().as_str();

    vec![
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {roles} (
                id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {permissions} (
                id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {role_permissions} (
                role_id BIGINT NOT NULL REFERENCES {roles} (id) ON DELETE CASCADE,
                permission_id BIGINT NOT NULL REFERENCES {permissions} (id) ON DELETE RESTRICT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (role_id, permission_id)
            )
            "#
        ),
        format!(
            r#"
            CREATE INDEX IF NOT EXISTS {prefix}rp_permission_idx
                ON {role_permissions} (permission_id)
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {user_roles} (
                user_id BIGINT NOT NULL,
                role_id BIGINT NOT NULL REFERENCES {roles} (id) ON DELETE RESTRICT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (user_id, role_id)
            )
            "#
        ),
        format!(
            r#"
            CREATE INDEX IF NOT EXISTS {prefix}ur_role_idx
                ON {user_roles} (role_id)
            "#
        ),
    ]
}
