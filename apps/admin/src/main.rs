//! Rolegate administration command line.

#![forbid(unsafe_code)]

mod admin_config;
mod commands;

use std::sync::Arc;

use clap::Parser;
use rolegate_application::AuthorizationService;
use rolegate_core::{AppError, AppResult};
use rolegate_infrastructure::PostgresAuthorizationRepository;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::admin_config::{AdminConfig, init_tracing};
use crate::commands::Cli;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AdminConfig::load()?;
    let pool = connect_pool(&config).await?;

    let repository =
        PostgresAuthorizationRepository::initialize(pool, &config.store_options()).await?;
    info!(
        table_prefix = %config.table_prefix,
        max_connections = config.max_connections,
        "authorization store ready"
    );

    let service = AuthorizationService::new(Arc::new(repository));
    let output = commands::run(&service, cli.command).await?;
    println!("{}", output.render(cli.json)?);

    Ok(())
}

async fn connect_pool(config: &AdminConfig) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.database_url.as_str())
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}
