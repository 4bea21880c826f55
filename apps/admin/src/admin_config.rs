use std::env;

use rolegate_core::AppError;
use rolegate_infrastructure::{AuthorizationStoreOptions, TablePrefix};
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    pub database_url: String,
    pub table_prefix: String,
    pub max_connections: u32,
}

impl AdminConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))?;

        let table_prefix = lookup("ROLEGATE_TABLE_PREFIX")
            .map(|value| value.trim().to_owned())
            .unwrap_or_default();
        TablePrefix::new(table_prefix.as_str()).map_err(|error| {
            AppError::Validation(format!("invalid ROLEGATE_TABLE_PREFIX: {error}"))
        })?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value.trim().parse::<u32>().map_err(|error| {
                AppError::Validation(format!("invalid DATABASE_MAX_CONNECTIONS: {error}"))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        if max_connections == 0 {
            return Err(AppError::Validation(
                "DATABASE_MAX_CONNECTIONS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            database_url,
            table_prefix,
            max_connections,
        })
    }

    pub fn store_options(&self) -> AuthorizationStoreOptions {
        AuthorizationStoreOptions {
            table_prefix: self.table_prefix.clone(),
        }
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rolegate_core::AppError;

    use super::{AdminConfig, DEFAULT_MAX_CONNECTIONS};

    fn load_from(values: &[(&str, &str)]) -> Result<AdminConfig, AppError> {
        let values = values
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect::<HashMap<_, _>>();

        AdminConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn database_url_is_required() {
        let result = load_from(&[]);
        assert!(matches!(
            result,
            Err(AppError::Validation(ref message)) if message.contains("DATABASE_URL")
        ));
    }

    #[test]
    fn defaults_apply_when_optional_values_are_missing() {
        let config = load_from(&[("DATABASE_URL", "postgres://localhost/rolegate")]);

        assert!(matches!(
            config,
            Ok(ref config) if config.table_prefix.is_empty()
                && config.max_connections == DEFAULT_MAX_CONNECTIONS
        ));
    }

    #[test]
    fn table_prefix_is_validated() {
        let result = load_from(&[
            ("DATABASE_URL", "postgres://localhost/rolegate"),
            ("ROLEGATE_TABLE_PREFIX", "auth-go"),
        ]);

        assert!(matches!(
            result,
            Err(AppError::Validation(ref message)) if message.contains("ROLEGATE_TABLE_PREFIX")
        ));
    }

    #[test]
    fn zero_connections_are_rejected() {
        let result = load_from(&[
            ("DATABASE_URL", "postgres://localhost/rolegate"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ]);

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn store_options_carry_the_prefix() {
        let config = load_from(&[
            ("DATABASE_URL", "postgres://localhost/rolegate"),
            ("ROLEGATE_TABLE_PREFIX", "authz_"),
        ]);

        let Ok(config) = config else {
            panic!("valid configuration was rejected");
        };
        assert_eq!(config.store_options().table_prefix, "authz_");
    }
}
