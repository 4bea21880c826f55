//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_authorization_repository;
mod postgres_authorization_repository;
mod postgres_authorization_schema;
mod table_names;

pub use in_memory_authorization_repository::InMemoryAuthorizationRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_authorization_schema::synchronize_schema;
pub use table_names::{
    AuthorizationStoreOptions, MAX_TABLE_PREFIX_LENGTH, TableNames, TablePrefix,
};
