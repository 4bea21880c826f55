//! Shared primitives for all Rust crates in Rolegate.

#![forbid(unsafe_code)]

/// User identity primitives shared across crates.
pub mod user;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use user::UserId;

/// Result type used across Rolegate crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Authorization error categories.
///
/// Lookup misses are reported with the dedicated not-found variants. Store and
/// connectivity failures always surface as [`AppError::Internal`].
#[derive(Debug, Error)]
pub enum AppError {
    /// The named role does not exist.
    #[error("role '{0}' not found")]
    RoleNotFound(String),

    /// The named permission does not exist.
    #[error("permission '{0}' not found")]
    PermissionNotFound(String),

    /// The user already holds the role.
    #[error("role '{role}' is already assigned to user '{user_id}'")]
    RoleAlreadyAssigned {
        /// User holding the role.
        user_id: UserId,
        /// Role name.
        role: String,
    },

    /// The role is still held by at least one user.
    #[error("cannot delete role '{0}': it is assigned to users")]
    RoleInUse(String),

    /// The permission is still granted by at least one role.
    #[error("cannot delete permission '{0}': it is granted by roles")]
    PermissionInUse(String),

    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// User is blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString, UserId};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn not_found_messages_name_the_missing_entity() {
        assert_eq!(
            AppError::RoleNotFound("ops".to_owned()).to_string(),
            "role 'ops' not found"
        );
        assert_eq!(
            AppError::PermissionNotFound("read".to_owned()).to_string(),
            "permission 'read' not found"
        );
    }

    #[test]
    fn already_assigned_message_names_user_and_role() {
        let error = AppError::RoleAlreadyAssigned {
            user_id: UserId::new(7),
            role: "ops".to_owned(),
        };

        assert_eq!(
            error.to_string(),
            "role 'ops' is already assigned to user '7'"
        );
    }
}
