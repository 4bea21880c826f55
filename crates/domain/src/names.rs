use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rolegate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Maximum length in characters for role and permission names.
pub const MAX_NAME_LENGTH: usize = 255;

/// Validated role name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// Creates a role name, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        normalize_name("role", value.into()).map(Self)
    }

    /// Returns the name as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated permission name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionName(String);

impl PermissionName {
    /// Creates a permission name, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        normalize_name("permission", value.into()).map(Self)
    }

    /// Returns the name as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn normalize_name(kind: &str, value: String) -> AppResult<String> {
    let value = NonEmptyString::new(value.trim())
        .map_err(|_| AppError::Validation(format!("{kind} name must not be empty")))?;

    if value.as_str().chars().any(char::is_control) {
        return Err(AppError::Validation(format!(
            "{kind} name must not contain control characters"
        )));
    }

    let length = value.as_str().chars().count();
    if length > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "{kind} name must be at most {MAX_NAME_LENGTH} characters, got {length}"
        )));
    }

    Ok(value.into())
}

impl FromStr for RoleName {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl FromStr for PermissionName {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for RoleName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for PermissionName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

impl From<PermissionName> for String {
    fn from(value: PermissionName) -> Self {
        value.0
    }
}

impl Display for RoleName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl Display for PermissionName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}
