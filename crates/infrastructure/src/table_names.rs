use rolegate_core::{AppError, AppResult};

/// Maximum accepted table prefix length.
///
/// Keeps every derived identifier below the PostgreSQL 63 byte limit.
pub const MAX_TABLE_PREFIX_LENGTH: usize = 32;

/// Table suffixes that end with another table's full name.
///
/// A prefix ending in one of these would reuse a table of the shorter prefix,
/// e.g. `user_` + `roles` is the `user_roles` table of the empty prefix.
const AMBIGUOUS_PREFIX_ENDINGS: [&str; 2] = ["user_", "role_"];

/// Options for constructing an authorization store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationStoreOptions {
    /// Prefix applied to every authorization table name.
    pub table_prefix: String,
}

/// Validated table prefix safe for interpolation into SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TablePrefix(String);

impl TablePrefix {
    /// Validates a prefix made of lowercase ASCII letters, digits and underscores.
    ///
    /// The empty prefix is allowed and yields unprefixed table names. PostgreSQL
    /// folds unquoted identifiers to lowercase, so `Auth_` would share the
    /// tables of `auth_` and is rejected.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if value.len() > MAX_TABLE_PREFIX_LENGTH {
            return Err(AppError::Validation(format!(
                "table prefix must be at most {MAX_TABLE_PREFIX_LENGTH} characters, got {}",
                value.len()
            )));
        }

        if value.starts_with(|character: char| character.is_ascii_digit()) {
            return Err(AppError::Validation(format!(
                "table prefix '{value}' must not start with a digit"
            )));
        }

        if let Some(invalid) = value
            .chars()
            .find(|character| !matches!(character, 'a'..='z' | '0'..='9' | '_'))
        {
            return Err(AppError::Validation(format!(
                "table prefix '{value}' contains invalid character '{invalid}'"
            )));
        }

        if let Some(ending) = AMBIGUOUS_PREFIX_ENDINGS
            .iter()
            .find(|ending| value.ends_with(**ending))
        {
            return Err(AppError::Validation(format!(
                "table prefix '{value}' must not end with '{ending}'"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the prefix as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Resolved names of the four authorization tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    prefix: TablePrefix,
    /// Roles table.
    pub roles: String,
    /// Permissions table.
    pub permissions: String,
    /// Role to permission bindings.
    pub role_permissions: String,
    /// User to role bindings.
    pub user_roles: String,
}

impl TableNames {
    /// Derives table names from a validated prefix.
    #[must_use]
    pub fn new(prefix: TablePrefix) -> Self {
        let name = |table: &str| format!("{}{table}", prefix.as_str());

        Self {
            roles: name("roles"),
            permissions: name("permissions"),
            role_permissions: name("role_permissions"),
            user_roles: name("user_roles"),
            prefix,
        }
    }

    /// Returns the prefix the names were derived from.
    #[must_use]
    pub fn prefix(&self) -> &TablePrefix {
        &self.prefix
    }
}

impl TryFrom<&AuthorizationStoreOptions> for TableNames {
    type Error = AppError;

    fn try_from(options: &AuthorizationStoreOptions) -> Result<Self, Self::Error> {
        TablePrefix::new(options.table_prefix.as_str()).map(Self::new)
    }
}
