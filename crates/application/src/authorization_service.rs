use std::sync::Arc;

use tracing::{debug, info, warn};

use rolegate_core::{AppError, AppResult, UserId};
use rolegate_domain::{PermissionName, RoleName};

use crate::AuthorizationRepository;

mod checks;
mod permissions;
mod roles;

#[cfg(test)]
mod tests;

/// Application service exposing role and permission administration and checks.
///
/// The service is cheap to clone and is meant to be constructed once and
/// handed to every component that needs authorization decisions.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }
}

fn into_names<T: Into<String>>(names: Vec<T>) -> Vec<String> {
    names.into_iter().map(Into::into).collect()
}
