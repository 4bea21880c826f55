//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod names;
mod security;

pub use names::{MAX_NAME_LENGTH, PermissionName, RoleName};
pub use security::{Permission, PermissionId, Role, RoleId, RolePermission, UserRole};
