use clap::{Parser, Subcommand};
use rolegate_application::AuthorizationService;
use rolegate_core::{AppError, AppResult, UserId};
use serde_json::json;

#[derive(Debug, Parser)]
#[command(
    name = "rolegate-admin",
    version,
    about = "Administer Rolegate roles, permissions and user assignments"
)]
pub struct Cli {
    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create the authorization tables if they are missing.
    Migrate,
    /// Create a role. Existing roles are left untouched.
    CreateRole { role: String },
    /// Create a permission. Existing permissions are left untouched.
    CreatePermission { permission: String },
    /// Grant permissions to a role.
    AssignPermissions {
        role: String,
        #[arg(required = true)]
        permissions: Vec<String>,
    },
    /// Assign a role to a user.
    AssignRole {
        #[arg(allow_negative_numbers = true)]
        user_id: UserId,
        role: String,
    },
    /// Check whether a user holds a role.
    CheckRole {
        #[arg(allow_negative_numbers = true)]
        user_id: UserId,
        role: String,
    },
    /// Check whether a user holds a permission through any role.
    CheckPermission {
        #[arg(allow_negative_numbers = true)]
        user_id: UserId,
        permission: String,
    },
    /// Check whether a role grants a permission.
    CheckRolePermission { role: String, permission: String },
    /// Remove a role from a user.
    RevokeRole {
        #[arg(allow_negative_numbers = true)]
        user_id: UserId,
        role: String,
    },
    /// Remove a permission from every role a user holds.
    RevokePermission {
        #[arg(allow_negative_numbers = true)]
        user_id: UserId,
        permission: String,
    },
    /// Remove a permission from a role.
    RevokeRolePermission { role: String, permission: String },
    /// List all roles.
    Roles,
    /// List the roles held by a user.
    UserRoles {
        #[arg(allow_negative_numbers = true)]
        user_id: UserId,
    },
    /// List all permissions.
    Permissions,
    /// Delete a role that no user holds.
    DeleteRole { role: String },
    /// Delete a permission that no role grants.
    DeletePermission { permission: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Done,
    Granted(bool),
    Names(Vec<String>),
}

impl CommandOutput {
    pub fn render(&self, as_json: bool) -> AppResult<String> {
        if as_json {
            let value = match self {
                Self::Done => json!({ "status": "ok" }),
                Self::Granted(granted) => json!({ "granted": granted }),
                Self::Names(names) => json!(names),
            };

            return serde_json::to_string_pretty(&value).map_err(|error| {
                AppError::Internal(format!("failed to serialize output: {error}"))
            });
        }

        Ok(match self {
            Self::Done => "ok".to_owned(),
            Self::Granted(granted) => granted.to_string(),
            Self::Names(names) => names.join("\n"),
        })
    }
}

pub async fn run(service: &AuthorizationService, command: Command) -> AppResult<CommandOutput> {
    let output = match command {
        Command::Migrate => CommandOutput::Done,
        Command::CreateRole { role } => {
            service.create_role(role.as_str()).await?;
            CommandOutput::Done
        }
        Command::CreatePermission { permission } => {
            service.create_permission(permission.as_str()).await?;
            CommandOutput::Done
        }
        Command::AssignPermissions { role, permissions } => {
            service
                .assign_permissions(role.as_str(), permissions.as_slice())
                .await?;
            CommandOutput::Done
        }
        Command::AssignRole { user_id, role } => {
            service.assign_role(user_id, role.as_str()).await?;
            CommandOutput::Done
        }
        Command::CheckRole { user_id, role } => {
            CommandOutput::Granted(service.check_role(user_id, role.as_str()).await?)
        }
        Command::CheckPermission {
            user_id,
            permission,
        } => CommandOutput::Granted(
            service
                .check_permission(user_id, permission.as_str())
                .await?,
        ),
        Command::CheckRolePermission { role, permission } => CommandOutput::Granted(
            service
                .check_role_permission(role.as_str(), permission.as_str())
                .await?,
        ),
        Command::RevokeRole { user_id, role } => {
            service.revoke_role(user_id, role.as_str()).await?;
            CommandOutput::Done
        }
        Command::RevokePermission {
            user_id,
            permission,
        } => {
            service
                .revoke_permission(user_id, permission.as_str())
                .await?;
            CommandOutput::Done
        }
        Command::RevokeRolePermission { role, permission } => {
            service
                .revoke_role_permission(role.as_str(), permission.as_str())
                .await?;
            CommandOutput::Done
        }
        Command::Roles => CommandOutput::Names(service.get_roles().await?),
        Command::UserRoles { user_id } => {
            CommandOutput::Names(service.get_user_roles(user_id).await?)
        }
        Command::Permissions => CommandOutput::Names(service.get_permissions().await?),
        Command::DeleteRole { role } => {
            service.delete_role(role.as_str()).await?;
            CommandOutput::Done
        }
        Command::DeletePermission { permission } => {
            service.delete_permission(permission.as_str()).await?;
            CommandOutput::Done
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clap::Parser;
    use rolegate_application::AuthorizationService;
    use rolegate_core::{AppError, UserId};
    use rolegate_infrastructure::InMemoryAuthorizationRepository;

    use super::{Cli, Command, CommandOutput, run};

    fn parse(args: &[&str]) -> Option<Cli> {
        Cli::try_parse_from(std::iter::once("rolegate-admin").chain(args.iter().copied())).ok()
    }

    #[test]
    fn parses_batch_permission_assignment() {
        let cli = parse(&["assign-permissions", "role-a", "permission-a", "permission-b"]);

        assert!(matches!(
            cli.map(|cli| cli.command),
            Some(Command::AssignPermissions { ref role, ref permissions })
                if role == "role-a" && permissions.len() == 2
        ));
    }

    #[test]
    fn assign_permissions_requires_at_least_one_permission() {
        assert!(parse(&["assign-permissions", "role-a"]).is_none());
    }

    #[test]
    fn parses_user_ids_including_negative_values() {
        let cli = parse(&["--json", "check-role", "-3", "role-a"]);

        assert!(matches!(
            cli,
            Some(Cli {
                json: true,
                command: Command::CheckRole { user_id, .. },
            }) if user_id == UserId::new(-3)
        ));
        assert!(parse(&["check-role", "alice", "role-a"]).is_none());
    }

    #[test]
    fn renders_plain_and_json_output() {
        let names = CommandOutput::Names(vec!["role-a".to_owned(), "role-b".to_owned()]);

        assert_eq!(names.render(false).unwrap_or_default(), "role-a\nrole-b");
        assert_eq!(
            CommandOutput::Granted(true).render(false).unwrap_or_default(),
            "true"
        );
        assert!(
            CommandOutput::Done
                .render(true)
                .unwrap_or_default()
                .contains("\"status\": \"ok\"")
        );
    }

    #[tokio::test]
    async fn commands_drive_the_authorization_service() {
        let service = AuthorizationService::new(Arc::new(InMemoryAuthorizationRepository::new()));
        let commands = [
            Command::CreateRole {
                role: "role-a".to_owned(),
            },
            Command::CreatePermission {
                permission: "permission-a".to_owned(),
            },
            Command::AssignPermissions {
                role: "role-a".to_owned(),
                permissions: vec!["permission-a".to_owned()],
            },
            Command::AssignRole {
                user_id: UserId::new(1),
                role: "role-a".to_owned(),
            },
        ];
        for command in commands {
            assert!(matches!(
                run(&service, command).await,
                Ok(CommandOutput::Done)
            ));
        }

        let granted = run(
            &service,
            Command::CheckPermission {
                user_id: UserId::new(1),
                permission: "permission-a".to_owned(),
            },
        )
        .await;
        assert!(matches!(granted, Ok(CommandOutput::Granted(true))));

        let deleted = run(
            &service,
            Command::DeleteRole {
                role: "role-a".to_owned(),
            },
        )
        .await;
        assert!(matches!(deleted, Err(AppError::RoleInUse(_))));
    }
}
