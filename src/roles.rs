//! Roles, the permission table, and credential checks.
//!
//! Every account carries one [`Role`]. A role maps to a fixed
//! [`RolePermissions`] entry: which access levels it may view, edit, or
//! delete, and whether it may upload or manage users. Tribe roles see their
//! own level plus public material; admins see everything; guests read public
//! material only.
//!
//! [`UserDirectory`] checks a username and password against SHA-256 digests
//! taken from the `[[users]]` config entries and yields a [`Session`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::UserConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Tribe1,
    Tribe2,
    Tribe3,
    Guest,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Tribe1,
        Role::Tribe2,
        Role::Tribe3,
        Role::Guest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Tribe1 => "tribe1",
            Role::Tribe2 => "tribe2",
            Role::Tribe3 => "tribe3",
            Role::Guest => "guest",
        }
    }

    pub fn permissions(self) -> RolePermissions {
        use AccessLevel::{Public, Tribe1, Tribe2, Tribe3};

        let tribe = |level: &'static [AccessLevel], own: &'static [AccessLevel], description| {
            RolePermissions {
                view: Grant::Levels(level),
                edit: Grant::Levels(own),
                delete: Grant::Levels(own),
                upload: true,
                manage_users: false,
                description,
            }
        };

        match self {
            Role::Admin => RolePermissions {
                view: Grant::All,
                edit: Grant::All,
                delete: Grant::All,
                upload: true,
                manage_users: true,
                description: "Full system access",
            },
            Role::Tribe1 => tribe(&[Tribe1, Public], &[Tribe1], "Tribe 1 community access"),
            Role::Tribe2 => tribe(&[Tribe2, Public], &[Tribe2], "Tribe 2 community access"),
            Role::Tribe3 => tribe(&[Tribe3, Public], &[Tribe3], "Tribe 3 community access"),
            Role::Guest => RolePermissions {
                view: Grant::Levels(&[Public]),
                edit: Grant::Levels(&[]),
                delete: Grant::Levels(&[]),
                upload: false,
                manage_users: false,
                description: "Public read-only access",
            },
        }
    }

    /// Whether this role may perform `action`, optionally on material at
    /// `level`. Without a level, view/edit/delete ask whether the role may
    /// do that to anything at all.
    pub fn has_permission(self, action: Action, level: Option<AccessLevel>) -> bool {
        let perms = self.permissions();
        let grant = match action {
            Action::Upload => return perms.upload,
            Action::ManageUsers => return perms.manage_users,
            Action::View => perms.view,
            Action::Edit => perms.edit,
            Action::Delete => perms.delete,
        };
        match level {
            Some(level) => grant.covers(level),
            None => !grant.is_empty(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Visibility level of a piece of material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum AccessLevel {
    Public,
    Tribe1,
    Tribe2,
    Tribe3,
}

/// Which access levels a permission reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    All,
    Levels(&'static [AccessLevel]),
}

impl Grant {
    pub fn covers(self, level: AccessLevel) -> bool {
        match self {
            Grant::All => true,
            Grant::Levels(levels) => levels.contains(&level),
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Grant::Levels(levels) if levels.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePermissions {
    pub view: Grant,
    pub edit: Grant,
    pub delete: Grant,
    pub upload: bool,
    pub manage_users: bool,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Action {
    Upload,
    View,
    Edit,
    Delete,
    ManageUsers,
}

/// A logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_guest(&self) -> bool {
        self.role == Role::Guest
    }

    pub fn permissions(&self) -> RolePermissions {
        self.role.permissions()
    }
}

/// Permission check for a possibly logged-out caller. No session, no access.
pub fn has_permission(session: Option<&Session>, action: Action, level: Option<AccessLevel>) -> bool {
    session.is_some_and(|s| s.role.has_permission(action, level))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Invalid username")]
    UnknownUser,
    #[error("Invalid password")]
    WrongPassword,
}

#[derive(Debug, Clone)]
struct Account {
    role: Role,
    password_sha256: String,
}

/// Accounts known to this deployment.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    accounts: HashMap<String, Account>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(users: &[UserConfig]) -> Self {
        let mut directory = Self::new();
        for user in users {
            directory.accounts.insert(
                user.name.clone(),
                Account {
                    role: user.role,
                    password_sha256: user.password_sha256.to_ascii_lowercase(),
                },
            );
        }
        directory
    }

    /// Add an account from a plain password.
    pub fn with_user(mut self, name: &str, password: &str, role: Role) -> Self {
        self.accounts.insert(
            name.to_string(),
            Account {
                role,
                password_sha256: password_digest(password),
            },
        );
        self
    }

    pub fn login(&self, username: &str, password: &str) -> Result<Session, LoginError> {
        let account = self.accounts.get(username).ok_or(LoginError::UnknownUser)?;
        if account.password_sha256 != password_digest(password) {
            tracing::warn!(user = %username, "rejected login");
            return Err(LoginError::WrongPassword);
        }
        tracing::info!(user = %username, role = %account.role, "logged in");
        Ok(Session {
            username: username.to_string(),
            role: account.role,
        })
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Lowercase hex SHA-256 of `password`, the form stored in `[[users]]`.
pub fn password_digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// CLI entry point for `vault can`.
pub fn run_can(role: Role, action: Action, level: Option<AccessLevel>) -> anyhow::Result<()> {
    let allowed = role.has_permission(action, level);
    println!("{}", if allowed { "allowed" } else { "denied" });
    println!("{}: {}", role, role.permissions().description);
    Ok(())
}

/// CLI entry point for `vault login`. The password is read from stdin.
pub fn run_login(users: &[UserConfig], username: &str) -> anyhow::Result<()> {
    let mut password = String::new();
    std::io::stdin().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);

    let session = UserDirectory::from_config(users).login(username, password)?;
    println!(
        "{} ({}: {})",
        session.username,
        session.role,
        session.permissions().description
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> UserDirectory {
        UserDirectory::new()
            .with_user("admin", "seedvault", Role::Admin)
            .with_user("guest", "guest123", Role::Guest)
            .with_user("tribe1", "tribe1pass", Role::Tribe1)
    }

    #[test]
    fn valid_credentials_log_in_with_role() {
        let session = directory().login("admin", "seedvault").unwrap();
        assert_eq!(session.username, "admin");
        assert!(session.is_admin());
        assert!(!session.is_guest());

        let session = directory().login("guest", "guest123").unwrap();
        assert!(session.is_guest());
        assert_eq!(session.permissions().description, "Public read-only access");
    }

    #[test]
    fn bad_credentials_are_told_apart() {
        assert_eq!(
            directory().login("nobody", "seedvault").unwrap_err(),
            LoginError::UnknownUser
        );
        assert_eq!(
            directory().login("admin", "wrong").unwrap_err(),
            LoginError::WrongPassword
        );
        assert_eq!(directory().login("", "seedvault").unwrap_err().to_string(), "Invalid username");
        assert_eq!(directory().login("admin", "").unwrap_err().to_string(), "Invalid password");
    }

    #[test]
    fn admin_may_do_everything() {
        for action in [Action::Upload, Action::View, Action::Edit, Action::Delete, Action::ManageUsers] {
            assert!(Role::Admin.has_permission(action, None), "{action:?}");
        }
        assert!(Role::Admin.has_permission(Action::Edit, Some(AccessLevel::Tribe3)));
    }

    #[test]
    fn guest_reads_public_only() {
        assert!(Role::Guest.has_permission(Action::View, None));
        assert!(Role::Guest.has_permission(Action::View, Some(AccessLevel::Public)));
        assert!(!Role::Guest.has_permission(Action::View, Some(AccessLevel::Tribe1)));
        assert!(!Role::Guest.has_permission(Action::Edit, None));
        assert!(!Role::Guest.has_permission(Action::Delete, Some(AccessLevel::Public)));
        assert!(!Role::Guest.has_permission(Action::Upload, None));
        assert!(!Role::Guest.has_permission(Action::ManageUsers, None));
    }

    #[test]
    fn tribes_are_confined_to_their_own_level() {
        let tribe = Role::Tribe2;
        assert!(tribe.has_permission(Action::Upload, None));
        assert!(tribe.has_permission(Action::View, Some(AccessLevel::Public)));
        assert!(tribe.has_permission(Action::View, Some(AccessLevel::Tribe2)));
        assert!(!tribe.has_permission(Action::View, Some(AccessLevel::Tribe1)));
        assert!(tribe.has_permission(Action::Edit, Some(AccessLevel::Tribe2)));
        assert!(!tribe.has_permission(Action::Edit, Some(AccessLevel::Public)));
        assert!(!tribe.has_permission(Action::ManageUsers, None));
    }

    #[test]
    fn logged_out_caller_has_no_permissions() {
        assert!(!has_permission(None, Action::View, None));
        let session = directory().login("tribe1", "tribe1pass").unwrap();
        assert!(has_permission(Some(&session), Action::View, Some(AccessLevel::Tribe1)));
    }

    #[test]
    fn roles_parse_from_their_names() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn configured_digest_matches_plain_password() {
        let users = vec![UserConfig {
            name: "tribe3".to_string(),
            role: Role::Tribe3,
            password_sha256: password_digest("tribe3pass").to_uppercase(),
        }];
        let session = UserDirectory::from_config(&users).login("tribe3", "tribe3pass").unwrap();
        assert_eq!(session.role, Role::Tribe3);
    }
}
