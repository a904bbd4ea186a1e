//! Editor authentication.
//!
//! An [`AuthProvider`] checks credentials and yields the [`AuthUser`] that is
//! stored in the session. Any signed-in user may manage content; the role is
//! informational.

mod directory;
mod static_accounts;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use directory::EditorDirectory;
pub use static_accounts::StaticAccounts;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            other => Err(AuthError::InvalidRole(other.to_string())),
        }
    }
}

/// Signed-in user, as stored in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Authentication failures other than wrong credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unknown role '{0}'")]
    InvalidRole(String),

    #[error("account lookup failed")]
    Lookup(#[source] anyhow::Error),
}

/// Credential check.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// `Ok(None)` means the credentials were rejected.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthUser>, AuthError>;
}
