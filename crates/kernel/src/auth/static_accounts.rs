//! Accounts supplied by configuration.

use async_trait::async_trait;
use uuid::Uuid;

use super::{AuthError, AuthProvider, AuthUser, Role};
use crate::models::editor::verify_password;

struct StaticAccount {
    user: AuthUser,
    password_hash: String,
}

/// Fixed set of accounts with Argon2 password hashes.
#[derive(Default)]
pub struct StaticAccounts {
    accounts: Vec<StaticAccount>,
}

impl StaticAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account. `password_hash` must be a PHC-format Argon2 hash.
    pub fn with_account(mut self, email: &str, password_hash: &str, role: Role) -> Self {
        self.accounts.push(StaticAccount {
            user: AuthUser {
                id: Uuid::now_v7(),
                email: email.trim().to_string(),
                role,
            },
            password_hash: password_hash.to_string(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl AuthProvider for StaticAccounts {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthUser>, AuthError> {
        let email = email.trim();
        let matched = self
            .accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email))
            .filter(|a| verify_password(&a.password_hash, password))
            .map(|a| a.user.clone());

        Ok(matched)
    }
}
