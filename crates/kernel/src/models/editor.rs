//! Editor account model.

use anyhow::{Context, Result};
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Editor account record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Editor {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub pass: String,
    pub role: String,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub login_at: Option<DateTime<Utc>>,
}

/// Input for creating an editor.
#[derive(Debug, Deserialize)]
pub struct CreateEditor {
    pub email: String,
    pub password: String,
    pub role: String,
}

impl Editor {
    /// Check if this account may sign in.
    pub fn is_active(&self) -> bool {
        self.status == 1
    }

    /// Find an editor by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>> {
        let editor =
            sqlx::query_as::<_, Editor>("SELECT * FROM editors WHERE lower(email) = lower($1)")
                .bind(email)
                .fetch_optional(pool)
                .await
                .context("failed to fetch editor by email")?;

        Ok(editor)
    }

    /// Create a new editor.
    pub async fn create(pool: &PgPool, input: CreateEditor) -> Result<Self> {
        let id = Uuid::now_v7();
        let pass = hash_password(&input.password)?;

        let editor = sqlx::query_as::<_, Editor>(
            r#"
            INSERT INTO editors (id, email, pass, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.email.trim())
        .bind(&pass)
        .bind(&input.role)
        .fetch_one(pool)
        .await
        .context("failed to create editor")?;

        Ok(editor)
    }

    /// Record a successful sign-in.
    pub async fn touch_login(pool: &PgPool, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE editors SET login_at = now() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to update editor login time")?;

        Ok(())
    }

    /// Verify a password against this editor's hash.
    pub fn verify_password(&self, password: &str) -> bool {
        verify_password(&self.pass, password)
    }
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Check a password against a PHC-format hash. Empty or malformed hashes never match.
pub fn verify_password(hash: &str, password: &str) -> bool {
    if hash.is_empty() {
        return false;
    }

    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
