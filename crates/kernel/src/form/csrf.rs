//! CSRF tokens for admin forms.
//!
//! Tokens live in the session, are single-use and expire after an hour.

use anyhow::{Context, Result};
use chrono::Utc;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tower_sessions::Session;

/// Session key for issued tokens.
const CSRF_SESSION_KEY: &str = "csrf_tokens";

/// Maximum number of outstanding tokens per session.
const MAX_TOKENS: usize = 10;

/// Token validity period in seconds.
const TOKEN_VALIDITY_SECS: i64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IssuedToken {
    token: String,
    issued_at: i64,
}

impl IssuedToken {
    fn is_fresh(&self, now: i64) -> bool {
        now - self.issued_at <= TOKEN_VALIDITY_SECS
    }
}

async fn load(session: &Session) -> Vec<IssuedToken> {
    session
        .get(CSRF_SESSION_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

async fn store(session: &Session, tokens: Vec<IssuedToken>) -> Result<()> {
    session
        .insert(CSRF_SESSION_KEY, tokens)
        .await
        .context("failed to store CSRF tokens")
}

/// Issue a new token and remember it in the session.
pub async fn generate_csrf_token(session: &Session) -> Result<String> {
    let mut random_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut random_bytes);
    let issued_at = Utc::now().timestamp();

    let mut hasher = Sha256::new();
    hasher.update(random_bytes);
    hasher.update(issued_at.to_le_bytes());
    let token = hex::encode(hasher.finalize());

    let mut tokens = load(session).await;
    tokens.push(IssuedToken {
        token: token.clone(),
        issued_at,
    });
    if tokens.len() > MAX_TOKENS {
        tokens.drain(..tokens.len() - MAX_TOKENS);
    }
    store(session, tokens).await?;

    Ok(token)
}

/// Consume a submitted token. Returns `false` for unknown, expired or empty tokens.
pub async fn verify_csrf_token(session: &Session, submitted: &str) -> Result<bool> {
    if submitted.is_empty() {
        return Ok(false);
    }

    let mut tokens = load(session).await;
    let now = Utc::now().timestamp();

    let Some(index) = tokens
        .iter()
        .position(|t| t.token == submitted && t.is_fresh(now))
    else {
        return Ok(false);
    };

    tokens.remove(index);
    tokens.retain(|t| t.is_fresh(now));
    store(session, tokens).await?;

    Ok(true)
}
