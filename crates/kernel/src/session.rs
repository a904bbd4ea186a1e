//! Session layers: Redis when configured, in-process otherwise.

use anyhow::{Context, Result};
use fred::prelude::*;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};
use tower_sessions_redis_store::RedisStore;

/// Default session expiry (24 hours of inactivity).
pub const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 24;

/// Cookie attributes applied to every session layer.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub same_site: SameSite,
    pub secure: bool,
}

impl CookiePolicy {
    /// Parse a SameSite name; anything unrecognized is strict.
    pub fn new(same_site: &str, secure: bool) -> Self {
        let same_site = match same_site {
            "lax" => SameSite::Lax,
            "none" => SameSite::None,
            _ => SameSite::Strict,
        };
        Self { same_site, secure }
    }
}

fn configure<S: SessionStore + Clone>(store: S, policy: CookiePolicy) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_secure(policy.secure)
        .with_http_only(true)
        .with_same_site(policy.same_site)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            DEFAULT_SESSION_EXPIRY_HOURS,
        )))
}

/// Sessions held in process memory. Lost on restart.
pub fn memory_layer(policy: CookiePolicy) -> SessionManagerLayer<MemoryStore> {
    configure(MemoryStore::default(), policy)
}

/// Sessions stored in Redis.
pub async fn redis_layer(
    redis_url: &str,
    policy: CookiePolicy,
) -> Result<SessionManagerLayer<RedisStore<Pool>>> {
    let config = Config::from_url(redis_url).context("failed to parse Redis URL")?;

    let pool = Builder::from_config(config)
        .build_pool(1)
        .context("failed to create Redis pool")?;

    pool.init()
        .await
        .context("failed to connect to Redis for sessions")?;

    Ok(configure(RedisStore::new(pool), policy))
}
