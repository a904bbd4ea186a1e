//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Where content sections are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Content store backend (default: postgres).
    pub store_backend: StoreBackend,

    /// PostgreSQL connection URL. Required for the postgres backend.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Redis connection URL for sessions. In-memory sessions when unset.
    pub redis_url: Option<String>,

    /// Cookie SameSite policy: "strict", "lax", or "none" (default: "strict").
    pub cookie_same_site: String,

    /// Send the session cookie over HTTPS only (default: true).
    pub cookie_secure: bool,

    /// Template directory overriding the built-in theme.
    pub templates_dir: Option<PathBuf>,

    /// Site name shown in titles and the footer (default: "Vitrina").
    pub site_name: String,

    /// Footer line replacing the default copyright notice.
    pub footer_text: Option<String>,

    /// Configured account: email.
    pub admin_email: Option<String>,

    /// Configured account: Argon2 PHC hash.
    pub admin_password_hash: Option<String>,

    /// Configured account: role (default: "admin").
    pub admin_role: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = non_empty("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let store_backend = match non_empty("STORE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        };

        let database_url = non_empty("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL environment variable is required for the postgres backend");
        }

        let database_max_connections = non_empty("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let redis_url = non_empty("REDIS_URL");

        let cookie_same_site = non_empty("COOKIE_SAME_SITE")
            .unwrap_or_else(|| "strict".to_string())
            .to_lowercase();

        let cookie_secure = match non_empty("COOKIE_SECURE") {
            None => true,
            Some(v) => v
                .parse()
                .context("COOKIE_SECURE must be 'true' or 'false'")?,
        };

        let templates_dir = non_empty("TEMPLATES_DIR").map(PathBuf::from);

        let site_name = non_empty("SITE_NAME").unwrap_or_else(|| "Vitrina".to_string());
        let footer_text = non_empty("FOOTER_TEXT");

        let admin_email = non_empty("ADMIN_EMAIL");
        let admin_password_hash = non_empty("ADMIN_PASSWORD_HASH");
        let admin_role = non_empty("ADMIN_ROLE").unwrap_or_else(|| "admin".to_string());

        Ok(Self {
            port,
            store_backend,
            database_url,
            database_max_connections,
            redis_url,
            cookie_same_site,
            cookie_secure,
            templates_dir,
            site_name,
            footer_text,
            admin_email,
            admin_password_hash,
            admin_role,
        })
    }
}
