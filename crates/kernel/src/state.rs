//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::{AuthProvider, EditorDirectory, Role, StaticAccounts};
use crate::config::{Config, StoreBackend};
use crate::content::{
    ContentController, ContentRepository, MemoryContentRepository, PgContentRepository,
};
use crate::db;
use crate::theme::ThemeEngine;

/// Site-wide text shown on every page.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub name: String,
    pub footer_text: Option<String>,
}

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// The single content controller for this process.
    content: ContentController,

    /// Credential check for the admin panel.
    auth: Arc<dyn AuthProvider>,

    theme: Arc<ThemeEngine>,

    site: SiteSettings,

    /// PostgreSQL pool, when the postgres backend is in use.
    db: Option<PgPool>,
}

impl AppState {
    /// Build state from configuration, connecting to the configured store.
    pub async fn new(config: &Config) -> Result<Self> {
        let theme = match &config.templates_dir {
            Some(dir) => {
                info!(?dir, "loading templates from directory");
                ThemeEngine::new(dir)?
            }
            None => ThemeEngine::builtin()?,
        };

        let site = SiteSettings {
            name: config.site_name.clone(),
            footer_text: config.footer_text.clone(),
        };

        let (repo, auth, db): (Arc<dyn ContentRepository>, Arc<dyn AuthProvider>, _) =
            match config.store_backend {
                StoreBackend::Postgres => {
                    let url = config
                        .database_url
                        .as_deref()
                        .context("DATABASE_URL is required for the postgres backend")?;
                    let pool = db::create_pool(url, config.database_max_connections).await?;
                    db::run_migrations(&pool).await?;
                    info!("PostgreSQL content store ready");

                    let repo: Arc<dyn ContentRepository> =
                        Arc::new(PgContentRepository::new(pool.clone()));
                    let auth: Arc<dyn AuthProvider> = Arc::new(EditorDirectory::new(pool.clone()));
                    (repo, auth, Some(pool))
                }
                StoreBackend::Memory => {
                    warn!("using in-memory content store; content is lost on restart");

                    let repo: Arc<dyn ContentRepository> =
                        Arc::new(MemoryContentRepository::new());
                    let auth: Arc<dyn AuthProvider> = Arc::new(static_accounts(config)?);
                    (repo, auth, None)
                }
            };

        Ok(Self::from_parts(
            ContentController::new(repo),
            auth,
            Arc::new(theme),
            site,
            db,
        ))
    }

    /// Assemble state from already-built services.
    pub fn from_parts(
        content: ContentController,
        auth: Arc<dyn AuthProvider>,
        theme: Arc<ThemeEngine>,
        site: SiteSettings,
        db: Option<PgPool>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                content,
                auth,
                theme,
                site,
                db,
            }),
        }
    }

    /// Get the content controller.
    pub fn content(&self) -> &ContentController {
        &self.inner.content
    }

    /// Get the auth provider.
    pub fn auth(&self) -> &Arc<dyn AuthProvider> {
        &self.inner.auth
    }

    /// Get the theme engine.
    pub fn theme(&self) -> &Arc<ThemeEngine> {
        &self.inner.theme
    }

    pub fn site(&self) -> &SiteSettings {
        &self.inner.site
    }

    /// Check if the database connection is healthy. `None` without a database.
    pub async fn postgres_healthy(&self) -> Option<bool> {
        match &self.inner.db {
            Some(pool) => Some(db::check_health(pool).await),
            None => None,
        }
    }
}

/// Accounts for the memory backend, from `ADMIN_EMAIL` and `ADMIN_PASSWORD_HASH`.
fn static_accounts(config: &Config) -> Result<StaticAccounts> {
    let accounts = StaticAccounts::new();

    match (&config.admin_email, &config.admin_password_hash) {
        (Some(email), Some(hash)) => {
            let role: Role = config.admin_role.parse()?;
            info!(%email, %role, "configured admin account");
            Ok(accounts.with_account(email, hash, role))
        }
        _ => {
            warn!("ADMIN_EMAIL/ADMIN_PASSWORD_HASH not set; admin sign-in is disabled");
            Ok(accounts)
        }
    }
}
