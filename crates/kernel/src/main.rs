//! Vitrina server.

use std::net::SocketAddr;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use vitrina_kernel::auth::Role;
use vitrina_kernel::config::Config;
use vitrina_kernel::db;
use vitrina_kernel::models::editor::hash_password;
use vitrina_kernel::models::{CreateEditor, Editor};
use vitrina_kernel::routes;
use vitrina_kernel::session::{self, CookiePolicy};
use vitrina_kernel::state::AppState;

/// Environment variable holding the password for `editor-add`.
const EDITOR_PASSWORD_ENV: &str = "VITRINA_EDITOR_PASSWORD";

#[derive(Parser)]
#[command(name = "vitrina", version, about = "Content-managed marketing site")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create an editor account in PostgreSQL.
    EditorAdd {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "editor")]
        role: String,
    },
    /// Print an Argon2 hash of the password in VITRINA_EDITOR_PASSWORD.
    HashPassword,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::EditorAdd { email, role } => add_editor(email, role).await,
        Command::HashPassword => {
            let password = editor_password()?;
            println!("{}", hash_password(&password)?);
            Ok(())
        }
    }
}

async fn serve() -> Result<()> {
    info!("Starting Vitrina");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(port = config.port, backend = ?config.store_backend, "Configuration loaded");

    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    if !state.content().refresh().await {
        tracing::warn!("content store did not answer at startup");
    }
    info!(
        sections = state.content().collection().len(),
        "Content sections loaded"
    );

    let policy = CookiePolicy::new(&config.cookie_same_site, config.cookie_secure);
    let app = match &config.redis_url {
        Some(url) => {
            let layer = session::redis_layer(url, policy)
                .await
                .context("failed to create session layer")?;
            info!("Using Redis sessions");
            routes::app(state, layer)
        }
        None => {
            info!("Using in-memory sessions");
            routes::app(state, session::memory_layer(policy))
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

async fn add_editor(email: String, role: String) -> Result<()> {
    let role: Role = role.parse()?;
    let email = email.trim().to_string();
    if !email.contains('@') {
        bail!("'{email}' is not an email address");
    }
    let password = editor_password()?;

    let url = std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;
    let pool = db::create_pool(&url, 1).await?;
    db::run_migrations(&pool).await?;

    let editor = Editor::create(
        &pool,
        CreateEditor {
            email,
            password,
            role: role.as_str().to_string(),
        },
    )
    .await?;

    info!(editor_id = %editor.id, email = %editor.email, %role, "editor created");
    Ok(())
}

fn editor_password() -> Result<String> {
    let password = std::env::var(EDITOR_PASSWORD_ENV)
        .with_context(|| format!("{EDITOR_PASSWORD_ENV} must hold the new password"))?;
    if password.len() < 8 {
        bail!("{EDITOR_PASSWORD_ENV} must be at least 8 characters");
    }
    Ok(password)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
