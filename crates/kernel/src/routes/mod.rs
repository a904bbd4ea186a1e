//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod editor;
pub mod front;
pub mod health;
mod helpers;

use axum::Router;
use axum::response::Redirect;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;

pub use helpers::SESSION_USER;

/// Build the application: public site, admin panel and health check.
///
/// Unknown paths redirect to the public site.
pub fn app<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .merge(front::router())
        .merge(auth::router())
        .merge(admin::router())
        .merge(editor::router())
        .merge(health::router())
        .fallback(fallback)
        // TraceLayer → session → routes
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback() -> Redirect {
    Redirect::to("/")
}
