//! Shared route helpers for page rendering and the admin session guard.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::{Datelike, Utc};
use tower_sessions::Session;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::form::csrf::{generate_csrf_token, verify_csrf_token};
use crate::state::AppState;

/// Session key for the signed-in user.
pub const SESSION_USER: &str = "auth_user";

/// Session key for the one-shot dashboard error message.
const FLASH_KEY: &str = "admin_flash";

/// Shown when a form's CSRF token is missing, used or expired.
pub const EXPIRED_FORM_MESSAGE: &str = "Your form has expired. Please try again.";

/// The signed-in user, if any.
pub async fn current_user(session: &Session) -> Option<AuthUser> {
    session.get(SESSION_USER).await.ok().flatten()
}

/// Require a signed-in user, or redirect to the sign-in page.
pub async fn require_editor(session: &Session) -> Result<AuthUser, Response> {
    current_user(session)
        .await
        .ok_or_else(|| Redirect::to("/admin/login").into_response())
}

/// Consume the submitted CSRF token.
pub async fn csrf_valid(session: &Session, submitted: &str) -> bool {
    match verify_csrf_token(session, submitted).await {
        Ok(valid) => valid,
        Err(e) => {
            tracing::error!(error = %e, "failed to verify CSRF token");
            false
        }
    }
}

/// Issue a CSRF token for a form about to be rendered.
pub async fn issue_csrf(session: &Session) -> Result<String, Response> {
    generate_csrf_token(session).await.map_err(|e| {
        tracing::error!(error = %e, "failed to generate CSRF token");
        AppError::Internal(e).into_response()
    })
}

/// Remember an error to show on the next dashboard load.
pub async fn set_flash(session: &Session, message: &str) {
    if let Err(e) = session.insert(FLASH_KEY, message).await {
        tracing::warn!(error = %e, "failed to store flash message");
    }
}

/// Read and clear the pending flash message.
pub async fn take_flash(session: &Session) -> Option<String> {
    session.remove::<String>(FLASH_KEY).await.ok().flatten()
}

/// Context every page template expects.
pub fn page_context(state: &AppState, page_title: &str) -> tera::Context {
    let site = state.site();
    let mut context = tera::Context::new();
    context.insert("site_name", &site.name);
    context.insert("footer_text", &site.footer_text);
    context.insert("current_year", &Utc::now().year());
    context.insert("page_title", page_title);
    context
}

/// Render a template, mapping failures to a 500 page.
pub fn render(state: &AppState, template: &str, context: &tera::Context) -> Response {
    match state.theme().render(template, context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => AppError::Template(e).into_response(),
    }
}

/// Render a template with a non-200 status.
pub fn render_with_status(
    state: &AppState,
    status: StatusCode,
    template: &str,
    context: &tera::Context,
) -> Response {
    let response = render(state, template, context);
    if response.status().is_success() {
        (status, response).into_response()
    } else {
        response
    }
}
