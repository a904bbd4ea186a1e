//! Admin sign-in and sign-out.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, warn};

use super::helpers::{
    EXPIRED_FORM_MESSAGE, SESSION_USER, csrf_valid, current_user, issue_csrf, page_context,
    render_with_status,
};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Sign-in form submission.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "_token", default)]
    pub csrf_token: String,
}

/// Sign-out form submission.
#[derive(Debug, Deserialize)]
pub struct LogoutForm {
    #[serde(rename = "_token", default)]
    pub csrf_token: String,
}

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/login", get(login_form).post(login_submit))
        .route("/admin/logout", post(logout))
}

/// GET /admin/login
async fn login_form(State(state): State<AppState>, session: Session) -> Response {
    if current_user(&session).await.is_some() {
        return Redirect::to("/admin").into_response();
    }

    render_login(&state, &session, StatusCode::OK, "", None).await
}

/// POST /admin/login
async fn login_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    if !csrf_valid(&session, &form.csrf_token).await {
        return render_login(
            &state,
            &session,
            StatusCode::FORBIDDEN,
            &form.email,
            Some(EXPIRED_FORM_MESSAGE),
        )
        .await;
    }

    let user = match state.auth().authenticate(&form.email, &form.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("rejected admin sign-in");
            return render_login(
                &state,
                &session,
                StatusCode::UNAUTHORIZED,
                &form.email,
                Some(INVALID_CREDENTIALS),
            )
            .await;
        }
        Err(e) => {
            tracing::error!(error = %e, "sign-in lookup failed");
            return render_login(
                &state,
                &session,
                StatusCode::SERVICE_UNAVAILABLE,
                &form.email,
                Some("Sign-in is temporarily unavailable. Please try again."),
            )
            .await;
        }
    };

    // New session id on privilege change.
    if let Err(e) = session.cycle_id().await {
        warn!(error = %e, "failed to rotate session id");
    }

    if let Err(e) = session.insert(SESSION_USER, &user).await {
        tracing::error!(error = %e, "failed to store signed-in user");
        return render_login(
            &state,
            &session,
            StatusCode::INTERNAL_SERVER_ERROR,
            &form.email,
            Some("Sign-in is temporarily unavailable. Please try again."),
        )
        .await;
    }

    info!(user_id = %user.id, role = %user.role, "editor signed in");
    Redirect::to("/admin").into_response()
}

/// POST /admin/logout
async fn logout(session: Session, Form(form): Form<LogoutForm>) -> Response {
    if !csrf_valid(&session, &form.csrf_token).await {
        return Redirect::to("/admin").into_response();
    }

    let user = current_user(&session).await;
    if let Err(e) = session.delete().await {
        tracing::error!(error = %e, "failed to delete session");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    if let Some(user) = user {
        info!(user_id = %user.id, "editor signed out");
    }
    Redirect::to("/admin/login").into_response()
}

async fn render_login(
    state: &AppState,
    session: &Session,
    status: StatusCode,
    email: &str,
    error: Option<&str>,
) -> Response {
    let csrf_token = match issue_csrf(session).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let mut context = page_context(state, "Sign in");
    context.insert("csrf_token", &csrf_token);
    context.insert("email", email);
    context.insert("error", &error);

    render_with_status(state, status, "admin/login.html", &context)
}
