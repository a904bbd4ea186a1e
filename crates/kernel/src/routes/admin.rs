//! Admin dashboard: section list, visibility toggle and deletion.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;
use uuid::Uuid;

use super::helpers::{
    EXPIRED_FORM_MESSAGE, csrf_valid, issue_csrf, page_context, render, render_with_status,
    require_editor, set_flash, take_flash,
};
use crate::models::SectionPatch;
use crate::state::AppState;

const SECTION_GONE: &str = "The section no longer exists. Reload the list and try again.";

/// Form carrying only a CSRF token.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    #[serde(rename = "_token", default)]
    pub csrf_token: String,
}

/// Create the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/sections/{id}/toggle", post(toggle_section))
        .route(
            "/admin/sections/{id}/delete",
            get(confirm_delete).post(delete_section),
        )
}

/// Parse a section id from the path. Malformed ids are treated as missing.
pub(crate) fn parse_section_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

/// The "section not found" admin page.
pub(crate) fn section_not_found(state: &AppState) -> Response {
    let context = page_context(state, "Section not found");
    render_with_status(state, StatusCode::NOT_FOUND, "admin/not-found.html", &context)
}

/// GET /admin
async fn dashboard(State(state): State<AppState>, session: Session) -> Response {
    let user = match require_editor(&session).await {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };

    let reachable = state.content().refresh().await;
    let sections = state.content().collection();

    let mut error = take_flash(&session).await;
    if !reachable && error.is_none() {
        error = Some("Could not load the latest content. Showing the last known list.".to_string());
    }

    let csrf_token = match issue_csrf(&session).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let mut context = page_context(&state, "Content sections");
    context.insert("user", &user);
    context.insert("sections", sections.as_slice());
    context.insert("section_count", &sections.len());
    context.insert("error", &error);
    context.insert("csrf_token", &csrf_token);

    render(&state, "admin/dashboard.html", &context)
}

/// POST /admin/sections/{id}/toggle
///
/// Flips `is_active` on one section.
async fn toggle_section(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<TokenForm>,
) -> Response {
    let user = match require_editor(&session).await {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };

    if !csrf_valid(&session, &form.csrf_token).await {
        set_flash(&session, EXPIRED_FORM_MESSAGE).await;
        return Redirect::to("/admin").into_response();
    }

    let Some(section) = parse_section_id(&id).and_then(|id| state.content().find(id)) else {
        set_flash(&session, SECTION_GONE).await;
        return Redirect::to("/admin").into_response();
    };

    let visible = !section.is_active;
    match state
        .content()
        .update(section.id, SectionPatch::visibility(visible))
        .await
    {
        Ok(()) => info!(section_id = %section.id, visible, user_id = %user.id, "toggled section"),
        Err(e) => set_flash(&session, e.message()).await,
    }

    Redirect::to("/admin").into_response()
}

/// GET /admin/sections/{id}/delete
///
/// Confirmation page; nothing is deleted until it is submitted.
async fn confirm_delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Response {
    if let Err(redirect) = require_editor(&session).await {
        return redirect;
    }

    state.content().refresh().await;
    let Some(section) = parse_section_id(&id).and_then(|id| state.content().find(id)) else {
        return section_not_found(&state);
    };

    let csrf_token = match issue_csrf(&session).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let mut context = page_context(&state, "Delete section");
    context.insert("section", &section);
    context.insert("csrf_token", &csrf_token);

    render(&state, "admin/delete-confirm.html", &context)
}

/// POST /admin/sections/{id}/delete
async fn delete_section(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<TokenForm>,
) -> Response {
    let user = match require_editor(&session).await {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };

    if !csrf_valid(&session, &form.csrf_token).await {
        set_flash(&session, EXPIRED_FORM_MESSAGE).await;
        return Redirect::to("/admin").into_response();
    }

    let Some(id) = parse_section_id(&id) else {
        set_flash(&session, SECTION_GONE).await;
        return Redirect::to("/admin").into_response();
    };

    match state.content().delete(id).await {
        Ok(()) => info!(section_id = %id, user_id = %user.id, "deleted section"),
        Err(e) => set_flash(&session, e.message()).await,
    }

    Redirect::to("/admin").into_response()
}
