//! Section editor pages: create, edit and preview.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

use super::admin::{parse_section_id, section_not_found};
use super::helpers::{
    EXPIRED_FORM_MESSAGE, csrf_valid, issue_csrf, page_context, render_with_status,
    require_editor,
};
use crate::auth::AuthUser;
use crate::content::{
    EditorMode, SectionDraft, SectionEditor, SectionView, StoreError, SubmitError,
};
use crate::state::AppState;

/// Posted editor form. Every field is optional on the wire so that
/// validation, not extraction, reports what is missing.
#[derive(Debug, Default, Deserialize)]
pub struct SectionForm {
    #[serde(default)]
    pub section_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub button_url: String,
    #[serde(default)]
    pub order_index: String,
    /// Checkbox: present when checked.
    #[serde(default)]
    pub is_active: Option<String>,
    /// `save` or `preview`.
    #[serde(default)]
    pub op: Option<String>,
    #[serde(rename = "_token", default)]
    pub csrf_token: String,
}

impl SectionForm {
    fn is_preview(&self) -> bool {
        self.op.as_deref() == Some("preview")
    }

    fn into_draft(self) -> SectionDraft {
        SectionDraft {
            section_name: self.section_name,
            title: self.title,
            subtitle: self.subtitle,
            content: self.content,
            image_url: self.image_url,
            button_text: self.button_text,
            button_url: self.button_url,
            order_index: self.order_index,
            is_active: self.is_active.is_some(),
        }
    }
}

/// What the form page shows besides the draft itself.
#[derive(Default)]
struct FormExtras {
    errors: std::collections::BTreeMap<&'static str, &'static str>,
    error: Option<String>,
    preview: Option<SectionView>,
}

/// Create the editor router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/sections/new", get(new_form).post(new_submit))
        .route("/admin/sections/{id}/edit", get(edit_form).post(edit_submit))
}

/// GET /admin/sections/new
async fn new_form(State(state): State<AppState>, session: Session) -> Response {
    if let Err(redirect) = require_editor(&session).await {
        return redirect;
    }

    state.content().refresh().await;
    let editor = SectionEditor::create(state.content());
    render_form(&state, &session, &editor, StatusCode::OK, FormExtras::default()).await
}

/// POST /admin/sections/new
async fn new_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SectionForm>,
) -> Response {
    let user = match require_editor(&session).await {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };

    handle_submit(&state, &session, &user, EditorMode::Create, form).await
}

/// GET /admin/sections/{id}/edit
async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Response {
    if let Err(redirect) = require_editor(&session).await {
        return redirect;
    }

    state.content().refresh().await;
    let Some(id) = parse_section_id(&id) else {
        return section_not_found(&state);
    };

    match SectionEditor::edit(state.content(), id) {
        Ok(editor) => {
            render_form(&state, &session, &editor, StatusCode::OK, FormExtras::default()).await
        }
        Err(e) => {
            info!(error = %e, "edit requested for missing section");
            section_not_found(&state)
        }
    }
}

/// POST /admin/sections/{id}/edit
async fn edit_submit(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<SectionForm>,
) -> Response {
    let user = match require_editor(&session).await {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };

    let Some(id) = parse_section_id(&id) else {
        return section_not_found(&state);
    };

    handle_submit(&state, &session, &user, EditorMode::Edit(id), form).await
}

async fn handle_submit(
    state: &AppState,
    session: &Session,
    user: &AuthUser,
    mode: EditorMode,
    form: SectionForm,
) -> Response {
    let token_ok = csrf_valid(session, &form.csrf_token).await;
    let preview = form.is_preview();
    let editor = SectionEditor::resume(mode, form.into_draft());

    if !token_ok {
        let extras = FormExtras {
            error: Some(EXPIRED_FORM_MESSAGE.to_string()),
            ..FormExtras::default()
        };
        return render_form(state, session, &editor, StatusCode::FORBIDDEN, extras).await;
    }

    if preview {
        let extras = FormExtras {
            preview: Some(editor.preview()),
            ..FormExtras::default()
        };
        return render_form(state, session, &editor, StatusCode::OK, extras).await;
    }

    match editor.submit(state.content()).await {
        Ok(()) => {
            info!(?mode, user_id = %user.id, "saved section");
            Redirect::to("/admin").into_response()
        }
        Err(SubmitError::Invalid(errors)) => {
            let extras = FormExtras {
                errors: errors.by_field(),
                ..FormExtras::default()
            };
            render_form(state, session, &editor, StatusCode::UNPROCESSABLE_ENTITY, extras).await
        }
        Err(SubmitError::Store(e)) => {
            let status = match e.source {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::SERVICE_UNAVAILABLE,
            };
            let extras = FormExtras {
                error: Some(e.message().to_string()),
                ..FormExtras::default()
            };
            render_form(state, session, &editor, status, extras).await
        }
    }
}

async fn render_form(
    state: &AppState,
    session: &Session,
    editor: &SectionEditor,
    status: StatusCode,
    extras: FormExtras,
) -> Response {
    let csrf_token = match issue_csrf(session).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let (title, action, editing) = match editor.mode() {
        EditorMode::Create => ("New section", "/admin/sections/new".to_string(), false),
        EditorMode::Edit(id) => ("Edit section", format!("/admin/sections/{id}/edit"), true),
    };

    let mut context = page_context(state, title);
    context.insert("draft", editor.draft());
    context.insert("editing", &editing);
    context.insert("form_action", &action);
    context.insert("errors", &extras.errors);
    context.insert("error", &extras.error);
    context.insert("preview", &extras.preview);
    context.insert("csrf_token", &csrf_token);

    render_with_status(state, status, "admin/section-form.html", &context)
}
