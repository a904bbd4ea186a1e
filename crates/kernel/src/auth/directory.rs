//! PostgreSQL-backed editor accounts.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, warn};

use super::{AuthError, AuthProvider, AuthUser, Role};
use crate::models::Editor;

/// Accounts stored in the `editors` table.
#[derive(Clone)]
pub struct EditorDirectory {
    pool: PgPool,
}

impl EditorDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthProvider for EditorDirectory {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthUser>, AuthError> {
        let Some(editor) = Editor::find_by_email(&self.pool, email)
            .await
            .map_err(AuthError::Lookup)?
        else {
            return Ok(None);
        };

        if !editor.is_active() || !editor.verify_password(password) {
            return Ok(None);
        }

        let role = editor.role.parse::<Role>()?;

        if let Err(e) = Editor::touch_login(&self.pool, editor.id).await {
            warn!(error = %e, editor_id = %editor.id, "failed to update login timestamp");
        }

        info!(editor_id = %editor.id, "editor authenticated");
        Ok(Some(AuthUser {
            id: editor.id,
            email: editor.email,
            role,
        }))
    }
}
