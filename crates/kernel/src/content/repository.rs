//! Content repository client.
//!
//! Every read and write against the `content_sections` collection goes
//! through [`ContentRepository`]. Each call is a single attempt; failures
//! are returned to the caller and never retried here.

use async_trait::async_trait;
use sea_query::{Expr, ExprTrait, Iden, PostgresQueryBuilder, Query, UpdateStatement};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ContentSection, NewSection, SectionPatch};

/// Failure reported by the content store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (transport or permission failure).
    #[error("content store unavailable: {0}")]
    Unavailable(String),

    /// No section with the given id exists.
    #[error("content section {0} not found")]
    NotFound(Uuid),

    /// The store rejected or failed the query.
    #[error("content store query failed")]
    Query(#[from] sqlx::Error),
}

/// Read/write access to the content section collection.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// All sections, ascending by `order_index`.
    async fn list(&self) -> Result<Vec<ContentSection>, StoreError>;

    /// Insert a section. The store assigns `id`, `created_at` and `updated_at`.
    async fn create(&self, input: NewSection) -> Result<(), StoreError>;

    /// Apply a partial update and refresh `updated_at`.
    async fn update(&self, id: Uuid, patch: SectionPatch) -> Result<(), StoreError>;

    /// Remove a section.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Whether the store currently answers requests.
    async fn ping(&self) -> bool;
}

#[derive(Iden)]
enum ContentSections {
    Table,
    Id,
    SectionName,
    Title,
    Subtitle,
    Content,
    ImageUrl,
    ButtonText,
    ButtonUrl,
    OrderIndex,
    IsActive,
    UpdatedAt,
}

const SELECT_SECTIONS: &str = "SELECT id, section_name, title, subtitle, content, image_url, \
     button_text, button_url, order_index, is_active, created_at, updated_at \
     FROM content_sections ORDER BY order_index ASC, created_at ASC, id ASC";

/// PostgreSQL-backed repository.
#[derive(Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    /// Create a repository over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn list(&self) -> Result<Vec<ContentSection>, StoreError> {
        let sections = sqlx::query_as::<_, ContentSection>(SELECT_SECTIONS)
            .fetch_all(&self.pool)
            .await?;

        Ok(sections)
    }

    async fn create(&self, input: NewSection) -> Result<(), StoreError> {
        let id = Uuid::now_v7();

        sqlx::query(
            r#"
            INSERT INTO content_sections
                (id, section_name, title, subtitle, content, image_url,
                 button_text, button_url, order_index, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now(), now())
            "#,
        )
        .bind(id)
        .bind(&input.section_name)
        .bind(&input.title)
        .bind(&input.subtitle)
        .bind(&input.content)
        .bind(&input.image_url)
        .bind(&input.button_text)
        .bind(&input.button_url)
        .bind(input.order_index)
        .bind(input.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: Uuid, patch: SectionPatch) -> Result<(), StoreError> {
        let sql = build_update(id, &patch).to_string(PostgresQueryBuilder);

        let result = sqlx::query(&sql).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM content_sections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    async fn ping(&self) -> bool {
        crate::db::check_health(&self.pool).await
    }
}

/// Build the partial UPDATE for a patch.
///
/// Only columns present in the patch are written; `updated_at` is always
/// refreshed so an empty patch still counts as a write.
fn build_update(id: Uuid, patch: &SectionPatch) -> UpdateStatement {
    let mut query = Query::update();
    query.table(ContentSections::Table);

    if let Some(v) = &patch.section_name {
        query.value(ContentSections::SectionName, v.clone());
    }
    if let Some(v) = &patch.title {
        query.value(ContentSections::Title, v.clone());
    }
    if let Some(v) = &patch.subtitle {
        query.value(ContentSections::Subtitle, v.clone());
    }
    if let Some(v) = &patch.content {
        query.value(ContentSections::Content, v.clone());
    }
    if let Some(v) = &patch.image_url {
        query.value(ContentSections::ImageUrl, v.clone());
    }
    if let Some(v) = &patch.button_text {
        query.value(ContentSections::ButtonText, v.clone());
    }
    if let Some(v) = &patch.button_url {
        query.value(ContentSections::ButtonUrl, v.clone());
    }
    if let Some(v) = patch.order_index {
        query.value(ContentSections::OrderIndex, v);
    }
    if let Some(v) = patch.is_active {
        query.value(ContentSections::IsActive, v);
    }

    query.value(ContentSections::UpdatedAt, Expr::cust("now()"));
    query.and_where(Expr::col(ContentSections::Id).eq(id));

    query
}
