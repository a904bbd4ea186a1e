//! In-process content repository.
//!
//! Mirrors the PostgreSQL repository's semantics (store-assigned ids and
//! timestamps, order_index-ascending listing, NotFound on missing ids) so the
//! server can run without a database and tests can exercise the full stack.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::repository::{ContentRepository, StoreError};
use crate::models::{ContentSection, NewSection, SectionPatch};

/// Content repository held entirely in memory.
#[derive(Default)]
pub struct MemoryContentRepository {
    rows: RwLock<Vec<ContentSection>>,
    offline: AtomicBool,
}

impl MemoryContentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with existing records.
    pub fn with_sections(sections: Vec<ContentSection>) -> Self {
        Self {
            rows: RwLock::new(sections),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate losing (or regaining) the connection to the store.
    ///
    /// While offline every operation fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for MemoryContentRepository {
    async fn list(&self) -> Result<Vec<ContentSection>, StoreError> {
        self.ensure_online()?;

        let mut sections = self.rows.read().clone();
        sections.sort_by(|a, b| {
            a.order_index
                .cmp(&b.order_index)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });

        Ok(sections)
    }

    async fn create(&self, input: NewSection) -> Result<(), StoreError> {
        self.ensure_online()?;

        let section = ContentSection::from_new(Uuid::now_v7(), input, Utc::now());
        self.rows.write().push(section);

        Ok(())
    }

    async fn update(&self, id: Uuid, patch: SectionPatch) -> Result<(), StoreError> {
        self.ensure_online()?;

        let mut rows = self.rows.write();
        let section = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;

        patch.apply_to(section);
        section.updated_at = Utc::now();

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.ensure_online()?;

        let mut rows = self.rows.write();
        let before = rows.len();
        rows.retain(|s| s.id != id);

        if rows.len() == before {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    async fn ping(&self) -> bool {
        !self.offline.load(Ordering::SeqCst)
    }
}
