//! Content state controller.
//!
//! Owns the in-memory collection of content sections and is its only writer.
//! Every successful mutation re-fetches the full collection from the store
//! before it is reported as complete; nothing is merged locally.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::repository::{ContentRepository, StoreError};
use crate::models::{ContentSection, NewSection, SectionPatch};

/// Kind of write a [`MutationError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    fn as_str(self) -> &'static str {
        match self {
            Mutation::Create => "create",
            Mutation::Update => "update",
            Mutation::Delete => "delete",
        }
    }
}

/// A failed create, update or delete.
///
/// Displays as a message suitable for showing next to the action that failed.
#[derive(Debug, Error)]
pub struct MutationError {
    pub kind: Mutation,
    #[source]
    pub source: StoreError,
}

impl std::fmt::Display for MutationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl MutationError {
    /// Human-readable message for the editor.
    pub fn message(&self) -> &'static str {
        match (&self.source, self.kind) {
            (StoreError::NotFound(_), _) => "The section no longer exists. Reload the list and try again.",
            (_, Mutation::Create) => "Could not create the section. Please try again.",
            (_, Mutation::Update) => "Could not update the section. Please try again.",
            (_, Mutation::Delete) => "Could not delete the section. Please try again.",
        }
    }
}

/// Shared content state. Clone is cheap.
#[derive(Clone)]
pub struct ContentController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    repo: Arc<dyn ContentRepository>,

    /// Result of the newest refresh that has completed.
    snapshot: RwLock<Snapshot>,

    /// Ticket handed to the next refresh; orders refreshes by start time.
    next_ticket: AtomicU64,

    /// Refreshes currently awaiting the store.
    in_flight: AtomicUsize,

    /// Set once the first refresh has finished, whatever its outcome.
    settled: AtomicBool,

    /// Serializes mutations so each one finishes its refresh before the next starts.
    writes: tokio::sync::Mutex<()>,
}

struct Snapshot {
    sections: Arc<Vec<ContentSection>>,
    ticket: u64,
}

/// Keeps the loading flag raised for as long as a refresh is pending,
/// including when the refresh future is dropped part way through.
struct LoadingGuard<'a> {
    inner: &'a ControllerInner,
}

impl<'a> LoadingGuard<'a> {
    fn enter(inner: &'a ControllerInner) -> Self {
        inner.in_flight.fetch_add(1, Ordering::SeqCst);
        Self { inner }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.inner.settled.store(true, Ordering::SeqCst);
        self.inner.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ContentController {
    /// Create a controller with an empty collection. Call [`refresh`](Self::refresh)
    /// to load it.
    pub fn new(repo: Arc<dyn ContentRepository>) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                repo,
                snapshot: RwLock::new(Snapshot {
                    sections: Arc::new(Vec::new()),
                    ticket: 0,
                }),
                next_ticket: AtomicU64::new(0),
                in_flight: AtomicUsize::new(0),
                settled: AtomicBool::new(false),
                writes: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// The collection as of the last successful refresh.
    pub fn collection(&self) -> Arc<Vec<ContentSection>> {
        Arc::clone(&self.inner.snapshot.read().sections)
    }

    /// Look up a section in the current collection.
    pub fn find(&self, id: Uuid) -> Option<ContentSection> {
        self.inner
            .snapshot
            .read()
            .sections
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// True before the first refresh completes and while any refresh is pending.
    pub fn loading(&self) -> bool {
        !self.inner.settled.load(Ordering::SeqCst) || self.inner.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Whether the backing store answers requests.
    pub async fn store_reachable(&self) -> bool {
        self.inner.repo.ping().await
    }

    /// Replace the collection with the store's current contents.
    ///
    /// Failures are logged and absorbed: the previous collection is kept.
    /// Returns whether the store answered.
    pub async fn refresh(&self) -> bool {
        let ticket = self.inner.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = LoadingGuard::enter(&self.inner);

        match self.inner.repo.list().await {
            Ok(sections) => {
                let mut snapshot = self.inner.snapshot.write();
                if ticket > snapshot.ticket {
                    debug!(count = sections.len(), ticket, "content collection refreshed");
                    snapshot.sections = Arc::new(sections);
                    snapshot.ticket = ticket;
                } else {
                    debug!(ticket, newer = snapshot.ticket, "discarding superseded refresh");
                }
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to refresh content sections; keeping last known collection");
                false
            }
        }
    }

    /// Create a section, then refresh.
    pub async fn create(&self, input: NewSection) -> Result<(), MutationError> {
        let repo = Arc::clone(&self.inner.repo);
        self.mutate(Mutation::Create, None, async move { repo.create(input).await })
            .await
    }

    /// Apply a partial update, then refresh.
    pub async fn update(&self, id: Uuid, patch: SectionPatch) -> Result<(), MutationError> {
        let repo = Arc::clone(&self.inner.repo);
        self.mutate(Mutation::Update, Some(id), async move {
            repo.update(id, patch).await
        })
        .await
    }

    /// Delete a section, then refresh.
    pub async fn delete(&self, id: Uuid) -> Result<(), MutationError> {
        let repo = Arc::clone(&self.inner.repo);
        self.mutate(Mutation::Delete, Some(id), async move { repo.delete(id).await })
            .await
    }

    async fn mutate<F>(&self, kind: Mutation, id: Option<Uuid>, write: F) -> Result<(), MutationError>
    where
        F: Future<Output = Result<(), StoreError>>,
    {
        let _writes = self.inner.writes.lock().await;

        if let Err(source) = write.await {
            error!(error = %source, op = kind.as_str(), section_id = ?id, "content mutation failed");
            return Err(MutationError { kind, source });
        }

        self.refresh().await;
        info!(op = kind.as_str(), section_id = ?id, "content mutation applied");
        Ok(())
    }
}
