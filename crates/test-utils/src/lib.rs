//! Vitrina test utilities.
//!
//! Fixture builders for content sections and a repository wrapper that
//! records calls and injects store failures.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use vitrina_kernel::content::{ContentRepository, StoreError};
use vitrina_kernel::models::{ContentSection, NewSection, SectionPatch};

/// Start building a test section.
pub fn test_section(section_name: &str, title: &str) -> TestSection {
    TestSection {
        id: Uuid::now_v7(),
        section_name: section_name.to_string(),
        title: title.to_string(),
        subtitle: None,
        content: format!("{title} body"),
        image_url: None,
        button_text: None,
        button_url: None,
        order_index: 1,
        is_active: true,
        created_at: Utc::now(),
    }
}

/// A content section builder for test fixtures.
#[derive(Debug, Clone)]
pub struct TestSection {
    pub id: Uuid,
    pub section_name: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub order_index: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TestSection {
    /// Set the display position.
    pub fn at(mut self, order_index: i32) -> Self {
        self.order_index = order_index;
        self
    }

    /// Hide from the public site.
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Set the body text.
    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    /// Set the subtitle.
    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    /// Set the image.
    pub fn with_image(mut self, url: &str) -> Self {
        self.image_url = Some(url.to_string());
        self
    }

    /// Set the call-to-action label and target. Either may be empty.
    pub fn with_button(mut self, text: &str, url: &str) -> Self {
        self.button_text = Some(text.to_string());
        self.button_url = Some(url.to_string());
        self
    }

    /// Shift the creation time, e.g. to control tie ordering.
    pub fn created_later_by(mut self, seconds: i64) -> Self {
        self.created_at += Duration::seconds(seconds);
        self
    }

    /// The create request for this section.
    pub fn to_new(&self) -> NewSection {
        NewSection {
            section_name: self.section_name.clone(),
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            content: self.content.clone(),
            image_url: self.image_url.clone(),
            button_text: self.button_text.clone(),
            button_url: self.button_url.clone(),
            order_index: self.order_index,
            is_active: self.is_active,
        }
    }

    /// The stored record.
    pub fn build(&self) -> ContentSection {
        let mut section = ContentSection::from_new(self.id, self.to_new(), self.created_at);
        section.updated_at = self.created_at;
        section
    }
}

/// Repository operations, for call recording and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

/// Wraps a repository, recording every call and failing on request.
pub struct FlakyRepository {
    inner: Arc<dyn ContentRepository>,
    calls: Mutex<Vec<Operation>>,
    pending_failures: Mutex<HashMap<Operation, usize>>,
}

impl FlakyRepository {
    pub fn new(inner: Arc<dyn ContentRepository>) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            pending_failures: Mutex::new(HashMap::new()),
        }
    }

    /// Make the next call of `op` fail with [`StoreError::Unavailable`].
    pub fn fail_next(&self, op: Operation) {
        self.fail_next_n(op, 1);
    }

    /// Make the next `n` calls of `op` fail.
    pub fn fail_next_n(&self, op: Operation, n: usize) {
        *self.pending_failures.lock().entry(op).or_default() += n;
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().clone()
    }

    /// Number of calls of one kind.
    pub fn count(&self, op: Operation) -> usize {
        self.calls.lock().iter().filter(|c| **c == op).count()
    }

    /// Forget recorded calls.
    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }

    fn enter(&self, op: Operation) -> Result<(), StoreError> {
        self.calls.lock().push(op);

        let mut pending = self.pending_failures.lock();
        match pending.get_mut(&op) {
            Some(n) if *n > 0 => {
                *n -= 1;
                Err(StoreError::Unavailable(format!("injected {op:?} failure")))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ContentRepository for FlakyRepository {
    async fn list(&self) -> Result<Vec<ContentSection>, StoreError> {
        self.enter(Operation::List)?;
        self.inner.list().await
    }

    async fn create(&self, input: NewSection) -> Result<(), StoreError> {
        self.enter(Operation::Create)?;
        self.inner.create(input).await
    }

    async fn update(&self, id: Uuid, patch: SectionPatch) -> Result<(), StoreError> {
        self.enter(Operation::Update)?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.enter(Operation::Delete)?;
        self.inner.delete(id).await
    }

    async fn ping(&self) -> bool {
        self.inner.ping().await
    }
}

/// Assertion helpers for rendered pages.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string NOT to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that `first` appears before `second`.
    pub fn appears_before(haystack: &str, first: &str, second: &str) {
        let a = haystack
            .find(first)
            .unwrap_or_else(|| panic!("'{first}' not found"));
        let b = haystack
            .find(second)
            .unwrap_or_else(|| panic!("'{second}' not found"));
        assert!(a < b, "Expected '{first}' before '{second}'");
    }
}
