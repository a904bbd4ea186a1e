//! Content section record and its write payloads.
//!
//! A content section is one block of the public site: the first active
//! section is rendered as the hero, the rest as repeating content blocks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content section record as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentSection {
    /// Store-assigned identifier (UUIDv7). Never editable.
    pub id: Uuid,

    /// Short identifying label (e.g. "hero", "about").
    pub section_name: String,

    /// Display heading.
    pub title: String,

    /// Optional display text shown above the heading.
    pub subtitle: Option<String>,

    /// Multi-line body; each line is a paragraph.
    pub content: String,

    /// Optional hero/section image.
    pub image_url: Option<String>,

    /// Call-to-action label.
    pub button_text: Option<String>,

    /// Call-to-action target.
    pub button_url: Option<String>,

    /// Render position on the public site (>= 1, not unique).
    pub order_index: i32,

    /// Only active sections are rendered publicly.
    pub is_active: bool,

    /// Stamped by the store on insert. Never editable.
    pub created_at: DateTime<Utc>,

    /// Stamped by the store on every insert and update.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a section. The store assigns `id` and both timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSection {
    pub section_name: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub order_index: i32,
    pub is_active: bool,
}

/// Partial update for a section.
///
/// `None` leaves the stored value unchanged. For nullable columns the inner
/// `Option` distinguishes "set to NULL" from "set to a value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionPatch {
    pub section_name: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<Option<String>>,
    pub content: Option<String>,
    pub image_url: Option<Option<String>>,
    pub button_text: Option<Option<String>>,
    pub button_url: Option<Option<String>>,
    pub order_index: Option<i32>,
    pub is_active: Option<bool>,
}

impl SectionPatch {
    /// Patch that only flips visibility.
    pub fn visibility(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }

    /// Patch that overwrites every editable field with the given values.
    pub fn replace_with(section: NewSection) -> Self {
        Self {
            section_name: Some(section.section_name),
            title: Some(section.title),
            subtitle: Some(section.subtitle),
            content: Some(section.content),
            image_url: Some(section.image_url),
            button_text: Some(section.button_text),
            button_url: Some(section.button_url),
            order_index: Some(section.order_index),
            is_active: Some(section.is_active),
        }
    }

    /// Apply the patch to a record in place. Timestamps are the caller's job.
    pub fn apply_to(&self, section: &mut ContentSection) {
        if let Some(v) = &self.section_name {
            section.section_name.clone_from(v);
        }
        if let Some(v) = &self.title {
            section.title.clone_from(v);
        }
        if let Some(v) = &self.subtitle {
            section.subtitle.clone_from(v);
        }
        if let Some(v) = &self.content {
            section.content.clone_from(v);
        }
        if let Some(v) = &self.image_url {
            section.image_url.clone_from(v);
        }
        if let Some(v) = &self.button_text {
            section.button_text.clone_from(v);
        }
        if let Some(v) = &self.button_url {
            section.button_url.clone_from(v);
        }
        if let Some(v) = self.order_index {
            section.order_index = v;
        }
        if let Some(v) = self.is_active {
            section.is_active = v;
        }
    }
}

impl ContentSection {
    /// Build a stored record from create input with the given identity and time.
    pub fn from_new(id: Uuid, input: NewSection, now: DateTime<Utc>) -> Self {
        Self {
            id,
            section_name: input.section_name,
            title: input.title,
            subtitle: input.subtitle,
            content: input.content,
            image_url: input.image_url,
            button_text: input.button_text,
            button_url: input.button_url,
            order_index: input.order_index,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample() -> ContentSection {
        ContentSection::from_new(
            Uuid::now_v7(),
            NewSection {
                section_name: "hero".to_string(),
                title: "Welcome".to_string(),
                subtitle: Some("Hello".to_string()),
                content: "Line one".to_string(),
                image_url: None,
                button_text: None,
                button_url: None,
                order_index: 1,
                is_active: true,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_visibility_patch_touches_only_is_active() {
        let mut section = sample();
        let before = section.clone();

        SectionPatch::visibility(false).apply_to(&mut section);

        assert!(!section.is_active);
        assert_eq!(section.order_index, before.order_index);
        assert_eq!(section.title, before.title);
        assert_eq!(section.subtitle, before.subtitle);
    }

    #[test]
    fn test_patch_can_clear_nullable_field() {
        let mut section = sample();
        let patch = SectionPatch {
            subtitle: Some(None),
            ..SectionPatch::default()
        };

        patch.apply_to(&mut section);
        assert_eq!(section.subtitle, None);
    }

    #[test]
    fn test_from_new_stamps_both_timestamps() {
        let section = sample();
        assert_eq!(section.created_at, section.updated_at);
    }
}
