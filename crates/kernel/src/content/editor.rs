//! Section editor.
//!
//! Holds one draft section, validates it, and submits it through the
//! [`ContentController`]. A draft that fails validation never reaches the
//! content store.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::controller::{ContentController, MutationError};
use super::render::{ParagraphMode, SectionFields, SectionView, Treatment};
use crate::models::{ContentSection, NewSection, SectionPatch};

/// Title shown in previews while the draft has none.
const PREVIEW_TITLE_PLACEHOLDER: &str = "Sample title";

/// Whether the editor creates a new section or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(Uuid),
}

/// Draft fields that carry validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    SectionName,
    Title,
    Content,
    OrderIndex,
}

impl DraftField {
    /// Form field name.
    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::SectionName => "section_name",
            DraftField::Title => "title",
            DraftField::Content => "content",
            DraftField::OrderIndex => "order_index",
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: DraftField,
    pub message: &'static str,
}

/// All validation failures for a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Message for a field, if it failed.
    pub fn get(&self, field: DraftField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages keyed by form field name, for templates.
    pub fn by_field(&self) -> std::collections::BTreeMap<&'static str, &'static str> {
        self.errors
            .iter()
            .map(|e| (e.field.as_str(), e.message))
            .collect()
    }
}

/// Why the editor could not be opened.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("content section {0} no longer exists")]
    SectionMissing(Uuid),
}

/// Why a submission did not complete.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("draft failed validation")]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Store(#[from] MutationError),
}

/// In-progress section, possibly incomplete or invalid.
///
/// `order_index` is kept as the raw text typed by the editor so that
/// non-numeric input surfaces as a field error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionDraft {
    pub section_name: String,
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub image_url: String,
    pub button_text: String,
    pub button_url: String,
    pub order_index: String,
    pub is_active: bool,
}

impl SectionDraft {
    /// Empty draft positioned after `existing` sections, active by default.
    pub fn blank(existing: usize) -> Self {
        Self {
            section_name: String::new(),
            title: String::new(),
            subtitle: String::new(),
            content: String::new(),
            image_url: String::new(),
            button_text: String::new(),
            button_url: String::new(),
            order_index: (existing + 1).to_string(),
            is_active: true,
        }
    }

    /// Validate every field, collecting all failures.
    pub fn validate(&self) -> Result<NewSection, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let section_name = validate_required(DraftField::SectionName, &self.section_name)
            .map_err(|e| errors.push(e))
            .ok();
        let title = validate_required(DraftField::Title, &self.title)
            .map_err(|e| errors.push(e))
            .ok();
        let content = validate_required(DraftField::Content, &self.content)
            .map_err(|e| errors.push(e))
            .ok();
        let order_index = validate_order_index(&self.order_index)
            .map_err(|e| errors.push(e))
            .ok();

        match (section_name, title, content, order_index) {
            (Some(section_name), Some(title), Some(content), Some(order_index))
                if errors.is_empty() =>
            {
                Ok(NewSection {
                    section_name: section_name.trim().to_string(),
                    title: title.trim().to_string(),
                    subtitle: optional(&self.subtitle),
                    content: content.to_string(),
                    image_url: optional(&self.image_url),
                    button_text: optional(&self.button_text),
                    button_url: optional(&self.button_url),
                    order_index,
                    is_active: self.is_active,
                })
            }
            _ => Err(errors),
        }
    }

    fn fields(&self) -> SectionFields<'_> {
        let title = if self.title.trim().is_empty() {
            PREVIEW_TITLE_PLACEHOLDER
        } else {
            self.title.as_str()
        };

        SectionFields {
            id: None,
            section_name: self.section_name.as_str(),
            title,
            subtitle: Some(self.subtitle.as_str()),
            content: self.content.as_str(),
            image_url: Some(self.image_url.as_str()),
            button_text: Some(self.button_text.as_str()),
            button_url: Some(self.button_url.as_str()),
        }
    }
}

impl From<&ContentSection> for SectionDraft {
    fn from(section: &ContentSection) -> Self {
        Self {
            section_name: section.section_name.clone(),
            title: section.title.clone(),
            subtitle: section.subtitle.clone().unwrap_or_default(),
            content: section.content.clone(),
            image_url: section.image_url.clone().unwrap_or_default(),
            button_text: section.button_text.clone().unwrap_or_default(),
            button_url: section.button_url.clone().unwrap_or_default(),
            order_index: section.order_index.to_string(),
            is_active: section.is_active,
        }
    }
}

/// Required text must contain something other than whitespace.
pub fn validate_required(field: DraftField, value: &str) -> Result<&str, FieldError> {
    if value.trim().is_empty() {
        let message = match field {
            DraftField::SectionName => "Section name is required.",
            DraftField::Title => "Title is required.",
            DraftField::Content => "Content is required.",
            DraftField::OrderIndex => "Order is required.",
        };
        return Err(FieldError { field, message });
    }
    Ok(value)
}

/// Order must be a whole number of at least 1.
pub fn validate_order_index(raw: &str) -> Result<i32, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError {
            field: DraftField::OrderIndex,
            message: "Order is required.",
        });
    }

    let value: i32 = raw.parse().map_err(|_| FieldError {
        field: DraftField::OrderIndex,
        message: "Order must be a whole number.",
    })?;

    if value < 1 {
        return Err(FieldError {
            field: DraftField::OrderIndex,
            message: "Order must be 1 or greater.",
        });
    }

    Ok(value)
}

/// Optional text: blank becomes `None`, anything else is trimmed.
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Editor for one section.
#[derive(Debug, Clone)]
pub struct SectionEditor {
    mode: EditorMode,
    draft: SectionDraft,
}

impl SectionEditor {
    /// Open a blank editor positioned after the current collection.
    pub fn create(controller: &ContentController) -> Self {
        Self {
            mode: EditorMode::Create,
            draft: SectionDraft::blank(controller.collection().len()),
        }
    }

    /// Open an editor on an existing section's current values.
    pub fn edit(controller: &ContentController, id: Uuid) -> Result<Self, EditorError> {
        let section = controller.find(id).ok_or(EditorError::SectionMissing(id))?;
        Ok(Self {
            mode: EditorMode::Edit(id),
            draft: SectionDraft::from(&section),
        })
    }

    /// Resume editing with a draft posted back by the form.
    pub fn resume(mode: EditorMode, draft: SectionDraft) -> Self {
        Self { mode, draft }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn draft(&self) -> &SectionDraft {
        &self.draft
    }

    /// Render the draft as it would appear on the site, valid or not.
    pub fn preview(&self) -> SectionView {
        SectionView::new(self.draft.fields(), ParagraphMode::Verbatim, Treatment::Plain)
    }

    /// Validate and save the draft.
    ///
    /// On failure the draft is left untouched so the editor can correct it.
    pub async fn submit(&self, controller: &ContentController) -> Result<(), SubmitError> {
        let section = self.draft.validate()?;

        match self.mode {
            EditorMode::Create => controller.create(section).await?,
            EditorMode::Edit(id) => {
                controller
                    .update(id, SectionPatch::replace_with(section))
                    .await?;
            }
        }

        Ok(())
    }
}
