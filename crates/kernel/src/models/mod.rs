//! Database models.

pub mod content_section;
pub mod editor;

pub use content_section::{ContentSection, NewSection, SectionPatch};
pub use editor::{CreateEditor, Editor};
