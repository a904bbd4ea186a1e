//! Content sections: storage, state, ordering, editing and rendering.
//!
//! This module provides:
//! - ContentRepository: async store client (PostgreSQL and in-memory)
//! - ContentController: the shared collection, re-fetched after every mutation
//! - visible_sections: the public ordering/visibility rule
//! - SectionEditor: draft validation, preview and submission
//! - PublicPage: the hero-plus-blocks view model for the public site

pub mod controller;
pub mod editor;
mod memory;
pub mod render;
pub mod repository;
mod visibility;

pub use controller::{ContentController, Mutation, MutationError};
pub use editor::{
    DraftField, EditorError, EditorMode, SectionDraft, SectionEditor, SubmitError,
    ValidationErrors,
};
pub use memory::MemoryContentRepository;
pub use render::{CallToAction, PublicPage, SectionView, Treatment};
pub use repository::{ContentRepository, PgContentRepository, StoreError};
pub use visibility::visible_sections;
