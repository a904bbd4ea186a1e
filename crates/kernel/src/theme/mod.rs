//! Theme: template loading and rendering.

mod engine;

pub use engine::ThemeEngine;
