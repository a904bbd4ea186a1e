//! Theme engine with Tera templates.

use std::path::Path;

use anyhow::{Context, Result};
use tera::Tera;
use tracing::debug;

/// Templates compiled into the binary, keyed by their Tera name.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../../../templates/base.html")),
    (
        "front/page.html",
        include_str!("../../../../templates/front/page.html"),
    ),
    (
        "front/under-construction.html",
        include_str!("../../../../templates/front/under-construction.html"),
    ),
    (
        "admin/login.html",
        include_str!("../../../../templates/admin/login.html"),
    ),
    (
        "admin/dashboard.html",
        include_str!("../../../../templates/admin/dashboard.html"),
    ),
    (
        "admin/section-form.html",
        include_str!("../../../../templates/admin/section-form.html"),
    ),
    (
        "admin/delete-confirm.html",
        include_str!("../../../../templates/admin/delete-confirm.html"),
    ),
    (
        "admin/not-found.html",
        include_str!("../../../../templates/admin/not-found.html"),
    ),
];

/// Theme engine for rendering templates.
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Load templates from a directory, e.g. a customized copy of `templates/`.
    pub fn new(template_dir: &Path) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let tera = Tera::new(pattern_str).context("failed to initialize Tera templates")?;
        Self::finish(tera)
    }

    /// Use the templates compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES.iter().copied())
            .context("failed to compile built-in templates")?;
        Self::finish(tera)
    }

    fn finish(mut tera: Tera) -> Result<Self> {
        tera.autoescape_on(vec![".html"]);

        let count = tera.get_template_names().count();
        debug!(count, "loaded templates");

        Ok(Self { tera })
    }

    /// Get the underlying Tera instance.
    pub fn tera(&self) -> &Tera {
        &self.tera
    }

    /// Render a template by name.
    pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, tera::Error> {
        self.tera.render(template, context)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_compile() {
        let theme = ThemeEngine::builtin().unwrap();
        for (name, _) in BUILTIN_TEMPLATES {
            assert!(theme.tera().get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_template_dir_matches_builtin() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates");
        let theme = ThemeEngine::new(&dir).unwrap();
        for (name, _) in BUILTIN_TEMPLATES {
            assert!(theme.tera().get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_output_is_escaped() {
        let theme = ThemeEngine::builtin().unwrap();
        let mut context = tera::Context::new();
        context.insert("site_name", "<b>Site</b>");
        context.insert("current_year", &2026);

        let html = theme
            .render("front/under-construction.html", &context)
            .unwrap();
        assert!(html.contains("&lt;b&gt;Site"));
        assert!(!html.contains("<b>Site"));
    }
}
