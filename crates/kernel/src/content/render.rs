//! Public page view model.
//!
//! Turns the ordered, visible sections into the structure the front page
//! templates consume: a hero followed by alternating content blocks, or the
//! under-construction placeholder when nothing is visible.

use std::borrow::Borrow;

use serde::Serialize;
use uuid::Uuid;

use crate::models::ContentSection;

/// Call-to-action link. Only exists when both text and target are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallToAction {
    pub text: String,
    pub url: String,
}

/// Visual treatment of a rendered section. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Treatment {
    Hero,
    Plain,
    Accent,
}

/// How body lines become paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphMode {
    /// Every line is a paragraph, blank lines included.
    Verbatim,
    /// Whitespace-only lines are dropped.
    SkipBlank,
}

/// Borrowed field set shared by stored sections and editor drafts.
#[derive(Debug, Clone, Copy)]
pub struct SectionFields<'a> {
    pub id: Option<Uuid>,
    pub section_name: &'a str,
    pub title: &'a str,
    pub subtitle: Option<&'a str>,
    pub content: &'a str,
    pub image_url: Option<&'a str>,
    pub button_text: Option<&'a str>,
    pub button_url: Option<&'a str>,
}

impl<'a> From<&'a ContentSection> for SectionFields<'a> {
    fn from(section: &'a ContentSection) -> Self {
        Self {
            id: Some(section.id),
            section_name: &section.section_name,
            title: &section.title,
            subtitle: section.subtitle.as_deref(),
            content: &section.content,
            image_url: section.image_url.as_deref(),
            button_text: section.button_text.as_deref(),
            button_url: section.button_url.as_deref(),
        }
    }
}

/// One section, ready for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub id: Option<Uuid>,
    pub section_name: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    pub paragraphs: Vec<String>,
    pub call_to_action: Option<CallToAction>,
    pub treatment: Treatment,
}

impl SectionView {
    /// Build a view from section fields.
    pub fn new(fields: SectionFields<'_>, mode: ParagraphMode, treatment: Treatment) -> Self {
        Self {
            id: fields.id,
            section_name: fields.section_name.to_string(),
            title: fields.title.to_string(),
            subtitle: non_blank(fields.subtitle).map(str::to_string),
            image_url: non_blank(fields.image_url).map(str::to_string),
            paragraphs: paragraphs(fields.content, mode),
            call_to_action: call_to_action(fields.button_text, fields.button_url),
            treatment,
        }
    }
}

/// What the public site shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PublicPage {
    /// No visible sections.
    UnderConstruction,
    /// Hero plus the remaining blocks in order.
    Sections {
        hero: SectionView,
        blocks: Vec<SectionView>,
    },
}

impl PublicPage {
    /// Build the page from sections already filtered and ordered for display.
    ///
    /// The hero keeps every body line verbatim; later blocks skip blank lines
    /// and alternate between plain and accent treatments.
    pub fn build<S: Borrow<ContentSection>>(visible: &[S]) -> Self {
        let Some((first, rest)) = visible.split_first() else {
            return PublicPage::UnderConstruction;
        };

        let hero = SectionView::new(
            SectionFields::from(first.borrow()),
            ParagraphMode::Verbatim,
            Treatment::Hero,
        );

        let blocks = rest
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let treatment = if i % 2 == 0 {
                    Treatment::Plain
                } else {
                    Treatment::Accent
                };
                SectionView::new(
                    SectionFields::from(section.borrow()),
                    ParagraphMode::SkipBlank,
                    treatment,
                )
            })
            .collect();

        PublicPage::Sections { hero, blocks }
    }

    /// Whether the placeholder is shown.
    pub fn is_under_construction(&self) -> bool {
        matches!(self, PublicPage::UnderConstruction)
    }
}

/// Split a body into paragraphs on newlines.
///
/// Carriage returns from form submissions are stripped before the blank
/// check so CRLF input behaves like LF input.
pub fn paragraphs(content: &str, mode: ParagraphMode) -> Vec<String> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| match mode {
            ParagraphMode::Verbatim => true,
            ParagraphMode::SkipBlank => !line.trim().is_empty(),
        })
        .map(str::to_string)
        .collect()
}

/// The call-to-action, if both label and target are non-blank.
pub fn call_to_action(text: Option<&str>, url: Option<&str>) -> Option<CallToAction> {
    Some(CallToAction {
        text: non_blank(text)?.to_string(),
        url: non_blank(url)?.to_string(),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
