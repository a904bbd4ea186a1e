//! Section ordering and visibility.

use std::borrow::Borrow;

use crate::models::ContentSection;

/// Sections the public site renders, in render order.
///
/// Keeps only active sections and sorts them ascending by `order_index`.
/// The sort is stable, so sections sharing an `order_index` keep their
/// relative input order.
pub fn visible_sections<S, I>(collection: I) -> Vec<S>
where
    I: IntoIterator<Item = S>,
    S: Borrow<ContentSection>,
{
    let mut visible: Vec<S> = collection
        .into_iter()
        .filter(|s| s.borrow().is_active)
        .collect();
    visible.sort_by_key(|s| s.borrow().order_index);
    visible
}
