//! Form helpers.

pub mod csrf;
