//! Vitrina kernel library.
//!
//! A content-managed marketing site: a public page built from ordered
//! content sections and a signed-in admin panel for editing them. The
//! `vitrina` binary wires these pieces into a server.

pub mod auth;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod form;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;
pub mod theme;
