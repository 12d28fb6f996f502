//! Application layer services implementing business logic.
//!
//! Services consume store traits and provide a clean API for HTTP handlers
//! and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::url_registry::UrlRegistry`] - Short code allocation and resolution

pub mod services;
