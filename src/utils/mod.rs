//! Utility functions for URL processing and code generation.
//!
//! This module provides helper functions used across the application:
//!
//! - [`code_generator`] - Short code generation and custom code validation
//! - [`url_normalizer`] - URL validation and canonicalization
//! - [`db_error`] - Database error classification

pub mod code_generator;
pub mod db_error;
pub mod url_normalizer;
