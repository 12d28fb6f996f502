//! Domain layer containing the URL record model and store contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Store trait definitions
//! - [`errors`] - Store and registry failure types
//!
//! The domain layer has no dependencies on the HTTP or persistence layers;
//! the store contract is implemented in [`crate::infrastructure::persistence`]
//! and consumed by [`crate::application::services::UrlRegistry`].

pub mod entities;
pub mod errors;
pub mod repositories;
