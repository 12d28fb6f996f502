//! Store implementations.
//!
//! # Stores
//!
//! - [`PgUrlStore`] - PostgreSQL storage via SQLx
//! - [`MemoryUrlStore`] - In-process storage via DashMap

pub mod memory_url_store;
pub mod pg_url_store;

pub use memory_url_store::MemoryUrlStore;
pub use pg_url_store::PgUrlStore;
