//! Storage abstraction for taskboard.
//!
//! Backend crates (e.g., taskboard-store-sqlite, taskboard-store-postgres)
//! implement the [`Store`] trait so the server doesn't depend on any specific
//! database engine or schema details.

use thiserror::Error;

mod store;
mod types;

pub use store::Store;
pub use types::*;

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("conflict")]
    Conflict,
    #[error("backend error: {0}")]
    Backend(String),
}
