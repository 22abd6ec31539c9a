//! Type definitions for taskboard storage.

mod ids;
mod members;
mod projects;
mod tasks;
mod users;
mod workspaces;

// Re-export all types from submodules
pub use ids::*;
pub use members::*;
pub use projects::*;
pub use tasks::*;
pub use users::*;
pub use workspaces::*;
