//! Handler tests, one module per domain.

mod members;
mod projects;
mod reports;
mod users;
mod workspaces;
