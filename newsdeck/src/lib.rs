// Library interface for newsdeck modules
// This allows tests and other binaries to import modules

pub mod api;
pub mod category;
pub mod error;
pub mod feed;
pub mod health;
pub mod query;
pub mod rank;
pub mod types;
