//! Plucker API Library
//!
//! This crate provides the HTTP handlers, error mapping and application setup
//! for the media browser.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;

pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
