//! Plucker Core Library
//!
//! This crate provides the configuration, error taxonomy, response models and
//! constants shared by every Plucker component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod paths;

// Re-export commonly used types
pub use config::{Config, Root, RootSet};
pub use error::{AppError, ErrorMetadata, LogLevel};
