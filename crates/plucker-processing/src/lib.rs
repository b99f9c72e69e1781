//! Plucker Metadata Processing Library
//!
//! Reads the generation metadata that image tools embed in PNG text chunks and
//! extracts a readable prompt from the embedded node graph.

pub mod error;
pub mod info;
pub mod prompt;
pub mod service;

// Re-export commonly used types
pub use error::MetadataError;
pub use info::{read_info_store, InfoStore};
pub use prompt::extract_prompt_text;
pub use service::{MetadataService, PROMPT_TEXT_KEY};
