//! Shared types for the book generation system
//!
//! Contains the book data model, configuration and logging helpers used by
//! the pipeline crate and its binary.

pub mod types;
pub mod errors;
pub mod config;
pub mod logging;

pub use types::*;
pub use errors::*;
pub use config::{logo_url_for, AppConfig};
