//! Book page generation library
//!
//! This library turns a themed book template, a character image and story
//! text into page images by sequencing calls to a remote image backend,
//! with best-effort handling of individual page failures.

pub mod error;
pub mod types;
pub mod traits;
pub mod core;
pub mod pipeline_impl;
pub mod services;

// Re-export main types
pub use error::{BookGenError, BookGenResult};
pub use types::*;
pub use traits::*;
pub use pipeline_impl::{BookPipeline, PipelineSettings};
pub use services::*;
