//! Book generation error types

use thiserror::Error;

/// Result type for book generation operations
pub type BookGenResult<T> = Result<T, BookGenError>;

/// Book generation error types
#[derive(Error, Debug)]
pub enum BookGenError {
    #[error("Book template is required")]
    MissingTemplate,

    #[error("Character image URL is required")]
    MissingCharacterImage,

    #[error("Story pages are required")]
    NoStoryPages,

    #[error("Story pages must have text content")]
    NoStoryText,

    #[error("Failed to generate image: {status}")]
    Http { status: u16 },

    #[error("{detail}")]
    HttpDetail { status: u16, detail: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("No templates found for story world: {world}")]
    NoTemplateForWorld { world: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for BookGenError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BookGenError::InvalidResponse { message: err.to_string() }
        } else {
            BookGenError::Network { message: err.to_string() }
        }
    }
}
