//! HTTP service implementations

pub mod back_cover_client;
pub mod image_client;
pub mod story_titles;

#[cfg(test)]
pub mod tests;

pub use back_cover_client::*;
pub use image_client::*;
pub use story_titles::*;

use std::time::Duration;

use crate::error::{BookGenError, BookGenResult};

/// Build the shared reqwest client, optionally bounded by a timeout
pub fn build_http_client(timeout: Option<Duration>) -> BookGenResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| BookGenError::Config {
        message: format!("Failed to build HTTP client: {}", e),
    })
}

/// Pull a human readable message out of an error response body
pub(crate) async fn error_detail(response: reqwest::Response) -> Option<String> {
    let body = response.text().await.ok()?;
    serde_json::from_str::<crate::types::ErrorDetail>(&body)
        .ok()
        .and_then(|detail| detail.detail)
        .filter(|detail| !detail.trim().is_empty())
}
