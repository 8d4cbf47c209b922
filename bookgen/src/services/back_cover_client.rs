//! HTTP client for the back cover overlay endpoint

use async_trait::async_trait;
use tracing::{debug, error};

use shared::{AppConfig, GenerationResult};
use crate::core::urls::{endpoint, strip_query};
use crate::error::{BookGenError, BookGenResult};
use crate::services::{build_http_client, error_detail};
use crate::traits::BackCoverCompositor;
use crate::types::{BackCoverRequest, UploadResponse};

/// Back cover compositing backed by the remote overlay service
#[derive(Debug, Clone)]
pub struct HttpBackCoverCompositor {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackCoverCompositor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> BookGenResult<Self> {
        let client = build_http_client(config.http_timeout)?;
        Ok(Self::with_client(client, config.backend_url.clone()))
    }

    async fn request_overlay(&self, request: &BackCoverRequest) -> BookGenResult<GenerationResult> {
        let response = self
            .client
            .post(endpoint(&self.base_url, "overlay-back-cover/"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response)
                .await
                .unwrap_or_else(|| format!("Back cover overlay failed: HTTP {}", status.as_u16()));
            return Err(BookGenError::HttpDetail {
                status: status.as_u16(),
                detail,
            });
        }

        let data: UploadResponse = response.json().await.map_err(|e| BookGenError::InvalidResponse {
            message: format!("Back cover overlay returned malformed JSON: {}", e),
        })?;

        Ok(match data.url.filter(|url| data.success && !url.is_empty()) {
            Some(url) => GenerationResult::succeeded(strip_query(&url)),
            None => GenerationResult::failed(
                data.message
                    .unwrap_or_else(|| "Back cover overlay returned no image URL".to_string()),
            ),
        })
    }
}

#[async_trait]
impl BackCoverCompositor for HttpBackCoverCompositor {
    async fn compose_back_cover(&self, request: BackCoverRequest) -> GenerationResult {
        debug!(
            "Requesting back cover overlay with {} text blocks for {}",
            request.text_blocks.len(),
            request.image_url
        );
        match self.request_overlay(&request).await {
            Ok(result) => result,
            Err(e) => {
                error!("Error compositing back cover: {}", e);
                GenerationResult::failed(e.to_string())
            }
        }
    }
}
