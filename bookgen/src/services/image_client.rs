//! HTTP client for the image edit and composite endpoints

use async_trait::async_trait;
use tracing::{debug, error};

use shared::{AppConfig, GenerationResult};
use crate::core::urls::{endpoint, strip_query};
use crate::error::{BookGenError, BookGenResult};
use crate::services::build_http_client;
use crate::traits::ImageGenerator;
use crate::types::{CompositeImageRequest, EditImageRequest, EditImageResponse, UploadResponse};

const NO_IMAGE_URL: &str = "No image URL received from API";

/// Image generation backed by the remote image service
#[derive(Debug, Clone)]
pub struct HttpImageClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpImageClient {
    /// Create client with default reqwest settings
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

    async fn request_single(&self, template_url: &str, prompt: &str) -> BookGenResult<GenerationResult> {
        let body = EditImageRequest {
            image_url: template_url,
            prompt,
        };

        let response = self
            .client
            .post(endpoint(&self.base_url, "edit-image"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BookGenError::Http {
                status: response.status().as_u16(),
            });
        }

        let data: EditImageResponse = response.json().await.map_err(|e| BookGenError::InvalidResponse {
            message: format!("Failed to parse response: {}", e),
        })?;

        let uploaded_url = data
            .storage_info
            .filter(|info| info.uploaded)
            .and_then(|info| info.url)
            .filter(|url| !url.is_empty());

        Ok(match uploaded_url {
            Some(url) => GenerationResult::succeeded(strip_query(&url)),
            None => GenerationResult::failed(NO_IMAGE_URL),
        })
    }

    async fn request_composite(
        &self,
        template_url: &str,
        character_url: &str,
        prompt: &str,
    ) -> BookGenResult<GenerationResult> {
        let body = CompositeImageRequest {
            template_cover_url: template_url,
            character_image_url: character_url,
            prompt,
        };

        let response = self
            .client
            .post(endpoint(&self.base_url, "generate-cover-image"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BookGenError::Http {
                status: response.status().as_u16(),
            });
        }

        let data: UploadResponse = response.json().await.map_err(|e| BookGenError::InvalidResponse {
            message: format!("Failed to parse response: {}", e),
        })?;

        Ok(match data.url.filter(|url| data.success && !url.is_empty()) {
            Some(url) => GenerationResult::succeeded(strip_query(&url)),
            None => GenerationResult::failed(data.message.unwrap_or_else(|| NO_IMAGE_URL.to_string())),
        })
    }
}

#[async_trait]
impl ImageGenerator for HttpImageClient {
    async fn generate_with_single_template(&self, template_url: &str, prompt: &str) -> GenerationResult {
        debug!("Requesting image edit for template {}", template_url);
        match self.request_single(template_url, prompt).await {
            Ok(result) => result,
            Err(e) => {
                error!("Error generating image: {}", e);
                GenerationResult::failed(e.to_string())
            }
        }
    }

    async fn generate_with_two_templates(
        &self,
        template_url: &str,
        character_url: &str,
        prompt: &str,
    ) -> GenerationResult {
        debug!("Requesting composite for template {} with character {}", template_url, character_url);
        match self.request_composite(template_url, character_url, prompt).await {
            Ok(result) => result,
            Err(e) => {
                error!("Error generating image: {}", e);
                GenerationResult::failed(e.to_string())
            }
        }
    }
}
