//! HTTP client for story title suggestions

use async_trait::async_trait;
use tracing::{error, info};

use shared::AppConfig;
use crate::core::urls::endpoint;
use crate::error::{BookGenError, BookGenResult};
use crate::services::{build_http_client, error_detail};
use crate::traits::StoryTitleGenerator;
use crate::types::{StoryTitleRequest, StoryTitleResponse};

/// Title suggestions from the story backend
#[derive(Debug, Clone)]
pub struct HttpStoryTitleClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStoryTitleClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        // The backend is sometimes configured with its /api prefix
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/');
        let base_url = base_url.strip_suffix("/api").unwrap_or(base_url).to_string();
        Self { client, base_url }
    }

    pub fn from_config(config: &AppConfig) -> BookGenResult<Self> {
        let client = build_http_client(config.http_timeout)?;
        Ok(Self::with_client(client, config.backend_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl StoryTitleGenerator for HttpStoryTitleClient {
    async fn generate_titles(&self, request: &StoryTitleRequest) -> BookGenResult<Vec<String>> {
        let response = self
            .client
            .post(endpoint(&self.base_url, "story/generate-titles"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response).await.unwrap_or_else(|| {
                format!(
                    "Failed to generate story titles: {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                )
                .trim_end()
                .to_string()
            });
            error!("Error generating story titles: {}", detail);
            return Err(BookGenError::HttpDetail {
                status: status.as_u16(),
                detail,
            });
        }

        let data: StoryTitleResponse = response.json().await.map_err(|e| BookGenError::InvalidResponse {
            message: format!("Invalid response from story titles API: {}", e),
        })?;

        match data.titles {
            Some(titles) if data.success => {
                info!("Received {} story title suggestions", titles.len());
                Ok(titles)
            }
            _ => Err(BookGenError::InvalidResponse {
                message: "Invalid response from story titles API".to_string(),
            }),
        }
    }
}
