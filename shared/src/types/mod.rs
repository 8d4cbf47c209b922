//! Core book types shared by the generation pipeline and its callers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SharedError;

/// Themed world a book and its templates belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryWorld {
    Forest,
    Underwater,
    #[serde(alias = "space")]
    OuterSpace,
}

impl StoryWorld {
    /// Key used by the prompt catalog's scene tables
    pub fn as_key(&self) -> &'static str {
        match self {
            StoryWorld::Forest => "forest",
            StoryWorld::Underwater => "underwater",
            StoryWorld::OuterSpace => "outerspace",
        }
    }
}

impl fmt::Display for StoryWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

impl FromStr for StoryWorld {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forest" => Ok(StoryWorld::Forest),
            "underwater" => Ok(StoryWorld::Underwater),
            // The story creation flow stores outer space as "space"
            "outerspace" | "space" => Ok(StoryWorld::OuterSpace),
            other => Err(SharedError::InvalidStoryWorld { input: other.to_string() }),
        }
    }
}

/// A themed set of pre-authored page images used as generation bases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BookTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub story_world: Option<StoryWorld>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub copyright_page_image: Option<String>,
    #[serde(default)]
    pub dedication_page_image: Option<String>,
    /// Ordered story page art; looked up by position, not page number
    #[serde(default)]
    pub story_page_images: Vec<String>,
    #[serde(default)]
    pub last_story_page_image: Option<String>,
    #[serde(default)]
    pub back_cover_image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl BookTemplate {
    /// Story page template image at a position, ignoring blank entries
    pub fn story_page_image(&self, index: usize) -> Option<&str> {
        self.story_page_images
            .get(index)
            .map(String::as_str)
            .filter(|url| !url.trim().is_empty())
    }

    pub fn has_cover(&self) -> bool {
        self.cover_image.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

/// One page of story text supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPage {
    /// 1-based page number; 0 when the caller left it out
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub text: String,
}

impl StoryPage {
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self { page_number, text: text.into() }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Normalized outcome of a single remote generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn succeeded(url: impl Into<String>) -> Self {
        Self { success: true, url: Some(url.into()), error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, url: None, error: Some(error.into()) }
    }

    /// The produced URL, only when the call succeeded
    pub fn image_url(&self) -> Option<&str> {
        if self.success {
            self.url.as_deref()
        } else {
            None
        }
    }

    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("Unknown error")
    }
}

/// What happened to one page during a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PageOutcome {
    Generated { page: String, url: String },
    Skipped { page: String, reason: String },
    Failed { page: String, error: String },
}

impl PageOutcome {
    pub fn page(&self) -> &str {
        match self {
            PageOutcome::Generated { page, .. }
            | PageOutcome::Skipped { page, .. }
            | PageOutcome::Failed { page, .. } => page,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, PageOutcome::Generated { .. })
    }
}

/// Aggregate result of one book generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BookPagesResult {
    /// True whenever preconditions passed, even if pages failed
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedication_image_url: Option<String>,
    pub story_page_image_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_word_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_cover_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub page_log: Vec<PageOutcome>,
}

impl BookPagesResult {
    /// Fatal result carrying only an error message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn generated_count(&self) -> usize {
        self.page_log.iter().filter(|o| o.is_generated()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_world_parsing() {
        assert_eq!("forest".parse::<StoryWorld>().unwrap(), StoryWorld::Forest);
        assert_eq!("Underwater".parse::<StoryWorld>().unwrap(), StoryWorld::Underwater);
        assert_eq!("outerspace".parse::<StoryWorld>().unwrap(), StoryWorld::OuterSpace);
        assert_eq!(" space ".parse::<StoryWorld>().unwrap(), StoryWorld::OuterSpace);
        assert!("desert".parse::<StoryWorld>().is_err());
    }

    #[test]
    fn test_story_world_serde_uses_catalog_keys() {
        let json = serde_json::to_string(&StoryWorld::OuterSpace).unwrap();
        assert_eq!(json, "\"outerspace\"");

        let parsed: StoryWorld = serde_json::from_str("\"space\"").unwrap();
        assert_eq!(parsed, StoryWorld::OuterSpace);
    }

    #[test]
    fn test_template_deserializes_with_missing_fields() {
        let template: BookTemplate = serde_json::from_value(serde_json::json!({
            "id": "t-1",
            "name": "Forest Friends",
            "story_world": "forest",
            "story_page_images": ["https://cdn/p1.png", "", "https://cdn/p3.png"]
        }))
        .unwrap();

        assert_eq!(template.story_world, Some(StoryWorld::Forest));
        assert_eq!(template.story_page_image(0), Some("https://cdn/p1.png"));
        assert_eq!(template.story_page_image(1), None);
        assert_eq!(template.story_page_image(2), Some("https://cdn/p3.png"));
        assert_eq!(template.story_page_image(3), None);
        assert!(template.back_cover_image.is_none());
        assert!(!template.has_cover());
    }

    #[test]
    fn test_story_page_uses_camel_case() {
        let page: StoryPage = serde_json::from_str(r#"{"pageNumber": 2, "text": "Hello"}"#).unwrap();
        assert_eq!(page, StoryPage::new(2, "Hello"));
        assert!(page.has_text());
        assert!(!StoryPage::new(3, "   ").has_text());
    }

    #[test]
    fn test_story_page_number_is_optional() {
        let page: StoryPage = serde_json::from_str(r#"{"text": "No number here"}"#).unwrap();
        assert_eq!(page.page_number, 0);
        assert!(page.has_text());
    }

    #[test]
    fn test_generation_result_accessors() {
        let ok = GenerationResult::succeeded("https://x/y.png");
        assert_eq!(ok.image_url(), Some("https://x/y.png"));

        let failed = GenerationResult::failed("boom");
        assert_eq!(failed.image_url(), None);
        assert_eq!(failed.error_message(), "boom");

        let odd = GenerationResult { success: false, url: Some("https://x".into()), error: None };
        assert_eq!(odd.image_url(), None);
        assert_eq!(odd.error_message(), "Unknown error");
    }

    #[test]
    fn test_book_pages_failure() {
        let result = BookPagesResult::failure("Story pages are required");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Story pages are required"));
        assert!(result.story_page_image_urls.is_empty());
        assert_eq!(result.generated_count(), 0);
    }
}
