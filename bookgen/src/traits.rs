//! Service trait definitions for dependency injection

use async_trait::async_trait;

use shared::GenerationResult;
use crate::error::BookGenResult;
use crate::types::{BackCoverRequest, StoryTitleRequest};

/// Remote image generation from template art
///
/// Implementations never retry and never fail: every error is folded into
/// an unsuccessful `GenerationResult`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Edit one template image according to a prompt
    async fn generate_with_single_template(&self, template_url: &str, prompt: &str) -> GenerationResult;

    /// Composite a character image into a template image
    async fn generate_with_two_templates(
        &self,
        template_url: &str,
        character_url: &str,
        prompt: &str,
    ) -> GenerationResult;
}

/// Remote text/logo/barcode overlay onto a back cover image
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackCoverCompositor: Send + Sync {
    async fn compose_back_cover(&self, request: BackCoverRequest) -> GenerationResult;
}

/// Story title suggestions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryTitleGenerator: Send + Sync {
    async fn generate_titles(&self, request: &StoryTitleRequest) -> BookGenResult<Vec<String>>;
}

/// Receives `(label, percent)` updates during a pipeline run
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, label: &str, percent: f32);
}

impl<F> ProgressSink for F
where
    F: Fn(&str, f32) + Send + Sync,
{
    fn on_progress(&self, label: &str, percent: f32) {
        self(label, percent)
    }
}
