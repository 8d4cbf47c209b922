//! Book page pipeline with dependency injection

use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use shared::logging::{log_error, log_success};
use shared::{logo_url_for, AppConfig, BookPagesResult, BookTemplate, PageOutcome, StoryPage};
use crate::core::back_cover::{build_text_blocks, BackCoverValues};
use crate::core::progress::{ProgressPlan, ProgressReporter};
use crate::core::prompt::PromptBuilder;
use crate::error::{BookGenError, BookGenResult};
use crate::traits::{BackCoverCompositor, ImageGenerator, ProgressSink};
use crate::types::{BackCoverRequest, BookPagesRequest};

/// Values the pipeline needs beyond the per-run request
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Public app origin; the back cover logo lives under it
    pub public_app_url: Option<String>,
    pub app_name: String,
    pub barcode_isbn: String,
}

impl PipelineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            public_app_url: config.public_app_url.clone(),
            app_name: config.app_name.clone(),
            barcode_isbn: config.barcode_isbn.clone(),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Request fields checked before any network call
struct ValidatedRun<'r> {
    template: &'r BookTemplate,
    character_image_url: &'r str,
    pages: Vec<&'r StoryPage>,
}

/// Story page results folded in page order
#[derive(Debug, Default)]
struct StoryPageFold {
    urls: Vec<String>,
    log: Vec<PageOutcome>,
}

impl StoryPageFold {
    fn push(&mut self, outcome: PageOutcome) {
        if let PageOutcome::Generated { url, .. } = &outcome {
            self.urls.push(url.clone());
        }
        self.log.push(outcome);
    }
}

/// Sequential book page generation over injected services
pub struct BookPipeline<G, C>
where
    G: ImageGenerator,
    C: BackCoverCompositor,
{
    pub prompts: PromptBuilder,
    pub image_generator: G,
    pub back_cover_compositor: C,
    pub settings: PipelineSettings,
}

impl<G, C> BookPipeline<G, C>
where
    G: ImageGenerator,
    C: BackCoverCompositor,
{
    /// Create a new pipeline instance
    pub fn new(
        prompts: PromptBuilder,
        image_generator: G,
        back_cover_compositor: C,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            prompts,
            image_generator,
            back_cover_compositor,
            settings,
        }
    }

    /// Generate every page image for a book
    ///
    /// Never fails: precondition violations and unexpected errors come back as
    /// `success: false` with a message, while individual page failures only
    /// leave that page out of the result.
    pub async fn generate_all_book_pages(
        &self,
        request: BookPagesRequest,
        progress: Option<&dyn ProgressSink>,
    ) -> BookPagesResult {
        let run_id = Uuid::new_v4();
        let span = info_span!("book_pipeline", %run_id);

        async move {
            match self.run(&request, progress).await {
                Ok(result) => result,
                Err(e) => {
                    log_error("Book page generation", &e);
                    BookPagesResult::failure(e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        request: &BookPagesRequest,
        progress: Option<&dyn ProgressSink>,
    ) -> BookGenResult<BookPagesResult> {
        let run = self.validate(request)?;
        let plan = ProgressPlan::for_mode(request.story_pages_only);
        let mut reporter = ProgressReporter::new(progress);
        let mut result = BookPagesResult::default();

        info!(
            "Generating book pages for {} story pages (story pages only: {})",
            run.pages.len(),
            request.story_pages_only
        );
        debug!(
            template_id = %run.template.id,
            has_copyright_page = run.template.copyright_page_image.is_some(),
            has_dedication_page = run.template.dedication_page_image.is_some(),
            has_last_word_page = run.template.last_story_page_image.is_some(),
            has_back_cover = run.template.back_cover_image.is_some(),
            story_page_images = run.template.story_page_images.len(),
            "Book template fields"
        );

        if !request.story_pages_only {
            reporter.report("Generating copyright page...", plan.copyright);
            let outcome = self
                .single_template_page(
                    "copyright",
                    run.template.copyright_page_image.as_deref(),
                    || self.prompts.copyright_page(&request.child_name, &request.character_name),
                )
                .await;
            result.copyright_image_url = generated_url(&outcome);
            result.page_log.push(outcome);

            reporter.report("Generating dedication page...", plan.dedication);
            let outcome = if request.dedication_message.trim().is_empty() {
                warn!("⚠️ No dedication message provided");
                PageOutcome::Skipped {
                    page: "dedication".to_string(),
                    reason: "no dedication message".to_string(),
                }
            } else {
                self.single_template_page(
                    "dedication",
                    run.template.dedication_page_image.as_deref(),
                    || self.prompts.dedication_page(&request.dedication_message),
                )
                .await
            };
            result.dedication_image_url = generated_url(&outcome);
            result.page_log.push(outcome);
        }

        reporter.report("Generating story pages...", plan.pages_start);
        let fold = self.story_pages(&run, &request.story_world, &plan, &mut reporter).await;
        info!(
            "Generated {} out of {} story page images",
            fold.urls.len(),
            run.pages.len()
        );
        result.story_page_image_urls = fold.urls;
        result.page_log.extend(fold.log);

        if !request.story_pages_only {
            reporter.report("Generating final page...", plan.last_word);
            let outcome = self
                .single_template_page(
                    "last-word",
                    run.template.last_story_page_image.as_deref(),
                    || self.prompts.last_word_page(&request.child_name),
                )
                .await;
            result.last_word_image_url = generated_url(&outcome);
            result.page_log.push(outcome);

            reporter.report("Generating back cover...", plan.back_cover);
            let outcome = self.back_cover(&run, request).await;
            result.back_cover_image_url = generated_url(&outcome);
            result.page_log.push(outcome);
        }

        reporter.report("Complete!", 100.0);
        result.success = true;
        log_success(&format!(
            "Book pages ready: {} generated, {} not generated",
            result.generated_count(),
            result.page_log.len() - result.generated_count()
        ));
        Ok(result)
    }

    /// Check preconditions in order and keep only pages with text
    fn validate<'r>(&self, request: &'r BookPagesRequest) -> BookGenResult<ValidatedRun<'r>> {
        let template = request.template.as_ref().ok_or(BookGenError::MissingTemplate)?;

        let character_image_url = request
            .character_image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(BookGenError::MissingCharacterImage)?;

        if request.story_pages.is_empty() {
            return Err(BookGenError::NoStoryPages);
        }

        let pages: Vec<&StoryPage> = request.story_pages.iter().filter(|page| page.has_text()).collect();
        if pages.is_empty() {
            return Err(BookGenError::NoStoryText);
        }
        if pages.len() < request.story_pages.len() {
            debug!(
                "Ignoring {} story pages without text",
                request.story_pages.len() - pages.len()
            );
        }

        Ok(ValidatedRun {
            template,
            character_image_url,
            pages,
        })
    }

    /// Story pages in order, matched to template art by position
    async fn story_pages(
        &self,
        run: &ValidatedRun<'_>,
        story_world: &str,
        plan: &ProgressPlan,
        reporter: &mut ProgressReporter<'_>,
    ) -> StoryPageFold {
        let total = run.pages.len();
        let mut fold = StoryPageFold::default();

        for (index, page) in run.pages.iter().enumerate() {
            let page_number = if page.page_number == 0 {
                index as u32 + 1
            } else {
                page.page_number
            };
            let label = format!("story-{page_number}");

            let Some(template_image) = run.template.story_page_image(index) else {
                warn!("No template image for story page {}", page_number);
                fold.push(PageOutcome::Skipped {
                    page: label,
                    reason: format!("no template image at position {index}"),
                });
                continue;
            };

            reporter.report(
                &format!("Generating story page {page_number}..."),
                plan.story_page(index, total),
            );

            let action = self.prompts.character_action(page_number);
            let scene = self
                .prompts
                .scene_description(page_number, story_world, Some(&page.text));
            let prompt = self.prompts.story_page(page_number, &page.text, action, &scene);

            let generation = self
                .image_generator
                .generate_with_two_templates(template_image, run.character_image_url, &prompt)
                .await;

            fold.push(match generation.image_url() {
                Some(url) => {
                    info!("✅ Story page {} generated successfully", page_number);
                    PageOutcome::Generated {
                        page: label,
                        url: url.to_string(),
                    }
                }
                None => {
                    error!(
                        "❌ Failed to generate story page {}: {}",
                        page_number,
                        generation.error_message()
                    );
                    PageOutcome::Failed {
                        page: label,
                        error: generation.error_message().to_string(),
                    }
                }
            });
        }

        fold
    }

    /// One front or closing page edited from a single template image
    async fn single_template_page<F>(&self, page: &str, template_image: Option<&str>, prompt: F) -> PageOutcome
    where
        F: FnOnce() -> String,
    {
        let Some(template_image) = template_image.filter(|url| !url.trim().is_empty()) else {
            warn!("⚠️ {} page template image not found in book template", page);
            return PageOutcome::Skipped {
                page: page.to_string(),
                reason: "no template image".to_string(),
            };
        };

        debug!("Generating {} page with template: {}", page, template_image);
        let generation = self
            .image_generator
            .generate_with_single_template(template_image, &prompt())
            .await;

        match generation.image_url() {
            Some(url) => {
                info!("✅ {} page generated: {}", page, url);
                PageOutcome::Generated {
                    page: page.to_string(),
                    url: url.to_string(),
                }
            }
            None => {
                error!("❌ Failed to generate {} page: {}", page, generation.error_message());
                PageOutcome::Failed {
                    page: page.to_string(),
                    error: generation.error_message().to_string(),
                }
            }
        }
    }

    async fn back_cover(&self, run: &ValidatedRun<'_>, request: &BookPagesRequest) -> PageOutcome {
        let page = "back-cover";
        let Some(image_url) = run
            .template
            .back_cover_image
            .as_deref()
            .filter(|url| !url.trim().is_empty())
        else {
            warn!("⚠️ Back cover template image not found in book template");
            return PageOutcome::Skipped {
                page: page.to_string(),
                reason: "no template image".to_string(),
            };
        };

        let values = BackCoverValues {
            child_name: &request.child_name,
            character_name: &request.character_name,
            app_name: &self.settings.app_name,
            isbn: &self.settings.barcode_isbn,
        };
        let overlay = BackCoverRequest {
            image_url: image_url.to_string(),
            text_blocks: build_text_blocks(&self.prompts.catalog().back_cover, &values),
            logo_url: self.logo_url(),
            barcode_isbn: Some(self.settings.barcode_isbn.clone()),
        };

        let generation = self.back_cover_compositor.compose_back_cover(overlay).await;
        match generation.image_url() {
            Some(url) => {
                info!("✅ Back cover generated: {}", url);
                PageOutcome::Generated {
                    page: page.to_string(),
                    url: url.to_string(),
                }
            }
            None => {
                error!("❌ Failed to generate back cover: {}", generation.error_message());
                PageOutcome::Failed {
                    page: page.to_string(),
                    error: generation.error_message().to_string(),
                }
            }
        }
    }
}

impl<G, C> BookPipeline<G, C>
where
    G: ImageGenerator,
    C: BackCoverCompositor,
{
    /// Logo under the public app origin; an unusable origin only drops the logo
    fn logo_url(&self) -> Option<String> {
        let origin = self.settings.public_app_url.as_deref()?;
        match logo_url_for(origin) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("⚠️ Back cover will have no logo: {}", e);
                None
            }
        }
    }
}

fn generated_url(outcome: &PageOutcome) -> Option<String> {
    match outcome {
        PageOutcome::Generated { url, .. } => Some(url.clone()),
        _ => None,
    }
}
