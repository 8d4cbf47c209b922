//! Main entry point for the bookgen binary
//!
//! Wires the HTTP service implementations into the pipeline from
//! environment configuration and command line flags.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use bookgen::{
    core::{load_template, load_templates, select_template_for_world, LoggingProgress, PromptBuilder, PromptCatalog},
    BookPagesRequest, BookPipeline, HttpBackCoverCompositor, HttpImageClient, HttpStoryTitleClient, PipelineSettings,
    StoryTitleGenerator, StoryTitleRequest,
};
use shared::{logging, AppConfig, StoryPage, StoryWorld};

/// Children's book page generation against the image backend
#[derive(Parser)]
#[command(name = "bookgen")]
#[command(about = "Generates illustrated book pages from a template, a character and story text")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Backend origin, overrides BOOKGEN_BACKEND_URL
    #[arg(long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate page images for a book and print the result as JSON
    Generate(GenerateArgs),
    /// Ask the backend for story title suggestions
    Titles(TitlesArgs),
    /// Pick a random template for a story world
    PickTemplate(PickTemplateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Book template JSON file
    #[arg(long)]
    template: PathBuf,

    /// Story pages JSON file (array of {pageNumber, text})
    #[arg(long)]
    pages: PathBuf,

    /// Character image URL
    #[arg(long)]
    character_image: String,

    #[arg(long, default_value = "")]
    child_name: String,

    #[arg(long, default_value = "")]
    character_name: String,

    #[arg(long, default_value = "")]
    dedication: String,

    /// Story world key (forest, underwater, outerspace)
    #[arg(long, default_value = "forest")]
    world: String,

    /// Only generate story pages
    #[arg(long)]
    story_pages_only: bool,
}

#[derive(Args)]
struct TitlesArgs {
    #[arg(long)]
    character_name: String,

    #[arg(long, default_value = "")]
    special_ability: String,

    #[arg(long, default_value = "forest")]
    world: String,

    #[arg(long, default_value = "treasure_hunt")]
    adventure_type: String,
}

#[derive(Args)]
struct PickTemplateArgs {
    /// JSON file holding an array of book templates
    #[arg(long)]
    templates: PathBuf,

    #[arg(long)]
    world: StoryWorld,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(Some(&cli.log_level));

    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if let Some(backend_url) = cli.backend_url {
        config.backend_url = backend_url.trim_end_matches('/').to_string();
    }

    match cli.command {
        Command::Generate(args) => generate(&config, args).await,
        Command::Titles(args) => titles(&config, args).await,
        Command::PickTemplate(args) => pick_template(args),
    }
}

async fn generate(config: &AppConfig, args: GenerateArgs) -> anyhow::Result<()> {
    logging::log_startup(&format!("book generation against {}", config.backend_url));

    let catalog = match &config.prompts_file {
        Some(path) => PromptCatalog::load(path)
            .with_context(|| format!("Failed to load prompt catalog {}", path.display()))?,
        None => PromptCatalog::default(),
    };

    let template = load_template(&args.template)
        .with_context(|| format!("Failed to load template {}", args.template.display()))?;
    let pages_json = std::fs::read_to_string(&args.pages)
        .with_context(|| format!("Failed to read story pages {}", args.pages.display()))?;
    let story_pages: Vec<StoryPage> = serde_json::from_str(&pages_json).context("Invalid story pages JSON")?;

    let pipeline = BookPipeline::new(
        PromptBuilder::new(Arc::new(catalog)),
        HttpImageClient::from_config(config)?,
        HttpBackCoverCompositor::from_config(config)?,
        PipelineSettings::from_config(config),
    );

    let request = BookPagesRequest {
        template: Some(template),
        character_image_url: Some(args.character_image),
        child_name: args.child_name,
        character_name: args.character_name,
        dedication_message: args.dedication,
        story_pages,
        story_world: args.world,
        story_pages_only: args.story_pages_only,
    };

    let result = pipeline.generate_all_book_pages(request, Some(&LoggingProgress)).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(error) = &result.error {
        anyhow::bail!("Book generation failed: {}", error);
    }
    Ok(())
}

async fn titles(config: &AppConfig, args: TitlesArgs) -> anyhow::Result<()> {
    let client = HttpStoryTitleClient::from_config(config)?;
    let request = StoryTitleRequest::new(
        &args.character_name,
        &args.special_ability,
        &args.world,
        &args.adventure_type,
    );

    let titles = client.generate_titles(&request).await?;
    for title in titles {
        println!("{title}");
    }
    Ok(())
}

fn pick_template(args: PickTemplateArgs) -> anyhow::Result<()> {
    let templates = load_templates(&args.templates)
        .with_context(|| format!("Failed to load templates {}", args.templates.display()))?;
    let template = select_template_for_world(&templates, args.world)?;
    info!("Selected template {} ({})", template.name, template.id);
    println!("{}", serde_json::to_string_pretty(template)?);
    Ok(())
}
