//! Book template loading and per-world selection

use std::path::Path;

use rand::seq::SliceRandom;
use shared::{BookTemplate, StoryWorld};
use tracing::debug;

use crate::error::{BookGenError, BookGenResult};

/// Load a list of templates from a JSON array file
pub fn load_templates(path: impl AsRef<Path>) -> BookGenResult<Vec<BookTemplate>> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let templates: Vec<BookTemplate> = serde_json::from_str(&raw)?;
    debug!("Loaded {} templates from {}", templates.len(), path.as_ref().display());
    Ok(templates)
}

/// Load a single template from a JSON object file
pub fn load_template(path: impl AsRef<Path>) -> BookGenResult<BookTemplate> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&raw)?)
}

/// Templates of a world that can serve as a cover base
pub fn templates_for_world(templates: &[BookTemplate], world: StoryWorld) -> Vec<&BookTemplate> {
    templates
        .iter()
        .filter(|t| t.story_world == Some(world) && t.has_cover())
        .collect()
}

/// Pick a random template of a world that has a cover image
pub fn select_template_for_world(templates: &[BookTemplate], world: StoryWorld) -> BookGenResult<&BookTemplate> {
    let candidates = templates_for_world(templates, world);
    let mut rng = rand::thread_rng();
    candidates
        .choose(&mut rng)
        .copied()
        .ok_or_else(|| BookGenError::NoTemplateForWorld { world: world.to_string() })
}
