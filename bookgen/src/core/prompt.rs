//! Prompt catalog and page prompt rendering

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use shared::StoryWorld;
use tracing::debug;

use crate::core::back_cover::BackCoverTemplate;
use crate::error::BookGenResult;

/// Story text longer than this is cut before being used as scene context
const STORY_CONTEXT_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPagePrompts {
    /// Uses `{pageNumber}`, `{storyText}`, `{characterAction}`, `{sceneDescription}`
    pub base_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyrightPagePrompts {
    /// Uses `{mainText}` and `{footerText}`
    pub base_prompt: String,
    /// Uses `[CHILD_NAME]` and `[CHARACTER_NAME]`
    pub main_text: String,
    pub footer_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DedicationPagePrompts {
    /// Uses `{dedicationMessage}`
    pub base_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastWordPagePrompts {
    pub base_prompt: String,
}

/// Static prompt fragments for every page type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PromptCatalog {
    pub story_page: StoryPagePrompts,
    pub copyright_page: CopyrightPagePrompts,
    pub dedication_page: DedicationPagePrompts,
    pub last_word_page: LastWordPagePrompts,
    /// Scene descriptions per world key, index 0 is page 1
    pub world_scenes: BTreeMap<String, Vec<String>>,
    /// Character actions, index 0 is page 1
    pub character_actions: Vec<String>,
    pub default_character_action: String,
    pub back_cover: BackCoverTemplate,
}

impl Default for PromptCatalog {
    fn default() -> Self {
        let mut world_scenes = BTreeMap::new();
        world_scenes.insert(
            "forest".to_string(),
            vec![
                "The edge of an enchanted forest with tall glowing trees, soft golden light and a winding mossy path".to_string(),
                "Deep inside the enchanted forest among giant mushrooms, sparkling fireflies and friendly woodland animals".to_string(),
                "A hidden clearing beside a babbling brook with a wooden bridge and colourful wildflowers".to_string(),
                "An ancient wise tree at the heart of the forest with twisting roots and magical glowing runes".to_string(),
                "A joyful celebration in a sunlit meadow with woodland friends, lanterns and falling petals".to_string(),
            ],
        );
        world_scenes.insert(
            "underwater".to_string(),
            vec![
                "The sparkling surface of the ocean giving way to a gentle dive into clear turquoise water".to_string(),
                "A vibrant coral reef full of colourful fish, swaying sea plants and curious sea turtles".to_string(),
                "A sunken ship covered in shells and seaweed with rays of light streaming through the water".to_string(),
                "A glowing underwater palace with pearl towers, friendly dolphins and a shimmering gate".to_string(),
                "A festive underwater parade with sea creatures dancing among bubbles and glowing jellyfish".to_string(),
            ],
        );
        world_scenes.insert(
            "outerspace".to_string(),
            vec![
                "A space station or planet entrance with stars and cosmic elements".to_string(),
                "Deep space with planets, asteroids, and cosmic wonders".to_string(),
                "The surface of a colourful alien planet with crystal rocks and two moons in the sky".to_string(),
                "A swirling nebula near a friendly robot outpost with blinking lights and floating tools".to_string(),
                "A rocket launch celebration above the planet with fireworks among the stars".to_string(),
            ],
        );

        Self {
            story_page: StoryPagePrompts {
                base_prompt: "Create page {pageNumber} of a children's picture book. Use the first image as the background scene and place the character from the second image into it, keeping the character's face, colours and outfit exactly the same. Story text for this page: \"{storyText}\". Character action: {characterAction}. Scene: {sceneDescription}. Bright, warm, friendly illustration suitable for young children. Do not draw any text on the image.".to_string(),
            },
            copyright_page: CopyrightPagePrompts {
                base_prompt: "Edit this copyright page. Replace the main text block with: \"{mainText}\". Replace the footer text with: \"{footerText}\". Keep the layout, fonts, colours and decorations unchanged.".to_string(),
                main_text: "This book was made especially for [CHILD_NAME], starring [CHARACTER_NAME].".to_string(),
                footer_text: "Copyright Drawtopia. All rights reserved. No part of this book may be reproduced without permission.".to_string(),
            },
            dedication_page: DedicationPagePrompts {
                base_prompt: "Edit this dedication page. Write the following dedication message in the centre of the page in a warm handwritten style: \"{dedicationMessage}\". Keep the decorations and background unchanged.".to_string(),
            },
            last_word_page: LastWordPagePrompts {
                base_prompt: "Edit this final page of the book. Replace the closing message with \"The End. Thank you for reading, [CHILD_NAME]!\" in a playful rounded font. Keep the layout and decorations unchanged.".to_string(),
            },
            world_scenes,
            character_actions: vec![
                "Character is discovering or entering a new world, looking curious and excited".to_string(),
                "Character is exploring and observing the environment, engaged and attentive".to_string(),
                "Character is actively involved in the adventure, showing determination".to_string(),
                "Character is using their special ability or solving the main challenge, confident and heroic".to_string(),
                "Character is celebrating success or reflecting on their journey, happy and fulfilled".to_string(),
            ],
            default_character_action: "Character is actively participating in the scene".to_string(),
            back_cover: BackCoverTemplate::default(),
        }
    }
}

impl PromptCatalog {
    /// Load a catalog from JSON; missing sections keep the built-in text
    pub fn load(path: impl AsRef<Path>) -> BookGenResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let catalog = serde_json::from_str(&raw)?;
        debug!("Loaded prompt catalog from {}", path.as_ref().display());
        Ok(catalog)
    }
}

/// Replace every `[KEY]` token with its value
pub fn replace_placeholders(text: &str, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .fold(text.to_string(), |acc, (key, value)| acc.replace(&format!("[{key}]"), value))
}

/// Replace the first occurrence of each `{field}` token
pub fn fill_fields(text: &str, fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .fold(text.to_string(), |acc, (field, value)| {
            acc.replacen(&format!("{{{field}}}"), value, 1)
        })
}

/// `[PLACEHOLDER]` tokens still present in a rendered prompt
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let pattern = PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\[[A-Z][A-Z0-9_]*\]").expect("placeholder pattern is valid")
    });
    pattern.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Renders page prompts from an immutable catalog
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    catalog: Arc<PromptCatalog>,
}

impl PromptBuilder {
    pub fn new(catalog: Arc<PromptCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PromptCatalog {
        &self.catalog
    }

    pub fn copyright_page(&self, child_name: &str, character_name: &str) -> String {
        let prompts = &self.catalog.copyright_page;
        let main_text = replace_placeholders(
            &prompts.main_text,
            &[("CHILD_NAME", child_name), ("CHARACTER_NAME", character_name)],
        );
        let prompt = fill_fields(
            &prompts.base_prompt,
            &[("mainText", main_text.as_str()), ("footerText", prompts.footer_text.as_str())],
        );
        Self::checked(prompt, "copyright")
    }

    pub fn dedication_page(&self, dedication_message: &str) -> String {
        let prompt = fill_fields(
            &self.catalog.dedication_page.base_prompt,
            &[("dedicationMessage", dedication_message)],
        );
        Self::checked(prompt, "dedication")
    }

    pub fn story_page(
        &self,
        page_number: u32,
        story_text: &str,
        character_action: &str,
        scene_description: &str,
    ) -> String {
        let page = page_number.to_string();
        let prompt = fill_fields(
            &self.catalog.story_page.base_prompt,
            &[
                ("pageNumber", page.as_str()),
                ("storyText", story_text),
                ("characterAction", character_action),
                ("sceneDescription", scene_description),
            ],
        );
        Self::checked(prompt, "story")
    }

    /// The last-word template keeps its placeholder; the model is told the value
    pub fn last_word_page(&self, child_name: &str) -> String {
        format!(
            "{}\n\nReplace [CHILD_NAME] with: {}",
            self.catalog.last_word_page.base_prompt, child_name
        )
    }

    /// Pose for the character on a given page
    pub fn character_action(&self, page_number: u32) -> &str {
        page_number
            .checked_sub(1)
            .and_then(|index| self.catalog.character_actions.get(index as usize))
            .unwrap_or(&self.catalog.default_character_action)
    }

    /// Scene for a page in a world, optionally with a story excerpt appended
    pub fn scene_description(&self, page_number: u32, story_world: &str, story_text: Option<&str>) -> String {
        // Keys match the catalog exactly; aliases and other casings use forest
        let scenes = self
            .catalog
            .world_scenes
            .get(story_world)
            .or_else(|| self.catalog.world_scenes.get(StoryWorld::Forest.as_key()));

        let base = scenes
            .zip(page_number.checked_sub(1))
            .and_then(|(scenes, index)| scenes.get(index as usize))
            .cloned()
            .unwrap_or_else(|| format!("Scene {page_number} in {story_world}"));

        match story_text {
            Some(text) if !text.trim().is_empty() => {
                format!("{base}. Story context: {}", story_excerpt(text))
            }
            _ => base,
        }
    }

    fn checked(prompt: String, page: &str) -> String {
        let leftovers = unresolved_placeholders(&prompt);
        if !leftovers.is_empty() {
            debug!("Unresolved placeholders in {} prompt: {:?}", page, leftovers);
        }
        prompt
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(Arc::new(PromptCatalog::default()))
    }
}

/// First 100 characters of the story text, with an ellipsis when cut
fn story_excerpt(text: &str) -> String {
    match text.char_indices().nth(STORY_CONTEXT_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_placeholders_replaces_every_occurrence() {
        let text = "[NAME] meets [NAME] and [OTHER]";
        let out = replace_placeholders(text, &[("NAME", "Ava")]);
        assert_eq!(out, "Ava meets Ava and [OTHER]");
        assert_eq!(unresolved_placeholders(&out), vec!["[OTHER]".to_string()]);
    }

    #[test]
    fn test_fill_fields_replaces_first_occurrence_only() {
        let out = fill_fields("{a} then {a} and {b}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x then {a} and y");

        let untouched = fill_fields("no fields here", &[("a", "x")]);
        assert_eq!(untouched, "no fields here");
    }

    #[test]
    fn test_copyright_prompt_substitutes_names() {
        let builder = PromptBuilder::default();
        let prompt = builder.copyright_page("Ava", "Captain Whiskers");

        assert!(prompt.contains("made especially for Ava, starring Captain Whiskers"));
        assert!(prompt.contains(&builder.catalog().copyright_page.footer_text));
        assert!(!prompt.contains("{mainText}"));
        assert!(unresolved_placeholders(&prompt).is_empty());
    }

    #[test]
    fn test_dedication_and_last_word_prompts() {
        let builder = PromptBuilder::default();

        let dedication = builder.dedication_page("For Ava, with love from Grandma");
        assert!(dedication.contains("\"For Ava, with love from Grandma\""));

        let last = builder.last_word_page("Ava");
        assert!(last.ends_with("\n\nReplace [CHILD_NAME] with: Ava"));
    }

    #[test]
    fn test_story_prompt_fills_all_fields() {
        let builder = PromptBuilder::default();
        let prompt = builder.story_page(3, "The fox found a key.", "Character runs", "A meadow");

        assert!(prompt.starts_with("Create page 3 "));
        assert!(prompt.contains("\"The fox found a key.\""));
        assert!(prompt.contains("Character action: Character runs."));
        assert!(prompt.contains("Scene: A meadow."));
    }

    #[test]
    fn test_character_actions_by_page() {
        let builder = PromptBuilder::default();
        assert!(builder.character_action(1).contains("discovering"));
        assert!(builder.character_action(5).contains("celebrating"));
        assert_eq!(builder.character_action(6), "Character is actively participating in the scene");
        assert_eq!(builder.character_action(0), "Character is actively participating in the scene");
    }

    #[test]
    fn test_scene_lookup_and_fallbacks() {
        let builder = PromptBuilder::default();

        assert_eq!(
            builder.scene_description(1, "outerspace", None),
            "A space station or planet entrance with stars and cosmic elements"
        );
        assert_eq!(
            builder.scene_description(2, "outerspace", None),
            "Deep space with planets, asteroids, and cosmic wonders"
        );
        // Unknown world falls back to the forest table
        assert_eq!(
            builder.scene_description(1, "desert", None),
            builder.scene_description(1, "forest", None)
        );
        // Unknown page falls back to the generic text
        assert_eq!(builder.scene_description(7, "underwater", None), "Scene 7 in underwater");
        assert_eq!(builder.scene_description(9, "desert", None), "Scene 9 in desert");
    }

    #[test]
    fn test_scene_world_key_is_matched_exactly() {
        let builder = PromptBuilder::default();
        let forest = builder.scene_description(1, "forest", None);

        // The story world alias and capitalised keys are not catalog keys
        assert_eq!(builder.scene_description(1, "space", None), forest);
        assert_eq!(builder.scene_description(1, "Underwater", None), forest);
        assert_eq!(builder.scene_description(1, " outerspace", None), forest);
        assert_eq!(builder.scene_description(8, "space", None), "Scene 8 in space");
    }

    #[test]
    fn test_scene_description_appends_story_context() {
        let builder = PromptBuilder::default();

        let short = builder.scene_description(6, "forest", Some("A short tale."));
        assert_eq!(short, "Scene 6 in forest. Story context: A short tale.");

        let blank = builder.scene_description(6, "forest", Some("   "));
        assert_eq!(blank, "Scene 6 in forest");

        let long_text = "a".repeat(150);
        let long = builder.scene_description(6, "forest", Some(&long_text));
        assert_eq!(long, format!("Scene 6 in forest. Story context: {}...", "a".repeat(100)));

        let exact = "b".repeat(100);
        let exact_out = builder.scene_description(6, "forest", Some(&exact));
        assert!(!exact_out.ends_with("..."));
    }

    #[test]
    fn test_story_excerpt_respects_char_boundaries() {
        let text = "é".repeat(120);
        let excerpt = story_excerpt(&text);
        assert_eq!(excerpt.chars().count(), 103);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_partial_catalog_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        std::fs::write(
            &path,
            r#"{"dedicationPage": {"basePrompt": "Write {dedicationMessage} big"}, "characterActions": ["Waving"]}"#,
        )
        .unwrap();

        let catalog = PromptCatalog::load(&path).unwrap();
        let builder = PromptBuilder::new(Arc::new(catalog));

        assert_eq!(builder.dedication_page("Hi"), "Write Hi big");
        assert_eq!(builder.character_action(1), "Waving");
        assert_eq!(builder.character_action(2), "Character is actively participating in the scene");
        assert!(builder.copyright_page("A", "B").contains("starring B"));
    }

    #[test]
    fn test_malformed_catalog_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(PromptCatalog::load(&path).is_err());
        assert!(PromptCatalog::load(dir.path().join("missing.json")).is_err());
    }
}
