//! Pipeline request and wire payload types

use serde::{Deserialize, Serialize};
use shared::{BookTemplate, StoryPage};

/// Inputs for one book generation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookPagesRequest {
    pub template: Option<BookTemplate>,
    pub character_image_url: Option<String>,
    #[serde(default)]
    pub child_name: String,
    #[serde(default)]
    pub character_name: String,
    #[serde(default)]
    pub dedication_message: String,
    pub story_pages: Vec<StoryPage>,
    /// Catalog world key; unknown keys use the forest scenes
    #[serde(default)]
    pub story_world: String,
    /// Only generate story pages, skipping front matter and back cover
    #[serde(default)]
    pub story_pages_only: bool,
}

/// Horizontal alignment of an overlay text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// One line of text composited onto the back cover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    pub font_size: u32,
    pub color_hex: String,
    /// Normalized vertical position, 0.0 is the top edge
    pub y_position: f32,
    pub alignment: TextAlignment,
    pub shadow: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_offset: Option<(i32, i32)>,
}

/// Body of the back-cover overlay request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackCoverRequest {
    pub image_url: String,
    pub text_blocks: Vec<TextBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode_isbn: Option<String>,
}

/// Body of the single-template edit request
#[derive(Debug, Clone, Serialize)]
pub(crate) struct EditImageRequest<'a> {
    pub image_url: &'a str,
    pub prompt: &'a str,
}

/// Body of the two-template composite request
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CompositeImageRequest<'a> {
    pub template_cover_url: &'a str,
    pub character_image_url: &'a str,
    pub prompt: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StorageInfo {
    #[serde(default)]
    pub uploaded: bool,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EditImageResponse {
    #[serde(default)]
    pub storage_info: Option<StorageInfo>,
}

/// Response shape shared by the composite and overlay endpoints
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Inputs for story title suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryTitleRequest {
    pub character_name: String,
    pub special_ability: String,
    pub story_world: String,
    pub adventure_type: String,
    pub character_type: String,
    pub character_style: String,
    pub story_format: String,
    pub age_group: String,
}

impl StoryTitleRequest {
    pub fn new(
        character_name: impl Into<String>,
        special_ability: impl Into<String>,
        story_world: impl Into<String>,
        adventure_type: impl Into<String>,
    ) -> Self {
        Self {
            character_name: character_name.into(),
            special_ability: special_ability.into(),
            story_world: story_world.into(),
            adventure_type: adventure_type.into(),
            character_type: "person".to_string(),
            character_style: "cartoon".to_string(),
            story_format: "story".to_string(),
            age_group: "7-10".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StoryTitleResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub titles: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<String>,
}
