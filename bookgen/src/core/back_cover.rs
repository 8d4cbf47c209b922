//! Back cover text block layout

use serde::{Deserialize, Serialize};

use crate::core::prompt::replace_placeholders;
use crate::types::{TextAlignment, TextBlock};

/// Per-block overrides; unset fields keep the built-in layout
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockTemplate {
    pub text: Option<String>,
    pub font_size: Option<u32>,
    pub color_hex: Option<String>,
    pub y_position: Option<f32>,
    pub alignment: Option<TextAlignment>,
    pub shadow: Option<bool>,
    pub shadow_color: Option<String>,
    pub shadow_offset: Option<(i32, i32)>,
}

/// Back cover text dictionary, one entry per fixed slot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackCoverTemplate {
    pub title_line_one: Option<BlockTemplate>,
    pub title_line_two: Option<BlockTemplate>,
    pub description: Option<BlockTemplate>,
    pub tagline: Option<BlockTemplate>,
    pub website: Option<BlockTemplate>,
    pub isbn: Option<BlockTemplate>,
    pub age_range: Option<BlockTemplate>,
}

/// Values substituted into back cover text
#[derive(Debug, Clone, Default)]
pub struct BackCoverValues<'a> {
    pub child_name: &'a str,
    pub character_name: &'a str,
    pub app_name: &'a str,
    pub isbn: &'a str,
}

/// Fixed back cover slots in render order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackCoverSlot {
    TitleLineOne,
    TitleLineTwo,
    Description,
    Tagline,
    Website,
    Isbn,
    AgeRange,
}

impl BackCoverSlot {
    pub const ORDER: [BackCoverSlot; 7] = [
        BackCoverSlot::TitleLineOne,
        BackCoverSlot::TitleLineTwo,
        BackCoverSlot::Description,
        BackCoverSlot::Tagline,
        BackCoverSlot::Website,
        BackCoverSlot::Isbn,
        BackCoverSlot::AgeRange,
    ];

    fn overrides(self, template: &BackCoverTemplate) -> Option<&BlockTemplate> {
        match self {
            BackCoverSlot::TitleLineOne => template.title_line_one.as_ref(),
            BackCoverSlot::TitleLineTwo => template.title_line_two.as_ref(),
            BackCoverSlot::Description => template.description.as_ref(),
            BackCoverSlot::Tagline => template.tagline.as_ref(),
            BackCoverSlot::Website => template.website.as_ref(),
            BackCoverSlot::Isbn => template.isbn.as_ref(),
            BackCoverSlot::AgeRange => template.age_range.as_ref(),
        }
    }

    /// Literal layout used when the dictionary leaves a field unset
    fn fallback(self) -> TextBlock {
        let block = |text: &str, font_size: u32, color: &str, y: f32, alignment: TextAlignment, shadow: bool| TextBlock {
            text: text.to_string(),
            font_size,
            color_hex: color.to_string(),
            y_position: y,
            alignment,
            shadow,
            shadow_color: shadow.then(|| "#000000".to_string()),
            shadow_offset: shadow.then_some((2, 2)),
        };

        match self {
            BackCoverSlot::TitleLineOne => block("[CHARACTER_NAME]'s", 64, "#FFFFFF", 0.12, TextAlignment::Center, true),
            BackCoverSlot::TitleLineTwo => block("Big Adventure", 56, "#FFFFFF", 0.20, TextAlignment::Center, true),
            BackCoverSlot::Description => block(
                "A story made just for [CHILD_NAME]. Join [CHARACTER_NAME] on a magical journey full of wonder, courage and friendship.",
                28,
                "#FFFFFF",
                0.38,
                TextAlignment::Center,
                true,
            ),
            BackCoverSlot::Tagline => block(
                "Every child is the hero of their own story.",
                30,
                "#FFD700",
                0.56,
                TextAlignment::Center,
                true,
            ),
            BackCoverSlot::Website => block("Created with [APP_NAME]", 24, "#FFFFFF", 0.84, TextAlignment::Left, false),
            BackCoverSlot::Isbn => block("ISBN [ISBN]", 20, "#FFFFFF", 0.90, TextAlignment::Left, false),
            BackCoverSlot::AgeRange => block("Ages 3-8", 22, "#FFFFFF", 0.95, TextAlignment::Left, false),
        }
    }
}

/// Build the ordered text blocks for a back cover
pub fn build_text_blocks(template: &BackCoverTemplate, values: &BackCoverValues<'_>) -> Vec<TextBlock> {
    BackCoverSlot::ORDER
        .iter()
        .map(|slot| {
            let mut block = slot.fallback();
            if let Some(overrides) = slot.overrides(template) {
                apply_overrides(&mut block, overrides);
            }
            block.text = replace_placeholders(
                &block.text,
                &[
                    ("CHILD_NAME", values.child_name),
                    ("CHARACTER_NAME", values.character_name),
                    ("APP_NAME", values.app_name),
                    ("ISBN", values.isbn),
                ],
            );
            block.y_position = block.y_position.clamp(0.0, 1.0);
            block
        })
        .collect()
}

fn apply_overrides(block: &mut TextBlock, overrides: &BlockTemplate) {
    if let Some(text) = &overrides.text {
        block.text = text.clone();
    }
    if let Some(font_size) = overrides.font_size {
        block.font_size = font_size;
    }
    if let Some(color) = &overrides.color_hex {
        block.color_hex = color.clone();
    }
    if let Some(y) = overrides.y_position {
        block.y_position = y;
    }
    if let Some(alignment) = overrides.alignment {
        block.alignment = alignment;
    }
    if let Some(shadow) = overrides.shadow {
        block.shadow = shadow;
        if !shadow {
            block.shadow_color = None;
            block.shadow_offset = None;
        }
    }
    if let Some(color) = &overrides.shadow_color {
        block.shadow_color = Some(color.clone());
    }
    if let Some(offset) = overrides.shadow_offset {
        block.shadow_offset = Some(offset);
    }
}
