//! Book templates and story pages for pipeline tests

#![allow(dead_code)] // Not every test binary uses every fixture

use bookgen::BookPagesRequest;
use shared::{BookTemplate, StoryPage, StoryWorld};

pub const CHARACTER_IMAGE: &str = "https://cdn.test/characters/pip.png";

pub fn story_page_image(n: usize) -> String {
    format!("https://cdn.test/forest/page{n}.png")
}

/// Forest template with every page type and `story_images` story page images
pub fn forest_template(story_images: usize) -> BookTemplate {
    BookTemplate {
        id: "tpl-forest-1".to_string(),
        name: "Whispering Woods".to_string(),
        story_world: Some(StoryWorld::Forest),
        cover_image: Some("https://cdn.test/forest/cover.png".to_string()),
        copyright_page_image: Some("https://cdn.test/forest/copyright.png".to_string()),
        dedication_page_image: Some("https://cdn.test/forest/dedication.png".to_string()),
        story_page_images: (1..=story_images).map(story_page_image).collect(),
        last_story_page_image: Some("https://cdn.test/forest/last.png".to_string()),
        back_cover_image: Some("https://cdn.test/forest/back.png".to_string()),
        created_at: None,
    }
}

pub fn story_pages(count: u32) -> Vec<StoryPage> {
    (1..=count)
        .map(|n| StoryPage::new(n, format!("Page {n}: Pip explores a little further into the woods.")))
        .collect()
}

pub fn book_request(template: BookTemplate, pages: Vec<StoryPage>, story_pages_only: bool) -> BookPagesRequest {
    BookPagesRequest {
        template: Some(template),
        character_image_url: Some(CHARACTER_IMAGE.to_string()),
        child_name: "Ava".to_string(),
        character_name: "Pip".to_string(),
        dedication_message: "For Ava, our brave explorer".to_string(),
        story_pages: pages,
        story_world: "forest".to_string(),
        story_pages_only,
    }
}
