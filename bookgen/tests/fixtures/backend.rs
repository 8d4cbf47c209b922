//! Mock image backend for pipeline tests

#![allow(dead_code)] // Not every test binary uses every fixture

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bookgen::core::PromptBuilder;
use bookgen::{BookPipeline, HttpBackCoverCompositor, HttpImageClient, PipelineSettings};

pub type HttpPipeline = BookPipeline<HttpImageClient, HttpBackCoverCompositor>;

/// Pipeline using the real HTTP clients against a mock server
pub fn http_pipeline(server: &MockServer) -> HttpPipeline {
    http_pipeline_with(server, PromptBuilder::default(), PipelineSettings::default())
}

pub fn http_pipeline_with(server: &MockServer, prompts: PromptBuilder, settings: PipelineSettings) -> HttpPipeline {
    BookPipeline::new(
        prompts,
        HttpImageClient::new(server.uri()),
        HttpBackCoverCompositor::new(server.uri()),
        settings,
    )
}

/// Signed storage URL as the backend returns it
pub fn signed_url(name: &str) -> String {
    format!("https://storage.test/books/{name}.png?X-Amz-Signature=abc123&X-Amz-Expires=3600")
}

pub fn stored_url(name: &str) -> String {
    format!("https://storage.test/books/{name}.png")
}

/// Single-template edits succeed, named after the template image
pub async fn mount_edit_image_success(server: &MockServer, template_url: &str, output: &str) {
    Mock::given(method("POST"))
        .and(path("/edit-image"))
        .and(body_partial_json(json!({ "image_url": template_url })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "storage_info": { "uploaded": true, "url": signed_url(output) }
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Two-template composite for one story page template
pub async fn mount_story_page_success(server: &MockServer, template_url: &str, output: &str) {
    Mock::given(method("POST"))
        .and(path("/generate-cover-image"))
        .and(body_partial_json(json!({ "template_cover_url": template_url })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "url": signed_url(output)
        })))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_story_page_status(server: &MockServer, template_url: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path("/generate-cover-image"))
        .and(body_partial_json(json!({ "template_cover_url": template_url })))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_overlay_success(server: &MockServer, output: &str) {
    Mock::given(method("POST"))
        .and(path("/overlay-back-cover/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "url": signed_url(output)
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Fails the test if the endpoint is hit at all
pub async fn forbid_endpoint(server: &MockServer, endpoint: &str) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// Every front and closing page of a forest book succeeds
pub async fn mount_book_extras(server: &MockServer) {
    mount_edit_image_success(server, "https://cdn.test/forest/copyright.png", "copyright").await;
    mount_edit_image_success(server, "https://cdn.test/forest/dedication.png", "dedication").await;
    mount_edit_image_success(server, "https://cdn.test/forest/last.png", "last-word").await;
    mount_overlay_success(server, "back-cover").await;
}
