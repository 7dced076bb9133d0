//! HTTP integration tests for gallery-server.
//!
//! These tests drive the full router with a mock color extractor and an
//! in-memory blob, covering the gallery, search, submission and delete flows.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use gallery_core::{
    DominantColor, ExtractError, ImageStore, Ingestor, MemoryBlobStore, MockColorExtractor,
};
use gallery_server::{create_router, AppState};
use serde_json::Value;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: AppState,
    blob: Arc<MemoryBlobStore>,
    extractor: Arc<MockColorExtractor>,
}

impl TestApp {
    fn new(extractor: MockColorExtractor) -> Self {
        let blob = Arc::new(MemoryBlobStore::new());
        let extractor = Arc::new(extractor);
        let ingestor = Ingestor::new(ImageStore::load(blob.clone()), extractor.clone());
        let state = AppState::new(ingestor);
        Self {
            router: create_router(state.clone()),
            state,
            blob,
            extractor,
        }
    }

    async fn get(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_form(&self, uri: &str, body: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn submit(&self, title: &str, url: &str) -> Response {
        let body = format!("title={}&url={}", encode(title), encode(url));
        self.post_form("/add-image-form", &body).await
    }

    async fn image_count(&self) -> usize {
        self.state.ingestor.list().await.len()
    }
}

/// Minimal form encoding for the characters these tests use.
fn encode(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('&', "%26")
        .replace('=', "%3D")
        .replace('+', "%2B")
        .replace(' ', "+")
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ============================================================================
// Health & Readiness Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let app = TestApp::new(MockColorExtractor::default());
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["images"], 0);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_ready_endpoint_returns_ok() {
    let app = TestApp::new(MockColorExtractor::default());
    let response = app.get("/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Gallery & Search Tests
// ============================================================================

#[tokio::test]
async fn test_home_lists_images() {
    let app = TestApp::new(MockColorExtractor::new(DominantColor::new(10, 20, 30)));
    app.submit("My Cat", "http://x/cat.png").await;
    app.submit("Dog", "http://x/dog.png").await;

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("My Cat"));
    assert!(html.contains("Dog"));
    assert!(html.contains("rgb(10, 20, 30)"));
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let app = TestApp::new(MockColorExtractor::default());
    app.submit("Cat at home", "http://x/cat.png").await;
    app.submit("Dog", "http://x/dog.png").await;

    let upper = body_text(app.get("/search?keyword=CAT").await).await;
    assert!(upper.contains("Cat at home"));
    assert!(!upper.contains("<h2>Dog</h2>"));

    let lower = body_text(app.get("/search?keyword=cat").await).await;
    assert!(lower.contains("Cat at home"));
    assert!(!lower.contains("<h2>Dog</h2>"));
}

#[tokio::test]
async fn test_search_without_keyword_lists_everything() {
    let app = TestApp::new(MockColorExtractor::default());
    app.submit("Cat", "http://x/cat.png").await;
    app.submit("Dog", "http://x/dog.png").await;

    for uri in ["/search", "/search?keyword="] {
        let html = body_text(app.get(uri).await).await;
        assert!(html.contains("<h2>Cat</h2>"), "{uri}");
        assert!(html.contains("<h2>Dog</h2>"), "{uri}");
    }
}

#[tokio::test]
async fn test_search_keyword_whitespace_is_significant() {
    let app = TestApp::new(MockColorExtractor::default());
    app.submit("Cat at home", "http://x/cat.png").await;
    app.submit("concatenate", "http://x/concat.png").await;

    let html = body_text(app.get("/search?keyword=cat+").await).await;
    assert!(html.contains("<h2>Cat at home</h2>"));
    assert!(!html.contains("<h2>concatenate</h2>"));

    let html = body_text(app.get("/search?keyword=+").await).await;
    assert!(html.contains("<h2>Cat at home</h2>"));
    assert!(!html.contains("<h2>concatenate</h2>"));
}

#[tokio::test]
async fn test_search_keyword_is_escaped() {
    let app = TestApp::new(MockColorExtractor::default());
    let html = body_text(app.get("/search?keyword=%3Cscript%3E").await).await;
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
}

// ============================================================================
// Submission Tests
// ============================================================================

#[tokio::test]
async fn test_form_page_renders() {
    let app = TestApp::new(MockColorExtractor::default());
    let response = app.get("/add-image-form").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"name="title""#));
    assert!(html.contains(r#"name="url""#));
}

#[tokio::test]
async fn test_submit_creates_image() {
    let app = TestApp::new(MockColorExtractor::new(DominantColor::new(10, 20, 30)));

    let response = app.submit("My Cat", "http://x/cat.png").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_text(response).await.contains("Image added"));

    let images = app.state.ingestor.list().await;
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].dominant_color, DominantColor::new(10, 20, 30));
    assert!(app.blob.contents().is_some());
}

#[tokio::test]
async fn test_submit_invalid_title_is_400() {
    let app = TestApp::new(MockColorExtractor::default());

    let long = "x".repeat(31);
    for title in ["", "bad!title", long.as_str()] {
        let response = app.submit(title, "http://x/cat.png").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{title:?}");
        assert!(body_text(response).await.starts_with("Invalid submission"));
    }

    assert_eq!(app.image_count().await, 0);
    assert_eq!(app.extractor.calls(), 0);
}

#[tokio::test]
async fn test_submit_non_http_url_is_400() {
    let app = TestApp::new(MockColorExtractor::default());

    for url in ["not a url", "ftp://x/cat.png", "   "] {
        let response = app.submit("Cat", url).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{url:?}");
        assert!(body_text(response).await.starts_with("Invalid submission"));
    }

    assert_eq!(app.image_count().await, 0);
    assert_eq!(app.extractor.calls(), 0);
}

#[tokio::test]
async fn test_submit_missing_fields_is_400() {
    let app = TestApp::new(MockColorExtractor::default());
    let response = app.post_form("/add-image-form", "").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_duplicate_renders_notice() {
    let app = TestApp::new(MockColorExtractor::default());
    app.submit("First", "http://x/a.png").await;

    let response = app.submit("Dup", "HTTP://X/A.PNG").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("already in the gallery"));
    assert!(html.contains("HTTP://X/A.PNG"));

    assert_eq!(app.image_count().await, 1);
    assert_eq!(app.extractor.calls(), 1);
}

#[tokio::test]
async fn test_submit_unsupported_image_is_advisory() {
    let app = TestApp::new(MockColorExtractor::default().with_error(
        "http://x/page.html",
        ExtractError::UnsupportedFormat("unrecognized image data".into()),
    ));

    let response = app.submit("Page", "http://x/page.html").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("could not get the dominant color"));
    assert_eq!(app.image_count().await, 0);
}

#[tokio::test]
async fn test_submit_extraction_failure_is_apology_page() {
    let app = TestApp::new(MockColorExtractor::default().with_error(
        "http://x/down.png",
        ExtractError::Network("connection refused to 10.1.2.3".into()),
    ));

    let response = app.submit("Down", "http://x/down.png").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(response).await;
    assert!(html.contains("home page"));
    assert!(!html.contains("10.1.2.3"));
}

#[tokio::test]
async fn test_submit_persistence_failure_is_apology_page() {
    let app = TestApp::new(MockColorExtractor::default());
    app.blob.set_fail_writes(true);

    let response = app.submit("Lost", "http://x/lost.png").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("home page"));
    assert_eq!(app.image_count().await, 0);
}

// ============================================================================
// Delete Tests
// ============================================================================

#[tokio::test]
async fn test_delete_removes_and_redirects() {
    let app = TestApp::new(MockColorExtractor::default());
    app.submit("Cat", "http://x/cat.png").await;
    let id = app.state.ingestor.list().await[0].id;

    let response = app.post_form(&format!("/images/{id}/delete"), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    assert_eq!(app.image_count().await, 0);
}

#[tokio::test]
async fn test_delete_unknown_id_still_redirects() {
    let app = TestApp::new(MockColorExtractor::default());
    app.submit("Cat", "http://x/cat.png").await;

    let response = app.post_form("/images/999/delete", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.image_count().await, 1);
}

#[tokio::test]
async fn test_delete_non_numeric_id_is_400() {
    let app = TestApp::new(MockColorExtractor::default());
    let response = app.post_form("/images/abc/delete", "").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Static & Fallback Tests
// ============================================================================

#[tokio::test]
async fn test_static_script_is_served() {
    let app = TestApp::new(MockColorExtractor::default());
    let response = app.get("/public/form.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("#message"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new(MockColorExtractor::default());
    let response = app.get("/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Nothing at /nope");
}

#[tokio::test]
async fn test_submit_wrong_content_type_is_400() {
    let app = TestApp::new(MockColorExtractor::default());
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/add-image-form")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"title":"Cat","url":"http://x/cat.png"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.image_count().await, 0);
}
