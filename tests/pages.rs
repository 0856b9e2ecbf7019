mod common;

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;

use common::{app, app_with, failing_app, get};
use consult_site::content::ContentKind;

#[tokio::test]
async fn test_post_detail_renders_blocks() {
    let (status, html) = get(app(), "/blog/shipping-llm-features").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>Shipping LLM features safely | Northwind Consulting</title>"));
    assert!(html.contains(r#"<h2 id="start-small">Start small</h2>"#));
    assert!(html.contains("<p>Pick one workflow &amp; measure it.</p>"));
    assert!(html.contains("April 02, 2024"));
    assert!(!html.contains("callToAction"));
}

#[tokio::test]
async fn test_case_study_detail_escapes_text() {
    let (status, html) = get(app(), "/case-studies/claims-triage").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Backlogs of &lt;10k&gt; claims."));
    assert!(html.contains("<li>Model scoring</li>"));
    assert!(html.contains("<dt>Triage time</dt><dd>-52%</dd>"));
}

#[tokio::test]
async fn test_unknown_slug_is_not_found() {
    let (status, html) = get(app(), "/services/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Not found"));

    // Slug lookup is exact
    let (status, _) = get(app(), "/blog/Platform-Year").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unsafe_slug_is_not_found_without_store_call() {
    let (status, _) = get(failing_app(), "/blog/..%2Fadmin").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_detail_falls_back_when_store_is_down() {
    let (status, html) = get(failing_app(), "/case-studies/claims-triage").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("not available"));
    assert!(!html.contains("cms.internal"));
}

#[tokio::test]
async fn test_index_pages() {
    let (status, html) = get(app(), "/blog").await;
    assert_eq!(status, StatusCode::OK);
    let newest = html.find("Shipping LLM features safely").unwrap();
    let oldest = html.find("A year of platform work").unwrap();
    assert!(newest < oldest);
    assert!(html.contains(r#"href="/blog/data-contracts""#));

    let (status, html) = get(failing_app(), "/services").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("not available"));
}

#[tokio::test]
async fn test_home_lists_recent_posts() {
    let (status, html) = get(app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Latest from the blog"));
    assert!(html.contains("Data contracts in practice"));
}

#[tokio::test]
async fn test_sitemap_and_robots() {
    let (status, xml) = get(app(), "/sitemap.xml").await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("<loc>https://northwind.example/</loc>"));
    assert!(xml.contains("<loc>https://northwind.example/blog/platform-year</loc>"));
    assert!(xml.contains("<loc>https://northwind.example/services/cloud-migration</loc>"));

    let (status, xml) = get(failing_app(), "/sitemap.xml").await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("<loc>https://northwind.example/</loc>"));
    assert!(!xml.contains("/blog/"));

    let (status, robots) = get(app(), "/robots.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert!(robots.contains("Sitemap: https://northwind.example/sitemap.xml"));
}

#[tokio::test]
async fn test_every_sitemap_detail_url_resolves() {
    let mut store = common::memory_store();
    store.insert(
        ContentKind::Post,
        json!({"_id": "post-d", "title": "Release notes", "slug": "release.v2", "publishedAt": "2024-05-01T00:00:00Z"}),
    );
    store.insert(
        ContentKind::Post,
        json!({"_id": "post-e", "title": "Spaced out", "slug": "spaced out", "publishedAt": "2024-05-02T00:00:00Z"}),
    );
    let store = Arc::new(store);

    let (_, xml) = get(app_with(store.clone()), "/sitemap.xml").await;
    assert!(xml.contains("/blog/release.v2</loc>"));
    assert!(!xml.contains("spaced"));

    let paths: Vec<String> = xml
        .lines()
        .filter_map(|line| line.trim().strip_prefix("<loc>https://northwind.example"))
        .filter_map(|rest| rest.strip_suffix("</loc>"))
        .filter(|path| path.matches('/').count() == 2)
        .map(str::to_string)
        .collect();
    assert_eq!(paths.len(), 6);

    for path in paths {
        let (status, _) = get(app_with(store.clone()), &path).await;
        assert_eq!(status, StatusCode::OK, "{}", path);
    }
}

#[tokio::test]
async fn test_unrouted_path_falls_through_to_static_files() {
    let (status, _) = get(app(), "/css/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
