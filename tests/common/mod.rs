#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

use consult_site::config::SiteConfig;
use consult_site::server::{router, AppState};
use consult_site::store::{ContentError, ContentQueries, ContentStore, MemoryStore, StoreQuery};

pub fn fixtures() -> Value {
    json!({
        "posts": [
            {
                "_id": "post-b",
                "title": "Shipping LLM features safely",
                "slug": {"current": "shipping-llm-features"},
                "excerpt": "Guardrails that held up in production.",
                "author": "Dana Okafor",
                "category": "ai",
                "publishedAt": "2024-04-02T08:00:00Z",
                "content": [
                    {"_type": "block", "style": "h2", "children": [{"_type": "span", "text": "Start small"}]},
                    {"_type": "block", "style": "normal", "children": [{"_type": "span", "text": "Pick one workflow & measure it."}]},
                    {"_type": "callToAction", "label": "Talk to us"}
                ]
            },
            {
                "_id": "post-a",
                "title": "A year of platform work",
                "slug": {"current": "platform-year"},
                "excerpt": "What we learned running internal platforms.",
                "category": "cloud",
                "publishedAt": "2023-12-15T08:00:00Z",
                "readTime": 7
            },
            {
                "_id": "post-c",
                "title": "Data contracts in practice",
                "slug": {"current": "data-contracts"},
                "category": "data",
                "publishedAt": "2024-02-20T08:00:00Z"
            }
        ],
        "caseStudies": [
            {
                "_id": "cs-1",
                "title": "Claims triage for a regional insurer",
                "slug": {"current": "claims-triage"},
                "client": "Harbor Mutual",
                "industry": "finance",
                "overview": "Cut manual triage time in half.",
                "problem": [{"_type": "paragraph", "text": "Backlogs of <10k> claims."}],
                "solution": [{"_type": "list", "items": ["Model scoring", "Human review queue"]}],
                "results": {
                    "metrics": {"Triage time": "-52%", "Backlog": "0"},
                    "achievements": ["Live in 10 weeks"]
                },
                "technologies": ["Rust", "PostgreSQL"],
                "publishedAt": "2024-03-10T00:00:00Z"
            }
        ],
        "services": [
            {
                "_id": "svc-1",
                "title": "Cloud Migration",
                "slug": {"current": "cloud-migration"},
                "shortDescription": "Move workloads without downtime.",
                "icon": "cloud",
                "features": ["Assessment", "Landing zone", "Cutover plan"],
                "_createdAt": "2023-01-01T00:00:00Z"
            }
        ]
    })
}

pub fn config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.title = "Northwind Consulting".to_string();
    config.url = "https://northwind.example".to_string();
    config
}

pub fn memory_store() -> MemoryStore {
    MemoryStore::from_json(fixtures()).unwrap()
}

/// A store that is always down
pub struct FailingStore;

#[async_trait]
impl ContentStore for FailingStore {
    async fn fetch(&self, _query: &StoreQuery) -> Result<Value, ContentError> {
        Err(ContentError::Unavailable(
            "connect error: cms.internal:443".to_string(),
        ))
    }
}

pub fn app_with(store: Arc<dyn ContentStore>) -> Router {
    let state = AppState::new(config(), ContentQueries::new(store)).unwrap();
    // No static files in tests; unmatched paths fall through to a 404
    router(state, Path::new("tests/no-public-dir"))
}

pub fn app() -> Router {
    app_with(Arc::new(memory_store()))
}

pub fn failing_app() -> Router {
    app_with(Arc::new(FailingStore))
}

/// Send a GET request and collect status and body
pub async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}
