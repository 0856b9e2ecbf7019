//! HTTP server: content proxy, sitemap and pages

mod api;
mod pages;

use anyhow::Result;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use api::{content_handler, ApiError, ContentEnvelope, ContentParams};

use crate::config::SiteConfig;
use crate::helpers::full_url_for;
use crate::render::BlockRenderer;
use crate::sitemap::SitemapBuilder;
use crate::store::ContentQueries;
use crate::templates::TemplateRenderer;
use crate::Site;

/// Shared, immutable request state
#[derive(Clone)]
pub struct AppState {
    pub queries: ContentQueries,
    pub config: Arc<SiteConfig>,
    pub templates: Arc<TemplateRenderer>,
    pub blocks: Arc<BlockRenderer>,
}

impl AppState {
    pub fn new(config: SiteConfig, queries: ContentQueries) -> Result<Self> {
        let blocks = if config.highlight.enable {
            BlockRenderer::with_highlighting(&config.highlight.theme)
        } else {
            BlockRenderer::new()
        };

        Ok(Self {
            queries,
            config: Arc::new(config),
            templates: Arc::new(TemplateRenderer::new()?),
            blocks: Arc::new(blocks),
        })
    }
}

/// Build the application router
///
/// Unknown paths fall through to the files under `public_dir`.
pub fn router(state: AppState, public_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/api/content", get(content_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/robots.txt", get(robots_handler))
        .route("/", get(pages::home))
        .route("/blog", get(pages::post_index))
        .route("/blog/:slug", get(pages::post_detail))
        .route("/case-studies", get(pages::case_study_index))
        .route("/case-studies/:slug", get(pages::case_study_detail))
        .route("/services", get(pages::service_index))
        .route("/services/:slug", get(pages::service_detail))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let state = AppState::new(site.config.clone(), site.queries())?;
    let app = router(state, &site.public_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    tracing::info!("Serving {:?}", site.public_dir);
    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `GET /sitemap.xml`
async fn sitemap_handler(State(state): State<AppState>) -> Response {
    let sitemap = SitemapBuilder::new(&state.config, &state.queries)
        .build(chrono::Utc::now())
        .await;

    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap.to_xml(),
    )
        .into_response()
}

/// `GET /robots.txt`
async fn robots_handler(State(state): State<AppState>) -> Response {
    let body = format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n",
        full_url_for(&state.config, "/sitemap.xml")
    );
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}
