//! Server-rendered pages
//!
//! A missing document renders the 404 page. A store failure never reaches
//! the visitor: the page is rendered with the "not available" notice
//! instead.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::Datelike;
use tera::Context;

use super::AppState;
use crate::content::{CaseStudy, Document, Post, Service};
use crate::helpers::{encode_segment, is_valid_slug, truncate, url_for};
use crate::templates::{CardData, SiteData};

impl AppState {
    fn base_context(&self, page_title: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::from(self.config.as_ref()));
        context.insert("year", &chrono::Utc::now().year());
        context.insert("page_title", page_title);
        context.insert("page_description", "");
        context.insert("unavailable", &false);
        context
    }

    fn render_page(&self, status: StatusCode, template: &str, context: &Context) -> Response {
        match self.templates.render(template, context) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render {}: {:?}", template, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }

    pub(crate) fn not_found(&self) -> Response {
        let context = self.base_context("Not found");
        self.render_page(StatusCode::NOT_FOUND, "not_found.html", &context)
    }

    fn unavailable(&self, template: &str, page_title: &str) -> Response {
        let mut context = self.base_context(page_title);
        context.insert("unavailable", &true);
        context.insert("cards", &Vec::<CardData>::new());
        self.render_page(StatusCode::OK, template, &context)
    }

    fn detail_url(&self, prefix: &str, slug: &str) -> String {
        url_for(&self.config, &format!("{}/{}", prefix, encode_segment(slug)))
    }

    fn post_card(&self, post: &Post) -> CardData {
        CardData {
            title: post.title.clone(),
            url: self.detail_url(Post::KIND.path_prefix(), &post.slug),
            summary: post.excerpt.clone(),
            meta: format!(
                "{} · {} min read",
                post.published_at.format("%B %d, %Y"),
                post.read_time
            ),
            icon: String::new(),
            image: post.cover_image.as_ref().map(|c| c.url.clone()),
        }
    }

    fn case_study_card(&self, study: &CaseStudy) -> CardData {
        CardData {
            title: study.title.clone(),
            url: self.detail_url(CaseStudy::KIND.path_prefix(), &study.slug),
            summary: study.overview.clone(),
            meta: study.client.clone(),
            icon: String::new(),
            image: study.cover_image.as_ref().map(|c| c.url.clone()),
        }
    }

    fn service_card(&self, service: &Service) -> CardData {
        CardData {
            title: service.title.clone(),
            url: self.detail_url(Service::KIND.path_prefix(), &service.slug),
            summary: service.short_description.clone(),
            meta: String::new(),
            icon: service.icon.clone(),
            image: None,
        }
    }
}

/// Render an index page listing every document of `T`'s kind
async fn index_page<T, F>(state: &AppState, card: F) -> Response
where
    T: Document,
    F: Fn(&AppState, &T) -> CardData,
{
    let title = T::KIND.label();
    match state.queries.list::<T>().await {
        Ok(documents) => {
            let cards: Vec<CardData> = documents.iter().map(|doc| card(state, doc)).collect();
            let mut context = state.base_context(title);
            context.insert("cards", &cards);
            state.render_page(StatusCode::OK, "list.html", &context)
        }
        Err(e) => {
            tracing::warn!("Rendering {} index without content: {}", T::KIND, e);
            state.unavailable("list.html", title)
        }
    }
}

/// Render the detail page of the document at `slug`
async fn detail_page<T, F>(state: &AppState, slug: &str, template: &str, fill: F) -> Response
where
    T: Document,
    F: Fn(&AppState, &T, &mut Context),
{
    if !is_valid_slug(slug) {
        return state.not_found();
    }

    match state.queries.get::<T>(slug).await {
        Ok(Some(document)) => {
            let mut context = state.base_context(document.title());
            fill(state, &document, &mut context);
            state.render_page(StatusCode::OK, template, &context)
        }
        Ok(None) => state.not_found(),
        Err(e) => {
            tracing::warn!("Rendering {} {:?} without content: {}", T::KIND, slug, e);
            state.unavailable(template, T::KIND.label())
        }
    }
}

/// `GET /`
pub async fn home(State(state): State<AppState>) -> Response {
    let mut context = state.base_context("");
    match state.queries.list_recent_posts(state.config.recent_posts).await {
        Ok(posts) => {
            let cards: Vec<CardData> = posts.iter().map(|post| state.post_card(post)).collect();
            context.insert("cards", &cards);
        }
        Err(e) => {
            tracing::warn!("Rendering home without recent posts: {}", e);
            context.insert("unavailable", &true);
            context.insert("cards", &Vec::<CardData>::new());
        }
    }
    state.render_page(StatusCode::OK, "home.html", &context)
}

/// `GET /blog`
pub async fn post_index(State(state): State<AppState>) -> Response {
    index_page::<Post, _>(&state, AppState::post_card).await
}

/// `GET /blog/:slug`
pub async fn post_detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    detail_page::<Post, _>(&state, &slug, "post.html", |state, post, context| {
        context.insert("page_description", &description(&post.excerpt, || {
            post.content.plain_text()
        }));
        context.insert("post", post);
        context.insert("body", &state.blocks.render(&post.content));
    })
    .await
}

/// `GET /case-studies`
pub async fn case_study_index(State(state): State<AppState>) -> Response {
    index_page::<CaseStudy, _>(&state, AppState::case_study_card).await
}

/// `GET /case-studies/:slug`
pub async fn case_study_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    detail_page::<CaseStudy, _>(&state, &slug, "case_study.html", |state, study, context| {
        context.insert("page_description", &description(&study.overview, || {
            study.problem.plain_text()
        }));
        context.insert("study", study);
        context.insert("problem", &state.blocks.render(&study.problem));
        context.insert("solution", &state.blocks.render(&study.solution));
    })
    .await
}

/// `GET /services`
pub async fn service_index(State(state): State<AppState>) -> Response {
    index_page::<Service, _>(&state, AppState::service_card).await
}

/// `GET /services/:slug`
pub async fn service_detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    detail_page::<Service, _>(&state, &slug, "service.html", |state, service, context| {
        context.insert(
            "page_description",
            &description(&service.short_description, || {
                service.full_description.plain_text()
            }),
        );
        context.insert("service", service);
        context.insert("body", &state.blocks.render(&service.full_description));
    })
    .await
}

/// Meta description: the summary field, else the start of the body text
fn description<F: FnOnce() -> String>(summary: &str, body: F) -> String {
    let text = if summary.trim().is_empty() {
        body()
    } else {
        summary.to_string()
    };
    truncate(&text.split_whitespace().collect::<Vec<_>>().join(" "), 160, None)
}
