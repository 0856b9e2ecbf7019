//! Content proxy endpoint
//!
//! `GET /api/content?type=posts|case-studies|services` returns the whole
//! collection in a `{success, type, data, count}` envelope. Store failures
//! are logged and reported with a generic message only.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AppState;
use crate::content::{CaseStudy, ContentKind, Document, Post, Service};
use crate::store::{ContentError, ContentQueries};

/// Query parameters of the content proxy
#[derive(Debug, Deserialize)]
pub struct ContentParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Successful response body
#[derive(Debug, Serialize)]
pub struct ContentEnvelope<T> {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> ContentEnvelope<T> {
    fn new(kind: ContentKind, data: Vec<T>) -> Self {
        Self {
            success: true,
            kind: kind.selector(),
            count: data.len(),
            data,
        }
    }
}

/// Content proxy errors; the message is the whole response body
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing type parameter")]
    MissingType,

    #[error("Invalid type parameter")]
    InvalidType,

    #[error("Failed to fetch data from CMS")]
    Fetch(#[from] ContentError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingType | ApiError::InvalidType => StatusCode::BAD_REQUEST,
            ApiError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Fetch(source) = &self {
            tracing::error!("Content proxy fetch failed: {}", source);
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

/// Handle `GET /api/content`
pub async fn content_handler(
    State(state): State<AppState>,
    params: Result<Query<ContentParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| {
        tracing::debug!("Rejected content proxy query: {}", e);
        ApiError::InvalidType
    })?;
    let selector = params
        .kind
        .filter(|kind| !kind.is_empty())
        .ok_or(ApiError::MissingType)?;
    let kind: ContentKind = selector.parse().map_err(|_| ApiError::InvalidType)?;

    tracing::debug!("Content proxy request for {}", kind);

    match kind {
        ContentKind::Post => envelope::<Post>(&state.queries).await,
        ContentKind::CaseStudy => envelope::<CaseStudy>(&state.queries).await,
        ContentKind::Service => envelope::<Service>(&state.queries).await,
    }
}

async fn envelope<T: Document>(queries: &ContentQueries) -> Result<Response, ApiError> {
    let data = queries.list::<T>().await?;
    Ok(Json(ContentEnvelope::new(T::KIND, data)).into_response())
}
