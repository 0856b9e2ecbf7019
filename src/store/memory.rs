//! In-process content store backed by fixture documents
//!
//! Evaluates [`StoreQuery`] shapes directly over JSON documents laid out the
//! way the GROQ projections return them. Used for offline previews
//! (`--fixtures`) and tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::client::ContentStore;
use super::error::ContentError;
use super::query::{QueryShape, StoreQuery};
use super::recency_order;
use crate::content::ContentKind;

/// Fixture file layout
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Fixtures {
    posts: Vec<Value>,
    case_studies: Vec<Value>,
    services: Vec<Value>,
}

/// Content store holding documents in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    posts: Vec<Value>,
    case_studies: Vec<Value>,
    services: Vec<Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `{"posts": [...], "caseStudies": [...], "services": [...]}`
    pub fn from_json(value: Value) -> Result<Self> {
        let fixtures: Fixtures = serde_json::from_value(value)?;
        Ok(Self {
            posts: fixtures.posts,
            case_studies: fixtures.case_studies,
            services: fixtures.services,
        })
    }

    /// Load a fixture file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixtures {:?}", path))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fixtures {:?}", path))?;
        Self::from_json(value)
    }

    /// Add a document to a collection
    pub fn insert(&mut self, kind: ContentKind, document: Value) {
        self.documents_mut(kind).push(document);
    }

    fn documents(&self, kind: ContentKind) -> &[Value] {
        match kind {
            ContentKind::Post => &self.posts,
            ContentKind::CaseStudy => &self.case_studies,
            ContentKind::Service => &self.services,
        }
    }

    fn documents_mut(&mut self, kind: ContentKind) -> &mut Vec<Value> {
        match kind {
            ContentKind::Post => &mut self.posts,
            ContentKind::CaseStudy => &mut self.case_studies,
            ContentKind::Service => &mut self.services,
        }
    }

    /// Documents with a slug, newest first, ties by id
    fn ordered(&self, kind: ContentKind) -> Vec<&Value> {
        let field = kind.recency_field();
        let mut documents: Vec<&Value> = self
            .documents(kind)
            .iter()
            .filter(|doc| slug_of(doc).is_some())
            .collect();
        documents.sort_by(|a, b| {
            recency_order(
                (timestamp(a, field), id_of(a)),
                (timestamp(b, field), id_of(b)),
            )
        });
        documents
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn fetch(&self, query: &StoreQuery) -> Result<Value, ContentError> {
        let kind = query.kind;
        let result = match &query.shape {
            QueryShape::List => Value::Array(self.ordered(kind).into_iter().cloned().collect()),
            QueryShape::Recent(limit) => Value::Array(
                self.ordered(kind)
                    .into_iter()
                    .take(*limit)
                    .cloned()
                    .collect(),
            ),
            QueryShape::BySlug(slug) => self
                .documents(kind)
                .iter()
                .find(|doc| slug_of(doc) == Some(slug.as_str()))
                .cloned()
                .unwrap_or(Value::Null),
            QueryShape::Slugs => Value::Array(
                self.ordered(kind)
                    .into_iter()
                    .filter_map(|doc| slug_of(doc).map(|slug| Value::String(slug.to_string())))
                    .collect(),
            ),
        };
        Ok(result)
    }
}

fn slug_of(doc: &Value) -> Option<&str> {
    match doc.get("slug")? {
        Value::String(slug) => Some(slug.as_str()),
        slug => slug.get("current").and_then(Value::as_str),
    }
}

fn id_of(doc: &Value) -> &str {
    doc.get("_id").and_then(Value::as_str).unwrap_or_default()
}

fn timestamp(doc: &Value, field: &str) -> Option<DateTime<Utc>> {
    doc.get(field)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
