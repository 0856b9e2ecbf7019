//! Store module - typed read access to the content store
//!
//! [`ContentQueries`] is the query layer used by the server, the sitemap
//! and the CLI. Each operation is one round trip through the injected
//! [`ContentStore`]; nothing is retried or cached here. The one exception is
//! `recent`: when malformed records leave it short, it reads the whole
//! collection once more and takes the newest valid records from that.

mod client;
mod error;
mod memory;
mod query;

pub use client::{ContentStore, HttpStore};
pub use error::ContentError;
pub use memory::MemoryStore;
pub use query::{QueryShape, StoreQuery};

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::content::{CaseStudy, Document, Post, Service};

/// Newest first, undated last, ties by id ascending
pub(crate) fn recency_order(
    a: (Option<DateTime<Utc>>, &str),
    b: (Option<DateTime<Utc>>, &str),
) -> Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1))
}

/// Query layer over a content store
#[derive(Clone)]
pub struct ContentQueries {
    store: Arc<dyn ContentStore>,
}

impl ContentQueries {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Every document of `T`'s kind, newest first
    pub async fn list<T: Document>(&self) -> Result<Vec<T>, ContentError> {
        let result = self.store.fetch(&StoreQuery::list(T::KIND)).await?;
        decode_list(result)
    }

    /// The first `limit` valid documents of `T`'s kind, newest first
    pub async fn recent<T: Document>(&self, limit: usize) -> Result<Vec<T>, ContentError> {
        let result = self
            .store
            .fetch(&StoreQuery::recent(T::KIND, limit))
            .await?;
        let (mut documents, skipped) = decode_items(result)?;

        if skipped > 0 && documents.len() < limit {
            tracing::debug!(
                "{} malformed among recent {}, reading the full collection",
                skipped,
                T::KIND
            );
            documents = self.list().await?;
        }

        documents.truncate(limit);
        Ok(documents)
    }

    /// The document whose slug equals `slug`, case-sensitively
    pub async fn get<T: Document>(&self, slug: &str) -> Result<Option<T>, ContentError> {
        let result = self
            .store
            .fetch(&StoreQuery::by_slug(T::KIND, slug))
            .await?;
        if result.is_null() {
            return Ok(None);
        }

        let mut document: T = serde_json::from_value(result)?;
        if document.slug() != slug {
            tracing::warn!(
                "Store returned {:?} for {} slug {:?}",
                document.slug(),
                T::KIND,
                slug
            );
            return Ok(None);
        }
        document.normalize();
        Ok(Some(document))
    }

    /// Slugs of every document of `T`'s kind
    pub async fn slugs<T: Document>(&self) -> Result<Vec<String>, ContentError> {
        let result = self.store.fetch(&StoreQuery::slugs(T::KIND)).await?;
        let Value::Array(items) = result else {
            return Err(ContentError::Malformed(format!(
                "expected a list of {} slugs",
                T::KIND
            )));
        };

        Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(slug) if !slug.is_empty() => Some(slug),
                _ => None,
            })
            .collect())
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, ContentError> {
        self.list().await
    }

    pub async fn get_post(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        self.get(slug).await
    }

    pub async fn list_post_slugs(&self) -> Result<Vec<String>, ContentError> {
        self.slugs::<Post>().await
    }

    pub async fn list_recent_posts(&self, limit: usize) -> Result<Vec<Post>, ContentError> {
        self.recent(limit).await
    }

    pub async fn list_case_studies(&self) -> Result<Vec<CaseStudy>, ContentError> {
        self.list().await
    }

    pub async fn get_case_study(&self, slug: &str) -> Result<Option<CaseStudy>, ContentError> {
        self.get(slug).await
    }

    pub async fn list_case_study_slugs(&self) -> Result<Vec<String>, ContentError> {
        self.slugs::<CaseStudy>().await
    }

    pub async fn list_recent_case_studies(
        &self,
        limit: usize,
    ) -> Result<Vec<CaseStudy>, ContentError> {
        self.recent(limit).await
    }

    pub async fn list_services(&self) -> Result<Vec<Service>, ContentError> {
        self.list().await
    }

    pub async fn get_service(&self, slug: &str) -> Result<Option<Service>, ContentError> {
        self.get(slug).await
    }

    pub async fn list_service_slugs(&self) -> Result<Vec<String>, ContentError> {
        self.slugs::<Service>().await
    }

    pub async fn list_recent_services(&self, limit: usize) -> Result<Vec<Service>, ContentError> {
        self.recent(limit).await
    }
}

/// Decode a list result, skipping records that fail to decode
fn decode_list<T: Document>(result: Value) -> Result<Vec<T>, ContentError> {
    decode_items(result).map(|(documents, _)| documents)
}

/// Decoded documents, newest first, and the number of records skipped
fn decode_items<T: Document>(result: Value) -> Result<(Vec<T>, usize), ContentError> {
    let Value::Array(items) = result else {
        return Err(ContentError::Malformed(format!(
            "expected a list of {} documents",
            T::KIND
        )));
    };

    let total = items.len();
    let mut documents: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(mut document) => {
                document.normalize();
                Some(document)
            }
            Err(e) => {
                tracing::warn!("Skipping malformed {} document: {}", T::KIND, e);
                None
            }
        })
        .collect();

    documents.sort_by(|a, b| recency_order((a.recency(), a.id()), (b.recency(), b.id())));
    let skipped = total - documents.len();
    Ok((documents, skipped))
}
