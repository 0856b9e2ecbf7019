//! consult-site: content core of a consultancy website
//!
//! Fetches posts, case studies and services from a headless content store,
//! renders their rich text to HTML, and serves pages, a content proxy
//! endpoint and the sitemap over axum.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod render;
pub mod server;
pub mod sitemap;
pub mod store;
pub mod templates;

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use store::{ContentQueries, ContentStore, HttpStore, MemoryStore};

/// The site application
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Static files directory
    pub public_dir: PathBuf,
    queries: ContentQueries,
}

impl Site {
    /// Create a site from a directory
    ///
    /// With `fixtures`, content is read from that JSON file instead of the
    /// remote store.
    pub fn new<P: AsRef<Path>>(base_dir: P, fixtures: Option<&Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::SiteConfig::load_from_dir(&base_dir)?;

        let store: Arc<dyn ContentStore> = match fixtures {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    base_dir.join(path)
                };
                tracing::info!("Using fixture content from {:?}", path);
                Arc::new(MemoryStore::load(&path)?)
            }
            None => Arc::new(HttpStore::new(config.store.clone())),
        };

        Ok(Self::with_store(config, base_dir, store))
    }

    /// Create a site over an explicit content store
    pub fn with_store(
        config: config::SiteConfig,
        base_dir: PathBuf,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
            queries: ContentQueries::new(store),
        }
    }

    /// The typed query layer
    pub fn queries(&self) -> ContentQueries {
        self.queries.clone()
    }

    /// Build the sitemap as of `now`
    pub async fn sitemap(&self, now: DateTime<Utc>) -> sitemap::Sitemap {
        sitemap::SitemapBuilder::new(&self.config, &self.queries)
            .build(now)
            .await
    }
}
