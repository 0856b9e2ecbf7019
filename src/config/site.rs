//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub public_dir: String,

    // Routes
    pub static_routes: Vec<String>,

    // Home page
    pub recent_posts: usize,

    #[serde(default)]
    pub highlight: HighlightConfig,

    // Content store
    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Consultancy".to_string(),
            description: String::new(),
            author: String::new(),

            url: "http://localhost:3000".to_string(),
            root: "/".to_string(),

            public_dir: "public".to_string(),

            static_routes: vec![
                "/".to_string(),
                "/about".to_string(),
                "/services".to_string(),
                "/case-studies".to_string(),
                "/blog".to_string(),
                "/contact".to_string(),
            ],

            recent_posts: 3,

            highlight: HighlightConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load `_config.yml` from `base_dir` if present, then apply environment
    /// overrides to the store section
    pub fn load_from_dir<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let mut config = if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            Self::load(&config_path)?
        } else {
            Self::default()
        };

        config.store.apply_env();
        Ok(config)
    }
}

/// Content store connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Query the CDN-cached API instead of the live one
    pub use_cdn: bool,
    /// Read token for private datasets
    pub token: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            token: None,
        }
    }
}

impl StoreConfig {
    /// Override fields from `SANITY_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override fields from any variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(project_id) = lookup("SANITY_PROJECT_ID") {
            self.project_id = project_id;
        }
        if let Some(dataset) = lookup("SANITY_DATASET") {
            self.dataset = dataset;
        }
        if let Some(api_version) = lookup("SANITY_API_VERSION") {
            self.api_version = api_version;
        }
        if let Some(use_cdn) = lookup("SANITY_USE_CDN") {
            self.use_cdn = matches!(use_cdn.trim(), "1" | "true" | "yes");
        }
        if let Some(token) = lookup("SANITY_TOKEN") {
            self.token = Some(token).filter(|t| !t.is_empty());
        }
    }
}

/// Code block highlighting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: false,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}
