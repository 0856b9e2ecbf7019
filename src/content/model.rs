//! Post, case study and service records

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::block::Blocks;
use super::kind::ContentKind;

/// Reading speed used to estimate `readTime` when the store omits it
const WORDS_PER_MINUTE: usize = 200;

/// A record read from one of the store's collections
pub trait Document: for<'de> Deserialize<'de> + Serialize + Send + Sync + 'static {
    const KIND: ContentKind;

    /// Store-assigned id
    fn id(&self) -> &str;

    fn slug(&self) -> &str;

    fn title(&self) -> &str;

    /// Timestamp ordering the collection, newest first
    fn recency(&self) -> Option<DateTime<Utc>>;

    /// Fill derived fields after decoding
    fn normalize(&mut self) {}
}

/// Cover image reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRef {
    pub url: String,
    pub alt: String,
}

/// Blog category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Category {
    Ai,
    WebDevelopment,
    Cloud,
    Data,
    Strategy,
    Security,
    #[default]
    Other,
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ai" => Category::Ai,
            "web-development" => Category::WebDevelopment,
            "cloud" => Category::Cloud,
            "data" => Category::Data,
            "strategy" => Category::Strategy,
            "security" => Category::Security,
            _ => Category::Other,
        }
    }
}

/// Case study industry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Industry {
    Healthcare,
    Finance,
    Retail,
    Technology,
    Manufacturing,
    Education,
    #[default]
    Other,
}

impl From<String> for Industry {
    fn from(value: String) -> Self {
        match value.as_str() {
            "healthcare" => Industry::Healthcare,
            "finance" => Industry::Finance,
            "retail" => Industry::Retail,
            "technology" => Industry::Technology,
            "manufacturing" => Industry::Manufacturing,
            "education" => Industry::Education,
            _ => Industry::Other,
        }
    }
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,

    #[serde(deserialize_with = "slug_field")]
    pub slug: String,

    #[serde(default)]
    pub excerpt: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub category: Category,

    #[serde(default)]
    pub cover_image: Option<ImageRef>,

    #[serde(default)]
    pub content: Blocks,

    pub published_at: DateTime<Utc>,

    /// Minutes; estimated from `content` when the store has none
    #[serde(default)]
    pub read_time: u32,
}

impl Document for Post {
    const KIND: ContentKind = ContentKind::Post;

    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn recency(&self) -> Option<DateTime<Utc>> {
        Some(self.published_at)
    }

    fn normalize(&mut self) {
        if self.read_time == 0 {
            self.read_time = estimate_read_time(&self.content);
        }
    }
}

/// Outcome metrics of a case study
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseStudyResults {
    /// Metric label to value, in authored order
    pub metrics: IndexMap<String, String>,
    pub achievements: Vec<String>,
}

/// A client case study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,

    #[serde(deserialize_with = "slug_field")]
    pub slug: String,

    #[serde(default)]
    pub client: String,

    #[serde(default)]
    pub industry: Industry,

    #[serde(default)]
    pub overview: String,

    #[serde(default)]
    pub problem: Blocks,

    #[serde(default)]
    pub solution: Blocks,

    #[serde(default)]
    pub results: CaseStudyResults,

    #[serde(default)]
    pub cover_image: Option<ImageRef>,

    #[serde(default)]
    pub duration: String,

    #[serde(default)]
    pub technologies: Vec<String>,

    pub published_at: DateTime<Utc>,
}

impl Document for CaseStudy {
    const KIND: ContentKind = ContentKind::CaseStudy;

    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn recency(&self) -> Option<DateTime<Utc>> {
        Some(self.published_at)
    }
}

/// A consulting service offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,

    #[serde(deserialize_with = "slug_field")]
    pub slug: String,

    #[serde(default)]
    pub short_description: String,

    #[serde(default)]
    pub icon: String,

    #[serde(default)]
    pub full_description: Blocks,

    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub cover_image: Option<ImageRef>,

    #[serde(rename = "_createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Service {
    /// Services are authored with at least three features
    pub const MIN_FEATURES: usize = 3;

    pub fn has_minimum_features(&self) -> bool {
        self.features.len() >= Self::MIN_FEATURES
    }
}

impl Document for Service {
    const KIND: ContentKind = ContentKind::Service;

    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn recency(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn normalize(&mut self) {
        if !self.has_minimum_features() {
            tracing::warn!(
                "Service {:?} has {} features, expected at least {}",
                self.slug,
                self.features.len(),
                Self::MIN_FEATURES
            );
        }
    }
}

/// Minutes needed to read `content`, at least one
pub fn estimate_read_time(content: &Blocks) -> u32 {
    let words = content.word_count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Slugs arrive either flattened or as Sanity's `{ "current": "..." }`
fn slug_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(slug) => Ok(slug),
        Value::Object(map) => match map.get("current") {
            Some(Value::String(slug)) => Ok(slug.clone()),
            _ => Err(serde::de::Error::custom("slug object without `current`")),
        },
        other => Err(serde::de::Error::custom(format!(
            "invalid slug: {}",
            other
        ))),
    }
}
