//! Content kinds served by the site

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The three top-level collections held by the content store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContentKind {
    Post,
    CaseStudy,
    Service,
}

impl ContentKind {
    /// All kinds, in sitemap emission order
    pub const ALL: [ContentKind; 3] = [
        ContentKind::Post,
        ContentKind::CaseStudy,
        ContentKind::Service,
    ];

    /// Document `_type` in the content store
    pub fn document_type(&self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::CaseStudy => "caseStudy",
            ContentKind::Service => "service",
        }
    }

    /// Public selector used by the content proxy (`?type=`)
    pub fn selector(&self) -> &'static str {
        match self {
            ContentKind::Post => "posts",
            ContentKind::CaseStudy => "case-studies",
            ContentKind::Service => "services",
        }
    }

    /// Route prefix of detail pages
    pub fn path_prefix(&self) -> &'static str {
        match self {
            ContentKind::Post => "/blog",
            ContentKind::CaseStudy => "/case-studies",
            ContentKind::Service => "/services",
        }
    }

    /// Field holding the recency timestamp
    pub fn recency_field(&self) -> &'static str {
        match self {
            ContentKind::Post | ContentKind::CaseStudy => "publishedAt",
            ContentKind::Service => "_createdAt",
        }
    }

    /// Human-readable collection name
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Post => "Blog",
            ContentKind::CaseStudy => "Case Studies",
            ContentKind::Service => "Services",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/// Selector outside `{posts, case-studies, services}`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown content type: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ContentKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "posts" => Ok(ContentKind::Post),
            "case-studies" => Ok(ContentKind::CaseStudy),
            "services" => Ok(ContentKind::Service),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}
