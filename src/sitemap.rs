//! Sitemap generation
//!
//! Static routes come from the site config; dynamic entries come from the
//! three slug enumerations. The enumerations are independent: when one
//! fails, its category is left out and the rest of the sitemap is still
//! emitted. The root path is always present.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::ContentKind;
use crate::helpers::{encode_segment, escape_xml, full_url_for, is_valid_slug};
use crate::store::{ContentError, ContentQueries};

/// How often a page is expected to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

/// One addressable URL
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Change frequency and priority of a content kind's detail pages
pub fn dynamic_hints(kind: ContentKind) -> (ChangeFrequency, f32) {
    match kind {
        ContentKind::Post => (ChangeFrequency::Weekly, 0.7),
        ContentKind::CaseStudy => (ChangeFrequency::Monthly, 0.6),
        ContentKind::Service => (ChangeFrequency::Monthly, 0.8),
    }
}

const STATIC_FREQUENCY: ChangeFrequency = ChangeFrequency::Monthly;
const STATIC_PRIORITY: f32 = 0.8;
const ROOT_PRIORITY: f32 = 1.0;

/// A complete sitemap
#[derive(Debug, Clone, Default, Serialize)]
pub struct Sitemap {
    pub entries: Vec<SitemapEntry>,
}

impl Sitemap {
    /// Render as a sitemaps.org `urlset` document
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for entry in &self.entries {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.url)));
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                entry.last_modified.to_rfc3339()
            ));
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                entry.change_frequency.as_str()
            ));
            xml.push_str(&format!(
                "    <priority>{:.1}</priority>\n",
                entry.priority
            ));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Builds the sitemap from config and the query layer
pub struct SitemapBuilder<'a> {
    config: &'a SiteConfig,
    queries: &'a ContentQueries,
}

impl<'a> SitemapBuilder<'a> {
    pub fn new(config: &'a SiteConfig, queries: &'a ContentQueries) -> Self {
        Self { config, queries }
    }

    /// Build every entry, stamping them with `now`
    pub async fn build(&self, now: DateTime<Utc>) -> Sitemap {
        let mut entries = self.static_entries(now);

        let (posts, case_studies, services) = tokio::join!(
            self.queries.list_post_slugs(),
            self.queries.list_case_study_slugs(),
            self.queries.list_service_slugs(),
        );

        for (kind, slugs) in [
            (ContentKind::Post, posts),
            (ContentKind::CaseStudy, case_studies),
            (ContentKind::Service, services),
        ] {
            entries.extend(self.dynamic_entries(kind, slugs, now));
        }

        tracing::info!("Built sitemap with {} entries", entries.len());
        Sitemap { entries }
    }

    fn static_entries(&self, now: DateTime<Utc>) -> Vec<SitemapEntry> {
        let mut routes: Vec<&str> = self
            .config
            .static_routes
            .iter()
            .map(|route| normalize_route(route))
            .collect();
        if !routes.contains(&"/") {
            routes.insert(0, "/");
        }
        routes.dedup();

        routes
            .into_iter()
            .map(|route| SitemapEntry {
                url: full_url_for(self.config, route),
                last_modified: now,
                change_frequency: STATIC_FREQUENCY,
                priority: if route == "/" {
                    ROOT_PRIORITY
                } else {
                    STATIC_PRIORITY
                },
            })
            .collect()
    }

    fn dynamic_entries(
        &self,
        kind: ContentKind,
        slugs: Result<Vec<String>, ContentError>,
        now: DateTime<Utc>,
    ) -> Vec<SitemapEntry> {
        let slugs = match slugs {
            Ok(slugs) => slugs,
            Err(e) => {
                tracing::warn!("Omitting {} from sitemap: {}", kind, e);
                return Vec::new();
            }
        };

        let (change_frequency, priority) = dynamic_hints(kind);
        slugs
            .iter()
            .filter(|slug| {
                let routable = is_valid_slug(slug);
                if !routable {
                    tracing::warn!("Omitting {} slug {:?} from sitemap: not routable", kind, slug);
                }
                routable
            })
            .map(|slug| SitemapEntry {
                url: full_url_for(
                    self.config,
                    &format!("{}/{}", kind.path_prefix(), encode_segment(slug)),
                ),
                last_modified: now,
                change_frequency,
                priority,
            })
            .collect()
    }
}

/// `""` and `"/"` both mean the root; other routes lose a trailing slash
fn normalize_route(route: &str) -> &str {
    let trimmed = route.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ContentStore, MemoryStore, QueryShape, StoreQuery};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://northwind.example".to_string();
        config.static_routes = vec!["/about/".to_string(), "/blog".to_string()];
        config
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    /// Fails slug enumeration for one kind, delegates the rest
    struct FailingKind {
        inner: MemoryStore,
        failing: ContentKind,
    }

    #[async_trait]
    impl ContentStore for FailingKind {
        async fn fetch(&self, query: &StoreQuery) -> Result<Value, ContentError> {
            if query.kind == self.failing && query.shape == QueryShape::Slugs {
                return Err(ContentError::Unavailable("connection refused".to_string()));
            }
            self.inner.fetch(query).await
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::from_json(json!({
            "posts": [
                {"_id": "p1", "slug": "release.v2", "publishedAt": "2024-01-01T00:00:00Z"},
                {"_id": "p2", "slug": "hello world", "publishedAt": "2023-01-01T00:00:00Z"}
            ],
            "caseStudies": [{"_id": "c1", "slug": "acme", "publishedAt": "2024-01-01T00:00:00Z"}],
            "services": [{"_id": "s1", "slug": "cloud"}]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_full_sitemap() {
        let config = config();
        let queries = ContentQueries::new(Arc::new(store()));
        let sitemap = SitemapBuilder::new(&config, &queries).build(now()).await;

        let urls: Vec<_> = sitemap.entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://northwind.example/",
                "https://northwind.example/about",
                "https://northwind.example/blog",
                "https://northwind.example/blog/release.v2",
                "https://northwind.example/case-studies/acme",
                "https://northwind.example/services/cloud",
            ]
        );

        let priorities: Vec<_> = sitemap.entries.iter().map(|e| e.priority).collect();
        assert_eq!(priorities, vec![1.0, 0.8, 0.8, 0.7, 0.6, 0.8]);
        assert_eq!(sitemap.entries[3].change_frequency, ChangeFrequency::Weekly);
        assert_eq!(sitemap.entries[4].change_frequency, ChangeFrequency::Monthly);
        assert!(sitemap.entries.iter().all(|e| e.last_modified == now()));
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_categories() {
        let config = config();
        let queries = ContentQueries::new(Arc::new(FailingKind {
            inner: store(),
            failing: ContentKind::Post,
        }));
        let sitemap = SitemapBuilder::new(&config, &queries).build(now()).await;

        assert!(sitemap.entries.iter().all(|e| !e.url.contains("/blog/")));
        assert!(sitemap.entries.iter().any(|e| e.url.ends_with("/services/cloud")));
        assert!(sitemap.entries.iter().any(|e| e.url.ends_with("/case-studies/acme")));
    }

    #[tokio::test]
    async fn test_root_present_when_everything_fails() {
        struct Down;

        #[async_trait]
        impl ContentStore for Down {
            async fn fetch(&self, _query: &StoreQuery) -> Result<Value, ContentError> {
                Err(ContentError::Status(503))
            }
        }

        let mut config = config();
        config.static_routes.clear();
        let queries = ContentQueries::new(Arc::new(Down));
        let sitemap = SitemapBuilder::new(&config, &queries).build(now()).await;

        assert_eq!(sitemap.entries.len(), 1);
        assert_eq!(sitemap.entries[0].url, "https://northwind.example/");
        assert_eq!(sitemap.entries[0].priority, 1.0);
    }

    #[test]
    fn test_xml_document() {
        let sitemap = Sitemap {
            entries: vec![SitemapEntry {
                url: "https://northwind.example/?a=1&b=2".to_string(),
                last_modified: now(),
                change_frequency: ChangeFrequency::Monthly,
                priority: 1.0,
            }],
        };
        let xml = sitemap.to_xml();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<loc>https://northwind.example/?a=1&amp;b=2</loc>"));
        assert!(xml.contains("<lastmod>2024-05-01T12:00:00+00:00</lastmod>"));
        assert!(xml.contains("<changefreq>monthly</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }
}
