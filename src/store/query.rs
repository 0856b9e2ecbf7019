//! GROQ queries issued against the content store

use serde_json::Value;

use crate::content::ContentKind;

/// Inline images inside rich text carry only an asset reference; resolve it
const BLOCKS_PROJECTION: &str = r#"[]{..., _type == "image" => {"url": asset->url}}"#;

const COVER_IMAGE_PROJECTION: &str =
    r#""coverImage": select(defined(coverImage) => {"url": coverImage.asset->url, "alt": coalesce(coverImage.alt, "")})"#;

/// What a query asks of one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryShape {
    /// Every document, newest first
    List,
    /// The first `n` documents, newest first
    Recent(usize),
    /// The document whose slug equals the given one exactly
    BySlug(String),
    /// Slugs only, newest first
    Slugs,
}

/// One round trip to the content store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    pub kind: ContentKind,
    pub shape: QueryShape,
}

impl StoreQuery {
    pub fn list(kind: ContentKind) -> Self {
        Self {
            kind,
            shape: QueryShape::List,
        }
    }

    pub fn recent(kind: ContentKind, limit: usize) -> Self {
        Self {
            kind,
            shape: QueryShape::Recent(limit),
        }
    }

    pub fn by_slug(kind: ContentKind, slug: &str) -> Self {
        Self {
            kind,
            shape: QueryShape::BySlug(slug.to_string()),
        }
    }

    pub fn slugs(kind: ContentKind) -> Self {
        Self {
            kind,
            shape: QueryShape::Slugs,
        }
    }

    /// Render the query as GROQ; user input is only ever referenced as `$slug`
    pub fn to_groq(&self) -> String {
        let doc_type = self.kind.document_type();
        let order = format!("order({} desc, _id asc)", self.kind.recency_field());
        let projection = projection(self.kind);

        match &self.shape {
            QueryShape::List => format!(
                r#"*[_type == "{}" && defined(slug.current)] | {} {}"#,
                doc_type, order, projection
            ),
            QueryShape::Recent(limit) => format!(
                r#"*[_type == "{}" && defined(slug.current)] | {} [0...{}] {}"#,
                doc_type, order, limit, projection
            ),
            QueryShape::BySlug(_) => format!(
                r#"*[_type == "{}" && slug.current == $slug][0] {}"#,
                doc_type, projection
            ),
            QueryShape::Slugs => format!(
                r#"*[_type == "{}" && defined(slug.current)] | {}[].slug.current"#,
                doc_type, order
            ),
        }
    }

    /// Query parameters, JSON-valued as the GROQ HTTP API expects
    pub fn params(&self) -> Vec<(&'static str, Value)> {
        match &self.shape {
            QueryShape::BySlug(slug) => vec![("slug", Value::String(slug.clone()))],
            _ => Vec::new(),
        }
    }
}

fn projection(kind: ContentKind) -> String {
    match kind {
        ContentKind::Post => format!(
            r#"{{_id, title, "slug": slug.current, excerpt, author, category, {}, "content": content{}, publishedAt, readTime}}"#,
            COVER_IMAGE_PROJECTION, BLOCKS_PROJECTION
        ),
        ContentKind::CaseStudy => format!(
            r#"{{_id, title, "slug": slug.current, client, industry, overview, "problem": problem{}, "solution": solution{}, results, {}, duration, technologies, publishedAt}}"#,
            BLOCKS_PROJECTION, BLOCKS_PROJECTION, COVER_IMAGE_PROJECTION
        ),
        ContentKind::Service => format!(
            r#"{{_id, _createdAt, title, "slug": slug.current, shortDescription, icon, "fullDescription": fullDescription{}, features, {}}}"#,
            BLOCKS_PROJECTION, COVER_IMAGE_PROJECTION
        ),
    }
}
