//! Block sequence to HTML

use std::collections::HashMap;

use crate::content::{Block, ListStyle, Mark, RichText, Span};
use crate::helpers::{html_escape, is_safe_href};

use super::highlight::Highlighter;

/// Renders rich-text blocks as HTML
///
/// Rendering is pure: the same blocks always produce the same string.
/// [`Block::Unknown`] and blocks without renderable content produce nothing.
#[derive(Default)]
pub struct BlockRenderer {
    highlighter: Option<Highlighter>,
}

impl BlockRenderer {
    /// Renderer emitting plain `<pre><code>` for code blocks
    pub fn new() -> Self {
        Self { highlighter: None }
    }

    /// Renderer highlighting code blocks with a syntect theme
    pub fn with_highlighting(theme: &str) -> Self {
        Self {
            highlighter: Highlighter::new(theme),
        }
    }

    /// Render a block sequence, one block per line
    ///
    /// Heading ids are unique within the output: a repeated anchor gets a
    /// `-1`, `-2`, ... suffix.
    pub fn render(&self, blocks: &[Block]) -> String {
        let mut anchors = HashMap::new();
        blocks
            .iter()
            .map(|block| self.render_with(block, &mut anchors))
            .filter(|html| !html.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render a single block
    pub fn render_block(&self, block: &Block) -> String {
        self.render_with(block, &mut HashMap::new())
    }

    fn render_with(&self, block: &Block, anchors: &mut HashMap<String, usize>) -> String {
        match block {
            Block::Paragraph { text } => {
                if text.is_blank() {
                    return String::new();
                }
                format!("<p>{}</p>", render_inline(text))
            }
            Block::Heading { level, text } => {
                if !(1..=6).contains(level) || text.is_blank() {
                    return String::new();
                }
                let id = unique_anchor(slug::slugify(text.plain_text()), anchors);
                if id.is_empty() {
                    format!("<h{0}>{1}</h{0}>", level, render_inline(text))
                } else {
                    format!(r#"<h{0} id="{1}">{2}</h{0}>"#, level, id, render_inline(text))
                }
            }
            Block::List { style, items } => {
                let items: Vec<String> = items
                    .iter()
                    .filter(|item| !item.is_blank())
                    .map(|item| format!("<li>{}</li>", render_inline(item)))
                    .collect();
                if items.is_empty() {
                    return String::new();
                }
                let tag = match style {
                    ListStyle::Bullet => "ul",
                    ListStyle::Number => "ol",
                };
                format!("<{0}>{1}</{0}>", tag, items.concat())
            }
            Block::Quote { text, citation } => {
                if text.is_blank() {
                    return String::new();
                }
                let cite = citation
                    .as_deref()
                    .map(|c| format!("<cite>{}</cite>", html_escape(c)))
                    .unwrap_or_default();
                format!(
                    "<blockquote><p>{}</p>{}</blockquote>",
                    render_inline(text),
                    cite
                )
            }
            Block::Image { url, alt, caption } => {
                if url.trim().is_empty() {
                    return String::new();
                }
                let caption = caption
                    .as_deref()
                    .map(|c| format!("<figcaption>{}</figcaption>", html_escape(c)))
                    .unwrap_or_default();
                format!(
                    r#"<figure><img src="{}" alt="{}" loading="lazy">{}</figure>"#,
                    html_escape(url),
                    html_escape(alt.as_deref().unwrap_or("")),
                    caption
                )
            }
            Block::Code { language, source } => self.render_code(language, source),
            Block::Unknown => String::new(),
        }
    }

    fn render_code(&self, language: &str, source: &str) -> String {
        if let Some(highlighted) = self
            .highlighter
            .as_ref()
            .and_then(|h| h.highlight(source, language))
        {
            return format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                html_escape(language),
                highlighted
            );
        }

        format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            html_escape(language),
            html_escape(source)
        )
    }
}

fn unique_anchor(id: String, anchors: &mut HashMap<String, usize>) -> String {
    if id.is_empty() {
        return id;
    }
    let mut seen = anchors.get(&id).copied().unwrap_or(0);
    let mut candidate = id.clone();
    while anchors.contains_key(&candidate) {
        seen += 1;
        candidate = format!("{}-{}", id, seen);
    }
    anchors.insert(id, seen);
    anchors.insert(candidate.clone(), 0);
    candidate
}

/// Render inline spans with their marks
pub fn render_inline(text: &RichText) -> String {
    text.spans().iter().map(render_span).collect()
}

/// The first mark wraps outermost
fn render_span(span: &Span) -> String {
    span.marks
        .iter()
        .rev()
        .fold(html_escape(&span.text), |inner, mark| match mark {
            Mark::Strong => format!("<strong>{}</strong>", inner),
            Mark::Emphasis => format!("<em>{}</em>", inner),
            Mark::Code => format!("<code>{}</code>", inner),
            Mark::Link { href } if is_safe_href(href) => {
                if href.starts_with("http://") || href.starts_with("https://") {
                    format!(
                        r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                        html_escape(href),
                        inner
                    )
                } else {
                    format!(r#"<a href="{}">{}</a>"#, html_escape(href), inner)
                }
            }
            Mark::Link { .. } => inner,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Blocks;
    use serde_json::json;

    fn blocks(value: serde_json::Value) -> Blocks {
        serde_json::from_value(value).unwrap()
    }

    fn span(text: &str, marks: Vec<Mark>) -> RichText {
        RichText(vec![Span::new(text, marks)])
    }

    fn link(href: &str) -> Mark {
        Mark::Link {
            href: href.to_string(),
        }
    }

    #[test]
    fn test_render_each_block_type() {
        let renderer = BlockRenderer::new();
        let html = renderer.render(&blocks(json!([
            {"_type": "paragraph", "text": "Hello & welcome"},
            {"_type": "heading", "level": 2, "text": "Our Approach"},
            {"_type": "list", "items": ["Discover", "Deliver"]},
            {"_type": "quote", "text": "Great team", "citation": "CTO, Acme"},
            {"_type": "image", "url": "https://cdn.example.com/a.png", "alt": "Team", "caption": "Offsite"},
            {"_type": "code", "language": "rust", "source": "let x = a < b;"}
        ])));

        let lines: Vec<&str> = html.lines().collect();
        assert_eq!(
            lines,
            vec![
                "<p>Hello &amp; welcome</p>",
                r#"<h2 id="our-approach">Our Approach</h2>"#,
                "<ul><li>Discover</li><li>Deliver</li></ul>",
                "<blockquote><p>Great team</p><cite>CTO, Acme</cite></blockquote>",
                r#"<figure><img src="https://cdn.example.com/a.png" alt="Team" loading="lazy"><figcaption>Offsite</figcaption></figure>"#,
                r#"<pre><code class="language-rust">let x = a &lt; b;</code></pre>"#,
            ]
        );
    }

    #[test]
    fn test_numbered_list() {
        let html = BlockRenderer::new().render_block(&Block::List {
            style: ListStyle::Number,
            items: vec![RichText::plain("one")],
        });
        assert_eq!(html, "<ol><li>one</li></ol>");
    }

    #[test]
    fn test_unknown_renders_nothing() {
        let renderer = BlockRenderer::new();
        let html = renderer.render(&blocks(json!([
            {"_type": "carousel"},
            {"_type": "paragraph", "text": "kept"},
            {"_type": "image"}
        ])));
        assert_eq!(html, "<p>kept</p>");
        assert_eq!(renderer.render_block(&Block::Unknown), "");
    }

    #[test]
    fn test_empty_content_renders_nothing() {
        let renderer = BlockRenderer::new();
        assert_eq!(
            renderer.render_block(&Block::Paragraph {
                text: RichText::plain("  ")
            }),
            ""
        );
        assert_eq!(
            renderer.render_block(&Block::List {
                style: ListStyle::Bullet,
                items: Vec::new()
            }),
            ""
        );
        assert_eq!(
            renderer.render_block(&Block::Heading {
                level: 0,
                text: RichText::plain("x")
            }),
            ""
        );
    }

    #[test]
    fn test_marks_compose() {
        let text = span("fast", vec![Mark::Strong, Mark::Code]);
        assert_eq!(
            render_inline(&text),
            "<strong><code>fast</code></strong>"
        );

        let text = span("docs", vec![Mark::Emphasis, link("/docs"), Mark::Strong]);
        assert_eq!(
            render_inline(&text),
            r#"<em><a href="/docs"><strong>docs</strong></a></em>"#
        );
    }

    #[test]
    fn test_link_requires_href() {
        assert_eq!(render_inline(&span("plain", vec![link("")])), "plain");
        assert_eq!(render_inline(&span("plain", vec![link("  ")])), "plain");
        assert_eq!(
            render_inline(&span("site", vec![link("https://example.com/a?b=c")])),
            r#"<a href="https://example.com/a?b=c" target="_blank" rel="noopener">site</a>"#
        );
    }

    #[test]
    fn test_script_links_render_as_text() {
        assert_eq!(
            render_inline(&span("click", vec![link("javascript:alert(1)")])),
            "click"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let text = span("<script>alert(1)</script>", vec![Mark::Strong]);
        assert_eq!(
            render_inline(&text),
            "<strong>&lt;script&gt;alert(1)&lt;/script&gt;</strong>"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = BlockRenderer::with_highlighting("base16-ocean.dark");
        let input = blocks(json!([
            {"_type": "heading", "level": 1, "text": [{"text": "Title", "marks": ["em"]}]},
            {"_type": "code", "language": "rust", "source": "fn main() {}"}
        ]));
        let first = renderer.render(&input);
        assert_eq!(first, renderer.render(&input));
        assert!(first.contains(r#"<figure class="highlight rust">"#));
    }

    #[test]
    fn test_repeated_headings_get_distinct_ids() {
        let html = BlockRenderer::new().render(&blocks(json!([
            {"_type": "heading", "level": 2, "text": "Results"},
            {"_type": "heading", "level": 2, "text": "Results"},
            {"_type": "heading", "level": 3, "text": "Results"}
        ])));
        assert_eq!(
            html,
            "<h2 id=\"results\">Results</h2>\n\
             <h2 id=\"results-1\">Results</h2>\n\
             <h3 id=\"results-2\">Results</h3>"
        );
    }

    #[test]
    fn test_link_href_kept_verbatim() {
        assert_eq!(
            render_inline(&span("contact", vec![link(" /contact")])),
            r#"<a href=" /contact">contact</a>"#
        );
    }
}
