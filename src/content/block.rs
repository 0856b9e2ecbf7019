//! Rich-text blocks
//!
//! Content fields such as a post body are stored as a sequence of blocks.
//! Decoding is lenient: a block with an unrecognized `_type`, or one missing
//! a field its type requires, decodes as [`Block::Unknown`] instead of
//! failing the record that holds it. Sanity Portable Text input is accepted
//! as well and normalized (see [`super::portable`]).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::ops::Deref;

use super::portable;

/// Inline mark applied to a span
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Strong,
    Emphasis,
    Code,
    Link { href: String },
}

impl Mark {
    /// Decode a mark, resolving Portable Text mark keys against `mark_defs`
    pub(crate) fn from_value(value: &Value, mark_defs: &[Value]) -> Option<Mark> {
        match value {
            Value::String(name) => match name.as_str() {
                "strong" | "b" => Some(Mark::Strong),
                "em" | "emphasis" | "i" => Some(Mark::Emphasis),
                "code" => Some(Mark::Code),
                key => mark_defs
                    .iter()
                    .find(|def| def.get("_key").and_then(Value::as_str) == Some(key))
                    .and_then(link_from_def),
            },
            Value::Object(map) => match map.get("link") {
                Some(Value::String(href)) => Some(Mark::Link { href: href.clone() }),
                Some(link) => Some(Mark::Link {
                    href: str_field(link, "href").unwrap_or_default(),
                }),
                None => link_from_def(value),
            },
            _ => None,
        }
    }
}

fn link_from_def(def: &Value) -> Option<Mark> {
    if def.get("_type").and_then(Value::as_str) != Some("link") {
        return None;
    }
    Some(Mark::Link {
        href: str_field(def, "href").unwrap_or_default(),
    })
}

/// A run of text sharing the same marks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub marks: Vec<Mark>,
}

impl Span {
    pub fn new(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    fn from_value(value: &Value, mark_defs: &[Value]) -> Option<Span> {
        let text = value.get("text").and_then(Value::as_str)?;
        let marks = value
            .get("marks")
            .and_then(Value::as_array)
            .map(|marks| {
                marks
                    .iter()
                    .filter_map(|mark| Mark::from_value(mark, mark_defs))
                    .collect()
            })
            .unwrap_or_default();
        Some(Span::new(text, marks))
    }
}

/// Inline text: an ordered list of spans
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<Span>);

impl RichText {
    /// Unmarked text
    pub fn plain(text: impl Into<String>) -> Self {
        Self(vec![Span::new(text, Vec::new())])
    }

    pub fn spans(&self) -> &[Span] {
        &self.0
    }

    /// Concatenated span text without marks
    pub fn plain_text(&self) -> String {
        self.0.iter().map(|span| span.text.as_str()).collect()
    }

    /// True when no span carries visible text
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|span| span.text.trim().is_empty())
    }

    /// Accepts a plain string or an array of span objects
    pub(crate) fn from_value(value: &Value, mark_defs: &[Value]) -> Option<RichText> {
        match value {
            Value::String(text) => Some(RichText::plain(text.as_str())),
            Value::Array(children) => Some(RichText(
                children
                    .iter()
                    .filter_map(|child| Span::from_value(child, mark_defs))
                    .collect(),
            )),
            _ => None,
        }
    }
}

/// List marker style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    #[default]
    Bullet,
    Number,
}

impl ListStyle {
    pub(crate) fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("number") | Some("numbered") | Some("ordered") => ListStyle::Number,
            _ => ListStyle::Bullet,
        }
    }
}

/// One unit of normalized rich text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "_type", rename_all = "lowercase")]
pub enum Block {
    Paragraph {
        text: RichText,
    },
    Heading {
        level: u8,
        text: RichText,
    },
    List {
        style: ListStyle,
        items: Vec<RichText>,
    },
    Quote {
        text: RichText,
        #[serde(skip_serializing_if = "Option::is_none")]
        citation: Option<String>,
    },
    Image {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Code {
        language: String,
        source: String,
    },
    /// Unrecognized or incomplete block; renders as nothing
    Unknown,
}

impl Block {
    /// Decode a single block; never fails
    pub fn from_value(value: &Value) -> Block {
        Self::decode(value).unwrap_or(Block::Unknown)
    }

    fn decode(value: &Value) -> Option<Block> {
        let tag = value.get("_type").and_then(Value::as_str)?;
        match tag {
            "paragraph" => Some(Block::Paragraph {
                text: RichText::from_value(value.get("text")?, &[])?,
            }),
            "heading" => {
                let level = value
                    .get("level")
                    .and_then(Value::as_u64)
                    .filter(|level| (1..=6).contains(level))?;
                Some(Block::Heading {
                    level: level as u8,
                    text: RichText::from_value(value.get("text")?, &[])?,
                })
            }
            "list" => {
                let items = value
                    .get("items")?
                    .as_array()?
                    .iter()
                    .filter_map(|item| RichText::from_value(item, &[]))
                    .collect();
                Some(Block::List {
                    style: ListStyle::from_name(value.get("style").and_then(Value::as_str)),
                    items,
                })
            }
            "quote" => Some(Block::Quote {
                text: RichText::from_value(value.get("text")?, &[])?,
                citation: non_empty_field(value, "citation"),
            }),
            "image" => {
                let url = str_field(value, "url")
                    .or_else(|| value.get("asset").and_then(|asset| str_field(asset, "url")))
                    .filter(|url| !url.trim().is_empty())?;
                Some(Block::Image {
                    url,
                    alt: non_empty_field(value, "alt"),
                    caption: non_empty_field(value, "caption"),
                })
            }
            "code" => {
                let source = str_field(value, "source").or_else(|| str_field(value, "code"))?;
                Some(Block::Code {
                    language: non_empty_field(value, "language")
                        .unwrap_or_else(|| "text".to_string()),
                    source,
                })
            }
            "block" => portable::normalize_block(value),
            _ => None,
        }
    }

    /// Text content without markup
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph { text } | Block::Heading { text, .. } => text.plain_text(),
            Block::Quote { text, .. } => text.plain_text(),
            Block::List { items, .. } => items
                .iter()
                .map(RichText::plain_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Image { caption, .. } => caption.clone().unwrap_or_default(),
            Block::Code { .. } | Block::Unknown => String::new(),
        }
    }
}

/// An ordered block sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocks(Vec<Block>);

impl Blocks {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self(blocks)
    }

    /// Decode raw store values, grouping Portable Text list items into lists
    pub fn from_values(values: &[Value]) -> Self {
        let mut blocks = Vec::with_capacity(values.len());
        let mut open_list: Option<(ListStyle, Vec<RichText>)> = None;

        for value in values {
            if let Some((style, item)) = portable::list_item(value) {
                match open_list.as_mut() {
                    Some((open_style, items)) if *open_style == style => items.push(item),
                    _ => {
                        if let Some((style, items)) = open_list.take() {
                            blocks.push(Block::List { style, items });
                        }
                        open_list = Some((style, vec![item]));
                    }
                }
                continue;
            }

            if let Some((style, items)) = open_list.take() {
                blocks.push(Block::List { style, items });
            }

            let block = Block::from_value(value);
            if block == Block::Unknown {
                let tag = value.get("_type").and_then(Value::as_str).unwrap_or("?");
                tracing::debug!("Skipping unrecognized block: {}", tag);
            }
            blocks.push(block);
        }

        if let Some((style, items)) = open_list {
            blocks.push(Block::List { style, items });
        }

        Self(blocks)
    }

    /// Plain text of every block, paragraphs separated by blank lines
    pub fn plain_text(&self) -> String {
        self.0
            .iter()
            .map(Block::plain_text)
            .filter(|text| !text.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Whitespace-separated word count of the plain text
    pub fn word_count(&self) -> usize {
        self.0
            .iter()
            .map(|block| block.plain_text().split_whitespace().count())
            .sum()
    }
}

impl Deref for Blocks {
    type Target = [Block];

    fn deref(&self) -> &[Block] {
        &self.0
    }
}

impl From<Vec<Block>> for Blocks {
    fn from(blocks: Vec<Block>) -> Self {
        Self(blocks)
    }
}

impl Serialize for Blocks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().filter(|block| **block != Block::Unknown))
    }
}

impl<'de> Deserialize<'de> for Blocks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Array(values) => Ok(Blocks::from_values(&values)),
            _ => Ok(Blocks::default()),
        }
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn non_empty_field(value: &Value, key: &str) -> Option<String> {
    str_field(value, key).filter(|s| !s.trim().is_empty())
}
