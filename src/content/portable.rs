//! Portable Text normalization
//!
//! The content store returns rich text as Portable Text: `_type: "block"`
//! entries carrying a `style`, span `children`, `markDefs` for annotations
//! and an optional `listItem`. These helpers map that shape onto [`Block`].

use serde_json::Value;

use super::block::{Block, ListStyle, RichText};

/// Decode a Portable Text list item, if `value` is one
pub(crate) fn list_item(value: &Value) -> Option<(ListStyle, RichText)> {
    if value.get("_type").and_then(Value::as_str) != Some("block") {
        return None;
    }
    let list = value.get("listItem").and_then(Value::as_str)?;
    Some((ListStyle::from_name(Some(list)), children(value)?))
}

/// Map a non-list Portable Text block onto a paragraph, heading or quote
pub(crate) fn normalize_block(value: &Value) -> Option<Block> {
    if value.get("listItem").is_some() {
        return None;
    }

    let text = children(value)?;
    let style = value
        .get("style")
        .and_then(Value::as_str)
        .unwrap_or("normal");

    match style {
        "normal" => Some(Block::Paragraph { text }),
        "blockquote" => Some(Block::Quote {
            text,
            citation: None,
        }),
        _ => heading_level(style).map(|level| Block::Heading { level, text }),
    }
}

fn children(value: &Value) -> Option<RichText> {
    let mark_defs = value
        .get("markDefs")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    RichText::from_value(value.get("children")?, mark_defs)
}

fn heading_level(style: &str) -> Option<u8> {
    style
        .strip_prefix('h')
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
}
