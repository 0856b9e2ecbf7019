//! Render module - rich text to HTML

mod blocks;
mod highlight;

pub use blocks::{render_inline, BlockRenderer};
pub use highlight::Highlighter;
