//! Content module - typed records and rich-text blocks

pub mod block;
mod kind;
mod model;
mod portable;

pub use block::{Block, Blocks, ListStyle, Mark, RichText, Span};
pub use kind::{ContentKind, UnknownKind};
pub use model::{
    estimate_read_time, CaseStudy, CaseStudyResults, Category, Document, ImageRef, Industry, Post,
    Service,
};
