//! Helper functions shared by the renderer, templates and sitemap

mod html;
mod url;

pub use html::*;
pub use url::*;
