//! Syntax highlighting for code blocks

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Highlights source code into inline-styled HTML
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    /// Create a highlighter using `theme_name`, or the first bundled theme
    /// if that name is unknown
    pub fn new(theme_name: &str) -> Option<Self> {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = match theme_set.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                tracing::warn!("Unknown highlight theme {:?}, using default", theme_name);
                theme_set.themes.into_values().next()?
            }
        };

        Some(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    /// Highlight `code` as `lang`; falls back to plain text for unknown languages
    pub fn highlight(&self, code: &str, lang: &str) -> Option<String> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_known_language() {
        let highlighter = Highlighter::new("base16-ocean.dark").unwrap();
        let html = highlighter.highlight("fn main() {}", "rust").unwrap();
        assert!(html.starts_with("<pre"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert!(Highlighter::new("no-such-theme").is_some());
    }
}
