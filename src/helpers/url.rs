//! URL helper functions

use lazy_static::lazy_static;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use crate::config::SiteConfig;

lazy_static! {
    /// Slug made only of characters a path segment carries unencoded,
    /// starting with a letter or digit
    static ref SLUG_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._~-]*$").unwrap();

    /// Link schemes that execute or embed content instead of navigating
    static ref UNSAFE_SCHEME_RE: Regex =
        Regex::new(r"(?i)^\s*(javascript|vbscript|data)\s*:").unwrap();
}

/// Characters left as-is in a path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/blog/") // -> "/blog/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about") // -> "https://example.com/about"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Percent-encode a single path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Whether `slug` is safe to route and look up
///
/// Valid slugs pass through [`encode_segment`] unchanged, so a URL built
/// from one routes back to the same slug.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

/// Whether `href` may be emitted as a link target
pub fn is_safe_href(href: &str) -> bool {
    !href.trim().is_empty() && !UNSAFE_SCHEME_RE.is_match(href)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com/".to_string();
        config.root = "/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/"), "/");
        assert_eq!(url_for(&config, "blog/post"), "/blog/post");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(full_url_for(&config, "/"), "https://example.com/");
        assert_eq!(
            full_url_for(&config, "/services/cloud"),
            "https://example.com/services/cloud"
        );

        let mut nested = test_config();
        nested.root = "/site/".to_string();
        assert_eq!(
            full_url_for(&nested, "/blog"),
            "https://example.com/site/blog"
        );
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("plain-slug_1"), "plain-slug_1");
        assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");
    }

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("my-post"));
        assert!(is_valid_slug("My-Post_2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("../etc"));
        assert!(!is_valid_slug("has space"));
        assert!(!is_valid_slug(".hidden"));
        assert!(is_valid_slug("release.v2"));
        assert!(is_valid_slug("v1~beta"));
    }

    #[test]
    fn test_valid_slugs_encode_unchanged() {
        for slug in ["release.v2", "v1~beta", "My-Post_2"] {
            assert!(is_valid_slug(slug));
            assert_eq!(encode_segment(slug), slug);
        }
    }

    #[test]
    fn test_safe_href() {
        assert!(is_safe_href("https://example.com"));
        assert!(is_safe_href("/contact"));
        assert!(is_safe_href("mailto:hi@example.com"));
        assert!(!is_safe_href(""));
        assert!(!is_safe_href("   "));
        assert!(!is_safe_href("JavaScript:alert(1)"));
        assert!(!is_safe_href(" data:text/html,hi"));
    }
}
