use crate::links::keywords::{KeywordTables, Language};
use std::sync::Arc;
use url::Url;

/// Decides which discovered links are worth following for a given site
///
/// A link is followed only when it stays on the target's host and its
/// anchor text or path matches a relevance keyword for the page language.
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    base_domain: String,
    tables: Arc<KeywordTables>,
}

impl LinkClassifier {
    pub fn new(base_domain: impl Into<String>, tables: Arc<KeywordTables>) -> Self {
        Self {
            base_domain: base_domain.into().to_lowercase(),
            tables,
        }
    }

    /// Whether the candidate URL stays on the crawl target's domain
    ///
    /// Subdomains count as external: `blog.example.com` is not
    /// `example.com`. Relative hrefs are already absolute by the time
    /// they get here, so netloc equality is the whole check.
    pub fn is_internal(&self, candidate: &Url) -> bool {
        url_netloc(candidate)
            .map(|netloc| netloc == self.base_domain)
            .unwrap_or(false)
    }

    /// Whether a link looks like it leads to contact or about information
    ///
    /// Matches keywords case-insensitively as substrings of the anchor
    /// text or the URL path, using the table for the page's language.
    pub fn is_relevant(&self, link_text: &str, path: &str, language: Language) -> bool {
        let text = link_text.to_lowercase();
        let path = path.to_lowercase();

        self.tables
            .table(language)
            .iter()
            .any(|keyword| text.contains(keyword.as_str()) || path.contains(keyword.as_str()))
    }
}

/// Network location of a URL: lowercased host plus any explicit port
///
/// Sites served on a non-default port stay distinct from the same host
/// on the default port.
pub fn url_netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?;

    let netloc = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    Some(netloc.to_lowercase())
}

/// Resolves an anchor href against the page URL
///
/// Returns `None` for hrefs that are not crawlable pages.
pub fn resolve_anchor(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    // Skip empty hrefs
    if href.is_empty() {
        return None;
    }

    // Skip special schemes
    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    // Try to resolve the URL
    match base_url.join(href) {
        Ok(absolute_url) => {
            // Only accept HTTP and HTTPS URLs
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier_for(domain: &str) -> LinkClassifier {
        LinkClassifier::new(domain, Arc::new(KeywordTables::default()))
    }

    #[test]
    fn test_is_internal_matches_same_host() {
        let classifier = classifier_for("example.com");
        let url = Url::parse("http://example.com/contact").unwrap();
        assert!(classifier.is_internal(&url));
    }

    #[test]
    fn test_is_internal_rejects_other_hosts() {
        let classifier = classifier_for("example.com");
        let external = Url::parse("https://other.org/contact").unwrap();
        let subdomain = Url::parse("https://blog.example.com/contact").unwrap();

        assert!(!classifier.is_internal(&external));
        assert!(!classifier.is_internal(&subdomain));
    }

    #[test]
    fn test_is_internal_includes_explicit_port() {
        let classifier = classifier_for("example.com:8080");
        let same_port = Url::parse("http://example.com:8080/contact").unwrap();
        let default_port = Url::parse("http://example.com/contact").unwrap();

        assert!(classifier.is_internal(&same_port));
        assert!(!classifier.is_internal(&default_port));
    }

    #[test]
    fn test_url_netloc() {
        let plain = Url::parse("http://Example.COM/path").unwrap();
        assert_eq!(url_netloc(&plain).unwrap(), "example.com");

        let with_port = Url::parse("http://example.com:3000/").unwrap();
        assert_eq!(url_netloc(&with_port).unwrap(), "example.com:3000");

        // Default scheme ports are normalized away by the parser
        let default_port = Url::parse("http://example.com:80/").unwrap();
        assert_eq!(url_netloc(&default_port).unwrap(), "example.com");
    }

    #[test]
    fn test_is_relevant_matches_anchor_text() {
        let classifier = classifier_for("example.com");
        assert!(classifier.is_relevant("Contact Us", "/page7", Language::English));
        assert!(classifier.is_relevant("GET IN TOUCH", "/x", Language::English));
    }

    #[test]
    fn test_is_relevant_matches_path() {
        let classifier = classifier_for("example.com");
        assert!(classifier.is_relevant("click here", "/about-the-team", Language::English));
        assert!(classifier.is_relevant("", "/Impressum", Language::German));
    }

    #[test]
    fn test_is_relevant_uses_language_table() {
        let classifier = classifier_for("example.com");
        assert!(classifier.is_relevant("Kontakt", "/", Language::German));
        // "kontakt" is not an English keyword
        assert!(!classifier.is_relevant("Kontakt", "/", Language::English));
    }

    #[test]
    fn test_is_relevant_rejects_unrelated_links() {
        let classifier = classifier_for("example.com");
        assert!(!classifier.is_relevant("Products", "/products", Language::English));
        assert!(!classifier.is_relevant("Blog", "/blog/2024", Language::English));
    }

    #[test]
    fn test_resolve_anchor_relative_and_absolute() {
        let base = Url::parse("http://example.com/about/").unwrap();

        let relative = resolve_anchor("team.html", &base).unwrap();
        assert_eq!(relative.as_str(), "http://example.com/about/team.html");

        let rooted = resolve_anchor("/contact", &base).unwrap();
        assert_eq!(rooted.as_str(), "http://example.com/contact");

        let absolute = resolve_anchor("https://other.org/x", &base).unwrap();
        assert_eq!(absolute.host_str(), Some("other.org"));
    }

    #[test]
    fn test_resolve_anchor_skips_non_pages() {
        let base = Url::parse("http://example.com/").unwrap();

        assert!(resolve_anchor("", &base).is_none());
        assert!(resolve_anchor("   ", &base).is_none());
        assert!(resolve_anchor("#top", &base).is_none());
        assert!(resolve_anchor("javascript:void(0)", &base).is_none());
        assert!(resolve_anchor("mailto:info@example.com", &base).is_none());
        assert!(resolve_anchor("tel:+15551234", &base).is_none());
        assert!(resolve_anchor("data:text/plain,hi", &base).is_none());
        assert!(resolve_anchor("ftp://example.com/file", &base).is_none());
    }
}
