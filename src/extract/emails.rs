use crate::extract::validate::admit_candidate;
use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// Loose email pattern for scanning free-form text
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

// Obfuscation pattern: "user" + "@" + "site.org", in either quote style.
// A popular trick for keeping addresses out of naive scrapers while
// JavaScript reassembles them client-side.
static CONCAT_DOUBLE_QUOTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([A-Za-z0-9._%+-]+)"\s*\+\s*"@"\s*\+\s*"([A-Za-z0-9.-]+\.[A-Za-z]{2,})""#)
        .unwrap()
});

static CONCAT_SINGLE_QUOTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"'([A-Za-z0-9._%+-]+)'\s*\+\s*'@'\s*\+\s*'([A-Za-z0-9.-]+\.[A-Za-z]{2,})'")
        .unwrap()
});

/// Extracts every valid email address found in a parsed page
///
/// Four strategies run over the same document and their results merge
/// into one deduplicated set:
///
/// 1. `mailto:` link targets
/// 2. Email pattern over the page's visible text
/// 3. Reassembled `"local" + "@" + "domain"` string concatenations in scripts
/// 4. Email pattern over entity-decoded script text
pub fn extract_emails(document: &Html) -> BTreeSet<String> {
    let mut emails = BTreeSet::new();

    collect_mailto_targets(document, &mut emails);
    collect_text_matches(document, &mut emails);
    collect_script_matches(document, &mut emails);

    emails
}

/// Flattens a document's text nodes into one space-joined string
///
/// Also serves the language guesser, so it stays faithful to what the
/// page shows rather than normalizing whitespace further.
pub fn page_text(document: &Html) -> String {
    document.root_element().text().collect::<Vec<_>>().join(" ")
}

fn collect_mailto_targets(document: &Html, emails: &mut BTreeSet<String>) {
    if let Ok(selector) = Selector::parse(r#"a[href^="mailto:"]"#) {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(target) = href.strip_prefix("mailto:") {
                    // Drop ?subject=... and other header parameters
                    let address = target.split('?').next().unwrap_or(target);
                    if let Some(email) = admit_candidate(address) {
                        emails.insert(email);
                    }
                }
            }
        }
    }
}

fn collect_text_matches(document: &Html, emails: &mut BTreeSet<String>) {
    let text = page_text(document);
    for found in EMAIL_REGEX.find_iter(&text) {
        if let Some(email) = admit_candidate(found.as_str()) {
            emails.insert(email);
        }
    }
}

fn collect_script_matches(document: &Html, emails: &mut BTreeSet<String>) {
    let selector = match Selector::parse("script") {
        Ok(selector) => selector,
        Err(_) => return,
    };

    for element in document.select(&selector) {
        let script: String = element.text().collect();

        for regex in [&CONCAT_DOUBLE_QUOTE_REGEX, &CONCAT_SINGLE_QUOTE_REGEX] {
            for captures in regex.captures_iter(&script) {
                if let (Some(local), Some(domain)) = (captures.get(1), captures.get(2)) {
                    let assembled = format!("{}@{}", local.as_str(), domain.as_str());
                    if let Some(email) = admit_candidate(&assembled) {
                        emails.insert(email);
                    }
                }
            }
        }

        // Script bodies keep character references verbatim, so entity
        // decoding has to happen here rather than in the HTML parser
        let decoded = decode_html_entities(&script);
        for found in EMAIL_REGEX.find_iter(&decoded) {
            if let Some(email) = admit_candidate(found.as_str()) {
                emails.insert(email);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_from(html: &str) -> BTreeSet<String> {
        extract_emails(&Html::parse_document(html))
    }

    #[test]
    fn test_mailto_link() {
        let emails = extract_from(r#"<a href="mailto:sales@widgets.org">Write us</a>"#);
        assert!(emails.contains("sales@widgets.org"));
    }

    #[test]
    fn test_mailto_strips_subject_parameter() {
        let emails =
            extract_from(r#"<a href="mailto:help@widgets.org?subject=Support">Help</a>"#);
        assert!(emails.contains("help@widgets.org"));
        assert_eq!(emails.len(), 1);
    }

    #[test]
    fn test_visible_text_match() {
        let emails = extract_from("<p>Reach the office at office@widgets.org today.</p>");
        assert!(emails.contains("office@widgets.org"));
    }

    #[test]
    fn test_text_split_across_elements_is_not_joined() {
        // Space-joining text nodes keeps fragments from fusing into
        // an address that never appears on the page
        let emails = extract_from("<p><b>office</b>@widgets.org</p>");
        assert!(emails.is_empty());
    }

    #[test]
    fn test_script_concat_double_quotes() {
        let html = r#"<script>var e = "jane" + "@" + "co.com";</script>"#;
        assert!(extract_from(html).contains("jane@co.com"));
    }

    #[test]
    fn test_script_concat_single_quotes() {
        let html = "<script>var e = 'jane.doe' + '@' + 'co.com';</script>";
        assert!(extract_from(html).contains("jane.doe@co.com"));
    }

    #[test]
    fn test_script_entity_encoded() {
        // "info@co.com" with the local part as numeric character references
        let html = "<script>var e = \"&#105;&#110;&#102;&#111;@co.com\";</script>";
        assert!(extract_from(html).contains("info@co.com"));
    }

    #[test]
    fn test_case_variants_collapse() {
        let html = r#"
            <a href="mailto:Team@Widgets.org">mail</a>
            <p>team@widgets.org</p>
        "#;
        let emails = extract_from(html);
        assert_eq!(emails.len(), 1);
        assert!(emails.contains("team@widgets.org"));
    }

    #[test]
    fn test_placeholders_are_dropped() {
        let html = r#"
            <p>someone@example.com</p>
            <a href="mailto:real@widgets.org">mail</a>
        "#;
        let emails = extract_from(html);
        assert_eq!(emails.len(), 1);
        assert!(emails.contains("real@widgets.org"));
    }

    #[test]
    fn test_strategies_union_without_duplicates() {
        let html = r#"
            <a href="mailto:a@widgets.org">mail</a>
            <p>Contact a@widgets.org or b@widgets.org</p>
            <script>var c = "c" + "@" + "widgets.org";</script>
        "#;
        let emails = extract_from(html);
        assert_eq!(emails.len(), 3);
    }

    #[test]
    fn test_repeated_extraction_yields_identical_sets() {
        let document = Html::parse_document(
            r#"
            <a href="mailto:info@widgets.org">mail</a>
            <p>Or sales@widgets.org, but never 1nvalid@widgets.org.</p>
            <script>var dev = "dev" + "@" + "widgets.org";</script>
        "#,
        );

        let first = extract_emails(&document);
        let second = extract_emails(&document);

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert!(first.contains("dev@widgets.org"));
    }

    #[test]
    fn test_page_text_joins_with_spaces() {
        let document = Html::parse_document("<p>one</p><p>two</p>");
        let text = page_text(&document);
        assert!(text.contains("one"));
        assert!(text.contains("two"));
        assert!(!text.contains("onetwo"));
    }
}
