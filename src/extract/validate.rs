use once_cell::sync::Lazy;
use regex::Regex;

/// A candidate must match this in full to count as an email address
static EMAIL_EXACT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

/// US-style phone pattern that the text regex sometimes drags into the
/// local part, e.g. "call 555-123-4567 or write info@..."
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3}-\d{3}-\d{4}").unwrap());

/// Substrings that mark template placeholders rather than real addresses
const PLACEHOLDER_FRAGMENTS: &[&str] = &[
    "example.com",
    "domain.com",
    "email.com",
    "your-email.com",
    "username@",
    "@domain",
    "example@example",
];

/// Checks whether a candidate string is a plausible real email address
pub fn validate_email(candidate: &str) -> bool {
    if !EMAIL_EXACT_REGEX.is_match(candidate) {
        return false;
    }

    // Addresses starting with a digit are nearly always fragments of
    // phone numbers or tracking IDs glued to an @ by sloppy markup
    if candidate.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return false;
    }

    if let Some((local, _)) = candidate.split_once('@') {
        if PHONE_REGEX.is_match(local) {
            return false;
        }
    }

    let lowered = candidate.to_lowercase();
    if PLACEHOLDER_FRAGMENTS
        .iter()
        .any(|fragment| lowered.contains(fragment))
    {
        return false;
    }

    true
}

/// Trims, validates, and canonicalizes a raw candidate
///
/// Returns the lowercased address, or `None` if the candidate fails
/// validation. Lowercasing collapses case variants of the same address.
pub fn admit_candidate(raw: &str) -> Option<String> {
    let candidate = raw.trim();
    if !validate_email(candidate) {
        return None;
    }
    Some(candidate.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_addresses() {
        assert!(validate_email("info@example.org"));
        assert!(validate_email("first.last+tag@sub.company.co.uk"));
        assert!(validate_email("o_malley%dev@host-name.io"));
    }

    #[test]
    fn test_rejects_malformed_candidates() {
        assert!(!validate_email(""));
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("missing@tld"));
        assert!(!validate_email("two@@example.org"));
        assert!(!validate_email("trailing@example.org extra"));
    }

    #[test]
    fn test_rejects_digit_led_local_part() {
        assert!(!validate_email("1nfo@company.org"));
        assert!(validate_email("info1@company.org"));
    }

    #[test]
    fn test_rejects_phone_number_in_local_part() {
        assert!(!validate_email("555-123-4567info@company.org"));
        assert!(!validate_email("tel555-123-4567@company.org"));
        assert!(validate_email("info-4567@company.org"));
    }

    #[test]
    fn test_rejects_placeholders() {
        assert!(!validate_email("info@example.com"));
        assert!(!validate_email("you@domain.com"));
        assert!(!validate_email("name@your-email.com"));
        assert!(!validate_email("username@whatever.org"));
        assert!(!validate_email("example@example.org"));
    }

    #[test]
    fn test_admit_candidate_lowercases() {
        assert_eq!(
            admit_candidate("  Info@Company.ORG "),
            Some("info@company.org".to_string())
        );
        assert_eq!(admit_candidate("garbage"), None);
    }
}
