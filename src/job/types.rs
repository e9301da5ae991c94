use crate::links::url_netloc;
use crate::TargetError;
use serde::Serialize;
use std::collections::BTreeSet;
use url::Url;

/// Outcome string for a site where the sweep found nothing
pub const NO_EMAIL_FOUND: &str = "No email ID found";

/// An ordered list of raw website entries to sweep
///
/// Blank lines are kept as entries so that results stay aligned with the
/// input row for row, the way spreadsheet-driven batches expect.
#[derive(Debug, Clone)]
pub struct CrawlJob {
    entries: Vec<String>,
}

impl CrawlJob {
    /// Builds a job from raw text, one website per line
    pub fn from_lines(input: &str) -> Self {
        Self {
            entries: input.lines().map(|line| line.to_string()).collect(),
        }
    }

    /// Builds a job from already-split entries
    pub fn from_entries(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A normalized crawl target: the parsed base URL plus its network domain
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    pub url: Url,
    pub domain: String,
}

impl CrawlTarget {
    /// Normalizes a raw job entry into a crawl target
    ///
    /// Entries without a scheme get `http://` prepended. The site itself
    /// decides whether to upgrade to HTTPS via redirect.
    pub fn from_raw(raw: &str) -> Result<Self, TargetError> {
        let trimmed = raw.trim();

        let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        let url = Url::parse(&candidate)
            .map_err(|e| TargetError::Parse(format!("'{}': {}", trimmed, e)))?;

        let domain = url_netloc(&url).ok_or(TargetError::MissingHost)?;

        Ok(Self { url, domain })
    }
}

/// The per-entry outcome of a sweep, in input order
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    /// Zero-based position of the entry in the input
    pub index: usize,
    /// The raw input line this result belongs to
    pub input: String,
    /// Comma-joined emails, the no-result sentinel, an error description,
    /// or an empty string for a blank input line
    pub outcome: String,
}

/// Joins a set of found emails into the final outcome string
pub fn finalize(emails: &BTreeSet<String>) -> String {
    if emails.is_empty() {
        NO_EMAIL_FOUND.to_string()
    } else {
        emails.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}
