//! Markdown run summary generation
//!
//! This module turns a finished sweep's results into a human-readable
//! markdown report with outcome counts and timing.

use crate::job::{CrawlResult, NO_EMAIL_FOUND};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Aggregated statistics for one sweep run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Hash of the config file the run used, when one was loaded
    pub config_hash: Option<String>,
    pub total_entries: usize,
    pub with_emails: usize,
    pub without_emails: usize,
    pub errored: usize,
    /// Blank input rows carried through for alignment
    pub skipped: usize,
    pub unique_emails: usize,
}

impl RunReport {
    /// Classifies a run's results into outcome counts
    ///
    /// # Arguments
    ///
    /// * `results` - Per-entry results in input order
    /// * `started_at` - When the run began
    /// * `finished_at` - When the run ended
    /// * `config_hash` - Hash of the loaded config file, if any
    pub fn from_results(
        results: &[CrawlResult],
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        config_hash: Option<String>,
    ) -> Self {
        let mut with_emails = 0;
        let mut without_emails = 0;
        let mut errored = 0;
        let mut skipped = 0;
        let mut addresses: HashSet<&str> = HashSet::new();

        for result in results {
            if result.outcome.starts_with("Error:") {
                errored += 1;
            } else if result.outcome == NO_EMAIL_FOUND {
                without_emails += 1;
            } else if result.outcome.is_empty() {
                skipped += 1;
            } else {
                with_emails += 1;
                for address in result.outcome.split(", ") {
                    addresses.insert(address);
                }
            }
        }

        Self {
            started_at,
            finished_at,
            config_hash,
            total_entries: results.len(),
            with_emails,
            without_emails,
            errored,
            skipped,
            unique_emails: addresses.len(),
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Formats the report as markdown
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        // Title
        md.push_str("# Mailsweep Run Summary\n\n");

        // Run metadata
        md.push_str("## Run Information\n\n");
        md.push_str(&format!("- **Started**: {}\n", self.started_at.to_rfc3339()));
        md.push_str(&format!(
            "- **Finished**: {}\n",
            self.finished_at.to_rfc3339()
        ));
        md.push_str(&format!(
            "- **Duration**: {} seconds\n",
            self.duration_seconds()
        ));
        if let Some(hash) = &self.config_hash {
            md.push_str(&format!("- **Config Hash**: {}\n", hash));
        }
        md.push('\n');

        // Outcome breakdown
        md.push_str("## Results\n\n");
        md.push_str(&format!("- **Total Entries**: {}\n", self.total_entries));
        md.push_str(&format!("- **Unique Addresses**: {}\n\n", self.unique_emails));

        md.push_str("| Outcome | Count |\n");
        md.push_str("|---------|-------|\n");
        md.push_str(&format!("| Emails found | {} |\n", self.with_emails));
        md.push_str(&format!("| No email found | {} |\n", self.without_emails));
        md.push_str(&format!("| Errors | {} |\n", self.errored));
        md.push_str(&format!("| Blank entries | {} |\n", self.skipped));

        md
    }
}

/// Writes the markdown report to a file
///
/// # Arguments
///
/// * `report` - The run report to write
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(MailsweepError)` - Failed to write the report
pub fn write_markdown_report(report: &RunReport, output_path: &Path) -> crate::Result<()> {
    let markdown = report.to_markdown();

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn result(index: usize, input: &str, outcome: &str) -> CrawlResult {
        CrawlResult {
            index,
            input: input.to_string(),
            outcome: outcome.to_string(),
        }
    }

    fn create_test_report() -> RunReport {
        let results = vec![
            result(0, "alpha.com", "info@alpha.com, sales@alpha.com"),
            result(1, "beta.org", NO_EMAIL_FOUND),
            result(2, "", ""),
            result(3, "broken url", "Error: invalid URL 'broken url'"),
            result(4, "gamma.net", "info@alpha.com"),
        ];

        let started = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let finished = Utc.with_ymd_and_hms(2024, 5, 1, 10, 2, 30).unwrap();

        RunReport::from_results(&results, started, finished, Some("abc123".to_string()))
    }

    #[test]
    fn test_from_results_counts_outcomes() {
        let report = create_test_report();

        assert_eq!(report.total_entries, 5);
        assert_eq!(report.with_emails, 2);
        assert_eq!(report.without_emails, 1);
        assert_eq!(report.errored, 1);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_unique_emails_deduplicate_across_entries() {
        let report = create_test_report();

        // info@alpha.com appears in two entries but counts once
        assert_eq!(report.unique_emails, 2);
    }

    #[test]
    fn test_duration_seconds() {
        let report = create_test_report();
        assert_eq!(report.duration_seconds(), 150);
    }

    #[test]
    fn test_to_markdown_contains_sections() {
        let markdown = create_test_report().to_markdown();

        assert!(markdown.contains("# Mailsweep Run Summary"));
        assert!(markdown.contains("## Run Information"));
        assert!(markdown.contains("## Results"));
        assert!(markdown.contains("- **Config Hash**: abc123"));
        assert!(markdown.contains("| Emails found | 2 |"));
        assert!(markdown.contains("| Errors | 1 |"));
    }

    #[test]
    fn test_to_markdown_omits_missing_config_hash() {
        let mut report = create_test_report();
        report.config_hash = None;

        assert!(!report.to_markdown().contains("Config Hash"));
    }

    #[test]
    fn test_write_markdown_report() {
        let report = create_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");

        write_markdown_report(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("# Mailsweep Run Summary"));
    }
}
