//! Result serialization
//!
//! Two shapes: a plain text listing for the terminal and JSON Lines for
//! downstream tooling.

use crate::job::CrawlResult;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Writes results as readable `input => outcome` lines
///
/// Blank input rows come out as blank lines, so the listing stays
/// aligned with the input file.
pub fn write_results_text<W: Write>(out: &mut W, results: &[CrawlResult]) -> io::Result<()> {
    for result in results {
        if result.input.trim().is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, "{} => {}", result.input.trim(), result.outcome)?;
        }
    }
    Ok(())
}

/// Writes results as JSON Lines, one record per entry
///
/// # Arguments
///
/// * `output_path` - Path where the JSONL file should be written
/// * `results` - Per-entry results in input order
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote all records
/// * `Err(MailsweepError)` - Failed to serialize or write
pub fn write_results_jsonl(output_path: &Path, results: &[CrawlResult]) -> crate::Result<()> {
    let mut file = File::create(output_path)?;

    for result in results {
        let line = serde_json::to_string(result)?;
        writeln!(file, "{}", line)?;
    }

    Ok(())
}
