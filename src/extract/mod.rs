//! Email extraction from HTML documents
//!
//! This module handles:
//! - The four extraction strategies (mailto, text scan, script
//!   concatenation, entity-decoded script text)
//! - Candidate validation and canonicalization

mod emails;
mod validate;

pub use emails::{extract_emails, page_text};
pub use validate::{admit_candidate, validate_email};
