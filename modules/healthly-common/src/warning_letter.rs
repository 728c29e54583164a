//! Public URLs of FDA warning letters.
//!
//! The FDA publishes each warning letter at
//! `{BASE}/{legal-name-slug}-{case-injunction-id}-{MMDDYYYY}`. The Data
//! Dashboard compliance-actions feed gives us the three ingredients but not the
//! URL itself, so it is rebuilt here.
//!
//! Slugs are derived mechanically from the firm's legal name. A few firms are
//! published under a slug that differs from their legal name; those live in
//! [`SLUG_EXCEPTIONS`].

use std::fmt::Display;

use chrono::NaiveDate;
use thiserror::Error;

pub const WARNING_LETTER_BASE_URL: &str =
    "https://www.fda.gov/inspections-compliance-enforcement-and-criminal-investigations/warning-letters";

/// Mechanical slug → slug the FDA actually publishes under.
pub const SLUG_EXCEPTIONS: &[(&str, &str)] = &[("medtronic-minimed-inc", "medtronic-inc")];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("action date {value:?} is not a valid YYYY-MM-DD date: {reason}")]
pub struct DateFormatError {
    pub value: String,
    pub reason: String,
}

/// Turn a legal name into the slug used in warning-letter URLs.
///
/// Keeps ASCII letters, digits and hyphens, turns every whitespace character
/// into its own hyphen (runs are not collapsed), lowercases, then applies
/// [`SLUG_EXCEPTIONS`].
///
/// Hyphens in the legal name survive, so `"Smith-Nephew Inc"` gives
/// `smith-nephew-inc` where a letters-digits-whitespace filter would give
/// `smithnephew-inc`. This keeps the function idempotent on its own output.
pub fn normalize_legal_name(legal_name: &str) -> String {
    let slug: String = legal_name
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            '-' => Some('-'),
            c if c.is_whitespace() => Some('-'),
            _ => None,
        })
        .collect();

    SLUG_EXCEPTIONS
        .iter()
        .find(|(mechanical, _)| *mechanical == slug)
        .map(|(_, published)| published.to_string())
        .unwrap_or(slug)
}

/// Exactly `DDDD-DD-DD` in ASCII. chrono alone accepts short years, signs and
/// leading whitespace.
fn has_iso_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Reformat a `YYYY-MM-DD` date as `MMDDYYYY`. The year must be four digits.
pub fn format_action_date(action_date: &str) -> Result<String, DateFormatError> {
    if !has_iso_date_shape(action_date) {
        return Err(DateFormatError {
            value: action_date.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        });
    }
    let date = NaiveDate::parse_from_str(action_date, "%Y-%m-%d").map_err(|e| DateFormatError {
        value: action_date.to_string(),
        reason: e.to_string(),
    })?;
    Ok(date.format("%m%d%Y").to_string())
}

/// Build the public warning-letter URL for one compliance action.
pub fn warning_letter_url(
    case_injunction_id: impl Display,
    action_date: &str,
    legal_name: &str,
) -> Result<String, DateFormatError> {
    let date = format_action_date(action_date)?;
    let slug = normalize_legal_name(legal_name);
    Ok(format!(
        "{WARNING_LETTER_BASE_URL}/{slug}-{case_injunction_id}-{date}"
    ))
}
