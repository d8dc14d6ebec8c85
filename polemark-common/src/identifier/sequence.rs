//! Sequence prediction for continuous registration
//!
//! Poles along a line usually carry consecutive numbers (`714`, `715`, ...).
//! Given the last registered identifier, the predictor offers the neighbouring
//! identifiers so the contributor can pick one instead of retyping.

use std::collections::HashSet;

use serde::Serialize;

use super::split_trailing_digits;
use crate::session::RegistrationSession;

/// Predict the identifier `delta` steps away from `previous`.
///
/// Everything before the trailing digit run is kept verbatim, whatever it
/// contains. The new number is zero-padded to at least the original width.
///
/// - No trailing digit run (or one too long for `u64`): `None`.
/// - Result would be negative: `previous` is returned unchanged.
///
/// # Examples
///
/// ```
/// use polemark_common::identifier::next_identifier;
///
/// assert_eq!(next_identifier("247エ714", 1).as_deref(), Some("247エ715"));
/// assert_eq!(next_identifier("12A-099", 1).as_deref(), Some("12A-100"));
/// assert_eq!(next_identifier("000", -1).as_deref(), Some("000"));
/// assert_eq!(next_identifier("ABC", 1), None);
/// ```
pub fn next_identifier(previous: &str, delta: i64) -> Option<String> {
    let (prefix, digits) = split_trailing_digits(previous)?;
    let value: u64 = digits.parse().ok()?;

    let next = i128::from(value) + i128::from(delta);
    if next < 0 {
        return Some(previous.to_string());
    }

    Some(format!("{}{:0width$}", prefix, next, width = digits.len()))
}

/// One suggested identifier for continuous mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceCandidate {
    /// Identifier from the previous registration this was derived from
    pub source: String,
    pub offset: i64,
    pub identifier: String,
}

/// Suggestions for every identifier of the last registration.
///
/// A pole may carry several plates (one per operator), so each stored
/// identifier is advanced by each offset in turn. Offsets are applied in the
/// given order, which callers use to rank the primary suggestion first.
/// Predictions that repeat an identifier of the last registration (clamped or
/// zero offsets included) or an earlier candidate are skipped.
pub fn continuous_candidates(
    session: &RegistrationSession,
    offsets: &[i64],
) -> Vec<SequenceCandidate> {
    let mut seen: HashSet<String> = session.last_identifiers.iter().cloned().collect();
    let mut candidates = Vec::new();

    for source in &session.last_identifiers {
        for &offset in offsets {
            let Some(identifier) = next_identifier(source, offset) else {
                tracing::debug!(source = %source, "No trailing number to predict from");
                break;
            };
            if !seen.insert(identifier.clone()) {
                continue;
            }
            candidates.push(SequenceCandidate {
                source: source.clone(),
                offset,
                identifier,
            });
        }
    }

    candidates
}
