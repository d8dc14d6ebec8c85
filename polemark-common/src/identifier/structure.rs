//! Structural parsing of canonical identifiers
//!
//! Prefix recognition is an ordered rule table. Rules are tried in order
//! against the start of the string and the first match wins:
//!
//! | # | Shape              | Example    | Prefix  |
//! |---|--------------------|------------|---------|
//! | 1 | digits + katakana  | `247エ714` | `247エ` |
//! | 2 | digits + Latin     | `12A345`   | `12A`   |
//! | 3 | Latin letters      | `XYZ123`   | `XYZ`   |
//!
//! Anything else has no recognised prefix and is treated as opaque.
//!
//! Rules run on canonical input, where Latin letters are always upper-case,
//! so the Latin class is `A-Z` only. Raw lower-case text such as
//! `no-digits-here` matches nothing.

use serde::{Deserialize, Serialize};

use super::{is_katakana, leading_run, split_trailing_digits, zero_pad};

/// Which prefix rule matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixShape {
    /// Area digits followed by a katakana run
    DigitsKatakana,
    /// Area digits followed by a Latin letter run
    DigitsLatin,
    /// Leading Latin letter run with no digits before it
    Latin,
}

/// Recognised prefix and the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatch<'a> {
    pub shape: PrefixShape,
    pub prefix: &'a str,
}

/// Matcher returns the byte length of the prefix it recognises
type PrefixMatcher = fn(&str) -> Option<usize>;

/// Prefix rules in priority order
const PREFIX_RULES: [(PrefixShape, PrefixMatcher); 3] = [
    (PrefixShape::DigitsKatakana, digits_then_katakana),
    (PrefixShape::DigitsLatin, digits_then_latin),
    (PrefixShape::Latin, leading_latin),
];

fn digits_then(s: &str, class: fn(char) -> bool) -> Option<usize> {
    let digits = leading_run(s, |c| c.is_ascii_digit());
    if digits == 0 {
        return None;
    }
    match leading_run(&s[digits..], class) {
        0 => None,
        run => Some(digits + run),
    }
}

fn digits_then_katakana(s: &str) -> Option<usize> {
    digits_then(s, is_katakana)
}

fn digits_then_latin(s: &str) -> Option<usize> {
    digits_then(s, |c| c.is_ascii_uppercase())
}

fn leading_latin(s: &str) -> Option<usize> {
    match leading_run(s, |c| c.is_ascii_uppercase()) {
        0 => None,
        run => Some(run),
    }
}

/// Run the prefix rule table against `canonical`
pub fn match_prefix(canonical: &str) -> Option<PrefixMatch<'_>> {
    PREFIX_RULES.iter().find_map(|(shape, matcher)| {
        matcher(canonical).map(|len| PrefixMatch {
            shape: *shape,
            prefix: &canonical[..len],
        })
    })
}

/// Leading area/operator prefix, or `None` for opaque identifiers
pub fn parse_prefix(canonical: &str) -> Option<String> {
    match_prefix(canonical).map(|m| m.prefix.to_string())
}

/// Trailing digit run as written, leading zeros included
pub fn suffix_digits(canonical: &str) -> Option<&str> {
    split_trailing_digits(canonical).map(|(_, digits)| digits)
}

/// Trailing digit run as an integer.
///
/// `None` when the string does not end in a digit, or when the run does not
/// fit in a `u64`.
pub fn parse_suffix(canonical: &str) -> Option<u64> {
    suffix_digits(canonical)?.parse().ok()
}

/// Structured decomposition of an identifier with both a prefix and a suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIdentifier {
    pub prefix: String,
    pub shape: PrefixShape,
    pub suffix_value: u64,
    /// Digit count of the suffix as written, e.g. 3 for `099`
    pub suffix_width: usize,
}

impl ParsedIdentifier {
    /// `prefix + zero_pad(suffix_value, suffix_width)`.
    ///
    /// Characters between prefix and suffix (such as the `-` in `12A-099`)
    /// are not part of either, so this may differ from the source string.
    pub fn reconstruct(&self) -> String {
        format!("{}{}", self.prefix, zero_pad(self.suffix_value, self.suffix_width))
    }
}

/// Decompose `canonical` into prefix, shape and suffix.
///
/// Returns `None` unless both a prefix rule matches and a numeric suffix exists.
pub fn parse(canonical: &str) -> Option<ParsedIdentifier> {
    let m = match_prefix(canonical)?;
    let digits = suffix_digits(canonical)?;
    Some(ParsedIdentifier {
        prefix: m.prefix.to_string(),
        shape: m.shape,
        suffix_value: digits.parse().ok()?,
        suffix_width: digits.len(),
    })
}
