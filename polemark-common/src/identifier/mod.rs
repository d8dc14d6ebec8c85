//! Pole identifier engine
//!
//! Identifier plates are transcribed by contributors from several operators'
//! numbering schemes. Before two transcriptions can be compared they pass
//! through three stages:
//!
//! 1. [`canonicalize`] removes encoding-level variation (full/half-width forms,
//!    whitespace, letter case).
//! 2. [`parse_prefix`] / [`parse_suffix`] split a canonical identifier into an
//!    operator/area prefix and a numeric sequence suffix.
//! 3. [`next_identifier`] predicts neighbouring identifiers so a contributor
//!    walking a line of poles can accept a suggestion instead of retyping.

mod canonical;
mod sequence;
mod structure;

pub use canonical::canonicalize;
pub use sequence::{continuous_candidates, next_identifier, SequenceCandidate};
pub use structure::{
    match_prefix, parse, parse_prefix, parse_suffix, suffix_digits, ParsedIdentifier, PrefixMatch,
    PrefixShape,
};

/// Full-width katakana letters plus the prolonged sound and iteration marks.
///
/// The middle dot (U+30FB) is punctuation and is excluded.
pub(crate) fn is_katakana(c: char) -> bool {
    matches!(c, '\u{30A1}'..='\u{30FA}' | '\u{30FC}'..='\u{30FF}')
}

/// Byte length of the leading run of `s` whose chars satisfy `pred`
pub(crate) fn leading_run(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|(_, c)| !pred(*c))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Split `s` into everything before its trailing ASCII digit run and the run itself.
///
/// Returns `None` when `s` does not end in a digit.
pub(crate) fn split_trailing_digits(s: &str) -> Option<(&str, &str)> {
    let start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    Some(s.split_at(start))
}

/// Render `value` left-padded with zeros to at least `width` digits
pub(crate) fn zero_pad(value: impl std::fmt::Display, width: usize) -> String {
    format!("{:0>width$}", value.to_string(), width = width)
}
