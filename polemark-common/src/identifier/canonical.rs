//! Identifier canonicalization
//!
//! Maps a raw, human-entered identifier to its single canonical form. The
//! passes run in a fixed order and no pass produces characters that an
//! earlier pass would rewrite, which makes [`canonicalize`] idempotent.
//!
//! Letter case policy: ASCII letters are upper-cased, so `"ntt"` and `"NTT"`
//! canonicalize to the same string and compare equal during deduplication.

/// Distance between the full-width forms block (U+FF01..U+FF5E) and ASCII
const FULLWIDTH_OFFSET: u32 = 0xFEE0;

const HALFWIDTH_KATAKANA_START: u32 = 0xFF61;
const HALFWIDTH_VOICED_MARK: char = '\u{FF9E}';
const HALFWIDTH_SEMI_VOICED_MARK: char = '\u{FF9F}';

/// Full-width equivalents of U+FF61..=U+FF9F, in code point order
const HALFWIDTH_KATAKANA: [char; 63] = [
    '。', '「', '」', '、', '・', 'ヲ', 'ァ', 'ィ', 'ゥ', 'ェ', 'ォ', 'ャ', 'ュ', 'ョ', 'ッ', 'ー',
    'ア', 'イ', 'ウ', 'エ', 'オ',
    'カ', 'キ', 'ク', 'ケ', 'コ',
    'サ', 'シ', 'ス', 'セ', 'ソ',
    'タ', 'チ', 'ツ', 'テ', 'ト',
    'ナ', 'ニ', 'ヌ', 'ネ', 'ノ',
    'ハ', 'ヒ', 'フ', 'ヘ', 'ホ',
    'マ', 'ミ', 'ム', 'メ', 'モ',
    'ヤ', 'ユ', 'ヨ',
    'ラ', 'リ', 'ル', 'レ', 'ロ',
    'ワ', 'ン', '゛', '゜',
];

/// Canonicalize a raw identifier.
///
/// Total: never fails, and an empty input yields an empty string.
///
/// # Examples
///
/// ```
/// use polemark_common::identifier::canonicalize;
///
/// assert_eq!(canonicalize("２４７エ７１４"), "247エ714");
/// assert_eq!(canonicalize("247ｴ714"), "247エ714");
/// assert_eq!(canonicalize("247 エ 714"), "247エ714");
/// assert_eq!(canonicalize("ntt"), "NTT");
/// ```
pub fn canonicalize(raw: &str) -> String {
    let s = narrow_fullwidth_digits(raw);
    let s = widen_halfwidth_katakana(&s);
    let s = narrow_fullwidth_latin(&s);
    let s = s.to_ascii_uppercase();
    strip_whitespace(&s)
}

fn narrow_fullwidth(c: char) -> char {
    char::from_u32(c as u32 - FULLWIDTH_OFFSET).unwrap_or(c)
}

fn narrow_fullwidth_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '０'..='９' => narrow_fullwidth(c),
            _ => c,
        })
        .collect()
}

fn narrow_fullwidth_latin(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'Ａ'..='Ｚ' | 'ａ'..='ｚ' => narrow_fullwidth(c),
            _ => c,
        })
        .collect()
}

fn widen_halfwidth_katakana(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        let Some(wide) = widen_halfwidth_kana(c) else {
            out.push(c);
            continue;
        };

        // Kana + sound mark pairs collapse into one voiced kana
        let combined = match chars.peek() {
            Some(&HALFWIDTH_VOICED_MARK) => voiced(wide),
            Some(&HALFWIDTH_SEMI_VOICED_MARK) => semi_voiced(wide),
            _ => None,
        };

        match combined {
            Some(kana) => {
                chars.next();
                out.push(kana);
            }
            None => out.push(wide),
        }
    }

    out
}

fn widen_halfwidth_kana(c: char) -> Option<char> {
    let index = (c as u32).checked_sub(HALFWIDTH_KATAKANA_START)?;
    HALFWIDTH_KATAKANA.get(index as usize).copied()
}

/// Voiced (dakuten) form of a full-width kana, if it has one
fn voiced(base: char) -> Option<char> {
    match base {
        'カ' | 'キ' | 'ク' | 'ケ' | 'コ' | 'サ' | 'シ' | 'ス' | 'セ' | 'ソ' | 'タ' | 'チ' | 'ツ'
        | 'テ' | 'ト' | 'ハ' | 'ヒ' | 'フ' | 'ヘ' | 'ホ' => char::from_u32(base as u32 + 1),
        'ウ' => Some('ヴ'),
        'ワ' => Some('ヷ'),
        'ヲ' => Some('ヺ'),
        _ => None,
    }
}

/// Semi-voiced (handakuten) form of a full-width kana, if it has one
fn semi_voiced(base: char) -> Option<char> {
    match base {
        'ハ' | 'ヒ' | 'フ' | 'ヘ' | 'ホ' => char::from_u32(base as u32 + 2),
        _ => None,
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
