//! End-to-end identifier behaviour across canonicalize → parse → predict
//!
//! Uses a corpus of transcriptions as contributors actually enter them
//! (mixed widths, stray spaces, lower-case letters).

use polemark_common::identifier::{
    canonicalize, next_identifier, parse, parse_prefix, parse_suffix, PrefixShape,
};

const CORPUS: &[&str] = &[
    "",
    "２４７エ７１４",
    "247ｴ714",
    "247 エ 714",
    "12A-099",
    "１２ａ３４５",
    "xyz123",
    "no-digits-here",
    "東電 ﾃﾞﾝﾁｭｳ 5",
    "ﾊﾟｲﾌﾟ　ﾗｲﾝ",
    "ｶﾞｶﾞ ﾞ ﾟ",
    "\t\n",
    "ＮＴＴ東 ｶﾝ 0001",
];

#[test]
fn test_canonicalize_idempotent_over_corpus() {
    for raw in CORPUS {
        let once = canonicalize(raw);
        assert_eq!(canonicalize(&once), once, "not idempotent for {:?}", raw);
    }
}

#[test]
fn test_canonical_form_invariants() {
    for raw in CORPUS {
        let canonical = canonicalize(raw);
        for c in canonical.chars() {
            assert!(!c.is_whitespace(), "whitespace left in {:?}", canonical);
            assert!(!('０'..='９').contains(&c), "full-width digit in {:?}", canonical);
            assert!(!('Ａ'..='Ｚ').contains(&c), "full-width letter in {:?}", canonical);
            assert!(!('ａ'..='ｚ').contains(&c), "full-width letter in {:?}", canonical);
            assert!(!('\u{FF61}'..='\u{FF9F}').contains(&c), "half-width kana in {:?}", canonical);
            assert!(!c.is_ascii_lowercase(), "lower-case letter in {:?}", canonical);
        }
    }
}

#[test]
fn test_width_variants_compare_equal() {
    let a = canonicalize("２４７エ７１４");
    let b = canonicalize("247ｴ714");
    let c = canonicalize("247 エ 714");
    assert_eq!(a, "247エ714");
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn test_pipeline_on_katakana_identifier() {
    let canonical = canonicalize("２４７ ｴ ７１４");
    assert_eq!(parse_prefix(&canonical).as_deref(), Some("247エ"));
    assert_eq!(parse_suffix(&canonical), Some(714));
    assert_eq!(next_identifier(&canonical, 1).as_deref(), Some("247エ715"));
}

#[test]
fn test_pipeline_on_latin_identifier() {
    let canonical = canonicalize("１２ａ３４５");
    let parsed = parse(&canonical).unwrap();
    assert_eq!(parsed.prefix, "12A");
    assert_eq!(parsed.shape, PrefixShape::DigitsLatin);
    assert_eq!(parsed.suffix_value, 345);

    let canonical = canonicalize("xyz123");
    assert_eq!(parse(&canonical).unwrap().shape, PrefixShape::Latin);
}

#[test]
fn test_operator_letters_before_separator() {
    let canonical = canonicalize("ＮＴＴ東 ｶﾝ 0001");
    assert_eq!(canonical, "NTT東カン0001");
    assert_eq!(parse_prefix(&canonical).as_deref(), Some("NTT"));
    assert_eq!(next_identifier(&canonical, 1).as_deref(), Some("NTT東カン0002"));

    let parsed = parse(&canonicalize("ntt-0050")).unwrap();
    assert_eq!(parsed.prefix, "NTT");
    assert_eq!(parsed.shape, PrefixShape::Latin);
    assert_eq!(parsed.suffix_value, 50);
    assert_eq!(parsed.suffix_width, 4);
}

#[test]
fn test_opaque_identifier_still_predicts() {
    // No structural prefix, but the predictor only needs a trailing number
    let canonical = canonicalize("東電 ｶﾝ 0001");
    assert_eq!(canonical, "東電カン0001");
    assert_eq!(parse_prefix(&canonical), None);
    assert_eq!(next_identifier(&canonical, 1).as_deref(), Some("東電カン0002"));
}

#[test]
fn test_documented_examples() {
    assert_eq!(parse_prefix("no-digits-here"), None);
    assert_eq!(next_identifier("12A-099", 1).as_deref(), Some("12A-100"));
    assert_eq!(next_identifier("000", -1).as_deref(), Some("000"));
}
