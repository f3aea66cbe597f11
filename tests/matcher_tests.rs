// Integration tests for the phonetic model: derivation, fuzzy rules,
// composition and formatting, exercised through the public surface

use pinsearch::{format_reading, Accelerator, FuzzySettings, Keyboard, PinDict, PinyinFormat};

fn plain_dict() -> PinDict {
    PinDict::builtin()
}

fn fuzzy_dict() -> PinDict {
    let mut dict = PinDict::builtin();
    let mut config = dict.config();
    config.fuzzy = FuzzySettings::all();
    config.commit();
    dict
}

// ============ Spelling Derivation Tests ============

#[test]
fn test_derived_spellings_respect_fuzzy_rules() {
    let dict = fuzzy_dict();
    let mut acc = Accelerator::new();

    let zhong = acc.character(&dict, '中');
    let first = &zhong.pinyins()[0].phonemes()[0];
    assert_eq!(first.source(), "zh");
    assert_eq!(first.spellings(), ["zh", "z"]);

    let dict = plain_dict();
    let mut acc = Accelerator::new();
    let zhong = acc.character(&dict, '中');
    assert_eq!(zhong.pinyins()[0].phonemes()[0].spellings(), ["zh"]);
}

#[test]
fn test_multi_reading_character_keeps_reading_order() {
    let dict = plain_dict();
    let mut acc = Accelerator::new();
    let chong = acc.character(&dict, '重');
    let raws: Vec<&str> = chong.pinyins().iter().map(|p| p.raw()).collect();
    assert_eq!(raws, ["zhong4", "chong2"]);
    assert_ne!(
        chong.pinyins()[0].id(),
        chong.pinyins()[1].id(),
        "each reading has its own stable id"
    );
}

// ============ Fuzzy Equivalence Tests ============

#[test]
fn test_zh_z_equivalence_gates_on_flag() {
    // With zh<->z enabled the phoneme accepts both spellings in full
    let dict = fuzzy_dict();
    let mut acc = Accelerator::new();
    acc.prime("zong1");
    acc.set_partial(false);
    let is = acc.get_char(&dict, '中', 0);
    assert!(is.get(5), "z + ong + tone consumes the whole query");

    // Disabled: the short spelling no longer completes
    let dict = plain_dict();
    let mut acc = Accelerator::new();
    acc.prime("zong1");
    acc.set_partial(false);
    let is = acc.get_char(&dict, '中', 0);
    assert!(!is.get(5));
    assert!(is.get(1), "the first-letter shortcut still fires");
}

#[test]
fn test_ang_an_equivalence() {
    let dict = fuzzy_dict();
    let mut acc = Accelerator::new();
    acc.prime("hanzhou");
    acc.set_partial(true);
    let is = acc.get_char(&dict, '杭', 0);
    assert!(is.get(3), "han reaches the syllable boundary under ang/an");

    let dict = plain_dict();
    let mut acc = Accelerator::new();
    acc.prime("hanzhou");
    acc.set_partial(true);
    let is = acc.get_char(&dict, '杭', 0);
    assert!(!is.get(3));
}

// ============ Compositional Matching Tests ============

#[test]
fn test_composition_reports_intermediate_lengths() {
    // "zhong1" against 中: full match at 6, plus the shorter prefixes
    let dict = plain_dict();
    let mut acc = Accelerator::new();
    acc.prime("zhong1");
    acc.set_partial(false);
    let is = acc.get_char(&dict, '中', 0);
    assert!(is.get(6), "zh + ong + tone consumes six characters");
    assert!(is.get(5), "zhong without the tone is a valid prefix");
    assert!(is.get(2), "zh alone is a valid prefix");
    assert!(!is.get(3));
    assert!(!is.get(4));
}

#[test]
fn test_composition_stops_at_dead_phoneme() {
    let dict = plain_dict();
    let mut acc = Accelerator::new();
    acc.prime("zhung");
    acc.set_partial(true);
    let is = acc.get_char(&dict, '中', 0);
    assert!(is.get(2));
    assert!(!is.get(5));
}

#[test]
fn test_literal_hanzi_in_query() {
    let dict = plain_dict();
    let mut acc = Accelerator::new();
    acc.prime("中wen");
    acc.set_partial(true);
    let is = acc.get_char(&dict, '中', 0);
    assert!(is.get(1), "a hanzi typed directly consumes one character");
}

// ============ Keyboard Layout Tests ============

#[test]
fn test_xiaohe_duo_composition() {
    let mut dict = PinDict::builtin();
    let mut config = dict.config();
    config.keyboard = Keyboard::XIAOHE;
    config.commit();

    let mut acc = Accelerator::new();
    acc.prime("vs");
    acc.set_partial(true);
    let is = acc.get_char(&dict, '中', 0);
    assert!(is.get(2), "xiaohe types zhong as v + s");
}

#[test]
fn test_daqian_layout_remaps_keys() {
    let mut dict = PinDict::builtin();
    let mut config = dict.config();
    config.keyboard = Keyboard::DAQIAN;
    config.commit();

    let mut acc = Accelerator::new();
    let zhong = acc.character(&dict, '中');
    // zh remaps to the daqian key "5"
    assert_eq!(zhong.pinyins()[0].phonemes()[0].spellings(), ["5"]);
}

// ============ Reading Lookup and Format Tests ============

#[test]
fn test_readings_surface() {
    let dict = plain_dict();
    assert_eq!(dict.readings('中', true), vec!["zhong1", "zhong4"]);
    assert_eq!(dict.readings('中', false), vec!["zhong"]);
    assert!(dict.readings('x', true).is_empty());

    let list = dict.readings_list("北京", false);
    assert_eq!(list, vec![vec!["bei".to_string()], vec!["jing".to_string()]]);
}

#[test]
fn test_format_round_trip_with_dictionary() {
    let dict = plain_dict();
    let reading = &dict.readings('绿', true)[0];
    assert_eq!(reading, "lv4");
    assert_eq!(format_reading(reading, PinyinFormat::Raw), "lv");
    assert_eq!(format_reading(reading, PinyinFormat::Unicode), "lǜ");
    assert_eq!(format_reading(reading, PinyinFormat::Number), "lv4");
}
