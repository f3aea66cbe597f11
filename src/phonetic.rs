// PinSearch Phonetic Model
// Character -> Pinyin -> Phoneme decomposition and fuzzy matching

use crate::dict::{FuzzySettings, PinDict};
use crate::index_set::IndexSet;
use crate::keyboard::Keyboard;
use rustc_hash::FxHashSet;

/// Smallest romanized fragment of a syllable: an initial, a final, or a
/// tone digit
///
/// A phoneme carries the set of spellings a user may type for it under the
/// active fuzzy rules and keyboard remap, derived once from the source
/// fragment. Derivation is a pure function of the fragment and the
/// dictionary configuration; phonemes are rebuilt rather than reloaded when
/// the configuration changes.
#[derive(Debug, Clone)]
pub struct Phoneme {
    src: String,
    strs: Vec<String>,
}

impl Phoneme {
    pub(crate) fn derive(dict: &PinDict, src: &str) -> Phoneme {
        Phoneme {
            src: src.to_string(),
            strs: derive_spellings(src, dict.fuzzy(), dict.keyboard()),
        }
    }

    pub fn source(&self) -> &str {
        &self.src
    }

    pub fn spellings(&self) -> &[String] {
        &self.strs
    }

    pub fn is_empty(&self) -> bool {
        self.strs.is_empty()
    }

    /// Memo key for the accelerator: the source fragment packed into a
    /// `u64`, tagged so it can never collide with a pinyin pool id
    pub(crate) fn key(&self) -> u64 {
        let mut k = 1u64 << 63;
        for (i, b) in self.src.bytes().take(7).enumerate() {
            k |= (b as u64) << (8 * i);
        }
        k
    }

    /// Match every accepted spelling against the query at `start`
    ///
    /// A spelling fully covered by the query records its whole length; in
    /// partial mode a spelling that runs past the end of the query records
    /// the covered prefix length instead, so a short query still matches
    /// inside a longer syllable.
    pub(crate) fn match_at(&self, query: &[char], start: usize, partial: bool) -> IndexSet {
        let mut ret = IndexSet::NONE;
        for s in &self.strs {
            let size = common_prefix(query, s, start);
            if partial && start + size == query.len() {
                ret.set(size as u32);
            } else if size == s.len() {
                ret.set(size as u32);
            }
        }
        ret
    }

    /// Whether any accepted spelling starts with `c` (first-letter gate for
    /// the accelerated trie node, where a sequence shortcut must not be
    /// filtered out by a failed whole-phoneme match)
    pub(crate) fn matches_first_letter(&self, c: char) -> bool {
        self.strs.iter().any(|s| s.chars().next() == Some(c))
    }

    /// Compositional form: continue from every prior consumed length
    ///
    /// For each bit `i` of `prior`, match at `start + i` and shift the
    /// result up by `i`. An empty phoneme passes `prior` through unchanged.
    pub(crate) fn match_seq(
        &self,
        query: &[char],
        prior: IndexSet,
        start: usize,
        partial: bool,
    ) -> IndexSet {
        if self.strs.is_empty() {
            return prior;
        }
        let mut ret = IndexSet::NONE;
        for i in prior.iter() {
            let mut is = self.match_at(query, start + i as usize, partial);
            is.offset(i);
            ret.merge(is);
        }
        ret
    }
}

/// One full romanized reading of a character
///
/// Identified by a stable numeric id, the reading's offset in the
/// dictionary pool. `duo` marks paired-keyboard composition; `sequence`
/// allows the single-keystroke first-letter shortcut.
#[derive(Debug, Clone)]
pub struct Pinyin {
    raw: String,
    id: usize,
    duo: bool,
    sequence: bool,
    phonemes: Vec<Phoneme>,
}

impl Pinyin {
    pub(crate) fn derive(dict: &PinDict, raw: &str, id: usize) -> Pinyin {
        let kb = dict.keyboard();
        let phonemes = kb
            .split(raw)
            .into_iter()
            .map(|fragment| Phoneme::derive(dict, fragment))
            .collect();
        Pinyin {
            raw: raw.to_string(),
            id,
            duo: kb.duo,
            sequence: kb.sequence,
            phonemes,
        }
    }

    /// Stable id of this reading in the dictionary pool
    pub fn id(&self) -> usize {
        self.id
    }

    /// The normalized reading, e.g. "zhong1"
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn phonemes(&self) -> &[Phoneme] {
        &self.phonemes
    }

    /// Match this reading against the query at `start`
    ///
    /// Standard layouts compose phonemes strictly left to right, merging
    /// every intermediate success so a matched prefix ("zh" of "zhong") is
    /// itself a result; composition stops as soon as a phoneme matches
    /// nothing. Paired layouts treat the initial as optional, the final as
    /// mandatory and the tone as optional.
    pub(crate) fn match_at(&self, query: &[char], start: usize, partial: bool) -> IndexSet {
        if self.phonemes.is_empty() {
            return IndexSet::NONE;
        }
        let mut ret;
        if self.duo && self.phonemes.len() >= 2 {
            let mut active = self.phonemes[0].match_seq(query, IndexSet::ZERO, start, partial);
            active.merge(IndexSet::ZERO);
            active = self.phonemes[1].match_seq(query, active, start, partial);
            ret = active;
            for tone in &self.phonemes[2..] {
                let with_tone = tone.match_seq(query, active, start, partial);
                ret.merge(with_tone);
            }
        } else {
            ret = IndexSet::NONE;
            let mut active = IndexSet::ZERO;
            for phoneme in &self.phonemes {
                active = phoneme.match_seq(query, active, start, partial);
                if active.is_empty() {
                    break;
                }
                ret.merge(active);
            }
        }
        if self.sequence {
            if let (Some(&q), Some(c)) = (
                query.get(start),
                self.phonemes[0].source().chars().next(),
            ) {
                if q == c {
                    ret.set(1);
                }
            }
        }
        ret
    }
}

/// One dictionary character: the literal glyph plus its readings
#[derive(Debug, Clone)]
pub struct Character {
    glyph: char,
    pinyins: Vec<Pinyin>,
}

impl Character {
    /// Derive the matchers for a glyph under the current configuration
    ///
    /// Characters without dictionary readings (Latin letters, digits,
    /// punctuation inside candidates) still match their literal self.
    pub(crate) fn derive(dict: &PinDict, glyph: char) -> Character {
        let mut pinyins = Vec::new();
        if let Some(id) = dict.entry_id(glyph) {
            for (reading_id, raw) in dict.readings_at(id) {
                pinyins.push(Pinyin::derive(dict, raw, reading_id));
            }
        }
        Character { glyph, pinyins }
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }

    pub fn pinyins(&self) -> &[Pinyin] {
        &self.pinyins
    }

    /// Literal-glyph match unioned with every reading's match
    pub(crate) fn match_at(&self, query: &[char], start: usize, partial: bool) -> IndexSet {
        let mut ret = if query.get(start) == Some(&self.glyph) {
            IndexSet::ONE
        } else {
            IndexSet::NONE
        };
        for pinyin in &self.pinyins {
            ret.merge(pinyin.match_at(query, start, partial));
        }
        ret
    }
}

/// Count how many characters of `s` match the query starting at `start`
fn common_prefix(query: &[char], s: &str, start: usize) -> usize {
    let mut n = 0;
    for (i, c) in s.chars().enumerate() {
        match query.get(start + i) {
            Some(&q) if q == c => n += 1,
            _ => break,
        }
    }
    n
}

/// Compute the accepted spellings of a fragment
///
/// Layouts without a key remap take the direct path: the fuzzy rules are
/// mutually exclusive per fragment shape (initial rules key on the leading
/// letter, final rules on the trailing "n"/"ng"), so the alternatives can be
/// emitted in order with no duplicate suppression. Remap layouts may
/// collide after mapping, so their path deduplicates.
fn derive_spellings(src: &str, fuzzy: &FuzzySettings, kb: &Keyboard) -> Vec<String> {
    if src.is_empty() {
        return Vec::new();
    }
    if kb.has_remap() {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for alt in fuzzy_alternatives(src, fuzzy) {
            let keyed = kb.keys(&alt).to_string();
            if seen.insert(keyed.clone()) {
                out.push(keyed);
            }
        }
        return out;
    }

    let mut out: Vec<String> = Vec::new();
    if fuzzy.ch2c && src.starts_with('c') {
        out.push(swap_initial(src, "ch"));
        out.push(swap_initial(src, "c"));
    } else if fuzzy.sh2s && src.starts_with('s') {
        out.push(swap_initial(src, "sh"));
        out.push(swap_initial(src, "s"));
    } else if fuzzy.zh2z && src.starts_with('z') {
        out.push(swap_initial(src, "zh"));
        out.push(swap_initial(src, "z"));
    } else if fuzzy.u2v && src.starts_with('v') {
        out.push(src.to_string());
        out.push(format!("u{}", &src[1..]));
    } else if fuzzy.ang2an && src.ends_with("ang") {
        out.push(src[..src.len() - 1].to_string());
        out.push(src.to_string());
    } else if fuzzy.ang2an && src.ends_with("an") {
        out.push(src.to_string());
        out.push(format!("{}g", src));
    } else if fuzzy.eng2en && src.ends_with("eng") {
        out.push(src[..src.len() - 1].to_string());
        out.push(src.to_string());
    } else if fuzzy.eng2en && src.ends_with("en") {
        out.push(src.to_string());
        out.push(format!("{}g", src));
    } else if fuzzy.ing2in && src.ends_with("ing") {
        out.push(src[..src.len() - 1].to_string());
        out.push(src.to_string());
    } else if fuzzy.ing2in && src.ends_with("in") {
        out.push(src.to_string());
        out.push(format!("{}g", src));
    }

    if out.is_empty() {
        out.push(src.to_string());
    }
    out
}

/// The fragment plus every fuzzy-rule alternative, source first
fn fuzzy_alternatives(src: &str, fuzzy: &FuzzySettings) -> Vec<String> {
    let mut out = vec![src.to_string()];
    if fuzzy.ch2c && src.starts_with('c') {
        out.push(toggle_h(src, 'c'));
    }
    if fuzzy.sh2s && src.starts_with('s') {
        out.push(toggle_h(src, 's'));
    }
    if fuzzy.zh2z && src.starts_with('z') {
        out.push(toggle_h(src, 'z'));
    }
    if fuzzy.u2v && src.starts_with('v') {
        out.push(format!("u{}", &src[1..]));
    }
    if fuzzy.ang2an && src.ends_with("ang") {
        out.push(src[..src.len() - 1].to_string());
    } else if fuzzy.ang2an && src.ends_with("an") {
        out.push(format!("{}g", src));
    }
    if fuzzy.eng2en && src.ends_with("eng") {
        out.push(src[..src.len() - 1].to_string());
    } else if fuzzy.eng2en && src.ends_with("en") {
        out.push(format!("{}g", src));
    }
    if fuzzy.ing2in && src.ends_with("ing") {
        out.push(src[..src.len() - 1].to_string());
    } else if fuzzy.ing2in && src.ends_with("in") {
        out.push(format!("{}g", src));
    }
    out
}

/// Replace the initial of `src` ("c"/"ch"-style) with `with`
fn swap_initial(src: &str, with: &str) -> String {
    let body = if src.len() >= 2 && src.as_bytes()[1] == b'h' {
        &src[2..]
    } else {
        &src[1..]
    };
    format!("{}{}", with, body)
}

/// "zh" <-> "z" style toggle on the leading letter
fn toggle_h(src: &str, initial: char) -> String {
    if src.len() >= 2 && src.as_bytes()[1] == b'h' {
        format!("{}{}", initial, &src[2..])
    } else {
        format!("{}h{}", initial, &src[1..])
    }
}

/// Output styles for a normalized reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinyinFormat {
    /// Plain letters with the trailing tone digit: "zhong1"
    Number,
    /// Plain letters, tone stripped: "zhong"
    Raw,
    /// Diacritic form: "zhōng"
    Unicode,
}

/// Render a normalized reading ("zhong1") in the requested format
///
/// The diacritic lands on the vowel standard pinyin marks: "a" if present,
/// else "e", else the "o" of "ou", otherwise the last vowel. "v" is always
/// rendered as "ü". Tone 0 produces no mark.
pub fn format_reading(reading: &str, format: PinyinFormat) -> String {
    match format {
        PinyinFormat::Number => reading.to_string(),
        PinyinFormat::Raw => strip_tone(reading).0.to_string(),
        PinyinFormat::Unicode => {
            let (body, tone) = strip_tone(reading);
            let chars: Vec<char> = body.chars().collect();
            let mark = mark_position(&chars);
            let mut out = String::with_capacity(body.len() + 2);
            for (i, &c) in chars.iter().enumerate() {
                if Some(i) == mark && (1..=4).contains(&tone) {
                    out.push(marked_vowel(c, tone));
                } else if c == 'v' {
                    out.push('ü');
                } else {
                    out.push(c);
                }
            }
            out
        }
    }
}

fn strip_tone(reading: &str) -> (&str, u8) {
    match reading.as_bytes().last() {
        Some(&d) if d.is_ascii_digit() => (&reading[..reading.len() - 1], d - b'0'),
        _ => (reading, 0),
    }
}

fn mark_position(chars: &[char]) -> Option<usize> {
    if let Some(p) = chars.iter().position(|&c| c == 'a') {
        return Some(p);
    }
    if let Some(p) = chars.iter().position(|&c| c == 'e') {
        return Some(p);
    }
    if let Some(p) = chars.windows(2).position(|w| w[0] == 'o' && w[1] == 'u') {
        return Some(p);
    }
    chars
        .iter()
        .rposition(|&c| matches!(c, 'i' | 'o' | 'u' | 'v'))
}

fn marked_vowel(vowel: char, tone: u8) -> char {
    let row = match vowel {
        'a' => ['ā', 'á', 'ǎ', 'à'],
        'e' => ['ē', 'é', 'ě', 'è'],
        'i' => ['ī', 'í', 'ǐ', 'ì'],
        'o' => ['ō', 'ó', 'ǒ', 'ò'],
        'u' => ['ū', 'ú', 'ǔ', 'ù'],
        'v' => ['ǖ', 'ǘ', 'ǚ', 'ǜ'],
        other => return other,
    };
    row[(tone - 1) as usize]
}
