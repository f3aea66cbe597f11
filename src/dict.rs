// PinSearch Dictionary
// Pinyin dictionary loading, the reading pool, and the fuzzy-rule config

use std::io::BufRead;
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::keyboard::Keyboard;
use crate::types::DictError;

/// Compact built-in dictionary for demos and tests
///
/// Real deployments should load a full dictionary with
/// [`PinDict::from_path`]; the embedded table covers a few dozen common
/// characters in the same line format.
const BUILTIN_DICT: &str = include_str!("../data/pinyin-mini.txt");

/// Independent fuzzy-rule toggles
///
/// Each flag makes a pair of spellings interchangeable in both directions,
/// e.g. `zh2z` lets "z" stand for "zh" and "zh" for "z".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuzzySettings {
    pub zh2z: bool,
    pub sh2s: bool,
    pub ch2c: bool,
    pub ang2an: bool,
    pub eng2en: bool,
    pub ing2in: bool,
    pub u2v: bool,
}

impl FuzzySettings {
    /// Every rule enabled
    pub fn all() -> Self {
        FuzzySettings {
            zh2z: true,
            sh2s: true,
            ch2c: true,
            ang2an: true,
            eng2en: true,
            ing2in: true,
            u2v: true,
        }
    }
}

/// Pinyin dictionary plus the active matching configuration
///
/// Readings are interned into one byte pool as lowercase letters with a
/// trailing tone digit, comma-separated per character and NUL-terminated
/// per entry. The pool offset of a reading is its stable pinyin id; the
/// pool offset of an entry's first reading is the character's id.
///
/// The dictionary is plain data and can be shared read-only across search
/// shards. Reconfiguring requires `&mut self` (through [`PinDict::config`]),
/// so the borrow checker rules out config changes while any search borrows
/// the dictionary.
pub struct PinDict {
    index: FxHashMap<char, usize>,
    pool: Vec<u8>,
    keyboard: Keyboard,
    fuzzy: FuzzySettings,
    epoch: u32,
}

impl PinDict {
    /// Load a dictionary file
    ///
    /// The format is one entry per line: `U+<hex>: <readings> # comment`,
    /// readings comma-separated with diacritic tone marks. Unreadable files
    /// are an error; malformed lines are skipped.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DictError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Load a dictionary from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DictError> {
        let mut index = FxHashMap::default();
        let mut pool = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if let Some((glyph, readings)) = parse_line(&line) {
                let id = pool.len();
                for (i, reading) in readings.iter().enumerate() {
                    if i > 0 {
                        pool.push(b',');
                    }
                    pool.extend_from_slice(reading.as_bytes());
                }
                pool.push(0);
                index.insert(glyph, id);
            }
        }

        Ok(PinDict {
            index,
            pool,
            keyboard: Keyboard::QUANPIN,
            fuzzy: FuzzySettings::default(),
            epoch: 0,
        })
    }

    /// The embedded mini dictionary
    pub fn builtin() -> Self {
        Self::from_reader(BUILTIN_DICT.as_bytes()).expect("embedded dictionary loads")
    }

    /// Whether this character has any dictionary readings
    pub fn has_readings(&self, glyph: char) -> bool {
        self.index.contains_key(&glyph)
    }

    /// No entries were loaded
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Entry id for a character, if present
    pub(crate) fn entry_id(&self, glyph: char) -> Option<usize> {
        self.index.get(&glyph).copied()
    }

    /// Readings of one entry with their stable pinyin ids
    pub(crate) fn readings_at(&self, id: usize) -> Vec<(usize, &str)> {
        let mut out = Vec::new();
        let mut start = id;
        let mut i = id;
        while i < self.pool.len() && self.pool[i] != 0 {
            if self.pool[i] == b',' {
                out.push((start, pool_str(&self.pool[start..i])));
                start = i + 1;
            }
            i += 1;
        }
        out.push((start, pool_str(&self.pool[start..i])));
        out
    }

    /// Readings of a character, with or without the tone digit
    ///
    /// Toneless readings are deduplicated in first-seen order ("hǎo,hào"
    /// yields one "hao"). Characters without an entry return an empty list.
    pub fn readings(&self, glyph: char, with_tone: bool) -> Vec<String> {
        let Some(id) = self.entry_id(glyph) else {
            return Vec::new();
        };
        let all = self.readings_at(id);
        if with_tone {
            return all.into_iter().map(|(_, r)| r.to_string()).collect();
        }
        let mut seen: Vec<String> = Vec::new();
        for (_, reading) in all {
            let bare = &reading[..reading.len() - 1];
            if !seen.iter().any(|s| s.as_str() == bare) {
                seen.push(bare.to_string());
            }
        }
        seen
    }

    /// Per-character readings of a whole string
    ///
    /// Characters without an entry echo themselves, so the result always
    /// has one list per input character.
    pub fn readings_list(&self, text: &str, with_tone: bool) -> Vec<Vec<String>> {
        text.chars()
            .map(|c| {
                if self.has_readings(c) {
                    self.readings(c, with_tone)
                } else {
                    vec![c.to_string()]
                }
            })
            .collect()
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn fuzzy(&self) -> &FuzzySettings {
        &self.fuzzy
    }

    /// Monotonic modification counter, bumped by every [`Config::commit`]
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Start a configuration change
    pub fn config(&mut self) -> Config<'_> {
        let keyboard = self.keyboard;
        let fuzzy = self.fuzzy;
        Config {
            dict: self,
            keyboard,
            fuzzy,
        }
    }
}

impl Default for PinDict {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Pending configuration snapshot
///
/// Edit the public fields, then [`commit`](Config::commit). Commit always
/// bumps the modification epoch, whether or not anything changed, so
/// callers should avoid redundant commits. Searchers notice the new epoch
/// on their next operation and rebuild their caches lazily; no explicit
/// reload call exists or is needed.
pub struct Config<'a> {
    dict: &'a mut PinDict,
    pub keyboard: Keyboard,
    pub fuzzy: FuzzySettings,
}

impl Config<'_> {
    /// Apply the snapshot atomically
    pub fn commit(self) {
        self.dict.keyboard = self.keyboard;
        self.dict.fuzzy = self.fuzzy;
        self.dict.epoch += 1;
    }
}

/// The pool holds only ASCII, so this cannot fail in practice
fn pool_str(bytes: &[u8]) -> &str {
    std::str::from_utf8(bytes).unwrap_or("")
}

/// Parse one dictionary line into a glyph and its normalized readings
///
/// Returns `None` for anything malformed: missing `U+`, bad hex, an invalid
/// codepoint, or no usable reading.
fn parse_line(line: &str) -> Option<(char, Vec<String>)> {
    let line = line.trim();
    let rest = line.strip_prefix("U+")?;
    let (hex, rest) = rest.split_once(':')?;
    let cp = u32::from_str_radix(hex.trim(), 16).ok()?;
    let glyph = char::from_u32(cp)?;

    let body = match rest.split_once('#') {
        Some((b, _)) => b,
        None => rest,
    };

    let mut readings = Vec::new();
    for part in body.split(',') {
        if let Some(r) = normalize_reading(part) {
            readings.push(r);
        }
    }
    if readings.is_empty() {
        None
    } else {
        Some((glyph, readings))
    }
}

/// Fold a diacritic reading to plain letters plus a trailing tone digit
///
/// "zhōng" becomes "zhong1", "lüè" becomes "lve4". Characters that are
/// neither ASCII letters nor known tone marks are skipped.
fn normalize_reading(s: &str) -> Option<String> {
    let mut letters = String::new();
    let mut tone = 0u8;
    for c in s.trim().chars() {
        if c.is_ascii_alphabetic() {
            letters.push(c.to_ascii_lowercase());
        } else if let Some((plain, t)) = fold_tone(c) {
            letters.push(plain);
            if t > 0 {
                tone = t;
            }
        }
    }
    if letters.is_empty() {
        None
    } else {
        letters.push((b'0' + tone) as char);
        Some(letters)
    }
}

/// Tone-marked vowel to (plain letter, tone); `ü` maps to `v`
fn fold_tone(c: char) -> Option<(char, u8)> {
    Some(match c {
        'ā' => ('a', 1),
        'á' => ('a', 2),
        'ǎ' => ('a', 3),
        'à' => ('a', 4),
        'ē' => ('e', 1),
        'é' => ('e', 2),
        'ě' => ('e', 3),
        'è' => ('e', 4),
        'ī' => ('i', 1),
        'í' => ('i', 2),
        'ǐ' => ('i', 3),
        'ì' => ('i', 4),
        'ō' => ('o', 1),
        'ó' => ('o', 2),
        'ǒ' => ('o', 3),
        'ò' => ('o', 4),
        'ū' => ('u', 1),
        'ú' => ('u', 2),
        'ǔ' => ('u', 3),
        'ù' => ('u', 4),
        'ǖ' => ('v', 1),
        'ǘ' => ('v', 2),
        'ǚ' => ('v', 3),
        'ǜ' => ('v', 4),
        'ü' => ('v', 0),
        'ń' => ('n', 2),
        'ň' => ('n', 3),
        'ǹ' => ('n', 4),
        'ḿ' => ('m', 2),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict_of(src: &str) -> PinDict {
        PinDict::from_reader(src.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_basic_line() {
        let dict = dict_of("U+4E2D: zhōng,zhòng # 中\n");
        assert!(dict.has_readings('中'));
        assert_eq!(dict.readings('中', true), vec!["zhong1", "zhong4"]);
        assert_eq!(dict.readings('中', false), vec!["zhong"]);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let dict = dict_of(
            "garbage\n\
             U+ZZZZ: bad hex\n\
             U+4E2D zhōng\n\
             # pure comment\n\
             U+5317: běi # 北\n",
        );
        assert!(dict.has_readings('北'));
        assert!(!dict.has_readings('中'));
        assert_eq!(dict.index.len(), 1);
    }

    #[test]
    fn test_tone_folding() {
        let dict = dict_of("U+7565: lüè # 略\nU+7EFF: lǜ # 绿\nU+5973: nǚ # 女\n");
        assert_eq!(dict.readings('略', true), vec!["lve4"]);
        assert_eq!(dict.readings('绿', true), vec!["lv4"]);
        assert_eq!(dict.readings('女', true), vec!["nv3"]);
    }

    #[test]
    fn test_unmarked_reading_gets_tone_zero() {
        let dict = dict_of("U+554A: a # 啊 neutral\n");
        assert_eq!(dict.readings('啊', true), vec!["a0"]);
    }

    #[test]
    fn test_toneless_dedup_keeps_order() {
        let dict = dict_of("U+597D: hǎo,hào # 好\n");
        assert_eq!(dict.readings('好', true), vec!["hao3", "hao4"]);
        assert_eq!(dict.readings('好', false), vec!["hao"]);
    }

    #[test]
    fn test_readings_list_echoes_unknown() {
        let dict = dict_of("U+4E2D: zhōng # 中\n");
        let list = dict.readings_list("中x", false);
        assert_eq!(list, vec![vec!["zhong".to_string()], vec!["x".to_string()]]);
    }

    #[test]
    fn test_reading_ids_are_stable_offsets() {
        let dict = dict_of("U+4E2D: zhōng,zhòng # 中\nU+5317: běi # 北\n");
        let id = dict.entry_id('中').unwrap();
        let readings = dict.readings_at(id);
        assert_eq!(readings[0], (id, "zhong1"));
        assert_eq!(readings[1].1, "zhong4");
        assert_ne!(readings[0].0, readings[1].0);

        let bei = dict.entry_id('北').unwrap();
        assert_eq!(dict.readings_at(bei)[0].1, "bei3");
    }

    #[test]
    fn test_commit_bumps_epoch() {
        let mut dict = dict_of("U+4E2D: zhōng # 中\n");
        assert_eq!(dict.epoch(), 0);

        let mut config = dict.config();
        config.fuzzy.zh2z = true;
        config.commit();
        assert_eq!(dict.epoch(), 1);
        assert!(dict.fuzzy().zh2z);

        // Commit with no changes still advances the epoch
        dict.config().commit();
        assert_eq!(dict.epoch(), 2);
    }

    #[test]
    fn test_builtin_loads() {
        let dict = PinDict::builtin();
        assert!(!dict.is_empty());
        assert!(dict.has_readings('北'));
        assert!(dict.has_readings('京'));
        assert_eq!(dict.readings('重', true), vec!["zhong4", "chong2"]);
    }
}
