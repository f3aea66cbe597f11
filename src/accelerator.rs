// PinSearch Accelerator
// Per-query memo cache keyed by (offset, phonetic identity)

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::dict::PinDict;
use crate::index_set::{IndexSet, Storage};
use crate::phonetic::{Character, Phoneme, Pinyin};
use crate::pool::CharPool;

/// Memoizes phonetic match results for the active query
///
/// One accelerator belongs to one searcher. Per query offset it maps a
/// phonetic identity (a pinyin's pool id, or a phoneme's packed fragment
/// key) to its computed [`IndexSet`], so candidates sharing a reading or a
/// phoneme pay the match cost once per query instead of once per candidate.
/// The memo is cleared whenever the query string, the partial mode, or the
/// dictionary configuration changes.
#[derive(Default)]
pub struct Accelerator {
    query: Vec<char>,
    query_str: String,
    cache: Vec<Storage>,
    chars: FxHashMap<char, Arc<Character>>,
    partial: bool,
}

impl Accelerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the active query; a changed query clears the memo
    pub fn prime(&mut self, text: &str) {
        if text != self.query_str {
            self.query_str.clear();
            self.query_str.push_str(text);
            self.query = text.chars().collect();
            self.reset();
        }
    }

    pub fn query(&self) -> &[char] {
        &self.query
    }

    pub fn query_len(&self) -> usize {
        self.query.len()
    }

    /// Partial mode: a query ending mid-syllable still counts
    ///
    /// `Begin`/`Contain` searches run partial; `Equal` runs exact. Changing
    /// the mode invalidates the memo, since cached results depend on it.
    pub fn set_partial(&mut self, partial: bool) {
        if self.partial != partial {
            self.partial = partial;
            self.reset();
        }
    }

    /// Clear the per-query memo
    pub fn reset(&mut self) {
        self.cache.clear();
    }

    /// Clear everything derived, memo and characters (configuration change)
    pub fn reset_all(&mut self) {
        self.cache.clear();
        self.chars.clear();
    }

    /// Derived matchers for a glyph, memoized until the next config change
    pub fn character(&mut self, dict: &PinDict, glyph: char) -> Arc<Character> {
        self.chars
            .entry(glyph)
            .or_insert_with(|| Arc::new(Character::derive(dict, glyph)))
            .clone()
    }

    fn storage(&mut self, offset: usize) -> &mut Storage {
        if self.cache.len() <= offset {
            self.cache.resize_with(offset + 1, Storage::default);
        }
        &mut self.cache[offset]
    }

    /// Memoized match of one reading at a query offset
    pub fn get_pinyin(&mut self, pinyin: &Pinyin, offset: usize) -> IndexSet {
        let key = pinyin.id() as u64;
        if let Some(hit) = self.storage(offset).get(key) {
            return hit;
        }
        let ret = pinyin.match_at(&self.query, offset, self.partial);
        self.storage(offset).set(ret, key);
        ret
    }

    /// Memoized match of one phoneme at a query offset
    pub fn get_phoneme(&mut self, phoneme: &Phoneme, offset: usize) -> IndexSet {
        let key = phoneme.key();
        if let Some(hit) = self.storage(offset).get(key) {
            return hit;
        }
        let ret = phoneme.match_at(&self.query, offset, self.partial);
        self.storage(offset).set(ret, key);
        ret
    }

    /// Match one character at a query offset
    ///
    /// The literal-glyph bit plus every reading's match. Caching happens per
    /// reading rather than per character, so characters sharing a reading
    /// reuse each other's results.
    pub fn get_char(&mut self, dict: &PinDict, glyph: char, offset: usize) -> IndexSet {
        let character = self.character(dict, glyph);
        let mut ret = if self.query.get(offset) == Some(&glyph) {
            IndexSet::ONE
        } else {
            IndexSet::NONE
        };
        for pinyin in character.pinyins() {
            ret.merge(self.get_pinyin(pinyin, offset));
        }
        ret
    }

    /// Longest common prefix, in characters, of two pool positions
    ///
    /// Stops at `max`, at the first string's terminator, or at the first
    /// mismatch.
    pub fn common(&self, pool: &CharPool, s1: usize, s2: usize, max: usize) -> usize {
        for i in 0..max {
            if pool.end(s1 + i) {
                return i;
            }
            if pool.char_at(s1 + i) != pool.char_at(s2 + i) {
                return i;
            }
        }
        max
    }

    /// Does the rest of the query consume the candidate at `start` exactly?
    pub fn matches(&mut self, dict: &PinDict, pool: &CharPool, offset: usize, start: usize) -> bool {
        if self.partial {
            self.partial = false;
            self.reset();
        }
        self.check(dict, pool, offset, start)
    }

    /// Is the rest of the query a prefix of the candidate at `start`?
    pub fn begins(&mut self, dict: &PinDict, pool: &CharPool, offset: usize, start: usize) -> bool {
        if !self.partial {
            self.partial = true;
            self.reset();
        }
        self.check(dict, pool, offset, start)
    }

    /// Does the query match anywhere at or after `start`?
    ///
    /// Scans successive start positions; useful for validating ad-hoc
    /// positions. Bulk substring search goes through suffix insertion in
    /// the trie instead.
    pub fn contains(&mut self, dict: &PinDict, pool: &CharPool, offset: usize, start: usize) -> bool {
        if !self.partial {
            self.partial = true;
            self.reset();
        }
        let mut i = start;
        while !pool.end(i) {
            if self.check(dict, pool, offset, i) {
                return true;
            }
            i += 1;
        }
        false
    }

    fn check(&mut self, dict: &PinDict, pool: &CharPool, offset: usize, start: usize) -> bool {
        if offset == self.query.len() {
            return self.partial || pool.end(start);
        }
        if pool.end(start) {
            return false;
        }
        let s = self.get_char(dict, pool.char_at(start), offset);
        if pool.end(start + 1) {
            // Last candidate character: it must consume the rest exactly
            s.get((self.query.len() - offset) as u32)
        } else {
            s.iter()
                .any(|i| self.check(dict, pool, offset + i as usize, start + 1))
        }
    }
}
