// PinSearch Index Set
// Bitset algebra over consumed-query lengths

use rustc_hash::FxHashMap;

/// Set of query-consumption lengths, packed into one `u32`
///
/// Bit `i` means "a match consuming exactly `i` characters of the query
/// exists". A single character usually produces several bits at once, e.g.
/// the reading "zhong1" matched against "zhong1..." yields bits for "z"
/// (fuzzy), "zh", "zhong" and "zhong1".
///
/// Lengths are capped at 31: `offset` shifts bits out the top of the word,
/// so a compound match longer than 31 characters is silently discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSet(u32);

impl IndexSet {
    /// No match at all
    pub const NONE: IndexSet = IndexSet(0);
    /// Matched zero characters so far; the identity for composition chains
    pub const ZERO: IndexSet = IndexSet(1);
    /// Matched exactly one character (literal single-character matches)
    pub const ONE: IndexSet = IndexSet(2);

    /// Record a match of length `index`; lengths past 31 are dropped
    pub fn set(&mut self, index: u32) {
        if index < 32 {
            self.0 |= 1u32 << index;
        }
    }

    /// Check whether a match of length `index` was recorded
    pub fn get(self, index: u32) -> bool {
        index < 32 && self.0 & (1u32 << index) != 0
    }

    /// Union `other` into this set
    ///
    /// One exception makes `ZERO` a usable identity: if this set is exactly
    /// `ZERO`, the merge replaces it wholesale instead of unioning, so bit 0
    /// does not pollute every composed result.
    pub fn merge(&mut self, other: IndexSet) {
        self.0 = if self.0 == 1 { other.0 } else { self.0 | other.0 };
    }

    /// Shift every recorded length up by `i`
    ///
    /// Used when a subsequent phoneme matched after a prior match of length
    /// `i`. Lengths pushed past 31 are dropped (saturating truncation).
    pub fn offset(&mut self, i: u32) {
        self.0 = if i < 32 { self.0 << i } else { 0 };
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate recorded lengths in ascending order
    pub fn iter(self) -> Indices {
        Indices { value: self.0, index: 0 }
    }
}

/// Ascending iterator over the set bits of an [`IndexSet`]
pub struct Indices {
    value: u32,
    index: u32,
}

impl Iterator for Indices {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        while self.value != 0 {
            let index = self.index;
            let hit = self.value & 1 != 0;
            self.value >>= 1;
            self.index += 1;
            if hit {
                return Some(index);
            }
        }
        None
    }
}

/// Memo map from a phonetic identity key to a cached [`IndexSet`]
///
/// Values are stored with a +1 offset so a raw 0 never appears; an absent
/// key is therefore unambiguously "not yet computed" rather than "computed
/// and matched nothing", and a cached `NONE` is still a hit.
#[derive(Debug, Default)]
pub struct Storage {
    data: FxHashMap<u64, u32>,
}

impl Storage {
    pub fn set(&mut self, is: IndexSet, key: u64) {
        self.data.insert(key, is.0 + 1);
    }

    pub fn get(&self, key: u64) -> Option<IndexSet> {
        self.data.get(&key).map(|&v| IndexSet(v - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert!(IndexSet::ZERO.get(0));
        assert!(!IndexSet::ZERO.get(1));
        assert!(IndexSet::ONE.get(1));
        assert!(!IndexSet::ONE.get(0));
        assert!(IndexSet::NONE.is_empty());
    }

    #[test]
    fn test_zero_merge_replaces() {
        // ZERO is the identity: merging onto it replaces wholesale
        let mut a = IndexSet::ZERO;
        let mut b = IndexSet::NONE;
        b.set(3);
        b.set(5);
        a.merge(b);
        assert_eq!(a, b);
        assert!(!a.get(0), "bit 0 must not leak through the identity");
    }

    #[test]
    fn test_non_zero_merge_unions() {
        let mut a = IndexSet::NONE;
        a.set(2);
        let mut b = IndexSet::NONE;
        b.set(4);
        a.merge(b);
        assert!(a.get(2) && a.get(4));

        // ONE is not the identity, so merging keeps both
        let mut c = IndexSet::ONE;
        c.merge(b);
        assert!(c.get(1) && c.get(4));
    }

    #[test]
    fn test_offset_shifts_lengths() {
        let mut s = IndexSet::NONE;
        s.set(0);
        s.set(2);
        s.offset(3);
        assert!(s.get(3));
        assert!(s.get(5));
        assert!(!s.get(0));
        assert!(!s.get(2));
    }

    #[test]
    fn test_offset_truncates_past_31() {
        // Lengths beyond 31 are unrepresentable and silently dropped
        let mut s = IndexSet::NONE;
        s.set(5);
        s.offset(28);
        assert!(s.is_empty());

        // Bit 31 itself is still representable
        let mut t = IndexSet::NONE;
        t.set(1);
        t.set(30);
        t.offset(1);
        assert_eq!(t.iter().collect::<Vec<_>>(), vec![2, 31]);

        let mut u = IndexSet::ZERO;
        u.offset(40);
        assert!(u.is_empty());
    }

    #[test]
    fn test_iter_ascending_and_finite() {
        let mut s = IndexSet::NONE;
        s.set(7);
        s.set(0);
        s.set(31);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![0, 7, 31]);
        assert_eq!(IndexSet::NONE.iter().count(), 0);
    }

    #[test]
    fn test_storage_distinguishes_cached_none() {
        let mut storage = Storage::default();
        assert_eq!(storage.get(42), None);

        storage.set(IndexSet::NONE, 42);
        assert_eq!(storage.get(42), Some(IndexSet::NONE));

        let mut s = IndexSet::NONE;
        s.set(4);
        storage.set(s, 7);
        assert_eq!(storage.get(7), Some(s));
    }
}
