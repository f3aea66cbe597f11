// PinSearch Keyboard Layouts
// Syllable cutters and per-layout remap tables for pinyin input schemes

/// One input scheme: how a toned reading is cut into phoneme fragments and
/// how each fragment maps to the keys actually typed
///
/// `local` rewrites whole syllable bodies into their canonical form before
/// cutting (used by layouts whose source data spells zero-initials out, e.g.
/// "you" for "iu"). `keys` rewrites individual fragments to key strings.
/// `duo` marks paired-key (shuangpin) layouts where one keystroke covers the
/// whole initial or final; `sequence` allows the first-letter shortcut where
/// a single keystroke stands for a whole character.
#[derive(Debug, Clone, Copy)]
pub struct Keyboard {
    local: Option<&'static [(&'static str, &'static str)]>,
    keys: Option<&'static [(&'static str, &'static str)]>,
    cutter: fn(&str) -> Vec<&str>,
    pub duo: bool,
    pub sequence: bool,
}

impl Keyboard {
    /// Full pinyin, typed letter for letter
    pub const QUANPIN: Keyboard = Keyboard {
        local: None,
        keys: None,
        cutter: split_standard,
        duo: false,
        sequence: true,
    };
    /// Dazhuyin (bopomofo on a QWERTY layout)
    pub const DAQIAN: Keyboard = Keyboard {
        local: Some(PHONETIC_LOCAL),
        keys: Some(DAQIAN_KEYS),
        cutter: split_standard,
        duo: false,
        sequence: false,
    };
    /// Xiaohe shuangpin
    pub const XIAOHE: Keyboard = Keyboard {
        local: None,
        keys: Some(XIAOHE_KEYS),
        cutter: split_zero,
        duo: true,
        sequence: false,
    };
    /// Ziranma shuangpin
    pub const ZIRANMA: Keyboard = Keyboard {
        local: None,
        keys: Some(ZIRANMA_KEYS),
        cutter: split_zero,
        duo: true,
        sequence: false,
    };
    /// Sougou shuangpin
    pub const SOUGOU: Keyboard = Keyboard {
        local: None,
        keys: Some(SOUGOU_KEYS),
        cutter: split_zero,
        duo: true,
        sequence: false,
    };
    /// Guobiao shuangpin
    pub const GUOBIAO: Keyboard = Keyboard {
        local: None,
        keys: Some(GUOBIAO_KEYS),
        cutter: split_zero,
        duo: true,
        sequence: false,
    };
    /// Microsoft shuangpin
    pub const MICROSOFT: Keyboard = Keyboard {
        local: None,
        keys: Some(MICROSOFT_KEYS),
        cutter: split_zero,
        duo: true,
        sequence: false,
    };
    /// Pinyin++ shuangpin
    pub const PINYINPP: Keyboard = Keyboard {
        local: None,
        keys: Some(PINYINPP_KEYS),
        cutter: split_zero,
        duo: true,
        sequence: false,
    };
    /// Ziguang shuangpin
    pub const ZIGUANG: Keyboard = Keyboard {
        local: None,
        keys: Some(ZIGUANG_KEYS),
        cutter: split_zero,
        duo: true,
        sequence: false,
    };

    /// Map one fragment to the keys typed for it (identity when unmapped)
    pub fn keys<'a>(&self, s: &'a str) -> &'a str {
        match self.keys.and_then(|table| lookup(table, s)) {
            Some(mapped) => mapped,
            None => s,
        }
    }

    /// Whether this layout rewrites fragments at all
    pub fn has_remap(&self) -> bool {
        self.keys.is_some()
    }

    /// Cut a toned reading ("zhong1") into fragments (["zh", "ong", "1"])
    ///
    /// The trailing tone digit always becomes its own fragment. The body is
    /// first rewritten through the `local` table when one is present.
    pub fn split<'a>(&self, s: &'a str) -> Vec<&'a str> {
        if s.is_empty() {
            return Vec::new();
        }
        let cut = s.len() - 1;
        let mut body = &s[..cut];
        let tone = &s[cut..];

        if let Some(table) = self.local {
            if let Some(mapped) = lookup(table, body) {
                body = mapped;
            }
        }
        let mut result = (self.cutter)(body);
        result.push(tone);
        result
    }
}

/// Whether a syllable body starts with an initial consonant
fn has_initial(s: &str) -> bool {
    !matches!(
        s.bytes().next(),
        None | Some(b'a' | b'e' | b'i' | b'o' | b'u' | b'v')
    )
}

/// Standard cut: optional initial ("z"/"zh"-style), then the final
pub fn split_standard(s: &str) -> Vec<&str> {
    let mut result = Vec::with_capacity(2);
    let mut cursor = 0;
    if has_initial(s) {
        cursor = if s.len() >= 2 && s.as_bytes()[1] == b'h' { 2 } else { 1 };
        result.push(&s[..cursor]);
    }
    if s.len() != cursor {
        result.push(&s[cursor..]);
    }
    result
}

/// Shuangpin cut: like standard, but a zero-initial syllable is split into
/// its first letter plus a final so it still takes two keystrokes
pub fn split_zero(s: &str) -> Vec<&str> {
    let ss = split_standard(s);
    if ss.len() == 1 {
        let finale = ss[0];
        if finale.len() == 2 {
            vec![&finale[..1], &finale[1..]]
        } else {
            vec![&finale[..1], finale]
        }
    } else {
        ss
    }
}

/// Binary search over a sorted static table
fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .binary_search_by_key(&key, |&(k, _)| k)
        .ok()
        .map(|i| table[i].1)
}

// Remap tables, sorted by key for binary search.

static PHONETIC_LOCAL: &[(&str, &str)] = &[
    ("chi", "ch"),
    ("ci", "c"),
    ("ju", "jv"),
    ("juan", "jvan"),
    ("jue", "jve"),
    ("jun", "jvn"),
    ("qu", "qv"),
    ("quan", "qvan"),
    ("que", "qve"),
    ("qun", "qvn"),
    ("ri", "r"),
    ("shi", "sh"),
    ("si", "s"),
    ("wen", "un"),
    ("wu", "u"),
    ("xu", "xv"),
    ("xuan", "xvan"),
    ("xue", "xve"),
    ("xun", "xvn"),
    ("ye", "ie"),
    ("yi", "i"),
    ("yin", "in"),
    ("ying", "ing"),
    ("you", "iu"),
    ("yu", "v"),
    ("yuan", "van"),
    ("yue", "ve"),
    ("yun", "vn"),
    ("zhi", "zh"),
    ("zi", "z"),
];

static DAQIAN_KEYS: &[(&str, &str)] = &[
    ("", ""),
    ("0", ""),
    ("1", " "),
    ("2", "6"),
    ("3", "3"),
    ("4", "4"),
    ("a", "8"),
    ("ai", "9"),
    ("an", "0"),
    ("ang", ";"),
    ("ao", "l"),
    ("b", "1"),
    ("c", "h"),
    ("ch", "t"),
    ("d", "2"),
    ("e", "k"),
    ("ei", "o"),
    ("en", "p"),
    ("eng", "/"),
    ("er", "-"),
    ("f", "z"),
    ("g", "e"),
    ("h", "c"),
    ("i", "u"),
    ("ia", "u8"),
    ("ian", "u0"),
    ("iang", "u;"),
    ("iao", "ul"),
    ("ie", "u,"),
    ("in", "up"),
    ("ing", "u/"),
    ("iong", "m/"),
    ("iu", "u."),
    ("j", "r"),
    ("k", "d"),
    ("l", "x"),
    ("m", "a"),
    ("n", "s"),
    ("o", "i"),
    ("ong", "j/"),
    ("ou", "."),
    ("p", "q"),
    ("q", "f"),
    ("r", "b"),
    ("s", "n"),
    ("sh", "g"),
    ("t", "w"),
    ("u", "j"),
    ("ua", "j8"),
    ("uai", "j9"),
    ("uan", "j0"),
    ("uang", "j;"),
    ("uen", "mp"),
    ("ueng", "j/"),
    ("ui", "jo"),
    ("un", "jp"),
    ("uo", "ji"),
    ("v", "m"),
    ("van", "m0"),
    ("vang", "m;"),
    ("ve", "m,"),
    ("vn", "mp"),
    ("w", "j"),
    ("x", "v"),
    ("y", "u"),
    ("z", "y"),
    ("zh", "5"),
];

static XIAOHE_KEYS: &[(&str, &str)] = &[
    ("ai", "d"),
    ("an", "j"),
    ("ang", "h"),
    ("ao", "c"),
    ("ch", "i"),
    ("ei", "w"),
    ("en", "f"),
    ("eng", "g"),
    ("ia", "x"),
    ("ian", "m"),
    ("iang", "l"),
    ("iao", "n"),
    ("ie", "p"),
    ("in", "b"),
    ("ing", "k"),
    ("iong", "s"),
    ("iu", "q"),
    ("ong", "s"),
    ("ou", "z"),
    ("sh", "u"),
    ("ua", "x"),
    ("uai", "k"),
    ("uan", "r"),
    ("uang", "l"),
    ("ue", "t"),
    ("ui", "v"),
    ("un", "y"),
    ("uo", "o"),
    ("ve", "t"),
    ("vn", "y"),
    ("zh", "v"),
];

static ZIRANMA_KEYS: &[(&str, &str)] = &[
    ("ai", "l"),
    ("an", "j"),
    ("ang", "h"),
    ("ao", "k"),
    ("ch", "i"),
    ("ei", "z"),
    ("en", "f"),
    ("eng", "g"),
    ("ia", "w"),
    ("ian", "m"),
    ("iang", "d"),
    ("iao", "c"),
    ("ie", "x"),
    ("in", "n"),
    ("ing", "y"),
    ("iong", "s"),
    ("iu", "q"),
    ("ong", "s"),
    ("ou", "b"),
    ("sh", "u"),
    ("ua", "w"),
    ("uai", "y"),
    ("uan", "r"),
    ("uang", "d"),
    ("ue", "t"),
    ("ui", "v"),
    ("un", "p"),
    ("uo", "o"),
    ("ve", "t"),
    ("vn", "p"),
    ("zh", "v"),
];

static SOUGOU_KEYS: &[(&str, &str)] = &[
    ("ai", "l"),
    ("an", "j"),
    ("ang", "h"),
    ("ao", "k"),
    ("ch", "i"),
    ("ei", "z"),
    ("en", "f"),
    ("eng", "g"),
    ("ia", "w"),
    ("ian", "m"),
    ("iang", "d"),
    ("iao", "c"),
    ("ie", "x"),
    ("in", "n"),
    ("ing", ";"),
    ("iong", "s"),
    ("iu", "q"),
    ("ong", "s"),
    ("ou", "b"),
    ("sh", "u"),
    ("ua", "w"),
    ("uai", "y"),
    ("uan", "r"),
    ("uang", "d"),
    ("ue", "t"),
    ("ui", "v"),
    ("un", "p"),
    ("uo", "o"),
    ("v", "y"),
    ("ve", "t"),
    ("zh", "v"),
];

static GUOBIAO_KEYS: &[(&str, &str)] = &[
    ("ai", "k"),
    ("an", "f"),
    ("ang", "g"),
    ("ao", "c"),
    ("ch", "i"),
    ("ei", "b"),
    ("en", "r"),
    ("eng", "h"),
    ("er", "l"),
    ("ia", "q"),
    ("ian", "d"),
    ("iang", "n"),
    ("iao", "m"),
    ("ie", "t"),
    ("in", "l"),
    ("ing", "j"),
    ("iong", "s"),
    ("iu", "y"),
    ("ong", "s"),
    ("ou", "p"),
    ("sh", "u"),
    ("ua", "q"),
    ("uai", "y"),
    ("uan", "w"),
    ("uang", "n"),
    ("ui", "v"),
    ("un", "z"),
    ("uo", "o"),
    ("van", "w"),
    ("ve", "x"),
    ("vn", "z"),
    ("zh", "v"),
];

static MICROSOFT_KEYS: &[(&str, &str)] = &[
    ("ai", "l"),
    ("an", "j"),
    ("ang", "h"),
    ("ao", "k"),
    ("ch", "i"),
    ("ei", "z"),
    ("en", "f"),
    ("eng", "g"),
    ("er", "r"),
    ("ia", "w"),
    ("ian", "m"),
    ("iang", "d"),
    ("iao", "c"),
    ("ie", "x"),
    ("in", "n"),
    ("ing", ";"),
    ("iong", "s"),
    ("iu", "q"),
    ("ong", "s"),
    ("ou", "b"),
    ("sh", "u"),
    ("ua", "w"),
    ("uai", "y"),
    ("uan", "r"),
    ("uang", "d"),
    ("ue", "t"),
    ("ui", "v"),
    ("un", "p"),
    ("uo", "o"),
    ("v", "y"),
    ("ve", "v"),
    ("zh", "v"),
];

static PINYINPP_KEYS: &[(&str, &str)] = &[
    ("ai", "s"),
    ("an", "f"),
    ("ang", "g"),
    ("ao", "d"),
    ("ch", "u"),
    ("ei", "w"),
    ("en", "r"),
    ("eng", "t"),
    ("er", "q"),
    ("ia", "b"),
    ("ian", "j"),
    ("iang", "h"),
    ("iao", "k"),
    ("ie", "m"),
    ("in", "l"),
    ("ing", "q"),
    ("iong", "y"),
    ("iu", "n"),
    ("ong", "y"),
    ("ou", "p"),
    ("sh", "i"),
    ("ua", "b"),
    ("uai", "x"),
    ("uan", "c"),
    ("uang", "h"),
    ("ue", "x"),
    ("ui", "v"),
    ("un", "z"),
    ("uo", "o"),
    ("zh", "v"),
];

static ZIGUANG_KEYS: &[(&str, &str)] = &[
    ("ai", "p"),
    ("an", "r"),
    ("ang", "s"),
    ("ao", "q"),
    ("ch", "a"),
    ("ei", "k"),
    ("en", "w"),
    ("eng", "t"),
    ("er", "j"),
    ("ia", "x"),
    ("ian", "f"),
    ("iang", "g"),
    ("iao", "b"),
    ("ie", "d"),
    ("in", "y"),
    ("ing", ";"),
    ("iong", "h"),
    ("iu", "j"),
    ("ong", "h"),
    ("ou", "z"),
    ("sh", "i"),
    ("ua", "x"),
    ("uai", "y"),
    ("uan", "l"),
    ("uang", "g"),
    ("ue", "n"),
    ("un", "m"),
    ("uo", "o"),
    ("ve", "n"),
    ("zh", "u"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_cut() {
        assert_eq!(split_standard("zhong"), vec!["zh", "ong"]);
        assert_eq!(split_standard("tian"), vec!["t", "ian"]);
        assert_eq!(split_standard("an"), vec!["an"]);
        assert_eq!(split_standard("zh"), vec!["zh"]);
        assert_eq!(split_standard("e"), vec!["e"]);
    }

    #[test]
    fn test_zero_cut_splits_zero_initials() {
        // Zero-initial syllables still take two keystrokes in shuangpin
        assert_eq!(split_zero("an"), vec!["a", "n"]);
        assert_eq!(split_zero("ang"), vec!["a", "ang"]);
        assert_eq!(split_zero("e"), vec!["e", "e"]);
        // Syllables with an initial pass through untouched
        assert_eq!(split_zero("zhong"), vec!["zh", "ong"]);
        assert_eq!(split_zero("tian"), vec!["t", "ian"]);
    }

    #[test]
    fn test_split_appends_tone() {
        let kb = Keyboard::QUANPIN;
        assert_eq!(kb.split("zhong1"), vec!["zh", "ong", "1"]);
        assert_eq!(kb.split("an4"), vec!["an", "4"]);
        assert!(kb.split("").is_empty());
    }

    #[test]
    fn test_local_rewrite_before_cut() {
        // Daqian canonicalizes spelled-out zero initials before cutting
        let kb = Keyboard::DAQIAN;
        assert_eq!(kb.split("you3"), vec!["iu", "3"]);
        assert_eq!(kb.split("zhi1"), vec!["zh", "1"]);
    }

    #[test]
    fn test_key_remap() {
        let kb = Keyboard::XIAOHE;
        assert_eq!(kb.keys("zh"), "v");
        assert_eq!(kb.keys("ang"), "h");
        assert_eq!(kb.keys("b"), "b"); // unmapped fragments pass through
        assert!(!Keyboard::QUANPIN.has_remap());
        assert!(kb.has_remap());
    }

    #[test]
    fn test_tables_sorted_for_binary_search() {
        for table in [
            PHONETIC_LOCAL,
            DAQIAN_KEYS,
            XIAOHE_KEYS,
            ZIRANMA_KEYS,
            SOUGOU_KEYS,
            GUOBIAO_KEYS,
            MICROSOFT_KEYS,
            PINYINPP_KEYS,
            ZIGUANG_KEYS,
        ] {
            for pair in table.windows(2) {
                assert!(pair[0].0 < pair[1].0, "{:?} out of order", pair);
            }
        }
    }
}
