//! # PinSearch: Fuzzy Pinyin Search Engine
//!
//! Real-time substring/prefix/exact search over Chinese text from partial,
//! toneless, abbreviated or dialect-ambiguous Latin-letter input.
//!
//! ## Three Acceptance Rules
//!
//! 1. **Begin** - the query is a prefix of the candidate
//!    - `"bj"` or `"beijing"` finds 北京
//! 2. **Contain** - the query starts anywhere inside the candidate
//!    - `"jing"` finds 北京
//! 3. **Equal** - the query accounts for the whole candidate
//!    - `"beijing"` finds 北京, `"beijin"` does not
//!
//! ## What "fuzzy" means here
//!
//! - Toneless or toned input: `"zhong"` and `"zhong1"` both find 中
//! - First-letter sequences: `"bj"` finds 北京
//! - Configurable rule pairs: zh/z, ch/c, sh/s, ang/an, eng/en, ing/in, v/u
//! - Alternate keyboard layouts: quanpin, daqian and seven shuangpin schemes
//! - Literal hanzi in the query match themselves
//!
//! ## Example Usage
//!
//! ```
//! use pinsearch::{Logic, PinDict, TreeSearcher};
//!
//! let mut dict = PinDict::builtin();
//! let mut searcher = TreeSearcher::new(Logic::Contain);
//! searcher.insert(&dict, "北京");
//! searcher.insert(&dict, "南京");
//!
//! assert_eq!(searcher.search_strings(&dict, "bj"), vec!["北京"]);
//! assert_eq!(searcher.search_strings(&dict, "jing").len(), 2);
//!
//! // Enable a fuzzy rule; the next search picks it up automatically
//! let mut config = dict.config();
//! config.fuzzy.zh2z = true;
//! config.commit();
//! ```
//!
//! ## Architecture
//!
//! - **IndexSet** - bitset algebra over consumed-query lengths
//! - **Phonetic Model** - character -> pinyin -> phoneme decomposition with
//!   fuzzy spelling derivation
//! - **Accelerator** - per-query memo cache making fuzzy matching sub-linear
//!   in the candidate count
//! - **TreeSearcher** - adaptive compressed trie traversed through the
//!   accelerator; the main entry point
//! - **ShardedSearcher** - thread-parallel wrapper over independent shards

pub mod accelerator;
pub mod dict;
pub mod index_set;
pub mod keyboard;
pub mod phonetic;
pub mod pool;
pub mod shard;
pub mod tree;
pub mod types;

// Re-export main types and functions for convenience
pub use accelerator::Accelerator;
pub use dict::{Config, FuzzySettings, PinDict};
pub use index_set::IndexSet;
pub use keyboard::Keyboard;
pub use phonetic::{format_reading, Character, Phoneme, Pinyin, PinyinFormat};
pub use pool::CharPool;
pub use shard::ShardedSearcher;
pub use tree::TreeSearcher;
pub use types::{DictError, Logic};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
