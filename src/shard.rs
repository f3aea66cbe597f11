// PinSearch Sharded Search
// Partitioned parallel search over independently owned tries

use std::panic;
use std::thread;

use crate::dict::PinDict;
use crate::tree::TreeSearcher;
use crate::types::Logic;

/// Partitions the candidate set across N independent searchers and runs one
/// query against all of them on parallel threads
///
/// Each shard owns its trie and accelerator outright; nothing mutable is
/// shared between workers. The dictionary is borrowed read-only by every
/// worker for the duration of one search call, which is exactly the quiesce
/// discipline the engine requires: the borrow checker will not allow a
/// config commit while a search is in flight.
///
/// Worth using for large collections; for small ones the thread dispatch
/// costs more than it saves.
pub struct ShardedSearcher {
    shards: Vec<TreeSearcher>,
    next: usize,
}

impl ShardedSearcher {
    /// Create `shard_count` shards (clamped to at least one)
    pub fn new(logic: Logic, shard_count: usize) -> Self {
        let n = shard_count.max(1);
        ShardedSearcher {
            shards: (0..n).map(|_| TreeSearcher::new(logic)).collect(),
            next: 0,
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Total candidates across all shards
    pub fn candidates(&self) -> usize {
        self.shards.iter().map(|s| s.candidates()).sum()
    }

    /// Insert one candidate into the next shard, round robin
    ///
    /// Single-threaded by design; do not interleave with a running search.
    pub fn insert(&mut self, dict: &PinDict, keyword: &str) {
        self.shards[self.next].insert(dict, keyword);
        self.next = (self.next + 1) % self.shards.len();
    }

    /// Search every shard in parallel and merge the results
    ///
    /// Result order follows shard order, each shard's hits in its own
    /// insertion-id order. A panicking worker is resumed on this thread.
    pub fn search(&mut self, dict: &PinDict, query: &str) -> Vec<String> {
        let results: Vec<Vec<String>> = thread::scope(|scope| {
            let handles: Vec<_> = self
                .shards
                .iter_mut()
                .map(|shard| scope.spawn(move || shard.search_strings(dict, query)))
                .collect();
            handles
                .into_iter()
                .map(|h| match h.join() {
                    Ok(hits) => hits,
                    Err(e) => panic::resume_unwind(e),
                })
                .collect()
        });
        results.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_distribution() {
        let dict = PinDict::builtin();
        let mut sharded = ShardedSearcher::new(Logic::Begin, 3);
        for text in ["北京", "上海", "广州", "深圳", "成都"] {
            sharded.insert(&dict, text);
        }
        assert_eq!(sharded.shard_count(), 3);
        assert_eq!(sharded.candidates(), 5);
    }

    #[test]
    fn test_parallel_search_merges_all_shards() {
        let dict = PinDict::builtin();
        let mut sharded = ShardedSearcher::new(Logic::Begin, 4);
        sharded.insert(&dict, "北京");
        sharded.insert(&dict, "上海");
        sharded.insert(&dict, "北海");
        sharded.insert(&dict, "南京");

        let mut hits = sharded.search(&dict, "bei");
        hits.sort();
        assert_eq!(hits, vec!["北京", "北海"]);
    }

    #[test]
    fn test_zero_shards_clamps_to_one() {
        let dict = PinDict::builtin();
        let mut sharded = ShardedSearcher::new(Logic::Begin, 0);
        sharded.insert(&dict, "北京");
        assert_eq!(sharded.shard_count(), 1);
        assert_eq!(sharded.search(&dict, "beijing"), vec!["北京"]);
    }
}
