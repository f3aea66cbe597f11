// PinSearch Tree Searcher
// Adaptive compressed trie over candidate strings, traversed through the
// accelerator instead of by literal character comparison

use std::collections::BTreeSet;
use std::mem;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::accelerator::Accelerator;
use crate::dict::PinDict;
use crate::phonetic::Phoneme;
use crate::pool::CharPool;
use crate::types::Logic;

/// Entries an unstructured node may hold before committing to a structure
const DENSE_THRESHOLD: usize = 128;
/// Children a branching node may hold before it grows a phonetic index
const MAP_THRESHOLD: usize = 32;

type NodeId = usize;

/// Unstructured list of (stream position, candidate id) pairs; the initial
/// state of every branch while fan-out is still low
#[derive(Debug, Default)]
struct DenseNode {
    pairs: Vec<(usize, usize)>,
}

/// Compressed edge: the stream positions `[start, end)` are shared by every
/// candidate routed through here, then `exit` branches
#[derive(Debug)]
struct SliceNode {
    start: usize,
    end: usize,
    exit: NodeId,
}

/// Branching node: one child per next character, plus the candidates that
/// end exactly here
#[derive(Debug, Default)]
struct MapNode {
    children: FxHashMap<char, NodeId>,
    leaves: BTreeSet<usize>,
}

/// High-fan-out branching node with a phonetic index
///
/// The index maps a leading phoneme fragment to its derived phoneme and the
/// branch characters whose readings begin with it, so a fuzzy lookup fans
/// out only to the children that can actually match instead of scanning
/// them all. The index depends on the phonetic configuration, so it stores
/// the epoch it was built under and rebuilds lazily when that goes stale.
#[derive(Debug)]
struct AccNode {
    map: MapNode,
    index: FxHashMap<String, (Phoneme, FxHashSet<char>)>,
    epoch: u32,
}

#[derive(Debug)]
enum NodeKind {
    Dense(DenseNode),
    Slice(SliceNode),
    Map(MapNode),
    Acc(Box<AccNode>),
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Dense(DenseNode::default())
    }
}

/// Borrows a searcher's parts disjointly for one trie walk
struct TrieCtx<'a> {
    nodes: &'a mut Vec<NodeKind>,
    pool: &'a CharPool,
    acc: &'a mut Accelerator,
    dict: &'a PinDict,
    logic: Logic,
}

impl TrieCtx<'_> {
    fn alloc(&mut self, node: NodeKind) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

/// Insert the candidate suffix at `cursor` below node `id`
///
/// Returns the id that must occupy the caller's slot afterwards. Node-kind
/// upgrades allocate a replacement and return its id, so callers always
/// rebind; a superseded slot stays behind as an empty tombstone.
fn node_put(ctx: &mut TrieCtx, id: NodeId, cursor: usize, cand: usize) -> NodeId {
    match mem::take(&mut ctx.nodes[id]) {
        NodeKind::Dense(mut dense) => {
            if dense.pairs.len() < DENSE_THRESHOLD {
                dense.pairs.push((cursor, cand));
                ctx.nodes[id] = NodeKind::Dense(dense);
                id
            } else {
                // Commit to a structure: a slice spanning the common prefix
                // of everything stored here, then replay the entries into it
                let pattern = dense.pairs[0].0;
                let mut m = ctx.acc.common(ctx.pool, pattern, pattern, usize::MAX);
                for &(pos, _) in &dense.pairs[1..] {
                    m = m.min(ctx.acc.common(ctx.pool, pattern, pos, m));
                }
                let exit = ctx.alloc(NodeKind::Map(MapNode::default()));
                let mut sid = ctx.alloc(NodeKind::Slice(SliceNode {
                    start: pattern,
                    end: pattern + m,
                    exit,
                }));
                for (pos, c) in dense.pairs {
                    sid = node_put(ctx, sid, pos, c);
                }
                node_put(ctx, sid, cursor, cand)
            }
        }
        NodeKind::Slice(mut slice) => {
            let length = slice.end - slice.start;
            let m = ctx.acc.common(ctx.pool, slice.start, cursor, length);
            if m >= length {
                slice.exit = node_put(ctx, slice.exit, cursor + length, cand);
            } else {
                let at = slice.start + m;
                cut(ctx, &mut slice, at);
                slice.exit = node_put(ctx, slice.exit, cursor + m, cand);
            }
            let degenerate = slice.start == slice.end;
            let exit = slice.exit;
            ctx.nodes[id] = NodeKind::Slice(slice);
            if degenerate {
                exit
            } else {
                id
            }
        }
        NodeKind::Map(mut map) => {
            map_insert(ctx, &mut map, cursor, cand);
            if map.children.len() > MAP_THRESHOLD {
                let mut acc_node = AccNode {
                    map,
                    index: FxHashMap::default(),
                    epoch: ctx.dict.epoch(),
                };
                rebuild_index(ctx, &mut acc_node);
                ctx.alloc(NodeKind::Acc(Box::new(acc_node)))
            } else {
                ctx.nodes[id] = NodeKind::Map(map);
                id
            }
        }
        NodeKind::Acc(mut acc_node) => {
            if acc_node.epoch != ctx.dict.epoch() {
                rebuild_index(ctx, &mut acc_node);
                acc_node.epoch = ctx.dict.epoch();
            }
            map_insert(ctx, &mut acc_node.map, cursor, cand);
            if !ctx.pool.end(cursor) {
                let glyph = ctx.pool.char_at(cursor);
                index_char(ctx, &mut acc_node, glyph);
            }
            ctx.nodes[id] = NodeKind::Acc(acc_node);
            id
        }
    }
}

/// Split a slice at `offset`: the part before stays here, a new branching
/// map takes the diverging character, and the old tail hangs below it
fn cut(ctx: &mut TrieCtx, slice: &mut SliceNode, offset: usize) {
    let branch_char = ctx.pool.char_at(offset);
    let tail = if offset + 1 == slice.end {
        slice.exit
    } else {
        ctx.alloc(NodeKind::Slice(SliceNode {
            start: offset + 1,
            end: slice.end,
            exit: slice.exit,
        }))
    };
    let mut map = MapNode::default();
    map.children.insert(branch_char, tail);
    slice.exit = ctx.alloc(NodeKind::Map(map));
    slice.end = offset;
}

/// Leaf/child insertion shared by Map and Acc nodes
fn map_insert(ctx: &mut TrieCtx, map: &mut MapNode, cursor: usize, cand: usize) {
    if ctx.pool.end(cursor) {
        map.leaves.insert(cand);
    } else {
        let ch = ctx.pool.char_at(cursor);
        let child = match map.children.get(&ch) {
            Some(&c) => c,
            None => {
                let c = ctx.alloc(NodeKind::Dense(DenseNode::default()));
                map.children.insert(ch, c);
                c
            }
        };
        let new_child = node_put(ctx, child, cursor + 1, cand);
        map.children.insert(ch, new_child);
    }
}

fn rebuild_index(ctx: &mut TrieCtx, node: &mut AccNode) {
    node.index.clear();
    let glyphs: Vec<char> = node.map.children.keys().copied().collect();
    for glyph in glyphs {
        index_char(ctx, node, glyph);
    }
}

/// Register a branch character under the leading phoneme of each reading
fn index_char(ctx: &mut TrieCtx, node: &mut AccNode, glyph: char) {
    let character = ctx.acc.character(ctx.dict, glyph);
    for pinyin in character.pinyins() {
        if let Some(first) = pinyin.phonemes().first() {
            if first.is_empty() {
                continue;
            }
            node.index
                .entry(first.source().to_string())
                .or_insert_with(|| (first.clone(), FxHashSet::default()))
                .1
                .insert(glyph);
        }
    }
}

/// Collect matches below node `id`, consuming the query from `offset`
fn node_get(ctx: &mut TrieCtx, id: NodeId, ret: &mut BTreeSet<usize>, offset: usize) {
    let node = mem::take(&mut ctx.nodes[id]);
    let node = match node {
        NodeKind::Dense(dense) => {
            let full = ctx.logic == Logic::Equal;
            if !full && ctx.acc.query_len() == offset {
                for &(_, cand) in &dense.pairs {
                    ret.insert(cand);
                }
            } else {
                // Entries are not walked character by character; validate
                // each one directly against the rest of the query
                for &(pos, cand) in &dense.pairs {
                    let hit = if full {
                        ctx.acc.matches(ctx.dict, ctx.pool, offset, pos)
                    } else {
                        ctx.acc.begins(ctx.dict, ctx.pool, offset, pos)
                    };
                    if hit {
                        ret.insert(cand);
                    }
                }
            }
            NodeKind::Dense(dense)
        }
        NodeKind::Slice(slice) => {
            slice_get(ctx, &slice, ret, offset, 0);
            NodeKind::Slice(slice)
        }
        NodeKind::Map(map) => {
            map_get(ctx, &map, ret, offset);
            NodeKind::Map(map)
        }
        NodeKind::Acc(mut acc_node) => {
            if acc_node.epoch != ctx.dict.epoch() {
                rebuild_index(ctx, &mut acc_node);
                acc_node.epoch = ctx.dict.epoch();
            }
            acc_get(ctx, &acc_node, ret, offset);
            NodeKind::Acc(acc_node)
        }
    };
    ctx.nodes[id] = node;
}

fn slice_get(ctx: &mut TrieCtx, slice: &SliceNode, ret: &mut BTreeSet<usize>, offset: usize, rel: usize) {
    if slice.start + rel == slice.end {
        node_get(ctx, slice.exit, ret, offset);
    } else if offset == ctx.acc.query_len() {
        // Query exhausted mid-slice: everything below is a continuation
        if ctx.logic != Logic::Equal {
            node_collect(ctx, slice.exit, ret);
        }
    } else {
        let ch = ctx.pool.char_at(slice.start + rel);
        let is = ctx.acc.get_char(ctx.dict, ch, offset);
        for i in is.iter() {
            slice_get(ctx, slice, ret, offset + i as usize, rel + 1);
        }
    }
}

fn map_get(ctx: &mut TrieCtx, map: &MapNode, ret: &mut BTreeSet<usize>, offset: usize) {
    if ctx.acc.query_len() == offset {
        ret.extend(map.leaves.iter().copied());
        if ctx.logic != Logic::Equal {
            for &child in map.children.values() {
                node_collect(ctx, child, ret);
            }
        }
    } else {
        for (&ch, &child) in &map.children {
            let is = ctx.acc.get_char(ctx.dict, ch, offset);
            for i in is.iter() {
                node_get(ctx, child, ret, offset + i as usize);
            }
        }
    }
}

fn acc_get(ctx: &mut TrieCtx, node: &AccNode, ret: &mut BTreeSet<usize>, offset: usize) {
    if ctx.acc.query_len() == offset {
        ret.extend(node.map.leaves.iter().copied());
        if ctx.logic != Logic::Equal {
            for &child in node.map.children.values() {
                node_collect(ctx, child, ret);
            }
        }
        return;
    }
    // Literal continuation: the query character itself names a child
    let q = ctx.acc.query().get(offset).copied();
    if let Some(q) = q {
        if let Some(&child) = node.map.children.get(&q) {
            node_get(ctx, child, ret, offset + 1);
        }
    }
    // Phonetic continuation: fan out only through phonemes that can match.
    // A first-letter hit must pass the gate too, or sequence shortcuts
    // would vanish at the upgrade boundary.
    for (phoneme, glyphs) in node.index.values() {
        let seq_hit = q.map_or(false, |c| phoneme.matches_first_letter(c));
        if !seq_hit && ctx.acc.get_phoneme(phoneme, offset).is_empty() {
            continue;
        }
        for &glyph in glyphs {
            if let Some(&child) = node.map.children.get(&glyph) {
                let is = ctx.acc.get_char(ctx.dict, glyph, offset);
                for i in is.iter() {
                    node_get(ctx, child, ret, offset + i as usize);
                }
            }
        }
    }
}

/// Accept everything in the subtree below `id`
fn node_collect(ctx: &mut TrieCtx, id: NodeId, ret: &mut BTreeSet<usize>) {
    let node = mem::take(&mut ctx.nodes[id]);
    match &node {
        NodeKind::Dense(dense) => {
            for &(_, cand) in &dense.pairs {
                ret.insert(cand);
            }
        }
        NodeKind::Slice(slice) => node_collect(ctx, slice.exit, ret),
        NodeKind::Map(map) => {
            ret.extend(map.leaves.iter().copied());
            for &child in map.children.values() {
                node_collect(ctx, child, ret);
            }
        }
        NodeKind::Acc(acc_node) => {
            ret.extend(acc_node.map.leaves.iter().copied());
            for &child in acc_node.map.children.values() {
                node_collect(ctx, child, ret);
            }
        }
    }
    ctx.nodes[id] = node;
}

/// Fuzzy pinyin searcher over a dynamically growing candidate collection
///
/// Owns the candidate pool, the accelerator and the trie; the dictionary is
/// borrowed per call, so reconfiguring it (which needs `&mut`) cannot race
/// an active search. Insertion and search both notice a changed dictionary
/// epoch and refresh their caches before doing anything else; committing a
/// config change is all that is needed for the next search to see it.
///
/// Not internally synchronized: share-nothing per thread (see
/// [`ShardedSearcher`](crate::shard::ShardedSearcher)) instead of locking.
pub struct TreeSearcher {
    logic: Logic,
    pool: CharPool,
    acc: Accelerator,
    nodes: Vec<NodeKind>,
    root: NodeId,
    epoch: u32,
    count: usize,
}

impl TreeSearcher {
    pub fn new(logic: Logic) -> Self {
        TreeSearcher {
            logic,
            pool: CharPool::new(),
            acc: Accelerator::new(),
            nodes: vec![NodeKind::default()],
            root: 0,
            epoch: 0,
            count: 0,
        }
    }

    pub fn logic(&self) -> Logic {
        self.logic
    }

    /// Number of candidates inserted
    pub fn candidates(&self) -> usize {
        self.count
    }

    /// Insert one candidate, returning its stable id
    ///
    /// Under `Contain`, every suffix of the candidate is walked into the
    /// trie so a query can start matching anywhere; all suffixes share this
    /// one id. Duplicate texts are inserted again, not deduplicated.
    pub fn insert(&mut self, dict: &PinDict, keyword: &str) -> usize {
        self.renew(dict);
        let pos = self.pool.put(keyword);
        let walks = if self.logic == Logic::Contain {
            self.pool.last_len()
        } else {
            1
        };

        let logic = self.logic;
        let mut root = self.root;
        let TreeSearcher { nodes, pool, acc, .. } = self;
        let mut ctx = TrieCtx {
            nodes,
            pool,
            acc,
            dict,
            logic,
        };
        for i in 0..walks {
            root = node_put(&mut ctx, root, pos + i, pos);
        }
        self.root = root;
        self.count += 1;
        pos
    }

    /// Search, returning matching candidate ids in ascending order
    ///
    /// An empty query is legal and returns everything (the documented
    /// worst case).
    pub fn search(&mut self, dict: &PinDict, query: &str) -> Vec<usize> {
        self.renew(dict);
        self.acc.prime(query);
        self.acc.set_partial(self.logic != Logic::Equal);

        let mut ret = BTreeSet::new();
        let logic = self.logic;
        let root = self.root;
        let TreeSearcher { nodes, pool, acc, .. } = self;
        let mut ctx = TrieCtx {
            nodes,
            pool,
            acc,
            dict,
            logic,
        };
        node_get(&mut ctx, root, &mut ret, 0);
        ret.into_iter().collect()
    }

    /// Search, resolving ids to owned strings
    pub fn search_strings(&mut self, dict: &PinDict, query: &str) -> Vec<String> {
        self.search(dict, query)
            .into_iter()
            .map(|id| self.pool.str_at(id))
            .collect()
    }

    /// Resolve a candidate id back to its text (an owned copy)
    pub fn resolve(&self, id: usize) -> String {
        self.pool.str_at(id)
    }

    /// Catch up with a changed dictionary configuration
    fn renew(&mut self, dict: &PinDict) {
        if self.epoch != dict.epoch() {
            self.acc.reset_all();
            self.epoch = dict.epoch();
        }
    }
}
