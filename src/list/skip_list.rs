// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! Skip List
//!
//! An ordered multimap with expected O(log n) insert, search and remove, and no
//! rebalancing. Keys may repeat; among equal keys the most recently inserted
//! entry comes first.
//!
//! # Structure
//!
//! ```text
//! Level 2: HEAD -------------------------> c ----------------> NULL
//! Level 1: HEAD ---------> a ------------> c -------> e -----> NULL
//! Level 0: HEAD -> a' ---> a ---> b -----> c -> d --> e -----> NULL
//! ```
//!
//! A node drawn at level L owns L + 1 forward links and sits in the chains of
//! levels 0..=L. The head owns one link per level currently in use: it grows
//! when a taller node arrives and shrinks once its top chains empty out.
//!
//! Nodes live in an arena and link to each other by index, so there are no
//! back-references and no reference cycles. Removed slots are recycled through
//! a free list.
//!
//! # Operations
//!
//! - `insert(key, value)`: O(log n) expected
//! - `search(key)`: O(log n + matches) expected, most recent first
//! - `remove(key)`: O(log n) expected, removes the most recent match
//! - `remove_by_value(value)`: O(n), removes the leftmost match
//! - `iter()` / `dump()`: O(n), level-0 order

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;

use log::trace;
use rand::rngs::StdRng;
use smallvec::SmallVec;
use smallvec::smallvec;

use super::level::BitSource;
use super::level::RandomBits;
use super::level::random_level;
use super::pair::KvPair;

/// Node index type. u32 saves space vs usize on 64-bit.
type Idx = u32;

/// Null index marker: the end of a chain.
const NULL: Idx = Idx::MAX;

/// Stands for the head in predecessor paths. Never a real arena slot.
const HEAD: Idx = Idx::MAX - 1;

/// One predecessor per level, top to bottom. Inline for lists up to 16 levels high.
type Path = SmallVec<[Idx; 16]>;

struct Node<K, V> {
    pair: KvPair<K, V>,
    /// Forward links, one per level 0..=level. Never resized.
    next: Box<[Idx]>,
}

impl<K, V> Node<K, V> {
    fn level(&self) -> usize {
        self.next.len() - 1
    }
}

#[cold]
fn dangling(idx: Idx) -> ! {
    panic!("link to freed slot {}", idx)
}

#[cold]
fn arena_exhausted(len: usize) -> ! {
    panic!("arena exhausted at {} nodes", len)
}

/// The index of a new slot at position `len`. `NULL` and `HEAD` are reserved.
fn slot_index(len: usize) -> Idx {
    match Idx::try_from(len) {
        Ok(idx) if idx < HEAD => idx,
        _ => arena_exhausted(len),
    }
}

/// An ordered, duplicate-tolerant skip list.
///
/// `B` supplies the coin flips that decide node heights. The default draws from
/// a [`StdRng`] seeded by the OS; use [`SkipList::with_bits`] with a
/// [`ScriptedBits`](super::level::ScriptedBits) for reproducible layouts.
///
/// Not thread-safe: callers that share a list must serialize access themselves.
pub struct SkipList<K, V, B = RandomBits<StdRng>> {
    /// Arena of nodes. `None` marks a freed slot.
    nodes: Vec<Option<Node<K, V>>>,
    /// Freed slots waiting for reuse.
    free_list: Vec<Idx>,
    /// Head links, one per level in use. Never empty.
    head: Vec<Idx>,
    /// Number of entries.
    len: usize,
    bits: B,
}

impl<K, V> SkipList<K, V> {
    pub fn new() -> Self {
        Self::with_bits(RandomBits::from_entropy())
    }
}

impl<K, V> Default for SkipList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, B> SkipList<K, V, B> {
    /// Create an empty list drawing levels from `bits`.
    pub fn with_bits(bits: B) -> Self {
        SkipList {
            nodes: Vec::new(),
            free_list: Vec::new(),
            head: vec![NULL],
            len: 0,
            bits,
        }
    }

    /// The level source, e.g. to queue more scripted bits mid-run.
    pub fn bits_mut(&mut self) -> &mut B {
        &mut self.bits
    }

    /// Number of entries (the list's size).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current head level. 0 for an empty list, otherwise the tallest node's level.
    pub fn level(&self) -> usize {
        self.head.len() - 1
    }

    /// All entries in level-0 order: ascending key, most recent first among equals.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            current: self.head[0],
            remaining: self.len,
        }
    }

    // --- Node access helpers ---

    fn node(&self, idx: Idx) -> &Node<K, V> {
        match &self.nodes[idx as usize] {
            Some(node) => node,
            None => dangling(idx),
        }
    }

    fn links(&self, at: Idx) -> &[Idx] {
        if at == HEAD {
            &self.head[..]
        } else {
            &self.node(at).next[..]
        }
    }

    fn links_mut(&mut self, at: Idx) -> &mut [Idx] {
        if at == HEAD {
            return &mut self.head[..];
        }
        match &mut self.nodes[at as usize] {
            Some(node) => &mut node.next[..],
            None => dangling(at),
        }
    }

    fn alloc(&mut self, node: Node<K, V>) -> Idx {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx as usize] = Some(node);
            idx
        } else {
            let idx = slot_index(self.nodes.len());
            self.nodes.push(Some(node));
            idx
        }
    }

    fn free(&mut self, idx: Idx) -> Node<K, V> {
        match self.nodes[idx as usize].take() {
            Some(node) => {
                self.free_list.push(idx);
                node
            }
            None => dangling(idx),
        }
    }
}

impl<K: Ord, V, B: BitSource> SkipList<K, V, B> {
    /// Draw a level for the next node.
    pub fn random_level(&mut self) -> usize {
        random_level(&mut self.bits)
    }

    /// Insert an entry. It lands ahead of every existing entry with an equal key.
    pub fn insert(&mut self, key: K, value: V) {
        let level = self.random_level();
        if level > self.level() {
            trace!("head grows from level {} to {}", self.level(), level);
            self.head.resize(level + 1, NULL);
        }

        let path = self.descend(&key);
        let next: Box<[Idx]> = (0..=level).map(|l| self.links(path[l])[l]).collect();
        let idx = self.alloc(Node {
            pair: KvPair::new(key, value),
            next,
        });
        for l in 0..=level {
            self.links_mut(path[l])[l] = idx;
        }

        self.len += 1;
        self.check_invariants();
    }
}

impl<K: Ord, V, B> SkipList<K, V, B> {
    /// Walk down from the head. At each level, step past nodes whose key is
    /// strictly less than `key` and record where we stopped.
    fn descend<Q>(&self, key: &Q) -> Path
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut path: Path = smallvec![HEAD; self.head.len()];
        let mut at = HEAD;
        for level in (0..self.head.len()).rev() {
            loop {
                let next = self.links(at)[level];
                if next == NULL || Borrow::<Q>::borrow(&self.node(next).pair.key) >= key {
                    break;
                }
                at = next;
            }
            path[level] = at;
        }
        path
    }

    /// All entries with this key, most recently inserted first.
    ///
    /// The key may be any borrowed form of `K`, as with `BTreeMap::get`.
    pub fn search<Q>(&self, key: &Q) -> Vec<&KvPair<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let path = self.descend(key);
        let mut found = Vec::new();
        let mut idx = self.links(path[0])[0];
        while idx != NULL {
            let node = self.node(idx);
            if Borrow::<Q>::borrow(&node.pair.key) != key {
                break;
            }
            found.push(&node.pair);
            idx = node.next[0];
        }
        found
    }

    /// Remove the most recently inserted entry with this key.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<KvPair<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let path = self.descend(key);
        let target = self.links(path[0])[0];
        if target == NULL || Borrow::<Q>::borrow(&self.node(target).pair.key) != key {
            return None;
        }
        Some(self.unlink(target, &path))
    }

    /// Remove the leftmost entry (in level-0 order) whose value equals `value`.
    ///
    /// Values carry no ordering, so this is a linear walk along level 0 that keeps
    /// the last node seen at every level as that level's predecessor.
    pub fn remove_by_value(&mut self, value: &V) -> Option<KvPair<K, V>>
    where
        V: PartialEq,
    {
        let mut path: Path = smallvec![HEAD; self.head.len()];
        let mut idx = self.head[0];
        while idx != NULL {
            if self.node(idx).pair.value == *value {
                return Some(self.unlink(idx, &path));
            }
            let node = self.node(idx);
            for pred in path.iter_mut().take(node.next.len()) {
                *pred = idx;
            }
            idx = node.next[0];
        }
        None
    }

    /// Splice `target` out of every chain it sits in, then trim the head.
    /// `path[l]` must be target's predecessor at each level l it occupies.
    fn unlink(&mut self, target: Idx, path: &[Idx]) -> KvPair<K, V> {
        for level in 0..self.head.len() {
            let pred = path[level];
            if self.links(pred)[level] != target {
                break;
            }
            let succ = self.node(target).next[level];
            self.links_mut(pred)[level] = succ;
        }

        let before = self.level();
        while self.head.len() > 1 && self.head.last() == Some(&NULL) {
            self.head.pop();
        }
        if self.level() != before {
            trace!("head shrinks from level {} to {}", before, self.level());
        }

        let node = self.free(target);
        self.len -= 1;
        self.check_invariants();
        node.pair
    }

    // --- Invariant checking ---

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        // Invariant 1: iter count matches len
        let iter_count = self.iter().count();
        assert_eq!(
            iter_count, self.len,
            "INVARIANT VIOLATED: iter().count()={} != len()={}",
            iter_count, self.len
        );

        // Invariant 2: level 0 is sorted and no node outgrows the head
        let mut prev: Option<&K> = None;
        let mut idx = self.head[0];
        while idx != NULL {
            let node = self.node(idx);
            assert!(
                node.level() <= self.level(),
                "INVARIANT VIOLATED: node level {} > head level {}",
                node.level(),
                self.level()
            );
            if let Some(prev) = prev {
                assert!(*prev <= node.pair.key, "INVARIANT VIOLATED: level 0 out of order");
            }
            prev = Some(&node.pair.key);
            idx = node.next[0];
        }

        // Invariant 3: each level's chain is exactly the level-0 nodes that tall
        for level in 1..self.head.len() {
            let mut express = self.head[level];
            let mut idx = self.head[0];
            while idx != NULL {
                let node = self.node(idx);
                if node.level() >= level {
                    assert_eq!(
                        express, idx,
                        "INVARIANT VIOLATED: level {} chain skips a node",
                        level
                    );
                    express = node.next[level];
                }
                idx = node.next[0];
            }
            assert_eq!(express, NULL, "INVARIANT VIOLATED: level {} chain overruns", level);
        }

        // Invariant 4: the head's top chain is in use unless the head is at level 0
        assert!(
            self.head.len() == 1 || self.head[self.head.len() - 1] != NULL,
            "INVARIANT VIOLATED: head level {} has an empty top chain",
            self.level()
        );
    }

    #[cfg(not(debug_assertions))]
    #[inline(always)]
    fn check_invariants(&self) {}
}

impl<K: fmt::Display, V: fmt::Display, B> SkipList<K, V, B> {
    /// A text dump of the whole structure: the head, then every entry with its
    /// level, then the entry count.
    pub fn dump(&self) -> String {
        Dump(self).to_string()
    }
}

struct Dump<'a, K, V, B>(&'a SkipList<K, V, B>);

impl<K: fmt::Display, V: fmt::Display, B> fmt::Display for Dump<'_, K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = self.0;
        writeln!(f, "SkipList dump:")?;
        writeln!(f, "Node with depth {}, value null", list.level().max(1))?;
        let mut idx = list.head[0];
        while idx != NULL {
            let node = list.node(idx);
            writeln!(
                f,
                "node with depth {} value {} {}",
                node.level(),
                node.pair.key,
                node.pair.value
            )?;
            idx = node.next[0];
        }
        writeln!(f, "SkipList size is: {}", list.len)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, B> fmt::Debug for SkipList<K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K: Ord, V, B: BitSource> Extend<(K, V)> for SkipList<K, V, B> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipList<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}

impl<'a, K, V, B> IntoIterator for &'a SkipList<K, V, B> {
    type Item = &'a KvPair<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Single-pass reader over level 0.
pub struct Iter<'a, K, V> {
    nodes: &'a [Option<Node<K, V>>],
    current: Idx,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a KvPair<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NULL {
            return None;
        }

        let node = match &self.nodes[self.current as usize] {
            Some(node) => node,
            None => dangling(self.current),
        };
        self.current = node.next[0];
        self.remaining -= 1;
        Some(&node.pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::level::ScriptedBits;
    use crate::rect::Rectangle;

    fn scripted<V>(bits: &[bool]) -> SkipList<&'static str, V, ScriptedBits> {
        SkipList::with_bits(ScriptedBits::new(bits.iter().copied()))
    }

    fn values<K, V: Clone>(found: &[&KvPair<K, V>]) -> Vec<V> {
        found.iter().map(|pair| pair.value.clone()).collect()
    }

    #[test]
    fn empty_list() {
        let mut list: SkipList<&str, i32, _> = scripted(&[]);
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert_eq!(list.level(), 0);
        assert!(list.search(&"A").is_empty());
        assert_eq!(list.remove(&"A"), None);
        assert_eq!(list.remove_by_value(&1), None);
        assert_eq!(list.len(), 0);
        assert_eq!(list.iter().next(), None);
    }

    #[test]
    fn empty_dump() {
        let list: SkipList<&str, i32, _> = scripted(&[]);
        assert_eq!(
            list.dump(),
            "SkipList dump:\nNode with depth 1, value null\nSkipList size is: 0\n"
        );
    }

    #[test]
    fn insert_one_rectangle() {
        let mut list = scripted(&[false]);
        list.insert("A", Rectangle::new(0, 0, 5, 5));
        assert_eq!(list.len(), 1);
        assert_eq!(list.level(), 1);
        assert_eq!(values(&list.search(&"A")), vec![Rectangle::new(0, 0, 5, 5)]);
    }

    #[test]
    fn duplicates_come_back_most_recent_first() {
        let mut list = scripted(&[false, false, true, false]);
        list.insert("k", 1);
        list.insert("k", 2);
        list.insert("k", 3);
        assert_eq!(values(&list.search(&"k")), vec![3, 2, 1]);
    }

    #[test]
    fn search_stops_at_first_other_key() {
        let mut list = scripted(&[true, false, false, true, true, false, false]);
        list.insert("b", 1);
        list.insert("a", 2);
        list.insert("c", 3);
        list.insert("b", 4);
        list.insert("bb", 5);
        assert_eq!(values(&list.search(&"b")), vec![4, 1]);
        assert_eq!(values(&list.search(&"bb")), vec![5]);
        assert!(list.search(&"B").is_empty());
        assert!(list.search(&"d").is_empty());
    }

    #[test]
    fn iteration_is_sorted() {
        let mut list = scripted(&[true, true, false, false, true, false]);
        for (key, value) in [("m", 1), ("c", 2), ("x", 3), ("a", 4), ("m", 5)] {
            list.insert(key, value);
        }
        let keys: Vec<_> = list.iter().map(|pair| pair.key).collect();
        assert_eq!(keys, vec!["a", "c", "m", "m", "x"]);
        let iter = list.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!((&list).into_iter().nth(2).map(|pair| pair.value), Some(5));
    }

    #[test]
    fn remove_absent_key_changes_nothing() {
        let mut list = scripted(&[false, false]);
        list.insert("a", 1);
        list.insert("c", 2);
        assert_eq!(list.remove(&"b"), None);
        assert_eq!(list.len(), 2);
        assert_eq!(list.remove(&"z"), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn remove_takes_most_recent_duplicate() {
        let mut list = scripted(&[true, false, false, true, true, false]);
        list.insert("a", 1);
        list.insert("a", 2);
        list.insert("a", 3);
        assert_eq!(list.remove(&"a"), Some(KvPair::new("a", 3)));
        assert_eq!(values(&list.search(&"a")), vec![2, 1]);
        assert_eq!(list.remove(&"a"), Some(KvPair::new("a", 2)));
        assert_eq!(list.remove(&"a"), Some(KvPair::new("a", 1)));
        assert_eq!(list.remove(&"a"), None);
        assert!(list.is_empty());
    }

    #[test]
    fn head_grows_and_shrinks() {
        let mut list = scripted(&[true, true, false, false]);
        list.insert("tall", 1);
        assert_eq!(list.level(), 3);
        list.insert("short", 2);
        assert_eq!(list.level(), 3);

        list.remove(&"tall");
        assert_eq!(list.level(), 1);
        list.remove(&"short");
        assert_eq!(list.level(), 0);
        assert!(list.dump().contains("Node with depth 1, value null"));
    }

    #[test]
    fn remove_by_value_takes_leftmost_match() {
        let mut list = scripted(&[false, true, false, false, false]);
        list.insert("d", 7);
        list.insert("b", 7);
        list.insert("a", 1);
        list.insert("c", 7);
        assert_eq!(list.remove_by_value(&7), Some(KvPair::new("b", 7)));
        assert_eq!(list.remove_by_value(&7), Some(KvPair::new("c", 7)));
        assert_eq!(list.remove_by_value(&7), Some(KvPair::new("d", 7)));
        assert_eq!(list.remove_by_value(&7), None);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_by_value_unknown_value() {
        let mut list = scripted(&[false]);
        list.insert("a", Rectangle::new(1, 1, 2, 2));
        assert_eq!(list.remove_by_value(&Rectangle::new(1, 1, 2, 3)), None);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_by_value_unlinks_tall_node() {
        let mut list = scripted(&[false, true, true, true, false, true, false]);
        list.insert("a", 1);
        list.insert("b", 2);
        list.insert("c", 3);
        assert_eq!(list.level(), 4);
        assert_eq!(list.remove_by_value(&2), Some(KvPair::new("b", 2)));
        assert_eq!(list.level(), 2);
        let keys: Vec<_> = list.iter().map(|pair| pair.key).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn dump_lists_levels_in_order() {
        let mut list = scripted(&[true, false, false]);
        list.insert("b", 2);
        list.insert("a", 1);
        assert_eq!(
            list.dump(),
            "SkipList dump:\n\
             Node with depth 2, value null\n\
             node with depth 1 value a 1\n\
             node with depth 2 value b 2\n\
             SkipList size is: 2\n"
        );
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut list = scripted(&[]);
        list.insert("a", 1);
        list.insert("b", 2);
        list.remove(&"a");
        list.insert("c", 3);
        assert_eq!(list.nodes.len(), 2);
        let keys: Vec<_> = list.iter().map(|pair| pair.key).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn bits_can_be_queued_mid_run() {
        let mut list = scripted(&[]);
        list.insert("a", 1);
        assert_eq!(list.level(), 1);
        list.bits_mut().extend([true, true, true, false]);
        list.insert("b", 2);
        assert_eq!(list.level(), 4);
    }

    #[test]
    fn collect_from_pairs() {
        let list: SkipList<i32, char> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
        let pairs: Vec<_> = list.iter().map(|pair| (pair.key, pair.value)).collect();
        assert_eq!(pairs, vec![(1, 'a'), (2, 'b'), (3, 'c')]);
        assert_eq!(format!("{:?}", list).matches("KvPair").count(), 3);
    }

    #[test]
    fn stress_test() {
        let mut list = SkipList::with_bits(RandomBits::seeded(1));
        for i in 0..1000u32 {
            list.insert(i % 97, i);
        }
        assert_eq!(list.len(), 1000);

        for i in 0..1000u32 {
            assert!(list.search(&(i % 97)).iter().any(|pair| pair.value == i));
        }

        // Remove every entry with an even key
        let mut removed = 0;
        for key in (0..97u32).filter(|key| key % 2 == 0) {
            while list.remove(&key).is_some() {
                removed += 1;
            }
        }
        assert_eq!(list.len(), 1000 - removed);
        assert!(list.iter().all(|pair| pair.key % 2 == 1));

        while let Some(pair) = list.iter().next().cloned() {
            assert_eq!(list.remove_by_value(&pair.value), Some(pair));
        }
        assert!(list.is_empty());
        assert_eq!(list.level(), 0);
    }

    #[test]
    fn lookups_take_borrowed_keys() {
        let mut list = SkipList::with_bits(ScriptedBits::new([true, false]));
        list.insert("r1".to_string(), 1);
        list.insert("r2".to_string(), 2);
        list.insert("r1".to_string(), 3);

        let found: Vec<i32> = list.search("r1").iter().map(|pair| pair.value).collect();
        assert_eq!(found, vec![3, 1]);
        assert!(list.search("r0").is_empty());
        assert_eq!(list.remove("r1").map(|pair| pair.value), Some(3));
        assert_eq!(list.remove("r3"), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn slot_indices_stop_below_reserved_markers() {
        assert_eq!(slot_index(0), 0);
        assert_eq!(slot_index(HEAD as usize - 1), HEAD - 1);
    }

    #[test]
    #[should_panic(expected = "arena exhausted")]
    fn slot_index_rejects_head_marker() {
        slot_index(HEAD as usize);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "arena exhausted")]
    fn slot_index_rejects_truncating_lengths() {
        slot_index(u32::MAX as usize + 5);
    }
}
