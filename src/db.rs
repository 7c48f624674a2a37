// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! A named-rectangle store on top of the skip list.
//!
//! Names are keys (duplicates allowed), rectangles are values. Anything that
//! needs geometry, like region queries and pairwise intersection, takes a
//! snapshot through the list's sequential reader. The list itself never learns
//! what a rectangle is.

use log::debug;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::list::BitSource;
use crate::list::KvPair;
use crate::list::RandomBits;
use crate::list::SkipList;
use crate::rect::Rectangle;

/// A stored entry: a name and its rectangle.
pub type Entry = KvPair<String, Rectangle>;

/// Errors returned by [`Database`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbError {
    /// The rectangle has no area or leaves the world.
    #[error("Rectangle rejected: ({name}, {rect})")]
    Rejected { name: String, rect: Rectangle },
    /// A query region with no area.
    #[error("Rectangle rejected: ({0})")]
    InvalidRegion(Rectangle),
}

pub struct Database<B = RandomBits<StdRng>> {
    list: SkipList<String, Rectangle, B>,
}

impl Database {
    pub fn new() -> Database {
        return Database::with_bits(RandomBits::from_entropy());
    }
}

impl Default for Database {
    fn default() -> Self {
        return Self::new();
    }
}

impl<B> Database<B> {
    pub fn with_bits(bits: B) -> Database<B> {
        return Database {
            list: SkipList::with_bits(bits),
        };
    }

    pub fn len(&self) -> usize {
        return self.list.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.list.is_empty();
    }

    /// Remove the most recently inserted rectangle with this name.
    pub fn remove(&mut self, name: &str) -> Option<Entry> {
        let removed = self.list.remove(name);
        debug!("remove {}: {}", name, if removed.is_some() { "hit" } else { "miss" });
        return removed;
    }

    /// Remove the first rectangle (in name order) with exactly these coordinates.
    pub fn remove_rect(&mut self, rect: &Rectangle) -> Option<Entry> {
        let removed = self.list.remove_by_value(rect);
        debug!("remove ({}): {}", rect, if removed.is_some() { "hit" } else { "miss" });
        return removed;
    }

    /// Every rectangle with this name, most recently inserted first.
    pub fn search(&self, name: &str) -> Vec<&Entry> {
        return self.list.search(name);
    }

    /// Every rectangle whose interior overlaps `region`, in name order.
    pub fn region_search(&self, region: Rectangle) -> Result<Vec<&Entry>, DbError> {
        if !region.has_area() {
            return Err(DbError::InvalidRegion(region));
        }
        let hits: Vec<&Entry> = self
            .list
            .iter()
            .filter(|entry| entry.value.intersects(&region))
            .collect();
        debug!("region ({}): {} hits", region, hits.len());
        return Ok(hits);
    }

    /// Every intersecting pair, each reported once.
    ///
    /// Pairs come out in level-0 order, so the first entry of a pair never has
    /// a larger name than the second.
    pub fn intersections(&self) -> Vec<(&Entry, &Entry)> {
        let snapshot: Vec<&Entry> = self.list.iter().collect();
        let mut pairs = Vec::new();
        for (i, a) in snapshot.iter().enumerate() {
            for b in &snapshot[i + 1..] {
                if a.value.intersects(&b.value) {
                    pairs.push((*a, *b));
                }
            }
        }
        debug!("intersections: {} pairs among {} rectangles", pairs.len(), snapshot.len());
        return pairs;
    }

    /// The list's structural dump.
    pub fn dump(&self) -> String {
        return self.list.dump();
    }
}

impl<B: BitSource> Database<B> {
    /// Store `rect` under `name`, unless it is invalid.
    pub fn insert(&mut self, name: &str, rect: Rectangle) -> Result<(), DbError> {
        if !rect.is_valid() {
            debug!("insert {} ({}): rejected", name, rect);
            return Err(DbError::Rejected {
                name: name.to_string(),
                rect,
            });
        }
        self.list.insert(name.to_string(), rect);
        debug!("insert {} ({}): {} stored", name, rect, self.list.len());
        return Ok(());
    }
}
