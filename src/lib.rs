// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! skipdb - a duplicate-tolerant skip list, and a rectangle database on top.
//!
//! # Quick Start
//!
//! ```
//! use skipdb::list::ScriptedBits;
//! use skipdb::list::SkipList;
//!
//! // Script the coin flips so node heights are reproducible
//! let mut list = SkipList::with_bits(ScriptedBits::new([true, false]));
//!
//! list.insert("b", 2);
//! list.insert("a", 1);
//! list.insert("a", 3);
//!
//! // Equal keys come back most recent first
//! let found: Vec<i32> = list.search(&"a").iter().map(|pair| pair.value).collect();
//! assert_eq!(found, vec![3, 1]);
//!
//! assert_eq!(list.remove(&"a").map(|pair| pair.value), Some(3));
//! assert_eq!(list.len(), 2);
//! ```

pub mod command;
pub mod config;
pub mod db;
pub mod list;
pub mod rect;
