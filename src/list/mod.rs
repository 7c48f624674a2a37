// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! The skip list core. Agnostic to what it stores: keys need a total order,
//! values need nothing (equality only for `remove_by_value`).

pub mod level;
pub mod pair;
pub mod skip_list;

pub use level::BitSource;
pub use level::RandomBits;
pub use level::ScriptedBits;
pub use pair::KvPair;
pub use skip_list::Iter;
pub use skip_list::SkipList;
