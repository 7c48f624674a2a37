// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

use std::fmt;

/// A key and its value. Entries have no identity beyond the two.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KvPair<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> KvPair<K, V> {
    pub fn new(key: K, value: V) -> KvPair<K, V> {
        return KvPair { key, value };
    }

    /// Split the pair back into its parts.
    pub fn into_parts(self) -> (K, V) {
        return (self.key, self.value);
    }
}

impl<K, V> From<(K, V)> for KvPair<K, V> {
    fn from((key, value): (K, V)) -> Self {
        return KvPair { key, value };
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for KvPair<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.key, self.value)
    }
}
