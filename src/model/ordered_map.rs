//! Insertion-ordered map
//!
//! Iteration order decides leaf order during merklization, so both levels of a
//! distribution are stored as an ordered entry list plus a key → position index.

use std::collections::HashMap;
use std::hash::Hash;

/// A map that iterates in first-insertion order
///
/// Overwriting an existing key keeps its original position. There is no
/// removal, so positions are stable for the lifetime of the map.
#[derive(Clone, Debug)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        OrderedMap {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Position of `key` in iteration order
    pub fn position(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Insert or overwrite, returning the previous value
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&i) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Get the value for `key`, appending `default()` first if it is missing
    pub fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.clone(), i);
                self.entries.push((key, default()));
                i
            }
        };
        &mut self.entries[i].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Entries as a slice, in iteration order
    pub fn as_slice(&self) -> &[(K, V)] {
        &self.entries
    }
}

impl<K, V> Default for OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Equality is order-sensitive: two maps with the same entries in a different
/// order commit to different roots, so they are not equal.
impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterates_in_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("zebra", 1);
        map.insert("apple", 2);
        map.insert("mango", 3);

        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.insert("a", 10), Some(1));

        assert_eq!(map.len(), 2);
        assert_eq!(map.position(&"a"), Some(0));
        assert_eq!(map.get(&"a"), Some(&10));
    }

    #[test]
    fn test_get_or_insert_with_appends_once() {
        let mut map: OrderedMap<&str, Vec<u8>> = OrderedMap::new();
        map.get_or_insert_with("x", Vec::new).push(1);
        map.get_or_insert_with("y", Vec::new).push(2);
        map.get_or_insert_with("x", Vec::new).push(3);

        assert_eq!(map.get(&"x"), Some(&vec![1, 3]));
        assert_eq!(map.position(&"y"), Some(1));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let ab: OrderedMap<_, _> = [("a", 1), ("b", 2)].into_iter().collect();
        let ba: OrderedMap<_, _> = [("b", 2), ("a", 1)].into_iter().collect();
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }
}
