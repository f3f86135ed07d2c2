//! Map-shaped facade over the red-black tree with bulk accessors.

use std::fmt;

use compare::{Compare, Natural};

use crate::tree::corrupt;
use crate::RbTreeMap;

/// A key and a value borrowed from a [`TreeMap`].
#[derive(Debug, PartialEq, Eq)]
pub struct Entry<'a, K, V> {
    pub key: &'a K,
    pub value: &'a V,
}

impl<'a, K, V> Clone for Entry<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for Entry<'a, K, V> {}

/// An ordered map backed by a red-black tree.
///
/// ```
/// use searchtree::TreeMap;
/// let mut map = TreeMap::new();
/// map.insert("b", 2);
/// map.insert("a", 1);
/// assert_eq!(map.keys(), vec![&"a", &"b"]);
///
/// let mut sum = 0;
/// map.for_each(|_, value| {
///     sum += value;
///     true
/// });
/// assert_eq!(sum, 3);
/// ```
#[derive(Clone)]
pub struct TreeMap<K, V, C = Natural<K>> {
    tree: RbTreeMap<K, V, C>,
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Creates an empty map ordered according to the natural order of its keys.
    pub fn new() -> Self {
        Self {
            tree: RbTreeMap::new(),
        }
    }
}

impl<K: Ord, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C: Compare<K>> TreeMap<K, V, C> {
    /// Creates an empty map ordered according to the given comparator.
    pub fn with_cmp(cmp: C) -> Self {
        Self {
            tree: RbTreeMap::with_cmp(cmp),
        }
    }

    /// Inserts a key-value pair, returning the previous value of an equal key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.tree.insert(key, value)
    }

    /// Removes a key, returning its value if the key was in the map.
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        C: Compare<Q, K>,
    {
        self.tree.remove(key)
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        C: Compare<Q, K>,
    {
        self.tree.get(key)
    }

    /// Returns true if the map contains a value for the key.
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        C: Compare<Q, K>,
    {
        self.tree.contains_key(key)
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the map.
    pub fn clear(&mut self) {
        self.tree.clear()
    }

    /// Returns all keys in ascending order.
    pub fn keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len());
        self.for_each(|key, _| {
            keys.push(key);
            true
        });
        keys
    }

    /// Returns all values, ordered by their keys.
    pub fn values(&self) -> Vec<&V> {
        let mut values = Vec::with_capacity(self.len());
        self.for_each(|_, value| {
            values.push(value);
            true
        });
        values
    }

    /// Returns all entries in ascending key order.
    pub fn enumerate(&self) -> Vec<Entry<'_, K, V>> {
        let mut entries = Vec::with_capacity(self.len());
        self.for_each(|key, value| {
            entries.push(Entry { key, value });
            true
        });
        entries
    }

    /// Calls `f` on every entry in ascending key order until it returns false.
    pub fn for_each<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a K, &'a V) -> bool,
    {
        let mut cursor = self.tree.cursor();
        while cursor.move_next() {
            let (key, value) = match cursor.key_value() {
                None => corrupt("cursor lost its entry"),
                Some(entry) => entry,
            };
            if !f(key, value) {
                break;
            }
        }
    }

    /// Calls `f` on every entry in ascending key order until it returns false.
    /// `f` may update the values in place.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut cursor = self.tree.cursor_mut();
        while cursor.move_next() {
            let (key, value) = match cursor.key_value_mut() {
                None => corrupt("cursor lost its entry"),
                Some(entry) => entry,
            };
            if !f(key, value) {
                break;
            }
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for TreeMap<K, V, C> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, fmt)
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            tree: iter.into_iter().collect(),
        }
    }
}
