//! Traversal in key order along the parent links of the tree, without an auxiliary stack.
//!
//! A cursor borrows its tree, so the tree cannot change structure while a cursor is alive.
//! [`CursorMut`] may update values in place but never inserts or removes.

use std::iter::FusedIterator;

use crate::tree::{Link, NodeId, Tree};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    At(NodeId),
    AfterLast,
}

impl Position {
    fn node(self) -> Link {
        match self {
            Position::At(node_id) => Some(node_id),
            Position::BeforeFirst | Position::AfterLast => None,
        }
    }

    fn next<K, V, B, C>(self, tree: &Tree<K, V, B, C>) -> Self {
        let next = match self {
            Position::AfterLast => return Position::AfterLast,
            Position::BeforeFirst => tree.successor(None),
            Position::At(node_id) => tree.successor(Some(node_id)),
        };
        next.map_or(Position::AfterLast, Position::At)
    }

    fn prev<K, V, B, C>(self, tree: &Tree<K, V, B, C>) -> Self {
        let prev = match self {
            Position::BeforeFirst => return Position::BeforeFirst,
            Position::AfterLast => tree.predecessor(None),
            Position::At(node_id) => tree.predecessor(Some(node_id)),
        };
        prev.map_or(Position::BeforeFirst, Position::At)
    }
}

/// A bidirectional cursor over the entries of a tree.
///
/// The cursor starts before the first entry. Besides the entries it knows two sentinel
/// positions, before the first and after the last entry, where it yields nothing.
///
/// ```
/// use searchtree::RbTreeMap;
/// let map: RbTreeMap<_, _> = (1..=3).map(|key| (key, key * 10)).collect();
/// let mut cursor = map.cursor();
/// while cursor.move_next() {
///     let (key, value) = cursor.key_value().unwrap();
///     assert_eq!(*value, key * 10);
/// }
/// assert!(cursor.key().is_none());
/// assert!(cursor.move_prev());
/// assert_eq!(cursor.key(), Some(&3));
/// ```
pub struct Cursor<'a, K, V, B, C> {
    tree: &'a Tree<K, V, B, C>,
    position: Position,
}

impl<'a, K, V, B, C> Cursor<'a, K, V, B, C> {
    /// Moves the cursor before the first entry.
    pub fn begin(&mut self) {
        self.position = Position::BeforeFirst;
    }

    /// Moves the cursor after the last entry.
    pub fn end(&mut self) {
        self.position = Position::AfterLast;
    }

    /// Advances to the next entry in key order.
    /// Returns false if the cursor ends up (or already was) after the last entry.
    pub fn move_next(&mut self) -> bool {
        if self.position == Position::AfterLast {
            return false;
        }
        self.position = self.position.next(self.tree);
        self.position != Position::AfterLast
    }

    /// Steps back to the previous entry in key order.
    /// Returns false if the cursor ends up (or already was) before the first entry.
    pub fn move_prev(&mut self) -> bool {
        if self.position == Position::BeforeFirst {
            return false;
        }
        self.position = self.position.prev(self.tree);
        self.position != Position::BeforeFirst
    }

    /// Returns the key at the cursor, `None` at either sentinel.
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|(key, _)| key)
    }

    /// Returns the value at the cursor, `None` at either sentinel.
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|(_, value)| value)
    }

    /// Returns the entry at the cursor, `None` at either sentinel.
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        self.position.node().map(|node_id| tree.key_value(node_id))
    }
}

impl<'a, K, V, B, C> Clone for Cursor<'a, K, V, B, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            position: self.position,
        }
    }
}

/// A bidirectional cursor that can update the values of a tree in place.
///
/// Moves exactly like [`Cursor`].
pub struct CursorMut<'a, K, V, B, C> {
    tree: &'a mut Tree<K, V, B, C>,
    position: Position,
}

impl<'a, K, V, B, C> CursorMut<'a, K, V, B, C> {
    /// Moves the cursor before the first entry.
    pub fn begin(&mut self) {
        self.position = Position::BeforeFirst;
    }

    /// Moves the cursor after the last entry.
    pub fn end(&mut self) {
        self.position = Position::AfterLast;
    }

    /// Advances to the next entry in key order.
    /// Returns false if the cursor ends up (or already was) after the last entry.
    pub fn move_next(&mut self) -> bool {
        if self.position == Position::AfterLast {
            return false;
        }
        self.position = self.position.next(self.tree);
        self.position != Position::AfterLast
    }

    /// Steps back to the previous entry in key order.
    /// Returns false if the cursor ends up (or already was) before the first entry.
    pub fn move_prev(&mut self) -> bool {
        if self.position == Position::BeforeFirst {
            return false;
        }
        self.position = self.position.prev(self.tree);
        self.position != Position::BeforeFirst
    }

    /// Returns the key at the cursor, `None` at either sentinel.
    pub fn key(&self) -> Option<&K> {
        self.key_value().map(|(key, _)| key)
    }

    /// Returns the value at the cursor, `None` at either sentinel.
    pub fn value(&self) -> Option<&V> {
        self.key_value().map(|(_, value)| value)
    }

    /// Returns the entry at the cursor, `None` at either sentinel.
    pub fn key_value(&self) -> Option<(&K, &V)> {
        let tree = &*self.tree;
        self.position.node().map(|node_id| tree.key_value(node_id))
    }

    /// Returns a mutable reference to the value at the cursor, `None` at either sentinel.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.key_value_mut().map(|(_, value)| value)
    }

    /// Returns the key and a mutable reference to the value at the cursor.
    pub fn key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        let node_id = self.position.node()?;
        Some(self.tree.key_value_mut(node_id))
    }
}

/// An iterator over the entries of a tree, sorted by key.
pub struct Iter<'a, K, V, B, C> {
    tree: &'a Tree<K, V, B, C>,
    front: Link,
    back: Link,
    len: usize,
}

impl<'a, K, V, B, C> Iterator for Iter<'a, K, V, B, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node_id = self.front?;
        self.front = self.tree.successor(self.front);
        self.len -= 1;
        Some(self.tree.key_value(node_id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V, B, C> DoubleEndedIterator for Iter<'a, K, V, B, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node_id = self.back?;
        self.back = self.tree.predecessor(self.back);
        self.len -= 1;
        Some(self.tree.key_value(node_id))
    }
}

impl<'a, K, V, B, C> ExactSizeIterator for Iter<'a, K, V, B, C> {}

impl<'a, K, V, B, C> FusedIterator for Iter<'a, K, V, B, C> {}

impl<'a, K, V, B, C> Clone for Iter<'a, K, V, B, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            len: self.len,
        }
    }
}

impl<K, V, B, C> Tree<K, V, B, C> {
    /// Gets a cursor positioned before the first entry.
    pub fn cursor(&self) -> Cursor<'_, K, V, B, C> {
        Cursor {
            tree: self,
            position: Position::BeforeFirst,
        }
    }

    /// Gets a cursor positioned before the first entry that can update values in place.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, V, B, C> {
        CursorMut {
            tree: self,
            position: Position::BeforeFirst,
        }
    }

    /// Gets an iterator over the entries of the map in sorted order.
    pub fn iter(&self) -> Iter<'_, K, V, B, C> {
        Iter {
            tree: self,
            front: self.successor(None),
            back: self.predecessor(None),
            len: self.len(),
        }
    }
}

impl<'a, K, V, B, C> IntoIterator for &'a Tree<K, V, B, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, B, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    use crate::{AvlTreeMap, BsTreeMap, RbTreeMap};

    const N: i32 = 10_000;

    #[test]
    fn test_cursor_round_trip() {
        let mut keys: Vec<i32> = (0..N).collect();
        let mut rng = StdRng::seed_from_u64(0);
        keys.shuffle(&mut rng);

        let mut map = RbTreeMap::new();
        for key in &keys {
            map.insert(*key, ());
        }

        let mut forward = Vec::new();
        let mut cursor = map.cursor();
        cursor.begin();
        while cursor.move_next() {
            forward.push(*cursor.key().unwrap());
        }
        assert!(!cursor.move_next());
        assert!(cursor.key().is_none());

        let mut backward = Vec::new();
        cursor.end();
        while cursor.move_prev() {
            backward.push(*cursor.key().unwrap());
        }
        assert!(!cursor.move_prev());
        assert!(cursor.value().is_none());

        keys.sort();
        assert_eq!(forward, keys);
        backward.reverse();
        assert_eq!(backward, keys);
    }

    #[test]
    fn test_cursor_empty() {
        let map = AvlTreeMap::<i32, i32>::new();
        let mut cursor = map.cursor();
        assert!(!cursor.move_next());
        assert!(cursor.key().is_none());
        assert!(!cursor.move_next());
        cursor.end();
        assert!(!cursor.move_prev());
        assert!(cursor.key_value().is_none());
    }

    #[test]
    fn test_cursor_turns_around() {
        let map: BsTreeMap<i32, ()> = (1..=3).map(|key| (key, ())).collect();
        let mut cursor = map.cursor();
        assert!(cursor.move_next());
        assert!(cursor.move_next());
        assert_eq!(cursor.key(), Some(&2));
        assert!(cursor.move_prev());
        assert_eq!(cursor.key(), Some(&1));
        assert!(!cursor.move_prev());
        assert!(cursor.key().is_none());
        // From before the first entry, forward again
        assert!(cursor.move_next());
        assert_eq!(cursor.key(), Some(&1));
    }

    #[test]
    fn test_successor_climbs_past_right_children() {
        //     5
        //    /
        //   2
        //    \
        //     3
        let mut map = BsTreeMap::new();
        for key in [5, 2, 3] {
            map.insert(key, ());
        }
        let mut cursor = map.cursor();
        let mut keys = Vec::new();
        while cursor.move_next() {
            keys.push(*cursor.key().unwrap());
        }
        assert_eq!(keys, vec![2, 3, 5]);
    }

    #[test]
    fn test_predecessor_descends_into_left_subtree() {
        //     5
        //    /
        //   3
        //  /
        // 2
        let mut map = BsTreeMap::new();
        for key in [5, 3, 2] {
            map.insert(key, ());
        }
        let mut cursor = map.cursor();
        cursor.end();
        let mut keys = Vec::new();
        while cursor.move_prev() {
            keys.push(*cursor.key().unwrap());
        }
        assert_eq!(keys, vec![5, 3, 2]);

        //   2
        //    \
        //     4
        //    /
        //   3
        let mut map = BsTreeMap::new();
        for key in [2, 4, 3] {
            map.insert(key, ());
        }
        let keys: Vec<i32> = map.iter().rev().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![4, 3, 2]);
    }

    #[test]
    fn test_cursor_mut() {
        let mut map: AvlTreeMap<i32, i32> = (0..100).map(|key| (key, key)).collect();
        let mut cursor = map.cursor_mut();
        assert!(cursor.value_mut().is_none());
        while cursor.move_next() {
            *cursor.value_mut().unwrap() *= 2;
        }
        assert!(cursor.value_mut().is_none());
        while cursor.move_prev() {
            let (key, value) = cursor.key_value().unwrap();
            assert_eq!(*value, key * 2);
        }
        assert_eq!(map.get(&42), Some(&84));
    }

    #[test]
    fn test_iter_both_ends() {
        let map: RbTreeMap<i32, i32> = (0..10).map(|key| (key, -key)).collect();
        let mut iter = map.iter();
        assert_eq!(iter.len(), 10);
        assert_eq!(iter.next(), Some((&0, &0)));
        assert_eq!(iter.next_back(), Some((&9, &-9)));
        assert_eq!(iter.len(), 8);
        let middle: Vec<i32> = iter.map(|(key, _)| *key).collect();
        assert_eq!(middle, (1..9).collect::<Vec<_>>());

        let mut iter = map.iter();
        for _ in 0..5 {
            iter.next();
            iter.next_back();
        }
        assert!(iter.next().is_none());
        assert!(iter.next_back().is_none());
    }
}
