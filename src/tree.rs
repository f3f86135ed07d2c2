use std::cmp::Ordering;
use std::fmt;
use std::mem;

use compare::{Compare, Natural};
use log::debug;

/// Index of a node in the tree's arena.
pub type NodeId = usize;

/// Optional link to a node, used for child and parent references alike.
pub type Link = Option<NodeId>;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Per-node balance metadata together with the fix-up passes that maintain it.
///
/// The three engines of this crate share one search tree skeleton and differ only in the
/// balance type they store in every node: [`Unbalanced`](crate::Unbalanced) for the plain
/// binary search tree, [`Height`](crate::Height) for the AVL tree and
/// [`Color`](crate::Color) for the red-black tree.
///
/// This trait is sealed.
pub trait Balance: Sized + sealed::Sealed {
    /// Returns the metadata of a freshly inserted leaf.
    #[doc(hidden)]
    fn leaf() -> Self;

    /// Restores the balance invariant after `node` was linked in as a new leaf.
    #[doc(hidden)]
    fn rebalance_insert<K, V, C>(tree: &mut Tree<K, V, Self, C>, node: NodeId);

    /// Called while `node` still occupies its position, right before it is spliced out
    /// and replaced by `child`.
    #[doc(hidden)]
    fn rebalance_unlink<K, V, C>(_tree: &mut Tree<K, V, Self, C>, _node: NodeId, _child: Link) {}

    /// Restores the balance invariant after a node below `parent` was spliced out.
    #[doc(hidden)]
    fn rebalance_remove<K, V, C>(tree: &mut Tree<K, V, Self, C>, parent: Link);

    /// Asserts the balance invariant for the whole tree.
    #[cfg(any(test, feature = "consistency_check"))]
    #[doc(hidden)]
    fn check<K, V, C>(tree: &Tree<K, V, Self, C>);
}

/// Side of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// An ordered map implemented with a binary search tree.
///
/// Nodes live in an arena and refer to their children and their parent by index, so
/// every structural change (splice, rotation) is a handful of index rewrites.
/// The balance scheme `B` selects the engine, see [`BsTreeMap`](crate::BsTreeMap),
/// [`AvlTreeMap`](crate::AvlTreeMap) and [`RbTreeMap`](crate::RbTreeMap).
/// Keys are ordered by the comparator `C`.
#[derive(Clone)]
pub struct Tree<K, V, B, C> {
    nodes: Vec<Slot<K, V, B>>,
    free: Link,
    root: Link,
    num_nodes: usize,
    cmp: C,
}

#[derive(Clone)]
enum Slot<K, V, B> {
    Occupied(Node<K, V, B>),
    // Next entry of the free list
    Vacant(Link),
}

#[derive(Clone)]
struct Node<K, V, B> {
    key: K,
    value: V,
    left: Link,
    right: Link,
    parent: Link,
    balance: B,
}

impl<K, V, B> Node<K, V, B> {
    fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn child_mut(&mut self, side: Side) -> &mut Link {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Aborts on a broken tree structure. This is a bug in the tree, never a caller error.
#[cold]
#[track_caller]
pub(crate) fn corrupt(what: &str) -> ! {
    panic!("tree structure error: {}", what)
}

impl<K: Ord, V, B: Balance> Tree<K, V, B, Natural<K>> {
    /// Creates an empty map ordered according to the natural order of its keys.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self::with_cmp(compare::natural())
    }
}

impl<K, V, B, C> Tree<K, V, B, C> {
    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns a reference to the map's comparator.
    pub fn cmp(&self) -> &C {
        &self.cmp
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        debug!("clearing tree of {} nodes", self.num_nodes);
        self.nodes.clear();
        self.free = None;
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|root_id| self.key_value(self.min(root_id)))
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|root_id| self.key_value(self.max(root_id)))
    }

    pub(crate) fn root(&self) -> Link {
        self.root
    }

    pub(crate) fn left(&self, node_id: NodeId) -> Link {
        self.node(node_id).left
    }

    pub(crate) fn right(&self, node_id: NodeId) -> Link {
        self.node(node_id).right
    }

    pub(crate) fn child(&self, node_id: NodeId, side: Side) -> Link {
        self.node(node_id).child(side)
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Link {
        self.node(node_id).parent
    }

    pub(crate) fn balance(&self, node_id: NodeId) -> &B {
        &self.node(node_id).balance
    }

    pub(crate) fn balance_mut(&mut self, node_id: NodeId) -> &mut B {
        &mut self.node_mut(node_id).balance
    }

    pub(crate) fn key_value(&self, node_id: NodeId) -> (&K, &V) {
        let node = self.node(node_id);
        (&node.key, &node.value)
    }

    pub(crate) fn key_value_mut(&mut self, node_id: NodeId) -> (&K, &mut V) {
        let node = self.node_mut(node_id);
        (&node.key, &mut node.value)
    }

    /// Returns on which side of its parent the given node hangs.
    /// Panics for the root and for a node its parent does not know.
    pub(crate) fn side_of(&self, node_id: NodeId) -> Side {
        let parent_id = match self.node(node_id).parent {
            None => corrupt("root node has no side"),
            Some(parent_id) => parent_id,
        };
        let parent = self.node(parent_id);
        if parent.left == Some(node_id) {
            Side::Left
        } else if parent.right == Some(node_id) {
            Side::Right
        } else {
            corrupt("node is not a child of its parent")
        }
    }

    pub(crate) fn min(&self, mut node_id: NodeId) -> NodeId {
        while let Some(left_id) = self.node(node_id).left {
            node_id = left_id;
        }
        node_id
    }

    pub(crate) fn max(&self, mut node_id: NodeId) -> NodeId {
        while let Some(right_id) = self.node(node_id).right {
            node_id = right_id;
        }
        node_id
    }

    /// Returns the in-order successor of a node.
    /// `None` stands for the position before the first node, so its successor is the minimum.
    /// Returns `None` past the last node.
    pub(crate) fn successor(&self, link: Link) -> Link {
        self.step(link, Side::Right)
    }

    /// Returns the in-order predecessor of a node.
    /// `None` stands for the position after the last node, so its predecessor is the maximum.
    /// Returns `None` before the first node.
    pub(crate) fn predecessor(&self, link: Link) -> Link {
        self.step(link, Side::Left)
    }

    fn step(&self, link: Link, toward: Side) -> Link {
        let extremum = |node_id| match toward {
            Side::Right => self.min(node_id),
            Side::Left => self.max(node_id),
        };
        let node_id = match link {
            None => return self.root.map(extremum),
            Some(node_id) => node_id,
        };
        if let Some(child_id) = self.node(node_id).child(toward) {
            return Some(extremum(child_id));
        }
        // Ascend until we arrive from the other side
        let mut current = node_id;
        while let Some(parent_id) = self.node(current).parent {
            if self.side_of(current) != toward {
                return Some(parent_id);
            }
            current = parent_id;
        }
        None
    }

    /// Rotates the subtree at `node_id` so that the node moves down to the given side and
    /// its child on the other side takes its place. Returns the new subtree root.
    pub(crate) fn rotate(&mut self, node_id: NodeId, side: Side) -> NodeId {
        let lifted_id = match self.node(node_id).child(side.opposite()) {
            None => corrupt("rotation without a child to lift"),
            Some(lifted_id) => lifted_id,
        };
        let inner = self.node(lifted_id).child(side);

        self.swap_in_parent(node_id, Some(lifted_id));

        *self.node_mut(node_id).child_mut(side.opposite()) = inner;
        if let Some(inner_id) = inner {
            self.node_mut(inner_id).parent = Some(node_id);
        }

        *self.node_mut(lifted_id).child_mut(side) = Some(node_id);
        self.node_mut(node_id).parent = Some(lifted_id);
        lifted_id
    }

    pub(crate) fn rotate_left(&mut self, node_id: NodeId) -> NodeId {
        self.rotate(node_id, Side::Left)
    }

    pub(crate) fn rotate_right(&mut self, node_id: NodeId) -> NodeId {
        self.rotate(node_id, Side::Right)
    }

    /// Splices `new` into the position of `old` and clears all links of `old`.
    /// Returns the former parent of `old`.
    fn replace(&mut self, old: NodeId, new: Link) -> Link {
        let parent = self.swap_in_parent(old, new);
        let node = self.node_mut(old);
        node.parent = None;
        node.left = None;
        node.right = None;
        parent
    }

    // Points the parent link of `old` (or the root) at `new`, leaving `old` untouched.
    fn swap_in_parent(&mut self, old: NodeId, new: Link) -> Link {
        let parent = self.node(old).parent;
        match parent {
            None => self.root = new,
            Some(parent_id) => {
                let side = self.side_of(old);
                *self.node_mut(parent_id).child_mut(side) = new;
            }
        }
        if let Some(new_id) = new {
            self.node_mut(new_id).parent = parent;
        }
        parent
    }

    fn unlink_node(&mut self, node_id: NodeId) -> (K, V)
    where
        B: Balance,
    {
        // A node with two children hands its position over to its successor,
        // the smallest node of its right sub tree, which has no left child.
        let vacated_id = match (self.node(node_id).left, self.node(node_id).right) {
            (Some(_), Some(right_id)) => self.min(right_id),
            _ => node_id,
        };
        let child = {
            let vacated = self.node(vacated_id);
            vacated.left.or(vacated.right)
        };

        B::rebalance_unlink(self, vacated_id, child);
        let parent = self.replace(vacated_id, child);
        B::rebalance_remove(self, parent);

        let removed = self.release(vacated_id);
        if vacated_id == node_id {
            (removed.key, removed.value)
        } else {
            let node = self.node_mut(node_id);
            (
                mem::replace(&mut node.key, removed.key),
                mem::replace(&mut node.value, removed.value),
            )
        }
    }

    fn node(&self, node_id: NodeId) -> &Node<K, V, B> {
        match &self.nodes[node_id] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => corrupt("link to a released node"),
        }
    }

    fn node_mut(&mut self, node_id: NodeId) -> &mut Node<K, V, B> {
        match &mut self.nodes[node_id] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => corrupt("link to a released node"),
        }
    }

    fn allocate(&mut self, node: Node<K, V, B>) -> NodeId {
        match self.free {
            None => {
                self.nodes.push(Slot::Occupied(node));
                self.nodes.len() - 1
            }
            Some(node_id) => {
                match mem::replace(&mut self.nodes[node_id], Slot::Occupied(node)) {
                    Slot::Vacant(next_free) => self.free = next_free,
                    Slot::Occupied(_) => corrupt("free list points at a live node"),
                }
                node_id
            }
        }
    }

    fn release(&mut self, node_id: NodeId) -> Node<K, V, B> {
        let next_free = self.free;
        match mem::replace(&mut self.nodes[node_id], Slot::Vacant(next_free)) {
            Slot::Occupied(node) => {
                self.free = Some(node_id);
                node
            }
            Slot::Vacant(_) => corrupt("node released twice"),
        }
    }
}

impl<K, V, B, C> Tree<K, V, B, C>
where
    B: Balance,
    C: Compare<K>,
{
    /// Creates an empty map ordered according to the given comparator.
    ///
    /// ```
    /// use searchtree::AvlTreeMap;
    /// let mut map = AvlTreeMap::with_cmp(|a: &i32, b: &i32| b.cmp(a));
    /// map.insert(1, "one");
    /// map.insert(2, "two");
    /// assert_eq!(map.first_key_value(), Some((&2, &"two")));
    /// ```
    pub fn with_cmp(cmp: C) -> Self {
        Self {
            nodes: Vec::new(),
            free: None,
            root: None,
            num_nodes: 0,
            cmp,
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        C: Compare<Q, K>,
    {
        self.find(key).map(|node_id| &self.node(node_id).value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        C: Compare<Q, K>,
    {
        let node_id = self.find(key)?;
        Some(&mut self.node_mut(node_id).value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q: ?Sized>(&self, key: &Q) -> Option<(&K, &V)>
    where
        C: Compare<Q, K>,
    {
        self.find(key).map(|node_id| self.key_value(node_id))
    }

    /// Returns true if the map contains a value for the key.
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        C: Compare<Q, K>,
    {
        self.find(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already holds an equal key, both key and value are overwritten in place
    /// and the old value is returned. The number of elements only grows for a new key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut parent: Link = None;
        let mut side = Side::Left;
        let mut current = self.root;
        while let Some(node_id) = current {
            side = match self.cmp.compare(&key, &self.node(node_id).key) {
                Ordering::Equal => {
                    let node = self.node_mut(node_id);
                    node.key = key;
                    return Some(mem::replace(&mut node.value, value));
                }
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            parent = current;
            current = self.node(node_id).child(side);
        }

        let node_id = self.allocate(Node {
            key,
            value,
            left: None,
            right: None,
            parent,
            balance: B::leaf(),
        });
        match parent {
            None => self.root = Some(node_id),
            Some(parent_id) => *self.node_mut(parent_id).child_mut(side) = Some(node_id),
        }
        self.num_nodes += 1;
        B::rebalance_insert(self, node_id);
        None
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        C: Compare<Q, K>,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map.
    /// Returns the stored key and value if the key was previously in the map.
    pub fn remove_entry<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
    where
        C: Compare<Q, K>,
    {
        let node_id = self.find(key)?;
        debug_assert!(self.num_nodes >= 1);
        let entry = self.unlink_node(node_id);
        self.num_nodes -= 1;
        debug_assert!(self.find(key).is_none());
        Some(entry)
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        // Check root link
        if let Some(root_id) = self.root {
            assert!(self.node(root_id).parent.is_none());
        }

        // Check tree nodes
        let mut num_nodes = 0;
        let mut prev_key: Option<&K> = None;
        self.traverse(
            |node_id| {
                let node = self.node(node_id);
                if let Some(left_id) = node.left {
                    assert_eq!(self.node(left_id).parent, Some(node_id));
                }
                if let Some(right_id) = node.right {
                    assert_eq!(self.node(right_id).parent, Some(node_id));
                }
                num_nodes += 1;
            },
            |node_id| {
                // In-order keys must be strictly increasing
                let key = &self.node(node_id).key;
                if let Some(prev_key) = prev_key {
                    assert_eq!(self.cmp.compare(prev_key, key), Ordering::Less);
                }
                prev_key = Some(key);
            },
        );

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);
        let occupied = self
            .nodes
            .iter()
            .filter(|slot| matches!(slot, Slot::Occupied(_)))
            .count();
        assert_eq!(occupied, self.num_nodes);

        B::check(self);
    }

    fn find<Q: ?Sized>(&self, key: &Q) -> Link
    where
        C: Compare<Q, K>,
    {
        let mut current = self.root;
        while let Some(node_id) = current {
            let node = self.node(node_id);
            current = match self.cmp.compare(key, &node.key) {
                Ordering::Equal => break,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        current
    }

    // Stackless depth-first traversal along the parent links.
    #[cfg(any(test, feature = "consistency_check"))]
    fn traverse<Pre, In>(&self, mut preorder: Pre, mut inorder: In)
    where
        Pre: FnMut(NodeId),
        In: FnMut(NodeId),
    {
        if let Some(mut node_id) = self.root {
            let mut dir = Direction::FromParent;
            loop {
                match dir {
                    Direction::FromParent => {
                        preorder(node_id);
                        if let Some(left_id) = self.node(node_id).left {
                            node_id = left_id;
                        } else {
                            dir = Direction::FromLeft;
                        }
                    }
                    Direction::FromLeft => {
                        inorder(node_id);
                        if let Some(right_id) = self.node(node_id).right {
                            node_id = right_id;
                            dir = Direction::FromParent;
                        } else {
                            dir = Direction::FromRight;
                        }
                    }
                    Direction::FromRight => match self.node(node_id).parent {
                        Some(parent_id) => {
                            dir = match self.side_of(node_id) {
                                Side::Left => Direction::FromLeft,
                                Side::Right => Direction::FromRight,
                            };
                            node_id = parent_id;
                        }
                        None => break,
                    },
                }
            }
        }
    }
}

#[cfg(any(test, feature = "consistency_check"))]
#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

impl<K: Ord, V, B: Balance> Default for Tree<K, V, B, Natural<K>> {
    /// Creates an empty map.
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V, B: Balance> FromIterator<(K, V)> for Tree<K, V, B, Natural<K>> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, B, C> Extend<(K, V)> for Tree<K, V, B, C>
where
    B: Balance,
    C: Compare<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, B, C> fmt::Debug for Tree<K, V, B, C> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_map().entries(self.iter()).finish()
    }
}
