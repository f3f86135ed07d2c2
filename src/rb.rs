//! Red-black tree: every node is colored red or black, the root is black, no red node has a red
//! child and every path from a node down to an absent child passes the same number of black nodes.

use compare::Natural;
use log::trace;

use crate::tree::{corrupt, sealed, Balance, Link, NodeId, Tree};

/// Balance metadata of a red-black tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// An ordered map implemented with a red-black tree.
///
/// ```
/// use searchtree::RbTreeMap;
/// let mut map = RbTreeMap::new();
/// map.insert(10, "ten");
/// map.insert(20, "twenty");
/// map.insert(30, "thirty");
/// assert_eq!(map.root_key(), Some(&20));
/// assert_eq!(map.remove(&10), Some("ten"));
/// assert_eq!(map.len(), 2);
/// ```
pub type RbTreeMap<K, V, C = Natural<K>> = Tree<K, V, Color, C>;

impl<K, V, C> Tree<K, V, Color, C> {
    /// Returns the key stored in the root node.
    pub fn root_key(&self) -> Option<&K> {
        self.root().map(|root_id| self.key_value(root_id).0)
    }
}

impl sealed::Sealed for Color {}

impl Balance for Color {
    fn leaf() -> Self {
        Color::Red
    }

    fn rebalance_insert<K, V, C>(tree: &mut Tree<K, V, Self, C>, node: NodeId) {
        insert_fixup(tree, node);
    }

    fn rebalance_unlink<K, V, C>(tree: &mut Tree<K, V, Self, C>, node: NodeId, child: Link) {
        if color_of(tree, Some(node)) == Color::Red {
            // Removing a red node keeps every black height
            return;
        }
        match child {
            // The red child takes over the position and the black of the removed node
            Some(child_id) if color_of(tree, child) == Color::Red => {
                set_color(tree, child_id, Color::Black)
            }
            Some(_) => corrupt("black node with a single black child"),
            // A black leaf: fix up while it still marks the position that loses a black
            None => remove_fixup(tree, node),
        }
    }

    fn rebalance_remove<K, V, C>(tree: &mut Tree<K, V, Self, C>, _parent: Link) {
        if let Some(root_id) = tree.root() {
            set_color(tree, root_id, Color::Black);
        }
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn check<K, V, C>(tree: &Tree<K, V, Self, C>) {
        // Returns the black height of the sub tree, not counting absent children
        fn check_node<K, V, C>(tree: &Tree<K, V, Color, C>, link: Link) -> usize {
            match link {
                None => 0,
                Some(node_id) => {
                    let left = tree.left(node_id);
                    let right = tree.right(node_id);
                    let color = color_of(tree, link);
                    if color == Color::Red {
                        assert_eq!(color_of(tree, left), Color::Black);
                        assert_eq!(color_of(tree, right), Color::Black);
                    }

                    let left_black_height = check_node(tree, left);
                    let right_black_height = check_node(tree, right);
                    assert_eq!(left_black_height, right_black_height);
                    left_black_height + (color == Color::Black) as usize
                }
            }
        }

        assert_eq!(color_of(tree, tree.root()), Color::Black);
        check_node(tree, tree.root());
    }
}

// Absent children count as black
fn color_of<K, V, C>(tree: &Tree<K, V, Color, C>, link: Link) -> Color {
    match link {
        None => Color::Black,
        Some(node_id) => *tree.balance(node_id),
    }
}

fn set_color<K, V, C>(tree: &mut Tree<K, V, Color, C>, node_id: NodeId, color: Color) {
    *tree.balance_mut(node_id) = color;
}

// Resolves a red node with a red parent, starting at a freshly inserted red node.
fn insert_fixup<K, V, C>(tree: &mut Tree<K, V, Color, C>, mut node_id: NodeId) {
    loop {
        let parent_id = match tree.parent(node_id) {
            None => {
                set_color(tree, node_id, Color::Black);
                return;
            }
            Some(parent_id) => parent_id,
        };
        if color_of(tree, Some(parent_id)) == Color::Black {
            return;
        }

        // A red parent is never the root, so the grandparent exists and is black
        let grandparent_id = match tree.parent(parent_id) {
            None => corrupt("red root node"),
            Some(grandparent_id) => grandparent_id,
        };
        let parent_side = tree.side_of(parent_id);
        let uncle = tree.child(grandparent_id, parent_side.opposite());

        match uncle {
            Some(uncle_id) if color_of(tree, uncle) == Color::Red => {
                // Push the red up and continue at the grandparent
                set_color(tree, parent_id, Color::Black);
                set_color(tree, uncle_id, Color::Black);
                set_color(tree, grandparent_id, Color::Red);
                node_id = grandparent_id;
                continue;
            }
            _ => {}
        }

        let mut parent_id = parent_id;
        if tree.side_of(node_id) != parent_side {
            // Inner grandchild, turn it into an outer one
            trace!("rb: insert rotation at inner node {}", node_id);
            tree.rotate(parent_id, parent_side);
            parent_id = node_id;
        }
        trace!("rb: insert rotation at grandparent {}", grandparent_id);
        set_color(tree, parent_id, Color::Black);
        set_color(tree, grandparent_id, Color::Red);
        tree.rotate(grandparent_id, parent_side.opposite());
        return;
    }
}

// Resolves a missing black at `node_id`, whose sub tree is one black short
// compared with the sub tree of its sibling.
fn remove_fixup<K, V, C>(tree: &mut Tree<K, V, Color, C>, mut node_id: NodeId) {
    loop {
        if color_of(tree, Some(node_id)) == Color::Red {
            set_color(tree, node_id, Color::Black);
            return;
        }
        let parent_id = match tree.parent(node_id) {
            None => return,
            Some(parent_id) => parent_id,
        };
        let side = tree.side_of(node_id);
        let far = side.opposite();

        let mut sibling_id = match tree.child(parent_id, far) {
            None => corrupt("black non-root node without sibling"),
            Some(sibling_id) => sibling_id,
        };

        if color_of(tree, Some(sibling_id)) == Color::Red {
            // Make the sibling black, then retry at the same node
            set_color(tree, sibling_id, Color::Black);
            set_color(tree, parent_id, Color::Red);
            tree.rotate(parent_id, side);
            continue;
        }

        let inner = tree.child(sibling_id, side);
        let outer = tree.child(sibling_id, far);
        if color_of(tree, inner) == Color::Black && color_of(tree, outer) == Color::Black {
            // Take a black off the sibling and move the deficit up
            set_color(tree, sibling_id, Color::Red);
            node_id = parent_id;
            continue;
        }

        if color_of(tree, outer) == Color::Black {
            // Inner child is red, rotate it into the outer position
            let inner_id = match inner {
                None => corrupt("red child is absent"),
                Some(inner_id) => inner_id,
            };
            set_color(tree, inner_id, Color::Black);
            set_color(tree, sibling_id, Color::Red);
            tree.rotate(sibling_id, far);
            sibling_id = inner_id;
        }

        // Outer child is red
        let outer_id = match tree.child(sibling_id, far) {
            None => corrupt("red child is absent"),
            Some(outer_id) => outer_id,
        };
        trace!("rb: remove rotation at parent {}", parent_id);
        let parent_color = color_of(tree, Some(parent_id));
        set_color(tree, sibling_id, parent_color);
        set_color(tree, parent_id, Color::Black);
        set_color(tree, outer_id, Color::Black);
        tree.rotate(parent_id, side);
        return;
    }
}

#[cfg(test)]
mod tests {
    use super::{color_of, Color, RbTreeMap};

    #[test]
    fn test_insert_rotation() {
        // 10            20
        //   \          /  \
        //    20  ->  10    30
        //      \
        //       30
        let mut map = RbTreeMap::new();
        map.insert(10, ());
        map.insert(20, ());
        map.check_consistency();
        map.insert(30, ());
        map.check_consistency();
        assert_eq!(map.root_key(), Some(&20));
        assert_eq!(color_of(&map, map.root()), Color::Black);
        let root_id = map.root().unwrap();
        assert_eq!(color_of(&map, map.left(root_id)), Color::Red);
        assert_eq!(color_of(&map, map.right(root_id)), Color::Red);
    }

    #[test]
    fn test_insert_recolor() {
        //     20              20
        //    /  \            /  \
        //  10    30  ->    10    30
        //                 /
        //                5
        let mut map = RbTreeMap::new();
        for key in [10, 20, 30, 5] {
            map.insert(key, ());
            map.check_consistency();
        }
        // Red uncle: parent and uncle turn black, root stays black
        let root_id = map.root().unwrap();
        assert_eq!(color_of(&map, map.left(root_id)), Color::Black);
        assert_eq!(color_of(&map, map.right(root_id)), Color::Black);
        assert_eq!(map.root_key(), Some(&20));
    }

    #[test]
    fn test_insert_inner_grandchild() {
        //   30        30       20
        //  /         /        /  \
        // 10   ->   20  ->  10    30
        //   \      /
        //    20   10
        let mut map = RbTreeMap::new();
        for key in [30, 10, 20] {
            map.insert(key, ());
        }
        map.check_consistency();
        assert_eq!(map.root_key(), Some(&20));
    }

    #[test]
    fn test_remove_cases() {
        let mut map = RbTreeMap::new();
        for key in 1..=15 {
            map.insert(key, key);
        }
        map.check_consistency();

        // Black leaves, red leaves, inner nodes and finally the root
        for key in [1, 3, 2, 8, 12, 15, 4] {
            assert_eq!(map.remove(&key), Some(key));
            map.check_consistency();
        }
        while let Some(key) = map.root_key().copied() {
            assert_eq!(map.remove(&key), Some(key));
            map.check_consistency();
        }
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
    }
}
