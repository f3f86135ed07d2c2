//! AVL tree: every node records the height of its sub tree, and the heights of the two sub trees
//! of any node differ by at most one.

use std::cmp;

use compare::Natural;
use log::trace;

use crate::tree::{corrupt, sealed, Balance, Link, NodeId, Tree};

/// Balance metadata of an AVL tree node: the height of its sub tree.
/// A leaf has height 1, an absent child counts as height 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Height(u8);

/// An ordered map implemented with an AVL tree.
///
/// ```
/// use searchtree::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// map.insert(0, "zero");
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// assert_eq!(map.height(), 2);
/// map.remove(&1);
/// assert!(map.get(&1).is_none());
/// ```
pub type AvlTreeMap<K, V, C = Natural<K>> = Tree<K, V, Height, C>;

impl<K, V, C> Tree<K, V, Height, C> {
    /// Returns the height of the tree, 0 for an empty tree.
    pub fn height(&self) -> usize {
        height(self, self.root()) as usize
    }
}

impl sealed::Sealed for Height {}

impl Balance for Height {
    fn leaf() -> Self {
        Height(1)
    }

    fn rebalance_insert<K, V, C>(tree: &mut Tree<K, V, Self, C>, node: NodeId) {
        // The new leaf has its height already, start with its parent
        let parent = tree.parent(node);
        rebalance(tree, parent);
    }

    fn rebalance_remove<K, V, C>(tree: &mut Tree<K, V, Self, C>, parent: Link) {
        rebalance(tree, parent);
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn check<K, V, C>(tree: &Tree<K, V, Self, C>) {
        fn check_node<K, V, C>(tree: &Tree<K, V, Height, C>, link: Link) -> u8 {
            match link {
                None => 0,
                Some(node_id) => {
                    let left_height = check_node(tree, tree.left(node_id));
                    let right_height = check_node(tree, tree.right(node_id));

                    // Check height
                    let expected = 1 + cmp::max(left_height, right_height);
                    assert_eq!(tree.balance(node_id).0, expected);

                    // Check AVL condition (nearly balance)
                    assert!(left_height <= right_height + 1);
                    assert!(right_height <= left_height + 1);
                    expected
                }
            }
        }

        check_node(tree, tree.root());
    }
}

fn height<K, V, C>(tree: &Tree<K, V, Height, C>, link: Link) -> u8 {
    match link {
        None => 0,
        Some(node_id) => tree.balance(node_id).0,
    }
}

fn balance_factor<K, V, C>(tree: &Tree<K, V, Height, C>, node_id: NodeId) -> i16 {
    height(tree, tree.left(node_id)) as i16 - height(tree, tree.right(node_id)) as i16
}

fn adjust_height<K, V, C>(tree: &mut Tree<K, V, Height, C>, node_id: NodeId) {
    let left_height = height(tree, tree.left(node_id));
    let right_height = height(tree, tree.right(node_id));
    tree.balance_mut(node_id).0 = 1 + cmp::max(left_height, right_height);
}

fn rotate_left<K, V, C>(tree: &mut Tree<K, V, Height, C>, node_id: NodeId) -> NodeId {
    let right_id = tree.rotate_left(node_id);
    adjust_height(tree, node_id);
    adjust_height(tree, right_id);
    right_id
}

fn rotate_right<K, V, C>(tree: &mut Tree<K, V, Height, C>, node_id: NodeId) -> NodeId {
    let left_id = tree.rotate_right(node_id);
    adjust_height(tree, node_id);
    adjust_height(tree, left_id);
    left_id
}

// Rebalances nodes starting from given position up to the root node.
// A rotation restores the local balance but the height above may still change,
// so the walk never stops early.
fn rebalance<K, V, C>(tree: &mut Tree<K, V, Height, C>, start_from: Link) {
    let mut current = start_from;
    while let Some(node_id) = current {
        let subtree_root = rebalance_node(tree, node_id);
        current = tree.parent(subtree_root);
    }
}

/// Restores AVL condition (balance) at given node if necessary and adjusts height.
/// Resulting balance will be +1, 0 or -1 height difference between left and right subtree.
/// Initial balance must not exceed +2 or -2, which always holds after a single update.
/// Returns the root of the rebalanced sub tree.
fn rebalance_node<K, V, C>(tree: &mut Tree<K, V, Height, C>, node_id: NodeId) -> NodeId {
    let balance = balance_factor(tree, node_id);
    debug_assert!((-2..=2).contains(&balance));
    if balance > 1 {
        let left_id = match tree.left(node_id) {
            None => corrupt("left heavy node without left child"),
            Some(left_id) => left_id,
        };
        // A removal may leave the left child perfectly balanced, a single rotation suffices then
        if balance_factor(tree, left_id) >= 0 {
            trace!("avl: LL rotation at node {}", node_id);
        } else {
            trace!("avl: LR rotation at node {}", node_id);
            rotate_left(tree, left_id);
        }
        rotate_right(tree, node_id)
    } else if balance < -1 {
        let right_id = match tree.right(node_id) {
            None => corrupt("right heavy node without right child"),
            Some(right_id) => right_id,
        };
        if balance_factor(tree, right_id) <= 0 {
            trace!("avl: RR rotation at node {}", node_id);
        } else {
            trace!("avl: RL rotation at node {}", node_id);
            rotate_right(tree, right_id);
        }
        rotate_left(tree, node_id)
    } else {
        adjust_height(tree, node_id);
        node_id
    }
}

#[cfg(test)]
mod tests {
    use super::AvlTreeMap;

    #[test]
    fn test_rebalance() {
        {
            //     3 ->   2
            //    /      / \
            //   2      1   3
            //  /
            // 1
            let mut map = AvlTreeMap::new();
            map.insert(3, ());
            map.insert(2, ());
            map.insert(1, ());
            map.check_consistency();
            assert_eq!(map.height(), 2);
            assert_eq!(map.first_key_value(), Some((&1, &())));
        }
        {
            //     3   ->     3 ->   2
            //    / \        /      / \
            //   2   4      2      1   3
            //  /          /
            // 1          1
            let mut map = AvlTreeMap::new();
            map.insert(3, ());
            map.insert(2, ());
            map.insert(4, ());
            map.insert(1, ());
            map.check_consistency();
            assert_eq!(map.height(), 3);
            map.remove(&4);
            map.check_consistency();
            assert_eq!(map.height(), 2);
        }
        {
            //   3  ->   2
            //  /       / \
            // 1       1   3
            //  \
            //   2
            let mut map = AvlTreeMap::new();
            map.insert(3, ());
            map.insert(1, ());
            map.insert(2, ());
            map.check_consistency();
            assert_eq!(map.height(), 2);
        }
        {
            // 1 ->    2
            //  \     / \
            //   2   1   3
            //    \
            //     3
            let mut map = AvlTreeMap::new();
            map.insert(1, ());
            map.insert(2, ());
            map.insert(3, ());
            map.check_consistency();
            assert_eq!(map.height(), 2);
        }
        {
            //   1   ->  1   ->  2
            //  / \       \     / \
            // 0   3       3   1   3
            //    /       /
            //   2       2
            let mut map = AvlTreeMap::new();
            map.insert(1, ());
            map.insert(0, ());
            map.insert(3, ());
            map.insert(2, ());
            map.check_consistency();
            assert_eq!(map.height(), 3);
            map.remove(&0);
            map.check_consistency();
            assert_eq!(map.height(), 2);
        }
    }

    #[test]
    fn test_remove_leaves_balanced_child() {
        //     2     ->   2      ->    4
        //    / \          \           / \
        //   1   4          4         2   5
        //      / \        / \         \
        //     3   5      3   5         3
        let mut map = AvlTreeMap::new();
        for key in [2, 1, 4, 3, 5] {
            map.insert(key, ());
        }
        map.check_consistency();
        map.remove(&1);
        map.check_consistency();
        // Single left rotation although the right child is balanced
        assert_eq!(map.height(), 3);
        let keys: Vec<i32> = map.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_insert_scenario() {
        let mut map = AvlTreeMap::new();
        for key in [5, 3, 8, 1, 4, 7, 9] {
            map.insert(key, key.to_string());
            map.check_consistency();
        }
        let keys: Vec<i32> = map.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(map.height(), 3);
        assert_eq!(map.get(&7).map(String::as_str), Some("7"));
    }

    #[test]
    fn test_insert_sorted_range() {
        const N: i32 = 1_000;

        let mut map = AvlTreeMap::new();
        for value in 0..N {
            assert_eq!(map.insert(value, value), None);
            map.check_consistency();
        }
        assert!(map.len() == N as usize);
        // 1.44 * log2(N)
        assert!(map.height() <= 14);
        assert!(map.get(&-42).is_none());
    }
}
