//! Plain binary search tree without any rebalancing.

use compare::Natural;

use crate::tree::{sealed, Balance, Link, NodeId, Tree};

/// Balance metadata of the plain binary search tree: there is none.
///
/// Insertion order alone shapes the tree, so sorted input degenerates it into a list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unbalanced;

/// An ordered map implemented with an unbalanced binary search tree.
///
/// ```
/// use searchtree::BsTreeMap;
/// let mut map = BsTreeMap::new();
/// map.insert(2, "two");
/// map.insert(1, "one");
/// assert_eq!(map.get(&1), Some(&"one"));
/// assert_eq!(map.remove(&2), Some("two"));
/// assert_eq!(map.len(), 1);
/// ```
pub type BsTreeMap<K, V, C = Natural<K>> = Tree<K, V, Unbalanced, C>;

impl sealed::Sealed for Unbalanced {}

impl Balance for Unbalanced {
    fn leaf() -> Self {
        Unbalanced
    }

    fn rebalance_insert<K, V, C>(_tree: &mut Tree<K, V, Self, C>, _node: NodeId) {}

    fn rebalance_remove<K, V, C>(_tree: &mut Tree<K, V, Self, C>, _parent: Link) {}

    #[cfg(any(test, feature = "consistency_check"))]
    fn check<K, V, C>(_tree: &Tree<K, V, Self, C>) {}
}
