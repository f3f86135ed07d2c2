//! Ordered maps backed by binary search trees.
//!
//! Three engines share one tree skeleton and differ in how they keep the tree shallow:
//! [`BsTreeMap`] does not rebalance at all, [`AvlTreeMap`] keeps the heights of sibling sub
//! trees within one of each other and [`RbTreeMap`] colors its nodes red and black.
//! Every node links to its parent, so [`Cursor`] and [`Iter`] walk the tree in both directions
//! without an auxiliary stack.
//!
//! Keys are ordered by their natural order ([`Natural`]) or by any [`Compare`] implementation,
//! closures included.
//!
//! ```
//! use searchtree::{AvlTreeMap, RbTreeMap};
//!
//! let mut avl = AvlTreeMap::new();
//! let mut rb = RbTreeMap::with_cmp(|a: &i32, b: &i32| b.cmp(a));
//! for key in [3, 1, 2] {
//!     avl.insert(key, key.to_string());
//!     rb.insert(key, key.to_string());
//! }
//! assert!(avl.iter().map(|(key, _)| *key).eq([1, 2, 3]));
//! assert!(rb.iter().map(|(key, _)| *key).eq([3, 2, 1]));
//! ```
//!
//! Structural corruption is a bug in this crate and panics with a `tree structure error`.
//! Enable the `consistency_check` feature to get `check_consistency()` outside of tests.

mod avl;
mod bst;
mod cursor;
mod rb;
mod tree;
mod treemap;

pub use compare::{Compare, Natural};

pub use avl::{AvlTreeMap, Height};
pub use bst::{BsTreeMap, Unbalanced};
pub use cursor::{Cursor, CursorMut, Iter};
pub use rb::{Color, RbTreeMap};
pub use tree::{Balance, Tree};
pub use treemap::{Entry, TreeMap};
