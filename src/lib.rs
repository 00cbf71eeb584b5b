//! Assemble flat, parent-referencing records into a forest and walk it.
//!
//! Records are typically rows loaded in bulk from a database, a file or a
//! network response, where every row names its parent by id. [`Forest`]
//! links them up in two passes (an id lookup, then a resolution pass) and
//! offers pre-order walks, ancestor and sibling iterators, id search and
//! depth on the result.
//!
//! ```
//! use flattree::{convert_to_trees, flatten_trees};
//!
//! let forest = convert_to_trees([(1, None), (2, Some(1)), (3, Some(2))]);
//! let three = forest.find_node_by_id(3).unwrap();
//! assert_eq!(forest.depth(three), 2);
//! assert_eq!(forest.siblings(three, false).unwrap().count(), 0);
//!
//! let ids: Vec<_> = flatten_trees(forest).into_iter().map(|(id, _)| id).collect();
//! assert_eq!(ids, [1, 2, 3]);
//! ```
//!
//! The forest is plain data without interior mutability; walks borrow it, so
//! it can not be relinked while a walk is in progress.

pub mod error;
pub mod forest;
pub mod hierarchy;
pub mod memory;
pub mod node;
pub mod search;
pub mod traverse;

pub use error::{ConvertError, TreeError};
pub use forest::{convert_to_trees, flatten_trees, ConvertOptions, Forest, Policy};
pub use node::TreeNode;
pub use search::find_node_by_id;
pub use traverse::{Ancestors, Descendants, Siblings};

/// Index of a record within a [`Forest`], equal to its position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeIndex(u32);

crate::entity_impl!(NodeIndex, u32);

impl NodeIndex {
    /// Creates an index from an input position.
    ///
    /// # Panics
    ///
    /// Panics when `index` does not fit into a `u32`.
    #[inline]
    pub fn new(index: usize) -> Self {
        <Self as memory::EntityIndex>::new(index)
    }

    /// Returns the input position this index refers to.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
