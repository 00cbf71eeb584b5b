//! The record contract a caller's type has to satisfy.
use std::fmt::Debug;
use std::hash::Hash;

/// A flat record that refers to its parent by identifier.
///
/// Identifiers are expected to be unique within one collection passed to
/// [`convert_to_trees`](crate::convert_to_trees). The parent identifier is only
/// a placeholder: construction resolves it to the canonical node carrying that
/// identifier.
///
/// ```
/// use flattree::TreeNode;
///
/// struct Category {
///     id: u64,
///     parent: Option<u64>,
///     name: String,
/// }
///
/// impl TreeNode for Category {
///     type Id = u64;
///
///     fn id(&self) -> u64 {
///         self.id
///     }
///
///     fn parent_id(&self) -> Option<u64> {
///         self.parent
///     }
/// }
/// ```
pub trait TreeNode {
    /// Identifier type. Acts as the only equality key for nodes.
    type Id: Copy + Eq + Hash + Debug;

    /// The record's own identifier.
    fn id(&self) -> Self::Id;

    /// Identifier of the parent record, or `None` for a root.
    fn parent_id(&self) -> Option<Self::Id>;
}

/// `(id, parent)` pairs.
impl<I: Copy + Eq + Hash + Debug> TreeNode for (I, Option<I>) {
    type Id = I;

    #[inline]
    fn id(&self) -> I {
        self.0
    }

    #[inline]
    fn parent_id(&self) -> Option<I> {
        self.1
    }
}

impl<T: TreeNode + ?Sized> TreeNode for &T {
    type Id = T::Id;

    #[inline]
    fn id(&self) -> Self::Id {
        (**self).id()
    }

    #[inline]
    fn parent_id(&self) -> Option<Self::Id> {
        (**self).parent_id()
    }
}

impl<T: TreeNode + ?Sized> TreeNode for Box<T> {
    type Id = T::Id;

    #[inline]
    fn id(&self) -> Self::Id {
        (**self).id()
    }

    #[inline]
    fn parent_id(&self) -> Option<Self::Id> {
        (**self).parent_id()
    }
}
