//! Looking up nodes by record id.
use crate::forest::Forest;
use crate::node::TreeNode;
use crate::NodeIndex;

impl<N: TreeNode> Forest<N> {
    /// Finds the first node in pre-order whose record id is `id`.
    ///
    /// Roots are searched in order, each with its whole subtree. Detached
    /// records are not part of any tree and are never found.
    ///
    /// ```
    /// use flattree::Forest;
    ///
    /// let forest = Forest::from_flat([(1, None), (2, Some(1)), (3, Some(2))]);
    /// let node = forest.find_node_by_id(2).unwrap();
    /// assert_eq!(forest[node], (2, Some(1)));
    /// assert!(forest.find_node_by_id(7).is_none());
    /// ```
    pub fn find_node_by_id(&self, id: N::Id) -> Option<NodeIndex> {
        self.preorder().find(|&node| self[node].id() == id)
    }

    /// Finds the first node in pre-order below `start`, `start` included,
    /// whose record id is `id`.
    pub fn find_in_subtree(&self, start: NodeIndex, id: N::Id) -> Option<NodeIndex> {
        self.descendants(start, true)
            .find(|&node| self[node].id() == id)
    }
}

/// Finds a node by record id anywhere in the forest. See
/// [`Forest::find_node_by_id`].
pub fn find_node_by_id<N: TreeNode>(forest: &Forest<N>, id: N::Id) -> Option<NodeIndex> {
    forest.find_node_by_id(id)
}
