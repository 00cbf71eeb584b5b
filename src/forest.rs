//! Assembling flat records into a forest and flattening it again.
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use bitvec::vec::BitVec;
use tracing::{debug, instrument, trace};

use crate::error::ConvertError;
use crate::hierarchy::{Children, LinkedHierarchy};
use crate::node::TreeNode;
use crate::NodeIndex;

/// What to do when construction runs into an anomaly in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Policy {
    /// Keep going; the offending record is left out of the forest or the
    /// lookup.
    #[default]
    Ignore,
    /// Abort construction with a [`ConvertError`].
    Reject,
}

/// Options for [`Forest::from_flat_with`].
///
/// The default options ignore every anomaly:
///
///  - a record whose parent id is not in the input is dropped,
///  - of several records sharing an id the last one is found by id lookups,
///  - the record that would close a parent cycle is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConvertOptions {
    pub dangling: Policy,
    pub duplicates: Policy,
    pub cycles: Policy,
}

impl ConvertOptions {
    /// Options that reject every anomaly.
    pub const fn strict() -> Self {
        Self {
            dangling: Policy::Reject,
            duplicates: Policy::Reject,
            cycles: Policy::Reject,
        }
    }

    pub const fn with_dangling(mut self, policy: Policy) -> Self {
        self.dangling = policy;
        self
    }

    pub const fn with_duplicates(mut self, policy: Policy) -> Self {
        self.duplicates = policy;
        self
    }

    pub const fn with_cycles(mut self, policy: Policy) -> Self {
        self.cycles = policy;
        self
    }
}

/// A forest assembled from flat records.
///
/// Records are stored in input order and addressed by [`NodeIndex`]: the
/// record at position `i` of the input is `forest[NodeIndex::new(i)]`. The
/// parent/child links are kept next to the records, so the records
/// themselves are never copied or rewritten.
///
/// Records that could not be linked (see [`ConvertOptions`]) stay stored but
/// are neither roots nor children of any node. [`Forest::detached`] lists
/// them.
#[derive(Debug, Clone)]
pub struct Forest<N> {
    nodes: Vec<N>,
    hierarchy: LinkedHierarchy<NodeIndex>,
    /// Sorted, since roots are discovered in input order.
    roots: Vec<NodeIndex>,
}

impl<N> Default for Forest<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            hierarchy: LinkedHierarchy::new(),
            roots: Vec::new(),
        }
    }
}

impl<N: TreeNode> Forest<N> {
    /// Assembles flat records into a forest, silently dropping records whose
    /// parent can not be resolved.
    ///
    /// # Example
    ///
    /// ```
    /// use flattree::Forest;
    ///
    /// let forest = Forest::from_flat([(1, None), (3, Some(2)), (2, Some(1))]);
    /// let root = forest.roots()[0];
    /// assert_eq!(forest[root], (1, None));
    /// assert_eq!(forest.children(root).map(|n| forest[n].0).collect::<Vec<_>>(), [2]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics when there are more than `u32::MAX` records.
    pub fn from_flat(records: impl IntoIterator<Item = N>) -> Self {
        match Self::from_flat_with(records, &ConvertOptions::default()) {
            Ok(forest) => forest,
            Err(_) => unreachable!("the default options never reject"),
        }
    }

    /// Assembles flat records into a forest using the given options.
    ///
    /// Roots keep their relative input order, and so do the children of
    /// every node. Runs in time linear in the number of records.
    ///
    /// # Errors
    ///
    /// Returns the first anomaly whose [`Policy`] is [`Policy::Reject`].
    ///
    /// # Panics
    ///
    /// Panics when there are more than `u32::MAX` records.
    #[instrument(level = "debug", skip_all, fields(options = ?options))]
    pub fn from_flat_with(
        records: impl IntoIterator<Item = N>,
        options: &ConvertOptions,
    ) -> Result<Self, ConvertError<N::Id>> {
        let nodes: Vec<N> = records.into_iter().collect();

        let mut hierarchy = LinkedHierarchy::new();
        hierarchy.reserve_nodes(nodes.len());

        let mut lookup = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            let index = NodeIndex::new(index);
            match lookup.entry(node.id()) {
                Entry::Vacant(entry) => {
                    entry.insert(index);
                }
                Entry::Occupied(mut entry) => {
                    if options.duplicates == Policy::Reject {
                        return Err(ConvertError::DuplicateId(node.id()));
                    }
                    debug!(id = ?node.id(), "duplicate record id, the later record wins");
                    entry.insert(index);
                }
            }
        }

        let mut roots = Vec::new();
        let mut parents: Vec<Option<NodeIndex>> = Vec::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            let Some(parent_id) = node.parent_id() else {
                roots.push(NodeIndex::new(index));
                parents.push(None);
                continue;
            };

            let parent = lookup.get(&parent_id).copied();
            if parent.is_none() {
                if options.dangling == Policy::Reject {
                    return Err(ConvertError::DanglingParent {
                        id: node.id(),
                        parent: parent_id,
                    });
                }
                debug!(id = ?node.id(), parent = ?parent_id, "dropping record with unknown parent");
            }
            parents.push(parent);
        }

        for index in cycle_breakers(&parents).iter_ones() {
            let node = &nodes[index];
            if options.cycles == Policy::Reject {
                return Err(ConvertError::Cycle(node.id()));
            }
            debug!(id = ?node.id(), parent = ?node.parent_id(), "dropping record closing a parent cycle");
            parents[index] = None;
        }

        for (index, parent) in parents.into_iter().enumerate() {
            let Some(parent) = parent else {
                continue;
            };
            if let Err(err) = hierarchy.attach_last(NodeIndex::new(index), parent) {
                unreachable!("parent links are acyclic and attached once: {err}");
            }
            trace!(node = index, parent = parent.index(), "attached");
        }

        debug!(nodes = nodes.len(), roots = roots.len(), "assembled forest");

        Ok(Self {
            nodes,
            hierarchy,
            roots,
        })
    }

    /// Whether the node is reachable from one of the forest's roots.
    ///
    /// Returns `false` for records that were dropped during construction and
    /// for indices that are not part of the forest.
    pub fn is_attached(&self, node: NodeIndex) -> bool {
        let Some(top) = self.ancestors(node, true).last() else {
            return false;
        };
        self.nodes[top.index()].parent_id().is_none()
    }
}

impl<N> Forest<N> {
    /// Number of stored records, including detached ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, node: NodeIndex) -> Option<&N> {
        self.nodes.get(node.index())
    }

    #[inline]
    pub fn get_mut(&mut self, node: NodeIndex) -> Option<&mut N> {
        self.nodes.get_mut(node.index())
    }

    /// Whether `node` refers to a stored record.
    #[inline]
    pub fn contains(&self, node: NodeIndex) -> bool {
        node.index() < self.nodes.len()
    }

    /// Iterates over all node indices in input order.
    pub fn node_indices(
        &self,
    ) -> impl ExactSizeIterator<Item = NodeIndex> + DoubleEndedIterator + 'static {
        (0..self.nodes.len()).map(NodeIndex::new)
    }

    /// The roots of the forest, in input order.
    #[inline]
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    #[inline]
    pub fn is_root(&self, node: NodeIndex) -> bool {
        self.roots.binary_search(&node).is_ok()
    }

    /// Returns the canonical parent of a node, or `None` for roots and
    /// detached nodes.
    #[inline]
    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.hierarchy.parent(node)
    }

    /// Iterates over a node's children in input order.
    #[inline]
    pub fn children(&self, node: NodeIndex) -> Children<'_, NodeIndex> {
        self.hierarchy.children(node)
    }

    #[inline]
    pub fn child_count(&self, node: NodeIndex) -> usize {
        self.hierarchy.child_count(node)
    }

    /// Lists the stored nodes that are not reachable from any root, in input
    /// order.
    ///
    /// These are the records dropped during construction together with their
    /// descendants. Comparing `forest.detached().is_empty()` is the cheap way
    /// to check that the input was complete.
    pub fn detached(&self) -> Vec<NodeIndex> {
        let mut reachable = BitVec::<usize>::repeat(false, self.nodes.len());
        for node in self.preorder() {
            reachable.set(node.index(), true);
        }
        reachable.iter_zeros().map(NodeIndex::new).collect()
    }

    /// Returns the indices of every node reachable from the roots, each root
    /// followed by its subtree in pre-order.
    pub fn flatten(&self) -> Vec<NodeIndex> {
        self.preorder().collect()
    }

    /// Consumes the forest, returning the reachable records in pre-order.
    ///
    /// Detached records are discarded; use [`Forest::into_records`] to keep
    /// them.
    pub fn into_flat(self) -> Vec<N> {
        let order = self.flatten();
        let mut slots: Vec<Option<N>> = self.nodes.into_iter().map(Some).collect();
        order
            .into_iter()
            .filter_map(|node| slots[node.index()].take())
            .collect()
    }

    /// Consumes the forest, returning every stored record in input order.
    pub fn into_records(self) -> Vec<N> {
        self.nodes
    }

    #[inline]
    pub(crate) fn hierarchy(&self) -> &LinkedHierarchy<NodeIndex> {
        &self.hierarchy
    }
}

impl<N> Index<NodeIndex> for Forest<N> {
    type Output = N;

    #[inline]
    fn index(&self, node: NodeIndex) -> &N {
        &self.nodes[node.index()]
    }
}

impl<N> IndexMut<NodeIndex> for Forest<N> {
    #[inline]
    fn index_mut(&mut self, node: NodeIndex) -> &mut N {
        &mut self.nodes[node.index()]
    }
}

impl<N: TreeNode> FromIterator<N> for Forest<N> {
    fn from_iter<I: IntoIterator<Item = N>>(records: I) -> Self {
        Self::from_flat(records)
    }
}

/// Finds the records that close a cycle of parent links.
///
/// Each cycle is broken at its member that comes last in the input, which is
/// the record whose attachment would close the cycle when linking in input
/// order. Every node is visited once.
fn cycle_breakers(parents: &[Option<NodeIndex>]) -> BitVec {
    let mut done = BitVec::<usize>::repeat(false, parents.len());
    let mut on_path = BitVec::<usize>::repeat(false, parents.len());
    let mut breakers = BitVec::<usize>::repeat(false, parents.len());
    let mut path = Vec::new();

    for start in 0..parents.len() {
        let mut current = Some(start);
        while let Some(index) = current {
            if done[index] {
                break;
            }
            if on_path[index] {
                // The path from the first visit of `index` onwards is a cycle.
                let cycle = path.iter().position(|&node| node == index).unwrap_or(0);
                if let Some(&closing) = path[cycle..].iter().max() {
                    breakers.set(closing, true);
                }
                break;
            }
            on_path.set(index, true);
            path.push(index);
            current = parents[index].map(NodeIndex::index);
        }

        for index in path.drain(..) {
            on_path.set(index, false);
            done.set(index, true);
        }
    }

    breakers
}

/// Assembles flat records into a forest. See [`Forest::from_flat`].
pub fn convert_to_trees<N: TreeNode>(records: impl IntoIterator<Item = N>) -> Forest<N> {
    Forest::from_flat(records)
}

/// Flattens a forest into its reachable records in pre-order. See
/// [`Forest::into_flat`].
pub fn flatten_trees<N>(forest: Forest<N>) -> Vec<N> {
    forest.into_flat()
}

#[cfg(test)]
mod test {
    use super::*;

    fn ids(forest: &Forest<(u32, Option<u32>)>, nodes: impl IntoIterator<Item = NodeIndex>) -> Vec<u32> {
        nodes.into_iter().map(|node| forest[node].0).collect()
    }

    #[test]
    fn links_children_in_input_order() {
        let forest = Forest::from_flat([
            (3, Some(1)),
            (1, None),
            (2, Some(1)),
            (4, None),
            (5, Some(4)),
        ]);

        assert_eq!(ids(&forest, forest.roots().iter().copied()), [1, 4]);
        assert_eq!(ids(&forest, forest.children(NodeIndex::new(1))), [3, 2]);
        assert_eq!(forest.parent(NodeIndex::new(0)), Some(NodeIndex::new(1)));
        assert_eq!(forest.parent(NodeIndex::new(1)), None);
        assert!(forest.detached().is_empty());
    }

    #[test]
    fn every_node_gets_an_empty_child_list() {
        let forest = Forest::from_flat([(1, None), (2, None)]);
        for node in forest.node_indices() {
            assert_eq!(forest.child_count(node), 0);
            assert!(forest.children(node).next().is_none());
        }
    }

    #[test]
    fn dangling_parent_is_dropped() {
        let forest = Forest::from_flat([(1, None), (2, Some(9)), (3, Some(2))]);

        assert_eq!(forest.roots(), [NodeIndex::new(0)]);
        assert_eq!(forest.parent(NodeIndex::new(1)), None);
        assert!(!forest.is_root(NodeIndex::new(1)));
        assert!(!forest.is_attached(NodeIndex::new(1)));
        // The child of a dropped node is linked but unreachable.
        assert_eq!(forest.parent(NodeIndex::new(2)), Some(NodeIndex::new(1)));
        assert_eq!(forest.detached(), [NodeIndex::new(1), NodeIndex::new(2)]);
        assert_eq!(forest.len(), 3);
        assert_eq!(forest.into_flat(), [(1, None)]);
    }

    #[test]
    fn strict_options_reject_dangling_parent() {
        let err = Forest::from_flat_with([(1, None), (2, Some(9))], &ConvertOptions::strict())
            .unwrap_err();
        assert_eq!(err, ConvertError::DanglingParent { id: 2, parent: 9 });
    }

    #[test]
    fn duplicate_ids_resolve_to_the_later_record() {
        let forest = Forest::from_flat([(1, None), (1, None), (2, Some(1))]);
        assert_eq!(forest.parent(NodeIndex::new(2)), Some(NodeIndex::new(1)));
        assert_eq!(forest.roots().len(), 2);

        let err = Forest::from_flat_with(
            [(1, None), (1, None)],
            &ConvertOptions::default().with_duplicates(Policy::Reject),
        )
        .unwrap_err();
        assert_eq!(err, ConvertError::DuplicateId(1));
    }

    #[test]
    fn parent_cycles_are_dropped() {
        let forest = Forest::from_flat([(1, Some(2)), (2, Some(1)), (3, Some(3)), (4, None)]);
        assert_eq!(forest.roots(), [NodeIndex::new(3)]);
        assert_eq!(forest.parent(NodeIndex::new(0)), Some(NodeIndex::new(1)));
        assert_eq!(forest.parent(NodeIndex::new(1)), None);
        assert_eq!(forest.parent(NodeIndex::new(2)), None);
        assert_eq!(forest.detached().len(), 3);

        let err = Forest::from_flat_with(
            [(1, Some(2)), (2, Some(1))],
            &ConvertOptions::default().with_cycles(Policy::Reject),
        )
        .unwrap_err();
        assert_eq!(err, ConvertError::Cycle(2));
    }

    #[test]
    fn cycles_break_at_their_last_record() {
        let parents = |links: &[Option<usize>]| -> Vec<Option<NodeIndex>> {
            links.iter().map(|link| link.map(NodeIndex::new)).collect()
        };

        // 0 -> 1 -> 2 -> 1 with a tail into the cycle, 3 -> 3, and 4 -> 5 -> 4.
        let breakers = cycle_breakers(&parents(&[
            Some(1),
            Some(2),
            Some(1),
            Some(3),
            Some(5),
            Some(4),
        ]));
        assert_eq!(breakers.iter_ones().collect::<Vec<_>>(), [2, 3, 5]);

        let breakers = cycle_breakers(&parents(&[None, Some(0), Some(1), Some(0)]));
        assert!(breakers.not_any());
    }

    #[test]
    fn tail_into_a_cycle_stays_detached() {
        let forest = Forest::from_flat([(1, Some(2)), (2, Some(3)), (3, Some(2)), (4, None)]);
        assert_eq!(forest.parent(NodeIndex::new(0)), Some(NodeIndex::new(1)));
        assert_eq!(forest.parent(NodeIndex::new(1)), Some(NodeIndex::new(2)));
        assert_eq!(forest.parent(NodeIndex::new(2)), None);
        assert_eq!(forest.flatten(), [NodeIndex::new(3)]);
        assert_eq!(forest.detached().len(), 3);
    }

    #[test]
    fn into_flat_is_pre_order() {
        let forest: Forest<_> = [
            (4, Some(2)),
            (2, Some(1)),
            (1, None),
            (3, Some(1)),
            (5, None),
        ]
        .into_iter()
        .collect();

        let flat: Vec<u32> = flatten_trees(forest).into_iter().map(|(id, _)| id).collect();
        assert_eq!(flat, [1, 2, 4, 3, 5]);
    }

    #[test]
    fn into_records_keeps_input_order() {
        let records = vec![(2, Some(1)), (1, None), (3, Some(7))];
        let forest = convert_to_trees(records.clone());
        assert_eq!(forest.into_records(), records);
    }

    #[test]
    fn empty_input() {
        let forest = Forest::<(u8, Option<u8>)>::from_flat([]);
        assert!(forest.is_empty());
        assert!(forest.roots().is_empty());
        assert!(forest.flatten().is_empty());
        assert!(forest.detached().is_empty());
    }
}
