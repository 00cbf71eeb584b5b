use std::iter::FusedIterator;
use std::mem::replace;
use thiserror::Error;

use crate::memory::{EntityIndex, SecondaryMap};

/// Parent/child links stored as intrusive doubly linked sibling lists.
///
/// Each node knows its parent, its first and last child and its previous and
/// next sibling. Appending a child and walking in either direction are O(1).
#[derive(Debug, Clone)]
pub struct LinkedHierarchy<Index> {
    data: SecondaryMap<Index, NodeData<Index>>,
}

impl<Index: EntityIndex> LinkedHierarchy<Index> {
    /// Creates an empty hierarchy.
    pub fn new() -> Self {
        Self {
            data: SecondaryMap::new(),
        }
    }

    /// Makes sure `len` nodes have their own (empty) link slot.
    pub(crate) fn reserve_nodes(&mut self, len: usize) {
        if self.data.len() < len {
            self.data.resize(len);
        }
    }
}

impl<Index: EntityIndex> Default for LinkedHierarchy<Index> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Index: EntityIndex> LinkedHierarchy<Index> {
    /// Attaches a node as the last child of a parent node.
    ///
    /// Only attaching a node to itself is detected as a cycle. Longer cycles
    /// are not looked for; the caller has to break them beforehand.
    ///
    /// # Errors
    ///
    ///  - When the node would become its own parent.
    ///  - When the node is already attached.
    ///
    /// # Panics
    ///
    /// Panics when the parent node will have more than `u32::MAX` children.
    pub fn attach_last(&mut self, node: Index, parent: Index) -> Result<(), AttachError> {
        if node == parent {
            return Err(AttachError::Cycle);
        } else if self.data[node].parent.is_some() {
            return Err(AttachError::AlreadyAttached);
        }

        self.data[parent].children_count += 1;

        let prev = replace(&mut self.data[parent].children[1], Some(node));
        {
            let node_data = &mut self.data[node];
            node_data.parent = Some(parent);
            node_data.siblings = [prev, None];
        }

        match prev {
            Some(prev) => self.data[prev].siblings[1] = Some(node),
            None => self.data[parent].children[0] = Some(node),
        }

        Ok(())
    }

    /// Returns a node's parent or `None` if it is not attached.
    #[inline]
    pub fn parent(&self, node: Index) -> Option<Index> {
        self.data[node].parent
    }

    /// Returns the next sibling in the node's parent, if any.
    ///
    /// Also returns `None` if the node is not attached.
    #[inline]
    pub fn next(&self, node: Index) -> Option<Index> {
        self.data[node].siblings[1]
    }

    /// Returns the previous sibling in the node's parent, if any.
    ///
    /// Also returns `None` if the node is not attached.
    #[inline]
    pub fn prev(&self, node: Index) -> Option<Index> {
        self.data[node].siblings[0]
    }

    /// Iterates over the node's children.
    #[inline]
    pub fn children(&self, node: Index) -> Children<'_, Index> {
        let node_data = &self.data[node];
        Children {
            hierarchy: self,
            next: node_data.children[0],
            prev: node_data.children[1],
            len: node_data.children_count as usize,
        }
    }

    /// Returns the number of the node's children.
    #[inline]
    pub fn child_count(&self, node: Index) -> usize {
        self.data[node].children_count as usize
    }
}

#[derive(Debug, Clone)]
struct NodeData<Index> {
    /// The first and last child of the node, if any.
    children: [Option<Index>; 2],
    children_count: u32,
    parent: Option<Index>,
    /// The previous and next sibling of the node, if any.
    siblings: [Option<Index>; 2],
}

impl<Index> Default for NodeData<Index> {
    fn default() -> Self {
        Self {
            children: [None, None],
            children_count: 0,
            parent: None,
            siblings: [None, None],
        }
    }
}

/// Iterator over the children of a node, in stored order.
#[derive(Debug, Clone)]
pub struct Children<'a, Index> {
    hierarchy: &'a LinkedHierarchy<Index>,
    next: Option<Index>,
    prev: Option<Index>,
    len: usize,
}

impl<'a, Index: EntityIndex> Iterator for Children<'a, Index> {
    type Item = Index;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let current = self.next?;
        self.len -= 1;
        self.next = self.hierarchy.next(current);
        Some(current)
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, Index: EntityIndex> DoubleEndedIterator for Children<'a, Index> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let current = self.prev?;
        self.len -= 1;
        self.prev = self.hierarchy.prev(current);
        Some(current)
    }
}

impl<'a, Index: EntityIndex> ExactSizeIterator for Children<'a, Index> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, Index: EntityIndex> FusedIterator for Children<'a, Index> {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachError {
    #[error("the node is already attached")]
    AlreadyAttached,
    #[error("attaching the node would introduce a cycle")]
    Cycle,
}
