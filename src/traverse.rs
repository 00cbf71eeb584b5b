//! Lazy walks over a [`Forest`]: descendants, ancestors and siblings.
//!
//! Every iterator here borrows the forest and only remembers its position, so
//! it can be dropped halfway through at no cost. Calling the method again
//! starts a fresh walk.
use std::fmt::{self, Debug};
use std::iter::FusedIterator;

use crate::error::TreeError;
use crate::forest::Forest;
use crate::hierarchy::{Children, LinkedHierarchy};
use crate::node::TreeNode;
use crate::NodeIndex;

impl<N> Forest<N> {
    /// Walks the subtree below `start` in pre-order.
    ///
    /// When `include_start` is set `start` is yielded first, otherwise the walk
    /// begins with its first child. An index that is not part of the forest
    /// yields nothing.
    ///
    /// ```
    /// use flattree::Forest;
    ///
    /// let forest = Forest::from_flat([(1, None), (2, Some(1)), (3, Some(2)), (4, Some(1))]);
    /// let root = forest.roots()[0];
    /// let ids: Vec<_> = forest.descendants(root, true).map(|n| forest[n].0).collect();
    /// assert_eq!(ids, [1, 2, 3, 4]);
    /// ```
    pub fn descendants(&self, start: NodeIndex, include_start: bool) -> Descendants<'_> {
        let hierarchy = self.hierarchy();
        let mut stack = Vec::new();
        if self.contains(start) {
            if include_start {
                stack.push(start);
            } else {
                stack.extend(hierarchy.children(start).rev());
            }
        }
        Descendants { hierarchy, stack }
    }

    /// Walks every tree of the forest in pre-order, one root after the other.
    pub fn preorder(&self) -> Descendants<'_> {
        Descendants {
            hierarchy: self.hierarchy(),
            stack: self.roots().iter().rev().copied().collect(),
        }
    }

    /// Walks from `start` up to the root of its tree, root included.
    ///
    /// When `include_start` is unset the walk begins with the parent, which
    /// makes it empty for roots.
    pub fn ancestors(&self, start: NodeIndex, include_start: bool) -> Ancestors<'_> {
        let next = if !self.contains(start) {
            None
        } else if include_start {
            Some(start)
        } else {
            self.parent(start)
        };
        Ancestors {
            hierarchy: self.hierarchy(),
            next,
        }
    }

    /// Number of parent hops from `node` to the root of its tree.
    ///
    /// Roots have depth 0, their children depth 1 and so on.
    pub fn depth(&self, node: NodeIndex) -> usize {
        self.ancestors(node, false).count()
    }
}

impl<N: TreeNode> Forest<N> {
    /// Iterates over the children of `start`'s parent.
    ///
    /// When `include_start` is set `start` comes first. The other children
    /// follow in stored order, skipping any child whose id equals the id of
    /// `start`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NoParent`] when `start` is a root, was dropped
    /// during construction, or is not part of the forest.
    pub fn siblings(
        &self,
        start: NodeIndex,
        include_start: bool,
    ) -> Result<Siblings<'_, N>, TreeError> {
        let parent = self.parent(start).ok_or(TreeError::NoParent(start))?;
        Ok(Siblings {
            forest: self,
            pending: include_start.then_some(start),
            id: self[start].id(),
            children: self.children(parent),
        })
    }
}

/// Pre-order iterator driven by an explicit stack.
///
/// Created by [`Forest::descendants`] and [`Forest::preorder`].
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    hierarchy: &'a LinkedHierarchy<NodeIndex>,
    /// Nodes still to visit, the next one on top.
    stack: Vec<NodeIndex>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack.extend(self.hierarchy.children(current).rev());
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), None)
    }
}

impl<'a> FusedIterator for Descendants<'a> {}

/// Iterator following parent links to the root.
///
/// Created by [`Forest::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    hierarchy: &'a LinkedHierarchy<NodeIndex>,
    next: Option<NodeIndex>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.hierarchy.parent(current);
        Some(current)
    }
}

impl<'a> FusedIterator for Ancestors<'a> {}

/// Iterator over a node and the other children of its parent.
///
/// Created by [`Forest::siblings`].
pub struct Siblings<'a, N: TreeNode> {
    forest: &'a Forest<N>,
    pending: Option<NodeIndex>,
    id: N::Id,
    children: Children<'a, NodeIndex>,
}

// Written by hand so that `N` itself needs neither `Clone` nor `Debug`.
impl<'a, N: TreeNode> Clone for Siblings<'a, N> {
    fn clone(&self) -> Self {
        Self {
            forest: self.forest,
            pending: self.pending,
            id: self.id,
            children: self.children.clone(),
        }
    }
}

impl<'a, N: TreeNode> Debug for Siblings<'a, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Siblings")
            .field("pending", &self.pending)
            .field("id", &self.id)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

impl<'a, N: TreeNode> Iterator for Siblings<'a, N> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(start) = self.pending.take() {
            return Some(start);
        }

        let id = self.id;
        let forest = self.forest;
        self.children.find(|&child| forest[child].id() != id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = usize::from(self.pending.is_some());
        (pending, Some(pending + self.children.len()))
    }
}

impl<'a, N: TreeNode> FusedIterator for Siblings<'a, N> {}
