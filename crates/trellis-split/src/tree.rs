//! The persistent split tree and its structural operations

use crate::{
    node::{Direction, Handle, Layout, Node, Split},
    view::View,
    TreeError,
};
use tracing::trace;

/// An immutable tree of split panes.
///
/// Every structural operation copies into a freshly allocated node array and
/// acquires one new reference per surviving leaf, so the receiver and every
/// earlier version remain valid and are released independently when dropped.
/// Index 0 is always the root.
#[derive(Debug)]
pub struct SplitTree<V: View> {
    nodes: Vec<Node<V>>,
}

impl<V: View> SplitTree<V> {
    /// The tree with no panes
    pub fn empty() -> Self {
        Self { nodes: Vec::new() }
    }

    /// A single-leaf tree holding a new reference to `view`
    pub fn init(view: &V) -> Result<Self, TreeError> {
        let mut tree = Self::with_capacity(1)?;
        tree.nodes.push(Node::Leaf(acquire(view)?));
        Ok(tree)
    }

    /// A single-leaf tree that takes over the reference `view` already holds
    pub fn new(view: V) -> Self {
        Self {
            nodes: vec![Node::Leaf(view)],
        }
    }

    /// Release every leaf's reference and free the node array.
    ///
    /// Equivalent to dropping the tree.
    pub fn deinit(self) {
        drop(self);
    }

    fn with_capacity(len: usize) -> Result<Self, TreeError> {
        if len > Handle::MAX_NODES {
            return Err(TreeError::TooManyNodes {
                requested: len,
                max: Handle::MAX_NODES,
            });
        }

        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(len)
            .map_err(|_| TreeError::OutOfMemory)?;
        Ok(Self { nodes })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes, leaves and splits together
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The node array, indexed by [`Handle::index`]
    pub fn nodes(&self) -> &[Node<V>] {
        &self.nodes
    }

    pub fn get(&self, handle: Handle) -> Option<&Node<V>> {
        self.nodes.get(handle.index())
    }

    /// The node at `handle`.
    ///
    /// # Panics
    ///
    /// If `handle` does not belong to this tree version.
    pub fn node(&self, handle: Handle) -> &Node<V> {
        self.check(handle);
        &self.nodes[handle.index()]
    }

    pub(crate) fn check(&self, handle: Handle) {
        assert!(
            handle.index() < self.nodes.len(),
            "handle {handle} out of range for a tree of {} nodes",
            self.nodes.len()
        );
    }

    /// Every leaf in array order
    pub fn iter(&self) -> Leaves<'_, V> {
        Leaves {
            nodes: &self.nodes,
            index: 0,
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.iter().count()
    }

    /// Handle of the leaf holding `view`, if any
    pub fn find(&self, view: &V) -> Option<Handle> {
        self.iter()
            .find(|(_, leaf)| leaf.same_view(view))
            .map(|(handle, _)| handle)
    }

    /// Handle of the split that directly contains `handle`
    pub fn parent(&self, handle: Handle) -> Option<Handle> {
        self.nodes.iter().enumerate().find_map(|(index, node)| match node {
            Node::Split(split) if split.left == handle || split.right == handle => {
                Some(Handle::new(index))
            }
            _ => None,
        })
    }

    /// Copy the tree, acquiring one more reference per leaf.
    ///
    /// If an acquire fails, the references already taken for the copy are
    /// released before the error is returned.
    pub fn try_clone(&self) -> Result<Self, TreeError> {
        let mut out = Self::with_capacity(self.nodes.len())?;
        for node in &self.nodes {
            out.nodes.push(copy_node(node, 0)?);
        }
        Ok(out)
    }

    /// Replace the node at `at` with a split between it and all of `other`.
    ///
    /// `direction` picks the layout and which side the existing subtree
    /// keeps: `Left`/`Up` leave it as the split's left child and `other`
    /// becomes the right child, `Right`/`Down` do the opposite. `ratio` is
    /// the share given to the left child.
    ///
    /// # Panics
    ///
    /// If `at` is not a handle of this tree or `ratio` is not strictly
    /// between 0 and 1.
    pub fn split(
        &self,
        at: Handle,
        direction: Direction,
        ratio: f32,
        other: &Self,
    ) -> Result<Self, TreeError> {
        assert!(
            ratio > 0.0 && ratio < 1.0,
            "split ratio {ratio} must be between 0 and 1"
        );
        if self.is_empty() {
            return other.try_clone();
        }
        self.check(at);
        if other.is_empty() {
            return self.try_clone();
        }

        // Layout: our nodes, then other's nodes shifted by `base`, then our
        // old node at `at` relocated to the last slot.
        let base = self.nodes.len();
        let len = base + other.nodes.len() + 1;
        let mut out = Self::with_capacity(len)?;

        let original = Handle::new(len - 1);
        let inserted = Handle::new(base);
        let (left, right) = match direction {
            Direction::Left | Direction::Up => (original, inserted),
            Direction::Right | Direction::Down => (inserted, original),
        };

        for (index, node) in self.nodes.iter().enumerate() {
            if index == at.index() {
                out.nodes.push(Node::Split(Split {
                    layout: direction.layout(),
                    ratio,
                    left,
                    right,
                }));
            } else {
                out.nodes.push(copy_node(node, 0)?);
            }
        }
        for node in &other.nodes {
            out.nodes.push(copy_node(node, base)?);
        }
        out.nodes.push(copy_node(&self.nodes[at.index()], 0)?);

        trace!(at = at.index(), ?direction, nodes = len, "split tree");
        Ok(out)
    }

    /// Remove the subtree at `at`.
    ///
    /// The removed node's sibling takes the place of their parent split, and
    /// the surviving nodes are renumbered densely from the root. Removing
    /// the root yields the empty tree.
    ///
    /// # Panics
    ///
    /// If `at` is not a handle of this tree.
    pub fn remove(&self, at: Handle) -> Result<Self, TreeError> {
        self.check(at);
        if at == Handle::ROOT {
            return Ok(Self::empty());
        }

        let parent = self
            .parent(at)
            .unwrap_or_else(|| panic!("node {at} is not the root but has no parent"));
        let sibling = match &self.nodes[parent.index()] {
            Node::Split(split) if split.left == at => split.right,
            Node::Split(split) => split.left,
            Node::Leaf(_) => unreachable!("parent lookup only returns splits"),
        };

        let len = self.nodes.len() - self.subtree_len(at) - 1;
        let mut out = Self::with_capacity(len)?;
        self.copy_replacing(Handle::ROOT, parent, sibling, &mut out)?;
        debug_assert_eq!(out.nodes.len(), len);

        trace!(at = at.index(), nodes = len, "removed from tree");
        Ok(out)
    }

    fn subtree_len(&self, handle: Handle) -> usize {
        match &self.nodes[handle.index()] {
            Node::Leaf(_) => 1,
            Node::Split(split) => 1 + self.subtree_len(split.left) + self.subtree_len(split.right),
        }
    }

    /// Pre-order copy of the subtree at `current` into `out`, substituting
    /// `replacement` wherever `skip` is reached.
    fn copy_replacing(
        &self,
        current: Handle,
        skip: Handle,
        replacement: Handle,
        out: &mut Self,
    ) -> Result<Handle, TreeError> {
        let current = if current == skip { replacement } else { current };
        let handle = Handle::new(out.nodes.len());

        match &self.nodes[current.index()] {
            Node::Leaf(view) => out.nodes.push(Node::Leaf(acquire(view)?)),
            Node::Split(split) => {
                out.nodes.push(Node::Split(*split));
                let left = self.copy_replacing(split.left, skip, replacement, out)?;
                let right = self.copy_replacing(split.right, skip, replacement, out)?;
                out.nodes[handle.index()] = Node::Split(Split {
                    left,
                    right,
                    ..*split
                });
            }
        }

        Ok(handle)
    }

    /// A copy whose split ratios give every pane along a run of same-axis
    /// splits an equal share.
    pub fn equalize(&self) -> Result<Self, TreeError> {
        let mut out = self.try_clone()?;
        if !out.is_empty() {
            out.equalize_from(Handle::ROOT);
        }
        Ok(out)
    }

    fn equalize_from(&mut self, handle: Handle) {
        let Node::Split(split) = self.nodes[handle.index()] else {
            return;
        };

        self.equalize_from(split.left);
        self.equalize_from(split.right);

        let left = self.weight(split.left, split.layout) as f32;
        let right = self.weight(split.right, split.layout) as f32;
        if let Node::Split(node) = &mut self.nodes[handle.index()] {
            node.ratio = left / (left + right);
        }
    }

    /// Leaves reachable through splits along `layout`; a split on the other
    /// axis counts as a single unit.
    fn weight(&self, handle: Handle, layout: Layout) -> usize {
        match &self.nodes[handle.index()] {
            Node::Split(split) if split.layout == layout => {
                self.weight(split.left, layout) + self.weight(split.right, layout)
            }
            _ => 1,
        }
    }

    /// Change one split's ratio without building a new version.
    ///
    /// Meant for live interactive resizing. Only this tree value changes;
    /// other versions own separate node arrays.
    ///
    /// # Panics
    ///
    /// If `at` is not a split of this tree or `ratio` is not strictly
    /// between 0 and 1.
    pub fn resize_in_place(&mut self, at: Handle, ratio: f32) {
        self.check(at);
        assert!(
            ratio > 0.0 && ratio < 1.0,
            "split ratio {ratio} must be between 0 and 1"
        );
        match &mut self.nodes[at.index()] {
            Node::Split(split) => split.ratio = ratio,
            Node::Leaf(_) => panic!("node {at} is a leaf and has no ratio"),
        }
    }
}

impl<V: View> Drop for SplitTree<V> {
    fn drop(&mut self) {
        for node in self.nodes.drain(..) {
            if let Node::Leaf(view) = node {
                view.release();
            }
        }
    }
}

impl<V: View> Default for SplitTree<V> {
    fn default() -> Self {
        Self::empty()
    }
}

fn acquire<V: View>(view: &V) -> Result<V, TreeError> {
    view.acquire().map_err(|e| TreeError::Acquire(Box::new(e)))
}

fn copy_node<V: View>(node: &Node<V>, offset: usize) -> Result<Node<V>, TreeError> {
    match node {
        Node::Leaf(view) => Ok(Node::Leaf(acquire(view)?)),
        Node::Split(split) => Ok(Node::Split(Split {
            left: split.left.offset(offset),
            right: split.right.offset(offset),
            ..*split
        })),
    }
}

/// Lazy iterator over `(handle, view)` for every leaf in array order.
///
/// Call [`SplitTree::iter`] again to restart.
pub struct Leaves<'a, V> {
    nodes: &'a [Node<V>],
    index: usize,
}

impl<'a, V> Iterator for Leaves<'a, V> {
    type Item = (Handle, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.nodes.len() {
            let index = self.index;
            self.index += 1;
            if let Node::Leaf(view) = &self.nodes[index] {
                return Some((Handle::new(index), view));
            }
        }
        None
    }
}

impl<'a, V: View> IntoIterator for &'a SplitTree<V> {
    type Item = (Handle, &'a V);
    type IntoIter = Leaves<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
