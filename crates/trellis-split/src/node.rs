//! Node and handle types shared by every split tree version

use std::fmt;

/// Index of a node within one tree version.
///
/// A handle is not stable across structural edits: the same index may name
/// a different subtree in the tree returned by `split` or `remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u16);

impl Handle {
    /// The root of every non-empty tree
    pub const ROOT: Handle = Handle(0);

    /// Number of nodes a handle can address
    pub const MAX_NODES: usize = u16::MAX as usize + 1;

    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index < Self::MAX_NODES, "handle {index} out of range");
        Handle(index as u16)
    }

    /// Position of the node in its tree's node array
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn offset(self, by: usize) -> Self {
        Self::new(self.index() + by)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Axis along which a split divides its space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Children side by side, left and right
    Horizontal,
    /// Children stacked, left on top
    Vertical,
}

/// An internal node dividing its space between two children
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    pub layout: Layout,
    /// Share of the space given to `left`, strictly between 0 and 1
    pub ratio: f32,
    pub left: Handle,
    pub right: Handle,
}

/// A node in a split tree
#[derive(Debug)]
pub enum Node<V> {
    Leaf(V),
    Split(Split),
}

impl<V> Node<V> {
    pub fn as_leaf(&self) -> Option<&V> {
        match self {
            Node::Leaf(view) => Some(view),
            Node::Split(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&Split> {
        match self {
            Node::Leaf(_) => None,
            Node::Split(split) => Some(split),
        }
    }
}

/// Compass direction used by `split` and spatial navigation.
///
/// For `split` it names the side of the new split node that the existing
/// subtree keeps: `Left` and `Up` keep it first, `Right` and `Down` move the
/// inserted tree first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Split layout produced by splitting in this direction
    pub fn layout(self) -> Layout {
        match self {
            Direction::Left | Direction::Right => Layout::Horizontal,
            Direction::Up | Direction::Down => Layout::Vertical,
        }
    }
}

/// Which child of a split to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}
