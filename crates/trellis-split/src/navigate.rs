//! In-order and spatial navigation between leaves

use crate::{
    node::{Direction, Handle, Node, Side},
    tree::SplitTree,
    view::View,
};

/// Where to move focus from a given node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Goto {
    /// The in-order predecessor, none at the first leaf
    Previous,
    /// The in-order successor, none at the last leaf
    Next,
    /// Like `Previous`, wrapping around to the last leaf
    PreviousWrapped,
    /// Like `Next`, wrapping around to the first leaf
    NextWrapped,
    /// The nearest leaf lying entirely on one side
    Spatial(Direction),
}

/// Outcome of one frame of the backtracking search
enum Backtrack {
    /// The neighbor has been found
    Found(Handle),
    /// The target was reached but nothing lies beyond it in this subtree
    Backtrack,
    /// The target is not in this subtree
    Deadend,
}

impl<V: View> SplitTree<V> {
    /// Descend from `from` always taking `side` until a leaf is reached
    pub fn deepest(&self, side: Side, from: Handle) -> Handle {
        let mut current = from;
        loop {
            match self.node(current) {
                Node::Leaf(_) => return current,
                Node::Split(split) => {
                    current = match side {
                        Side::Left => split.left,
                        Side::Right => split.right,
                    }
                }
            }
        }
    }

    /// The leaf visited just before `from` in an in-order walk
    pub fn previous(&self, from: Handle) -> Option<Handle> {
        if self.is_empty() {
            return None;
        }
        self.check(from);
        match self.previous_backtrack(from, Handle::ROOT) {
            Backtrack::Found(handle) => Some(handle),
            Backtrack::Backtrack | Backtrack::Deadend => None,
        }
    }

    /// The leaf visited just after `from` in an in-order walk
    pub fn next(&self, from: Handle) -> Option<Handle> {
        if self.is_empty() {
            return None;
        }
        self.check(from);
        match self.next_backtrack(from, Handle::ROOT) {
            Backtrack::Found(handle) => Some(handle),
            Backtrack::Backtrack | Backtrack::Deadend => None,
        }
    }

    /// `previous`, falling back to the last leaf
    pub fn previous_wrapped(&self, from: Handle) -> Option<Handle> {
        if self.is_empty() {
            return None;
        }
        self.previous(from)
            .or_else(|| Some(self.deepest(Side::Right, Handle::ROOT)))
    }

    /// `next`, falling back to the first leaf
    pub fn next_wrapped(&self, from: Handle) -> Option<Handle> {
        if self.is_empty() {
            return None;
        }
        self.next(from)
            .or_else(|| Some(self.deepest(Side::Left, Handle::ROOT)))
    }

    /// Resolve a navigation request starting at `from`
    pub fn goto(&self, from: Handle, to: Goto) -> Option<Handle> {
        match to {
            Goto::Previous => self.previous(from),
            Goto::Next => self.next(from),
            Goto::PreviousWrapped => self.previous_wrapped(from),
            Goto::NextWrapped => self.next_wrapped(from),
            Goto::Spatial(direction) => self.nearest(from, direction),
        }
    }

    fn previous_backtrack(&self, from: Handle, current: Handle) -> Backtrack {
        if current == from {
            return Backtrack::Backtrack;
        }

        let Node::Split(split) = self.node(current) else {
            return Backtrack::Deadend;
        };

        match self.previous_backtrack(from, split.left) {
            Backtrack::Found(handle) => Backtrack::Found(handle),
            // Nothing further left at this level either
            Backtrack::Backtrack => Backtrack::Backtrack,
            Backtrack::Deadend => match self.previous_backtrack(from, split.right) {
                Backtrack::Found(handle) => Backtrack::Found(handle),
                Backtrack::Backtrack => {
                    Backtrack::Found(self.deepest(Side::Right, split.left))
                }
                Backtrack::Deadend => Backtrack::Deadend,
            },
        }
    }

    fn next_backtrack(&self, from: Handle, current: Handle) -> Backtrack {
        if current == from {
            return Backtrack::Backtrack;
        }

        let Node::Split(split) = self.node(current) else {
            return Backtrack::Deadend;
        };

        match self.next_backtrack(from, split.right) {
            Backtrack::Found(handle) => Backtrack::Found(handle),
            Backtrack::Backtrack => Backtrack::Backtrack,
            Backtrack::Deadend => match self.next_backtrack(from, split.left) {
                Backtrack::Found(handle) => Backtrack::Found(handle),
                Backtrack::Backtrack => Backtrack::Found(self.deepest(Side::Left, split.right)),
                Backtrack::Deadend => Backtrack::Deadend,
            },
        }
    }
}
