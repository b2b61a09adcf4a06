//! Spatial projection of a split tree onto a normalized grid
//!
//! Each leaf occupies at least one unit in each dimension. A horizontal
//! split is as wide as its children combined and as tall as the taller one;
//! a vertical split is the transpose. The root slot spans that whole extent
//! and every split carves its slot between its children by ratio.

use crate::{
    node::{Direction, Handle, Layout, Node},
    tree::SplitTree,
    view::View,
};

/// Edges closer than this are treated as touching
const EDGE_EPSILON: f32 = 1e-4;

/// Rectangle assigned to one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Slot {
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `self` lies entirely on the `direction` side of `from`
    pub fn is_beyond(&self, from: &Slot, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.max_x() <= from.x + EDGE_EPSILON,
            Direction::Right => self.x + EDGE_EPSILON >= from.max_x(),
            Direction::Up => self.max_y() <= from.y + EDGE_EPSILON,
            Direction::Down => self.y + EDGE_EPSILON >= from.max_y(),
        }
    }

    fn distance(&self, other: &Slot) -> f32 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }
}

/// Slots for every node of one tree version, indexed by handle
#[derive(Debug, Clone, PartialEq)]
pub struct Spatial {
    slots: Vec<Slot>,
}

impl Spatial {
    pub fn slot(&self, handle: Handle) -> Slot {
        self.slots[handle.index()]
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

impl<V: View> SplitTree<V> {
    /// Project every node onto a grid where the smallest leaf is 1x1
    pub fn spatial(&self) -> Spatial {
        let zero = Slot {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        };
        let mut slots = vec![zero; self.len()];
        if self.is_empty() {
            return Spatial { slots };
        }

        let (width, height) = self.dimensions(Handle::ROOT);
        self.fill_slots(
            Handle::ROOT,
            Slot {
                x: 0.0,
                y: 0.0,
                width,
                height,
            },
            &mut slots,
        );
        Spatial { slots }
    }

    /// Logical size of a subtree in leaf units
    fn dimensions(&self, handle: Handle) -> (f32, f32) {
        match self.node(handle) {
            Node::Leaf(_) => (1.0, 1.0),
            Node::Split(split) => {
                let (lw, lh) = self.dimensions(split.left);
                let (rw, rh) = self.dimensions(split.right);
                match split.layout {
                    Layout::Horizontal => (lw + rw, lh.max(rh)),
                    Layout::Vertical => (lw.max(rw), lh + rh),
                }
            }
        }
    }

    fn fill_slots(&self, handle: Handle, slot: Slot, slots: &mut [Slot]) {
        slots[handle.index()] = slot;

        let Node::Split(split) = self.node(handle) else {
            return;
        };

        let (left, right) = match split.layout {
            Layout::Horizontal => {
                let width = slot.width * split.ratio;
                (
                    Slot { width, ..slot },
                    Slot {
                        x: slot.x + width,
                        width: slot.width - width,
                        ..slot
                    },
                )
            }
            Layout::Vertical => {
                let height = slot.height * split.ratio;
                (
                    Slot { height, ..slot },
                    Slot {
                        y: slot.y + height,
                        height: slot.height - height,
                        ..slot
                    },
                )
            }
        };

        self.fill_slots(split.left, left, slots);
        self.fill_slots(split.right, right, slots);
    }

    /// The leaf lying wholly on the `direction` side of `from` whose center
    /// is closest to `from`'s center.
    ///
    /// Ties go to the candidate earliest in array order.
    pub fn nearest(&self, from: Handle, direction: Direction) -> Option<Handle> {
        if self.is_empty() {
            return None;
        }
        self.check(from);

        let spatial = self.spatial();
        let origin = spatial.slot(from);

        let mut best: Option<(Handle, f32)> = None;
        for (handle, _) in self.iter() {
            if handle == from {
                continue;
            }
            let candidate = spatial.slot(handle);
            if !candidate.is_beyond(&origin, direction) {
                continue;
            }

            let distance = candidate.distance(&origin);
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((handle, distance));
            }
        }

        best.map(|(handle, _)| handle)
    }
}
