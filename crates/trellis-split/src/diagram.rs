//! ASCII diagrams of split trees, for debugging and golden tests
//!
//! Every leaf is drawn as its own `+`, `-`, `|` box. The smallest leaf gets
//! one unit cell, `label + 4` columns by 3 rows, and everything else is
//! scaled from its spatial slot so that neighbouring boxes abut exactly.

use std::fmt;

use crate::{
    node::Handle,
    spatial::Slot,
    tree::SplitTree,
    view::View,
};

const UNIT_HEIGHT: usize = 3;

/// Grid bounds. Leaves too thin to box at this size are left out.
pub const MAX_COLUMNS: usize = 400;
pub const MAX_ROWS: usize = 200;

impl<V: View> SplitTree<V> {
    /// Leaf labels, falling back to the handle index
    fn labels(&self) -> Vec<(Handle, String)> {
        self.iter()
            .map(|(handle, view)| (handle, view.label().unwrap_or_else(|| handle.to_string())))
            .collect()
    }

    /// Render the diagram as rows of characters
    pub fn diagram(&self) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }

        let spatial = self.spatial();
        let labels = self.labels();
        let unit_width = labels
            .iter()
            .map(|(_, label)| label.chars().count())
            .max()
            .unwrap_or(1)
            + 4;

        let root = spatial.slot(Handle::ROOT);
        let leaf_slots: Vec<Slot> = labels.iter().map(|(h, _)| spatial.slot(*h)).collect();
        let min_width = leaf_slots
            .iter()
            .map(|s| s.width)
            .fold(f32::INFINITY, f32::min)
            .max(root.max_x() * unit_width as f32 / MAX_COLUMNS as f32);
        let min_height = leaf_slots
            .iter()
            .map(|s| s.height)
            .fold(f32::INFINITY, f32::min)
            .max(root.max_y() * UNIT_HEIGHT as f32 / MAX_ROWS as f32);
        let scale_x = |v: f32| (v / min_width * unit_width as f32).round() as usize;
        let scale_y = |v: f32| (v / min_height * UNIT_HEIGHT as f32).round() as usize;

        let columns = scale_x(root.max_x()).min(MAX_COLUMNS);
        let rows = scale_y(root.max_y()).min(MAX_ROWS);
        let mut grid = vec![vec![' '; columns]; rows];

        for ((_, label), slot) in labels.iter().zip(&leaf_slots) {
            let x0 = scale_x(slot.x);
            let y0 = scale_y(slot.y);
            let x1 = scale_x(slot.max_x()).min(columns);
            let y1 = scale_y(slot.max_y()).min(rows);
            if x1 < x0 + 2 || y1 < y0 + 2 {
                continue;
            }
            draw_box(&mut grid, x0, y0, x1 - 1, y1 - 1, label);
        }

        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }
}

fn draw_box(grid: &mut [Vec<char>], left: usize, top: usize, right: usize, bottom: usize, label: &str) {
    for x in left..=right {
        grid[top][x] = '-';
        grid[bottom][x] = '-';
    }
    for row in grid.iter_mut().take(bottom + 1).skip(top) {
        row[left] = '|';
        row[right] = '|';
    }
    for (x, y) in [(left, top), (right, top), (left, bottom), (right, bottom)] {
        grid[y][x] = '+';
    }

    let inner = right - left - 1;
    let len = label.chars().count();
    if len > inner {
        return;
    }
    let row = top + (bottom - top) / 2;
    let start = left + 1 + (inner - len) / 2;
    for (offset, c) in label.chars().enumerate() {
        grid[row][start + offset] = c;
    }
}

impl<V: View> fmt::Display for SplitTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.diagram() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
