//! Folding tmux window layouts into split trees
//!
//! tmux splits a rectangle into any number of children along one axis. A
//! split tree only knows binary splits, so `a, b, c` becomes `a | (b | c)`
//! where every ratio is the first child's share of what is left.

use std::fmt;
use std::rc::Rc;

use anyhow::{Context, Result};
use trellis_split::{Direction, Handle, Side, SplitTree, TreeError};
use trellis_tmux::{Content, Layout};

use crate::cli::LayoutArgs;

/// A tmux pane as a split-tree leaf
#[derive(Debug, PartialEq, Eq)]
pub struct Pane {
    pub id: usize,
}

impl fmt::Display for Pane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.id)
    }
}

pub type PaneRef = Rc<Pane>;

/// Build the split tree describing `layout`
pub fn from_layout(layout: &Layout) -> Result<SplitTree<PaneRef>, TreeError> {
    match &layout.content {
        Content::Pane(id) => Ok(SplitTree::new(Rc::new(Pane { id: *id }))),
        Content::Horizontal(children) => fold(children, Direction::Left, |l| l.width),
        Content::Vertical(children) => fold(children, Direction::Up, |l| l.height),
    }
}

fn fold(
    children: &[Layout],
    direction: Direction,
    extent: fn(&Layout) -> usize,
) -> Result<SplitTree<PaneRef>, TreeError> {
    let Some((last, rest)) = children.split_last() else {
        return Ok(SplitTree::empty());
    };

    // Zero-sized panes still get a cell so shares never collapse toward zero
    let extent = |layout: &Layout| extent(layout).max(1);

    let mut tree = from_layout(last)?;
    let mut remaining = extent(last);
    for child in rest.iter().rev() {
        let size = extent(child);
        remaining += size;
        tree = from_layout(child)?.split(Handle::ROOT, direction, share(size, remaining), &tree)?;
    }
    Ok(tree)
}

/// `size / total`, kept strictly inside (0, 1)
fn share(size: usize, total: usize) -> f32 {
    (size as f32 / total as f32).clamp(f32::EPSILON, 1.0 - f32::EPSILON)
}

/// Pane ids in in-order: left to right, top to bottom
pub fn pane_order(tree: &SplitTree<PaneRef>) -> Vec<usize> {
    let mut out = Vec::new();
    if tree.is_empty() {
        return out;
    }

    let mut at = Some(tree.deepest(Side::Left, Handle::ROOT));
    while let Some(handle) = at {
        if let Some(pane) = tree.node(handle).as_leaf() {
            out.push(pane.id);
        }
        at = tree.next(handle);
    }
    out
}

/// `trellis layout`: print the diagram and pane order of a layout string
pub fn run(args: &LayoutArgs) -> Result<()> {
    let layout = if args.checksum {
        Layout::parse_with_checksum(&args.layout)
    } else {
        Layout::parse(&args.layout)
    }
    .with_context(|| format!("Invalid layout {:?}", args.layout))?;

    let tree = from_layout(&layout)?;
    print!("{tree}");
    let order: Vec<String> = pane_order(&tree).iter().map(|id| format!("%{id}")).collect();
    println!("panes: {}", order.join(" "));
    Ok(())
}
