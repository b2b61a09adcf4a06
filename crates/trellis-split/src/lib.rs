//! Persistent split trees for Trellis
//!
//! A [`SplitTree`] describes a window recursively divided into panes. Every
//! structural edit returns a new tree and leaves the receiver untouched, so
//! older versions stay valid for undo/redo or for a renderer still holding
//! them. Nodes live in one flat array per version and refer to each other by
//! [`Handle`], a small index that is only meaningful within the version that
//! produced it.

pub mod diagram;
pub mod navigate;
pub mod node;
pub mod spatial;
pub mod tree;
pub mod view;

pub use navigate::Goto;
pub use node::{Direction, Handle, Layout, Node, Side, Split};
pub use spatial::{Slot, Spatial};
pub use tree::{Leaves, SplitTree};
pub use view::View;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Out of memory allocating split tree nodes")]
    OutOfMemory,

    #[error("Split tree would need {requested} nodes, at most {max} are addressable")]
    TooManyNodes { requested: usize, max: usize },

    #[error("Failed to acquire view: {0}")]
    Acquire(#[source] Box<dyn std::error::Error + Send + Sync>),
}
