//! Trellis: mirror tmux sessions over control mode
//!
//! The binary wires the control-mode decoder and viewer from `trellis-tmux`
//! to a live `tmux -C` process or to a recorded transcript, and draws each
//! window's layout with `trellis-split`.

pub mod attach;
pub mod cli;
pub mod layout_tree;
pub mod replay;
pub mod report;

pub use layout_tree::{from_layout, pane_order, Pane, PaneRef};
