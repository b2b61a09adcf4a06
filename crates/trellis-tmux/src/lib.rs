//! tmux control-mode client core for Trellis
//!
//! Decodes the `tmux -C` byte stream into notifications, parses window
//! layouts and `-F` formatted output, and mirrors every pane of the attached
//! session into a local terminal emulator through the [`Viewer`] state
//! machine. Nothing in this crate performs I/O: the caller feeds bytes in
//! and carries out the returned actions.

pub mod control;
pub mod layout;
pub mod output;
pub mod viewer;

pub use control::{ControlDecoder, ControlError, Notification};
pub use layout::{checksum, Content, Layout, LayoutError};
pub use output::{FormatError, FormatStruct, Variable, WindowRecord};
pub use viewer::{Action, Command, PaneTerminal, State, Viewer, ViewerConfig, Window};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TmuxError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Protocol error: {0}")]
    Protocol(String),
}
