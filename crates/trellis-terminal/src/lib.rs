//! Terminal emulation for Trellis
//!
//! Provides the VT100/xterm compatible emulator that backs each tmux pane:
//! a primary screen with scrollback, an alternate screen, and the cursor and
//! erase primitives used when replaying captured pane content.

pub mod display;
pub mod emulator;
pub mod framebuffer;
pub mod parser;

pub use display::{render_row_ansi, render_screen_ansi};
pub use emulator::{ScreenKey, Terminal};
pub use framebuffer::{Attributes, Cell, Color, EraseDisplay, FrameBuffer, DEFAULT_SCROLLBACK};
pub use parser::{Event, Parser};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("Terminal size error: {0}")]
    SizeError(String),
}
