//! Offline replay of recorded control-mode transcripts

use std::io::{self, Write};

use anyhow::{Context, Result};
use bytes::BytesMut;
use tracing::{debug, warn};
use trellis_terminal::render_screen_ansi;
use trellis_tmux::{ControlDecoder, ControlError, Notification, State, Viewer, ViewerConfig};

use crate::cli::ReplayArgs;
use crate::report::describe;

/// Outcome of feeding a whole transcript through a viewer
pub struct Replay {
    pub viewer: Viewer,
    /// tmux announced `%exit` itself
    pub exited: bool,
    /// Bytes after the last complete line
    pub trailing: usize,
}

/// Next notification from `buf`, skipping lines tmux got wrong.
///
/// A malformed line has already been consumed and leaves the decoder usable;
/// only framing failures end the stream.
pub(crate) fn next_notification(
    decoder: &mut ControlDecoder,
    buf: &mut BytesMut,
) -> Result<Option<Notification>> {
    loop {
        match decoder.decode(buf) {
            Err(ControlError::Malformed { line, reason }) => {
                warn!(line = %line, reason, "skipping malformed control-mode line");
            }
            result => return Ok(result?),
        }
    }
}

/// Decode `data` and drive a fresh viewer, writing every action to `out`
pub fn replay(data: &[u8], config: ViewerConfig, out: &mut impl Write) -> Result<Replay> {
    let mut decoder = ControlDecoder::new();
    let mut viewer: Viewer = Viewer::with_config(config);
    let mut buf = BytesMut::from(data);
    let mut exited = false;

    while let Some(notification) = next_notification(&mut decoder, &mut buf)? {
        if matches!(notification, Notification::Exit { .. }) {
            exited = true;
        }
        for action in viewer.next(notification) {
            out.write_all(describe(&action)?.as_bytes())?;
        }
    }

    if !buf.is_empty() {
        warn!(bytes = buf.len(), "transcript ends inside a line");
    }
    debug!(state = ?viewer.state(), exited, "replay finished");

    Ok(Replay {
        viewer,
        exited,
        trailing: buf.len(),
    })
}

/// `trellis replay`
pub fn run(args: &ReplayArgs) -> Result<()> {
    let data = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = replay(&data, args.viewer.config(), &mut out)?;

    if args.screens {
        for id in result.viewer.pane_ids() {
            if let Some(terminal) = result.viewer.pane(id) {
                writeln!(out, "pane %{id}")?;
                for row in render_screen_ansi(terminal.framebuffer()) {
                    writeln!(out, "{row}")?;
                }
            }
        }
    }
    out.flush()?;

    if result.viewer.state() == State::Defunct && !result.exited {
        anyhow::bail!("Viewer stopped on a protocol error");
    }
    Ok(())
}
