//! Live mirroring of a tmux server through `tmux -C`

use std::process::Stdio;

use anyhow::{Context, Result};
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, info, warn};
use trellis_tmux::{Action, Command as TmuxCommand, ControlDecoder, Notification, State, Viewer};

use crate::cli::AttachArgs;
use crate::replay::next_notification;
use crate::report::describe;

const READ_CHUNK: usize = 64 * 1024;

fn tmux_command(args: &AttachArgs) -> Command {
    let mut command = Command::new(&args.tmux);
    if let Some(socket) = &args.socket {
        command.arg("-L").arg(socket);
    }
    command.arg("-C").arg("attach-session");
    if let Some(target) = &args.target {
        command.arg("-t").arg(target);
    }
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);
    command
}

/// Carry out viewer actions; true once the viewer asked to exit
async fn dispatch<W: AsyncWrite + Unpin>(actions: Vec<Action>, stdin: &mut W) -> Result<bool> {
    let mut exit = false;
    for action in actions {
        if let Action::Command(text) = &action {
            debug!(command = text.trim_end(), "sending");
            stdin.write_all(text.as_bytes()).await?;
        }
        if action == Action::Exit {
            exit = true;
        }
        print!("{}", describe(&action)?);
    }
    stdin.flush().await?;
    Ok(exit)
}

/// `trellis attach`
pub async fn run(args: &AttachArgs) -> Result<()> {
    let mut child = tmux_command(args)
        .spawn()
        .with_context(|| format!("Failed to spawn {}", args.tmux.display()))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| anyhow::anyhow!("Failed to get stdin from tmux"))?;
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow::anyhow!("Failed to get stdout from tmux"))?;

    let mut viewer: Viewer = Viewer::with_config(args.viewer.config());
    let mut decoder = ControlDecoder::new();
    let mut buf = BytesMut::with_capacity(READ_CHUNK);
    let mut exited = false;
    let mut detaching = false;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    'session: loop {
        while let Some(notification) = next_notification(&mut decoder, &mut buf)? {
            let relist = matches!(
                notification,
                Notification::LayoutChange { .. } | Notification::WindowAdd { .. }
            );
            if matches!(notification, Notification::Exit { .. }) {
                exited = true;
            }

            let mut actions = viewer.next(notification);
            if relist && !viewer.pending_commands().any(|c| *c == TmuxCommand::ListWindows) {
                actions.extend(viewer.refresh_windows());
            }
            if dispatch(actions, &mut stdin).await? {
                break 'session;
            }
        }

        buf.reserve(READ_CHUNK);
        tokio::select! {
            read = stdout.read_buf(&mut buf) => {
                if read.context("Failed to read from tmux")? == 0 {
                    info!("tmux closed its output");
                    break;
                }
            }
            signal = &mut ctrl_c, if !detaching => {
                signal?;
                info!("detaching");
                detaching = true;
                let actions = viewer.queue_command("detach-client")?;
                dispatch(actions, &mut stdin).await?;
            }
        }
    }

    drop(stdin);
    let status = child.wait().await.context("Failed to wait for tmux")?;
    debug!(%status, "tmux exited");

    if viewer.state() == State::Defunct && !exited {
        anyhow::bail!("Viewer stopped on a protocol error");
    }
    if !exited {
        warn!("tmux went away without %exit");
    }
    Ok(())
}
