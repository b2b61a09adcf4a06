//! Human-readable rendering of viewer actions

use std::fmt::Write;

use anyhow::Result;
use trellis_tmux::{Action, Window};

use crate::layout_tree::{from_layout, pane_order};

/// One printable block per action
pub fn describe(action: &Action) -> Result<String> {
    let mut out = String::new();
    match action {
        Action::Exit => out.push_str("exit\n"),
        Action::Command(text) => writeln!(out, "> {}", text.trim_end())?,
        Action::Windows(windows) => {
            if windows.is_empty() {
                out.push_str("windows: none\n");
            }
            for window in windows {
                describe_window(window, &mut out)?;
            }
        }
        Action::CommandOutput { output, failed } => {
            let status = if *failed { "failed" } else { "ok" };
            writeln!(out, "command {status}")?;
            out.push_str(&String::from_utf8_lossy(output));
        }
    }
    Ok(out)
}

fn describe_window(window: &Window, out: &mut String) -> Result<()> {
    let tree = from_layout(&window.layout)?;
    let panes: Vec<String> = pane_order(&tree).iter().map(|id| format!("%{id}")).collect();
    writeln!(
        out,
        "window @{} {}x{}: {}",
        window.id,
        window.width,
        window.height,
        panes.join(" ")
    )?;
    write!(out, "{tree}")?;
    Ok(())
}
