//! Command-line interface for the trellis binary

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use trellis_terminal::DEFAULT_SCROLLBACK;
use trellis_tmux::ViewerConfig;

use crate::{attach, layout_tree, replay};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Trellis - mirror tmux sessions over control mode")]
pub struct Args {
    /// Log level
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Attach to a running tmux server and mirror its panes
    Attach(AttachArgs),
    /// Feed a recorded control-mode transcript through the viewer
    Replay(ReplayArgs),
    /// Draw a tmux layout string as a split-tree diagram
    Layout(LayoutArgs),
}

/// Options shared by everything that runs a viewer
#[derive(clap::Args, Debug, Clone)]
pub struct ViewerArgs {
    /// History rows kept per pane
    #[arg(long, default_value_t = DEFAULT_SCROLLBACK)]
    pub scrollback: usize,

    /// Skip capturing each pane's alternate screen
    #[arg(long)]
    pub no_alternate: bool,
}

impl ViewerArgs {
    pub fn config(&self) -> ViewerConfig {
        ViewerConfig {
            max_scrollback: self.scrollback,
            capture_alternate: !self.no_alternate,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct AttachArgs {
    /// Session to attach to
    #[arg(short = 't', long)]
    pub target: Option<String>,

    /// tmux executable
    #[arg(long, default_value = "tmux")]
    pub tmux: PathBuf,

    /// tmux server socket name
    #[arg(short = 'L', long)]
    pub socket: Option<String>,

    #[command(flatten)]
    pub viewer: ViewerArgs,
}

#[derive(clap::Args, Debug)]
pub struct ReplayArgs {
    /// Transcript of `tmux -C` output
    pub file: PathBuf,

    /// Print every pane's screen once the transcript is consumed
    #[arg(long)]
    pub screens: bool,

    #[command(flatten)]
    pub viewer: ViewerArgs,
}

#[derive(clap::Args, Debug)]
pub struct LayoutArgs {
    /// Layout body, or `cccc,body` with --checksum
    pub layout: String,

    /// Verify the leading checksum
    #[arg(long)]
    pub checksum: bool,
}

pub async fn run() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(args.log_level))
        .with_writer(io::stderr)
        .init();

    match args.command {
        Commands::Attach(attach) => attach::run(&attach).await,
        Commands::Replay(replay) => replay::run(&replay),
        Commands::Layout(layout) => layout_tree::run(&layout),
    }
}
