pub mod fixtures;
pub mod terminal;

pub use fixtures::{Transcript, TestFixtures};
pub use terminal::TerminalComparator;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("trellis=debug,trellis_tmux=debug,trellis_split=debug")
            }))
            .with_test_writer()
            .init();
    });
}
