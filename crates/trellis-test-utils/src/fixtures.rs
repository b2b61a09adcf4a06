use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestFixtures {
    temp_dir: TempDir,
}

impl TestFixtures {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn create_test_file(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let file_path = self.temp_dir.path().join(name);
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    /// Write a transcript so it can be replayed from disk
    pub fn create_transcript(&self, name: &str, transcript: &Transcript) -> Result<PathBuf> {
        self.create_test_file(name, transcript.as_bytes())
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

/// Builder for the byte stream `tmux -C` writes to stdout
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    bytes: Vec<u8>,
    commands: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `-CC` DCS introducer
    pub fn enter(mut self) -> Self {
        self.bytes.extend_from_slice(b"\x1bP1000p");
        self
    }

    /// A successful command reply; `content` lines are copied verbatim
    pub fn block(self, content: &str) -> Self {
        self.guarded(content, "%end")
    }

    /// A failed command reply
    pub fn error_block(self, content: &str) -> Self {
        self.guarded(content, "%error")
    }

    fn guarded(mut self, content: &str, end: &str) -> Self {
        self.commands += 1;
        let args = format!("1700000000 {} 1", self.commands);
        self.bytes.extend_from_slice(format!("%begin {args}\n").as_bytes());
        self.bytes.extend_from_slice(content.as_bytes());
        if !content.is_empty() && !content.ends_with('\n') {
            self.bytes.push(b'\n');
        }
        self.bytes.extend_from_slice(format!("{end} {args}\n").as_bytes());
        self
    }

    pub fn session_changed(self, id: usize, name: &str) -> Self {
        self.line(&format!("%session-changed ${id} {name}"))
    }

    /// Pane output, escaped the way tmux does
    pub fn output(mut self, pane: usize, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(format!("%output %{pane} ").as_bytes());
        for &b in data {
            if b < b' ' || b == b'\\' {
                self.bytes.extend_from_slice(format!("\\{b:03o}").as_bytes());
            } else {
                self.bytes.push(b);
            }
        }
        self.bytes.push(b'\n');
        self
    }

    pub fn exit(self) -> Self {
        self.line("%exit")
    }

    /// Any raw line, newline appended
    pub fn line(mut self, line: &str) -> Self {
        self.bytes.extend_from_slice(line.as_bytes());
        self.bytes.push(b'\n');
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

// Common test data
pub mod data {
    /// `list-windows` line for one window split into two stacked panes, 0 and 1
    pub const TWO_PANE_WINDOW: &str = "$0 @0 83 44 027b,83x44,0,0[83x20,0,0,0,83x23,0,21,1]";

    /// `list-windows` line for one window with the single pane 1
    pub const ONE_PANE_WINDOW: &str = "$1 @1 80 24 b25e,80x24,0,0,1";

    pub const ANSI_COLORS: &str = "\x1b[31mRed\x1b[0m \x1b[32mGreen\x1b[0m \x1b[34mBlue\x1b[0m";

    pub fn generate_text_lines(count: usize) -> String {
        (0..count)
            .map(|i| format!("Line {i}: The quick brown fox jumps over the lazy dog"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
