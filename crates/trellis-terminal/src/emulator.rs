//! Terminal emulator core implementation
//!
//! Owns a primary and an alternate screen and routes parsed input into
//! whichever one is active.

use crate::{
    framebuffer::{EraseDisplay, FrameBuffer, DEFAULT_SCROLLBACK},
    parser::{Event, Parser},
    TerminalError,
};

/// Identifies one of the two screens a terminal owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScreenKey {
    Primary,
    Alternate,
}

/// Terminal emulator
pub struct Terminal {
    /// The parser for escape sequences
    parser: Parser,

    /// Primary screen, the only one with scrollback
    primary: FrameBuffer,

    /// Alternate screen (for full-screen apps)
    alternate: FrameBuffer,

    /// Which screen receives input
    active: ScreenKey,

    /// Terminal title
    title: String,

    /// Saved primary cursor while the alternate screen is active
    saved_cursor: Option<(u16, u16)>,
}

impl Terminal {
    /// Create a new terminal with given dimensions
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_scrollback(width, height, DEFAULT_SCROLLBACK)
    }

    /// Create a new terminal keeping at most `max_scrollback` history rows
    pub fn with_scrollback(width: u16, height: u16, max_scrollback: usize) -> Self {
        Self {
            parser: Parser::new(),
            primary: FrameBuffer::with_scrollback(width, height, max_scrollback),
            alternate: FrameBuffer::with_scrollback(width, height, 0),
            active: ScreenKey::Primary,
            title: String::new(),
            saved_cursor: None,
        }
    }

    /// Process input bytes
    pub fn process(&mut self, data: &[u8]) {
        for &byte in data {
            let framebuffer = match self.active {
                ScreenKey::Primary => &mut self.primary,
                ScreenKey::Alternate => &mut self.alternate,
            };
            match self.parser.advance(framebuffer, byte) {
                Some(Event::AlternateScreen(true)) => self.enter_alternate_screen(),
                Some(Event::AlternateScreen(false)) => self.exit_alternate_screen(),
                Some(Event::Title(title)) => self.title = title,
                None => {}
            }
        }
    }

    /// Resize both screens
    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), TerminalError> {
        if width == 0 || height == 0 {
            return Err(TerminalError::SizeError(
                "Invalid terminal size".to_string(),
            ));
        }

        self.primary.resize(width, height);
        self.alternate.resize(width, height);

        Ok(())
    }

    /// Get current frame buffer
    pub fn framebuffer(&self) -> &FrameBuffer {
        self.screen(self.active)
    }

    fn framebuffer_mut(&mut self) -> &mut FrameBuffer {
        match self.active {
            ScreenKey::Primary => &mut self.primary,
            ScreenKey::Alternate => &mut self.alternate,
        }
    }

    /// Get a specific screen regardless of which one is active
    pub fn screen(&self, key: ScreenKey) -> &FrameBuffer {
        match key {
            ScreenKey::Primary => &self.primary,
            ScreenKey::Alternate => &self.alternate,
        }
    }

    /// Make `key` the active screen, returning the previously active one.
    ///
    /// Switching does not clear either screen, so content written to a
    /// screen while it was active is still there when it is reactivated.
    pub fn switch_screen(&mut self, key: ScreenKey) -> ScreenKey {
        std::mem::replace(&mut self.active, key)
    }

    /// Title from the most recent OSC 0 or 2
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Switch to a cleared alternate screen buffer
    pub fn enter_alternate_screen(&mut self) {
        if self.active == ScreenKey::Primary {
            self.saved_cursor = Some(self.primary.cursor_position());
            self.alternate.clear();
            self.switch_screen(ScreenKey::Alternate);
        }
    }

    /// Switch back to primary screen buffer
    pub fn exit_alternate_screen(&mut self) {
        if self.active == ScreenKey::Alternate {
            self.switch_screen(ScreenKey::Primary);

            // Restore cursor position
            if let Some((x, y)) = self.saved_cursor.take() {
                self.primary.set_cursor_position(x, y);
            }
        }
    }

    /// Get terminal dimensions
    pub fn dimensions(&self) -> (u16, u16) {
        (self.primary.width(), self.primary.height())
    }

    /// Move the cursor to column zero
    pub fn carriage_return(&mut self) {
        self.framebuffer_mut().carriage_return();
    }

    /// Line feed without carriage return, scrolling at the bottom margin
    pub fn index(&mut self) {
        self.framebuffer_mut().index();
    }

    /// Place the cursor at a 0-based row and column, clamped to the screen
    pub fn set_cursor_pos(&mut self, row: u16, col: u16) {
        self.framebuffer_mut().set_cursor_position(col, row);
    }

    /// Erase part of the active screen
    pub fn erase_display(&mut self, mode: EraseDisplay, protected: bool) {
        self.framebuffer_mut().erase_display(mode, protected);
    }

    /// Text of the active screen
    pub fn screen_text(&self) -> String {
        self.framebuffer().screen_text()
    }

    /// Text of the primary screen's scrollback
    pub fn scrollback_text(&self) -> String {
        self.primary.scrollback_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_screen_returns_previous() {
        let mut term = Terminal::new(10, 3);
        assert_eq!(term.switch_screen(ScreenKey::Alternate), ScreenKey::Primary);
        assert_eq!(term.switch_screen(ScreenKey::Alternate), ScreenKey::Alternate);
        assert_eq!(term.switch_screen(ScreenKey::Primary), ScreenKey::Alternate);
    }

    #[test]
    fn test_screens_keep_content_independently() {
        let mut term = Terminal::new(10, 3);
        term.process(b"main");
        term.switch_screen(ScreenKey::Alternate);
        term.process(b"alt");

        assert_eq!(term.screen_text(), "alt");
        assert_eq!(term.screen(ScreenKey::Primary).screen_text(), "main");

        term.switch_screen(ScreenKey::Primary);
        assert_eq!(term.screen_text(), "main");
    }

    #[test]
    fn test_alternate_screen_has_no_scrollback() {
        let mut term = Terminal::new(5, 1);
        term.switch_screen(ScreenKey::Alternate);
        term.process(b"one\ntwo\n");

        assert!(term.screen(ScreenKey::Alternate).scrollback().is_empty());
        assert_eq!(term.scrollback_text(), "");
    }

    #[test]
    fn test_enter_and_exit_alternate_restores_cursor() {
        let mut term = Terminal::new(10, 3);
        term.process(b"abc\x1b[?1049h\x1b[3;3Hx");
        assert_eq!(term.screen_text(), "\n\n  x");
        term.process(b"\x1b[?1049l");

        assert_eq!(term.framebuffer().cursor_position(), (3, 0));
        assert_eq!(term.screen_text(), "abc");
    }

    #[test]
    fn test_title_follows_osc() {
        let mut term = Terminal::new(10, 3);
        term.process(b"\x1b]0;build\x07\x1b]2;vim\x1b\\");
        assert_eq!(term.title(), "vim");
        assert_eq!(term.screen_text(), "");
    }

    #[test]
    fn test_resize_rejects_empty_size() {
        let mut term = Terminal::new(10, 3);
        assert!(term.resize(0, 3).is_err());
        term.resize(4, 2).unwrap();
        assert_eq!(term.dimensions(), (4, 2));
    }
}
