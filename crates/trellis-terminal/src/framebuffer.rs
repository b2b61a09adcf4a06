//! Frame buffer implementation for terminal content
//!
//! Manages the 2D grid of cells that make up one terminal screen, plus the
//! scrollback rows that have scrolled off its top edge.

/// A single cell in the terminal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// The character in this cell
    pub c: char,

    /// Foreground color (ANSI 256-color palette or RGB)
    pub fg: Color,

    /// Background color
    pub bg: Color,

    /// Text attributes
    pub attrs: Attributes,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            c: ' ',
            fg: Color::Default,
            bg: Color::Default,
            attrs: Attributes::default(),
        }
    }
}

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// Default terminal color
    Default,

    /// ANSI 256-color palette index
    Indexed(u8),

    /// RGB color
    Rgb(u8, u8, u8),
}

/// Text attributes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attributes {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub reverse: bool,
    pub hidden: bool,
    pub dim: bool,
    pub blink: bool,
    /// Set by DECSCA; protected cells survive a selective erase
    pub protected: bool,
}

/// Erase Display (ED) modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseDisplay {
    /// From the cursor to the end of the screen
    Below,
    /// From the start of the screen to the cursor
    Above,
    /// The whole active screen
    Complete,
    /// The scrollback only
    Scrollback,
}

/// Default number of scrollback rows kept per screen
pub const DEFAULT_SCROLLBACK: usize = 10_000;

/// Frame buffer containing terminal content
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u16,
    height: u16,

    /// Cells in row-major order
    cells: Vec<Cell>,

    /// Cursor column and row, 0-based
    cursor_x: u16,
    cursor_y: u16,
    cursor_visible: bool,

    /// Style stamped onto every character written; `c` is unused
    pen: Cell,

    /// Scrollback buffer, oldest row first
    scrollback: Vec<Vec<Cell>>,

    /// Maximum scrollback lines; zero disables scrollback
    max_scrollback: usize,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_scrollback(width, height, DEFAULT_SCROLLBACK)
    }

    /// Create a new frame buffer keeping at most `max_scrollback` rows of history
    pub fn with_scrollback(width: u16, height: u16, max_scrollback: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
            cursor_x: 0,
            cursor_y: 0,
            cursor_visible: true,
            pen: Cell::default(),
            scrollback: Vec::new(),
            max_scrollback,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Cursor as (column, row)
    pub fn cursor_position(&self) -> (u16, u16) {
        (self.cursor_x, self.cursor_y)
    }

    /// Set cursor position, clamped to the screen
    pub fn set_cursor_position(&mut self, x: u16, y: u16) {
        self.cursor_x = x.min(self.width.saturating_sub(1));
        self.cursor_y = y.min(self.height.saturating_sub(1));
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    /// Index of (x, y) in `cells`, if on screen
    fn offset(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Cell range covering row `y`
    fn row_range(&self, y: u16) -> std::ops::Range<usize> {
        let width = usize::from(self.width);
        let start = usize::from(y) * width;
        start.min(self.cells.len())..(start + width).min(self.cells.len())
    }

    pub fn cell_at(&self, x: u16, y: u16) -> Option<&Cell> {
        self.offset(x, y).and_then(|i| self.cells.get(i))
    }

    /// Write a character at the cursor with the current style, wrapping at
    /// the right margin
    pub fn write_char(&mut self, c: char) {
        let Some(i) = self.offset(self.cursor_x, self.cursor_y) else {
            return;
        };
        self.cells[i] = Cell { c, ..self.pen };

        self.cursor_x += 1;
        if self.cursor_x >= self.width {
            self.cursor_x = 0;
            self.index();
        }
    }

    /// Move cursor down one row, scrolling at the bottom margin
    pub fn index(&mut self) {
        if self.height == 0 {
            return;
        }
        if self.cursor_y + 1 < self.height {
            self.cursor_y += 1;
        } else {
            self.scroll_up(1);
        }
    }

    pub fn newline(&mut self) {
        self.carriage_return();
        self.index();
    }

    pub fn carriage_return(&mut self) {
        self.cursor_x = 0;
    }

    /// Clear the screen and home the cursor
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
        self.cursor_x = 0;
        self.cursor_y = 0;
    }

    /// Erase part of the display without moving the cursor.
    ///
    /// With `protected` set, cells carrying the DECSCA protected attribute
    /// are left untouched.
    pub fn erase_display(&mut self, mode: EraseDisplay, protected: bool) {
        let len = self.cells.len();
        let cursor = (usize::from(self.cursor_y) * usize::from(self.width)
            + usize::from(self.cursor_x))
        .min(len);
        let range = match mode {
            EraseDisplay::Below => cursor..len,
            EraseDisplay::Above => 0..(cursor + 1).min(len),
            EraseDisplay::Complete => 0..len,
            EraseDisplay::Scrollback => {
                self.scrollback.clear();
                return;
            }
        };

        self.cells[range]
            .iter_mut()
            .filter(|cell| !(protected && cell.attrs.protected))
            .for_each(|cell| *cell = Cell::default());
    }

    /// Blank the cells of the cursor row selected by `columns`
    fn erase_in_row(&mut self, columns: std::ops::Range<usize>) {
        let row = self.row_range(self.cursor_y);
        let start = (row.start + columns.start).min(row.end);
        let end = (row.start + columns.end).min(row.end);
        self.cells[start..end].fill(Cell::default());
    }

    /// Clear from cursor to end of line
    pub fn clear_to_eol(&mut self) {
        self.erase_in_row(usize::from(self.cursor_x)..usize::from(self.width));
    }

    /// Clear from beginning of line to cursor (inclusive)
    pub fn clear_line_to_cursor(&mut self) {
        self.erase_in_row(0..usize::from(self.cursor_x) + 1);
    }

    pub fn clear_line(&mut self) {
        self.erase_in_row(0..usize::from(self.width));
    }

    /// Scroll the screen up by `n` rows, moving the top rows into scrollback
    pub fn scroll_up(&mut self, n: u16) {
        let n = n.min(self.height);
        if n == 0 {
            return;
        }

        let width = usize::from(self.width);
        let shift = usize::from(n) * width;
        if self.max_scrollback > 0 && width > 0 {
            let rows = self.cells[..shift].chunks(width).map(<[Cell]>::to_vec);
            self.scrollback.extend(rows);
            let excess = self.scrollback.len().saturating_sub(self.max_scrollback);
            self.scrollback.drain(..excess);
        }

        self.cells.rotate_left(shift);
        let len = self.cells.len();
        self.cells[len - shift..].fill(Cell::default());
    }

    pub fn current_attrs(&self) -> Attributes {
        self.pen.attrs
    }

    pub fn set_attrs(&mut self, attrs: Attributes) {
        self.pen.attrs = attrs;
    }

    pub fn set_fg_color(&mut self, color: Color) {
        self.pen.fg = color;
    }

    pub fn set_bg_color(&mut self, color: Color) {
        self.pen.bg = color;
    }

    /// Reset text attributes and colors
    pub fn reset_attrs(&mut self) {
        // SGR 0 does not clear DECSCA protection
        self.pen = Cell {
            attrs: Attributes {
                protected: self.pen.attrs.protected,
                ..Attributes::default()
            },
            ..Cell::default()
        };
    }

    /// Resize, keeping the top-left content that still fits
    pub fn resize(&mut self, width: u16, height: u16) {
        let mut cells = vec![Cell::default(); usize::from(width) * usize::from(height)];
        let keep = usize::from(self.width.min(width));
        if keep > 0 {
            for (y, old) in self
                .cells
                .chunks(usize::from(self.width))
                .take(usize::from(height))
                .enumerate()
            {
                let start = y * usize::from(width);
                cells[start..start + keep].copy_from_slice(&old[..keep]);
            }
        }

        self.cells = cells;
        self.width = width;
        self.height = height;
        self.set_cursor_position(self.cursor_x, self.cursor_y);
    }

    pub fn scrollback(&self) -> &[Vec<Cell>] {
        &self.scrollback
    }

    /// Text of one visible row with trailing blanks removed
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        cells_to_text(&self.cells[self.row_range(y)])
    }

    /// Visible rows joined by newlines, trailing empty rows dropped
    pub fn screen_text(&self) -> String {
        join_trimmed((0..self.height).map(|y| self.row_text(y)).collect())
    }

    /// Scrollback rows joined by newlines, trailing empty rows dropped
    pub fn scrollback_text(&self) -> String {
        join_trimmed(self.scrollback.iter().map(|row| cells_to_text(row)).collect())
    }
}

fn cells_to_text(cells: &[Cell]) -> String {
    let text: String = cells.iter().map(|cell| cell.c).collect();
    text.trim_end().to_string()
}

fn join_trimmed(mut rows: Vec<String>) -> String {
    while rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }
    rows.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_scrolls_into_scrollback() {
        let mut fb = FrameBuffer::with_scrollback(4, 2, 10);
        fb.write_char('a');
        fb.index();
        fb.index();

        assert_eq!(fb.cursor_position(), (1, 1));
        assert_eq!(fb.scrollback_text(), "a");
        assert_eq!(fb.screen_text(), "");
    }

    #[test]
    fn test_scrollback_limit_drops_oldest() {
        let mut fb = FrameBuffer::with_scrollback(3, 1, 2);
        for c in ['a', 'b', 'c'] {
            fb.carriage_return();
            fb.write_char(c);
            fb.index();
        }

        assert_eq!(fb.scrollback_text(), "b\nc");
    }

    #[test]
    fn test_zero_scrollback_discards_rows() {
        let mut fb = FrameBuffer::with_scrollback(3, 1, 0);
        fb.write_char('x');
        fb.index();

        assert!(fb.scrollback().is_empty());
    }

    #[test]
    fn test_erase_display_keeps_cursor() {
        let mut fb = FrameBuffer::new(3, 2);
        for c in "abcde".chars() {
            fb.write_char(c);
        }
        fb.set_cursor_position(1, 0);

        fb.erase_display(EraseDisplay::Below, false);
        assert_eq!(fb.screen_text(), "a");
        assert_eq!(fb.cursor_position(), (1, 0));

        fb.erase_display(EraseDisplay::Complete, false);
        assert_eq!(fb.screen_text(), "");
        assert_eq!(fb.cursor_position(), (1, 0));
    }

    #[test]
    fn test_line_erase_modes() {
        let mut fb = FrameBuffer::new(5, 2);
        for c in "abcde".chars() {
            fb.write_char(c);
        }
        fb.set_cursor_position(2, 0);

        fb.clear_line_to_cursor();
        assert_eq!(fb.row_text(0), "   de");
        fb.clear_to_eol();
        assert_eq!(fb.row_text(0), "");

        fb.write_char('x');
        fb.clear_line();
        assert_eq!(fb.screen_text(), "");
    }

    #[test]
    fn test_resize_keeps_top_left() {
        let mut fb = FrameBuffer::new(4, 3);
        for c in "abcdefghij".chars() {
            fb.write_char(c);
        }
        fb.resize(2, 2);
        assert_eq!(fb.screen_text(), "ab\nef");
        assert_eq!(fb.cursor_position(), (1, 1));

        fb.resize(3, 3);
        assert_eq!(fb.screen_text(), "ab\nef");
    }

    #[test]
    fn test_style_is_stamped_on_written_cells() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.set_fg_color(Color::Indexed(1));
        fb.write_char('r');
        fb.reset_attrs();
        fb.write_char('n');

        assert_eq!(fb.cell_at(0, 0).unwrap().fg, Color::Indexed(1));
        assert_eq!(fb.cell_at(1, 0).unwrap().fg, Color::Default);
    }

    #[test]
    fn test_selective_erase_skips_protected_cells() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.write_char('a');
        fb.set_attrs(Attributes {
            protected: true,
            ..Attributes::default()
        });
        fb.write_char('b');

        fb.erase_display(EraseDisplay::Complete, true);
        assert_eq!(fb.row_text(0), " b");

        fb.erase_display(EraseDisplay::Complete, false);
        assert_eq!(fb.row_text(0), "");
    }
}
