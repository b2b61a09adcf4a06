//! tmux window layout strings
//!
//! A layout describes one window as a tree of rectangles:
//!
//! ```text
//! node := WIDTH 'x' HEIGHT ',' X ',' Y ( ',' PANE_ID | '{' node (',' node)* '}' | '[' node (',' node)* ']' )
//! ```
//!
//! `{...}` lays children out left to right, `[...]` top to bottom. The
//! `window_layout` format variable additionally prefixes the body with a
//! four digit hexadecimal checksum and a comma.

use std::fmt;

use thiserror::Error;

/// Deepest nesting accepted before the parser gives up
pub const MAX_DEPTH: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Layout syntax error at byte {position}: expected {expected}")]
    Syntax {
        position: usize,
        expected: &'static str,
    },

    #[error("Layout nests deeper than {MAX_DEPTH} levels")]
    TooDeep,

    #[error("Layout checksum mismatch: header says {expected:04x}, body sums to {actual:04x}")]
    Checksum { expected: u16, actual: u16 },

    #[error("Layout has no checksum prefix")]
    MissingChecksum,
}

/// One rectangle of a window layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
    pub x: usize,
    pub y: usize,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// A pane, by its numeric id (`%N` without the sigil)
    Pane(usize),
    /// Children side by side, left to right
    Horizontal(Vec<Layout>),
    /// Children stacked, top to bottom
    Vertical(Vec<Layout>),
}

impl Layout {
    /// Parse a layout body without a checksum prefix.
    ///
    /// The whole input must be consumed.
    pub fn parse(input: &str) -> Result<Layout, LayoutError> {
        let mut parser = Parser {
            input: input.as_bytes(),
            pos: 0,
        };
        let layout = parser.node(0)?;
        if parser.pos != parser.input.len() {
            return Err(parser.error("end of layout"));
        }
        Ok(layout)
    }

    /// Parse a `window_layout` value, `cccc,body`, verifying the checksum
    pub fn parse_with_checksum(input: &str) -> Result<Layout, LayoutError> {
        let (header, body) = input.split_once(',').ok_or(LayoutError::MissingChecksum)?;
        if header.len() != 4 || !header.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(LayoutError::MissingChecksum);
        }
        let expected =
            u16::from_str_radix(header, 16).map_err(|_| LayoutError::MissingChecksum)?;

        let actual = checksum(body);
        if expected != actual {
            return Err(LayoutError::Checksum { expected, actual });
        }
        Self::parse(body)
    }

    /// Every pane rectangle in document order, outermost first
    pub fn panes(&self) -> Vec<(usize, &Layout)> {
        let mut out = Vec::new();
        self.collect_panes(&mut out);
        out
    }

    fn collect_panes<'a>(&'a self, out: &mut Vec<(usize, &'a Layout)>) {
        match &self.content {
            Content::Pane(id) => out.push((*id, self)),
            Content::Horizontal(children) | Content::Vertical(children) => {
                for child in children {
                    child.collect_panes(out);
                }
            }
        }
    }

    /// The body with its checksum prefix, as tmux reports `window_layout`
    pub fn to_string_with_checksum(&self) -> String {
        let body = self.to_string();
        format!("{:04x},{body}", checksum(&body))
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{},{},{}", self.width, self.height, self.x, self.y)?;
        let (open, close, children) = match &self.content {
            Content::Pane(id) => return write!(f, ",{id}"),
            Content::Horizontal(children) => ('{', '}', children),
            Content::Vertical(children) => ('[', ']', children),
        };

        write!(f, "{open}")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{child}")?;
        }
        write!(f, "{close}")
    }
}

/// tmux's layout checksum: rotate right by one, then add the byte
pub fn checksum(body: &str) -> u16 {
    body.bytes().fold(0u16, |csum, b| {
        let rotated = (csum >> 1) | ((csum & 1) << 15);
        rotated.wrapping_add(u16::from(b))
    })
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, expected: &'static str) -> LayoutError {
        LayoutError::Syntax {
            position: self.pos,
            expected,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), LayoutError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    fn number(&mut self) -> Result<usize, LayoutError> {
        let start = self.pos;
        let mut value: usize = 0;
        while let Some(digit @ b'0'..=b'9') = self.peek() {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(usize::from(digit - b'0')))
                .ok_or(LayoutError::Syntax {
                    position: start,
                    expected: "a number that fits in usize",
                })?;
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("a decimal number"));
        }
        Ok(value)
    }

    fn node(&mut self, depth: usize) -> Result<Layout, LayoutError> {
        if depth >= MAX_DEPTH {
            return Err(LayoutError::TooDeep);
        }

        let width = self.number()?;
        self.expect(b'x', "'x'")?;
        let height = self.number()?;
        self.expect(b',', "','")?;
        let x = self.number()?;
        self.expect(b',', "','")?;
        let y = self.number()?;

        let content = match self.peek() {
            Some(b',') => {
                self.pos += 1;
                Content::Pane(self.number()?)
            }
            Some(b'{') => Content::Horizontal(self.children(b'}', depth)?),
            Some(b'[') => Content::Vertical(self.children(b']', depth)?),
            _ => return Err(self.error("',', '{' or '['")),
        };

        Ok(Layout {
            width,
            height,
            x,
            y,
            content,
        })
    }

    fn children(&mut self, close: u8, depth: usize) -> Result<Vec<Layout>, LayoutError> {
        // Skip the opening bracket
        self.pos += 1;

        let mut children = vec![self.node(depth + 1)?];
        loop {
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    children.push(self.node(depth + 1)?);
                }
                Some(b) if b == close => {
                    self.pos += 1;
                    return Ok(children);
                }
                _ if close == b'}' => return Err(self.error("',' or '}'")),
                _ => return Err(self.error("',' or ']'")),
            }
        }
    }
}
