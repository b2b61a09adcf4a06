//! Terminal escape sequence parser
//!
//! Uses the vte crate to parse VT100/xterm escape sequences. Everything that
//! affects a single screen is applied to the frame buffer directly; requests
//! that concern the terminal as a whole come back as [`Event`]s.

use crate::framebuffer::{Attributes, Color, EraseDisplay, FrameBuffer};
use vte::{Params, Perform};

/// A request the parser cannot carry out on one screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// DECSET / DECRST 47, 1047 or 1049
    AlternateScreen(bool),
    /// OSC 0 or 2
    Title(String),
}

/// Parser for terminal escape sequences
pub struct Parser {
    vte_parser: vte::Parser,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            vte_parser: vte::Parser::new(),
        }
    }

    /// Process a single byte against `framebuffer`
    pub fn advance(&mut self, framebuffer: &mut FrameBuffer, byte: u8) -> Option<Event> {
        let mut performer = Performer {
            fb: framebuffer,
            event: None,
        };
        self.vte_parser.advance(&mut performer, byte);
        performer.event
    }
}

struct Performer<'a> {
    fb: &'a mut FrameBuffer,
    event: Option<Event>,
}

/// First value of the first parameter, or `default` when absent or zero
fn count(params: &Params, default: u16) -> u16 {
    match params.iter().next().and_then(|p| p.first().copied()) {
        Some(0) | None => default,
        Some(n) => n,
    }
}

/// First value of the first parameter, zero when absent
fn mode(params: &Params) -> u16 {
    params.iter().next().and_then(|p| p.first().copied()).unwrap_or(0)
}

impl Perform for Performer<'_> {
    fn print(&mut self, c: char) {
        self.fb.write_char(c);
    }

    fn execute(&mut self, byte: u8) {
        let (x, y) = self.fb.cursor_position();
        match byte {
            // BS
            0x08 => self.fb.set_cursor_position(x.saturating_sub(1), y),
            // HT
            0x09 => {
                let stop = (x / 8 + 1) * 8;
                self.fb
                    .set_cursor_position(stop.min(self.fb.width().saturating_sub(1)), y);
            }
            // LF, VT, FF
            0x0A..=0x0C => self.fb.newline(),
            // CR
            0x0D => self.fb.carriage_return(),
            _ => {}
        }
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        match params {
            [b"0" | b"2", title, ..] => {
                self.event = Some(Event::Title(String::from_utf8_lossy(title).into_owned()));
            }
            [command, ..] => {
                tracing::trace!("ignoring OSC {}", String::from_utf8_lossy(command));
            }
            [] => {}
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], _ignore: bool, c: char) {
        let (x, y) = self.fb.cursor_position();
        let max_x = self.fb.width().saturating_sub(1);
        let max_y = self.fb.height().saturating_sub(1);

        match (intermediates, c) {
            // CUU, CUD, CUF, CUB
            ([], 'A') => self.fb.set_cursor_position(x, y.saturating_sub(count(params, 1))),
            ([], 'B') => self
                .fb
                .set_cursor_position(x, y.saturating_add(count(params, 1)).min(max_y)),
            ([], 'C') => self
                .fb
                .set_cursor_position(x.saturating_add(count(params, 1)).min(max_x), y),
            ([], 'D') => self.fb.set_cursor_position(x.saturating_sub(count(params, 1)), y),

            // CUP, HVP: 1-based row then column
            ([], 'H' | 'f') => {
                let mut values = params.iter().map(|p| p.first().copied().unwrap_or(0));
                let row = values.next().unwrap_or(1).max(1) - 1;
                let col = values.next().unwrap_or(1).max(1) - 1;
                self.fb.set_cursor_position(col, row);
            }

            // ED and DECSED
            ([] | [b'?'], 'J') => {
                let selective = intermediates == b"?";
                let erase = match mode(params) {
                    0 => EraseDisplay::Below,
                    1 => EraseDisplay::Above,
                    2 => EraseDisplay::Complete,
                    3 => EraseDisplay::Scrollback,
                    _ => return,
                };
                self.fb.erase_display(erase, selective);
            }

            // EL
            ([], 'K') => match mode(params) {
                0 => self.fb.clear_to_eol(),
                1 => self.fb.clear_line_to_cursor(),
                2 => self.fb.clear_line(),
                _ => {}
            },

            // SGR
            ([], 'm') => {
                if params.is_empty() {
                    self.fb.reset_attrs();
                    return;
                }
                let mut iter = params.iter();
                while let Some(param) = iter.next() {
                    if let Some(&code) = param.first() {
                        handle_sgr(self.fb, code, &mut iter);
                    }
                }
            }

            // DECSCA
            ([b'"'], 'q') => {
                let attrs = self.fb.current_attrs();
                self.fb.set_attrs(Attributes {
                    protected: mode(params) == 1,
                    ..attrs
                });
            }

            // DECSET / DECRST
            ([b'?'], 'h' | 'l') => {
                let enable = c == 'h';
                for param in params.iter() {
                    match param.first().copied() {
                        Some(25) => self.fb.set_cursor_visible(enable),
                        Some(47 | 1047 | 1049) => {
                            self.event = Some(Event::AlternateScreen(enable));
                        }
                        _ => {}
                    }
                }
            }

            _ => {}
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        match (intermediates, byte) {
            // IND
            ([], b'D') => self.fb.index(),
            // NEL
            ([], b'E') => self.fb.newline(),
            _ => {}
        }
    }
}

/// Apply one SGR code, consuming extended-colour arguments from `params`
fn handle_sgr<'a, I>(fb: &mut FrameBuffer, code: u16, params: &mut I)
where
    I: Iterator<Item = &'a [u16]>,
{
    let mut attrs = fb.current_attrs();
    let flag = match code {
        1 => Some((&mut attrs.bold, true)),
        2 => Some((&mut attrs.dim, true)),
        3 => Some((&mut attrs.italic, true)),
        4 => Some((&mut attrs.underline, true)),
        5 => Some((&mut attrs.blink, true)),
        7 => Some((&mut attrs.reverse, true)),
        8 => Some((&mut attrs.hidden, true)),
        9 => Some((&mut attrs.strikethrough, true)),
        23 => Some((&mut attrs.italic, false)),
        24 => Some((&mut attrs.underline, false)),
        25 => Some((&mut attrs.blink, false)),
        27 => Some((&mut attrs.reverse, false)),
        28 => Some((&mut attrs.hidden, false)),
        29 => Some((&mut attrs.strikethrough, false)),
        _ => None,
    };
    if let Some((field, value)) = flag {
        *field = value;
        fb.set_attrs(attrs);
        return;
    }

    match code {
        0 => fb.reset_attrs(),
        22 => {
            let attrs = fb.current_attrs();
            fb.set_attrs(Attributes {
                bold: false,
                dim: false,
                ..attrs
            });
        }
        30..=37 => fb.set_fg_color(Color::Indexed((code - 30) as u8)),
        38 => {
            if let Some(color) = extended_color(params) {
                fb.set_fg_color(color);
            }
        }
        39 => fb.set_fg_color(Color::Default),
        40..=47 => fb.set_bg_color(Color::Indexed((code - 40) as u8)),
        48 => {
            if let Some(color) = extended_color(params) {
                fb.set_bg_color(color);
            }
        }
        49 => fb.set_bg_color(Color::Default),
        90..=97 => fb.set_fg_color(Color::Indexed((code - 90 + 8) as u8)),
        100..=107 => fb.set_bg_color(Color::Indexed((code - 100 + 8) as u8)),
        _ => {}
    }
}

/// `5;N` (256-colour) or `2;R;G;B` (truecolour)
fn extended_color<'a, I>(params: &mut I) -> Option<Color>
where
    I: Iterator<Item = &'a [u16]>,
{
    let mut next = || params.next().and_then(|p| p.first().copied());
    match next()? {
        5 => next().map(|index| Color::Indexed(index.min(255) as u8)),
        2 => {
            let mut channel = || next().unwrap_or(0).min(255) as u8;
            Some(Color::Rgb(channel(), channel(), channel()))
        }
        _ => None,
    }
}
