//! tmux control-mode stream decoding
//!
//! `tmux -C` speaks a line protocol on stdout. Command replies are wrapped
//! in `%begin` / `%end` (or `%error`) guard lines, everything else is an
//! asynchronous `%notification`. With `-CC` the stream is additionally
//! wrapped in a DCS introducer and terminator.

use bytes::{Buf, Bytes, BytesMut};
use thiserror::Error;
use tracing::{debug, trace};

/// Longest line accepted before the stream is considered corrupt
pub const MAX_LINE: usize = 1024 * 1024;

/// DCS sequence `tmux -CC` emits before the first line
const DCS_ENTER: &[u8] = b"\x1bP1000p";

/// String terminator emitted after `%exit` in `-CC` mode
const DCS_EXIT: &[u8] = b"\x1b\\";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("Control-mode line exceeds {MAX_LINE} bytes")]
    LineTooLong,

    #[error("Malformed control-mode line {line:?}: {reason}")]
    Malformed { line: String, reason: &'static str },

    #[error("Control-mode stream is broken")]
    Broken,
}

/// One decoded unit of the control-mode stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The `-CC` DCS introducer
    Enter,
    /// tmux is leaving control mode
    Exit { reason: Option<String> },
    /// A command succeeded; raw output lines, each terminated by `\n`
    BlockEnd(Bytes),
    /// A command failed; raw output lines, each terminated by `\n`
    BlockErr(Bytes),
    /// Pane output with tmux escapes decoded
    Output { pane_id: usize, data: Bytes },
    SessionChanged { id: usize, name: String },
    SessionsChanged,
    LayoutChange { window_id: usize, layout: String },
    WindowAdd { window_id: usize },
    WindowRenamed { window_id: usize, name: String },
    WindowPaneChanged { window_id: usize, pane_id: usize },
    ClientDetached { client: String },
    ClientSessionChanged {
        client: String,
        session_id: usize,
        name: String,
    },
}

/// Incremental decoder; the caller owns the input buffer.
#[derive(Debug, Default)]
pub struct ControlDecoder {
    /// Output of the reply being collected, with its `%begin` arguments
    block: Option<(String, BytesMut)>,
    broken: bool,
}

impl ControlDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a `%begin` is open
    pub fn in_block(&self) -> bool {
        self.block.is_some()
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Decode the next notification from `buf`.
    ///
    /// Returns `Ok(None)` when more input is needed. Consumed bytes are
    /// removed from `buf`.
    pub fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Notification>, ControlError> {
        if self.broken {
            return Err(ControlError::Broken);
        }

        loop {
            if buf.first() == Some(&0x1b) && self.block.is_none() {
                if buf.starts_with(DCS_ENTER) {
                    buf.advance(DCS_ENTER.len());
                    trace!("entered control mode");
                    return Ok(Some(Notification::Enter));
                }
                if buf.starts_with(DCS_EXIT) {
                    buf.advance(DCS_EXIT.len());
                    continue;
                }
                if DCS_ENTER.starts_with(buf) || DCS_EXIT.starts_with(buf) {
                    return Ok(None);
                }
            }

            let Some(end) = buf.iter().position(|&b| b == b'\n') else {
                if buf.len() > MAX_LINE {
                    self.broken = true;
                    return Err(ControlError::LineTooLong);
                }
                return Ok(None);
            };
            if end > MAX_LINE {
                self.broken = true;
                return Err(ControlError::LineTooLong);
            }

            let raw = buf.split_to(end + 1);
            let mut line = &raw[..end];
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }

            if let Some(notification) = self.line(line)? {
                return Ok(Some(notification));
            }
        }
    }

    fn line(&mut self, line: &[u8]) -> Result<Option<Notification>, ControlError> {
        if let Some((args, block)) = &mut self.block {
            let end = guard_args(line, b"%end");
            let err = guard_args(line, b"%error");
            match (end, err) {
                (Some(rest), _) if rest == args.as_bytes() => {
                    let content = block.split().freeze();
                    self.block = None;
                    return Ok(Some(Notification::BlockEnd(content)));
                }
                (_, Some(rest)) if rest == args.as_bytes() => {
                    let content = block.split().freeze();
                    self.block = None;
                    return Ok(Some(Notification::BlockErr(content)));
                }
                _ => {
                    block.extend_from_slice(line);
                    block.extend_from_slice(b"\n");
                    return Ok(None);
                }
            }
        }

        if let Some(args) = guard_args(line, b"%begin") {
            let args = String::from_utf8_lossy(args).into_owned();
            self.block = Some((args, BytesMut::new()));
            return Ok(None);
        }

        if !line.starts_with(b"%") {
            debug!(len = line.len(), "ignoring stray control-mode line");
            return Ok(None);
        }

        parse_notification(line)
    }
}

/// Arguments after a guard keyword, if `line` is that guard line
fn guard_args<'a>(line: &'a [u8], keyword: &[u8]) -> Option<&'a [u8]> {
    let rest = line.strip_prefix(keyword)?;
    match rest.first() {
        None => Some(rest),
        Some(b' ') => Some(&rest[1..]),
        Some(_) => None,
    }
}

fn malformed(line: &[u8], reason: &'static str) -> ControlError {
    ControlError::Malformed {
        line: String::from_utf8_lossy(line).into_owned(),
        reason,
    }
}

/// Parse `<sigil><digits>` such as `%3`, `@1` or `$0`
fn parse_id(token: &[u8], sigil: u8, line: &[u8]) -> Result<usize, ControlError> {
    let digits = token
        .strip_prefix(&[sigil])
        .ok_or_else(|| malformed(line, "missing id sigil"))?;
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| malformed(line, "id is not a number"))
}

/// Split off the first space-delimited word
fn word(input: &[u8]) -> (&[u8], &[u8]) {
    match input.iter().position(|&b| b == b' ') {
        Some(i) => (&input[..i], &input[i + 1..]),
        None => (input, &[]),
    }
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn parse_notification(line: &[u8]) -> Result<Option<Notification>, ControlError> {
    let (name, rest) = word(line);
    let notification = match name {
        b"%exit" => Notification::Exit {
            reason: (!rest.is_empty()).then(|| text(rest)),
        },
        b"%output" => {
            let (pane, data) = word(rest);
            Notification::Output {
                pane_id: parse_id(pane, b'%', line)?,
                data: unescape(data),
            }
        }
        b"%session-changed" => {
            let (id, name) = word(rest);
            Notification::SessionChanged {
                id: parse_id(id, b'$', line)?,
                name: text(name),
            }
        }
        b"%sessions-changed" => Notification::SessionsChanged,
        b"%layout-change" => {
            let (window, rest) = word(rest);
            let (layout, _) = word(rest);
            Notification::LayoutChange {
                window_id: parse_id(window, b'@', line)?,
                layout: text(layout),
            }
        }
        b"%window-add" => Notification::WindowAdd {
            window_id: parse_id(rest, b'@', line)?,
        },
        b"%window-renamed" => {
            let (window, name) = word(rest);
            Notification::WindowRenamed {
                window_id: parse_id(window, b'@', line)?,
                name: text(name),
            }
        }
        b"%window-pane-changed" => {
            let (window, pane) = word(rest);
            Notification::WindowPaneChanged {
                window_id: parse_id(window, b'@', line)?,
                pane_id: parse_id(pane, b'%', line)?,
            }
        }
        b"%client-detached" => Notification::ClientDetached { client: text(rest) },
        b"%client-session-changed" => {
            let (client, rest) = word(rest);
            let (session, name) = word(rest);
            Notification::ClientSessionChanged {
                client: text(client),
                session_id: parse_id(session, b'$', line)?,
                name: text(name),
            }
        }
        _ => {
            trace!(name = %String::from_utf8_lossy(name), "skipping notification");
            return Ok(None);
        }
    };
    Ok(Some(notification))
}

/// Decode tmux's `%output` escaping: `\ooo` octal bytes and `\\`.
///
/// Only `\000` to `\377` name a byte; anything larger is copied through.
pub fn unescape(data: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        let b = data[i];
        if b == b'\\' {
            let octal = data.get(i + 1..i + 4).filter(|d| {
                (b'0'..=b'3').contains(&d[0]) && d[1..].iter().all(|c| (b'0'..=b'7').contains(c))
            });
            if let Some(d) = octal {
                let value = d.iter().fold(0u8, |acc, c| acc * 8 + (c - b'0'));
                out.extend_from_slice(&[value]);
                i += 4;
                continue;
            }
            if data.get(i + 1) == Some(&b'\\') {
                out.extend_from_slice(b"\\");
                i += 2;
                continue;
            }
        }
        out.extend_from_slice(&[b]);
        i += 1;
    }
    out.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode_all(input: &[u8]) -> Vec<Notification> {
        let mut decoder = ControlDecoder::new();
        let mut buf = BytesMut::from(input);
        let mut out = Vec::new();
        while let Some(n) = decoder.decode(&mut buf).unwrap() {
            out.push(n);
        }
        out
    }

    #[test]
    fn test_block_content_keeps_line_endings() {
        let out = decode_all(b"%begin 1 2 0\nhello\nworld\n%end 1 2 0\n");
        assert_eq!(
            out,
            vec![Notification::BlockEnd(Bytes::from_static(b"hello\nworld\n"))]
        );
    }

    #[test]
    fn test_empty_and_failed_blocks() {
        let out = decode_all(b"%begin 1 1 0\n%end 1 1 0\n%begin 1 2 0\nno such pane\n%error 1 2 0\n");
        assert_eq!(
            out,
            vec![
                Notification::BlockEnd(Bytes::new()),
                Notification::BlockErr(Bytes::from_static(b"no such pane\n")),
            ]
        );
    }

    #[test]
    fn test_guard_inside_block_must_match_begin() {
        let out = decode_all(b"%begin 5 9 1\n%end 1 1 1\n%output %1 x\n%end 5 9 1\n");
        assert_eq!(
            out,
            vec![Notification::BlockEnd(Bytes::from_static(
                b"%end 1 1 1\n%output %1 x\n"
            ))]
        );
    }

    #[test]
    fn test_output_is_unescaped() {
        let out = decode_all(b"%output %3 a\\033[1mb\\\\c\\015\\012\n");
        assert_eq!(
            out,
            vec![Notification::Output {
                pane_id: 3,
                data: Bytes::from_static(b"a\x1b[1mb\\c\r\n"),
            }]
        );
    }

    #[test]
    fn test_out_of_range_octal_is_literal() {
        assert_eq!(unescape(b"\\377\\400\\777"), Bytes::from_static(b"\xff\\400\\777"));
    }

    #[test]
    fn test_notifications() {
        let out = decode_all(
            b"%session-changed $1 work\n\
              %window-add @4\n\
              %window-renamed @4 editor\n\
              %window-pane-changed @4 %7\n\
              %layout-change @4 b25f,80x24,0,0,7 b25f,80x24,0,0,7 *\n\
              %sessions-changed\n\
              %client-session-changed /dev/ttys001 $2 other\n\
              %client-detached /dev/ttys001\n\
              %unlinked-window-add @9\n\
              %exit\n",
        );
        assert_eq!(
            out,
            vec![
                Notification::SessionChanged {
                    id: 1,
                    name: "work".into()
                },
                Notification::WindowAdd { window_id: 4 },
                Notification::WindowRenamed {
                    window_id: 4,
                    name: "editor".into()
                },
                Notification::WindowPaneChanged {
                    window_id: 4,
                    pane_id: 7
                },
                Notification::LayoutChange {
                    window_id: 4,
                    layout: "b25f,80x24,0,0,7".into()
                },
                Notification::SessionsChanged,
                Notification::ClientSessionChanged {
                    client: "/dev/ttys001".into(),
                    session_id: 2,
                    name: "other".into()
                },
                Notification::ClientDetached {
                    client: "/dev/ttys001".into()
                },
                Notification::Exit { reason: None },
            ]
        );
    }

    #[test]
    fn test_dcs_wrapping() {
        let out = decode_all(b"\x1bP1000p%begin 1 1 0\n%end 1 1 0\n%exit detached\n\x1b\\");
        assert_eq!(
            out,
            vec![
                Notification::Enter,
                Notification::BlockEnd(Bytes::new()),
                Notification::Exit {
                    reason: Some("detached".into())
                },
            ]
        );
    }

    #[test]
    fn test_partial_input_waits() {
        let mut decoder = ControlDecoder::new();
        let mut buf = BytesMut::from(&b"\x1bP10"[..]);
        assert_eq!(decoder.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"00p%begin 1 1 0\nabc");
        assert_eq!(decoder.decode(&mut buf).unwrap(), Some(Notification::Enter));
        assert_eq!(decoder.decode(&mut buf).unwrap(), None);
        assert!(decoder.in_block());

        buf.extend_from_slice(b"\n%end 1 1 0\r\n");
        assert_eq!(
            decoder.decode(&mut buf).unwrap(),
            Some(Notification::BlockEnd(Bytes::from_static(b"abc\n")))
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn test_overlong_line_breaks_decoder() {
        let mut decoder = ControlDecoder::new();
        let mut buf = BytesMut::from(&vec![b'a'; MAX_LINE + 1][..]);
        assert_eq!(decoder.decode(&mut buf), Err(ControlError::LineTooLong));
        assert!(decoder.is_broken());

        let mut buf = BytesMut::from(&b"%exit\n"[..]);
        assert_eq!(decoder.decode(&mut buf), Err(ControlError::Broken));
    }

    #[test]
    fn test_malformed_ids() {
        let mut decoder = ControlDecoder::new();
        let mut buf = BytesMut::from(&b"%output 3 data\n"[..]);
        assert!(matches!(
            decoder.decode(&mut buf),
            Err(ControlError::Malformed { .. })
        ));
    }
}
