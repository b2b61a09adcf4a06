//! Terminal display conversion
//!
//! Renders frame buffer rows back into ANSI text for printing

use crate::framebuffer::{Attributes, Cell, Color, FrameBuffer};

/// Render a row of cells to a string with ANSI escape codes.
///
/// Trailing default-styled blanks are dropped so short rows stay short.
pub fn render_row_ansi(fb: &FrameBuffer, row: u16) -> String {
    let cells: Vec<&Cell> = (0..fb.width()).filter_map(|x| fb.cell_at(x, row)).collect();
    let visible = cells
        .iter()
        .rposition(|cell| **cell != Cell::default())
        .map_or(0, |last| last + 1);

    let mut output = String::new();
    let mut last = (Color::Default, Color::Default, Attributes::default());

    for cell in &cells[..visible] {
        let style = (cell.fg, cell.bg, cell.attrs);
        if style != last {
            output.push_str(&sgr_for(cell));
            last = style;
        }
        output.push(cell.c);
    }

    output.push_str("\x1b[0m");
    output
}

/// Render every visible row of a frame buffer, one ANSI string per row
pub fn render_screen_ansi(fb: &FrameBuffer) -> Vec<String> {
    (0..fb.height()).map(|row| render_row_ansi(fb, row)).collect()
}

/// SGR sequence that resets and then applies a cell's style
fn sgr_for(cell: &Cell) -> String {
    let flags = [
        (cell.attrs.bold, 1),
        (cell.attrs.dim, 2),
        (cell.attrs.italic, 3),
        (cell.attrs.underline, 4),
        (cell.attrs.blink, 5),
        (cell.attrs.reverse, 7),
        (cell.attrs.hidden, 8),
        (cell.attrs.strikethrough, 9),
    ];

    let mut codes: Vec<u16> = vec![0];
    codes.extend(flags.iter().filter(|(on, _)| *on).map(|(_, code)| *code));
    push_color(&mut codes, cell.fg, 30, 90, 38);
    push_color(&mut codes, cell.bg, 40, 100, 48);

    let codes: Vec<String> = codes.iter().map(u16::to_string).collect();
    format!("\x1b[{}m", codes.join(";"))
}

fn push_color(codes: &mut Vec<u16>, color: Color, base: u16, bright: u16, extended: u16) {
    match color {
        Color::Default => {}
        Color::Indexed(n) if n < 8 => codes.push(base + n as u16),
        Color::Indexed(n) if n < 16 => codes.push(bright + (n - 8) as u16),
        Color::Indexed(n) => codes.extend([extended, 5, n as u16]),
        Color::Rgb(r, g, b) => codes.extend([extended, 2, r as u16, g as u16, b as u16]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ansi_rendering() {
        let mut fb = FrameBuffer::new(5, 1);

        // Set bold red text
        fb.set_attrs(Attributes {
            bold: true,
            ..Default::default()
        });
        fb.set_fg_color(Color::Indexed(1));
        fb.write_char('R');
        fb.write_char('E');
        fb.write_char('D');

        let rendered = render_row_ansi(&fb, 0);

        assert_eq!(rendered, "\x1b[0;1;31mRED\x1b[0m");
    }

    #[test]
    fn test_plain_row_has_no_style_prefix() {
        let mut fb = FrameBuffer::new(8, 1);
        for c in "hi".chars() {
            fb.write_char(c);
        }

        assert_eq!(render_row_ansi(&fb, 0), "hi\x1b[0m");
    }

    #[test]
    fn test_truecolor_background() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.set_bg_color(Color::Rgb(1, 2, 3));
        fb.write_char('x');

        assert_eq!(render_row_ansi(&fb, 0), "\x1b[0;48;2;1;2;3mx\x1b[0m");
    }
}
