use pretty_assertions::assert_eq;
use trellis_terminal::{Attributes, Cell, Color, Terminal};

fn cells(term: &Terminal, count: u16) -> Vec<Cell> {
    let fb = term.framebuffer();
    (0..count)
        .map(|x| fb.cell_at(x, 0).cloned().unwrap_or_default())
        .collect()
}

#[test]
fn extended_and_bright_colors() {
    let mut term = Terminal::new(10, 2);

    // 256-colour fg, truecolour bg, then bright fg / bg
    term.process(b"\x1b[1;38;5;196;48;2;10;20;30mA\x1b[0;93;104mB");

    let cells = cells(&term, 2);
    let (a, b) = (&cells[0], &cells[1]);
    assert_eq!(a.c, 'A');
    assert!(a.attrs.bold);
    assert_eq!(a.fg, Color::Indexed(196));
    assert_eq!(a.bg, Color::Rgb(10, 20, 30));

    assert!(!b.attrs.bold);
    assert_eq!(b.fg, Color::Indexed(11));
    assert_eq!(b.bg, Color::Indexed(12));
}

#[test]
fn truncated_truecolor_fills_missing_channels() {
    let mut term = Terminal::new(10, 2);
    term.process(b"\x1b[38;2;300mX");
    assert_eq!(cells(&term, 1)[0].fg, Color::Rgb(255, 0, 0));
}

#[test]
fn normal_intensity_clears_bold_and_dim_only() {
    let mut term = Terminal::new(10, 2);
    term.process(b"\x1b[1;2;3mA\x1b[22mB");

    let cells = cells(&term, 2);
    assert!(cells[0].attrs.bold && cells[0].attrs.dim);
    assert_eq!(
        cells[1].attrs,
        Attributes {
            italic: true,
            ..Attributes::default()
        }
    );
}

#[test]
fn reset_keeps_character_protection() {
    let mut term = Terminal::new(10, 2);

    // DECSCA on, SGR 0, write; then DECSCA off
    term.process(b"\x1b[1\"q\x1b[4;31m\x1b[0mP\x1b[0\"qU");

    let cells = cells(&term, 2);
    assert_eq!(
        cells[0].attrs,
        Attributes {
            protected: true,
            ..Attributes::default()
        }
    );
    assert_eq!(cells[0].fg, Color::Default);
    assert!(!cells[1].attrs.protected);
}
