//! Property-based tests for the layout parser and the control-mode decoder.
//!
//! 1. The layout parser never panics, whatever the input.
//! 2. Printing a parsed layout reproduces the input exactly.
//! 3. Decoding is independent of how the stream is split into reads.

use bytes::BytesMut;
use proptest::prelude::*;
use trellis_test_utils::Transcript;
use trellis_tmux::{ControlDecoder, Layout, Notification};

fn layout_strategy() -> impl Strategy<Value = String> {
    let leaf = (1usize..300, 1usize..100, 0usize..300, 0usize..100, 0usize..1000)
        .prop_map(|(w, h, x, y, id)| format!("{w}x{h},{x},{y},{id}"));
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            1usize..300,
            1usize..100,
            0usize..300,
            0usize..100,
            any::<bool>(),
            prop::collection::vec(inner, 1..4),
        )
            .prop_map(|(w, h, x, y, horizontal, children)| {
                let (open, close) = if horizontal { ('{', '}') } else { ('[', ']') };
                format!("{w}x{h},{x},{y}{open}{}{close}", children.join(","))
            })
    })
}

fn decode_in_chunks(input: &[u8], chunks: &[usize]) -> Vec<Notification> {
    let mut decoder = ControlDecoder::new();
    let mut buf = BytesMut::new();
    let mut out = Vec::new();
    let mut rest = input;
    let mut sizes = chunks.iter().cycle();

    while !rest.is_empty() {
        let size = (*sizes.next().unwrap_or(&1)).clamp(1, rest.len());
        buf.extend_from_slice(&rest[..size]);
        rest = &rest[size..];
        while let Some(n) = decoder.decode(&mut buf).unwrap() {
            out.push(n);
        }
    }
    out
}

proptest! {
    #[test]
    fn parser_never_panics(input in ".{0,64}") {
        let _ = Layout::parse(&input);
        let _ = Layout::parse_with_checksum(&input);
    }

    #[test]
    fn parser_never_panics_on_layout_alphabet(input in "[0-9x,{}\\[\\]]{0,64}") {
        let _ = Layout::parse(&input);
    }

    #[test]
    fn printing_reproduces_input(input in layout_strategy()) {
        let layout = Layout::parse(&input).unwrap();
        prop_assert_eq!(layout.to_string(), input);
    }

    #[test]
    fn chunking_does_not_change_decoding(
        chunks in prop::collection::vec(1usize..16, 1..8),
        output in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let transcript = Transcript::new()
            .enter()
            .block("")
            .session_changed(3, "main")
            .output(3, &output)
            .block("one\ntwo\n")
            .error_block("bad")
            .exit();

        let whole = decode_in_chunks(transcript.as_bytes(), &[usize::MAX]);
        let split = decode_in_chunks(transcript.as_bytes(), &chunks);
        prop_assert_eq!(&whole, &split);
        prop_assert_eq!(whole.len(), 7);
        prop_assert_eq!(
            &whole[3],
            &Notification::Output { pane_id: 3, data: output.into() }
        );
    }
}
