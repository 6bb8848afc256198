//! End-to-end scenarios and universal properties (spec §8), driven through
//! the public `Parser`/`Handler` surface exactly as a collaborator would.

use vte_core::{
    ColorSpec, ControlCode, CsiKind, CsiMessage, DcsMessage, EscMessage, Handler, OscMessage,
    OscPayload, OscTerminator, Options, Parser, SgrAttribute, SgrSequence, UnderlineStyle,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Char(char, bool),
    Control(ControlCode),
    Esc(EscMessage2),
    Csi(CsiMessage2),
    Sgr(SgrMessage2),
    Osc(OscMessage2),
    Dcs(DcsMessage2),
}

// Thin, PartialEq-friendly projections of the real message structs (which
// carry `Box<[u8]>` raw buffers not worth comparing byte-for-byte in most
// assertions here).
#[derive(Debug, Clone, PartialEq)]
struct EscMessage2 {
    kind: vte_core::EscKind,
    implemented: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct CsiMessage2 {
    kind: CsiKind,
    parameters: Vec<u32>,
    private_marker: Option<u8>,
    implemented: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct SgrMessage2 {
    attributes: Vec<SgrAttribute>,
    implemented: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct OscMessage2 {
    payload: OscPayload,
    terminator: OscTerminator,
    implemented: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct DcsMessage2 {
    command: u8,
    implemented: bool,
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Handler for Recorder {
    fn normal_character(&mut self, code_point: char, is_utf8_sequence: bool) {
        self.events.push(Event::Char(code_point, is_utf8_sequence));
    }

    fn control_executed(&mut self, which: ControlCode) {
        self.events.push(Event::Control(which));
    }

    fn esc_message(&mut self, message: EscMessage) {
        self.events.push(Event::Esc(EscMessage2 {
            kind: message.kind,
            implemented: message.implemented,
        }));
    }

    fn csi_message(&mut self, message: CsiMessage) {
        self.events.push(Event::Csi(CsiMessage2 {
            kind: message.kind,
            parameters: message.parameters,
            private_marker: message.private_marker,
            implemented: message.implemented,
        }));
    }

    fn sgr_sequence(&mut self, message: SgrSequence) {
        self.events.push(Event::Sgr(SgrMessage2 {
            attributes: message.messages.into_iter().map(|m| m.attribute).collect(),
            implemented: message.implemented,
        }));
    }

    fn osc_message(&mut self, message: OscMessage) {
        self.events.push(Event::Osc(OscMessage2 {
            payload: message.payload,
            terminator: message.terminator,
            implemented: message.implemented,
        }));
    }

    fn dcs_message(&mut self, message: DcsMessage) {
        self.events.push(Event::Dcs(DcsMessage2 {
            command: message.command,
            implemented: message.implemented,
        }));
    }
}

fn run(bytes: &[u8]) -> Vec<Event> {
    let mut parser = Parser::new(Options::default());
    let mut recorder = Recorder::default();
    parser.push_bytes(&mut recorder, bytes);
    recorder.events
}

// ---- S1..S9 ------------------------------------------------------------

#[test]
fn s1_cursor_up_with_count() {
    let events = run(b"\x1b[5A");
    assert_eq!(
        events,
        vec![Event::Csi(CsiMessage2 {
            kind: CsiKind::CursorUp { count: 5 },
            parameters: vec![5],
            private_marker: None,
            implemented: true,
        })]
    );
}

#[test]
fn s2_cursor_position() {
    let events = run(b"\x1b[10;20H");
    assert_eq!(
        events,
        vec![Event::Csi(CsiMessage2 {
            kind: CsiKind::CursorPosition { row: 10, column: 20 },
            parameters: vec![10, 20],
            private_marker: None,
            implemented: true,
        })]
    );
}

#[test]
fn s3_dec_mode_set() {
    let events = run(b"\x1b[?1;2h");
    assert_eq!(
        events,
        vec![Event::Csi(CsiMessage2 {
            kind: CsiKind::DecModeSet { modes: vec![1, 2] },
            parameters: vec![1, 2],
            private_marker: Some(b'?'),
            implemented: true,
        })]
    );
}

#[test]
fn s4_sgr_rgb_foreground() {
    let events = run(b"\x1b[38;2;255;0;0m");
    assert_eq!(
        events,
        vec![Event::Sgr(SgrMessage2 {
            attributes: vec![SgrAttribute::ForegroundColor(ColorSpec::Rgb { r: 255, g: 0, b: 0 })],
            implemented: true,
        })]
    );
}

#[test]
fn s5_sgr_colon_underline_style() {
    let events = run(b"\x1b[4:3m");
    assert_eq!(
        events,
        vec![Event::Sgr(SgrMessage2 {
            attributes: vec![SgrAttribute::Underline(UnderlineStyle::Curly)],
            implemented: true,
        })]
    );
}

#[test]
fn s6_osc_set_title_and_icon() {
    let events = run(b"\x1b]0;Test\x07");
    assert_eq!(
        events,
        vec![Event::Osc(OscMessage2 {
            payload: OscPayload::SetTitleAndIcon { title: "Test".to_string() },
            terminator: OscTerminator::Bel,
            implemented: true,
        })]
    );
}

#[test]
fn s7_utf8_decode_and_recovery() {
    assert_eq!(run(&[0xC3, 0xA9]), vec![Event::Char('\u{00E9}', true)]);
    assert_eq!(
        run(&[0xC3, 0x41]),
        vec![Event::Char('\u{00C3}', false), Event::Char('A', false)]
    );
}

#[test]
fn s8_unknown_csi_final_byte() {
    let events = run(b"\x1b[99z");
    assert_eq!(
        events,
        vec![Event::Csi(CsiMessage2 {
            kind: CsiKind::Unknown,
            parameters: vec![99],
            private_marker: None,
            implemented: false,
        })]
    );
}

#[test]
fn s9_can_cancels_with_no_message() {
    let events = run(b"\x1b[31\x18");
    assert!(events.is_empty());

    // parser must be back in Ground: the next ordinary byte prints.
    let mut parser = Parser::new(Options::default());
    let mut recorder = Recorder::default();
    parser.push_bytes(&mut recorder, b"\x1b[31\x18A");
    assert_eq!(recorder.events, vec![Event::Char('A', false)]);
}

// ---- Universal properties -----------------------------------------------

#[test]
fn never_blocks_on_arbitrary_bytes() {
    // A pseudo-random-looking but deterministic byte soup; this just has to
    // terminate and not panic.
    let bytes: Vec<u8> = (0u32..4096).map(|i| ((i * 2654435761) % 256) as u8).collect();
    let _ = run(&bytes);
}

#[test]
fn determinism() {
    let bytes = b"\x1b[1;31mhi\x1b[0m\x1b]0;title\x07caf\xc3\xa9";
    assert_eq!(run(bytes), run(bytes));
}

#[test]
fn concatenation_is_split_invariant() {
    let input: &[u8] = b"\x1b[38;2;1;2;3mcaf\xc3\xa9\x1b]8;id=1;https://x\x1b\\link\x1b]8;;\x1b\\\x1b[5A";
    let whole = run(input);

    for split in 0..=input.len() {
        let mut parser = Parser::new(Options::default());
        let mut recorder = Recorder::default();
        parser.push_bytes(&mut recorder, &input[..split]);
        parser.push_bytes(&mut recorder, &input[split..]);
        assert_eq!(recorder.events, whole, "split at {split} diverged");
    }
}

#[test]
fn ground_recovery_via_can() {
    // Interrupt every kind of in-flight recognition with CAN; in each case
    // the following `A` must print normally, proving Ground + empty buffers.
    let openers: &[&[u8]] = &[
        b"\x1b",
        b"\x1b[",
        b"\x1b[1;2",
        b"\x1b]0;partial",
        b"\x1bP1q partial",
        b"\x1b(",
    ];
    for opener in openers {
        let mut parser = Parser::new(Options::default());
        let mut recorder = Recorder::default();
        parser.push_bytes(&mut recorder, opener);
        parser.push_byte(&mut recorder, 0x18); // CAN
        recorder.events.clear();
        parser.push_byte(&mut recorder, b'A');
        assert_eq!(recorder.events, vec![Event::Char('A', false)], "opener {opener:?}");
    }
}

#[test]
fn csi_parameters_round_trip() {
    let events = run(b"\x1b[?5;10:20 A");
    // `:` forces CsiIgnore for a non-SGR final byte (spec §4.3) so nothing
    // is emitted; assert that explicitly rather than asserting a round-trip
    // that can't happen for this input.
    assert!(events.is_empty());

    let events = run(b"\x1b[5;10H");
    assert_eq!(
        events,
        vec![Event::Csi(CsiMessage2 {
            kind: CsiKind::CursorPosition { row: 5, column: 10 },
            parameters: vec![5, 10],
            private_marker: None,
            implemented: true,
        })]
    );
}

#[test]
fn sgr_concatenation_equivalence() {
    let split = run(b"\x1b[0m\x1b[1m");
    let combined = run(b"\x1b[0;1m");

    let split_attrs: Vec<SgrAttribute> = split
        .into_iter()
        .flat_map(|e| match e {
            Event::Sgr(s) => s.attributes,
            _ => vec![],
        })
        .collect();
    let combined_attrs: Vec<SgrAttribute> = match &combined[0] {
        Event::Sgr(s) => s.attributes.clone(),
        _ => panic!("expected a single SgrSequence"),
    };

    assert_eq!(split_attrs, combined_attrs);
}

#[test]
fn utf8_idempotence() {
    let text = "caf\u{00e9} na\u{00efve \u{4f60}\u{597d} \u{1f600}";
    let events = run(text.as_bytes());
    let decoded: String = events
        .into_iter()
        .map(|e| match e {
            Event::Char(c, _) => c,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(decoded, text);
}

#[test]
fn four_byte_utf8_with_continuations_in_the_c1_range() {
    // U+1F600 = F0 9F 98 80; the two middle continuation bytes fall in
    // 0x80..=0x9F, the same range `classify` maps to `ByteClass::C1` — they
    // must reach the UTF-8 decoder in `Ground`, not get stolen as C1
    // introducers.
    let events = run(&[0xF0, 0x9F, 0x98, 0x80]);
    assert_eq!(events, vec![Event::Char('\u{1f600}', true)]);
}

// ---- Additional coverage beyond the literal scenarios -------------------

#[test]
fn dcs_passthrough_with_st_terminator() {
    let events = run(b"\x1bP1$q\"p\x1b\\");
    match &events[0] {
        Event::Dcs(d) => {
            assert_eq!(d.command, b'q');
            assert!(!d.implemented);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn dcs_esc_not_followed_by_backslash_abandons_sequence() {
    // ESC inside a DCS passthrough that isn't followed by `\` cancels the
    // DCS silently and restarts a fresh Escape recognition (SPEC_FULL §4.10).
    let events = run(b"\x1bP1q payload\x1b[5A");
    assert_eq!(
        events,
        vec![Event::Csi(CsiMessage2 {
            kind: CsiKind::CursorUp { count: 5 },
            parameters: vec![5],
            private_marker: None,
            implemented: true,
        })]
    );
}

#[test]
fn osc_escape_lookahead_resumes_on_non_terminator_byte() {
    // ESC inside OSC followed by something other than `\` resumes the OSC
    // string with that byte appended, rather than terminating it.
    let events = run(b"\x1b]0;ab\x1bcd\x07");
    assert_eq!(
        events,
        vec![Event::Osc(OscMessage2 {
            payload: OscPayload::SetTitleAndIcon {
                title: "abcd".to_string()
            },
            terminator: OscTerminator::Bel,
            implemented: true,
        })]
    );
}

#[test]
fn c1_csi_introducer_behaves_like_esc_bracket() {
    let events = run(&[0x9B, b'5', b'A']);
    assert_eq!(
        events,
        vec![Event::Csi(CsiMessage2 {
            kind: CsiKind::CursorUp { count: 5 },
            parameters: vec![5],
            private_marker: None,
            implemented: true,
        })]
    );
}

#[test]
fn control_codes_execute_in_ground() {
    let events = run(b"\x07\x08\x09\x0A\x0C\x0D");
    assert_eq!(
        events,
        vec![
            Event::Control(ControlCode::Bell),
            Event::Control(ControlCode::Backspace),
            Event::Control(ControlCode::Tab),
            Event::Control(ControlCode::LineFeed),
            Event::Control(ControlCode::FormFeed),
            Event::Control(ControlCode::CarriageReturn),
        ]
    );
}

#[test]
fn reset_returns_to_ground_mid_sequence() {
    let mut parser = Parser::new(Options::default());
    let mut recorder = Recorder::default();
    parser.push_bytes(&mut recorder, b"\x1b[1;2");
    parser.reset();
    recorder.events.clear();
    parser.push_byte(&mut recorder, b'A');
    assert_eq!(recorder.events, vec![Event::Char('A', false)]);
}
