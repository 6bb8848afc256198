//! The Parser (spec §3/§4/§5): the byte-driven recognizer that threads every
//! incoming byte through the VT500-series state machine, feeding completed
//! sequences to the dispatch modules and forwarding every resulting typed
//! message to a caller-supplied `Handler`.
//!
//! Grounded on the reference parser's `Parser::advance` driving loop (one
//! byte at a time, `Executor` callbacks invoked inline, no intermediate
//! allocation on the hot path) and its `table::change_state` transition
//! shape, generalized into the explicit per-state methods this core's richer
//! transitions need (see `state.rs`'s doc comment for why).

use crate::classify::{classify, gl_fold, ByteClass};
use crate::dispatch::{csi, dcs, esc, osc, sgr};
use crate::message::{ControlCode, OscTerminator};
use crate::sequence::Sequence;
use crate::state::State;
use crate::utf8::{Utf8Decoder, Utf8Event};

use log::trace;

/// Resource limits and feature toggles (spec §6.3). There is deliberately no
/// builder: every field is public and `..Default::default()` covers the
/// common case, matching the reference parser's plain `Options` struct.
#[derive(Debug, Clone)]
pub struct Options {
    /// Caps the OSC/DCS payload buffer. A payload at or beyond this length is
    /// reported as overflowed: OSC dispatch degrades to an empty, unimplemented
    /// `Opaque`; DCS dispatch still emits a message but against a truncated
    /// payload (spec §3, §5).
    pub max_osc_payload_length: usize,
    /// Caps how many `;`/`:`-delimited parameter values are kept per
    /// sequence; the parser never allocates a list larger than this cap
    /// (`param::MAX_PARAMS` is the hard ceiling this is clamped to — spec §5).
    pub max_parameters: usize,
    /// When true, a C0 control arriving while an ESC/CSI/DCS-header
    /// recognition is in flight is executed immediately without aborting the
    /// recognition (default true, spec §4.3).
    pub process_c0_during_escape_sequence: bool,
    /// When true, a byte with no grammatical effect in its current
    /// non-`Ground` state (e.g. DEL inside CSI) is still surfaced to the
    /// handler as `normal_character` instead of being silently dropped.
    pub emit_normal_bytes_during_escape_sequence: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_osc_payload_length: 1024,
            max_parameters: crate::param::MAX_PARAMS,
            process_c0_during_escape_sequence: true,
            emit_normal_bytes_during_escape_sequence: false,
        }
    }
}

/// Slack added on top of `max_osc_payload_length` for the raw-byte buffer,
/// which also carries introducer/terminator/intermediate/parameter bytes
/// beyond just the payload span itself.
const RAW_OVERHEAD: usize = 64;
const MIN_RAW_CAPACITY: usize = 4096;

fn control_code_for(byte: u8) -> Option<ControlCode> {
    match byte {
        0x07 => Some(ControlCode::Bell),
        0x08 => Some(ControlCode::Backspace),
        0x09 => Some(ControlCode::Tab),
        0x0A => Some(ControlCode::LineFeed),
        0x0C => Some(ControlCode::FormFeed),
        0x0D => Some(ControlCode::CarriageReturn),
        0x0E => Some(ControlCode::ShiftOut),
        0x0F => Some(ControlCode::ShiftIn),
        _ => None,
    }
}

/// Egress: one method per message family, plus a specific callback for each
/// of the six named C0 controls alongside the generic `control_executed`
/// (spec §6). Every method defaults to a no-op, the same convention the
/// reference parser's `Executor` trait uses, so a collaborator only
/// implements the families it cares about.
#[allow(unused_variables)]
pub trait Handler {
    fn normal_character(&mut self, code_point: char, is_utf8_sequence: bool) {}

    fn control_executed(&mut self, which: ControlCode) {}
    fn bell(&mut self) {}
    fn backspace(&mut self) {}
    fn tab(&mut self) {}
    fn line_feed(&mut self) {}
    fn form_feed(&mut self) {}
    fn carriage_return(&mut self) {}

    fn esc_message(&mut self, message: crate::message::EscMessage) {}
    fn csi_message(&mut self, message: crate::message::CsiMessage) {}
    fn sgr_sequence(&mut self, message: crate::message::SgrSequence) {}
    fn osc_message(&mut self, message: crate::message::OscMessage) {}
    fn dcs_message(&mut self, message: crate::message::DcsMessage) {}
}

/// The incremental, push-driven recognizer (spec §1/§3). Holds no reference
/// to its `Handler`; one is passed to each ingress call, so the same parser
/// can be driven by different handlers across calls if a caller wants that.
pub struct Parser {
    options: Options,
    state: State,
    sequence: Sequence,
    utf8: Utf8Decoder,
    /// Set when an ESC was seen while collecting a DCS payload (`DcsPassthrough`
    /// or `DcsIgnore`): the next byte decides whether that ESC began a valid
    /// `ESC \` string terminator or abandons the DCS entirely (SPEC_FULL.md
    /// §4.10). An auxiliary bit rather than a new public state, since from the
    /// public state-machine's point of view this is still "in Escape".
    dcs_pending_st: bool,
}

impl Parser {
    pub fn new(options: Options) -> Self {
        let max_raw = options.max_osc_payload_length.max(MIN_RAW_CAPACITY) + RAW_OVERHEAD;
        let max_payload = options.max_osc_payload_length;
        Self {
            sequence: Sequence::new(max_raw, max_payload),
            utf8: Utf8Decoder::default(),
            dcs_pending_st: false,
            state: State::Ground,
            options,
        }
    }

    /// Forget all in-flight recognition state and return to `Ground`, as if
    /// construction had just happened. Does not touch `self.options`.
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.sequence.clear();
        self.sequence.reset_raw();
        self.utf8.discard();
        self.dcs_pending_st = false;
    }

    pub fn push_bytes<H: Handler>(&mut self, handler: &mut H, bytes: &[u8]) {
        for &byte in bytes {
            self.push_byte(handler, byte);
        }
    }

    /// Forces emission of a UTF-8 sequence left incomplete at stream end
    /// (spec §4.2's `flush_incomplete`). A no-op if the decoder is idle or the
    /// recognizer isn't in `Ground` (the decoder only ever holds state there).
    pub fn flush<H: Handler>(&mut self, handler: &mut H) {
        if let Some(flushed) = self.utf8.flush_incomplete() {
            for &b in flushed.as_slice() {
                handler.normal_character(b as char, false);
            }
        }
    }

    pub fn push_byte<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        if self.dcs_pending_st {
            self.dcs_pending_st = false;
            if byte == 0x5C {
                self.sequence.push_raw(byte);
                self.finish_dcs(handler, OscTerminator::St);
                return;
            }
            // The ESC that set this flag did not lead to a string terminator;
            // the DCS in flight is abandoned and `byte` is reprocessed as the
            // first byte following a fresh ESC (`self.state` is already
            // `Escape` from the lookahead that set this flag).
            self.sequence.clear();
            self.sequence.reset_raw();
            self.sequence.push_raw(0x1B);
        }

        // CAN/SUB cancel any in-flight sequence from any state, emit
        // nothing, and return to Ground (spec §4.3's "anywhere" rules).
        if byte == 0x18 || byte == 0x1A {
            self.cancel();
            return;
        }

        // ESC: two in-flight states intercept it before the generic
        // "anywhere" rule applies (spec §4.3, §4.10).
        if byte == 0x1B {
            match self.state {
                State::OscString => {
                    self.sequence.push_raw(byte);
                    self.state = State::OscEscape;
                }
                State::DcsPassthrough | State::DcsIgnore => {
                    self.sequence.push_raw(byte);
                    self.dcs_pending_st = true;
                    self.state = State::Escape;
                }
                _ => {
                    self.sequence.clear();
                    self.sequence.reset_raw();
                    self.sequence.push_raw(byte);
                    self.state = State::Escape;
                }
            }
            return;
        }

        // C1 control bytes (8-bit equivalents of the ESC introducers) are
        // recognized from any non-`Ground` state. In `Ground`, 0x80..=0x9F
        // is GR territory feeding the UTF-8 decoder instead (spec §4.1: "In
        // Ground, GR combined with 0x80+ continuation bytes drives the
        // UTF-8 decoder") — a multi-byte sequence like `F0 9F 98 80`
        // (U+1F600) has its continuation bytes fall in this very range, and
        // they must reach `feed_utf8`, not be stolen as C1 introducers.
        if self.state != State::Ground {
            if let ByteClass::C1 = classify(byte) {
                self.handle_c1(handler, byte);
                return;
            }
        }

        match self.state {
            State::Ground => self.feed_ground(handler, byte),
            State::Escape => self.feed_escape(handler, byte),
            State::EscapeIntermediate => self.feed_escape_intermediate(handler, byte),
            State::CsiEntry | State::CsiParam | State::CsiIntermediate | State::CsiIgnore => {
                self.feed_csi(handler, byte)
            }
            State::DcsEntry | State::DcsParam | State::DcsIntermediate => {
                self.feed_dcs_header(byte)
            }
            State::DcsPassthrough | State::DcsIgnore => self.feed_dcs_body(byte),
            State::OscString => self.feed_osc_string(handler, byte),
            State::OscEscape => self.feed_osc_escape(handler, byte),
            State::SosPmApcString => self.feed_sos_pm_apc(byte),
        }
    }

    fn cancel(&mut self) {
        self.cancel_silent();
        self.utf8.discard();
        self.state = State::Ground;
    }

    fn cancel_silent(&mut self) {
        self.sequence.clear();
        self.sequence.reset_raw();
        self.dcs_pending_st = false;
    }

    fn clear_and_ground(&mut self) {
        self.sequence.clear();
        self.sequence.reset_raw();
        self.state = State::Ground;
    }

    fn dispatch_control<H: Handler>(&mut self, handler: &mut H, which: ControlCode) {
        match which {
            ControlCode::Bell => handler.bell(),
            ControlCode::Backspace => handler.backspace(),
            ControlCode::Tab => handler.tab(),
            ControlCode::LineFeed => handler.line_feed(),
            ControlCode::FormFeed => handler.form_feed(),
            ControlCode::CarriageReturn => handler.carriage_return(),
            ControlCode::ShiftIn | ControlCode::ShiftOut => {}
        }
        handler.control_executed(which);
    }

    /// C0/BEL bytes arriving mid-recognition (ESC/CSI states): executes them
    /// in place when `process_c0_during_escape_sequence` is set, without
    /// leaving the current state. Returns whether `eff` was a C0/BEL byte at
    /// all (and therefore handled here one way or another).
    fn maybe_execute_c0<H: Handler>(&mut self, handler: &mut H, eff: u8) -> bool {
        if !matches!(classify(eff), ByteClass::C0 | ByteClass::Bel) {
            return false;
        }
        if self.options.process_c0_during_escape_sequence {
            match control_code_for(eff) {
                Some(code) => self.dispatch_control(handler, code),
                None => trace!("parser: unmapped C0 executed mid-sequence byte={eff:#04x}"),
            }
        }
        true
    }

    fn maybe_emit_ignored<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        if self.options.emit_normal_bytes_during_escape_sequence {
            handler.normal_character(byte as char, false);
        }
    }

    // ---- C1 (8-bit) introducers --------------------------------------

    fn handle_c1<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        match byte {
            0x9B => {
                self.cancel_silent();
                self.sequence.push_raw(byte);
                self.state = State::CsiEntry;
            }
            0x9D => {
                self.cancel_silent();
                self.sequence.push_raw(byte);
                self.state = State::OscString;
            }
            0x90 => {
                self.cancel_silent();
                self.sequence.push_raw(byte);
                self.state = State::DcsEntry;
            }
            0x98 | 0x9E | 0x9F => {
                self.cancel_silent();
                self.sequence.push_raw(byte);
                self.state = State::SosPmApcString;
            }
            0x9C => {
                match self.state {
                    State::OscString | State::OscEscape => {
                        self.sequence.push_raw(byte);
                        self.finish_osc(handler, OscTerminator::St);
                    }
                    State::DcsPassthrough | State::DcsIgnore => {
                        self.sequence.push_raw(byte);
                        self.finish_dcs(handler, OscTerminator::St);
                    }
                    _ => self.cancel_silent(),
                }
                self.state = State::Ground;
            }
            _ => {
                // 0x80..=0x8F | 0x91..=0x97 | 0x99 | 0x9A: no named
                // `ControlCode` exists for these; recognized and discarded.
                trace!("parser: unmapped C1 executed byte={byte:#04x}");
                self.cancel_silent();
                self.state = State::Ground;
            }
        }
    }

    // ---- Ground / UTF-8 ------------------------------------------------

    fn feed_ground<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        match classify(byte) {
            ByteClass::Bel => self.dispatch_control(handler, ControlCode::Bell),
            ByteClass::Del => {}
            ByteClass::C0 => match control_code_for(byte) {
                Some(code) => self.dispatch_control(handler, code),
                None => trace!("parser: unmapped C0 executed in Ground byte={byte:#04x}"),
            },
            _ => self.feed_utf8(handler, byte),
        }
    }

    fn feed_utf8<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        match self.utf8.push(byte) {
            Utf8Event::Pending => {}
            Utf8Event::CodePoint(c) => {
                let is_utf8_sequence = (c as u32) >= 0x80;
                handler.normal_character(c, is_utf8_sequence);
            }
            Utf8Event::Invalid(b) => handler.normal_character(b as char, false),
            Utf8Event::InvalidSequence(flushed) => {
                for &b in flushed.as_slice() {
                    handler.normal_character(b as char, false);
                }
            }
            Utf8Event::InvalidContinuation { flush, retry } => {
                for &b in flush.as_slice() {
                    handler.normal_character(b as char, false);
                }
                self.feed_utf8(handler, retry);
            }
        }
    }

    // ---- Escape ----------------------------------------------------------

    fn feed_escape<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        let eff = gl_fold(byte);
        if self.maybe_execute_c0(handler, eff) {
            return;
        }
        if eff == 0x7F {
            self.maybe_emit_ignored(handler, byte);
            return;
        }
        self.sequence.push_raw(byte);

        match eff {
            0x5B => self.state = State::CsiEntry,
            0x5D => self.state = State::OscString,
            0x50 => self.state = State::DcsEntry,
            0x58 | 0x5E | 0x5F => self.state = State::SosPmApcString,
            0x20..=0x2F => {
                self.sequence.intermediates.push(eff);
                self.state = State::EscapeIntermediate;
            }
            0x30..=0x7E => self.finish_esc(handler, eff),
            _ => {}
        }
    }

    fn feed_escape_intermediate<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        let eff = gl_fold(byte);
        if self.maybe_execute_c0(handler, eff) {
            return;
        }
        if eff == 0x7F {
            self.maybe_emit_ignored(handler, byte);
            return;
        }
        self.sequence.push_raw(byte);

        match eff {
            0x20..=0x2F => self.sequence.intermediates.push(eff),
            0x30..=0x7E => self.finish_esc(handler, eff),
            _ => {}
        }
    }

    fn finish_esc<H: Handler>(&mut self, handler: &mut H, final_byte: u8) {
        let msg = esc::dispatch(
            self.sequence.intermediates.as_slice(),
            final_byte,
            Box::from(self.sequence.raw()),
        );
        handler.esc_message(msg);
        self.clear_and_ground();
    }

    // ---- CSI ---------------------------------------------------------

    fn feed_csi<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        let eff = gl_fold(byte);
        if self.maybe_execute_c0(handler, eff) {
            return;
        }
        if eff == 0x7F {
            self.maybe_emit_ignored(handler, byte);
            return;
        }
        self.sequence.push_raw(byte);

        match (self.state, eff) {
            (State::CsiEntry, 0x20..=0x2F) | (State::CsiParam, 0x20..=0x2F) => {
                self.sequence.intermediates.push(eff);
                self.state = State::CsiIntermediate;
            }
            (State::CsiIntermediate, 0x20..=0x2F) => self.sequence.intermediates.push(eff),
            (State::CsiIgnore, 0x40..=0x7E) => self.clear_and_ground(),
            (_, 0x40..=0x7E) => self.finish_csi(handler, eff),
            (State::CsiEntry, 0x30..=0x3B) | (State::CsiParam, 0x30..=0x3B) => {
                self.sequence.push_param_byte(eff);
                self.state = State::CsiParam;
            }
            (State::CsiEntry, 0x3C..=0x3F) => {
                self.sequence.private_marker = Some(eff);
                self.state = State::CsiParam;
            }
            (State::CsiParam, 0x3C..=0x3F) | (State::CsiIntermediate, 0x30..=0x3F) => {
                self.state = State::CsiIgnore;
            }
            _ => {} // CsiIgnore swallowing further 0x20..=0x3F bytes.
        }
    }

    fn finish_csi<H: Handler>(&mut self, handler: &mut H, final_byte: u8) {
        let params = self.sequence.parse_params();

        if final_byte == b'm' {
            let seq = sgr::dispatch(
                &params,
                self.sequence.private_marker,
                self.sequence.intermediates.as_slice(),
                Box::from(self.sequence.raw()),
            );
            handler.sgr_sequence(seq);
        } else {
            let msg = csi::dispatch(csi::CsiInput {
                params: &params,
                private_marker: self.sequence.private_marker,
                intermediates: self.sequence.intermediates.as_slice(),
                final_byte,
                raw: self.sequence.raw(),
            });
            if let Some(msg) = msg {
                handler.csi_message(msg);
            }
        }
        self.clear_and_ground();
    }

    // ---- DCS ------------------------------------------------------------

    fn feed_dcs_header(&mut self, byte: u8) {
        let eff = gl_fold(byte);
        self.sequence.push_raw(byte);

        if matches!(classify(eff), ByteClass::C0) || eff == 0x7F {
            return; // Ignored in DCS header states, not executed.
        }

        match (self.state, eff) {
            (State::DcsEntry, 0x20..=0x2F) | (State::DcsParam, 0x20..=0x2F) => {
                self.sequence.intermediates.push(eff);
                self.state = State::DcsIntermediate;
            }
            (State::DcsIntermediate, 0x20..=0x2F) => self.sequence.intermediates.push(eff),
            (State::DcsEntry, 0x30..=0x39) | (State::DcsEntry, 0x3B)
            | (State::DcsParam, 0x30..=0x39) | (State::DcsParam, 0x3B) => {
                self.sequence.push_param_byte(eff);
                self.state = State::DcsParam;
            }
            (State::DcsEntry, 0x3C..=0x3F) => {
                self.sequence.private_marker = Some(eff);
                self.state = State::DcsParam;
            }
            (State::DcsEntry, 0x3A)
            | (State::DcsParam, 0x3A)
            | (State::DcsParam, 0x3C..=0x3F)
            | (State::DcsIntermediate, 0x30..=0x3F) => {
                self.state = State::DcsIgnore;
            }
            (_, 0x40..=0x7E) => {
                self.sequence.dcs_command = Some(eff);
                self.state = State::DcsPassthrough;
            }
            _ => {}
        }
    }

    fn feed_dcs_body(&mut self, byte: u8) {
        self.sequence.push_raw(byte);
        if self.state == State::DcsIgnore {
            return; // Everything ignored until ST/CAN/SUB/ESC-cancel.
        }
        if byte == 0x7F {
            return;
        }
        self.sequence.push_payload(byte);
    }

    fn finish_dcs<H: Handler>(&mut self, handler: &mut H, terminator: OscTerminator) {
        let params = self.sequence.parse_params();
        let msg = dcs::dispatch(dcs::DcsInput {
            command: self.sequence.dcs_command.unwrap_or(0),
            private_marker: self.sequence.private_marker,
            intermediates: self.sequence.intermediates.as_slice(),
            params: &params,
            payload: self.sequence.payload(),
            terminator,
            raw: self.sequence.raw(),
        });
        handler.dcs_message(msg);
        self.clear_and_ground();
    }

    // ---- OSC --------------------------------------------------------

    fn feed_osc_string<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        self.sequence.push_raw(byte);
        match byte {
            0x07 => self.finish_osc(handler, OscTerminator::Bel),
            0x00..=0x06 | 0x08..=0x17 | 0x19 | 0x1C..=0x1F | 0x7F => {}
            0x20..=0x7E | 0xA0..=0xFF => self.sequence.push_payload(byte),
            _ => {} // 0x1B/0x80..=0x9F already intercepted before reaching here.
        }
    }

    fn feed_osc_escape<H: Handler>(&mut self, handler: &mut H, byte: u8) {
        self.sequence.push_raw(byte);
        match byte {
            0x5C => self.finish_osc(handler, OscTerminator::St),
            0x07 => self.finish_osc(handler, OscTerminator::Bel),
            _ => {
                self.sequence.push_payload(byte);
                self.state = State::OscString;
            }
        }
    }

    fn finish_osc<H: Handler>(&mut self, handler: &mut H, terminator: OscTerminator) {
        let overflowed = self.sequence.payload_overflowed();
        let msg = osc::dispatch(
            self.sequence.payload(),
            terminator,
            Box::from(self.sequence.raw()),
            overflowed,
        );
        handler.osc_message(msg);
        self.clear_and_ground();
    }

    // ---- SOS/PM/APC -------------------------------------------------

    fn feed_sos_pm_apc(&mut self, byte: u8) {
        // Recognized but entirely inert (spec §1's scope excludes these
        // string types beyond recognizing their envelope); no message is
        // ever produced, and no payload is retained.
        self.sequence.push_raw(byte);
    }
}
