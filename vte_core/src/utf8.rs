//! Incremental UTF-8 decoder (spec §4.2).
//!
//! Active only while the recognizer is in `Ground`. Keeps `expected_length`
//! and a small buffer of pending continuation bytes, exactly the state shape
//! spec §3 names for the UTF-8 decoder.
//!
//! The reference parser instead batch-validates whole contiguous spans with
//! `simdutf8`, scanning ahead with `ansi::c0::first_index_of_c0` for the next
//! control byte before handing the rest to `simdutf8::basic::from_utf8`. That
//! approach cannot implement this spec's invalid-continuation recovery rule
//! (re-emit the buffered lead and continuation bytes one at a time, then
//! retry the rejecting byte from an idle decoder) because the recovery must
//! survive a `push_bytes` call boundary landing in the middle of a partial
//! sequence (Testable Property 3, concatenation) — something a
//! validate-then-slice batch API can't resume across. This module is a
//! from-scratch byte-at-a-time decoder; `simdutf8` is dropped as a
//! dependency (see DESIGN.md).

use std::char;

const MAX_CONTINUATIONS: usize = 3;

/// Up to 4 raw bytes (a lead byte plus up to 3 continuations) to be
/// re-emitted verbatim, one `NormalCharacter` per byte, during recovery.
#[derive(Debug, Clone, Copy)]
pub struct FlushedBytes {
    array: [u8; 1 + MAX_CONTINUATIONS],
    len: usize,
}

impl FlushedBytes {
    fn new() -> Self {
        Self {
            array: [0; 1 + MAX_CONTINUATIONS],
            len: 0,
        }
    }

    fn push(&mut self, byte: u8) {
        self.array[self.len] = byte;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.array[..self.len]
    }
}

/// Outcome of pushing one byte into the decoder.
#[derive(Debug)]
pub enum Utf8Event {
    /// A lead byte or continuation byte was consumed; the sequence isn't
    /// complete yet, nothing to emit.
    Pending,
    /// A full code point was decoded (the common case, and the only outcome
    /// for plain ASCII).
    CodePoint(char),
    /// `byte` was not a valid UTF-8 leading byte (spec: "the byte itself is
    /// emitted as NormalCharacter{code_point=b}", best-effort).
    Invalid(u8),
    /// A structurally complete sequence decoded to an invalid code point
    /// (overlong encoding, surrogate half, or beyond U+10FFFF). Recovered the
    /// same way as an invalid continuation: flush the bytes verbatim.
    InvalidSequence(FlushedBytes),
    /// A continuation byte didn't have the `10xxxxxx` pattern. Flush the
    /// buffered lead/continuation bytes verbatim, then retry `retry` against
    /// a freshly idle decoder (spec: "the current byte is retried from idle
    /// state").
    InvalidContinuation { flush: FlushedBytes, retry: u8 },
}

#[derive(Default)]
pub struct Utf8Decoder {
    lead: u8,
    /// Total length of the sequence in progress (2, 3, or 4); 0 means idle.
    expected_length: usize,
    continuations: [u8; MAX_CONTINUATIONS],
    continuations_len: usize,
}

impl Utf8Decoder {
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.expected_length == 0
    }

    fn start(&mut self, lead: u8, expected_length: usize) {
        self.lead = lead;
        self.expected_length = expected_length;
        self.continuations_len = 0;
    }

    fn flush_buffered(&self) -> FlushedBytes {
        let mut flushed = FlushedBytes::new();
        flushed.push(self.lead);
        for &b in &self.continuations[..self.continuations_len] {
            flushed.push(b);
        }
        flushed
    }

    /// Reset to idle, discarding any buffered partial sequence without
    /// emitting anything. Used when the recognizer leaves `Ground` for a
    /// control byte, so a stray lead byte can't contaminate what follows
    /// (spec §4.2: "MUST be reset ... not flushed").
    pub fn discard(&mut self) {
        self.expected_length = 0;
        self.continuations_len = 0;
    }

    /// Force emission of a partial sequence buffered at stream end. Unlike
    /// `discard`, this returns the bytes to emit rather than silently
    /// dropping them.
    pub fn flush_incomplete(&mut self) -> Option<FlushedBytes> {
        if self.is_idle() {
            return None;
        }
        let flushed = self.flush_buffered();
        self.discard();
        Some(flushed)
    }

    pub fn push(&mut self, byte: u8) -> Utf8Event {
        if self.is_idle() {
            if byte < 0x80 {
                return Utf8Event::CodePoint(byte as char);
            }
            let expected_length = match byte {
                0xC2..=0xDF => 2,
                0xE0..=0xEF => 3,
                0xF0..=0xF4 => 4,
                // 0x80..=0xC1 (stray continuation byte or overlong C0/C1
                // lead) and 0xF5..=0xFF (beyond the Unicode range) are not
                // valid lead bytes.
                _ => return Utf8Event::Invalid(byte),
            };
            self.start(byte, expected_length);
            return Utf8Event::Pending;
        }

        if byte & 0xC0 != 0x80 {
            let flush = self.flush_buffered();
            self.discard();
            return Utf8Event::InvalidContinuation { flush, retry: byte };
        }

        self.continuations[self.continuations_len] = byte;
        self.continuations_len += 1;

        if self.continuations_len + 1 != self.expected_length {
            return Utf8Event::Pending;
        }

        let mut bytes = [0u8; 4];
        bytes[0] = self.lead;
        bytes[1..1 + self.continuations_len].copy_from_slice(&self.continuations[..self.continuations_len]);
        let total = 1 + self.continuations_len;

        let event = match core::str::from_utf8(&bytes[..total]) {
            Ok(s) => Utf8Event::CodePoint(s.chars().next().expect("non-empty validated str")),
            Err(_) => Utf8Event::InvalidSequence(self.flush_buffered()),
        };
        self.discard();
        event
    }
}
