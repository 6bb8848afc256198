//! CSI Dispatcher (spec §4.5). Grounded on the reference parser's
//! CSI-entry/param/intermediate/ignore transitions for *when* a dispatch
//! fires at all; the command table itself is new — no file in the source
//! workspace implements this full command set in one place — organized per
//! `termwiz`'s `escape/csi.rs` one-match-per-final-byte idiom.

use crate::message::{
    CsiKind, CsiMessage, DeviceAttributesKind, EraseMode,
};
use crate::param::Params;

use log::{debug, trace};

pub struct CsiInput<'a> {
    pub params: &'a Params,
    pub private_marker: Option<u8>,
    pub intermediates: &'a [u8],
    pub final_byte: u8,
    pub raw: &'a [u8],
}

/// Returns `None` when the CSI §4.3 colon rule applies: a `:` separator was
/// used but the final byte isn't `m`, which behaves as if the sequence had
/// entered `CsiIgnore` (discarded, no message) rather than dispatching.
pub fn dispatch(input: CsiInput<'_>) -> Option<CsiMessage> {
    if input.params.had_colon_separator() && input.final_byte != b'm' {
        trace!("csi: colon separator used with non-SGR final byte, ignoring sequence");
        return None;
    }

    let raw: Box<[u8]> = Box::from(input.raw);
    let intermediates: Box<[u8]> = Box::from(input.intermediates);
    let parameters = input.params.to_vec();
    let private_marker = input.private_marker;
    let params = input.params;

    let (kind, implemented) = classify(
        input.final_byte,
        private_marker,
        input.intermediates,
        params,
    );

    Some(CsiMessage {
        kind,
        parameters,
        private_marker,
        intermediates,
        raw,
        implemented,
    })
}

fn count_default_1(params: &Params, index: usize) -> u32 {
    match params.get(index) {
        None | Some(0) => 1,
        Some(n) => n,
    }
}

fn classify(
    final_byte: u8,
    private_marker: Option<u8>,
    intermediates: &[u8],
    params: &Params,
) -> (CsiKind, bool) {
    match final_byte {
        b'A' => (CsiKind::CursorUp { count: count_default_1(params, 0) }, true),
        b'B' => (CsiKind::CursorDown { count: count_default_1(params, 0) }, true),
        b'C' => (CsiKind::CursorForward { count: count_default_1(params, 0) }, true),
        b'D' => (CsiKind::CursorBackward { count: count_default_1(params, 0) }, true),
        b'E' => (CsiKind::CursorNextLine { count: count_default_1(params, 0) }, true),
        b'F' => (CsiKind::CursorPrevLine { count: count_default_1(params, 0) }, true),
        b'G' => (CsiKind::CursorHorizontalAbsolute { column: count_default_1(params, 0) }, true),
        b'd' => (CsiKind::CursorVerticalAbsolute { row: count_default_1(params, 0) }, true),
        b'H' | b'f' => (
            CsiKind::CursorPosition {
                row: count_default_1(params, 0),
                column: count_default_1(params, 1),
            },
            true,
        ),
        b'J' => {
            let mode = EraseMode::from_param(params.get_or(0, 0));
            if private_marker == Some(b'?') {
                (CsiKind::SelectiveEraseInDisplay { mode }, true)
            } else {
                (CsiKind::EraseInDisplay { mode }, true)
            }
        }
        b'K' => {
            let mode = EraseMode::from_param(params.get_or(0, 0));
            if private_marker == Some(b'?') {
                (CsiKind::SelectiveEraseInLine { mode }, true)
            } else {
                (CsiKind::EraseInLine { mode }, true)
            }
        }
        b'L' => (CsiKind::InsertLines { count: count_default_1(params, 0) }, true),
        b'M' => {
            if private_marker.is_none()
                && intermediates.is_empty()
                && params.len() == 1
            {
                (CsiKind::UnknownViSequence { param: params.get_or(0, 0) }, false)
            } else {
                (CsiKind::DeleteLines { count: count_default_1(params, 0) }, true)
            }
        }
        b'@' => (CsiKind::InsertCharacters { count: count_default_1(params, 0) }, true),
        b'P' => (CsiKind::DeleteCharacters { count: count_default_1(params, 0) }, true),
        b'X' => (CsiKind::EraseCharacter { count: count_default_1(params, 0) }, true),
        b'S' => (CsiKind::ScrollUp { count: count_default_1(params, 0) }, true),
        b'T' => {
            if private_marker.is_some() || params.len() > 1 {
                debug!("csi: CSI > T / multi-param T is not scroll-down, recognized only");
                (CsiKind::Unknown, false)
            } else {
                (CsiKind::ScrollDown { count: count_default_1(params, 0) }, true)
            }
        }
        b'r' => (
            CsiKind::SetScrollRegion {
                top: params.get(0).filter(|&v| v != 0),
                bottom: params.get(1).filter(|&v| v != 0),
            },
            true,
        ),
        b's' => (CsiKind::SaveCursorPosition, true),
        b'u' => (CsiKind::RestoreCursorPosition, true),
        b'c' => {
            let kind = if private_marker == Some(b'>') {
                DeviceAttributesKind::Secondary
            } else {
                DeviceAttributesKind::Primary
            };
            (CsiKind::DeviceAttributes { kind }, true)
        }
        b'n' => {
            if private_marker == Some(b'?') && params.get_or(0, 0) == 26 {
                (CsiKind::CharacterSetQuery, true)
            } else if private_marker.is_none() && params.get_or(0, 0) == 6 {
                (CsiKind::CursorPositionReport, true)
            } else {
                (CsiKind::Unknown, false)
            }
        }
        b't' => {
            let operation = params.get_or(0, 0);
            let rest: Vec<u32> = params.values().skip(1).collect();
            if operation == 18 {
                (CsiKind::TerminalSizeQuery, true)
            } else {
                let implemented = matches!(
                    (operation, rest.first()),
                    (22, Some(&1)) | (22, Some(&2)) | (23, Some(&1)) | (23, Some(&2))
                );
                (
                    CsiKind::WindowManipulation {
                        operation,
                        params: rest,
                    },
                    implemented,
                )
            }
        }
        b'q' if intermediates == [b' '] => {
            let raw_style = params.get_or(0, 0);
            let style = if raw_style <= 6 { raw_style as u8 } else { 0 };
            (CsiKind::SetCursorStyle { style }, true)
        }
        b'h' | b'l' => mode_set_reset(final_byte == b'h', private_marker, params),
        b'm' => unreachable!("SGR final byte 'm' is delegated before classify() is reached"),
        _ => (CsiKind::Unknown, false),
    }
}

fn mode_set_reset(set: bool, private_marker: Option<u8>, params: &Params) -> (CsiKind, bool) {
    let modes: Vec<u32> = params
        .values()
        .filter(|&m| (1..=65535).contains(&m))
        .collect();

    if private_marker == Some(b'?') {
        if set {
            (CsiKind::DecModeSet { modes }, true)
        } else {
            (CsiKind::DecModeReset { modes }, true)
        }
    } else if private_marker.is_none() && modes == [4] {
        (CsiKind::InsertReplaceMode { insert: set }, true)
    } else if private_marker.is_none() {
        if set {
            (CsiKind::SetMode { modes }, true)
        } else {
            (CsiKind::ResetMode { modes }, true)
        }
    } else {
        (CsiKind::Unknown, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param;

    fn msg(params_text: &[u8], private_marker: Option<u8>, intermediates: &[u8], final_byte: u8) -> CsiMessage {
        let params = param::parse(params_text);
        dispatch(CsiInput {
            params: &params,
            private_marker,
            intermediates,
            final_byte,
            raw: b"",
        })
        .expect("not ignored")
    }

    #[test]
    fn cursor_up_default() {
        let m = msg(b"", None, &[], b'A');
        assert_eq!(m.kind, CsiKind::CursorUp { count: 1 });
    }

    #[test]
    fn cursor_up_explicit_count() {
        let m = msg(b"5", None, &[], b'A');
        assert_eq!(m.kind, CsiKind::CursorUp { count: 5 });
    }

    #[test]
    fn cursor_position() {
        let m = msg(b"10;20", None, &[], b'H');
        assert_eq!(
            m.kind,
            CsiKind::CursorPosition {
                row: 10,
                column: 20
            }
        );
    }

    #[test]
    fn dec_mode_set() {
        let m = msg(b"1;2", Some(b'?'), &[], b'h');
        assert_eq!(
            m.kind,
            CsiKind::DecModeSet {
                modes: vec![1, 2]
            }
        );
    }

    #[test]
    fn unknown_final_byte() {
        let m = msg(b"99", None, &[], b'z');
        assert_eq!(m.kind, CsiKind::Unknown);
        assert!(!m.implemented);
    }

    #[test]
    fn unknown_vi_sequence() {
        let m = msg(b"31", None, &[], b'M');
        assert_eq!(m.kind, CsiKind::UnknownViSequence { param: 31 });
        assert!(!m.implemented);
    }

    #[test]
    fn colon_separator_with_non_sgr_final_is_ignored() {
        let params = param::parse(b"4:3");
        let result = dispatch(CsiInput {
            params: &params,
            private_marker: None,
            intermediates: &[],
            final_byte: b'A',
            raw: b"",
        });
        assert!(result.is_none());
    }
}
