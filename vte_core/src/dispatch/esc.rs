//! ESC Dispatcher (spec §4.3's ESC-state rules, summarized again in §3's
//! `EscKind` catalogue). Grounded on the reference parser's
//! `Escape`/`EscapeIntermediate` table arms for which final bytes are
//! recognized at all; the mapping to named, typed kinds is new (the
//! reference parser only ever produced an opaque `esc_dispatch` callback).

use crate::message::{CharsetSlot, EscKind, EscMessage};

pub fn dispatch(intermediates: &[u8], final_byte: u8, raw: Box<[u8]>) -> EscMessage {
    if let [designator] = intermediates {
        if let Some(slot) = charset_slot(*designator) {
            return EscMessage {
                kind: EscKind::DesignateCharacterSet {
                    slot,
                    charset: final_byte,
                },
                raw,
                implemented: true,
            };
        }
    }

    if intermediates.is_empty() {
        let (kind, implemented) = match final_byte {
            b'7' => (EscKind::SaveCursor, true),
            b'8' => (EscKind::RestoreCursor, true),
            b'D' => (EscKind::Index, true),
            b'M' => (EscKind::ReverseIndex, true),
            b'E' => (EscKind::NextLine, true),
            b'H' => (EscKind::HorizontalTabSet, true),
            b'c' => (EscKind::ResetToInitialState, true),
            _ => (EscKind::Opaque, false),
        };
        return EscMessage {
            kind,
            raw,
            implemented,
        };
    }

    EscMessage {
        kind: EscKind::Opaque,
        raw,
        implemented: false,
    }
}

fn charset_slot(designator: u8) -> Option<CharsetSlot> {
    match designator {
        b'(' => Some(CharsetSlot::G0),
        b')' => Some(CharsetSlot::G1),
        b'*' => Some(CharsetSlot::G2),
        b'+' => Some(CharsetSlot::G3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_cursor() {
        let msg = dispatch(&[], b'7', Box::from(&b"\x1b7"[..]));
        assert_eq!(msg.kind, EscKind::SaveCursor);
        assert!(msg.implemented);
    }

    #[test]
    fn designate_charset() {
        let msg = dispatch(&[b'('], b'B', Box::from(&b"\x1b(B"[..]));
        assert_eq!(
            msg.kind,
            EscKind::DesignateCharacterSet {
                slot: CharsetSlot::G0,
                charset: b'B'
            }
        );
        assert!(msg.implemented);
    }

    #[test]
    fn opaque_unknown_final() {
        let msg = dispatch(&[], b'Z', Box::from(&b"\x1bZ"[..]));
        assert_eq!(msg.kind, EscKind::Opaque);
        assert!(!msg.implemented);
    }
}
