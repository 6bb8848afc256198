//! OSC Parser (spec §4.7). Grounded on the reference parser's `OscHandler`
//! (index-pair parameter splitting over a flat raw buffer) for the
//! accumulation strategy that feeds this dispatcher, and on
//! `otty-escape`'s OSC command-number-to-variant match idiom for the
//! mapping itself.

use crate::message::{OscMessage, OscPayload, OscTerminator};

use log::debug;

pub fn dispatch(payload: &[u8], terminator: OscTerminator, raw: Box<[u8]>, overflowed: bool) -> OscMessage {
    if overflowed {
        debug!("osc: payload exceeded max_osc_payload_length, emitting opaque/unimplemented");
        return OscMessage {
            raw,
            terminator,
            payload: OscPayload::Opaque {
                command_number: None,
                text: String::new(),
            },
            implemented: false,
        };
    }

    let text = String::from_utf8_lossy(payload);
    let (command_text, rest) = match text.find(';') {
        Some(idx) => (&text[..idx], &text[idx + 1..]),
        None => (text.as_ref(), ""),
    };

    let command_number = command_text.parse::<u32>().ok().filter(|&n| n <= 999);

    let (payload, implemented) = match (command_number, command_text) {
        (Some(0), _) => (OscPayload::SetTitleAndIcon { title: rest.to_string() }, true),
        (Some(1), _) => (OscPayload::SetIconName { name: rest.to_string() }, true),
        (Some(2), _) => (OscPayload::SetWindowTitle { title: rest.to_string() }, true),
        (Some(8), _) => (parse_hyperlink(rest), true),
        (Some(10), _) if rest == "?" => (OscPayload::QueryForegroundColor, true),
        (Some(11), _) if rest == "?" => (OscPayload::QueryBackgroundColor, true),
        (_, "21") => (OscPayload::QueryWindowTitle, true),
        _ => (
            OscPayload::Opaque {
                command_number,
                text: rest.to_string(),
            },
            false,
        ),
    };

    OscMessage {
        raw,
        terminator,
        payload,
        implemented,
    }
}

/// `8;params;url` where `params` is a `:`-separated list of `key=value`
/// pairs; only `id` is recognized, matching real-world hyperlink emitters.
fn parse_hyperlink(rest: &str) -> OscPayload {
    let (params, url) = match rest.find(';') {
        Some(idx) => (&rest[..idx], &rest[idx + 1..]),
        None => (rest, ""),
    };

    let id = params
        .split(':')
        .find_map(|kv| kv.strip_prefix("id=").map(str::to_string));

    OscPayload::Hyperlink {
        url: url.to_string(),
        id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatch_text(text: &str) -> OscMessage {
        dispatch(text.as_bytes(), OscTerminator::Bel, Box::from(&b""[..]), false)
    }

    #[test]
    fn set_title_and_icon() {
        let m = dispatch_text("0;Test");
        assert_eq!(
            m.payload,
            OscPayload::SetTitleAndIcon {
                title: "Test".to_string()
            }
        );
        assert!(m.implemented);
    }

    #[test]
    fn set_window_title() {
        let m = dispatch_text("2;My Window");
        assert_eq!(
            m.payload,
            OscPayload::SetWindowTitle {
                title: "My Window".to_string()
            }
        );
    }

    #[test]
    fn hyperlink_with_id() {
        let m = dispatch_text("8;id=abc123;https://example.com");
        assert_eq!(
            m.payload,
            OscPayload::Hyperlink {
                url: "https://example.com".to_string(),
                id: Some("abc123".to_string()),
            }
        );
    }

    #[test]
    fn hyperlink_clear() {
        let m = dispatch_text("8;;");
        assert_eq!(
            m.payload,
            OscPayload::Hyperlink {
                url: String::new(),
                id: None,
            }
        );
    }

    #[test]
    fn query_foreground_color() {
        let m = dispatch_text("10;?");
        assert_eq!(m.payload, OscPayload::QueryForegroundColor);
    }

    #[test]
    fn query_window_title_no_semicolon() {
        let m = dispatch_text("21");
        assert_eq!(m.payload, OscPayload::QueryWindowTitle);
    }

    #[test]
    fn opaque_unknown_command() {
        let m = dispatch_text("4;0;red");
        assert_eq!(
            m.payload,
            OscPayload::Opaque {
                command_number: Some(4),
                text: "0;red".to_string()
            }
        );
        assert!(!m.implemented);
    }

    #[test]
    fn overflowed_payload_is_empty_opaque() {
        let m = dispatch(b"0;whatever", OscTerminator::Bel, Box::from(&b""[..]), true);
        assert_eq!(
            m.payload,
            OscPayload::Opaque {
                command_number: None,
                text: String::new()
            }
        );
        assert!(!m.implemented);
    }
}
