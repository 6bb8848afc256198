//! DCS Collector (spec §4.8). Grounded on the reference parser's `Dcs*`
//! table transitions for entry/param/intermediate handling, and the
//! `Hook`/`Put`/`Unhook` action sequencing its `Executor` trait names for
//! the payload-accumulation lifecycle this module's caller (`parser.rs`)
//! drives it through.

use crate::message::{DcsMessage, OscTerminator};
use crate::param::Params;

pub struct DcsInput<'a> {
    pub command: u8,
    pub private_marker: Option<u8>,
    pub intermediates: &'a [u8],
    pub params: &'a Params,
    pub payload: &'a [u8],
    pub terminator: OscTerminator,
    pub raw: &'a [u8],
}

/// Every DCS message is emitted with `implemented = false` by default (spec
/// §4.8): the command character and intermediates identify the device
/// control type, but acting on it is a collaborator's concern entirely
/// outside this core.
pub fn dispatch(input: DcsInput<'_>) -> DcsMessage {
    DcsMessage {
        raw: Box::from(input.raw),
        terminator: input.terminator,
        command: input.command,
        intermediates: Box::from(input.intermediates),
        private_marker: input.private_marker,
        parameters: input.params.to_vec(),
        payload: Box::from(input.payload),
        implemented: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param;

    #[test]
    fn always_unimplemented() {
        let params = param::parse(b"1");
        let msg = dispatch(DcsInput {
            command: b'q',
            private_marker: None,
            intermediates: &[],
            params: &params,
            payload: b"payload",
            terminator: OscTerminator::St,
            raw: b"\x1bP1q payload\x1b\\",
        });
        assert!(!msg.implemented);
        assert_eq!(msg.command, b'q');
        assert_eq!(&*msg.payload, b"payload");
    }
}
