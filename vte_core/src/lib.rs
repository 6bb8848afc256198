//! A byte-oriented, incremental, push-driven parser for VT-family terminal
//! escape sequences (spec §1). Consumes raw PTY byte streams and emits typed
//! messages for printable code points, C0 control effects, and parsed
//! ESC/CSI/SGR/OSC/DCS sequences; has no notion of a screen grid, rendering,
//! PTY I/O, or a CLI — those are entirely a collaborator's concern.
//!
//! Grounded on the reference parser's crate shape (a single flat module
//! tree, no sub-crate split) and its zero-allocation-on-the-hot-path design
//! goal, reworked onto the closed-enum message catalogue and the richer
//! recognizer this specification calls for (see `DESIGN.md`).

mod classify;
mod dispatch;
mod message;
mod param;
mod parser;
mod sequence;
mod state;
mod utf8;

pub use message::{
    CharsetSlot, ColorSpec, ControlCode, CsiKind, CsiMessage, DcsMessage, DeviceAttributesKind,
    EraseMode, EscKind, EscMessage, IdeogramStyle, NamedColor, OscMessage, OscPayload,
    OscTerminator, SgrAttribute, SgrMessage, SgrSequence, UnderlineStyle,
};
pub use param::{ParamSlot, Params, Separator};
pub use parser::{Handler, Options, Parser};
