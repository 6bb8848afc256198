//! The VT500 recognizer states (spec §3). Grounded on the reference
//! parser's `State` enum directly, extended with `OscEscape` — the
//! escape-lookahead state spec.md adds beyond the plain Williams chart so
//! that `ESC ] ... ESC \` can be told apart from `ESC ] ... ESC [...`
//! (a fresh sequence starting right after an OSC is abandoned).
//!
//! Unlike the reference parser's `table.rs`, the per-byte transition table
//! itself is not expressed as a standalone `change_state` function here: the
//! reference table returns only a next state plus a generic `Action`, which
//! then has to be reinterpreted by the driver to decide which typed message
//! (if any) to build. Given this core's driver has to thread much more
//! context through each transition (parameter separators, private markers,
//! the DCS pending-ST lookahead of SPEC_FULL.md §4.10) than the reference
//! parser's raw `Executor` callbacks ever needed, the transition logic lives
//! directly in `parser.rs`'s per-state methods instead of a separate
//! indirection layer; this module keeps the state identity itself, which is
//! what every other module borrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Ground,

    Escape,
    EscapeIntermediate,

    CsiEntry,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,

    DcsEntry,
    DcsParam,
    DcsIntermediate,
    DcsPassthrough,
    DcsIgnore,

    OscString,
    /// Seen ESC inside OSC, awaiting either `\` (completes with `St`) or any
    /// other byte (OSC resumes, byte appended per spec §4.3).
    OscEscape,

    SosPmApcString,
}

impl Default for State {
    fn default() -> Self {
        State::Ground
    }
}
