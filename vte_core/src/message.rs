//! The typed message catalogue (spec §3). Every variant the parser can ever
//! emit to a `Handler` lives here as a closed tagged enum — no runtime-typed
//! dictionaries, no downcasting, matching the re-architecture spec §9 calls
//! for in place of the source's polymorphic dispatch.
//!
//! Shape (closed enums, `Copy`/`Clone` where cheap, owned `String`/`Vec<u8>`
//! payload only where a string or opaque blob is unavoidable) is informed by
//! `termwiz`'s `Action` enum and `otty-escape`'s `ColorSpec`/OSC
//! command-number split; field and variant names follow spec.md's own
//! naming, not those crates'.

/// C0 controls that get their own named callback on `Handler`, plus the two
/// (`ShiftIn`/`ShiftOut`) that spec §3 lists in `ControlExecuted` but whose
/// `Handler` method spec §6 does not name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCode {
    Bell,
    Backspace,
    Tab,
    LineFeed,
    FormFeed,
    CarriageReturn,
    ShiftIn,
    ShiftOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetSlot {
    G0,
    G1,
    G2,
    G3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscKind {
    SaveCursor,
    RestoreCursor,
    Index,
    ReverseIndex,
    NextLine,
    HorizontalTabSet,
    ResetToInitialState,
    DesignateCharacterSet { slot: CharsetSlot, charset: u8 },
    /// Any other recognized-but-unmapped ESC final byte.
    Opaque,
}

#[derive(Debug, Clone)]
pub struct EscMessage {
    pub kind: EscKind,
    pub raw: Box<[u8]>,
    pub implemented: bool,
}

/// Erase range for `J`/`K` (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    ToEnd,
    ToStart,
    All,
    /// `J` mode 3 only: scrollback, not a valid `K` mode.
    Scrollback,
}

impl EraseMode {
    pub fn from_param(value: u32) -> Self {
        match value {
            1 => EraseMode::ToStart,
            2 => EraseMode::All,
            3 => EraseMode::Scrollback,
            _ => EraseMode::ToEnd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAttributesKind {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsiKind {
    CursorUp { count: u32 },
    CursorDown { count: u32 },
    CursorForward { count: u32 },
    CursorBackward { count: u32 },
    CursorNextLine { count: u32 },
    CursorPrevLine { count: u32 },
    CursorHorizontalAbsolute { column: u32 },
    CursorVerticalAbsolute { row: u32 },
    CursorPosition { row: u32, column: u32 },
    EraseInDisplay { mode: EraseMode },
    SelectiveEraseInDisplay { mode: EraseMode },
    EraseInLine { mode: EraseMode },
    SelectiveEraseInLine { mode: EraseMode },
    InsertLines { count: u32 },
    DeleteLines { count: u32 },
    InsertCharacters { count: u32 },
    DeleteCharacters { count: u32 },
    EraseCharacter { count: u32 },
    ScrollUp { count: u32 },
    ScrollDown { count: u32 },
    SetScrollRegion { top: Option<u32>, bottom: Option<u32> },
    SaveCursorPosition,
    RestoreCursorPosition,
    DeviceAttributes { kind: DeviceAttributesKind },
    CursorPositionReport,
    CharacterSetQuery,
    TerminalSizeQuery,
    WindowManipulation { operation: u32, params: Vec<u32> },
    SetCursorStyle { style: u8 },
    DecModeSet { modes: Vec<u32> },
    DecModeReset { modes: Vec<u32> },
    SetMode { modes: Vec<u32> },
    ResetMode { modes: Vec<u32> },
    InsertReplaceMode { insert: bool },
    UnknownViSequence { param: u32 },
    Unknown,
}

#[derive(Debug, Clone)]
pub struct CsiMessage {
    pub kind: CsiKind,
    pub parameters: Vec<u32>,
    pub private_marker: Option<u8>,
    pub intermediates: Box<[u8]>,
    pub raw: Box<[u8]>,
    pub implemented: bool,
}

// ---- SGR --------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl NamedColor {
    /// `30..=37` / `40..=47` / `90..=97` / `100..=107` all index into the
    /// same 16-name table; `offset` is `n - 30` (etc.) and `bright` selects
    /// the upper 8.
    pub fn from_offset(offset: u32, bright: bool) -> Option<Self> {
        use NamedColor::*;
        const BASE: [NamedColor; 8] = [Black, Red, Green, Yellow, Blue, Magenta, Cyan, White];
        const BRIGHT: [NamedColor; 8] = [
            BrightBlack,
            BrightRed,
            BrightGreen,
            BrightYellow,
            BrightBlue,
            BrightMagenta,
            BrightCyan,
            BrightWhite,
        ];
        let table = if bright { &BRIGHT } else { &BASE };
        table.get(offset as usize).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpec {
    Named(NamedColor),
    Indexed(u8),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnderlineStyle {
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeogramStyle {
    UnderlineOrRightSideLine,
    DoubleUnderlineOrDoubleLineOnRightSide,
    OverlineOrLeftSideLine,
    DoubleOverlineOrDoubleLineOnLeftSide,
    StressMarking,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SgrAttribute {
    Reset,
    Bold,
    Faint,
    Italic,
    Underline(UnderlineStyle),
    SlowBlink,
    RapidBlink,
    Inverse,
    Hidden,
    Strikethrough,
    Font(u8),
    Fraktur,
    DoubleUnderline,
    NormalIntensity,
    NotItalic,
    NotUnderlined,
    NotBlinking,
    ProportionalSpacing,
    NotInverse,
    NotHidden,
    NotStrikethrough,
    ForegroundColor(ColorSpec),
    DefaultForeground,
    BackgroundColor(ColorSpec),
    DefaultBackground,
    DisableProportionalSpacing,
    Framed,
    Encircled,
    Overlined,
    NotFramed,
    NotOverlined,
    UnderlineColor(ColorSpec),
    DefaultUnderlineColor,
    Ideogram(IdeogramStyle),
    Superscript,
    Subscript,
    NotSuperscriptSubscript,
    /// `ESC [ > params m` — the enhanced-mode (`>`-prefixed) SGR form.
    EnhancedMode { params: Vec<u32> },
    /// `ESC [ ? params m` — the private-mode (`?`-prefixed) SGR form, not
    /// otherwise mapped to a specific implemented attribute.
    PrivateMode { params: Vec<u32> },
    /// An SGR sequence carrying an intermediate byte (e.g. `%`), not
    /// otherwise mapped.
    WithIntermediate { params: Vec<u32>, intermediate: u8 },
    Unknown { params: Vec<u32> },
}

#[derive(Debug, Clone)]
pub struct SgrMessage {
    pub attribute: SgrAttribute,
    pub implemented: bool,
}

impl SgrMessage {
    pub fn implemented(attribute: SgrAttribute) -> Self {
        Self {
            attribute,
            implemented: true,
        }
    }

    pub fn unimplemented(attribute: SgrAttribute) -> Self {
        Self {
            attribute,
            implemented: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SgrSequence {
    pub raw: Box<[u8]>,
    pub messages: Vec<SgrMessage>,
    pub implemented: bool,
}

impl SgrSequence {
    pub fn new(raw: Box<[u8]>, messages: Vec<SgrMessage>) -> Self {
        let implemented = !messages.is_empty() && messages.iter().all(|m| m.implemented);
        Self {
            raw,
            messages,
            implemented,
        }
    }
}

// ---- OSC ----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscTerminator {
    Bel,
    St,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OscPayload {
    SetTitleAndIcon { title: String },
    SetIconName { name: String },
    SetWindowTitle { title: String },
    QueryWindowTitle,
    QueryForegroundColor,
    QueryBackgroundColor,
    Hyperlink { url: String, id: Option<String> },
    Opaque { command_number: Option<u32>, text: String },
}

#[derive(Debug, Clone)]
pub struct OscMessage {
    pub raw: Box<[u8]>,
    pub terminator: OscTerminator,
    pub payload: OscPayload,
    pub implemented: bool,
}

// ---- DCS ------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DcsMessage {
    pub raw: Box<[u8]>,
    pub terminator: OscTerminator,
    pub command: u8,
    pub intermediates: Box<[u8]>,
    pub private_marker: Option<u8>,
    pub parameters: Vec<u32>,
    pub payload: Box<[u8]>,
    pub implemented: bool,
}
