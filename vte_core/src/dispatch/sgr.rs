//! SGR Dispatcher (spec §4.6). Grounded on `otty-escape`'s
//! `Sgr`/`Underline`/`Intensity` enum shapes (renamed to spec.md's exact
//! variant names) and its indexed/RGB color parser for the `38/48/58`
//! extended forms.

use crate::message::{
    ColorSpec, IdeogramStyle, NamedColor, SgrAttribute, SgrMessage, SgrSequence, UnderlineStyle,
};
use crate::param::{ParamSlot, Params, Separator};

use log::debug;

pub fn dispatch(params: &Params, private_marker: Option<u8>, intermediates: &[u8], raw: Box<[u8]>) -> SgrSequence {
    if private_marker == Some(b'>') {
        let messages = vec![SgrMessage::unimplemented(SgrAttribute::EnhancedMode {
            params: params.to_vec(),
        })];
        return SgrSequence::new(raw, messages);
    }

    if private_marker == Some(b'?') {
        let values = params.to_vec();
        if let [value] = values[..] {
            if let Some(attribute) = private_single_value(value) {
                return SgrSequence::new(raw, vec![SgrMessage::implemented(attribute)]);
            }
        }
        let messages = vec![SgrMessage::unimplemented(SgrAttribute::PrivateMode { params: values })];
        return SgrSequence::new(raw, messages);
    }

    if !intermediates.is_empty() {
        let values = params.to_vec();
        if intermediates == [b'%'] && values == [0] {
            return SgrSequence::new(raw, vec![SgrMessage::implemented(SgrAttribute::Reset)]);
        }
        let messages = vec![SgrMessage::unimplemented(SgrAttribute::WithIntermediate {
            params: values,
            intermediate: intermediates[0],
        })];
        return SgrSequence::new(raw, messages);
    }

    let messages = parse_attributes(params);
    SgrSequence::new(raw, messages)
}

fn private_single_value(value: u32) -> Option<SgrAttribute> {
    match value {
        4 => Some(SgrAttribute::Underline(UnderlineStyle::Single)),
        _ => None,
    }
}

fn parse_attributes(params: &Params) -> Vec<SgrMessage> {
    if params.is_empty() {
        return vec![SgrMessage::implemented(SgrAttribute::Reset)];
    }

    let mut messages = Vec::with_capacity(params.len());
    let slots: Vec<ParamSlot> = params.iter().collect();
    let mut i = 0;

    while i < slots.len() {
        let slot = slots[i];
        match slot.value {
            0 => messages.push(SgrMessage::implemented(SgrAttribute::Reset)),
            1 => messages.push(SgrMessage::implemented(SgrAttribute::Bold)),
            2 => messages.push(SgrMessage::implemented(SgrAttribute::Faint)),
            3 => messages.push(SgrMessage::implemented(SgrAttribute::Italic)),
            4 => {
                if slot.separator == Some(Separator::Colon) && i + 1 < slots.len() {
                    i += 1;
                    let style = match slots[i].value {
                        0 => {
                            messages.push(SgrMessage::implemented(SgrAttribute::NotUnderlined));
                            i += 1;
                            continue;
                        }
                        2 => UnderlineStyle::Double,
                        3 => UnderlineStyle::Curly,
                        4 => UnderlineStyle::Dotted,
                        5 => UnderlineStyle::Dashed,
                        _ => UnderlineStyle::Single,
                    };
                    messages.push(SgrMessage::implemented(SgrAttribute::Underline(style)));
                } else {
                    messages.push(SgrMessage::implemented(SgrAttribute::Underline(
                        UnderlineStyle::Single,
                    )));
                }
            }
            5 => messages.push(SgrMessage::implemented(SgrAttribute::SlowBlink)),
            6 => messages.push(SgrMessage::implemented(SgrAttribute::RapidBlink)),
            7 => messages.push(SgrMessage::implemented(SgrAttribute::Inverse)),
            8 => messages.push(SgrMessage::implemented(SgrAttribute::Hidden)),
            9 => messages.push(SgrMessage::implemented(SgrAttribute::Strikethrough)),
            n @ 10..=19 => messages.push(SgrMessage::implemented(SgrAttribute::Font((n - 10) as u8))),
            20 => messages.push(SgrMessage::implemented(SgrAttribute::Fraktur)),
            21 => messages.push(SgrMessage::implemented(SgrAttribute::DoubleUnderline)),
            22 => messages.push(SgrMessage::implemented(SgrAttribute::NormalIntensity)),
            23 => messages.push(SgrMessage::implemented(SgrAttribute::NotItalic)),
            24 => messages.push(SgrMessage::implemented(SgrAttribute::NotUnderlined)),
            25 => messages.push(SgrMessage::implemented(SgrAttribute::NotBlinking)),
            26 => messages.push(SgrMessage::implemented(SgrAttribute::ProportionalSpacing)),
            27 => messages.push(SgrMessage::implemented(SgrAttribute::NotInverse)),
            28 => messages.push(SgrMessage::implemented(SgrAttribute::NotHidden)),
            29 => messages.push(SgrMessage::implemented(SgrAttribute::NotStrikethrough)),
            n @ 30..=37 => push_color(&mut messages, true, NamedColor::from_offset(n - 30, false)),
            n @ 40..=47 => push_color(&mut messages, false, NamedColor::from_offset(n - 40, false)),
            n @ 90..=97 => push_color(&mut messages, true, NamedColor::from_offset(n - 90, true)),
            n @ 100..=107 => push_color(&mut messages, false, NamedColor::from_offset(n - 100, true)),
            38 | 48 | 58 => {
                let is_fg = slot.value == 38;
                let is_underline = slot.value == 58;
                let consumed = parse_extended_color(&slots[i..]);
                match consumed {
                    Some((spec, advance)) => {
                        let attribute = if is_underline {
                            SgrAttribute::UnderlineColor(spec)
                        } else if is_fg {
                            SgrAttribute::ForegroundColor(spec)
                        } else {
                            SgrAttribute::BackgroundColor(spec)
                        };
                        messages.push(SgrMessage::implemented(attribute));
                        i += advance;
                        continue;
                    }
                    None => {
                        debug!("sgr: failed to parse extended color form starting at {}", slot.value);
                        messages.push(SgrMessage::unimplemented(SgrAttribute::Unknown {
                            params: vec![slot.value],
                        }));
                    }
                }
            }
            39 => messages.push(SgrMessage::implemented(SgrAttribute::DefaultForeground)),
            49 => messages.push(SgrMessage::implemented(SgrAttribute::DefaultBackground)),
            59 => messages.push(SgrMessage::implemented(SgrAttribute::DefaultUnderlineColor)),
            50 => messages.push(SgrMessage::implemented(SgrAttribute::DisableProportionalSpacing)),
            51 => messages.push(SgrMessage::implemented(SgrAttribute::Framed)),
            52 => messages.push(SgrMessage::implemented(SgrAttribute::Encircled)),
            53 => messages.push(SgrMessage::implemented(SgrAttribute::Overlined)),
            54 => messages.push(SgrMessage::implemented(SgrAttribute::NotFramed)),
            55 => messages.push(SgrMessage::implemented(SgrAttribute::NotOverlined)),
            60 => messages.push(SgrMessage::implemented(SgrAttribute::Ideogram(
                IdeogramStyle::UnderlineOrRightSideLine,
            ))),
            61 => messages.push(SgrMessage::implemented(SgrAttribute::Ideogram(
                IdeogramStyle::DoubleUnderlineOrDoubleLineOnRightSide,
            ))),
            62 => messages.push(SgrMessage::implemented(SgrAttribute::Ideogram(
                IdeogramStyle::OverlineOrLeftSideLine,
            ))),
            63 => messages.push(SgrMessage::implemented(SgrAttribute::Ideogram(
                IdeogramStyle::DoubleOverlineOrDoubleLineOnLeftSide,
            ))),
            64 => messages.push(SgrMessage::implemented(SgrAttribute::Ideogram(
                IdeogramStyle::StressMarking,
            ))),
            65 => messages.push(SgrMessage::implemented(SgrAttribute::Ideogram(IdeogramStyle::Reset))),
            73 => messages.push(SgrMessage::implemented(SgrAttribute::Superscript)),
            74 => messages.push(SgrMessage::implemented(SgrAttribute::Subscript)),
            75 => messages.push(SgrMessage::implemented(SgrAttribute::NotSuperscriptSubscript)),
            other => messages.push(SgrMessage::unimplemented(SgrAttribute::Unknown {
                params: vec![other],
            })),
        }
        i += 1;
    }

    messages
}

fn push_color(messages: &mut Vec<SgrMessage>, foreground: bool, color: Option<NamedColor>) {
    match color {
        Some(named) => {
            let attribute = if foreground {
                SgrAttribute::ForegroundColor(ColorSpec::Named(named))
            } else {
                SgrAttribute::BackgroundColor(ColorSpec::Named(named))
            };
            messages.push(SgrMessage::implemented(attribute));
        }
        None => messages.push(SgrMessage::unimplemented(SgrAttribute::Unknown { params: vec![] })),
    }
}

/// Parses the `38`/`48`/`58` extended color forms starting at `slots[0]`
/// (the `38`/`48`/`58` selector itself). Returns the parsed `ColorSpec` and
/// how many slots (including the selector) were consumed, or `None` on a
/// malformed form.
///
/// Accepts both semicolon- and colon-separated forms, and the ITU T.416
/// colon variants with an (optional) colorspace-id slot:
/// `38:2::r:g:b` and `38:2:id:r:g:b`.
fn parse_extended_color(slots: &[ParamSlot]) -> Option<(ColorSpec, usize)> {
    let format = slots.get(1)?.value;
    match format {
        5 => {
            let index = slots.get(2)?.value;
            let index: u8 = index.try_into().ok()?;
            Some((ColorSpec::Indexed(index), 3))
        }
        2 => {
            let colon_form = slots.get(1)?.separator == Some(Separator::Colon);
            if colon_form {
                // Colon form may carry an extra colorspace-id slot before
                // r/g/b: `38:2:r:g:b` (no id) or `38:2:id:r:g:b` or the
                // empty-colorspace `38:2::r:g:b`.
                let remaining = &slots[2..];
                if remaining.len() >= 4 {
                    // `38:2:id:r:g:b` — skip the id slot.
                    let r = remaining[1].value.try_into().ok()?;
                    let g = remaining[2].value.try_into().ok()?;
                    let b = remaining[3].value.try_into().ok()?;
                    Some((ColorSpec::Rgb { r, g, b }, 6))
                } else if remaining.len() == 3 {
                    // `38:2:r:g:b` — no colorspace slot at all.
                    let r = remaining[0].value.try_into().ok()?;
                    let g = remaining[1].value.try_into().ok()?;
                    let b = remaining[2].value.try_into().ok()?;
                    Some((ColorSpec::Rgb { r, g, b }, 5))
                } else {
                    None
                }
            } else {
                let r: u8 = slots.get(2)?.value.try_into().ok()?;
                let g: u8 = slots.get(3)?.value.try_into().ok()?;
                let b: u8 = slots.get(4)?.value.try_into().ok()?;
                Some((ColorSpec::Rgb { r, g, b }, 5))
            }
        }
        _ => None,
    }
}
