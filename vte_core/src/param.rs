//! Parameter Parser (spec §4.4): turns the raw parameter-region bytes
//! accumulated by the recognizer into a numeric list with separator kinds,
//! reusable across CSI, SGR, and DCS.
//!
//! Grounded on the reference parser's `Param`/`Params` fixed-array
//! accumulators (`MAX_PARAMS`, `;`/`:` separator constants), generalized with
//! the per-value clamp and the empty-list/single-zero distinction this
//! specification requires. Unlike the reference parser, sub-parameters are
//! not nested one level deep (a `Param` holding several `Subparam`s): each
//! `;`- or `:`-delimited token is one slot of the same flat list, tagged with
//! the separator that followed it, which is what SGR's colon sub-parameters
//! (`4:3`, `38:2::r:g:b`) need to distinguish.

pub const MAX_PARAMS: usize = 16;
pub const MAX_PARAM_VALUE: u32 = 16383;

pub const PARAM_SEPARATOR: u8 = b';';
pub const SUBPARAM_SEPARATOR: u8 = b':';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Semicolon,
    Colon,
}

/// One parsed parameter value, with the separator that followed it (`None`
/// for the last value in the list).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSlot {
    pub value: u32,
    pub separator: Option<Separator>,
}

#[derive(Debug, Clone, Default)]
pub struct Params {
    values: [u32; MAX_PARAMS],
    separators: [Option<Separator>; MAX_PARAMS],
    len: usize,
    had_colon: bool,
}

impl Params {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if any separator in the parsed list was `:` rather than `;`.
    ///
    /// The CSI dispatcher uses this to decide whether a non-SGR final byte
    /// must be treated as an ignored sequence (spec §4.3: "a `:` in the
    /// parameter region MUST be preserved for SGR but MUST transition to
    /// `CsiIgnore` for any final byte other than `m`").
    #[inline]
    pub fn had_colon_separator(&self) -> bool {
        self.had_colon
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<u32> {
        (index < self.len).then(|| self.values[index])
    }

    /// Value at `index`, or `default` when the slot is absent (the parameter
    /// list is shorter than `index + 1`). Per spec §4.4, a present-but-zero
    /// slot is returned as the literal 0 here; command-specific zero-means-
    /// default substitution is the dispatcher's job, not this one's.
    #[inline]
    pub fn get_or(&self, index: usize, default: u32) -> u32 {
        self.get(index).unwrap_or(default)
    }

    pub fn iter(&self) -> impl Iterator<Item = ParamSlot> + '_ {
        (0..self.len).map(move |i| ParamSlot {
            value: self.values[i],
            separator: self.separators[i],
        })
    }

    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.iter().map(|s| s.value)
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.values().collect()
    }

    fn push(&mut self, value: u32, separator: Option<Separator>) {
        if self.len == MAX_PARAMS {
            // Extra values beyond the cap are silently dropped (spec §3).
            return;
        }
        self.values[self.len] = value;
        self.separators[self.len] = separator;
        self.len += 1;
    }
}

/// Parse a `param_text` span (bytes 0x30..=0x3F with any leading
/// private-marker byte already stripped by the recognizer) into a `Params`
/// list.
///
/// An empty `param_text` yields an empty list, distinct from a list
/// containing a single defaulted `0` (spec §4.4's "classifier yields an
/// empty list distinct from a single 0").
pub fn parse(param_text: &[u8]) -> Params {
    let mut params = Params::default();

    if param_text.is_empty() {
        return params;
    }

    let mut current: u32 = 0;

    for &b in param_text {
        match b {
            b'0'..=b'9' => {
                let digit = u32::from(b - b'0');
                current = current.saturating_mul(10).saturating_add(digit);
                if current > MAX_PARAM_VALUE {
                    current = MAX_PARAM_VALUE;
                }
            }
            PARAM_SEPARATOR => {
                params.push(current, Some(Separator::Semicolon));
                current = 0;
            }
            SUBPARAM_SEPARATOR => {
                params.had_colon = true;
                params.push(current, Some(Separator::Colon));
                current = 0;
            }
            // Any other byte should never reach here (the recognizer only
            // forwards 0x30..=0x3F param-region bytes into param_text); skip
            // defensively rather than panic on malformed input (spec §7).
            _ => {}
        }
    }

    params.push(current, None);
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_empty_list() {
        let params = parse(b"");
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
    }

    #[test]
    fn single_zero_is_one_value() {
        let params = parse(b"0");
        assert_eq!(params.to_vec(), vec![0]);
    }

    #[test]
    fn semicolon_list() {
        let params = parse(b"10;20");
        assert_eq!(params.to_vec(), vec![10, 20]);
        assert!(!params.had_colon_separator());
    }

    #[test]
    fn leading_and_trailing_empty_tokens_default_to_zero() {
        assert_eq!(parse(b";5").to_vec(), vec![0, 5]);
        assert_eq!(parse(b"5;").to_vec(), vec![5, 0]);
    }

    #[test]
    fn colon_subparams_are_flagged() {
        let params = parse(b"4:3");
        assert_eq!(params.to_vec(), vec![4, 3]);
        assert!(params.had_colon_separator());
    }

    #[test]
    fn clamps_overflowing_value() {
        let params = parse(b"999999999");
        assert_eq!(params.to_vec(), vec![MAX_PARAM_VALUE]);
    }

    #[test]
    fn drops_values_beyond_cap() {
        let text = vec![b'1'; 20]
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(";");
        let params = parse(text.as_bytes());
        assert_eq!(params.len(), MAX_PARAMS);
    }
}
