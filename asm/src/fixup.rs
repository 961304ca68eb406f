use tracing::trace;

use crate::error::{ErrorKind, SyntaxError};
use crate::symbol::Symbols;
use crate::token::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// Two bytes, little-endian.
    Absolute,
    /// One signed displacement byte.
    Relative,
}

/// A byte patch waiting for a label value.
///
/// For `Absolute` the patched word is `value + addend`. For `Relative` the
/// placeholder byte already holds the low byte of `addend`, the baseline
/// computed from the displacement position, and the patch adds the label
/// value on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixup {
    pub name: String,
    pub offset: usize,
    pub width: Width,
    pub addend: i32,
    pub pos: Pos,
}

/// Patches `bytes` in place. Fixups whose label is missing are left as
/// placeholders and reported as `UnresolvedSymbol`.
pub fn resolve(bytes: &mut [u8], fixups: &[Fixup], symbols: &Symbols) -> Vec<SyntaxError> {
    let mut errors = vec![];
    for fixup in fixups {
        let error = |kind| SyntaxError::new(fixup.pos, kind);
        let Some(value) = symbols.get_val(&fixup.name) else {
            errors.push(error(ErrorKind::UnresolvedSymbol(fixup.name.clone())));
            continue;
        };
        let target = value as i64 + fixup.addend as i64;
        match fixup.width {
            Width::Absolute => {
                if !(-32768..=65535).contains(&target) {
                    errors.push(error(ErrorKind::ValueOutOfRange(target as i32)));
                    continue;
                }
                let word = (target as u16).to_le_bytes();
                bytes[fixup.offset..fixup.offset + 2].copy_from_slice(&word);
            }
            Width::Relative => {
                if !(-128..=127).contains(&target) {
                    errors.push(error(ErrorKind::RelativeOutOfRange(target as i32)));
                    continue;
                }
                bytes[fixup.offset] = bytes[fixup.offset].wrapping_add(value as u8);
            }
        }
        trace!(
            name = %fixup.name,
            offset = fixup.offset,
            width = ?fixup.width,
            value,
            "fixup resolved"
        );
    }
    errors
}
