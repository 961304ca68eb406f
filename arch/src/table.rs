use bimap::BiMap;
use once_cell::sync::Lazy;

/// Instructions without operands and their complete encodings.
///
/// The assembler looks mnemonics up by name, the decoder looks them up by
/// bytes, so both directions stay identical by construction.
#[rustfmt::skip]
const FIXED: &[(&str, &[u8])] = &[
    ("nop",  &[0x00]),
    ("rlca", &[0x07]),
    ("rrca", &[0x0F]),
    ("rla",  &[0x17]),
    ("rra",  &[0x1F]),
    ("daa",  &[0x27]),
    ("cpl",  &[0x2F]),
    ("scf",  &[0x37]),
    ("ccf",  &[0x3F]),
    ("halt", &[0x76]),
    ("exx",  &[0xD9]),
    ("di",   &[0xF3]),
    ("ei",   &[0xFB]),
    ("neg",  &[0xED, 0x44]),
    ("retn", &[0xED, 0x45]),
    ("reti", &[0xED, 0x4D]),
    ("rrd",  &[0xED, 0x67]),
    ("rld",  &[0xED, 0x6F]),
    ("ldi",  &[0xED, 0xA0]),
    ("cpi",  &[0xED, 0xA1]),
    ("ini",  &[0xED, 0xA2]),
    ("outi", &[0xED, 0xA3]),
    ("ldd",  &[0xED, 0xA8]),
    ("cpd",  &[0xED, 0xA9]),
    ("ind",  &[0xED, 0xAA]),
    ("outd", &[0xED, 0xAB]),
    ("ldir", &[0xED, 0xB0]),
    ("cpir", &[0xED, 0xB1]),
    ("inir", &[0xED, 0xB2]),
    ("otir", &[0xED, 0xB3]),
    ("lddr", &[0xED, 0xB8]),
    ("cpdr", &[0xED, 0xB9]),
    ("indr", &[0xED, 0xBA]),
    ("otdr", &[0xED, 0xBB]),
];

static TABLE: Lazy<BiMap<&'static str, &'static [u8]>> =
    Lazy::new(|| FIXED.iter().copied().collect());

/// Encoding of a zero-operand mnemonic. `mnemonic` must be lowercase.
pub fn fixed_bytes(mnemonic: &str) -> Option<&'static [u8]> {
    TABLE.get_by_left(mnemonic).copied()
}

/// Mnemonic whose encoding is exactly `bytes`.
pub fn fixed_name(bytes: &[u8]) -> Option<&'static str> {
    TABLE.get_by_right(bytes).copied()
}

pub fn fixed_entries() -> impl Iterator<Item = (&'static str, &'static [u8])> {
    FIXED.iter().copied()
}
