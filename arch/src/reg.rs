use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// 8-bit registers, numbered by their slot in the `r` operand field.
/// Slot 6 is `(hl)` and has no register of its own.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum Reg8 {
    B = 0,
    C = 1,
    D = 2,
    E = 3,
    H = 4,
    L = 5,
    A = 7,
}

impl Reg8 {
    pub const HL_SLOT: u8 = 6;

    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    pub fn slot(self) -> u8 {
        self.into()
    }

    /// `h` and `l` are replaced by the index halves under a `DD`/`FD` prefix.
    pub fn is_hl_half(self) -> bool {
        matches!(self, Reg8::H | Reg8::L)
    }
}

/// Register pairs as they appear in the `rp` field (`sp` at 3).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum Reg16 {
    BC = 0,
    DE = 1,
    HL = 2,
    SP = 3,
    AF = 4,
}

impl Reg16 {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Index in the `rp` table (`bc de hl sp`).
    pub fn rp(self) -> Option<u8> {
        match self {
            Reg16::AF => None,
            reg => Some(reg.into()),
        }
    }

    /// Index in the `rp2` table used by `push`/`pop` (`bc de hl af`).
    pub fn rp2(self) -> Option<u8> {
        match self {
            Reg16::SP => None,
            Reg16::AF => Some(3),
            reg => Some(reg.into()),
        }
    }

    pub fn from_rp(rp: u8) -> Self {
        match rp & 3 {
            0 => Reg16::BC,
            1 => Reg16::DE,
            2 => Reg16::HL,
            _ => Reg16::SP,
        }
    }

    pub fn from_rp2(rp: u8) -> Self {
        match rp & 3 {
            3 => Reg16::AF,
            rp => Self::from_rp(rp),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Index {
    IX,
    IY,
}

impl Index {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    pub fn prefix(self) -> u8 {
        match self {
            Index::IX => 0xDD,
            Index::IY => 0xFD,
        }
    }

    pub fn from_prefix(prefix: u8) -> Option<Self> {
        match prefix {
            0xDD => Some(Index::IX),
            0xFD => Some(Index::IY),
            _ => None,
        }
    }

    /// Name of the high or low half (`ixh`, `iyl`, ...).
    pub fn half(self, high: bool) -> &'static str {
        match (self, high) {
            (Index::IX, true) => "ixh",
            (Index::IX, false) => "ixl",
            (Index::IY, true) => "iyh",
            (Index::IY, false) => "iyl",
        }
    }

    /// Parses `ixh`/`ixl`/`iyh`/`iyl` into the index register and the
    /// `r` slot it takes over (`h` = 4, `l` = 5).
    pub fn parse_half(s: &str) -> Option<(Self, Reg8)> {
        match s.to_ascii_lowercase().as_str() {
            "ixh" => Some((Index::IX, Reg8::H)),
            "ixl" => Some((Index::IX, Reg8::L)),
            "iyh" => Some((Index::IY, Reg8::H)),
            "iyl" => Some((Index::IY, Reg8::L)),
            _ => None,
        }
    }
}

/// Flag conditions in `cc` field order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum Cond {
    NZ = 0,
    Z = 1,
    NC = 2,
    C = 3,
    PO = 4,
    PE = 5,
    P = 6,
    M = 7,
}

impl Cond {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// `jr` only accepts the first four conditions.
    pub fn is_short(self) -> bool {
        u8::from(self) < 4
    }
}

/// Shared name lookup used by the decoder for the `r` slot, with `(hl)`
/// at slot 6.
pub fn slot_name(slot: u8) -> &'static str {
    match slot & 7 {
        0 => "b",
        1 => "c",
        2 => "d",
        3 => "e",
        4 => "h",
        5 => "l",
        6 => "(hl)",
        _ => "a",
    }
}
