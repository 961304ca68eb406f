use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// 8-bit arithmetic/logic operations in `alu` field order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum ALU {
    #[default]
    ADD,
    ADC,
    SUB,
    SBC,
    AND,
    XOR,
    OR,
    CP,
}

impl ALU {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// `add a, x`, `adc a, x` and `sbc a, x` name the accumulator; the
    /// other five are usually written with a single operand.
    pub fn names_accumulator(self) -> bool {
        matches!(self, ALU::ADD | ALU::ADC | ALU::SBC)
    }
}

/// `CB`-prefixed rotate and shift operations in `rot` field order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum Rot {
    #[default]
    RLC,
    RRC,
    RL,
    RR,
    SLA,
    SRA,
    SLL,
    SRL,
}

impl Rot {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

/// `CB`-prefixed bit operations; the discriminant is the top two bits of
/// the opcode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum BitOp {
    #[num_enum(default)]
    BIT = 1,
    RES = 2,
    SET = 3,
}

impl BitOp {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}
