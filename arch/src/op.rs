//! Opcode arithmetic.
//!
//! Most of the Z80 map is regular: an opcode is a base value plus a
//! register slot, a register-pair index times 16, or a bit/condition/ALU
//! index times 8. These helpers are the single source for those formulas;
//! the encoder builds byte sequences from them and the decoder inverts them.

use crate::alu::{BitOp, Rot, ALU};
use crate::reg::Cond;

pub const PREFIX_CB: u8 = 0xCB;
pub const PREFIX_ED: u8 = 0xED;

/// `ld r, r'`
pub fn ld_r_r(dst: u8, src: u8) -> u8 {
    0x40 + (dst & 7) * 8 + (src & 7)
}

/// `ld r, n`
pub fn ld_r_n(dst: u8) -> u8 {
    0x06 + (dst & 7) * 8
}

/// `inc r` / `dec r`
pub fn inc_r(slot: u8) -> u8 {
    0x04 + (slot & 7) * 8
}

pub fn dec_r(slot: u8) -> u8 {
    0x05 + (slot & 7) * 8
}

/// `alu a, r`
pub fn alu_r(op: ALU, slot: u8) -> u8 {
    0x80 + u8::from(op) * 8 + (slot & 7)
}

/// `alu a, n`
pub fn alu_n(op: ALU) -> u8 {
    0xC6 + u8::from(op) * 8
}

/// `ld rr, nn`
pub fn ld_rp_nn(rp: u8) -> u8 {
    0x01 + (rp & 3) * 16
}

pub fn inc_rp(rp: u8) -> u8 {
    0x03 + (rp & 3) * 16
}

pub fn dec_rp(rp: u8) -> u8 {
    0x0B + (rp & 3) * 16
}

/// `add hl, rr`
pub fn add_hl_rp(rp: u8) -> u8 {
    0x09 + (rp & 3) * 16
}

/// `sbc hl, rr` (after `ED`)
pub fn sbc_hl_rp(rp: u8) -> u8 {
    0x42 + (rp & 3) * 16
}

/// `adc hl, rr` (after `ED`)
pub fn adc_hl_rp(rp: u8) -> u8 {
    0x4A + (rp & 3) * 16
}

/// `ld (nn), rr` (after `ED`)
pub fn ld_nn_rp(rp: u8) -> u8 {
    0x43 + (rp & 3) * 16
}

/// `ld rr, (nn)` (after `ED`)
pub fn ld_rp_ind_nn(rp: u8) -> u8 {
    0x4B + (rp & 3) * 16
}

pub fn push(rp2: u8) -> u8 {
    0xC5 + (rp2 & 3) * 16
}

pub fn pop(rp2: u8) -> u8 {
    0xC1 + (rp2 & 3) * 16
}

pub fn jp_cc(cc: Cond) -> u8 {
    0xC2 + u8::from(cc) * 8
}

pub fn call_cc(cc: Cond) -> u8 {
    0xC4 + u8::from(cc) * 8
}

pub fn ret_cc(cc: Cond) -> u8 {
    0xC0 + u8::from(cc) * 8
}

/// `jr cc, e`; only `nz z nc c` exist.
pub fn jr_cc(cc: Cond) -> Option<u8> {
    cc.is_short().then(|| 0x20 + u8::from(cc) * 8)
}

/// `rst p` for `p` in `0x00, 0x08, .., 0x38`.
pub fn rst(target: i32) -> Option<u8> {
    match target {
        0x00..=0x38 if target % 8 == 0 => Some(0xC7 + target as u8),
        _ => None,
    }
}

/// `im 0|1|2` (after `ED`)
pub fn im(mode: i32) -> Option<u8> {
    match mode {
        0 => Some(0x46),
        1 => Some(0x56),
        2 => Some(0x5E),
        _ => None,
    }
}

/// `in r, (c)` (after `ED`); slot 6 is the flags-only `in (c)`.
pub fn in_r_c(slot: u8) -> u8 {
    0x40 + (slot & 7) * 8
}

/// `out (c), r` (after `ED`); slot 6 is `out (c), 0`.
pub fn out_c_r(slot: u8) -> u8 {
    0x41 + (slot & 7) * 8
}

/// Rotate/shift (after `CB`)
pub fn rot(op: Rot, slot: u8) -> u8 {
    u8::from(op) * 8 + (slot & 7)
}

/// `bit`/`res`/`set` (after `CB`)
pub fn bit(op: BitOp, bit: u8, slot: u8) -> u8 {
    u8::from(op) * 0x40 + (bit & 7) * 8 + (slot & 7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reg::Reg8;

    macro_rules! test_op {
        ($($name:ident: $op:expr => $bin:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!($op, $bin);
                }
            )*
        }
    }

    test_op! {
        test_ld_b_b: ld_r_r(Reg8::B.slot(), Reg8::B.slot()) => 0x40,
        test_ld_hl_b: ld_r_r(Reg8::HL_SLOT, Reg8::B.slot()) => 0x70,
        test_ld_a_hl: ld_r_r(Reg8::A.slot(), Reg8::HL_SLOT) => 0x7E,
        test_ld_a_n: ld_r_n(Reg8::A.slot()) => 0x3E,
        test_ld_hl_n: ld_r_n(Reg8::HL_SLOT) => 0x36,
        test_inc_hl_ind: inc_r(Reg8::HL_SLOT) => 0x34,
        test_dec_a: dec_r(Reg8::A.slot()) => 0x3D,
        test_add_a_b: alu_r(ALU::ADD, Reg8::B.slot()) => 0x80,
        test_cp_a: alu_r(ALU::CP, Reg8::A.slot()) => 0xBF,
        test_xor_n: alu_n(ALU::XOR) => 0xEE,
        test_ld_sp_nn: ld_rp_nn(3) => 0x31,
        test_inc_de: inc_rp(1) => 0x13,
        test_dec_sp: dec_rp(3) => 0x3B,
        test_add_hl_hl: add_hl_rp(2) => 0x29,
        test_sbc_hl_de: sbc_hl_rp(1) => 0x52,
        test_adc_hl_sp: adc_hl_rp(3) => 0x7A,
        test_ld_nn_bc: ld_nn_rp(0) => 0x43,
        test_ld_sp_ind: ld_rp_ind_nn(3) => 0x7B,
        test_push_af: push(3) => 0xF5,
        test_pop_bc: pop(0) => 0xC1,
        test_jp_m: jp_cc(Cond::M) => 0xFA,
        test_call_nz: call_cc(Cond::NZ) => 0xC4,
        test_ret_pe: ret_cc(Cond::PE) => 0xE8,
        test_jr_c: jr_cc(Cond::C) => Some(0x38),
        test_jr_po: jr_cc(Cond::PO) => None,
        test_rst_38: rst(0x38) => Some(0xFF),
        test_rst_odd: rst(0x09) => None,
        test_im_2: im(2) => Some(0x5E),
        test_im_3: im(3) => None,
        test_in_a_c: in_r_c(Reg8::A.slot()) => 0x78,
        test_out_c_b: out_c_r(Reg8::B.slot()) => 0x41,
        test_rlc_b: rot(Rot::RLC, Reg8::B.slot()) => 0x00,
        test_srl_hl: rot(Rot::SRL, Reg8::HL_SLOT) => 0x3E,
        test_bit_3_hl: bit(BitOp::BIT, 3, Reg8::HL_SLOT) => 0x5E,
        test_res_0_a: bit(BitOp::RES, 0, Reg8::A.slot()) => 0x87,
        test_set_7_a: bit(BitOp::SET, 7, Reg8::A.slot()) => 0xFF,
    }
}
