use z80arch::op::{self, PREFIX_ED};
use z80arch::reg::{Reg16, Reg8};

use super::{Encoded, Encoder, Loc};
use crate::error::SyntaxError;
use crate::operand::{Arg, Operand};

impl Encoder<'_, '_> {
    pub(super) fn ld(&mut self) -> Result<Encoded, SyntaxError> {
        let (dst, src) = self.args2()?;
        use Operand::*;
        match (&dst.kind, &src.kind) {
            // accumulator <-> memory
            (Reg(Reg8::A), IndBc) => Ok(Encoded::new(&[0x0A])),
            (Reg(Reg8::A), IndDe) => Ok(Encoded::new(&[0x1A])),
            (Reg(Reg8::A), Ind(nn)) => self.word(&src, nn, Encoded::new(&[0x3A])),
            (IndBc, Reg(Reg8::A)) => Ok(Encoded::new(&[0x02])),
            (IndDe, Reg(Reg8::A)) => Ok(Encoded::new(&[0x12])),
            (Ind(nn), Reg(Reg8::A)) => self.word(&dst, nn, Encoded::new(&[0x32])),

            // interrupt vector and refresh
            (I, Reg(Reg8::A)) => Ok(Encoded::new(&[PREFIX_ED, 0x47])),
            (R, Reg(Reg8::A)) => Ok(Encoded::new(&[PREFIX_ED, 0x4F])),
            (Reg(Reg8::A), I) => Ok(Encoded::new(&[PREFIX_ED, 0x57])),
            (Reg(Reg8::A), R) => Ok(Encoded::new(&[PREFIX_ED, 0x5F])),

            // 16-bit
            (Pair(Reg16::SP), Pair(Reg16::HL)) => Ok(Encoded::new(&[0xF9])),
            (Pair(Reg16::SP), Index(index)) => Ok(Encoded::new(&[index.prefix(), 0xF9])),
            (Pair(pair), Imm(nn)) => {
                let rp = self.rp(&dst, *pair)?;
                self.word(&src, nn, Encoded::new(&[op::ld_rp_nn(rp)]))
            }
            (Index(index), Imm(nn)) => {
                self.word(&src, nn, Encoded::new(&[index.prefix(), op::ld_rp_nn(2)]))
            }
            (Pair(Reg16::HL), Ind(nn)) => self.word(&src, nn, Encoded::new(&[0x2A])),
            (Index(index), Ind(nn)) => {
                self.word(&src, nn, Encoded::new(&[index.prefix(), 0x2A]))
            }
            (Pair(pair), Ind(nn)) => {
                let rp = self.rp(&dst, *pair)?;
                let enc = Encoded::new(&[PREFIX_ED, op::ld_rp_ind_nn(rp)]);
                self.word(&src, nn, enc)
            }
            (Ind(nn), Pair(Reg16::HL)) => self.word(&dst, nn, Encoded::new(&[0x22])),
            (Ind(nn), Index(index)) => {
                self.word(&dst, nn, Encoded::new(&[index.prefix(), 0x22]))
            }
            (Ind(nn), Pair(pair)) => {
                let rp = self.rp(&src, *pair)?;
                let enc = Encoded::new(&[PREFIX_ED, op::ld_nn_rp(rp)]);
                self.word(&dst, nn, enc)
            }

            // 8-bit immediate
            (_, Imm(n)) => {
                let loc = self.loc(&dst)?;
                let n = self.imm8(&src, n)?;
                Ok(loc.emit(op::ld_r_n(loc.slot)).byte(n))
            }

            // 8-bit register to register
            _ => {
                let (to, from) = (self.loc(&dst)?, self.loc(&src)?);
                let carrier = Loc::pair(to, from).ok_or_else(|| self.invalid(&src))?;
                Ok(carrier.emit(op::ld_r_r(to.slot, from.slot)))
            }
        }
    }

    /// Register pair usable in the `rp` field (`bc de hl sp`).
    pub(super) fn rp(&self, arg: &Arg, pair: Reg16) -> Result<u8, SyntaxError> {
        pair.rp().ok_or_else(|| self.invalid(arg))
    }
}

#[cfg(test)]
mod tests {
    use crate::assembler::Assembler;

    macro_rules! test_ld {
        ($($name:ident: $code:expr => $bin:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let out = Assembler::new().assemble($code);
                    assert!(out.errors.is_empty(), "{:?}", out.errors);
                    assert_eq!(out.bytes, $bin);
                }
            )*
        }
    }

    test_ld! {
        test_ld_a_n: "ld a, 5" => vec![0x3E, 0x05],
        test_ld_a_neg: "ld a, -1" => vec![0x3E, 0xFF],
        test_ld_b_c: "ld b, c" => vec![0x41],
        test_ld_hl_b: "ld (hl), b" => vec![0x70],
        test_ld_a_hl: "ld a, (hl)" => vec![0x7E],
        test_ld_hl_n: "ld (hl), 0x20" => vec![0x36, 0x20],
        test_ld_a_ix: "ld a, (ix+5)" => vec![0xDD, 0x7E, 0x05],
        test_ld_iy_neg_c: "ld (iy-2), c" => vec![0xFD, 0x71, 0xFE],
        test_ld_ix_n: "ld (ix+1), 9" => vec![0xDD, 0x36, 0x01, 0x09],
        test_ld_ix_bare: "ld b, (ix)" => vec![0xDD, 0x46, 0x00],
        test_ld_h_ix: "ld h, (ix+1)" => vec![0xDD, 0x66, 0x01],
        test_ld_ixh_b: "ld ixh, b" => vec![0xDD, 0x60],
        test_ld_a_iyl: "ld a, iyl" => vec![0xFD, 0x7D],
        test_ld_ixh_ixl: "ld ixh, ixl" => vec![0xDD, 0x65],
        test_ld_ixh_n: "ld ixh, 3" => vec![0xDD, 0x26, 0x03],
        test_ld_a_bc: "ld a, (bc)" => vec![0x0A],
        test_ld_de_a: "ld (de), a" => vec![0x12],
        test_ld_a_nn: "ld a, (0x4000)" => vec![0x3A, 0x00, 0x40],
        test_ld_nn_a: "ld (0x4000), a" => vec![0x32, 0x00, 0x40],
        test_ld_i_a: "ld i, a" => vec![0xED, 0x47],
        test_ld_a_r: "ld a, r" => vec![0xED, 0x5F],
        test_ld_bc_nn: "ld bc, 0x1234" => vec![0x01, 0x34, 0x12],
        test_ld_sp_nn: "ld sp, 0xFFFF" => vec![0x31, 0xFF, 0xFF],
        test_ld_ix_nn: "ld ix, 0x1234" => vec![0xDD, 0x21, 0x34, 0x12],
        test_ld_hl_ind: "ld hl, (0x1234)" => vec![0x2A, 0x34, 0x12],
        test_ld_de_ind: "ld de, (0x1234)" => vec![0xED, 0x5B, 0x34, 0x12],
        test_ld_iy_ind: "ld iy, (0x1234)" => vec![0xFD, 0x2A, 0x34, 0x12],
        test_ld_ind_hl: "ld (0x1234), hl" => vec![0x22, 0x34, 0x12],
        test_ld_ind_sp: "ld (0x1234), sp" => vec![0xED, 0x73, 0x34, 0x12],
        test_ld_ind_ix: "ld (0x1234), ix" => vec![0xDD, 0x22, 0x34, 0x12],
        test_ld_sp_hl: "ld sp, hl" => vec![0xF9],
        test_ld_sp_iy: "ld sp, iy" => vec![0xFD, 0xF9],
        test_ld_upper: "LD A, B" => vec![0x78],
    }

    #[test]
    fn rejected() {
        for code in [
            "ld (hl), (hl)",
            "ld ixh, h",
            "ld l, iyl",
            "ld ixh, iyl",
            "ld ixh, (ix+1)",
            "ld af, 1",
            "ld a, 256",
            "ld a, (ix+128)",
            "ld b, (bc)",
            "ld a, label",
        ] {
            let out = Assembler::new().assemble(code);
            assert_eq!(out.errors.len(), 1, "{}", code);
            assert!(out.bytes.is_empty(), "{}", code);
        }
    }
}
