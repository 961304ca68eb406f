use z80arch::op::{self, PREFIX_ED};
use z80arch::reg::{Reg16, Reg8};

use super::{Encoded, Encoder};
use crate::error::SyntaxError;
use crate::operand::Operand;

impl Encoder<'_, '_> {
    pub(super) fn ex(&mut self) -> Result<Encoded, SyntaxError> {
        let (first, second) = self.args2()?;
        match (&first.kind, &second.kind) {
            (Operand::Pair(Reg16::DE), Operand::Pair(Reg16::HL)) => Ok(Encoded::new(&[0xEB])),
            (Operand::Pair(Reg16::AF), Operand::AfShadow) => Ok(Encoded::new(&[0x08])),
            (Operand::IndSp, Operand::Pair(Reg16::HL)) => Ok(Encoded::new(&[0xE3])),
            (Operand::IndSp, Operand::Index(index)) => Ok(Encoded::new(&[index.prefix(), 0xE3])),
            (Operand::Pair(Reg16::DE) | Operand::Pair(Reg16::AF) | Operand::IndSp, _) => {
                Err(self.invalid(&second))
            }
            _ => Err(self.invalid(&first)),
        }
    }

    pub(super) fn push_pop(&mut self) -> Result<Encoded, SyntaxError> {
        let push = self.name == "push";
        let arg = self.arg()?;
        match &arg.kind {
            Operand::Pair(pair) => {
                let rp2 = pair.rp2().ok_or_else(|| self.invalid(&arg))?;
                Ok(Encoded::new(&[if push { op::push(rp2) } else { op::pop(rp2) }]))
            }
            Operand::Index(index) => {
                Ok(Encoded::new(&[index.prefix(), if push { 0xE5 } else { 0xE1 }]))
            }
            _ => Err(self.invalid(&arg)),
        }
    }

    pub(super) fn im(&mut self) -> Result<Encoded, SyntaxError> {
        let arg = self.arg()?;
        let code = op::im(self.number(&arg)?).ok_or_else(|| self.invalid(&arg))?;
        Ok(Encoded::new(&[PREFIX_ED, code]))
    }

    /// `in r, (c)`, `in (c)`, `in a, (n)`
    pub(super) fn input(&mut self) -> Result<Encoded, SyntaxError> {
        let (first, second) = self.args1or2()?;
        let Some(second) = second else {
            return match first.kind {
                Operand::IndC => Ok(Encoded::new(&[PREFIX_ED, op::in_r_c(Reg8::HL_SLOT)])),
                _ => Err(self.invalid(&first)),
            };
        };
        match (&first.kind, &second.kind) {
            (Operand::Reg(reg), Operand::IndC) => {
                Ok(Encoded::new(&[PREFIX_ED, op::in_r_c(reg.slot())]))
            }
            (Operand::Reg(Reg8::A), Operand::Ind(port)) => {
                Ok(Encoded::new(&[0xDB, self.imm8(&second, port)?]))
            }
            (Operand::Reg(_), _) => Err(self.invalid(&second)),
            _ => Err(self.invalid(&first)),
        }
    }

    /// `out (c), r`, `out (c), 0`, `out (n), a`
    pub(super) fn output(&mut self) -> Result<Encoded, SyntaxError> {
        let (first, second) = self.args2()?;
        match (&first.kind, &second.kind) {
            (Operand::IndC, Operand::Reg(reg)) => {
                Ok(Encoded::new(&[PREFIX_ED, op::out_c_r(reg.slot())]))
            }
            (Operand::IndC, Operand::Imm(_)) if self.number(&second)? == 0 => {
                Ok(Encoded::new(&[PREFIX_ED, op::out_c_r(Reg8::HL_SLOT)]))
            }
            (Operand::Ind(port), Operand::Reg(Reg8::A)) => {
                Ok(Encoded::new(&[0xD3, self.imm8(&first, port)?]))
            }
            (Operand::IndC | Operand::Ind(_), _) => Err(self.invalid(&second)),
            _ => Err(self.invalid(&first)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::assembler::Assembler;

    macro_rules! test_misc {
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

    test_misc! {
        test_ex_de_hl: "ex de, hl" => vec![0xEB],
        test_ex_af: "ex af, af'" => vec![0x08],
        test_ex_sp_hl: "ex (sp), hl" => vec![0xE3],
        test_ex_sp_ix: "ex (sp), ix" => vec![0xDD, 0xE3],
        test_push_bc: "push bc" => vec![0xC5],
        test_push_af: "push af" => vec![0xF5],
        test_push_iy: "push iy" => vec![0xFD, 0xE5],
        test_pop_hl: "pop hl" => vec![0xE1],
        test_pop_ix: "pop ix" => vec![0xDD, 0xE1],
        test_im_0: "im 0" => vec![0xED, 0x46],
        test_im_2: "im 2" => vec![0xED, 0x5E],
        test_in_a_n: "in a, (0xFE)" => vec![0xDB, 0xFE],
        test_in_b_c: "in b, (c)" => vec![0xED, 0x40],
        test_in_flags: "in (c)" => vec![0xED, 0x70],
        test_out_n_a: "out (0x10), a" => vec![0xD3, 0x10],
        test_out_c_e: "out (c), e" => vec![0xED, 0x59],
        test_out_c_0: "out (c), 0" => vec![0xED, 0x71],
    }

    #[test]
    fn rejected() {
        for code in ["ex hl, de", "push sp", "im 3", "in b, (0x10)", "out (c), 1", "ex af, bc"] {
            let out = Assembler::new().assemble(code);
            assert_eq!(out.errors.len(), 1, "{}", code);
        }
    }
}
