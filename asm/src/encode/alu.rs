use z80arch::alu::ALU;
use z80arch::op::{self, PREFIX_ED};
use z80arch::reg::{Reg16, Reg8};

use super::{Encoded, Encoder};
use crate::error::SyntaxError;
use crate::operand::{Arg, Operand};

impl Encoder<'_, '_> {
    /// `add adc sub sbc and xor or cp`, 8-bit and 16-bit.
    pub(super) fn alu(&mut self) -> Result<Encoded, SyntaxError> {
        let Some(alu) = ALU::parse(self.name) else {
            return self.fixed();
        };
        let (first, second) = self.args1or2()?;
        let Some(second) = second else {
            return self.alu8(alu, &first);
        };
        match (alu, &first.kind, &second.kind) {
            (_, Operand::Reg(Reg8::A), _) => self.alu8(alu, &second),
            (ALU::ADD, Operand::Pair(Reg16::HL), Operand::Pair(pair)) => {
                Ok(Encoded::new(&[op::add_hl_rp(self.rp(&second, *pair)?)]))
            }
            (ALU::ADD, Operand::Index(index), src) => {
                let rp = match src {
                    Operand::Index(other) if other == index => 2,
                    Operand::Pair(pair) if *pair != Reg16::HL => self.rp(&second, *pair)?,
                    _ => return Err(self.invalid(&second)),
                };
                Ok(Encoded::new(&[index.prefix(), op::add_hl_rp(rp)]))
            }
            (ALU::ADC, Operand::Pair(Reg16::HL), Operand::Pair(pair)) => {
                let rp = self.rp(&second, *pair)?;
                Ok(Encoded::new(&[PREFIX_ED, op::adc_hl_rp(rp)]))
            }
            (ALU::SBC, Operand::Pair(Reg16::HL), Operand::Pair(pair)) => {
                let rp = self.rp(&second, *pair)?;
                Ok(Encoded::new(&[PREFIX_ED, op::sbc_hl_rp(rp)]))
            }
            _ => Err(self.invalid(&first)),
        }
    }

    fn alu8(&self, alu: ALU, src: &Arg) -> Result<Encoded, SyntaxError> {
        match &src.kind {
            Operand::Imm(n) => Ok(Encoded::new(&[op::alu_n(alu), self.imm8(src, n)?])),
            _ => {
                let loc = self.loc(src)?;
                Ok(loc.emit(op::alu_r(alu, loc.slot)))
            }
        }
    }

    pub(super) fn inc_dec(&mut self) -> Result<Encoded, SyntaxError> {
        let inc = self.name == "inc";
        let arg = self.arg()?;
        match &arg.kind {
            Operand::Pair(pair) => {
                let rp = self.rp(&arg, *pair)?;
                Ok(Encoded::new(&[if inc { op::inc_rp(rp) } else { op::dec_rp(rp) }]))
            }
            Operand::Index(index) => {
                let code = if inc { op::inc_rp(2) } else { op::dec_rp(2) };
                Ok(Encoded::new(&[index.prefix(), code]))
            }
            _ => {
                let loc = self.loc(&arg)?;
                let code = if inc {
                    op::inc_r(loc.slot)
                } else {
                    op::dec_r(loc.slot)
                };
                Ok(loc.emit(code))
            }
        }
    }
}
