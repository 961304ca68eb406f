use z80arch::op;

use super::{Encoded, Encoder};
use crate::error::SyntaxError;
use crate::operand::Operand;

impl Encoder<'_, '_> {
    pub(super) fn jp(&mut self) -> Result<Encoded, SyntaxError> {
        let (first, second) = self.args1or2()?;
        match (&first.kind, second) {
            (Operand::IndHl, None) => Ok(Encoded::new(&[0xE9])),
            (Operand::IndIndex(index), None) => Ok(Encoded::new(&[index.prefix(), 0xE9])),
            (Operand::Imm(nn), None) => self.word(&first, nn, Encoded::new(&[0xC3])),
            (_, Some(target)) => {
                let cc = first.cond().ok_or_else(|| self.invalid(&first))?;
                match &target.kind {
                    Operand::Imm(nn) => self.word(&target, nn, Encoded::new(&[op::jp_cc(cc)])),
                    _ => Err(self.invalid(&target)),
                }
            }
            _ => Err(self.invalid(&first)),
        }
    }

    pub(super) fn jr(&mut self) -> Result<Encoded, SyntaxError> {
        let (first, second) = self.args1or2()?;
        match second {
            None => self.relative(&first, Encoded::new(&[0x18])),
            Some(target) => {
                let code = first
                    .cond()
                    .and_then(op::jr_cc)
                    .ok_or_else(|| self.invalid(&first))?;
                self.relative(&target, Encoded::new(&[code]))
            }
        }
    }

    pub(super) fn djnz(&mut self) -> Result<Encoded, SyntaxError> {
        let target = self.arg()?;
        self.relative(&target, Encoded::new(&[0x10]))
    }

    pub(super) fn call(&mut self) -> Result<Encoded, SyntaxError> {
        let (first, second) = self.args1or2()?;
        match (&first.kind, second) {
            (Operand::Imm(nn), None) => self.word(&first, nn, Encoded::new(&[0xCD])),
            (_, Some(target)) => {
                let cc = first.cond().ok_or_else(|| self.invalid(&first))?;
                match &target.kind {
                    Operand::Imm(nn) => {
                        self.word(&target, nn, Encoded::new(&[op::call_cc(cc)]))
                    }
                    _ => Err(self.invalid(&target)),
                }
            }
            _ => Err(self.invalid(&first)),
        }
    }

    pub(super) fn ret(&mut self) -> Result<Encoded, SyntaxError> {
        if !self.has_args() {
            return Ok(Encoded::new(&[0xC9]));
        }
        let arg = self.arg()?;
        let cc = arg.cond().ok_or_else(|| self.invalid(&arg))?;
        Ok(Encoded::new(&[op::ret_cc(cc)]))
    }

    pub(super) fn rst(&mut self) -> Result<Encoded, SyntaxError> {
        let arg = self.arg()?;
        let code = op::rst(self.number(&arg)?).ok_or_else(|| self.invalid(&arg))?;
        Ok(Encoded::new(&[code]))
    }
}

#[cfg(test)]
mod tests {
    use crate::assembler::Assembler;

    macro_rules! test_jump {
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

    test_jump! {
        test_jp_nn: "jp 0x1234" => vec![0xC3, 0x34, 0x12],
        test_jp_hl: "jp (hl)" => vec![0xE9],
        test_jp_iy: "jp (iy)" => vec![0xFD, 0xE9],
        test_jp_c: "jp c, 0x10" => vec![0xDA, 0x10, 0x00],
        test_jp_pe: "jp pe, 0x10" => vec![0xEA, 0x10, 0x00],
        test_jr_self: "jr 0" => vec![0x18, 0xFE],
        test_jr_nz: "jr nz, 5" => vec![0x20, 0x03],
        test_jr_c_back: "jr c, -10" => vec![0x38, 0xF4],
        test_djnz: "djnz 2" => vec![0x10, 0x00],
        test_call_nn: "call 0x8000" => vec![0xCD, 0x00, 0x80],
        test_call_z: "call z, 0x8000" => vec![0xCC, 0x00, 0x80],
        test_call_m: "call m, 0x8000" => vec![0xFC, 0x00, 0x80],
        test_ret: "ret" => vec![0xC9],
        test_ret_nc: "ret nc" => vec![0xD0],
        test_ret_p: "ret p" => vec![0xF0],
        test_rst_0: "rst 0" => vec![0xC7],
        test_rst_38: "rst 0x38" => vec![0xFF],
    }

    #[test]
    fn rejected() {
        for code in ["jr po, 2", "jp (bc)", "jr 200", "rst 3", "ret hl", "call (hl)", "jp b, 0"] {
            let out = Assembler::new().assemble(code);
            assert_eq!(out.errors.len(), 1, "{}", code);
        }
    }
}
