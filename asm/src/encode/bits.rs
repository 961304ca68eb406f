use z80arch::alu::{BitOp, Rot};
use z80arch::op;

use super::{Encoded, Encoder};
use crate::error::SyntaxError;
use crate::operand::Arg;

impl Encoder<'_, '_> {
    /// `rlc rrc rl rr sla sra sll srl`
    pub(super) fn rot(&mut self) -> Result<Encoded, SyntaxError> {
        let Some(rot) = Rot::parse(self.name) else {
            return self.fixed();
        };
        let arg = self.arg()?;
        let loc = self.cb_loc(&arg)?;
        Ok(loc.emit_cb(op::rot(rot, loc.slot)))
    }

    /// `bit res set`
    pub(super) fn bit(&mut self) -> Result<Encoded, SyntaxError> {
        let Some(bit_op) = BitOp::parse(self.name) else {
            return self.fixed();
        };
        let (index, arg) = self.args2()?;
        let bit = match self.number(&index)? {
            bit @ 0..=7 => bit as u8,
            _ => return Err(self.invalid(&index)),
        };
        let loc = self.cb_loc(&arg)?;
        Ok(loc.emit_cb(op::bit(bit_op, bit, loc.slot)))
    }

    /// The `CB` table has no index-half forms.
    fn cb_loc(&self, arg: &Arg) -> Result<super::Loc, SyntaxError> {
        let loc = self.loc(arg)?;
        if loc.is_half() {
            return Err(self.invalid(arg));
        }
        Ok(loc)
    }
}
