//! Instruction encoder.
//!
//! One handler per mnemonic family. Handlers read operands through the
//! cursor and return the instruction bytes together with any label
//! references still to be patched; they never touch the output buffer.

mod alu;
mod bits;
mod data;
mod jump;
mod ld;
mod misc;

use z80arch::reg::{Index, Reg8};
use z80arch::table::fixed_bytes;

use crate::cursor::Cursor;
use crate::error::{ErrorKind, SyntaxError};
use crate::expr::Expr;
use crate::fixup::Width;
use crate::operand::{self, Arg, Operand};
use crate::symbol::Symbols;
use crate::token::{Pos, Token, TokenKind};

/// A label reference inside one encoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFixup {
    pub name: String,
    /// Offset of the placeholder from the first byte of the instruction.
    pub offset: usize,
    pub width: Width,
    pub addend: i32,
    pub pos: Pos,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub fixups: Vec<PendingFixup>,
}

impl Encoded {
    pub fn new(bytes: &[u8]) -> Self {
        Encoded {
            bytes: bytes.to_vec(),
            fixups: vec![],
        }
    }

    pub fn byte(mut self, byte: u8) -> Self {
        self.bytes.push(byte);
        self
    }

    fn reference(&mut self, name: &str, width: Width, addend: i32, pos: Pos) {
        self.fixups.push(PendingFixup {
            name: name.to_string(),
            offset: self.bytes.len(),
            width,
            addend,
            pos,
        });
    }
}

/// Encodes the instruction starting at `mnemonic`; the cursor is left at
/// the token after the last operand.
pub fn instruction(
    mnemonic: &Token,
    cur: &mut Cursor,
    symbols: &Symbols,
) -> Result<Encoded, SyntaxError> {
    let TokenKind::Text(text) = &mnemonic.kind else {
        return Err(SyntaxError::at(mnemonic, ErrorKind::Expected("instruction")));
    };
    let name = text.to_ascii_lowercase();
    let mut enc = Encoder {
        cur,
        symbols,
        mnemonic,
        name: &name,
    };
    match name.len() {
        2 => enc.two(),
        3 => enc.three(),
        4 => enc.four(),
        _ => enc.fixed(),
    }
}

pub(crate) struct Encoder<'c, 'a> {
    cur: &'c mut Cursor<'a>,
    symbols: &'c Symbols,
    mnemonic: &'c Token,
    name: &'c str,
}

// ----------------------------------------------------------------------------
// Dispatch

impl Encoder<'_, '_> {
    fn two(&mut self) -> Result<Encoded, SyntaxError> {
        match self.name {
            "ld" => self.ld(),
            "ex" => self.ex(),
            "jp" => self.jp(),
            "jr" => self.jr(),
            "in" => self.input(),
            "im" => self.im(),
            "or" | "cp" => self.alu(),
            "rl" | "rr" => self.rot(),
            "db" => self.db(),
            "dw" => self.dw(),
            _ => self.fixed(),
        }
    }

    fn three(&mut self) -> Result<Encoded, SyntaxError> {
        match self.name {
            "add" | "adc" | "sub" | "sbc" | "and" | "xor" => self.alu(),
            "inc" | "dec" => self.inc_dec(),
            "rlc" | "rrc" | "sla" | "sra" | "sll" | "srl" => self.rot(),
            "bit" | "res" | "set" => self.bit(),
            "ret" => self.ret(),
            "rst" => self.rst(),
            "pop" => self.push_pop(),
            "out" => self.output(),
            _ => self.fixed(),
        }
    }

    fn four(&mut self) -> Result<Encoded, SyntaxError> {
        match self.name {
            "djnz" => self.djnz(),
            "call" => self.call(),
            "push" => self.push_pop(),
            _ => self.fixed(),
        }
    }

    /// Zero-operand instructions.
    fn fixed(&mut self) -> Result<Encoded, SyntaxError> {
        match fixed_bytes(self.name) {
            Some(bytes) => Ok(Encoded::new(bytes)),
            None => Err(SyntaxError::at(
                self.mnemonic,
                ErrorKind::UnknownInstruction(self.name.to_string()),
            )),
        }
    }
}

// ----------------------------------------------------------------------------
// Operand helpers

impl Encoder<'_, '_> {
    fn arg(&mut self) -> Result<Arg, SyntaxError> {
        operand::parse(self.cur, self.symbols)
    }

    fn comma(&mut self) -> Result<(), SyntaxError> {
        self.cur.expect(&TokenKind::Comma, "`,`")
    }

    fn args2(&mut self) -> Result<(Arg, Arg), SyntaxError> {
        let dst = self.arg()?;
        self.comma()?;
        let src = self.arg()?;
        Ok((dst, src))
    }

    /// One operand, or two when a comma follows the first.
    fn args1or2(&mut self) -> Result<(Arg, Option<Arg>), SyntaxError> {
        let first = self.arg()?;
        if self.cur.eat(&TokenKind::Comma) {
            let second = self.arg()?;
            Ok((first, Some(second)))
        } else {
            Ok((first, None))
        }
    }

    fn has_args(&self) -> bool {
        !self.cur.is_at_line_end()
    }

    fn invalid(&self, arg: &Arg) -> SyntaxError {
        arg.error(ErrorKind::InvalidOperand(self.name.to_string()))
    }

    /// Literal-only operand (`im 1`, `rst 0x38`, `bit 3, ..`).
    fn number(&self, arg: &Arg) -> Result<i32, SyntaxError> {
        match &arg.kind {
            Operand::Imm(Expr::Value(v)) => Ok(*v),
            _ => Err(self.invalid(arg)),
        }
    }

    fn imm8(&self, arg: &Arg, expr: &Expr) -> Result<u8, SyntaxError> {
        match expr {
            Expr::Value(v) if (-128..=255).contains(v) => Ok(*v as u8),
            Expr::Value(v) => Err(arg.error(ErrorKind::ValueOutOfRange(*v))),
            Expr::Symbol { .. } => Err(arg.error(ErrorKind::UnsupportedExpression)),
        }
    }

    /// Appends a 16-bit value, or a placeholder plus fixup for a label.
    fn word(&self, arg: &Arg, expr: &Expr, enc: Encoded) -> Result<Encoded, SyntaxError> {
        let mut enc = enc;
        match expr {
            Expr::Value(v) if (-32768..=65535).contains(v) => {
                enc.bytes.extend_from_slice(&(*v as u16).to_le_bytes());
            }
            Expr::Value(v) => return Err(arg.error(ErrorKind::ValueOutOfRange(*v))),
            Expr::Symbol { name, addend } => {
                enc.reference(name, Width::Absolute, *addend, arg.token.pos);
                enc.bytes.extend_from_slice(&[0, 0]);
            }
        }
        Ok(enc)
    }

    /// Appends a relative displacement. A number is an offset from the
    /// start of the instruction, which is two bytes long.
    fn relative(&self, arg: &Arg, enc: Encoded) -> Result<Encoded, SyntaxError> {
        let mut enc = enc;
        match &arg.kind {
            Operand::Imm(Expr::Value(v)) => {
                let disp = v.saturating_sub(2);
                if !(-128..=127).contains(&disp) {
                    return Err(arg.error(ErrorKind::RelativeOutOfRange(*v)));
                }
                enc.bytes.push(disp as u8);
            }
            Operand::Imm(Expr::Symbol { name, addend }) => {
                enc.reference(name, Width::Relative, *addend, arg.token.pos);
                enc.bytes.push(0);
            }
            _ => return Err(self.invalid(arg)),
        }
        Ok(enc)
    }

    /// Operand that fits the 3-bit `r` field.
    fn loc(&self, arg: &Arg) -> Result<Loc, SyntaxError> {
        let disp = |d: i32| {
            if (-128..=127).contains(&d) {
                Ok(d as u8)
            } else {
                Err(arg.error(ErrorKind::DisplacementOutOfRange(d)))
            }
        };
        match arg.kind {
            Operand::Reg(reg) => Ok(Loc::new(None, reg.slot(), None)),
            Operand::Half(index, reg) => Ok(Loc::new(Some(index), reg.slot(), None)),
            Operand::IndHl => Ok(Loc::new(None, Reg8::HL_SLOT, None)),
            Operand::IndIndex(index) => Ok(Loc::new(Some(index), Reg8::HL_SLOT, Some(0))),
            Operand::Indexed(index, d) => Ok(Loc::new(Some(index), Reg8::HL_SLOT, Some(disp(d)?))),
            _ => Err(self.invalid(arg)),
        }
    }
}

// ----------------------------------------------------------------------------
// Loc

/// Where an 8-bit operand lives: the `r` slot plus the prefix and
/// displacement that index addressing adds around the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Loc {
    index: Option<Index>,
    slot: u8,
    disp: Option<u8>,
}

impl Loc {
    fn new(index: Option<Index>, slot: u8, disp: Option<u8>) -> Self {
        Loc { index, slot, disp }
    }

    fn is_memory(&self) -> bool {
        self.slot == Reg8::HL_SLOT
    }

    /// Index half (`ixh` ...), as opposed to `(ix+d)`.
    fn is_half(&self) -> bool {
        self.index.is_some() && self.disp.is_none()
    }

    /// Plain `h`/`l`, which a prefix would turn into an index half.
    fn is_plain_hl_half(&self) -> bool {
        self.index.is_none() && Reg8::try_from(self.slot).is_ok_and(Reg8::is_hl_half)
    }

    /// `prefix? op disp?`
    fn emit(&self, op: u8) -> Encoded {
        let mut enc = Encoded::default();
        if let Some(index) = self.index {
            enc.bytes.push(index.prefix());
        }
        enc.bytes.push(op);
        if let Some(d) = self.disp {
            enc.bytes.push(d);
        }
        enc
    }

    /// `prefix? CB disp? op`; the indexed form puts the displacement
    /// before the opcode.
    fn emit_cb(&self, op: u8) -> Encoded {
        let mut enc = Encoded::default();
        if let Some(index) = self.index {
            enc.bytes.push(index.prefix());
        }
        enc.bytes.push(z80arch::op::PREFIX_CB);
        if let Some(d) = self.disp {
            enc.bytes.push(d);
        }
        enc.bytes.push(op);
        enc
    }

    /// Checks that two operands can share one opcode and returns the
    /// operand that carries the prefix and displacement, if any.
    fn pair(a: Loc, b: Loc) -> Option<Loc> {
        if a.is_memory() && b.is_memory() {
            return None;
        }
        let (carrier, other) = match (a.index, b.index) {
            (Some(x), Some(y)) if x != y => return None,
            (Some(_), _) => (a, b),
            (None, Some(_)) => (b, a),
            (None, None) => return Some(a),
        };
        let ok = if carrier.is_half() {
            !other.is_plain_hl_half() && !(other.is_memory() && other.index.is_none())
                && !(other.index.is_some() && other.disp.is_some())
        } else {
            // (ix+d) pairs with any plain register, h and l included
            other.index.is_none()
        };
        ok.then_some(carrier)
    }
}
