//! Decode stage of the CPU.
//!
//! Turns the bytes at the start of a slice into one instruction in the
//! assembler's own syntax. Every byte sequence the assembler emits decodes
//! to text that assembles back to the same bytes; sequences the assembler
//! never emits (undefined `ED` pairs, dangling prefixes, the undocumented
//! register-copy forms of `DD CB`) decode as `db` lines for the same reason.

use crate::alu::{BitOp, Rot, ALU};
use crate::op::{PREFIX_CB, PREFIX_ED};
use crate::reg::{slot_name, Cond, Index, Reg16};
use crate::table::fixed_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub len: usize,
}

/// Decodes the instruction at the start of `bytes`. Returns `None` for an
/// empty slice or an instruction cut short by the end of the slice.
pub fn decode(bytes: &[u8]) -> Option<Decoded> {
    let first = *bytes.first()?;
    let mut fetch = Fetch::new(bytes);
    let text = match first {
        0xDD | 0xFD => {
            let index = Index::from_prefix(first)?;
            match bytes.get(1) {
                Some(&PREFIX_CB) => {
                    fetch.skip(2);
                    indexed_cb(&mut fetch, index)?
                }
                Some(&op) if uses_hl(op) => {
                    fetch.skip(1);
                    main(&mut fetch, Some(index))?
                }
                _ => {
                    fetch.skip(1);
                    db(&bytes[..1])
                }
            }
        }
        PREFIX_CB => {
            fetch.skip(1);
            cb(&mut fetch)?
        }
        PREFIX_ED => {
            fetch.skip(1);
            ed(&mut fetch)?
        }
        _ => main(&mut fetch, None)?,
    };
    Some(Decoded {
        text,
        len: fetch.pos,
    })
}

/// Decodes consecutive instructions until the slice is exhausted. A
/// truncated tail is rendered as `db`.
pub fn decode_all(bytes: &[u8]) -> Vec<(usize, Decoded)> {
    let mut out = vec![];
    let mut pos = 0;
    while pos < bytes.len() {
        let decoded = decode(&bytes[pos..]).unwrap_or_else(|| Decoded {
            text: db(&bytes[pos..]),
            len: bytes.len() - pos,
        });
        let len = decoded.len;
        out.push((pos, decoded));
        pos += len;
    }
    out
}

// ----------------------------------------------------------------------------
// Fetch

struct Fetch<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Fetch<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Fetch { bytes, pos: 0 }
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
    }

    fn byte(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    fn word(&mut self) -> Option<u16> {
        let lo = self.byte()?;
        let hi = self.byte()?;
        Some(u16::from_le_bytes([lo, hi]))
    }

    fn n(&mut self) -> Option<String> {
        Some(format!("0x{:02x}", self.byte()?))
    }

    fn nn(&mut self) -> Option<String> {
        Some(format!("0x{:04x}", self.word()?))
    }

    /// Relative target, written as an offset from the instruction start.
    fn rel(&mut self) -> Option<String> {
        Some(format!("{}", self.byte()? as i8 as i32 + 2))
    }
}

fn db(bytes: &[u8]) -> String {
    let list = bytes
        .iter()
        .map(|b| format!("0x{:02x}", b))
        .collect::<Vec<_>>()
        .join(", ");
    format!("db {}", list)
}

fn indexed(index: Index, disp: u8) -> String {
    let disp = disp as i8;
    if disp < 0 {
        format!("({}-{})", index, -(disp as i32))
    } else {
        format!("({}+{})", index, disp)
    }
}

/// Whether a `DD`/`FD` prefix changes the meaning of unprefixed `op`.
fn uses_hl(op: u8) -> bool {
    let (x, y, z) = (op >> 6, (op >> 3) & 7, op & 7);
    let p = y >> 1;
    match x {
        0 => match z {
            1 => p == 2 || y & 1 == 1,
            2 => p == 2,
            3 => p == 2,
            4 | 5 | 6 => (4..=6).contains(&y),
            _ => false,
        },
        1 => op != 0x76 && ((4..=6).contains(&y) || (4..=6).contains(&z)),
        2 => (4..=6).contains(&z),
        _ => matches!(op, 0xE1 | 0xE3 | 0xE5 | 0xE9 | 0xF9),
    }
}

// ----------------------------------------------------------------------------
// Unprefixed table (also serves DD/FD)

struct Ctx<'a, 'b> {
    fetch: &'a mut Fetch<'b>,
    index: Option<Index>,
}

impl Ctx<'_, '_> {
    fn hl(&self) -> String {
        match self.index {
            Some(index) => index.to_string(),
            None => "hl".to_string(),
        }
    }

    fn rp(&self, p: u8) -> String {
        match Reg16::from_rp(p) {
            Reg16::HL => self.hl(),
            reg => reg.to_string(),
        }
    }

    fn rp2(&self, p: u8) -> String {
        match Reg16::from_rp2(p) {
            Reg16::HL => self.hl(),
            reg => reg.to_string(),
        }
    }

    /// `r` slot operand. `mem` tells whether the same instruction also
    /// touches `(hl)`, in which case `h`/`l` keep their plain meaning.
    fn r(&mut self, slot: u8, mem: bool) -> Option<String> {
        match (slot, self.index) {
            (6, Some(index)) => Some(indexed(index, self.fetch.byte()?)),
            (4, Some(index)) if !mem => Some(index.half(true).to_string()),
            (5, Some(index)) if !mem => Some(index.half(false).to_string()),
            (slot, _) => Some(slot_name(slot).to_string()),
        }
    }
}

fn cond(y: u8) -> String {
    Cond::try_from(y & 7)
        .map(|cc| cc.to_string())
        .unwrap_or_default()
}

fn main(fetch: &mut Fetch, index: Option<Index>) -> Option<String> {
    let op = fetch.byte()?;
    let mut ctx = Ctx { fetch, index };
    let (x, y, z) = (op >> 6, (op >> 3) & 7, op & 7);
    let (p, q) = (y >> 1, y & 1);

    let text = match x {
        0 => match z {
            0 => match y {
                0 => "nop".to_string(),
                1 => "ex af, af'".to_string(),
                2 => format!("djnz {}", ctx.fetch.rel()?),
                3 => format!("jr {}", ctx.fetch.rel()?),
                _ => format!("jr {}, {}", cond(y - 4), ctx.fetch.rel()?),
            },
            1 => match q {
                0 => format!("ld {}, {}", ctx.rp(p), ctx.fetch.nn()?),
                _ => format!("add {}, {}", ctx.hl(), ctx.rp(p)),
            },
            2 => match (q, p) {
                (0, 0) => "ld (bc), a".to_string(),
                (0, 1) => "ld (de), a".to_string(),
                (0, 2) => format!("ld ({}), {}", ctx.fetch.nn()?, ctx.hl()),
                (0, _) => format!("ld ({}), a", ctx.fetch.nn()?),
                (_, 0) => "ld a, (bc)".to_string(),
                (_, 1) => "ld a, (de)".to_string(),
                (_, 2) => format!("ld {}, ({})", ctx.hl(), ctx.fetch.nn()?),
                (_, _) => format!("ld a, ({})", ctx.fetch.nn()?),
            },
            3 => match q {
                0 => format!("inc {}", ctx.rp(p)),
                _ => format!("dec {}", ctx.rp(p)),
            },
            4 => format!("inc {}", ctx.r(y, false)?),
            5 => format!("dec {}", ctx.r(y, false)?),
            6 => {
                let dst = ctx.r(y, false)?;
                format!("ld {}, {}", dst, ctx.fetch.n()?)
            }
            _ => fixed_name(&[op])?.to_string(),
        },
        1 if op == 0x76 => "halt".to_string(),
        1 => {
            let mem = y == 6 || z == 6;
            let dst = ctx.r(y, mem)?;
            let src = ctx.r(z, mem)?;
            format!("ld {}, {}", dst, src)
        }
        2 => alu(ALU::from(y), ctx.r(z, false)?),
        _ => match z {
            0 => format!("ret {}", cond(y)),
            1 => match (q, p) {
                (0, _) => format!("pop {}", ctx.rp2(p)),
                (_, 0) => "ret".to_string(),
                (_, 1) => "exx".to_string(),
                (_, 2) => format!("jp ({})", ctx.hl()),
                (_, _) => format!("ld sp, {}", ctx.hl()),
            },
            2 => format!("jp {}, {}", cond(y), ctx.fetch.nn()?),
            3 => match y {
                0 => format!("jp {}", ctx.fetch.nn()?),
                2 => format!("out ({}), a", ctx.fetch.n()?),
                3 => format!("in a, ({})", ctx.fetch.n()?),
                4 => format!("ex (sp), {}", ctx.hl()),
                5 => "ex de, hl".to_string(),
                6 => "di".to_string(),
                7 => "ei".to_string(),
                // 0xCB never reaches here, the prefix is dispatched above
                _ => return None,
            },
            4 => format!("call {}, {}", cond(y), ctx.fetch.nn()?),
            5 => match (q, p) {
                (0, _) => format!("push {}", ctx.rp2(p)),
                (_, 0) => format!("call {}", ctx.fetch.nn()?),
                _ => return None,
            },
            6 => alu(ALU::from(y), ctx.fetch.n()?),
            _ => format!("rst 0x{:02x}", y * 8),
        },
    };
    Some(text)
}

fn alu(op: ALU, src: String) -> String {
    if op.names_accumulator() {
        format!("{} a, {}", op, src)
    } else {
        format!("{} {}", op, src)
    }
}

// ----------------------------------------------------------------------------
// CB table

fn cb(fetch: &mut Fetch) -> Option<String> {
    let op = fetch.byte()?;
    let (x, y, z) = (op >> 6, (op >> 3) & 7, op & 7);
    Some(match x {
        0 => format!("{} {}", Rot::from(y), slot_name(z)),
        _ => format!("{} {}, {}", BitOp::from(x), y, slot_name(z)),
    })
}

fn indexed_cb(fetch: &mut Fetch, index: Index) -> Option<String> {
    let disp = fetch.byte()?;
    let op = fetch.byte()?;
    let (x, y, z) = (op >> 6, (op >> 3) & 7, op & 7);
    if z != 6 {
        return Some(db(&[index.prefix(), PREFIX_CB, disp, op]));
    }
    let mem = indexed(index, disp);
    Some(match x {
        0 => format!("{} {}", Rot::from(y), mem),
        _ => format!("{} {}, {}", BitOp::from(x), y, mem),
    })
}

// ----------------------------------------------------------------------------
// ED table

fn ed(fetch: &mut Fetch) -> Option<String> {
    let op = fetch.byte()?;
    if let Some(name) = fixed_name(&[PREFIX_ED, op]) {
        return Some(name.to_string());
    }
    let (x, y, z) = (op >> 6, (op >> 3) & 7, op & 7);
    let (p, q) = (y >> 1, y & 1);
    let rp = Reg16::from_rp(p);
    let text = match (x, z) {
        (1, 0) if y == 6 => "in (c)".to_string(),
        (1, 0) => format!("in {}, (c)", slot_name(y)),
        (1, 1) if y == 6 => "out (c), 0".to_string(),
        (1, 1) => format!("out (c), {}", slot_name(y)),
        (1, 2) if q == 0 => format!("sbc hl, {}", rp),
        (1, 2) => format!("adc hl, {}", rp),
        // ld hl, (nn) has a shorter unprefixed form; this one is kept as data
        (1, 3) if p == 2 => db(&[PREFIX_ED, op]),
        (1, 3) if q == 0 => format!("ld ({}), {}", fetch.nn()?, rp),
        (1, 3) => format!("ld {}, ({})", rp, fetch.nn()?),
        (1, 6) => match y {
            0 => "im 0".to_string(),
            2 => "im 1".to_string(),
            3 => "im 2".to_string(),
            _ => db(&[PREFIX_ED, op]),
        },
        (1, 7) => match y {
            0 => "ld i, a".to_string(),
            1 => "ld r, a".to_string(),
            2 => "ld a, i".to_string(),
            3 => "ld a, r".to_string(),
            _ => db(&[PREFIX_ED, op]),
        },
        _ => db(&[PREFIX_ED, op]),
    };
    Some(text)
}
