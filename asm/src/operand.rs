use z80arch::reg::{Cond, Index, Reg16, Reg8};

use crate::cursor::Cursor;
use crate::error::{ErrorKind, SyntaxError};
use crate::expr::{self, Expr};
use crate::symbol::Symbols;
use crate::token::{Token, TokenKind};

/// Syntactic shape of one instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg8),
    Half(Index, Reg8), // ixh ixl iyh iyl, with the slot of h or l
    Pair(Reg16),
    AfShadow,
    Index(Index),
    I,
    R,
    Cond(Cond), // conditions that are not also register names
    IndHl,
    IndBc,
    IndDe,
    IndSp,
    IndC,
    IndIndex(Index),     // (ix)
    Indexed(Index, i32), // (ix+d)
    Ind(Expr),           // (nn)
    Imm(Expr),
}

/// An operand together with the token it starts at, for diagnostics.
#[derive(Debug, Clone)]
pub struct Arg {
    pub kind: Operand,
    pub token: Token,
}

impl Arg {
    pub fn error(&self, kind: ErrorKind) -> SyntaxError {
        SyntaxError::at(&self.token, kind)
    }

    /// `c` doubles as the carry condition.
    pub fn cond(&self) -> Option<Cond> {
        match self.kind {
            Operand::Cond(cc) => Some(cc),
            Operand::Reg(Reg8::C) => Some(Cond::C),
            _ => None,
        }
    }
}

pub fn parse(cur: &mut Cursor, symbols: &Symbols) -> Result<Arg, SyntaxError> {
    let token = cur.peek().clone();
    let kind = match &token.kind {
        TokenKind::Text(name) => match keyword(name) {
            Some(kind) => {
                cur.take();
                kind
            }
            None => Operand::Imm(expr::parse(cur, symbols, true)?),
        },
        TokenKind::LParen => {
            cur.take();
            let kind = indirect(cur, symbols)?;
            cur.expect(&TokenKind::RParen, "`)`")?;
            kind
        }
        TokenKind::Integer(_) | TokenKind::Minus | TokenKind::Variable(_) => {
            Operand::Imm(expr::parse(cur, symbols, false)?)
        }
        _ => return Err(cur.error(ErrorKind::Expected("operand"))),
    };
    Ok(Arg { kind, token })
}

fn keyword(name: &str) -> Option<Operand> {
    if let Some(reg) = Reg8::parse(name) {
        return Some(Operand::Reg(reg));
    }
    if let Some(pair) = Reg16::parse(name) {
        return Some(Operand::Pair(pair));
    }
    if let Some(index) = Index::parse(name) {
        return Some(Operand::Index(index));
    }
    if let Some((index, reg)) = Index::parse_half(name) {
        return Some(Operand::Half(index, reg));
    }
    if let Some(cc) = Cond::parse(name) {
        return Some(Operand::Cond(cc));
    }
    match name.to_ascii_lowercase().as_str() {
        "af'" => Some(Operand::AfShadow),
        "i" => Some(Operand::I),
        "r" => Some(Operand::R),
        _ => None,
    }
}

/// Inside `( ... )`, after the opening parenthesis.
fn indirect(cur: &mut Cursor, symbols: &Symbols) -> Result<Operand, SyntaxError> {
    if let TokenKind::Text(name) = cur.peek_kind() {
        let lower = name.to_ascii_lowercase();
        let simple = match lower.as_str() {
            "hl" => Some(Operand::IndHl),
            "bc" => Some(Operand::IndBc),
            "de" => Some(Operand::IndDe),
            "sp" => Some(Operand::IndSp),
            "c" => Some(Operand::IndC),
            _ => None,
        };
        if let Some(kind) = simple {
            cur.take();
            return Ok(kind);
        }
        if let Some(index) = Index::parse(&lower) {
            cur.take();
            return match cur.peek_kind() {
                TokenKind::Plus => {
                    cur.take();
                    let d = value(cur, symbols)?;
                    Ok(Operand::Indexed(index, d))
                }
                // the minus stays, it negates the first term
                TokenKind::Minus => Ok(Operand::Indexed(index, value(cur, symbols)?)),
                _ => Ok(Operand::IndIndex(index)),
            };
        }
    }
    Ok(Operand::Ind(expr::parse(cur, symbols, true)?))
}

fn value(cur: &mut Cursor, symbols: &Symbols) -> Result<i32, SyntaxError> {
    let start = cur.peek();
    expr::parse(cur, symbols, false)?
        .value()
        .ok_or_else(|| SyntaxError::at(start, ErrorKind::UnsupportedExpression))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn operand(code: &str) -> Result<Operand, ErrorKind> {
        let (tokens, _) = tokenize(code);
        let mut cur = Cursor::new(&tokens);
        parse(&mut cur, &Symbols::new())
            .map(|arg| arg.kind)
            .map_err(|e| e.kind)
    }

    #[test]
    fn shapes() {
        assert_eq!(operand("A"), Ok(Operand::Reg(Reg8::A)));
        assert_eq!(operand("hl"), Ok(Operand::Pair(Reg16::HL)));
        assert_eq!(operand("af'"), Ok(Operand::AfShadow));
        assert_eq!(operand("iyl"), Ok(Operand::Half(Index::IY, Reg8::L)));
        assert_eq!(operand("nz"), Ok(Operand::Cond(Cond::NZ)));
        assert_eq!(operand("(HL)"), Ok(Operand::IndHl));
        assert_eq!(operand("(c)"), Ok(Operand::IndC));
        assert_eq!(operand("(ix)"), Ok(Operand::IndIndex(Index::IX)));
        assert_eq!(operand("(ix+5)"), Ok(Operand::Indexed(Index::IX, 5)));
        assert_eq!(operand("(iy-3)"), Ok(Operand::Indexed(Index::IY, -3)));
        assert_eq!(operand("(0x4000)"), Ok(Operand::Ind(Expr::Value(0x4000))));
        assert_eq!(operand("-1"), Ok(Operand::Imm(Expr::Value(-1))));
        assert_eq!(
            operand("(buf+1)"),
            Ok(Operand::Ind(Expr::Symbol {
                name: "buf".into(),
                addend: 1
            }))
        );
    }

    #[test]
    fn broken() {
        assert_eq!(operand("(hl"), Err(ErrorKind::Expected("`)`")));
        assert_eq!(operand(","), Err(ErrorKind::Expected("operand")));
        assert_eq!(operand("(ix+lbl)"), Err(ErrorKind::UnsupportedExpression));
    }
}
