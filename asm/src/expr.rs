//! Operand arithmetic: `term (('+' | '-') term)*`.
//!
//! A term is an integer, a negated integer, a character literal or a
//! `@variable`. A bare label may only open an expression in places that
//! accept one; its value is left to the fixup pass and the rest of the
//! chain becomes the addend.

use crate::cursor::Cursor;
use crate::error::{ErrorKind, SyntaxError};
use crate::symbol::Symbols;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Value(i32),
    Symbol { name: String, addend: i32 },
}

impl Expr {
    pub fn value(&self) -> Option<i32> {
        match self {
            Expr::Value(v) => Some(*v),
            Expr::Symbol { .. } => None,
        }
    }
}

pub fn parse(cur: &mut Cursor, symbols: &Symbols, allow_label: bool) -> Result<Expr, SyntaxError> {
    let start = cur.peek();
    let head = match cur.peek_kind() {
        TokenKind::Text(name) if allow_label => {
            cur.take();
            Expr::Symbol {
                name: name.clone(),
                addend: 0,
            }
        }
        _ => Expr::Value(term(cur, symbols)?),
    };

    let mut addend = 0i32;
    loop {
        let sign = match cur.peek_kind() {
            TokenKind::Plus => 1,
            TokenKind::Minus => -1,
            _ => break,
        };
        let op = cur.take();
        let value = term(cur, symbols)?;
        addend = value
            .checked_mul(sign)
            .and_then(|v| addend.checked_add(v))
            .ok_or_else(|| SyntaxError::at(op, ErrorKind::UnsupportedExpression))?;
    }

    match head {
        Expr::Value(v) => v
            .checked_add(addend)
            .map(Expr::Value)
            .ok_or_else(|| SyntaxError::at(start, ErrorKind::UnsupportedExpression)),
        Expr::Symbol { name, .. } => Ok(Expr::Symbol { name, addend }),
    }
}

fn term(cur: &mut Cursor, symbols: &Symbols) -> Result<i32, SyntaxError> {
    let token: &Token = cur.peek();
    match &token.kind {
        TokenKind::Integer(v) => {
            cur.take();
            Ok(*v)
        }
        TokenKind::Minus => {
            cur.take();
            match cur.peek_kind() {
                TokenKind::Integer(v) => {
                    cur.take();
                    Ok(-*v)
                }
                _ => Err(cur.error(ErrorKind::UnsupportedExpression)),
            }
        }
        TokenKind::Variable(name) => {
            cur.take();
            symbols
                .variable(name)
                .ok_or_else(|| SyntaxError::at(token, ErrorKind::UndefinedVariable(name.clone())))
        }
        _ => Err(cur.error(ErrorKind::UnsupportedExpression)),
    }
}
