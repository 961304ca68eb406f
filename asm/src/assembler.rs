use std::ops::Range;

use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::encode::{self, Encoded};
use crate::error::{ErrorKind, SyntaxError};
use crate::expr;
use crate::fixup::{self, Fixup, Width};
use crate::lexer;
use crate::macros;
use crate::symbol::{SymbolKind, Symbols};
use crate::token::{Token, TokenKind};

const ADDRESS_SPACE: i32 = 0x10000;

/// Bytes emitted for one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub line: usize,
    pub address: u16,
    pub range: Range<usize>,
}

/// Everything one assembly run produced. Errors never stop the run, so the
/// bytes are always present; whether they are usable is up to `binary`.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub bytes: Vec<u8>,
    pub errors: Vec<SyntaxError>,
    pub symbols: Symbols,
    pub fixups_resolved: usize,
    pub lines: Vec<Line>,
}

impl Assembly {
    /// The output, unless a label reference was left unpatched.
    pub fn binary(&self) -> Option<&[u8]> {
        if self.errors.iter().any(SyntaxError::is_unresolved) {
            None
        } else {
            Some(&self.bytes)
        }
    }

    pub fn into_result(self) -> Result<Vec<u8>, Vec<SyntaxError>> {
        if self.errors.is_empty() {
            Ok(self.bytes)
        } else {
            Err(self.errors)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Assembler {
    origin: u16,
}

impl Assembler {
    pub fn new() -> Self {
        Assembler::default()
    }

    pub fn with_origin(origin: u16) -> Self {
        Assembler { origin }
    }

    pub fn assemble(&self, source: &str) -> Assembly {
        let code = lexer::normalize(source);
        let mut expanded = macros::expand(&code);
        let (mut tokens, mut lex_errors) = lexer::tokenize(&expanded.text);
        debug!(tokens = tokens.len(), errors = lex_errors.len(), "tokenized");

        // everything after this point reports source positions
        for token in &mut tokens {
            token.pos = expanded.source_pos(token.pos);
        }
        for err in &mut lex_errors {
            err.pos = expanded.source_pos(err.pos);
        }

        let mut unit = Unit {
            origin: self.origin,
            out: Assembly::default(),
            fixups: vec![],
        };
        unit.out.errors.append(&mut expanded.errors);
        unit.out.errors.extend(lex_errors);
        unit.encode(&tokens);
        debug!(
            bytes = unit.out.bytes.len(),
            fixups = unit.fixups.len(),
            "encoded"
        );

        let errors = fixup::resolve(&mut unit.out.bytes, &unit.fixups, &unit.out.symbols);
        unit.out.fixups_resolved = unit.fixups.len() - errors.len();
        unit.out.errors.extend(errors);
        unit.out.errors.sort_by_key(|e| e.pos);
        debug!(
            resolved = unit.out.fixups_resolved,
            errors = unit.out.errors.len(),
            "assembled"
        );
        unit.out
    }
}

/// State of one compilation unit during the encode pass.
struct Unit {
    origin: u16,
    out: Assembly,
    fixups: Vec<Fixup>,
}

impl Unit {
    fn address(&self, offset: usize) -> i32 {
        self.origin as i32 + offset as i32
    }

    fn encode(&mut self, tokens: &[Token]) {
        let mut cur = Cursor::new(tokens);
        while !cur.is_at_end() {
            let token = cur.take();
            let result = match &token.kind {
                TokenKind::NewLine => continue,
                // a label may share its line with an instruction
                TokenKind::Label(name) => {
                    self.label(token, name);
                    continue;
                }
                TokenKind::Variable(name) => self.variable(token, name, &mut cur),
                TokenKind::Text(_) => self.instruction(token, &mut cur),
                TokenKind::Bad(_) => Ok(()),
                _ => Err(SyntaxError::at(token, ErrorKind::Expected("instruction"))),
            };
            if let Err(err) = result {
                if !err.is_follow_up() {
                    self.out.errors.push(err);
                }
            }
            cur.skip_line();
        }
    }

    /// A label stands for the last byte emitted before it.
    fn label(&mut self, token: &Token, name: &str) {
        let value = self.address(self.out.bytes.len()) - 1;
        let result = self
            .out
            .symbols
            .define(name, SymbolKind::Label, value, token.pos);
        if let Err(kind) = result {
            self.out.errors.push(SyntaxError::at(token, kind));
        }
    }

    fn variable(&mut self, token: &Token, name: &str, cur: &mut Cursor) -> Result<(), SyntaxError> {
        let value = match expr::parse(cur, &self.out.symbols, false)? {
            expr::Expr::Value(v) => v,
            expr::Expr::Symbol { .. } => return Err(cur.error(ErrorKind::UnsupportedExpression)),
        };
        end_of_line(cur)?;
        self.out
            .symbols
            .define(name, SymbolKind::Variable, value, token.pos)
            .map_err(|kind| SyntaxError::at(token, kind))
    }

    fn instruction(&mut self, mnemonic: &Token, cur: &mut Cursor) -> Result<(), SyntaxError> {
        let encoded = encode::instruction(mnemonic, cur, &self.out.symbols)?;
        end_of_line(cur)?;
        let end = self.address(self.out.bytes.len() + encoded.bytes.len());
        if end > ADDRESS_SPACE {
            return Err(SyntaxError::at(mnemonic, ErrorKind::AddressOverflow(end)));
        }
        self.emit(mnemonic, encoded);
        Ok(())
    }

    fn emit(&mut self, mnemonic: &Token, encoded: Encoded) {
        let start = self.out.bytes.len();
        self.out.bytes.extend_from_slice(&encoded.bytes);
        for pending in encoded.fixups {
            let offset = start + pending.offset;
            let addend = match pending.width {
                Width::Absolute => pending.addend,
                // baseline relative to the byte after the displacement
                Width::Relative => {
                    let baseline = pending.addend - (self.address(offset) + 1);
                    self.out.bytes[offset] = baseline as u8;
                    baseline
                }
            };
            trace!(name = %pending.name, offset, width = ?pending.width, "fixup recorded");
            self.fixups.push(Fixup {
                name: pending.name,
                offset,
                width: pending.width,
                addend,
                pos: pending.pos,
            });
        }
        self.out.lines.push(Line {
            line: mnemonic.pos.line,
            address: self.address(start) as u16,
            range: start..self.out.bytes.len(),
        });
    }
}

fn end_of_line(cur: &Cursor) -> Result<(), SyntaxError> {
    if cur.is_at_line_end() {
        Ok(())
    } else {
        Err(cur.error(ErrorKind::ExpectedEndOfLine))
    }
}
