use color_print::cprintln;
use thiserror::Error;

use crate::token::{Pos, Token, TokenKind};

/// Every diagnostic the assembler collects while it keeps going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    // Lexical
    #[error("Unexpected character: `{0}`")]
    UnexpectedCharacter(char),

    #[error("Literal overruns the scan buffer")]
    BufferOverrun,

    #[error("Malformed literal: `{0}`")]
    MalformedLiteral(String),

    #[error("Literal out of range: `{0}`")]
    LiteralOutOfRange(String),

    // Syntax
    #[error("Unknown instruction: `{0}`")]
    UnknownInstruction(String),

    #[error("Invalid operand for `{0}`")]
    InvalidOperand(String),

    #[error("Expected {0}")]
    Expected(&'static str),

    #[error("Expected end of line")]
    ExpectedEndOfLine,

    #[error("Unsupported expression")]
    UnsupportedExpression,

    #[error("Undefined variable: `@{0}`")]
    UndefinedVariable(String),

    #[error("Value out of range: {0}")]
    ValueOutOfRange(i32),

    #[error("Displacement out of range: {0}")]
    DisplacementOutOfRange(i32),

    // Symbols
    #[error("Re-defined symbol: `{0}`")]
    RedefinedSymbol(String),

    #[error("Unresolved symbol: `{0}`")]
    UnresolvedSymbol(String),

    #[error("Relative jump out of range: {0}")]
    RelativeOutOfRange(i32),

    #[error("Code runs past the end of memory at 0x{0:X}")]
    AddressOverflow(i32),

    // Macro pre-pass
    #[error("Missing macro name")]
    MissingMacroName,

    #[error("Unknown directive: `%{0}`")]
    UnknownDirective(String),

    #[error("Undefined macro: `{0}`")]
    UndefinedMacro(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct SyntaxError {
    pub pos: Pos,
    pub kind: ErrorKind,
    pub token: Option<TokenKind>,
}

impl SyntaxError {
    pub fn new(pos: Pos, kind: ErrorKind) -> Self {
        SyntaxError {
            pos,
            kind,
            token: None,
        }
    }

    pub fn at(token: &Token, kind: ErrorKind) -> Self {
        SyntaxError {
            pos: token.pos,
            kind,
            token: Some(token.kind.clone()),
        }
    }

    /// The lexer has already reported the token this error points at.
    pub fn is_follow_up(&self) -> bool {
        matches!(self.token, Some(TokenKind::Bad(_)))
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self.kind, ErrorKind::UnresolvedSymbol(_))
    }

    /// Print error with diagnostic information showing file location and line content
    pub fn print_diag(&self, file: &str, source: &str) {
        cprintln!("<red,bold>error</>: {}", self);

        let line_num = self.pos.line + 1;
        cprintln!(
            "     <blue>--></> <underline>{}:{}</>",
            file,
            self.pos
        );
        cprintln!("      <blue>|</>");

        let line_content = source.lines().nth(self.pos.line).unwrap_or("");
        cprintln!(" <blue>{:>4} |</> {}", line_num, line_content);
        cprintln!(
            "      <blue>|</> {}<red,bold>^</>",
            " ".repeat(self.pos.column)
        );
    }
}

/// Failures of the front end: files, build manifest and linking.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read directory: {0}")]
    DirRead(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Invalid address in build file: `{0}`")]
    BuildAddress(String),

    #[error("`{name}` at 0x{at:04X} overlaps the previous unit ending at 0x{end:04X}")]
    Overlap { name: String, at: u16, end: u32 },

    #[error("Image does not fit in 64K: `{0}` ends at 0x{1:X}")]
    ImageOverflow(String, u32),

    #[error("Failed to serialize symbols")]
    Symbols(#[from] serde_yaml::Error),

    #[error("Assembly failed with {0} error(s)")]
    Assembly(usize),
}
