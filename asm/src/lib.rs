//! Two-pass Z80 assembler: tokenizer, operand parser, instruction encoder
//! and label fixups, plus the project manifest and image linker used by the
//! `zasm` front end.

pub mod assembler;
pub mod cursor;
pub mod encode;
pub mod error;
pub mod expr;
pub mod fixup;
pub mod lexer;
pub mod macros;
pub mod manifest;
pub mod operand;
pub mod symbol;
pub mod token;
pub mod util;

pub use assembler::{Assembler, Assembly, Line};
pub use error::{Error, ErrorKind, SyntaxError};
pub use manifest::{link, BuildEntry, BuildFile, BuildStep, Image, Unit};
pub use symbol::{Symbol, SymbolKind, Symbols};
pub use token::{Pos, Token, TokenKind};
