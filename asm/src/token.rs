use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Token { kind, pos }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Single character tokens
    Comma,  // ','
    LParen, // '('
    RParen, // ')'
    Plus,   // '+'
    Minus,  // '-'

    // Line structure
    NewLine,
    EndOfInput,

    // Literals
    Integer(i32),
    Str(String),

    // Identifiers
    Text(String),     // mnemonic, register, condition or label reference
    Label(String),    // `name:`
    Variable(String), // `@name`

    // Special
    Bad(String),
}

impl TokenKind {
    pub fn is_line_end(&self) -> bool {
        matches!(self, TokenKind::NewLine | TokenKind::EndOfInput)
    }
}

/// Source position, both fields 0-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(line: usize, column: usize) -> Self {
        Pos { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Renders the token back to source text that tokenizes to the same kind.
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Comma => write!(f, ","),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::NewLine => writeln!(f),
            TokenKind::EndOfInput => Ok(()),
            TokenKind::Integer(v) => write!(f, "{}", v),
            TokenKind::Str(s) => write!(f, "\"{}\"", escape(s)),
            TokenKind::Text(s) => write!(f, "{}", s),
            TokenKind::Label(s) => write!(f, "{}:", s),
            TokenKind::Variable(s) => write!(f, "@{}", s),
            TokenKind::Bad(s) => write!(f, "{}", s),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            ch => out.push(ch),
        }
    }
    out
}
