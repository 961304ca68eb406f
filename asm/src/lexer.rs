use std::iter::Peekable;
use std::str::Chars;

use crate::error::{ErrorKind, SyntaxError};
use crate::token::{Pos, Token, TokenKind};

/// Longest identifier or literal the scanner accepts.
pub const SCAN_CAPACITY: usize = 64;

/// Replaces `\r\n` and lone `\r` with `\n`.
pub fn normalize(source: &str) -> String {
    source.replace("\r\n", "\n").replace('\r', "\n")
}

/// Splits `source` into tokens. The stream always ends with one `NewLine`;
/// runs of blank and comment-only lines collapse into a single `NewLine`.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<SyntaxError>) {
    let code = normalize(source);
    Lexer::new(&code).run()
}

struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    errors: Vec<SyntaxError>,
}

impl<'a> Lexer<'a> {
    fn new(code: &'a str) -> Self {
        Lexer {
            iter: code.chars().peekable(),
            line: 0,
            column: 0,
            tokens: vec![],
            errors: vec![],
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.iter.clone().nth(n)
    }

    /// The only place the position advances.
    fn consume(&mut self) -> Option<char> {
        let ch = self.iter.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn pos(&self) -> Pos {
        Pos::new(self.line, self.column)
    }

    /// Consumes the run of characters matching `pred` into a lexeme.
    fn scan_while(&mut self, lexeme: &mut String, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek_nth(0) {
            if !pred(ch) {
                break;
            }
            self.consume();
            lexeme.push(ch);
        }
    }

    fn push(&mut self, kind: TokenKind, pos: Pos) {
        self.tokens.push(Token::new(kind, pos));
    }

    fn push_newline(&mut self, pos: Pos) {
        if !matches!(self.tokens.last(), Some(t) if t.kind == TokenKind::NewLine) {
            self.push(TokenKind::NewLine, pos);
        }
    }

    fn bad(&mut self, lexeme: String, kind: ErrorKind, pos: Pos) {
        let token = Token::new(TokenKind::Bad(lexeme), pos);
        self.errors.push(SyntaxError::at(&token, kind));
        self.tokens.push(token);
    }
}

// ----------------------------------------------------------------------------
// Scanner
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    fn run(mut self) -> (Vec<Token>, Vec<SyntaxError>) {
        while let Some(ch) = self.peek_nth(0) {
            let pos = self.pos();
            match ch {
                ' ' | '\t' => {
                    self.consume();
                }
                ';' => self.skip_comment(),
                '\n' => {
                    self.consume();
                    self.push_newline(pos);
                }
                ',' | '(' | ')' | '+' | '-' => {
                    self.consume();
                    let kind = match ch {
                        ',' => TokenKind::Comma,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '+' => TokenKind::Plus,
                        _ => TokenKind::Minus,
                    };
                    self.push(kind, pos);
                }
                '@' => self.variable(pos),
                '0'..='9' => self.number(pos),
                '\'' => self.char_literal(pos),
                '"' => self.string(pos),
                ch if ch.is_ascii_alphabetic() || ch == '.' => self.identifier(pos),
                ch => {
                    self.consume();
                    self.bad(ch.to_string(), ErrorKind::UnexpectedCharacter(ch), pos);
                }
            }
        }
        let end = self.pos();
        self.push_newline(end);
        (self.tokens, self.errors)
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek_nth(0) {
            if ch == '\n' {
                break;
            }
            self.consume();
        }
    }

    fn identifier(&mut self, pos: Pos) {
        let mut lexeme = String::new();
        self.scan_while(&mut lexeme, |ch| {
            ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '\'')
        });
        if lexeme.len() > SCAN_CAPACITY {
            return self.bad(lexeme, ErrorKind::BufferOverrun, pos);
        }
        if self.peek_nth(0) == Some(':') {
            self.consume();
            self.push(TokenKind::Label(lexeme), pos);
        } else {
            self.push(TokenKind::Text(lexeme), pos);
        }
    }

    fn variable(&mut self, pos: Pos) {
        self.consume(); // consume '@'
        let mut name = String::new();
        self.scan_while(&mut name, |ch| {
            ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_')
        });
        if name.is_empty() {
            return self.bad("@".into(), ErrorKind::MalformedLiteral("@".into()), pos);
        }
        if name.len() > SCAN_CAPACITY {
            return self.bad(format!("@{name}"), ErrorKind::BufferOverrun, pos);
        }
        self.push(TokenKind::Variable(name), pos);
    }

    fn number(&mut self, pos: Pos) {
        let radix = match (self.peek_nth(0), self.peek_nth(1)) {
            (Some('0'), Some('x' | 'X')) => 16,
            (Some('0'), Some('b' | 'B')) => 2,
            _ => 10,
        };
        let mut lexeme = String::new();
        if radix != 10 {
            for _ in 0..2 {
                if let Some(ch) = self.consume() {
                    lexeme.push(ch);
                }
            }
        }
        let start = lexeme.len();
        self.scan_while(&mut lexeme, |ch| ch.is_ascii_alphanumeric() || ch == '_');

        if lexeme.len() > SCAN_CAPACITY {
            return self.bad(lexeme, ErrorKind::BufferOverrun, pos);
        }
        let digits = &lexeme[start..];
        if digits.is_empty() || !digits.chars().all(|ch| ch.is_digit(radix)) {
            let kind = ErrorKind::MalformedLiteral(lexeme.clone());
            return self.bad(lexeme, kind, pos);
        }
        match i32::from_str_radix(digits, radix) {
            Ok(value) => self.push(TokenKind::Integer(value), pos),
            Err(_) => {
                let kind = ErrorKind::LiteralOutOfRange(lexeme.clone());
                self.bad(lexeme, kind, pos)
            }
        }
    }

    /// Reads one possibly escaped character of a quoted literal.
    fn quoted_char(&mut self, lexeme: &mut String) -> Option<char> {
        match self.peek_nth(0) {
            None | Some('\n') => None,
            Some('\\') => {
                self.consume();
                lexeme.push('\\');
                let esc = self.peek_nth(0).filter(|ch| *ch != '\n')?;
                self.consume();
                lexeme.push(esc);
                match esc {
                    'n' => Some('\n'),
                    't' => Some('\t'),
                    'r' => Some('\r'),
                    '0' => Some('\0'),
                    '\\' | '\'' | '"' => Some(esc),
                    _ => None,
                }
            }
            Some(ch) => {
                self.consume();
                lexeme.push(ch);
                Some(ch)
            }
        }
    }

    /// Skips the rest of a broken quoted literal, up to its closing quote or
    /// the end of the line.
    fn recover_quote(&mut self, lexeme: &mut String, quote: char) {
        self.scan_while(lexeme, |ch| ch != quote && ch != '\n');
        if self.peek_nth(0) == Some(quote) {
            self.consume();
            lexeme.push(quote);
        }
    }

    fn char_literal(&mut self, pos: Pos) {
        self.consume(); // consume opening '
        let mut lexeme = String::from("'");
        let value = self.quoted_char(&mut lexeme);
        match (value, self.peek_nth(0)) {
            (Some(ch), Some('\'')) => {
                self.consume();
                self.push(TokenKind::Integer(ch as i32), pos);
            }
            _ => {
                self.recover_quote(&mut lexeme, '\'');
                let kind = ErrorKind::MalformedLiteral(lexeme.clone());
                self.bad(lexeme, kind, pos);
            }
        }
    }

    fn string(&mut self, pos: Pos) {
        self.consume(); // consume opening "
        let mut lexeme = String::from("\"");
        let mut value = String::new();
        loop {
            if self.peek_nth(0) == Some('"') {
                self.consume();
                break;
            }
            match self.quoted_char(&mut lexeme) {
                Some(ch) => value.push(ch),
                None => {
                    self.recover_quote(&mut lexeme, '"');
                    let kind = ErrorKind::MalformedLiteral(lexeme.clone());
                    return self.bad(lexeme, kind, pos);
                }
            }
        }
        if value.len() > SCAN_CAPACITY {
            lexeme.push('"');
            return self.bad(lexeme, ErrorKind::BufferOverrun, pos);
        }
        self.push(TokenKind::Str(value), pos);
    }
}
