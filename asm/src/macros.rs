//! `%define` / `%undefine` text substitution, run before tokenizing.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ErrorKind, SyntaxError};
use crate::token::Pos;

#[derive(Debug, Default)]
pub struct Expanded {
    pub text: String,
    /// Definitions still in effect at the end of the source.
    pub defines: IndexMap<String, String>,
    pub errors: Vec<SyntaxError>,
    /// Per line, `None` where the text was left as written.
    columns: Vec<Option<ColumnMap>>,
}

impl Expanded {
    /// Position in the source for a position in the expanded text.
    pub fn source_pos(&self, pos: Pos) -> Pos {
        match self.columns.get(pos.line) {
            Some(Some(map)) => Pos::new(pos.line, map.source_column(pos.column)),
            _ => pos,
        }
    }
}

/// Source column of every character of one expanded line, plus one entry
/// for the line end. Replacement text maps to the start of the macro name.
#[derive(Debug, Default)]
struct ColumnMap(Vec<usize>);

impl ColumnMap {
    fn source_column(&self, column: usize) -> usize {
        let end = self.0.len().saturating_sub(1);
        match self.0.get(column) {
            Some(&col) => col,
            None => self.0.get(end).copied().unwrap_or(0) + (column - end),
        }
    }
}

#[derive(Debug, Default)]
struct Substituted {
    text: String,
    columns: ColumnMap,
}

impl Substituted {
    fn push(&mut self, ch: char, column: usize) {
        self.text.push(ch);
        self.columns.0.push(column);
    }
}

/// Expands macros in already normalized source. Directive lines become
/// empty lines so positions of the remaining lines do not move.
pub fn expand(code: &str) -> Expanded {
    let mut out = Expanded::default();
    let mut lines = vec![];

    for (idx, line) in code.split('\n').enumerate() {
        let trimmed = line.trim_start();
        if let Some(directive) = trimmed.strip_prefix('%') {
            let column = line.len() - trimmed.len();
            if let Err(kind) = directive_line(directive, &mut out.defines) {
                out.errors.push(SyntaxError::new(Pos::new(idx, column), kind));
            }
            lines.push(String::new());
            out.columns.push(None);
        } else if out.defines.is_empty() {
            lines.push(line.to_string());
            out.columns.push(None);
        } else {
            let sub = substitute(line, &out.defines);
            out.columns.push((sub.text != line).then_some(sub.columns));
            lines.push(sub.text);
        }
    }

    debug!(
        defines = out.defines.len(),
        errors = out.errors.len(),
        "macro pre-pass done"
    );
    out.text = lines.join("\n");
    out
}

fn directive_line(
    directive: &str,
    defines: &mut IndexMap<String, String>,
) -> Result<(), ErrorKind> {
    let directive = strip_comment(directive);
    let (word, rest) = split_word(directive);
    let (name, body) = split_word(rest.trim_start());
    match word {
        "define" => {
            if name.is_empty() {
                return Err(ErrorKind::MissingMacroName);
            }
            defines.insert(name.to_string(), body.trim().to_string());
            Ok(())
        }
        "undefine" => {
            if name.is_empty() {
                return Err(ErrorKind::MissingMacroName);
            }
            match defines.shift_remove(name) {
                Some(_) => Ok(()),
                None => Err(ErrorKind::UndefinedMacro(name.to_string())),
            }
        }
        word => Err(ErrorKind::UnknownDirective(word.to_string())),
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn split_word(s: &str) -> (&str, &str) {
    match s.find(|ch: char| ch.is_whitespace()) {
        Some(idx) => (&s[..idx], &s[idx..]),
        None => (s, ""),
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '\'')
}

/// Replaces whole identifier words outside comments and quoted literals.
/// Replacement text is not scanned again.
fn substitute(line: &str, defines: &IndexMap<String, String>) -> Substituted {
    let chars: Vec<char> = line.chars().collect();
    let mut out = Substituted::default();
    let mut col = 0;

    while col < chars.len() {
        let ch = chars[col];
        match ch {
            ';' => {
                for (i, &c) in chars.iter().enumerate().skip(col) {
                    out.push(c, i);
                }
                col = chars.len();
            }
            '"' | '\'' if ch == '"' || !out.text.ends_with(is_word_char) => {
                out.push(ch, col);
                col += 1;
                let mut escape = false;
                while let Some(&c) = chars.get(col) {
                    out.push(c, col);
                    col += 1;
                    match (escape, c) {
                        (true, _) => escape = false,
                        (false, '\\') => escape = true,
                        (false, c) if c == ch => break,
                        _ => {}
                    }
                }
            }
            ch if ch.is_ascii_alphabetic() || ch == '.' || ch == '_' => {
                let start = col;
                col += 1;
                while chars.get(col).is_some_and(|&c| is_word_char(c)) {
                    col += 1;
                }
                let word: String = chars[start..col].iter().collect();
                match defines.get(&word) {
                    Some(text) => text.chars().for_each(|c| out.push(c, start)),
                    None => (start..col).for_each(|i| out.push(chars[i], i)),
                }
            }
            // variable names are not macro names, digits start literals
            ch if ch == '@' || ch.is_ascii_digit() => {
                out.push(ch, col);
                col += 1;
                while let Some(&c) = chars.get(col).filter(|&&c| is_word_char(c)) {
                    out.push(c, col);
                    col += 1;
                }
            }
            ch => {
                out.push(ch, col);
                col += 1;
            }
        }
    }
    out.columns.0.push(chars.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_use() {
        let out = expand("%define PORT 0x10\nout (PORT), a\n%undefine PORT\nout (PORT), a");
        assert!(out.errors.is_empty());
        assert_eq!(out.text, "\nout (0x10), a\n\nout (PORT), a");
        assert!(out.defines.is_empty());
    }

    #[test]
    fn whole_words_only() {
        let mut defines = IndexMap::new();
        defines.insert("n".to_string(), "5".to_string());
        assert_eq!(substitute("ld a, n ; n", &defines).text, "ld a, 5 ; n");
        assert_eq!(substitute("ld a, nn", &defines).text, "ld a, nn");
        assert_eq!(substitute("db \"n\", 'n', @n", &defines).text, "db \"n\", 'n', @n");
        assert_eq!(substitute("ld b, 0xn", &defines).text, "ld b, 0xn");
    }

    #[test]
    fn columns_follow_the_source() {
        let out = expand("%define LONG 1\nld a, LONG + b\nnop");
        assert_eq!(out.text, "\nld a, 1 + b\nnop");
        // `1` maps to the start of `LONG`, the rest shifts by three
        assert_eq!(out.source_pos(Pos::new(1, 6)), Pos::new(1, 6));
        assert_eq!(out.source_pos(Pos::new(1, 10)), Pos::new(1, 13));
        assert_eq!(out.source_pos(Pos::new(1, 11)), Pos::new(1, 14));
        assert_eq!(out.source_pos(Pos::new(2, 1)), Pos::new(2, 1));

        let out = expand("%define N 12345\nld a, N");
        assert_eq!(out.source_pos(Pos::new(1, 9)), Pos::new(1, 6));
        assert_eq!(out.source_pos(Pos::new(1, 11)), Pos::new(1, 7));
    }

    #[test]
    fn not_recursive() {
        let out = expand("%define A B\n%define B A\nA B");
        assert_eq!(out.text, "\n\nB A");
        assert_eq!(out.defines.len(), 2);
    }

    #[test]
    fn directive_errors() {
        let out = expand("%define\n  %undefine X\n%include foo");
        let kinds = out.errors.iter().map(|e| e.kind.clone()).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::MissingMacroName,
                ErrorKind::UndefinedMacro("X".into()),
                ErrorKind::UnknownDirective("include".into()),
            ]
        );
        assert_eq!(out.errors[1].pos, Pos::new(1, 2));
        assert_eq!(out.text, "\n\n");
    }
}
