use super::{Encoded, Encoder};
use crate::error::{ErrorKind, SyntaxError};
use crate::operand::Operand;
use crate::token::TokenKind;

impl Encoder<'_, '_> {
    /// `db 1, 'x', "text", @n - 1`
    pub(super) fn db(&mut self) -> Result<Encoded, SyntaxError> {
        let mut enc = Encoded::default();
        loop {
            if let TokenKind::Str(text) = self.cur.peek_kind() {
                let token = self.cur.take();
                for ch in text.chars() {
                    let byte = u8::try_from(u32::from(ch))
                        .map_err(|_| SyntaxError::at(token, ErrorKind::ValueOutOfRange(ch as i32)))?;
                    enc.bytes.push(byte);
                }
            } else {
                let arg = self.arg()?;
                match &arg.kind {
                    Operand::Imm(n) => enc.bytes.push(self.imm8(&arg, n)?),
                    _ => return Err(self.invalid(&arg)),
                }
            }
            if !self.cur.eat(&TokenKind::Comma) {
                return Ok(enc);
            }
        }
    }

    /// `dw 0x1234, label, label+2`
    pub(super) fn dw(&mut self) -> Result<Encoded, SyntaxError> {
        let mut enc = Encoded::default();
        loop {
            let arg = self.arg()?;
            enc = match &arg.kind {
                Operand::Imm(nn) => self.word(&arg, nn, enc)?,
                _ => return Err(self.invalid(&arg)),
            };
            if !self.cur.eat(&TokenKind::Comma) {
                return Ok(enc);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::assembler::Assembler;
    use crate::error::ErrorKind;

    #[test]
    fn bytes_and_strings() {
        let out = Assembler::new().assemble("db 1, 'A', \"hi\\n\", -1, 0xff");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert_eq!(out.bytes, vec![0x01, 0x41, b'h', b'i', b'\n', 0xFF, 0xFF]);
    }

    #[test]
    fn words() {
        let out = Assembler::new().assemble("dw 0x1234, -2\ndw end+1\nend:");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert_eq!(out.bytes, vec![0x34, 0x12, 0xFE, 0xFF, 0x06, 0x00]);
    }

    #[test]
    fn wide_characters() {
        let out = Assembler::new().assemble("db \"\u{e9}\"\ndb \"x\u{20ac}\", 1\ndb '\u{20ac}'");
        let kinds = out.errors.iter().map(|e| e.kind.clone()).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::ValueOutOfRange(0x20AC),
                ErrorKind::ValueOutOfRange(0x20AC),
            ]
        );
        assert_eq!(out.errors[0].pos.to_string(), "2:4");
        assert_eq!(out.bytes, vec![0xE9]);
    }

    #[test]
    fn rejected() {
        for code in ["db label", "db 256", "dw (hl)", "db 1,"] {
            let out = Assembler::new().assemble(code);
            assert_eq!(out.errors.len(), 1, "{}", code);
        }
    }
}
