/// Parses `0x` hex, `0b` binary or decimal addresses.
pub fn parse_address(text: &str) -> Result<u16, String> {
    let (digits, radix) = match text.get(..2) {
        Some("0x" | "0X") => (&text[2..], 16),
        Some("0b" | "0B") => (&text[2..], 2),
        _ => (text, 10),
    };
    u16::from_str_radix(digits, radix).map_err(|e| format!("invalid address `{text}`: {e}"))
}
