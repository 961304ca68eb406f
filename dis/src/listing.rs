use color_print::cformat;
use z80arch::Decoded;

/// `[addr] bytes  text`, bytes padded to the longest instruction.
pub fn format_line(address: u16, bytes: &[u8], decoded: &Decoded) -> String {
    let hex = bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ");
    let text = if decoded.text.starts_with("db ") {
        cformat!("<y>{}</>", decoded.text)
    } else {
        decoded.text.clone()
    };
    format!("[{:04X}] {:<11}  {}", address, hex, text)
}
