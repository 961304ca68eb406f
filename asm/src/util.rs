use color_print::cformat;

use crate::assembler::Assembly;
use crate::lexer;

const BYTES_PER_ROW: usize = 4;

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Address, bytes and source text per line. Lines emitting more than four
/// bytes continue on extra rows.
pub fn print_dump(path: &str, source: &str, out: &Assembly) {
    println!("{}+------[{}]{}", "-".repeat(19), path, "-".repeat(45usize.saturating_sub(path.len())));

    let mut spans = out.lines.iter().peekable();
    for (idx, text) in source.lines().enumerate() {
        let has_error = out.errors.iter().any(|e| e.pos.line == idx);
        let code = if has_error {
            cformat!("<r>{}</>", text)
        } else {
            text.to_string()
        };

        let Some(span) = spans.next_if(|span| span.line == idx) else {
            let mark = if has_error { cformat!("<r,s>{:>18}</>", "!!") } else { String::new() };
            println!("{:18} | {:>4}: {}", mark, idx + 1, code);
            continue;
        };

        let bytes = &out.bytes[span.range.clone()];
        let mut rows = bytes.chunks(BYTES_PER_ROW);
        let first = rows.next().unwrap_or(&[]);
        println!(
            "[{:04X}] {:11} | {:>4}: {}",
            span.address,
            hex_bytes(first),
            idx + 1,
            code
        );
        for (n, row) in rows.enumerate() {
            let address = span.address as usize + (n + 1) * BYTES_PER_ROW;
            println!("[{:04X}] {:11} |", address as u16, hex_bytes(row));
        }
    }
    println!("-------------------+-----------------------------------------------------");
}

/// Token stream of the source after macro expansion, one line per token.
pub fn print_tokens(path: &str, source: &str) {
    let expanded = crate::macros::expand(&lexer::normalize(source));
    let (tokens, _) = lexer::tokenize(&expanded.text);
    for token in tokens {
        println!("{}:{:<8} {:?}", path, expanded.source_pos(token.pos), token.kind);
    }
}
