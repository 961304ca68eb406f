use zasm::{Assembler, ErrorKind};

fn lines(code: &str) -> Vec<usize> {
    let out = Assembler::new().assemble(code);
    for err in &out.errors {
        println!("  {}: {}", err.pos, err);
    }
    out.errors.iter().map(|e| e.pos.line).collect()
}

#[test]
fn one_error_per_bad_line() {
    let code = "ld a, 1\nfoo b\nld b,\nadd a, 300\nret";
    assert_eq!(lines(code), vec![1, 2, 3]);

    let out = Assembler::new().assemble(code);
    assert_eq!(out.bytes, vec![0x3E, 0x01, 0xC9]);
    assert_eq!(out.errors[0].kind, ErrorKind::UnknownInstruction("foo".into()));
    assert_eq!(out.errors[2].kind, ErrorKind::ValueOutOfRange(300));
}

#[test]
fn errors_in_textual_order() {
    // the unresolved label is found after encoding but reported in place
    let code = "jp nowhere\nld q, 1\n$";
    assert_eq!(lines(code), vec![0, 1, 2]);
}

#[test]
fn columns() {
    let out = Assembler::new().assemble("  ld a, (ix+200)");
    assert_eq!(out.errors.len(), 1);
    assert_eq!(out.errors[0].kind, ErrorKind::DisplacementOutOfRange(200));
    assert_eq!(out.errors[0].pos.to_string(), "1:9");
}

#[test]
fn unsupported_expression() {
    let out = Assembler::new().assemble("ld a, 1 + b");
    assert_eq!(out.errors.len(), 1);
    assert_eq!(out.errors[0].kind, ErrorKind::UnsupportedExpression);
}

#[test]
fn lexer_errors_do_not_cascade() {
    let out = Assembler::new().assemble("ld a, 0b\nld b, \"open\nnop");
    assert_eq!(out.errors.len(), 2);
    assert!(out
        .errors
        .iter()
        .all(|e| matches!(e.kind, ErrorKind::MalformedLiteral(_))));
    assert_eq!(out.bytes, vec![0x00]);
}

#[test]
fn into_result() {
    assert_eq!(Assembler::new().assemble("nop").into_result(), Ok(vec![0x00]));
    assert!(Assembler::new().assemble("ld").into_result().is_err());
}
