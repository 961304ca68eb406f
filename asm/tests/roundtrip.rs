use z80arch::{decode, decode_all};
use zasm::Assembler;

/// Decodes the instruction at the start of `bytes` and assembles its text.
fn check(bytes: &[u8]) {
    let decoded = decode(bytes).unwrap();
    let out = Assembler::new().assemble(&decoded.text);
    let hex: Vec<String> = bytes[..decoded.len]
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect();
    assert!(
        out.errors.is_empty(),
        "{} `{}`: {:?}",
        hex.join(" "),
        decoded.text,
        out.errors
    );
    assert_eq!(out.bytes, &bytes[..decoded.len], "`{}`", decoded.text);
}

#[test]
fn unprefixed() {
    for op in 0..=0xFFu8 {
        if matches!(op, 0xCB | 0xDD | 0xED | 0xFD) {
            continue;
        }
        check(&[op, 0x12, 0x34]);
        check(&[op, 0xF0, 0x80]);
    }
}

#[test]
fn bit_table() {
    for op in 0..=0xFFu8 {
        check(&[0xCB, op]);
    }
}

#[test]
fn extended_table() {
    for op in 0..=0xFFu8 {
        check(&[0xED, op, 0x34, 0x12]);
    }
}

#[test]
fn index_tables() {
    for prefix in [0xDD, 0xFD] {
        for op in 0..=0xFFu8 {
            check(&[prefix, op, 0xF0, 0x12, 0x34]);
            check(&[prefix, op, 0x05, 0x12, 0x34]);
        }
        for op in 0..=0xFFu8 {
            check(&[prefix, 0xCB, 0x7F, op]);
        }
    }
}

#[test]
fn program_listing() {
    let code = "
        ld sp, 0xFFFE
        ld hl, 0x8000
        ld b, 16
    fill:
        ld (hl), 0
        inc hl
        djnz fill
        ld ix, 0x9000
        ld a, (ix+2)
        add a, (iy-1)
        bit 7, a
        jr z, done
        set 0, (ix+4)
        out (0x10), a
        db 'o', 'k', 0
    done:
        halt";
    let first = Assembler::new().assemble(code);
    assert!(first.errors.is_empty(), "{:?}", first.errors);

    let listing = decode_all(&first.bytes)
        .into_iter()
        .map(|(_, decoded)| decoded.text)
        .collect::<Vec<_>>()
        .join("\n");
    let second = Assembler::new().assemble(&listing);
    assert!(second.errors.is_empty(), "{listing}\n{:?}", second.errors);
    assert_eq!(first.bytes, second.bytes);
}
