use zasm::Assembler;

fn assert(code: &str, expects: Vec<u8>) {
    let out = Assembler::new().assemble(code);

    println!(" {code}");
    for err in &out.errors {
        println!("  {}: {}", err.pos, err);
    }
    let hex: Vec<String> = out.bytes.iter().map(|b| format!("{:02X}", b)).collect();
    println!("  => {}", hex.join(" "));

    assert!(out.errors.is_empty());
    assert_eq!(out.bytes, expects);
}

macro_rules! case {
    ($name:ident, $code:expr, $expects:expr) => {
        #[test]
        fn $name() {
            assert($code, $expects);
        }
    };
}

// 8-bit loads
case!(ld_r_r, "ld a, b\nld h, l\nld (hl), e", vec![0x78, 0x65, 0x73]);
case!(ld_r_n, "ld c, 0x7F\nld (hl), -1", vec![0x0E, 0x7F, 0x36, 0xFF]);
case!(ld_indexed, "ld (ix+5), 0x12\nld a, (iy-2)", vec![0xDD, 0x36, 0x05, 0x12, 0xFD, 0x7E, 0xFE]);
case!(ld_index_half, "ld ixh, 3\nld a, iyl", vec![0xDD, 0x26, 0x03, 0xFD, 0x7D]);
case!(ld_accumulator_memory, "ld a, (bc)\nld (de), a\nld (0x1234), a", vec![0x0A, 0x12, 0x32, 0x34, 0x12]);
case!(ld_special, "ld a, i\nld r, a", vec![0xED, 0x57, 0xED, 0x4F]);

// 16-bit loads
case!(ld_rp_nn, "ld sp, 0xFFFF\nld ix, 0x4000", vec![0x31, 0xFF, 0xFF, 0xDD, 0x21, 0x00, 0x40]);
case!(ld_hl_ind, "ld hl, (0x4000)\nld (0x4000), hl", vec![0x2A, 0x00, 0x40, 0x22, 0x00, 0x40]);
case!(ld_rp_ind, "ld bc, (0x4000)\nld (0x4000), sp", vec![0xED, 0x4B, 0x00, 0x40, 0xED, 0x73, 0x00, 0x40]);
case!(ld_sp_hl, "ld sp, hl\nld sp, iy", vec![0xF9, 0xFD, 0xF9]);

// arithmetic
case!(alu_forms, "add a, b\nsub 5\nand (hl)\ncp ixl", vec![0x80, 0xD6, 0x05, 0xA6, 0xDD, 0xBD]);
case!(alu_indexed, "xor (ix+1)\nor (iy-128)", vec![0xDD, 0xAE, 0x01, 0xFD, 0xB6, 0x80]);
case!(alu_16, "add hl, sp\nadc hl, de\nsbc hl, bc\nadd ix, bc", vec![0x39, 0xED, 0x5A, 0xED, 0x42, 0xDD, 0x09]);
case!(inc_dec, "inc (hl)\ndec iy\ninc (iy+0)\ndec e", vec![0x34, 0xFD, 0x2B, 0xFD, 0x34, 0x00, 0x1D]);

// zero-operand
case!(block_ops, "ldir\ncpir\notdr\nexx", vec![0xED, 0xB0, 0xED, 0xB1, 0xED, 0xBB, 0xD9]);
case!(control, "di\nei\nhalt\nneg\nreti", vec![0xF3, 0xFB, 0x76, 0xED, 0x44, 0xED, 0x4D]);

// case-insensitive mnemonics and registers
case!(upper_case, "LD A, B\nJP (HL)\nPush IX", vec![0x78, 0xE9, 0xDD, 0xE5]);

// expressions
case!(expressions, "@base 0x4000\nld hl, @base + 2 - 1\nld a, 'z' - 'a'", vec![0x21, 0x01, 0x40, 0x3E, 25]);
case!(comments_and_blank_lines, "; header\n\n  nop ; trailing\n\n\n  ret", vec![0x00, 0xC9]);
