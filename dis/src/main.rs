mod listing;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use color_print::cprintln;
use tracing::{debug, Level};
use z80arch::parse_address;

#[derive(Parser, Debug)]
#[clap(
    name = "Z80 Disassembler",
    author = "kanade-k-1228",
    version = "v1.0.0",
    about = "Decode Z80 binaries into assembler syntax"
)]
struct Args {
    #[arg(default_value = "main.bin")]
    input_file: String,

    /// Address of the first byte
    #[arg(long, default_value = "0", value_parser = parse_address)]
    origin: u16,

    /// Stop after this many instructions
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    println!("Z80 Disassembler by kanade-k-1228");
    println!("+-----------------------------------------------+");
    println!("| {:<45} |", args.input_file);
    println!("+-----------------------------------------------+");

    let rom = match std::fs::read(&args.input_file) {
        Ok(rom) => rom,
        Err(e) => {
            cprintln!("<r,s>Failed to open File</>: {}: {}", args.input_file, e);
            return ExitCode::FAILURE;
        }
    };
    debug!(len = rom.len(), origin = args.origin, "loaded");

    let limit = args.count.unwrap_or(usize::MAX);
    for (offset, decoded) in z80arch::decode_all(&rom).into_iter().take(limit) {
        let address = args.origin.wrapping_add(offset as u16);
        let bytes = &rom[offset..offset + decoded.len];
        println!("{}", listing::format_line(address, bytes, &decoded));
    }
    println!("=================================================");
    ExitCode::SUCCESS
}

