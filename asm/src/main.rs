use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use color_print::cprintln;
use indexmap::IndexMap;
use tracing::Level;

use z80arch::parse_address;
use zasm::util;
use zasm::{link, Assembler, BuildFile, BuildStep, Error, Symbols, Unit};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input files
    #[clap(default_value = "main.z80")]
    input: Vec<PathBuf>,

    /// Output file
    #[clap(short, long, default_value = "main.bin")]
    output: PathBuf,

    /// Load address of the first input
    #[clap(long, default_value = "0", value_parser = parse_address)]
    origin: u16,

    /// Project directory holding `build.zbld` and `src/`
    #[clap(short, long)]
    project: Option<PathBuf>,

    /// Dump assembly listing
    #[clap(short, long)]
    dump: bool,

    /// Print the token stream
    #[clap(long)]
    tokens: bool,

    /// Write the symbol table as YAML
    #[clap(long)]
    symbols: Option<PathBuf>,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[clap(long, default_value_t = Level::WARN)]
    log_level: Level,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    println!("Z80 Assembler by kanade-k-1228");
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            cprintln!("<r,s>{}</>", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let steps = match &args.project {
        Some(dir) => BuildFile::load(dir)?,
        None => args
            .input
            .iter()
            .enumerate()
            .map(|(idx, path)| BuildStep {
                path: path.clone(),
                address: (idx == 0).then_some(args.origin),
            })
            .collect(),
    };

    println!("1. Read Files and Assemble");
    let mut units = vec![];
    let mut symbols: IndexMap<String, Symbols> = IndexMap::new();
    let mut failed = 0;
    let mut next = args.origin as u32;
    for step in steps {
        let name = step.path.display().to_string();
        println!("  < {}", name);
        let source =
            fs::read_to_string(&step.path).map_err(|e| Error::FileOpen(name.clone(), e))?;

        let origin = match step.address {
            Some(address) => address,
            None => u16::try_from(next).map_err(|_| Error::ImageOverflow(name.clone(), next))?,
        };
        if args.tokens {
            util::print_tokens(&name, &source);
        }
        let out = Assembler::with_origin(origin).assemble(&source);
        for err in &out.errors {
            err.print_diag(&name, &source);
        }
        if args.dump {
            util::print_dump(&name, &source, &out);
        }

        failed += out.errors.len();
        next = origin as u32 + out.bytes.len() as u32;
        symbols.insert(name.clone(), out.symbols);
        units.push(Unit {
            name,
            address: Some(origin),
            bytes: out.bytes,
        });
    }
    if failed > 0 {
        return Err(Error::Assembly(failed));
    }

    println!("2. Link Image");
    let image = link(&units)?;
    let output = args.output.display().to_string();
    println!("  > {} (0x{:04X}, {} bytes)", output, image.base, image.bytes.len());
    fs::write(&args.output, &image.bytes).map_err(|e| Error::FileWrite(output, e))?;

    if let Some(path) = &args.symbols {
        println!("3. Write Symbols");
        let name = path.display().to_string();
        println!("  > {}", name);
        let yaml = serde_yaml::to_string(&symbols)?;
        fs::write(path, yaml).map_err(|e| Error::FileWrite(name, e))?;
    }
    Ok(())
}
