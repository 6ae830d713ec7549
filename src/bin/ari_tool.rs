//! `ari-tool` — a CLI for the ARI text/CBOR codec and nickname resolver
//! (spec.md §6, SPEC_FULL.md C10). Modeled on the original's `ace_ari`
//! console script: reads a stream of ARIs in one form, optionally resolves
//! nicknames against a loaded ADM catalog, and writes them back out in
//! another form.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use ari_toolkit::adm::AdmCatalog;
use ari_toolkit::ari::Ari;
use ari_toolkit::diag::{from_hexstr, to_hexstr};
use ari_toolkit::nickname::{Converter, Mode};
use ari_toolkit::{cbor, text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Form {
    Text,
    Cbor,
    Cborhex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

/// Convert AMP Resource Identifiers between text, CBOR, and CBOR-hex form.
#[derive(Parser, Debug)]
#[command(name = "ari-tool", version, about, long_about = None)]
struct Args {
    /// Input encoding.
    #[arg(long, value_enum)]
    inform: Form,

    /// Input path, or `-` for stdin.
    #[arg(long, default_value = "-")]
    input: String,

    /// Output encoding.
    #[arg(long, value_enum)]
    outform: Form,

    /// Output path, or `-` for stdout.
    #[arg(long, default_value = "-")]
    output: String,

    /// Fail when a reference cannot be nickname-converted instead of
    /// leaving it in symbolic form.
    #[arg(long)]
    must_nickname: bool,

    /// Logging verbosity.
    #[arg(long, value_enum, default_value = "warning")]
    log_level: LogLevel,

    /// Additional ADM JSON directory to load, in addition to `ADM_PATH`
    /// (repeatable). This crate does not perform XDG discovery itself
    /// (spec.md §1), so at least one source is needed for nickname
    /// conversion to have anything to resolve against.
    #[arg(long = "adm-dir", value_name = "PATH")]
    adm_dirs: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut catalog = AdmCatalog::new();
    let loaded = catalog.load_default_dirs(&args.adm_dirs)?;
    log::info!("loaded {loaded} ADM file(s) into the catalog");

    let checker = ari_toolkit::check::Checker::new();
    for issue in checker.check(&catalog, None) {
        match &issue.adm_name {
            Some(name) => log::warn!("ADM issue ({}) in {name}: {}", issue.check_name, issue.detail),
            None => log::warn!("ADM issue ({}): {}", issue.check_name, issue.detail),
        }
    }

    let input = read_input(&args.input)?;
    let aris = decode_all(args.inform, &input)?;

    // The original CLI prefers symbolic form whenever the output is text
    // and nickname form otherwise, independent of the input's own form
    // (original: `ace_ari.run`'s `nn_mode`).
    let mode = if args.outform == Form::Text {
        Mode::FromNn
    } else {
        Mode::ToNn
    };
    let converter = Converter::new(mode, &catalog, args.must_nickname);

    let mut out: Vec<u8> = Vec::new();
    let mut first_error: Option<Box<dyn std::error::Error>> = None;

    for item in aris {
        let mut ari = match item {
            Ok(ari) => ari,
            Err(e) => {
                first_error.get_or_insert(e);
                break;
            }
        };

        log::info!("decoded ARI as {ari:?}");
        if let Err(e) = converter.convert(&mut ari) {
            first_error.get_or_insert(Box::new(e));
            break;
        }

        match encode_one(args.outform, &ari) {
            Ok(bytes) => out.extend(bytes),
            Err(e) => {
                first_error.get_or_insert(e);
                break;
            }
        }
    }

    write_output(&args.output, &out)?;

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn read_input(path: &str) -> io::Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(path)
    }
}

fn write_output(path: &str, data: &[u8]) -> io::Result<()> {
    if path == "-" {
        io::stdout().write_all(data)
    } else {
        fs::write(path, data)
    }
}

type DecodedAri = Result<Ari, Box<dyn std::error::Error>>;

/// Decode every ARI in `input` per `inform` (spec.md §6): one ARI per line
/// for `text`/`cborhex`, or a CBOR sequence decoded item-by-item for `cbor`.
/// Errors propagate lazily so the caller can emit successful items that
/// preceded a failure (spec.md §6 "propagating the first fatal error after
/// emitting successful outputs that preceded it").
fn decode_all(inform: Form, input: &[u8]) -> Result<Vec<DecodedAri>, Box<dyn std::error::Error>> {
    match inform {
        Form::Text => {
            let text_input = String::from_utf8(input.to_vec())?;
            let mut results = Vec::new();
            let mut acc = text::LineAccumulator::new();
            for line in text_input.lines() {
                if let Some(result) = acc.push_line(line) {
                    results.push(result.map_err(|e| Box::new(e) as Box<dyn std::error::Error>));
                }
            }
            if let Some(err) = acc.finish() {
                results.push(Err(Box::new(err)));
            }
            Ok(results)
        }
        Form::Cborhex => {
            let text_input = String::from_utf8(input.to_vec())?;
            let mut results = Vec::new();
            for line in text_input.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                let decoded = from_hexstr(line.trim())
                    .map_err(|e| Box::new(io::Error::new(io::ErrorKind::InvalidData, e)) as Box<dyn std::error::Error>)
                    .and_then(|bytes| cbor::decode(&bytes).map_err(|e| Box::new(e) as Box<dyn std::error::Error>));
                results.push(decoded);
            }
            Ok(results)
        }
        Form::Cbor => {
            let mut results = Vec::new();
            let mut pos = 0usize;
            while pos < input.len() {
                match cbor::decode_prefix(&input[pos..]) {
                    Ok((ari, consumed)) => {
                        pos += consumed;
                        results.push(Ok(ari));
                    }
                    Err(e) => {
                        results.push(Err(Box::new(e) as Box<dyn std::error::Error>));
                        break;
                    }
                }
            }
            Ok(results)
        }
    }
}

fn encode_one(outform: Form, ari: &Ari) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    match outform {
        Form::Text => {
            let mut line = text::encode(ari);
            line.push('\n');
            Ok(line.into_bytes())
        }
        Form::Cborhex => {
            let bytes = cbor::encode(ari)?;
            let mut line = to_hexstr(&bytes);
            line.push('\n');
            Ok(line.into_bytes())
        }
        Form::Cbor => Ok(cbor::encode(ari)?),
    }
}
