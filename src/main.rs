//! pads-ares-converter: PADS ASCII footprint to ARES region file converter
//!
//! Converts the decal of a PADS ASCII export into a Proteus ARES 7 region
//! file and reports everything that could not be carried over.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use pads_ares_converter::config;
use pads_ares_converter::convert::pads_to_ares;
use pads_ares_converter::pads::{LayerModel, ParserOptions};

/// Convert a PADS ASCII decal to an ARES region file.
///
/// Reads the first decal of the PARTDECAL section and writes its pads,
/// silkscreen lines and copper as an ARES 7 `.RGN` file.
#[derive(Parser, Debug)]
#[command(name = "pads-ares-converter")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// PADS ASCII file to read
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Region file to write (stdout if omitted)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Piece headers use the LINES-section field order
    #[arg(long)]
    compat: bool,

    /// Bind padstacks by terminal index before pin designator
    #[arg(long)]
    index_binding: bool,

    /// Padstack layer codes that together mean "all layers"
    #[arg(long, value_name = "CODES", value_delimiter = ',', allow_hyphen_values = true)]
    layers: Option<Vec<i32>>,

    /// Do not write output if any warning was recorded
    #[arg(long)]
    strict: bool,

    /// Also write the decoded design as JSON
    #[arg(long, value_name = "FILE")]
    model_json: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Applies command-line switches on top of the configured parser options.
fn parser_options(args: &Args, mut options: ParserOptions) -> ParserOptions {
    if args.compat {
        options.piece_header_compatibility = true;
    }
    if args.index_binding {
        options.prioritize_padstack_binding_by_index = true;
    }
    if let Some(layers) = &args.layers {
        options.layer_model = LayerModel::Custom {
            layers: layers.clone(),
            all_layer_override: false,
        };
    }
    options
}

/// Reads a text file.
fn read_text(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_text(&bytes, path))
}

/// Decodes input bytes, honoring a byte order mark and falling back to
/// Windows-1252 when unmarked text is not UTF-8.
fn decode_text(bytes: &[u8], path: &Path) -> String {
    if let Some((encoding, bom_length)) = encoding_rs::Encoding::for_bom(bytes) {
        info!(path = %path.display(), encoding = encoding.name(), "Input has a byte order mark");
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        return text.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => {
            info!(path = %path.display(), "Input is not UTF-8, decoding as Windows-1252");
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

/// Entry point for the pads-ares-converter tool.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    if args.layers.as_ref().is_some_and(Vec::is_empty) {
        error!("--layers needs at least one layer code");
        return ExitCode::FAILURE;
    }
    let options = parser_options(&args, cfg.parser);
    let strict = args.strict || cfg.output.fail_on_warnings;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        input = %args.input.display(),
        "Starting conversion"
    );

    let text = match read_text(&args.input) {
        Ok(text) => text,
        Err(e) => {
            error!(path = %args.input.display(), error = %e, "Failed to read input");
            return ExitCode::FAILURE;
        }
    };

    let conversion = match pads_to_ares(&text, &options) {
        Ok(conversion) => conversion,
        Err(e) => {
            error!(error = %e, "Conversion failed");
            return ExitCode::FAILURE;
        }
    };

    if conversion.has_warnings() {
        eprintln!("Warnings:");
        eprint!("{}", conversion.diagnostics);
        if strict {
            error!(
                warnings = conversion.diagnostics.len(),
                "Warnings recorded in strict mode, nothing written"
            );
            return ExitCode::FAILURE;
        }
    }

    if let Some(path) = &args.model_json {
        let written = serde_json::to_string_pretty(&conversion.design)
            .map_err(std::io::Error::from)
            .and_then(|json| std::fs::write(path, json));
        if let Err(e) = written {
            error!(path = %path.display(), error = %e, "Failed to write design model");
            return ExitCode::FAILURE;
        }
    }

    match &args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &conversion.output) {
                error!(path = %path.display(), error = %e, "Failed to write output");
                return ExitCode::FAILURE;
            }
            info!(path = %path.display(), "Region file written");
        }
        None => print!("{}", conversion.output),
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_decoding() {
        let path = Path::new("input.asc");

        let marked = b"\xEF\xBB\xBF!PADS-POWERPCB-V9.0-MILS!";
        assert_eq!(decode_text(marked, path), "!PADS-POWERPCB-V9.0-MILS!");

        assert_eq!(decode_text("caf\u{e9}".as_bytes(), path), "caf\u{e9}");
        assert_eq!(decode_text(b"caf\xE9 \xB5", path), "caf\u{e9} \u{b5}");
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn cli_overrides_config() {
        let args = Args::parse_from([
            "pads-ares-converter",
            "in.asc",
            "--compat",
            "--layers",
            "-2,-1,0,1",
        ]);
        let options = parser_options(&args, ParserOptions::default());
        assert!(options.piece_header_compatibility);
        assert!(!options.prioritize_padstack_binding_by_index);
        assert_eq!(options.layer_model.all_layer_pattern(), &[-2, -1, 0, 1]);
    }

    #[test]
    fn log_level_selection() {
        assert_eq!(get_log_level(0, true, "trace"), Level::ERROR);
        assert_eq!(get_log_level(0, false, "debug"), Level::DEBUG);
        assert_eq!(get_log_level(2, false, "error"), Level::DEBUG);
        assert_eq!(get_log_level(0, false, "bogus"), Level::WARN);
    }
}
