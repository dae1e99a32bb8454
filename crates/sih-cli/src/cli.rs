//! CLI argument definitions for the SIH converter.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use encoding_rs::Encoding;

use sih_common::resolve_encoding;

#[derive(Parser)]
#[command(
    name = "sih",
    version,
    about = "SIH converter - DATASUS admission tables (DBF) to typed CSV",
    long_about = "Convert DATASUS SIH admission tables (DBF) into typed, delimited UTF-8 text.\n\n\
                  Canonical fields are projected, currency/date/integer values normalized,\n\
                  and coded fields resolved to their descriptions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow record values (patient data) in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert DBF files into typed, enriched CSV.
    Process(ProcessArgs),

    /// Decode DBF files and write every field as raw text.
    Convert(ConvertArgs),

    /// List the canonical SIH fields.
    Schema,

    /// Print the header and field descriptors of a DBF file.
    Inspect(InspectArgs),
}

/// Options shared by `process` and `convert`.
#[derive(Args)]
pub struct InputArgs {
    /// DBF files or directories containing them.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory for generated files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Code page of character fields (any WHATWG label).
    #[arg(long = "encoding", value_name = "LABEL", default_value = "latin1", value_parser = parse_encoding)]
    pub encoding: &'static Encoding,

    /// Output field delimiter.
    #[arg(long = "delimiter", value_name = "CHAR", default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Process files concurrently.
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Write a JSON batch report to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Diagnosis (ICD-10 subcategory) table. Falls back to SIH_DIAGNOSIS_TABLE.
    #[arg(long = "diagnosis", value_name = "PATH")]
    pub diagnosis: Option<PathBuf>,

    /// Field delimiter of the diagnosis table.
    #[arg(long = "diagnosis-delimiter", value_name = "CHAR", default_value = ";", value_parser = parse_delimiter)]
    pub diagnosis_delimiter: u8,

    /// Keep coded fields as raw codes.
    #[arg(long = "no-enrich")]
    pub no_enrich: bool,
}

#[derive(Parser)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// DBF file to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Code page of character fields.
    #[arg(long = "encoding", value_name = "LABEL", default_value = "latin1", value_parser = parse_encoding)]
    pub encoding: &'static Encoding,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_encoding(label: &str) -> Result<&'static Encoding, String> {
    resolve_encoding(label).ok_or_else(|| format!("unknown encoding label `{label}`"))
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "\\t" | "tab" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!("delimiter must be a single ASCII character, got `{value}`")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_process_defaults() {
        let cli = Cli::try_parse_from(["sih", "process", "data"]).unwrap();
        let Command::Process(args) = cli.command else {
            panic!("expected process");
        };
        assert_eq!(args.input.output_dir, PathBuf::from("output"));
        assert_eq!(args.input.encoding, encoding_rs::WINDOWS_1252);
        assert_eq!(args.input.delimiter, b',');
        assert_eq!(args.diagnosis_delimiter, b';');
        assert!(!args.no_enrich);
        assert!(!args.input.parallel);
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let parsed = Cli::try_parse_from(["sih", "convert", "--encoding", "klingon", "a.dbf"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_inputs_required() {
        assert!(Cli::try_parse_from(["sih", "process"]).is_err());
    }
}
