use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::query::DEFAULT_TOP_MODELS;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Query the Argentine vehicle-theft registry snapshot (2018-2022)",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarize value kinds and null share for every column
    Profile(ProfileArgs),
    /// Normalize categorical columns and derive year/month, writing a prepared CSV
    Prepare(PrepareArgs),
    /// Most stolen models in a year
    TopModels(TopModelsArgs),
    /// Registry office with the most records in a year
    BusiestOffice(YearArgs),
    /// Theft counts per owner gender in a year
    Gender(YearArgs),
    /// Least stolen models of a brand across all years
    LeastModels(LeastModelsArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Flags shared by every subcommand that reads a snapshot.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Snapshot CSV/TSV file ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// YAML file overriding dataset column names and the year range
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Profile the prepared table instead of the raw snapshot
    #[arg(long)]
    pub prepare: bool,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
}

/// Query flags shared by every aggregation subcommand.
#[derive(Debug, Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Prepare the snapshot (normalize + derive year/month) before querying
    #[arg(long)]
    pub prepare: bool,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct YearArgs {
    #[command(flatten)]
    pub query: QueryArgs,
    /// Year to query (four digits)
    #[arg(short, long)]
    pub year: i32,
}

#[derive(Debug, Args)]
pub struct TopModelsArgs {
    #[command(flatten)]
    pub query: QueryArgs,
    /// Year to query (four digits)
    #[arg(short, long)]
    pub year: i32,
    /// Number of models to return
    #[arg(long, default_value_t = DEFAULT_TOP_MODELS)]
    pub top: usize,
}

#[derive(Debug, Args)]
pub struct LeastModelsArgs {
    #[command(flatten)]
    pub query: QueryArgs,
    /// Brand description, matched exactly (registry brands are upper case)
    #[arg(short, long)]
    pub brand: String,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
