pub mod cli;
pub mod config;
pub mod data;
pub mod dataset;
pub mod dates;
pub mod error;
pub mod io_utils;
pub mod mapping;
pub mod metadata;
pub mod normalize;
pub mod prepare;
pub mod profile;
pub mod query;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};
use serde::Serialize;

use crate::{
    cli::{Cli, Commands, OutputFormat, QueryArgs, SourceArgs},
    config::DatasetConfig,
    dataset::Table,
    query::TheftQueries,
};

pub use crate::error::{Error, ErrorClass};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("vehicle_thefts", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    mapping::validate_all().context("Validating category mappings")?;
    let cli = Cli::parse();
    match cli.command {
        Commands::Profile(args) => handle_profile(&args),
        Commands::Prepare(args) => handle_prepare(&args),
        Commands::TopModels(args) => {
            let (table, config) = load_for_query(&args.query)?;
            let models = TheftQueries::new(&table, &config)
                .top_stolen_models(args.year, args.top)
                .with_context(|| format!("Ranking stolen models for {}", args.year))?;
            let rows = models
                .iter()
                .map(|m| vec![m.model.clone(), m.count.to_string()])
                .collect::<Vec<_>>();
            emit(args.query.format, &models, &["model", "count"], &rows)
        }
        Commands::BusiestOffice(args) => {
            let (table, config) = load_for_query(&args.query)?;
            let office = TheftQueries::new(&table, &config)
                .busiest_registry_office(args.year)
                .with_context(|| format!("Finding busiest registry office for {}", args.year))?;
            let rows = vec![vec![office.clone()]];
            emit(args.query.format, &office, &["registry_office"], &rows)
        }
        Commands::Gender(args) => {
            let (table, config) = load_for_query(&args.query)?;
            let counts = TheftQueries::new(&table, &config)
                .theft_counts_by_gender(args.year)
                .with_context(|| format!("Counting thefts by gender for {}", args.year))?;
            let rows = vec![
                vec!["female".to_string(), counts.female.to_string()],
                vec!["male".to_string(), counts.male.to_string()],
                vec!["other".to_string(), counts.other.to_string()],
            ];
            emit(args.query.format, &counts, &["gender", "count"], &rows)
        }
        Commands::LeastModels(args) => {
            let (table, config) = load_for_query(&args.query)?;
            let models = TheftQueries::new(&table, &config)
                .least_stolen_models(&args.brand)
                .with_context(|| format!("Ranking least stolen models for '{}'", args.brand))?;
            let rows = models
                .iter()
                .map(|m| vec![m.brand.clone(), m.model.clone(), m.count.to_string()])
                .collect::<Vec<_>>();
            emit(args.query.format, &models, &["brand", "model", "count"], &rows)
        }
    }
}

fn handle_profile(args: &cli::ProfileArgs) -> Result<()> {
    let (table, config) = load_source(&args.source)?;
    let table = if args.prepare {
        prepare_table(table, &config)?
    } else {
        table
    };
    let summaries = profile::profile(&table);
    for summary in summaries.iter().filter(|s| s.is_mixed()) {
        warn!("Column '{}' mixes {}", summary.name, summary.kinds_display());
    }
    let rows = summaries
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.kinds_display(),
                format!("{:.2}", s.non_null_percent),
                format!("{:.2}", s.null_percent),
                s.nulls.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    emit(
        args.format,
        &summaries,
        &["column", "kinds", "non_null_%", "null_%", "nulls"],
        &rows,
    )?;
    info!("Profiled {} column(s) over {} row(s)", summaries.len(), table.len());
    Ok(())
}

fn handle_prepare(args: &cli::PrepareArgs) -> Result<()> {
    let (table, config) = load_source(&args.source)?;
    let table = prepare_table(table, &config)?;
    let output_delimiter = args.output_delimiter.unwrap_or_else(|| {
        io_utils::resolve_input_delimiter(&args.source.input, args.source.delimiter)
    });
    dataset::write_table(&table, args.output.as_deref(), output_delimiter)?;
    let destination = args
        .output
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());
    info!("Wrote {} prepared row(s) -> {}", table.len(), destination);
    Ok(())
}

fn load_source(source: &SourceArgs) -> Result<(Table, DatasetConfig)> {
    let config = DatasetConfig::load_or_default(source.config.as_deref())?;
    debug!("Dataset config: {config:?}");
    let delimiter = io_utils::resolve_input_delimiter(&source.input, source.delimiter);
    let encoding = io_utils::resolve_encoding(source.input_encoding.as_deref())?;
    let table = dataset::load_table(&source.input, delimiter, encoding)
        .with_context(|| format!("Loading snapshot {:?}", source.input))?;
    Ok((table, config))
}

fn load_for_query(args: &QueryArgs) -> Result<(Table, DatasetConfig)> {
    let (table, config) = load_source(&args.source)?;
    let table = if args.prepare {
        prepare_table(table, &config)?
    } else {
        table
    };
    Ok((table, config))
}

fn prepare_table(table: Table, config: &DatasetConfig) -> Result<Table> {
    let (table, _) = prepare::prepare(table, config).context("Preparing snapshot")?;
    Ok(table)
}

fn emit<T: Serialize + ?Sized>(
    format: OutputFormat,
    value: &T,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(value).context("Serializing JSON output")?;
            println!("{rendered}");
        }
        OutputFormat::Table => {
            let headers = headers.iter().map(|h| h.to_string()).collect::<Vec<_>>();
            table::print_table(&headers, rows);
        }
    }
    Ok(())
}
