use bookings::errors::{self, Result};
use bookings::input::Year;
use bookings::options;
use bookings::output::{self, OError};
use bookings::parallelism;
use bookings::queries::{self, Query};
use bookings::selection::{RawSelection, Selection};
use bookings::table::Table;
use bookings::{filter, information, xlsx};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use itertools::Itertools;
use log::{debug, error, info};
use serde::Serialize;
use std::path::Path;
use std::{error, fs, io, process};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Input file (CSV)
    infile: String,
    /// Output file (JSON)
    outfile: String,
    /// Guest categories to keep, comma-separated (default: all)
    #[arg(long, value_delimiter = ',')]
    categories: Option<Vec<String>>,
    /// First arrival year (default: earliest in data)
    #[arg(long)]
    start: Option<Year>,
    /// Last arrival year (default: latest in data)
    #[arg(long)]
    end: Option<Year>,
    /// Count only bookings that were not canceled
    #[arg(long)]
    exclude_canceled: bool,
    /// Map region: world, europe, asia, africa, north america, south america
    #[arg(long)]
    region: Option<String>,
    /// Queries to run, comma-separated (default: all)
    #[arg(long, value_delimiter = ',')]
    query: Option<Vec<String>>,
    /// Read selections from a JSON file, one dashboard per selection
    #[arg(long)]
    sessions: Option<String>,
    /// Also write the first dashboard as an Excel workbook
    #[arg(long)]
    xlsx: Option<String>,
    /// Report errors as a JSON file
    #[arg(long)]
    error_file: Option<String>,
    /// Produce compact JSON files
    #[arg(long)]
    compact: bool,
    /// Verbosity
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

fn get_queries(args: &Args) -> Result<Vec<Query>> {
    match &args.query {
        None => Ok(Query::ALL.to_vec()),
        Some(names) => names
            .iter()
            .map(|name| {
                Query::parse(name).ok_or_else(|| {
                    errors::invalid_argument(format!(
                        "unknown query '{name}', expected one of: {}",
                        Query::ALL.iter().join(", ")
                    ))
                })
            })
            .collect(),
    }
}

fn raw_selection(args: &Args) -> RawSelection {
    RawSelection {
        categories: args.categories.as_ref().map(|values| {
            values
                .iter()
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .collect_vec()
        }),
        start: args.start,
        end: args.end,
        exclude_canceled: args.exclude_canceled,
        region: args.region.clone(),
    }
}

fn get_selections(args: &Args, defaults: &Selection) -> Result<Vec<Selection>> {
    let raw = match &args.sessions {
        None => vec![raw_selection(args)],
        Some(filename) => {
            info!(target: "bookings", "read: {filename}");
            let data = fs::read_to_string(filename)?;
            serde_json::from_str(&data)?
        }
    };
    Ok(raw
        .iter()
        .map(|r| Selection::resolve(r, defaults))
        .collect_vec())
}

fn write_json<T: Serialize>(args: &Args, value: &T) -> Result<()> {
    let file = fs::File::create(&args.outfile)?;
    let writer = io::BufWriter::new(file);
    if args.compact {
        serde_json::to_writer(writer, value)?;
    } else {
        serde_json::to_writer_pretty(writer, value)?;
    }
    info!(target: "bookings", "wrote: {}", args.outfile);
    Ok(())
}

fn process(args: &Args) -> Result<()> {
    let table = Table::load(Path::new(&args.infile))?;
    let charts = get_queries(args)?;
    let defaults = options::default_selection(&table);
    let selections = get_selections(args, &defaults)?;
    for selection in &selections {
        info!(target: "bookings", "selection: {}", selection.pretty());
    }
    let dashboards = if selections.len() == 1 {
        information::post_statistics(&filter::filter(&table, &selections[0]));
        vec![queries::dashboard_with(&table, &selections[0], &charts)?]
    } else {
        parallelism::compute_parallel(&table, &selections, &charts)?
    };
    for dashboard in &dashboards {
        for summary in &dashboard.summaries {
            info!(
                target: "bookings",
                "{}: {} rows ({})",
                summary.query,
                summary.table.len(),
                summary.table.pretty()
            );
            for line in output::table_lines(&summary.table) {
                debug!(target: "bookings", "  {line}");
            }
        }
    }
    if args.sessions.is_some() {
        write_json(args, &dashboards)?;
    } else {
        write_json(args, &dashboards[0])?;
    }
    if let Some(filename) = &args.xlsx {
        match dashboards.first() {
            Some(dashboard) => xlsx::write_workbook(Path::new(filename), dashboard)?,
            None => return Err(errors::invalid_argument_ref("no sessions to write")),
        }
    }
    Ok(())
}

fn store_error(error_file: &str, e: &dyn error::Error) -> Result<()> {
    let error = OError {
        error: format!("{e}"),
    };
    let file = fs::File::create(error_file)?;
    let writer = io::BufWriter::new(file);
    serde_json::to_writer(writer, &error)?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    pretty_env_logger::formatted_timed_builder()
        .filter_level(args.verbose.log_level_filter())
        .init();
    match process(&args) {
        Ok(()) => (),
        Err(e) => {
            match &args.error_file {
                Some(filename) => match store_error(filename, &*e) {
                    Ok(()) => {
                        info!(target: "bookings", "error reported: {e}");
                    }
                    Err(e2) => {
                        error!(target: "bookings", "{e}");
                        error!(target: "bookings", "{e2}");
                    }
                },
                None => error!(target: "bookings", "{e}"),
            }
            process::exit(1);
        }
    }
}
