use anyhow::{Context, Result, anyhow};
use bookings::categories::GuestCategory;
use bookings::filter;
use bookings::input::Year;
use bookings::options;
use bookings::output;
use bookings::queries::{self, Query};
use bookings::selection::{Region, Selection};
use bookings::table::Table;
use bookings::xlsx;
use clap::Parser;
use cliclack::log;
use itertools::Itertools;
use std::path::Path;
use std::{fs, io};

/// Explore the bookings interactively
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input file (CSV)
    infile: String,
    /// Output file (JSON or XLSX)
    outfile: String,
}

#[derive(Clone, PartialEq, Eq)]
enum Action {
    Undo,
    Categories,
    Years,
    Region,
    Canceled,
    Show,
    Save,
    Quit,
}

fn select_categories(table: &Table, selection: &Selection) -> Result<Selection> {
    let items = options::category_options(table, None)
        .into_iter()
        .map(|c| (c, c.label(), ""))
        .collect_vec();
    let chosen: Vec<GuestCategory> = cliclack::multiselect("Which types of guests?")
        .items(&items)
        .initial_values(selection.categories.iter().copied().collect_vec())
        .required(false)
        .interact()?;
    Ok(Selection {
        categories: chosen.into_iter().collect(),
        ..selection.clone()
    })
}

fn ask_year(prompt: &str, default: Year, bounds: (Year, Year)) -> Result<Option<Year>> {
    let answer: String = cliclack::input(prompt)
        .default_input(&default.to_string())
        .interact()?;
    match answer.trim().parse::<Year>() {
        Ok(y) if bounds.0 <= y && y <= bounds.1 => Ok(Some(y)),
        _ => {
            log::warning(format!(
                "expected a year in {}, got '{answer}'",
                output::pretty_years(&bounds)
            ))?;
            Ok(None)
        }
    }
}

fn select_years(table: &Table, selection: &Selection) -> Result<Selection> {
    let Some(bounds) = options::year_bounds(table) else {
        return Ok(selection.clone());
    };
    let Some(start) = ask_year("First year", selection.years.0, bounds)? else {
        return Ok(selection.clone());
    };
    let Some(end) = ask_year("Last year", selection.years.1.max(start), (start, bounds.1))? else {
        return Ok(selection.clone());
    };
    Ok(Selection {
        years: (start, end),
        ..selection.clone()
    })
}

fn select_region(selection: &Selection) -> Result<Selection> {
    let items = Region::ALL
        .into_iter()
        .map(|r| (r, r.label(), ""))
        .collect_vec();
    let region = cliclack::select("Which part of the world on the map?")
        .items(&items)
        .initial_value(selection.region.unwrap_or(Region::World))
        .interact()?;
    Ok(Selection {
        region: Some(region),
        ..selection.clone()
    })
}

fn show(table: &Table, selection: &Selection) -> Result<()> {
    let items = Query::ALL
        .into_iter()
        .map(|q| (q, q.title(), q.name()))
        .collect_vec();
    let query = cliclack::select("Which chart?").items(&items).interact()?;
    let summary = queries::run(table, selection, query).map_err(|e| anyhow!("{e}"))?;
    let text = if summary.is_empty() {
        "(no bookings)".to_owned()
    } else {
        output::table_lines(&summary).join("\n")
    };
    cliclack::note(query.title(), text)?;
    Ok(())
}

fn save(table: &Table, selection: &Selection, default: &str) -> Result<()> {
    let filename: String = cliclack::input("file name")
        .default_input(default)
        .interact()?;
    let dashboard = queries::dashboard(table, selection).map_err(|e| anyhow!("{e}"))?;
    if filename.ends_with(".xlsx") {
        xlsx::write_workbook(Path::new(&filename), &dashboard).map_err(|e| anyhow!("{e}"))?;
    } else {
        let file =
            fs::File::create(&filename).with_context(|| format!("cannot create {filename}"))?;
        let writer = io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &dashboard)?;
    }
    log::info(format!("Wrote to {filename}"))?;
    Ok(())
}

fn summarize(table: &Table, selection: &Selection) -> String {
    let n = filter::filter(table, selection).len();
    format!("{n}/{} bookings", table.len())
}

fn main() -> Result<()> {
    let args = Args::parse();
    cliclack::intro("bookings-filter")?;
    log::info(format!("Reading {}...", args.infile))?;
    let table = Table::load(Path::new(&args.infile))
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("cannot read {}", args.infile))?;
    let mut history = vec![options::default_selection(&table)];
    loop {
        let selection = history
            .last()
            .cloned()
            .unwrap_or_else(|| options::default_selection(&table));
        let wrap = textwrap::Options::new(70).subsequent_indent(" ");
        let line = format!("{} ← {}", summarize(&table, &selection), selection.pretty());
        cliclack::note("Selection", textwrap::fill(&line, &wrap))?;

        let mut items = vec![];
        if history.len() > 1 {
            items.push((Action::Undo, "Undo last change", ""));
        }
        items.push((Action::Categories, "Select types of guests", ""));
        items.push((Action::Years, "Select years", ""));
        items.push((Action::Region, "Select map region", ""));
        items.push((
            Action::Canceled,
            if selection.exclude_canceled {
                "Include canceled bookings"
            } else {
                "Exclude canceled bookings"
            },
            "",
        ));
        items.push((Action::Show, "Show a chart", ""));
        items.push((Action::Save, "Write all charts to the output file", ""));
        items.push((Action::Quit, "Quit", ""));
        let choice = cliclack::select("Action?").items(&items).interact()?;
        let next = match choice {
            Action::Quit => break,
            Action::Undo => {
                history.pop();
                None
            }
            Action::Categories => Some(select_categories(&table, &selection)?),
            Action::Years => Some(select_years(&table, &selection)?),
            Action::Region => Some(select_region(&selection)?),
            Action::Canceled => Some(Selection {
                exclude_canceled: !selection.exclude_canceled,
                ..selection.clone()
            }),
            Action::Show => {
                show(&table, &selection)?;
                None
            }
            Action::Save => {
                save(&table, &selection, &args.outfile)?;
                None
            }
        };
        if let Some(next) = next {
            if next != selection {
                history.push(next);
            }
        }
    }
    cliclack::outro("Bye!")?;
    Ok(())
}
