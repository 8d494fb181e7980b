use bookings::errors::{self, Result};
use bookings::input::{Booking, Hotel, Year};
use bookings::options;
use bookings::output::{self, OError};
use bookings::table::Table;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use itertools::Itertools;
use log::{error, info};
use std::collections::HashSet;
use std::path::Path;
use std::{error, fs, io, process};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Input file (CSV)
    infile: String,
    /// Starting year
    #[arg(long, default_value_t = 0)]
    start: Year,
    /// Ending year
    #[arg(long, default_value_t = 9999)]
    end: Year,
    /// Report errors as a JSON file
    #[arg(long)]
    error_file: Option<String>,
    /// Verbosity
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

struct RawStat<'a> {
    bookings: u64,
    canceled: u64,
    repeated: u64,
    adults: u64,
    children: u64,
    babies: u64,
    countries: HashSet<&'a str>,
    agents: HashSet<u32>,
    companies: HashSet<u32>,
}

impl<'a> RawStat<'a> {
    fn new() -> Self {
        Self {
            bookings: 0,
            canceled: 0,
            repeated: 0,
            adults: 0,
            children: 0,
            babies: 0,
            countries: HashSet::new(),
            agents: HashSet::new(),
            companies: HashSet::new(),
        }
    }

    fn feed_booking(&mut self, booking: &'a Booking) {
        self.bookings += 1;
        if booking.canceled {
            self.canceled += 1;
        }
        if booking.repeated_guest {
            self.repeated += 1;
        }
        self.adults += u64::from(booking.adults);
        self.children += u64::from(booking.children);
        self.babies += u64::from(booking.babies);
        self.countries.insert(&booking.country);
        if booking.agent != 0 {
            self.agents.insert(booking.agent);
        }
        if booking.company != 0 {
            self.companies.insert(booking.company);
        }
    }

    fn print(&self, indent: &str) {
        println!("{indent}- bookings: {}", self.bookings);
        println!("{indent}- canceled: {}", self.canceled);
        println!("{indent}- repeated guests: {}", self.repeated);
        println!(
            "{indent}- guests: {} adults, {} children, {} babies",
            self.adults, self.children, self.babies
        );
        println!("{indent}- countries: {}", self.countries.len());
        println!("{indent}- agents: {}", self.agents.len());
        println!("{indent}- companies: {}", self.companies.len());
    }
}

fn stat(args: &Args, table: &Table) -> Result<()> {
    let Some(years) = options::year_bounds(table) else {
        return Err(errors::load_error_ref("no bookings found"));
    };
    let years = (years.0.max(args.start), years.1.min(args.end));
    info!(target: "bookings", "years: {}", output::pretty_years(&years));
    let mut periods = (years.0..=years.1).map(|y| (y, y)).collect_vec();
    periods.push(years);

    for period in &periods {
        let mut overall = RawStat::new();
        let mut by_hotel = Hotel::ALL.map(|_| RawStat::new());
        for row in table.rows() {
            let b = &row.booking;
            if period.0 <= b.year && b.year <= period.1 {
                overall.feed_booking(b);
                by_hotel[b.hotel as usize].feed_booking(b);
            }
        }
        println!("period: {}", output::pretty_years(period));
        overall.print("");
        for (hotel, s) in Hotel::ALL.iter().zip(&by_hotel) {
            println!("  {hotel}:");
            s.print("  ");
        }
    }
    Ok(())
}

fn process(args: &Args) -> Result<()> {
    let table = Table::load(Path::new(&args.infile))?;
    stat(args, &table)?;
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
            match args.error_file {
                Some(filename) => match store_error(&filename, &*e) {
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
