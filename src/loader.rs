//! Reading and normalizing the bookings CSV file.

use crate::errors::{self, Result};
use crate::input::{self, Booking, Hotel, UNDEFINED_COUNTRY, Year};
use crate::months::Month;
use log::{debug, info};
use std::path::Path;
use std::{fs, io};

const HOTEL: &str = "hotel";
const IS_CANCELED: &str = "is_canceled";
const YEAR: &str = "arrival_date_year";
const MONTH: &str = "arrival_date_month";
const DAY: &str = "arrival_date_day_of_month";
const ADULTS: &str = "adults";
const CHILDREN: &str = "children";
const BABIES: &str = "babies";
const COUNTRY: &str = "country";
const MARKET_SEGMENT: &str = "market_segment";
const IS_REPEATED_GUEST: &str = "is_repeated_guest";
const AGENT: &str = "agent";
const COMPANY: &str = "company";

/// Loads and normalizes the bookings in `path`.
pub fn load(path: &Path) -> Result<Vec<Booking>> {
    info!(target: "bookings", "read: {}", path.display());
    let file = fs::File::open(path)
        .map_err(|e| errors::load_error(format!("{}: {e}", path.display())))?;
    load_from_reader(io::BufReader::new(file))
}

/// Loads and normalizes bookings from any CSV source with a header row.
pub fn load_from_reader<R: io::Read>(reader: R) -> Result<Vec<Booking>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| errors::load_error(format!("cannot read header: {e}")))?
        .clone();
    let columns = Columns::new(&headers)?;
    let mut stats = NormalizeStats::default();
    let mut bookings = vec![];
    for record in rdr.records() {
        let record = record.map_err(|e| errors::load_error(format!("{e}")))?;
        let line = record.position().map_or(0, |p| p.line());
        stats.rows += 1;
        let booking = columns.parse(&record, line, &mut stats)?;
        if booking.is_zero_occupancy() {
            stats.zero_occupancy += 1;
            continue;
        }
        bookings.push(booking);
    }
    stats.log();
    Ok(bookings)
}

#[derive(Default)]
struct NormalizeStats {
    rows: u64,
    children: u64,
    country: u64,
    agent: u64,
    company: u64,
    zero_occupancy: u64,
}

impl NormalizeStats {
    fn log(&self) {
        info!(target: "bookings", "rows read: {}", self.rows);
        info!(
            target: "bookings",
            "nulls replaced: {} children, {} country, {} agent, {} company",
            self.children, self.country, self.agent, self.company
        );
        info!(
            target: "bookings",
            "zero-occupancy bookings dropped: {}", self.zero_occupancy
        );
    }
}

struct Columns {
    hotel: usize,
    canceled: usize,
    year: usize,
    month: usize,
    day: usize,
    adults: usize,
    babies: usize,
    market_segment: usize,
    repeated_guest: usize,
    children: Option<usize>,
    country: Option<usize>,
    agent: Option<usize>,
    company: Option<usize>,
}

impl Columns {
    fn new(headers: &csv::StringRecord) -> Result<Columns> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let required = [
            HOTEL,
            IS_CANCELED,
            YEAR,
            MONTH,
            DAY,
            ADULTS,
            BABIES,
            MARKET_SEGMENT,
            IS_REPEATED_GUEST,
        ];
        let missing: Vec<&str> = required
            .into_iter()
            .filter(|&name| find(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(errors::load_error(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }
        for name in [CHILDREN, COUNTRY, AGENT, COMPANY] {
            if find(name).is_none() {
                debug!(target: "bookings", "column '{name}' not present, using defaults");
            }
        }
        let at = |name: &str| find(name).unwrap_or_default();
        Ok(Columns {
            hotel: at(HOTEL),
            canceled: at(IS_CANCELED),
            year: at(YEAR),
            month: at(MONTH),
            day: at(DAY),
            adults: at(ADULTS),
            babies: at(BABIES),
            market_segment: at(MARKET_SEGMENT),
            repeated_guest: at(IS_REPEATED_GUEST),
            children: find(CHILDREN),
            country: find(COUNTRY),
            agent: find(AGENT),
            company: find(COMPANY),
        })
    }

    fn parse(
        &self,
        record: &csv::StringRecord,
        line: u64,
        stats: &mut NormalizeStats,
    ) -> Result<Booking> {
        let field = |idx: usize, name: &'static str| Field {
            record,
            line,
            idx,
            name,
        };
        let country = match self.country.map(|idx| cell(record, idx)) {
            Some(c) if !input::is_null(c) => c.to_owned(),
            Some(_) => {
                stats.country += 1;
                UNDEFINED_COUNTRY.to_owned()
            }
            None => UNDEFINED_COUNTRY.to_owned(),
        };
        Ok(Booking {
            hotel: field(self.hotel, HOTEL).required(Hotel::parse)?,
            canceled: field(self.canceled, IS_CANCELED).required(input::parse_flag)?,
            year: field(self.year, YEAR).required(parse_year)?,
            month: field(self.month, MONTH).required(Month::parse)?,
            day: field(self.day, DAY).required(parse_day)?,
            adults: field(self.adults, ADULTS).required(input::parse_count)?,
            children: optional_count(record, line, self.children, CHILDREN, &mut stats.children)?,
            babies: field(self.babies, BABIES).required(input::parse_count)?,
            country,
            market_segment: field(self.market_segment, MARKET_SEGMENT).required(non_null)?,
            repeated_guest: field(self.repeated_guest, IS_REPEATED_GUEST)
                .required(input::parse_flag)?,
            agent: optional_count(record, line, self.agent, AGENT, &mut stats.agent)?,
            company: optional_count(record, line, self.company, COMPANY, &mut stats.company)?,
        })
    }
}

fn cell(record: &csv::StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

fn invalid_cell(line: u64, name: &str, cell: &str) -> Box<dyn std::error::Error> {
    errors::load_error(format!(
        "line {line}: invalid value '{cell}' in column '{name}'"
    ))
}

/// One cell of a required column.
struct Field<'a> {
    record: &'a csv::StringRecord,
    line: u64,
    idx: usize,
    name: &'a str,
}

impl Field<'_> {
    fn required<T>(&self, parse: fn(&str) -> Option<T>) -> Result<T> {
        let c = cell(self.record, self.idx);
        parse(c).ok_or_else(|| invalid_cell(self.line, self.name, c))
    }
}

/// Absent columns and null cells give 0; null cells are counted.
fn optional_count(
    record: &csv::StringRecord,
    line: u64,
    idx: Option<usize>,
    name: &str,
    nulls: &mut u64,
) -> Result<u32> {
    match idx.map(|idx| cell(record, idx)) {
        None => Ok(0),
        Some(c) if input::is_null(c) => {
            *nulls += 1;
            Ok(0)
        }
        Some(c) => input::parse_count(c).ok_or_else(|| invalid_cell(line, name, c)),
    }
}

fn parse_year(cell: &str) -> Option<Year> {
    input::parse_count(cell).and_then(|y| Year::try_from(y).ok())
}

fn parse_day(cell: &str) -> Option<u8> {
    input::parse_count(cell)
        .filter(|d| (1..=31).contains(d))
        .map(|d| d as u8)
}

fn non_null(cell: &str) -> Option<String> {
    if input::is_null(cell) {
        None
    } else {
        Some(cell.to_owned())
    }
}
