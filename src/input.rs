//! Data structures for representing normalized bookings.

use crate::months::Month;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Year = u16;

/// Country used for bookings that have no country of origin.
pub const UNDEFINED_COUNTRY: &str = "Undefined";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Hotel {
    #[serde(rename = "City Hotel")]
    City,
    #[serde(rename = "Resort Hotel")]
    Resort,
}

impl Hotel {
    pub const ALL: [Hotel; 2] = [Hotel::City, Hotel::Resort];

    pub fn name(&self) -> &'static str {
        match self {
            Hotel::City => "City Hotel",
            Hotel::Resort => "Resort Hotel",
        }
    }

    /// Accepts both the dataset spelling ("Resort Hotel") and the short one ("resort").
    pub fn parse(s: &str) -> Option<Hotel> {
        let s = s.trim();
        Hotel::ALL.into_iter().find(|h| {
            s.eq_ignore_ascii_case(h.name()) || s.eq_ignore_ascii_case(h.short_name())
        })
    }

    fn short_name(&self) -> &'static str {
        match self {
            Hotel::City => "city",
            Hotel::Resort => "resort",
        }
    }
}

impl fmt::Display for Hotel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One reservation, after normalization.
///
/// Nullable input columns have already been replaced with their defaults:
/// `children`, `agent` and `company` with 0, `country` with [UNDEFINED_COUNTRY].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Booking {
    pub hotel: Hotel,
    pub canceled: bool,
    pub year: Year,
    pub month: Month,
    pub day: u8,
    pub adults: u32,
    pub children: u32,
    pub babies: u32,
    pub country: String,
    pub market_segment: String,
    pub repeated_guest: bool,
    pub agent: u32,
    pub company: u32,
}

impl Booking {
    /// Nobody is staying: such bookings are dropped at load time.
    pub fn is_zero_occupancy(&self) -> bool {
        self.adults == 0 && self.children == 0 && self.babies == 0
    }
}

/// Cell values that count as missing: the usual NA spellings of CSV exports.
const NULL_TOKENS: [&str; 19] = [
    "",
    "#N/A",
    "#N/A N/A",
    "#NA",
    "-1.#IND",
    "-1.#QNAN",
    "-NaN",
    "-nan",
    "1.#IND",
    "1.#QNAN",
    "<NA>",
    "N/A",
    "NA",
    "NULL",
    "NaN",
    "None",
    "n/a",
    "nan",
    "null",
];

pub fn is_null(cell: &str) -> bool {
    NULL_TOKENS.contains(&cell.trim())
}

pub fn parse_flag(cell: &str) -> Option<bool> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" => Some(true),
        "0" | "no" | "false" => Some(false),
        _ => None,
    }
}

/// External representation of a flag.
pub fn flag_str(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Parses a count or an id; integral floats such as `2.0` are accepted.
pub fn parse_count(cell: &str) -> Option<u32> {
    let cell = cell.trim();
    if let Ok(x) = cell.parse::<u32>() {
        return Some(x);
    }
    match cell.parse::<f64>() {
        Ok(x) if x.fract() == 0.0 && x >= 0.0 && x <= u32::MAX as f64 => Some(x as u32),
        _ => None,
    }
}
