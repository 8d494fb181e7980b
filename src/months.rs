//! Calendar months and calendar ordering of summary rows.

use crate::aggregate::{Key, SummaryRow};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Variants are declared in calendar order, so the derived `Ord` is calendar order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Full names and three-letter abbreviations, in any case.
    pub fn parse(s: &str) -> Option<Month> {
        let s = s.trim();
        Month::ALL.into_iter().find(|m| {
            s.eq_ignore_ascii_case(m.name()) || s.eq_ignore_ascii_case(&m.name()[..3])
        })
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Reorders rows into calendar order by the month in key column `column`.
///
/// The sort is stable, so rows of the same month keep their relative order.
/// Rows whose key in that column is not a month stay in front, in their original order.
pub fn sort_by_month(rows: &mut [SummaryRow], column: usize) {
    rows.sort_by_key(|row| match row.keys.get(column) {
        Some(Key::Month(m)) => Some(*m),
        _ => None,
    });
}
