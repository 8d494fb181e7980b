//! Data structures for representing the output.

use crate::aggregate::{SummaryTable, Value};
use crate::categories::GuestCategory;
use crate::input::Year;
use crate::queries::Query;
use itertools::Itertools;
use serde::Serialize;

pub type Years = (Year, Year);

/// One chart's worth of data.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OSummary {
    pub query: Query,
    pub title: String,
    pub table: SummaryTable,
}

/// Everything the charts need for one selection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ODashboard {
    pub years: Years,
    pub categories: Vec<GuestCategory>,
    pub exclude_canceled: bool,
    /// Map projection scope.
    pub scope: String,
    /// Number of bookings that the selection keeps.
    pub bookings: usize,
    pub summaries: Vec<OSummary>,
}

impl ODashboard {
    pub fn get(&self, query: Query) -> Option<&SummaryTable> {
        self.summaries
            .iter()
            .find(|s| s.query == query)
            .map(|s| &s.table)
    }
}

#[derive(Serialize)]
pub struct OError {
    pub error: String,
}

/// Inclusive year range, e.g. "2015-2017", or just "2016".
pub fn pretty_years(years: &Years) -> String {
    if years.0 == years.1 {
        format!("{}", years.0)
    } else {
        format!("{}-{}", years.0, years.1)
    }
}

pub fn share_string(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

/// Human-readable rendering of a summary table, one row per line.
pub fn table_lines(table: &SummaryTable) -> Vec<String> {
    table
        .rows
        .iter()
        .map(|row| {
            let value = match row.value {
                Value::Count(c) => format!("{c}"),
                Value::Share(s) => share_string(s),
            };
            format!("{}: {}", row.keys.iter().join(" / "), value)
        })
        .collect_vec()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::aggregate::{Dimension, Key, Measure, SummaryRow};
    use crate::input::Hotel;
    use crate::months::Month;

    #[test]
    fn pretty_years_basic() {
        assert_eq!(pretty_years(&(2015, 2017)), "2015-2017");
        assert_eq!(pretty_years(&(2016, 2016)), "2016");
    }

    #[test]
    fn share_string_basic() {
        assert_eq!(share_string(0.5), "50.0%");
        assert_eq!(share_string(1.0 / 3.0), "33.3%");
    }

    #[test]
    fn lines() {
        let table = SummaryTable {
            dimensions: vec![Dimension::Hotel, Dimension::Month],
            measure: Measure::Share,
            rows: vec![SummaryRow {
                keys: vec![Key::Hotel(Hotel::City), Key::Month(Month::May)],
                value: Value::Share(0.25),
            }],
        };
        assert_eq!(table_lines(&table), ["City Hotel / May: 25.0%"]);
    }

    #[test]
    fn error_json() {
        let e = OError {
            error: "boom".to_owned(),
        };
        assert_eq!(serde_json::to_string(&e).unwrap(), r#"{"error":"boom"}"#);
    }
}
