use crate::input::UNDEFINED_COUNTRY;
use crate::options;
use crate::output;
use crate::table::{Row, Table};
use itertools::Itertools;
use log::info;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

fn explain_counts<K: Display + Ord + Hash>(counts: &HashMap<K, usize>) -> String {
    counts
        .iter()
        .sorted_by(|a, b| a.0.cmp(b.0))
        .map(|(k, v)| format!("{k} = {v}"))
        .join(", ")
}

pub fn statistics(table: &Table) {
    let mut hotels = HashMap::new();
    let mut categories = HashMap::new();
    let mut countries = HashSet::new();
    let mut canceled = 0;
    let mut repeated = 0;
    let mut undefined = 0;
    for row in table.rows() {
        let b = &row.booking;
        *hotels.entry(b.hotel).or_default() += 1;
        *categories.entry(row.category).or_default() += 1;
        countries.insert(&b.country);
        if b.canceled {
            canceled += 1;
        }
        if b.repeated_guest {
            repeated += 1;
        }
        if b.country == UNDEFINED_COUNTRY {
            undefined += 1;
        }
    }
    info!(target: "bookings", "bookings: {}", table.len());
    if let Some(years) = options::year_bounds(table) {
        info!(target: "bookings", "years in input data: {}", output::pretty_years(&years));
    }
    info!(target: "bookings", "hotels: {}", explain_counts(&hotels));
    info!(target: "bookings", "guest categories: {}", explain_counts(&categories));
    info!(
        target: "bookings",
        "canceled: {canceled}, repeated guests: {repeated}"
    );
    info!(
        target: "bookings",
        "distinct countries: {} ({undefined} bookings without a country)",
        countries.len()
    );
}

pub fn post_statistics(rows: &[&Row]) {
    let countries: HashSet<&String> = rows.iter().map(|r| &r.booking.country).collect();
    info!(target: "bookings", "after filtering: bookings: {}", rows.len());
    info!(
        target: "bookings",
        "after filtering: distinct countries: {}",
        countries.len()
    );
}
