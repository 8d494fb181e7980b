//! Grouping filtered bookings into summary tables.

use crate::categories::GuestCategory;
use crate::errors::{self, Result};
use crate::input::{Hotel, Year};
use crate::months::Month;
use crate::table::Row;
use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Hotel,
    Category,
    Country,
    MarketSegment,
    Month,
    Year,
}

impl Dimension {
    pub fn key(&self, row: &Row) -> Key {
        let b = &row.booking;
        match self {
            Dimension::Hotel => Key::Hotel(b.hotel),
            Dimension::Category => Key::Category(row.category),
            Dimension::Country => Key::Country(b.country.clone()),
            Dimension::MarketSegment => Key::MarketSegment(b.market_segment.clone()),
            Dimension::Month => Key::Month(b.month),
            Dimension::Year => Key::Year(b.year),
        }
    }

    /// Column name in exported tables.
    pub fn column(&self) -> &'static str {
        match self {
            Dimension::Hotel => "hotel",
            Dimension::Category => "guest_category",
            Dimension::Country => "country",
            Dimension::MarketSegment => "market_segment",
            Dimension::Month => "arrival_date_month",
            Dimension::Year => "arrival_date_year",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// Number of bookings per key combination.
    Count,
    /// Fraction of the bookings of the first key that fall on the second key.
    Share,
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Measure::Count => write!(f, "count"),
            Measure::Share => write!(f, "share"),
        }
    }
}

/// One value of one dimension.
///
/// Keys of the same dimension compare in their natural order;
/// months compare in calendar order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Key {
    Hotel(Hotel),
    Category(GuestCategory),
    Country(String),
    MarketSegment(String),
    Month(Month),
    Year(Year),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Key::Hotel(h) => write!(f, "{h}"),
            Key::Category(c) => write!(f, "{c}"),
            Key::Country(s) | Key::MarketSegment(s) => write!(f, "{s}"),
            Key::Month(m) => write!(f, "{m}"),
            Key::Year(y) => write!(f, "{y}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Count(u64),
    Share(f64),
}

impl Value {
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Count(c) => *c as f64,
            Value::Share(s) => *s,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryRow {
    pub keys: Vec<Key>,
    pub value: Value,
}

/// Rows are in key order, one per key combination that occurs in the input.
/// Combinations without bookings are omitted, never filled with zeros.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryTable {
    pub dimensions: Vec<Dimension>,
    pub measure: Measure,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, keys: &[Key]) -> Option<Value> {
        self.rows.iter().find(|r| r.keys == keys).map(|r| r.value)
    }

    /// Distinct values of the first key, in row order.
    pub fn groups(&self) -> Vec<&Key> {
        self.rows.iter().map(|r| &r.keys[0]).dedup().collect_vec()
    }

    pub fn pretty(&self) -> String {
        format!(
            "{} by {}",
            self.measure,
            self.dimensions.iter().join(" × ")
        )
    }
}

fn validate(dimensions: &[Dimension], measure: Measure) -> Result<()> {
    if dimensions.is_empty() || dimensions.len() > 2 {
        return Err(errors::invalid_argument(format!(
            "expected 1 or 2 dimensions, got {}",
            dimensions.len()
        )));
    }
    if dimensions.len() == 2 && dimensions[0] == dimensions[1] {
        return Err(errors::invalid_argument(format!(
            "dimension '{}' given twice",
            dimensions[0]
        )));
    }
    if measure == Measure::Share && dimensions.len() != 2 {
        return Err(errors::invalid_argument_ref(
            "share needs a group dimension and a series dimension",
        ));
    }
    Ok(())
}

/// Groups `subset` by `dimensions` and computes `measure` for every group.
///
/// An empty subset is not an error: the result is an empty table.
pub fn aggregate(subset: &[&Row], dimensions: &[Dimension], measure: Measure) -> Result<SummaryTable> {
    validate(dimensions, measure)?;
    let mut counts: BTreeMap<Vec<Key>, u64> = BTreeMap::new();
    for row in subset {
        let keys = dimensions.iter().map(|d| d.key(row)).collect_vec();
        *counts.entry(keys).or_default() += 1;
    }
    let rows = match measure {
        Measure::Count => counts
            .into_iter()
            .map(|(keys, count)| SummaryRow {
                keys,
                value: Value::Count(count),
            })
            .collect_vec(),
        Measure::Share => {
            let mut totals: BTreeMap<Key, u64> = BTreeMap::new();
            for (keys, count) in &counts {
                *totals.entry(keys[0].clone()).or_default() += count;
            }
            counts
                .into_iter()
                .map(|(keys, count)| {
                    let total = totals[&keys[0]];
                    SummaryRow {
                        keys,
                        value: Value::Share(count as f64 / total as f64),
                    }
                })
                .collect_vec()
        }
    };
    let table = SummaryTable {
        dimensions: dimensions.to_vec(),
        measure,
        rows,
    };
    if table.is_empty() {
        warn!(target: "bookings", "{}: empty result", table.pretty());
    } else {
        debug!(
            target: "bookings",
            "{}: {} rows from {} bookings",
            table.pretty(),
            table.len(),
            subset.len()
        );
    }
    Ok(table)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::categories;
    use crate::input::{Booking, UNDEFINED_COUNTRY};
    use crate::table::Table;
    use GuestCategory::*;

    fn booking(hotel: Hotel, month: Month, children: u32, babies: u32) -> Booking {
        Booking {
            hotel,
            canceled: false,
            year: 2016,
            month,
            day: 1,
            adults: 2,
            children,
            babies,
            country: UNDEFINED_COUNTRY.to_owned(),
            market_segment: "Direct".to_owned(),
            repeated_guest: false,
            agent: 0,
            company: 0,
        }
    }

    fn all(table: &Table) -> Vec<&Row> {
        table.rows().iter().collect_vec()
    }

    #[test]
    fn count_two_dimensions() {
        let table = categories::classify(vec![
            booking(Hotel::Resort, Month::May, 0, 0),
            booking(Hotel::City, Month::May, 1, 0),
            booking(Hotel::Resort, Month::May, 0, 0),
            booking(Hotel::City, Month::June, 0, 1),
        ]);
        let s = aggregate(
            &all(&table),
            &[Dimension::Hotel, Dimension::Category],
            Measure::Count,
        )
        .unwrap();
        assert_eq!(
            s.rows,
            [
                SummaryRow {
                    keys: vec![Key::Hotel(Hotel::City), Key::Category(Children)],
                    value: Value::Count(1),
                },
                SummaryRow {
                    keys: vec![Key::Hotel(Hotel::City), Key::Category(Babies)],
                    value: Value::Count(1),
                },
                SummaryRow {
                    keys: vec![Key::Hotel(Hotel::Resort), Key::Category(NoKids)],
                    value: Value::Count(2),
                },
            ]
        );
    }

    #[test]
    fn empty_groups_are_omitted() {
        let table = categories::classify(vec![
            booking(Hotel::Resort, Month::May, 0, 0),
            booking(Hotel::Resort, Month::June, 0, 0),
        ]);
        let s = aggregate(
            &all(&table),
            &[Dimension::Hotel, Dimension::Category],
            Measure::Count,
        )
        .unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(
            s.get(&[Key::Hotel(Hotel::Resort), Key::Category(NoKids)]),
            Some(Value::Count(2))
        );
        assert_eq!(
            s.get(&[Key::Hotel(Hotel::City), Key::Category(NoKids)]),
            None
        );
        assert_eq!(
            s.get(&[Key::Hotel(Hotel::Resort), Key::Category(Babies)]),
            None
        );
    }

    #[test]
    fn share_within_group() {
        let table = categories::classify(vec![
            booking(Hotel::Resort, Month::May, 0, 0),
            booking(Hotel::Resort, Month::May, 0, 0),
            booking(Hotel::Resort, Month::June, 0, 0),
            booking(Hotel::Resort, Month::January, 0, 0),
            booking(Hotel::City, Month::March, 0, 1),
        ]);
        let s = aggregate(
            &all(&table),
            &[Dimension::Category, Dimension::Month],
            Measure::Share,
        )
        .unwrap();
        assert_eq!(
            s.get(&[Key::Category(NoKids), Key::Month(Month::May)]),
            Some(Value::Share(0.5))
        );
        assert_eq!(
            s.get(&[Key::Category(NoKids), Key::Month(Month::June)]),
            Some(Value::Share(0.25))
        );
        assert_eq!(
            s.get(&[Key::Category(Babies), Key::Month(Month::March)]),
            Some(Value::Share(1.0))
        );
        for group in s.groups() {
            let sum: f64 = s
                .rows
                .iter()
                .filter(|r| &r.keys[0] == group)
                .map(|r| r.value.as_f64())
                .sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn months_in_calendar_order() {
        let table = categories::classify(vec![
            booking(Hotel::Resort, Month::March, 0, 0),
            booking(Hotel::Resort, Month::January, 0, 0),
            booking(Hotel::Resort, Month::August, 0, 0),
            booking(Hotel::Resort, Month::April, 0, 0),
        ]);
        let s = aggregate(&all(&table), &[Dimension::Month], Measure::Count).unwrap();
        let months = s.rows.iter().map(|r| r.keys[0].clone()).collect_vec();
        assert_eq!(
            months,
            [
                Key::Month(Month::January),
                Key::Month(Month::March),
                Key::Month(Month::April),
                Key::Month(Month::August),
            ]
        );
    }

    #[test]
    fn empty_subset() {
        let s = aggregate(&[], &[Dimension::Country], Measure::Count).unwrap();
        assert!(s.is_empty());
        let s = aggregate(
            &[],
            &[Dimension::Category, Dimension::Month],
            Measure::Share,
        )
        .unwrap();
        assert!(s.is_empty());
        assert!(s.groups().is_empty());
    }

    #[test]
    fn invalid_dimensions() {
        assert!(aggregate(&[], &[], Measure::Count).is_err());
        assert!(
            aggregate(
                &[],
                &[Dimension::Hotel, Dimension::Month, Dimension::Year],
                Measure::Count
            )
            .is_err()
        );
        assert!(aggregate(&[], &[Dimension::Hotel, Dimension::Hotel], Measure::Count).is_err());
        let e = aggregate(&[], &[Dimension::Hotel], Measure::Share).unwrap_err();
        assert!(e.downcast_ref::<errors::InvalidArgument>().is_some());
    }

    #[test]
    fn key_json() {
        assert_eq!(
            serde_json::to_string(&Key::Hotel(Hotel::Resort)).unwrap(),
            "\"Resort Hotel\""
        );
        assert_eq!(
            serde_json::to_string(&Key::Month(Month::March)).unwrap(),
            "\"March\""
        );
        assert_eq!(serde_json::to_string(&Key::Year(2016)).unwrap(), "2016");
        assert_eq!(serde_json::to_string(&Value::Count(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&Value::Share(0.5)).unwrap(), "0.5");
    }

    #[test]
    fn pretty() {
        let s = aggregate(
            &[],
            &[Dimension::MarketSegment, Dimension::Hotel],
            Measure::Count,
        )
        .unwrap();
        assert_eq!(s.pretty(), "count by market_segment × hotel");
    }
}
