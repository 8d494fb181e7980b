use crate::selection::Selection;
use crate::table::{Row, Table};
use itertools::Itertools;
use log::debug;

pub fn matches(selection: &Selection, row: &Row) -> bool {
    selection.categories.contains(&row.category)
        && selection.contains_year(row.booking.year)
        && !(selection.exclude_canceled && row.booking.canceled)
}

/// The rows of `table` that `selection` keeps, in table order.
pub fn filter<'a>(table: &'a Table, selection: &Selection) -> Vec<&'a Row> {
    let rows = table
        .rows()
        .iter()
        .filter(|row| matches(selection, row))
        .collect_vec();
    debug!(
        target: "bookings",
        "{}: {} of {} bookings",
        selection.pretty(),
        rows.len(),
        table.len()
    );
    rows
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::categories::{self, GuestCategory};
    use crate::input::{Booking, Hotel};
    use crate::months::Month;
    use std::collections::BTreeSet;

    fn booking(year: u16, children: u32, babies: u32, canceled: bool) -> Booking {
        Booking {
            hotel: Hotel::Resort,
            canceled,
            year,
            month: Month::March,
            day: 10,
            adults: 2,
            children,
            babies,
            country: "ESP".to_owned(),
            market_segment: "Online TA".to_owned(),
            repeated_guest: false,
            agent: 240,
            company: 0,
        }
    }

    fn table() -> Table {
        categories::classify(vec![
            booking(2015, 0, 0, false),
            booking(2015, 1, 0, true),
            booking(2016, 0, 1, false),
            booking(2016, 0, 0, true),
            booking(2017, 2, 0, false),
        ])
    }

    #[test]
    fn everything() {
        let table = table();
        let rows = filter(&table, &Selection::all((0, 9999)));
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn empty_categories_give_nothing() {
        let table = table();
        let mut s = Selection::all((0, 9999));
        s.categories = BTreeSet::new();
        assert!(filter(&table, &s).is_empty());
        s.exclude_canceled = true;
        assert!(filter(&table, &s).is_empty());
    }

    #[test]
    fn single_year() {
        let table = table();
        let rows = filter(&table, &Selection::all((2016, 2016)));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.booking.year == 2016));
    }

    #[test]
    fn inverted_years_give_nothing() {
        let table = table();
        assert!(filter(&table, &Selection::all((2017, 2015))).is_empty());
    }

    #[test]
    fn categories() {
        let table = table();
        let mut s = Selection::all((0, 9999));
        s.categories = [GuestCategory::Children].into_iter().collect();
        let rows = filter(&table, &s);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.category == GuestCategory::Children));
    }

    #[test]
    fn canceled() {
        let table = table();
        let mut s = Selection::all((0, 9999));
        s.exclude_canceled = true;
        let rows = filter(&table, &s);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| !r.booking.canceled));
    }

    #[test]
    fn source_is_untouched() {
        let table = table();
        let before = table.rows().to_vec();
        let _ = filter(&table, &Selection::all((2016, 2016)));
        assert_eq!(table.rows(), &before[..]);
    }
}
