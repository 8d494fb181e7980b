//! Values that front ends need for their selection widgets.

use crate::categories::GuestCategory;
use crate::output::Years;
use crate::selection::{Region, Selection};
use crate::table::Table;
use itertools::Itertools;

/// Earliest and latest arrival year, or `None` for an empty table.
pub fn year_bounds(table: &Table) -> Option<Years> {
    table
        .rows()
        .iter()
        .map(|r| r.booking.year)
        .minmax()
        .into_option()
}

/// Everything selected: all categories, all years, whole world.
pub fn default_selection(table: &Table) -> Selection {
    let mut selection = Selection::all(year_bounds(table).unwrap_or((0, 9999)));
    selection.region = Some(Region::World);
    selection
}

/// Categories that occur in the table, optionally narrowed down by a search string.
///
/// An empty or missing search string keeps every category.
pub fn category_options(table: &Table, search: Option<&str>) -> Vec<GuestCategory> {
    let present = table.rows().iter().map(|r| r.category).unique().sorted().collect_vec();
    match search.map(str::trim) {
        None | Some("") => present,
        Some(s) => {
            let s = s.to_lowercase();
            present
                .into_iter()
                .filter(|c| c.label().to_lowercase().contains(&s))
                .collect_vec()
        }
    }
}
