//! Guest categories derived from the party composition.

use crate::input::Booking;
use crate::table::{Row, Table};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared in the order used for summary rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum GuestCategory {
    #[serde(rename = "No Kids")]
    NoKids,
    Children,
    Babies,
}

impl GuestCategory {
    pub const ALL: [GuestCategory; 3] = [
        GuestCategory::NoKids,
        GuestCategory::Children,
        GuestCategory::Babies,
    ];

    /// Babies take priority over children.
    pub fn of(booking: &Booking) -> GuestCategory {
        if booking.babies > 0 {
            GuestCategory::Babies
        } else if booking.children > 0 {
            GuestCategory::Children
        } else {
            GuestCategory::NoKids
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GuestCategory::NoKids => "No Kids",
            GuestCategory::Children => "Children",
            GuestCategory::Babies => "Babies",
        }
    }

    /// Exact label, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<GuestCategory> {
        let s = s.trim();
        GuestCategory::ALL
            .into_iter()
            .find(|c| s.eq_ignore_ascii_case(c.label()))
    }
}

impl fmt::Display for GuestCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Attaches the guest category to every booking.
pub fn classify(bookings: Vec<Booking>) -> Table {
    let rows = bookings
        .into_iter()
        .map(|booking| Row {
            category: GuestCategory::of(&booking),
            booking,
        })
        .collect_vec();
    Table::new(rows)
}
