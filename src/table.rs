//! The normalized, classified booking table.

use crate::categories::{self, GuestCategory};
use crate::errors::Result;
use crate::information;
use crate::input::Booking;
use crate::loader;
use std::path::Path;

/// A booking together with its derived guest category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub booking: Booking,
    pub category: GuestCategory,
}

/// Immutable after construction; share it by reference or behind an `Arc`.
#[derive(Debug, Default)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Table {
        Table { rows }
    }

    /// Loads, normalizes and classifies the dataset at `path`.
    ///
    /// Call this once at startup and pass the table to every query.
    pub fn load(path: &Path) -> Result<Table> {
        let bookings = loader::load(path)?;
        let table = categories::classify(bookings);
        information::statistics(&table);
        Ok(table)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
