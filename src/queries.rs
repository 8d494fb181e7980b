//! The queries behind the dashboard charts.
//!
//! Every query is a pure function of the table and a selection:
//! filter the table, then aggregate the rows that remain.

use crate::aggregate::{self, Dimension, Measure, SummaryTable};
use crate::errors::Result;
use crate::filter;
use crate::months;
use crate::output::{ODashboard, OSummary};
use crate::selection::{self, Selection};
use crate::table::Table;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    HotelAndCategory,
    Country,
    MarketSegmentAndHotel,
    CategoryAndMonth,
    YearAndHotel,
    Month,
}

impl Query {
    pub const ALL: [Query; 6] = [
        Query::HotelAndCategory,
        Query::Country,
        Query::MarketSegmentAndHotel,
        Query::CategoryAndMonth,
        Query::YearAndHotel,
        Query::Month,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Query::HotelAndCategory => "hotel_and_category",
            Query::Country => "country",
            Query::MarketSegmentAndHotel => "market_segment_and_hotel",
            Query::CategoryAndMonth => "category_and_month",
            Query::YearAndHotel => "year_and_hotel",
            Query::Month => "month",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Query::HotelAndCategory => "Hotel reservations by hotel type",
            Query::Country => "Where are the guests coming from?",
            Query::MarketSegmentAndHotel => "Market segment for different types of hotels",
            Query::CategoryAndMonth => "Percentage of guests in each month",
            Query::YearAndHotel => "Hotel reservations by year",
            Query::Month => "Reservations in each month",
        }
    }

    pub fn parse(s: &str) -> Option<Query> {
        let s = s.trim();
        Query::ALL
            .into_iter()
            .find(|q| s.eq_ignore_ascii_case(q.name()))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn count(table: &Table, selection: &Selection, dimensions: &[Dimension]) -> Result<SummaryTable> {
    let subset = filter::filter(table, selection);
    aggregate::aggregate(&subset, dimensions, Measure::Count)
}

/// Bookings by hotel type and guest category.
pub fn bookings_by_hotel_and_category(table: &Table, selection: &Selection) -> Result<SummaryTable> {
    count(table, selection, &[Dimension::Hotel, Dimension::Category])
}

/// Bookings by country of origin. Canceled bookings are never counted here.
pub fn bookings_by_country(table: &Table, selection: &Selection) -> Result<SummaryTable> {
    let selection = Selection {
        exclude_canceled: true,
        ..selection.clone()
    };
    count(table, &selection, &[Dimension::Country])
}

/// Bookings by market segment and hotel type.
pub fn bookings_by_market_segment_and_hotel(
    table: &Table,
    selection: &Selection,
) -> Result<SummaryTable> {
    count(table, selection, &[Dimension::MarketSegment, Dimension::Hotel])
}

/// For each guest category, the share of its bookings that arrive in each month.
///
/// Rows are in calendar order; within a month they follow the category order.
pub fn share_by_category_and_month(table: &Table, selection: &Selection) -> Result<SummaryTable> {
    let subset = filter::filter(table, selection);
    let mut summary = aggregate::aggregate(
        &subset,
        &[Dimension::Category, Dimension::Month],
        Measure::Share,
    )?;
    months::sort_by_month(&mut summary.rows, 1);
    Ok(summary)
}

/// Bookings by arrival year and hotel type.
pub fn bookings_by_year_and_hotel(table: &Table, selection: &Selection) -> Result<SummaryTable> {
    count(table, selection, &[Dimension::Year, Dimension::Hotel])
}

/// Bookings by arrival month.
pub fn bookings_by_month(table: &Table, selection: &Selection) -> Result<SummaryTable> {
    count(table, selection, &[Dimension::Month])
}

pub fn run(table: &Table, selection: &Selection, query: Query) -> Result<SummaryTable> {
    match query {
        Query::HotelAndCategory => bookings_by_hotel_and_category(table, selection),
        Query::Country => bookings_by_country(table, selection),
        Query::MarketSegmentAndHotel => bookings_by_market_segment_and_hotel(table, selection),
        Query::CategoryAndMonth => share_by_category_and_month(table, selection),
        Query::YearAndHotel => bookings_by_year_and_hotel(table, selection),
        Query::Month => bookings_by_month(table, selection),
    }
}

/// Runs `queries` for one selection.
pub fn dashboard_with(table: &Table, selection: &Selection, queries: &[Query]) -> Result<ODashboard> {
    let summaries = queries
        .iter()
        .map(|&query| {
            Ok(OSummary {
                query,
                title: query.title().to_owned(),
                table: run(table, selection, query)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let bookings = filter::filter(table, selection).len();
    debug!(
        target: "bookings",
        "dashboard for {}: {} bookings, {} charts",
        selection.pretty(),
        bookings,
        summaries.len()
    );
    Ok(ODashboard {
        years: selection.years,
        categories: selection.categories.iter().copied().collect_vec(),
        exclude_canceled: selection.exclude_canceled,
        scope: selection::scope(selection.region).to_owned(),
        bookings,
        summaries,
    })
}

/// Runs every query for one selection.
pub fn dashboard(table: &Table, selection: &Selection) -> Result<ODashboard> {
    dashboard_with(table, selection, &Query::ALL)
}
