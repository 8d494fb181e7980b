//! Exporting a dashboard as an Excel workbook.

use crate::aggregate::{Key, Measure, SummaryTable};
use crate::errors::Result;
use crate::input;
use crate::output::{self, ODashboard};
use itertools::Itertools;
use log::info;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

const SELECTION_SHEET: &str = "selection";

struct Formats {
    header: Format,
    share: Format,
}

/// Writes one worksheet describing the selection, then one worksheet per summary table.
pub fn write_workbook(path: &Path, dashboard: &ODashboard) -> Result<()> {
    let mut workbook = build_workbook(dashboard)?;
    workbook.save(path)?;
    info!(target: "bookings", "wrote: {}", path.display());
    Ok(())
}

fn build_workbook(dashboard: &ODashboard) -> Result<Workbook> {
    let formats = Formats {
        header: Format::new().set_bold(),
        share: Format::new().set_num_format("0.0%"),
    };
    let mut workbook = Workbook::new();
    write_selection(workbook.add_worksheet(), dashboard, &formats)?;
    for summary in &dashboard.summaries {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(summary.query.name())?;
        write_summary(worksheet, &summary.table, &formats)?;
    }
    Ok(workbook)
}

fn write_selection(
    worksheet: &mut Worksheet,
    dashboard: &ODashboard,
    formats: &Formats,
) -> std::result::Result<(), XlsxError> {
    worksheet.set_name(SELECTION_SHEET)?;
    let categories = dashboard.categories.iter().join(", ");
    let items = [
        ("years", output::pretty_years(&dashboard.years)),
        ("guest categories", categories),
        (
            "exclude canceled",
            input::flag_str(dashboard.exclude_canceled).to_owned(),
        ),
        ("region", dashboard.scope.clone()),
        ("bookings", dashboard.bookings.to_string()),
    ];
    for (row, (name, value)) in items.into_iter().enumerate() {
        worksheet.write_string_with_format(row as u32, 0, name, &formats.header)?;
        worksheet.write_string(row as u32, 1, value)?;
    }
    Ok(())
}

fn write_summary(
    worksheet: &mut Worksheet,
    table: &SummaryTable,
    formats: &Formats,
) -> std::result::Result<(), XlsxError> {
    for (col, dimension) in table.dimensions.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, dimension.column(), &formats.header)?;
    }
    let value_col = table.dimensions.len() as u16;
    worksheet.write_string_with_format(0, value_col, table.measure.to_string(), &formats.header)?;
    for (i, row) in table.rows.iter().enumerate() {
        let r = i as u32 + 1;
        for (col, key) in row.keys.iter().enumerate() {
            match key {
                Key::Year(y) => worksheet.write_number(r, col as u16, *y)?,
                key => worksheet.write_string(r, col as u16, key.to_string())?,
            };
        }
        match table.measure {
            Measure::Count => worksheet.write_number(r, value_col, row.value.as_f64())?,
            Measure::Share => worksheet.write_number_with_format(
                r,
                value_col,
                row.value.as_f64(),
                &formats.share,
            )?,
        };
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::categories;
    use crate::input::{Booking, Hotel};
    use crate::months::Month;
    use crate::queries::{self, Query};
    use crate::selection::Selection;
    use std::collections::BTreeSet;

    fn dashboard(selection: &Selection) -> ODashboard {
        let table = categories::classify(vec![Booking {
            hotel: Hotel::Resort,
            canceled: false,
            year: 2016,
            month: Month::June,
            day: 30,
            adults: 2,
            children: 1,
            babies: 0,
            country: "IRL".to_owned(),
            market_segment: "Offline TA/TO".to_owned(),
            repeated_guest: false,
            agent: 7,
            company: 0,
        }]);
        queries::dashboard(&table, selection).unwrap()
    }

    fn sheet_names(workbook: &mut Workbook) -> Vec<String> {
        (0..)
            .map_while(|i| workbook.worksheet_from_index(i).ok().map(|w| w.name()))
            .collect_vec()
    }

    #[test]
    fn one_sheet_per_query() {
        let mut workbook = build_workbook(&dashboard(&Selection::all((2016, 2016)))).unwrap();
        let mut expected = vec![SELECTION_SHEET.to_owned()];
        expected.extend(Query::ALL.iter().map(|q| q.name().to_owned()));
        assert_eq!(sheet_names(&mut workbook), expected);
    }

    #[test]
    fn writes_file() {
        let d = dashboard(&Selection::all((2016, 2016)));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.xlsx");
        write_workbook(&path, &d).unwrap();
        let data = std::fs::read(&path).unwrap();
        assert!(data.starts_with(b"PK"));
    }

    #[test]
    fn empty_summaries_still_write() {
        let mut selection = Selection::all((2016, 2016));
        selection.categories = BTreeSet::new();
        selection.exclude_canceled = true;
        let d = dashboard(&selection);
        assert!(d.summaries.iter().all(|s| s.table.is_empty()));
        let mut workbook = build_workbook(&d).unwrap();
        assert_eq!(sheet_names(&mut workbook).len(), 1 + Query::ALL.len());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        write_workbook(&path, &d).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
