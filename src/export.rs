//! Serialization of filtered orders to CSV and XLSX.
//!
//! Both formats carry the same seven-column header. Exports re-load through
//! [`crate::orders::load_frame`] with the same values; ship dates come back
//! as typed date-times.

use crate::error::{OrdersError, Result, ResultExt as _};
use crate::orders::FilteredOrders;
use crate::orders::columns::{OUTPUT_COLUMNS, SHIP_DATE};
use crate::orders::types::{datetime_values, text_values};
use chrono::{Datelike as _, NaiveDate, NaiveDateTime, Timelike as _};
use polars::prelude::*;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::Path;

/// Worksheet name used for every spreadsheet export.
pub const SHEET_NAME: &str = "Filtered Orders";

/// Default file name prefix for downloads.
pub const DEFAULT_FILE_PREFIX: &str = "dell_orders_filtered";

const CSV_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const XLSX_DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// `.csv` selects CSV; any other extension gets a spreadsheet.
    pub fn from_path(path: &Path) -> Self {
        let is_csv = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv { Self::Csv } else { Self::Xlsx }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Xlsx => "Excel",
        }
    }
}

/// Serialize to CSV with a header row.
pub fn to_csv_bytes(orders: &FilteredOrders) -> Result<Vec<u8>> {
    let mut frame = orders.frame().clone();
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .with_datetime_format(Some(CSV_DATETIME_FORMAT.to_owned()))
        .finish(&mut frame)
        .map_err(|e| OrdersError::Export(format!("CSV: {e}")))?;
    Ok(buf)
}

/// Serialize to a single-sheet workbook named [`SHEET_NAME`].
pub fn to_xlsx_bytes(orders: &FilteredOrders) -> Result<Vec<u8>> {
    let frame = orders.frame();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold();
    let date_format = Format::new().set_num_format(XLSX_DATETIME_FORMAT);

    for (column, name) in (0u16..).zip(OUTPUT_COLUMNS) {
        sheet.write_string_with_format(0, column, name, &header)?;

        if name == SHIP_DATE {
            for (row, value) in (1u32..).zip(datetime_values(frame, name)?) {
                if let Some(dt) = value {
                    sheet.write_datetime_with_format(
                        row,
                        column,
                        &excel_datetime(dt)?,
                        &date_format,
                    )?;
                }
            }
        } else {
            for (row, value) in (1u32..).zip(text_values(frame, name)?) {
                if let Some(text) = value {
                    sheet.write_string(row, column, &text)?;
                }
            }
        }
    }
    sheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

fn excel_datetime(dt: NaiveDateTime) -> Result<ExcelDateTime> {
    let year = u16::try_from(dt.year())
        .map_err(|e| OrdersError::Export(format!("year {} out of range: {e}", dt.year())))?;
    // chrono guarantees month/day/hour/minute/second fit in a byte
    let date = ExcelDateTime::from_ymd(year, dt.month() as u8, dt.day() as u8)?;
    Ok(date.and_hms(dt.hour() as u16, dt.minute() as u8, dt.second())?)
}

/// Serialize in the format implied by `path` and write it there.
pub fn write_orders(orders: &FilteredOrders, path: &Path) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path);
    let bytes = match format {
        ExportFormat::Csv => to_csv_bytes(orders)?,
        ExportFormat::Xlsx => to_xlsx_bytes(orders)?,
    };
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        format = format.label(),
        rows = orders.len(),
        "Wrote filtered orders"
    );
    Ok(format)
}

/// Download name stamped with the generation date, e.g.
/// `dell_orders_filtered_20251030.xlsx`.
pub fn download_file_name(prefix: &str, generated_on: NaiveDate, format: ExportFormat) -> String {
    format!(
        "{prefix}_{}.{}",
        generated_on.format("%Y%m%d"),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{InputFormat, load_frame};
    use calamine::Reader as _;
    use std::io::Cursor;

    fn sample() -> Result<FilteredOrders> {
        let ship = Series::new(
            SHIP_DATE.into(),
            vec![Some(1_761_868_800_000_i64), Some(1_761_901_200_000_i64), None],
        )
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

        let columns = vec![
            Column::new(
                OUTPUT_COLUMNS[0].into(),
                vec![Some("Acme Corp"), Some("Globex, Inc."), Some("Initech")],
            ),
            Column::new(OUTPUT_COLUMNS[1].into(), vec![Some("Pat Lee"), Some("Sam"), None]),
            Column::new(
                OUTPUT_COLUMNS[2].into(),
                vec![Some("ABC1234"), Some("0012345"), Some("XYZ9876")],
            ),
            Column::from(ship),
            Column::new(
                OUTPUT_COLUMNS[4].into(),
                vec![Some("Shipped"), Some("In Production"), Some("Shipped")],
            ),
            Column::new(
                OUTPUT_COLUMNS[5].into(),
                vec![Some("Delivered"), Some("On Track"), None],
            ),
            Column::new(
                OUTPUT_COLUMNS[6].into(),
                vec![Some("https://www.dell.com/track/ABC1234"), None, None],
            ),
        ];
        Ok(FilteredOrders::new(DataFrame::new(columns)?))
    }

    fn assert_same_text_values(reloaded: &DataFrame, original: &FilteredOrders) -> Result<()> {
        for name in OUTPUT_COLUMNS.iter().filter(|n| **n != SHIP_DATE) {
            assert_eq!(
                text_values(reloaded, name)?,
                text_values(original.frame(), name)?,
                "column {name}"
            );
        }
        assert_eq!(
            datetime_values(reloaded, SHIP_DATE)?,
            datetime_values(original.frame(), SHIP_DATE)?
        );
        Ok(())
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("out.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("OUT.CSV")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("out.xlsx")), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::from_path(Path::new("out")), ExportFormat::Xlsx);
    }

    #[test]
    fn test_download_file_name() {
        let day = NaiveDate::from_ymd_opt(2025, 10, 30).expect("valid date");
        assert_eq!(
            download_file_name(DEFAULT_FILE_PREFIX, day, ExportFormat::Xlsx),
            "dell_orders_filtered_20251030.xlsx"
        );
        assert_eq!(
            download_file_name(DEFAULT_FILE_PREFIX, day, ExportFormat::Csv),
            "dell_orders_filtered_20251030.csv"
        );
    }

    #[test]
    fn test_csv_header_and_round_trip() -> Result<()> {
        let orders = sample()?;
        let bytes = to_csv_bytes(&orders)?;

        let text = String::from_utf8(bytes.clone()).expect("utf-8 csv");
        let header = text.lines().next().expect("header line");
        assert_eq!(
            header,
            "Customer Name,Contact,Service Tag,Ship Date,Status,Secondary Status,Tracking URL"
        );

        let reloaded = load_frame(&bytes, InputFormat::Csv)?;
        assert_eq!(reloaded.height(), 3);
        assert_same_text_values(&reloaded, &orders)
    }

    #[test]
    fn test_xlsx_sheet_and_round_trip() -> Result<()> {
        let orders = sample()?;
        let bytes = to_xlsx_bytes(&orders)?;

        let workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.clone()))?;
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_owned()]);

        let reloaded = load_frame(&bytes, InputFormat::Spreadsheet)?;
        assert_eq!(reloaded.height(), 3);
        let names: Vec<String> = reloaded
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, OUTPUT_COLUMNS);
        assert_same_text_values(&reloaded, &orders)
    }

    #[test]
    fn test_write_orders_picks_format_from_extension() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let orders = sample()?;

        let csv_path = dir.path().join("filtered.csv");
        assert_eq!(write_orders(&orders, &csv_path)?, ExportFormat::Csv);
        assert!(std::fs::read_to_string(&csv_path)?.starts_with("Customer Name,"));

        let xlsx_path = dir.path().join("filtered.xlsx");
        assert_eq!(write_orders(&orders, &xlsx_path)?, ExportFormat::Xlsx);
        assert!(std::fs::read(&xlsx_path)?.starts_with(b"PK"), "xlsx is a zip");
        Ok(())
    }
}
