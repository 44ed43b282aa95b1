use super::columns::{SERVICE_TAG_QUANTITY, is_date_column};
use super::dates::{parse_datetime, to_millis};
use super::types::OrderTable;
use crate::error::{OrdersError, Result, ResultExt as _};
use calamine::{Data, Reader as _};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

/// Declared format of an input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Spreadsheet,
}

impl InputFormat {
    /// Pick the reader from a file name: `.csv` is CSV, anything else is
    /// handed to the spreadsheet reader.
    pub fn from_file_name(name: &str) -> Self {
        if name.to_lowercase().ends_with(".csv") {
            Self::Csv
        } else {
            Self::Spreadsheet
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::from_file_name(&path.to_string_lossy())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Spreadsheet => "Excel",
        }
    }
}

/// Read an order export from disk.
pub fn read_orders_file(path: &Path) -> Result<OrderTable> {
    let bytes = read_input_bytes(path)?;
    load_orders(&bytes, InputFormat::from_path(path))
}

/// Read a whole input file; a missing file is [`OrdersError::NotFound`].
pub fn read_input_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            OrdersError::NotFound(path.to_path_buf())
        } else {
            OrdersError::Io(e)
        }
    })
}

/// Parse order export bytes into a schema-checked table.
pub fn load_orders(bytes: &[u8], format: InputFormat) -> Result<OrderTable> {
    let frame = read_text(bytes, format)?;
    tracing::debug!(
        rows = frame.height(),
        columns = frame.width(),
        format = format.as_str(),
        "Loaded order export"
    );
    OrderTable::from_frame(frame)
}

/// Parse bytes into a table without requiring any particular columns.
///
/// Known quantity/date columns are still coerced, so re-loading an export
/// yields typed ship dates.
pub fn load_frame(bytes: &[u8], format: InputFormat) -> Result<DataFrame> {
    coerce_columns(read_text(bytes, format)?)
}

fn read_text(bytes: &[u8], format: InputFormat) -> Result<DataFrame> {
    let frame = match format {
        InputFormat::Csv => read_csv_text(bytes)?,
        InputFormat::Spreadsheet => read_spreadsheet_text(bytes)?,
    };
    drop_blank_rows(frame)
}

/// Remove rows where every cell is absent (blank lines, empty sheet rows).
fn drop_blank_rows(frame: DataFrame) -> Result<DataFrame> {
    let mut keep = BooleanChunked::full("keep".into(), false, frame.height());
    for column in frame.get_columns() {
        keep = &keep | &column.as_materialized_series().is_not_null();
    }

    if keep.all() {
        return Ok(frame);
    }
    frame
        .filter(&keep)
        .context("Failed to drop blank rows")
}

/// Read CSV with every column as text; typing happens in [`coerce_columns`].
fn read_csv_text(bytes: &[u8]) -> Result<DataFrame> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(OrdersError::Load("CSV input is empty".to_owned()));
    }

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| OrdersError::Load(format!("CSV: {e}")))
}

/// Read the first worksheet; the first row is the header.
fn read_spreadsheet_text(bytes: &[u8]) -> Result<DataFrame> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| OrdersError::Load("workbook has no worksheets".to_owned()))??;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| OrdersError::Load("worksheet has no header row".to_owned()))?;

    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell_text(cell) {
            Some(name) => name,
            None => format!("Unnamed: {i}"),
        })
        .collect();

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (i, column) in values.iter_mut().enumerate() {
            column.push(row.get(i).and_then(cell_text));
        }
    }

    let columns = names
        .iter()
        .zip(values)
        .map(|(name, column)| Column::new(name.as_str().into(), column))
        .collect::<Vec<_>>();

    DataFrame::new(columns).map_err(|e| OrdersError::Load(format!("worksheet: {e}")))
}

/// Text form of a spreadsheet cell, copied verbatim. Empty strings, blanks
/// and error cells are absent, like empty fields in a CSV.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            (!s.is_empty()).then(|| s.clone())
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(float_text(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
        Data::Error(_) | Data::Empty => None,
    }
}

/// Whole floats print without a fraction so tags like `1234` stay intact.
fn float_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

/// Type the columns the pipeline reads: quantity as Float64, dates as
/// `Datetime(ms)`. Values that do not parse become null.
pub fn coerce_columns(df: DataFrame) -> Result<DataFrame> {
    let mut columns = df.get_columns().to_vec();
    let mut changed = false;

    for column in &mut columns {
        let name = column.name().to_string();
        if name == SERVICE_TAG_QUANTITY {
            *column = coerce_quantity(column)?;
            changed = true;
        } else if is_date_column(&name) {
            *column = coerce_datetime(column)?;
            changed = true;
        }
    }

    if changed {
        DataFrame::new(columns).context("Failed to rebuild coerced table")
    } else {
        Ok(df)
    }
}

fn coerce_quantity(column: &Column) -> Result<Column> {
    let series = column.as_materialized_series();
    if series.dtype().is_primitive_numeric() {
        return Ok(Column::from(series.cast(&DataType::Float64)?));
    }

    let text = series.cast(&DataType::String)?;
    let values: Vec<Option<f64>> = text
        .str()?
        .into_iter()
        .map(|v| v.and_then(|v| v.trim().parse::<f64>().ok()))
        .collect();
    Ok(Column::new(series.name().clone(), values))
}

fn coerce_datetime(column: &Column) -> Result<Column> {
    let target = DataType::Datetime(TimeUnit::Milliseconds, None);
    let series = column.as_materialized_series();
    if series.dtype().is_temporal() {
        return Ok(Column::from(series.cast(&target)?));
    }

    let text = series.cast(&DataType::String)?;
    let millis: Vec<Option<i64>> = text
        .str()?
        .into_iter()
        .map(|v| v.and_then(parse_datetime).map(to_millis))
        .collect();
    let parsed = Series::new(series.name().clone(), millis).cast(&target)?;
    Ok(Column::from(parsed))
}
