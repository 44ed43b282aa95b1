//! Centralized error handling for the order tracker.
//!
//! Every fallible library operation returns [`Result<T>`], whose error type is
//! [`OrdersError`]. The variants mirror the places a run can go wrong:
//!
//! - the input could not be found or read ([`OrdersError::NotFound`],
//!   [`OrdersError::Io`]),
//! - the bytes are not a valid CSV/spreadsheet ([`OrdersError::Load`]),
//! - a column the pipeline needs is missing ([`OrdersError::Schema`]),
//! - a table operation or export failed ([`OrdersError::DataProcessing`],
//!   [`OrdersError::Export`]).
//!
//! Date cells that fail to parse are *not* errors: they degrade to absent
//! values inside the loader.
//!
//! ```
//! use dell_orders::error::OrdersError;
//!
//! fn explain(err: &OrdersError) -> String {
//!     match err {
//!         OrdersError::Schema { column } => format!("add a '{column}' column"),
//!         OrdersError::NotFound(path) => format!("check the path {}", path.display()),
//!         other => other.to_string(),
//!     }
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

/// Main error type for order tracker operations.
#[derive(Debug)]
pub enum OrdersError {
    /// I/O errors (reading the upload, writing an export)
    Io(std::io::Error),

    /// Input file does not exist
    NotFound(PathBuf),

    /// Input bytes cannot be parsed as the declared format
    Load(String),

    /// A column required by the pipeline is absent from the table
    Schema { column: String },

    /// Table operation errors (Polars)
    DataProcessing(String),

    /// CSV/XLSX serialization errors
    Export(String),

    /// Configuration errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl OrdersError {
    pub fn schema(column: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
        }
    }

    /// Name of the missing column for schema failures.
    pub fn missing_column(&self) -> Option<&str> {
        match self {
            Self::Schema { column } => Some(column),
            _ => None,
        }
    }
}

impl fmt::Display for OrdersError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::NotFound(path) => write!(f, "File not found: {}", path.display()),
            Self::Load(msg) => write!(f, "Failed to load input: {msg}"),
            Self::Schema { column } => write!(f, "Missing required column: '{column}'"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Export(msg) => write!(f, "Export error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for OrdersError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OrdersError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for OrdersError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for OrdersError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for OrdersError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<calamine::Error> for OrdersError {
    fn from(err: calamine::Error) -> Self {
        Self::Load(format!("spreadsheet: {err}"))
    }
}

impl From<rust_xlsxwriter::XlsxError> for OrdersError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(format!("spreadsheet: {err}"))
    }
}

/// Result type alias for order tracker operations.
pub type Result<T> = std::result::Result<T, OrdersError>;

/// Extension trait to add context to results.
///
/// Schema and not-found errors pass through untouched so callers can still
/// match on them after context has been added.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<OrdersError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(e.into(), msg.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

fn wrap(err: OrdersError, msg: String) -> OrdersError {
    match err {
        OrdersError::Schema { .. } | OrdersError::NotFound(_) => err,
        OrdersError::Load(inner) => OrdersError::Load(format!("{msg}: {inner}")),
        OrdersError::Export(inner) => OrdersError::Export(format!("{msg}: {inner}")),
        other => OrdersError::Other(format!("{msg}: {other}")),
    }
}
