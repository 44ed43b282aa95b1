use super::columns::{
    CONTACT, CUSTOMER_NAME, ORDER_DATE, SECONDARY_STATUS, SERVICE_TAG, SHIP_DATE, STATUS,
    TRACKING_URL, required_columns,
};
use super::dates::from_millis;
use super::loader::coerce_columns;
use crate::error::{OrdersError, Result};
use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

// DATA STRUCTURES

/// Order records loaded from one export, schema-checked.
///
/// Holds the coerced table: `Service Tag Quantity` is Float64, date columns
/// are `Datetime(ms)`, everything else is text.
#[derive(Debug, Clone)]
pub struct OrderTable {
    frame: DataFrame,
    has_order_date: bool,
}

impl OrderTable {
    /// Validate that every required column exists, then coerce the quantity
    /// and date columns.
    ///
    /// Columns are checked quantity first, then in projection order; the first
    /// missing one is reported.
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();

        if let Some(missing) = required_columns().find(|req| !names.iter().any(|n| n == req)) {
            return Err(OrdersError::schema(missing));
        }

        let has_order_date = names.iter().any(|n| n == ORDER_DATE);
        let frame = coerce_columns(frame)?;
        Ok(Self {
            frame,
            has_order_date,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Whether the export carries an `Order Date` column at all.
    pub fn has_order_date(&self) -> bool {
        self.has_order_date
    }
}

/// Result of the filter pipeline: the seven output columns, one row per
/// surviving source record.
#[derive(Debug, Clone)]
pub struct FilteredOrders {
    frame: DataFrame,
}

impl FilteredOrders {
    pub(crate) fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Materialize the rows as typed records, in table order.
    pub fn orders(&self) -> Result<Vec<FilteredOrder>> {
        let customers = text_values(&self.frame, CUSTOMER_NAME)?;
        let contacts = text_values(&self.frame, CONTACT)?;
        let tags = text_values(&self.frame, SERVICE_TAG)?;
        let ship_dates = datetime_values(&self.frame, SHIP_DATE)?;
        let statuses = text_values(&self.frame, STATUS)?;
        let secondary = text_values(&self.frame, SECONDARY_STATUS)?;
        let urls = text_values(&self.frame, TRACKING_URL)?;

        let mut orders = Vec::with_capacity(self.len());
        for i in 0..self.len() {
            orders.push(FilteredOrder {
                customer_name: nth(&customers, i),
                contact: nth(&contacts, i),
                service_tag: nth(&tags, i),
                ship_date: ship_dates.get(i).copied().flatten(),
                status: nth(&statuses, i),
                secondary_status: nth(&secondary, i),
                tracking_url: nth(&urls, i),
            });
        }
        Ok(orders)
    }

    /// Status values column, in table order.
    pub fn statuses(&self) -> Result<Vec<Option<String>>> {
        text_values(&self.frame, STATUS)
    }
}

/// One filtered order, renamed for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredOrder {
    pub customer_name: Option<String>,
    pub contact: Option<String>,
    pub service_tag: Option<String>,
    pub ship_date: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub secondary_status: Option<String>,
    pub tracking_url: Option<String>,
}

// HELPER FUNCTIONS

fn nth(values: &[Option<String>], i: usize) -> Option<String> {
    values.get(i).cloned().flatten()
}

/// Read a column as optional strings, casting non-text columns.
pub(crate) fn text_values(frame: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = frame
        .column(name)
        .ok()
        .ok_or_else(|| OrdersError::schema(name))?
        .as_materialized_series()
        .cast(&DataType::String)?;

    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect())
}

/// Read a `Datetime(ms)` column as optional naive date-times.
pub(crate) fn datetime_values(
    frame: &DataFrame,
    name: &str,
) -> Result<Vec<Option<NaiveDateTime>>> {
    let series = frame
        .column(name)
        .ok()
        .ok_or_else(|| OrdersError::schema(name))?
        .as_materialized_series()
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        .cast(&DataType::Int64)?;

    Ok(series
        .i64()?
        .into_iter()
        .map(|v| v.and_then(from_millis))
        .collect())
}
