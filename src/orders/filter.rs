//! The order filter pipeline.
//!
//! ```text
//! OrderTable ─> quantity == 1 ─> order date == target ─> project/rename ─> FilteredOrders
//!                                 (skipped without an      └─ Ship Date = Actual ?? Revised ?? Estimated
//!                                  Order Date column)
//! ```
//!
//! Everything is expressed as one lazy query so the table is scanned once.

use super::columns::{
    CONTACT, CUSTOMER_NAME, ORDER_DATE, SECONDARY_STATUS, SERVICE_TAG, SERVICE_TAG_QUANTITY,
    SHIP_DATE, SHIP_DATE_PRIORITY, SHIP_TO_CONTACT, SHIP_TO_CUSTOMER, STATUS, SUB_STATUS,
    TRACK_YOUR_ORDER, TRACKING_URL,
};
use super::dates::epoch_days;
use super::types::{FilteredOrders, OrderTable};
use crate::error::{OrdersError, Result, ResultExt as _};
use chrono::NaiveDate;
use polars::prelude::*;

/// Select single-unit orders placed on `target_date` and reshape them for
/// display.
///
/// An empty result is not an error.
pub fn filter_orders(table: &OrderTable, target_date: NaiveDate) -> Result<FilteredOrders> {
    let mut lf = table.frame().clone().lazy().filter(quantity_is_one());

    if table.has_order_date() {
        lf = lf.filter(order_date_is(target_date)?);
    }

    let frame = lf
        .select(projection())
        .collect()
        .context("Failed to filter orders")?;

    tracing::info!(
        source_rows = table.len(),
        filtered_rows = frame.height(),
        date_filter = table.has_order_date(),
        %target_date,
        "Filtered order export"
    );

    Ok(FilteredOrders::new(frame))
}

/// Numeric equality, so `1.0` passes and null/`0`/`2` do not.
fn quantity_is_one() -> Expr {
    col(SERVICE_TAG_QUANTITY).eq(lit(1.0))
}

/// Date part of `Order Date` equals the target; unparsed dates are null and
/// never match.
fn order_date_is(target_date: NaiveDate) -> Result<Expr> {
    let days = i32::try_from(epoch_days(target_date)).map_err(|e| {
        OrdersError::Config(format!("target date {target_date} out of range: {e}"))
    })?;

    Ok(col(ORDER_DATE)
        .dt()
        .date()
        .eq(lit(days).cast(DataType::Date)))
}

/// First present value of Actual, Revised, Estimated.
pub fn ship_date() -> Expr {
    let [actual, revised, estimated] = SHIP_DATE_PRIORITY;
    when(col(actual).is_not_null())
        .then(col(actual))
        .when(col(revised).is_not_null())
        .then(col(revised))
        .otherwise(col(estimated))
}

/// Output columns in display order, renamed.
fn projection() -> [Expr; 7] {
    [
        col(SHIP_TO_CUSTOMER).alias(CUSTOMER_NAME),
        col(SHIP_TO_CONTACT).alias(CONTACT),
        col(SERVICE_TAG),
        ship_date().alias(SHIP_DATE),
        col(STATUS),
        col(SUB_STATUS).alias(SECONDARY_STATUS),
        col(TRACK_YOUR_ORDER).alias(TRACKING_URL),
    ]
}

impl FilteredOrders {
    /// Keep only orders whose Status is one of `chosen`.
    ///
    /// An empty selection means no narrowing, like an untouched multiselect.
    pub fn narrow_by_status(&self, chosen: &[String]) -> Result<Self> {
        if chosen.is_empty() {
            return Ok(self.clone());
        }

        let keep: Vec<bool> = self
            .statuses()?
            .iter()
            .map(|status| {
                status
                    .as_deref()
                    .is_some_and(|s| chosen.iter().any(|c| c == s))
            })
            .collect();
        let mask = BooleanChunked::from_slice("keep".into(), &keep);

        let frame = self.frame().filter(&mask)?;
        tracing::debug!(
            chosen = ?chosen,
            before = self.len(),
            after = frame.height(),
            "Narrowed orders by status"
        );
        Ok(Self::new(frame))
    }

    /// Distinct statuses in first-seen order, for the status picker.
    pub fn status_options(&self) -> Result<Vec<String>> {
        let mut options: Vec<String> = Vec::new();
        for status in self.statuses()?.into_iter().flatten() {
            if !options.contains(&status) {
                options.push(status);
            }
        }
        Ok(options)
    }
}
