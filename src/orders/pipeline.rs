//! One pipeline invocation: input bytes and target date in, result value out.
//!
//! Nothing is shared between invocations, so front ends create one per file.

use super::filter::filter_orders;
use super::loader::{InputFormat, load_orders, read_orders_file};
use super::types::{FilteredOrders, OrderTable};
use crate::error::Result;
use chrono::NaiveDate;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPipeline {
    target_date: NaiveDate,
}

/// Everything a front end needs after one run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Rows in the uploaded export, before filtering.
    pub loaded_rows: usize,
    /// False when the export has no `Order Date` column.
    pub date_filter_applied: bool,
    pub target_date: NaiveDate,
    pub orders: FilteredOrders,
}

impl OrderPipeline {
    pub fn new(target_date: NaiveDate) -> Self {
        Self { target_date }
    }

    pub fn run(&self, bytes: &[u8], format: InputFormat) -> Result<PipelineOutcome> {
        let table = load_orders(bytes, format)?;
        self.run_table(&table)
    }

    pub fn run_path(&self, path: &Path) -> Result<PipelineOutcome> {
        let table = read_orders_file(path)?;
        self.run_table(&table)
    }

    pub fn run_table(&self, table: &OrderTable) -> Result<PipelineOutcome> {
        let orders = filter_orders(table, self.target_date)?;
        Ok(PipelineOutcome {
            loaded_rows: table.len(),
            date_filter_applied: table.has_order_date(),
            target_date: self.target_date,
            orders,
        })
    }
}

impl PipelineOutcome {
    /// One-line description of what the filter kept.
    pub fn filter_message(&self) -> String {
        if self.date_filter_applied {
            format!(
                "Filtered to {} orders with Service Tag Quantity = 1 and Order Date = {}",
                self.orders.len(),
                self.target_date.format("%m/%d/%Y")
            )
        } else {
            format!(
                "Filtered to {} orders with Service Tag Quantity = 1",
                self.orders.len()
            )
        }
    }
}
