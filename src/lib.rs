//! # Dell Orders Tracker
//!
//! Filters a daily Dell order export down to single-unit orders placed on a
//! target day, derives one ship date per order and reports on them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dell_orders::orders::OrderPipeline;
//! use dell_orders::config::DEFAULT_TARGET_ORDER_DATE;
//! use std::path::Path;
//!
//! let outcome = OrderPipeline::new(DEFAULT_TARGET_ORDER_DATE)
//!     .run_path(Path::new("orders.xlsx"))?;
//! println!("{}", outcome.filter_message());
//!
//! let summary = outcome.orders.summary()?;
//! for entry in &summary.status_counts {
//!     println!("{}: {}", entry.status, entry.count);
//! }
//! # Ok::<(), dell_orders::error::OrdersError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`orders`]: loading exports and the filter pipeline
//!   - [`orders::loader`]: CSV/spreadsheet bytes into a schema-checked table
//!   - [`orders::filter`]: quantity and order-date gates, ship date derivation
//! - [`report`]: console and print-friendly text reports
//! - [`export`]: CSV/XLSX serialization and download names
//! - [`interactive`]: upload-driven view for a UI front end
//! - [`config`]: persisted settings
//! - [`logging`]: tracing setup
//! - [`error`]: error types and handling utilities
//!
//! Each run owns its data; nothing is shared between invocations.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod export;
pub mod interactive;
pub mod logging;
pub mod orders;
pub mod report;
pub mod utils;
