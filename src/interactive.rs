//! Upload-driven order view for an interactive front end.
//!
//! The flow mirrors what a user does with a daily export:
//!
//! ```text
//! process_upload(name, bytes) ─> OrdersView
//!                                  ├─ summary / status_options   (whole filtered set)
//!                                  └─ visible(chosen)            (narrowed by status)
//!                                       ├─ table_rows
//!                                       ├─ downloads   (xlsx + csv)
//!                                       └─ print_report
//! ```
//!
//! Nothing here keeps state between calls. Every function returns
//! `Result<_, String>` with a user-facing message so a UI can show failures
//! directly.

use crate::config::TrackerSettings;
use crate::error::OrdersError;
use crate::export::{ExportFormat, download_file_name, to_csv_bytes, to_xlsx_bytes};
use crate::orders::{FilteredOrders, InputFormat, OrderPipeline, OrderSummary};
use crate::report::render_print_report;
use crate::utils::{fmt_opt_datetime, or_dash};
use chrono::NaiveDate;
use serde::Serialize;

/// Upload extensions the view accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

pub const EMPTY_RESULT_WARNING: &str = "No orders found with Service Tag Quantity = 1";

pub const MISSING_COLUMNS_HINT: &str =
    "Make sure the file has the expected columns including 'Service Tag Quantity'";

/// A file ready to hand to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub label: &'static str,
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// One displayed table row; the tracking URL is kept apart so it can be
/// rendered as a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRow {
    pub customer_name: String,
    pub contact: String,
    pub service_tag: String,
    pub ship_date: String,
    pub status: String,
    pub secondary_status: String,
    pub tracking_url: Option<String>,
}

/// Filter result for one upload.
#[derive(Debug, Clone)]
pub struct OrdersView {
    pub file_name: String,
    pub loaded_rows: usize,
    pub filter_message: String,
    /// Set when nothing survived the filter.
    pub warning: Option<String>,
    pub summary: OrderSummary,
    pub status_options: Vec<String>,
    orders: FilteredOrders,
    export_file_prefix: String,
}

/// Load and filter an uploaded export.
pub fn process_upload(
    file_name: &str,
    bytes: &[u8],
    settings: &TrackerSettings,
) -> Result<OrdersView, String> {
    tracing::info!("process_upload called for {} ({} bytes)", file_name, bytes.len());

    if !is_accepted(file_name) {
        tracing::warn!("Rejected upload with unsupported extension: {}", file_name);
        return Err(format!(
            "Error processing file: unsupported file type for '{file_name}' (expected .csv, .xlsx or .xls)"
        ));
    }

    let format = InputFormat::from_file_name(file_name);
    let outcome = OrderPipeline::new(settings.target_order_date)
        .run(bytes, format)
        .map_err(processing_error)?;

    let summary = outcome.orders.summary().map_err(processing_error)?;
    let status_options = outcome.orders.status_options().map_err(processing_error)?;
    let warning = outcome
        .orders
        .is_empty()
        .then(|| EMPTY_RESULT_WARNING.to_owned());

    Ok(OrdersView {
        file_name: file_name.to_owned(),
        loaded_rows: outcome.loaded_rows,
        filter_message: outcome.filter_message(),
        warning,
        summary,
        status_options,
        orders: outcome.orders,
        export_file_prefix: settings.export_file_prefix.clone(),
    })
}

fn is_accepted(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    ACCEPTED_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}

fn processing_error(err: OrdersError) -> String {
    tracing::error!("Upload processing failed: {}", err);
    match err.missing_column() {
        Some(_) => format!("Error processing file: {err}. {MISSING_COLUMNS_HINT}"),
        None => format!("Error processing file: {err}"),
    }
}

impl OrdersView {
    pub fn loaded_message(&self) -> String {
        format!("File loaded successfully! Total rows: {}", self.loaded_rows)
    }

    /// All filtered orders, before any status narrowing.
    pub fn orders(&self) -> &FilteredOrders {
        &self.orders
    }

    /// Orders whose status is in `chosen`; an empty selection shows everything.
    pub fn visible(&self, chosen: &[String]) -> Result<FilteredOrders, String> {
        self.orders.narrow_by_status(chosen).map_err(processing_error)
    }

    /// Message shown when a status selection is active.
    pub fn narrowing_message(&self, chosen: &[String]) -> Result<Option<String>, String> {
        if chosen.is_empty() {
            return Ok(None);
        }
        let visible = self.visible(chosen)?;
        Ok(Some(format!(
            "Showing {} orders matching selected status filter",
            visible.len()
        )))
    }

    pub fn table_rows(&self, chosen: &[String]) -> Result<Vec<OrderRow>, String> {
        let visible = self.visible(chosen)?;
        let orders = visible.orders().map_err(processing_error)?;
        Ok(orders
            .into_iter()
            .map(|order| OrderRow {
                customer_name: or_dash(order.customer_name.as_deref()).to_owned(),
                contact: or_dash(order.contact.as_deref()).to_owned(),
                service_tag: or_dash(order.service_tag.as_deref()).to_owned(),
                ship_date: fmt_opt_datetime(order.ship_date),
                status: or_dash(order.status.as_deref()).to_owned(),
                secondary_status: or_dash(order.secondary_status.as_deref()).to_owned(),
                tracking_url: order.tracking_url,
            })
            .collect())
    }

    /// Spreadsheet and CSV downloads of the visible orders, named after the
    /// generation date.
    pub fn downloads(
        &self,
        chosen: &[String],
        generated_on: NaiveDate,
    ) -> Result<[Download; 2], String> {
        let visible = self.visible(chosen)?;
        let xlsx = to_xlsx_bytes(&visible).map_err(processing_error)?;
        let csv = to_csv_bytes(&visible).map_err(processing_error)?;

        Ok([
            self.download("Download as Excel", ExportFormat::Xlsx, generated_on, xlsx),
            self.download("Download as CSV", ExportFormat::Csv, generated_on, csv),
        ])
    }

    fn download(
        &self,
        label: &'static str,
        format: ExportFormat,
        generated_on: NaiveDate,
        bytes: Vec<u8>,
    ) -> Download {
        Download {
            label,
            file_name: download_file_name(&self.export_file_prefix, generated_on, format),
            mime_type: format.mime_type(),
            bytes,
        }
    }

    pub fn print_report(&self, chosen: &[String], generated_on: NaiveDate) -> Result<String, String> {
        let visible = self.visible(chosen)?;
        render_print_report(&visible, generated_on).map_err(processing_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Ship To Customer,Ship To Contact,Service Tag,Service Tag Quantity,\
        Order Date,Actual Ship Date,Revised Ship Date(RSD),Estimated Ship Date(ESD),Status,\
        Sub/Secondary Status,Track Your Order";

    fn upload() -> String {
        format!(
            "{HEADER}\n\
             Acme Corp,Pat Lee,ABC1234,1,10/30/2025,10/31/2025,,,Shipped,Delivered,https://www.dell.com/track/ABC1234\n\
             Globex,Sam Diaz,DEF5678,1,10/30/2025,,11/03/2025,11/07/2025,In Production,On Track,\n\
             Initech,Lee Wu,GHI9012,2,10/30/2025,,,11/05/2025,Shipped,Delivered,\n\
             Umbrella,Kim Ode,JKL3456,1,10/29/2025,,,11/05/2025,Shipped,Delivered,\n"
        )
    }

    fn settings() -> TrackerSettings {
        TrackerSettings::default()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 30).expect("valid date")
    }

    #[test]
    fn test_upload_builds_view() -> Result<(), String> {
        let view = process_upload("orders.csv", upload().as_bytes(), &settings())?;

        assert_eq!(view.loaded_rows, 4);
        assert_eq!(view.loaded_message(), "File loaded successfully! Total rows: 4");
        assert_eq!(
            view.filter_message,
            "Filtered to 2 orders with Service Tag Quantity = 1 and Order Date = 10/30/2025"
        );
        assert_eq!(view.warning, None);
        assert_eq!(view.summary.total, 2);
        assert_eq!(view.summary.shipped, 1);
        assert_eq!(view.status_options, vec!["Shipped", "In Production"]);
        Ok(())
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let err = process_upload("orders.json", b"{}", &settings()).expect_err("json upload");
        assert!(err.starts_with("Error processing file:"));
    }

    #[test]
    fn test_missing_column_message_has_hint() {
        let csv = "Ship To Customer,Service Tag\nAcme,ABC1234\n";
        let err = process_upload("orders.csv", csv.as_bytes(), &settings()).expect_err("schema");
        assert!(err.starts_with("Error processing file: Missing required column: 'Service Tag Quantity'"));
        assert!(err.ends_with(MISSING_COLUMNS_HINT));
    }

    #[test]
    fn test_empty_result_sets_warning() -> Result<(), String> {
        let later = TrackerSettings {
            target_order_date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
            ..settings()
        };
        let view = process_upload("orders.csv", upload().as_bytes(), &later)?;
        assert!(view.orders().is_empty());
        assert_eq!(view.warning.as_deref(), Some(EMPTY_RESULT_WARNING));
        Ok(())
    }

    #[test]
    fn test_table_rows_expose_tracking_links() -> Result<(), String> {
        let view = process_upload("orders.csv", upload().as_bytes(), &settings())?;
        let rows = view.table_rows(&[])?;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ship_date, "2025-10-31");
        assert_eq!(
            rows[0].tracking_url.as_deref(),
            Some("https://www.dell.com/track/ABC1234")
        );
        assert_eq!(rows[1].ship_date, "2025-11-03", "revised date beats estimated");
        assert_eq!(rows[1].tracking_url, None);
        Ok(())
    }

    #[test]
    fn test_narrowing_applies_to_downloads_and_report() -> Result<(), String> {
        let view = process_upload("orders.csv", upload().as_bytes(), &settings())?;
        let chosen = vec!["Shipped".to_owned()];

        assert_eq!(view.visible(&chosen)?.len(), 1);
        assert_eq!(
            view.narrowing_message(&chosen)?.as_deref(),
            Some("Showing 1 orders matching selected status filter")
        );
        assert_eq!(view.narrowing_message(&[])?, None);

        let [xlsx, csv] = view.downloads(&chosen, today())?;
        assert_eq!(xlsx.file_name, "dell_orders_filtered_20251030.xlsx");
        assert_eq!(xlsx.mime_type, ExportFormat::Xlsx.mime_type());
        assert_eq!(csv.file_name, "dell_orders_filtered_20251030.csv");
        assert_eq!(csv.mime_type, "text/csv");

        let csv_text = String::from_utf8(csv.bytes).map_err(|e| e.to_string())?;
        assert_eq!(csv_text.lines().count(), 2, "header plus one shipped order");
        assert!(csv_text.contains("ABC1234"));

        let report = view.print_report(&chosen, today())?;
        assert!(report.contains("**Total Orders:** 1"));
        assert!(!report.contains("DEF5678"));
        Ok(())
    }

    #[test]
    fn test_download_prefix_comes_from_settings() -> Result<(), String> {
        let custom = TrackerSettings {
            export_file_prefix: "laptops".to_owned(),
            ..settings()
        };
        let view = process_upload("ORDERS.CSV", upload().as_bytes(), &custom)?;
        let [xlsx, csv] = view.downloads(&[], today())?;
        assert_eq!(xlsx.file_name, "laptops_20251030.xlsx");
        assert_eq!(csv.file_name, "laptops_20251030.csv");
        Ok(())
    }
}
