//! Text rendering of filtered orders.
//!
//! Two layouts share the same content:
//! - [`render_console_report`]: the batch runner's summary plus detail blocks,
//!   separated by 80-character rules.
//! - [`render_print_report`]: Markdown for the print-friendly view.
//!
//! Both are pure; callers decide where the text goes.

use crate::error::Result;
use crate::orders::{FilteredOrder, FilteredOrders, OrderSummary};
use crate::utils::{fmt_opt_datetime, long_date, or_dash};
use chrono::NaiveDate;

const RULE_WIDTH: usize = 80;

/// Render the summary block and one detail block per order.
pub fn render_console_report(
    orders: &FilteredOrders,
    summary: &OrderSummary,
    generated_on: NaiveDate,
) -> Result<String> {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Summary
    out.push('\n');
    out.push_str(&heavy);
    out.push('\n');
    out.push_str(&format!(
        "DELL ORDERS SUMMARY - {}\n",
        long_date(generated_on)
    ));
    out.push_str(&heavy);
    out.push('\n');
    out.push_str(&format!("\nTotal Orders: {}\n", summary.total));
    out.push_str("\nStatus Breakdown:\n");
    for entry in &summary.status_counts {
        out.push_str(&format!("  • {}: {}\n", entry.status, entry.count));
    }

    // Details
    out.push('\n');
    out.push_str(&heavy);
    out.push('\n');
    out.push_str("DETAILED ORDERS\n");
    out.push_str(&heavy);
    out.push_str("\n\n");

    for order in orders.orders()? {
        render_console_order(&mut out, &order);
        out.push_str(&light);
        out.push('\n');
    }

    Ok(out)
}

fn render_console_order(out: &mut String, order: &FilteredOrder) {
    out.push_str(&format!(
        "Customer: {}\n",
        or_dash(order.customer_name.as_deref())
    ));
    out.push_str(&format!("Contact: {}\n", or_dash(order.contact.as_deref())));
    out.push_str(&format!(
        "Service Tag: {}\n",
        or_dash(order.service_tag.as_deref())
    ));
    out.push_str(&format!("Ship Date: {}\n", fmt_opt_datetime(order.ship_date)));
    out.push_str(&format!("Status: {}\n", or_dash(order.status.as_deref())));
    out.push_str(&format!(
        "Secondary Status: {}\n",
        or_dash(order.secondary_status.as_deref())
    ));
    if let Some(url) = &order.tracking_url {
        out.push_str(&format!("Tracking: {url}\n"));
    }
}

/// Render the print-friendly Markdown report.
pub fn render_print_report(orders: &FilteredOrders, generated_on: NaiveDate) -> Result<String> {
    let mut md = String::new();

    md.push_str("### Dell Laptop Orders Report\n\n");
    md.push_str(&format!("**Date:** {}  \n", long_date(generated_on)));
    md.push_str(&format!("**Total Orders:** {}\n\n", orders.len()));
    md.push_str("---\n\n");

    for order in orders.orders()? {
        md.push_str(&format!(
            "**{} - {}**\n\n",
            or_dash(order.customer_name.as_deref()),
            or_dash(order.contact.as_deref())
        ));
        md.push_str(&format!(
            "- Service Tag: `{}`\n",
            or_dash(order.service_tag.as_deref())
        ));
        md.push_str(&format!("- Ship Date: {}\n", fmt_opt_datetime(order.ship_date)));
        md.push_str(&format!("- Status: {}\n", or_dash(order.status.as_deref())));
        md.push_str(&format!(
            "- Secondary Status: {}\n",
            or_dash(order.secondary_status.as_deref())
        ));
        if let Some(url) = &order.tracking_url {
            md.push_str(&format!("- [Track Order]({url})\n"));
        }
        md.push_str("\n---\n\n");
    }

    Ok(md)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::columns::OUTPUT_COLUMNS;
    use polars::prelude::*;

    fn sample() -> Result<FilteredOrders> {
        let ship = Series::new(
            "Ship Date".into(),
            vec![Some(1_761_868_800_000_i64), None], // 2025-10-31 00:00:00
        )
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

        let columns = vec![
            Column::new(OUTPUT_COLUMNS[0].into(), vec![Some("Acme Corp"), Some("Globex")]),
            Column::new(OUTPUT_COLUMNS[1].into(), vec![Some("Pat Lee"), None]),
            Column::new(OUTPUT_COLUMNS[2].into(), vec![Some("ABC1234"), Some("XYZ9876")]),
            Column::from(ship),
            Column::new(OUTPUT_COLUMNS[4].into(), vec![Some("Shipped"), Some("In Production")]),
            Column::new(OUTPUT_COLUMNS[5].into(), vec![Some("Delivered"), Some("On Track")]),
            Column::new(
                OUTPUT_COLUMNS[6].into(),
                vec![Some("https://www.dell.com/track/ABC1234"), None],
            ),
        ];
        Ok(FilteredOrders::new(DataFrame::new(columns)?))
    }

    fn generated() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 30).expect("valid date")
    }

    #[test]
    fn test_console_report_layout() -> Result<()> {
        let orders = sample()?;
        let summary = orders.summary()?;
        let text = render_console_report(&orders, &summary, generated())?;

        assert!(text.contains("DELL ORDERS SUMMARY - October 30, 2025"));
        assert!(text.contains("Total Orders: 2"));
        assert!(text.contains("  • Shipped: 1\n"));
        assert!(text.contains("Ship Date: 2025-10-31\n"));
        assert!(text.contains("Ship Date: —\n"), "absent ship date renders as dash");
        assert!(text.contains("Tracking: https://www.dell.com/track/ABC1234\n"));
        assert_eq!(
            text.matches("Tracking:").count(),
            1,
            "tracking line only when a URL exists"
        );
        assert_eq!(text.matches(&"-".repeat(80)).count(), 2, "one rule per order");
        Ok(())
    }

    #[test]
    fn test_console_summary_block_is_exact() -> Result<()> {
        let orders = sample()?;
        let summary = orders.summary()?;
        let text = render_console_report(&orders, &summary, generated())?;

        let rule = "=".repeat(80);
        let expected = format!(
            "\n{rule}\nDELL ORDERS SUMMARY - October 30, 2025\n{rule}\n\n\
             Total Orders: 2\n\nStatus Breakdown:\n  • Shipped: 1\n  • In Production: 1\n\n\
             {rule}\nDETAILED ORDERS\n{rule}\n\nCustomer: Acme Corp\n"
        );
        assert!(text.starts_with(&expected), "got:\n{text}");
        Ok(())
    }

    #[test]
    fn test_print_report_layout() -> Result<()> {
        let md = render_print_report(&sample()?, generated())?;

        assert!(md.starts_with("### Dell Laptop Orders Report\n"));
        assert!(md.contains("**Date:** October 30, 2025"));
        assert!(md.contains("**Total Orders:** 2"));
        assert!(md.contains("**Acme Corp - Pat Lee**"));
        assert!(md.contains("**Globex - —**"));
        assert!(md.contains("- Service Tag: `ABC1234`"));
        assert!(md.contains("- [Track Order](https://www.dell.com/track/ABC1234)"));
        assert_eq!(md.matches("[Track Order]").count(), 1);
        Ok(())
    }

    #[test]
    fn test_empty_report_has_header_only() -> Result<()> {
        let empty = sample()?.narrow_by_status(&["Cancelled".to_owned()])?;
        let md = render_print_report(&empty, generated())?;
        assert!(md.contains("**Total Orders:** 0"));
        assert!(!md.contains("Service Tag"));
        Ok(())
    }
}
