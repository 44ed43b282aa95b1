//! Column names of the daily order export and of the filtered output.

// Source columns (as exported by the order portal)
pub const SHIP_TO_CUSTOMER: &str = "Ship To Customer";
pub const SHIP_TO_CONTACT: &str = "Ship To Contact";
pub const SERVICE_TAG: &str = "Service Tag";
pub const SERVICE_TAG_QUANTITY: &str = "Service Tag Quantity";
pub const ORDER_DATE: &str = "Order Date";
pub const ACTUAL_SHIP_DATE: &str = "Actual Ship Date";
pub const REVISED_SHIP_DATE: &str = "Revised Ship Date(RSD)";
pub const ESTIMATED_SHIP_DATE: &str = "Estimated Ship Date(ESD)";
pub const STATUS: &str = "Status";
pub const SUB_STATUS: &str = "Sub/Secondary Status";
pub const TRACK_YOUR_ORDER: &str = "Track Your Order";

// Output columns
pub const CUSTOMER_NAME: &str = "Customer Name";
pub const CONTACT: &str = "Contact";
pub const SHIP_DATE: &str = "Ship Date";
pub const SECONDARY_STATUS: &str = "Secondary Status";
pub const TRACKING_URL: &str = "Tracking URL";

/// Columns projected out of every surviving record, in projection order.
pub const PROJECTED_COLUMNS: [&str; 9] = [
    SHIP_TO_CUSTOMER,
    SHIP_TO_CONTACT,
    SERVICE_TAG,
    ACTUAL_SHIP_DATE,
    REVISED_SHIP_DATE,
    ESTIMATED_SHIP_DATE,
    STATUS,
    SUB_STATUS,
    TRACK_YOUR_ORDER,
];

/// Ship-date candidates, highest priority first.
pub const SHIP_DATE_PRIORITY: [&str; 3] = [ACTUAL_SHIP_DATE, REVISED_SHIP_DATE, ESTIMATED_SHIP_DATE];

/// Header of the filtered table and of both export formats.
pub const OUTPUT_COLUMNS: [&str; 7] = [
    CUSTOMER_NAME,
    CONTACT,
    SERVICE_TAG,
    SHIP_DATE,
    STATUS,
    SECONDARY_STATUS,
    TRACKING_URL,
];

/// Columns the loader coerces to Datetime when present.
///
/// `Ship Date` is included so that exported files reload with typed dates.
pub const DATE_COLUMNS: [&str; 5] = [
    ORDER_DATE,
    ACTUAL_SHIP_DATE,
    REVISED_SHIP_DATE,
    ESTIMATED_SHIP_DATE,
    SHIP_DATE,
];

/// Every column an order table must carry, in the order they are checked.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    std::iter::once(SERVICE_TAG_QUANTITY).chain(PROJECTED_COLUMNS)
}

pub fn is_date_column(name: &str) -> bool {
    DATE_COLUMNS.contains(&name)
}
