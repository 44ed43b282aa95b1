//! Order export loading and the filter pipeline.
//!
//! - [`loader`]: CSV/spreadsheet bytes into a typed table
//! - [`filter`]: quantity/date gate, ship date derivation, projection
//! - [`summary`]: status breakdown for the filtered set
//! - [`pipeline`]: one self-contained run over a single file

pub mod columns;
pub mod dates;
pub mod filter;
pub mod loader;
pub mod pipeline;
pub mod summary;
pub mod types;

pub use filter::{filter_orders, ship_date};
pub use loader::{
    InputFormat, coerce_columns, load_frame, load_orders, read_input_bytes, read_orders_file,
};
pub use pipeline::{OrderPipeline, PipelineOutcome};
pub use summary::{OrderSummary, SHIPPED_STATUS, StatusCount};
pub use types::{FilteredOrder, FilteredOrders, OrderTable};
