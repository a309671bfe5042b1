// Kronos - Detainee Listing
// Shared by the terminal UI, the render command and the web server

pub mod detainee;
pub mod table;
pub mod columns;
pub mod config;
pub mod query;
pub mod html;
pub mod telemetry;

#[cfg(feature = "tui")]
pub mod ui;

#[cfg(feature = "server")]
pub mod web;

// Re-export commonly used types
pub use detainee::{dataset, Detainee, Status};
pub use table::{
    Cell, CellContent, CellValue, ColumnDef, Header, HeaderGroup, Row, SortKey, Table,
    TableError, TableState, DEFAULT_PAGE_SIZE,
};
pub use columns::{
    default_table, detainee_columns, detainee_table, status_badge_class, BadgeTone,
    DetaineeTable, EMPTY_PLACEHOLDER,
};
pub use config::Config;
pub use query::PageQuery;
pub use html::render_page;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
