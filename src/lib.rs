//! ListingView - Real-Estate Listings Dashboard Engine
//!
//! A columnar listings table with cleaning, group aggregates and four reactive
//! dashboard views (variable overview, state price comparison, size/price
//! scatter, state choropleth). Views produce render-ready data; drawing is left
//! to the client.

pub mod aggregate;
pub mod clean;
pub mod column;
pub mod config;
pub mod controllers;
pub mod dashboard;
pub mod error;
pub mod geometry;
pub mod interner;
pub mod listing;
pub mod stats;
pub mod table;
pub mod view;

pub use aggregate::{
    group_by, sort_groups, state_summary, status_summary, summarize_groups, GroupSummary,
    GroupValue, Reducer, SortKey, NA_KEY,
};
pub use clean::{clean, CleaningReport};
pub use column::{Column, ColumnType, ColumnValue};
pub use config::{DashboardConfig, LoadOptions};
pub use controllers::ViewController;
pub use dashboard::{Action, Dashboard, RenderOutput, SharedTables};
pub use error::{ListingError, Result};
pub use geometry::{Geometry, PolygonVertex};
pub use interner::{InternerStats, StringId, StringInterner};
pub use listing::{FieldKind, ListingField, ListingRecord, ListingTable};
pub use table::{Schema, Table};
pub use view::{left_join_index, FilterView, RowSource, SortOrder};

// WebSocket server modules - only when server feature is enabled
#[cfg(feature = "server")]
pub mod messages;
#[cfg(feature = "server")]
pub mod websocket;
#[cfg(feature = "server")]
pub mod server;
