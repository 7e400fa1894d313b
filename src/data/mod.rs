//! Data loading modules

pub mod coupon_loader;
pub mod csv_loader;

use polars::prelude::PolarsError;
use thiserror::Error;

// Re-export commonly used types
pub use coupon_loader::{load_coupon, parse_coupon_json, Coupon};
pub use csv_loader::{load_history, load_match_card, HistoricalMatch};

/// Data loading errors
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] PolarsError),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Unsupported coupon format: {0:?} (expected json or csv)")]
    UnsupportedFormat(String),
}
