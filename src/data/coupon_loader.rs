//! Coupon file loading
//!
//! A coupon is the list of matches to play plus optional budget and risk
//! level overrides. JSON coupons use the same shape as the API request;
//! CSV coupons carry only the matches.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::csv_loader::load_match_card;
use super::DataError;
use crate::models::MatchInput;

/// Coupon JSON structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Coupon {
    pub matches: Vec<MatchInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
}

/// Parse a coupon from a JSON string
pub fn parse_coupon_json(content: &str) -> Result<Coupon, DataError> {
    Ok(serde_json::from_str(content)?)
}

/// Load a coupon from a `.json` or `.csv` file
pub fn load_coupon<P: AsRef<Path>>(path: P) -> Result<Coupon, DataError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => {
            let content = fs::read_to_string(path)?;
            parse_coupon_json(&content)
        }
        "csv" => Ok(Coupon {
            matches: load_match_card(path)?,
            ..Default::default()
        }),
        other => Err(DataError::UnsupportedFormat(other.to_string())),
    }
}
