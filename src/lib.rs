//! Stryktips - Budget-constrained system optimizer for Stryktipset coupons
//!
//! This library provides:
//! - Outcome probabilities from bookmaker odds, with a random fallback
//! - Per-match selection (lock, half-cover, full-cover) under a risk profile
//! - Budget reduction of the system down to a maximum row count
//! - System metrics: cost, win probability and expected value
//! - Coupon and history loading plus a round-based backtester
//!
//! # Example
//!
//! ```no_run
//! use stryktips::core::optimize;
//! use stryktips::models::MatchInput;
//! use stryktips::predictor::{OddsPredictor, ProbabilitySource};
//!
//! let matches = vec![
//!     MatchInput::new("AIK", "Hammarby").with_odds(2.4, 3.3, 2.9),
//!     MatchInput::new("Malmö FF", "IFK Göteborg").with_odds(1.6, 3.9, 5.5),
//! ];
//!
//! let predictions = OddsPredictor::with_seed(7).predict(&matches);
//! let result = optimize(&predictions, 64, "medium").unwrap();
//! println!("{} rows, win probability {:.3}", result.cost, result.win_probability);
//! ```

pub mod backtesting;
pub mod core;
pub mod data;
pub mod models;
pub mod predictor;

// API-specific modules (only available with api feature)
#[cfg(feature = "api")]
pub mod error;
#[cfg(feature = "api")]
pub mod handlers;

// Re-export commonly used types
pub use crate::core::{
    optimize, OptimizationResult, OptimizeError, RiskLevel, RiskProfile, SystemOptimizer,
};
pub use data::{load_coupon, load_history, Coupon, DataError, HistoricalMatch};
pub use models::{
    CoverKind, MatchInput, MatchProbability, MatchSelection, Outcome, OutcomeProbs, PredictRequest,
    PredictResponse,
};
pub use predictor::{OddsPredictor, ProbabilitySource};
