//! Backtesting engine for validating systems against played rounds

pub mod metrics;
pub mod simulator;

pub use metrics::{
    analyze_by_cover, calculate_metrics, correct_distribution, BacktestMetrics, CoverAnalysis,
};
pub use simulator::{BacktestConfig, BacktestResult, BacktestSimulator, MatchOutcome, RoundRecord};
