//! Core business logic modules

pub mod error;
pub mod metrics;
pub mod optimizer;
pub mod reducer;
pub mod risk;
pub mod selector;

// Re-export commonly used types
pub use error::OptimizeError;
pub use metrics::{expected_value, system_cost, win_probability, SystemComposition, SystemMetrics};
pub use optimizer::{optimize, OptimizationResult, SystemOptimizer};
pub use reducer::{BudgetReducer, ReductionStrategy, ReductionSummary};
pub use risk::{RiskLevel, RiskProfile};
pub use selector::Selector;
