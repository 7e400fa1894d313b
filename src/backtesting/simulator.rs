//! Backtest Simulator
//!
//! Replay historical matches as coupons of a fixed size, build a system for
//! each one and check it against the actual results.

use super::metrics::{calculate_metrics, BacktestMetrics};
use crate::core::{OptimizeError, ReductionStrategy, RiskLevel, SystemOptimizer};
use crate::data::HistoricalMatch;
use crate::models::{CoverKind, MatchInput};
use crate::predictor::ProbabilitySource;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of one match within a replayed round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub kind: CoverKind,
    /// Whether the actual result was among the selected outcomes
    pub covered: bool,
    pub covered_probability: f64,
}

/// One replayed coupon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: usize,
    pub matches: usize,
    pub cost: u64,
    pub win_probability: f64,
    pub expected_value: f64,
    pub correct: usize,
    pub all_correct: bool,
    pub outcomes: Vec<MatchOutcome>,
}

/// Backtest result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub rounds: Vec<RoundRecord>,
    /// Trailing matches that did not fill a complete round
    pub dropped_matches: usize,
    pub metrics: Option<BacktestMetrics>,
}

impl BacktestResult {
    pub fn new() -> Self {
        Self {
            rounds: Vec::new(),
            dropped_matches: 0,
            metrics: None,
        }
    }

    pub fn full_hits(&self) -> usize {
        self.rounds.iter().filter(|r| r.all_correct).count()
    }

    pub fn finalize(&mut self, budget: u64) {
        self.metrics = Some(calculate_metrics(&self.rounds, budget));
    }
}

impl Default for BacktestResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Backtest simulator configuration
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    /// Matches per coupon; a full Stryktipset coupon has 13
    pub round_size: usize,
    pub budget: u64,
    pub risk_level: RiskLevel,
    pub strategy: ReductionStrategy,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            round_size: 13,
            budget: 100,
            risk_level: RiskLevel::default(),
            strategy: ReductionStrategy::default(),
        }
    }
}

/// Backtest simulator
pub struct BacktestSimulator {
    pub config: BacktestConfig,
    predictor: Box<dyn ProbabilitySource>,
}

impl BacktestSimulator {
    /// Create a new backtest simulator
    pub fn new(config: BacktestConfig, predictor: Box<dyn ProbabilitySource>) -> Self {
        Self { config, predictor }
    }

    fn round_size(&self) -> usize {
        self.config.round_size.max(1)
    }

    /// Run backtest on historical matches in file order
    pub fn run(&self, history: &[HistoricalMatch]) -> Result<BacktestResult, OptimizeError> {
        let optimizer =
            SystemOptimizer::with_profile(self.config.budget, self.config.risk_level.profile())?
                .with_strategy(self.config.strategy);

        let round_size = self.round_size();
        let chunks = history.chunks_exact(round_size);
        let dropped_matches = chunks.remainder().len();
        if dropped_matches > 0 {
            warn!(
                "Dropping {} trailing matches that do not fill a round of {}",
                dropped_matches, round_size
            );
        }

        let mut result = BacktestResult::new();
        result.dropped_matches = dropped_matches;

        for (i, round) in chunks.enumerate() {
            let inputs: Vec<MatchInput> = round.iter().map(|m| m.input.clone()).collect();
            let predictions = self.predictor.predict(&inputs);
            let optimized = optimizer.optimize(&predictions)?;

            let outcomes: Vec<MatchOutcome> = optimized
                .system
                .iter()
                .zip(round)
                .map(|(selection, played)| MatchOutcome {
                    kind: selection.kind(),
                    covered: selection.contains(played.result),
                    covered_probability: selection.covered_probability(),
                })
                .collect();

            let correct = outcomes.iter().filter(|o| o.covered).count();
            let record = RoundRecord {
                round: i + 1,
                matches: round.len(),
                cost: optimized.cost,
                win_probability: optimized.win_probability,
                expected_value: optimized.expected_value,
                correct,
                all_correct: correct == round.len(),
                outcomes,
            };

            debug!(
                round = record.round,
                cost = record.cost,
                correct = record.correct,
                "Replayed round"
            );
            result.rounds.push(record);
        }

        result.finalize(self.config.budget);
        info!(
            "Backtest finished: {} rounds, {} full hits",
            result.rounds.len(),
            result.full_hits()
        );

        Ok(result)
    }

    /// Print summary of backtest result
    pub fn print_summary(&self, result: &BacktestResult) {
        println!("\n{}", "=".repeat(60));
        println!("BACKTEST RESULTS");
        println!("{}", "=".repeat(60));
        println!("Predictor: {}", self.predictor.name());
        println!("Round size: {}", self.round_size());
        println!("Budget: {}", self.config.budget);
        println!("Risk level: {}", self.config.risk_level);
        println!("{}", "-".repeat(60));
        println!("Total rounds: {}", result.rounds.len());
        println!("Dropped matches: {}", result.dropped_matches);
        println!("Full hits: {}", result.full_hits());

        if let Some(ref metrics) = result.metrics {
            println!("{}", "-".repeat(60));
            println!("Hit rate: {:.1}%", metrics.hit_rate * 100.0);
            println!("Average cost: {:.1}", metrics.avg_cost);
            println!("Total cost: {}", metrics.total_cost);
            println!("Over-budget rounds: {}", metrics.over_budget_rounds);
            println!("Average correct: {:.2}", metrics.avg_correct);
            println!(
                "Average win probability: {:.2}%",
                metrics.avg_win_probability * 100.0
            );
            println!("Average EV: {:.2}", metrics.avg_expected_value);
            println!("Calibration gap: {:+.4}", metrics.calibration_gap);
        }

        println!("{}", "=".repeat(60));
    }
}
