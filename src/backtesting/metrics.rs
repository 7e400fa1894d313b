//! Backtest Metrics
//!
//! Calculate metrics such as full-hit rate, average cost and calibration.

use super::simulator::RoundRecord;
use crate::models::CoverKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Backtest evaluation metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacktestMetrics {
    // Basic metrics
    pub total_rounds: usize,
    pub full_hits: usize,
    pub hit_rate: f64,

    // System size
    pub total_cost: u64,
    pub avg_cost: f64,
    pub over_budget_rounds: usize,

    // Accuracy
    pub avg_correct: f64,
    pub avg_win_probability: f64,
    pub avg_expected_value: f64,
    /// Predicted minus realised full-hit rate; positive means overconfident
    pub calibration_gap: f64,
}

/// Calculate metrics from round records
pub fn calculate_metrics(rounds: &[RoundRecord], budget: u64) -> BacktestMetrics {
    if rounds.is_empty() {
        return BacktestMetrics::default();
    }

    let total_rounds = rounds.len();
    let n = total_rounds as f64;

    let full_hits = rounds.iter().filter(|r| r.all_correct).count();
    let hit_rate = full_hits as f64 / n;

    let total_cost: u64 = rounds.iter().map(|r| r.cost).sum();
    let avg_cost = total_cost as f64 / n;
    let over_budget_rounds = rounds.iter().filter(|r| r.cost > budget).count();

    let avg_correct = rounds.iter().map(|r| r.correct as f64).sum::<f64>() / n;
    let avg_win_probability = rounds.iter().map(|r| r.win_probability).sum::<f64>() / n;
    let avg_expected_value = rounds.iter().map(|r| r.expected_value).sum::<f64>() / n;

    BacktestMetrics {
        total_rounds,
        full_hits,
        hit_rate,
        total_cost,
        avg_cost,
        over_budget_rounds,
        avg_correct,
        avg_win_probability,
        avg_expected_value,
        calibration_gap: avg_win_probability - hit_rate,
    }
}

/// Hit statistics for one cover class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverAnalysis {
    pub key: String,
    pub matches: usize,
    pub hits: usize,
    pub hit_rate: f64,
    pub avg_covered_probability: f64,
}

/// Analyze per-match hit rate by cover class (lock, half-cover, full-cover)
pub fn analyze_by_cover(rounds: &[RoundRecord]) -> Vec<CoverAnalysis> {
    let mut grouped: HashMap<&'static str, (usize, usize, f64)> = HashMap::new();
    for outcome in rounds.iter().flat_map(|r| &r.outcomes) {
        let key = match outcome.kind {
            CoverKind::Lock => "lock",
            CoverKind::HalfCover => "half-cover",
            CoverKind::FullCover => "full-cover",
        };
        let entry = grouped.entry(key).or_insert((0, 0, 0.0));
        entry.0 += 1;
        if outcome.covered {
            entry.1 += 1;
        }
        entry.2 += outcome.covered_probability;
    }

    let mut results: Vec<CoverAnalysis> = grouped
        .into_iter()
        .map(|(key, (matches, hits, prob_sum))| CoverAnalysis {
            key: key.to_string(),
            matches,
            hits,
            hit_rate: hits as f64 / matches as f64,
            avg_covered_probability: prob_sum / matches as f64,
        })
        .collect();

    results.sort_by(|a, b| a.key.cmp(&b.key));
    results
}

/// Number of rounds per count of correctly covered matches, highest count first
pub fn correct_distribution(rounds: &[RoundRecord]) -> Vec<(usize, usize)> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for round in rounds {
        *counts.entry(round.correct).or_insert(0) += 1;
    }
    counts.into_iter().rev().collect()
}
