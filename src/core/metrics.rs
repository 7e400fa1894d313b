//! System metrics
//!
//! cost            = Π |selection|
//! win_probability = Π Σ p(selected outcome)      (matches assumed independent)
//! expected_value  = cost × 2 × win_probability − cost
//!
//! The flat 2× payout stands in for a real payout table.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::risk::RiskProfile;
use crate::models::{CoverKind, MatchSelection};

/// Flat payout multiplier applied to the stake when the system wins
pub const PAYOUT_MULTIPLIER: f64 = 2.0;

/// Number of rows in the system (product of selection sizes)
pub fn system_cost(system: &[MatchSelection]) -> u64 {
    system
        .iter()
        .fold(1u64, |cost, s| cost.saturating_mul(s.size() as u64))
}

/// Probability that every match lands on a selected outcome
pub fn win_probability(system: &[MatchSelection]) -> f64 {
    system
        .iter()
        .fold(1.0, |prob, s| prob * s.covered_probability())
}

/// Simplified expected value of playing the system
pub fn expected_value(cost: u64, win_probability: f64) -> f64 {
    let cost = cost as f64;
    let expected_return = cost * PAYOUT_MULTIPLIER * win_probability;
    expected_return - cost
}

/// Aggregate figures for a finished system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub cost: u64,
    pub win_probability: f64,
    pub expected_value: f64,
}

impl SystemMetrics {
    pub fn calculate(system: &[MatchSelection]) -> Self {
        let cost = system_cost(system);
        let win_probability = win_probability(system);
        Self {
            cost,
            win_probability,
            expected_value: expected_value(cost, win_probability),
        }
    }
}

/// Count of locks, half-covers and full-covers in a system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemComposition {
    pub singles: usize,
    pub doubles: usize,
    pub triples: usize,
    /// Whether the advisory caps of the risk profile hold
    pub within_caps: bool,
}

impl SystemComposition {
    /// Count the system and compare it with the profile's caps
    ///
    /// Caps are advisory: exceeding them is logged, never corrected.
    pub fn calculate(system: &[MatchSelection], profile: &RiskProfile) -> Self {
        let mut composition = Self::default();
        for selection in system {
            match selection.kind() {
                CoverKind::Lock => composition.singles += 1,
                CoverKind::HalfCover => composition.doubles += 1,
                CoverKind::FullCover => composition.triples += 1,
            }
        }

        composition.within_caps = composition.doubles <= profile.max_doubles
            && composition.triples <= profile.max_triples;

        if !composition.within_caps {
            warn!(
                doubles = composition.doubles,
                triples = composition.triples,
                max_doubles = profile.max_doubles,
                max_triples = profile.max_triples,
                risk_level = %profile.level,
                "System exceeds advisory caps"
            );
        }

        composition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::risk::RiskLevel;
    use crate::models::{Outcome, OutcomeProbs};

    fn selection(outcomes: &[Outcome], probs: OutcomeProbs) -> MatchSelection {
        MatchSelection {
            match_index: 1,
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            selection: outcomes.to_vec(),
            probabilities: probs,
        }
    }

    #[test]
    fn test_three_locks() {
        let system: Vec<MatchSelection> = (0..3)
            .map(|_| selection(&[Outcome::Home], OutcomeProbs::new(0.8, 0.1, 0.1)))
            .collect();
        let metrics = SystemMetrics::calculate(&system);

        assert_eq!(metrics.cost, 1);
        assert!((metrics.win_probability - 0.512).abs() < 1e-9);
        assert!((metrics.expected_value - 0.024).abs() < 1e-9);
    }

    #[test]
    fn test_cost_is_product_of_sizes() {
        let probs = OutcomeProbs::new(0.4, 0.35, 0.25);
        let system = vec![
            selection(&[Outcome::Home], probs),
            selection(&[Outcome::Home, Outcome::Draw], probs),
            selection(&Outcome::ALL, probs),
        ];
        assert_eq!(system_cost(&system), 6);
        assert_eq!(system_cost(&[]), 1);
    }

    #[test]
    fn test_win_probability_product_of_covered_mass() {
        let system = vec![
            selection(&[Outcome::Home, Outcome::Draw], OutcomeProbs::new(0.5, 0.3, 0.2)),
            selection(&Outcome::ALL, OutcomeProbs::new(0.4, 0.35, 0.25)),
            selection(&[Outcome::Away], OutcomeProbs::new(0.2, 0.2, 0.6)),
        ];
        let expected = 0.8 * (0.4 + 0.35 + 0.25) * 0.6;
        assert!((win_probability(&system) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_expected_value_formula() {
        assert!((expected_value(48, 0.5) - 0.0).abs() < 1e-12);
        assert!((expected_value(48, 0.25) + 24.0).abs() < 1e-12);
        assert!((expected_value(10, 0.75) - 5.0).abs() < 1e-12);
        assert!((expected_value(1, 0.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_composition_counts_and_caps() {
        let probs = OutcomeProbs::new(0.4, 0.35, 0.25);
        let system = vec![
            selection(&[Outcome::Home], probs),
            selection(&[Outcome::Home, Outcome::Draw], probs),
            selection(&Outcome::ALL, probs),
            selection(&Outcome::ALL, probs),
        ];

        let low = SystemComposition::calculate(&system, &RiskLevel::Low.profile());
        assert_eq!(low.singles, 1);
        assert_eq!(low.doubles, 1);
        assert_eq!(low.triples, 2);
        assert!(!low.within_caps);

        let medium = SystemComposition::calculate(&system, &RiskLevel::Medium.profile());
        assert!(medium.within_caps);
    }
}
