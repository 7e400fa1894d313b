//! System optimization entry point
//!
//! predictions -> Selector -> draft system -> BudgetReducer -> final system -> metrics
//!
//! Every call is pure: validation happens up front and no state survives
//! between calls.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::OptimizeError;
use super::metrics::{SystemComposition, SystemMetrics};
use super::reducer::{BudgetReducer, ReductionStrategy};
use super::risk::RiskProfile;
use super::selector::{validate_match, Selector};
use crate::models::{MatchProbability, MatchSelection};

/// Final system with its aggregate metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub system: Vec<MatchSelection>,
    pub cost: u64,
    pub expected_value: f64,
    pub win_probability: f64,
    pub composition: SystemComposition,
    pub within_budget: bool,
}

/// Budget-constrained system optimizer
#[derive(Debug, Clone)]
pub struct SystemOptimizer {
    profile: RiskProfile,
    budget: u64,
    strategy: ReductionStrategy,
}

impl SystemOptimizer {
    /// Create an optimizer from a risk level name
    ///
    /// Fails with `InvalidRiskLevel` for unknown names and `InvalidBudget`
    /// for a zero budget.
    pub fn new(budget: u64, risk_level: &str) -> Result<Self, OptimizeError> {
        let profile = RiskProfile::from_name(risk_level)?;
        Self::with_profile(budget, profile)
    }

    pub fn with_profile(budget: u64, profile: RiskProfile) -> Result<Self, OptimizeError> {
        if budget == 0 {
            return Err(OptimizeError::InvalidBudget(budget));
        }
        Ok(Self {
            profile,
            budget,
            strategy: ReductionStrategy::default(),
        })
    }

    pub fn with_strategy(mut self, strategy: ReductionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn profile(&self) -> &RiskProfile {
        &self.profile
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Build, reduce and evaluate a system for the given matches
    pub fn optimize(
        &self,
        predictions: &[MatchProbability],
    ) -> Result<OptimizationResult, OptimizeError> {
        for (i, prediction) in predictions.iter().enumerate() {
            validate_match(i + 1, prediction)?;
        }

        let mut system = Selector::new(self.profile).build_system(predictions);

        let summary = BudgetReducer::new(self.budget)
            .with_strategy(self.strategy)
            .reduce(&mut system);

        let metrics = SystemMetrics::calculate(&system);
        let composition = SystemComposition::calculate(&system, &self.profile);

        info!(
            matches = system.len(),
            risk_level = %self.profile.level,
            initial_cost = summary.initial_cost,
            cost = metrics.cost,
            budget = self.budget,
            win_probability = metrics.win_probability,
            "Optimized system"
        );

        Ok(OptimizationResult {
            system,
            cost: metrics.cost,
            expected_value: metrics.expected_value,
            win_probability: metrics.win_probability,
            composition,
            within_budget: summary.within_budget,
        })
    }
}

/// Optimize a system for a budget and a risk level name
pub fn optimize(
    predictions: &[MatchProbability],
    budget: u64,
    risk_level: &str,
) -> Result<OptimizationResult, OptimizeError> {
    SystemOptimizer::new(budget, risk_level)?.optimize(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::{system_cost, win_probability};
    use crate::core::risk::RiskLevel;
    use crate::models::{Outcome, OutcomeProbs};

    fn coupon(probs: &[(f64, f64, f64)]) -> Vec<MatchProbability> {
        probs
            .iter()
            .enumerate()
            .map(|(i, &(h, d, a))| {
                MatchProbability::new(
                    &format!("Home {}", i + 1),
                    &format!("Away {}", i + 1),
                    OutcomeProbs::new(h, d, a),
                )
            })
            .collect()
    }

    #[test]
    fn test_three_strong_favourites_low_risk() {
        let predictions = coupon(&[(0.8, 0.1, 0.1); 3]);
        let result = optimize(&predictions, 100, "low").unwrap();

        assert_eq!(result.cost, 1);
        for s in &result.system {
            assert_eq!(s.selection, vec![Outcome::Home]);
        }
        assert!((result.win_probability - 0.512).abs() < 1e-9);
        assert!((result.expected_value - 0.024).abs() < 1e-9);
        assert!(result.within_budget);
    }

    #[test]
    fn test_open_match_high_risk_full_cover() {
        let predictions = coupon(&[(0.4, 0.35, 0.25)]);
        let result = optimize(&predictions, 100, "high").unwrap();

        assert_eq!(result.system[0].selection.len(), 3);
        assert_eq!(result.cost, 3);
        assert!((result.win_probability - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_five_full_covers_reduced_to_budget() {
        let predictions = coupon(&[(0.4, 0.35, 0.25); 5]);
        let result = optimize(&predictions, 50, "medium").unwrap();

        assert!(result.cost <= 50);
        assert_eq!(result.cost, 48);
        assert_eq!(result.composition.doubles, 4);
        assert_eq!(result.composition.triples, 1);
    }

    #[test]
    fn test_budget_of_one_locks_everything() {
        let predictions = coupon(&[(0.4, 0.35, 0.25); 5]);
        let result = optimize(&predictions, 1, "high").unwrap();

        assert_eq!(result.cost, 1);
        assert!(result.system.iter().all(|s| s.size() == 1));
        assert_eq!(result.composition.singles, 5);
    }

    #[test]
    fn test_invalid_risk_level() {
        // Invalid match data must not be reached before the risk level fails
        let predictions = coupon(&[(-1.0, 0.5, 0.5)]);
        let err = optimize(&predictions, 100, "extreme").unwrap_err();
        assert_eq!(err, OptimizeError::InvalidRiskLevel("extreme".to_string()));
    }

    #[test]
    fn test_invalid_probability_aborts() {
        let predictions = coupon(&[(0.5, 0.3, 0.2), (0.5, -0.3, 0.2)]);
        let err = optimize(&predictions, 100, "medium").unwrap_err();
        assert!(matches!(
            err,
            OptimizeError::InvalidProbability { match_index: 2, .. }
        ));
    }

    #[test]
    fn test_zero_budget_rejected() {
        let err = SystemOptimizer::new(0, "low").unwrap_err();
        assert_eq!(err, OptimizeError::InvalidBudget(0));
    }

    #[test]
    fn test_metrics_match_final_system() {
        let predictions = coupon(&[
            (0.45, 0.3, 0.25),
            (0.7, 0.2, 0.1),
            (0.3, 0.3, 0.4),
            (0.5, 0.35, 0.15),
            (0.2, 0.25, 0.55),
        ]);
        for level in RiskLevel::ALL {
            for budget in [1, 4, 16, 100] {
                let result = SystemOptimizer::with_profile(budget, level.profile())
                    .unwrap()
                    .optimize(&predictions)
                    .unwrap();
                assert_eq!(result.cost, system_cost(&result.system));
                assert_eq!(result.win_probability, win_probability(&result.system));
                assert!(result.cost <= budget);
            }
        }
    }

    #[test]
    fn test_rerank_strategy_respects_budget() {
        let predictions = coupon(&[(0.34, 0.33, 0.33); 6]);
        let result = SystemOptimizer::new(10, "high")
            .unwrap()
            .with_strategy(ReductionStrategy::Rerank)
            .optimize(&predictions)
            .unwrap();
        assert!(result.cost <= 10);
    }

    #[test]
    fn test_empty_coupon() {
        let result = optimize(&[], 100, "medium").unwrap();
        assert!(result.system.is_empty());
        assert_eq!(result.cost, 1);
        assert!((result.win_probability - 1.0).abs() < 1e-12);
    }
}
