//! Budget reduction
//!
//! Shrinks an over-budget system by stripping cover from the weakest
//! matches until the multiplicative cost fits the budget.
//!
//! Candidates are matches with more than one selected outcome, ranked by
//! the average probability of their selected outcomes (weakest first,
//! ties in coupon order). Each visit removes one outcome:
//!     full-cover -> half-cover  (drop the least likely outcome)
//!     half-cover -> lock        (keep the most likely outcome)
//!
//! With [`ReductionStrategy::SinglePass`] the ranking is computed once per
//! pass and only the cost is recomputed between steps. A pass that ends
//! over budget is followed by another over the remaining candidates, so
//! an unreachable budget ends with every match locked.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use super::metrics::system_cost;
use crate::models::{MatchSelection, Outcome};

/// How candidates are re-ranked between removals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionStrategy {
    /// Rank once per pass, recompute only the cost after each removal
    #[default]
    SinglePass,
    /// Recompute the ranking after every removal
    Rerank,
}

/// Outcome of a reduction run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReductionSummary {
    pub initial_cost: u64,
    pub final_cost: u64,
    pub removals: usize,
    pub within_budget: bool,
}

/// Average covered probability of a selection; lower means weaker cover
pub fn value_score(selection: &MatchSelection) -> f64 {
    if selection.selection.is_empty() {
        return 0.0;
    }
    selection.covered_probability() / selection.size() as f64
}

/// Greedy reducer for a fixed budget
#[derive(Debug, Clone)]
pub struct BudgetReducer {
    budget: u64,
    strategy: ReductionStrategy,
}

impl BudgetReducer {
    pub fn new(budget: u64) -> Self {
        Self {
            budget,
            strategy: ReductionStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: ReductionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn strategy(&self) -> ReductionStrategy {
        self.strategy
    }

    /// Reduce `system` in place until it fits the budget or every match is locked
    pub fn reduce(&self, system: &mut [MatchSelection]) -> ReductionSummary {
        let initial_cost = system_cost(system);
        let mut cost = initial_cost;
        let mut removals = 0;

        if cost <= self.budget {
            return ReductionSummary {
                initial_cost,
                final_cost: cost,
                removals,
                within_budget: true,
            };
        }

        info!(cost, budget = self.budget, "System over budget, reducing");

        match self.strategy {
            ReductionStrategy::SinglePass => loop {
                let candidates = Self::rank_candidates(system);
                if candidates.is_empty() {
                    break;
                }
                for idx in candidates {
                    if cost <= self.budget {
                        break;
                    }
                    Self::remove_one(&mut system[idx]);
                    removals += 1;
                    cost = system_cost(system);
                    debug!(
                        match_index = system[idx].match_index,
                        selection = %system[idx].codes(),
                        cost,
                        "Reduced cover"
                    );
                }
                if cost <= self.budget {
                    break;
                }
            },
            ReductionStrategy::Rerank => {
                while cost > self.budget {
                    let Some(&idx) = Self::rank_candidates(system).first() else {
                        break;
                    };
                    Self::remove_one(&mut system[idx]);
                    removals += 1;
                    cost = system_cost(system);
                    debug!(
                        match_index = system[idx].match_index,
                        selection = %system[idx].codes(),
                        cost,
                        "Reduced cover"
                    );
                }
            }
        }

        let within_budget = cost <= self.budget;
        if !within_budget {
            warn!(
                cost,
                budget = self.budget,
                "Budget unreachable, every match is locked"
            );
        }

        ReductionSummary {
            initial_cost,
            final_cost: cost,
            removals,
            within_budget,
        }
    }

    /// Indices of covered matches, weakest cover first
    fn rank_candidates(system: &[MatchSelection]) -> Vec<usize> {
        let mut candidates: Vec<(usize, f64)> = system
            .iter()
            .enumerate()
            .filter(|(_, s)| s.size() > 1)
            .map(|(i, s)| (i, value_score(s)))
            .collect();

        candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        candidates.into_iter().map(|(i, _)| i).collect()
    }

    /// Remove one outcome from a half- or full-cover
    fn remove_one(selection: &mut MatchSelection) {
        let probs = selection.probabilities;
        match selection.size() {
            3 => {
                let mut weakest: Option<Outcome> = None;
                for &o in &selection.selection {
                    if weakest.map_or(true, |w| probs.get(o) < probs.get(w)) {
                        weakest = Some(o);
                    }
                }
                if let Some(w) = weakest {
                    selection.selection.retain(|&o| o != w);
                }
            }
            2 => {
                let mut strongest: Option<Outcome> = None;
                for &o in &selection.selection {
                    if strongest.map_or(true, |s| probs.get(o) > probs.get(s)) {
                        strongest = Some(o);
                    }
                }
                if let Some(s) = strongest {
                    selection.selection = vec![s];
                }
            }
            _ => {}
        }
    }
}
