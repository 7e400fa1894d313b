//! Per-match outcome selection
//!
//! Rules, applied to the probability triple of each match:
//!     1. top outcome >= min_prob_for_single      -> lock (one outcome)
//!     2. top two outcomes sum >= 0.8              -> half-cover
//!     3. otherwise                                -> full-cover
//!     4. any unselected outcome whose value
//!        (probability / streck share) reaches the
//!        profile's value_threshold is added
//!
//! Without real public-pool data the streck share is the outcome's
//! probability renormalised over its own triple.

use std::cmp::Ordering;
use tracing::debug;

use super::error::OptimizeError;
use super::risk::RiskProfile;
use crate::models::{MatchProbability, MatchSelection, Outcome, OutcomeProbs};

/// Top-two probability mass at which a half-cover is enough
pub const HALF_COVER_THRESHOLD: f64 = 0.8;

/// Share of the public pool on `outcome`, approximated from the triple itself
pub fn streck_share(probs: &OutcomeProbs, outcome: Outcome) -> f64 {
    let total = probs.total();
    if total > 0.0 {
        probs.get(outcome) / total
    } else {
        0.0
    }
}

/// Value of an outcome against a streck distribution (0 when the share is 0)
pub fn outcome_value(probs: &OutcomeProbs, streck: &OutcomeProbs, outcome: Outcome) -> f64 {
    let share = streck.get(outcome);
    if share > 0.0 {
        probs.get(outcome) / share
    } else {
        0.0
    }
}

/// Streck distribution used when no public-pool data is available
pub fn proxy_streck(probs: &OutcomeProbs) -> OutcomeProbs {
    OutcomeProbs::new(
        streck_share(probs, Outcome::Home),
        streck_share(probs, Outcome::Draw),
        streck_share(probs, Outcome::Away),
    )
}

/// Outcomes ordered by probability, highest first; ties keep coupon order
pub fn rank_outcomes(probs: &OutcomeProbs) -> [Outcome; 3] {
    let mut ranked = Outcome::ALL;
    ranked.sort_by(|a, b| {
        probs
            .get(*b)
            .partial_cmp(&probs.get(*a))
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// Check that a match record can be optimized
///
/// `match_index` is 1-based.
pub fn validate_match(match_index: usize, prediction: &MatchProbability) -> Result<(), OptimizeError> {
    if prediction.home_team.trim().is_empty() || prediction.away_team.trim().is_empty() {
        return Err(OptimizeError::MissingTeam { match_index });
    }

    for outcome in Outcome::ALL {
        let p = prediction.probabilities.get(outcome);
        if !p.is_finite() {
            return Err(OptimizeError::InvalidProbability {
                match_index,
                reason: format!("{} is not a number", outcome),
            });
        }
        if !(0.0..=1.0).contains(&p) {
            return Err(OptimizeError::InvalidProbability {
                match_index,
                reason: format!("{} must be between 0 and 1, got {}", outcome, p),
            });
        }
    }

    Ok(())
}

/// Builds the initial selection for each match under a risk profile
#[derive(Debug, Clone)]
pub struct Selector {
    profile: RiskProfile,
}

impl Selector {
    pub fn new(profile: RiskProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &RiskProfile {
        &self.profile
    }

    /// Select outcomes using the triple itself as streck proxy
    pub fn select(&self, probs: &OutcomeProbs) -> Vec<Outcome> {
        self.select_with_streck(probs, &proxy_streck(probs))
    }

    /// Select outcomes against an explicit streck distribution
    pub fn select_with_streck(&self, probs: &OutcomeProbs, streck: &OutcomeProbs) -> Vec<Outcome> {
        let ranked = rank_outcomes(probs);
        let top = probs.get(ranked[0]);
        let top_two = top + probs.get(ranked[1]);

        let mut selection: Vec<Outcome> = if top >= self.profile.min_prob_for_single {
            vec![ranked[0]]
        } else if top_two >= HALF_COVER_THRESHOLD {
            vec![ranked[0], ranked[1]]
        } else {
            ranked.to_vec()
        };

        for outcome in ranked {
            if selection.contains(&outcome) {
                continue;
            }
            let value = outcome_value(probs, streck, outcome);
            if value >= self.profile.value_threshold {
                debug!(%outcome, value, "Adding value outcome");
                selection.push(outcome);
            }
        }

        selection
    }

    /// Build one selection per match, in input order
    pub fn build_system(&self, predictions: &[MatchProbability]) -> Vec<MatchSelection> {
        predictions
            .iter()
            .enumerate()
            .map(|(i, prediction)| {
                let selection = self.select(&prediction.probabilities);
                debug!(
                    match_index = i + 1,
                    home = %prediction.home_team,
                    away = %prediction.away_team,
                    size = selection.len(),
                    "Selected outcomes"
                );

                MatchSelection {
                    match_index: i + 1,
                    home_team: prediction.home_team.clone(),
                    away_team: prediction.away_team.clone(),
                    selection,
                    probabilities: prediction.probabilities,
                }
            })
            .collect()
    }
}
