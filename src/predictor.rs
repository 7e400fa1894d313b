use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Exp1;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::models::{MatchInput, MatchProbability, OutcomeProbs};

/// Source of per-match outcome probabilities
///
/// The optimizer only needs a near-normalized triple per match, in the same
/// order as the input; how it is produced is up to the implementation.
pub trait ProbabilitySource: Send + Sync {
    /// Short identifier reported by the health endpoint
    fn name(&self) -> &str;

    fn predict(&self, matches: &[MatchInput]) -> Vec<MatchProbability>;
}

/// Convert decimal odds to probabilities with the bookmaker margin removed
///
/// Returns `None` unless all three odds are finite and positive.
pub fn implied_probabilities(home: f64, draw: f64, away: f64) -> Option<OutcomeProbs> {
    let odds = [home, draw, away];
    if odds.iter().any(|o| !o.is_finite() || *o <= 0.0) {
        return None;
    }

    let total: f64 = odds.iter().map(|o| 1.0 / o).sum();
    Some(OutcomeProbs::new(
        (1.0 / home) / total,
        (1.0 / draw) / total,
        (1.0 / away) / total,
    ))
}

/// Bookmaker margin of a 1X2 market (0.05 = 5% overround)
pub fn overround(home: f64, draw: f64, away: f64) -> f64 {
    1.0 / home + 1.0 / draw + 1.0 / away - 1.0
}

/// Odds-inversion predictor
///
/// Matches without a complete set of odds get a triple drawn from a flat
/// Dirichlet(1, 1, 1) distribution.
pub struct OddsPredictor {
    rng: Mutex<StdRng>,
}

impl OddsPredictor {
    /// Create a predictor seeded from system entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a predictor with reproducible random fallback
    pub fn with_seed(seed: u64) -> Self {
        info!("Odds predictor seeded with {}", seed);
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn odds_probabilities(input: &MatchInput) -> Option<OutcomeProbs> {
        implied_probabilities(input.avg_home?, input.avg_draw?, input.avg_away?)
    }

    fn random_probabilities(&self) -> OutcomeProbs {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let draws: [f64; 3] = [rng.sample(Exp1), rng.sample(Exp1), rng.sample(Exp1)];
        let total: f64 = draws.iter().sum();

        if total > 0.0 {
            OutcomeProbs::new(draws[0] / total, draws[1] / total, draws[2] / total)
        } else {
            OutcomeProbs::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
        }
    }
}

impl Default for OddsPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbabilitySource for OddsPredictor {
    fn name(&self) -> &str {
        "odds"
    }

    fn predict(&self, matches: &[MatchInput]) -> Vec<MatchProbability> {
        matches
            .iter()
            .map(|input| {
                let probabilities = Self::odds_probabilities(input).unwrap_or_else(|| {
                    debug!(
                        home = %input.home_team,
                        away = %input.away_team,
                        "No usable odds, drawing random probabilities"
                    );
                    self.random_probabilities()
                });

                MatchProbability {
                    home_team: input.home_team.clone(),
                    away_team: input.away_team.clone(),
                    probabilities,
                }
            })
            .collect()
    }
}
