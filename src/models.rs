use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::metrics::SystemComposition;

/// Match outcome code on a 1X2 coupon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "1")]
    Home,
    #[serde(rename = "X")]
    Draw,
    #[serde(rename = "2")]
    Away,
}

impl Outcome {
    /// All outcomes in coupon order (1, X, 2)
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];

    pub fn code(&self) -> &'static str {
        match self {
            Outcome::Home => "1",
            Outcome::Draw => "X",
            Outcome::Away => "2",
        }
    }

    /// Parse a full-time result column value ("H", "D", "A")
    pub fn from_full_time_result(ftr: &str) -> Option<Self> {
        match ftr.trim() {
            "H" => Some(Outcome::Home),
            "D" => Some(Outcome::Draw),
            "A" => Some(Outcome::Away),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Probability triple for a single match, keyed by outcome code
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbs {
    #[serde(rename = "1")]
    pub home: f64,
    #[serde(rename = "X")]
    pub draw: f64,
    #[serde(rename = "2")]
    pub away: f64,
}

impl OutcomeProbs {
    pub fn new(home: f64, draw: f64, away: f64) -> Self {
        Self { home, draw, away }
    }

    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    pub fn total(&self) -> f64 {
        self.home + self.draw + self.away
    }

    /// Probability mass covered by the given outcomes
    pub fn covered(&self, outcomes: &[Outcome]) -> f64 {
        outcomes.iter().map(|&o| self.get(o)).sum()
    }
}

/// Raw match data as supplied by a client or a coupon file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchInput {
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    /// Average decimal odds for a home win
    #[serde(rename = "AvgH", default, skip_serializing_if = "Option::is_none")]
    pub avg_home: Option<f64>,
    /// Average decimal odds for a draw
    #[serde(rename = "AvgD", default, skip_serializing_if = "Option::is_none")]
    pub avg_draw: Option<f64>,
    /// Average decimal odds for an away win
    #[serde(rename = "AvgA", default, skip_serializing_if = "Option::is_none")]
    pub avg_away: Option<f64>,
}

impl MatchInput {
    pub fn new(home_team: &str, away_team: &str) -> Self {
        Self {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            ..Default::default()
        }
    }

    pub fn with_odds(mut self, home: f64, draw: f64, away: f64) -> Self {
        self.avg_home = Some(home);
        self.avg_draw = Some(draw);
        self.avg_away = Some(away);
        self
    }
}

/// Outcome probabilities produced for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchProbability {
    pub home_team: String,
    pub away_team: String,
    pub probabilities: OutcomeProbs,
}

impl MatchProbability {
    pub fn new(home_team: &str, away_team: &str, probabilities: OutcomeProbs) -> Self {
        Self {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            probabilities,
        }
    }
}

/// Coverage class of a match selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverKind {
    /// Spik: a single outcome
    Lock,
    HalfCover,
    FullCover,
}

/// Chosen outcomes for one match in a system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSelection {
    /// 1-based position of the match on the coupon
    pub match_index: usize,
    pub home_team: String,
    pub away_team: String,
    pub selection: Vec<Outcome>,
    pub probabilities: OutcomeProbs,
}

impl MatchSelection {
    pub fn size(&self) -> usize {
        self.selection.len()
    }

    pub fn contains(&self, outcome: Outcome) -> bool {
        self.selection.contains(&outcome)
    }

    /// Sum of the probabilities of the selected outcomes
    pub fn covered_probability(&self) -> f64 {
        self.probabilities.covered(&self.selection)
    }

    pub fn kind(&self) -> CoverKind {
        match self.selection.len() {
            1 => CoverKind::Lock,
            2 => CoverKind::HalfCover,
            _ => CoverKind::FullCover,
        }
    }

    /// Selection rendered as coupon codes, e.g. "1X"
    pub fn codes(&self) -> String {
        self.selection.iter().map(|o| o.code()).collect()
    }
}

fn default_budget() -> u64 {
    100
}

fn default_risk_level() -> String {
    "medium".to_string()
}

/// System prediction request
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    pub matches: Vec<MatchInput>,
    #[serde(default = "default_budget")]
    pub budget: u64,
    #[serde(default = "default_risk_level")]
    pub risk_level: String,
}

/// System prediction response
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<MatchProbability>,
    pub system: Vec<MatchSelection>,
    pub cost: u64,
    pub expected_value: f64,
    pub win_probability: f64,
    pub composition: SystemComposition,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub predictor: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
