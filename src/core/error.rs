use thiserror::Error;

/// Errors raised while building a system
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    #[error("Invalid risk level: {0} (expected low, medium or high)")]
    InvalidRiskLevel(String),

    #[error("Invalid probability for match {match_index}: {reason}")]
    InvalidProbability { match_index: usize, reason: String },

    #[error("Missing team name for match {match_index}")]
    MissingTeam { match_index: usize },

    #[error("Budget must be at least 1, got {0}")]
    InvalidBudget(u64),
}

impl OptimizeError {
    /// Configuration errors come from the call parameters rather than the match data
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            OptimizeError::InvalidRiskLevel(_) | OptimizeError::InvalidBudget(_)
        )
    }
}
