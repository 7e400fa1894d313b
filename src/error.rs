use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::core::OptimizeError;
use crate::models::{ErrorResponse, MatchInput};

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Invalid request data
    ValidationError(String),
    /// Probability source produced unusable output
    PredictionError(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<OptimizeError> for AppError {
    fn from(err: OptimizeError) -> Self {
        match err {
            // Probabilities never come from the client, only from the predictor
            OptimizeError::InvalidProbability { .. } => AppError::PredictionError(err.to_string()),
            _ => AppError::ValidationError(err.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::PredictionError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            AppError::ValidationError(msg) => ("validation_error", msg.clone()),
            AppError::PredictionError(msg) => ("prediction_error", msg.clone()),
            AppError::InternalError(msg) => ("internal_error", msg.clone()),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message,
        })
    }
}

/// Validation functions
pub fn validate_match_count(count: usize) -> Result<(), AppError> {
    if count == 0 {
        return Err(AppError::ValidationError(
            "At least one match is required".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_budget(budget: u64) -> Result<(), AppError> {
    if budget == 0 {
        return Err(AppError::ValidationError(
            "Budget must be at least 1 row".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_odds(odds: f64) -> Result<(), AppError> {
    if !odds.is_finite() || odds <= 0.0 {
        return Err(AppError::ValidationError(format!(
            "Odds must be positive, got {}",
            odds
        )));
    }
    Ok(())
}

/// Check every odds value supplied for a match
pub fn validate_match_odds(input: &MatchInput) -> Result<(), AppError> {
    [input.avg_home, input.avg_draw, input.avg_away]
        .into_iter()
        .flatten()
        .try_for_each(validate_odds)
}
