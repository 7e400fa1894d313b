//! HTTP handlers for the system API

pub mod health;
pub mod predict;
pub mod profiles;

use actix_web::web;

use crate::predictor::ProbabilitySource;

/// Application state shared across handlers
pub struct AppState {
    pub predictor: Box<dyn ProbabilitySource>,
}

/// Register all API routes under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/predict", web::post().to(predict::predict_system))
            .route("/profiles", web::get().to(profiles::list_profiles)),
    );
}
