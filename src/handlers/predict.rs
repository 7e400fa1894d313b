use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::info;

use super::AppState;
use crate::core::{RiskProfile, SystemOptimizer};
use crate::error::{validate_budget, validate_match_count, validate_match_odds, AppError};
use crate::models::{PredictRequest, PredictResponse};

/// Predict outcome probabilities and build a system within the budget
pub async fn predict_system(
    state: web::Data<Arc<AppState>>,
    req: web::Json<PredictRequest>,
) -> Result<HttpResponse, AppError> {
    // Validate request
    validate_match_count(req.matches.len())?;
    validate_budget(req.budget)?;
    let profile = RiskProfile::from_name(&req.risk_level)?;
    for input in &req.matches {
        validate_match_odds(input)?;
    }

    let predictions = state.predictor.predict(&req.matches);
    if predictions.len() != req.matches.len() {
        return Err(AppError::InternalError(format!(
            "Predictor returned {} results for {} matches",
            predictions.len(),
            req.matches.len()
        )));
    }

    let result = SystemOptimizer::with_profile(req.budget, profile)?.optimize(&predictions)?;

    info!(
        matches = req.matches.len(),
        cost = result.cost,
        budget = req.budget,
        risk_level = %req.risk_level,
        "Served system prediction"
    );

    let response = PredictResponse {
        predictions,
        system: result.system,
        cost: result.cost,
        expected_value: result.expected_value,
        win_probability: result.win_probability,
        composition: result.composition,
    };

    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::configure;
    use crate::models::{ErrorResponse, MatchInput, MatchProbability, Outcome, OutcomeProbs};
    use crate::predictor::{OddsPredictor, ProbabilitySource};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::json;

    /// Returns the same triple for every match
    struct FixedPredictor(OutcomeProbs);

    impl ProbabilitySource for FixedPredictor {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict(&self, matches: &[MatchInput]) -> Vec<MatchProbability> {
            matches
                .iter()
                .map(|m| MatchProbability::new(&m.home_team, &m.away_team, self.0))
                .collect()
        }
    }

    fn state(predictor: Box<dyn ProbabilitySource>) -> web::Data<Arc<AppState>> {
        web::Data::new(Arc::new(AppState { predictor }))
    }

    #[actix_web::test]
    async fn test_predict_locks_favourites() {
        let app = test::init_service(
            App::new()
                .app_data(state(Box::new(FixedPredictor(OutcomeProbs::new(0.8, 0.1, 0.1)))))
                .configure(configure),
        )
        .await;

        let body = json!({
            "matches": [
                {"home_team": "AIK", "away_team": "Hammarby"},
                {"home_team": "Malmö FF", "away_team": "IFK Göteborg"},
                {"home_team": "Djurgården", "away_team": "Häcken"}
            ],
            "budget": 100,
            "risk_level": "low"
        });
        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(&body)
            .to_request();
        let resp: PredictResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.predictions.len(), 3);
        assert_eq!(resp.system.len(), 3);
        assert_eq!(resp.cost, 1);
        assert!(resp
            .system
            .iter()
            .all(|s| s.selection == vec![Outcome::Home]));
        assert!((resp.win_probability - 0.512).abs() < 1e-9);
        assert!((resp.expected_value - 0.024).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn test_predict_uses_defaults() {
        let app = test::init_service(
            App::new()
                .app_data(state(Box::new(OddsPredictor::with_seed(5))))
                .configure(configure),
        )
        .await;

        let body = json!({
            "matches": [
                {"home_team": "Arsenal", "away_team": "Chelsea", "AvgH": 2.1, "AvgD": 3.4, "AvgA": 3.6},
                {"home_team": "Leeds", "away_team": "Everton"}
            ]
        });
        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(&body)
            .to_request();
        let resp: PredictResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.system.len(), 2);
        assert!(resp.cost <= 100);
        assert_eq!(resp.system[0].match_index, 1);
    }

    #[actix_web::test]
    async fn test_predict_rejects_empty_matches() {
        let app = test::init_service(
            App::new()
                .app_data(state(Box::new(OddsPredictor::with_seed(5))))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({"matches": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "validation_error");
    }

    #[actix_web::test]
    async fn test_predict_rejects_zero_budget_and_unknown_risk() {
        let app = test::init_service(
            App::new()
                .app_data(state(Box::new(OddsPredictor::with_seed(5))))
                .configure(configure),
        )
        .await;

        let matches = json!([{"home_team": "AIK", "away_team": "Hammarby"}]);

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({"matches": matches, "budget": 0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({"matches": matches, "risk_level": "extreme"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.message.contains("extreme"));
    }

    #[actix_web::test]
    async fn test_predict_rejects_missing_team() {
        let app = test::init_service(
            App::new()
                .app_data(state(Box::new(OddsPredictor::with_seed(5))))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({"matches": [{"home_team": "AIK"}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_predict_invalid_predictor_output() {
        let app = test::init_service(
            App::new()
                .app_data(state(Box::new(FixedPredictor(OutcomeProbs::new(
                    1.5, 0.1, 0.1,
                )))))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({"matches": [{"home_team": "AIK", "away_team": "Hammarby"}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
