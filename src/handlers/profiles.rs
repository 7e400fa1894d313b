use actix_web::{HttpResponse, Responder};

use crate::core::RiskProfile;

/// List the thresholds of every risk level
pub async fn list_profiles() -> impl Responder {
    HttpResponse::Ok().json(RiskProfile::all())
}
