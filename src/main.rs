use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use stryktips::handlers::{configure, AppState};
use stryktips::predictor::OddsPredictor;

fn log_level() -> Level {
    std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(Level::INFO)
}

fn build_predictor() -> OddsPredictor {
    match std::env::var("PREDICTOR_SEED") {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(seed) => OddsPredictor::with_seed(seed),
            Err(_) => {
                warn!("Ignoring invalid PREDICTOR_SEED {:?}", raw);
                OddsPredictor::new()
            }
        },
        Err(_) => OddsPredictor::new(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let addr = format!("{}:{}", host, port);

    let app_state = Arc::new(AppState {
        predictor: Box::new(build_predictor()),
    });

    info!("Starting Stryktips API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(&addr)?
    .run()
    .await?;

    Ok(())
}
