use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{CropFeatures, PredictionResponse, HEALTHZ_ROUTE, PREDICT_CROP_ROUTE},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

mod agronomy;
mod config;

use agronomy::{suggest_improvements, CropPredictor, RangeProximityPredictor};
use config::{load_settings, Settings};

struct AppState {
    predictor: Box<dyn CropPredictor>,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let state = AppState {
        predictor: Box::new(RangeProximityPredictor),
    };
    let app = build_router(Arc::new(state), &settings);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, origins = ?settings.allowed_origins, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

fn build_router(state: Arc<AppState>, settings: &Settings) -> Router {
    let mut router = Router::new()
        .route(HEALTHZ_ROUTE, get(healthz))
        .route(PREDICT_CROP_ROUTE, post(predict_crop))
        .fallback(not_found)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(settings.max_body_bytes))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&settings.allowed_origins) {
        router = router.layer(cors);
    }
    router
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(%origin, %error, "skipping invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

async fn healthz() -> &'static str {
    "ok"
}

async fn not_found() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(ErrorCode::NotFound, "no such route")),
    )
}

async fn predict_crop(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CropFeatures>, JsonRejection>,
) -> ApiResult<PredictionResponse> {
    let Json(features) = payload.map_err(|rejection| {
        (
            rejection.status(),
            Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
        )
    })?;

    if let Some((feature, _)) = features.iter().find(|(_, value)| !value.is_finite()) {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiError::new(
                ErrorCode::Validation,
                format!("{} must be a finite number", feature.wire_key()),
            )),
        ));
    }

    let crop = state.predictor.predict(&features);
    let improvements = suggest_improvements(&features, crop);
    info!(
        predicted_crop = crop.name,
        improvements = improvements.len(),
        "crop predicted"
    );
    Ok(Json(PredictionResponse::new(crop.name, improvements)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
