pub mod error;
pub mod forecast;
pub mod health;
pub mod provinces;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    BoxError, Router,
};
use std::time::Duration;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{config::ServerConfig, state::AppState};
use error::ApiError;

pub fn router(state: AppState) -> Router {
    let server = state.cfg.server.clone();

    let mut router = Router::new()
        .route("/api/getprovinces", get(provinces::get_provinces))
        .route("/api/linearregression", post(forecast::linear_regression))
        .route("/api/extrapolation", post(forecast::extrapolation))
        .route("/healthz", get(health::health_check))
        .with_state(state);

    if server.enable_cors {
        router = router.layer(cors_layer(&server));
    }

    with_timeout(
        router.layer(axum::extract::DefaultBodyLimit::max(1024 * 1024)),
        Duration::from_secs(server.request_timeout_secs),
    )
    .layer(TraceLayer::new_for_http())
}

/// Slow requests are answered with the usual `{"error": ...}` body.
fn with_timeout(router: Router, timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(TimeoutLayer::new(timeout)),
    )
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::InternalError(format!("middleware failure: {}", err))
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origin = if server.cors_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
