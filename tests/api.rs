//! Router-level tests against fixture data.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use tower::ServiceExt;

use provincial_energy_forecast::{
    api,
    config::{ChartConfig, Config},
    domain::TimeSeriesRow,
    repo::{InMemoryHistorySource, ProvinceCatalog, Repositories},
    state::AppState,
};

fn row(province: &str, year: i32, population: f64, income: f64, energy: f64) -> TimeSeriesRow {
    TimeSeriesRow {
        year,
        province: province.to_string(),
        population,
        income,
        energy_consumption: energy,
    }
}

fn fixture_rows() -> Vec<TimeSeriesRow> {
    vec![
        row("Jawa Barat", 2018, 48.68, 38.2, 2105.4),
        row("Jawa Barat", 2019, 49.32, 40.1, 2121.9),
        row("Jawa Barat", 2020, 48.27, 39.0, 2098.3),
        row("Jawa Barat", 2021, 48.78, 41.6, 2130.2),
        row("Jawa Barat", 2022, 49.41, 44.3, 2158.7),
        row("Jawa Barat", 2023, 49.86, 46.9, 2177.5),
        row("Bali", 2018, 4.32, 51.4, 2240.0),
        row("Bali", 2019, 4.36, 53.9, 2250.0),
        row("Bali", 2020, 4.32, 47.2, 2260.0),
        row("Bali", 2021, 4.36, 46.8, 2270.0),
        row("Bali", 2022, 4.42, 50.6, 2280.0),
        row("Bali", 2023, 4.46, 54.1, 2290.0),
        row("Riau", 2023, 6.64, 92.1, 2088.0),
        row("Ghost", 2022, 0.0, 10.0, 400.0),
        row("Ghost", 2023, 1.0, 11.0, 410.0),
        row("Dark", 2022, 1.0, 10.0, 25.0),
        row("Dark", 2023, 1.1, 11.0, 0.0),
    ]
}

fn app_with(catalog: Option<ProvinceCatalog>) -> Router {
    let repos = Repositories::with_sources(
        catalog,
        Arc::new(InMemoryHistorySource::new(fixture_rows())),
    );
    let cfg = Config {
        chart: ChartConfig { width: 400, height: 300 },
        ..Config::default()
    };
    api::router(AppState::from_repositories(cfg, repos))
}

fn app() -> Router {
    app_with(Some(ProvinceCatalog::from_names(["Jawa Barat", "Bali", "Riau"])))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn lists_provinces_in_catalog_order() {
    let req = Request::get("/api/getprovinces").body(Body::empty()).unwrap();
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Jawa Barat", "Bali", "Riau"]));
}

#[tokio::test]
async fn provinces_unavailable_without_catalog() {
    let req = Request::get("/api/getprovinces").body(Body::empty()).unwrap();
    let (status, body) = send(app_with(None), req).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn regression_returns_projection_and_metrics() {
    let req = post_json(
        "/api/linearregression?chart=false&metrics=true",
        json!({ "provinsi": "Jawa Barat" }),
    );
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Berhasil menghitung regresi linear");
    assert_eq!(body["provinsi"], "Jawa Barat");
    assert!(body["data"].as_f64().unwrap().is_finite());

    let growth = body["growth_penduduk"].as_f64().unwrap();
    assert!(growth.abs() < 0.05, "growth is fractional, got {growth}");
    let expected_population = 49.86 * (1.0 + growth);
    assert!((body["penduduk_2024"].as_f64().unwrap() - expected_population).abs() < 1e-9);
    assert!(body["pendapatan_2024"].as_f64().unwrap() > 46.9);

    assert!(body["galat"].as_f64().unwrap() >= 0.0);
    assert!(body["accurate"].as_f64().unwrap() <= 1.0);
    assert!(body.get("plot").is_none());
}

#[tokio::test]
async fn regression_includes_png_plot_by_default() {
    let req = post_json("/api/linearregression", json!({ "provinsi": "Bali" }));
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::OK);
    let png = STANDARD.decode(body["plot"].as_str().unwrap()).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    assert!(body.get("galat").is_none());
}

#[tokio::test]
async fn empty_body_object_is_invalid_input() {
    let req = post_json("/api/linearregression", json!({}));
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid input data." }));
}

#[tokio::test]
async fn missing_body_is_invalid_input() {
    let req = Request::post("/api/extrapolation").body(Body::empty()).unwrap();
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid input data." }));
}

#[tokio::test]
async fn non_string_province_is_invalid_input() {
    let req = post_json("/api/linearregression", json!({ "provinsi": 42 }));
    let (status, _) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_province_is_not_found() {
    for uri in ["/api/linearregression", "/api/extrapolation"] {
        let req = post_json(uri, json!({ "provinsi": "Atlantis" }));
        let (status, body) = send(app(), req).await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({ "error": "Data not found for the selected province." }));
    }
}

#[tokio::test]
async fn single_year_is_unprocessable() {
    let req = post_json("/api/linearregression?chart=false", json!({ "provinsi": "Riau" }));
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("insufficient data"));
}

#[tokio::test]
async fn zero_base_population_is_unprocessable() {
    let req = post_json("/api/linearregression?chart=false", json!({ "provinsi": "Ghost" }));
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("previous value is zero"));
}

#[tokio::test]
async fn zero_latest_energy_is_unprocessable_for_extrapolation() {
    let req = post_json("/api/extrapolation?chart=false", json!({ "provinsi": "Dark" }));
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().starts_with("numerically degenerate"));
}

#[tokio::test]
async fn padded_province_name_is_not_found() {
    let req = post_json("/api/linearregression", json!({ "provinsi": " Bali " }));
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Data not found for the selected province." }));
}

#[tokio::test]
async fn extrapolation_includes_png_plot_by_default() {
    let req = post_json("/api/extrapolation", json!({ "provinsi": "Jawa Barat" }));
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::OK);
    let png = STANDARD.decode(body["plot"].as_str().unwrap()).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn extrapolation_follows_linear_trend() {
    let req = post_json("/api/extrapolation?chart=false", json!({ "provinsi": "Bali" }));
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Berhasil menghitung prediksi dengan metode ekstrapolasi linear"
    );
    assert!((body["data"].as_f64().unwrap() - 2300.0).abs() < 1e-6);
    assert!((body["growth_rate"].as_f64().unwrap() - 10.0 / 2290.0).abs() < 1e-12);
    assert!(body.get("plot").is_none());
}

#[tokio::test]
async fn health_reports_catalog_state() {
    let req = Request::get("/healthz").body(Body::empty()).unwrap();
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["catalog"]["provinces"], 3);

    let req = Request::get("/healthz").body(Body::empty()).unwrap();
    let (status, body) = send(app_with(None), req).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}
