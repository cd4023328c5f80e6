//! HTTP API tests, driven in-process through `tower::ServiceExt::oneshot`.
//!
//! Run with:
//!   cargo test --test server
#![cfg(feature = "server")]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use sales_report::server::{router, AppState};
use sales_report::{ReportConfig, ServerConfig};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup(csv: Option<&str>) -> (Router, ReportConfig, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = ReportConfig::builder()
        .data_dir(dir.path().join("data"))
        .reports_dir(dir.path().join("reports"))
        .build()
        .unwrap();
    if let Some(csv) = csv {
        std::fs::create_dir_all(&config.data_dir).unwrap();
        std::fs::write(config.source_path(), csv).unwrap();
    }
    let app = router(AppState::new(config.clone()), &ServerConfig::default());
    (app, config, dir)
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, body)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    let json = serde_json::from_slice(&body).unwrap();
    (status, json)
}

// ── Service endpoints ────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_healthy() {
    let (app, _, _dir) = setup(None);
    let (status, json) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "sales-report-api");
}

#[tokio::test]
async fn root_banner_has_version() {
    let (app, _, _dir) = setup(None);
    let (status, json) = get_json(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

// ── Generate ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn generate_returns_descriptor() {
    let (app, config, _dir) = setup(Some("Product,Quantity,Price\nWidget,3,9.99\n"));
    let (status, json) = get_json(app, "/api/v1/reports/generate").await;

    assert_eq!(status, StatusCode::OK, "body: {json}");
    assert_eq!(json["items_count"], 1);
    assert!((json["total_revenue"].as_f64().unwrap() - 29.97).abs() < 1e-9);
    let filename = json["filename"].as_str().unwrap();
    assert!(filename.starts_with("sales_report_"));
    assert_eq!(
        json["download_url"],
        format!("/api/v1/reports/download/{filename}")
    );
    assert!(config.reports_dir.join(filename).is_file());
}

#[tokio::test]
async fn generate_without_source_is_404() {
    let (app, _, _dir) = setup(None);
    let (status, json) = get_json(app, "/api/v1/reports/generate").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["detail"].as_str().unwrap().contains("ventas.csv"));
}

#[tokio::test]
async fn generate_with_no_valid_rows_is_400() {
    let (app, config, _dir) = setup(Some("Product,Quantity,Price\nGadget,0,5.00\n"));
    let (status, json) = get_json(app, "/api/v1/reports/generate").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().contains("No valid sales data"));
    assert!(!config.reports_dir.exists());
}

// ── Download & list ──────────────────────────────────────────────────────────

#[tokio::test]
async fn download_serves_pdf_as_attachment() {
    let (app, _, _dir) = setup(Some("Product,Quantity,Price\nWidget,3,9.99\n"));
    let (_, json) = get_json(app.clone(), "/api/v1/reports/generate").await;
    let url = json["download_url"].as_str().unwrap().to_string();
    let filename = json["filename"].as_str().unwrap().to_string();

    let (status, headers, body) = get(app, &url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        format!("attachment; filename={filename}").as_str()
    );
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn download_unknown_or_invalid_name_is_404() {
    let (app, _, _dir) = setup(None);
    for uri in [
        "/api/v1/reports/download/missing.pdf",
        "/api/v1/reports/download/..%2Fsecret.pdf",
        "/api/v1/reports/download/notes.txt",
    ] {
        let (status, json) = get_json(app.clone(), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(json["detail"], "Report file not found.");
    }
}

#[tokio::test]
async fn list_is_empty_before_first_report() {
    let (app, _, _dir) = setup(None);
    let (status, json) = get_json(app, "/api/v1/reports/list").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reports"], Value::Array(Vec::new()));
}

#[tokio::test]
async fn list_includes_generated_report() {
    let (app, _, _dir) = setup(Some("Producto,Cantidad,Precio\nCafé,2,3.50\n"));
    let (_, generated) = get_json(app.clone(), "/api/v1/reports/generate").await;
    let (status, json) = get_json(app, "/api/v1/reports/list").await;

    assert_eq!(status, StatusCode::OK);
    let reports = json["reports"].as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["filename"], generated["filename"]);
    assert_eq!(reports[0]["download_url"], generated["download_url"]);
    assert!(reports[0]["size"].as_u64().unwrap() > 0);
}
