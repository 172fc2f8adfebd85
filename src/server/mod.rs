//! HTTP surface: the planner page, JSON projection and CSV download
//!
//! Every request recomputes the projection from its query string; the only
//! shared state is the credentials and the default scenario.

pub mod auth;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::projection::export::{self, DEFAULT_EXPORT_NAME};
use crate::projection::{ChartPoint, MonthRow, ProjectionEngine, ProjectionSummary};
use crate::scenario::ScenarioParams;

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

/// State shared by the handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Scenario that form fields are applied on top of
    pub defaults: Arc<ScenarioParams>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            defaults: Arc::new(ScenarioParams::default()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProjectionResponse<'a> {
    params: &'a ScenarioParams,
    extra_columns: &'a [String],
    rows: &'a [MonthRow],
    chart: Vec<ChartPoint>,
    summary: ProjectionSummary,
}

/// Build the router with the Basic gate applied to every route
pub fn router(config: &ServerConfig, state: AppState) -> Router {
    let credentials = Arc::new(config.credentials.clone());

    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/defaults", get(defaults_handler))
        .route("/api/projection", get(projection_handler))
        .route("/api/projection.csv", get(csv_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            credentials,
            auth::require_basic_auth,
        ))
}

/// Bind and serve until the process is stopped
pub async fn serve(config: ServerConfig) -> Result<()> {
    let app = router(&config, AppState::default());
    let listener = TcpListener::bind(config.addr).await?;
    log::info!("Cash-flow planner listening on http://{}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn styles_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLES_CSS)
}

async fn app_js_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        APP_JS,
    )
}

async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

async fn defaults_handler(State(state): State<AppState>) -> Json<ScenarioParams> {
    Json(state.defaults.as_ref().clone())
}

async fn projection_handler(
    State(state): State<AppState>,
    Query(fields): Query<HashMap<String, String>>,
) -> Response {
    let params = state.defaults.apply_form(&fields);
    let result = ProjectionEngine::for_params(&params, today()).project();

    Json(ProjectionResponse {
        params: &params,
        extra_columns: &result.extra_columns,
        rows: &result.rows,
        chart: result.chart_series(),
        summary: result.summary(),
    })
    .into_response()
}

async fn csv_handler(
    State(state): State<AppState>,
    Query(fields): Query<HashMap<String, String>>,
) -> Response {
    let params = state.defaults.apply_form(&fields);
    let result = ProjectionEngine::for_params(&params, today()).project();

    match export::to_csv_string(&result) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{DEFAULT_EXPORT_NAME}\""),
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            log::error!("CSV export failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Export failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::projection::read_totals;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use tower::ServiceExt;

    fn app() -> Router {
        let config = ServerConfig {
            addr: "127.0.0.1:0".parse().unwrap(),
            credentials: Credentials::new("ana", "pw"),
        };
        router(&config, AppState::default())
    }

    fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(user_pass) = auth {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Basic {}", STANDARD.encode(user_pass)),
            );
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_page_requires_credentials() {
        let resp = app().oneshot(get("/", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers()[header::WWW_AUTHENTICATE],
            "Basic realm=\"Secure Area\""
        );
        assert_eq!(body_text(resp).await, "Auth required");
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let resp = app().oneshot(get("/", Some("ana:nope"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_page_with_credentials() {
        let resp = app().oneshot(get("/", Some("ana:pw"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("<html"));
    }

    #[tokio::test]
    async fn test_static_assets_skip_auth() {
        let resp = app().oneshot(get("/app.js", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = app().oneshot(get("/styles.css", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_projection_json() {
        let uri = "/api/projection?horizon_months=3&start_month=2025-01";
        let resp = app().oneshot(get(uri, Some("ana:pw"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        let balances: Vec<f64> = json["rows"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["balance"].as_f64().unwrap())
            .collect();
        assert_eq!(balances, vec![51_500.0, 53_000.0, 54_500.0]);
        assert_eq!(json["summary"]["final_balance"], 54_500.0);
        assert_eq!(json["chart"][0]["expense"], -3_500.0);
    }

    #[tokio::test]
    async fn test_projection_coerces_bad_fields() {
        let uri = "/api/projection?horizon_months=2&monthly_income=lots&start_month=2025-01";
        let resp = app().oneshot(get(uri, Some("ana:pw"))).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["params"]["monthly_income"], 0.0);
        assert_eq!(json["summary"]["final_balance"], 43_000.0);
    }

    #[tokio::test]
    async fn test_csv_download_matches_json_totals() {
        let query = "horizon_months=3&start_month=2025-01&show_one_off_expense=on\
                     &one_off_expense=10000&one_off_expense_month=1";

        let resp = app()
            .oneshot(get(&format!("/api/projection.csv?{query}"), Some("ana:pw")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains(DEFAULT_EXPORT_NAME));
        let totals = read_totals(body_text(resp).await.as_bytes()).unwrap();

        let resp = app()
            .oneshot(get(&format!("/api/projection?{query}"), Some("ana:pw")))
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();

        assert_eq!(totals.final_balance, Some(44_500.0));
        assert_eq!(json["summary"]["total_net"].as_f64(), Some(totals.total_net));
        assert_eq!(json["summary"]["total_inflow"].as_f64(), Some(totals.total_inflow));
    }

    #[tokio::test]
    async fn test_defaults_endpoint() {
        let resp = app().oneshot(get("/api/defaults", Some("ana:pw"))).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["cash_start"], 50_000.0);
        assert_eq!(json["horizon_months"], 24);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let resp = app().oneshot(get("/nope", Some("ana:pw"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
