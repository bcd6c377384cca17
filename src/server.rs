use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::{get, post}, Router, Json};
use log::{error, info};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::ServerConfig;
use crate::error::{ScheduleError, ScheduleResult};
use crate::planning::Planning;
use crate::report::{class_timetables, Report};
use crate::request::{ErrorBody, PlanningRequest, PlanningResponse};

/// Anything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    Schedule(ScheduleError),
    Body(JsonRejection),
}

impl From<ScheduleError> for ApiError {
    fn from(e: ScheduleError) -> Self {
        ApiError::Schedule(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Body(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Schedule(e @ ScheduleError::Generation(_)) => {
                error!("{e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::Schedule(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Body(rejection) => (rejection.status(), rejection.body_text()),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

// generation is synchronous; keep it off the async workers
async fn run_planning(request: PlanningRequest) -> ScheduleResult<Planning> {
    tokio::task::spawn_blocking(move || request.execute())
        .await
        .map_err(|e| ScheduleError::Generation(e.to_string()))?
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the timetable planner" }))
}

async fn planning_handler(
    payload: Result<Json<PlanningRequest>, JsonRejection>,
) -> Result<Json<PlanningResponse>, ApiError> {
    let Json(request) = payload?;
    let planning = run_planning(request).await?;
    Ok(Json(PlanningResponse::from(&planning)))
}

async fn report_handler(
    payload: Result<Json<PlanningRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let planning = run_planning(request).await?;
    let body = format!("{}\n\n{}", Report(&planning), class_timetables(&planning));
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response())
}

/// Builds the HTTP routes.
pub fn router(config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(root_handler))
        .route("/v1/planning", post(planning_handler))
        .route("/v1/planning/report", post(report_handler))
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(config.max_body_size)));

    if config.enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }
    router
}

pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let app = router(&config);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
