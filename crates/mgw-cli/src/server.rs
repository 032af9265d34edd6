use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use mgw_core::{SnapshotStore, StatusService};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{info, warn};

type Shared<S> = State<Arc<StatusService<S>>>;

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: &'static str,
    error: String,
}

impl ApiError {
    fn new(status: StatusCode, message: &'static str, error: impl ToString) -> Self {
        Self {
            status,
            message,
            error: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "message": self.message,
            "error": self.error,
        }));
        (self.status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    /// Parsed leniently: anything that is not a number means no limit.
    limit: Option<String>,
}

pub fn build_app<S: SnapshotStore + 'static>(service: Arc<StatusService<S>>) -> Router {
    Router::new()
        .route(
            "/api/mgw/status",
            post(receive_status::<S>).get(formatted_status::<S>),
        )
        .route("/api/mgw/raw", get(raw_status::<S>))
        .route("/api/mgw/history", get(history::<S>))
        .route("/api/mgw/health", get(health::<S>))
        .route("/api/mgw/data", delete(clear_data::<S>))
        .with_state(service)
}

pub async fn serve<S: SnapshotStore + 'static>(
    service: Arc<StatusService<S>>,
    bind: &str,
) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "status console listening");

    axum::serve(listener, build_app(service))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            warn!("received ctrl-c, stopping");
        })
        .await?;

    Ok(())
}

async fn receive_status<S: SnapshotStore + 'static>(
    State(service): Shared<S>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(raw) = payload.map_err(|err| {
        ApiError::new(StatusCode::BAD_REQUEST, "Invalid status data", err.body_text())
    })?;

    service
        .receive_status(&raw)
        .await
        .map_err(|err| ApiError::new(StatusCode::BAD_REQUEST, "Invalid status data", err))?;

    Ok(Json(json!({
        "success": true,
        "message": "Status received",
        "timestamp": Utc::now().timestamp_millis(),
    })))
}

async fn formatted_status<S: SnapshotStore + 'static>(
    State(service): Shared<S>,
) -> Result<Json<Value>, ApiError> {
    let formatted = service.formatted_status().await;
    let mut body = json!({ "success": true });

    match serde_json::to_value(&formatted) {
        Ok(Value::Object(fields)) => {
            if let Value::Object(map) = &mut body {
                map.extend(fields);
            }
            Ok(Json(body))
        }
        Ok(_) => Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to get MGW status",
            "status view is not an object",
        )),
        Err(err) => Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to get MGW status",
            err,
        )),
    }
}

async fn raw_status<S: SnapshotStore + 'static>(State(service): Shared<S>) -> Response {
    match service.current_status().await {
        Some(status) => Json(json!({ "success": true, "status": status })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "No data available" })),
        )
            .into_response(),
    }
}

async fn history<S: SnapshotStore + 'static>(
    State(service): Shared<S>,
    Query(query): Query<HistoryQuery>,
) -> Json<Value> {
    let limit = query.limit.and_then(|v| v.trim().parse::<usize>().ok());
    let history = service.history(limit).await;

    Json(json!({
        "success": true,
        "count": history.len(),
        "history": history,
    }))
}

async fn health<S: SnapshotStore + 'static>(State(service): Shared<S>) -> Json<Value> {
    let metrics = service.health_metrics().await;
    Json(json!({ "success": true, "metrics": metrics }))
}

async fn clear_data<S: SnapshotStore + 'static>(State(service): Shared<S>) -> Json<Value> {
    service.clear_data().await;
    Json(json!({ "success": true, "message": "All MGW data cleared" }))
}
