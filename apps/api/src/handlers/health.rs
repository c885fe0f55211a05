use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
}

/// One runtime dependency health status.
#[derive(Debug, Serialize)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let postgres = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => HealthDependencyStatus {
            status: "ok",
            detail: None,
        },
        Err(error) => HealthDependencyStatus {
            status: "error",
            detail: Some(error.to_string()),
        },
    };

    let ready = postgres.status == "ok";
    Json(HealthResponse {
        status: if ready { "ok" } else { "degraded" },
        ready,
        postgres,
    })
}
