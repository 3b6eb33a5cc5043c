//! RPC endpoint status

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::dto::{ApiError, RpcStatusResponse};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/probe", post(probe))
}

/// GET /rpc/status - Last probed endpoint status
pub async fn get_status(
    State(state): State<AppState>,
) -> Result<Json<RpcStatusResponse>, (StatusCode, Json<ApiError>)> {
    let config = state.config();
    let Some(client) = state.rpc() else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::not_found("No JSON-RPC client configured")),
        ));
    };

    let status = client.status().await;
    Ok(Json(RpcStatusResponse::new(
        config.rpc.url.clone(),
        status.as_ref(),
        config.rpc.chain_id,
        client.can_sign(),
    )))
}

/// POST /rpc/probe - Probe the endpoint again and return its status
pub async fn probe(
    State(state): State<AppState>,
) -> Result<Json<RpcStatusResponse>, (StatusCode, Json<ApiError>)> {
    if let Some(client) = state.rpc() {
        client.refresh_status().await;
    }
    get_status(State(state)).await
}
