//! Health check endpoint

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::AppState;

/// GET /health - Liveness plus the chain and contract being served
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.config();
    Json(HealthResponse::new(
        config.rpc.chain_id,
        config.contract_address.clone(),
    ))
}
