//! Vertex curve state, quote and trade endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use vertex::constants::{CURVE_CHART_POINTS, EMPTY_CURVE_CHART_TOKENS};
use vertex::{curve_points, TradePhase};
use vertex_core::{TradeError, Wei};

use crate::dto::{
    AmountDto, ApiError, CurvePointDto, CurveResponse, QuoteRequest, QuoteResponse,
    StateResponse, TradeRequest, TradeResponse,
};
use crate::AppState;

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

/// Create vertex routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/state", get(get_state))
        .route("/refresh", post(refresh))
        .route("/quote", post(quote))
        .route("/trade", get(get_trade).post(trade).delete(reset_trade))
        .route("/curve", get(get_curve))
}

fn trade_error(e: TradeError) -> (StatusCode, Json<ApiError>) {
    let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiError::new(e.error_code(), e.to_string())))
}

fn state_response(state: &AppState) -> StateResponse {
    let engine = state.engine();
    StateResponse::new(
        &engine.state(),
        engine.account().map(|a| a.to_string()),
        engine.is_loading(),
    )
}

/// GET /vertex/state - Last read curve state and balance
pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    Json(state_response(&state))
}

/// POST /vertex/refresh - Re-read curve state and balance
pub async fn refresh(State(state): State<AppState>) -> Json<StateResponse> {
    state.engine().refetch_all().await;
    Json(state_response(&state))
}

/// POST /vertex/quote - Quote an amount against the current curve state
pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Json<QuoteResponse> {
    let quote = state.engine().quote(&request.amount, request.direction).await;
    Json(QuoteResponse::from(&quote))
}

/// POST /vertex/trade - Quote and submit; returns once the trade is pending
pub async fn trade(
    State(state): State<AppState>,
    Json(request): Json<TradeRequest>,
) -> ApiResult<(StatusCode, Json<TradeResponse>)> {
    let explorer = state.config().explorer_url.clone();
    let coordinator = state.coordinator();
    if coordinator.is_busy() {
        return Err(trade_error(TradeError::InProgress));
    }

    let quote = state.engine().quote(&request.amount, request.direction).await;
    let submitted = coordinator
        .spawn_trade(&quote.token_amount, quote.price_amount.as_ref(), quote.direction)
        .map_err(trade_error)?;

    match submitted {
        Some(execution) => Ok((
            StatusCode::ACCEPTED,
            Json(TradeResponse::new(true, execution, &explorer)),
        )),
        None => Ok((
            StatusCode::OK,
            Json(TradeResponse::new(false, coordinator.execution(), &explorer)),
        )),
    }
}

/// GET /vertex/trade - Current trade execution
pub async fn get_trade(State(state): State<AppState>) -> Json<TradeResponse> {
    let execution = state.coordinator().execution();
    let submitted = execution.phase != TradePhase::Idle;
    Json(TradeResponse::new(
        submitted,
        execution,
        &state.config().explorer_url,
    ))
}

/// DELETE /vertex/trade - Clear a finished trade
pub async fn reset_trade(State(state): State<AppState>) -> Json<TradeResponse> {
    state.coordinator().reset();
    get_trade(State(state)).await
}

/// GET /vertex/curve - Price curve up to 1.5x the current supply
pub async fn get_curve(State(state): State<AppState>) -> Json<CurveResponse> {
    let total_supply = state.engine().state().curve.total_supply;
    let supply = total_supply.clone().unwrap_or_else(|| Wei::from(0));
    let points = curve_points(&supply, CURVE_CHART_POINTS, EMPTY_CURVE_CHART_TOKENS);

    Json(CurveResponse {
        total_supply: total_supply.as_ref().map(AmountDto::from),
        points: points.iter().map(CurvePointDto::from).collect(),
    })
}
