use axum::{
    extract::{Path, State},
    http::{header::USER_AGENT, HeaderMap},
    Json,
};
use reward_core::{SessionStatus, StartParams};
use tracing::info;
use uuid::Uuid;

use super::types::{ConfirmRequest, ConfirmResponse, StartRequest, StartResponse};
use crate::{ApiJson, ErrorResponse, ServerState};

/// POST /reward/start - Create a new reward session
pub async fn handle_start(
    State(state): State<ServerState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<StartRequest>,
) -> Result<Json<StartResponse>, ErrorResponse> {
    let request_id = Uuid::new_v4();
    info!("[{}] POST /reward/start pageKey={:?}", request_id, payload.page_key);

    let mut params = StartParams::try_from(payload)?;
    params.user_agent = resolve_user_agent(params.user_agent, &headers);

    let session_id = state.session_manager.start_session(params).await?;

    Ok(Json(StartResponse {
        success: true,
        session_id,
    }))
}

/// POST /reward/confirm - Confirm that the reward was earned
pub async fn handle_confirm(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>, ErrorResponse> {
    let request_id = Uuid::new_v4();
    info!("[{}] POST /reward/confirm sessionId={:?}", request_id, payload.session_id);

    let outcome = state.session_manager.confirm_session(payload.into()).await?;
    Ok(Json(outcome.into()))
}

/// GET /reward/status/{session_id}
pub async fn handle_status(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionStatus>, ErrorResponse> {
    let request_id = Uuid::new_v4();
    info!("[{}] GET /reward/status/{}", request_id, session_id);

    let status = state.session_manager.get_status(&session_id).await?;
    Ok(Json(status))
}

/// Client-declared user agent, falling back to the request header
fn resolve_user_agent(declared: Option<String>, headers: &HeaderMap) -> Option<String> {
    declared.filter(|ua| !ua.is_empty()).or_else(|| {
        headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    })
}
