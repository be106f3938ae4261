use chrono::{DateTime, Utc};
use reward_core::{ConfirmOutcome, ConfirmParams, StartParams};
use serde::{Deserialize, Serialize};

use crate::ErrorResponse;

/// Creation time as sent by the client: RFC 3339 text or epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ClientTimestamp {
    Text(DateTime<Utc>),
    Millis(f64),
}

impl ClientTimestamp {
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        match self {
            ClientTimestamp::Text(dt) => Some(dt),
            ClientTimestamp::Millis(ms) if ms.is_finite() => {
                DateTime::from_timestamp_millis(ms.trunc() as i64)
            }
            ClientTimestamp::Millis(_) => None,
        }
    }
}

/// Body of POST /reward/start
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub page_key: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: Option<ClientTimestamp>,
}

impl TryFrom<StartRequest> for StartParams {
    type Error = ErrorResponse;

    fn try_from(req: StartRequest) -> Result<Self, Self::Error> {
        let timestamp = match req.timestamp {
            Some(ts) => Some(ts.to_datetime().ok_or_else(|| {
                ErrorResponse::invalid_request("timestamp is out of range".to_string())
            })?),
            None => None,
        };
        Ok(StartParams {
            page_key: req.page_key,
            user_agent: req.user_agent,
            timestamp,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub success: bool,
    pub session_id: String,
}

/// Body of POST /reward/confirm
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub session_id: Option<String>,
    pub page_key: Option<String>,
    /// Seconds
    pub watch_time: Option<f64>,
    /// Epoch milliseconds
    pub ad_start_time: Option<f64>,
}

impl From<ConfirmRequest> for ConfirmParams {
    fn from(req: ConfirmRequest) -> Self {
        ConfirmParams {
            session_id: req.session_id,
            page_key: req.page_key,
            watch_time: req.watch_time,
            ad_start_time: req.ad_start_time,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub success: bool,
    pub session_id: String,
    pub confirmed_at: DateTime<Utc>,
    pub watch_time: Option<f64>,
}

impl From<ConfirmOutcome> for ConfirmResponse {
    fn from(outcome: ConfirmOutcome) -> Self {
        ConfirmResponse {
            success: true,
            session_id: outcome.session_id,
            confirmed_at: outcome.confirmed_at,
            watch_time: outcome.watch_time,
        }
    }
}
