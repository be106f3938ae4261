use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::RewardError;
use crate::id::generate_session_id;
use crate::session::{RewardSession, SessionStatus};
use crate::store::SessionStore;
use crate::MINIMUM_WATCH_TIME_SECS;

const MAX_ID_ATTEMPTS: usize = 8;

/// Input of `start_session`. Required fields are optional here so their
/// absence is reported as an error instead of failing deserialization.
#[derive(Debug, Clone, Default)]
pub struct StartParams {
    pub page_key: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmParams {
    pub session_id: Option<String>,
    pub page_key: Option<String>,
    /// Seconds of ad playback reported by the client
    pub watch_time: Option<f64>,
    /// Epoch milliseconds at which the client started the ad
    pub ad_start_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmOutcome {
    pub session_id: String,
    pub confirmed_at: DateTime<Utc>,
    pub watch_time: Option<f64>,
}

/// Session manager - issues reward sessions and validates their confirmation.
///
/// All records live in one `SessionStore` behind a mutex held for the whole
/// of each operation, so two confirmations of the same session cannot both
/// observe it unconfirmed, and a sweep never interleaves with a confirm.
pub struct SessionManager {
    sessions: Mutex<SessionStore>,
    clock: Arc<dyn Clock>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Mutex::new(SessionStore::new()),
            clock,
        }
    }

    /// Create a new unconfirmed session for `page_key`
    /// Sweeps retention-expired sessions before storing the new one
    pub async fn start_session(&self, params: StartParams) -> Result<String, RewardError> {
        let page_key = required(params.page_key, "pageKey")?;

        let mut sessions = self.sessions.lock().await;
        let now = self.clock.now();

        let swept = sessions.sweep(now);
        if swept > 0 {
            info!("Swept {} expired session(s)", swept);
        }

        let session_id = unused_session_id(&sessions, now)?;
        let created_at = params.timestamp.unwrap_or(now);
        sessions.insert(RewardSession::new(
            session_id.clone(),
            page_key.clone(),
            params.user_agent,
            created_at,
        ));

        info!("[{}] New session created for pageKey: {}", session_id, page_key);
        Ok(session_id)
    }

    /// Confirm that the ad tied to a session was watched
    pub async fn confirm_session(
        &self,
        params: ConfirmParams,
    ) -> Result<ConfirmOutcome, RewardError> {
        let session_id = required(params.session_id, "sessionId")?;
        let page_key = required(params.page_key, "pageKey")?;

        let mut sessions = self.sessions.lock().await;
        let now = self.clock.now();

        let Some(session) = sessions.get(&session_id) else {
            warn!("[{}] Confirmation attempted for unknown session", session_id);
            return Err(RewardError::NotFound(session_id));
        };

        if session.page_key() != page_key {
            warn!("[{}] Confirmation attempted with wrong pageKey", session_id);
            return Err(RewardError::PageKeyMismatch(session_id));
        }

        if session.is_confirmed() {
            warn!("[{}] Double confirmation attempted", session_id);
            return Err(RewardError::AlreadyConfirmed(session_id));
        }

        if sessions.expire_if_stale(&session_id, now) {
            warn!("[{}] Confirmation attempted on expired session, removed", session_id);
            return Err(RewardError::Expired(session_id));
        }

        check_watch_time(&session_id, now, params.watch_time, params.ad_start_time)?;

        let Some(session) = sessions.get_mut(&session_id) else {
            error!("[{}] Session vanished while holding the store lock", session_id);
            return Err(RewardError::Internal(format!("session {} disappeared", session_id)));
        };
        if !session.confirm(now, params.watch_time, params.ad_start_time) {
            return Err(RewardError::AlreadyConfirmed(session_id));
        }

        info!(
            "[{}] Session confirmed for pageKey: {} (watch time: {})",
            session_id,
            page_key,
            params
                .watch_time
                .map(|w| format!("{}s", w))
                .unwrap_or_else(|| "N/A".to_string())
        );

        Ok(ConfirmOutcome {
            session_id,
            confirmed_at: now,
            watch_time: params.watch_time,
        })
    }

    /// Read-only snapshot of a session. Never expires anything.
    pub async fn get_status(&self, session_id: &str) -> Result<SessionStatus, RewardError> {
        self.sessions
            .lock()
            .await
            .get(session_id)
            .map(RewardSession::status)
            .ok_or_else(|| RewardError::NotFound(session_id.to_string()))
    }

    /// Get the number of stored sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, RewardError> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| {
        warn!("Missing required field: {}", field);
        RewardError::MissingField(field.to_string())
    })
}

fn unused_session_id(sessions: &SessionStore, now: DateTime<Utc>) -> Result<String, RewardError> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = generate_session_id(now);
        if !sessions.contains(&id) {
            return Ok(id);
        }
    }
    error!("Could not generate an unused session id after {} attempts", MAX_ID_ATTEMPTS);
    Err(RewardError::Internal("session id generation failed".to_string()))
}

/// Both checks are independent; watch time is checked first.
fn check_watch_time(
    session_id: &str,
    now: DateTime<Utc>,
    watch_time: Option<f64>,
    ad_start_time: Option<f64>,
) -> Result<(), RewardError> {
    let minimum = f64::from(MINIMUM_WATCH_TIME_SECS);

    if let Some(watch_time) = watch_time {
        if watch_time < minimum {
            warn!(
                "[{}] Insufficient watch time: {}s (minimum: {}s)",
                session_id, watch_time, MINIMUM_WATCH_TIME_SECS
            );
            return Err(RewardError::InsufficientWatchTime {
                watch_time,
                minimum_required: MINIMUM_WATCH_TIME_SECS,
            });
        }
    }

    if let Some(ad_start_time) = ad_start_time {
        let elapsed = (now.timestamp_millis() as f64 - ad_start_time) / 1000.0;
        if elapsed < minimum {
            warn!(
                "[{}] Confirmation too fast: {}s since ad start (minimum: {}s)",
                session_id, elapsed, MINIMUM_WATCH_TIME_SECS
            );
            return Err(RewardError::TooFast {
                elapsed_secs: (elapsed + 0.5).floor() as i64,
                minimum_required: MINIMUM_WATCH_TIME_SECS,
            });
        }
    }

    Ok(())
}
