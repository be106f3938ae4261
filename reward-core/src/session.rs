use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{confirmation_window, retention_ceiling};

/// One reward-eligibility attempt
#[derive(Debug, Clone, PartialEq)]
pub struct RewardSession {
    pub session_id: String,
    page_key: String,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    confirmed: bool,
    confirmed_at: Option<DateTime<Utc>>,
    pub watch_time: Option<f64>,
    pub ad_start_time: Option<f64>,
}

impl RewardSession {
    pub fn new(
        session_id: String,
        page_key: String,
        user_agent: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            page_key,
            user_agent,
            created_at,
            confirmed: false,
            confirmed_at: None,
            watch_time: None,
            ad_start_time: None,
        }
    }

    pub fn page_key(&self) -> &str {
        &self.page_key
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    /// Mark the session confirmed. Returns false, leaving the record
    /// untouched, if it was already confirmed.
    pub fn confirm(
        &mut self,
        now: DateTime<Utc>,
        watch_time: Option<f64>,
        ad_start_time: Option<f64>,
    ) -> bool {
        if self.confirmed {
            return false;
        }
        self.confirmed = true;
        self.confirmed_at = Some(now);
        self.watch_time = watch_time;
        self.ad_start_time = ad_start_time;
        true
    }

    pub fn is_past_confirmation_window(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > confirmation_window()
    }

    pub fn is_past_retention(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > retention_ceiling()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            session_id: self.session_id.clone(),
            page_key: self.page_key.clone(),
            confirmed: self.confirmed,
            created_at: self.created_at,
            confirmed_at: self.confirmed_at,
        }
    }
}

/// Read-only snapshot returned by the status query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub session_id: String,
    pub page_key: String,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn session_at(created_at: DateTime<Utc>) -> RewardSession {
        RewardSession::new("session_1_abc".into(), "page-home".into(), None, created_at)
    }

    #[test]
    fn confirm_happens_once() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut session = session_at(t0);

        assert!(session.confirm(t0 + Duration::seconds(40), Some(35.0), None));
        assert!(!session.confirm(t0 + Duration::seconds(50), Some(99.0), Some(1.0)));

        assert_eq!(session.confirmed_at(), Some(t0 + Duration::seconds(40)));
        assert_eq!(session.watch_time, Some(35.0));
        assert_eq!(session.ad_start_time, None);
    }

    #[test]
    fn windows_are_exclusive_at_the_boundary() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let session = session_at(t0);

        assert!(!session.is_past_confirmation_window(t0 + Duration::minutes(10)));
        let just_after = t0 + Duration::minutes(10) + Duration::milliseconds(1);
        assert!(session.is_past_confirmation_window(just_after));
        assert!(!session.is_past_retention(t0 + Duration::hours(1)));
        assert!(session.is_past_retention(t0 + Duration::minutes(61)));
    }

    #[test]
    fn status_serializes_camel_case() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let status = session_at(t0).status();
        assert_eq!(status.page_key, "page-home");
        assert!(!status.confirmed);
        assert!(status.confirmed_at.is_none());
    }
}
