use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::session::RewardSession;

/// Keyed store owning every session record.
///
/// Not synchronized on its own; `SessionManager` keeps it behind a single
/// mutex so each operation sees and leaves a consistent map.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, RewardSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, session: RewardSession) {
        self.sessions.insert(session.session_id.clone(), session);
    }

    pub fn get(&self, session_id: &str) -> Option<&RewardSession> {
        self.sessions.get(session_id)
    }

    pub fn get_mut(&mut self, session_id: &str) -> Option<&mut RewardSession> {
        self.sessions.get_mut(session_id)
    }

    pub fn remove(&mut self, session_id: &str) -> Option<RewardSession> {
        self.sessions.remove(session_id)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every session past the retention ceiling. Returns how many went.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_past_retention(now));
        before - self.sessions.len()
    }

    /// Drop the session if it is past the confirmation window.
    pub fn expire_if_stale(&mut self, session_id: &str, now: DateTime<Utc>) -> bool {
        let stale = self
            .sessions
            .get(session_id)
            .is_some_and(|session| session.is_past_confirmation_window(now));
        if stale {
            self.sessions.remove(session_id);
        }
        stale
    }
}
