//! Server-side sessions keyed by an opaque cookie token.

use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::generate_token;

/// Language assigned to sessions that never selected one.
pub const DEFAULT_LANGUAGE: &str = "english";

/// Server-side record binding a client token to a user and a language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: String,
    /// `None` for a client that picked a language but has not logged in.
    pub username: Option<String>,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    fn new(username: Option<String>, language: String) -> Self {
        let now = Utc::now();
        Self {
            id: generate_token(),
            username,
            language,
            created_at: now,
            last_seen: now,
        }
    }

    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }
}

/// Idle lifetime of anonymous sessions unless configured otherwise.
pub const DEFAULT_ANONYMOUS_TTL: Duration = Duration::from_secs(30 * 60);

/// Upper bound on live anonymous sessions unless configured otherwise.
pub const DEFAULT_MAX_ANONYMOUS: usize = 1024;

/// Tunables for the session manager.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Sessions idle for longer than this are dropped. `None` keeps them
    /// until logout.
    pub idle_ttl: Option<Duration>,
    /// Idle lifetime of anonymous sessions. Applies even when `idle_ttl`
    /// is `None`; the shorter of the two wins.
    pub anonymous_ttl: Duration,
    /// Creating an anonymous session beyond this count evicts the least
    /// recently seen one.
    pub max_anonymous: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            idle_ttl: None,
            anonymous_ttl: DEFAULT_ANONYMOUS_TTL,
            max_anonymous: DEFAULT_MAX_ANONYMOUS,
        }
    }
}

impl SessionOptions {
    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = Some(ttl);
        self
    }

    pub fn with_anonymous_ttl(mut self, ttl: Duration) -> Self {
        self.anonymous_ttl = ttl;
        self
    }

    pub fn with_max_anonymous(mut self, max: usize) -> Self {
        self.max_anonymous = max;
        self
    }
}

/// Concurrent in-memory session table.
#[derive(Debug)]
pub struct SessionManager {
    sessions: DashMap<String, Session>,
    idle_ttl: Option<chrono::Duration>,
    anonymous_ttl: chrono::Duration,
    max_anonymous: usize,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl SessionManager {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_ttl: options
                .idle_ttl
                .and_then(|ttl| chrono::Duration::from_std(ttl).ok()),
            anonymous_ttl: chrono::Duration::from_std(options.anonymous_ttl)
                .unwrap_or(chrono::Duration::MAX),
            max_anonymous: options.max_anonymous.max(1),
        }
    }

    /// Create an authenticated session for `username`.
    pub fn start(&self, username: &str) -> String {
        self.insert(Session::new(
            Some(username.to_string()),
            DEFAULT_LANGUAGE.to_string(),
        ))
    }

    /// Create an authenticated session, inheriting the language of the
    /// client's previous session (if any) and invalidating that session.
    /// An expired prior session is retired without passing its language on.
    pub fn login(&self, username: &str, prior: Option<&str>) -> String {
        let now = Utc::now();
        let language = prior
            .and_then(|id| self.end(id))
            .filter(|old| !self.is_expired(old, now))
            .map(|old| old.language)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        self.insert(Session::new(Some(username.to_string()), language))
    }

    /// Create an unauthenticated session that only remembers a language.
    ///
    /// Expired sessions are purged first, and the least recently seen
    /// anonymous sessions are evicted to stay within the configured cap.
    pub fn anonymous(&self, language: &str) -> String {
        self.purge_expired();
        self.evict_anonymous(self.max_anonymous - 1);
        self.insert(Session::new(None, language.to_string()))
    }

    /// Look up a live session, refreshing its idle timer.
    pub fn current(&self, session_id: &str) -> Option<Session> {
        let now = Utc::now();
        {
            let mut entry = self.sessions.get_mut(session_id)?;
            if !self.is_expired(&entry, now) {
                entry.last_seen = now;
                return Some(entry.clone());
            }
        }
        self.sessions.remove(session_id);
        None
    }

    /// Overwrite the language of an existing session. Any string is accepted.
    pub fn set_language(&self, session_id: &str, language: &str) -> bool {
        if self.current(session_id).is_none() {
            return false;
        }
        match self.sessions.get_mut(session_id) {
            Some(mut entry) => {
                entry.language = language.to_string();
                true
            }
            None => false,
        }
    }

    /// Invalidate a session, returning its last state.
    pub fn end(&self, session_id: &str) -> Option<Session> {
        self.sessions.remove(session_id).map(|(_, s)| s)
    }

    /// Drop every idle-expired session; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !self.is_expired(s, now));
        before.saturating_sub(self.sessions.len())
    }

    /// Number of live sessions without a username.
    pub fn anonymous_count(&self) -> usize {
        self.sessions.iter().filter(|e| !e.is_authenticated()).count()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn insert(&self, session: Session) -> String {
        let id = session.id.clone();
        self.sessions.insert(id.clone(), session);
        id
    }

    /// Drop the oldest anonymous sessions until at most `keep` remain.
    fn evict_anonymous(&self, keep: usize) {
        let mut anonymous: Vec<(DateTime<Utc>, String)> = self
            .sessions
            .iter()
            .filter(|e| !e.is_authenticated())
            .map(|e| (e.last_seen, e.key().clone()))
            .collect();
        if anonymous.len() <= keep {
            return;
        }
        anonymous.sort();
        let excess = anonymous.len() - keep;
        for (_, id) in anonymous.into_iter().take(excess) {
            self.sessions.remove(&id);
        }
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        let ttl = if session.is_authenticated() {
            self.idle_ttl
        } else {
            Some(match self.idle_ttl {
                Some(idle) => idle.min(self.anonymous_ttl),
                None => self.anonymous_ttl,
            })
        };
        match ttl {
            Some(ttl) => now - session.last_seen > ttl,
            None => false,
        }
    }
}
