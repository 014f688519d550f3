//! Session identifier to user credential mapping
//!
//! Browsers only ever hold the opaque session ID; the credential itself stays
//! in process memory. Entries are evicted after a fixed TTL or once the
//! credential they hold has expired, whichever comes first.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use teamlink_domain::{Credential, TeamLinkError};
use tracing::debug;

/// Error type for session lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStoreError {
    /// Unknown, evicted or expired session
    NotFound,
}

impl std::fmt::Display for SessionStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Session not found"),
        }
    }
}

impl std::error::Error for SessionStoreError {}

impl From<SessionStoreError> for TeamLinkError {
    fn from(err: SessionStoreError) -> Self {
        Self::Auth(err.to_string())
    }
}

struct SessionEntry {
    credential: Credential,
    stored_at: Instant,
}

/// In-memory session store guarded by a mutex
///
/// The lock is never held across an `.await`.
pub struct SessionCredentialStore {
    entries: Mutex<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionCredentialStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { entries: Mutex::new(HashMap::new()), ttl }
    }

    fn is_live(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.duration_since(entry.stored_at) < self.ttl && entry.credential.is_valid()
    }

    /// Store (or overwrite) the credential for `session_id`
    pub fn put(&self, session_id: &str, credential: Credential) {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| self.is_live(entry, now));
        entries.insert(session_id.to_string(), SessionEntry { credential, stored_at: now });
        debug!(sessions = entries.len(), "session stored");
    }

    /// Look up the credential for `session_id`
    ///
    /// # Errors
    /// Returns [`SessionStoreError::NotFound`] for unknown IDs and for
    /// entries past their TTL or credential expiry (which are removed).
    pub fn get(&self, session_id: &str) -> Result<Credential, SessionStoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        match entries.get(session_id) {
            Some(entry) if self.is_live(entry, now) => return Ok(entry.credential.clone()),
            Some(_) => {}
            None => return Err(SessionStoreError::NotFound),
        }
        entries.remove(session_id);
        debug!("expired session evicted on lookup");
        Err(SessionStoreError::NotFound)
    }

    /// Remove a session, returning whether it existed
    pub fn remove(&self, session_id: &str) -> bool {
        self.entries.lock().remove(session_id).is_some()
    }

    /// Evict every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| self.is_live(entry, now));
        before - entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
