use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use offerly_core::{Criteria, Offer};

/// Conversation memory for one session token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub original_query: String,
    pub criteria: Criteria,
    pub offers: Vec<Offer>,
    pub done: bool,
}

struct Entry {
    state: SessionState,
    last_touched: Instant,
}

/// In-process session map with an explicit TTL. Entries idle past the TTL
/// are swept lazily on the next access, so the map stays bounded by the set
/// of recently active conversations instead of growing forever.
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Entry>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, sessions: Mutex::new(HashMap::new()) }
    }

    /// Returns a snapshot of the session state and refreshes its TTL.
    pub fn get(&self, session_id: &str) -> Option<SessionState> {
        let mut sessions = self.lock();
        sessions.retain(|_, entry| entry.last_touched.elapsed() <= self.ttl);

        let entry = sessions.get_mut(session_id)?;
        entry.last_touched = Instant::now();
        Some(entry.state.clone())
    }

    pub fn put(&self, session_id: &str, state: SessionState) {
        let mut sessions = self.lock();
        sessions.insert(session_id.to_string(), Entry { state, last_touched: Instant::now() });
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
