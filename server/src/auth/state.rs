use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::distributions::Alphanumeric;
use rand::Rng;

const STATE_TOKEN_LEN: usize = 32;
const MAX_PENDING_STATES: usize = 10_000;

#[derive(Default)]
struct Pending {
    by_state: HashMap<String, (Instant, u64)>,
    /// Issue order, oldest first.
    order: BTreeMap<u64, String>,
    next_seq: u64,
}

impl Pending {
    fn pop_oldest(&mut self) -> Option<(String, Instant)> {
        let (_, state) = self.order.pop_first()?;
        let (issued, _) = self.by_state.remove(&state)?;
        Some((state, issued))
    }

    fn oldest_issued(&self) -> Option<Instant> {
        let (_, state) = self.order.first_key_value()?;
        self.by_state.get(state).map(|(issued, _)| *issued)
    }
}

/// Anti-CSRF state tokens for in-flight logins. Each token identifies one
/// login attempt and can be consumed once, before it expires.
///
/// At most `max_pending` logins are tracked; past that the oldest one is
/// forgotten and its callback fails with a state mismatch.
pub struct OAuthStateStore {
    ttl: Duration,
    max_pending: usize,
    pending: Mutex<Pending>,
}

impl OAuthStateStore {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_PENDING_STATES)
    }

    pub fn with_capacity(ttl: Duration, max_pending: usize) -> Self {
        Self {
            ttl,
            max_pending: max_pending.max(1),
            pending: Mutex::new(Pending::default()),
        }
    }

    pub fn issue(&self) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_TOKEN_LEN)
            .map(char::from)
            .collect();

        let now = Instant::now();
        let mut pending = self.pending.lock();
        while pending
            .oldest_issued()
            .is_some_and(|issued| now.duration_since(issued) >= self.ttl)
        {
            pending.pop_oldest();
        }
        while pending.by_state.len() >= self.max_pending {
            if pending.pop_oldest().is_none() {
                break;
            }
            tracing::warn!(max_pending = self.max_pending, "OAuth state store full, evicted oldest login");
        }

        let seq = pending.next_seq;
        pending.next_seq += 1;
        pending.order.insert(seq, token.clone());
        pending.by_state.insert(token.clone(), (now, seq));
        token
    }

    /// True if `state` was issued here, is unexpired, and was not used yet.
    pub fn consume(&self, state: &str) -> bool {
        let mut pending = self.pending.lock();
        match pending.by_state.remove(state) {
            Some((issued, seq)) => {
                pending.order.remove(&seq);
                issued.elapsed() < self.ttl
            }
            None => false,
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().by_state.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_single_use() {
        let store = OAuthStateStore::new(Duration::from_secs(60));
        let state = store.issue();
        assert_eq!(state.len(), STATE_TOKEN_LEN);

        assert!(store.consume(&state));
        assert!(!store.consume(&state));
    }

    #[test]
    fn test_concurrent_flows_get_distinct_states() {
        let store = OAuthStateStore::new(Duration::from_secs(60));
        let first = store.issue();
        let second = store.issue();
        assert_ne!(first, second);
        assert_eq!(store.pending(), 2);

        assert!(store.consume(&second));
        assert!(store.consume(&first));
    }

    #[test]
    fn test_expired_state_is_rejected() {
        let store = OAuthStateStore::new(Duration::ZERO);
        let state = store.issue();
        assert!(!store.consume(&state));
    }

    #[test]
    fn test_pending_logins_are_capped() {
        let store = OAuthStateStore::with_capacity(Duration::from_secs(60), 3);
        let first = store.issue();
        for _ in 0..3 {
            store.issue();
        }

        assert_eq!(store.pending(), 3);
        assert!(!store.consume(&first));
    }

    #[test]
    fn test_default_cap_holds_under_login_flood() {
        let store = OAuthStateStore::new(Duration::from_secs(60));
        for _ in 0..=MAX_PENDING_STATES {
            store.issue();
        }
        assert_eq!(store.pending(), MAX_PENDING_STATES);
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        let store = OAuthStateStore::new(Duration::from_secs(60));
        assert!(!store.consume(""));
        assert!(!store.consume("forged"));
    }
}
