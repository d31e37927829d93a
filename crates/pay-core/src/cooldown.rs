//! # Cooldown Store
//!
//! Per-requester submission throttle. One accepted request per key per window.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Storage for last-accepted timestamps, keyed by requester.
///
/// Swappable so a multi-instance deployment can back it with a shared cache.
#[async_trait]
pub trait CooldownStore: Send + Sync {
    /// Accept `key` at `now` unless it was accepted less than `window` ago.
    ///
    /// On acceptance the timestamp is recorded before returning. On rejection
    /// the remaining wait is returned and nothing is recorded.
    async fn try_acquire(&self, key: &str, now: Instant, window: Duration)
        -> Result<(), Duration>;
}

pub type BoxedCooldownStore = Arc<dyn CooldownStore>;

/// Process-local store. Entries live for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryCooldownStore {
    entries: DashMap<String, Instant>,
}

impl InMemoryCooldownStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CooldownStore for InMemoryCooldownStore {
    async fn try_acquire(
        &self,
        key: &str,
        now: Instant,
        window: Duration,
    ) -> Result<(), Duration> {
        // entry() holds the shard lock, so check-and-set is atomic per key
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let elapsed = now.saturating_duration_since(*entry.get());
                if elapsed < window {
                    return Err(window - elapsed);
                }
                entry.insert(now);
                Ok(())
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                Ok(())
            }
        }
    }
}

/// Whole seconds left to wait, rounded up. Never zero for a non-zero wait.
pub fn remaining_secs(remaining: Duration) -> u64 {
    remaining.as_nanos().div_ceil(1_000_000_000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn test_first_request_accepted() {
        let store = InMemoryCooldownStore::new();
        assert!(store.try_acquire("a-1", Instant::now(), WINDOW).await.is_ok());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_second_request_inside_window_rejected() {
        let store = InMemoryCooldownStore::new();
        let t0 = Instant::now();
        store.try_acquire("a-1", t0, WINDOW).await.unwrap();

        let remaining = store
            .try_acquire("a-1", t0 + Duration::from_millis(2500), WINDOW)
            .await
            .unwrap_err();
        assert_eq!(remaining, Duration::from_millis(7500));
        assert_eq!(remaining_secs(remaining), 8);
    }

    #[tokio::test]
    async fn test_rejection_does_not_extend_window() {
        let store = InMemoryCooldownStore::new();
        let t0 = Instant::now();
        store.try_acquire("a-1", t0, WINDOW).await.unwrap();
        store
            .try_acquire("a-1", t0 + Duration::from_secs(9), WINDOW)
            .await
            .unwrap_err();

        assert!(store.try_acquire("a-1", t0 + WINDOW, WINDOW).await.is_ok());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = InMemoryCooldownStore::new();
        let t0 = Instant::now();
        store.try_acquire("a-1", t0, WINDOW).await.unwrap();
        assert!(store.try_acquire("b-2", t0, WINDOW).await.is_ok());
    }

    #[test]
    fn test_remaining_secs_rounds_up() {
        assert_eq!(remaining_secs(Duration::from_secs(10)), 10);
        assert_eq!(remaining_secs(Duration::from_millis(9001)), 10);
        assert_eq!(remaining_secs(Duration::from_nanos(1)), 1);
    }
}
