//! Per-user serialization.
//!
//! The webhook handler spawns a task per inbound message, so two
//! messages from the same user can arrive concurrently. Each user gets
//! a keyed async mutex; holding it for the length of `handle_message`
//! makes the read-decide-write cycle on that user's session atomic
//! without serializing unrelated users.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed mutex map, one entry per user id.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the lock for `user_id`, creating it on first use.
    pub async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Number of users that have ever been locked.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_user_is_serialized() {
        let locks = Arc::new(UserLocks::new());
        let counter = Arc::new(std::sync::atomic::AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let counter = counter.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("5511999990000@c.us").await;
                let seen = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(2)).await;
                // No other task may have advanced the counter while we held the lock.
                assert_eq!(
                    counter.load(std::sync::atomic::Ordering::SeqCst),
                    seen + 1
                );
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 8);
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_users_get_distinct_locks() {
        let locks = UserLocks::new();
        let _a = locks.acquire("a@c.us").await;
        // Would deadlock if both users shared a lock.
        let _b = locks.acquire("b@c.us").await;
        assert_eq!(locks.len(), 2);
    }
}
