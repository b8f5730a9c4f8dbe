//! Per-conversation turn serialization.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One mutex per conversation with a turn in flight.
///
/// Entries exist only while a turn holds or waits for the lock.
#[derive(Debug, Default)]
pub(crate) struct TurnLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl TurnLocks {
    /// Waits until no other turn runs for `conversation_id`.
    pub(crate) async fn acquire(&self, conversation_id: &str) -> TurnGuard {
        // The map shard is released before awaiting the conversation mutex.
        let lock = self
            .locks
            .entry(conversation_id.to_string())
            .or_default()
            .clone();
        let guard = lock.lock_owned().await;
        TurnGuard {
            locks: Arc::clone(&self.locks),
            conversation_id: conversation_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of conversations with a turn running or queued.
    pub(crate) fn len(&self) -> usize {
        self.locks.len()
    }
}

/// Exclusive right to run a turn for one conversation.
pub(crate) struct TurnGuard {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    conversation_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map's own handle left means nobody is queued.
        self.locks
            .remove_if(&self.conversation_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
