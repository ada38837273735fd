//! In-memory record of executed commands, newest first.

use crate::executor::ExecutionResult;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

/// Default number of entries kept before the oldest is evicted.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// One executed command and what came back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    pub command: String,
    pub result: ExecutionResult,
}

struct HistoryInner {
    next_id: u64,
    entries: VecDeque<HistoryEntry>,
}

/// Bounded, thread-safe run history.
pub struct History {
    inner: RwLock<HistoryInner>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            inner: RwLock::new(HistoryInner {
                next_id: 1,
                entries: VecDeque::new(),
            }),
            limit,
        }
    }

    /// Stores a new entry, evicting the oldest ones past the limit.
    pub async fn record(&self, command: String, result: ExecutionResult) -> HistoryEntry {
        let mut inner = self.inner.write().await;
        let entry = HistoryEntry {
            id: inner.next_id,
            timestamp_ms: now_ms(),
            command,
            result,
        };
        inner.next_id += 1;
        inner.entries.push_front(entry.clone());
        inner.entries.truncate(self.limit);

        tracing::debug!(id = entry.id, stored = inner.entries.len(), "Recorded history entry");
        entry
    }

    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.inner.read().await.entries.iter().cloned().collect()
    }

    pub async fn get(&self, id: u64) -> Option<HistoryEntry> {
        self.inner
            .read()
            .await
            .entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    /// Removes one entry. Returns `false` if it was not stored.
    pub async fn remove(&self, id: u64) -> bool {
        let mut inner = self.inner.write().await;
        match inner.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                inner.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub async fn clear(&self) {
        self.inner.write().await.entries.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::FailureKind;

    fn failure(message: &str) -> ExecutionResult {
        ExecutionResult::failure(FailureKind::Network, message)
    }

    #[tokio::test]
    async fn test_record_orders_newest_first() {
        let history = History::default();
        let first = history.record("curl 'a'".to_string(), failure("one")).await;
        let second = history.record("curl 'b'".to_string(), failure("two")).await;

        assert!(second.id > first.id);
        let ids: Vec<u64> = history.list().await.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_limit_evicts_oldest() {
        let history = History::new(2);
        for i in 0..3 {
            history.record(format!("curl '{}'", i), failure("x")).await;
        }

        let entries = history.list().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].command, "curl '2'");
        assert_eq!(entries[1].command, "curl '1'");
    }

    #[tokio::test]
    async fn test_get_and_remove() {
        let history = History::default();
        let entry = history.record("curl 'a'".to_string(), failure("x")).await;

        assert_eq!(history.get(entry.id).await, Some(entry.clone()));
        assert!(history.remove(entry.id).await);
        assert!(!history.remove(entry.id).await);
        assert_eq!(history.get(entry.id).await, None);
    }

    #[tokio::test]
    async fn test_clear_keeps_ids_increasing() {
        let history = History::default();
        let before = history.record("curl 'a'".to_string(), failure("x")).await;
        history.clear().await;
        assert!(history.list().await.is_empty());

        let after = history.record("curl 'b'".to_string(), failure("x")).await;
        assert!(after.id > before.id);
    }
}
