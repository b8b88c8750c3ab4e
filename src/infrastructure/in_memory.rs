use crate::domain::ports::{
    HistoryIter, HistoryProvider, LedgerStore, Revision, RevisionId, Versioned, WriteSet,
};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Log {
    next_sequence: u64,
    keys: HashMap<String, Vec<Revision>>,
}

impl Log {
    fn current(&self, key: &str) -> Option<&Revision> {
        self.keys.get(key).and_then(|revisions| revisions.last())
    }

    fn current_revision(&self, key: &str) -> Option<RevisionId> {
        self.current(key)
            .filter(|r| r.value.is_some())
            .map(|r| r.revision.clone())
    }

    fn append(&mut self, key: String, value: Option<Vec<u8>>, revision: &RevisionId) {
        self.keys.entry(key).or_default().push(Revision {
            revision: revision.clone(),
            value,
        });
    }

    fn next_revision(&mut self) -> RevisionId {
        self.next_sequence += 1;
        RevisionId::from_sequence(self.next_sequence)
    }
}

/// A thread-safe in-memory versioned key-value store.
///
/// Every write is appended to the key's revision log, so the full history stays
/// available for replay. Cloning shares the same log.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    log: Arc<RwLock<Log>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tombstone for `key`. Later reads see the key as absent.
    pub async fn delete(&self, key: &str) -> StoreResult<RevisionId> {
        let mut log = self.log.write().await;
        let revision = log.next_revision();
        log.append(key.to_string(), None, &revision);
        Ok(revision)
    }

    /// Number of revisions recorded for `key`, tombstones included.
    pub async fn revision_count(&self, key: &str) -> usize {
        let log = self.log.read().await;
        log.keys.get(key).map_or(0, Vec::len)
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Versioned>> {
        let log = self.log.read().await;
        Ok(log.current(key).and_then(|r| {
            r.value.as_ref().map(|value| Versioned {
                revision: r.revision.clone(),
                value: value.clone(),
            })
        }))
    }

    async fn commit(&self, set: WriteSet) -> StoreResult<RevisionId> {
        let mut log = self.log.write().await;

        for (key, expected) in set.reads() {
            if log.current_revision(key) != *expected {
                return Err(StoreError::Conflict { key: key.clone() });
            }
        }

        let revision = log.next_revision();
        for (key, value) in set.into_writes() {
            log.append(key, Some(value), &revision);
        }
        Ok(revision)
    }
}

#[async_trait]
impl HistoryProvider for InMemoryLedgerStore {
    async fn history(&self, key: &str) -> StoreResult<HistoryIter> {
        let log = self.log.read().await;
        let revisions = log.keys.get(key).cloned().unwrap_or_default();
        Ok(Box::new(revisions.into_iter().map(Ok)))
    }
}
