use crate::error::StoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier of one commit.
///
/// Ids produced by one store sort lexicographically in commit order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(String);

impl RevisionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Zero-padded form of a commit sequence number.
    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("{seq:020}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The current value of a key and the commit that wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned {
    pub revision: RevisionId,
    pub value: Vec<u8>,
}

/// One historical value of a key. `value` is `None` for a deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub revision: RevisionId,
    pub value: Option<Vec<u8>>,
}

/// A set of writes applied atomically, guarded by the revisions they were computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSet {
    reads: Vec<(String, Option<RevisionId>)>,
    writes: Vec<(String, Vec<u8>)>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `key` to still be at `revision` (`None`: still absent) when committing.
    pub fn require(mut self, key: &str, revision: Option<RevisionId>) -> Self {
        self.reads.push((key.to_string(), revision));
        self
    }

    /// Stages `value` for `key`. A repeated key keeps its first position and its last value.
    pub fn put(mut self, key: &str, value: Vec<u8>) -> Self {
        match self.writes.iter_mut().find(|(k, _)| k.as_str() == key) {
            Some((_, staged)) => *staged = value,
            None => self.writes.push((key.to_string(), value)),
        }
        self
    }

    pub fn reads(&self) -> &[(String, Option<RevisionId>)] {
        &self.reads
    }

    pub fn writes(&self) -> &[(String, Vec<u8>)] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<(String, Vec<u8>)> {
        self.writes
    }
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<Versioned>>;

    /// Applies every write of `set` or none of them.
    ///
    /// Fails with `StoreError::Conflict` if any expected revision no longer matches.
    async fn commit(&self, set: WriteSet) -> StoreResult<RevisionId>;

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<RevisionId> {
        self.commit(WriteSet::new().put(key, value)).await
    }
}

/// Owned, single-pass iterator over a key's revisions, earliest first.
pub type HistoryIter = Box<dyn Iterator<Item = StoreResult<Revision>> + Send>;

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn history(&self, key: &str) -> StoreResult<HistoryIter>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
pub type HistoryProviderBox = Box<dyn HistoryProvider>;
