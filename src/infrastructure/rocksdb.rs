use crate::domain::ports::{
    HistoryIter, HistoryProvider, LedgerStore, Revision, RevisionId, Versioned, WriteSet,
};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch,
};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Column Family holding the current value of every key.
pub const CF_STATE: &str = "state";
/// Column Family holding every revision of every key.
pub const CF_HISTORY: &str = "history";
/// Column Family holding store metadata (the commit counter).
pub const CF_META: &str = "meta";

const SEQUENCE_KEY: &[u8] = b"sequence";

/// A persistent versioned store implementation using RocksDB.
///
/// State values are prefixed with the big-endian sequence of the commit that
/// wrote them. History keys are `len(key) || key || sequence`, which keeps each
/// key's revisions contiguous and in commit order.
///
/// Commits are serialized by a lock around the commit counter and written as a
/// single `WriteBatch`. `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    sequence: Arc<Mutex<u64>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures the required column families exist and restores the commit counter.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_STATE, CF_HISTORY, CF_META]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path.as_ref(), descriptors)?;

        let sequence = {
            let meta = db.cf_handle(CF_META).ok_or_else(|| {
                StoreError::Backend(format!("Column family {CF_META} not found"))
            })?;
            match db.get_cf(meta, SEQUENCE_KEY)? {
                Some(bytes) => decode_sequence(&bytes)?,
                None => 0,
            }
        };

        tracing::info!(path = ?path.as_ref(), sequence, "Opened RocksDB ledger store");

        Ok(Self {
            db: Arc::new(db),
            sequence: Arc::new(Mutex::new(sequence)),
        })
    }

    fn cf_handle(&self, name: &str) -> StoreResult<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Backend(format!("Column family {name} not found")))
    }

    fn read_state(&self, key: &str) -> StoreResult<Option<Versioned>> {
        let cf = self.cf_handle(CF_STATE)?;
        match self.db.get_cf(cf, key.as_bytes())? {
            Some(bytes) => {
                if bytes.len() < 8 {
                    return Err(StoreError::Corrupt(format!(
                        "state entry for '{key}' is missing its revision"
                    )));
                }
                let (seq, value) = bytes.split_at(8);
                Ok(Some(Versioned {
                    revision: RevisionId::from_sequence(decode_sequence(seq)?),
                    value: value.to_vec(),
                }))
            }
            None => Ok(None),
        }
    }

    fn commit_blocking(&self, set: WriteSet) -> StoreResult<RevisionId> {
        let mut sequence = self
            .sequence
            .lock()
            .map_err(|_| StoreError::Backend("commit lock poisoned".to_string()))?;

        for (key, expected) in set.reads() {
            let current = self.read_state(key)?.map(|v| v.revision);
            if current != *expected {
                return Err(StoreError::Conflict { key: key.clone() });
            }
        }

        let next = *sequence + 1;
        let cf_state = self.cf_handle(CF_STATE)?;
        let cf_history = self.cf_handle(CF_HISTORY)?;
        let cf_meta = self.cf_handle(CF_META)?;

        let mut batch = WriteBatch::default();
        for (key, value) in set.into_writes() {
            let mut state_value = next.to_be_bytes().to_vec();
            state_value.extend_from_slice(&value);
            batch.put_cf(cf_state, key.as_bytes(), &state_value);

            let mut history_key = history_prefix(&key);
            history_key.extend_from_slice(&next.to_be_bytes());
            batch.put_cf(cf_history, &history_key, &value);
        }
        batch.put_cf(cf_meta, SEQUENCE_KEY, next.to_be_bytes());

        self.db.write(batch)?;
        *sequence = next;

        Ok(RevisionId::from_sequence(next))
    }

    fn history_blocking(&self, key: &str) -> StoreResult<Vec<StoreResult<Revision>>> {
        let cf = self.cf_handle(CF_HISTORY)?;
        let prefix = history_prefix(key);
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(prefix.as_slice(), Direction::Forward));

        let mut revisions = Vec::new();
        for item in iter {
            let (k, v) = match item {
                Ok(entry) => entry,
                Err(e) => {
                    revisions.push(Err(e.into()));
                    break;
                }
            };
            if !k.starts_with(&prefix) {
                break;
            }
            let revision = decode_sequence(&k[prefix.len()..]).map(|seq| Revision {
                revision: RevisionId::from_sequence(seq),
                value: Some(v.into_vec()),
            });
            let failed = revision.is_err();
            revisions.push(revision);
            if failed {
                break;
            }
        }
        Ok(revisions)
    }
}

fn history_prefix(key: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(4 + key.len() + 8);
    prefix.extend_from_slice(&(key.len() as u32).to_be_bytes());
    prefix.extend_from_slice(key.as_bytes());
    prefix
}

fn decode_sequence(bytes: &[u8]) -> StoreResult<u64> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| {
        StoreError::Corrupt(format!("invalid sequence of {} bytes", bytes.len()))
    })?;
    Ok(u64::from_be_bytes(raw))
}

#[async_trait]
impl LedgerStore for RocksDBStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Versioned>> {
        self.read_state(key)
    }

    async fn commit(&self, set: WriteSet) -> StoreResult<RevisionId> {
        self.commit_blocking(set)
    }
}

#[async_trait]
impl HistoryProvider for RocksDBStore {
    async fn history(&self, key: &str) -> StoreResult<HistoryIter> {
        let revisions = self.history_blocking(key)?;
        Ok(Box::new(revisions.into_iter()))
    }
}
