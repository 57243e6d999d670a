//! Persisted history of recent short links
//!
//! [`HistoryStore`] keeps at most [`HISTORY_LIMIT`] records, newest first, and writes
//! the whole list through to its [`HistoryBackend`] on every mutation. A mutation only
//! replaces the in-memory list after the write succeeded, so both views stay identical.

use std::sync::{Arc, Mutex, PoisonError};

use redb::{Database, ReadableDatabase};

use crate::database::{HISTORY_KEY, TABLE_HISTORY};
use crate::error::StoreError;
use crate::model::ShortLinkRecord;

/// Maximum number of records kept
pub const HISTORY_LIMIT: usize = 20;

/// Durable key-value slot holding the serialized history
pub trait HistoryBackend: Send {
    /// Current stored value, `None` when nothing was ever written
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Overwrites the stored value
    fn write(&self, contents: &str) -> Result<(), StoreError>;
}

/// Backend storing the history in a redb database
#[derive(Clone)]
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Expects a database prepared by [`crate::database::init_db`]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn read_value(&self) -> Result<Option<String>, redb::Error> {
        // Begin a read-only transaction
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_HISTORY)?;

        // Look up the single history entry
        let value = table.get(HISTORY_KEY)?.map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn write_value(&self, contents: &str) -> Result<(), redb::Error> {
        // Begin a write transaction
        let write_txn = self.db.begin_write()?;
        {
            // Overwrite the whole list under the fixed key
            let mut table = write_txn.open_table(TABLE_HISTORY)?;
            table.insert(HISTORY_KEY, contents)?;
        }

        // Commit the transaction to persist the data
        write_txn.commit()?;
        Ok(())
    }
}

impl HistoryBackend for RedbBackend {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read_value()?)
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        Ok(self.write_value(contents)?)
    }
}

/// In-process backend for tests
///
/// Clones share the same slot, so loading a second store from a clone behaves like a
/// reload of the same storage.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-filled with raw contents, valid or not
    pub fn with_contents(contents: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(contents.to_string()))),
        }
    }

    /// Raw stored value
    pub fn contents(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl HistoryBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(contents.to_string());
        Ok(())
    }
}

/// Capped, newest-first list of short links with write-through persistence
pub struct HistoryStore {
    backend: Box<dyn HistoryBackend>,
    records: Vec<ShortLinkRecord>,
}

impl HistoryStore {
    /// Rehydrates the history from `backend`
    ///
    /// Missing, unreadable or corrupt data yields an empty history. This never fails.
    pub fn load(backend: impl HistoryBackend + 'static) -> Self {
        let records = match backend.read() {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ShortLinkRecord>>(&raw) {
                Ok(mut records) => {
                    // Older storage may hold more than the cap
                    records.truncate(HISTORY_LIMIT);
                    records
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stored history is corrupt, starting empty");
                    Vec::new()
                }
            },
            // Nothing stored yet
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored history, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(count = records.len(), "history loaded");

        Self {
            backend: Box::new(backend),
            records,
        }
    }

    /// Records, newest first
    pub fn records(&self) -> &[ShortLinkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inserts `record` at the front, dropping anything beyond [`HISTORY_LIMIT`]
    pub fn append(&mut self, record: ShortLinkRecord) -> Result<(), StoreError> {
        let mut next = Vec::with_capacity(HISTORY_LIMIT + 1);
        next.push(record);
        next.extend(self.records.iter().cloned());
        next.truncate(HISTORY_LIMIT);
        self.commit(next)
    }

    /// Removes the record at `index` and returns it
    ///
    /// An invalid index leaves both the list and the storage untouched.
    pub fn remove_at(&mut self, index: usize) -> Result<ShortLinkRecord, StoreError> {
        if index >= self.records.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }

        let mut next = self.records.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    /// Empties the history, returning how many records were dropped
    pub fn clear(&mut self) -> Result<usize, StoreError> {
        let count = self.records.len();
        self.commit(Vec::new())?;
        Ok(count)
    }

    /// Writes the current list to the backend, overwriting the previous value
    pub fn persist(&self) -> Result<(), StoreError> {
        Self::write_records(self.backend.as_ref(), &self.records)
    }

    fn write_records(
        backend: &dyn HistoryBackend,
        records: &[ShortLinkRecord],
    ) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(records)?;
        backend.write(&encoded)
    }

    fn commit(&mut self, next: Vec<ShortLinkRecord>) -> Result<(), StoreError> {
        // Storage first; memory only changes once the write succeeded
        Self::write_records(self.backend.as_ref(), &next)?;
        self.records = next;
        Ok(())
    }
}
