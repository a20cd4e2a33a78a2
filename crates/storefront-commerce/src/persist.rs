//! Glue between the in-memory engines and the snapshot store.
//!
//! Engines mutate state first and then call [`Persistence::save`]; the state
//! transition itself never touches storage.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use storefront_cache::{Cache, CacheError, Snapshot, SnapshotWriter};

use crate::error::CommerceError;

/// Engine state that can be rehydrated from a snapshot.
///
/// Decoding only checks the shape of a record; `validate` checks the
/// invariants the state's own mutators maintain.
pub trait Restorable: DeserializeOwned + Default {
    fn validate(&self) -> Result<(), CommerceError> {
        Ok(())
    }
}

/// Per-engine persistence handle: record key, writer and revision counter.
pub struct Persistence {
    key: String,
    writer: Arc<dyn SnapshotWriter>,
    revision: u64,
}

impl Persistence {
    /// Persist under `key` through `writer`, starting at revision 0.
    pub fn new(key: impl Into<String>, writer: Arc<dyn SnapshotWriter>) -> Self {
        Self {
            key: key.into(),
            writer,
            revision: 0,
        }
    }

    /// Continue numbering after a restored revision.
    pub(crate) fn resume_at(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    /// Record key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Revision of the last submitted snapshot.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Hand a snapshot of `state` to the writer under the next revision.
    pub fn save<T: Serialize>(&mut self, state: &T) {
        self.revision += 1;
        match Snapshot::new(self.revision, state).to_pending(self.key.as_str()) {
            Ok(write) => self.writer.submit(write),
            Err(e) => {
                tracing::warn!(key = %self.key, revision = self.revision, error = %e, "failed to encode snapshot")
            }
        }
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("key", &self.key)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

/// Load the state stored under `key`, with its revision.
///
/// A missing or schema-mismatched record yields the default state at
/// revision 0. An unreadable record, or one that fails
/// [`Restorable::validate`], yields the default state at the stored revision
/// so new writes replace it. Failures are logged rather than returned so
/// startup never blocks on a bad record.
pub(crate) fn restore<T: Restorable>(cache: &Cache, key: &str) -> (T, u64) {
    match cache.load_snapshot::<T>(key) {
        Ok(Some(snapshot)) => match snapshot.data.validate() {
            Ok(()) => {
                tracing::debug!(key, revision = snapshot.revision, "restored snapshot");
                (snapshot.data, snapshot.revision)
            }
            Err(e) => {
                tracing::warn!(key, revision = snapshot.revision, error = %e, "discarding inconsistent snapshot");
                (T::default(), snapshot.revision)
            }
        },
        Ok(None) => (T::default(), 0),
        Err(e @ CacheError::SchemaMismatch { .. }) => {
            tracing::warn!(key, error = %e, "discarding snapshot from another schema version");
            (T::default(), 0)
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to restore snapshot; starting fresh");
            let revision = cache
                .get::<serde_json::Value>(key)
                .ok()
                .flatten()
                .and_then(|v| v.get("revision")?.as_u64())
                .unwrap_or(0);
            (T::default(), revision)
        }
    }
}
