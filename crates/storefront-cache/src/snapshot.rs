//! Versioned snapshot envelope for persisted engine state.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::writer::PendingWrite;
use crate::{Cache, CacheError};

/// Current layout version of persisted engine records.
pub const SCHEMA_VERSION: u32 = 1;

/// A persisted engine state plus the metadata needed to order writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    /// Layout version the record was written with.
    pub schema_version: u32,
    /// Per-engine monotonically increasing write counter.
    pub revision: u64,
    /// The engine state.
    pub data: T,
}

impl<T> Snapshot<T> {
    /// Wrap `data` at the current schema version.
    pub fn new(revision: u64, data: T) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            revision,
            data,
        }
    }
}

impl<T: Serialize> Snapshot<T> {
    /// Serialize into a write request for `key`.
    pub fn to_pending(&self, key: impl Into<String>) -> Result<PendingWrite, CacheError> {
        Ok(PendingWrite {
            key: key.into(),
            revision: self.revision,
            bytes: serde_json::to_vec(self)?,
        })
    }
}

/// Envelope metadata only; `data` is skipped.
#[derive(Deserialize)]
struct SnapshotHeader {
    schema_version: u32,
    revision: u64,
}

impl Cache {
    /// Load the snapshot stored under `key`.
    ///
    /// Fails with [`CacheError::SchemaMismatch`] when the record was written
    /// by a different layout version.
    pub fn load_snapshot<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<Snapshot<T>>, CacheError> {
        let Some(bytes) = self.raw_get(key)? else {
            return Ok(None);
        };

        let header: SnapshotHeader = serde_json::from_slice(&bytes)?;
        if header.schema_version != SCHEMA_VERSION {
            return Err(CacheError::SchemaMismatch {
                key: key.to_string(),
                found: header.schema_version,
                expected: SCHEMA_VERSION,
            });
        }

        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Store a serialized snapshot unless a newer revision is already stored.
    ///
    /// Returns `false` when the write was stale and skipped. Callers must
    /// funnel writes for one key through a single writer; the
    /// read-compare-write here is not atomic across writers.
    pub fn persist(&self, write: &PendingWrite) -> Result<bool, CacheError> {
        if let Some(existing) = self.raw_get(&write.key)? {
            // An unreadable record is overwritten rather than blocking progress.
            if let Ok(header) = serde_json::from_slice::<SnapshotHeader>(&existing) {
                if header.schema_version == SCHEMA_VERSION && header.revision > write.revision {
                    return Ok(false);
                }
            }
        }
        self.raw_set(&write.key, &write.bytes)?;
        Ok(true)
    }
}
