//! Ordered snapshot writers.
//!
//! Engines hand every post-mutation snapshot to a [`SnapshotWriter`] and move
//! on. Writers guarantee that a later snapshot is never replaced by an earlier
//! one: [`Cache`] writes inline and refuses stale revisions, and
//! [`BackgroundWriter`] drains one queue with a single task so at most one
//! write is in flight.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::{Cache, CacheError};

/// A serialized snapshot waiting to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    /// Record key.
    pub key: String,
    /// Revision of the snapshot in `bytes`.
    pub revision: u64,
    /// Serialized snapshot envelope.
    pub bytes: Vec<u8>,
}

/// Fire-and-forget sink for engine snapshots.
pub trait SnapshotWriter: Send + Sync {
    /// Queue or perform the write. Failures are logged, not returned.
    fn submit(&self, write: PendingWrite);
}

impl SnapshotWriter for Cache {
    fn submit(&self, write: PendingWrite) {
        match self.persist(&write) {
            Ok(true) => {
                tracing::trace!(key = %write.key, revision = write.revision, "snapshot stored")
            }
            Ok(false) => {
                tracing::debug!(key = %write.key, revision = write.revision, "stale snapshot skipped")
            }
            Err(e) => {
                tracing::warn!(key = %write.key, revision = write.revision, error = %e, "snapshot write failed")
            }
        }
    }
}

enum Command {
    Write(PendingWrite),
    Flush(oneshot::Sender<()>),
}

/// Writes snapshots off the caller's thread, strictly in submission order.
///
/// Must be created inside a Tokio runtime.
#[derive(Clone)]
pub struct BackgroundWriter {
    tx: mpsc::UnboundedSender<Command>,
}

impl BackgroundWriter {
    /// Spawn the writer task over `cache`.
    ///
    /// The task ends once every `BackgroundWriter` clone is dropped and the
    /// queue is drained.
    pub fn spawn(cache: Cache) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Command::Write(write) => {
                        let cache = cache.clone();
                        let result =
                            tokio::task::spawn_blocking(move || cache.submit(write)).await;
                        if let Err(e) = result {
                            tracing::error!(error = %e, "snapshot write task panicked");
                        }
                    }
                    Command::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });

        (Self { tx }, handle)
    }

    /// Wait until every write submitted before this call has been stored.
    pub async fn flush(&self) -> Result<(), CacheError> {
        let (done, wait) = oneshot::channel();
        self.tx
            .send(Command::Flush(done))
            .map_err(|_| CacheError::WriterClosed)?;
        wait.await.map_err(|_| CacheError::WriterClosed)
    }
}

impl SnapshotWriter for BackgroundWriter {
    fn submit(&self, write: PendingWrite) {
        if self.tx.send(Command::Write(write)).is_err() {
            tracing::warn!("snapshot writer closed; write dropped");
        }
    }
}

impl std::fmt::Debug for BackgroundWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundWriter").finish_non_exhaustive()
    }
}
