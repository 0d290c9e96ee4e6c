//! Batch upload.
//!
//! Seals and uploads every entry on a fixed pool of workers fed by a
//! bounded queue. The first failure raises a shared cancellation signal:
//! the producer stops queueing, idle workers exit and in-flight uploads are
//! abandoned. Every task is joined before the report is returned.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::core::cipher::Sealer;
use crate::core::domain::{EncryptedSecret, SecretEntry};
use crate::error::{RemoteError, SyncError, UploadError};

/// Destination for sealed secrets
///
/// Implementations are shared by every worker, so they must be safe for
/// concurrent use.
pub trait SecretStore: Send + Sync + 'static {
    /// Create or update one secret
    fn put(
        &self,
        secret: &EncryptedSecret,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

/// Store that uploads nothing and records what it was given
#[derive(Debug, Default)]
pub struct DryRun {
    seen: Mutex<Vec<EncryptedSecret>>,
}

impl DryRun {
    /// Sealed secrets received so far, sorted by name
    pub fn seen(&self) -> Vec<EncryptedSecret> {
        let mut seen = self.seen.lock().map(|s| s.clone()).unwrap_or_default();
        seen.sort_by(|a, b| a.name().cmp(b.name()));
        seen
    }
}

impl SecretStore for DryRun {
    async fn put(&self, secret: &EncryptedSecret) -> Result<(), RemoteError> {
        debug!(name = secret.name(), "dry run, skipping upload");
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(secret.clone());
        }
        Ok(())
    }
}

/// Outcome of a batch upload
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Number of entries submitted
    pub total: usize,
    /// Names uploaded successfully
    pub uploaded: Vec<String>,
    /// Names that failed, with their errors
    pub failed: Vec<(String, UploadError)>,
    /// Names whose upload was abandoned after another failure
    pub cancelled: Vec<String>,
}

impl SyncReport {
    /// Entries never picked up by a worker
    pub fn skipped(&self) -> usize {
        self.total - self.uploaded.len() - self.failed.len() - self.cancelled.len()
    }

    /// Whether every entry was uploaded
    pub fn is_success(&self) -> bool {
        self.uploaded.len() == self.total
    }

    fn sort(&mut self) {
        self.uploaded.sort();
        self.failed.sort_by(|a, b| a.0.cmp(&b.0));
        self.cancelled.sort();
    }
}

struct Outcome {
    name: String,
    result: Result<(), UploadError>,
}

/// Seal and upload every entry with at most `workers` uploads in flight
///
/// Upload failures are reported in the returned [`SyncReport`], not as an
/// error.
///
/// # Errors
///
/// Returns `SyncError::Worker` if a worker task panicked.
pub async fn upload_all<S: SecretStore>(
    store: Arc<S>,
    sealer: Arc<Sealer>,
    entries: Vec<SecretEntry>,
    workers: usize,
) -> Result<SyncReport, SyncError> {
    let total = entries.len();
    let workers = workers.clamp(1, total.max(1));
    debug!(total, workers, "starting upload");

    let (queue_tx, queue_rx) = mpsc::channel::<SecretEntry>(workers);
    let queue_rx = Arc::new(tokio::sync::Mutex::new(queue_rx));
    let (results_tx, mut results_rx) = mpsc::unbounded_channel::<Outcome>();
    let (cancel_tx, cancel_rx) = watch::channel(false);

    let mut pool = JoinSet::new();
    for id in 0..workers {
        pool.spawn(worker(
            id,
            Arc::clone(&store),
            Arc::clone(&sealer),
            Arc::clone(&queue_rx),
            cancel_rx.clone(),
            results_tx.clone(),
        ));
    }
    drop(results_tx);

    let producer = tokio::spawn(feed(entries, queue_tx, cancel_rx));

    let mut report = SyncReport {
        total,
        ..SyncReport::default()
    };

    while let Some(Outcome { name, result }) = results_rx.recv().await {
        match result {
            Ok(()) => report.uploaded.push(name),
            Err(UploadError::Cancelled) => report.cancelled.push(name),
            Err(e) => {
                if report.failed.is_empty() {
                    warn!(name = %name, error = %e, "upload failed, cancelling remaining uploads");
                    let _ = cancel_tx.send(true);
                }
                report.failed.push((name, e));
            }
        }
    }

    producer.await?;
    while let Some(joined) = pool.join_next().await {
        joined?;
    }

    report.sort();
    debug!(
        uploaded = report.uploaded.len(),
        failed = report.failed.len(),
        cancelled = report.cancelled.len(),
        skipped = report.skipped(),
        "upload finished"
    );

    Ok(report)
}

/// Push entries onto the queue until done or cancelled
async fn feed(
    entries: Vec<SecretEntry>,
    queue: mpsc::Sender<SecretEntry>,
    mut cancel: watch::Receiver<bool>,
) {
    for entry in entries {
        tokio::select! {
            biased;
            _ = cancelled(&mut cancel) => break,
            sent = queue.send(entry) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }
}

async fn worker<S: SecretStore>(
    id: usize,
    store: Arc<S>,
    sealer: Arc<Sealer>,
    queue: Arc<tokio::sync::Mutex<mpsc::Receiver<SecretEntry>>>,
    mut cancel: watch::Receiver<bool>,
    results: mpsc::UnboundedSender<Outcome>,
) {
    loop {
        let next = {
            let mut queue = queue.lock().await;
            tokio::select! {
                biased;
                _ = cancelled(&mut cancel) => None,
                entry = queue.recv() => entry,
            }
        };

        let Some(entry) = next else {
            break;
        };

        debug!(worker = id, name = entry.name(), "uploading");
        let result = upload_one(store.as_ref(), &sealer, &entry, &mut cancel).await;
        let outcome = Outcome {
            name: entry.name().to_string(),
            result,
        };

        if results.send(outcome).is_err() {
            break;
        }
    }
}

async fn upload_one<S: SecretStore>(
    store: &S,
    sealer: &Sealer,
    entry: &SecretEntry,
    cancel: &mut watch::Receiver<bool>,
) -> Result<(), UploadError> {
    let sealed = sealer.seal(entry)?;

    tokio::select! {
        biased;
        _ = cancelled(cancel) => Err(UploadError::Cancelled),
        result = store.put(&sealed) => result.map_err(UploadError::from),
    }
}

/// Resolve once cancellation has been requested
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    loop {
        let raised = *cancel.borrow_and_update();
        if raised {
            return;
        }
        if cancel.changed().await.is_err() {
            // Coordinator gone: cancellation can no longer be raised.
            std::future::pending::<()>().await;
        }
    }
}
