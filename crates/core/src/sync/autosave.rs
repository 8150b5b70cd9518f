use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::traits::StudentApi;
use crate::errors::CoreError;
use crate::models::student::StudentData;
use crate::storage::manager::LocalStore;

/// Counters kept by the queue over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutosaveStats {
    /// Snapshots handed to `schedule`
    pub scheduled: u64,
    /// Snapshots replaced by a newer one before being written
    pub coalesced: u64,
    pub writes_started: u64,
    /// Writes accepted by the primary target
    pub saved: u64,
    /// Writes that failed on the primary but landed on the fallback
    pub saved_to_fallback: u64,
    /// Writes lost on every target
    pub failed: u64,
}

/// How a released write ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    Saved,
    SavedToFallback,
    Failed,
}

/// A snapshot released for writing. Hand `seq` back to `complete`.
#[derive(Debug)]
pub struct Ticket<T> {
    pub seq: u64,
    pub value: T,
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    scheduled_at: Instant,
}

/// Deferred-write queue.
///
/// Snapshots are coalesced (latest wins). A snapshot is released only once
/// the debounce delay has passed since the last `schedule` and no other
/// write is in flight, so at most one write is ever outstanding.
/// The queue does no I/O and reads no clock; callers pass `now`.
#[derive(Debug)]
pub struct AutosaveQueue<T> {
    debounce: Duration,
    pending: Option<Pending<T>>,
    in_flight: Option<u64>,
    next_seq: u64,
    stats: AutosaveStats,
}

impl<T> AutosaveQueue<T> {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
            in_flight: None,
            next_seq: 1,
            stats: AutosaveStats::default(),
        }
    }

    /// Queue a snapshot, replacing any unwritten one, and restart the delay.
    pub fn schedule(&mut self, value: T, now: Instant) {
        if self.pending.is_some() {
            self.stats.coalesced += 1;
        }
        self.stats.scheduled += 1;
        self.pending = Some(Pending {
            value,
            scheduled_at: now,
        });
    }

    /// When the pending snapshot becomes writable. `None` when nothing is
    /// pending or a write is still in flight.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.in_flight.is_some() {
            return None;
        }
        self.pending.as_ref().map(|p| p.scheduled_at + self.debounce)
    }

    /// Release the pending snapshot if its delay has elapsed.
    pub fn take_ready(&mut self, now: Instant) -> Option<Ticket<T>> {
        match self.next_deadline() {
            Some(deadline) if deadline <= now => self.release(),
            _ => None,
        }
    }

    /// Release the pending snapshot now, skipping the delay. Still
    /// respects the single in-flight write.
    pub fn flush(&mut self) -> Option<Ticket<T>> {
        if self.in_flight.is_some() {
            return None;
        }
        self.release()
    }

    /// Report the end of the write started with ticket `seq`.
    pub fn complete(&mut self, seq: u64, result: WriteResult) -> Result<(), CoreError> {
        if self.in_flight != Some(seq) {
            return Err(CoreError::ValidationError(format!(
                "write {seq} is not in flight"
            )));
        }
        self.in_flight = None;
        match result {
            WriteResult::Saved => self.stats.saved += 1,
            WriteResult::SavedToFallback => self.stats.saved_to_fallback += 1,
            WriteResult::Failed => self.stats.failed += 1,
        }
        Ok(())
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// Nothing pending and nothing in flight.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_none() && self.in_flight.is_none()
    }

    #[must_use]
    pub fn stats(&self) -> AutosaveStats {
        self.stats
    }

    fn release(&mut self) -> Option<Ticket<T>> {
        let pending = self.pending.take()?;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight = Some(seq);
        self.stats.writes_started += 1;
        Some(Ticket {
            seq,
            value: pending.value,
        })
    }
}

// ── Write targets ───────────────────────────────────────────────────

/// Somewhere a snapshot can be written.
#[async_trait]
pub trait SaveTarget<T: Send + Sync>: Send + Sync {
    fn name(&self) -> &str;

    async fn save(&self, value: &T) -> Result<(), CoreError>;
}

/// Pushes the page data of a snapshot to the API: investment record,
/// budget and savings goals.
pub struct ApiSaveTarget {
    api: Arc<dyn StudentApi>,
}

impl ApiSaveTarget {
    pub fn new(api: Arc<dyn StudentApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SaveTarget<StudentData> for ApiSaveTarget {
    fn name(&self) -> &str {
        self.api.name()
    }

    async fn save(&self, value: &StudentData) -> Result<(), CoreError> {
        self.api.save_investment(&value.portfolio).await?;
        self.api.save_budget(&value.budget).await?;
        self.api.save_savings_goals(&value.savings_goals).await
    }
}

#[async_trait]
impl SaveTarget<StudentData> for LocalStore {
    fn name(&self) -> &str {
        "local store"
    }

    /// Key derivation and file writes block, so they run on the blocking
    /// pool instead of the runtime thread.
    async fn save(&self, value: &StudentData) -> Result<(), CoreError> {
        let store = self.clone();
        let value = value.clone();
        tokio::task::spawn_blocking(move || LocalStore::save(&store, &value)).await?
    }
}

// ── Driver ──────────────────────────────────────────────────────────

enum Command<T> {
    Schedule(T),
    Flush(oneshot::Sender<()>),
    Shutdown,
}

/// Runs an `AutosaveQueue` on a tokio task.
///
/// Snapshots arrive over a channel; the task sleeps until the queue's next
/// deadline and performs each write itself, so writes never overlap.
/// A failed write is retried once on the fallback target, if any.
pub struct Autosaver<T> {
    tx: mpsc::UnboundedSender<Command<T>>,
    handle: JoinHandle<AutosaveStats>,
}

impl<T: Send + Sync + 'static> Autosaver<T> {
    /// Start the driver task. Must be called inside a tokio runtime.
    pub fn spawn(
        debounce: Duration,
        primary: Arc<dyn SaveTarget<T>>,
        fallback: Option<Arc<dyn SaveTarget<T>>>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Worker {
            queue: AutosaveQueue::new(debounce),
            primary,
            fallback,
        };
        let handle = tokio::spawn(worker.run(rx));
        Self { tx, handle }
    }

    /// Hand over a new snapshot.
    pub fn schedule(&self, value: T) -> Result<(), CoreError> {
        self.tx
            .send(Command::Schedule(value))
            .map_err(|_| CoreError::AutosaveClosed)
    }

    /// Write any pending snapshot now and wait for it to finish.
    pub async fn flush(&self) -> Result<(), CoreError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(ack_tx))
            .map_err(|_| CoreError::AutosaveClosed)?;
        ack_rx.await.map_err(|_| CoreError::AutosaveClosed)
    }

    /// Write any pending snapshot, stop the task and return its counters.
    pub async fn shutdown(self) -> Result<AutosaveStats, CoreError> {
        // The task may already be gone; the join below reports that.
        let _ = self.tx.send(Command::Shutdown);
        self.handle.await.map_err(|_| CoreError::AutosaveClosed)
    }
}

struct Worker<T> {
    queue: AutosaveQueue<T>,
    primary: Arc<dyn SaveTarget<T>>,
    fallback: Option<Arc<dyn SaveTarget<T>>>,
}

impl<T: Send + Sync + 'static> Worker<T> {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command<T>>) -> AutosaveStats {
        loop {
            let deadline = self.queue.next_deadline();
            tokio::select! {
                cmd = rx.recv() => match cmd {
                    Some(Command::Schedule(value)) => {
                        self.queue.schedule(value, Instant::now());
                        debug!(pending = true, "autosave scheduled");
                    }
                    Some(Command::Flush(ack)) => {
                        if let Some(ticket) = self.queue.flush() {
                            self.write(ticket).await;
                        }
                        let _ = ack.send(());
                    }
                    Some(Command::Shutdown) | None => {
                        if let Some(ticket) = self.queue.flush() {
                            self.write(ticket).await;
                        }
                        break;
                    }
                },
                () = wait_until(deadline) => {
                    if let Some(ticket) = self.queue.take_ready(Instant::now()) {
                        self.write(ticket).await;
                    }
                }
            }
        }
        let stats = self.queue.stats();
        info!(?stats, "autosave stopped");
        stats
    }

    async fn write(&mut self, ticket: Ticket<T>) {
        let result = match self.primary.save(&ticket.value).await {
            Ok(()) => {
                debug!(seq = ticket.seq, target = self.primary.name(), "autosave written");
                WriteResult::Saved
            }
            Err(primary_err) => {
                warn!(seq = ticket.seq, target = self.primary.name(), error = %primary_err, "autosave write failed");
                match &self.fallback {
                    Some(fallback) => match fallback.save(&ticket.value).await {
                        Ok(()) => {
                            info!(seq = ticket.seq, target = fallback.name(), "autosave written to fallback");
                            WriteResult::SavedToFallback
                        }
                        Err(e) => {
                            warn!(seq = ticket.seq, target = fallback.name(), error = %e, "autosave fallback failed");
                            WriteResult::Failed
                        }
                    },
                    None => WriteResult::Failed,
                }
            }
        };
        if let Err(e) = self.queue.complete(ticket.seq, result) {
            warn!(error = %e, "autosave bookkeeping out of step");
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}
