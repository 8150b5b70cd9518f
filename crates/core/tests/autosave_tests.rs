// ═══════════════════════════════════════════════════════════════════
// Autosave Tests: debounce queue bookkeeping and the tokio driver
// ═══════════════════════════════════════════════════════════════════

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use finplay_core::errors::CoreError;
use finplay_core::models::student::StudentData;
use finplay_core::storage::encryption::KdfParams;
use finplay_core::storage::manager::LocalStore;
use finplay_core::sync::autosave::{
    AutosaveQueue, AutosaveStats, Autosaver, SaveTarget, WriteResult,
};

const DEBOUNCE: Duration = Duration::from_millis(100);

// ── Test target ─────────────────────────────────────────────────────

/// Records every value it is asked to save and how many saves overlap.
#[derive(Default)]
struct RecordingTarget {
    saved: Mutex<Vec<u32>>,
    failing: AtomicBool,
    delay: Duration,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl RecordingTarget {
    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    fn failing() -> Self {
        let target = Self::default();
        target.failing.store(true, Ordering::SeqCst);
        target
    }

    fn saved(&self) -> Vec<u32> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl SaveTarget<u32> for RecordingTarget {
    fn name(&self) -> &str {
        "recording"
    }

    async fn save(&self, value: &u32) -> Result<(), CoreError> {
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::Network("offline".into()));
        }
        self.saved.lock().unwrap().push(*value);
        Ok(())
    }
}

/// Fails every write, for `StudentData` snapshots.
struct DownTarget;

#[async_trait]
impl SaveTarget<StudentData> for DownTarget {
    fn name(&self) -> &str {
        "down"
    }

    async fn save(&self, _value: &StudentData) -> Result<(), CoreError> {
        Err(CoreError::Network("offline".into()))
    }
}

// ── Queue ───────────────────────────────────────────────────────────

mod queue {
    use super::*;

    #[test]
    fn starts_idle() {
        let q: AutosaveQueue<u32> = AutosaveQueue::new(DEBOUNCE);
        assert!(q.is_idle());
        assert!(q.next_deadline().is_none());
        assert_eq!(q.stats(), AutosaveStats::default());
    }

    #[test]
    fn releases_after_debounce() {
        let t0 = Instant::now();
        let mut q = AutosaveQueue::new(DEBOUNCE);
        q.schedule(1u32, t0);
        assert_eq!(q.next_deadline(), Some(t0 + DEBOUNCE));
        assert!(q.take_ready(t0 + DEBOUNCE / 2).is_none());

        let ticket = q.take_ready(t0 + DEBOUNCE).unwrap();
        assert_eq!(ticket.seq, 1);
        assert_eq!(ticket.value, 1);
        assert_eq!(q.in_flight(), Some(1));
        assert!(!q.has_pending());
    }

    #[test]
    fn latest_snapshot_wins_and_restarts_delay() {
        let t0 = Instant::now();
        let mut q = AutosaveQueue::new(DEBOUNCE);
        q.schedule(1u32, t0);
        q.schedule(2, t0 + Duration::from_millis(60));
        assert!(q.take_ready(t0 + DEBOUNCE).is_none());

        let ticket = q.take_ready(t0 + Duration::from_millis(160)).unwrap();
        assert_eq!(ticket.value, 2);
        let stats = q.stats();
        assert_eq!((stats.scheduled, stats.coalesced, stats.writes_started), (2, 1, 1));
    }

    #[test]
    fn single_write_in_flight() {
        let t0 = Instant::now();
        let mut q = AutosaveQueue::new(DEBOUNCE);
        q.schedule(1u32, t0);
        let first = q.take_ready(t0 + DEBOUNCE).unwrap();

        q.schedule(2, t0 + DEBOUNCE);
        assert!(q.next_deadline().is_none());
        assert!(q.take_ready(t0 + DEBOUNCE * 10).is_none());
        assert!(q.flush().is_none());
        assert!(q.has_pending());

        q.complete(first.seq, WriteResult::Saved).unwrap();
        let second = q.take_ready(t0 + DEBOUNCE * 10).unwrap();
        assert_eq!((second.seq, second.value), (2, 2));
    }

    #[test]
    fn flush_skips_delay() {
        let t0 = Instant::now();
        let mut q = AutosaveQueue::new(Duration::from_secs(3600));
        q.schedule(5u32, t0);
        assert_eq!(q.flush().unwrap().value, 5);
        assert!(q.flush().is_none());
    }

    #[test]
    fn flush_with_nothing_pending() {
        let mut q: AutosaveQueue<u32> = AutosaveQueue::new(DEBOUNCE);
        assert!(q.flush().is_none());
        assert!(q.is_idle());
    }

    #[test]
    fn complete_checks_sequence() {
        let t0 = Instant::now();
        let mut q = AutosaveQueue::new(DEBOUNCE);
        assert!(matches!(q.complete(1, WriteResult::Saved), Err(CoreError::ValidationError(_))));
        q.schedule(1u32, t0);
        let ticket = q.flush().unwrap();
        assert!(q.complete(ticket.seq + 1, WriteResult::Saved).is_err());
        assert_eq!(q.in_flight(), Some(ticket.seq));
        q.complete(ticket.seq, WriteResult::Saved).unwrap();
        assert!(q.is_idle());
    }

    #[test]
    fn results_are_counted() {
        let t0 = Instant::now();
        let mut q = AutosaveQueue::new(DEBOUNCE);
        for (value, result) in [
            (1u32, WriteResult::Saved),
            (2, WriteResult::SavedToFallback),
            (3, WriteResult::Failed),
        ] {
            q.schedule(value, t0);
            let ticket = q.flush().unwrap();
            q.complete(ticket.seq, result).unwrap();
        }
        let stats = q.stats();
        assert_eq!((stats.saved, stats.saved_to_fallback, stats.failed), (1, 1, 1));
        assert_eq!(stats.writes_started, 3);
    }
}

// ── Driver ──────────────────────────────────────────────────────────

mod driver {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_is_written_once() {
        let target = Arc::new(RecordingTarget::default());
        let saver = Autosaver::<u32>::spawn(DEBOUNCE, target.clone(), None);
        for v in 1..=5u32 {
            saver.schedule(v).unwrap();
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(target.saved().is_empty());

        tokio::time::sleep(DEBOUNCE * 2).await;
        assert_eq!(target.saved(), vec![5]);

        let stats = saver.shutdown().await.unwrap();
        assert_eq!(stats.scheduled, 5);
        assert_eq!(stats.coalesced, 4);
        assert_eq!(stats.saved, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn writes_never_overlap() {
        let target = Arc::new(RecordingTarget::slow(Duration::from_millis(300)));
        let saver = Autosaver::<u32>::spawn(DEBOUNCE, target.clone(), None);

        saver.schedule(1).unwrap();
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(50)).await;
        // first write is now in progress
        saver.schedule(2).unwrap();
        saver.schedule(3).unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        let stats = saver.shutdown().await.unwrap();
        assert_eq!(target.saved(), vec![1, 3]);
        assert_eq!(target.max_active.load(Ordering::SeqCst), 1);
        assert_eq!(stats.writes_started, 2);
        assert_eq!(stats.coalesced, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_write_goes_to_fallback() {
        let primary = Arc::new(RecordingTarget::failing());
        let fallback = Arc::new(RecordingTarget::default());
        let saver = Autosaver::<u32>::spawn(DEBOUNCE, primary.clone(), Some(fallback.clone() as Arc<dyn SaveTarget<u32>>));

        saver.schedule(7).unwrap();
        saver.flush().await.unwrap();

        assert!(primary.saved().is_empty());
        assert_eq!(fallback.saved(), vec![7]);
        let stats = saver.shutdown().await.unwrap();
        assert_eq!(stats.saved_to_fallback, 1);
        assert_eq!(stats.saved, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_without_fallback_is_counted() {
        let primary = Arc::new(RecordingTarget::failing());
        let saver = Autosaver::<u32>::spawn(DEBOUNCE, primary, None);
        saver.schedule(1).unwrap();
        saver.flush().await.unwrap();
        let stats = saver.shutdown().await.unwrap();
        assert_eq!(stats.failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_writes_immediately() {
        let target = Arc::new(RecordingTarget::default());
        let saver = Autosaver::<u32>::spawn(Duration::from_secs(3600), target.clone(), None);
        saver.schedule(9).unwrap();
        let before = Instant::now();
        saver.flush().await.unwrap();
        assert_eq!(target.saved(), vec![9]);
        assert!(Instant::now() - before < Duration::from_secs(1));
        saver.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_writes_pending_snapshot() {
        let target = Arc::new(RecordingTarget::default());
        let saver = Autosaver::<u32>::spawn(Duration::from_secs(3600), target.clone(), None);
        saver.schedule(4).unwrap();
        let stats = saver.shutdown().await.unwrap();
        assert_eq!(target.saved(), vec![4]);
        assert_eq!(stats.saved, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_shutdown_writes_nothing() {
        let target = Arc::new(RecordingTarget::default());
        let saver = Autosaver::<u32>::spawn(DEBOUNCE, target.clone(), None);
        let stats = saver.shutdown().await.unwrap();
        assert_eq!(stats, AutosaveStats::default());
        assert!(target.saved().is_empty());
    }

    #[tokio::test]
    async fn local_store_catches_offline_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            LocalStore::new(dir.path().join("autosave.fnpl"), "pw").with_kdf(KdfParams::light()),
        );
        let saver = Autosaver::<StudentData>::spawn(
            Duration::from_millis(5),
            Arc::new(DownTarget),
            Some(store.clone() as Arc<dyn SaveTarget<StudentData>>),
        );

        let mut data = StudentData::default();
        data.portfolio.cash = 4_321.0;
        saver.schedule(data).unwrap();
        saver.flush().await.unwrap();

        assert_eq!(store.load().unwrap().portfolio.cash, 4_321.0);
        assert_eq!(saver.shutdown().await.unwrap().saved_to_fallback, 1);
    }

    #[tokio::test]
    async fn local_store_save_leaves_runtime_thread_free() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            LocalStore::new(dir.path().join("blocking.fnpl"), "pw").with_kdf(KdfParams::light());
        let ticks = Arc::new(AtomicU32::new(0));
        let ticker = tokio::spawn({
            let ticks = ticks.clone();
            async move {
                loop {
                    ticks.fetch_add(1, Ordering::Relaxed);
                    tokio::task::yield_now().await;
                }
            }
        });

        let data = StudentData::default();
        SaveTarget::save(&store, &data).await.unwrap();
        ticker.abort();

        assert!(ticks.load(Ordering::Relaxed) > 0);
        assert_eq!(store.load().unwrap(), data);
    }
}
