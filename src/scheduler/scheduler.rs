use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::debug_span;
use tracing::info;
use tracing::trace;
use tracing::warn;
use tracing::Instrument;

use super::JitteredInterval;
use crate::config::IntervalRange;
use crate::observe::Notification;
use crate::observe::NotificationHub;
use crate::resource::Observable;
use crate::resource::Resource;

/// What a single refresh tick ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Sample unchanged, nothing committed
    Skipped,
    /// Committed, no observer to notify
    Committed,
    /// Committed and dispatched with this sequence number
    Notified(u64),
    /// Encoding failed, nothing committed
    Failed,
}

/// A registered observable resource and its refresh window.
pub struct ScheduleEntry {
    path: String,
    resource: Arc<dyn Resource>,
    interval: IntervalRange,
    stopped: Arc<AtomicBool>,
}

impl ScheduleEntry {
    /// `None` when the resource has no [`Observable`] capability.
    pub fn new(
        path: &str,
        resource: Arc<dyn Resource>,
    ) -> Option<Self> {
        let interval = resource.observable()?.interval();
        Some(Self {
            path: path.to_string(),
            resource,
            interval,
            stopped: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn interval(&self) -> IntervalRange {
        self.interval
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

struct EntryHandle {
    token: CancellationToken,
    stopped: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

/// Runs one supervised refresh task per observable resource.
///
/// Every task holds a child of the scheduler's root token. Cancellation is
/// cooperative: a tick that has started always completes, and no tick starts
/// once the token is cancelled.
pub struct Scheduler {
    root: CancellationToken,
    hub: Arc<dyn NotificationHub>,
    entries: DashMap<String, EntryHandle>,
}

impl Scheduler {
    pub fn new(
        hub: Arc<dyn NotificationHub>,
        root: CancellationToken,
    ) -> Self {
        Self {
            root,
            hub,
            entries: DashMap::new(),
        }
    }

    /// Spawns the refresh task for `entry`; the first tick runs immediately.
    ///
    /// Must be called from within a tokio runtime. Scheduling a path that
    /// already has a task replaces it.
    pub fn schedule(
        &self,
        entry: ScheduleEntry,
    ) {
        if self.is_stopped() {
            warn!(path = %entry.path, "scheduler stopped, refresh task not started");
            return;
        }

        self.cancel(&entry.path);

        let path = entry.path.clone();
        let token = self.root.child_token();
        let stopped = entry.stopped.clone();
        let hub = self.hub.clone();
        let span = debug_span!("refresh", path = %path);

        debug!(%path, interval = ?entry.interval, "refresh task scheduled");
        let task = tokio::spawn(run_entry(entry, hub, token.clone()).instrument(span));

        self.entries.insert(path, EntryHandle { token, stopped, task });
    }

    /// Stops the task of one path. Returns `false` if none was scheduled.
    pub fn cancel(
        &self,
        path: &str,
    ) -> bool {
        match self.entries.remove(path) {
            Some((_, handle)) => {
                handle.token.cancel();
                debug!(%path, "refresh task cancelled");
                true
            }
            None => false,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.root.is_cancelled()
    }

    pub fn is_scheduled(
        &self,
        path: &str,
    ) -> bool {
        self.entries
            .get(path)
            .map(|h| !h.stopped.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    /// Number of tasks that have not stopped yet.
    pub fn active_entries(&self) -> usize {
        self.entries
            .iter()
            .filter(|h| !h.stopped.load(Ordering::Acquire))
            .count()
    }

    /// Cancels every task and waits for in-flight ticks to finish.
    pub async fn shutdown(&self) {
        self.root.cancel();

        let paths: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        let tasks: Vec<JoinHandle<()>> = paths
            .iter()
            .filter_map(|p| self.entries.remove(p))
            .map(|(_, handle)| handle.task)
            .collect();

        let count = tasks.len();
        for result in join_all(tasks).await {
            if let Err(e) = result {
                warn!("refresh task ended abnormally: {:?}", e);
            }
        }
        info!(tasks = count, "scheduler stopped");
    }
}

async fn run_entry(
    entry: ScheduleEntry,
    hub: Arc<dyn NotificationHub>,
    token: CancellationToken,
) {
    let mut interval = JitteredInterval::new(entry.interval);

    if let Some(observable) = entry.resource.observable() {
        loop {
            tick(&entry.path, observable, hub.as_ref());

            if token.is_cancelled() {
                break;
            }

            let delay = interval.reset();
            trace!(?delay, "next refresh");

            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = tokio::time::sleep_until(interval.next_deadline()) => {}
            }
        }
    }

    entry.stopped.store(true, Ordering::Release);
    debug!(path = %entry.path, "refresh task stopped");
}

/// One refresh: sample and commit under the resource lock, then notify
/// observers outside of it.
pub(crate) fn tick(
    path: &str,
    observable: &dyn Observable,
    hub: &dyn NotificationHub,
) -> TickOutcome {
    let representation = match observable.refresh() {
        Ok(Some(representation)) => representation,
        Ok(None) => return TickOutcome::Skipped,
        Err(e) => {
            warn!(%path, "refresh skipped: {}", e);
            return TickOutcome::Failed;
        }
    };

    if !hub.has_active_observers(path) {
        return TickOutcome::Committed;
    }

    let sequence = observable.observe_counter() + 1;
    let notification = Notification {
        path: path.to_string(),
        sequence,
        payload: representation.payload,
        format: representation.format,
    };

    if hub.notify(path, notification) {
        observable.record_notification();
        TickOutcome::Notified(sequence)
    } else {
        TickOutcome::Committed
    }
}
