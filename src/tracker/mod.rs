//! API call tracker.
//!
//! Keeps a bounded, newest-first log of every request attempt made through the
//! dispatcher, plus a derived list of the attempts that ended in an error or a
//! timeout. Both lists can be observed through full-snapshot subscriptions.

mod entry;

pub use entry::*;

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Default number of retained log entries.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

type Listener = Arc<dyn Fn(&[LogEntry]) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    map: DashMap<u64, Listener>,
}

impl Listeners {
    fn add(&self, listener: Listener) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.map.insert(id, listener);
        id
    }

    fn notify(&self, snapshot: &[LogEntry]) {
        // Clone out so a callback can unsubscribe without deadlocking a shard.
        let listeners: Vec<Listener> = self.map.iter().map(|e| Arc::clone(e.value())).collect();
        for listener in listeners {
            listener(snapshot);
        }
    }
}

#[derive(Default)]
struct TrackerState {
    logs: VecDeque<LogEntry>,
    failures: VecDeque<LogEntry>,
}

/// Bounded record of request attempts with live subscriptions.
///
/// # Examples
///
/// ```
/// use livego::tracker::{ApiTracker, HttpMethod, LogStatus, LogUpdate};
///
/// let tracker = ApiTracker::new();
/// let id = tracker.add_log(HttpMethod::Get, "/users/me");
/// tracker.update_log(id, LogUpdate::failed(LogStatus::Error, "boom", Some(500)));
///
/// assert_eq!(tracker.logs()[0].status, LogStatus::Error);
/// assert_eq!(tracker.failures().len(), 1);
/// ```
pub struct ApiTracker {
    capacity: usize,
    next_id: AtomicU64,
    state: Mutex<TrackerState>,
    /// Held from mutation through notification so listeners see snapshots
    /// in the order they were taken.
    publish: Mutex<()>,
    log_listeners: Arc<Listeners>,
    failure_listeners: Arc<Listeners>,
}

impl ApiTracker {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            next_id: AtomicU64::new(1),
            state: Mutex::new(TrackerState::default()),
            publish: Mutex::new(()),
            log_listeners: Arc::new(Listeners::default()),
            failure_listeners: Arc::new(Listeners::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Register a pending attempt at the head of the log and return its id.
    pub fn add_log(&self, method: HttpMethod, endpoint: &str) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = LogEntry {
            id,
            method,
            endpoint: endpoint.to_string(),
            status: LogStatus::Pending,
            start_time: now_ms(),
            duration_ms: None,
            error: None,
            status_code: None,
        };

        let _publish = self.publish_lock();
        let snapshot = {
            let mut state = self.lock();
            state.logs.push_front(entry);
            state.logs.truncate(self.capacity);
            state.logs.iter().cloned().collect::<Vec<_>>()
        };

        self.log_listeners.notify(&snapshot);
        id
    }

    /// Merge `update` into the entry with `id`.
    ///
    /// Unknown ids (already evicted, or cleared) are skipped. A failing status
    /// also places the entry in the failure list, once per id.
    pub fn update_log(&self, id: u64, update: LogUpdate) {
        let _publish = self.publish_lock();
        let (logs, failures) = {
            let mut state = self.lock();
            let Some(entry) = state.logs.iter_mut().find(|e| e.id == id) else {
                tracing::debug!(log_id = id, "Log entry not found, skipping update");
                return;
            };
            entry.merge(update, now_ms());
            let updated = entry.clone();

            let failures = if updated.status.is_failure() {
                match state.failures.iter_mut().find(|f| f.id == id) {
                    Some(existing) => *existing = updated,
                    None => {
                        state.failures.push_back(updated);
                        while state.failures.len() > self.capacity {
                            state.failures.pop_front();
                        }
                    }
                }
                Some(state.failures.iter().cloned().collect::<Vec<_>>())
            } else {
                None
            };

            (state.logs.iter().cloned().collect::<Vec<_>>(), failures)
        };

        self.log_listeners.notify(&logs);
        if let Some(failures) = failures {
            self.failure_listeners.notify(&failures);
        }
    }

    pub fn clear_logs(&self) {
        let _publish = self.publish_lock();
        self.lock().logs.clear();
        self.log_listeners.notify(&[]);
    }

    pub fn clear_failures(&self) {
        let _publish = self.publish_lock();
        self.lock().failures.clear();
        self.failure_listeners.notify(&[]);
    }

    /// Copy of the log, newest first.
    pub fn logs(&self) -> Vec<LogEntry> {
        self.lock().logs.iter().cloned().collect()
    }

    /// Copy of the failure list, in insertion order.
    pub fn failures(&self) -> Vec<LogEntry> {
        self.lock().failures.iter().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Option<LogEntry> {
        self.lock().logs.iter().find(|e| e.id == id).cloned()
    }

    /// Receive the whole log after every mutation.
    ///
    /// Listeners run on the mutating thread and may read the tracker, but
    /// must not mutate it.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[LogEntry]) + Send + Sync + 'static,
    {
        let id = self.log_listeners.add(Arc::new(listener));
        Subscription::new(&self.log_listeners, id)
    }

    /// Receive the whole failure list after every change to it.
    pub fn subscribe_to_failures<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[LogEntry]) + Send + Sync + 'static,
    {
        let id = self.failure_listeners.add(Arc::new(listener));
        Subscription::new(&self.failure_listeners, id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish_lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.publish.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ApiTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for a registered listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    listeners: Weak<Listeners>,
    id: u64,
}

impl Subscription {
    fn new(listeners: &Arc<Listeners>, id: u64) -> Self {
        Self {
            listeners: Arc::downgrade(listeners),
            id,
        }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.map.remove(&self.id);
        }
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
