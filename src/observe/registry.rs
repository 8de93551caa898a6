use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;
use tracing::trace;

use super::Notification;
use super::NotificationHub;
use crate::config::ObserveConfig;
use crate::tree::normalize_path;

/// Internal observer state
#[derive(Debug)]
struct Observer {
    id: u64,
    sender: mpsc::Sender<Notification>,
}

#[derive(Debug)]
struct RegistryInner {
    /// Observers grouped by resource path
    observers: DashMap<String, Vec<Observer>>,

    /// Next observer ID (monotonically increasing)
    next_id: AtomicU64,

    config: ObserveConfig,
}

/// Handle for a registered observer relation
///
/// When dropped, the relation is removed from the registry.
pub struct ObserverHandle {
    id: u64,
    path: String,
    receiver: mpsc::Receiver<Notification>,
    registry: Arc<RegistryInner>,
}

impl ObserverHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn receiver_mut(&mut self) -> &mut mpsc::Receiver<Notification> {
        &mut self.receiver
    }

    /// Waits for the next notification; `None` once the resource is gone.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.receiver.recv().await
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        // Atomically drop the relation and the path entry once it is empty,
        // so a concurrent register never lands in a removed list.
        self.registry.observers.remove_if_mut(&self.path, |_path, observers| {
            observers.retain(|o| o.id != self.id);
            observers.is_empty()
        });
        trace!(observer_id = self.id, path = %self.path, "observer unregistered");
    }
}

/// In-process [`NotificationHub`] keeping observer relations per path.
///
/// Cloning is cheap and every clone shares the same relations.
///
/// # Delivery
///
/// Notifications are pushed with `try_send`: when an observer's buffer is
/// full that observer misses the notification and is expected to re-read
/// the resource. A slow observer never blocks the refresh task.
#[derive(Debug, Clone)]
pub struct ObserveRegistry {
    inner: Arc<RegistryInner>,
}

impl ObserveRegistry {
    pub fn new(config: ObserveConfig) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                observers: DashMap::new(),
                next_id: AtomicU64::new(1),
                config,
            }),
        }
    }

    /// Registers an observer relation on `path`.
    pub fn register(
        &self,
        path: &str,
    ) -> ObserverHandle {
        let path = normalize_path(path);
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let buffer_size = self.inner.config.observer_buffer_size;
        let (sender, receiver) = mpsc::channel(buffer_size);

        self.inner
            .observers
            .entry(path.clone())
            .or_default()
            .push(Observer { id, sender });

        trace!(observer_id = id, %path, buffer_size, "observer registered");

        ObserverHandle {
            id,
            path,
            receiver,
            registry: self.inner.clone(),
        }
    }

    /// Drops every relation on `path`; their receivers see the channel close.
    pub fn remove_path(
        &self,
        path: &str,
    ) {
        if let Some((path, observers)) = self.inner.observers.remove(path) {
            debug!(%path, observers = observers.len(), "observer relations dropped");
        }
    }

    pub fn observer_count(
        &self,
        path: &str,
    ) -> usize {
        self.inner.observers.get(path).map(|o| o.len()).unwrap_or(0)
    }

    pub fn observed_path_count(&self) -> usize {
        self.inner.observers.len()
    }
}

impl NotificationHub for ObserveRegistry {
    fn has_active_observers(
        &self,
        path: &str,
    ) -> bool {
        self.inner
            .observers
            .get(path)
            .map(|observers| !observers.is_empty())
            .unwrap_or(false)
    }

    fn notify(
        &self,
        path: &str,
        notification: Notification,
    ) -> bool {
        let Some(observers) = self.inner.observers.get(path) else {
            return false;
        };
        if observers.is_empty() {
            return false;
        }

        for observer in observers.iter() {
            match observer.sender.try_send(notification.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    debug!(observer_id = observer.id, %path, "observer buffer full, notification dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    trace!(observer_id = observer.id, %path, "observer channel closed");
                }
            }
        }

        trace!(
            %path,
            sequence = notification.sequence,
            observers = observers.len(),
            "notification dispatched"
        );
        true
    }
}
