//! Change detection and observer fan-out.
//!
//! The refresh scheduler never talks to observers directly. After a committed
//! change it asks a [`NotificationHub`] whether anyone observes the path and,
//! if so, hands it a [`Notification`]. [`ObserveRegistry`] is the in-process
//! hub: observers register a path and receive notifications on a bounded
//! channel until their [`ObserverHandle`] is dropped.
//!
//! ```text
//! refresh tick ──commit──► NotificationHub::has_active_observers(path)?
//!                                   │ yes
//!                                   ▼
//!                          NotificationHub::notify(path, n)
//!                                   │ try_send per observer
//!                                   ▼
//!                          ObserverHandle receivers
//! ```

mod detector;
mod registry;

pub use detector::*;
pub use registry::*;


use bytes::Bytes;
#[cfg(test)]
use mockall::automock;

use crate::resource::ContentFormat;

/// One change pushed to the observers of a path
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub path: String,
    /// Observe sequence number; the resource's counter after this dispatch
    pub sequence: u64,
    pub payload: Bytes,
    pub format: ContentFormat,
}

/// Observer bookkeeping owned by the protocol engine.
#[cfg_attr(test, automock)]
pub trait NotificationHub: Send + Sync + 'static {
    fn has_active_observers(
        &self,
        path: &str,
    ) -> bool;

    /// Delivers `notification` to the current observers of `path`.
    ///
    /// Returns `true` when the notification was dispatched.
    fn notify(
        &self,
        path: &str,
        notification: Notification,
    ) -> bool;
}
