//! Async access to status changes (requires the `async` feature).
//!
//! The bridge forwards every status transition into a
//! [`tokio::sync::watch`] channel, so async tasks can `.changed().await`
//! instead of installing a callback.

use tokio::sync::watch;

use crate::monitor::{StatusCallback, StatusMonitor};
use crate::probe::ReachabilitySource;
use crate::status::Status;

/// Start monitoring the wildcard target and watch status changes.
///
/// The receiver starts at [`Status::Unknown`] and picks up the initial
/// status as its first change notification. Dropping the monitor stops
/// the subscription; once the last sender is gone,
/// [`watch::Receiver::changed`] resolves to an error.
#[must_use]
pub fn watch() -> (StatusMonitor, watch::Receiver<Status>) {
    let (tx, rx) = watch::channel(Status::Unknown);
    let monitor = StatusMonitor::with_handler(move |status, _previous| {
        let _ = tx.send(status);
    });
    (monitor, rx)
}

/// Like [`watch`], backed by a custom flag source.
#[must_use]
pub fn watch_with_source<S>(source: S) -> (StatusMonitor, watch::Receiver<Status>)
where
    S: ReachabilitySource + 'static,
{
    let (tx, rx) = watch::channel(Status::Unknown);
    let forward: StatusCallback = Box::new(move |status, _previous| {
        let _ = tx.send(status);
    });
    let monitor = StatusMonitor::with_source(source, Some(forward));
    (monitor, rx)
}
