//! Last-known connectivity status with optional change notifications.
//!
//! [`StatusMonitor`] reads capability flags once at construction, stores
//! the interpreted status for synchronous queries, and optionally keeps a
//! subscription that re-interprets every flag update and invokes a handler
//! on status transitions. All handler invocations run on one dedicated
//! delivery thread, in order.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

use log::{debug, warn};

use crate::flags::ReachabilityFlags;
use crate::probe::ReachabilitySource;
use crate::status::Status;
use crate::system::SystemSource;
use crate::Result;

/// Callback invoked with the new and the previous status after a change.
///
/// The first invocation after subscribing repeats the current status in
/// both arguments.
pub type StatusCallback = Box<dyn Fn(Status, Status) + Send + 'static>;

/// Lock-free cell holding the current status.
struct StatusCell(AtomicU8);

impl StatusCell {
    const ONLINE: u8 = 0;
    const CELLULAR: u8 = 1;
    const OFFLINE: u8 = 2;
    const UNKNOWN: u8 = 3;

    fn new(status: Status) -> Self {
        Self(AtomicU8::new(Self::encode(status)))
    }

    const fn encode(status: Status) -> u8 {
        match status {
            Status::Online => Self::ONLINE,
            Status::Cellular => Self::CELLULAR,
            Status::Offline => Self::OFFLINE,
            Status::Unknown => Self::UNKNOWN,
        }
    }

    const fn decode(bits: u8) -> Status {
        match bits {
            Self::ONLINE => Status::Online,
            Self::CELLULAR => Status::Cellular,
            Self::OFFLINE => Status::Offline,
            _ => Status::Unknown,
        }
    }

    fn load(&self) -> Status {
        Self::decode(self.0.load(Ordering::Acquire))
    }

    fn store(&self, status: Status) {
        self.0.store(Self::encode(status), Ordering::Release);
    }
}

/// State shared between the monitor, the delivery thread, and the source
/// callback.
struct Shared {
    status: StatusCell,
    disposed: AtomicBool,
}

/// Monitors connectivity and answers `status()` queries from any thread.
///
/// Constructors never fail: when the platform state cannot be inspected
/// the monitor reports [`Status::Unknown`] instead of returning an error.
/// A change handler, when supplied, is first invoked immediately with the
/// freshly read status in both arguments and afterwards once per status
/// transition, always on the monitor's delivery thread.
///
/// Dropping the monitor stops the subscription and releases the platform
/// probe; [`StatusMonitor::stop`] does the same explicitly.
pub struct StatusMonitor {
    shared: Arc<Shared>,
    source: Mutex<Option<Box<dyn ReachabilitySource>>>,
}

impl StatusMonitor {
    /// Create a monitor for the wildcard target without change
    /// notifications.
    ///
    /// The status is read once here; it does not refresh on later queries.
    #[must_use]
    pub fn new() -> Self {
        Self::build(
            SystemSource::new().map(|source| Box::new(source) as Box<dyn ReachabilitySource>),
            None,
        )
    }

    /// Create a monitor for the wildcard target that invokes `handler` on
    /// every status transition.
    ///
    /// The handler is invoked once immediately with the initial status in
    /// both arguments, then with `(new, previous)` per transition.
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(Status, Status) + Send + 'static,
    {
        Self::build(
            SystemSource::new().map(|source| Box::new(source) as Box<dyn ReachabilitySource>),
            Some(Box::new(handler)),
        )
    }

    /// Create a monitor backed by a custom flag source.
    pub fn with_source<S>(source: S, handler: Option<StatusCallback>) -> Self
    where
        S: ReachabilitySource + 'static,
    {
        Self::build(Ok(Box::new(source) as Box<dyn ReachabilitySource>), handler)
    }

    /// Returns the last interpreted status.
    ///
    /// Never blocks and is safe to call from any thread, including after
    /// [`StatusMonitor::stop`].
    #[must_use]
    pub fn status(&self) -> Status {
        self.shared.status.load()
    }

    /// Returns `true` if the last interpreted status has connectivity.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.status().is_online()
    }

    /// Stop watching for changes and release the platform probe.
    ///
    /// Idempotent and safe to call from any thread. After this returns no
    /// new handler invocations are started; one already executing may
    /// complete. [`StatusMonitor::status`] keeps answering with the last
    /// value. Dropping the monitor calls this automatically.
    pub fn stop(&self) {
        self.shared.disposed.store(true, Ordering::Release);
        if let Ok(mut slot) = self.source.lock() {
            if let Some(mut source) = slot.take() {
                source.clear_callback();
                debug!("connectivity subscription stopped");
            }
        }
    }

    fn build(source: Result<Box<dyn ReachabilitySource>>, handler: Option<StatusCallback>) -> Self {
        let monitor = Self {
            shared: Arc::new(Shared {
                status: StatusCell::new(Status::Unknown),
                disposed: AtomicBool::new(false),
            }),
            source: Mutex::new(None),
        };

        let mut source = match source {
            Ok(source) => source,
            Err(e) => {
                warn!("failed to create reachability probe: {e}");
                return monitor;
            }
        };

        let initial = match source.flags() {
            Ok(flags) => flags.interpret(),
            Err(e) => {
                // A probe whose flags cannot be read is dead; drop it
                // instead of subscribing to it.
                warn!("failed to read initial capability flags: {e}");
                return monitor;
            }
        };
        monitor.shared.status.store(initial);
        debug!("initial connectivity status: {initial}");

        match handler {
            Some(handler) => monitor.subscribe(source, handler, initial),
            None => {
                if let Ok(mut slot) = monitor.source.lock() {
                    *slot = Some(source);
                }
            }
        }

        monitor
    }

    fn subscribe(
        &self,
        mut source: Box<dyn ReachabilitySource>,
        handler: StatusCallback,
        initial: Status,
    ) {
        let (tx, rx) = channel::<ReachabilityFlags>();
        let shared = Arc::clone(&self.shared);

        let delivery = thread::Builder::new()
            .name("netstatus-delivery".into())
            .spawn(move || run_delivery(&rx, &handler, &shared, initial));
        if let Err(e) = delivery {
            warn!("failed to start delivery thread: {e}");
            self.shared.status.store(Status::Unknown);
            if let Ok(mut slot) = self.source.lock() {
                *slot = Some(source);
            }
            return;
        }

        // Source contexts only hand the flags over; interpretation and the
        // handler run on the delivery thread.
        let forward = Box::new(move |flags: ReachabilityFlags| {
            let _ = tx.send(flags);
        });

        if let Err(e) = source.set_callback(forward) {
            warn!("failed to register reachability callback: {e}");
            self.shared.status.store(Status::Unknown);
        }

        if let Ok(mut slot) = self.source.lock() {
            *slot = Some(source);
        }
    }
}

impl Default for StatusMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StatusMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Delivery thread body: one immediate repeat of the initial status, then
/// one handler invocation per status transition, in channel order.
fn run_delivery(
    rx: &Receiver<ReachabilityFlags>,
    handler: &StatusCallback,
    shared: &Arc<Shared>,
    initial: Status,
) {
    if !shared.disposed.load(Ordering::Acquire) {
        handler(initial, initial);
    }

    while let Ok(flags) = rx.recv() {
        if shared.disposed.load(Ordering::Acquire) {
            break;
        }
        let next = flags.interpret();
        let previous = shared.status.load();
        if next == previous {
            continue;
        }
        // Publish before invoking so the handler observes the fresh
        // status through queries.
        shared.status.store(next);
        debug!("connectivity status changed: {previous} -> {next}");
        handler(next, previous);
    }
}
