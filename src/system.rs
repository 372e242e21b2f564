//! Built-in flag source backed by the operating system.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::flags::ReachabilityFlags;
use crate::platform;
use crate::probe::{FlagCallback, ProbeTarget, ReachabilitySource};
use crate::{Error, Result};

/// Default interval between polls of the platform network state.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Flag source deriving capability flags from the operating system's
/// interface and routing state.
///
/// Reads are on-demand snapshots. Once a callback is registered, a watcher
/// thread polls at a configurable interval and pushes every flag change to
/// the callback.
pub struct SystemSource {
    target: ProbeTarget,
    interval: Duration,
    watcher: Option<Watcher>,
}

/// Handle to a running watcher thread. Clearing the flag makes the thread
/// wind down at its next wakeup.
struct Watcher {
    running: Arc<AtomicBool>,
}

impl SystemSource {
    /// Create a source probing the wildcard target.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform network state cannot be
    /// inspected.
    pub fn new() -> Result<Self> {
        Self::for_target(ProbeTarget::Any)
    }

    /// Create a source probing a specific target.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform network state cannot be
    /// inspected.
    pub fn for_target(target: ProbeTarget) -> Result<Self> {
        // Creation doubles as the first capability read; a target we
        // cannot inspect now will not become inspectable later.
        platform::probe_flags(target).map_err(|e| Error::probe_creation(e.to_string()))?;

        Ok(Self {
            target,
            interval: DEFAULT_POLL_INTERVAL,
            watcher: None,
        })
    }

    /// Set the interval between polls of the platform network state.
    #[must_use]
    pub const fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl ReachabilitySource for SystemSource {
    fn flags(&mut self) -> Result<ReachabilityFlags> {
        platform::probe_flags(self.target)
    }

    fn set_callback(&mut self, callback: FlagCallback) -> Result<()> {
        self.clear_callback();

        let running = Arc::new(AtomicBool::new(true));
        let watcher_running = Arc::clone(&running);
        let target = self.target;
        let interval = self.interval;

        thread::Builder::new()
            .name("netstatus-watch".into())
            .spawn(move || {
                let mut previous: Option<ReachabilityFlags> = None;
                while watcher_running.load(Ordering::Acquire) {
                    match platform::probe_flags(target) {
                        Ok(flags) => {
                            if previous != Some(flags) {
                                if let Some(previous) = previous {
                                    debug!("capability flags changed: {previous} -> {flags}");
                                }
                                previous = Some(flags);
                                callback(flags);
                            }
                        }
                        // Keep the last snapshot so recovering to the same
                        // flags is not reported as a change.
                        Err(e) => warn!("failed to read capability flags: {e}"),
                    }
                    thread::sleep(interval);
                }
            })
            .map_err(|e| Error::callback_registration(e.to_string()))?;

        self.watcher = Some(Watcher { running });
        debug!("watching {target:?} every {interval:?}");
        Ok(())
    }

    fn clear_callback(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.running.store(false, Ordering::Release);
        }
    }
}

impl Drop for SystemSource {
    fn drop(&mut self) {
        self.clear_callback();
    }
}
