//! Shared test support: a flag source the test script drives by hand.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use netstatus::{Error, FlagCallback, ReachabilityFlags, ReachabilitySource, Result};

/// State shared between the source handed to the monitor and the script
/// handle kept by the test.
struct ScriptState {
    flags: Mutex<ReachabilityFlags>,
    callback: Mutex<Option<FlagCallback>>,
}

/// A scripted flag source. The paired [`Script`] handle changes the flags
/// and fires the registered callback, standing in for the platform's own
/// notification context.
pub struct ScriptedSource {
    state: Arc<ScriptState>,
    fail_reads: bool,
    fail_subscribe: bool,
}

/// Test-side handle controlling a [`ScriptedSource`].
pub struct Script(Arc<ScriptState>);

impl ScriptedSource {
    pub fn new(initial: ReachabilityFlags) -> (Self, Script) {
        let state = Arc::new(ScriptState {
            flags: Mutex::new(initial),
            callback: Mutex::new(None),
        });
        let source = Self {
            state: Arc::clone(&state),
            fail_reads: false,
            fail_subscribe: false,
        };
        (source, Script(state))
    }

    /// A source whose every flag read fails.
    pub fn failing_reads() -> (Self, Script) {
        let (mut source, script) = Self::new(ReachabilityFlags::default());
        source.fail_reads = true;
        (source, script)
    }

    /// A source that reads fine but rejects callback registration.
    pub fn failing_subscribe(initial: ReachabilityFlags) -> (Self, Script) {
        let (mut source, script) = Self::new(initial);
        source.fail_subscribe = true;
        (source, script)
    }
}

impl ReachabilitySource for ScriptedSource {
    fn flags(&mut self) -> Result<ReachabilityFlags> {
        if self.fail_reads {
            return Err(Error::flag_read("scripted failure"));
        }
        Ok(*self.state.flags.lock().unwrap())
    }

    fn set_callback(&mut self, callback: FlagCallback) -> Result<()> {
        if self.fail_subscribe {
            return Err(Error::callback_registration("scripted failure"));
        }
        *self.state.callback.lock().unwrap() = Some(callback);
        Ok(())
    }

    fn clear_callback(&mut self) {
        self.state.callback.lock().unwrap().take();
    }
}

impl Script {
    /// Change the flags and notify the registered callback, if any.
    pub fn set_flags(&self, flags: ReachabilityFlags) {
        *self.0.flags.lock().unwrap() = flags;
        if let Some(callback) = self.0.callback.lock().unwrap().as_ref() {
            callback(flags);
        }
    }

    /// Whether a callback is currently registered with the source.
    pub fn has_callback(&self) -> bool {
        self.0.callback.lock().unwrap().is_some()
    }
}
