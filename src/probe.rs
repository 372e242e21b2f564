//! The seam between the status monitor and the platform.
//!
//! A [`ReachabilitySource`] hands out capability flags for one probe
//! target and, once a callback is registered, pushes flag updates from its
//! own background context. The built-in implementation is
//! [`crate::SystemSource`]; tests and embedders can provide their own.

use std::net::IpAddr;

#[cfg(test)]
use mockall::automock;

use crate::flags::ReachabilityFlags;
use crate::Result;

/// Callback a flag source invokes whenever capability flags may have changed.
pub type FlagCallback = Box<dyn Fn(ReachabilityFlags) + Send + 'static>;

/// What a flag source probes reachability for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProbeTarget {
    /// The wildcard target: the device's general routing status across
    /// both address families
    #[default]
    Any,
    /// One specific host; narrows flag derivation to the address family
    /// of the host
    Host(IpAddr),
}

/// A source of capability flags for one probe target.
///
/// Notifications are delivered on the source's own background context,
/// never on the thread that registered the callback. At most one callback
/// is registered at a time; registering a new one replaces the old.
#[cfg_attr(test, automock)]
pub trait ReachabilitySource: Send {
    /// Read the current capability flags for this source's target.
    fn flags(&mut self) -> Result<ReachabilityFlags>;

    /// Register `callback` for change notifications.
    fn set_callback(&mut self, callback: FlagCallback) -> Result<()>;

    /// Remove the registered callback.
    ///
    /// Idempotent. After this returns no new notifications are started;
    /// one already in flight may still complete.
    fn clear_callback(&mut self);
}
