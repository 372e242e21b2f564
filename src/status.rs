use std::fmt;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Connectivity status of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Status {
    /// Reachable over an unmetered path (ethernet, wifi, or any other
    /// non-cellular route)
    Online,
    /// Reachable over a metered cellular path
    Cellular,
    /// No usable route to the probe target
    Offline,
    /// Monitoring could not be initialized; connectivity is undetermined
    Unknown,
}

impl Status {
    /// Returns `true` if the device has connectivity, metered or not.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        matches!(self, Self::Online | Self::Cellular)
    }

    /// Returns `true` if connectivity goes over a metered cellular path.
    #[must_use]
    pub const fn is_metered(&self) -> bool {
        matches!(self, Self::Cellular)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Cellular => write!(f, "cellular"),
            Self::Offline => write!(f, "offline"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
