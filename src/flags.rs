use std::fmt;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

use crate::status::Status;

/// Capability flags a flag source reports for a probe target.
///
/// The flags describe what the platform believes about routing to the
/// target, not liveness: `reachable` together with `connection_required`
/// means a route exists but a connection (dial-up, VPN, ...) must be
/// brought up before traffic can flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ReachabilityFlags {
    /// The target is reachable with the current network configuration
    pub reachable: bool,
    /// A connection must be established before traffic can flow
    pub connection_required: bool,
    /// The platform will establish the connection when something asks for it
    pub connection_on_demand: bool,
    /// The platform will establish the connection when traffic is first sent
    pub connection_on_traffic: bool,
    /// Establishing the connection needs user interaction (credentials, ...)
    pub intervention_required: bool,
    /// The route goes over a metered cellular interface
    pub is_cellular: bool,
}

impl ReachabilityFlags {
    /// Flags for a plain reachable, unmetered path.
    #[must_use]
    pub const fn unmetered() -> Self {
        Self {
            reachable: true,
            connection_required: false,
            connection_on_demand: false,
            connection_on_traffic: false,
            intervention_required: false,
            is_cellular: false,
        }
    }

    /// Flags for a reachable, metered cellular path.
    #[must_use]
    pub const fn cellular() -> Self {
        Self {
            reachable: true,
            connection_required: false,
            connection_on_demand: false,
            connection_on_traffic: false,
            intervention_required: false,
            is_cellular: true,
        }
    }

    /// A connection must be brought up before the target is reachable.
    #[must_use]
    pub const fn needs_connection(&self) -> bool {
        self.connection_required
    }

    /// The platform can bring the connection up without being asked.
    #[must_use]
    pub const fn can_auto_connect(&self) -> bool {
        self.connection_on_demand || self.connection_on_traffic
    }

    /// The platform can bring the connection up without user interaction.
    #[must_use]
    pub const fn can_auto_connect_silently(&self) -> bool {
        self.can_auto_connect() && !self.intervention_required
    }

    /// The target is usable right now, counting connections the platform
    /// will establish silently on its own.
    #[must_use]
    pub const fn is_reachable(&self) -> bool {
        self.reachable && (!self.needs_connection() || self.can_auto_connect_silently())
    }

    /// Interpret these flags into a connectivity [`Status`].
    ///
    /// Pure and total: every flag combination maps to exactly one of
    /// [`Status::Online`], [`Status::Cellular`] or [`Status::Offline`].
    /// [`Status::Unknown`] is never produced here; it is reserved for
    /// monitors whose initialization failed.
    #[must_use]
    pub const fn interpret(&self) -> Status {
        if !self.is_reachable() {
            Status::Offline
        } else if self.is_cellular {
            Status::Cellular
        } else {
            Status::Online
        }
    }
}

impl fmt::Display for ReachabilityFlags {
    /// One letter per flag, a dash when clear: `R----C` is a plain
    /// reachable cellular path.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}{}",
            if self.reachable { 'R' } else { '-' },
            if self.connection_required { 'c' } else { '-' },
            if self.connection_on_demand { 'd' } else { '-' },
            if self.connection_on_traffic { 't' } else { '-' },
            if self.intervention_required { 'i' } else { '-' },
            if self.is_cellular { 'C' } else { '-' },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a flag set from the low six bits of `bits`, one bit per field.
    fn flags_from_bits(bits: u8) -> ReachabilityFlags {
        ReachabilityFlags {
            reachable: bits & 0b00_0001 != 0,
            connection_required: bits & 0b00_0010 != 0,
            connection_on_demand: bits & 0b00_0100 != 0,
            connection_on_traffic: bits & 0b00_1000 != 0,
            intervention_required: bits & 0b01_0000 != 0,
            is_cellular: bits & 0b10_0000 != 0,
        }
    }

    #[test]
    fn test_not_reachable_is_always_offline() {
        // Whatever the other five flags say, a clear reachable bit wins.
        for bits in 0..64u8 {
            let flags = flags_from_bits(bits & !0b00_0001);
            assert_eq!(flags.interpret(), Status::Offline, "flags {flags}");
        }
    }

    #[test]
    fn test_plain_reachable_is_online() {
        assert_eq!(ReachabilityFlags::unmetered().interpret(), Status::Online);
    }

    #[test]
    fn test_reachable_cellular_is_cellular() {
        assert_eq!(ReachabilityFlags::cellular().interpret(), Status::Cellular);
    }

    #[test]
    fn test_connection_required_without_auto_connect_is_offline() {
        let mut flags = ReachabilityFlags::unmetered();
        flags.connection_required = true;
        assert_eq!(flags.interpret(), Status::Offline);
    }

    #[test]
    fn test_auto_connect_on_demand_counts_as_reachable() {
        let mut flags = ReachabilityFlags::unmetered();
        flags.connection_required = true;
        flags.connection_on_demand = true;
        assert_eq!(flags.interpret(), Status::Online);
    }

    #[test]
    fn test_auto_connect_on_traffic_counts_as_reachable() {
        let mut flags = ReachabilityFlags::unmetered();
        flags.connection_required = true;
        flags.connection_on_traffic = true;
        assert_eq!(flags.interpret(), Status::Online);

        // The same shape on a cellular base stays metered.
        let mut flags = ReachabilityFlags::cellular();
        flags.connection_required = true;
        flags.connection_on_traffic = true;
        assert_eq!(flags.interpret(), Status::Cellular);
    }

    #[test]
    fn test_intervention_required_blocks_auto_connect() {
        let mut flags = ReachabilityFlags::unmetered();
        flags.connection_required = true;
        flags.connection_on_demand = true;
        flags.intervention_required = true;
        assert_eq!(flags.interpret(), Status::Offline);
    }

    #[test]
    fn test_intervention_without_connection_required_is_ignored() {
        let mut flags = ReachabilityFlags::unmetered();
        flags.intervention_required = true;
        assert_eq!(flags.interpret(), Status::Online);
    }

    #[test]
    fn test_cellular_flag_ignored_when_offline() {
        let mut flags = ReachabilityFlags::default();
        flags.is_cellular = true;
        assert_eq!(flags.interpret(), Status::Offline);
    }

    #[test]
    fn test_interpret_never_yields_unknown() {
        for bits in 0..64u8 {
            assert_ne!(flags_from_bits(bits).interpret(), Status::Unknown);
        }
    }

    #[test]
    fn test_display_layout() {
        assert_eq!(ReachabilityFlags::default().to_string(), "------");
        assert_eq!(ReachabilityFlags::unmetered().to_string(), "R-----");
        assert_eq!(ReachabilityFlags::cellular().to_string(), "R----C");

        let mut flags = ReachabilityFlags::unmetered();
        flags.connection_required = true;
        flags.connection_on_traffic = true;
        flags.intervention_required = true;
        assert_eq!(flags.to_string(), "Rc-ti-");
    }

    #[cfg(feature = "serde-support")]
    #[test]
    fn test_serde_roundtrip() {
        let flags = ReachabilityFlags::cellular();
        let json = serde_json::to_string(&flags).unwrap();
        let back: ReachabilityFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flags);
    }
}
