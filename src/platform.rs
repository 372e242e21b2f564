//! Platform dispatch for capability-flag derivation.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::probe::ProbeTarget;

#[cfg(unix)]
pub(crate) use crate::unix::probe_flags;
#[cfg(windows)]
pub(crate) use crate::windows::probe_flags;

/// Address families a probe target cares about, as `(v4, v6)`.
pub(crate) const fn wanted_families(target: ProbeTarget) -> (bool, bool) {
    match target {
        ProbeTarget::Any => (true, true),
        ProbeTarget::Host(IpAddr::V4(_)) => (true, false),
        ProbeTarget::Host(IpAddr::V6(_)) => (false, true),
    }
}

/// An address that proves a path off the local segment. Loopback,
/// unspecified, and link-local addresses do not count; a 169.254.0.0/16
/// address in particular means address autoconfiguration fell back after
/// DHCP failed.
pub(crate) fn is_global_v4(ip: Ipv4Addr) -> bool {
    !ip.is_unspecified() && !ip.is_loopback() && !ip.is_link_local()
}

/// IPv6 counterpart of [`is_global_v4`]; fe80::/10 is link-local.
pub(crate) fn is_global_v6(ip: Ipv6Addr) -> bool {
    !ip.is_unspecified() && !ip.is_loopback() && (ip.segments()[0] & 0xffc0) != 0xfe80
}
