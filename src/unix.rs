use std::collections::HashMap;

use nix::ifaddrs::getifaddrs;
use nix::net::if_::InterfaceFlags;

use crate::platform::{is_global_v4, is_global_v6, wanted_families};
use crate::probe::ProbeTarget;
use crate::{Error, ReachabilityFlags, Result};

/// Interface name prefixes of mobile broadband links
const CELLULAR_PREFIXES: [&str; 4] = ["wwan", "wwp", "rmnet", "ppp"];

/// Addresses found on one usable interface
#[derive(Default)]
struct IfaceState {
    cellular: bool,
    v4: bool,
    v6: bool,
}

/// Derive capability flags for `target` from interface and routing state.
///
/// An interface counts when it is up, running, not loopback, and carries
/// an address of a wanted family off the local segment. On Linux the
/// default route decides which interface actually carries traffic; the
/// connection-management flags stay clear because interface inspection
/// has no on-demand dialing signal.
pub(crate) fn probe_flags(target: ProbeTarget) -> Result<ReachabilityFlags> {
    let addrs = getifaddrs().map_err(|e| Error::flag_read(e.to_string()))?;

    let mut interfaces: HashMap<String, IfaceState> = HashMap::new();
    for entry in addrs {
        if entry.flags.contains(InterfaceFlags::IFF_LOOPBACK) {
            continue;
        }
        if !entry.flags.contains(InterfaceFlags::IFF_UP)
            || !entry.flags.contains(InterfaceFlags::IFF_RUNNING)
        {
            continue;
        }

        let state = interfaces.entry(entry.interface_name.clone()).or_default();
        state.cellular = is_cellular_name(&entry.interface_name);

        if let Some(address) = entry.address {
            if let Some(v4) = address.as_sockaddr_in() {
                if is_global_v4(v4.ip()) {
                    state.v4 = true;
                }
            } else if let Some(v6) = address.as_sockaddr_in6() {
                if is_global_v6(v6.ip()) {
                    state.v6 = true;
                }
            }
        }
    }

    let (want_v4, want_v6) = wanted_families(target);

    #[cfg(target_os = "linux")]
    let flags = route_backed_flags(&interfaces, want_v4, want_v6);

    #[cfg(not(target_os = "linux"))]
    let flags = interface_backed_flags(&interfaces, want_v4, want_v6);

    Ok(flags)
}

fn is_cellular_name(name: &str) -> bool {
    CELLULAR_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// The interface owning the default route is the path traffic actually
/// takes; without a default route the wildcard target is out of reach no
/// matter how many interfaces are up.
#[cfg(target_os = "linux")]
fn route_backed_flags(
    interfaces: &HashMap<String, IfaceState>,
    want_v4: bool,
    want_v6: bool,
) -> ReachabilityFlags {
    // Stale routes can outlive their interface; require it up and
    // carrying an address of the route's family as well.
    let mut routed = None;
    if want_v4 {
        routed = default_route_interface_v4()
            .and_then(|name| interfaces.get(&name))
            .filter(|state| state.v4);
    }
    if routed.is_none() && want_v6 {
        routed = default_route_interface_v6()
            .and_then(|name| interfaces.get(&name))
            .filter(|state| state.v6);
    }

    let mut flags = ReachabilityFlags::default();
    if let Some(state) = routed {
        flags.reachable = true;
        flags.is_cellular = state.cellular;
    }
    flags
}

/// Without a routing table to consult, any usable interface counts as a
/// path to the target.
#[cfg(not(target_os = "linux"))]
fn interface_backed_flags(
    interfaces: &HashMap<String, IfaceState>,
    want_v4: bool,
    want_v6: bool,
) -> ReachabilityFlags {
    let usable: Vec<&IfaceState> = interfaces
        .values()
        .filter(|state| (want_v4 && state.v4) || (want_v6 && state.v6))
        .collect();

    let mut flags = ReachabilityFlags::default();
    if !usable.is_empty() {
        flags.reachable = true;
        // Only call the path metered when no unmetered interface could
        // carry the traffic instead.
        flags.is_cellular = usable.iter().all(|state| state.cellular);
    }
    flags
}

/// Routes with this bit set are usable (RTF_UP).
#[cfg(target_os = "linux")]
const ROUTE_FLAG_UP: u32 = 0x0001;

/// Find the interface owning the IPv4 default route.
///
/// /proc/net/route lists one route per line after a header:
/// `Iface Destination Gateway Flags RefCnt Use Metric Mask ...`
/// with destination and mask as little-endian hex. The default route has
/// destination and mask both zero.
#[cfg(target_os = "linux")]
fn default_route_interface_v4() -> Option<String> {
    let table = std::fs::read_to_string("/proc/net/route").ok()?;

    for line in table.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 8 {
            continue;
        }
        let route_flags = match u32::from_str_radix(fields[3], 16) {
            Ok(flags) => flags,
            Err(_) => continue,
        };
        if fields[1] == "00000000" && fields[7] == "00000000" && route_flags & ROUTE_FLAG_UP != 0 {
            return Some(fields[0].to_string());
        }
    }

    None
}

/// Find the interface owning the IPv6 default route.
///
/// /proc/net/ipv6_route has no header; each line is
/// `dest prefixlen src prefixlen nexthop metric refcnt use flags device`.
/// The default route has an all-zero destination with prefix length zero.
#[cfg(target_os = "linux")]
fn default_route_interface_v6() -> Option<String> {
    let table = std::fs::read_to_string("/proc/net/ipv6_route").ok()?;

    for line in table.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 {
            continue;
        }
        let route_flags = match u32::from_str_radix(fields[8], 16) {
            Ok(flags) => flags,
            Err(_) => continue,
        };
        if fields[0] == "00000000000000000000000000000000"
            && fields[1] == "00"
            && route_flags & ROUTE_FLAG_UP != 0
            && fields[9] != "lo"
        {
            return Some(fields[9].to_string());
        }
    }

    None
}
