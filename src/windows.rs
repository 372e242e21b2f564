use std::net::{Ipv4Addr, Ipv6Addr};
use std::ptr;

use winapi::shared::ifdef::IfOperStatusUp;
use winapi::shared::ipifcons::{IF_TYPE_SOFTWARE_LOOPBACK, IF_TYPE_WWANPP, IF_TYPE_WWANPP2};
use winapi::shared::winerror::{ERROR_BUFFER_OVERFLOW, ERROR_SUCCESS};
use winapi::shared::ws2def::{AF_INET, AF_INET6, AF_UNSPEC, SOCKADDR_IN};
use winapi::shared::ws2ipdef::SOCKADDR_IN6;
use winapi::um::iphlpapi::GetAdaptersAddresses;
use winapi::um::iptypes::{
    GAA_FLAG_SKIP_ANYCAST, GAA_FLAG_SKIP_DNS_SERVER, GAA_FLAG_SKIP_MULTICAST,
    IP_ADAPTER_ADDRESSES_LH,
};

use crate::platform::{is_global_v4, is_global_v6, wanted_families};
use crate::probe::ProbeTarget;
use crate::{Error, ReachabilityFlags, Result};

const GAA_FLAGS: u32 = GAA_FLAG_SKIP_ANYCAST | GAA_FLAG_SKIP_MULTICAST | GAA_FLAG_SKIP_DNS_SERVER;

/// Addresses found on one usable adapter
struct AdapterState {
    cellular: bool,
    v4: bool,
    v6: bool,
}

/// Derive capability flags for `target` from the adapter list.
///
/// An adapter counts when it is operationally up, not loopback, and
/// carries a unicast address of a wanted family off the local segment.
/// Mobile broadband adapters mark the path metered. The
/// connection-management flags stay clear because adapter inspection has
/// no on-demand dialing signal.
pub(crate) fn probe_flags(target: ProbeTarget) -> Result<ReachabilityFlags> {
    let adapters = adapter_states()?;
    let (want_v4, want_v6) = wanted_families(target);

    let usable: Vec<&AdapterState> = adapters
        .iter()
        .filter(|state| (want_v4 && state.v4) || (want_v6 && state.v6))
        .collect();

    let mut flags = ReachabilityFlags::default();
    if !usable.is_empty() {
        flags.reachable = true;
        // Only call the path metered when no unmetered adapter could
        // carry the traffic instead.
        flags.is_cellular = usable.iter().all(|state| state.cellular);
    }
    Ok(flags)
}

/// Walk the adapter list and keep the usable adapters.
fn adapter_states() -> Result<Vec<AdapterState>> {
    // Size probe first; the API reports the buffer it needs.
    let mut size = 0u32;
    let mut ret = unsafe {
        GetAdaptersAddresses(
            AF_UNSPEC as u32,
            GAA_FLAGS,
            ptr::null_mut(),
            ptr::null_mut(),
            &mut size,
        )
    };
    if ret != ERROR_SUCCESS && ret != ERROR_BUFFER_OVERFLOW {
        return Err(Error::flag_read(format!(
            "GetAdaptersAddresses sizing failed with code {ret}"
        )));
    }
    if size == 0 {
        return Ok(Vec::new());
    }

    // The adapter list needs 8-byte alignment, which a byte buffer does
    // not guarantee.
    let mut buffer = vec![0u64; (size as usize).div_ceil(8)];
    let adapter_addresses = buffer.as_mut_ptr().cast::<IP_ADAPTER_ADDRESSES_LH>();

    ret = unsafe {
        GetAdaptersAddresses(
            AF_UNSPEC as u32,
            GAA_FLAGS,
            ptr::null_mut(),
            adapter_addresses,
            &mut size,
        )
    };
    if ret != ERROR_SUCCESS {
        return Err(Error::flag_read(format!(
            "GetAdaptersAddresses failed with code {ret}"
        )));
    }

    // Process each adapter
    let mut states = Vec::new();
    let mut current = adapter_addresses;
    while !current.is_null() {
        let adapter = unsafe { &*current };
        current = adapter.Next;

        if adapter.OperStatus != IfOperStatusUp || adapter.IfType == IF_TYPE_SOFTWARE_LOOPBACK {
            continue;
        }

        let cellular = matches!(adapter.IfType, IF_TYPE_WWANPP | IF_TYPE_WWANPP2);
        let (v4, v6) = unicast_families(adapter);
        if v4 || v6 {
            states.push(AdapterState { cellular, v4, v6 });
        }
    }

    Ok(states)
}

/// Which address families the adapter carries off the local segment.
fn unicast_families(adapter: &IP_ADAPTER_ADDRESSES_LH) -> (bool, bool) {
    let mut v4 = false;
    let mut v6 = false;

    let mut current = adapter.FirstUnicastAddress;
    while !current.is_null() {
        let unicast = unsafe { &*current };
        current = unicast.Next;

        let sockaddr = unicast.Address.lpSockaddr;
        if sockaddr.is_null() {
            continue;
        }

        match i32::from(unsafe { (*sockaddr).sa_family }) {
            AF_INET => {
                let addr = unsafe { *sockaddr.cast::<SOCKADDR_IN>() };
                let raw = unsafe { *addr.sin_addr.S_un.S_addr() };
                if is_global_v4(Ipv4Addr::from(u32::from_be(raw))) {
                    v4 = true;
                }
            }
            AF_INET6 => {
                let addr = unsafe { *sockaddr.cast::<SOCKADDR_IN6>() };
                let bytes = unsafe { *addr.sin6_addr.u.Byte() };
                if is_global_v6(Ipv6Addr::from(bytes)) {
                    v6 = true;
                }
            }
            _ => {}
        }
    }

    (v4, v6)
}
