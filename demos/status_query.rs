use std::net::IpAddr;

use netstatus::{ProbeTarget, ReachabilitySource, StatusMonitor, SystemSource};

fn main() -> netstatus::Result<()> {
    env_logger::init();

    // Raw capability flags for the wildcard target
    let mut source = SystemSource::new()?;
    println!("Capability flags: {}", source.flags()?);

    // Flags narrowed to one host's address family
    let host: IpAddr = "1.1.1.1".parse().expect("valid address");
    let mut host_source = SystemSource::for_target(ProbeTarget::Host(host))?;
    println!("Flags toward {host}: {}", host_source.flags()?);

    // The one-shot status answer most applications want
    let monitor = StatusMonitor::new();
    println!("Connectivity: {}", monitor.status());
    println!("Online: {}", monitor.is_online());

    Ok(())
}
