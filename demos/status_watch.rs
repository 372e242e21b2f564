use std::thread;
use std::time::Duration;

use netstatus::StatusMonitor;

fn main() {
    env_logger::init();

    let monitor = StatusMonitor::with_handler(|status, previous| {
        if status == previous {
            println!("Connectivity: {status}");
        } else {
            println!("Connectivity changed: {previous} -> {status}");
        }
    });

    println!("Watching connectivity for 60 seconds (toggle your network to see changes)...");
    thread::sleep(Duration::from_secs(60));

    println!("Final status: {}", monitor.status());
}
