use std::time::Duration;

use netstatus::stream;

#[tokio::main]
async fn main() {
    env_logger::init();

    let (monitor, mut rx) = stream::watch();
    println!("Connectivity: {}", *rx.borrow());

    let deadline = tokio::time::sleep(Duration::from_secs(60));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            changed = rx.changed() => match changed {
                Ok(()) => println!("Connectivity: {}", *rx.borrow()),
                Err(_) => break,
            },
            () = &mut deadline => break,
        }
    }

    println!("Final status: {}", monitor.status());
}
