#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Netstatus
//!
//! A cross-platform connectivity status library for Rust applications.
//!
//! This crate answers one narrow question: is the device online right
//! now, and over a metered path or not? It can also notify a handler
//! when the answer changes.
//!
//! - [`Status`]: `Online`, `Cellular`, `Offline`, or `Unknown`
//! - [`ReachabilityFlags`]: what the platform reports about routing to a
//!   probe target, with a pure [`ReachabilityFlags::interpret`] step
//! - [`StatusMonitor`]: stores the last interpreted status, answers
//!   queries from any thread, and delivers `(new, previous)` change
//!   notifications in order on a dedicated delivery thread
//! - [`SystemSource`]: the built-in flag source watching the operating
//!   system's interface and routing state
//!
//! ## Quick Start
//!
//! ```rust
//! use netstatus::StatusMonitor;
//!
//! let monitor = StatusMonitor::new();
//! println!("Connectivity: {}", monitor.status());
//! if !monitor.is_online() {
//!     // Queue the upload for later, show an offline banner, ...
//! }
//! ```
//!
//! Change notifications keep running until the monitor is dropped:
//!
//! ```rust
//! use netstatus::StatusMonitor;
//!
//! // Keep the monitor alive for as long as notifications matter.
//! let _monitor = StatusMonitor::with_handler(|status, previous| {
//!     println!("Connectivity changed: {previous} -> {status}");
//! });
//! ```
//!
//! ## Features
//!
//! - `async` - Watch status changes through a `tokio::sync::watch` channel
//! - `serde-support` - Serialization for statuses and capability flags

mod error;
mod flags;
mod platform;
mod status;

pub mod monitor;
pub mod probe;
pub mod system;

// Optional async bridge (behind feature flag)
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub mod stream;

// Re-export core types and traits
pub use error::{Error, Result};
pub use flags::ReachabilityFlags;
pub use monitor::{StatusCallback, StatusMonitor};
pub use probe::{FlagCallback, ProbeTarget, ReachabilitySource};
pub use status::Status;
pub use system::SystemSource;

/// Platform-specific implementation details
#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;
