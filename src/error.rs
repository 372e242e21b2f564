use std::io;
use thiserror::Error;

/// The error type for reachability operations.
///
/// These errors only surface at the flag-source seam. `StatusMonitor`
/// never returns them; every construction failure is absorbed into
/// [`crate::Status::Unknown`] instead.
#[derive(Error, Debug)]
pub enum Error {
    /// The platform probe for the requested target could not be created
    #[error("Failed to create reachability probe: {reason}")]
    ProbeCreation { reason: String },

    /// The platform could not report capability flags
    #[error("Failed to read capability flags: {reason}")]
    FlagRead { reason: String },

    /// The change callback could not be registered with the flag source
    #[error("Failed to register reachability callback: {reason}")]
    CallbackRegistration { reason: String },

    /// I/O error occurred while inspecting platform network state
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a new probe creation error
    pub fn probe_creation(reason: impl Into<String>) -> Self {
        Self::ProbeCreation {
            reason: reason.into(),
        }
    }

    /// Create a new flag read error
    pub fn flag_read(reason: impl Into<String>) -> Self {
        Self::FlagRead {
            reason: reason.into(),
        }
    }

    /// Create a new callback registration error
    pub fn callback_registration(reason: impl Into<String>) -> Self {
        Self::CallbackRegistration {
            reason: reason.into(),
        }
    }
}

/// A specialized `Result` type for reachability operations.
pub type Result<T> = std::result::Result<T, Error>;
