//! Unified error type for the firmware.
//!
//! Each adapter keeps its own small error enum; they all convert into
//! [`Error`] so `main()` can funnel boot failures through one path.

use core::fmt;

use crate::adapters::http_listener::ListenerError;
use crate::adapters::wifi::ConnectivityError;
use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// Configuration failed validation.
    Config(&'static str),
    /// WiFi bring-up failed.
    Connectivity(ConnectivityError),
    /// The HTTP listener could not be opened.
    Listener(ListenerError),
}

impl Error {
    /// `true` when the firmware must halt rather than degrade.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Init(_) | Self::Config(_) => true,
            Self::Connectivity(e) => e.is_fatal(),
            Self::Listener(_) => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Connectivity(e) => write!(f, "wifi: {e}"),
            Self::Listener(e) => write!(f, "http: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Connectivity(e)
    }
}

impl From<ListenerError> for Error {
    fn from(e: ListenerError) -> Self {
        Self::Listener(e)
    }
}
