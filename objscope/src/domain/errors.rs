//! Error types for the probe and the snapshot exporter
//!
//! [`ProbeError::is_fatal`] separates initialization failures that stop the
//! process from those the probe logs and survives.

use thiserror::Error;

/// Toolkit callback category, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackCategory {
    Connect,
    Disconnect,
}

impl std::fmt::Display for CallbackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect => f.write_str("on-connect"),
            Self::Disconnect => f.write_str("on-disconnect"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to resolve next-in-chain implementation of {symbol}")]
    ChainUnresolved { symbol: &'static str },

    #[error("Toolkit adapter does not export {symbol}")]
    HostBridgeMissing { symbol: &'static str },

    #[error("Toolkit adapter ABI version {found} does not match probe ABI version {expected}")]
    HostBridgeAbiMismatch { expected: u32, found: u32 },

    #[error("Toolkit rejected the {0} callback registration")]
    CallbackRegistration(CallbackCategory),

    #[error("Failed to install the structural event observer")]
    ObserverInstall,
}

impl ProbeError {
    /// Whether the probe must stop the process rather than carry on
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ChainUnresolved { .. }
                | Self::HostBridgeMissing { .. }
                | Self::HostBridgeAbiMismatch { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No export path given and OBJSCOPE_EXPORT is not set")]
    NoExportPath,

    #[error("Probe is not running")]
    ProbeNotRunning,

    #[error("Invalid snapshot data: {0}")]
    InvalidSnapshot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
