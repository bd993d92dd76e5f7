use serde::{Deserialize, Serialize};

/// Why a switch transaction did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwitchErrorKind {
    /// Requested port outside 1..=10; no device was touched
    InvalidPort,
    /// The device path does not exist
    DeviceNotFound,
    /// Opening the device was refused by the OS
    AccessDenied,
    /// Open, write or read failed at the transport level
    SerialCommunicationFailure,
    /// Anything else, including a panic inside the transport
    InternalError,
}

impl SwitchErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPort => "InvalidPort",
            Self::DeviceNotFound => "DeviceNotFound",
            Self::AccessDenied => "AccessDenied",
            Self::SerialCommunicationFailure => "SerialCommunicationFailure",
            Self::InternalError => "InternalError",
        }
    }
}

impl std::fmt::Display for SwitchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
