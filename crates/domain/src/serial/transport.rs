use async_trait::async_trait;
use thiserror::Error;

use super::{LineConfig, SerialDevice};
use crate::port::Command;
use crate::switch::SwitchErrorKind;

/// Faults a serial exchange can report to the transaction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    #[error("Serial port {0} does not exist")]
    DeviceNotFound(String),

    #[error("Access denied to serial port {device}: {reason}")]
    AccessDenied { device: String, reason: String },

    #[error("Serial communication failed: {0}")]
    Communication(String),

    #[error("Unexpected error: {0}")]
    Internal(String),
}

impl TransportError {
    pub fn kind(&self) -> SwitchErrorKind {
        match self {
            Self::DeviceNotFound(_) => SwitchErrorKind::DeviceNotFound,
            Self::AccessDenied { .. } => SwitchErrorKind::AccessDenied,
            Self::Communication(_) => SwitchErrorKind::SerialCommunicationFailure,
            Self::Internal(_) => SwitchErrorKind::InternalError,
        }
    }
}

/// One complete open/write/settle/read/release cycle against a device
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SerialTransport: Send + Sync {
    /// Send `command` and return whatever raw bytes the device answered with.
    /// An empty reply is a success.
    async fn transact(
        &self,
        device: &SerialDevice,
        command: Command,
        line: &LineConfig,
    ) -> Result<Vec<u8>, TransportError>;
}

/// An open handle on a serial device. Dropping it releases the device.
#[async_trait]
pub trait SerialLink: Send {
    /// Discard bytes buffered for input and output
    async fn clear(&mut self) -> Result<(), TransportError>;

    /// Write all bytes and flush them to the wire
    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Read what is currently available, at most `cap` bytes.
    /// Returns an empty vector if nothing arrived within the read timeout.
    async fn read_available(&mut self, cap: usize) -> Result<Vec<u8>, TransportError>;
}

/// Opens serial devices with a given line configuration
#[async_trait]
pub trait LinkOpener: Send + Sync {
    async fn open(
        &self,
        device: &SerialDevice,
        line: &LineConfig,
    ) -> Result<Box<dyn SerialLink>, TransportError>;
}
