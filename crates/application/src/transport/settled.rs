use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};

use domain::serial::{LinkOpener, SerialTransport};
use domain::{Command, LineConfig, SerialDevice, TransportError};

use super::DeviceLocks;

/// Serial exchange tuned to the switch's timing:
/// open, clear, write, settle, read, release.
///
/// The link is dropped (and the device closed) before the per-device lock is
/// released, on success and on every error path.
pub struct SettledTransport {
    opener: Arc<dyn LinkOpener>,
    locks: Option<DeviceLocks>,
}

impl SettledTransport {
    /// Transport holding one exclusive lock per device for the whole exchange
    pub fn new(opener: Arc<dyn LinkOpener>) -> Self {
        Self::with_locks(opener, Some(DeviceLocks::new()))
    }

    /// Transport that lets concurrent exchanges race for the same device
    pub fn unserialized(opener: Arc<dyn LinkOpener>) -> Self {
        Self::with_locks(opener, None)
    }

    /// Share `locks` with other users of the same devices so they queue
    /// behind running exchanges
    pub fn with_locks(opener: Arc<dyn LinkOpener>, locks: Option<DeviceLocks>) -> Self {
        Self { opener, locks }
    }
}

#[async_trait]
impl SerialTransport for SettledTransport {
    async fn transact(
        &self,
        device: &SerialDevice,
        command: Command,
        line: &LineConfig,
    ) -> Result<Vec<u8>, TransportError> {
        let _guard = match &self.locks {
            Some(locks) => Some(locks.acquire(device).await),
            None => None,
        };

        let mut link = self.opener.open(device, line).await?;
        link.clear().await?;

        link.write_all(command.as_bytes()).await?;
        trace!(device = %device, command = %command, "Command written");

        tokio::time::sleep(line.settle_delay()).await;

        let reply = link.read_available(line.read_cap).await?;
        debug!(device = %device, bytes = reply.len(), "Reply read");
        Ok(reply)
    }
}
