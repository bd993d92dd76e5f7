use std::sync::Arc;
use std::time::Instant;

use application::{DeviceLocks, SwitchService};
use domain::serial::{LinkOpener, PortDiscovery};
use domain::{DomainError, PortNaming, SerialPortInfo};

/// Collaborators shared by every request handler
pub struct AppState {
    pub switch: SwitchService,
    pub opener: Arc<dyn LinkOpener>,
    /// Same locks the switch transport holds; `None` when access is not serialized
    pub locks: Option<DeviceLocks>,
    pub discovery: Arc<dyn PortDiscovery>,
    pub naming: Arc<dyn PortNaming>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        switch: SwitchService,
        opener: Arc<dyn LinkOpener>,
        locks: Option<DeviceLocks>,
        discovery: Arc<dyn PortDiscovery>,
        naming: Arc<dyn PortNaming>,
    ) -> Self {
        Self {
            switch,
            opener,
            locks,
            discovery,
            naming,
            started_at: Instant::now(),
        }
    }

    /// Port enumeration touches the OS, so it runs off the async workers
    pub async fn list_serial_ports(&self) -> Result<Vec<SerialPortInfo>, DomainError> {
        let discovery = self.discovery.clone();
        tokio::task::spawn_blocking(move || discovery.list_ports())
            .await
            .map_err(|e| DomainError::Discovery(format!("Discovery task failed: {}", e)))?
    }
}
