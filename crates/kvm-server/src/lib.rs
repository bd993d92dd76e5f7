pub mod api;
pub mod state;

use std::sync::Arc;

use application::{DeviceLocks, SettledTransport, SwitchService};
use infrastructure::{ConfiguredPortNames, ServiceConfig, SystemPortDiscovery, TokioSerialOpener};
use state::AppState;

/// Wire the production collaborators from configuration
pub fn setup_app_state(config: &ServiceConfig) -> Arc<AppState> {
    let opener = Arc::new(TokioSerialOpener::new());
    let locks = config.serial.serialize_access.then(DeviceLocks::new);
    let transport = SettledTransport::with_locks(opener.clone(), locks.clone());
    let switch = SwitchService::new(Arc::new(transport), config.serial.line.clone());
    let discovery = SystemPortDiscovery::new(config.serial.discovery_keywords.clone());
    let naming = ConfiguredPortNames::from_env(&config.port_names);

    Arc::new(AppState::new(
        switch,
        opener,
        locks,
        Arc::new(discovery),
        Arc::new(naming),
    ))
}
