use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use domain::serial::SerialTransport;
use domain::{
    CommandTable, LineConfig, PortNumber, SerialDevice, SwitchErrorKind, SwitchResult,
    TransportError,
};

use super::decode_response;

/// Runs the port-switch transaction: validate, look up, exchange, report.
///
/// Every call produces exactly one `SwitchResult` and issues an independent
/// hardware command; nothing is cached between calls.
pub struct SwitchService {
    transport: Arc<dyn SerialTransport>,
    line: LineConfig,
}

impl SwitchService {
    pub fn new(transport: Arc<dyn SerialTransport>, line: LineConfig) -> Self {
        Self { transport, line }
    }

    pub fn line_config(&self) -> &LineConfig {
        &self.line
    }

    pub async fn switch_port(&self, device: &SerialDevice, port: i64) -> SwitchResult {
        let port_number = match PortNumber::new(port) {
            Ok(p) => p,
            Err(e) => {
                warn!(port, device = %device, error = %e, "Rejected switch request");
                return SwitchResult::invalid_port(port);
            }
        };

        let command = CommandTable::lookup(port_number);
        info!(port = %port_number, device = %device, "Switching KVM port");

        let exchange = self.transport.transact(device, command, &self.line);
        let outcome = match AssertUnwindSafe(exchange).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => Err(TransportError::Internal(panic_reason(panic.as_ref()))),
        };

        match outcome {
            Ok(bytes) => {
                let response = decode_response(&bytes);
                info!(port = %port_number, "Successfully switched KVM port");
                debug!(command = %command, response = %response, "Switch exchange complete");
                SwitchResult::succeeded(port_number, command, response)
            }
            Err(e) => {
                let kind: SwitchErrorKind = e.kind();
                error!(
                    port = %port_number,
                    device = %device,
                    kind = %kind,
                    error = %e,
                    "Switch transaction failed"
                );
                SwitchResult::failed(port_number, command, kind, e.to_string())
            }
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "transport panicked".to_string()
    }
}
