use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A serial adapter as reported by the operating system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialPortInfo {
    pub device: String,
    pub description: String,
}

/// Enumerates the serial adapters a switch may be attached to
pub trait PortDiscovery: Send + Sync {
    fn list_ports(&self) -> Result<Vec<SerialPortInfo>, DomainError>;
}

/// Pick the adapter a client should use when it has no preference.
///
/// Order: a device ending in `USB0`, then any `ttyUSB` device or USB
/// description, then whatever comes first.
pub fn select_default_port(ports: &[SerialPortInfo]) -> Option<&SerialPortInfo> {
    ports
        .iter()
        .find(|p| p.device.ends_with("USB0"))
        .or_else(|| {
            ports
                .iter()
                .find(|p| p.device.contains("ttyUSB") || p.description.contains("USB"))
        })
        .or_else(|| ports.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(device: &str, description: &str) -> SerialPortInfo {
        SerialPortInfo {
            device: device.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_prefers_usb0() {
        let ports = vec![
            info("/dev/ttyACM0", "USB Serial"),
            info("/dev/ttyUSB1", "FT232R"),
            info("/dev/ttyUSB0", "CH340"),
        ];
        assert_eq!(
            select_default_port(&ports).map(|p| p.device.as_str()),
            Some("/dev/ttyUSB0")
        );
    }

    #[test]
    fn test_falls_back_to_usb_description() {
        let ports = vec![info("/dev/ttyS0", "Serial Port"), info("COM4", "USB-SERIAL CH340")];
        assert_eq!(
            select_default_port(&ports).map(|p| p.device.as_str()),
            Some("COM4")
        );
    }

    #[test]
    fn test_falls_back_to_first() {
        let ports = vec![info("/dev/ttyS1", "serial"), info("/dev/ttyS0", "serial")];
        assert_eq!(
            select_default_port(&ports).map(|p| p.device.as_str()),
            Some("/dev/ttyS1")
        );
    }

    #[test]
    fn test_no_ports() {
        assert!(select_default_port(&[]).is_none());
    }
}
