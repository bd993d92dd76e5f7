use domain::serial::PortDiscovery;
use domain::{DomainError, SerialPortInfo};
use tokio_serial::SerialPortType;

/// Description fragments of the adapters a KVM switch is usually wired to
pub const DEFAULT_KEYWORDS: [&str; 5] = ["usb", "serial", "ch340", "ftdi", "cp210"];

/// Lists serial adapters reported by the operating system
#[derive(Debug, Clone)]
pub struct SystemPortDiscovery {
    keywords: Vec<String>,
}

impl Default for SystemPortDiscovery {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect())
    }
}

impl SystemPortDiscovery {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

impl PortDiscovery for SystemPortDiscovery {
    fn list_ports(&self) -> Result<Vec<SerialPortInfo>, DomainError> {
        let ports = tokio_serial::available_ports()
            .map_err(|e| DomainError::Discovery(format!("Failed to list ports: {}", e)))?;

        let described = ports
            .iter()
            .map(|p| SerialPortInfo {
                device: p.port_name.clone(),
                description: describe(p),
            })
            .collect();

        let found = filter_ports(described, &self.keywords);
        tracing::info!(count = found.len(), "Found serial ports");
        Ok(found)
    }
}

fn describe(info: &tokio_serial::SerialPortInfo) -> String {
    match &info.port_type {
        SerialPortType::UsbPort(usb) => {
            let label = usb
                .product
                .clone()
                .or_else(|| usb.manufacturer.clone())
                .unwrap_or_else(|| "USB Serial Device".to_string());
            format!("{} - USB VID:PID={:04X}:{:04X}", label, usb.vid, usb.pid)
        }
        SerialPortType::PciPort => "PCI Port".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth Port".to_string(),
        SerialPortType::Unknown => format!("Serial Port {}", info.port_name),
    }
}

/// Keep ports whose description mentions a keyword, sorted by device name
fn filter_ports(ports: Vec<SerialPortInfo>, keywords: &[String]) -> Vec<SerialPortInfo> {
    let mut kept: Vec<SerialPortInfo> = ports
        .into_iter()
        .filter(|p| {
            let description = p.description.to_lowercase();
            keywords.iter().any(|k| description.contains(k.as_str()))
        })
        .collect();
    kept.sort_by(|a, b| a.device.cmp(&b.device));
    kept
}
