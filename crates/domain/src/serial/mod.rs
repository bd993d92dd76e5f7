mod device;
mod discovery;
mod line_config;
mod transport;

pub use device::SerialDevice;
pub use discovery::{PortDiscovery, SerialPortInfo, select_default_port};
pub use line_config::{LineConfig, Parity};
pub use transport::{LinkOpener, SerialLink, SerialTransport, TransportError};
