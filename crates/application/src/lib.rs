//! Application layer - The port-switch use case and its serial exchange

pub mod switch;
pub mod transport;

pub use switch::SwitchService;
pub use transport::{DeviceGuard, DeviceLocks, SettledTransport};
