mod device_locks;
mod settled;

pub use device_locks::{DeviceGuard, DeviceLocks};
pub use settled::SettledTransport;
