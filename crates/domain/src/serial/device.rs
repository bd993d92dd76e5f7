use crate::error::{DomainError, Result};

/// Path of a serial device as supplied by the caller (e.g. `/dev/ttyUSB0`, `COM3`)
///
/// The core never caches or owns the device behind it; the reference only
/// lives as long as the request that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerialDevice(String);

impl SerialDevice {
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(DomainError::InvalidDevice(
                "Serial device path cannot be empty".to_string(),
            ));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SerialDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_device() {
        let device = SerialDevice::new("/dev/ttyUSB0").unwrap();
        assert_eq!(device.as_str(), "/dev/ttyUSB0");
        assert_eq!(device.to_string(), "/dev/ttyUSB0");
    }

    #[test]
    fn test_empty_device_rejected() {
        assert!(SerialDevice::new("").is_err());
        assert!(SerialDevice::new("   ").is_err());
    }
}
