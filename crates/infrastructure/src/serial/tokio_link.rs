use std::time::Duration;

use async_trait::async_trait;
use domain::serial::{LinkOpener, Parity, SerialLink};
use domain::{LineConfig, SerialDevice, TransportError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{ClearBuffer, SerialPort, SerialPortBuilderExt, SerialStream};

fn to_parity(parity: Parity) -> tokio_serial::Parity {
    match parity {
        Parity::None => tokio_serial::Parity::None,
        Parity::Even => tokio_serial::Parity::Even,
        Parity::Odd => tokio_serial::Parity::Odd,
    }
}

fn to_stop_bits(stop_bits: u8) -> Result<tokio_serial::StopBits, TransportError> {
    match stop_bits {
        1 => Ok(tokio_serial::StopBits::One),
        2 => Ok(tokio_serial::StopBits::Two),
        _ => Err(TransportError::Internal(format!(
            "Invalid stop bits: {}",
            stop_bits
        ))),
    }
}

fn to_data_bits(data_bits: u8) -> Result<tokio_serial::DataBits, TransportError> {
    match data_bits {
        5 => Ok(tokio_serial::DataBits::Five),
        6 => Ok(tokio_serial::DataBits::Six),
        7 => Ok(tokio_serial::DataBits::Seven),
        8 => Ok(tokio_serial::DataBits::Eight),
        _ => Err(TransportError::Internal(format!(
            "Invalid data bits: {}",
            data_bits
        ))),
    }
}

/// Normalize port name for Windows (e.g., COM7 -> \\.\COM7)
fn native_port_name(device: &SerialDevice) -> String {
    let path = device.as_str();
    if cfg!(target_os = "windows") && !path.to_uppercase().starts_with(r"\\.\") {
        format!(r"\\.\{}", path)
    } else {
        path.to_string()
    }
}

/// Sort an open failure into the transaction's error kinds
pub(crate) fn classify_open_error(device: &SerialDevice, err: tokio_serial::Error) -> TransportError {
    match err.kind {
        tokio_serial::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
            TransportError::AccessDenied {
                device: device.to_string(),
                reason: err.description,
            }
        }
        tokio_serial::ErrorKind::Io(std::io::ErrorKind::NotFound) => {
            TransportError::DeviceNotFound(device.to_string())
        }
        tokio_serial::ErrorKind::InvalidInput => TransportError::Internal(format!(
            "Invalid settings for {}: {}",
            device, err.description
        )),
        _ => TransportError::Communication(err.description),
    }
}

/// Opens serial devices through tokio-serial
#[derive(Debug, Clone, Default)]
pub struct TokioSerialOpener;

impl TokioSerialOpener {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LinkOpener for TokioSerialOpener {
    async fn open(
        &self,
        device: &SerialDevice,
        line: &LineConfig,
    ) -> Result<Box<dyn SerialLink>, TransportError> {
        // Windows COM names are not filesystem paths
        #[cfg(unix)]
        if !std::path::Path::new(device.as_str()).exists() {
            return Err(TransportError::DeviceNotFound(device.to_string()));
        }

        let port_name = native_port_name(device);
        tracing::debug!(
            port = %port_name,
            baud_rate = line.baud_rate,
            "Opening serial port"
        );

        let stream = tokio_serial::new(&port_name, line.baud_rate)
            .data_bits(to_data_bits(line.data_bits)?)
            .parity(to_parity(line.parity))
            .stop_bits(to_stop_bits(line.stop_bits)?)
            .timeout(line.read_timeout())
            .open_native_async()
            .map_err(|e| {
                tracing::warn!(port = %port_name, error = %e, "Failed to open serial port");
                classify_open_error(device, e)
            })?;

        Ok(Box::new(TokioSerialLink {
            device: device.to_string(),
            stream,
            read_timeout: line.read_timeout(),
            write_timeout: line.write_timeout(),
        }))
    }
}

/// An open tokio-serial stream. The device is closed when this is dropped.
pub struct TokioSerialLink {
    device: String,
    stream: SerialStream,
    read_timeout: Duration,
    write_timeout: Duration,
}

#[async_trait]
impl SerialLink for TokioSerialLink {
    async fn clear(&mut self) -> Result<(), TransportError> {
        self.stream
            .clear(ClearBuffer::All)
            .map_err(|e| TransportError::Communication(format!("Clear error: {}", e)))
    }

    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let stream = &mut self.stream;
        let write = async move {
            stream.write_all(bytes).await?;
            stream.flush().await
        };

        match tokio::time::timeout(self.write_timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(TransportError::Communication(format!("Write error: {}", e))),
            Err(_) => Err(TransportError::Communication("Write timeout".to_string())),
        }
    }

    async fn read_available(&mut self, cap: usize) -> Result<Vec<u8>, TransportError> {
        let waiting = self
            .stream
            .bytes_to_read()
            .map_err(|e| TransportError::Communication(format!("Read error: {}", e)))?
            as usize;
        // Nothing reported waiting still gets one opportunistic read
        let want = if waiting > 0 { waiting.min(cap) } else { cap };
        let mut buffer = vec![0u8; want];

        match tokio::time::timeout(self.read_timeout, self.stream.read(&mut buffer)).await {
            Ok(Ok(n)) => {
                buffer.truncate(n);
                Ok(buffer)
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::TimedOut => Ok(Vec::new()),
            Ok(Err(e)) => Err(TransportError::Communication(format!("Read error: {}", e))),
            // Timeout elapsed with no reply; the switch does not always answer
            Err(_) => {
                tracing::debug!(port = %self.device, "No reply within read timeout");
                Ok(Vec::new())
            }
        }
    }
}

impl Drop for TokioSerialLink {
    fn drop(&mut self) {
        tracing::trace!(port = %self.device, "Serial port released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(path: &str) -> SerialDevice {
        SerialDevice::new(path).unwrap()
    }

    #[test]
    fn test_line_conversions() {
        assert!(matches!(to_parity(Parity::Even), tokio_serial::Parity::Even));
        assert!(matches!(to_parity(Parity::Odd), tokio_serial::Parity::Odd));
        assert!(matches!(to_data_bits(8).unwrap(), tokio_serial::DataBits::Eight));
        assert!(matches!(to_stop_bits(2).unwrap(), tokio_serial::StopBits::Two));
        assert!(to_data_bits(9).is_err());
        assert!(to_stop_bits(0).is_err());
    }

    #[test]
    fn test_permission_error_is_access_denied() {
        let err = tokio_serial::Error::new(
            tokio_serial::ErrorKind::Io(std::io::ErrorKind::PermissionDenied),
            "Permission denied",
        );
        assert_eq!(
            classify_open_error(&device("/dev/ttyUSB0"), err),
            TransportError::AccessDenied {
                device: "/dev/ttyUSB0".into(),
                reason: "Permission denied".into(),
            }
        );
    }

    #[test]
    fn test_busy_device_is_communication_failure() {
        let err = tokio_serial::Error::new(
            tokio_serial::ErrorKind::NoDevice,
            "Device or resource busy",
        );
        assert_eq!(
            classify_open_error(&device("/dev/ttyUSB0"), err),
            TransportError::Communication("Device or resource busy".into())
        );
    }

    #[test]
    fn test_invalid_input_is_internal() {
        let err = tokio_serial::Error::new(tokio_serial::ErrorKind::InvalidInput, "bad baud");
        assert!(matches!(
            classify_open_error(&device("COM1"), err),
            TransportError::Internal(_)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_device_is_reported_before_open() {
        let opener = TokioSerialOpener::new();
        let result = opener
            .open(&device("/dev/this-port-does-not-exist"), &LineConfig::default())
            .await;
        assert_eq!(
            result.err(),
            Some(TransportError::DeviceNotFound(
                "/dev/this-port-does-not-exist".into()
            ))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_port_name_unchanged_on_unix() {
        assert_eq!(native_port_name(&device("/dev/ttyUSB0")), "/dev/ttyUSB0");
    }
}
