use crate::i2c::{HalI2cConnection, I2cConnection, I2cConnector, I2cError, I2cResult};
use linux_embedded_hal::I2cdev;
use log::debug;
use std::io::ErrorKind;

/// I2C connector backed by the kernel's `i2c-dev` character devices (`/dev/i2c-N`).
#[derive(Debug, Clone)]
pub struct LinuxI2cConnector {
    default_bus: u8,
}

impl LinuxI2cConnector {
    /// Bus exposed on the 40-pin header of a Raspberry Pi.
    pub const RASPBERRY_PI_BUS: u8 = 1;

    pub fn new() -> Self {
        Self::with_default_bus(Self::RASPBERRY_PI_BUS)
    }

    pub fn with_default_bus(default_bus: u8) -> Self {
        LinuxI2cConnector { default_bus }
    }

    pub fn device_path(bus: u8) -> String {
        format!("/dev/i2c-{}", bus)
    }
}

impl Default for LinuxI2cConnector {
    fn default() -> Self {
        Self::new()
    }
}

/// A missing device node means the bus doesn't exist (or `i2c-dev` isn't loaded).
fn open_error(bus: u8, err: std::io::Error) -> I2cError {
    match err.kind() {
        ErrorKind::NotFound => I2cError::NoSuchBus(bus),
        _ => I2cError::from(err),
    }
}

impl I2cConnector for LinuxI2cConnector {
    fn default_bus(&self) -> u8 {
        self.default_bus
    }

    fn get_connection(&self, address: u8, bus: u8) -> I2cResult<Box<dyn I2cConnection>> {
        let path = Self::device_path(bus);

        debug!("Opening {} for device 0x{:02x}", path, address);
        let dev = I2cdev::new(&path).map_err(|err| open_error(bus, err.into()))?;

        Ok(Box::new(HalI2cConnection::new(dev, address)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_node_is_no_such_bus() {
        assert_eq!(
            open_error(7, std::io::Error::from(ErrorKind::NotFound)),
            I2cError::NoSuchBus(7)
        );
    }

    #[test]
    fn other_open_failures_keep_their_io_kind() {
        assert_eq!(
            open_error(1, std::io::Error::from(ErrorKind::PermissionDenied)),
            I2cError::Io(ErrorKind::PermissionDenied)
        );
    }

    #[test]
    fn connecting_to_an_absent_bus_fails() {
        let connector = LinuxI2cConnector::new();
        let err = connector.get_connection(0x27, 255).unwrap_err();
        assert_eq!(err, I2cError::NoSuchBus(255));
    }
}
