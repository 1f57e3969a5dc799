/// Bus and address overrides for an I2C device.
///
/// Anything left unset falls back to the defaults of whoever resolves the config, usually the
/// connector's default bus and the driver's default address.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct I2cConfig {
    pub bus: Option<u8>,
    pub address: Option<u8>,
}

impl I2cConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bus(mut self, bus: u8) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn with_address(mut self, address: u8) -> Self {
        self.address = Some(address);
        self
    }

    pub fn bus_or(&self, default: u8) -> u8 {
        self.bus.unwrap_or(default)
    }

    pub fn address_or(&self, default: u8) -> u8 {
        self.address.unwrap_or(default)
    }
}
