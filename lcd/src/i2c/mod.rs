//! I2C transport used by the display drivers.
//!
//! A [I2cConnector] stands for a machine's set of I2C buses and hands out [I2cConnection]s, each bound
//! to a single device address on a single bus. Drivers only ever push single bytes through a connection.

#[cfg(feature = "linux")]
mod linux;

#[cfg(feature = "linux")]
pub use linux::*;

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, SevenBitAddress};
use log::trace;
use std::fmt::{Debug, Formatter};
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum I2cError {
    #[error("I2C bus {0} is not available")]
    NoSuchBus(u8),
    #[error("bus error: {0:?}")]
    Bus(ErrorKind),
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),
    #[error("error: {0}")]
    Other(String),
}

impl From<std::io::Error> for I2cError {
    fn from(err: std::io::Error) -> Self {
        I2cError::Io(err.kind())
    }
}

pub type I2cResult<T> = Result<T, I2cError>;

pub trait I2cConnector: Debug {
    /// Gets the bus used when the caller doesn't pick one.
    fn default_bus(&self) -> u8;

    /// Opens a connection to the device at `address` on the given bus.
    fn get_connection(&self, address: u8, bus: u8) -> I2cResult<Box<dyn I2cConnection>>;
}

pub trait I2cConnection: Debug {
    /// Writes a single byte to the connected device.
    fn write_byte(&mut self, value: u8) -> I2cResult<()>;
}

/// Adapts any `embedded-hal` I2C bus into an [I2cConnection] bound to one device address.
pub struct HalI2cConnection<I: I2c> {
    bus: I,
    address: SevenBitAddress,
}

impl<I: I2c> HalI2cConnection<I> {
    pub fn new(bus: I, address: SevenBitAddress) -> Self {
        HalI2cConnection { bus, address }
    }

    pub fn release(self) -> I {
        self.bus
    }
}

impl<I: I2c> Debug for HalI2cConnection<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "HalI2cConnection(0x{:02x})", self.address)
    }
}

impl<I: I2c> I2cConnection for HalI2cConnection<I> {
    fn write_byte(&mut self, value: u8) -> I2cResult<()> {
        trace!("I2C 0x{:02x} <- {:08b}", self.address, value);
        self.bus
            .write(self.address, &[value])
            .map_err(|err| I2cError::Bus(err.kind()))
    }
}
