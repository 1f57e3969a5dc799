pub mod config;
pub mod delay;
pub mod device;
pub mod i2c;
pub mod lcd;

#[cfg(test)]
pub(crate) mod testing;

use crate::i2c::I2cError;
use crate::lcd::hd44780::driver::DriverState;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum LcdError {
    #[error("transport error: {0}")]
    Transport(#[from] I2cError),
    #[error("invalid row coordinate: {0}")]
    InvalidRow(u8),
    #[error("invalid col coordinate: {0}")]
    InvalidColumn(u8),
    #[error("invalid argument")]
    InvalidArgument,
    #[error("display is not ready (state: {0:?})")]
    NotReady(DriverState),
    #[error("display was already started (state: {0:?})")]
    AlreadyStarted(DriverState),
}

pub type LcdResult<T> = Result<T, LcdError>;
