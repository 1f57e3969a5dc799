//! HD44780 LCD module.
//!
//! Only the 4-bit interface is supported, driven through a PCF8574-style I2C backpack where every
//! byte written to the expander maps to the `D7..D4`, `BL`, `E`, `RW` and `RS` lines of the controller.
//! See [driver::HD44780Driver] for the command set and [driver::I2cHD44780Driver] for the bus protocol.

pub mod driver;
