mod i2c;

use crate::{LcdError, LcdResult};
pub use i2c::*;
use log::warn;
use std::fmt::Debug;

pub const CLEAR_DISPLAY: u8 = 0b00000001;
pub const RETURN_HOME: u8 = 0b00000010;
pub const ENTRY_MODE_SET: u8 = 0b00000100;
pub const DISPLAY_CONTROL: u8 = 0b00001000;
pub const CURSOR_SHIFT: u8 = 0b00010000;
pub const FUNCTION_SET: u8 = 0b00100000;
pub const SET_DDRAM_ADDRESS: u8 = 0b10000000;

/// Worst case execution time of clear display and return home, in microseconds.
pub const CLEAR_HOME_TIME_US: u32 = 2000;

pub const ROWS: u8 = 2;
pub const COLUMNS: u8 = 16;
/// DDRAM address of the first character of each row.
pub const ROW_OFFSETS: [u8; ROWS as usize] = [0x00, 0x40];

/// Lifecycle of a display driver.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum DriverState {
    /// Constructed, nothing was sent to the controller yet.
    #[default]
    NotStarted,
    /// The initialization sequence is running.
    Bootstrapping,
    /// Initialized, accepts display operations.
    Ready,
    /// Initialization failed. The driver can't be used anymore.
    Failed,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CursorDirection {
    /// Moves the cursor to the left after writing/reading data.
    Left,
    /// Moves the cursor to the right after writing/reading data.
    Right,
}

/// Top 4 bits of a byte, in place.
pub fn high_nibble(value: u8) -> u8 {
    value & 0xF0
}

/// Bottom 4 bits of a byte, moved to the top 4 bits.
pub fn low_nibble(value: u8) -> u8 {
    (value << 4) & 0xF0
}

/// Checks that `(row, col)` is inside the 2x16 display and gets its DDRAM address.
/// The column is checked first.
pub fn cursor_address(row: u8, col: u8) -> LcdResult<u8> {
    if col >= COLUMNS {
        return Err(LcdError::InvalidColumn(col));
    }
    if row >= ROWS {
        return Err(LcdError::InvalidRow(row));
    }
    Ok(ROW_OFFSETS[row as usize] + col)
}

pub trait HD44780Driver: Debug {
    /// Gets the current lifecycle state of the driver.
    fn state(&self) -> DriverState;

    /// Clears the display and sets the cursor to the home position.
    fn clear_display(&mut self) -> LcdResult<()> {
        self.send_command(CLEAR_DISPLAY)?;
        self.delay_us(CLEAR_HOME_TIME_US);
        Ok(())
    }

    /// Sets the cursor to the home position, keeping the display content.
    fn return_home(&mut self) -> LcdResult<()> {
        self.send_command(RETURN_HOME)?;
        self.delay_us(CLEAR_HOME_TIME_US);
        Ok(())
    }

    /// Sets the display to the specified entry mode.
    fn set_entry_mode(&mut self, cursor_direction: CursorDirection, shift: bool) -> LcdResult<()> {
        let mut command = ENTRY_MODE_SET;
        if cursor_direction == CursorDirection::Right {
            command |= 0b00000010;
        }
        if shift {
            command |= 0b00000001;
        }
        self.send_command(command)
    }

    /// Sets the display on/off, cursor on/off, and blinking on/off.
    fn set_display_control(
        &mut self,
        display_on: bool,
        cursor_on: bool,
        blink_on: bool,
    ) -> LcdResult<()> {
        let mut command = DISPLAY_CONTROL;
        if display_on {
            command |= 0b00000100;
        }
        if cursor_on {
            command |= 0b00000010;
        }
        if blink_on {
            command |= 0b00000001;
        }
        self.send_command(command)
    }

    /// Moves the cursor or shifts the display.
    fn cursor_shift(&mut self, display_shift: bool, direction: CursorDirection) -> LcdResult<()> {
        let mut command = CURSOR_SHIFT;
        if display_shift {
            command |= 0b00001000;
        }
        if direction == CursorDirection::Right {
            command |= 0b00000100;
        }
        self.send_command(command)
    }

    /// Sets the line count and font. The data length is always 4 bits.
    fn function_set(&mut self, two_lines: bool, alt_font: bool) -> LcdResult<()> {
        let mut command = FUNCTION_SET;
        if two_lines {
            command |= 0b00001000;
        }
        if alt_font {
            command |= 0b00000100;
        }
        self.send_command(command)
    }

    /// Sets the DDRAM address.
    fn set_ddram_address(&mut self, address: u8) -> LcdResult<()> {
        if address > 0b01111111 {
            return Err(LcdError::InvalidArgument);
        }
        self.send_command(SET_DDRAM_ADDRESS | address)
    }

    /// Moves the cursor to the given row and column. Nothing is sent if either is out of range.
    fn set_cursor(&mut self, row: u8, col: u8) -> LcdResult<()> {
        let address = cursor_address(row, col)?;
        self.set_ddram_address(address)
    }

    /// Writes a single character at the cursor position.
    ///
    /// The controller only knows 8-bit character codes, so only the low byte of the code point is
    /// sent. Characters above `U+00FF` end up as some other glyph.
    fn write_char(&mut self, c: char) -> LcdResult<()> {
        let code = c as u32;
        if code > 0xFF {
            warn!("Character {:?} (U+{:04X}) truncated to 0x{:02x}", c, code, code as u8);
        }
        self.send_data(code as u8)
    }

    /// Writes the string character by character. Stops at the first failure, whatever was written
    /// before stays on the display.
    fn print(&mut self, s: &str) -> LcdResult<()> {
        for c in s.chars() {
            self.write_char(c)?;
        }
        Ok(())
    }

    // Low-level commands
    // These are used by the high-level functions above and implemented by the driver implementation.

    /// Sends a command to the HD44780 controller, with RS set to 0.
    fn send_command(&mut self, command: u8) -> LcdResult<()>;

    /// Sends data to the HD44780 controller, with RS set to 1.
    fn send_data(&mut self, data: u8) -> LcdResult<()>;

    /// Blocks for the given amount of microseconds using the driver's delay.
    fn delay_us(&mut self, us: u32);
}
