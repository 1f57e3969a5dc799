use crate::config::I2cConfig;
use crate::device::Device;
use crate::i2c::{I2cConnection, I2cConnector};
use crate::lcd::hd44780::driver::{high_nibble, low_nibble, DriverState, HD44780Driver};
use crate::{LcdError, LcdResult};
use embedded_hal::delay::DelayNs;
use log::{debug, error, info, trace};
use std::fmt::{Debug, Formatter};

pub const DEFAULT_NAME: &str = "HD44780";
pub const DEFAULT_ADDRESS: u8 = 0x00;

/// Enable line of the backpack. The controller latches the nibble on its falling edge.
pub const ENABLE_BIT: u8 = 0b00000100;
/// Register select line of the backpack. Set for data, cleared for commands.
pub const RS_BIT: u8 = 0b00000001;

const POWER_ON_DELAY_MS: u32 = 1000;
const FOUR_BIT_MODE_REPEATS: usize = 3;
const FOUR_BIT_MODE_DELAY_US: u32 = 4500;
const ENABLE_PULSE_US: u32 = 1;
const COMMAND_SETTLE_US: u32 = 50;

/// HD44780 driven in 4-bit mode through an I2C port expander.
///
/// Every write to the expander puts a nibble on `D7..D4` (the top 4 bits) together with the `RS`
/// and `E` lines. A nibble is latched by writing it once with `E` set and once with `E` cleared, so a
/// full byte costs four bus writes.
///
/// Nothing touches the bus until [Device::initialize] runs, and every display operation fails with
/// [LcdError::NotReady] until it succeeds.
pub struct I2cHD44780Driver<C: I2cConnector, D: DelayNs> {
    name: String,
    connector: C,
    connection: Option<Box<dyn I2cConnection>>,
    delay: D,
    bus: u8,
    address: u8,
    state: DriverState,
}

impl<C: I2cConnector, D: DelayNs> I2cHD44780Driver<C, D> {
    pub fn new(connector: C, delay: D, config: I2cConfig) -> Self {
        let bus = config.bus_or(connector.default_bus());
        let address = config.address_or(DEFAULT_ADDRESS);
        I2cHD44780Driver {
            name: DEFAULT_NAME.to_string(),
            connector,
            connection: None,
            delay,
            bus,
            address,
            state: DriverState::NotStarted,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.set_name(name);
        self
    }

    pub fn bus(&self) -> u8 {
        self.bus
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    fn connection(&mut self) -> LcdResult<&mut Box<dyn I2cConnection>> {
        match (self.state, self.connection.as_mut()) {
            (DriverState::Bootstrapping | DriverState::Ready, Some(connection)) => Ok(connection),
            (state, _) => Err(LcdError::NotReady(state)),
        }
    }

    /// Latches a single nibble, already placed in the top 4 bits of `value` together with `RS`.
    pub fn send_raw_nibble(&mut self, value: u8) -> LcdResult<()> {
        trace!("Writing nibble: {:08b}", value);

        self.connection()?.write_byte(value | ENABLE_BIT)?;
        self.delay.delay_us(ENABLE_PULSE_US);

        self.connection()?.write_byte(value & !ENABLE_BIT)?;
        self.delay.delay_us(COMMAND_SETTLE_US);

        Ok(())
    }

    fn send(&mut self, byte: u8, rs: bool) -> LcdResult<()> {
        trace!("Sending byte: {:08b}, RS: {}", byte, rs);

        let rs = if rs { RS_BIT } else { 0 };
        self.send_raw_nibble(high_nibble(byte) | rs)?;
        self.send_raw_nibble(low_nibble(byte) | rs)?;
        Ok(())
    }

    fn bootstrap(&mut self) -> LcdResult<()> {
        debug!("Connecting to 0x{:02x} on bus {}...", self.address, self.bus);
        let connection = self.connector.get_connection(self.address, self.bus)?;
        self.connection = Some(connection);

        self.delay.delay_ms(POWER_ON_DELAY_MS);

        // The controller may be in 8-bit mode or halfway through a 4-bit transfer, sending 0x3 three
        // times gets it into 8-bit mode from any of those.
        debug!("Switching to 4-bit mode...");
        for _ in 0..FOUR_BIT_MODE_REPEATS {
            self.send_raw_nibble(0x03 << 4)?;
            self.delay.delay_us(FOUR_BIT_MODE_DELAY_US);
        }
        self.send_raw_nibble(0x02 << 4)?;

        self.function_set(true, false)?;
        self.set_display_control(true, false, false)?;
        self.clear_display()?;
        self.return_home()?;

        Ok(())
    }
}

impl<C: I2cConnector, D: DelayNs> Debug for I2cHD44780Driver<C, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I2cHD44780Driver")
            .field("name", &self.name)
            .field("bus", &self.bus)
            .field("address", &format_args!("0x{:02x}", self.address))
            .field("state", &self.state)
            .finish()
    }
}

impl<C: I2cConnector, D: DelayNs> HD44780Driver for I2cHD44780Driver<C, D> {
    fn state(&self) -> DriverState {
        self.state
    }

    fn send_command(&mut self, command: u8) -> LcdResult<()> {
        self.send(command, false)
    }

    fn send_data(&mut self, data: u8) -> LcdResult<()> {
        self.send(data, true)
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}

impl<C: I2cConnector, D: DelayNs> Device for I2cHD44780Driver<C, D> {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn initialize(&mut self) -> LcdResult<()> {
        if self.state != DriverState::NotStarted {
            return Err(LcdError::AlreadyStarted(self.state));
        }

        self.state = DriverState::Bootstrapping;
        match self.bootstrap() {
            Ok(()) => {
                self.state = DriverState::Ready;
                info!("{} ready at 0x{:02x} on bus {}.", self.name, self.address, self.bus);
                Ok(())
            }
            Err(err) => {
                self.state = DriverState::Failed;
                error!("{} failed to initialize: {}", self.name, err);
                Err(err)
            }
        }
    }

    fn shutdown(&mut self) -> LcdResult<()> {
        debug!("{} shutting down, display content is kept.", self.name);
        Ok(())
    }
}
