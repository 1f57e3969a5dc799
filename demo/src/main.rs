mod config;

use crate::config::Config;
use dotenv::dotenv;
use i2c_lcd::config::I2cConfig;
use i2c_lcd::delay::ThreadDelay;
use i2c_lcd::device::Device;
use i2c_lcd::i2c::LinuxI2cConnector;
use i2c_lcd::lcd::hd44780::driver::{HD44780Driver, I2cHD44780Driver};
use log::{debug, info};
use std::thread;
use std::time::Duration;
use sysinfo::System;

fn main() -> eyre::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    const UNKNOWN_STR: &str = "???";

    info!(
        "Hello, {}!",
        System::name().as_deref().unwrap_or(UNKNOWN_STR)
    );
    info!(
        "Hostname {}, architecture {}",
        System::host_name().as_deref().unwrap_or(UNKNOWN_STR),
        System::cpu_arch()
    );

    let mut config = Config::try_load().unwrap_or_else(|| {
        info!("No usable config. Using default");
        Config::default()
    });
    config.apply_env()?;
    debug!("{:?}", config);

    let connector = LinuxI2cConnector::new();
    let mut i2c_config = I2cConfig::new().with_address(config.address);
    if let Some(bus) = config.bus {
        i2c_config = i2c_config.with_bus(bus);
    }

    let mut lcd = I2cHD44780Driver::new(connector, ThreadDelay, i2c_config).with_name("demo");

    debug!("Initializing LCD driver...");
    lcd.initialize()?;
    debug!("{:?} initialized.", lcd);

    lcd.return_home()?;

    info!("Starting main loop...");
    loop {
        lcd.set_cursor(0, 1)?;
        lcd.print(&config.text)?;
        lcd.set_cursor(1, 0)?;
        lcd.write_char('A')?;

        thread::sleep(Duration::from_millis(config.interval_ms));
    }
}
