use dotenv::var;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub bus: Option<u8>,
    pub address: u8,
    pub interval_ms: u64,
    pub text: String,
}

impl Config {
    pub fn try_load() -> Option<Self> {
        let config_str = var("CONFIG_FILE").unwrap_or_else(|_| "lcd.json".to_string());
        Self::try_load_from(Path::new(&config_str))
    }

    /// Reads the config at `config_path`. A missing file gives `None`, so does an unreadable or
    /// malformed one, with a warning.
    pub fn try_load_from(config_path: &Path) -> Option<Self> {
        if !config_path.exists() {
            return None;
        }
        let file = match std::fs::File::open(config_path) {
            Ok(file) => file,
            Err(err) => {
                warn!("Can't open {}: {}", config_path.display(), err);
                return None;
            }
        };
        let reader = std::io::BufReader::new(file);
        match serde_json::from_reader(reader) {
            Ok(config) => Some(config),
            Err(err) => {
                warn!("Can't parse {}: {}", config_path.display(), err);
                None
            }
        }
    }

    /// Applies `LCD_I2C_BUS` and `LCD_I2C_ADDRESS` from the environment, if set.
    pub fn apply_env(&mut self) -> eyre::Result<()> {
        if let Ok(bus) = var("LCD_I2C_BUS") {
            self.bus = Some(parse_u8(&bus)?);
        }
        if let Ok(address) = var("LCD_I2C_ADDRESS") {
            self.address = parse_u8(&address)?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bus: None,
            address: 0x27,
            interval_ms: 1000,
            text: "ASDF".to_string(),
        }
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal byte.
pub fn parse_u8(s: &str) -> eyre::Result<u8> {
    let s = s.trim();
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16)?,
        None => s.parse()?,
    };
    Ok(value)
}
