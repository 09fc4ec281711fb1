//! Driver configuration and serial line settings.

use crate::frame::DEFAULT_ADDRESS;

/// Serial line settings required by the sensor (9600 8N1).
///
/// The driver does not configure the UART itself. Use these when setting
/// up the serial interface passed to [`crate::MhZ19::new`].
pub mod serial {
    pub const BAUD_RATE: u32 = 9600;
    pub const DATA_BITS: u8 = 8;
    pub const STOP_BITS: u8 = 1;
}

/// Driver configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Sensor address written into byte 1 of every request.
    pub address: u8,
    /// Reject responses whose op code echo does not match the request.
    ///
    /// Off by default, as the echo byte is not consistent across firmware
    /// revisions.
    pub check_command_echo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            check_command_echo: false,
        }
    }
}

impl Config {
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_command_echo_check(mut self, enabled: bool) -> Self {
        self.check_command_echo = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.address, 0x01);
        assert!(!config.check_command_echo);
    }

    #[test]
    fn test_builder() {
        let config = Config::default()
            .with_address(0x02)
            .with_command_echo_check(true);
        assert_eq!(
            config,
            Config {
                address: 0x02,
                check_command_echo: true,
            }
        );
    }
}
