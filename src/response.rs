//! Decoded contents of response frames.

use crate::frame::Frame;
use core::fmt::{self, Display, Formatter};

/// Full contents of a gas concentration response (op code 0x86).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Measurement {
    pub co2_ppm: u16,
    /// Sensor temperature, offset by 40 on the wire. Coarse and undocumented
    /// by the data sheet.
    pub temperature_celsius: i16,
    /// Status byte.
    pub status: u8,
    /// Undocumented bytes 6 and 7 ("UhUl").
    pub extra: u16,
}

impl From<&Frame> for Measurement {
    fn from(frame: &Frame) -> Self {
        let data = frame.data();
        Self {
            co2_ppm: frame.concentration(),
            temperature_celsius: i16::from(data[2]) - 40,
            status: data[3],
            extra: u16::from_be_bytes([data[4], data[5]]),
        }
    }
}

/// Response to op code 0x85 (MH-Z19C only).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Co2AndTemperature {
    pub co2_ppm: u16,
    pub temp_celsius: f32,
}

impl From<&Frame> for Co2AndTemperature {
    fn from(frame: &Frame) -> Self {
        let data = frame.data();
        let centi_celsius = u16::from_be_bytes([data[0], data[1]]);
        Self {
            co2_ppm: u16::from_be_bytes([data[2], data[3]]),
            temp_celsius: f32::from(centi_celsius) / 100.0,
        }
    }
}

/// Firmware version as four ASCII characters, e.g. `0515`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FirmwareVersion(pub [u8; 4]);

impl From<&Frame> for FirmwareVersion {
    fn from(frame: &Frame) -> Self {
        let data = frame.data();
        Self([data[0], data[1], data[2], data[3]])
    }
}

impl FirmwareVersion {
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl Display for FirmwareVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for &c in self.0.iter() {
            if c.is_ascii_graphic() {
                write!(f, "{}", char::from(c))?;
            } else {
                write!(f, "\\x{:02x}", c)?;
            }
        }
        Ok(())
    }
}
