//! Crate to read out the Winsen MH-Z19B and MH-Z19C CO2 sensors.
//!
//! This crate provides an API to read-out the nondispersive infrared (NDIR)
//! CO₂ sensors MH-Z19B and MH-Z19C by Winsen via the serial (UART)
//! interface.
//!
//! The [`frame`] module implements the 9-byte wire protocol on its own and
//! can be used with any serial transport. [`MhZ19`] combines it with an
//! [`embedded_hal::serial`] UART. The provided API supports non-blocking
//! usage and is `no_std`.
//!
//!
//! # Example
//!
//! ```
//! use mhz19_uart::MhZ19;
//! use nb::block;
//!
//! # use test_support::{create_serial_mock_returning, READ_CO2_RESPONSE};
//! # fn main() -> Result<(), mhz19_uart::Error<String>> {
//! # let uart = create_serial_mock_returning(&READ_CO2_RESPONSE);
//! let mut co2sensor = MhZ19::new(uart);
//! let co2 = block!(co2sensor.read_co2_ppm())?;
//! println!("CO₂ concentration: {}ppm", co2);
//! # Ok(())
//! # }
//! ```
//!
//! Using the codec directly:
//!
//! ```
//! use mhz19_uart::frame::{build_request, parse_response};
//!
//! let request = build_request();
//! assert_eq!(request.into_inner(), [0xffu8, 0x01, 0x86, 0, 0, 0, 0, 0, 0x79]);
//! // ... write `request` and read 9 bytes with your serial port ...
//! let response: [u8; 9] = [0xff, 0x86, 0x02, 0x58, 0, 0, 0, 0, 0x20];
//! assert_eq!(parse_response(&response), Ok(600));
//! ```
//!
//! The UART has to be set up with the settings in [`config::serial`]
//! (9600 baud, 8N1). Read timeouts are the business of the UART
//! implementation; its errors are passed through as [`Error::Uart`].
//!
//!
//! # Logging
//!
//! The driver emits records through the [`log`] facade. It never installs a
//! logger.
//!
//!
//! # no_std
//!
//! This crate is `no_std` by default, unless the `std` feature is activated.
//! Currently, the `std` feature will only add `std::error::Error` trait
//! implementations to the error types.
//!
//!
//! # Versioning
//!
//! This crate uses [Semantic Versioning](https://semver.org/).

#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
extern crate lazy_static;

use crate::command::Command;
use crate::config::Config;
use crate::frame::{Frame, FrameError};
use crate::nb_comm::Exchange;
use core::fmt::{self, Display};
use embedded_hal::serial::{Read, Write};
use log::{debug, trace, warn};

pub mod command;
pub mod config;
pub mod frame;
mod nb_comm;
pub mod response;

pub use crate::response::{Co2AndTemperature, FirmwareVersion, Measurement};

/// Driver for the MH-Z19B/C sensor.
///
/// Only one command is in flight at a time. Calling a method while the
/// exchange of another command is still pending (i.e. the last call
/// returned [`nb::Error::WouldBlock`]) first polls the pending exchange to
/// completion and discards its response.
#[derive(Debug)]
pub struct MhZ19<U> {
    uart: U,
    config: Config,
    pending: Option<Exchange>,
}

impl<U, E> MhZ19<U>
where
    U: Read<u8, Error = E> + Write<u8, Error = E>,
{
    /// Create a new instance with the default [`Config`].
    ///
    /// * `uart`: Serial (UART) interface for communication with the sensor.
    pub fn new(uart: U) -> Self {
        Self::with_config(uart, Config::default())
    }

    pub fn with_config(uart: U, config: Config) -> Self {
        Self {
            uart,
            config,
            pending: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the owned UART interface.
    ///
    /// Note that this might leave the interface with partially written or read
    /// bytes on the UART interface if not all commands have been polled
    /// to completion (i.e. the last command call did return
    /// [`nb::Error::WouldBlock`]).
    pub fn into_inner(self) -> U {
        self.uart
    }

    /// Reads and returns the CO₂ concentration in parts-per-million (ppm).
    pub fn read_co2_ppm(&mut self) -> nb::Result<u16, Error<E>> {
        let frame = self.request(Command::ReadCo2)?;
        Ok(frame.concentration())
    }

    /// Reads the CO₂ concentration together with the auxiliary values the
    /// sensor sends along with it.
    pub fn read_measurement(&mut self) -> nb::Result<Measurement, Error<E>> {
        let frame = self.request(Command::ReadCo2)?;
        Ok(Measurement::from(&frame))
    }

    /// Reads CO₂ concentration and temperature (MH-Z19C, firmware 5+).
    pub fn read_co2_ppm_and_temp_celsius(&mut self) -> nb::Result<Co2AndTemperature, Error<E>> {
        let frame = self.request(Command::ReadCo2AndTemperature)?;
        Ok(Co2AndTemperature::from(&frame))
    }

    pub fn get_firmware_version(&mut self) -> nb::Result<FirmwareVersion, Error<E>> {
        let frame = self.request(Command::GetFirmwareVersion)?;
        Ok(FirmwareVersion::from(&frame))
    }

    /// Calibrates the zero point to 400ppm.
    ///
    /// The sensor must have been operating in 400ppm air for at least 20
    /// minutes.
    pub fn calibrate_zero(&mut self) -> nb::Result<(), Error<E>> {
        self.send(Command::CalibrateZero)
    }

    /// Calibrates the span point to `ppm`.
    ///
    /// Do a zero point calibration first. The sensor must have been
    /// operating at the given concentration for at least 20 minutes. The
    /// data sheet recommends 2000ppm, at least 1000ppm.
    pub fn calibrate_span(&mut self, ppm: u16) -> nb::Result<(), Error<E>> {
        if ppm < 1000 {
            warn!("span calibration at {}ppm, at least 1000ppm recommended", ppm);
        }
        self.send(Command::CalibrateSpan(ppm))
    }

    /// Activates or deactivates the sensor's self-calibration mode.
    ///
    /// See the sensor's data sheet for more information on self-calibration
    /// and hand-operated mode.
    pub fn set_self_calibrate(&mut self, enabled: bool) -> nb::Result<(), Error<E>> {
        self.send(Command::SetSelfCalibrate(enabled))
    }

    /// Sets the detection range, 2000 or 5000ppm.
    pub fn set_detection_range(&mut self, ppm: u16) -> nb::Result<(), Error<E>> {
        if ppm != 2000 && ppm != 5000 {
            warn!("detection range {}ppm is neither 2000 nor 5000ppm", ppm);
        }
        self.send(Command::SetDetectionRange(ppm))
    }

    fn request(&mut self, command: Command) -> nb::Result<Frame, Error<E>> {
        match self.exchange(command)? {
            Some(frame) => self.unpack_return_frame(command, frame).map_err(nb::Error::Other),
            None => unreachable!("{:?} has a response", command),
        }
    }

    fn send(&mut self, command: Command) -> nb::Result<(), Error<E>> {
        self.exchange(command).map(|_| ())
    }

    fn exchange(&mut self, command: Command) -> nb::Result<Option<Frame>, Error<E>> {
        loop {
            let address = self.config.address;
            let exchange = self.pending.get_or_insert_with(|| {
                let exchange = Exchange::new(command, address);
                debug!("sending {:?}: {:02x?}", command, exchange.request().as_ref());
                exchange
            });

            let polled = exchange.poll(&mut self.uart);
            let finished = exchange.command();
            match polled {
                Err(nb::Error::WouldBlock) => return Err(nb::Error::WouldBlock),
                Err(nb::Error::Other(err)) => {
                    self.pending = None;
                    return Err(nb::Error::Other(Error::Uart(err)));
                }
                Ok(response) => {
                    self.pending = None;
                    if finished == command {
                        return Ok(response);
                    }
                    debug!("discarding completed {:?} exchange", finished);
                }
            }
        }
    }

    fn unpack_return_frame(&self, command: Command, frame: Frame) -> Result<Frame, Error<E>> {
        trace!("received {:02x?}", frame.as_ref());
        if let Err(err) = frame.validate() {
            warn!("invalid response to {:?}: {}", command, err);
            return Err(Error::Frame(err));
        }
        if self.config.check_command_echo && frame.command_byte() != command.op_code() {
            warn!(
                "response echoes op code 0x{:x} instead of 0x{:x}",
                frame.command_byte(),
                command.op_code()
            );
            return Err(Error::CommandEchoMismatch {
                expected: command.op_code(),
                got: frame.command_byte(),
            });
        }
        Ok(frame)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error<T> {
    /// The received frame was invalid.
    Frame(FrameError),
    /// Received a response for a different op code than expected. Only
    /// checked if [`Config::check_command_echo`] is set.
    CommandEchoMismatch { expected: u8, got: u8 },
    /// Communication error caused by the UART/serial interface.
    Uart(T),
}

impl<T> From<FrameError> for Error<T> {
    fn from(err: FrameError) -> Self {
        Self::Frame(err)
    }
}

impl<T: Display> Display for Error<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame(err) => write!(f, "frame error: {}", err),
            Self::CommandEchoMismatch { expected, got } => write!(
                f,
                "expected response for op code 0x{:x}, but got op code 0x{:x}",
                expected, got
            ),
            Self::Uart(err) => write!(f, "UART communication error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<T: fmt::Debug + Display> std::error::Error for Error<T> {}

#[cfg(all(test, not(feature = "std")))]
#[macro_use]
extern crate std;
