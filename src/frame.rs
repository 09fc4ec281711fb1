//! Codec for the 9-byte frames exchanged with the sensor.
//!
//! Every request and response on the wire has the same layout:
//!
//! ```text
//! byte  0     1               2          3..=7      8
//!       0xff  address / echo  op / data  data       checksum
//! ```
//!
//! Requests carry the sensor address (`0x01`) in byte 1 and the op code in
//! byte 2. Responses echo the op code in byte 1 and carry data in bytes
//! 2 to 7.

use crate::command::Command;
use core::fmt::{self, Display, Formatter};

/// Length of every frame in bytes.
pub const FRAME_LEN: usize = 9;
/// First byte of every frame.
pub const START_BYTE: u8 = 0xff;
/// Sensor address used in requests unless configured otherwise.
pub const DEFAULT_ADDRESS: u8 = 0x01;

lazy_static! {
    static ref READ_CO2_REQUEST: Frame = Command::ReadCo2.into();
}

/// Checksum over the bytes between start byte and checksum byte.
///
/// Computes `0xff - (sum mod 256) + 1` in wrapping byte arithmetic, i.e.
/// the two's complement of the byte sum.
pub fn checksum(payload: &[u8]) -> u8 {
    let sum = payload.iter().fold(0u8, |acc, &x| acc.wrapping_add(x));
    0xffu8.wrapping_sub(sum).wrapping_add(1)
}

/// Request frame reading the gas concentration from the default address.
///
/// Always `[0xff, 0x01, 0x86, 0x00, 0x00, 0x00, 0x00, 0x00, 0x79]`.
pub fn build_request() -> Frame {
    *READ_CO2_REQUEST
}

/// Validates a response frame and decodes the CO₂ concentration in ppm.
///
/// Checks the length, the start byte and the checksum, in that order. The
/// command echo in byte 1 is not checked.
pub fn parse_response(bytes: &[u8]) -> Result<u16, FrameError> {
    let frame = Frame::try_from(bytes)?;
    frame.validate()?;
    Ok(frame.concentration())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame([u8; FRAME_LEN]);

impl From<Command> for Frame {
    fn from(command: Command) -> Self {
        Self::request(command, DEFAULT_ADDRESS)
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = FrameError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let buf = <[u8; FRAME_LEN]>::try_from(bytes)
            .map_err(|_| FrameError::WrongLength(bytes.len()))?;
        Ok(Self(buf))
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Frame {
    pub fn new(data: [u8; FRAME_LEN]) -> Self {
        Self(data)
    }

    /// Request frame for `command` addressed to the sensor at `address`.
    pub fn request(command: Command, address: u8) -> Self {
        let mut buf = [START_BYTE, address, 0, 0, 0, 0, 0, 0, 0];
        buf[2..8].copy_from_slice(&command.serialize());
        buf[8] = checksum(&buf[1..8]);
        Self(buf)
    }

    pub fn into_inner(self) -> [u8; FRAME_LEN] {
        self.0
    }

    pub fn start_byte(&self) -> u8 {
        self.0[0]
    }

    /// Address in a request, op code echo in a response.
    pub fn command_byte(&self) -> u8 {
        self.0[1]
    }

    /// Data bytes 2 to 7 of a response.
    pub fn data(&self) -> &[u8] {
        &self.0[2..8]
    }

    pub fn checksum(&self) -> u8 {
        self.0[8]
    }

    /// Concentration in ppm carried in bytes 2 (high) and 3 (low).
    pub fn concentration(&self) -> u16 {
        u16::from_be_bytes([self.0[2], self.0[3]])
    }

    pub fn has_valid_start_byte(&self) -> bool {
        self.start_byte() == START_BYTE
    }

    pub fn has_valid_checksum(&self) -> bool {
        checksum(&self.0[1..8]) == self.checksum()
    }

    pub fn validate(&self) -> Result<(), FrameError> {
        if !self.has_valid_start_byte() {
            Err(FrameError::BadStart(self.start_byte()))
        } else if !self.has_valid_checksum() {
            Err(FrameError::BadChecksum {
                expected: checksum(&self.0[1..8]),
                got: self.checksum(),
            })
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// The buffer did not hold exactly [`FRAME_LEN`] bytes.
    WrongLength(usize),
    /// The first byte was not [`START_BYTE`].
    BadStart(u8),
    /// The checksum byte did not match the frame contents.
    BadChecksum { expected: u8, got: u8 },
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        use FrameError::*;
        match self {
            WrongLength(got) => write!(f, "Expected {} bytes, but got {}.", FRAME_LEN, got),
            BadStart(got) => write!(f, "Expected start byte 0xff, but got 0x{:x}.", got),
            BadChecksum { expected, got } => write!(
                f,
                "Invalid checksum, expected 0x{:x}, but got 0x{:x}.",
                expected, got
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FrameError {}

#[cfg(test)]
mod tests {
    use super::*;

    const READ_CO2_REQUEST_BYTES: [u8; 9] = [0xff, 0x01, 0x86, 0x00, 0x00, 0x00, 0x00, 0x00, 0x79];
    const RESPONSE_600_PPM: [u8; 9] = [0xff, 0x86, 0x02, 0x58, 0x00, 0x00, 0x00, 0x00, 0x20];

    fn response_frame(co2_ppm: u16) -> [u8; 9] {
        let [hi, lo] = co2_ppm.to_be_bytes();
        let mut buf = [START_BYTE, 0x86, hi, lo, 0, 0, 0, 0, 0];
        buf[8] = checksum(&buf[1..8]);
        buf
    }

    #[test]
    fn test_build_request() {
        assert_eq!(build_request().as_ref(), &READ_CO2_REQUEST_BYTES);
        assert_eq!(build_request(), build_request());
    }

    #[test]
    fn test_checksum_known_values() {
        assert_eq!(checksum(&[0x01, 0x86, 0x00, 0x00, 0x00, 0x00, 0x00]), 0x79);
        assert_eq!(checksum(&[0x01, 0x88, 0x07, 0xd0, 0x00, 0x00, 0x00]), 0xa0);
        assert_eq!(checksum(&[0x86, 0x02, 0x60, 0x47, 0x00, 0x00, 0x00]), 0xd1);
    }

    #[test]
    fn test_checksum_of_zero_sum_is_zero() {
        assert_eq!(checksum(&[0; 7]), 0x00);
        assert_eq!(checksum(&[0x80, 0x80, 0, 0, 0, 0, 0]), 0x00);
    }

    #[test]
    fn test_checksum_is_deterministic() {
        let payload = [0x86, 0x03, 0x20, 0x12, 0x34, 0x56, 0x78];
        assert_eq!(checksum(&payload), checksum(&payload));
        assert_eq!(checksum(&payload), 0x43);
    }

    #[test]
    fn test_command_frames() {
        assert_eq!(
            Frame::from(Command::CalibrateZero).into_inner(),
            [0xff, 0x01, 0x87, 0x00, 0x00, 0x00, 0x00, 0x00, 0x78]
        );
        assert_eq!(
            Frame::from(Command::SetSelfCalibrate(true)).into_inner(),
            [0xff, 0x01, 0x79, 0xa0, 0x00, 0x00, 0x00, 0x00, 0xe6]
        );
        assert_eq!(
            Frame::from(Command::SetSelfCalibrate(false)).into_inner(),
            [0xff, 0x01, 0x79, 0x00, 0x00, 0x00, 0x00, 0x00, 0x86]
        );
        assert_eq!(
            Frame::from(Command::CalibrateSpan(2000)).into_inner(),
            [0xff, 0x01, 0x88, 0x07, 0xd0, 0x00, 0x00, 0x00, 0xa0]
        );
        assert_eq!(
            Frame::from(Command::SetDetectionRange(5000)).into_inner(),
            [0xff, 0x01, 0x99, 0x00, 0x00, 0x00, 0x13, 0x88, 0xcb]
        );
    }

    #[test]
    fn test_request_with_other_address() {
        let frame = Frame::request(Command::ReadCo2, 0x02);
        assert_eq!(frame.command_byte(), 0x02);
        assert_eq!(frame.checksum(), 0x78);
        assert_eq!(frame.validate(), Ok(()));
    }

    #[test]
    fn test_parse_response() {
        assert_eq!(parse_response(&RESPONSE_600_PPM), Ok(600));
    }

    #[test]
    fn test_parse_response_ignores_command_echo() {
        let mut response = RESPONSE_600_PPM;
        response[1] = 0x00;
        response[8] = checksum(&response[1..8]);
        assert_eq!(parse_response(&response), Ok(600));
    }

    #[test]
    fn test_parse_response_flipped_checksum_bit() {
        for bit in 0..8 {
            let mut response = RESPONSE_600_PPM;
            response[8] ^= 1 << bit;
            assert_eq!(
                parse_response(&response),
                Err(FrameError::BadChecksum {
                    expected: 0x20,
                    got: 0x20 ^ (1 << bit)
                })
            );
        }
    }

    #[test]
    fn test_parse_response_corrupted_data() {
        let mut response = RESPONSE_600_PPM;
        response[3] = 0x59;
        assert!(matches!(
            parse_response(&response),
            Err(FrameError::BadChecksum { .. })
        ));
    }

    #[test]
    fn test_parse_response_bad_start() {
        let mut response = RESPONSE_600_PPM;
        response[0] = 0xfe;
        assert_eq!(parse_response(&response), Err(FrameError::BadStart(0xfe)));
    }

    #[test]
    fn test_parse_response_checks_start_before_checksum() {
        let mut response = RESPONSE_600_PPM;
        response[0] = 0x00;
        response[8] = 0x00;
        assert_eq!(parse_response(&response), Err(FrameError::BadStart(0x00)));
    }

    #[test]
    fn test_parse_response_wrong_length() {
        assert_eq!(
            parse_response(&RESPONSE_600_PPM[..8]),
            Err(FrameError::WrongLength(8))
        );
        let mut long = [0u8; 10];
        long[..9].copy_from_slice(&RESPONSE_600_PPM);
        assert_eq!(parse_response(&long), Err(FrameError::WrongLength(10)));
        assert_eq!(parse_response(&[]), Err(FrameError::WrongLength(0)));
    }

    #[test]
    fn test_parse_response_any_concentration() {
        for co2_ppm in 0..=u16::MAX {
            assert_eq!(parse_response(&response_frame(co2_ppm)), Ok(co2_ppm));
        }
    }
}
