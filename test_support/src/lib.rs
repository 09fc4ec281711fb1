//! Test helpers shared by the unit and doc tests of `mhz19-uart`.

pub mod serial_mock;

use serial_mock::SerialMock;

/// Gas concentration request to the default address.
pub const READ_CO2_COMMAND: [u8; 9] = [0xff, 0x01, 0x86, 0x00, 0x00, 0x00, 0x00, 0x00, 0x79];

/// Gas concentration response: 600ppm, 23°C, status 0.
pub const READ_CO2_RESPONSE: [u8; 9] = [0xff, 0x86, 0x02, 0x58, 0x3f, 0x00, 0x00, 0x00, 0xe1];

/// Self calibration request enabling automatic baseline correction.
pub const SELF_CALIBRATE_ON_COMMAND: [u8; 9] =
    [0xff, 0x01, 0x79, 0xa0, 0x00, 0x00, 0x00, 0x00, 0xe6];

/// Mock accepting one request frame and answering with `response`.
pub fn create_serial_mock_returning(response: &[u8]) -> SerialMock {
    SerialMock::new(
        response.iter().copied().map(Ok).collect(),
        vec![Ok(()); 9],
    )
}
