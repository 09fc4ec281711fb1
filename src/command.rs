//! MH-Z19B/C command definitions.

/// Commands understood by the MH-Z19B/C sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Read the gas concentration (and the auxiliary bytes sent along with
    /// it) from the sensor.
    ReadCo2,
    /// Read CO₂ concentration and temperature from sensor.
    /// Requires a MH-Z19C with firmware version 5 or higher.
    ReadCo2AndTemperature,
    /// Read out the firmware version of the sensor.
    GetFirmwareVersion,
    /// Zero point calibration at 400ppm.
    CalibrateZero,
    /// Span point calibration at the given concentration in ppm.
    CalibrateSpan(u16),
    /// Set self calibration (automatic baseline correction) enabled status.
    SetSelfCalibrate(bool),
    /// Set the detection range in ppm (2000 or 5000).
    SetDetectionRange(u16),
}

impl Command {
    /// Op code used for the command in communication with the sensor.
    pub fn op_code(&self) -> u8 {
        match self {
            Self::ReadCo2 => 0x86,
            Self::ReadCo2AndTemperature => 0x85,
            Self::GetFirmwareVersion => 0xa0,
            Self::CalibrateZero => 0x87,
            Self::CalibrateSpan(_) => 0x88,
            Self::SetSelfCalibrate(_) => 0x79,
            Self::SetDetectionRange(_) => 0x99,
        }
    }

    /// Whether the sensor answers the command with a response frame.
    pub fn expects_response(&self) -> bool {
        matches!(
            self,
            Self::ReadCo2 | Self::ReadCo2AndTemperature | Self::GetFirmwareVersion
        )
    }

    /// Serialize the command op code together with its arguments.
    pub fn serialize(&self) -> [u8; 6] {
        let op_code = self.op_code();
        match *self {
            Self::ReadCo2
            | Self::ReadCo2AndTemperature
            | Self::GetFirmwareVersion
            | Self::CalibrateZero => [op_code, 0, 0, 0, 0, 0],
            Self::CalibrateSpan(ppm) => {
                let [hi, lo] = ppm.to_be_bytes();
                [op_code, hi, lo, 0, 0, 0]
            }
            Self::SetSelfCalibrate(true) => [op_code, 0xa0, 0, 0, 0, 0],
            Self::SetSelfCalibrate(false) => [op_code, 0, 0, 0, 0, 0],
            Self::SetDetectionRange(ppm) => {
                let [hi, lo] = ppm.to_be_bytes();
                [op_code, 0, 0, 0, hi, lo]
            }
        }
    }
}
