//! Non-blocking request/response exchange over the MH-Z19 UART interface.

use crate::command::Command;
use crate::frame::{Frame, FRAME_LEN};
use embedded_hal::serial::{Read, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Write,
    Flush,
    Read,
    Done,
}

/// Writes a request frame and, if the command has one, reads the response.
///
/// The exchange depends on being actively polled. A
/// [`nb::Error::WouldBlock`] from the UART suspends it at the current byte
/// and the next [`Self::poll`] resumes from there. To cancel progress, just
/// stop polling. However, this might leave the sensor with a partially
/// written request or an unread response.
#[derive(Debug)]
pub struct Exchange {
    command: Command,
    request: Frame,
    response: [u8; FRAME_LEN],
    bytes_written: usize,
    bytes_read: usize,
    stage: Stage,
}

impl Exchange {
    pub fn new(command: Command, address: u8) -> Self {
        Self {
            command,
            request: Frame::request(command, address),
            response: [0u8; FRAME_LEN],
            bytes_written: 0,
            bytes_read: 0,
            stage: Stage::Write,
        }
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn request(&self) -> &Frame {
        &self.request
    }

    /// Drive the exchange on `uart`.
    ///
    /// Returns the (unvalidated) response frame on completion, or `None`
    /// for commands without response. Polling a completed exchange returns
    /// the same result again without touching the UART.
    pub fn poll<U, E>(&mut self, uart: &mut U) -> nb::Result<Option<Frame>, E>
    where
        U: Read<u8, Error = E> + Write<u8, Error = E>,
    {
        loop {
            match self.stage {
                Stage::Write => {
                    uart.write(self.request.as_ref()[self.bytes_written])?;
                    self.bytes_written += 1;
                    if self.bytes_written >= FRAME_LEN {
                        self.stage = Stage::Flush;
                    }
                }
                Stage::Flush => {
                    uart.flush()?;
                    self.stage = if self.command.expects_response() {
                        Stage::Read
                    } else {
                        Stage::Done
                    };
                }
                Stage::Read => {
                    self.response[self.bytes_read] = uart.read()?;
                    self.bytes_read += 1;
                    if self.bytes_read >= FRAME_LEN {
                        self.stage = Stage::Done;
                    }
                }
                Stage::Done => {
                    return Ok(if self.command.expects_response() {
                        Some(Frame::new(self.response))
                    } else {
                        None
                    });
                }
            }
        }
    }
}
