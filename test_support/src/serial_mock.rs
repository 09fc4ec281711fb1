use embedded_hal::serial::{Read, Write};
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

/// UART mock replaying queued results.
///
/// Reads and writes pop their results from the queues given to
/// [`SerialMock::new`] and return [`nb::Error::WouldBlock`] once a queue is
/// exhausted.
#[derive(Debug)]
pub struct SerialMock {
    read_return_values: VecDeque<nb::Result<u8, String>>,
    write_return_values: VecDeque<nb::Result<(), String>>,
    bytes_read: usize,
    /// All bytes successfully written.
    pub write_buf: Vec<u8>,
    /// Length of `write_buf` at the last flush.
    pub flushed_up_to: usize,
}

impl SerialMock {
    pub fn new(
        read_return_values: Vec<nb::Result<u8, String>>,
        write_return_values: Vec<nb::Result<(), String>>,
    ) -> Self {
        Self {
            read_return_values: VecDeque::from(read_return_values),
            write_return_values: VecDeque::from(write_return_values),
            bytes_read: 0,
            write_buf: vec![],
            flushed_up_to: 0,
        }
    }

    /// Number of bytes successfully read from the mock.
    pub fn read_count(&self) -> usize {
        self.bytes_read
    }
}

impl Read<u8> for SerialMock {
    type Error = String;

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        let return_value = self
            .read_return_values
            .pop_front()
            .unwrap_or(Err(nb::Error::WouldBlock));
        if return_value.is_ok() {
            self.bytes_read += 1;
        }
        return_value
    }
}

impl Write<u8> for SerialMock {
    type Error = String;

    fn write(&mut self, c: u8) -> nb::Result<(), Self::Error> {
        if let Some(return_value) = self.write_return_values.pop_front() {
            if return_value.is_ok() {
                self.write_buf.push(c);
            }
            return_value
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.flushed_up_to = self.write_buf.len();
        Ok(())
    }
}
