//! Byte sources backed by `std::io`
//!
//! A serial port is just a reader with a timeout, so one adapter covers
//! both live ports and anything else that implements `Read`.

use std::io::{self, Read};
use std::time::Duration;

use paa3905_hal::{ByteSource, DataBits, Parity, StopBits, UartConfig};

/// Errors from the byte source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Port could not be opened
    #[error("cannot open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    /// The other end went away (EOF or hangup)
    #[error("byte stream disconnected")]
    Disconnected,
    /// Any other read failure
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}

/// `ByteSource` over any reader
///
/// Timeouts are reported as an idle read, end-of-stream as
/// [`SourceError::Disconnected`].
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    type Error = SourceError;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.reader.read(buf) {
            Ok(0) => Err(SourceError::Disconnected),
            Ok(n) => Ok(n),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(0)
            }
            Err(e) => Err(SourceError::Io(e)),
        }
    }
}

/// Serial port byte source
pub type SerialSource = ReaderSource<Box<dyn serialport::SerialPort>>;

/// Open `port` with the given link settings
pub fn open_serial(
    port: &str,
    uart: &UartConfig,
    timeout: Duration,
) -> Result<SerialSource, SourceError> {
    let data_bits = match uart.data_bits {
        DataBits::Seven => serialport::DataBits::Seven,
        DataBits::Eight => serialport::DataBits::Eight,
    };
    let parity = match uart.parity {
        Parity::None => serialport::Parity::None,
        Parity::Even => serialport::Parity::Even,
        Parity::Odd => serialport::Parity::Odd,
    };
    let stop_bits = match uart.stop_bits {
        StopBits::One => serialport::StopBits::One,
        StopBits::Two => serialport::StopBits::Two,
    };

    let handle = serialport::new(port, uart.baudrate)
        .data_bits(data_bits)
        .parity(parity)
        .stop_bits(stop_bits)
        .timeout(timeout)
        .open()
        .map_err(|source| SourceError::Open {
            port: port.to_string(),
            source,
        })?;

    Ok(ReaderSource::new(handle))
}
