use std::{
    collections::VecDeque,
    io::{BufRead, Write},
};

use tracing::trace;

use crate::{check_outbound, ProtocolError};

/// Capability to pull the next inbound line.
///
/// Decoding receives this capability instead of owning the connection, so
/// messages that announce trailing lines can read them on the spot.
///
/// Reads block until a full line is available. There is no timeout: a peer
/// that stops sending stalls the agent until the process is terminated.
pub trait LineSource {
    /// Returns the next line without its terminator, or
    /// [`ProtocolError::EndOfStream`] once the peer has closed the stream.
    fn read_line(&mut self) -> Result<String, ProtocolError>;
}

/// Capability to push one outbound line.
pub trait LineSink {
    /// Validates and writes `line`, appending the line terminator.
    fn write_line(&mut self, line: &str) -> Result<(), ProtocolError>;
}

impl<T: LineSource + ?Sized> LineSource for &mut T {
    fn read_line(&mut self) -> Result<String, ProtocolError> {
        (**self).read_line()
    }
}

impl<T: LineSink + ?Sized> LineSink for &mut T {
    fn write_line(&mut self, line: &str) -> Result<(), ProtocolError> {
        (**self).write_line(line)
    }
}

impl LineSource for VecDeque<String> {
    fn read_line(&mut self) -> Result<String, ProtocolError> {
        self.pop_front().ok_or(ProtocolError::EndOfStream)
    }
}

/// Newline-delimited text channel over a buffered reader and a writer.
#[derive(Debug)]
pub struct LineChannel<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> LineChannel<R, W> {
    /// Wraps the two halves of a connection.
    #[must_use]
    pub const fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read-only access to the writing half.
    #[must_use]
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    /// Releases the two halves of the connection.
    #[must_use]
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W> LineSource for LineChannel<R, W> {
    fn read_line(&mut self) -> Result<String, ProtocolError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ProtocolError::EndOfStream);
        }

        let content = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(content);
        trace!(%line, "recv");
        Ok(line)
    }
}

impl<R, W: Write> LineSink for LineChannel<R, W> {
    fn write_line(&mut self, line: &str) -> Result<(), ProtocolError> {
        check_outbound(line)?;
        trace!(%line, "send");
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
