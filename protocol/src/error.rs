use std::io;

use thiserror::Error;

/// Failures raised while reading, decoding, encoding, or writing protocol lines.
///
/// Every variant is fatal to a session: the protocol offers no way to ask the
/// server for a retransmission, so a line that cannot be understood leaves the
/// agent without a trustworthy view of the game.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A line had the wrong prefix, too few fields, or a field of the wrong type.
    #[error("invalid {message_type} message: {raw_line}")]
    Malformed {
        /// Human readable name of the message kind that was expected.
        message_type: &'static str,
        /// Line exactly as received.
        raw_line: String,
    },
    /// A line used a message code the agent does not understand.
    #[error("unrecognized server message: {raw_line}")]
    UnknownMessage {
        /// Line exactly as received.
        raw_line: String,
    },
    /// A well-formed line arrived where a different message kind was required.
    #[error("expected {expected} message, received: {raw_line}")]
    UnexpectedMessage {
        /// Human readable name of the message kind that was required.
        expected: &'static str,
        /// Line exactly as received.
        raw_line: String,
    },
    /// The peer closed the stream.
    #[error("server closed the connection")]
    EndOfStream,
    /// An outbound line was rejected before being written.
    #[error("refusing to send {reason}: {line:?}")]
    InvalidOutbound {
        /// Why the line was rejected.
        reason: &'static str,
        /// Offending payload.
        line: String,
    },
    /// The underlying stream failed.
    #[error("channel i/o failed")]
    Io(#[from] io::Error),
}

impl ProtocolError {
    pub(crate) fn malformed(message_type: &'static str, raw_line: &str) -> Self {
        Self::Malformed {
            message_type,
            raw_line: raw_line.to_owned(),
        }
    }
}
