use std::io;

use subsim_protocol::ProtocolError;
use subsim_system_tactics::PlanningError;
use subsim_world::{ConfigurationError, DesyncError};
use thiserror::Error;

use crate::Phase;

/// Terminal failure of a game session.
///
/// None of these are recoverable: the protocol has no way to ask for a
/// retransmission or to skip a turn, so the session ends on the first one.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A line could not be read, decoded, encoded, or written.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// A message carried a turn number other than the one being played.
    #[error("turn number out of sync: expected {expected}, received {received} in {raw_line}")]
    TurnMismatch {
        /// Turn number the session expected.
        expected: u32,
        /// Turn number the message carried.
        received: u32,
        /// Line exactly as received.
        raw_line: String,
    },
    /// A report disagreed with the world model.
    #[error("world model out of sync: {0}")]
    Desync(#[from] DesyncError),
    /// The game configuration cannot be played.
    #[error("unsupported game configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    /// The planner could not produce a command.
    #[error("planning failed: {0}")]
    Planning(#[from] PlanningError),
    /// The server did not acknowledge the join request.
    #[error("failed to join as {username}, server responded: {response}")]
    JoinRejected {
        /// Name the agent tried to join with.
        username: String,
        /// Line the server answered with.
        response: String,
    },
    /// The turn pacer failed while waiting between turns.
    #[error("turn pacing failed")]
    Pacing(#[source] io::Error),
    /// The session was asked to run again after it had started.
    #[error("session cannot start from the {phase:?} phase")]
    AlreadyStarted {
        /// Phase the session was in.
        phase: Phase,
    },
}
