#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Message codec for the SubSim line protocol.
//!
//! Every line is a `|`-delimited record whose first field is a single-letter
//! message code. Inbound lines decode into [`ServerMessage`] values through a
//! table keyed by that code; outbound [`Command`](subsim_core::Command) values
//! encode into lines with [`encode`]. Decoding is a function of a
//! [`LineSource`], which lets configuration and game-finished messages pull
//! the lines they announce without owning the connection.

mod channel;
mod encode;
mod error;
mod fields;
mod message;

pub use channel::{LineChannel, LineSink, LineSource};
pub use encode::{check_outbound, decode_command, encode, join_acknowledgement};
pub use error::ProtocolError;
pub use fields::{MessageFields, FIELD_DELIMITER};
pub use message::{
    decode, decode_player_result, decode_setting, GameConfig, GameOutcome, PlayerResult,
    ServerMessage,
};
