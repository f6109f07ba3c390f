use subsim_core::{Coordinate, GameSetting, SubmarineId};
use thiserror::Error;

/// The world model can no longer be trusted to match the server's view.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DesyncError {
    /// A report referenced a square outside the configured map.
    #[error("square {location} lies outside the {width}x{height} map")]
    UnknownSquare {
        /// Offending coordinate.
        location: Coordinate,
        /// Configured map width.
        width: u32,
        /// Configured map height.
        height: u32,
    },
    /// A status report described a submarine the agent does not command.
    #[error("status for submarine {received} does not match own submarine {expected}")]
    SubmarineMismatch {
        /// Identifier of the agent's submarine.
        expected: SubmarineId,
        /// Identifier carried by the report.
        received: SubmarineId,
    },
}

/// The game configuration cannot be played by a single-submarine agent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The map has no squares, or more than [`MAX_SQUARES`](crate::MAX_SQUARES).
    #[error("map dimensions {width}x{height} are not playable")]
    InvalidDimensions {
        /// Announced map width.
        width: u32,
        /// Announced map height.
        height: u32,
    },
    /// The game customises the number of submarines per player.
    #[error("setting {setting} configures a fleet, only a single submarine is supported")]
    FleetSetting {
        /// Offending setting.
        setting: GameSetting,
    },
    /// A setting addressed a submarine other than the agent's own.
    #[error("unknown submarine {submarine} in setting {setting}")]
    UnknownSubmarine {
        /// Identifier named by the setting.
        submarine: u32,
        /// Setting that named it.
        setting: GameSetting,
    },
    /// A setting value was missing or not a number.
    #[error("invalid value in setting {setting}")]
    InvalidValue {
        /// Offending setting.
        setting: GameSetting,
    },
    /// A setting named a square outside the map.
    #[error("setting {setting} names square {location} outside the map")]
    OutOfBounds {
        /// Offending setting.
        setting: GameSetting,
        /// Coordinate that lies outside the map.
        location: Coordinate,
    },
}
