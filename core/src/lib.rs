#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the SubSim agent.
//!
//! This crate defines the vocabulary that connects the protocol codec, the
//! world model, and the pure decision systems. The codec turns server lines
//! into values built from these types, the world stores them, and the systems
//! answer with a single [`Command`] per turn which the codec encodes back onto
//! the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a single map square expressed as 1-based column and row.
///
/// Coordinates are plain values: equality and hashing use the exact `(x, y)`
/// pair. A coordinate may lie outside the configured map (for example after
/// shifting off an edge); callers check bounds against the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the square, starting at 1 on the western edge.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the square, starting at 1 on the northern edge.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the adjacent coordinate one step in the provided direction.
    #[must_use]
    pub const fn shifted(self, direction: Direction) -> Self {
        match direction {
            Direction::North => Self::new(self.x, self.y - 1),
            Direction::East => Self::new(self.x + 1, self.y),
            Direction::South => Self::new(self.x, self.y + 1),
            Direction::West => Self::new(self.x - 1, self.y),
        }
    }

    /// Chebyshev distance between two coordinates.
    ///
    /// This is the radius a detonation needs to reach `other` from `self`.
    #[must_use]
    pub fn blast_distance(self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.x, self.y)
    }
}

/// Cardinal movement directions available to submarines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Single-letter wire code of the direction.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::East => "E",
            Self::South => "S",
            Self::West => "W",
        }
    }

    /// Parses a single-letter wire code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|direction| direction.code() == code)
    }
}

/// Equipment that can be charged while moving or sleeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equipment {
    /// Charge nothing.
    None,
    /// Charge the sonar, extending the next ping.
    Sonar,
    /// Charge the torpedo launcher, extending the next shot.
    Torpedo,
    /// Charge the sprint engine.
    Sprint,
}

impl Equipment {
    const ALL: [Equipment; 4] = [
        Equipment::None,
        Equipment::Sonar,
        Equipment::Torpedo,
        Equipment::Sprint,
    ];

    /// Wire token of the equipment.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Sonar => "Sonar",
            Self::Torpedo => "Torpedo",
            Self::Sprint => "Sprint",
        }
    }

    /// Parses a wire token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|equipment| equipment.token() == token)
    }
}

/// Identifier the server assigns to a submarine within a player's fleet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmarineId(u32);

impl SubmarineId {
    /// Creates a new submarine identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SubmarineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of one submarine as reported by the server at the end of a turn.
///
/// A status report replaces the previous one wholesale; fields absent from the
/// wire keep the defaults of [`SubmarineStatus::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmarineStatus {
    /// Submarine the report describes.
    pub id: SubmarineId,
    /// Square the submarine occupies.
    pub location: Coordinate,
    /// Whether the submarine accepts commands this turn.
    pub active: bool,
    /// Whether the submarine has been destroyed.
    pub dead: bool,
    /// Remaining shields.
    pub shield_count: u32,
    /// Remaining torpedoes, `None` when the supply is unlimited.
    pub torpedo_count: Option<u32>,
    /// Remaining mines, `None` when the supply is unlimited.
    pub mine_count: Option<u32>,
    /// Range a sonar ping would cover right now.
    pub sonar_range: u32,
    /// Distance a sprint could cover right now.
    pub sprint_range: u32,
    /// Distance a torpedo could travel right now.
    pub torpedo_range: u32,
    /// Whether a mine is charged and ready to deploy.
    pub mine_ready: bool,
    /// Turns left before a surfaced submarine may dive again.
    pub surface_turns_remaining: u32,
    /// Accumulated reactor damage.
    pub reactor_damage: u32,
}

impl SubmarineStatus {
    /// Creates a status report with every optional attribute at its default.
    #[must_use]
    pub const fn new(id: SubmarineId, location: Coordinate, active: bool) -> Self {
        Self {
            id,
            location,
            active,
            dead: false,
            shield_count: 0,
            torpedo_count: None,
            mine_count: None,
            sonar_range: 0,
            sprint_range: 0,
            torpedo_range: 0,
            mine_ready: false,
            surface_turns_remaining: 0,
            reactor_damage: 0,
        }
    }
}

/// One named custom game setting announced before play begins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetting {
    name: String,
    values: Vec<String>,
}

impl GameSetting {
    /// Creates a setting from its name and raw values.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Name of the setting, for example `Obstacle`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw values that follow the name.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Raw value at the provided index, if present.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}

impl fmt::Display for GameSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.values.join(", "))
    }
}

/// Commands the agent may send to the game server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Requests to join the game under the provided name.
    Join {
        /// Player name shown by the server.
        username: String,
        /// Start square, required when the server did not assign one.
        start: Option<Coordinate>,
    },
    /// Pings the sonar, discovering objects within sonar range.
    Ping {
        /// Turn the command belongs to.
        turn: u32,
        /// Submarine executing the command.
        submarine: SubmarineId,
    },
    /// Moves one square while charging a piece of equipment.
    Move {
        /// Turn the command belongs to.
        turn: u32,
        /// Submarine executing the command.
        submarine: SubmarineId,
        /// Direction of travel.
        direction: Direction,
        /// Equipment charged during the move.
        equipment: Equipment,
    },
    /// Sprints several squares in one direction.
    Sprint {
        /// Turn the command belongs to.
        turn: u32,
        /// Submarine executing the command.
        submarine: SubmarineId,
        /// Direction of travel.
        direction: Direction,
        /// Number of squares to cover.
        distance: u32,
    },
    /// Fires a torpedo at the provided square.
    Fire {
        /// Turn the command belongs to.
        turn: u32,
        /// Submarine executing the command.
        submarine: SubmarineId,
        /// Square the torpedo detonates on.
        target: Coordinate,
    },
    /// Deploys a mine onto the adjacent square in the provided direction.
    Mine {
        /// Turn the command belongs to.
        turn: u32,
        /// Submarine executing the command.
        submarine: SubmarineId,
        /// Side of the submarine the mine is dropped on.
        direction: Direction,
    },
    /// Stays in place while charging up to two pieces of equipment.
    Sleep {
        /// Turn the command belongs to.
        turn: u32,
        /// Submarine executing the command.
        submarine: SubmarineId,
        /// First piece of equipment to charge.
        first: Equipment,
        /// Second piece of equipment to charge.
        second: Equipment,
    },
    /// Surfaces the submarine to repair reactor damage.
    Surface {
        /// Turn the command belongs to.
        turn: u32,
        /// Submarine executing the command.
        submarine: SubmarineId,
    },
}

impl Command {
    /// Turn number the command belongs to; `None` for the join request.
    #[must_use]
    pub const fn turn(&self) -> Option<u32> {
        match self {
            Self::Join { .. } => None,
            Self::Ping { turn, .. }
            | Self::Move { turn, .. }
            | Self::Sprint { turn, .. }
            | Self::Fire { turn, .. }
            | Self::Mine { turn, .. }
            | Self::Sleep { turn, .. }
            | Self::Surface { turn, .. } => Some(*turn),
        }
    }

    /// Submarine the command addresses; `None` for the join request.
    #[must_use]
    pub const fn submarine(&self) -> Option<SubmarineId> {
        match self {
            Self::Join { .. } => None,
            Self::Ping { submarine, .. }
            | Self::Move { submarine, .. }
            | Self::Sprint { submarine, .. }
            | Self::Fire { submarine, .. }
            | Self::Mine { submarine, .. }
            | Self::Sleep { submarine, .. }
            | Self::Surface { submarine, .. } => Some(*submarine),
        }
    }
}

/// Turn results reported by the server that the world model absorbs.
///
/// Observations are the informational half of the protocol with the turn
/// number already verified and stripped off by the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Observation {
    /// Number of sonar pings heard during the turn.
    SonarActivations {
        /// Number of activations.
        count: u32,
    },
    /// A contact detected by one of our own pings.
    SonarDetection {
        /// Our submarine that heard the contact.
        submarine: SubmarineId,
        /// Distance to the contact.
        distance: u32,
    },
    /// Number of sprints heard during the turn.
    SprintActivations {
        /// Number of activations.
        count: u32,
    },
    /// A mine or torpedo detonated.
    Detonation {
        /// Square the detonation centred on.
        location: Coordinate,
        /// Blast radius.
        radius: u32,
    },
    /// Mass detected on a square.
    Discovery {
        /// Square the mass was found on.
        location: Coordinate,
        /// Detected mass.
        size: u32,
    },
    /// A torpedo damaged something.
    TorpedoHit {
        /// Square that was hit.
        location: Coordinate,
        /// Damage dealt.
        damage: u32,
    },
    /// A mine damaged something.
    MineHit {
        /// Square that was hit.
        location: Coordinate,
        /// Damage dealt.
        damage: u32,
    },
    /// Fresh status of our own submarine.
    SubmarineInfo(SubmarineStatus),
    /// Our score so far.
    Score {
        /// Reported score.
        score: i64,
    },
}
