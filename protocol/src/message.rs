use serde::{Deserialize, Serialize};
use subsim_core::{Coordinate, GameSetting, SubmarineId, SubmarineStatus};

use crate::{fields::FIELD_DELIMITER, LineSource, MessageFields, ProtocolError};

/// Initial game configuration announced by the server right after connecting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Version string of the server software.
    pub server_version: String,
    /// Title of the game being joined.
    pub title: String,
    /// Number of map columns.
    pub width: u32,
    /// Number of map rows.
    pub height: u32,
    /// Custom settings read from the `V` lines that follow the configuration.
    pub settings: Vec<GameSetting>,
}

/// Final score of one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    /// Name the player joined with.
    pub name: String,
    /// Final score.
    pub score: i64,
}

/// Summary the server sends once the game is over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Number of players the server reported.
    pub player_count: u32,
    /// Number of turns that were played.
    pub turn_count: u32,
    /// Final state of the game, for example `finished` or `aborted`.
    pub state: String,
    /// Results read from the `P` lines that follow the summary.
    pub results: Vec<PlayerResult>,
}

/// Every inbound message the agent understands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerMessage {
    /// Game configuration together with its custom settings.
    Config(GameConfig),
    /// Start of a new turn; the agent answers with exactly one command.
    BeginTurn {
        /// Number of the turn that begins.
        turn: u32,
    },
    /// Number of sonar pings heard during the turn.
    SonarActivations {
        /// Turn the report belongs to.
        turn: u32,
        /// Number of activations.
        count: u32,
    },
    /// A foreign submarine detected by one of our sonar pings.
    SonarDetection {
        /// Turn the report belongs to.
        turn: u32,
        /// Our submarine that heard the contact.
        submarine: SubmarineId,
        /// Distance to the contact.
        distance: u32,
    },
    /// Number of sprints heard during the turn.
    SprintActivations {
        /// Turn the report belongs to.
        turn: u32,
        /// Number of activations.
        count: u32,
    },
    /// A mine or torpedo detonated.
    Detonation {
        /// Turn the report belongs to.
        turn: u32,
        /// Square the detonation centred on.
        location: Coordinate,
        /// Blast radius.
        radius: u32,
    },
    /// Mass detected on a square by a sonar ping.
    DiscoveredObject {
        /// Turn the report belongs to.
        turn: u32,
        /// Square the mass was found on.
        location: Coordinate,
        /// Detected mass.
        size: u32,
    },
    /// A torpedo damaged something.
    TorpedoHit {
        /// Turn the report belongs to.
        turn: u32,
        /// Square that was hit.
        location: Coordinate,
        /// Damage dealt.
        damage: u32,
    },
    /// A mine damaged something.
    MineHit {
        /// Turn the report belongs to.
        turn: u32,
        /// Square that was hit.
        location: Coordinate,
        /// Damage dealt.
        damage: u32,
    },
    /// Status of one of our submarines.
    SubmarineInfo {
        /// Turn the report belongs to.
        turn: u32,
        /// Reported status.
        status: SubmarineStatus,
    },
    /// Our score so far.
    PlayerScore {
        /// Turn the report belongs to.
        turn: u32,
        /// Current score.
        score: i64,
    },
    /// The game is over.
    GameFinished(GameOutcome),
    /// Free-form error text from the server.
    ServerError {
        /// Text that followed the `E` code.
        text: String,
    },
}

impl ServerMessage {
    /// Turn number embedded in the message, if the message carries one.
    #[must_use]
    pub const fn turn(&self) -> Option<u32> {
        match self {
            Self::BeginTurn { turn }
            | Self::SonarActivations { turn, .. }
            | Self::SonarDetection { turn, .. }
            | Self::SprintActivations { turn, .. }
            | Self::Detonation { turn, .. }
            | Self::DiscoveredObject { turn, .. }
            | Self::TorpedoHit { turn, .. }
            | Self::MineHit { turn, .. }
            | Self::SubmarineInfo { turn, .. }
            | Self::PlayerScore { turn, .. } => Some(*turn),
            Self::Config(_) | Self::GameFinished(_) | Self::ServerError { .. } => None,
        }
    }
}

type DecodeFn = fn(&MessageFields<'_>, &mut dyn LineSource) -> Result<ServerMessage, ProtocolError>;

/// Shape of one inbound message kind.
struct InboundKind {
    prefix: &'static str,
    name: &'static str,
    min_fields: usize,
    decode: DecodeFn,
}

const INBOUND: &[InboundKind] = &[
    InboundKind {
        prefix: "C",
        name: "game config",
        min_fields: 6,
        decode: decode_config,
    },
    InboundKind {
        prefix: "B",
        name: "begin turn",
        min_fields: 2,
        decode: decode_begin_turn,
    },
    InboundKind {
        prefix: "S",
        name: "sonar",
        min_fields: 3,
        decode: decode_sonar,
    },
    InboundKind {
        prefix: "R",
        name: "sprint activation",
        min_fields: 3,
        decode: decode_sprint_activations,
    },
    InboundKind {
        prefix: "D",
        name: "detonation",
        min_fields: 5,
        decode: decode_detonation,
    },
    InboundKind {
        prefix: "O",
        name: "discovered object",
        min_fields: 5,
        decode: decode_discovered_object,
    },
    InboundKind {
        prefix: "T",
        name: "torpedo hit",
        min_fields: 5,
        decode: decode_torpedo_hit,
    },
    InboundKind {
        prefix: "M",
        name: "mine hit",
        min_fields: 5,
        decode: decode_mine_hit,
    },
    InboundKind {
        prefix: "I",
        name: "submarine info",
        min_fields: 6,
        decode: decode_submarine_info,
    },
    InboundKind {
        prefix: "H",
        name: "player score",
        min_fields: 3,
        decode: decode_player_score,
    },
    InboundKind {
        prefix: "F",
        name: "game finished",
        min_fields: 4,
        decode: decode_game_finished,
    },
    InboundKind {
        prefix: "E",
        name: "server error",
        min_fields: 1,
        decode: decode_server_error,
    },
];

/// Decodes one inbound line.
///
/// Configuration and game-finished messages announce how many setting or
/// result lines follow them; those lines are pulled from `source` before this
/// function returns, so the caller always receives a complete message.
pub fn decode(line: &str, source: &mut dyn LineSource) -> Result<ServerMessage, ProtocolError> {
    let prefix = line.split(FIELD_DELIMITER).next().unwrap_or_default();
    let kind = INBOUND
        .iter()
        .find(|kind| kind.prefix == prefix)
        .ok_or_else(|| ProtocolError::UnknownMessage {
            raw_line: line.to_owned(),
        })?;
    let fields = MessageFields::parse(line, Some(kind.prefix), kind.name, kind.min_fields)?;
    (kind.decode)(&fields, source)
}

/// Decodes a `V|name|value...` custom setting line.
pub fn decode_setting(line: &str) -> Result<GameSetting, ProtocolError> {
    let fields = MessageFields::parse(line, Some("V"), "game setting", 3)?;
    let name = fields.text(1)?;
    let values = fields.rest(2).iter().map(|value| (*value).to_owned()).collect();
    Ok(GameSetting::new(name, values))
}

/// Decodes a `P|name|score` player result line.
pub fn decode_player_result(line: &str) -> Result<PlayerResult, ProtocolError> {
    let fields = MessageFields::parse(line, Some("P"), "player result", 3)?;
    Ok(PlayerResult {
        name: fields.text(1)?.to_owned(),
        score: fields.integer(2)?,
    })
}

fn decode_config(
    fields: &MessageFields<'_>,
    source: &mut dyn LineSource,
) -> Result<ServerMessage, ProtocolError> {
    let setting_count: usize = fields.integer(5)?;
    let mut settings = Vec::new();
    for _ in 0..setting_count {
        let line = source.read_line()?;
        settings.push(decode_setting(&line)?);
    }

    Ok(ServerMessage::Config(GameConfig {
        server_version: fields.text(1)?.to_owned(),
        title: fields.text(2)?.to_owned(),
        width: fields.integer(3)?,
        height: fields.integer(4)?,
        settings,
    }))
}

fn decode_begin_turn(
    fields: &MessageFields<'_>,
    _: &mut dyn LineSource,
) -> Result<ServerMessage, ProtocolError> {
    Ok(ServerMessage::BeginTurn {
        turn: fields.integer(1)?,
    })
}

fn decode_sonar(
    fields: &MessageFields<'_>,
    _: &mut dyn LineSource,
) -> Result<ServerMessage, ProtocolError> {
    let turn = fields.integer(1)?;
    if fields.len() >= 4 {
        return Ok(ServerMessage::SonarDetection {
            turn,
            submarine: SubmarineId::new(fields.integer(2)?),
            distance: fields.integer(3)?,
        });
    }

    Ok(ServerMessage::SonarActivations {
        turn,
        count: fields.integer(2)?,
    })
}

fn decode_sprint_activations(
    fields: &MessageFields<'_>,
    _: &mut dyn LineSource,
) -> Result<ServerMessage, ProtocolError> {
    Ok(ServerMessage::SprintActivations {
        turn: fields.integer(1)?,
        count: fields.integer(2)?,
    })
}

fn decode_detonation(
    fields: &MessageFields<'_>,
    _: &mut dyn LineSource,
) -> Result<ServerMessage, ProtocolError> {
    Ok(ServerMessage::Detonation {
        turn: fields.integer(1)?,
        location: location(fields, 2)?,
        radius: fields.integer(4)?,
    })
}

fn decode_discovered_object(
    fields: &MessageFields<'_>,
    _: &mut dyn LineSource,
) -> Result<ServerMessage, ProtocolError> {
    Ok(ServerMessage::DiscoveredObject {
        turn: fields.integer(1)?,
        location: location(fields, 2)?,
        size: fields.integer(4)?,
    })
}

fn decode_torpedo_hit(
    fields: &MessageFields<'_>,
    _: &mut dyn LineSource,
) -> Result<ServerMessage, ProtocolError> {
    Ok(ServerMessage::TorpedoHit {
        turn: fields.integer(1)?,
        location: location(fields, 2)?,
        damage: fields.integer(4)?,
    })
}

fn decode_mine_hit(
    fields: &MessageFields<'_>,
    _: &mut dyn LineSource,
) -> Result<ServerMessage, ProtocolError> {
    Ok(ServerMessage::MineHit {
        turn: fields.integer(1)?,
        location: location(fields, 2)?,
        damage: fields.integer(4)?,
    })
}

fn decode_submarine_info(
    fields: &MessageFields<'_>,
    _: &mut dyn LineSource,
) -> Result<ServerMessage, ProtocolError> {
    let turn = fields.integer(1)?;
    let mut status = SubmarineStatus::new(
        SubmarineId::new(fields.integer(2)?),
        location(fields, 3)?,
        fields.flag(5)?,
    );

    for attribute in fields.rest(6) {
        let (key, value) = attribute
            .split_once('=')
            .filter(|(key, value)| !key.is_empty() && !value.is_empty() && !value.contains('='))
            .ok_or_else(|| fields.malformed())?;
        match key {
            "shields" => status.shield_count = count(value, fields)?,
            "torpedos" => status.torpedo_count = supply(value, fields)?,
            "mines" => status.mine_count = supply(value, fields)?,
            "sonar_range" => status.sonar_range = count(value, fields)?,
            "sprint_range" => status.sprint_range = count(value, fields)?,
            "torpedo_range" => status.torpedo_range = count(value, fields)?,
            "mine_ready" => status.mine_ready = number(value, fields)? == 1,
            "surface_remain" => status.surface_turns_remaining = count(value, fields)?,
            "reactor_damage" => status.reactor_damage = count(value, fields)?,
            "dead" => status.dead = number(value, fields)? == 1,
            _ => {}
        }
    }

    Ok(ServerMessage::SubmarineInfo { turn, status })
}

fn decode_player_score(
    fields: &MessageFields<'_>,
    _: &mut dyn LineSource,
) -> Result<ServerMessage, ProtocolError> {
    Ok(ServerMessage::PlayerScore {
        turn: fields.integer(1)?,
        score: fields.integer(2)?,
    })
}

fn decode_game_finished(
    fields: &MessageFields<'_>,
    source: &mut dyn LineSource,
) -> Result<ServerMessage, ProtocolError> {
    let player_count: u32 = fields.integer(1)?;
    let mut results = Vec::new();
    for _ in 0..player_count {
        let line = source.read_line()?;
        results.push(decode_player_result(&line)?);
    }

    Ok(ServerMessage::GameFinished(GameOutcome {
        player_count,
        turn_count: fields.integer(2)?,
        state: fields.text(3)?.to_owned(),
        results,
    }))
}

fn decode_server_error(
    fields: &MessageFields<'_>,
    _: &mut dyn LineSource,
) -> Result<ServerMessage, ProtocolError> {
    Ok(ServerMessage::ServerError {
        text: fields.rest(1).join("|"),
    })
}

fn location(fields: &MessageFields<'_>, index: usize) -> Result<Coordinate, ProtocolError> {
    Ok(Coordinate::new(
        fields.integer(index)?,
        fields.integer(index + 1)?,
    ))
}

fn number(value: &str, fields: &MessageFields<'_>) -> Result<i64, ProtocolError> {
    value.trim().parse().map_err(|_| fields.malformed())
}

fn count(value: &str, fields: &MessageFields<'_>) -> Result<u32, ProtocolError> {
    u32::try_from(number(value, fields)?).map_err(|_| fields.malformed())
}

// Negative counts mean the supply never runs out.
fn supply(value: &str, fields: &MessageFields<'_>) -> Result<Option<u32>, ProtocolError> {
    match number(value, fields)? {
        unlimited if unlimited < 0 => Ok(None),
        _ => count(value, fields).map(Some),
    }
}
