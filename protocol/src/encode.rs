use subsim_core::{Command, Coordinate, Direction, Equipment, SubmarineId};

use crate::{fields::FIELD_DELIMITER, MessageFields, ProtocolError};

/// Encodes a command as a single protocol line without terminator.
pub fn encode(command: &Command) -> Result<String, ProtocolError> {
    let line = match command {
        Command::Join { username, start } => {
            check_username(username)?;
            match start {
                Some(start) => format!("J|{username}|{}|{}", start.x(), start.y()),
                None => format!("J|{username}"),
            }
        }
        Command::Ping { turn, submarine } => format!("P|{turn}|{submarine}"),
        Command::Move {
            turn,
            submarine,
            direction,
            equipment,
        } => format!(
            "M|{turn}|{submarine}|{}|{}",
            direction.code(),
            equipment.token()
        ),
        Command::Sprint {
            turn,
            submarine,
            direction,
            distance,
        } => format!("R|{turn}|{submarine}|{}|{distance}", direction.code()),
        Command::Fire {
            turn,
            submarine,
            target,
        } => format!("F|{turn}|{submarine}|{}|{}", target.x(), target.y()),
        Command::Mine {
            turn,
            submarine,
            direction,
        } => format!("D|{turn}|{submarine}|{}", direction.code()),
        Command::Sleep {
            turn,
            submarine,
            first,
            second,
        } => format!(
            "S|{turn}|{submarine}|{}|{}",
            first.token(),
            second.token()
        ),
        Command::Surface { turn, submarine } => format!("U|{turn}|{submarine}"),
    };

    check_outbound(&line)?;
    Ok(line)
}

/// Rejects payloads the server could not read as exactly one line.
pub fn check_outbound(line: &str) -> Result<(), ProtocolError> {
    if line.trim().is_empty() {
        return Err(ProtocolError::InvalidOutbound {
            reason: "an empty line",
            line: line.to_owned(),
        });
    }
    if line.contains(['\n', '\r']) {
        return Err(ProtocolError::InvalidOutbound {
            reason: "a multi-line message",
            line: line.to_owned(),
        });
    }
    Ok(())
}

/// Line the server echoes back when `username` joined successfully.
#[must_use]
pub fn join_acknowledgement(username: &str) -> String {
    format!("J|{username}")
}

/// Decodes an outbound command line back into a [`Command`].
///
/// Inbound and outbound codes overlap, so this table is separate from the
/// server message decoder.
pub fn decode_command(line: &str) -> Result<Command, ProtocolError> {
    let prefix = line.split(FIELD_DELIMITER).next().unwrap_or_default();
    let command = match prefix {
        "J" => {
            let fields = MessageFields::parse(line, Some("J"), "join command", 2)?;
            let start = if fields.len() >= 4 {
                Some(coordinate(&fields, 2)?)
            } else {
                None
            };
            Command::Join {
                username: fields.text(1)?.to_owned(),
                start,
            }
        }
        "P" => {
            let fields = MessageFields::parse(line, Some("P"), "ping command", 3)?;
            Command::Ping {
                turn: fields.integer(1)?,
                submarine: submarine(&fields)?,
            }
        }
        "M" => {
            let fields = MessageFields::parse(line, Some("M"), "move command", 5)?;
            Command::Move {
                turn: fields.integer(1)?,
                submarine: submarine(&fields)?,
                direction: direction(&fields, 3)?,
                equipment: equipment(&fields, 4)?,
            }
        }
        "R" => {
            let fields = MessageFields::parse(line, Some("R"), "sprint command", 5)?;
            Command::Sprint {
                turn: fields.integer(1)?,
                submarine: submarine(&fields)?,
                direction: direction(&fields, 3)?,
                distance: fields.integer(4)?,
            }
        }
        "F" => {
            let fields = MessageFields::parse(line, Some("F"), "fire command", 5)?;
            Command::Fire {
                turn: fields.integer(1)?,
                submarine: submarine(&fields)?,
                target: coordinate(&fields, 3)?,
            }
        }
        "D" => {
            let fields = MessageFields::parse(line, Some("D"), "mine command", 4)?;
            Command::Mine {
                turn: fields.integer(1)?,
                submarine: submarine(&fields)?,
                direction: direction(&fields, 3)?,
            }
        }
        "S" => {
            let fields = MessageFields::parse(line, Some("S"), "sleep command", 5)?;
            Command::Sleep {
                turn: fields.integer(1)?,
                submarine: submarine(&fields)?,
                first: equipment(&fields, 3)?,
                second: equipment(&fields, 4)?,
            }
        }
        "U" => {
            let fields = MessageFields::parse(line, Some("U"), "surface command", 3)?;
            Command::Surface {
                turn: fields.integer(1)?,
                submarine: submarine(&fields)?,
            }
        }
        _ => {
            return Err(ProtocolError::UnknownMessage {
                raw_line: line.to_owned(),
            })
        }
    };
    Ok(command)
}

fn check_username(username: &str) -> Result<(), ProtocolError> {
    if username.trim().is_empty() {
        return Err(ProtocolError::InvalidOutbound {
            reason: "a blank username",
            line: username.to_owned(),
        });
    }
    if username.contains([FIELD_DELIMITER, '\n', '\r']) {
        return Err(ProtocolError::InvalidOutbound {
            reason: "a username containing a delimiter",
            line: username.to_owned(),
        });
    }
    Ok(())
}

fn submarine(fields: &MessageFields<'_>) -> Result<SubmarineId, ProtocolError> {
    Ok(SubmarineId::new(fields.integer(2)?))
}

fn coordinate(fields: &MessageFields<'_>, index: usize) -> Result<Coordinate, ProtocolError> {
    Ok(Coordinate::new(
        fields.integer(index)?,
        fields.integer(index + 1)?,
    ))
}

fn direction(fields: &MessageFields<'_>, index: usize) -> Result<Direction, ProtocolError> {
    Direction::from_code(fields.text(index)?).ok_or_else(|| fields.malformed())
}

fn equipment(fields: &MessageFields<'_>, index: usize) -> Result<Equipment, ProtocolError> {
    Equipment::from_token(fields.text(index)?).ok_or_else(|| fields.malformed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_includes_start_only_when_chosen() {
        let assigned = Command::Join {
            username: "RustySub".to_owned(),
            start: None,
        };
        let chosen = Command::Join {
            username: "RustySub".to_owned(),
            start: Some(Coordinate::new(4, 2)),
        };
        assert_eq!(encode(&assigned).expect("join"), "J|RustySub");
        assert_eq!(encode(&chosen).expect("join"), "J|RustySub|4|2");
        assert_eq!(join_acknowledgement("RustySub"), "J|RustySub");
    }

    #[test]
    fn join_rejects_usernames_that_break_framing() {
        for username in ["", "  ", "a|b", "a\nb"] {
            let command = Command::Join {
                username: username.to_owned(),
                start: None,
            };
            assert!(encode(&command).is_err(), "accepted {username:?}");
        }
    }

    #[test]
    fn decode_command_rejects_unknown_tokens() {
        assert!(decode_command("M|1|0|X|Sonar").is_err());
        assert!(decode_command("M|1|0|N|Laser").is_err());
        assert!(decode_command("Q|1|0").is_err());
    }
}
