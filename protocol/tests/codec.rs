use std::io::Cursor;

use subsim_core::{Command, Coordinate, Direction, Equipment, GameSetting, SubmarineId};
use subsim_protocol::{
    decode, decode_command, encode, GameConfig, GameOutcome, LineChannel, PlayerResult,
    ProtocolError, ServerMessage,
};

fn channel(script: &str) -> LineChannel<Cursor<Vec<u8>>, Vec<u8>> {
    LineChannel::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
}

#[test]
fn move_command_encodes_exact_wire_text() {
    let command = Command::Move {
        turn: 7,
        submarine: SubmarineId::new(0),
        direction: Direction::East,
        equipment: Equipment::Sonar,
    };

    let line = encode(&command).expect("move encodes");
    assert_eq!(line, "M|7|0|E|Sonar");
    assert_eq!(decode_command(&line).expect("move decodes"), command);
}

#[test]
fn every_command_kind_has_its_own_code() {
    let submarine = SubmarineId::new(3);
    let cases = [
        (Command::Ping { turn: 2, submarine }, "P|2|3"),
        (
            Command::Fire {
                turn: 2,
                submarine,
                target: Coordinate::new(9, 1),
            },
            "F|2|3|9|1",
        ),
        (Command::Surface { turn: 2, submarine }, "U|2|3"),
        (
            Command::Sprint {
                turn: 2,
                submarine,
                direction: Direction::West,
                distance: 3,
            },
            "R|2|3|W|3",
        ),
        (
            Command::Mine {
                turn: 2,
                submarine,
                direction: Direction::South,
            },
            "D|2|3|S",
        ),
        (
            Command::Sleep {
                turn: 2,
                submarine,
                first: Equipment::Torpedo,
                second: Equipment::None,
            },
            "S|2|3|Torpedo|None",
        ),
    ];

    for (command, expected) in cases {
        assert_eq!(encode(&command).expect("encodes"), expected);
    }
}

#[test]
fn config_reads_its_settings_from_the_same_channel() {
    let mut source = channel("V|Obstacle|2|3\nV|SubSize|0|120\nB|1\n");

    let message = decode("C|1.0|TestGame|5|4|2", &mut source).expect("config decodes");

    assert_eq!(
        message,
        ServerMessage::Config(GameConfig {
            server_version: "1.0".to_owned(),
            title: "TestGame".to_owned(),
            width: 5,
            height: 4,
            settings: vec![
                GameSetting::new("Obstacle", vec!["2".to_owned(), "3".to_owned()]),
                GameSetting::new("SubSize", vec!["0".to_owned(), "120".to_owned()]),
            ],
        })
    );

    let next = subsim_protocol::LineSource::read_line(&mut source).expect("remaining line");
    assert_eq!(next, "B|1", "config consumed more lines than it announced");
}

#[test]
fn config_rejects_settings_with_the_wrong_code() {
    let mut source = channel("B|1\n");
    let error = decode("C|1.0|TestGame|5|4|1", &mut source).unwrap_err();
    assert!(matches!(
        error,
        ProtocolError::Malformed {
            message_type: "game setting",
            ..
        }
    ));
}

#[test]
fn game_finished_collects_player_results() {
    let mut source = channel("P|RustySub|40\nP|Dudly|-5\n");

    let message = decode("F|2|120|finished", &mut source).expect("finished decodes");

    assert_eq!(
        message,
        ServerMessage::GameFinished(GameOutcome {
            player_count: 2,
            turn_count: 120,
            state: "finished".to_owned(),
            results: vec![
                PlayerResult {
                    name: "RustySub".to_owned(),
                    score: 40,
                },
                PlayerResult {
                    name: "Dudly".to_owned(),
                    score: -5,
                },
            ],
        })
    );
}

#[test]
fn informational_messages_carry_their_turn() {
    let mut source = channel("");
    let cases = [
        ("R|3|1", 3),
        ("D|3|2|2|1", 3),
        ("O|3|4|5|100", 3),
        ("T|3|4|5|2", 3),
        ("M|3|4|5|1", 3),
        ("H|3|17", 3),
        ("I|3|0|1|1|1|shields=2", 3),
    ];

    for (line, turn) in cases {
        let message = decode(line, &mut source).expect("decodes");
        assert_eq!(message.turn(), Some(turn), "line {line}");
    }
}

#[test]
fn submarine_info_reads_every_attribute() {
    let mut source = channel("");
    let line = "I|9|0|4|5|1|shields=2|torpedos=6|mines=-1|sonar_range=3|sprint_range=1|\
                torpedo_range=4|mine_ready=1|surface_remain=2|reactor_damage=5|dead=0";

    let ServerMessage::SubmarineInfo { turn, status } = decode(line, &mut source).expect("info")
    else {
        panic!("expected submarine info");
    };

    assert_eq!(turn, 9);
    assert_eq!(status.id, SubmarineId::new(0));
    assert_eq!(status.location, Coordinate::new(4, 5));
    assert!(status.active);
    assert!(!status.dead);
    assert_eq!(status.shield_count, 2);
    assert_eq!(status.torpedo_count, Some(6));
    assert_eq!(status.mine_count, None);
    assert_eq!(status.sonar_range, 3);
    assert_eq!(status.sprint_range, 1);
    assert_eq!(status.torpedo_range, 4);
    assert!(status.mine_ready);
    assert_eq!(status.surface_turns_remaining, 2);
    assert_eq!(status.reactor_damage, 5);
}

#[test]
fn unknown_codes_and_short_lines_are_protocol_errors() {
    let mut source = channel("");
    assert!(matches!(
        decode("Z|1", &mut source),
        Err(ProtocolError::UnknownMessage { .. })
    ));
    assert!(matches!(
        decode("", &mut source),
        Err(ProtocolError::UnknownMessage { .. })
    ));
    let error = decode("O|1|2|3", &mut source).unwrap_err();
    assert_eq!(error.to_string(), "invalid discovered object message: O|1|2|3");
    assert!(decode("B|x", &mut source).is_err());
}
