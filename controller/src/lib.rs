#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn controller that drives one game session over a line channel.
//!
//! A [`Session`] walks through a fixed sequence of [`Phase`]s: it reads the
//! game configuration, joins, absorbs the turn reports the server sends, asks
//! the planner for exactly one command whenever a turn begins, and stops once
//! the game-finished summary arrives. Every inconsistency ends the session
//! with a [`SessionError`].

mod error;
mod pacing;

use rand::Rng;
use subsim_core::{Command, Observation};
use subsim_protocol::{
    decode, encode, join_acknowledgement, GameConfig, GameOutcome, LineSink, LineSource,
    ProtocolError, ServerMessage,
};
use subsim_system_tactics::{choose_start_location, Planner};
use subsim_world::{self as world, query, World};
use tracing::{info, warn};

pub use error::SessionError;
pub use pacing::{NoPacing, TurnPacer};

/// Stage of the session state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for the configuration the server sends on connect.
    AwaitingConfig,
    /// Join request sent, waiting for the acknowledgement.
    Joining,
    /// Joined, waiting for the first turn to begin.
    AwaitingTurn,
    /// A turn is in progress; reports for it are being absorbed.
    TurnActive,
    /// The game is over. Terminal.
    Finished,
}

/// One game session from configuration to final standings.
#[derive(Debug)]
pub struct Session<R> {
    username: String,
    rng: R,
    phase: Phase,
    turn: u32,
    planner: Planner,
    world: Option<World>,
}

impl<R: Rng> Session<R> {
    /// Creates a session that joins as `username` and draws randomness from `rng`.
    #[must_use]
    pub fn new(username: impl Into<String>, rng: R) -> Self {
        Self {
            username: username.into(),
            rng,
            phase: Phase::AwaitingConfig,
            turn: 0,
            planner: Planner::new(),
            world: None,
        }
    }

    /// Current phase of the state machine.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of the turn being played; zero before the first turn begins.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// World model, once the configuration has been applied.
    #[must_use]
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    /// Plays a whole game over `channel`.
    ///
    /// Returns the final outcome once the server reports the game finished.
    /// `pacer` is consulted before every decision.
    pub fn run<C, P>(&mut self, channel: &mut C, pacer: &mut P) -> Result<GameOutcome, SessionError>
    where
        C: LineSource + LineSink,
        P: TurnPacer + ?Sized,
    {
        if self.phase != Phase::AwaitingConfig {
            return Err(SessionError::AlreadyStarted { phase: self.phase });
        }

        let mut world = self.configure(channel)?;
        let result = match self.join(channel, &mut world) {
            Ok(()) => self.play(channel, pacer, &mut world),
            Err(error) => Err(error),
        };
        self.world = Some(world);
        result
    }

    fn configure<C: LineSource>(&mut self, channel: &mut C) -> Result<World, SessionError> {
        let line = channel.read_line()?;
        let ServerMessage::Config(config) = decode(&line, channel)? else {
            return Err(ProtocolError::UnexpectedMessage {
                expected: "game config",
                raw_line: line,
            }
            .into());
        };

        log_config(&config);
        let world = World::configure(config.width, config.height, &config.settings)?;
        self.phase = Phase::Joining;
        Ok(world)
    }

    fn join<C>(&mut self, channel: &mut C, world: &mut World) -> Result<(), SessionError>
    where
        C: LineSource + LineSink,
    {
        let (location, start) = match query::start_location(world) {
            Some(assigned) => (assigned, None),
            None => {
                let chosen = choose_start_location(world, &mut self.rng)?;
                (chosen, Some(chosen))
            }
        };
        world::place_submarine(world, location)?;

        let request = Command::Join {
            username: self.username.clone(),
            start,
        };
        channel.write_line(&encode(&request)?)?;

        let response = channel.read_line()?;
        if response != join_acknowledgement(&self.username) {
            return Err(SessionError::JoinRejected {
                username: self.username.clone(),
                response,
            });
        }

        info!(username = %self.username, %location, "joined game");
        self.phase = Phase::AwaitingTurn;
        Ok(())
    }

    fn play<C, P>(
        &mut self,
        channel: &mut C,
        pacer: &mut P,
        world: &mut World,
    ) -> Result<GameOutcome, SessionError>
    where
        C: LineSource + LineSink,
        P: TurnPacer + ?Sized,
    {
        loop {
            let line = channel.read_line()?;
            match decode(&line, channel)? {
                ServerMessage::BeginTurn { turn } => {
                    self.check_turn(self.turn.saturating_add(1), turn, &line)?;
                    self.turn = turn;
                    self.phase = Phase::TurnActive;

                    pacer.before_turn(turn).map_err(SessionError::Pacing)?;
                    let command = self.planner.handle(world, turn, &mut self.rng)?;
                    channel.write_line(&encode(&command)?)?;
                    world::reset_turn(world);
                }
                ServerMessage::GameFinished(outcome) => {
                    log_outcome(&outcome);
                    self.phase = Phase::Finished;
                    return Ok(outcome);
                }
                ServerMessage::ServerError { text } => {
                    warn!(%text, "server reported an error");
                }
                ServerMessage::Config(_) => {
                    return Err(ProtocolError::UnexpectedMessage {
                        expected: "turn report",
                        raw_line: line,
                    }
                    .into());
                }
                report => {
                    if let Some((turn, observation)) = observation(report) {
                        self.check_turn(self.turn, turn, &line)?;
                        world::apply(world, observation)?;
                    }
                }
            }
        }
    }

    fn check_turn(&self, expected: u32, received: u32, line: &str) -> Result<(), SessionError> {
        if expected != received {
            return Err(SessionError::TurnMismatch {
                expected,
                received,
                raw_line: line.to_owned(),
            });
        }
        Ok(())
    }
}

/// Splits a turn report into its turn number and the observation it carries.
fn observation(message: ServerMessage) -> Option<(u32, Observation)> {
    let report = match message {
        ServerMessage::SonarActivations { turn, count } => {
            (turn, Observation::SonarActivations { count })
        }
        ServerMessage::SonarDetection {
            turn,
            submarine,
            distance,
        } => (
            turn,
            Observation::SonarDetection {
                submarine,
                distance,
            },
        ),
        ServerMessage::SprintActivations { turn, count } => {
            (turn, Observation::SprintActivations { count })
        }
        ServerMessage::Detonation {
            turn,
            location,
            radius,
        } => (turn, Observation::Detonation { location, radius }),
        ServerMessage::DiscoveredObject {
            turn,
            location,
            size,
        } => (turn, Observation::Discovery { location, size }),
        ServerMessage::TorpedoHit {
            turn,
            location,
            damage,
        } => (turn, Observation::TorpedoHit { location, damage }),
        ServerMessage::MineHit {
            turn,
            location,
            damage,
        } => (turn, Observation::MineHit { location, damage }),
        ServerMessage::SubmarineInfo { turn, status } => {
            (turn, Observation::SubmarineInfo(status))
        }
        ServerMessage::PlayerScore { turn, score } => (turn, Observation::Score { score }),
        ServerMessage::Config(_)
        | ServerMessage::BeginTurn { .. }
        | ServerMessage::GameFinished(_)
        | ServerMessage::ServerError { .. } => return None,
    };
    Some(report)
}

fn log_config(config: &GameConfig) {
    info!(
        server_version = %config.server_version,
        title = %config.title,
        width = config.width,
        height = config.height,
        settings = config.settings.len(),
        "received game configuration"
    );
}

fn log_outcome(outcome: &GameOutcome) {
    info!(
        players = outcome.player_count,
        turns = outcome.turn_count,
        state = %outcome.state,
        "game finished"
    );
    for result in &outcome.results {
        info!(player = %result.name, score = result.score, "final score");
    }
}
