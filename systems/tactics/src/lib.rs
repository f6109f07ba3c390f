#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tactical planner that turns the world model into one command per turn.
//!
//! Rules are evaluated strictly in priority order and the first one that
//! applies decides the turn:
//!
//! 1. fire a torpedo at a square holding only foreign mass,
//! 2. ping the sonar when the torpedo could reach whatever the ping reveals,
//! 3. otherwise move one square toward a remembered roaming destination while
//!    charging a piece of equipment.
//!
//! The only state carried from one turn to the next is that destination.

use std::ops::RangeInclusive;

use rand::Rng;
use subsim_core::{Command, Coordinate, Equipment, SubmarineStatus};
use subsim_system_movement::{direction_toward, random_open_square, MovementError};
use subsim_system_targeting::{Targeting, TargetingError};
use subsim_world::{query, World};
use thiserror::Error;
use tracing::debug;

/// Upper bound on any equipment range the planner reasons about.
pub const MAX_RANGE: u32 = 20;

/// Chance, in percent, of charging the sonar while the torpedo lags behind it.
pub const SONAR_CHARGE_PERCENT: u32 = 67;

/// Sonar range must exceed a value drawn from this range before pinging.
const PING_THRESHOLD: RangeInclusive<u32> = 1..=6;

/// Failures that leave the planner without a legal command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanningError {
    /// The submarine has no known location yet.
    #[error("submarine has not been placed on the map")]
    Unplaced,
    /// The torpedo search failed.
    #[error(transparent)]
    Targeting(#[from] TargetingError),
    /// No destination or direction could be chosen.
    #[error(transparent)]
    Movement(#[from] MovementError),
}

/// Outcome of one planning step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Command to send for the turn.
    pub command: Command,
    /// Roaming destination to remember for the next turn.
    pub destination: Option<Coordinate>,
}

/// Plans one turn from scratch.
///
/// `destination` is the roaming destination remembered from the previous
/// turn; the returned [`Decision`] carries its replacement.
pub fn plan<R: Rng + ?Sized>(
    world: &World,
    destination: Option<Coordinate>,
    turn: u32,
    rng: &mut R,
) -> Result<Decision, PlanningError> {
    decide(&mut Targeting::new(), world, destination, turn, rng)
}

/// Stateful wrapper that remembers the roaming destination between turns.
#[derive(Debug, Default)]
pub struct Planner {
    targeting: Targeting,
    destination: Option<Coordinate>,
}

impl Planner {
    /// Creates a planner with no destination in mind.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Roaming destination currently remembered.
    #[must_use]
    pub const fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    /// Decides the command for `turn` and updates the remembered destination.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        world: &World,
        turn: u32,
        rng: &mut R,
    ) -> Result<Command, PlanningError> {
        let decision = decide(&mut self.targeting, world, self.destination, turn, rng)?;
        self.destination = decision.destination;
        Ok(decision.command)
    }
}

/// Picks the equipment to charge while moving.
///
/// The sonar is charged outright once the torpedo reaches at least as far as
/// the sonar (capped at [`MAX_RANGE`]); otherwise the choice is random and
/// favours the sonar [`SONAR_CHARGE_PERCENT`] percent of the time.
pub fn choose_charge<R: Rng + ?Sized>(status: &SubmarineStatus, rng: &mut R) -> Equipment {
    if status.torpedo_range >= status.sonar_range.min(MAX_RANGE)
        || rng.gen_range(0..100) < SONAR_CHARGE_PERCENT
    {
        Equipment::Sonar
    } else {
        Equipment::Torpedo
    }
}

/// Picks a uniformly random open square to join the game at.
pub fn choose_start_location<R: Rng + ?Sized>(
    world: &World,
    rng: &mut R,
) -> Result<Coordinate, PlanningError> {
    Ok(random_open_square(world, None, rng)?)
}

fn should_ping<R: Rng + ?Sized>(status: &SubmarineStatus, rng: &mut R) -> bool {
    status.torpedo_range >= status.sonar_range && status.sonar_range > rng.gen_range(PING_THRESHOLD)
}

fn decide<R: Rng + ?Sized>(
    targeting: &mut Targeting,
    world: &World,
    destination: Option<Coordinate>,
    turn: u32,
    rng: &mut R,
) -> Result<Decision, PlanningError> {
    let submarine = query::submarine(world);
    let location = submarine.location().ok_or(PlanningError::Unplaced)?;
    let status = submarine.status();
    let id = submarine.id();

    if let Some(target) = targeting.handle(world, location, status.torpedo_range, rng)? {
        debug!(turn, %target, "firing torpedo");
        return Ok(Decision {
            command: Command::Fire {
                turn,
                submarine: id,
                target,
            },
            destination: None,
        });
    }

    if should_ping(status, rng) {
        debug!(turn, sonar_range = status.sonar_range, "pinging sonar");
        return Ok(Decision {
            command: Command::Ping {
                turn,
                submarine: id,
            },
            destination: None,
        });
    }

    let destination = match destination {
        Some(destination) if destination != location => destination,
        _ => {
            let destination = random_open_square(world, Some(location), rng)?;
            debug!(%destination, "new roaming destination");
            destination
        }
    };

    let equipment = choose_charge(status, rng);
    let direction = direction_toward(world, location, destination, rng)?;
    debug!(turn, ?direction, ?equipment, %destination, "moving");
    Ok(Decision {
        command: Command::Move {
            turn,
            submarine: id,
            direction,
            equipment,
        },
        destination: Some(destination),
    })
}
