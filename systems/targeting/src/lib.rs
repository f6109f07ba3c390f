#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that locates torpedo targets from world snapshots.
//!
//! Targets are squares reachable within torpedo range whose detected mass is
//! entirely foreign and which lie outside the submarine's own blast zone.

mod range;

use rand::{seq::SliceRandom, Rng};
use subsim_core::Coordinate;
use subsim_world::{query, World};
use thiserror::Error;

pub use range::{squares_in_range, ReachableSquares};

/// Shortest torpedo range worth searching with.
pub const MIN_TORPEDO_RANGE: u32 = 2;

/// Blast distance at which a detonation would also hit the firing submarine.
const SELF_BLAST_DISTANCE: u32 = 1;

/// Failures raised while searching for targets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TargetingError {
    /// The search started from a square outside the map.
    #[error("range search origin {location} lies outside the map")]
    UnknownOrigin {
        /// Offending origin.
        location: Coordinate,
    },
}

/// Torpedo targeting system that reuses its candidate buffer between turns.
#[derive(Debug, Default)]
pub struct Targeting {
    candidates: Vec<Coordinate>,
}

impl Targeting {
    /// Creates a targeting system with an empty candidate buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every square a torpedo fired from `from` may be aimed at.
    ///
    /// Returns an empty slice when `torpedo_range` is below
    /// [`MIN_TORPEDO_RANGE`]. Candidates are listed in coordinate order.
    pub fn candidates(
        &mut self,
        world: &World,
        from: Coordinate,
        torpedo_range: u32,
    ) -> Result<&[Coordinate], TargetingError> {
        self.candidates.clear();
        if torpedo_range < MIN_TORPEDO_RANGE {
            return Ok(&self.candidates);
        }

        let reachable = squares_in_range(world, from, torpedo_range)?;
        self.candidates.extend(
            reachable
                .into_iter()
                .map(|(location, _)| location)
                .filter(|location| from.blast_distance(*location) > SELF_BLAST_DISTANCE)
                .filter(|location| {
                    query::square(world, *location).is_some_and(|square| {
                        square.foreign_object_size() >= 1
                            && square.foreign_object_size() == square.object_size()
                    })
                }),
        );
        Ok(&self.candidates)
    }

    /// Picks one candidate uniformly at random, or `None` when nothing qualifies.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        world: &World,
        from: Coordinate,
        torpedo_range: u32,
        rng: &mut R,
    ) -> Result<Option<Coordinate>, TargetingError> {
        let candidates = self.candidates(world, from, torpedo_range)?;
        Ok(candidates.choose(rng).copied())
    }
}
