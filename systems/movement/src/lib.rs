#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement heuristics that steer a submarine toward a roaming destination.
//!
//! Movement is deliberately naive: the system only looks one square ahead and
//! prefers the cardinal directions that shrink the axis-aligned distance to
//! the destination, falling back to any open neighbour when those are blocked.

use rand::{seq::SliceRandom, Rng};
use subsim_core::{Coordinate, Direction};
use subsim_world::{query, World};
use thiserror::Error;

/// Failures raised while choosing where to move.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MovementError {
    /// The submarine already occupies the destination.
    #[error("already at destination {location}")]
    SameSquare {
        /// Shared origin and destination.
        location: Coordinate,
    },
    /// Origin or destination lies outside the map.
    #[error("square {location} lies outside the map")]
    UnknownSquare {
        /// Offending coordinate.
        location: Coordinate,
    },
    /// Every neighbour of the submarine is blocked or off the map.
    #[error("no open square next to {location}")]
    NoLegalDirection {
        /// Enclosed origin.
        location: Coordinate,
    },
    /// The map holds no open square to roam to.
    #[error("no open square available as a destination")]
    NoOpenSquare,
}

/// Cardinal directions that reduce the axis-aligned distance from `from` to `to`.
///
/// Yields one direction when the squares share a row or column, two otherwise,
/// and none when they coincide.
#[must_use]
pub fn intended_directions(from: Coordinate, to: Coordinate) -> Vec<Direction> {
    let mut directions = Vec::with_capacity(2);
    if to.x() < from.x() {
        directions.push(Direction::West);
    } else if to.x() > from.x() {
        directions.push(Direction::East);
    }
    if to.y() < from.y() {
        directions.push(Direction::North);
    } else if to.y() > from.y() {
        directions.push(Direction::South);
    }
    directions
}

/// Chooses the next step from `from` toward `to`.
///
/// The intended directions are tried in random order; when none of them leads
/// onto an open square, every cardinal direction is tried in random order.
pub fn direction_toward<R: Rng + ?Sized>(
    world: &World,
    from: Coordinate,
    to: Coordinate,
    rng: &mut R,
) -> Result<Direction, MovementError> {
    if from == to {
        return Err(MovementError::SameSquare { location: from });
    }
    for location in [from, to] {
        if !query::contains(world, location) {
            return Err(MovementError::UnknownSquare { location });
        }
    }

    let mut intended = intended_directions(from, to);
    intended.shuffle(rng);
    if let Some(direction) = first_open(world, from, &intended) {
        return Ok(direction);
    }

    let mut fallback = Direction::ALL;
    fallback.shuffle(rng);
    first_open(world, from, &fallback).ok_or(MovementError::NoLegalDirection { location: from })
}

/// Picks a uniformly random open square other than `exclude`.
pub fn random_open_square<R: Rng + ?Sized>(
    world: &World,
    exclude: Option<Coordinate>,
    rng: &mut R,
) -> Result<Coordinate, MovementError> {
    query::open_squares(world, exclude)
        .choose(rng)
        .copied()
        .ok_or(MovementError::NoOpenSquare)
}

fn first_open(world: &World, from: Coordinate, directions: &[Direction]) -> Option<Direction> {
    directions
        .iter()
        .copied()
        .find(|direction| query::is_navigable(world, from.shifted(*direction)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intended_directions_follow_both_axes() {
        let from = Coordinate::new(5, 5);
        assert_eq!(
            intended_directions(from, Coordinate::new(5, 1)),
            vec![Direction::North]
        );
        assert_eq!(
            intended_directions(from, Coordinate::new(9, 5)),
            vec![Direction::East]
        );
        assert_eq!(
            intended_directions(from, Coordinate::new(2, 8)),
            vec![Direction::West, Direction::South]
        );
        assert!(intended_directions(from, from).is_empty());
    }
}
