//! Breadth-first range search over the world's squares.

use std::collections::{btree_map, BTreeMap, VecDeque};

use subsim_core::Coordinate;
use subsim_world::{query, World};

use crate::TargetingError;

/// Squares reachable from an origin together with their hop distance.
///
/// Entries iterate in coordinate order so random selection over them is
/// reproducible for a seeded generator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReachableSquares {
    distances: BTreeMap<Coordinate, u32>,
}

impl ReachableSquares {
    /// Hop distance recorded for the square, if it was reached.
    #[must_use]
    pub fn distance(&self, location: Coordinate) -> Option<u32> {
        self.distances.get(&location).copied()
    }

    /// Reports whether the square was reached.
    #[must_use]
    pub fn contains(&self, location: Coordinate) -> bool {
        self.distances.contains_key(&location)
    }

    /// Number of reached squares, the origin included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Reports whether nothing was reached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Reached squares and their distances in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, u32)> + '_ {
        self.distances
            .iter()
            .map(|(location, distance)| (*location, *distance))
    }
}

impl IntoIterator for ReachableSquares {
    type Item = (Coordinate, u32);
    type IntoIter = btree_map::IntoIter<Coordinate, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.distances.into_iter()
    }
}

/// Finds every square within `range` cardinal hops of `from`.
///
/// Blocked squares are never recorded. A square holding detected mass is
/// recorded at the hop count it was reached with but the search does not
/// continue through it, so occupied squares are labelled without tunnelling
/// past them. The origin is always recorded at distance zero and expanded.
pub fn squares_in_range(
    world: &World,
    from: Coordinate,
    range: u32,
) -> Result<ReachableSquares, TargetingError> {
    if !query::contains(world, from) {
        return Err(TargetingError::UnknownOrigin { location: from });
    }

    let mut distances = BTreeMap::new();
    let _ = distances.insert(from, 0);
    let mut queue = VecDeque::from([(from, 0)]);

    while let Some((location, distance)) = queue.pop_front() {
        if distance >= range {
            continue;
        }

        let next_distance = distance + 1;
        for (_, neighbor) in query::neighbors(world, location) {
            let Some(square) = query::square(world, neighbor) else {
                continue;
            };
            if square.is_blocked() || distances.contains_key(&neighbor) {
                continue;
            }

            let _ = distances.insert(neighbor, next_distance);
            if square.is_empty() {
                queue.push_back((neighbor, next_distance));
            }
        }
    }

    Ok(ReachableSquares { distances })
}
