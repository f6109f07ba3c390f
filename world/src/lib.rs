#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world model for the SubSim agent.
//!
//! The world owns a dense row-major grid of [`MapSquare`]s, the agent's own
//! [`Submarine`], and the per-turn buffers that collect everything the server
//! reports between two turn-start markers. Mutation happens through
//! [`World::configure`], [`apply`], [`place_submarine`], and [`reset_turn`];
//! decision systems read the state exclusively through the [`query`] module.

mod error;
mod settings;

use subsim_core::{Coordinate, GameSetting, Observation, SubmarineId, SubmarineStatus};

pub use error::{ConfigurationError, DesyncError};

/// Largest map, in squares, the world model agrees to allocate.
///
/// Both dimensions of an accepted map therefore fit in an `i32` coordinate.
pub const MAX_SQUARES: u64 = 1 << 20;

/// Mass a submarine occupies unless a `SubSize` setting says otherwise.
pub const DEFAULT_SUBMARINE_SIZE: u32 = 100;

/// Shields a submarine starts with before its first status report.
const DEFAULT_SHIELD_COUNT: u32 = 3;

/// Identifier of the single submarine this agent commands.
const OWN_SUBMARINE: SubmarineId = SubmarineId::new(0);

/// One square of the game map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapSquare {
    coordinate: Coordinate,
    blocked: bool,
    object_size: u32,
    foreign_object_size: u32,
}

impl MapSquare {
    const fn open(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            blocked: false,
            object_size: 0,
            foreign_object_size: 0,
        }
    }

    /// Location of the square.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Reports whether an obstacle permanently occupies the square.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Total mass detected on the square this turn, own submarine included.
    #[must_use]
    pub const fn object_size(&self) -> u32 {
        self.object_size
    }

    /// Mass detected this turn that does not belong to the agent.
    #[must_use]
    pub const fn foreign_object_size(&self) -> u32 {
        self.foreign_object_size
    }

    /// Reports whether the square is open water with nothing detected on it.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.blocked && self.object_size == 0
    }

    fn reset(&mut self) {
        self.object_size = 0;
        self.foreign_object_size = 0;
    }
}

/// The submarine commanded by the agent.
///
/// Status reports replace [`Submarine::status`] wholesale. Before the first
/// report the status carries the defaults a freshly launched submarine has.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submarine {
    size: u32,
    start: Option<Coordinate>,
    placed: bool,
    status: SubmarineStatus,
}

impl Submarine {
    fn new() -> Self {
        let mut status = SubmarineStatus::new(OWN_SUBMARINE, Coordinate::new(0, 0), true);
        status.shield_count = DEFAULT_SHIELD_COUNT;
        Self {
            size: DEFAULT_SUBMARINE_SIZE,
            start: None,
            placed: false,
            status,
        }
    }

    /// Identifier the server uses for the submarine.
    #[must_use]
    pub const fn id(&self) -> SubmarineId {
        self.status.id
    }

    /// Mass the submarine contributes to sonar detections.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Square the submarine occupies, once it has joined or been reported.
    #[must_use]
    pub const fn location(&self) -> Option<Coordinate> {
        if self.placed {
            Some(self.status.location)
        } else {
            None
        }
    }

    /// Latest status reported by the server.
    #[must_use]
    pub const fn status(&self) -> &SubmarineStatus {
        &self.status
    }

    /// Reports whether the torpedo supply never runs out.
    #[must_use]
    pub const fn has_unlimited_torpedos(&self) -> bool {
        self.status.torpedo_count.is_none()
    }

    /// Reports whether the mine supply never runs out.
    #[must_use]
    pub const fn has_unlimited_mines(&self) -> bool {
        self.status.mine_count.is_none()
    }

    /// Reports whether the submarine is surfaced for repairs.
    #[must_use]
    pub const fn is_surfaced(&self) -> bool {
        self.status.surface_turns_remaining > 0
    }
}

/// A detonation reported during the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Detonation {
    /// Square the blast centred on.
    pub location: Coordinate,
    /// Blast radius.
    pub radius: u32,
}

/// Damage reported on a square during the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    /// Square that was hit.
    pub location: Coordinate,
    /// Damage dealt.
    pub damage: u32,
}

/// A contact one of our pings detected during the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SonarContact {
    /// Submarine that heard the contact.
    pub submarine: SubmarineId,
    /// Distance to the contact.
    pub distance: u32,
}

/// Everything reported between two turn-start markers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnBuffers {
    detonations: Vec<Detonation>,
    torpedo_hits: Vec<Hit>,
    mine_hits: Vec<Hit>,
    sonar_contacts: Vec<SonarContact>,
    sonar_activations: u32,
    sprint_activations: u32,
}

impl TurnBuffers {
    /// Detonations in arrival order.
    #[must_use]
    pub fn detonations(&self) -> &[Detonation] {
        &self.detonations
    }

    /// Torpedo hits in arrival order.
    #[must_use]
    pub fn torpedo_hits(&self) -> &[Hit] {
        &self.torpedo_hits
    }

    /// Mine hits in arrival order.
    #[must_use]
    pub fn mine_hits(&self) -> &[Hit] {
        &self.mine_hits
    }

    /// Contacts detected by our own pings.
    #[must_use]
    pub fn sonar_contacts(&self) -> &[SonarContact] {
        &self.sonar_contacts
    }

    /// Total sonar pings heard.
    #[must_use]
    pub const fn sonar_activations(&self) -> u32 {
        self.sonar_activations
    }

    /// Total sprints heard.
    #[must_use]
    pub const fn sprint_activations(&self) -> u32 {
        self.sprint_activations
    }

    fn clear(&mut self) {
        self.detonations.clear();
        self.torpedo_hits.clear();
        self.mine_hits.clear();
        self.sonar_contacts.clear();
        self.sonar_activations = 0;
        self.sprint_activations = 0;
    }
}

/// Represents the agent's view of a running game.
#[derive(Clone, Debug)]
pub struct World {
    width: u32,
    height: u32,
    squares: Vec<MapSquare>,
    submarine: Submarine,
    buffers: TurnBuffers,
    score: Option<i64>,
}

impl World {
    /// Allocates a `width` by `height` map and applies the custom settings.
    ///
    /// Every square in `[1, width] x [1, height]` is created exactly once and
    /// starts open; obstacle settings are the only way a square becomes
    /// blocked.
    pub fn configure(
        width: u32,
        height: u32,
        settings: &[GameSetting],
    ) -> Result<Self, ConfigurationError> {
        let square_count = u64::from(width) * u64::from(height);
        if square_count == 0 || square_count > MAX_SQUARES {
            return Err(ConfigurationError::InvalidDimensions { width, height });
        }
        let capacity = usize::try_from(square_count)
            .map_err(|_| ConfigurationError::InvalidDimensions { width, height })?;

        let mut squares = Vec::with_capacity(capacity);
        for y in 1..=height as i32 {
            for x in 1..=width as i32 {
                squares.push(MapSquare::open(Coordinate::new(x, y)));
            }
        }

        let mut world = Self {
            width,
            height,
            squares,
            submarine: Submarine::new(),
            buffers: TurnBuffers::default(),
            score: None,
        };
        for setting in settings {
            settings::apply_setting(&mut world, setting)?;
        }
        Ok(world)
    }

    fn index(&self, location: Coordinate) -> Option<usize> {
        let x = u32::try_from(location.x()).ok()?.checked_sub(1)?;
        let y = u32::try_from(location.y()).ok()?.checked_sub(1)?;
        if x >= self.width || y >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(y).ok()?;
        let column = usize::try_from(x).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    fn contains(&self, location: Coordinate) -> bool {
        self.index(location).is_some()
    }

    fn square_mut(&mut self, location: Coordinate) -> Option<&mut MapSquare> {
        let index = self.index(location)?;
        self.squares.get_mut(index)
    }

    fn checked_square_mut(&mut self, location: Coordinate) -> Result<&mut MapSquare, DesyncError> {
        let (width, height) = (self.width, self.height);
        self.square_mut(location)
            .ok_or(DesyncError::UnknownSquare {
                location,
                width,
                height,
            })
    }

    fn check_location(&self, location: Coordinate) -> Result<(), DesyncError> {
        if self.contains(location) {
            Ok(())
        } else {
            Err(DesyncError::UnknownSquare {
                location,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Recomputes the foreign mass on the square the submarine occupies.
    fn discount_own_mass(&mut self) {
        let size = self.submarine.size;
        if let Some(location) = self.submarine.location() {
            if let Some(square) = self.square_mut(location) {
                square.foreign_object_size = square.object_size.saturating_sub(size);
            }
        }
    }
}

/// Absorbs one verified turn report into the world.
///
/// Reports that name a square outside the map, or a submarine other than the
/// agent's own, fail without mutating anything.
pub fn apply(world: &mut World, observation: Observation) -> Result<(), DesyncError> {
    match observation {
        Observation::SonarActivations { count } => {
            world.buffers.sonar_activations = world.buffers.sonar_activations.saturating_add(count);
        }
        Observation::SprintActivations { count } => {
            world.buffers.sprint_activations =
                world.buffers.sprint_activations.saturating_add(count);
        }
        Observation::SonarDetection {
            submarine,
            distance,
        } => {
            check_submarine(world, submarine)?;
            world.buffers.sonar_contacts.push(SonarContact {
                submarine,
                distance,
            });
        }
        Observation::Detonation { location, radius } => {
            world.check_location(location)?;
            world.buffers.detonations.push(Detonation { location, radius });
        }
        Observation::TorpedoHit { location, damage } => {
            world.check_location(location)?;
            world.buffers.torpedo_hits.push(Hit { location, damage });
        }
        Observation::MineHit { location, damage } => {
            world.check_location(location)?;
            world.buffers.mine_hits.push(Hit { location, damage });
        }
        Observation::Discovery { location, size } => {
            let square = world.checked_square_mut(location)?;
            if square.blocked {
                return Ok(());
            }
            square.object_size = square.object_size.saturating_add(size);
            square.foreign_object_size = square.foreign_object_size.saturating_add(size);
            if world.submarine.location() == Some(location) {
                world.discount_own_mass();
            }
        }
        Observation::SubmarineInfo(status) => {
            check_submarine(world, status.id)?;
            world.check_location(status.location)?;
            if let Some(previous) = world.submarine.location() {
                if let Some(square) = world.square_mut(previous) {
                    square.foreign_object_size = square.object_size;
                }
            }
            world.submarine.status = status;
            world.submarine.placed = true;
            world.discount_own_mass();
        }
        Observation::Score { score } => world.score = Some(score),
    }
    Ok(())
}

/// Puts the submarine on the square it joined the game at.
pub fn place_submarine(world: &mut World, location: Coordinate) -> Result<(), DesyncError> {
    world.check_location(location)?;
    world.submarine.status.location = location;
    world.submarine.placed = true;
    world.discount_own_mass();
    Ok(())
}

/// Clears everything collected during the finished turn.
///
/// Detections and buffers return to zero; obstacles and the submarine record
/// are untouched.
pub fn reset_turn(world: &mut World) {
    for square in &mut world.squares {
        square.reset();
    }
    world.buffers.clear();
}

fn check_submarine(world: &World, received: SubmarineId) -> Result<(), DesyncError> {
    let expected = world.submarine.id();
    if received != expected {
        return Err(DesyncError::SubmarineMismatch { expected, received });
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use subsim_core::{Coordinate, Direction};

    use super::{MapSquare, Submarine, TurnBuffers, World};

    /// Map dimensions as `(width, height)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.width, world.height)
    }

    /// Reports whether the coordinate lies on the map.
    #[must_use]
    pub fn contains(world: &World, location: Coordinate) -> bool {
        world.contains(location)
    }

    /// Square at the provided location, if it lies on the map.
    #[must_use]
    pub fn square(world: &World, location: Coordinate) -> Option<&MapSquare> {
        world
            .index(location)
            .and_then(|index| world.squares.get(index))
    }

    /// Every square in row-major order.
    pub fn squares(world: &World) -> impl Iterator<Item = &MapSquare> {
        world.squares.iter()
    }

    /// Reports whether a submarine could enter the square.
    #[must_use]
    pub fn is_navigable(world: &World, location: Coordinate) -> bool {
        square(world, location).is_some_and(|square| !square.is_blocked())
    }

    /// Unblocked squares in row-major order, optionally leaving one out.
    #[must_use]
    pub fn open_squares(world: &World, exclude: Option<Coordinate>) -> Vec<Coordinate> {
        world
            .squares
            .iter()
            .filter(|square| !square.is_blocked())
            .map(MapSquare::coordinate)
            .filter(|location| Some(*location) != exclude)
            .collect()
    }

    /// On-map neighbours of a square in clockwise order starting at north.
    pub fn neighbors(
        world: &World,
        location: Coordinate,
    ) -> impl Iterator<Item = (Direction, Coordinate)> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |direction| (direction, location.shifted(direction)))
            .filter(move |(_, neighbor)| world.contains(*neighbor))
    }

    /// The agent's submarine.
    #[must_use]
    pub fn submarine(world: &World) -> &Submarine {
        &world.submarine
    }

    /// Start square announced by a `SubStartLocation` setting, if any.
    #[must_use]
    pub fn start_location(world: &World) -> Option<Coordinate> {
        world.submarine.start
    }

    /// Reports collected since the current turn began.
    #[must_use]
    pub fn turn_buffers(world: &World) -> &TurnBuffers {
        &world.buffers
    }

    /// Most recent score the server reported.
    #[must_use]
    pub fn score(world: &World) -> Option<i64> {
        world.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_row_major_and_one_based() {
        let world = World::configure(4, 3, &[]).expect("world");
        assert_eq!(world.index(Coordinate::new(1, 1)), Some(0));
        assert_eq!(world.index(Coordinate::new(4, 1)), Some(3));
        assert_eq!(world.index(Coordinate::new(1, 2)), Some(4));
        assert_eq!(world.index(Coordinate::new(4, 3)), Some(11));
        assert_eq!(world.index(Coordinate::new(0, 1)), None);
        assert_eq!(world.index(Coordinate::new(5, 1)), None);
        assert_eq!(world.index(Coordinate::new(1, 4)), None);
        assert_eq!(world.index(Coordinate::new(-1, -1)), None);
    }

    #[test]
    fn submarine_starts_with_launch_defaults() {
        let world = World::configure(2, 2, &[]).expect("world");
        let submarine = query::submarine(&world);
        assert_eq!(submarine.id(), SubmarineId::new(0));
        assert_eq!(submarine.size(), DEFAULT_SUBMARINE_SIZE);
        assert_eq!(submarine.location(), None);
        assert_eq!(submarine.status().shield_count, 3);
        assert!(submarine.status().active);
        assert!(submarine.has_unlimited_torpedos());
        assert!(submarine.has_unlimited_mines());
        assert!(!submarine.is_surfaced());
    }
}
