use subsim_core::{Coordinate, GameSetting, Observation, SubmarineId, SubmarineStatus};
use subsim_world::{
    self as world, query, ConfigurationError, DesyncError, Hit, World, DEFAULT_SUBMARINE_SIZE,
    MAX_SQUARES,
};

fn setting(name: &str, values: &[&str]) -> GameSetting {
    GameSetting::new(name, values.iter().map(|value| (*value).to_owned()).collect())
}

fn status_at(x: i32, y: i32) -> SubmarineStatus {
    SubmarineStatus::new(SubmarineId::new(0), Coordinate::new(x, y), true)
}

#[test]
fn configure_allocates_every_square_once() {
    for (width, height) in [(1, 1), (5, 5), (7, 3), (20, 11)] {
        let world = World::configure(width, height, &[]).expect("world");
        let squares: Vec<_> = query::squares(&world).collect();
        assert_eq!(squares.len(), (width * height) as usize);
        assert!(squares.iter().all(|square| !square.is_blocked()));

        let mut coordinates: Vec<_> = squares.iter().map(|square| square.coordinate()).collect();
        coordinates.sort();
        coordinates.dedup();
        assert_eq!(coordinates.len(), (width * height) as usize);
        assert!(query::contains(&world, Coordinate::new(width as i32, height as i32)));
        assert!(!query::contains(&world, Coordinate::new(0, 1)));
    }
}

#[test]
fn configure_rejects_empty_maps() {
    assert_eq!(
        World::configure(0, 5, &[]).unwrap_err(),
        ConfigurationError::InvalidDimensions {
            width: 0,
            height: 5
        }
    );
}

#[test]
fn configure_rejects_maps_too_large_to_allocate() {
    assert_eq!(
        World::configure(100_000, 100_000, &[]).unwrap_err(),
        ConfigurationError::InvalidDimensions {
            width: 100_000,
            height: 100_000
        }
    );
    assert!(World::configure(u32::MAX, 2, &[]).is_err());

    let side = 1 << 10;
    assert_eq!(u64::from(side) * u64::from(side), MAX_SQUARES);
    let largest = World::configure(side, side, &[]).expect("largest world");
    assert_eq!(query::dimensions(&largest), (side, side));
}

#[test]
fn settings_shape_the_map_and_submarine() {
    let world = World::configure(
        6,
        6,
        &[
            setting("Obstacle", &["2", "3"]),
            setting("SubStartLocation", &["0", "5", "4"]),
            setting("SubSize", &["0", "140"]),
            setting("MaxTorpedoRange", &["5"]),
        ],
    )
    .expect("world");

    let obstacle = query::square(&world, Coordinate::new(2, 3)).expect("square");
    assert!(obstacle.is_blocked());
    assert!(!obstacle.is_empty());
    assert!(!query::is_navigable(&world, Coordinate::new(2, 3)));
    assert!(query::is_navigable(&world, Coordinate::new(3, 3)));
    assert_eq!(query::start_location(&world), Some(Coordinate::new(5, 4)));
    assert_eq!(query::submarine(&world).size(), 140);
    assert_eq!(query::open_squares(&world, None).len(), 35);
}

#[test]
fn unsupported_settings_fail_configuration() {
    for count in ["1", "2"] {
        let fleet = setting("SubsPerPlayer", &[count]);
        assert_eq!(
            World::configure(5, 5, std::slice::from_ref(&fleet)).unwrap_err(),
            ConfigurationError::FleetSetting { setting: fleet }
        );
    }
    assert!(matches!(
        World::configure(5, 5, &[setting("SubSize", &["3", "100"])]),
        Err(ConfigurationError::UnknownSubmarine { submarine: 3, .. })
    ));
    assert!(matches!(
        World::configure(5, 5, &[setting("Obstacle", &["6", "1"])]),
        Err(ConfigurationError::OutOfBounds { .. })
    ));
    assert!(matches!(
        World::configure(5, 5, &[setting("Obstacle", &["x"])]),
        Err(ConfigurationError::InvalidValue { .. })
    ));
}

#[test]
fn discoveries_accumulate_except_on_obstacles() {
    let mut world = World::configure(5, 5, &[setting("Obstacle", &["1", "1"])]).expect("world");

    for size in [40, 60] {
        world::apply(
            &mut world,
            Observation::Discovery {
                location: Coordinate::new(3, 3),
                size,
            },
        )
        .expect("discovery");
    }
    world::apply(
        &mut world,
        Observation::Discovery {
            location: Coordinate::new(1, 1),
            size: 100,
        },
    )
    .expect("discovery on obstacle");

    let square = query::square(&world, Coordinate::new(3, 3)).expect("square");
    assert_eq!(square.object_size(), 100);
    assert_eq!(square.foreign_object_size(), 100);
    assert!(!square.is_empty());

    let obstacle = query::square(&world, Coordinate::new(1, 1)).expect("square");
    assert_eq!(obstacle.object_size(), 0);
    assert_eq!(obstacle.foreign_object_size(), 0);
}

#[test]
fn own_mass_is_discounted_regardless_of_arrival_order() {
    let location = Coordinate::new(2, 2);
    let discovery = Observation::Discovery {
        location,
        size: DEFAULT_SUBMARINE_SIZE + 30,
    };
    let info = Observation::SubmarineInfo(status_at(2, 2));

    for order in [[discovery.clone(), info.clone()], [info, discovery]] {
        let mut world = World::configure(4, 4, &[]).expect("world");
        for observation in order {
            world::apply(&mut world, observation).expect("observation");
        }
        let square = query::square(&world, location).expect("square");
        assert_eq!(square.object_size(), DEFAULT_SUBMARINE_SIZE + 30);
        assert_eq!(square.foreign_object_size(), 30);
    }
}

#[test]
fn foreign_mass_never_goes_negative() {
    let mut world = World::configure(4, 4, &[]).expect("world");
    world::apply(
        &mut world,
        Observation::Discovery {
            location: Coordinate::new(2, 2),
            size: 10,
        },
    )
    .expect("discovery");
    world::apply(&mut world, Observation::SubmarineInfo(status_at(2, 2))).expect("info");

    let square = query::square(&world, Coordinate::new(2, 2)).expect("square");
    assert_eq!(square.foreign_object_size(), 0);
}

#[test]
fn status_reports_replace_the_previous_record() {
    let mut world = World::configure(5, 5, &[]).expect("world");
    world::place_submarine(&mut world, Coordinate::new(1, 1)).expect("placed");

    let mut status = status_at(4, 5);
    status.torpedo_count = Some(2);
    status.surface_turns_remaining = 3;
    world::apply(&mut world, Observation::SubmarineInfo(status.clone())).expect("info");

    let submarine = query::submarine(&world);
    assert_eq!(submarine.location(), Some(Coordinate::new(4, 5)));
    assert_eq!(submarine.status(), &status);
    assert_eq!(submarine.status().shield_count, 0);
    assert!(!submarine.has_unlimited_torpedos());
    assert!(submarine.is_surfaced());
}

#[test]
fn foreign_reports_are_rejected_without_mutation() {
    let mut world = World::configure(5, 5, &[]).expect("world");

    let stranger = SubmarineStatus::new(SubmarineId::new(4), Coordinate::new(2, 2), true);
    assert_eq!(
        world::apply(&mut world, Observation::SubmarineInfo(stranger)).unwrap_err(),
        DesyncError::SubmarineMismatch {
            expected: SubmarineId::new(0),
            received: SubmarineId::new(4),
        }
    );
    assert_eq!(query::submarine(&world).location(), None);

    let outside = Coordinate::new(6, 2);
    for observation in [
        Observation::Discovery {
            location: outside,
            size: 5,
        },
        Observation::TorpedoHit {
            location: outside,
            damage: 1,
        },
        Observation::Detonation {
            location: outside,
            radius: 1,
        },
        Observation::SubmarineInfo(status_at(6, 2)),
    ] {
        assert!(matches!(
            world::apply(&mut world, observation),
            Err(DesyncError::UnknownSquare { .. })
        ));
    }
    assert!(query::turn_buffers(&world).torpedo_hits().is_empty());
    assert!(world::place_submarine(&mut world, outside).is_err());
}

#[test]
fn reset_turn_clears_detections_but_keeps_obstacles() {
    let mut world = World::configure(3, 3, &[setting("Obstacle", &["2", "2"])]).expect("world");
    let observations = [
        Observation::Discovery {
            location: Coordinate::new(3, 1),
            size: 100,
        },
        Observation::MineHit {
            location: Coordinate::new(3, 1),
            damage: 2,
        },
        Observation::SonarActivations { count: 2 },
        Observation::SonarActivations { count: 1 },
        Observation::SprintActivations { count: 4 },
        Observation::Score { score: 12 },
    ];
    for observation in observations {
        world::apply(&mut world, observation).expect("observation");
    }

    let buffers = query::turn_buffers(&world);
    assert_eq!(buffers.sonar_activations(), 3);
    assert_eq!(buffers.sprint_activations(), 4);
    assert_eq!(
        buffers.mine_hits(),
        &[Hit {
            location: Coordinate::new(3, 1),
            damage: 2,
        }]
    );

    for _ in 0..2 {
        world::reset_turn(&mut world);
        assert!(query::squares(&world)
            .all(|square| square.object_size() == 0 && square.foreign_object_size() == 0));
        assert!(query::square(&world, Coordinate::new(2, 2))
            .expect("square")
            .is_blocked());
        let buffers = query::turn_buffers(&world);
        assert_eq!(buffers.sonar_activations(), 0);
        assert_eq!(buffers.sprint_activations(), 0);
        assert!(buffers.mine_hits().is_empty());
    }
    assert_eq!(query::score(&world), Some(12));
}

#[test]
fn neighbors_stay_on_the_map() {
    let world = World::configure(3, 3, &[]).expect("world");
    let corner: Vec<_> = query::neighbors(&world, Coordinate::new(1, 1))
        .map(|(_, location)| location)
        .collect();
    assert_eq!(corner, vec![Coordinate::new(2, 1), Coordinate::new(1, 2)]);
    assert_eq!(query::neighbors(&world, Coordinate::new(2, 2)).count(), 4);
}
