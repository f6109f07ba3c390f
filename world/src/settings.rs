//! Application of the custom settings announced with the game configuration.

use std::str::FromStr;

use subsim_core::{Coordinate, GameSetting};
use tracing::{info, warn};

use crate::{ConfigurationError, World};

/// Applies one custom setting to a freshly allocated world.
pub(crate) fn apply_setting(world: &mut World, setting: &GameSetting) -> Result<(), ConfigurationError> {
    info!(%setting, "custom setting");
    match setting.name() {
        "SubsPerPlayer" => {
            return Err(ConfigurationError::FleetSetting {
                setting: setting.clone(),
            });
        }
        "SubStartLocation" => {
            check_submarine(world, setting)?;
            let location = coordinate(world, setting, 1)?;
            world.submarine.start = Some(location);
        }
        "SubSize" => {
            check_submarine(world, setting)?;
            world.submarine.size = value(setting, 1)?;
        }
        "Obstacle" => {
            let location = coordinate(world, setting, 0)?;
            if let Some(square) = world.square_mut(location) {
                square.blocked = true;
            }
        }
        name => warn!(name, "ignoring unsupported custom setting"),
    }
    Ok(())
}

fn check_submarine(world: &World, setting: &GameSetting) -> Result<(), ConfigurationError> {
    let submarine: u32 = value(setting, 0)?;
    if submarine != world.submarine.id().get() {
        return Err(ConfigurationError::UnknownSubmarine {
            submarine,
            setting: setting.clone(),
        });
    }
    Ok(())
}

fn coordinate(
    world: &World,
    setting: &GameSetting,
    index: usize,
) -> Result<Coordinate, ConfigurationError> {
    let location = Coordinate::new(value(setting, index)?, value(setting, index + 1)?);
    if !world.contains(location) {
        return Err(ConfigurationError::OutOfBounds {
            setting: setting.clone(),
            location,
        });
    }
    Ok(location)
}

fn value<T: FromStr>(setting: &GameSetting, index: usize) -> Result<T, ConfigurationError> {
    setting
        .value(index)
        .and_then(|raw| raw.trim().parse().ok())
        .ok_or_else(|| ConfigurationError::InvalidValue {
            setting: setting.clone(),
        })
}
