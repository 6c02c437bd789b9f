//! # Entity Checking
//!
//! Gates a [`CardConfig`] against a [`StateSnapshot`] before anything is
//! drawn. Entities are checked in a fixed order so the reported entity is
//! always the first missing one:
//!
//! 1. wind direction
//! 2. wind speed entities, in configured order
//! 3. compass entity, only when auto-rotate is on and an entity is set
//! 4. corner entities of shown corners, top-left, top-right, bottom-left,
//!    bottom-right
//!
//! Hidden corners are never checked, so a dangling entity on a hidden corner
//! is accepted.
//!
//! Checking also resolves wind speed units configured as `auto` from the
//! entity's `unit_of_measurement`. The input configuration is left untouched;
//! the resolved configuration is returned.

use crate::config::{CardConfig, SpeedUnit};
use crate::state::StateSnapshot;
use thiserror::Error;

/// A configured entity is missing from the state snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Entity {entity} not found.")]
pub struct MissingEntityError {
    pub entity: String,
}

/// Validate `config` against `snapshot` and return it with `auto` speed
/// units resolved.
///
/// Fails on the first missing entity; later entities are not checked.
pub fn check_entities(
    config: &CardConfig,
    snapshot: &StateSnapshot,
) -> Result<CardConfig, MissingEntityError> {
    let mut resolved = config.clone();

    check_entity(&config.wind_direction.entity, snapshot)?;

    for speed in resolved.windspeed_entities.iter_mut() {
        check_entity(&speed.entity, snapshot)?;
        if speed.speed_unit.is_auto() {
            let declared = snapshot
                .get(&speed.entity)
                .and_then(|record| record.unit_of_measurement());
            if let Some(unit) = declared {
                log::debug!("{} speed unit resolved to {}", speed.entity, unit);
                speed.speed_unit = SpeedUnit::Fixed(unit.to_string());
            }
        }
    }

    if let Some(entity) = config
        .compass
        .as_ref()
        .and_then(|compass| compass.rotation_entity())
    {
        check_entity(entity, snapshot)?;
    }

    for (_, corner) in config.corners.iter() {
        if !corner.show {
            continue;
        }
        if let Some(entity) = corner.entity_id() {
            check_entity(entity, snapshot)?;
        }
    }

    Ok(resolved)
}

fn check_entity(entity: &str, snapshot: &StateSnapshot) -> Result<(), MissingEntityError> {
    if snapshot.contains(entity) {
        Ok(())
    } else {
        Err(MissingEntityError {
            entity: entity.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CompassConfig, CornerInfo, EntityRef, WindSpeedEntityConfig};
    use crate::state::EntityStateRecord;
    use crate::Corner;

    fn speed(entity: &str, unit: &str) -> WindSpeedEntityConfig {
        WindSpeedEntityConfig {
            entity: entity.to_string(),
            name: None,
            speed_unit: SpeedUnit::from(unit.to_string()),
        }
    }

    fn shown(entity: &str) -> CornerInfo {
        CornerInfo {
            show: true,
            entity: Some(entity.to_string()),
            ..CornerInfo::default()
        }
    }

    fn base_config() -> CardConfig {
        CardConfig {
            wind_direction: EntityRef {
                entity: "sensor.dir".to_string(),
            },
            windspeed_entities: vec![speed("sensor.speed", "auto"), speed("sensor.gust", "kt")],
            ..CardConfig::default()
        }
    }

    fn base_snapshot() -> StateSnapshot {
        StateSnapshot::from_records([
            EntityStateRecord::new("sensor.dir", "180"),
            EntityStateRecord::new("sensor.speed", "4.2").with_unit("m/s"),
            EntityStateRecord::new("sensor.gust", "9").with_unit("km/h"),
        ])
    }

    #[test]
    fn test_auto_unit_is_resolved() {
        let config = base_config();
        let resolved = check_entities(&config, &base_snapshot()).unwrap();

        assert_eq!(
            resolved.windspeed_entities[0].speed_unit,
            SpeedUnit::Fixed("m/s".to_string())
        );
        // Explicit units are never overwritten
        assert_eq!(
            resolved.windspeed_entities[1].speed_unit,
            SpeedUnit::Fixed("kt".to_string())
        );
        // Input stays as configured
        assert!(config.windspeed_entities[0].speed_unit.is_auto());
    }

    #[test]
    fn test_auto_unit_without_declared_unit_stays_auto() {
        let config = base_config();
        let mut snapshot = base_snapshot();
        snapshot.insert(EntityStateRecord::new("sensor.speed", "4.2"));

        let resolved = check_entities(&config, &snapshot).unwrap();
        assert!(resolved.windspeed_entities[0].speed_unit.is_auto());
    }

    #[test]
    fn test_check_is_idempotent() {
        let snapshot = base_snapshot();
        let once = check_entities(&base_config(), &snapshot).unwrap();
        let twice = check_entities(&once, &snapshot).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_only_speed_units_change() {
        let mut config = base_config();
        config.corners.top_left = shown("sensor.dir");
        let resolved = check_entities(&config, &base_snapshot()).unwrap();

        let mut expected = config.clone();
        expected.windspeed_entities[0].speed_unit = SpeedUnit::Fixed("m/s".to_string());
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_missing_wind_direction_reported_first() {
        let mut config = base_config();
        config.wind_direction.entity = "sensor.no_dir".to_string();
        config.windspeed_entities.push(speed("sensor.no_speed", "auto"));

        let err = check_entities(&config, &base_snapshot()).unwrap_err();
        assert_eq!(err.entity, "sensor.no_dir");
    }

    #[test]
    fn test_missing_speed_entities_reported_in_order() {
        let mut config = base_config();
        config.windspeed_entities.push(speed("sensor.first_missing", "auto"));
        config.windspeed_entities.push(speed("sensor.second_missing", "auto"));
        config.corners.top_left = shown("sensor.corner_missing");

        let err = check_entities(&config, &base_snapshot()).unwrap_err();
        assert_eq!(err.entity, "sensor.first_missing");
    }

    #[test]
    fn test_compass_checked_only_with_auto_rotate() {
        let mut config = base_config();
        config.compass = Some(CompassConfig {
            auto_rotate: false,
            entity: Some("sensor.heading".to_string()),
        });
        assert!(check_entities(&config, &base_snapshot()).is_ok());

        config.compass = Some(CompassConfig {
            auto_rotate: true,
            entity: Some("sensor.heading".to_string()),
        });
        config.corners.top_left = shown("sensor.corner_missing");
        let err = check_entities(&config, &base_snapshot()).unwrap_err();
        assert_eq!(err.entity, "sensor.heading");

        config.compass = Some(CompassConfig {
            auto_rotate: true,
            entity: None,
        });
        let err = check_entities(&config, &base_snapshot()).unwrap_err();
        assert_eq!(err.entity, "sensor.corner_missing");
    }

    #[test]
    fn test_corners_checked_in_fixed_order() {
        let mut config = base_config();
        config.corners.bottom_right = shown("sensor.br");
        config.corners.bottom_left = shown("sensor.bl");
        config.corners.top_right = shown("sensor.tr");

        let err = check_entities(&config, &base_snapshot()).unwrap_err();
        assert_eq!(err.entity, "sensor.tr");

        config.corners[Corner::TopRight].show = false;
        let err = check_entities(&config, &base_snapshot()).unwrap_err();
        assert_eq!(err.entity, "sensor.bl");
    }

    #[test]
    fn test_hidden_corner_with_dangling_entity_passes() {
        let mut config = base_config();
        for corner in Corner::ALL {
            config.corners[corner] = CornerInfo {
                show: false,
                entity: Some("sensor.does_not_exist".to_string()),
                ..CornerInfo::default()
            };
        }
        assert!(check_entities(&config, &base_snapshot()).is_ok());
    }

    #[test]
    fn test_shown_corner_without_entity_passes() {
        let mut config = base_config();
        config.corners.top_left = CornerInfo {
            show: true,
            entity: Some(String::new()),
            ..CornerInfo::default()
        };
        config.corners.top_right = CornerInfo {
            show: true,
            ..CornerInfo::default()
        };
        assert!(check_entities(&config, &base_snapshot()).is_ok());
    }

    #[test]
    fn test_error_message() {
        let mut config = base_config();
        config.corners.top_left = shown("sensor.missing");
        let err = check_entities(&config, &base_snapshot()).unwrap_err();
        assert_eq!(err.to_string(), "Entity sensor.missing not found.");
    }
}
