//! # Entity State Snapshots
//!
//! The host delivers entity states as Home Assistant style records
//! (`entity_id`, `state`, `attributes`, `last_updated`). This module holds
//! the snapshot of those records and the per-tick resolution of corner
//! readouts into [`EntityState`] values.

use crate::config::CornerInfo;
use crate::Corners;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attribute carrying an entity's declared unit.
pub const UNIT_OF_MEASUREMENT: &str = "unit_of_measurement";

/// One entity as reported by the host.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EntityStateRecord {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl EntityStateRecord {
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
            attributes: serde_json::Map::new(),
            last_updated: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.attributes.insert(
            UNIT_OF_MEASUREMENT.to_string(),
            serde_json::Value::String(unit.into()),
        );
        self
    }

    /// Declared unit, if the attribute is present and a string.
    pub fn unit_of_measurement(&self) -> Option<&str> {
        self.attributes
            .get(UNIT_OF_MEASUREMENT)
            .and_then(serde_json::Value::as_str)
    }
}

/// All entity states known to the host at one point in time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateSnapshot {
    states: HashMap<String, EntityStateRecord>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = EntityStateRecord>) -> Self {
        let mut snapshot = Self::new();
        for record in records {
            snapshot.insert(record);
        }
        snapshot
    }

    /// Parse the JSON array returned by the `/api/states` endpoint.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<EntityStateRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Serialise back to the `/api/states` array shape, sorted by entity id.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let mut records: Vec<&EntityStateRecord> = self.states.values().collect();
        records.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
        serde_json::to_string(&records)
    }

    pub fn insert(&mut self, record: EntityStateRecord) {
        self.states.insert(record.entity_id.clone(), record);
    }

    pub fn get(&self, entity_id: &str) -> Option<&EntityStateRecord> {
        self.states.get(entity_id)
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.states.contains_key(entity_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// A corner's value as resolved for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityState {
    pub state: Option<String>,
    /// Whether the corner currently has a displayable value
    pub active: bool,
    pub unit_of_measurement: Option<String>,
}

impl EntityState {
    pub fn active(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            active: true,
            unit_of_measurement: None,
        }
    }

    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Resolve the four corner readouts against the current snapshot.
///
/// A corner is active when it is shown, has an entity configured, and that
/// entity is present in the snapshot.
pub fn resolve_corner_states(
    corners: &Corners<CornerInfo>,
    snapshot: &StateSnapshot,
) -> Corners<EntityState> {
    corners.map(|_, info| {
        if !info.show {
            return EntityState::inactive();
        }
        match info.entity_id().and_then(|entity| snapshot.get(entity)) {
            Some(record) => EntityState {
                state: Some(record.state.clone()),
                active: true,
                unit_of_measurement: record.unit_of_measurement().map(str::to_string),
            },
            None => EntityState::inactive(),
        }
    })
}
