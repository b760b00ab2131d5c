use crate::models::{Parameter, Tank, WaterChange};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const RECENT_LIMIT: usize = 5;

/// A record that can be ordered by when it happened.
pub trait Timestamped {
    fn occurred_at(&self) -> DateTime<Utc>;
}

impl Timestamped for Parameter {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for WaterChange {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.date
    }
}

/// Most recent first, at most `limit` entries. `sort_by` is stable, so records
/// sharing a timestamp keep the order the server sent them in.
pub fn latest<T: Timestamped>(records: &[T], limit: usize) -> Vec<&T> {
    let mut sorted: Vec<&T> = records.iter().collect();
    sorted.sort_by(|a, b| b.occurred_at().cmp(&a.occurred_at()));
    sorted.truncate(limit);
    sorted
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TankPreview {
    pub id: String,
    pub name: String,
    pub species: String,
    pub volume_gallons: f64,
    pub notes: String,
    pub recent_parameters: Vec<Parameter>,
    pub parameter_count: usize,
    pub recent_water_changes: Vec<WaterChange>,
    pub water_change_count: usize,
}

pub fn build_preview(tank: &Tank) -> TankPreview {
    TankPreview {
        id: tank.id.clone(),
        name: tank.name.clone(),
        species: tank.species.clone(),
        volume_gallons: tank.volume_gallons,
        notes: tank.notes.clone(),
        recent_parameters: latest(&tank.parameters, RECENT_LIMIT)
            .into_iter()
            .cloned()
            .collect(),
        parameter_count: tank.parameters.len(),
        recent_water_changes: latest(&tank.water_changes, RECENT_LIMIT)
            .into_iter()
            .cloned()
            .collect(),
        water_change_count: tank.water_changes.len(),
    }
}

pub fn build_previews(tanks: &[Tank]) -> Vec<TankPreview> {
    tanks.iter().map(build_preview).collect()
}
