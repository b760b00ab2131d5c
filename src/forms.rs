use crate::models::{NewParameter, NewTank, NewWaterChange};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be a number, got '{input}'")]
    NotANumber { field: &'static str, input: String },
    #[error("{0} cannot be negative")]
    Negative(&'static str),
}

/// Raw text as posted by the browser, plus the last error shown with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState<D> {
    pub fields: D,
    pub error: Option<String>,
}

impl<D: Default> FormState<D> {
    pub fn with_fields(fields: D) -> Self {
        Self {
            fields,
            error: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterDraft {
    pub param_type: String,
    pub value: String,
    pub unit: String,
    pub notes: String,
}

impl ParameterDraft {
    pub fn validate(&self, tank_id: &str, now: DateTime<Utc>) -> Result<NewParameter, FormError> {
        Ok(NewParameter {
            param_type: required("Parameter type", &self.param_type)?,
            value: number("Value", &self.value)?,
            unit: required("Unit", &self.unit)?,
            notes: self.notes.trim().to_string(),
            timestamp: now,
            tank_id: tank_id.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaterChangeDraft {
    pub volume_gallons: String,
    pub notes: String,
}

impl WaterChangeDraft {
    pub fn validate(
        &self,
        tank_id: &str,
        now: DateTime<Utc>,
    ) -> Result<NewWaterChange, FormError> {
        Ok(NewWaterChange {
            volume_gallons: volume(&self.volume_gallons)?,
            notes: self.notes.trim().to_string(),
            date: now,
            tank_id: tank_id.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TankDraft {
    pub name: String,
    pub species: String,
    pub volume_gallons: String,
    pub notes: String,
}

impl TankDraft {
    pub fn validate(&self) -> Result<NewTank, FormError> {
        Ok(NewTank {
            name: required("Name", &self.name)?,
            species: required("Species", &self.species)?,
            volume_gallons: volume(&self.volume_gallons)?,
            notes: self.notes.trim().to_string(),
        })
    }
}

fn required(field: &'static str, input: &str) -> Result<String, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FormError::Missing(field));
    }
    Ok(trimmed.to_string())
}

fn number(field: &'static str, input: &str) -> Result<f64, FormError> {
    let trimmed = required(field, input)?;
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormError::NotANumber {
            field,
            input: trimmed,
        }),
    }
}

fn volume(input: &str) -> Result<f64, FormError> {
    const FIELD: &str = "Volume (gallons)";
    let value = number(FIELD, input)?;
    if value < 0.0 {
        return Err(FormError::Negative(FIELD));
    }
    Ok(value)
}
