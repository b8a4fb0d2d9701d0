//! The time-stepping schedule of a model.

use crate::collection::unknown_fields;
use crate::errors::{CollectionKind, HydronetError, HydronetResult};
use crate::settings::LoadOptions;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Start and end dates (inclusive) and the length of each step in days.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Timestepper {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub timestep: u32,
}

impl Timestepper {
    pub fn new(start: NaiveDate, end: NaiveDate, timestep: u32) -> HydronetResult<Self> {
        let timestepper = Self {
            start,
            end,
            timestep,
        };
        timestepper.validate()?;
        Ok(timestepper)
    }

    pub(crate) fn from_document(document: Value, options: &LoadOptions) -> HydronetResult<Self> {
        let Value::Object(fields) = document else {
            return Err(HydronetError::schema(
                CollectionKind::Timestepper,
                None,
                "expected a mapping with start, end and timestep",
            ));
        };
        let timestepper: Timestepper = serde_json::from_value(Value::Object(fields.clone()))
            .map_err(|e| HydronetError::schema(CollectionKind::Timestepper, None, e.to_string()))?;

        let unknown = unknown_fields(&fields, &serde_json::to_value(&timestepper)?);
        options.check_unknown_fields(CollectionKind::Timestepper, None, &unknown)?;

        timestepper.validate()?;
        Ok(timestepper)
    }

    pub fn validate(&self) -> HydronetResult<()> {
        if self.timestep == 0 {
            return Err(HydronetError::schema(
                CollectionKind::Timestepper,
                None,
                "timestep must be at least one day",
            ));
        }
        if self.end < self.start {
            return Err(HydronetError::schema(
                CollectionKind::Timestepper,
                None,
                format!("end ({}) is before start ({})", self.end, self.start),
            ));
        }
        Ok(())
    }

    /// Number of steps between `start` and `end`, both included.
    ///
    /// Zero for a schedule that does not pass [`Timestepper::validate`].
    pub fn num_timesteps(&self) -> usize {
        let Ok(days) = usize::try_from((self.end - self.start).num_days()) else {
            return 0;
        };
        match days.checked_div(self.timestep as usize) {
            Some(steps) => steps + 1,
            None => 0,
        }
    }
}
