use crate::errors::{CollectionKind, HydronetError, HydronetResult};
use crate::references::ParameterValue;
use serde::{Deserialize, Serialize};

/// A node holding volume between timesteps.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StorageNode {
    pub name: String,
    pub comment: Option<String>,
    pub cost: Option<ParameterValue>,
    #[serde(default)]
    pub initial_volume: f64,
    pub min_volume: Option<ParameterValue>,
    pub max_volume: Option<ParameterValue>,
}

impl StorageNode {
    pub fn new(name: &str, initial_volume: f64) -> Self {
        Self {
            name: name.to_string(),
            comment: None,
            cost: None,
            initial_volume,
            min_volume: None,
            max_volume: None,
        }
    }

    pub fn with_max_volume(mut self, max_volume: impl Into<ParameterValue>) -> Self {
        self.max_volume = Some(max_volume.into());
        self
    }

    /// Only literal volumes can be compared; named bounds are left to the engine.
    pub(crate) fn validate(&self) -> HydronetResult<()> {
        let invalid = |details: String| {
            Err(HydronetError::schema(
                CollectionKind::Nodes,
                Some(&self.name),
                details,
            ))
        };

        if self.initial_volume.is_nan() || self.initial_volume < 0.0 {
            return invalid(format!(
                "initial_volume must be non-negative, got {}",
                self.initial_volume
            ));
        }
        let min_volume = self.min_volume.as_ref().and_then(ParameterValue::as_constant);
        let max_volume = self.max_volume.as_ref().and_then(ParameterValue::as_constant);
        if let Some(max_volume) = max_volume {
            if self.initial_volume > max_volume {
                return invalid(format!(
                    "initial_volume ({}) exceeds max_volume ({max_volume})",
                    self.initial_volume
                ));
            }
            if let Some(min_volume) = min_volume {
                if min_volume > max_volume {
                    return invalid(format!(
                        "min_volume ({min_volume}) exceeds max_volume ({max_volume})"
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_checks() {
        assert!(StorageNode::new("res", 5.0)
            .with_max_volume(10.0)
            .validate()
            .is_ok());
        assert!(StorageNode::new("res", 50.0)
            .with_max_volume("capacity")
            .validate()
            .is_ok());

        let err = StorageNode::new("res", 12.0)
            .with_max_volume(10.0)
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid nodes entry \"res\": initial_volume (12) exceeds max_volume (10)"
        );

        assert!(StorageNode::new("res", -1.0).validate().is_err());
        assert!(StorageNode::new("res", f64::NAN).validate().is_err());
    }

    #[test]
    fn min_above_max() {
        let mut node = StorageNode::new("res", 0.0).with_max_volume(10.0);
        node.min_volume = Some(ParameterValue::Constant(11.0));
        assert!(node.validate().is_err());
    }
}
