//! Host-supplied settings for a coaster: spline formula, sampling density,
//! speed model constants and pose distances.
//!
//! Every field has a default, so a JSON document only needs the keys it
//! changes:
//!
//! ```
//! use trackcore::config::CoasterConfig;
//!
//! let config = CoasterConfig::from_json(r#"{ "resolution": 40 }"#).unwrap();
//! assert_eq!(config.resolution, 40);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::sim::SpeedParams;
use crate::track::{PoseParams, SplineType, DEFAULT_RESOLUTION, MAX_RESOLUTION};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoasterConfig {
    pub spline: SplineType,
    /// Samples per segment.
    pub resolution: usize,
    pub speed: SpeedParams,
    pub pose: PoseParams,
}

impl CoasterConfig {
    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, TrackError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, TrackError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TrackError> {
        if self.resolution == 0 {
            return Err(TrackError::ZeroResolution);
        }
        if self.resolution > MAX_RESOLUTION {
            return Err(TrackError::InvalidParameter {
                name: "resolution",
                value: self.resolution as f32,
            });
        }
        self.speed.validate()?;
        self.pose.validate()
    }
}

impl Default for CoasterConfig {
    fn default() -> Self {
        Self {
            spline: SplineType::default(),
            resolution: DEFAULT_RESOLUTION,
            speed: SpeedParams::default(),
            pose: PoseParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = CoasterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolution, 100);
        assert_eq!(config.spline, SplineType::CardinalCubic);
        assert_eq!(config.pose.car_count, 3);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = CoasterConfig::from_json(
            r#"{ "spline": "CubicBSpline", "speed": { "min_kinetic": 20.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.spline, SplineType::CubicBSpline);
        assert_eq!(config.speed.min_kinetic, 20.0);
        assert_eq!(config.speed.total_energy, 100.0);
        assert_eq!(config.pose, PoseParams::default());
        assert_eq!(config.resolution, DEFAULT_RESOLUTION);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(
            CoasterConfig::from_json("{}").unwrap(),
            CoasterConfig::default()
        );
    }

    #[test]
    fn zero_resolution_rejected() {
        let err = CoasterConfig::from_json(r#"{ "resolution": 0 }"#).unwrap_err();
        assert!(matches!(err, TrackError::ZeroResolution));
    }

    #[test]
    fn huge_resolution_rejected() {
        let err = CoasterConfig::from_json(r#"{ "resolution": 4611686018427387904 }"#).unwrap_err();
        assert!(matches!(
            err,
            TrackError::InvalidParameter {
                name: "resolution",
                ..
            }
        ));
        let at_limit = CoasterConfig {
            resolution: MAX_RESOLUTION,
            ..CoasterConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn nested_parameters_are_validated() {
        let err = CoasterConfig::from_json(r#"{ "speed": { "min_kinetic": -1.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TrackError::InvalidParameter {
                name: "speed.min_kinetic",
                ..
            }
        ));

        let err = CoasterConfig::from_json(r#"{ "pose": { "car_spacing": 0.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TrackError::InvalidParameter {
                name: "pose.car_spacing",
                ..
            }
        ));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = CoasterConfig::from_json("{ resolution: ").unwrap_err();
        assert!(matches!(err, TrackError::Config(_)));
    }

    #[test]
    fn json_round_trip_preserves_settings() {
        let config = CoasterConfig {
            spline: SplineType::Linear,
            resolution: 12,
            ..CoasterConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(CoasterConfig::from_json(&json).unwrap(), config);
    }
}
