use serde::{Deserialize, Serialize};

use crate::error::TrackError;

/// Constants for the energy-conservation speed model.
///
/// None of these have a physically derived target; they are tuned for feel
/// and exposed so a host can adjust them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedParams {
    /// Mechanical energy of the train at the first sample.
    pub total_energy: f32,
    /// Potential energy gained per unit of elevation.
    pub height_coefficient: f32,
    /// Kinetic energy floor; the train is powered below it.
    pub min_kinetic: f32,
    /// Minimum energy injected each time the floor is reached.
    pub refill_amount: f32,
    /// Speed per square root of kinetic energy.
    pub speed_scale: f32,
}

impl SpeedParams {
    pub fn new(
        total_energy: f32,
        height_coefficient: f32,
        min_kinetic: f32,
        refill_amount: f32,
        speed_scale: f32,
    ) -> Self {
        Self {
            total_energy,
            height_coefficient,
            min_kinetic,
            refill_amount,
            speed_scale,
        }
    }

    /// Lowest speed the profile will ever report.
    pub fn min_speed(&self) -> f32 {
        super::physics::speed_from_kinetic(self.min_kinetic, self.speed_scale)
    }

    pub fn validate(&self) -> Result<(), TrackError> {
        let checks = [
            ("speed.total_energy", self.total_energy, self.total_energy >= self.min_kinetic),
            ("speed.height_coefficient", self.height_coefficient, true),
            ("speed.min_kinetic", self.min_kinetic, self.min_kinetic > 0.0),
            ("speed.refill_amount", self.refill_amount, self.refill_amount >= 0.0),
            ("speed.speed_scale", self.speed_scale, self.speed_scale > 0.0),
        ];
        for (name, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(TrackError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

impl Default for SpeedParams {
    fn default() -> Self {
        Self {
            total_energy: 100.0,
            height_coefficient: super::physics::G,
            min_kinetic: 10.0,
            refill_amount: 5.0,
            speed_scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let params = SpeedParams::new(50.0, 2.0, 1.0, 0.5, 0.25);
        assert_eq!(params.total_energy, 50.0);
        assert_eq!(params.height_coefficient, 2.0);
        assert_eq!(params.min_kinetic, 1.0);
        assert_eq!(params.refill_amount, 0.5);
        assert_eq!(params.speed_scale, 0.25);
    }

    #[test]
    fn test_default_values_validate() {
        let params = SpeedParams::default();
        assert_eq!(params.total_energy, 100.0);
        assert_eq!(params.min_kinetic, 10.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_min_speed() {
        let params = SpeedParams::new(100.0, 1.0, 16.0, 1.0, 0.5);
        assert_eq!(params.min_speed(), 2.0);
    }

    #[test]
    fn test_validate_rejects_zero_floor() {
        let params = SpeedParams {
            min_kinetic: 0.0,
            ..SpeedParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(TrackError::InvalidParameter {
                name: "speed.min_kinetic",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_energy_below_floor() {
        let params = SpeedParams {
            total_energy: 5.0,
            ..SpeedParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let params = SpeedParams {
            height_coefficient: f32::NAN,
            ..SpeedParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: SpeedParams = serde_json::from_str(r#"{"min_kinetic": 4.0}"#).unwrap();
        assert_eq!(params.min_kinetic, 4.0);
        assert_eq!(params.total_energy, 100.0);
    }
}
