//! Energy bookkeeping for the powered-train speed model.

pub const G: f32 = 9.80665;
pub const EPSILON: f32 = 1.192_093e-7;

/// Outcome of one conservation step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EnergyStep {
    /// Kinetic energy after the floor is applied.
    pub kinetic: f32,
    /// Total mechanical energy after any refill.
    pub total_energy: f32,
    /// Energy injected this step (zero when the floor was not reached).
    pub injected: f32,
}

/// Resolves kinetic energy for a sample given the running total energy and
/// the potential energy accumulated since the first sample.
///
/// At or below `min_kinetic` the train is powered: at least `refill_amount`
/// (and never less than the deficit) is added to the total and the kinetic
/// energy is clamped to the floor.
pub fn energy_step(
    total_energy: f32,
    potential: f32,
    min_kinetic: f32,
    refill_amount: f32,
) -> EnergyStep {
    let kinetic = total_energy - potential;
    if kinetic > min_kinetic {
        return EnergyStep {
            kinetic,
            total_energy,
            injected: 0.0,
        };
    }

    let injected = (min_kinetic - kinetic).max(refill_amount);
    EnergyStep {
        kinetic: min_kinetic,
        total_energy: total_energy + injected,
        injected,
    }
}

/// Speed for a kinetic energy: `scale * sqrt(kinetic)`.
pub fn speed_from_kinetic(kinetic: f32, scale: f32) -> f32 {
    scale * kinetic.max(0.0).sqrt()
}
