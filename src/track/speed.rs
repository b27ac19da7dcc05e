use crate::sim::{energy_step, speed_from_kinetic, SpeedParams};

use super::sampler::SampleTable;

/// Speed model state at one sample.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpeedSample {
    pub speed: f32,
    pub kinetic: f32,
    /// Total mechanical energy in effect at this sample, refills included.
    pub total_energy: f32,
}

/// Per-sample speeds parallel to a [`SampleTable`]. Every speed is at least
/// [`SpeedParams::min_speed`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeedTable {
    samples: Vec<SpeedSample>,
    refills: usize,
}

impl SpeedTable {
    pub fn samples(&self) -> &[SpeedSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Speed at `index`, clamped to the last sample.
    pub fn speed(&self, index: usize) -> Option<f32> {
        let last = self.samples.len().checked_sub(1)?;
        Some(self.samples[index.min(last)].speed)
    }

    pub fn speeds(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().map(|s| s.speed)
    }

    /// Number of samples at which the kinetic floor forced an energy refill.
    pub fn refills(&self) -> usize {
        self.refills
    }

    pub fn final_total_energy(&self) -> Option<f32> {
        self.samples.last().map(|s| s.total_energy)
    }
}

/// Derives speeds from the elevation profile of `table`.
///
/// The train is a point mass whose kinetic energy is what the running total
/// leaves after potential energy (`height_coefficient * rise` since the first
/// sample). Where that would fall to the floor the train is powered: the
/// total is topped up and the kinetic energy clamped, so energy is no longer
/// conserved around the loop.
pub fn compute(table: &SampleTable, params: &SpeedParams) -> SpeedTable {
    let mut samples = Vec::with_capacity(table.len());
    let mut total_energy = params.total_energy;
    let mut potential = 0.0;
    let mut refills = 0;
    let mut prev_y = None;

    for sample in table.iter() {
        let y = sample.position.y;
        if let Some(prev) = prev_y {
            potential += params.height_coefficient * (y - prev);
        }
        prev_y = Some(y);

        let step = energy_step(
            total_energy,
            potential,
            params.min_kinetic,
            params.refill_amount,
        );
        if step.injected > 0.0 {
            refills += 1;
        }
        total_energy = step.total_energy;

        samples.push(SpeedSample {
            speed: speed_from_kinetic(step.kinetic, params.speed_scale),
            kinetic: step.kinetic,
            total_energy,
        });
    }

    log::debug!(
        "speed profile: {} samples, {} refills, total energy {:.3} -> {:.3}",
        samples.len(),
        refills,
        params.total_energy,
        total_energy
    );

    SpeedTable { samples, refills }
}
