//! Geometry placed alongside the track: rail strips, sleepers and the
//! locomotive headlight.

use crate::sim::Float3;

use super::locator::index_for_arc_length;
use super::pose::{resolve_mesh, MeshPose, PoseParams};
use super::sampler::{SampleTable, TrackSample};

/// Outer rail edges sit this many gauges from the centerline.
const OUTER_RAIL_FACTOR: f32 = 1.5;

/// Upper bound on sleepers per loop.
pub const MAX_SLEEPERS: usize = 100_000;

/// Cross-section of both rails at one sample.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RailSection {
    pub left_inner: Float3,
    pub left_outer: Float3,
    pub right_inner: Float3,
    pub right_outer: Float3,
}

impl RailSection {
    pub fn at(sample: &TrackSample, gauge: f32) -> Self {
        let lateral = sample.frame().lateral;
        let inner = lateral * gauge;
        let outer = lateral * (gauge * OUTER_RAIL_FACTOR);
        Self {
            left_inner: sample.position - inner,
            left_outer: sample.position - outer,
            right_inner: sample.position + inner,
            right_outer: sample.position + outer,
        }
    }
}

/// Rail strip from one sample to the next.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RailSpan {
    pub start: RailSection,
    pub end: RailSection,
}

pub fn rail_span(table: &SampleTable, index: usize, gauge: f32) -> Option<RailSpan> {
    let here = table.get(index)?;
    let next = table.next(index)?;
    Some(RailSpan {
        start: RailSection::at(here, gauge),
        end: RailSection::at(next, gauge),
    })
}

/// One span per sample; the last closes the loop.
pub fn rails(table: &SampleTable, gauge: f32) -> Vec<RailSpan> {
    (0..table.len())
        .filter_map(|i| rail_span(table, i, gauge))
        .collect()
}

/// Arc lengths of the sleepers: `0, spacing, 2 * spacing, ...` strictly
/// below the loop length, at most [`MAX_SLEEPERS`] of them.
pub fn sleeper_stations(table: &SampleTable, spacing: f32) -> Vec<f32> {
    let total = table.total_length();
    if !(spacing.is_finite() && spacing > 0.0) {
        return Vec::new();
    }
    // float-to-usize saturates
    let count = ((total / spacing).ceil() as usize).min(MAX_SLEEPERS);
    (0..count)
        .map(|k| k as f32 * spacing)
        .take_while(|&s| s < total)
        .collect()
}

pub fn sleepers(table: &SampleTable, params: &PoseParams) -> Vec<MeshPose> {
    sleeper_stations(table, params.sleeper_spacing)
        .into_iter()
        .filter_map(|s| {
            let index = index_for_arc_length(table, s)?;
            resolve_mesh(table, index, -params.sleeper_drop)
        })
        .collect()
}

/// Spot light mounted on the locomotive.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Headlight {
    pub position: Float3,
    pub direction: Float3,
}

pub fn headlight(table: &SampleTable, index: usize, params: &PoseParams) -> Option<Headlight> {
    let sample = table.clamped(index)?;
    Some(Headlight {
        position: sample.position
            + sample.orientation * params.headlight_lift
            + sample.forward * params.headlight_lead,
        direction: sample.forward,
    })
}
