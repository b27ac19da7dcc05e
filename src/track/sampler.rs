use crate::sim::{Float3, Frame, EPSILON};

use super::control_point::ControlPointStore;
use super::spline::{blend_orientation, evaluate, SplineType};

pub const DEFAULT_RESOLUTION: usize = 100;
/// Upper bound on samples per segment; larger requests are clamped.
pub const MAX_RESOLUTION: usize = 10_000;

/// Steps shorter than this many float epsilons of the coordinate magnitude
/// are rounding noise, not a direction.
const DEGENERATE_STEP_ULPS: f32 = 64.0;

/// One discretized point of the loop.
/// C-compatible layout for FFI.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TrackSample {
    /// Local spline parameter within the segment, in `[0, 1)`.
    pub t: f32,
    /// Control point index the segment starts at.
    pub segment: u32,
    pub position: Float3,
    /// Unit vector towards the next sample (wrapping at the end).
    pub forward: Float3,
    /// Unit orientation (up-like) vector.
    pub orientation: Float3,
    /// Distance to the next sample.
    pub segment_length: f32,
    /// Running sum of `segment_length` up to and including this sample.
    pub cumulative_length: f32,
}

impl TrackSample {
    pub fn frame(&self) -> Frame {
        Frame::look_at(self.forward, self.orientation)
    }
}

/// Dense arc-length table for the whole loop, `segments * resolution`
/// entries. Rebuilt wholesale; never patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleTable {
    samples: Vec<TrackSample>,
    resolution: usize,
    spline: SplineType,
}

impl SampleTable {
    pub fn samples(&self) -> &[TrackSample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&TrackSample> {
        self.samples.get(index)
    }

    /// Sample at `index`, clamped to the last entry.
    pub fn clamped(&self, index: usize) -> Option<&TrackSample> {
        self.samples.get(index.min(self.samples.len().checked_sub(1)?))
    }

    /// The sample after `index`, wrapping to the first at the end.
    pub fn next(&self, index: usize) -> Option<&TrackSample> {
        if self.samples.is_empty() {
            return None;
        }
        self.samples.get((index + 1) % self.samples.len())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn segment_count(&self) -> usize {
        self.samples.len().checked_div(self.resolution).unwrap_or(0)
    }

    pub fn spline(&self) -> SplineType {
        self.spline
    }

    /// Length of the closed loop.
    pub fn total_length(&self) -> f32 {
        self.samples.last().map_or(0.0, |s| s.cumulative_length)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackSample> {
        self.samples.iter()
    }
}

/// Fallback direction when the whole loop is degenerate.
const FALLBACK_FORWARD: Float3 = Float3::BACK;
const FALLBACK_ORIENTATION: Float3 = Float3::UP;

/// Samples every segment of the loop at `resolution` steps.
///
/// Deterministic: each sample depends only on its segment's four control
/// points and its local parameter. A zero resolution is treated as one and
/// anything above [`MAX_RESOLUTION`] is clamped.
pub fn rebuild(points: &ControlPointStore, spline: SplineType, resolution: usize) -> SampleTable {
    let clamped = resolution.clamp(1, MAX_RESOLUTION);
    if clamped < resolution {
        log::warn!("resolution {resolution} clamped to {clamped}");
    }
    let (resolution, count) = match points.len().checked_mul(clamped) {
        Some(count) => (clamped, count),
        None => (1, points.len()),
    };

    let mut positions = Vec::with_capacity(count);
    let mut orientations = Vec::with_capacity(count);
    let mut params = Vec::with_capacity(count);

    for segment in 0..points.len() {
        let hood = points.neighborhood(segment);
        for step in 0..resolution {
            let t = step as f32 / resolution as f32;
            positions.push(evaluate(&hood.positions, spline, t));
            orientations.push(blend_orientation(&hood.orientations, t));
            params.push((segment as u32, t));
        }
    }

    let raw_forward: Vec<Float3> = (0..count)
        .map(|i| positions[(i + 1) % count] - positions[i])
        .collect();

    let forward = fill_degenerate(&raw_forward, FALLBACK_FORWARD, |i| {
        step_tolerance(positions[i], positions[(i + 1) % count])
    });
    let orientation = fill_degenerate(&orientations, FALLBACK_ORIENTATION, |_| 0.0);
    if forward.replaced > 0 || orientation.replaced > 0 {
        log::warn!(
            "track rebuild substituted {} tangents and {} orientations at degenerate samples",
            forward.replaced,
            orientation.replaced
        );
    }

    let mut cumulative = 0.0;
    let samples: Vec<TrackSample> = (0..count)
        .map(|i| {
            let segment_length = raw_forward[i].magnitude();
            cumulative += segment_length;
            let (segment, t) = params[i];
            TrackSample {
                t,
                segment,
                position: positions[i],
                forward: forward.values[i],
                orientation: orientation.values[i],
                segment_length,
                cumulative_length: cumulative,
            }
        })
        .collect();

    log::debug!(
        "rebuilt {:?} track: {} samples over {} segments, length {:.3}",
        spline,
        samples.len(),
        points.len(),
        cumulative
    );

    SampleTable {
        samples,
        resolution,
        spline,
    }
}

struct Normalized {
    values: Vec<Float3>,
    replaced: usize,
}

/// Shortest step between `a` and `b` that is more than float noise at their
/// distance from the origin.
fn step_tolerance(a: Float3, b: Float3) -> f32 {
    let scale = a.magnitude().max(b.magnitude()).max(1.0);
    EPSILON * DEGENERATE_STEP_ULPS * scale
}

fn unit_above(v: Float3, min_magnitude: f32) -> Option<Float3> {
    if v.magnitude() <= min_magnitude {
        return None;
    }
    v.try_normalize()
}

/// Normalizes every vector, replacing those no longer than `min_magnitude(i)`
/// (or too short to normalize) with the previous good value. "Previous" is
/// cyclic: a degenerate first entry takes the last good value of the loop.
fn fill_degenerate(
    raw: &[Float3],
    fallback: Float3,
    min_magnitude: impl Fn(usize) -> f32,
) -> Normalized {
    let seed = (0..raw.len())
        .rev()
        .find_map(|i| unit_above(raw[i], min_magnitude(i)))
        .unwrap_or(fallback);

    let mut last_good = seed;
    let mut replaced = 0;
    let values = raw
        .iter()
        .enumerate()
        .map(|(i, &v)| match unit_above(v, min_magnitude(i)) {
            Some(unit) => {
                last_good = unit;
                unit
            }
            None => {
                replaced += 1;
                last_good
            }
        })
        .collect();

    Normalized { values, replaced }
}
