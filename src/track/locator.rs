//! Conversions between arc length, parametric coordinates and sample
//! indices over a [`SampleTable`].
//!
//! All searches run over the ascending `cumulative_length` column. Lookups
//! past the end clamp to the last sample; only negative arc lengths wrap,
//! counting backwards from the end of the loop.

use serde::{Deserialize, Serialize};

use super::sampler::SampleTable;

/// Index of the first sample whose cumulative length exceeds `length`.
///
/// Negative lengths are measured back from the end of the loop, so
/// `-5.0` resolves like `total_length - 5.0`.
pub fn index_for_arc_length(table: &SampleTable, length: f32) -> Option<usize> {
    let last = table.len().checked_sub(1)?;
    let length = wrap_negative(length, table.total_length());
    let index = table
        .samples()
        .partition_point(|s| s.cumulative_length <= length);
    Some(index.min(last))
}

/// Local parameter of the sample [`index_for_arc_length`] resolves to. Not
/// interpolated: precision is one sample.
pub fn t_for_arc_length(table: &SampleTable, length: f32) -> Option<f32> {
    let index = index_for_arc_length(table, length)?;
    Some(table.samples()[index].t)
}

/// `floor(segment) * resolution + floor(t * resolution)`, clamped to the
/// table.
pub fn index_for_parametric(table: &SampleTable, segment: f32, t: f32) -> Option<usize> {
    let last = table.len().checked_sub(1)?;
    let resolution = table.resolution();
    // `as usize` saturates: negatives and NaN land on 0
    let base = (segment.floor() as usize).saturating_mul(resolution);
    let step = (t * resolution as f32).floor() as usize;
    Some(base.saturating_add(step).min(last))
}

/// Index for a single parametric progress value `u = segment + t`.
pub fn index_for_progress(table: &SampleTable, u: f32) -> Option<usize> {
    let segment = u.floor();
    index_for_parametric(table, segment, u - segment)
}

/// Arc length at which sample `index` begins (0 for the first sample).
/// Inverse of [`index_for_arc_length`] for samples of non-zero length.
pub fn arc_length_at(table: &SampleTable, index: usize) -> Option<f32> {
    let index = index.min(table.len().checked_sub(1)?);
    Some(match index {
        0 => 0.0,
        i => table.samples()[i - 1].cumulative_length,
    })
}

/// Parametric progress (`segment + t`) of the sample an arc length resolves
/// to. Used to keep the train in place when the host switches from
/// arc-length to parametric driving.
pub fn parametric_for_arc_length(table: &SampleTable, length: f32) -> Option<f32> {
    let index = index_for_arc_length(table, length)?;
    let sample = &table.samples()[index];
    Some(sample.segment as f32 + sample.t)
}

fn wrap_negative(length: f32, total: f32) -> f32 {
    if length < 0.0 && total > 0.0 {
        length.rem_euclid(total)
    } else {
        length
    }
}

/// Where the train is. Owned and advanced by the host; resolved against the
/// current tables each frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Progress {
    /// `segment + t`, uniform in spline parameter.
    Parametric(f32),
    /// Distance along the loop, uniform in space.
    ArcLength(f32),
}

impl Progress {
    pub fn sample_index(self, table: &SampleTable) -> Option<usize> {
        match self {
            Self::Parametric(u) => index_for_progress(table, u),
            Self::ArcLength(s) => index_for_arc_length(table, s),
        }
    }

    /// Moves by `delta` in this progress' own units, wrapping around the
    /// loop in both directions.
    pub fn advanced(self, delta: f32, table: &SampleTable) -> Self {
        match self {
            Self::Parametric(u) => Self::Parametric(wrap(u + delta, table.segment_count() as f32)),
            Self::ArcLength(s) => Self::ArcLength(wrap(s + delta, table.total_length())),
        }
    }

    /// Same location expressed as an arc length.
    pub fn to_arc_length(self, table: &SampleTable) -> Option<Self> {
        match self {
            Self::ArcLength(_) => Some(self),
            Self::Parametric(_) => {
                let index = self.sample_index(table)?;
                arc_length_at(table, index).map(Self::ArcLength)
            }
        }
    }

    /// Same location expressed parametrically.
    pub fn to_parametric(self, table: &SampleTable) -> Option<Self> {
        match self {
            Self::Parametric(_) => Some(self),
            Self::ArcLength(s) => parametric_for_arc_length(table, s).map(Self::Parametric),
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::ArcLength(0.0)
    }
}

fn wrap(value: f32, period: f32) -> f32 {
    if period > 0.0 {
        value.rem_euclid(period)
    } else {
        0.0
    }
}
