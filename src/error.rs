use thiserror::Error;

/// Minimum number of control points for a closed spline loop.
pub const MIN_CONTROL_POINTS: usize = 4;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("track needs at least {min} control points, got {count}", min = MIN_CONTROL_POINTS)]
    TooFewControlPoints { count: usize },

    #[error("control point {index} out of range for {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("sample resolution must be at least 1")]
    ZeroResolution,

    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("could not parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}
