//! Control points to poses.
//!
//! The pipeline runs one way each frame: the control point store is sampled
//! into an arc-length table, the table yields a speed profile, and the
//! locator and pose resolver answer the host's per-frame queries against
//! both.

mod coaster;
mod control_point;
mod locator;
mod pose;
mod sampler;
mod speed;
mod spline;
mod trackside;

pub use coaster::Coaster;
pub use control_point::{ControlPoint, ControlPointStore, Neighborhood};
pub use locator::{
    arc_length_at, index_for_arc_length, index_for_parametric, index_for_progress,
    parametric_for_arc_length, t_for_arc_length, Progress,
};
pub use pose::{
    car_index, resolve_camera, resolve_mesh, resolve_train, top_down_bounds, top_down_camera,
    CameraMode, CameraPose, MeshPose, OrthoBounds, PoseParams, MIN_SLEEPER_SPACING,
};
pub use sampler::{rebuild, SampleTable, TrackSample, DEFAULT_RESOLUTION, MAX_RESOLUTION};
pub use speed::{compute, SpeedSample, SpeedTable};
pub use spline::{blend_orientation, evaluate, BasisMatrix, SplineType};
pub use trackside::{
    headlight, rail_span, rails, sleeper_stations, sleepers, Headlight, RailSection, RailSpan,
    MAX_SLEEPERS,
};
