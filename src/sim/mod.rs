//! Math primitives and the energy model behind the speed profile.
//!
//! Stateless: nothing here knows about control points or sample tables.

mod frame;
mod math;
mod speed_params;

pub mod physics;

pub use frame::Frame;
pub use math::{Float3, Matrix3, Quaternion};
pub use physics::{energy_step, speed_from_kinetic, EnergyStep, EPSILON, G};
pub use speed_params::SpeedParams;
