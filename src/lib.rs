//! trackcore - track geometry and motion for a closed-loop roller coaster.
//!
//! # Architecture
//!
//! Layered modules with strict inward-only dependencies:
//!
//! - **sim**: Math primitives (Float3, Frame, Quaternion) and the energy step
//! - **track**: Control points, splines, arc-length sampling, speed profile,
//!   locator and pose resolution
//! - **config**: Serializable settings for a coaster
//! - **ffi**: C FFI bindings
//!
//! # Usage
//!
//! ```
//! use trackcore::{CameraMode, Coaster, Progress};
//!
//! let coaster = Coaster::default();
//! let camera = coaster.camera(Progress::ArcLength(25.0), CameraMode::FirstPerson);
//! assert!(camera.is_some());
//! ```
//!
//! For C hosts, build with the `ffi` feature, link the cdylib and use the
//! `trk_*` functions.

pub mod config;
pub mod error;
pub mod sim;
pub mod track;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types at crate root
pub use config::CoasterConfig;
pub use error::TrackError;
pub use sim::{Float3, Frame, Quaternion};
pub use track::{CameraMode, Coaster, ControlPoint, ControlPointStore, Progress, SplineType};
