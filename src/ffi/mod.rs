//! Handle-based FFI for trackcore.
//!
//! Functions:
//! - `trk_coaster_new` / `trk_coaster_free` - create and destroy a coaster
//! - `trk_coaster_set_points` - replace the control points and rebuild
//! - `trk_coaster_sample_count` - size the buffers for the copy calls
//! - `trk_coaster_copy_samples` / `trk_coaster_copy_speeds` - table views
//! - `trk_coaster_camera_pose` - eye/center/up for a camera mode
//! - `trk_coaster_train_poses` - locomotive and trailing car placements
//!
//! Progress is passed as a kind (`0` arc length, `1` parametric) and a value.
//! Camera modes: `0` world, `1` top-down, `2` first person, `3` chase.
//!
//! # Error Codes
//! - `0`: Success
//! - `-1`: Null pointer
//! - `-2`: Invalid input (too few points, bad config, unknown enum value)
//! - `-3`: Buffer too small (resize and retry)
//! - `-4`: No pose for the requested mode

use std::ffi::{c_char, CStr};

use crate::config::CoasterConfig;
use crate::track::{
    CameraMode, CameraPose, Coaster, ControlPoint, ControlPointStore, MeshPose, Progress,
    TrackSample,
};

pub const TRK_OK: i32 = 0;
pub const TRK_NULL_POINTER: i32 = -1;
pub const TRK_INVALID_INPUT: i32 = -2;
pub const TRK_BUFFER_TOO_SMALL: i32 = -3;
pub const TRK_NO_POSE: i32 = -4;

/// Opaque handle to a coaster.
pub type TrkCoasterHandle = *mut std::ffi::c_void;

/// Create a coaster from control points and an optional JSON config.
///
/// # Returns
/// - Valid handle on success (non-null)
/// - Null on error
///
/// # Safety
/// - `points` must point to at least `count` control points
/// - `config_json` must be null or a valid NUL-terminated string
#[no_mangle]
pub unsafe extern "C" fn trk_coaster_new(
    points: *const ControlPoint,
    count: usize,
    config_json: *const c_char,
) -> TrkCoasterHandle {
    if points.is_null() {
        return std::ptr::null_mut();
    }

    let config = if config_json.is_null() {
        CoasterConfig::default()
    } else {
        let parsed = CStr::from_ptr(config_json)
            .to_str()
            .ok()
            .and_then(|json| CoasterConfig::from_json(json).ok());
        match parsed {
            Some(config) => config,
            None => return std::ptr::null_mut(),
        }
    };

    let points = std::slice::from_raw_parts(points, count).to_vec();
    match Coaster::from_points(points, config) {
        Ok(coaster) => Box::into_raw(Box::new(coaster)) as TrkCoasterHandle,
        Err(err) => {
            log::warn!("trk_coaster_new rejected input: {err}");
            std::ptr::null_mut()
        }
    }
}

/// Free a coaster handle.
///
/// # Safety
/// - `handle` must be a valid handle returned by `trk_coaster_new`, or null
#[no_mangle]
pub unsafe extern "C" fn trk_coaster_free(handle: TrkCoasterHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle as *mut Coaster));
    }
}

/// Replace all control points and rebuild the tables.
///
/// # Safety
/// - `handle` must be a valid handle from `trk_coaster_new`
/// - `points` must point to at least `count` control points
#[no_mangle]
pub unsafe extern "C" fn trk_coaster_set_points(
    handle: TrkCoasterHandle,
    points: *const ControlPoint,
    count: usize,
) -> i32 {
    if handle.is_null() || points.is_null() {
        return TRK_NULL_POINTER;
    }
    let coaster = &mut *(handle as *mut Coaster);

    let points = std::slice::from_raw_parts(points, count).to_vec();
    match ControlPointStore::new(points) {
        Ok(store) => {
            coaster.set_points(store);
            coaster.refresh();
            TRK_OK
        }
        Err(_) => TRK_INVALID_INPUT,
    }
}

/// Number of samples (and speeds) in the current tables.
///
/// # Safety
/// - `handle` must be a valid handle from `trk_coaster_new`, or null
#[no_mangle]
pub unsafe extern "C" fn trk_coaster_sample_count(handle: TrkCoasterHandle) -> i64 {
    if handle.is_null() {
        return TRK_NULL_POINTER as i64;
    }
    let coaster = &*(handle as *const Coaster);
    coaster.samples().len() as i64
}

/// Copy the sample table into `out`.
///
/// # Safety
/// - `handle` must be a valid handle from `trk_coaster_new`
/// - `out` must be valid for `capacity` writes
#[no_mangle]
pub unsafe extern "C" fn trk_coaster_copy_samples(
    handle: TrkCoasterHandle,
    out: *mut TrackSample,
    capacity: usize,
) -> i32 {
    if handle.is_null() || out.is_null() {
        return TRK_NULL_POINTER;
    }
    let coaster = &*(handle as *const Coaster);
    copy_into(coaster.samples().samples(), out, capacity)
}

/// Copy the per-sample speeds into `out`.
///
/// # Safety
/// - `handle` must be a valid handle from `trk_coaster_new`
/// - `out` must be valid for `capacity` writes
#[no_mangle]
pub unsafe extern "C" fn trk_coaster_copy_speeds(
    handle: TrkCoasterHandle,
    out: *mut f32,
    capacity: usize,
) -> i32 {
    if handle.is_null() || out.is_null() {
        return TRK_NULL_POINTER;
    }
    let coaster = &*(handle as *const Coaster);
    let speeds: Vec<f32> = coaster.speeds().speeds().collect();
    copy_into(&speeds, out, capacity)
}

/// Camera pose for `mode` with the train at the given progress.
///
/// # Safety
/// - `handle` must be a valid handle from `trk_coaster_new`
/// - `out` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn trk_coaster_camera_pose(
    handle: TrkCoasterHandle,
    progress_kind: u32,
    progress: f32,
    mode: u32,
    out: *mut CameraPose,
) -> i32 {
    if handle.is_null() || out.is_null() {
        return TRK_NULL_POINTER;
    }
    let coaster = &*(handle as *const Coaster);

    let (Some(progress), Some(mode)) = (to_progress(progress_kind, progress), to_mode(mode)) else {
        return TRK_INVALID_INPUT;
    };
    match coaster.camera(progress, mode) {
        Some(pose) => {
            *out = pose;
            TRK_OK
        }
        None => TRK_NO_POSE,
    }
}

/// Locomotive pose followed by each trailing car.
///
/// # Safety
/// - `handle` must be a valid handle from `trk_coaster_new`
/// - `out` must be valid for `capacity` writes
/// - `out_count` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn trk_coaster_train_poses(
    handle: TrkCoasterHandle,
    progress_kind: u32,
    progress: f32,
    out: *mut MeshPose,
    capacity: usize,
    out_count: *mut usize,
) -> i32 {
    if handle.is_null() || out.is_null() || out_count.is_null() {
        return TRK_NULL_POINTER;
    }
    let coaster = &*(handle as *const Coaster);

    let Some(progress) = to_progress(progress_kind, progress) else {
        return TRK_INVALID_INPUT;
    };
    let poses = coaster.train(progress);
    *out_count = poses.len();
    copy_into(&poses, out, capacity)
}

// --- Helpers ---

unsafe fn copy_into<T: Copy>(values: &[T], out: *mut T, capacity: usize) -> i32 {
    if values.len() > capacity {
        return TRK_BUFFER_TOO_SMALL;
    }
    std::ptr::copy_nonoverlapping(values.as_ptr(), out, values.len());
    TRK_OK
}

fn to_progress(kind: u32, value: f32) -> Option<Progress> {
    match kind {
        0 => Some(Progress::ArcLength(value)),
        1 => Some(Progress::Parametric(value)),
        _ => None,
    }
}

fn to_mode(mode: u32) -> Option<CameraMode> {
    match mode {
        0 => Some(CameraMode::World),
        1 => Some(CameraMode::TopDown),
        2 => Some(CameraMode::FirstPerson),
        3 => Some(CameraMode::ThirdPerson),
        _ => None,
    }
}
