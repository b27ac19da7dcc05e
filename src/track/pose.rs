use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::sim::{Float3, Frame, Quaternion};

use super::locator::index_for_arc_length;
use super::sampler::SampleTable;

/// Camera selection. Owned by the host; passed in per query.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// Host-controlled orbit camera; no pose from the track.
    #[default]
    World,
    /// Fixed orthographic view straight down.
    TopDown,
    /// Riding the train.
    FirstPerson,
    /// Chasing the train from behind and above.
    ThirdPerson,
}

/// Eye/center/up triple for a look-at view matrix.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CameraPose {
    pub eye: Float3,
    pub center: Float3,
    pub up: Float3,
}

/// Symmetric orthographic volume for the top-down camera.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthoBounds {
    pub half_width: f32,
    pub half_height: f32,
    pub near: f32,
    pub far: f32,
}

/// Placement of a mesh (train, car, sleeper) on the track.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct MeshPose {
    pub sample_index: u32,
    pub position: Float3,
    pub frame: Frame,
    pub rotation: Quaternion,
}

impl MeshPose {
    /// Column-major model matrix for a mesh modelled facing -Z with +Y up.
    pub fn matrix(&self) -> [f32; 16] {
        self.frame.rotation_matrix().to_affine(self.position)
    }
}

pub const MIN_SLEEPER_SPACING: f32 = 0.01;

/// Tunable distances for cameras and meshes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseParams {
    pub first_person_lift: f32,
    pub chase_lift: f32,
    pub chase_distance: f32,
    /// Lift of the train and car meshes along the track orientation.
    pub train_lift: f32,
    pub car_count: u32,
    pub car_spacing: f32,
    pub rail_gauge: f32,
    pub sleeper_spacing: f32,
    pub sleeper_drop: f32,
    pub headlight_lift: f32,
    pub headlight_lead: f32,
    pub top_down_half_extent: f32,
    pub top_down_height: f32,
}

impl PoseParams {
    pub fn validate(&self) -> Result<(), TrackError> {
        let positive = [
            ("pose.car_spacing", self.car_spacing),
            ("pose.rail_gauge", self.rail_gauge),
            ("pose.sleeper_spacing", self.sleeper_spacing),
            ("pose.top_down_half_extent", self.top_down_half_extent),
            ("pose.top_down_height", self.top_down_height),
        ];
        let finite = [
            ("pose.first_person_lift", self.first_person_lift),
            ("pose.chase_lift", self.chase_lift),
            ("pose.chase_distance", self.chase_distance),
            ("pose.train_lift", self.train_lift),
            ("pose.sleeper_drop", self.sleeper_drop),
            ("pose.headlight_lift", self.headlight_lift),
            ("pose.headlight_lead", self.headlight_lead),
        ];

        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TrackError::InvalidParameter { name, value });
            }
        }
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(TrackError::InvalidParameter { name, value });
            }
        }
        if self.sleeper_spacing < MIN_SLEEPER_SPACING {
            return Err(TrackError::InvalidParameter {
                name: "pose.sleeper_spacing",
                value: self.sleeper_spacing,
            });
        }
        Ok(())
    }
}

impl Default for PoseParams {
    fn default() -> Self {
        Self {
            first_person_lift: 10.0,
            chase_lift: 20.0,
            chase_distance: 30.0,
            train_lift: 0.0,
            car_count: 3,
            car_spacing: 12.0,
            rail_gauge: 1.5,
            sleeper_spacing: 5.0,
            sleeper_drop: 1.0,
            headlight_lift: 5.0,
            headlight_lead: 5.0,
            top_down_half_extent: 110.0,
            top_down_height: 200.0,
        }
    }
}

/// Camera pose for `mode` at sample `index` (clamped to the table).
///
/// `World` yields `None`: that camera is driven by the host. `TopDown`
/// ignores the index.
pub fn resolve_camera(
    table: &SampleTable,
    index: usize,
    mode: CameraMode,
    params: &PoseParams,
) -> Option<CameraPose> {
    let (lift, back) = match mode {
        CameraMode::World => return None,
        CameraMode::TopDown => return Some(top_down_camera(params)),
        CameraMode::FirstPerson => (params.first_person_lift, 0.0),
        CameraMode::ThirdPerson => (params.chase_lift, params.chase_distance),
    };

    let sample = table.clamped(index)?;
    let eye = sample.position + sample.orientation * lift - sample.forward * back;
    Some(CameraPose {
        eye,
        center: eye + sample.forward,
        up: sample.orientation,
    })
}

/// Straight-down view of the world origin; screen-up is world -Z.
pub fn top_down_camera(params: &PoseParams) -> CameraPose {
    CameraPose {
        eye: Float3::new(0.0, params.top_down_height, 0.0),
        center: Float3::ZERO,
        up: Float3::BACK,
    }
}

/// Orthographic bounds keeping `top_down_half_extent` on the longer screen
/// axis.
pub fn top_down_bounds(aspect: f32, params: &PoseParams) -> OrthoBounds {
    let extent = params.top_down_half_extent;
    let aspect = if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    };
    let (half_width, half_height) = if aspect >= 1.0 {
        (extent, extent / aspect)
    } else {
        (extent * aspect, extent)
    };
    OrthoBounds {
        half_width,
        half_height,
        near: 0.0,
        far: 2.0 * params.top_down_height,
    }
}

/// Mesh placement at sample `index`, lifted `vertical_offset` along the
/// sampled orientation and rotated so -Z follows the track and +Y follows
/// the orientation.
pub fn resolve_mesh(table: &SampleTable, index: usize, vertical_offset: f32) -> Option<MeshPose> {
    let index = index.min(table.len().checked_sub(1)?);
    let sample = &table.samples()[index];
    let frame = sample.frame();
    Some(MeshPose {
        sample_index: index as u32,
        position: sample.position + sample.orientation * vertical_offset,
        frame,
        rotation: frame.rotation(),
    })
}

/// Sample index of the car in `slot` (0 is the locomotive), `spacing` arc
/// length apart, wrapping behind the start of the loop.
pub fn car_index(table: &SampleTable, head_arc: f32, spacing: f32, slot: u32) -> Option<usize> {
    index_for_arc_length(table, head_arc - spacing * slot as f32)
}

/// Locomotive followed by `car_count` trailing cars.
pub fn resolve_train(
    table: &SampleTable,
    head_arc: f32,
    car_count: u32,
    spacing: f32,
    vertical_offset: f32,
) -> Vec<MeshPose> {
    (0..=car_count)
        .filter_map(|slot| {
            let index = car_index(table, head_arc, spacing, slot)?;
            resolve_mesh(table, index, vertical_offset)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::control_point::{ControlPoint, ControlPointStore};
    use crate::track::locator::arc_length_at;
    use crate::track::sampler::rebuild;
    use crate::track::spline::SplineType;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-4;

    fn square_table() -> SampleTable {
        let points = [(0.0, 0.0), (40.0, 0.0), (40.0, 40.0), (0.0, 40.0)]
            .into_iter()
            .map(|(x, z)| ControlPoint::at(Float3::new(x, 2.0, z)))
            .collect();
        rebuild(
            &ControlPointStore::new(points).unwrap(),
            SplineType::Linear,
            20,
        )
    }

    fn assert_vec_eq(a: Float3, b: Float3) {
        assert_relative_eq!(a.x, b.x, epsilon = TOLERANCE);
        assert_relative_eq!(a.y, b.y, epsilon = TOLERANCE);
        assert_relative_eq!(a.z, b.z, epsilon = TOLERANCE);
    }

    #[test]
    fn world_mode_has_no_pose() {
        let table = square_table();
        assert_eq!(
            resolve_camera(&table, 5, CameraMode::World, &PoseParams::default()),
            None
        );
    }

    #[test]
    fn top_down_ignores_index() {
        let table = square_table();
        let params = PoseParams::default();
        let a = resolve_camera(&table, 0, CameraMode::TopDown, &params);
        let b = resolve_camera(&table, 50, CameraMode::TopDown, &params);
        assert_eq!(a, b);
        let pose = a.unwrap();
        assert!(pose.eye.y > pose.center.y);
        assert_eq!(pose.up, Float3::BACK);
    }

    #[test]
    fn first_person_lifts_along_orientation() {
        let table = square_table();
        let params = PoseParams::default();
        let pose = resolve_camera(&table, 5, CameraMode::FirstPerson, &params).unwrap();

        // sample 5 of segment 0: x = 10, heading +x
        assert_vec_eq(pose.eye, Float3::new(10.0, 12.0, 0.0));
        assert_vec_eq(pose.center, Float3::new(11.0, 12.0, 0.0));
        assert_vec_eq(pose.up, Float3::UP);
    }

    #[test]
    fn third_person_sits_behind_and_above() {
        let table = square_table();
        let params = PoseParams::default();
        let pose = resolve_camera(&table, 5, CameraMode::ThirdPerson, &params).unwrap();

        assert_vec_eq(pose.eye, Float3::new(-20.0, 22.0, 0.0));
        assert_vec_eq(pose.center - pose.eye, Float3::RIGHT);
    }

    #[test]
    fn camera_index_is_clamped() {
        let table = square_table();
        let params = PoseParams::default();
        let last = resolve_camera(&table, table.len() - 1, CameraMode::FirstPerson, &params);
        let past = resolve_camera(&table, 10_000, CameraMode::FirstPerson, &params);
        assert_eq!(last, past);
    }

    #[test]
    fn camera_pose_is_reproducible() {
        let table = square_table();
        let params = PoseParams::default();
        for mode in [CameraMode::FirstPerson, CameraMode::ThirdPerson] {
            assert_eq!(
                resolve_camera(&table, 33, mode, &params),
                resolve_camera(&table, 33, mode, &params)
            );
        }
    }

    #[test]
    fn top_down_bounds_follow_aspect() {
        let params = PoseParams::default();
        let wide = top_down_bounds(2.0, &params);
        assert_relative_eq!(wide.half_width, 110.0, epsilon = TOLERANCE);
        assert_relative_eq!(wide.half_height, 55.0, epsilon = TOLERANCE);
        let tall = top_down_bounds(0.5, &params);
        assert_relative_eq!(tall.half_width, 55.0, epsilon = TOLERANCE);
        assert_relative_eq!(tall.half_height, 110.0, epsilon = TOLERANCE);
        let bad = top_down_bounds(f32::NAN, &params);
        assert_relative_eq!(bad.half_width, 110.0, epsilon = TOLERANCE);
    }

    #[test]
    fn mesh_rotation_maps_canonical_axes() {
        let table = square_table();
        // second segment heads +z
        let pose = resolve_mesh(&table, 25, 1.5).unwrap();
        assert_vec_eq(pose.position, Float3::new(40.0, 3.5, 10.0));
        assert_vec_eq(pose.rotation.mul_vec(Float3::BACK), Float3::FORWARD);
        assert_vec_eq(pose.rotation.mul_vec(Float3::UP), Float3::UP);

        let m = pose.matrix();
        assert_relative_eq!(m[12], 40.0, epsilon = TOLERANCE);
        assert_relative_eq!(m[13], 3.5, epsilon = TOLERANCE);
    }

    #[test]
    fn trailing_cars_sit_behind_locomotive() {
        let table = square_table();
        let head = arc_length_at(&table, 30).unwrap();
        let poses = resolve_train(&table, head, 2, 6.0, 0.0);
        assert_eq!(poses.len(), 3);
        assert_eq!(poses[0].sample_index, 30);
        assert!(poses[1].sample_index < poses[0].sample_index);
        assert!(poses[2].sample_index < poses[1].sample_index);
        assert_eq!(
            Some(poses[1].sample_index as usize),
            index_for_arc_length(&table, head - 6.0)
        );
    }

    #[test]
    fn trailing_cars_wrap_behind_start() {
        let table = square_table();
        let poses = resolve_train(&table, 1.0, 1, 10.0, 0.0);
        let expected = index_for_arc_length(&table, table.total_length() - 9.0).unwrap();
        assert_eq!(poses[1].sample_index as usize, expected);
        assert!(poses[1].sample_index > poses[0].sample_index);
    }

    #[test]
    fn empty_table_resolves_nothing() {
        let table = SampleTable::default();
        let params = PoseParams::default();
        assert!(resolve_camera(&table, 0, CameraMode::FirstPerson, &params).is_none());
        assert!(resolve_mesh(&table, 0, 0.0).is_none());
        assert!(resolve_train(&table, 0.0, 3, 5.0, 0.0).is_empty());
    }

    #[test]
    fn params_validate() {
        assert!(PoseParams::default().validate().is_ok());
        let bad = PoseParams {
            car_spacing: 0.0,
            ..PoseParams::default()
        };
        assert!(bad.validate().is_err());
        let bad = PoseParams {
            sleeper_spacing: 1e-30,
            ..PoseParams::default()
        };
        assert!(bad.validate().is_err());
        let bad = PoseParams {
            chase_lift: f32::INFINITY,
            ..PoseParams::default()
        };
        assert!(bad.validate().is_err());
    }
}
