use crate::config::CoasterConfig;
use crate::error::TrackError;
use crate::sim::Float3;

use super::control_point::{ControlPoint, ControlPointStore};
use super::locator::Progress;
use super::pose::{resolve_camera, resolve_train, CameraMode, CameraPose, MeshPose};
use super::sampler::{rebuild, SampleTable};
use super::spline::SplineType;
use super::speed::{compute, SpeedTable};
use super::trackside::{headlight, rails, sleepers, Headlight, RailSpan};

/// Everything the host drives each frame: the editable control points, the
/// settings, and the sample and speed tables derived from them.
///
/// Edits only mark the tables stale. Call [`Coaster::refresh`] once per
/// frame (or [`Coaster::rebuild`] to force it); until then every query
/// answers against the previous tables.
#[derive(Debug, Clone)]
pub struct Coaster {
    points: ControlPointStore,
    config: CoasterConfig,
    samples: SampleTable,
    speeds: SpeedTable,
    dirty: bool,
}

impl Coaster {
    pub fn new(points: ControlPointStore, config: CoasterConfig) -> Result<Self, TrackError> {
        config.validate()?;
        let mut coaster = Self {
            points,
            config,
            samples: SampleTable::default(),
            speeds: SpeedTable::default(),
            dirty: true,
        };
        coaster.rebuild();
        Ok(coaster)
    }

    pub fn from_points(points: Vec<ControlPoint>, config: CoasterConfig) -> Result<Self, TrackError> {
        Self::new(ControlPointStore::new(points)?, config)
    }

    pub fn points(&self) -> &ControlPointStore {
        &self.points
    }

    pub fn config(&self) -> &CoasterConfig {
        &self.config
    }

    pub fn samples(&self) -> &SampleTable {
        &self.samples
    }

    pub fn speeds(&self) -> &SpeedTable {
        &self.speeds
    }

    /// Whether an edit has happened since the last rebuild.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_points(&mut self, points: ControlPointStore) {
        self.points = points;
        self.dirty = true;
    }

    pub fn set_position(&mut self, index: usize, position: Float3) -> Result<(), TrackError> {
        self.points.set_position(index, position)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_orientation(&mut self, index: usize, orientation: Float3) -> Result<(), TrackError> {
        self.points.set_orientation(index, orientation)?;
        self.dirty = true;
        Ok(())
    }

    pub fn insert_after(&mut self, index: usize) -> Result<usize, TrackError> {
        let inserted = self.points.insert_after(index)?;
        self.dirty = true;
        Ok(inserted)
    }

    pub fn remove(&mut self, index: usize) -> Result<ControlPoint, TrackError> {
        let removed = self.points.remove(index)?;
        self.dirty = true;
        Ok(removed)
    }

    pub fn set_spline(&mut self, spline: SplineType) {
        if self.config.spline != spline {
            self.config.spline = spline;
            self.dirty = true;
        }
    }

    /// Replaces the settings. Rejected settings leave the current ones in
    /// place.
    pub fn set_config(&mut self, config: CoasterConfig) -> Result<(), TrackError> {
        config.validate()?;
        self.config = config;
        self.dirty = true;
        Ok(())
    }

    /// Rebuilds both tables from scratch.
    pub fn rebuild(&mut self) {
        self.samples = rebuild(&self.points, self.config.spline, self.config.resolution);
        self.speeds = compute(&self.samples, &self.config.speed);
        self.dirty = false;
    }

    /// Rebuilds if anything changed since the last rebuild. Returns whether
    /// it did.
    pub fn refresh(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.rebuild();
        true
    }

    pub fn total_length(&self) -> f32 {
        self.samples.total_length()
    }

    pub fn speed_at(&self, progress: Progress) -> Option<f32> {
        let index = progress.sample_index(&self.samples)?;
        self.speeds.speed(index)
    }

    pub fn camera(&self, progress: Progress, mode: CameraMode) -> Option<CameraPose> {
        let index = progress.sample_index(&self.samples)?;
        resolve_camera(&self.samples, index, mode, &self.config.pose)
    }

    /// Locomotive then each trailing car, spaced along the arc length.
    pub fn train(&self, progress: Progress) -> Vec<MeshPose> {
        let Some(Progress::ArcLength(head)) = progress.to_arc_length(&self.samples) else {
            return Vec::new();
        };
        let pose = &self.config.pose;
        resolve_train(
            &self.samples,
            head,
            pose.car_count,
            pose.car_spacing,
            pose.train_lift,
        )
    }

    pub fn headlight(&self, progress: Progress) -> Option<Headlight> {
        let index = progress.sample_index(&self.samples)?;
        headlight(&self.samples, index, &self.config.pose)
    }

    pub fn rails(&self) -> Vec<RailSpan> {
        rails(&self.samples, self.config.pose.rail_gauge)
    }

    pub fn sleepers(&self) -> Vec<MeshPose> {
        sleepers(&self.samples, &self.config.pose)
    }
}

impl Default for Coaster {
    fn default() -> Self {
        let config = CoasterConfig::default();
        let points = ControlPointStore::default_loop();
        let samples = rebuild(&points, config.spline, config.resolution);
        let speeds = compute(&samples, &config.speed);
        Self {
            points,
            config,
            samples,
            speeds,
            dirty: false,
        }
    }
}
