use serde::{Deserialize, Serialize};

use crate::error::{TrackError, MIN_CONTROL_POINTS};
use crate::sim::Float3;

/// A user-placed anchor of the track.
///
/// `orientation` is an up-like reference vector; it is neither required to
/// be unit length nor orthogonal to the track.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub position: Float3,
    pub orientation: Float3,
}

impl ControlPoint {
    pub const fn new(position: Float3, orientation: Float3) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub const fn at(position: Float3) -> Self {
        Self::new(position, Float3::UP)
    }
}

/// The four control points around one segment, in spline order
/// `(i-1, i, i+1, i+2)`. The segment itself runs from index 1 to index 2.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Neighborhood {
    pub positions: [Float3; 4],
    pub orientations: [Float3; 4],
}

/// Cyclic list of control points. Adjacency is index arithmetic modulo the
/// point count; the store never holds fewer than four points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ControlPoint>", into = "Vec<ControlPoint>")]
pub struct ControlPointStore {
    points: Vec<ControlPoint>,
}

impl ControlPointStore {
    pub fn new(points: Vec<ControlPoint>) -> Result<Self, TrackError> {
        if points.len() < MIN_CONTROL_POINTS {
            return Err(TrackError::TooFewControlPoints {
                count: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Flat square loop of side 100 centred on the origin, 5 units up.
    pub fn default_loop() -> Self {
        let corners = [(-50.0, -50.0), (50.0, -50.0), (50.0, 50.0), (-50.0, 50.0)];
        Self {
            points: corners
                .into_iter()
                .map(|(x, z)| ControlPoint::at(Float3::new(x, 5.0, z)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&ControlPoint> {
        self.points.get(index)
    }

    /// Point at `index` taken modulo the point count; negative indices wrap
    /// backwards.
    pub fn wrapped(&self, index: isize) -> &ControlPoint {
        let n = self.points.len() as isize;
        &self.points[index.rem_euclid(n) as usize]
    }

    pub fn neighborhood(&self, segment: usize) -> Neighborhood {
        let i = segment as isize;
        let pts = [
            self.wrapped(i - 1),
            self.wrapped(i),
            self.wrapped(i + 1),
            self.wrapped(i + 2),
        ];
        Neighborhood {
            positions: pts.map(|p| p.position),
            orientations: pts.map(|p| p.orientation),
        }
    }

    pub fn set_position(&mut self, index: usize, position: Float3) -> Result<(), TrackError> {
        self.checked_mut(index)?.position = position;
        Ok(())
    }

    pub fn set_orientation(
        &mut self,
        index: usize,
        orientation: Float3,
    ) -> Result<(), TrackError> {
        self.checked_mut(index)?.orientation = orientation;
        Ok(())
    }

    /// Inserts a point halfway between `index` and its successor, copying the
    /// orientation of `index`. Returns the new point's index.
    pub fn insert_after(&mut self, index: usize) -> Result<usize, TrackError> {
        let current = *self.checked_mut(index)?;
        let next = *self.wrapped(index as isize + 1);
        let midpoint = current.position.lerp(next.position, 0.5);
        self.points
            .insert(index + 1, ControlPoint::new(midpoint, current.orientation));
        Ok(index + 1)
    }

    /// Removes the point at `index`, refusing to go below four points.
    pub fn remove(&mut self, index: usize) -> Result<ControlPoint, TrackError> {
        self.checked_mut(index)?;
        if self.points.len() <= MIN_CONTROL_POINTS {
            return Err(TrackError::TooFewControlPoints {
                count: self.points.len() - 1,
            });
        }
        Ok(self.points.remove(index))
    }

    fn checked_mut(&mut self, index: usize) -> Result<&mut ControlPoint, TrackError> {
        let len = self.points.len();
        self.points
            .get_mut(index)
            .ok_or(TrackError::IndexOutOfRange { index, len })
    }
}

impl Default for ControlPointStore {
    fn default() -> Self {
        Self::default_loop()
    }
}

impl TryFrom<Vec<ControlPoint>> for ControlPointStore {
    type Error = TrackError;

    fn try_from(points: Vec<ControlPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<ControlPointStore> for Vec<ControlPoint> {
    fn from(store: ControlPointStore) -> Self {
        store.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_store(n: usize) -> ControlPointStore {
        ControlPointStore::new(
            (0..n)
                .map(|i| ControlPoint::at(Float3::new(i as f32 * 10.0, 0.0, 0.0)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_fewer_than_four() {
        let points = vec![ControlPoint::at(Float3::ZERO); 3];
        assert!(matches!(
            ControlPointStore::new(points),
            Err(TrackError::TooFewControlPoints { count: 3 })
        ));
    }

    #[test]
    fn default_loop_has_four_points() {
        let store = ControlPointStore::default();
        assert_eq!(store.len(), 4);
        assert!(!store.is_empty());
    }

    #[test]
    fn neighborhood_wraps_at_start() {
        let store = line_store(5);
        let hood = store.neighborhood(0);
        assert_eq!(hood.positions[0].x, 40.0);
        assert_eq!(hood.positions[1].x, 0.0);
        assert_eq!(hood.positions[2].x, 10.0);
        assert_eq!(hood.positions[3].x, 20.0);
    }

    #[test]
    fn neighborhood_wraps_at_end() {
        let store = line_store(5);
        let hood = store.neighborhood(4);
        assert_eq!(hood.positions[0].x, 30.0);
        assert_eq!(hood.positions[1].x, 40.0);
        assert_eq!(hood.positions[2].x, 0.0);
        assert_eq!(hood.positions[3].x, 10.0);
    }

    #[test]
    fn set_position_out_of_range_errors() {
        let mut store = line_store(4);
        assert!(matches!(
            store.set_position(4, Float3::ZERO),
            Err(TrackError::IndexOutOfRange { index: 4, len: 4 })
        ));
        store.set_position(1, Float3::UP).unwrap();
        assert_eq!(store.points()[1].position, Float3::UP);
    }

    #[test]
    fn insert_after_last_uses_wrapped_midpoint() {
        let mut store = line_store(4);
        store.set_orientation(3, Float3::RIGHT).unwrap();
        let index = store.insert_after(3).unwrap();
        assert_eq!(index, 4);
        assert_eq!(store.len(), 5);
        assert_eq!(store.points()[4].position.x, 15.0);
        assert_eq!(store.points()[4].orientation, Float3::RIGHT);
    }

    #[test]
    fn remove_keeps_minimum() {
        let mut store = line_store(5);
        let removed = store.remove(2).unwrap();
        assert_eq!(removed.position.x, 20.0);
        assert!(store.remove(0).is_err());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn deserialize_rejects_short_list() {
        let json = r#"[
            {"position": {"x": 0.0, "y": 0.0, "z": 0.0}, "orientation": {"x": 0.0, "y": 1.0, "z": 0.0}}
        ]"#;
        assert!(serde_json::from_str::<ControlPointStore>(json).is_err());
    }
}
