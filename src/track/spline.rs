use serde::{Deserialize, Serialize};

use crate::sim::Float3;

/// Position formula used between control points.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SplineType {
    /// Straight chords between consecutive points.
    Linear,
    /// Catmull-Rom: interpolates the points, tangent continuous.
    #[default]
    CardinalCubic,
    /// Uniform cubic B-spline: approximates the points, curvature continuous.
    CubicBSpline,
}

/// Fixed 4x4 blending matrix. Row `j` holds the coefficients of control
/// point `j` against the parameter vector `[t^3, t^2, t, 1]`; `scale`
/// multiplies the whole matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BasisMatrix {
    pub rows: [[f32; 4]; 4],
    pub scale: f32,
}

impl BasisMatrix {
    pub const CARDINAL: Self = Self {
        rows: [
            [-1.0, 2.0, -1.0, 0.0],
            [3.0, -5.0, 0.0, 2.0],
            [-3.0, 4.0, 1.0, 0.0],
            [1.0, -1.0, 0.0, 0.0],
        ],
        scale: 0.5,
    };

    pub const B_SPLINE: Self = Self {
        rows: [
            [-1.0, 3.0, -3.0, 1.0],
            [3.0, -6.0, 0.0, 4.0],
            [-3.0, 3.0, 3.0, 1.0],
            [1.0, 0.0, 0.0, 0.0],
        ],
        scale: 1.0 / 6.0,
    };

    /// Per-point blend weights at `t`.
    pub fn weights(&self, t: f32) -> [f32; 4] {
        let t2 = t * t;
        let params = [t2 * t, t2, t, 1.0];
        self.rows.map(|row| {
            let dot: f32 = row.iter().zip(params).map(|(m, p)| m * p).sum();
            dot * self.scale
        })
    }

    pub fn blend(&self, points: &[Float3; 4], t: f32) -> Float3 {
        self.weights(t)
            .into_iter()
            .zip(points)
            .fold(Float3::ZERO, |acc, (w, &p)| acc + p * w)
    }
}

impl SplineType {
    pub const ALL: [Self; 3] = [Self::Linear, Self::CardinalCubic, Self::CubicBSpline];

    pub fn basis(self) -> Option<&'static BasisMatrix> {
        match self {
            Self::Linear => None,
            Self::CardinalCubic => Some(&BasisMatrix::CARDINAL),
            Self::CubicBSpline => Some(&BasisMatrix::B_SPLINE),
        }
    }

    /// Whether the curve passes through the control points.
    pub fn interpolates(self) -> bool {
        !matches!(self, Self::CubicBSpline)
    }
}

/// Position on the segment between `points[1]` and `points[2]` at local
/// parameter `t` in `[0, 1]`.
pub fn evaluate(points: &[Float3; 4], spline: SplineType, t: f32) -> Float3 {
    match spline.basis() {
        None => points[1].lerp(points[2], t),
        Some(basis) => basis.blend(points, t),
    }
}

/// Orientation blend between the two bracketing control points. Always
/// linear, whichever position formula is active. Not normalized.
pub fn blend_orientation(orientations: &[Float3; 4], t: f32) -> Float3 {
    orientations[1].lerp(orientations[2], t)
}
