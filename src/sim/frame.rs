use super::math::{Float3, Matrix3, Quaternion};

/// Orthonormal coordinate frame riding on the track.
///
/// Right-handed, built by a look-at construction:
/// - `direction`: forward along the track (tangent)
/// - `up`: the track orientation with its forward component removed
/// - `lateral`: rightward, `direction x up`
///
/// C-compatible layout for FFI.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub direction: Float3,
    pub up: Float3,
    pub lateral: Float3,
}

impl Frame {
    pub const fn new(direction: Float3, up: Float3, lateral: Float3) -> Self {
        Self {
            direction,
            up,
            lateral,
        }
    }

    /// Builds the frame that looks along `forward` with `up_hint` as the
    /// reference up vector. The hint need not be unit length or orthogonal
    /// to `forward`.
    ///
    /// When the hint is parallel to `forward` the world up axis is tried,
    /// then world right, so the result is always orthonormal.
    pub fn look_at(forward: Float3, up_hint: Float3) -> Self {
        let Some(dir) = forward.try_normalize() else {
            return Self::DEFAULT;
        };

        let lateral = [up_hint, Float3::UP, Float3::RIGHT]
            .into_iter()
            .find_map(|hint| dir.cross(hint).try_normalize())
            .unwrap_or(Float3::RIGHT);
        let up = lateral.cross(dir).normalize();

        Self::new(dir, up, lateral)
    }

    /// Rotation taking the canonical mesh axes (forward = -Z, up = +Y,
    /// right = +X) onto this frame.
    pub fn rotation_matrix(&self) -> Matrix3 {
        Matrix3::from_columns(self.lateral, self.up, -self.direction)
    }

    pub fn rotation(&self) -> Quaternion {
        Quaternion::from_rotation(&self.rotation_matrix())
    }

    pub const DEFAULT: Self = Self::new(Float3::BACK, Float3::UP, Float3::RIGHT);
}

impl Default for Frame {
    fn default() -> Self {
        Self::DEFAULT
    }
}
