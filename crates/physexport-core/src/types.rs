//! Common types used across physexport
//!
//! Thin wrappers over nalgebra shared by the scene model and the exporter:
//! rigid poses, quaternion component ordering, and the row-major matrix
//! layout used on disk.

use nalgebra::{Matrix4, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// 3D vector used for translations, scales and gravity
pub type Vec3 = Vector3<f32>;

/// Unit quaternion used for rotations
pub type Quat = UnitQuaternion<f32>;

/// 4x4 affine transform (column vectors, translation in the last column)
pub type Mat4 = Matrix4<f32>;

/// Component order used when a quaternion is written out as four floats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuaternionOrder {
    /// `[w, x, y, z]`, scalar first
    #[default]
    Wxyz,
    /// `[x, y, z, w]`, scalar last
    Xyzw,
}

impl QuaternionOrder {
    /// Lay out the components of `rotation` in this order
    pub fn components(&self, rotation: &Quat) -> [f32; 4] {
        let q = rotation.quaternion();
        match self {
            QuaternionOrder::Wxyz => [q.w, q.i, q.j, q.k],
            QuaternionOrder::Xyzw => [q.i, q.j, q.k, q.w],
        }
    }
}

/// Rigid pose: translation plus rotation, no scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Pose {
    /// Create a pose from its parts
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self { translation, rotation }
    }

    /// The pose at the origin with no rotation
    pub fn identity() -> Self {
        Self::new(Vec3::zeros(), Quat::identity())
    }

    /// Translation as a plain array
    pub fn location(&self) -> [f32; 3] {
        [self.translation.x, self.translation.y, self.translation.z]
    }

    /// Rotation as a plain array in the requested order
    pub fn quaternion(&self, order: QuaternionOrder) -> [f32; 4] {
        order.components(&self.rotation)
    }

    /// Homogeneous matrix of this pose
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.translation) * self.rotation.to_homogeneous()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Below this, `w` is float noise around a half-turn
const HALF_TURN_EPSILON: f32 = 1e-6;

/// Pick one of the two sign representatives of a rotation.
///
/// `q` and `-q` encode the same rotation. Exported rotations use the one with
/// `w > 0`. For half-turns, where `|w| < 1e-6`, the sign of `w` is noise, so
/// the first of `x`, `y`, `z` that is not near zero is made positive instead.
pub fn canonical_rotation(rotation: Quat) -> Quat {
    let q = rotation.quaternion();
    let negative = if q.w.abs() >= HALF_TURN_EPSILON {
        q.w < 0.0
    } else {
        [q.i, q.j, q.k]
            .into_iter()
            .find(|c| c.abs() >= HALF_TURN_EPSILON)
            .is_some_and(|c| c < 0.0)
    };

    if negative {
        Quat::new_unchecked(-rotation.into_inner())
    } else {
        rotation
    }
}

/// Compose translation, rotation and scale into an affine matrix (T * R * S)
pub fn compose_matrix(translation: &Vec3, rotation: &Quat, scale: &Vec3) -> Mat4 {
    Mat4::new_translation(translation)
        * rotation.to_homogeneous()
        * Mat4::new_nonuniform_scaling(scale)
}

/// Rows of a matrix, top to bottom
pub fn to_rows(matrix: &Mat4) -> [[f32; 4]; 4] {
    std::array::from_fn(|r| std::array::from_fn(|c| matrix[(r, c)]))
}

/// Matrix from rows, top to bottom
pub fn from_rows(rows: &[[f32; 4]; 4]) -> Mat4 {
    Mat4::from_fn(|r, c| rows[r][c])
}

/// Flatten a matrix row by row into 16 floats
pub fn flatten_row_major(matrix: &Mat4) -> [f32; 16] {
    std::array::from_fn(|i| matrix[(i / 4, i % 4)])
}

/// Serde adapter writing a `Mat4` as four rows of four floats
pub mod row_major {
    use super::{from_rows, to_rows, Mat4};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(matrix: &Mat4, serializer: S) -> Result<S::Ok, S::Error> {
        to_rows(matrix).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Mat4, D::Error> {
        let rows = <[[f32; 4]; 4]>::deserialize(deserializer)?;
        Ok(from_rows(&rows))
    }
}
