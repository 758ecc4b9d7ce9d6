//! Transform resolution: matrix decomposition and relative offsets.
//!
//! Rotations leave this module as unit quaternions in canonical form (see
//! [`canonical_rotation`]). Scale is recovered as the length of each basis
//! column and negated as a whole when the basis is mirrored. A sheared basis
//! has no exact rotation; the nearest proper rotation is used and the shear
//! is dropped.
//!
//! Offsets ignore scale entirely. Constrained bodies with non-uniform scale
//! get offsets in unscaled space; the physics loader has no notion of scaled
//! joint frames.

use nalgebra::{Isometry3, Matrix3, Rotation3, Translation3};
use physexport_core::{canonical_rotation, compose_matrix, Error, Mat4, Pose, Quat, Result, Vec3};
use physexport_scene::SceneNode;

/// Basis columns shorter than this are treated as collapsed
const MIN_AXIS_LENGTH: f32 = 1e-8;

/// Normalized bases with a smaller determinant are treated as singular
const MIN_NORMALIZED_DETERMINANT: f32 = 1e-6;

/// Convergence threshold and iteration cap when snapping a basis to a rotation
const ORTHONORMALIZE_EPSILON: f32 = 1e-7;
const ORTHONORMALIZE_MAX_ITER: usize = 64;

const AXIS_NAMES: [&str; 3] = ["X", "Y", "Z"];

/// An affine transform split into its parts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposed {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Decomposed {
    /// Translation and rotation, scale dropped
    pub fn pose(&self) -> Pose {
        Pose::new(self.translation, self.rotation)
    }

    /// Recompose into a matrix
    pub fn to_matrix(&self) -> Mat4 {
        compose_matrix(&self.translation, &self.rotation, &self.scale)
    }
}

/// Split an affine matrix into translation, rotation and scale.
///
/// Fails on non-finite entries and on bases with a collapsed or degenerate
/// axis, where no rotation can be recovered.
pub fn decompose(matrix: &Mat4) -> Result<Decomposed> {
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(Error::malformed_transform("non-finite matrix component"));
    }

    let translation = Vec3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
    let basis: Matrix3<f32> = matrix.fixed_view::<3, 3>(0, 0).into_owned();

    let mut scale = Vec3::new(
        basis.column(0).norm(),
        basis.column(1).norm(),
        basis.column(2).norm(),
    );
    if let Some(axis) = scale.iter().position(|s| *s < MIN_AXIS_LENGTH) {
        return Err(Error::malformed_transform(format!(
            "zero-length {} axis",
            AXIS_NAMES[axis]
        )));
    }

    let determinant = basis.determinant();
    if (determinant / scale.product()).abs() < MIN_NORMALIZED_DETERMINANT {
        return Err(Error::malformed_transform("basis axes are not independent"));
    }
    if determinant < 0.0 {
        scale = -scale;
    }

    let rotation_matrix = Matrix3::from_columns(&[
        basis.column(0) / scale.x,
        basis.column(1) / scale.y,
        basis.column(2) / scale.z,
    ]);
    let rotation = nearest_rotation(&rotation_matrix);

    Ok(Decomposed {
        translation,
        rotation: canonical_rotation(rotation),
        scale,
    })
}

/// Closest proper rotation to a basis with unit-length columns, seeded with
/// the normalized direct quaternion of the basis
fn nearest_rotation(basis: &Matrix3<f32>) -> Quat {
    let seed = Quat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(*basis));
    let seed = Quat::new_normalize(seed.into_inner());
    let rotation = Rotation3::from_matrix_eps(
        basis,
        ORTHONORMALIZE_EPSILON,
        ORTHONORMALIZE_MAX_ITER,
        seed.to_rotation_matrix(),
    );
    Quat::new_normalize(Quat::from_rotation_matrix(&rotation).into_inner())
}

/// Pose of `b` expressed in the rotational frame of `a`, both given as world
/// transforms.
///
/// Equivalent to decomposing `R(a)^-1 * T(a)^-1 * T(b) * R(b)`; neither
/// transform's scale takes part.
pub fn offset_a_to_b(a: &Mat4, b: &Mat4) -> Result<Pose> {
    let a = decompose(a)?;
    let b = decompose(b)?;

    let a_frame = Isometry3::from_parts(Translation3::from(a.translation), a.rotation);
    let b_frame = Isometry3::from_parts(Translation3::from(b.translation), b.rotation);
    let offset = a_frame.inverse() * b_frame;

    Ok(Pose::new(
        offset.translation.vector,
        canonical_rotation(offset.rotation),
    ))
}

/// World pose of a node
pub fn world_pose(node: &SceneNode) -> Result<Pose> {
    decompose(&node.world_transform).map(|d| d.pose())
}

/// Parent-relative pose of a node
pub fn local_pose(node: &SceneNode) -> Result<Pose> {
    decompose(&node.local_transform).map(|d| d.pose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn same_rotation(a: &Quat, b: &Quat) -> bool {
        let (a, b) = (a.coords, b.coords);
        (a - b).norm().min((a + b).norm()) < 1e-4
    }

    /// Non-uniform parent scale applied after a child rotation
    fn sheared() -> Mat4 {
        Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 1.0, 1.0))
            * Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_4).to_homogeneous()
    }

    #[test]
    fn test_decompose_identity() {
        let d = decompose(&Mat4::identity()).unwrap();
        assert_eq!(d.translation, Vec3::zeros());
        assert_eq!(d.scale, Vec3::new(1.0, 1.0, 1.0));
        assert!(same_rotation(&d.rotation, &Quat::identity()));
    }

    #[test]
    fn test_decompose_trs() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2);
        let m = compose_matrix(&Vec3::new(1.0, 2.0, 3.0), &rotation, &Vec3::new(2.0, 3.0, 4.0));
        let d = decompose(&m).unwrap();

        assert_relative_eq!(d.translation, Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-5);
        assert_relative_eq!(d.scale, Vec3::new(2.0, 3.0, 4.0), epsilon = 1e-5);
        assert!(same_rotation(&d.rotation, &rotation));
    }

    #[test]
    fn test_canonical_sign() {
        // 270 degrees about X has w < 0 in axis-angle form
        let rotation = Quat::from_axis_angle(&Vec3::x_axis(), 3.0 * FRAC_PI_2);
        let d = decompose(&rotation.to_homogeneous()).unwrap();
        assert!(d.rotation.w >= 0.0);
        assert!(same_rotation(&d.rotation, &rotation));
    }

    #[test]
    fn test_sheared_basis_gives_unit_rotation() {
        let d = decompose(&sheared()).unwrap();
        assert_relative_eq!(d.rotation.quaternion().norm(), 1.0, epsilon = 1e-5);
        assert!(d.rotation.w >= 0.0);

        // Somewhere between the child's 45 degrees and the stretched X axis
        let angle = d.rotation.angle();
        assert!(angle > 0.0 && angle < FRAC_PI_2, "angle {angle}");
        assert!(d.rotation.axis().is_some_and(|axis| axis.z > 0.99));
    }

    #[test]
    fn test_half_turn_decomposes() {
        let rotation = Quat::from_axis_angle(&Vec3::x_axis(), PI);
        let d = decompose(&rotation.to_homogeneous()).unwrap();
        assert!(same_rotation(&d.rotation, &rotation));
        assert_relative_eq!(d.rotation.quaternion().norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_mirrored_basis_reconstructs() {
        let m = compose_matrix(&Vec3::new(0.5, 0.0, 0.0), &Quat::identity(), &Vec3::new(-1.0, 1.0, 1.0));
        let d = decompose(&m).unwrap();
        assert!(d.scale.iter().all(|s| *s < 0.0));
        assert_relative_eq!(d.to_matrix(), m, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_scale_rejected() {
        let m = compose_matrix(&Vec3::zeros(), &Quat::identity(), &Vec3::new(1.0, 0.0, 1.0));
        let err = decompose(&m).unwrap_err();
        assert!(matches!(err, Error::MalformedTransform { .. }));
        assert!(err.to_string().contains("Y"));
    }

    #[test]
    fn test_dependent_axes_rejected() {
        let mut m = Mat4::identity();
        m[(0, 1)] = 1.0;
        m[(1, 1)] = 0.0;
        assert!(decompose(&m).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut m = Mat4::identity();
        m[(2, 3)] = f32::NAN;
        assert!(decompose(&m).is_err());
    }

    #[test]
    fn test_offset_to_self_is_identity() {
        let rotation = Quat::from_euler_angles(0.3, -1.2, 2.0);
        let m = compose_matrix(&Vec3::new(4.0, -2.0, 7.0), &rotation, &Vec3::new(1.0, 2.0, 0.5));
        let offset = offset_a_to_b(&m, &m).unwrap();

        assert_relative_eq!(offset.translation, Vec3::zeros(), epsilon = 1e-4);
        assert!(same_rotation(&offset.rotation, &Quat::identity()));
        assert!(offset.rotation.w >= 0.0);
    }

    #[test]
    fn test_offset_to_self_is_identity_when_sheared() {
        let offset = offset_a_to_b(&sheared(), &sheared()).unwrap();
        assert_relative_eq!(offset.translation, Vec3::zeros(), epsilon = 1e-5);
        assert_relative_eq!(offset.rotation.quaternion().norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(offset.rotation.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_offset_in_rotated_frame() {
        // A sits at x=1 turned 90 degrees about Z; B is one unit along world +Y from A
        let a = compose_matrix(
            &Vec3::new(1.0, 0.0, 0.0),
            &Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2),
            &Vec3::new(1.0, 1.0, 1.0),
        );
        let b = Mat4::new_translation(&Vec3::new(1.0, 1.0, 0.0));
        let offset = offset_a_to_b(&a, &b).unwrap();

        // World +Y is A's local +X
        assert_relative_eq!(offset.translation, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
        assert!(same_rotation(
            &offset.rotation,
            &Quat::from_axis_angle(&Vec3::z_axis(), -FRAC_PI_2)
        ));
    }

    #[test]
    fn test_offset_ignores_scale() {
        let scaled = compose_matrix(&Vec3::zeros(), &Quat::identity(), &Vec3::new(3.0, 3.0, 3.0));
        let b = Mat4::new_translation(&Vec3::new(0.0, 0.0, 6.0));
        let offset = offset_a_to_b(&scaled, &b).unwrap();
        assert_relative_eq!(offset.translation, Vec3::new(0.0, 0.0, 6.0), epsilon = 1e-5);
    }

    #[test]
    fn test_offset_is_not_symmetric() {
        let a = compose_matrix(
            &Vec3::new(1.0, 0.0, 0.0),
            &Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2),
            &Vec3::new(1.0, 1.0, 1.0),
        );
        let b = Mat4::new_translation(&Vec3::new(0.0, 2.0, 0.0));
        let ab = offset_a_to_b(&a, &b).unwrap();
        let ba = offset_a_to_b(&b, &a).unwrap();
        assert!((ab.translation + ba.translation).norm() > 1e-3);
    }

    #[test]
    fn test_offset_singular_input() {
        let collapsed = compose_matrix(&Vec3::zeros(), &Quat::identity(), &Vec3::new(0.0, 1.0, 1.0));
        assert!(offset_a_to_b(&collapsed, &Mat4::identity()).is_err());
        assert!(offset_a_to_b(&Mat4::identity(), &collapsed).is_err());
    }

    proptest! {
        #[test]
        fn test_decompose_round_trip(
            tx in -100.0f32..100.0, ty in -100.0f32..100.0, tz in -100.0f32..100.0,
            roll in -3.1f32..3.1, pitch in -1.5f32..1.5, yaw in -3.1f32..3.1,
            sx in 0.1f32..10.0, sy in 0.1f32..10.0, sz in 0.1f32..10.0,
        ) {
            let translation = Vec3::new(tx, ty, tz);
            let rotation = Quat::from_euler_angles(roll, pitch, yaw);
            let scale = Vec3::new(sx, sy, sz);
            let m = compose_matrix(&translation, &rotation, &scale);

            let d = decompose(&m).unwrap();
            prop_assert!((d.translation - translation).norm() < 1e-3);
            prop_assert!((d.scale - scale).norm() < 1e-3);
            prop_assert!(same_rotation(&d.rotation, &rotation));
            prop_assert!(d.rotation.w >= -1e-6);
            prop_assert!((d.rotation.quaternion().norm() - 1.0).abs() < 1e-5);
        }

        #[test]
        fn test_sheared_self_offset_is_identity(
            sx in 0.2f32..5.0, sy in 0.2f32..5.0, sz in 0.2f32..5.0,
            roll in -3.1f32..3.1, pitch in -1.5f32..1.5, yaw in -3.1f32..3.1,
        ) {
            let m = Mat4::new_nonuniform_scaling(&Vec3::new(sx, sy, sz))
                * Quat::from_euler_angles(roll, pitch, yaw).to_homogeneous();
            let d = decompose(&m).unwrap();
            prop_assert!((d.rotation.quaternion().norm() - 1.0).abs() < 1e-5);

            let offset = offset_a_to_b(&m, &m).unwrap();
            prop_assert!(offset.translation.norm() < 1e-4);
            prop_assert!(same_rotation(&offset.rotation, &Quat::identity()));
        }

        #[test]
        fn test_offset_recomposes(
            ax in -10.0f32..10.0, ay in -10.0f32..10.0, az in -10.0f32..10.0,
            bx in -10.0f32..10.0, by in -10.0f32..10.0, bz in -10.0f32..10.0,
            ra in -3.1f32..3.1, rb in -3.1f32..3.1,
        ) {
            let a = Pose::new(Vec3::new(ax, ay, az), Quat::from_euler_angles(ra, 0.2, -ra));
            let b = Pose::new(Vec3::new(bx, by, bz), Quat::from_euler_angles(0.1, rb, 0.7));
            let offset = offset_a_to_b(&a.to_matrix(), &b.to_matrix()).unwrap();

            // a * offset lands back on b
            let recomposed = a.to_matrix() * offset.to_matrix();
            let d = decompose(&recomposed).unwrap();
            prop_assert!((d.translation - b.translation).norm() < 1e-3);
            prop_assert!(same_rotation(&d.rotation, &b.rotation));
        }
    }
}
