//! Exported physics document records
//!
//! Field names match the keys existing engine loaders read.
//! Optional groups are flattened into their parent record and disappear
//! entirely when absent, so a record never carries `null` placeholders.

use physexport_scene::CollisionShape;
use serde::Serialize;

use crate::constraint::ConstraintParams;

/// `parent` value written for bodies at the scene root
pub const ROOT_PARENT: &str = "__root__";

/// The complete physics document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub gravity: [f32; 3],
    /// Spelling is part of the loader contract
    pub rigid_bodys: Vec<RigidBodyRecord>,
    pub constraints: Vec<ConstraintRecord>,
    pub bone_constraints: Vec<BoneConstraintRecord>,
}

/// Parent name and parent-relative pose of a body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParentPose {
    pub parent: String,
    pub local_location: [f32; 3],
    pub local_quaternion: [f32; 4],
}

/// One rigid body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RigidBodyRecord {
    pub name: String,
    pub location: [f32; 3],
    pub quaternion: [f32; 4],
    #[serde(rename = "static")]
    pub is_static: bool,
    pub enabled: bool,
    pub kinematic: bool,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    pub collision_shape: CollisionShape,
    /// One 0/1 entry per collection slot
    pub collision_collections: Vec<u8>,
    pub use_margin: bool,
    pub collision_margin: f32,
    pub angular_damping: f32,
    pub linear_damping: f32,
    pub deactivate_angular_velocity: f32,
    pub deactivate_linear_velocity: f32,
    pub use_deactivation: bool,
    pub use_start_deactivated: bool,
    pub group: u32,
    pub mask: u32,
    #[serde(flatten)]
    pub parent_pose: Option<ParentPose>,
}

/// First constrained body and the constraint frame relative to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorA {
    pub object1: String,
    pub translation_offset_a: [f32; 3],
    pub rotation_offset_a: [f32; 4],
}

/// Second constrained body and the constraint frame relative to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorB {
    pub object2: String,
    pub translation_offset_b: [f32; 3],
    pub rotation_offset_b: [f32; 4],
}

/// One rigid body constraint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintRecord {
    pub enabled: bool,
    pub disable_collisions: bool,
    pub breaking_threshold: f32,
    pub use_breaking: bool,
    pub use_override_solver_iterations: bool,
    pub solver_iterations: u32,
    #[serde(flatten)]
    pub anchor_a: Option<AnchorA>,
    #[serde(flatten)]
    pub anchor_b: Option<AnchorB>,
    /// Kind tag and kind-specific settings
    #[serde(flatten)]
    pub params: ConstraintParams,
}

/// A pose bone attached to an object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoneConstraintRecord {
    pub bone: String,
    pub parent: String,
    /// Row-major
    pub inverse_matrix: [f32; 16],
    pub influence: f32,
}
