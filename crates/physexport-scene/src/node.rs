//! Scene node structures

use physexport_core::{row_major, Mat4};
use serde::{Deserialize, Serialize};

use crate::armature::ArmaturePose;
use crate::body::RigidBody;
use crate::constraint::RigidBodyConstraint;

/// A node of the host scene with the physics data attached to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Node name, unique within the scene
    pub name: String,
    /// Transform relative to the scene root
    #[serde(with = "row_major", default = "Mat4::identity")]
    pub world_transform: Mat4,
    /// Transform relative to the parent (equal to the world transform for roots)
    #[serde(with = "row_major", default = "Mat4::identity")]
    pub local_transform: Mat4,
    /// Parent node name (None for root nodes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rigid_body: Option<RigidBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rigid_body_constraint: Option<RigidBodyConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armature_pose: Option<ArmaturePose>,
}

impl SceneNode {
    /// Create a root node at the origin with no physics data
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            world_transform: Mat4::identity(),
            local_transform: Mat4::identity(),
            parent: None,
            rigid_body: None,
            rigid_body_constraint: None,
            armature_pose: None,
        }
    }

    /// Set both transforms of a root node
    pub fn with_transform(mut self, world: Mat4) -> Self {
        self.world_transform = world;
        self.local_transform = world;
        self
    }

    /// Parent this node, with its world and parent-relative transforms
    pub fn with_parent(mut self, parent: impl Into<String>, world: Mat4, local: Mat4) -> Self {
        self.parent = Some(parent.into());
        self.world_transform = world;
        self.local_transform = local;
        self
    }

    /// Attach a rigid body
    pub fn with_rigid_body(mut self, body: RigidBody) -> Self {
        self.rigid_body = Some(body);
        self
    }

    /// Attach a rigid body constraint
    pub fn with_constraint(mut self, constraint: RigidBodyConstraint) -> Self {
        self.rigid_body_constraint = Some(constraint);
        self
    }

    /// Attach armature pose data
    pub fn with_armature(mut self, pose: ArmaturePose) -> Self {
        self.armature_pose = Some(pose);
        self
    }

    /// Check if this is a root node
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
