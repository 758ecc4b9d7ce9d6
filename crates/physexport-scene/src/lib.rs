//! physexport-scene
//!
//! The read-only scene model consumed by the physics export pipeline.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`SceneNode`] | Named node with world and parent-relative transforms |
//! | [`RigidBody`] | Mass, friction, collision shape and collections |
//! | [`RigidBodyConstraint`] | Constraint between up to two nodes, full setting superset |
//! | [`ArmaturePose`] | Pose bones and their constraints |
//! | [`SceneGraph`] | Traversal and lookup interface implemented by hosts |
//!
//! # Example
//!
//! ```rust,ignore
//! use physexport_scene::{Scene, SceneGraph};
//!
//! let scene = Scene::load("level.scene.json")?;
//! println!("{} nodes", scene.node_count());
//! ```

pub mod armature;
pub mod body;
pub mod constraint;
pub mod error;
pub mod graph;
pub mod node;

pub use armature::{ArmaturePose, PoseBone, PoseConstraint, PoseConstraintKind};
pub use body::{BodyKind, CollisionCollections, CollisionShape, RigidBody, COLLECTION_SLOTS};
pub use constraint::{
    AxisLimit, ConstraintKind, MotorSettings, RigidBodyConstraint, SixAxis, Spring,
};
pub use error::{SceneError, SceneResult};
pub use graph::{Scene, SceneGraph, SceneSummary, DEFAULT_GRAVITY};
pub use node::SceneNode;
