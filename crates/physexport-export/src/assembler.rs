//! Document assembly: one pass over the scene graph
//!
//! Every node is turned into its records independently of every other node.
//! In parallel mode that work runs on the rayon pool; the per-node results
//! are then merged in traversal order, reporting issues as they are merged,
//! so both modes hand the sink the same issues in the same order and produce
//! the same document.

use physexport_core::{flatten_row_major, Pose, ResultExt};
use physexport_scene::{
    ArmaturePose, BodyKind, RigidBody, RigidBodyConstraint, SceneGraph, SceneNode,
};
use rayon::prelude::*;

use crate::constraint::select_params;
use crate::document::{
    AnchorA, AnchorB, BoneConstraintRecord, ConstraintRecord, Document, ParentPose,
    RigidBodyRecord, ROOT_PARENT,
};
use crate::issues::{ErrorSink, ExportIssue, IssueKind};
use crate::mask::encode_mask;
use crate::options::{ExportOptions, Layout, LinearDampingSource};
use crate::transform::{local_pose, offset_a_to_b, world_pose};

/// Records produced by a single node
#[derive(Debug, Default)]
struct NodeRecords {
    rigid_body: Option<RigidBodyRecord>,
    constraint: Option<ConstraintRecord>,
    bone_constraints: Vec<BoneConstraintRecord>,
    issues: Vec<ExportIssue>,
}

impl NodeRecords {
    fn report(&mut self, node: &SceneNode, kind: IssueKind) {
        self.issues.push(ExportIssue::new(node.name.clone(), kind));
    }

    fn malformed(&mut self, node: &SceneNode, err: &physexport_core::Error) {
        self.report(
            node,
            IssueKind::MalformedTransform {
                reason: err.to_string(),
            },
        );
    }
}

/// Builds physics documents from scene graphs
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    options: ExportOptions,
}

impl Assembler {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Build the document for `scene`, reporting authoring issues to `sink`
    pub fn assemble<S>(&self, scene: &S, sink: &mut dyn ErrorSink) -> Document
    where
        S: SceneGraph + Sync + ?Sized,
    {
        let span = tracing::info_span!(
            "assemble",
            nodes = scene.node_count(),
            parallel = self.options.parallel
        );
        let _guard = span.enter();

        let nodes: Vec<&SceneNode> = scene.nodes().collect();
        let per_node: Vec<NodeRecords> = if self.options.parallel {
            nodes
                .par_iter()
                .map(|node| self.node_records(scene, node))
                .collect()
        } else {
            nodes
                .iter()
                .map(|node| self.node_records(scene, node))
                .collect()
        };

        let gravity = scene.gravity();
        let mut document = Document {
            gravity: [gravity.x, gravity.y, gravity.z],
            ..Default::default()
        };

        let mut issue_count = 0;
        for records in per_node {
            document.rigid_bodys.extend(records.rigid_body);
            document.constraints.extend(records.constraint);
            document.bone_constraints.extend(records.bone_constraints);
            for issue in records.issues {
                issue_count += 1;
                sink.report(issue);
            }
        }

        tracing::info!(
            rigid_bodies = document.rigid_bodys.len(),
            constraints = document.constraints.len(),
            bone_constraints = document.bone_constraints.len(),
            issues = issue_count,
            "Assembled physics document"
        );
        document
    }

    fn node_records<S: SceneGraph + ?Sized>(&self, scene: &S, node: &SceneNode) -> NodeRecords {
        let mut records = NodeRecords::default();

        if node.rigid_body.is_some() || node.rigid_body_constraint.is_some() {
            match world_pose(node) {
                Ok(world) => {
                    if let Some(body) = &node.rigid_body {
                        let record = self.rigid_body_record(node, body, &world, &mut records);
                        records.rigid_body = record;
                    }
                    if let Some(constraint) = &node.rigid_body_constraint {
                        let record = self.constraint_record(scene, node, constraint, &mut records);
                        records.constraint = record;
                    }
                }
                Err(err) => records.malformed(node, &err),
            }
        }

        if let Some(pose) = &node.armature_pose {
            let bone_constraints = bone_constraint_records(scene, node, pose, &mut records);
            records.bone_constraints = bone_constraints;
        }

        records
    }

    fn rigid_body_record(
        &self,
        node: &SceneNode,
        body: &RigidBody,
        world: &Pose,
        records: &mut NodeRecords,
    ) -> Option<RigidBodyRecord> {
        let order = self.options.quaternion_order;

        let parent_pose = match self.options.layout {
            Layout::Legacy => None,
            Layout::Extended => match local_pose(node).context("local transform") {
                Ok(local) => Some(ParentPose {
                    parent: node.parent.clone().unwrap_or_else(|| ROOT_PARENT.to_string()),
                    local_location: local.location(),
                    local_quaternion: local.quaternion(order),
                }),
                Err(err) => {
                    records.malformed(node, &err);
                    return None;
                }
            },
        };

        let source = self.options.linear_damping_source;
        if source == LinearDampingSource::CollisionMargin
            && body.collision_margin != body.linear_damping
        {
            tracing::debug!(
                node = %node.name,
                collision_margin = body.collision_margin,
                linear_damping = body.linear_damping,
                "Exporting collision margin as linear damping"
            );
        }

        let flags = body.collision_collections.as_slice();
        let group = encode_mask(flags);

        tracing::debug!(node = %node.name, kind = ?body.kind, group, "Rigid body record");
        Some(RigidBodyRecord {
            name: node.name.clone(),
            location: world.location(),
            quaternion: world.quaternion(order),
            is_static: self.options.static_policy.is_static(body),
            enabled: body.enabled,
            kinematic: body.kind == BodyKind::Kinematic,
            mass: if body.kind == BodyKind::Passive { 0.0 } else { body.mass },
            friction: body.friction,
            restitution: body.restitution,
            collision_shape: body.collision_shape,
            collision_collections: flags.iter().map(|&set| u8::from(set)).collect(),
            use_margin: body.use_margin,
            collision_margin: body.collision_margin,
            angular_damping: body.angular_damping,
            linear_damping: source.value(body),
            deactivate_angular_velocity: body.deactivate_angular_velocity,
            deactivate_linear_velocity: body.deactivate_linear_velocity,
            use_deactivation: body.use_deactivation,
            use_start_deactivated: body.use_start_deactivated,
            group,
            mask: group,
            parent_pose,
        })
    }

    fn constraint_record<S: SceneGraph + ?Sized>(
        &self,
        scene: &S,
        node: &SceneNode,
        constraint: &RigidBodyConstraint,
        records: &mut NodeRecords,
    ) -> Option<ConstraintRecord> {
        let order = self.options.quaternion_order;

        let (side_a, side_b) = match anchors(scene, node, constraint, records) {
            Ok(sides) => sides,
            Err(err) => {
                records.malformed(node, &err);
                return None;
            }
        };

        let params = select_params(constraint);
        tracing::debug!(
            node = %node.name,
            kind = %constraint.kind,
            object1 = ?side_a.as_ref().map(|(name, _)| name),
            object2 = ?side_b.as_ref().map(|(name, _)| name),
            "Constraint record"
        );

        Some(ConstraintRecord {
            enabled: constraint.enabled,
            disable_collisions: constraint.disable_collisions,
            breaking_threshold: constraint.breaking_threshold,
            use_breaking: constraint.use_breaking,
            use_override_solver_iterations: constraint.use_override_solver_iterations,
            solver_iterations: constraint.solver_iterations,
            anchor_a: side_a.map(|(object1, offset)| AnchorA {
                object1,
                translation_offset_a: offset.location(),
                rotation_offset_a: offset.quaternion(order),
            }),
            anchor_b: side_b.map(|(object2, offset)| AnchorB {
                object2,
                translation_offset_b: offset.location(),
                rotation_offset_b: offset.quaternion(order),
            }),
            params,
        })
    }
}

type Anchor = Option<(String, Pose)>;

/// Offsets of the constraint node in the frames of both constrained bodies.
///
/// An unknown body is reported and its side left empty; a body whose
/// transform cannot be decomposed fails the whole record.
fn anchors<S: SceneGraph + ?Sized>(
    scene: &S,
    node: &SceneNode,
    constraint: &RigidBodyConstraint,
    records: &mut NodeRecords,
) -> physexport_core::Result<(Anchor, Anchor)> {
    let mut anchor = |side: &'static str, target: Option<&String>| -> physexport_core::Result<Anchor> {
        let Some(target) = target else {
            return Ok(None);
        };
        let Some(body) = scene.find(target) else {
            records.report(
                node,
                IssueKind::UnresolvedConstraintTarget {
                    side,
                    target: target.clone(),
                },
            );
            return Ok(None);
        };
        let offset = offset_a_to_b(&body.world_transform, &node.world_transform)
            .context(format!("{side} '{target}'"))?;
        Ok(Some((target.clone(), offset)))
    };

    let side_a = anchor("object1", constraint.object1.as_ref())?;
    let side_b = anchor("object2", constraint.object2.as_ref())?;
    Ok((side_a, side_b))
}

fn bone_constraint_records<S: SceneGraph + ?Sized>(
    scene: &S,
    node: &SceneNode,
    pose: &ArmaturePose,
    records: &mut NodeRecords,
) -> Vec<BoneConstraintRecord> {
    let mut out = Vec::new();

    for (bone, constraint) in pose.child_of_constraints() {
        let Some(target) = &constraint.target else {
            records.report(
                node,
                IssueKind::MissingBoneTarget {
                    bone: bone.name.clone(),
                },
            );
            continue;
        };
        if scene.find(target).is_none() {
            records.report(
                node,
                IssueKind::UnresolvedBoneTarget {
                    bone: bone.name.clone(),
                    target: target.clone(),
                },
            );
            continue;
        }

        tracing::debug!(node = %node.name, bone = %bone.name, parent = %target, "Bone constraint record");
        out.push(BoneConstraintRecord {
            bone: bone.name.clone(),
            parent: target.clone(),
            inverse_matrix: flatten_row_major(&constraint.inverse_matrix),
            influence: constraint.influence,
        });
    }

    out
}
