//! Armature pose data: bones and the constraints attached to them

use physexport_core::{row_major, Error, Mat4, Result};
use serde::{Deserialize, Serialize};

/// Kind of a pose-bone constraint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoseConstraintKind {
    /// Bone follows an external object
    #[default]
    ChildOf,
    CopyLocation,
    CopyRotation,
    CopyTransforms,
    /// Any other constraint type; ignored by the exporter
    #[serde(other)]
    Other,
}

/// A constraint on a pose bone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConstraint {
    pub name: String,
    pub kind: PoseConstraintKind,
    /// Name of the scene node the bone is attached to
    pub target: Option<String>,
    /// Bone or vertex group within the target
    pub subtarget: Option<String>,
    #[serde(with = "row_major")]
    pub inverse_matrix: Mat4,
    pub influence: f32,
}

impl Default for PoseConstraint {
    fn default() -> Self {
        Self {
            name: "Child Of".to_string(),
            kind: PoseConstraintKind::ChildOf,
            target: None,
            subtarget: None,
            inverse_matrix: Mat4::identity(),
            influence: 1.0,
        }
    }
}

impl PoseConstraint {
    /// A child-of constraint targeting `target`
    pub fn child_of(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Default::default()
        }
    }

    /// Check influence lies in `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.influence) {
            return Err(Error::OutOfRange {
                field: format!("influence of {}", self.name),
                value: f64::from(self.influence),
                expected: "a value in [0, 1]".to_string(),
            });
        }
        Ok(())
    }
}

/// A bone of an armature's pose
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseBone {
    pub name: String,
    pub constraints: Vec<PoseConstraint>,
}

impl PoseBone {
    /// Create a bone with no constraints
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
        }
    }

    /// Add a constraint
    pub fn with_constraint(mut self, constraint: PoseConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Ordered pose bones of an armature node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmaturePose {
    pub bones: Vec<PoseBone>,
}

impl ArmaturePose {
    /// Create a pose from its bones
    pub fn new(bones: Vec<PoseBone>) -> Self {
        Self { bones }
    }

    /// Every child-of constraint, with the bone that owns it, in bone order
    pub fn child_of_constraints(&self) -> impl Iterator<Item = (&PoseBone, &PoseConstraint)> {
        self.bones.iter().flat_map(|bone| {
            bone.constraints
                .iter()
                .filter(|c| c.kind == PoseConstraintKind::ChildOf)
                .map(move |c| (bone, c))
        })
    }

    /// Validate every constraint of every bone
    pub fn validate(&self) -> Result<()> {
        self.bones
            .iter()
            .flat_map(|bone| bone.constraints.iter())
            .try_for_each(PoseConstraint::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_of_filter() {
        let pose = ArmaturePose::new(vec![
            PoseBone::new("hand.L")
                .with_constraint(PoseConstraint::child_of("Sword"))
                .with_constraint(PoseConstraint {
                    kind: PoseConstraintKind::CopyRotation,
                    ..Default::default()
                }),
            PoseBone::new("hand.R").with_constraint(PoseConstraint::child_of("Shield")),
        ]);

        let found: Vec<_> = pose
            .child_of_constraints()
            .map(|(bone, c)| (bone.name.as_str(), c.target.as_deref()))
            .collect();
        assert_eq!(found, vec![("hand.L", Some("Sword")), ("hand.R", Some("Shield"))]);
    }

    #[test]
    fn test_unknown_kind_deserializes_as_other() {
        let constraint: PoseConstraint =
            serde_json::from_str(r#"{ "name": "IK", "kind": "IK" }"#).unwrap();
        assert_eq!(constraint.kind, PoseConstraintKind::Other);
    }

    #[test]
    fn test_influence_range() {
        let mut constraint = PoseConstraint::child_of("Sword");
        assert!(constraint.validate().is_ok());
        constraint.influence = 1.5;
        assert!(constraint.validate().is_err());
    }
}
