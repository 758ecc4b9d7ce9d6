//! Rigid body settings attached to scene nodes

use physexport_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of collision collection slots offered by the authoring tool
pub const COLLECTION_SLOTS: usize = 20;

/// How a body takes part in the simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyKind {
    /// Moved by the solver
    #[default]
    Dynamic,
    /// Never moves
    Passive,
    /// Moved by animation, pushes dynamic bodies
    Kinematic,
}

/// Collision shape used by the physics engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollisionShape {
    Box,
    Sphere,
    Capsule,
    Cylinder,
    Cone,
    #[default]
    ConvexHull,
    Mesh,
    Compound,
}

/// Membership of a body in the fixed set of collision collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<bool>", into = "Vec<bool>")]
pub struct CollisionCollections([bool; COLLECTION_SLOTS]);

impl CollisionCollections {
    /// Collections from a list of slot indices
    pub fn from_indices(indices: &[usize]) -> Result<Self> {
        let mut slots = [false; COLLECTION_SLOTS];
        for &index in indices {
            let slot = slots.get_mut(index).ok_or_else(|| Error::OutOfRange {
                field: "collision_collections".to_string(),
                value: index as f64,
                expected: format!("slot index below {COLLECTION_SLOTS}"),
            })?;
            *slot = true;
        }
        Ok(Self(slots))
    }

    /// Flags in slot order
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Whether the body belongs to the given slot
    pub fn contains(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }
}

impl Default for CollisionCollections {
    fn default() -> Self {
        let mut slots = [false; COLLECTION_SLOTS];
        slots[0] = true;
        Self(slots)
    }
}

impl TryFrom<Vec<bool>> for CollisionCollections {
    type Error = Error;

    fn try_from(flags: Vec<bool>) -> Result<Self> {
        if flags.len() > COLLECTION_SLOTS {
            return Err(Error::OutOfRange {
                field: "collision_collections".to_string(),
                value: flags.len() as f64,
                expected: format!("at most {COLLECTION_SLOTS} slots"),
            });
        }
        let mut slots = [false; COLLECTION_SLOTS];
        slots[..flags.len()].copy_from_slice(&flags);
        Ok(Self(slots))
    }
}

impl From<CollisionCollections> for Vec<bool> {
    fn from(collections: CollisionCollections) -> Self {
        collections.0.to_vec()
    }
}

/// Rigid body settings of a scene node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidBody {
    pub kind: BodyKind,
    pub enabled: bool,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    pub collision_shape: CollisionShape,
    pub collision_collections: CollisionCollections,
    pub use_margin: bool,
    pub collision_margin: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub use_deactivation: bool,
    pub use_start_deactivated: bool,
    pub deactivate_linear_velocity: f32,
    pub deactivate_angular_velocity: f32,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            kind: BodyKind::Dynamic,
            enabled: true,
            mass: 1.0,
            friction: 0.5,
            restitution: 0.0,
            collision_shape: CollisionShape::ConvexHull,
            collision_collections: CollisionCollections::default(),
            use_margin: false,
            collision_margin: 0.04,
            linear_damping: 0.04,
            angular_damping: 0.1,
            use_deactivation: false,
            use_start_deactivated: false,
            deactivate_linear_velocity: 0.4,
            deactivate_angular_velocity: 0.5,
        }
    }
}

impl RigidBody {
    /// Create a body of the given kind with default settings
    pub fn new(kind: BodyKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Set the mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set the collision collections
    pub fn with_collections(mut self, collections: CollisionCollections) -> Self {
        self.collision_collections = collections;
        self
    }

    /// Check the numeric settings are usable
    pub fn validate(&self) -> Result<()> {
        if !self.mass.is_finite() || self.mass < 0.0 {
            return Err(Error::OutOfRange {
                field: "mass".to_string(),
                value: f64::from(self.mass),
                expected: "a finite value >= 0".to_string(),
            });
        }
        if !self.collision_margin.is_finite() || self.collision_margin < 0.0 {
            return Err(Error::OutOfRange {
                field: "collision_margin".to_string(),
                value: f64::from(self.collision_margin),
                expected: "a finite value >= 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_collections_use_first_slot() {
        let collections = CollisionCollections::default();
        assert!(collections.contains(0));
        assert_eq!(collections.as_slice().iter().filter(|f| **f).count(), 1);
    }

    #[test]
    fn test_collections_from_indices() {
        let collections = CollisionCollections::from_indices(&[2, 5]).unwrap();
        assert!(collections.contains(2));
        assert!(collections.contains(5));
        assert!(!collections.contains(0));

        assert!(CollisionCollections::from_indices(&[COLLECTION_SLOTS]).is_err());
    }

    #[test]
    fn test_collections_deserialize_short_vector() {
        let collections: CollisionCollections =
            serde_json::from_str("[false, false, true]").unwrap();
        assert!(collections.contains(2));
        assert_eq!(collections.as_slice().len(), COLLECTION_SLOTS);
    }

    #[test]
    fn test_collections_reject_wide_vector() {
        let json = serde_json::to_string(&vec![false; COLLECTION_SLOTS + 1]).unwrap();
        assert!(serde_json::from_str::<CollisionCollections>(&json).is_err());
    }

    #[test]
    fn test_body_kind_names() {
        assert_eq!(serde_json::to_string(&BodyKind::Passive).unwrap(), "\"PASSIVE\"");
        assert_eq!(
            serde_json::to_string(&CollisionShape::ConvexHull).unwrap(),
            "\"CONVEX_HULL\""
        );
    }

    #[test]
    fn test_validate_rejects_negative_mass() {
        assert!(RigidBody::default().validate().is_ok());
        assert!(RigidBody::default().with_mass(-1.0).validate().is_err());
    }
}
