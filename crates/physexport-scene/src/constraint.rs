//! Rigid body constraint settings as authored in the scene.
//!
//! The authoring model keeps every limit, spring and motor setting on every
//! constraint regardless of its kind; which of them matter is decided at
//! export time.

use serde::{Deserialize, Serialize};

/// Kinematic relationship a constraint enforces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintKind {
    #[default]
    Fixed,
    Point,
    Hinge,
    Slider,
    Piston,
    Generic,
    GenericSpring,
    Motor,
}

impl ConstraintKind {
    /// All kinds, in declaration order
    pub const ALL: [ConstraintKind; 8] = [
        ConstraintKind::Fixed,
        ConstraintKind::Point,
        ConstraintKind::Hinge,
        ConstraintKind::Slider,
        ConstraintKind::Piston,
        ConstraintKind::Generic,
        ConstraintKind::GenericSpring,
        ConstraintKind::Motor,
    ];

    /// Name as written in exported documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Fixed => "FIXED",
            ConstraintKind::Point => "POINT",
            ConstraintKind::Hinge => "HINGE",
            ConstraintKind::Slider => "SLIDER",
            ConstraintKind::Piston => "PISTON",
            ConstraintKind::Generic => "GENERIC",
            ConstraintKind::GenericSpring => "GENERIC_SPRING",
            ConstraintKind::Motor => "MOTOR",
        }
    }
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Limit on one degree of freedom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisLimit {
    pub enabled: bool,
    pub lower: f32,
    pub upper: f32,
}

impl AxisLimit {
    /// An enabled limit between `lower` and `upper`
    pub fn new(lower: f32, upper: f32) -> Self {
        Self {
            enabled: true,
            lower,
            upper,
        }
    }
}

impl Default for AxisLimit {
    fn default() -> Self {
        Self {
            enabled: false,
            lower: -1.0,
            upper: 1.0,
        }
    }
}

/// Spring on one degree of freedom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spring {
    pub enabled: bool,
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            enabled: false,
            stiffness: 10.0,
            damping: 0.5,
        }
    }
}

/// One value per degree of freedom
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SixAxis<T> {
    pub lin_x: T,
    pub lin_y: T,
    pub lin_z: T,
    pub ang_x: T,
    pub ang_y: T,
    pub ang_z: T,
}

/// Motor drive settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorSettings {
    pub use_angular: bool,
    pub use_linear: bool,
    pub angular_target_velocity: f32,
    pub linear_target_velocity: f32,
    pub angular_max_impulse: f32,
    pub linear_max_impulse: f32,
}

impl Default for MotorSettings {
    fn default() -> Self {
        Self {
            use_angular: false,
            use_linear: false,
            angular_target_velocity: 1.0,
            linear_target_velocity: 1.0,
            angular_max_impulse: 1.0,
            linear_max_impulse: 1.0,
        }
    }
}

/// Constraint linking up to two rigid bodies, attached to its own scene node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidBodyConstraint {
    pub kind: ConstraintKind,
    pub enabled: bool,
    pub disable_collisions: bool,
    pub breaking_threshold: f32,
    pub use_breaking: bool,
    pub use_override_solver_iterations: bool,
    pub solver_iterations: u32,
    /// Name of the first constrained node
    pub object1: Option<String>,
    /// Name of the second constrained node
    pub object2: Option<String>,
    pub limits: SixAxis<AxisLimit>,
    pub springs: SixAxis<Spring>,
    pub motor: MotorSettings,
}

impl Default for RigidBodyConstraint {
    fn default() -> Self {
        Self {
            kind: ConstraintKind::Fixed,
            enabled: true,
            disable_collisions: true,
            breaking_threshold: 10.0,
            use_breaking: false,
            use_override_solver_iterations: false,
            solver_iterations: 10,
            object1: None,
            object2: None,
            limits: SixAxis::default(),
            springs: SixAxis::default(),
            motor: MotorSettings::default(),
        }
    }
}

impl RigidBodyConstraint {
    /// Create a constraint of the given kind with default settings
    pub fn new(kind: ConstraintKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Set the constrained nodes
    pub fn between(mut self, object1: impl Into<String>, object2: impl Into<String>) -> Self {
        self.object1 = Some(object1.into());
        self.object2 = Some(object2.into());
        self
    }
}
