//! Constraint parameter selection.
//!
//! The authored constraint carries every limit, spring and motor setting.
//! [`select_params`] picks the subset that belongs to the constraint's kind and
//! returns it as a [`ConstraintParams`] variant; each variant can only hold
//! the fields its kind exports.

use physexport_scene::{AxisLimit, ConstraintKind, MotorSettings, RigidBodyConstraint, Spring};
use serde::Serialize;

/// Declares a limit group for one axis with its exported key names
macro_rules! axis_limit {
    ($(#[$meta:meta])* $name:ident { $enabled:ident, $lower:ident, $upper:ident }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
        pub struct $name {
            pub $enabled: bool,
            pub $lower: f32,
            pub $upper: f32,
        }

        impl From<AxisLimit> for $name {
            fn from(limit: AxisLimit) -> Self {
                Self {
                    $enabled: limit.enabled,
                    $lower: limit.lower,
                    $upper: limit.upper,
                }
            }
        }
    };
}

/// Declares a spring group for one axis with its exported key names
macro_rules! axis_spring {
    ($(#[$meta:meta])* $name:ident { $enabled:ident, $stiffness:ident, $damping:ident }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
        pub struct $name {
            pub $enabled: bool,
            pub $stiffness: f32,
            pub $damping: f32,
        }

        impl From<Spring> for $name {
            fn from(spring: Spring) -> Self {
                Self {
                    $enabled: spring.enabled,
                    $stiffness: spring.stiffness,
                    $damping: spring.damping,
                }
            }
        }
    };
}

axis_limit!(
    /// Linear X limit
    LinXLimit { use_limit_lin_x, limit_lin_x_lower, limit_lin_x_upper }
);
axis_limit!(LinYLimit { use_limit_lin_y, limit_lin_y_lower, limit_lin_y_upper });
axis_limit!(LinZLimit { use_limit_lin_z, limit_lin_z_lower, limit_lin_z_upper });
axis_limit!(
    /// Angular X limit
    AngXLimit { use_limit_ang_x, limit_ang_x_lower, limit_ang_x_upper }
);
axis_limit!(AngYLimit { use_limit_ang_y, limit_ang_y_lower, limit_ang_y_upper });
axis_limit!(
    /// Angular Z limit, the hinge axis
    AngZLimit { use_limit_ang_z, limit_ang_z_lower, limit_ang_z_upper }
);

axis_spring!(SpringX { use_spring_x, spring_stiffness_x, spring_damping_x });
axis_spring!(SpringY { use_spring_y, spring_stiffness_y, spring_damping_y });
axis_spring!(SpringZ { use_spring_z, spring_stiffness_z, spring_damping_z });
axis_spring!(SpringAngX { use_spring_ang_x, spring_stiffness_ang_x, spring_damping_ang_x });
axis_spring!(SpringAngY { use_spring_ang_y, spring_stiffness_ang_y, spring_damping_ang_y });
axis_spring!(SpringAngZ { use_spring_ang_z, spring_stiffness_ang_z, spring_damping_ang_z });

/// Hinge limit plus motor drive
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotorParams {
    #[serde(flatten)]
    pub limit: AngZLimit,
    pub motor_ang_max_impulse: f32,
    pub motor_lin_max_impulse: f32,
    pub motor_ang_target_velocity: f32,
    pub motor_lin_target_velocity: f32,
    pub use_motor_ang: bool,
    pub use_motor_lin: bool,
}

impl MotorParams {
    fn new(limit: AxisLimit, motor: &MotorSettings) -> Self {
        Self {
            limit: limit.into(),
            motor_ang_max_impulse: motor.angular_max_impulse,
            motor_lin_max_impulse: motor.linear_max_impulse,
            motor_ang_target_velocity: motor.angular_target_velocity,
            motor_lin_target_velocity: motor.linear_target_velocity,
            use_motor_ang: motor.use_angular,
            use_motor_lin: motor.use_linear,
        }
    }
}

/// Slider limit plus rotation about the slide axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PistonParams {
    #[serde(flatten)]
    pub lin_x: LinXLimit,
    #[serde(flatten)]
    pub ang_x: AngXLimit,
}

/// Limits on all six degrees of freedom
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenericParams {
    #[serde(flatten)]
    pub lin_x: LinXLimit,
    #[serde(flatten)]
    pub lin_y: LinYLimit,
    #[serde(flatten)]
    pub lin_z: LinZLimit,
    #[serde(flatten)]
    pub ang_x: AngXLimit,
    #[serde(flatten)]
    pub ang_y: AngYLimit,
    #[serde(flatten)]
    pub ang_z: AngZLimit,
}

/// Six-axis limits plus six-axis springs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenericSpringParams {
    #[serde(flatten)]
    pub limits: GenericParams,
    #[serde(flatten)]
    pub x: SpringX,
    #[serde(flatten)]
    pub y: SpringY,
    #[serde(flatten)]
    pub z: SpringZ,
    #[serde(flatten)]
    pub ang_x: SpringAngX,
    #[serde(flatten)]
    pub ang_y: SpringAngY,
    #[serde(flatten)]
    pub ang_z: SpringAngZ,
}

/// Kind-specific constraint parameters, tagged with the kind name under `type`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintParams {
    Fixed,
    Point,
    Hinge(AngZLimit),
    Slider(LinXLimit),
    Piston(PistonParams),
    Generic(GenericParams),
    GenericSpring(GenericSpringParams),
    Motor(MotorParams),
}

impl ConstraintParams {
    /// Kind these parameters belong to
    pub fn kind(&self) -> ConstraintKind {
        match self {
            ConstraintParams::Fixed => ConstraintKind::Fixed,
            ConstraintParams::Point => ConstraintKind::Point,
            ConstraintParams::Hinge(_) => ConstraintKind::Hinge,
            ConstraintParams::Slider(_) => ConstraintKind::Slider,
            ConstraintParams::Piston(_) => ConstraintKind::Piston,
            ConstraintParams::Generic(_) => ConstraintKind::Generic,
            ConstraintParams::GenericSpring(_) => ConstraintKind::GenericSpring,
            ConstraintParams::Motor(_) => ConstraintKind::Motor,
        }
    }
}

fn generic_params(constraint: &RigidBodyConstraint) -> GenericParams {
    let limits = &constraint.limits;
    GenericParams {
        lin_x: limits.lin_x.into(),
        lin_y: limits.lin_y.into(),
        lin_z: limits.lin_z.into(),
        ang_x: limits.ang_x.into(),
        ang_y: limits.ang_y.into(),
        ang_z: limits.ang_z.into(),
    }
}

/// Select the parameters exported for `constraint`'s kind
pub fn select_params(constraint: &RigidBodyConstraint) -> ConstraintParams {
    let limits = &constraint.limits;

    match constraint.kind {
        ConstraintKind::Fixed => ConstraintParams::Fixed,
        ConstraintKind::Point => ConstraintParams::Point,
        ConstraintKind::Hinge => ConstraintParams::Hinge(limits.ang_z.into()),
        ConstraintKind::Motor => {
            ConstraintParams::Motor(MotorParams::new(limits.ang_z, &constraint.motor))
        }
        ConstraintKind::Slider => ConstraintParams::Slider(limits.lin_x.into()),
        ConstraintKind::Piston => ConstraintParams::Piston(PistonParams {
            lin_x: limits.lin_x.into(),
            ang_x: limits.ang_x.into(),
        }),
        ConstraintKind::Generic => ConstraintParams::Generic(generic_params(constraint)),
        ConstraintKind::GenericSpring => {
            let springs = &constraint.springs;
            ConstraintParams::GenericSpring(GenericSpringParams {
                limits: generic_params(constraint),
                x: springs.lin_x.into(),
                y: springs.lin_y.into(),
                z: springs.lin_z.into(),
                ang_x: springs.ang_x.into(),
                ang_y: springs.ang_y.into(),
                ang_z: springs.ang_z.into(),
            })
        }
    }
}
