//! Export configuration

use physexport_core::QuaternionOrder;
use physexport_scene::{BodyKind, RigidBody};

/// Rule deciding a rigid body's `static` flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StaticPolicy {
    /// Only passive bodies are static
    PassiveOnly,
    /// Passive bodies and disabled bodies are static
    #[default]
    PassiveOrDisabled,
}

impl StaticPolicy {
    /// Apply the policy to a body
    pub fn is_static(&self, body: &RigidBody) -> bool {
        let passive = body.kind == BodyKind::Passive;
        match self {
            StaticPolicy::PassiveOnly => passive,
            StaticPolicy::PassiveOrDisabled => passive || !body.enabled,
        }
    }
}

/// Shape of the rigid body records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// World pose only
    Legacy,
    /// World pose plus parent name and parent-relative pose
    #[default]
    Extended,
}

/// Body field written as `linear_damping`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinearDampingSource {
    /// The collision margin, as existing engine loaders expect
    #[default]
    CollisionMargin,
    /// The body's actual linear damping
    LinearDamping,
}

impl LinearDampingSource {
    /// Pick the value to export for `body`
    pub fn value(&self, body: &RigidBody) -> f32 {
        match self {
            LinearDampingSource::CollisionMargin => body.collision_margin,
            LinearDampingSource::LinearDamping => body.linear_damping,
        }
    }
}

/// Options for one export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub static_policy: StaticPolicy,
    pub layout: Layout,
    pub quaternion_order: QuaternionOrder,
    pub linear_damping_source: LinearDampingSource,
    /// Build per-node records on the rayon thread pool
    pub parallel: bool,
}

impl ExportOptions {
    /// Output matching the original exporter: passive-only statics, world poses
    pub fn legacy() -> Self {
        Self {
            static_policy: StaticPolicy::PassiveOnly,
            layout: Layout::Legacy,
            quaternion_order: QuaternionOrder::Wxyz,
            linear_damping_source: LinearDampingSource::CollisionMargin,
            parallel: false,
        }
    }

    /// Disabled bodies count as static and records carry their parent pose
    pub fn extended() -> Self {
        Self {
            static_policy: StaticPolicy::PassiveOrDisabled,
            layout: Layout::Extended,
            ..Self::legacy()
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_quaternion_order(mut self, order: QuaternionOrder) -> Self {
        self.quaternion_order = order;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::extended()
    }
}
