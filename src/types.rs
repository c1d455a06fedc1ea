use bevy::prelude::*;

use crate::constants::*;

/// Category label for a selectable unit, fixed at spawn time.
#[derive(Component, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum UnitKind {
    Soldier,
    Tank,
}

/// A player-controllable unit. The `selected` flag is mutated only through
/// `SelectionModel` so it always agrees with selection-set membership.
#[derive(Component, Default)]
pub struct Unit {
    pub selected: bool,
}

/// Navigation handle: writing `destination` is the "set destination" call,
/// path following itself is opaque to the gameplay core.
#[derive(Component, Default)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
}

/// Kinematic body proxy. Position lives on the entity's `Transform`;
/// this mirrors the last commanded linear velocity.
#[derive(Component, Default)]
pub struct KinematicBody {
    pub velocity: Vec3,
}

/// Pathfinding-obstacle proxy. While `carving` is set the entity is treated
/// as static blocking geometry by path planning.
#[derive(Component, Default)]
pub struct NavObstacle {
    pub carving: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PursuitState {
    #[default]
    Idle,
    Approaching,
    Engaging,
}

/// Pursuit AI state, recomputed every fixed tick. `current_target` is never
/// trusted across ticks.
#[derive(Component, Default)]
pub struct Pursuer {
    pub state: PursuitState,
    pub current_target: Option<Entity>,
}

/// Static per-agent pursuit tuning, immutable after spawn.
#[derive(Component, Clone, Copy, Debug)]
pub struct PursuitConfig {
    pub detection_radius: f32,
    pub attack_range: f32,
    pub move_speed: f32,
    pub rotation_speed: f32,
    pub stopping_distance: f32,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            detection_radius: KAIJU_DETECTION_RADIUS,
            attack_range: KAIJU_ATTACK_RANGE,
            move_speed: KAIJU_MOVE_SPEED,
            rotation_speed: KAIJU_ROTATION_SPEED,
            stopping_distance: KAIJU_STOPPING_DISTANCE,
        }
    }
}

#[derive(Component)]
pub struct RtsCamera {
    pub focus_point: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

/// Everything a selectable unit needs at spawn. Spawning through the bundle
/// guarantees the navigation handle exists before the first tick.
#[derive(Bundle)]
pub struct UnitBundle {
    pub unit: Unit,
    pub kind: UnitKind,
    pub nav: NavAgent,
    pub transform: Transform,
}

impl UnitBundle {
    pub fn new(kind: UnitKind, position: Vec3) -> Self {
        Self {
            unit: Unit::default(),
            kind,
            nav: NavAgent::default(),
            transform: Transform::from_translation(position),
        }
    }
}

/// Kaiju spawn bundle: body and obstacle proxy are supplied up front instead
/// of being fabricated lazily on first use.
#[derive(Bundle)]
pub struct KaijuBundle {
    pub pursuer: Pursuer,
    pub config: PursuitConfig,
    pub body: KinematicBody,
    pub obstacle: NavObstacle,
    pub transform: Transform,
}

impl KaijuBundle {
    pub fn new(config: PursuitConfig, position: Vec3) -> Self {
        Self {
            pursuer: Pursuer::default(),
            config,
            body: KinematicBody::default(),
            obstacle: NavObstacle::default(),
            transform: Transform::from_translation(position),
        }
    }
}
