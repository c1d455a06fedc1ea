// Kaiju pursuit AI - fixed-tick detect/approach/engage state machine
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::math_utils::{inverse_lerp, planar_direction, planar_distance};
use crate::types::{KinematicBody, NavObstacle, Pursuer, PursuitConfig, PursuitState, Unit};

/// Attack hook, fired once per engaging tick. Combat resolution lives
/// elsewhere; the core only signals the tick.
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackEvent {
    pub attacker: Entity,
    pub target: Entity,
}

/// Outcome of one AI tick, applied to the body/obstacle collaborators by the
/// system. Kept as plain data so the state machine is testable on its own.
pub(crate) struct PursuitPlan {
    pub state: PursuitState,
    pub target: Option<Entity>,
    pub rotation: Option<Quat>,
    pub displacement: Vec3,
    pub velocity: Option<Vec3>,
    pub carving: Option<bool>,
    pub attack: bool,
}

impl PursuitPlan {
    fn idle() -> Self {
        Self {
            state: PursuitState::Idle,
            target: None,
            rotation: None,
            displacement: Vec3::ZERO,
            velocity: None,
            carving: None,
            attack: false,
        }
    }
}

/// Nearest candidate by planar distance within `radius`.
/// Distance ties break toward the lower entity id, so the choice is stable
/// regardless of query iteration order.
pub(crate) fn nearest_target(
    position: Vec3,
    radius: f32,
    targets: impl Iterator<Item = (Entity, Vec3)>,
) -> Option<(Entity, Vec3)> {
    targets
        .map(|(entity, pos)| (entity, pos, planar_distance(position, pos)))
        .filter(|&(_, _, distance)| distance <= radius)
        .min_by(|a, b| a.2.total_cmp(&b.2).then(a.0.cmp(&b.0)))
        .map(|(entity, pos, _)| (entity, pos))
}

/// One tick of the pursuit state machine.
///
/// Target height is coerced to the pursuer's own height before distance and
/// direction calculations, so elevation never affects aim or approach.
pub(crate) fn plan_pursuit(
    config: &PursuitConfig,
    position: Vec3,
    rotation: Quat,
    targets: impl Iterator<Item = (Entity, Vec3)>,
    dt: f32,
) -> PursuitPlan {
    let Some((target, target_pos)) = nearest_target(position, config.detection_radius, targets)
    else {
        return PursuitPlan::idle();
    };

    let flattened = Vec3::new(target_pos.x, position.y, target_pos.z);
    let direction = planar_direction(position, flattened).normalize_or_zero();
    let distance = planar_distance(position, flattened);

    // rotation_speed acts as a per-second slerp blend factor
    let look = Quat::from_rotation_y(direction.x.atan2(direction.z));
    let new_rotation = rotation.slerp(look, config.rotation_speed * dt);

    if distance > config.attack_range {
        // Speed ramps from 0 at attack range up to move_speed at stopping
        // distance; clamped so far-away targets never produce runaway speed.
        let t = inverse_lerp(config.attack_range, config.stopping_distance, distance);
        let speed = (t * config.move_speed).clamp(0.0, config.move_speed);
        PursuitPlan {
            state: PursuitState::Approaching,
            target: Some(target),
            rotation: Some(new_rotation),
            displacement: direction * speed * dt,
            velocity: Some(direction * speed),
            carving: Some(false),
            attack: false,
        }
    } else {
        PursuitPlan {
            state: PursuitState::Engaging,
            target: Some(target),
            rotation: Some(new_rotation),
            displacement: Vec3::ZERO,
            velocity: Some(Vec3::ZERO),
            carving: Some(true),
            attack: true,
        }
    }
}

/// System: run every pursuer's state machine once per fixed tick and apply
/// the plan to its transform, body and obstacle proxy.
pub fn pursuit_ai_system(
    time: Res<Time>,
    mut pursuers: Query<(
        Entity,
        &mut Transform,
        &PursuitConfig,
        &mut Pursuer,
        &mut KinematicBody,
        &mut NavObstacle,
    )>,
    units: Query<(Entity, &Transform), (With<Unit>, Without<Pursuer>)>,
    mut attacks: EventWriter<AttackEvent>,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, config, mut pursuer, mut body, mut obstacle) in pursuers.iter_mut()
    {
        let plan = plan_pursuit(
            config,
            transform.translation,
            transform.rotation,
            units.iter().map(|(e, t)| (e, t.translation)),
            dt,
        );

        if pursuer.state != plan.state {
            debug!("kaiju {entity} -> {:?}", plan.state);
        }
        pursuer.state = plan.state;
        pursuer.current_target = plan.target;

        if let Some(rotation) = plan.rotation {
            transform.rotation = rotation;
        }
        transform.translation += plan.displacement;
        if let Some(velocity) = plan.velocity {
            body.velocity = velocity;
        }
        if let Some(carving) = plan.carving {
            obstacle.carving = carving;
        }
        if plan.attack {
            if let Some(target) = plan.target {
                attacks.write(AttackEvent {
                    attacker: entity,
                    target,
                });
            }
        }
    }
}

/// System: attack stub, logs the engagement tick
pub fn attack_stub_system(mut attacks: EventReader<AttackEvent>) {
    for attack in attacks.read() {
        info!("kaiju {} attacks {}", attack.attacker, attack.target);
    }
}

/// System: draw detection and attack radii around each pursuer
pub fn pursuit_debug_gizmos(
    mut gizmos: Gizmos,
    pursuers: Query<(&Transform, &PursuitConfig), With<Pursuer>>,
) {
    for (transform, config) in pursuers.iter() {
        let iso = Isometry3d::new(transform.translation, Quat::from_rotation_x(-FRAC_PI_2));
        gizmos.circle(iso, config.detection_radius, Color::srgb(0.9, 0.2, 0.2));
        gizmos.circle(iso, config.attack_range, Color::srgb(0.9, 0.8, 0.2));
    }
}
