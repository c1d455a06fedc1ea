// Unit path following and RTS camera controls
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::constants::*;
use crate::math_utils::{planar_direction, planar_distance};
use crate::types::{NavAgent, RtsCamera};

/// One fixed-tick step of planar movement toward `destination`.
/// Returns the new position and whether the agent has arrived.
pub(crate) fn nav_step(position: Vec3, destination: Vec3, dt: f32) -> (Vec3, bool) {
    let distance = planar_distance(position, destination);
    if distance <= ARRIVAL_THRESHOLD {
        return (position, true);
    }

    let direction = planar_direction(position, destination).normalize_or_zero();
    let step = (UNIT_MOVE_SPEED * dt).min(distance);
    (position + direction * step, false)
}

/// System: move nav agents toward their destination, clearing it on arrival.
/// Runs on the fixed tick alongside the pursuit AI.
pub fn nav_follow_system(time: Res<Time>, mut agents: Query<(&mut Transform, &mut NavAgent)>) {
    let dt = time.delta_secs();

    for (mut transform, mut nav) in agents.iter_mut() {
        let Some(destination) = nav.destination else { continue };

        let (new_position, arrived) = nav_step(transform.translation, destination, dt);
        if arrived {
            nav.destination = None;
            continue;
        }

        let direction = planar_direction(transform.translation, destination);
        transform.translation = new_position;
        if direction.length() > 0.1 {
            transform.rotation = Quat::from_rotation_y(direction.x.atan2(direction.z));
        }
    }
}

/// System: WASD pan, wheel zoom and middle-drag rotation for the RTS camera
pub fn rts_camera_movement(
    time: Res<Time>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mouse_button_input: Res<ButtonInput<MouseButton>>,
    mut scroll_events: EventReader<MouseWheel>,
    mut mouse_motion_events: EventReader<MouseMotion>,
    mut camera_query: Query<(&mut Transform, &mut RtsCamera)>,
) {
    let Ok((mut transform, mut camera)) = camera_query.single_mut() else { return };
    let delta_time = time.delta_secs();

    if mouse_button_input.pressed(MouseButton::Middle) {
        for motion in mouse_motion_events.read() {
            camera.yaw -= motion.delta.x * CAMERA_ROTATION_SPEED;
            camera.pitch = (camera.pitch - motion.delta.y * CAMERA_ROTATION_SPEED).clamp(-1.5, -0.1);
        }
    } else {
        mouse_motion_events.clear();
    }

    let mut movement = Vec3::ZERO;
    if keyboard_input.pressed(KeyCode::KeyW) || keyboard_input.pressed(KeyCode::ArrowUp) {
        movement.z -= 1.0;
    }
    if keyboard_input.pressed(KeyCode::KeyS) || keyboard_input.pressed(KeyCode::ArrowDown) {
        movement.z += 1.0;
    }
    if keyboard_input.pressed(KeyCode::KeyA) || keyboard_input.pressed(KeyCode::ArrowLeft) {
        movement.x -= 1.0;
    }
    if keyboard_input.pressed(KeyCode::KeyD) || keyboard_input.pressed(KeyCode::ArrowRight) {
        movement.x += 1.0;
    }

    if movement.length() > 0.0 {
        movement = movement.normalize() * CAMERA_SPEED * delta_time;
        // Pan relative to camera yaw, staying on the ground plane
        let yaw_rotation = Mat3::from_rotation_y(camera.yaw);
        camera.focus_point += yaw_rotation * movement;
    }

    for scroll in scroll_events.read() {
        let zoom_delta = match scroll.unit {
            MouseScrollUnit::Line => scroll.y * CAMERA_ZOOM_SPEED,
            MouseScrollUnit::Pixel => scroll.y * CAMERA_ZOOM_SPEED * 0.1,
        };
        camera.distance = (camera.distance - zoom_delta).clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
    }

    let rotation = Quat::from_euler(EulerRot::YXZ, camera.yaw, camera.pitch, 0.0);
    let offset = rotation * Vec3::new(0.0, 0.0, camera.distance);
    transform.translation = camera.focus_point + offset;
    transform.rotation = rotation;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_step_moves_planar_and_caps_at_destination() {
        let (pos, arrived) = nav_step(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), 0.5);
        assert!(!arrived);
        assert!((pos.z - UNIT_MOVE_SPEED * 0.5).abs() < 1e-5);
        assert_eq!(pos.y, 0.0);

        // A huge tick never overshoots the destination
        let (pos, _) = nav_step(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 10.0);
        assert!(pos.z <= 1.0 + 1e-5);
    }

    #[test]
    fn nav_step_reports_arrival_inside_threshold() {
        let destination = Vec3::new(0.1, 0.0, 0.1);
        let (pos, arrived) = nav_step(Vec3::ZERO, destination, 0.016);
        assert!(arrived);
        assert_eq!(pos, Vec3::ZERO);
    }
}
