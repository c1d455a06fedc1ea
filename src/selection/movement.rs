// Right-click move commands for selected units
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::math_utils::screen_to_ground;
use crate::types::{NavAgent, RtsCamera, Unit};

use super::model::SelectionModel;

/// System: right-click sends every selected unit to the clicked ground point.
/// Move commands are only honored by units that are currently selected.
pub fn move_command_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<RtsCamera>>,
    model: Res<SelectionModel>,
    mut units: Query<(&Unit, &mut NavAgent)>,
) {
    if !mouse_button.just_pressed(MouseButton::Right) {
        return;
    }
    if model.selected().is_empty() {
        return;
    }

    let Ok(window) = window_query.single() else { return };
    let Ok((camera, camera_transform)) = camera_query.single() else { return };
    let Some(cursor_pos) = window.cursor_position() else { return };
    let Some(destination) = screen_to_ground(cursor_pos, camera, camera_transform) else {
        return;
    };

    let mut commanded = 0;
    for &entity in model.selected() {
        let Ok((unit, mut nav)) = units.get_mut(entity) else { continue };
        if unit.selected {
            nav.destination = Some(destination);
            commanded += 1;
        }
    }

    if commanded > 0 {
        info!(
            "Move command to ({:.1}, {:.1}) for {} units",
            destination.x, destination.z, commanded
        );
    }
}
