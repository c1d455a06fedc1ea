// Visual feedback for selection: per-unit highlight tint and the drag rectangle
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::*;
use crate::types::Unit;

use super::input::ReconcilerState;
use super::model::SelectionChanged;

// Marker for the screen-space drag rectangle UI node
#[derive(Component)]
pub struct BoxSelectionVisual;

/// System: tint a unit's material whenever its selection flag flips
pub fn highlight_system(
    changed_units: Query<(&Unit, &MeshMaterial3d<StandardMaterial>), Changed<Unit>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (unit, material_handle) in changed_units.iter() {
        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.base_color = if unit.selected {
                SELECTED_COLOR
            } else {
                DEFAULT_COLOR
            };
        }
    }
}

/// System: draw the box-selection rectangle while the pointer is dragged
/// past the click threshold
pub fn box_selection_visual_system(
    mut commands: Commands,
    mouse_button: Res<ButtonInput<MouseButton>>,
    state: Res<ReconcilerState>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    existing_visual: Query<Entity, With<BoxSelectionVisual>>,
) {
    let cursor_pos = window_query
        .single()
        .ok()
        .and_then(|window| window.cursor_position());

    let rect = match (state.anchor, cursor_pos) {
        (Some(anchor), Some(cursor))
            if mouse_button.pressed(MouseButton::Left)
                && anchor.distance(cursor) > DRAG_THRESHOLD =>
        {
            Some((anchor.min(cursor), anchor.max(cursor)))
        }
        _ => None,
    };

    // Recreated each frame with fresh dimensions
    for entity in existing_visual.iter() {
        commands.entity(entity).despawn();
    }

    let Some((min, max)) = rect else { return };

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(min.x),
            top: Val::Px(min.y),
            width: Val::Px(max.x - min.x),
            height: Val::Px(max.y - min.y),
            border: UiRect::all(Val::Px(1.0)),
            ..default()
        },
        BackgroundColor(BOX_VISUAL_FILL),
        BorderColor(BOX_VISUAL_BORDER),
        BoxSelectionVisual,
    ));
}

/// System: log selection snapshots for on-screen feedback listeners
pub fn selection_feedback_system(mut changed: EventReader<SelectionChanged>) {
    for event in changed.read() {
        info!("{} units selected", event.selected.len());
    }
}
