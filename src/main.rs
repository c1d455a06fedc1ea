use bevy::prelude::*;

mod constants;
mod kaiju;
mod math_utils;
mod movement;
mod selection;
mod setup;
mod types;

use kaiju::AttackEvent;
use selection::{Gesture, ReconcilerState, SelectionChanged, SelectionModel};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .init_resource::<SelectionModel>()
        .init_resource::<ReconcilerState>()
        .add_event::<Gesture>()
        .add_event::<SelectionChanged>()
        .add_event::<AttackEvent>()
        .add_systems(Startup, (setup::setup_scene, setup::spawn_army))
        .add_systems(
            Update,
            (
                // Dead units leave the selection before gestures resolve
                selection::prune_dead_selection_system,
                selection::gesture_input_system,
                selection::apply_gesture_system,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                selection::move_command_system,
                selection::highlight_system,
                selection::box_selection_visual_system,
                selection::selection_feedback_system,
                movement::rts_camera_movement,
                kaiju::attack_stub_system,
                kaiju::pursuit_debug_gizmos,
            ),
        )
        .add_systems(
            FixedUpdate,
            (kaiju::pursuit_ai_system, movement::nav_follow_system),
        )
        .run();
}
