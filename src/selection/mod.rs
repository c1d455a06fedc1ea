// Selection module - gesture reconciliation and selection state
//
// Submodules:
// - model: SelectionModel resource, change notification, pruning
// - input: gesture reconciliation (click, double-click, box drag, escape)
// - movement: right-click move commands for selected units
// - visuals: highlight tint and box-drag rectangle feedback

mod input;
mod model;
mod movement;
mod visuals;

pub use model::{BoxDragPolicy, SelectionChanged, SelectionModel};

pub use input::{apply_gesture_system, gesture_input_system, Gesture, ReconcilerState};
pub use model::prune_dead_selection_system;
pub use movement::move_command_system;
pub use visuals::{box_selection_visual_system, highlight_system, selection_feedback_system};
