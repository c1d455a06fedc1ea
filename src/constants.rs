use bevy::prelude::Color;

// Selection input settings
pub const DRAG_THRESHOLD: f32 = 10.0;        // Pixels of travel before a click becomes a box drag
pub const DOUBLE_CLICK_THRESHOLD: f32 = 0.2; // Seconds between clicks to count as a double click
pub const UNIT_PICK_RADIUS: f32 = 0.9;       // Pick-sphere radius around a unit center for click raycasts

// Selection visuals
pub const SELECTED_COLOR: Color = Color::srgb(0.2, 0.9, 0.3);
pub const DEFAULT_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);
pub const BOX_VISUAL_FILL: Color = Color::srgba(0.2, 0.8, 0.3, 0.15);
pub const BOX_VISUAL_BORDER: Color = Color::srgba(0.2, 0.9, 0.3, 0.8);

// Unit movement
pub const UNIT_MOVE_SPEED: f32 = 4.0;
pub const ARRIVAL_THRESHOLD: f32 = 0.2; // Distance at which a nav destination counts as reached

// Kaiju defaults
pub const KAIJU_DETECTION_RADIUS: f32 = 15.0;
pub const KAIJU_ATTACK_RANGE: f32 = 3.0;
pub const KAIJU_MOVE_SPEED: f32 = 2.5;
pub const KAIJU_ROTATION_SPEED: f32 = 2.0; // Per-second slerp blend factor, not an angular rate
pub const KAIJU_STOPPING_DISTANCE: f32 = 6.0;

// RTS camera settings
pub const CAMERA_SPEED: f32 = 25.0;
pub const CAMERA_ZOOM_SPEED: f32 = 4.0;
pub const CAMERA_MIN_DISTANCE: f32 = 10.0;
pub const CAMERA_MAX_DISTANCE: f32 = 120.0;
pub const CAMERA_ROTATION_SPEED: f32 = 0.005;
