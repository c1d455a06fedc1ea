// Gesture reconciliation: raw pointer/button events in, selection mutations out
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::*;
use crate::math_utils::ray_sphere_intersection;
use crate::types::{RtsCamera, Unit, UnitKind};

use super::model::{BoxDragPolicy, SelectionChanged, SelectionModel};

/// Axis-aligned screen-space rectangle spanned by a box drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl SelectionRect {
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// A resolved selection intent, produced once per completed input gesture
/// and consumed the same frame.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Click { target: Option<Entity>, additive: bool },
    DoubleClick { target: Entity, additive: bool },
    BoxDrag { rect: SelectionRect, additive: bool },
    Cancel,
}

/// Pointer state carried across frames while a gesture is in flight.
#[derive(Resource, Default)]
pub struct ReconcilerState {
    pub anchor: Option<Vec2>,
    pub last_click_time: Option<f32>,
}

fn shift_held(keyboard: &ButtonInput<KeyCode>) -> bool {
    keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight)
}

/// The double-click window is global: measured against the last resolved
/// click on any target.
fn is_double_click(now: f32, last_click_time: Option<f32>) -> bool {
    last_click_time.is_some_and(|last| now - last < DOUBLE_CLICK_THRESHOLD)
}

/// Pick the unit nearest along the cursor ray, if any.
fn pick_unit(
    cursor_pos: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    unit_query: &Query<(Entity, &Transform), With<Unit>>,
) -> Option<Entity> {
    let ray = camera.viewport_to_world(camera_transform, cursor_pos).ok()?;
    unit_query
        .iter()
        .filter_map(|(entity, transform)| {
            ray_sphere_intersection(ray.origin, *ray.direction, transform.translation, UNIT_PICK_RADIUS)
                .map(|t| (entity, t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        .map(|(entity, _)| entity)
}

/// System: interpret pointer/button events into Gesture events.
///
/// Button-down records the anchor; button-up resolves the gesture by
/// displacement (box drag past DRAG_THRESHOLD, click otherwise). Escape
/// always resolves to Cancel, regardless of drag state.
pub fn gesture_input_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<RtsCamera>>,
    unit_query: Query<(Entity, &Transform), With<Unit>>,
    mut state: ResMut<ReconcilerState>,
    mut gestures: EventWriter<Gesture>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        state.anchor = None;
        gestures.write(Gesture::Cancel);
    }

    let Ok(window) = window_query.single() else { return };
    let Some(cursor_pos) = window.cursor_position() else { return };

    if mouse_button.just_pressed(MouseButton::Left) {
        state.anchor = Some(cursor_pos);
    }

    if mouse_button.just_released(MouseButton::Left) {
        let Some(anchor) = state.anchor.take() else { return };
        let additive = shift_held(&keyboard);

        if anchor.distance(cursor_pos) > DRAG_THRESHOLD {
            gestures.write(Gesture::BoxDrag {
                rect: SelectionRect::from_corners(anchor, cursor_pos),
                additive,
            });
            return;
        }

        let Ok((camera, camera_transform)) = camera_query.single() else { return };
        match pick_unit(cursor_pos, camera, camera_transform, &unit_query) {
            Some(target) => {
                let now = time.elapsed_secs();
                let double = is_double_click(now, state.last_click_time);
                // The timestamp only advances on clicks that hit a unit
                state.last_click_time = Some(now);
                if double {
                    gestures.write(Gesture::DoubleClick { target, additive });
                } else {
                    gestures.write(Gesture::Click {
                        target: Some(target),
                        additive,
                    });
                }
            }
            None => {
                gestures.write(Gesture::Click {
                    target: None,
                    additive,
                });
            }
        }
    }
}

type UnitQuery<'w, 's> =
    Query<'w, 's, (Entity, &'static UnitKind, &'static mut Unit, &'static Transform)>;

fn deselect_all(model: &mut SelectionModel, units: &mut UnitQuery) {
    model.deselect_all(|entity| {
        if let Ok((_, _, mut unit, _)) = units.get_mut(entity) {
            unit.selected = false;
        }
    });
}

fn apply_click(model: &mut SelectionModel, target: Entity, additive: bool, units: &mut UnitQuery) {
    if additive {
        if let Ok((_, _, mut unit, _)) = units.get_mut(target) {
            model.toggle(target, &mut unit);
        }
        return;
    }

    if model.is_sole_selection(target) {
        // Plain click on the only selected unit deselects it
        deselect_all(model, units);
        return;
    }

    deselect_all(model, units);
    if let Ok((_, _, mut unit, _)) = units.get_mut(target) {
        model.select(target, &mut unit);
    }
}

fn apply_double_click(
    model: &mut SelectionModel,
    target: Entity,
    additive: bool,
    units: &mut UnitQuery,
) {
    let Ok((_, &kind, _, _)) = units.get(target) else { return };

    if !additive {
        deselect_all(model, units);
    }

    // Select every living unit of the clicked kind, position ignored.
    // Entity order keeps the resulting snapshot deterministic.
    let mut matches: Vec<Entity> = units
        .iter()
        .filter(|(_, &k, _, _)| k == kind)
        .map(|(entity, _, _, _)| entity)
        .collect();
    matches.sort();
    for entity in matches {
        if let Ok((_, _, mut unit, _)) = units.get_mut(entity) {
            model.select(entity, &mut unit);
        }
    }
}

/// Units whose screen projection falls inside the drag rectangle,
/// in entity order.
fn box_candidates(
    rect: SelectionRect,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    units: &UnitQuery,
) -> Vec<Entity> {
    let mut candidates: Vec<Entity> = units
        .iter()
        .filter_map(|(entity, _, _, transform)| {
            let screen_pos = camera
                .world_to_viewport(camera_transform, transform.translation)
                .ok()?;
            rect.contains(screen_pos).then_some(entity)
        })
        .collect();
    candidates.sort();
    candidates
}

/// Reconcile the selection with the units caught in a box drag.
///
/// The deselect-everything response to an empty box applies only to
/// non-additive drags; a shift-drag over empty ground leaves the current
/// selection alone, since additive drags never remove members.
fn apply_box_drag(
    model: &mut SelectionModel,
    candidates: &[Entity],
    additive: bool,
    units: &mut UnitQuery,
) {
    if candidates.is_empty() {
        if !additive {
            deselect_all(model, units);
        }
        return;
    }

    if !additive {
        let full_overlap = candidates.iter().all(|&e| model.is_selected(e));
        if full_overlap && model.box_drag_policy == BoxDragPolicy::ToggleOnFullOverlap {
            for &entity in candidates {
                if let Ok((_, _, mut unit, _)) = units.get_mut(entity) {
                    model.deselect(entity, &mut unit);
                }
            }
            return;
        }

        // Membership becomes exactly the candidate set
        for entity in model.snapshot() {
            if !candidates.contains(&entity) {
                if let Ok((_, _, mut unit, _)) = units.get_mut(entity) {
                    model.deselect(entity, &mut unit);
                }
            }
        }
    }

    for &entity in candidates {
        if let Ok((_, _, mut unit, _)) = units.get_mut(entity) {
            model.select(entity, &mut unit);
        }
    }
}

/// System: apply queued gestures to the selection model. Each gesture that
/// changes membership fires exactly one SelectionChanged snapshot.
pub fn apply_gesture_system(
    mut gestures: EventReader<Gesture>,
    mut model: ResMut<SelectionModel>,
    camera_query: Query<(&Camera, &GlobalTransform), With<RtsCamera>>,
    mut units: UnitQuery,
    mut changed: EventWriter<SelectionChanged>,
) {
    for gesture in gestures.read() {
        match *gesture {
            Gesture::Cancel => deselect_all(&mut model, &mut units),
            Gesture::Click { target: None, additive } => {
                if !additive {
                    deselect_all(&mut model, &mut units);
                }
            }
            Gesture::Click {
                target: Some(target),
                additive,
            } => apply_click(&mut model, target, additive, &mut units),
            Gesture::DoubleClick { target, additive } => {
                apply_double_click(&mut model, target, additive, &mut units)
            }
            Gesture::BoxDrag { rect, additive } => {
                let candidates = match camera_query.single() {
                    Ok((camera, camera_transform)) => {
                        box_candidates(rect, camera, camera_transform, &units)
                    }
                    Err(_) => Vec::new(),
                };
                apply_box_drag(&mut model, &candidates, additive, &mut units);
            }
        }

        if model.take_dirty() {
            debug!("selection changed: {} units", model.selected().len());
            changed.write(SelectionChanged {
                selected: model.snapshot(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use crate::types::UnitBundle;

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<SelectionModel>()
            .init_resource::<ReconcilerState>()
            .add_event::<Gesture>()
            .add_event::<SelectionChanged>()
            .add_systems(Update, apply_gesture_system);
        app
    }

    fn spawn_unit(app: &mut App, kind: UnitKind) -> Entity {
        app.world_mut()
            .spawn(UnitBundle::new(kind, Vec3::ZERO))
            .id()
    }

    fn send(app: &mut App, gesture: Gesture) {
        app.world_mut().send_event(gesture);
        app.update();
    }

    fn selected(app: &App) -> Vec<Entity> {
        app.world().resource::<SelectionModel>().snapshot()
    }

    fn changed_events(app: &App) -> Vec<Vec<Entity>> {
        let events = app.world().resource::<Events<SelectionChanged>>();
        let mut cursor = events.get_cursor();
        cursor.read(events).map(|e| e.selected.clone()).collect()
    }

    #[derive(Resource, Default)]
    struct PendingBoxDrag {
        candidates: Vec<Entity>,
        additive: bool,
    }

    fn box_drag_test_system(
        mut pending: ResMut<PendingBoxDrag>,
        mut model: ResMut<SelectionModel>,
        mut units: UnitQuery,
    ) {
        let candidates = std::mem::take(&mut pending.candidates);
        apply_box_drag(&mut model, &candidates, pending.additive, &mut units);
        model.take_dirty();
    }

    fn run_box_drag(app: &mut App, candidates: Vec<Entity>, additive: bool) {
        app.insert_resource(PendingBoxDrag { candidates, additive });
        app.world_mut().run_system_once(box_drag_test_system).unwrap();
    }

    #[test]
    fn rect_containment_is_inclusive() {
        let rect = SelectionRect::from_corners(Vec2::new(10.0, 40.0), Vec2::new(30.0, 20.0));
        assert_eq!(rect.min, Vec2::new(10.0, 20.0));
        assert!(rect.contains(Vec2::new(10.0, 20.0)));
        assert!(rect.contains(Vec2::new(30.0, 40.0)));
        assert!(rect.contains(Vec2::new(20.0, 30.0)));
        assert!(!rect.contains(Vec2::new(30.1, 30.0)));
    }

    #[test]
    fn double_click_window_is_exclusive_at_threshold() {
        assert!(!is_double_click(1.0, None));
        assert!(is_double_click(1.0, Some(0.9)));
        // With last = 0.0 the elapsed time is the threshold bit-for-bit,
        // with no subtraction rounding to muddy the boundary
        assert!(!is_double_click(DOUBLE_CLICK_THRESHOLD, Some(0.0)));
        assert!(is_double_click(0.125, Some(0.0)));
    }

    #[test]
    fn click_selects_and_replaces() {
        let mut app = test_app();
        let a = spawn_unit(&mut app, UnitKind::Soldier);
        let b = spawn_unit(&mut app, UnitKind::Soldier);

        send(&mut app, Gesture::Click { target: Some(a), additive: false });
        assert_eq!(selected(&app), vec![a]);

        send(&mut app, Gesture::Click { target: Some(b), additive: false });
        assert_eq!(selected(&app), vec![b]);
        assert!(!app.world().get::<Unit>(a).unwrap().selected);
    }

    #[test]
    fn click_on_sole_selection_deselects_it() {
        let mut app = test_app();
        let a = spawn_unit(&mut app, UnitKind::Soldier);

        send(&mut app, Gesture::Click { target: Some(a), additive: false });
        send(&mut app, Gesture::Click { target: Some(a), additive: false });
        assert!(selected(&app).is_empty());
        assert!(!app.world().get::<Unit>(a).unwrap().selected);
    }

    #[test]
    fn additive_click_toggles_without_clearing() {
        let mut app = test_app();
        let a = spawn_unit(&mut app, UnitKind::Soldier);
        let b = spawn_unit(&mut app, UnitKind::Tank);

        send(&mut app, Gesture::Click { target: Some(a), additive: false });
        send(&mut app, Gesture::Click { target: Some(b), additive: true });
        assert_eq!(selected(&app), vec![a, b]);

        send(&mut app, Gesture::Click { target: Some(a), additive: true });
        assert_eq!(selected(&app), vec![b]);
    }

    #[test]
    fn miss_clears_unless_additive() {
        let mut app = test_app();
        let a = spawn_unit(&mut app, UnitKind::Soldier);

        send(&mut app, Gesture::Click { target: Some(a), additive: false });
        send(&mut app, Gesture::Click { target: None, additive: true });
        assert_eq!(selected(&app), vec![a]);

        send(&mut app, Gesture::Click { target: None, additive: false });
        assert!(selected(&app).is_empty());
    }

    #[test]
    fn double_click_selects_every_unit_of_kind() {
        let mut app = test_app();
        let s1 = spawn_unit(&mut app, UnitKind::Soldier);
        let s2 = spawn_unit(&mut app, UnitKind::Soldier);
        let s3 = spawn_unit(&mut app, UnitKind::Soldier);
        let tank = spawn_unit(&mut app, UnitKind::Tank);

        send(&mut app, Gesture::Click { target: Some(tank), additive: false });
        send(&mut app, Gesture::DoubleClick { target: s2, additive: false });

        let result = selected(&app);
        assert_eq!(result, vec![s1, s2, s3]);
        assert!(!app.world().get::<Unit>(tank).unwrap().selected);
    }

    #[test]
    fn cancel_always_empties_selection() {
        let mut app = test_app();
        let a = spawn_unit(&mut app, UnitKind::Soldier);
        let b = spawn_unit(&mut app, UnitKind::Tank);

        send(&mut app, Gesture::Click { target: Some(a), additive: false });
        send(&mut app, Gesture::Click { target: Some(b), additive: true });
        send(&mut app, Gesture::Cancel);
        assert!(selected(&app).is_empty());
        assert!(!app.world().get::<Unit>(a).unwrap().selected);
        assert!(!app.world().get::<Unit>(b).unwrap().selected);
    }

    #[test]
    fn one_notification_per_gesture() {
        let mut app = test_app();
        let a = spawn_unit(&mut app, UnitKind::Soldier);
        let b = spawn_unit(&mut app, UnitKind::Soldier);
        let c = spawn_unit(&mut app, UnitKind::Soldier);

        app.world_mut()
            .send_event(Gesture::DoubleClick { target: a, additive: false });
        app.update();
        let events = changed_events(&app);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], vec![a, b, c]);

        // Deselect-all over three units is still a single notification
        app.world_mut().send_event(Gesture::Cancel);
        app.update();
        let events = changed_events(&app);
        assert_eq!(events.last().unwrap().len(), 0);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn redundant_gesture_fires_no_notification() {
        let mut app = test_app();
        spawn_unit(&mut app, UnitKind::Soldier);

        // Nothing selected, clicking empty space changes nothing
        app.world_mut()
            .send_event(Gesture::Click { target: None, additive: false });
        app.update();
        assert!(changed_events(&app).is_empty());
    }

    #[test]
    fn box_drag_reconciles_to_candidate_set() {
        let mut app = test_app();
        let a = spawn_unit(&mut app, UnitKind::Soldier);
        let b = spawn_unit(&mut app, UnitKind::Soldier);
        let c = spawn_unit(&mut app, UnitKind::Tank);

        send(&mut app, Gesture::Click { target: Some(c), additive: false });
        run_box_drag(&mut app, vec![a, b], false);

        assert_eq!(selected(&app), vec![a, b]);
        assert!(!app.world().get::<Unit>(c).unwrap().selected);
    }

    #[test]
    fn empty_box_drag_deselects_all() {
        let mut app = test_app();
        let a = spawn_unit(&mut app, UnitKind::Soldier);

        send(&mut app, Gesture::Click { target: Some(a), additive: false });
        run_box_drag(&mut app, Vec::new(), false);
        assert!(selected(&app).is_empty());
    }

    #[test]
    fn full_overlap_repeats_selection_under_replace_policy() {
        let mut app = test_app();
        let a = spawn_unit(&mut app, UnitKind::Soldier);
        let b = spawn_unit(&mut app, UnitKind::Soldier);

        run_box_drag(&mut app, vec![a, b], false);
        run_box_drag(&mut app, vec![a, b], false);
        assert_eq!(selected(&app), vec![a, b]);
    }

    #[test]
    fn full_overlap_inverts_under_toggle_policy() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<SelectionModel>()
            .box_drag_policy = BoxDragPolicy::ToggleOnFullOverlap;
        let a = spawn_unit(&mut app, UnitKind::Soldier);
        let b = spawn_unit(&mut app, UnitKind::Soldier);

        run_box_drag(&mut app, vec![a, b], false);
        assert_eq!(selected(&app), vec![a, b]);

        run_box_drag(&mut app, vec![a, b], false);
        assert!(selected(&app).is_empty());
        assert!(!app.world().get::<Unit>(a).unwrap().selected);
    }

    #[test]
    fn additive_box_drag_keeps_existing_selection() {
        let mut app = test_app();
        let a = spawn_unit(&mut app, UnitKind::Tank);
        let b = spawn_unit(&mut app, UnitKind::Soldier);
        let c = spawn_unit(&mut app, UnitKind::Soldier);

        send(&mut app, Gesture::Click { target: Some(a), additive: false });
        run_box_drag(&mut app, vec![b, c], true);
        assert_eq!(selected(&app), vec![a, b, c]);
    }
}
