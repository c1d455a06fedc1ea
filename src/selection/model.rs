// Selection set ownership and mutation API
use bevy::prelude::*;

use crate::types::Unit;

/// What a non-additive box drag does when every unit inside the box is
/// already selected. `Replace` keeps the selection as-is; `ToggleOnFullOverlap`
/// inverts it (deselecting the boxed units).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum BoxDragPolicy {
    #[default]
    Replace,
    ToggleOnFullOverlap,
}

/// Fired once per selection-changing gesture with the full resulting set.
#[derive(Event, Debug, Clone)]
pub struct SelectionChanged {
    pub selected: Vec<Entity>,
}

/// Owns the set of currently selected units. Insertion order is preserved,
/// membership is unique, and a unit's `selected` flag changes in the same
/// call that changes its membership.
#[derive(Resource, Default)]
pub struct SelectionModel {
    selected: Vec<Entity>,
    dirty: bool,
    pub box_drag_policy: BoxDragPolicy,
}

impl SelectionModel {
    pub fn selected(&self) -> &[Entity] {
        &self.selected
    }

    pub fn snapshot(&self) -> Vec<Entity> {
        self.selected.clone()
    }

    pub fn is_selected(&self, entity: Entity) -> bool {
        self.selected.contains(&entity)
    }

    pub fn is_sole_selection(&self, entity: Entity) -> bool {
        self.selected.len() == 1 && self.selected[0] == entity
    }

    pub fn select(&mut self, entity: Entity, unit: &mut Unit) {
        if unit.selected {
            return;
        }
        unit.selected = true;
        self.selected.push(entity);
        self.dirty = true;
    }

    pub fn deselect(&mut self, entity: Entity, unit: &mut Unit) {
        if !unit.selected {
            return;
        }
        unit.selected = false;
        self.selected.retain(|&e| e != entity);
        self.dirty = true;
    }

    pub fn toggle(&mut self, entity: Entity, unit: &mut Unit) {
        if unit.selected {
            self.deselect(entity, unit);
        } else {
            self.select(entity, unit);
        }
    }

    /// Deselects every member. `clear_flag` is called once per former member
    /// to reset its `selected` flag.
    pub fn deselect_all<F: FnMut(Entity)>(&mut self, mut clear_flag: F) {
        if self.selected.is_empty() {
            return;
        }
        for entity in self.selected.drain(..) {
            clear_flag(entity);
        }
        self.dirty = true;
    }

    /// Drops members for which `alive` returns false. Destroyed entities must
    /// be pruned before the next notification, never dereferenced.
    pub fn retain_alive<F: Fn(Entity) -> bool>(&mut self, alive: F) {
        let before = self.selected.len();
        self.selected.retain(|&e| alive(e));
        if self.selected.len() != before {
            self.dirty = true;
        }
    }

    /// Returns whether membership changed since the last call, and resets
    /// the flag. Callers emit one `SelectionChanged` per true result.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// System: drop despawned units from the selection before gestures run,
/// notifying listeners if anything was removed.
pub fn prune_dead_selection_system(
    mut model: ResMut<SelectionModel>,
    units: Query<(), With<Unit>>,
    mut changed: EventWriter<SelectionChanged>,
) {
    model.retain_alive(|entity| units.contains(entity));
    if model.take_dirty() {
        changed.write(SelectionChanged {
            selected: model.snapshot(),
        });
    }
}
