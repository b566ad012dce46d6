//! Structural learning: spawning, promoting and discarding tentative units.
//!
//! A tentative unit records "this input context, under these goals" at the
//! tick it is spawned. If some goal it serves is matched later, or the network
//! proves able to explain the new context with existing experience, the
//! tentative unit is promoted into the hidden set with the realized transition
//! time as its `tau`. Otherwise it expires after `tau` ticks.

use tracing::debug;

use crate::network::{Network, GOAL_INHIBITION};
use crate::prng::RandomSource;
use crate::unit::{Time, Unit, UnitId};

/// Weight of the succession link from a freshly active hidden unit to a
/// promoted one.
const SUCCESSION_WEIGHT: f32 = 0.1;
/// Weight of the boost an active output gives the unit spawned in its context.
const OUTPUT_CONTROL_WEIGHT: f32 = 2.0;
/// Weight of the link from a spawned unit up to each goal it serves.
const GOAL_SUPPORT_WEIGHT: f32 = 1.0;

impl<R: RandomSource> Network<R> {
    /// Drop tentative units older than their `tau`.
    pub fn update_working_memory(&mut self, time: Time) {
        let expired: Vec<UnitId> = self
            .working_memory
            .iter()
            .copied()
            .filter(|id| {
                self.units
                    .get(id)
                    .is_some_and(|u| time - u.start_time > u.params.tau)
            })
            .collect();

        for id in expired {
            if self.remove_fs(id).is_ok() {
                self.discarded_total += 1;
                debug!(unit = id, time, "discarded tentative unit");
            }
        }
    }

    fn active_inputs(&self) -> Vec<(UnitId, f32)> {
        self.in_fs
            .iter()
            .filter_map(|id| self.units.get(id))
            .filter(|u| u.is_active)
            .map(|u| (u.id, u.activity))
            .collect()
    }

    /// Hidden units active this tick, split into (fresh, already used).
    fn active_hidden(&self) -> (Vec<UnitId>, Vec<UnitId>) {
        self.hidden_fs
            .iter()
            .filter_map(|id| self.units.get(id))
            .filter(|u| u.is_active)
            .map(|u| (u.id, u.was_used))
            .fold((Vec::new(), Vec::new()), |(mut fresh, mut used), (id, was_used)| {
                if was_used {
                    used.push(id);
                } else {
                    fresh.push(id);
                }
                (fresh, used)
            })
    }

    /// Promote or keep working-memory units, then spawn a new one when no
    /// hidden unit explains the current context.
    pub fn learn(&mut self, time: Time) {
        let (fresh, _) = self.active_hidden();

        let promoted: Vec<UnitId> = self
            .working_memory
            .iter()
            .copied()
            .filter(|id| {
                !fresh.is_empty()
                    || self.units.get(id).is_some_and(|u| {
                        u.goal_ids.iter().any(|g| self.matched_fs.contains(g))
                    })
            })
            .collect();

        if !promoted.is_empty() {
            let inputs = self.active_inputs();
            for id in promoted {
                self.promote(id, time, &inputs, &fresh);
            }
        }

        if fresh.is_empty() {
            self.create_fs(time);
        }
    }

    fn promote(&mut self, id: UnitId, time: Time, inputs: &[(UnitId, f32)], fresh: &[UnitId]) {
        let Some(unit) = self.units.get_mut(&id) else {
            return;
        };
        unit.params.tau = (time - unit.start_time).max(1.0);
        for &(input, value) in inputs {
            unit.goal_weights.insert(input, 1.0);
            unit.goal_values.insert(input, value);
        }
        for &h in fresh {
            unit.lateral_weights.insert(h, SUCCESSION_WEIGHT);
        }
        unit.is_learning = false;
        let tau = unit.params.tau;

        self.working_memory.remove(&id);
        self.hidden_fs.insert(id);
        self.promoted_total += 1;
        debug!(unit = id, time, tau, "promoted tentative unit");
    }

    /// Spawn a tentative unit capturing the current context and return its id.
    pub fn create_fs(&mut self, time: Time) -> UnitId {
        let mut unit = Unit::new(self.cfg.spawn_params);
        unit.is_learning = true;
        unit.start_time = time;

        for (input, value) in self.active_inputs() {
            unit.problem_weights.insert(input, 1.0);
            unit.problem_values.insert(input, value);
        }

        let (_, used) = self.active_hidden();
        for &h in &used {
            unit.lateral_weights.insert(h, -1.0);
        }

        let outputs: Vec<UnitId> = self
            .out_fs
            .iter()
            .copied()
            .filter(|id| self.units.get(id).is_some_and(|u| u.is_active))
            .collect();
        for &o in &outputs {
            unit.control_weights.insert(o, OUTPUT_CONTROL_WEIGHT);
        }

        let goals: Vec<UnitId> = self
            .goal_fs
            .iter()
            .copied()
            .filter(|id| self.units.get(id).is_some_and(|u| u.is_active || u.failed))
            .collect();
        for &g in &goals {
            unit.control_weights.insert(g, GOAL_INHIBITION);
        }
        unit.parent_id = goals.first().copied();
        unit.goal_ids = goals.clone();

        let id = self.insert_unit(unit);
        self.working_memory.insert(id);

        for h in used {
            if let Some(peer) = self.units.get_mut(&h) {
                peer.lateral_weights.insert(id, -1.0);
            }
        }
        for &g in &goals {
            if let Some(goal) = self.units.get_mut(&g) {
                goal.control_weights.insert(id, GOAL_SUPPORT_WEIGHT);
            }
        }

        self.spawned_total += 1;
        debug!(unit = id, time, goals = goals.len(), "spawned tentative unit");
        id
    }

    /// Release every unit `goal` inhibits top-down so it can serve again.
    pub fn reset_used_fs(&mut self, goal: UnitId) {
        for unit in self.units.values_mut() {
            if unit.control_weights.get(&goal) == Some(&GOAL_INHIBITION) {
                unit.was_used = false;
            }
        }
    }
}
