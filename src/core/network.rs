use std::collections::{BTreeMap, BTreeSet, VecDeque};

use hashbrown::HashMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::aggregate::prob_sel;
use crate::error::{NetworkError, Result};
use crate::prng::{Prng, RandomSource};
use crate::unit::{Time, Unit, UnitId, UnitParams, WeightMap};

/// `unit id -> value` for one pass.
pub type ActivationMap = HashMap<UnitId, f32>;

/// Weight of the inhibitory top-down link a goal holds on the units serving it.
pub(crate) const GOAL_INHIBITION: f32 = -1.0;

/// Role partition of a permanent unit. Working-memory units have no role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Role {
    Input,
    Goal,
    Hidden,
    Output,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NetworkConfig {
    /// Convergence passes per tick (>= 1). More passes let lateral and control
    /// signals settle before learning runs.
    pub reentry: usize,

    // If set, makes noise and output selection reproducible.
    pub seed: Option<u64>,

    pub input_params: UnitParams,
    pub output_params: UnitParams,
    pub goal_params: UnitParams,
    /// Parameters of units spawned by the learning pass.
    pub spawn_params: UnitParams,

    /// Keep per-pass activation/mismatch snapshots.
    pub record_history: bool,
    /// Oldest snapshots are dropped beyond this many. 0 = unbounded.
    pub history_limit: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            reentry: 1,
            seed: None,
            input_params: UnitParams::default(),
            output_params: UnitParams::default(),
            goal_params: UnitParams::default().with_tau(10.0),
            spawn_params: UnitParams::default().with_tau(10.0).with_threshold(0.5),
            record_history: true,
            history_limit: 10_000,
        }
    }
}

impl NetworkConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_reentry(mut self, reentry: usize) -> Self {
        self.reentry = reentry;
        self
    }

    pub fn validate(&self) -> core::result::Result<(), &'static str> {
        if self.reentry == 0 {
            return Err("reentry must be >= 1");
        }
        self.input_params.validate()?;
        self.output_params.validate()?;
        self.goal_params.validate()?;
        self.spawn_params.validate()?;
        Ok(())
    }

    /// Parse a JSON config. Missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| NetworkError::ConfigParse(e.to_string()))?;
        cfg.validate().map_err(NetworkError::InvalidConfig)?;
        Ok(cfg)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Ids created by `init_pred_net` / `init_ctrl_net`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Roles {
    pub inputs: Vec<UnitId>,
    pub outputs: Vec<UnitId>,
    pub goals: Vec<UnitId>,
}

/// Activation and mismatch of every unit at the end of one pass.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryFrame {
    /// `tick + pass / reentry`.
    pub time: Time,
    pub activation: ActivationMap,
    pub mismatch: ActivationMap,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostics {
    pub unit_count: usize,
    pub input_count: usize,
    pub goal_count: usize,
    pub hidden_count: usize,
    pub output_count: usize,
    pub working_memory: usize,
    pub link_count: usize,
    pub active_count: usize,
    pub spawned_total: u64,
    pub promoted_total: u64,
    pub discarded_total: u64,
}

/// A network of functional systems.
///
/// Owns every unit in an id-keyed arena; units refer to each other only by id.
/// Ids are handed out in increasing order and never reused.
#[derive(Debug, Clone)]
pub struct Network<R: RandomSource = Prng> {
    pub(crate) cfg: NetworkConfig,
    pub(crate) units: BTreeMap<UnitId, Unit>,
    pub(crate) next_id: UnitId,

    pub(crate) in_fs: BTreeSet<UnitId>,
    pub(crate) goal_fs: BTreeSet<UnitId>,
    pub(crate) hidden_fs: BTreeSet<UnitId>,
    pub(crate) out_fs: BTreeSet<UnitId>,
    /// Tentative units: in the arena, in no role partition.
    pub(crate) working_memory: BTreeSet<UnitId>,

    pub(crate) rng: R,
    // Time of the last completed step.
    pub(crate) now: Time,

    pub(crate) activation: ActivationMap,
    pub(crate) mismatch: ActivationMap,
    pub(crate) activated_fs: Vec<UnitId>,
    pub(crate) failed_fs: Vec<UnitId>,
    pub(crate) matched_fs: Vec<UnitId>,
    pub(crate) used_fs: Vec<UnitId>,
    pub(crate) learning_fs: Vec<UnitId>,
    // Failed set as of the end of the previous tick.
    pub(crate) prev_failed: Vec<UnitId>,

    pub(crate) history: VecDeque<HistoryFrame>,

    pub(crate) spawned_total: u64,
    pub(crate) promoted_total: u64,
    pub(crate) discarded_total: u64,
}

impl Network {
    pub fn new(cfg: NetworkConfig) -> Result<Self> {
        let rng = Prng::new(cfg.seed.unwrap_or(1));
        Self::with_random_source(cfg, rng)
    }
}

impl<R: RandomSource> Network<R> {
    pub fn with_random_source(cfg: NetworkConfig, rng: R) -> Result<Self> {
        cfg.validate().map_err(NetworkError::InvalidConfig)?;
        Ok(Self {
            cfg,
            units: BTreeMap::new(),
            next_id: 0,
            in_fs: BTreeSet::new(),
            goal_fs: BTreeSet::new(),
            hidden_fs: BTreeSet::new(),
            out_fs: BTreeSet::new(),
            working_memory: BTreeSet::new(),
            rng,
            now: 0.0,
            activation: ActivationMap::new(),
            mismatch: ActivationMap::new(),
            activated_fs: Vec::new(),
            failed_fs: Vec::new(),
            matched_fs: Vec::new(),
            used_fs: Vec::new(),
            learning_fs: Vec::new(),
            prev_failed: Vec::new(),
            history: VecDeque::new(),
            spawned_total: 0,
            promoted_total: 0,
            discarded_total: 0,
        })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.cfg
    }

    /// Create `num_inputs` input units followed by `num_outputs` output units.
    pub fn init_pred_net(&mut self, num_inputs: usize, num_outputs: usize) -> Roles {
        let inputs = (0..num_inputs)
            .map(|_| self.add_with_role(Unit::new(self.cfg.input_params), Role::Input))
            .collect();
        let outputs = (0..num_outputs)
            .map(|_| self.add_with_role(Unit::new(self.cfg.output_params), Role::Output))
            .collect();
        Roles {
            inputs,
            outputs,
            goals: Vec::new(),
        }
    }

    /// Like `init_pred_net`, followed by `num_goals` goal units.
    pub fn init_ctrl_net(&mut self, num_inputs: usize, num_outputs: usize, num_goals: usize) -> Roles {
        let mut roles = self.init_pred_net(num_inputs, num_outputs);
        roles.goals = (0..num_goals)
            .map(|_| self.add_with_role(Unit::new(self.cfg.goal_params), Role::Goal))
            .collect();
        roles
    }

    /// Insert `unit` as a hidden unit and return its new id.
    pub fn add(&mut self, unit: Unit) -> UnitId {
        self.add_with_role(unit, Role::Hidden)
    }

    pub fn add_with_role(&mut self, mut unit: Unit, role: Role) -> UnitId {
        match role {
            Role::Input => {
                unit.is_input = true;
                unit.exact_input_match = true;
            }
            Role::Output => unit.is_output = true,
            Role::Goal | Role::Hidden => {}
        }
        let id = self.insert_unit(unit);
        self.partition_mut(role).insert(id);
        id
    }

    pub(crate) fn insert_unit(&mut self, mut unit: Unit) -> UnitId {
        let id = self.next_id;
        self.next_id += 1;
        unit.id = id;
        self.units.insert(id, unit);
        id
    }

    fn partition_mut(&mut self, role: Role) -> &mut BTreeSet<UnitId> {
        match role {
            Role::Input => &mut self.in_fs,
            Role::Goal => &mut self.goal_fs,
            Role::Hidden => &mut self.hidden_fs,
            Role::Output => &mut self.out_fs,
        }
    }

    pub fn role(&self, id: UnitId) -> Option<Role> {
        if self.in_fs.contains(&id) {
            Some(Role::Input)
        } else if self.goal_fs.contains(&id) {
            Some(Role::Goal)
        } else if self.hidden_fs.contains(&id) {
            Some(Role::Hidden)
        } else if self.out_fs.contains(&id) {
            Some(Role::Output)
        } else {
            None
        }
    }

    fn set_role(&mut self, ids: &[UnitId], role: Role) -> Result<()> {
        self.require_all(ids.iter().copied())?;
        for &id in ids {
            for r in [Role::Input, Role::Goal, Role::Hidden, Role::Output] {
                self.partition_mut(r).remove(&id);
            }
            self.working_memory.remove(&id);
            self.partition_mut(role).insert(id);
            if let Some(unit) = self.units.get_mut(&id) {
                unit.is_learning = false;
                unit.is_input = false;
                unit.is_output = false;
                unit.exact_input_match = false;
                match role {
                    Role::Input => {
                        unit.is_input = true;
                        unit.exact_input_match = true;
                    }
                    Role::Output => unit.is_output = true,
                    Role::Goal | Role::Hidden => {}
                }
            }
        }
        Ok(())
    }

    /// Mark the listed units as externally driven inputs.
    pub fn set_in_fs(&mut self, ids: &[UnitId]) -> Result<()> {
        self.set_role(ids, Role::Input)
    }

    /// Mark the listed units as outputs (never predicted, never time out).
    pub fn set_out_fs(&mut self, ids: &[UnitId]) -> Result<()> {
        self.set_role(ids, Role::Output)
    }

    /// Deep-copy unit `id` into a new unit whose `parent_id` is `id`.
    ///
    /// With `copy_outgoing`, every unit listening to `id` through problem or
    /// lateral weights also listens to the copy with the same weight.
    pub fn duplicate(&mut self, id: UnitId, copy_outgoing: bool) -> Result<UnitId> {
        let mut offspring = self
            .units
            .get(&id)
            .cloned()
            .ok_or(NetworkError::UnknownUnit(id))?;
        offspring.parent_id = Some(id);
        let role = self.role(id).unwrap_or(Role::Hidden);
        offspring.is_learning = false;
        let new_id = self.add_with_role(offspring, role);

        if copy_outgoing {
            for (&uid, unit) in self.units.iter_mut() {
                if uid == new_id {
                    continue;
                }
                if let Some(&w) = unit.problem_weights.get(&id) {
                    unit.problem_weights.insert(new_id, w);
                    if let Some(&c) = unit.problem_values.get(&id) {
                        unit.problem_values.insert(new_id, c);
                    }
                }
                if let Some(&w) = unit.lateral_weights.get(&id) {
                    unit.lateral_weights.insert(new_id, w);
                }
            }
        }
        debug!(parent = id, unit = new_id, copy_outgoing, "duplicated unit");
        Ok(new_id)
    }

    /// Delete a unit and purge its id from every remaining unit.
    pub fn remove_fs(&mut self, id: UnitId) -> Result<Unit> {
        let unit = self.units.remove(&id).ok_or(NetworkError::UnknownUnit(id))?;
        for r in [Role::Input, Role::Goal, Role::Hidden, Role::Output] {
            self.partition_mut(r).remove(&id);
        }
        self.working_memory.remove(&id);

        for other in self.units.values_mut() {
            other.purge(id);
        }
        for list in [
            &mut self.activated_fs,
            &mut self.failed_fs,
            &mut self.matched_fs,
            &mut self.used_fs,
            &mut self.learning_fs,
            &mut self.prev_failed,
        ] {
            list.retain(|&x| x != id);
        }
        self.activation.remove(&id);
        self.mismatch.remove(&id);

        debug!(unit = id, "removed unit");
        debug_assert!(self.check_integrity().is_ok());
        Ok(unit)
    }

    fn require(&self, id: UnitId) -> Result<()> {
        if self.units.contains_key(&id) {
            Ok(())
        } else {
            Err(NetworkError::UnknownUnit(id))
        }
    }

    fn require_all(&self, ids: impl IntoIterator<Item = UnitId>) -> Result<()> {
        ids.into_iter().try_for_each(|id| self.require(id))
    }

    fn require_links(&self, links: &[(UnitId, UnitId, f32)]) -> Result<()> {
        self.require_all(links.iter().flat_map(|&(s, t, _)| [s, t]))
    }

    /// Problem (action) links `(source, target, weight)`. A new link's
    /// centroid is 1.0: the source is expected fully active.
    pub fn add_action_links(&mut self, links: &[(UnitId, UnitId, f32)]) -> Result<()> {
        self.require_links(links)?;
        for &(source, target, weight) in links {
            if let Some(unit) = self.units.get_mut(&target) {
                unit.problem_weights.insert(source, weight);
                unit.problem_values.entry(source).or_insert(1.0);
            }
        }
        Ok(())
    }

    /// Goal (prediction) links `(source, target, weight)`; centroid as for
    /// `add_action_links`.
    pub fn add_prediction_links(&mut self, links: &[(UnitId, UnitId, f32)]) -> Result<()> {
        self.require_links(links)?;
        for &(source, target, weight) in links {
            if let Some(unit) = self.units.get_mut(&target) {
                unit.goal_weights.insert(source, weight);
                unit.goal_values.entry(source).or_insert(1.0);
            }
        }
        Ok(())
    }

    pub fn add_lateral_links(&mut self, links: &[(UnitId, UnitId, f32)]) -> Result<()> {
        self.require_links(links)?;
        for &(source, target, weight) in links {
            if let Some(unit) = self.units.get_mut(&target) {
                unit.lateral_weights.insert(source, weight);
            }
        }
        Ok(())
    }

    pub fn add_control_links(&mut self, links: &[(UnitId, UnitId, f32)]) -> Result<()> {
        self.require_links(links)?;
        for &(source, target, weight) in links {
            if let Some(unit) = self.units.get_mut(&target) {
                unit.control_weights.insert(source, weight);
            }
        }
        Ok(())
    }

    /// Problem condition of `target`: each source should read `value`.
    pub fn add_action_pattern(&mut self, target: UnitId, pattern: &[(UnitId, f32)]) -> Result<()> {
        self.require(target)?;
        self.require_all(pattern.iter().map(|&(s, _)| s))?;
        if let Some(unit) = self.units.get_mut(&target) {
            for &(source, value) in pattern {
                unit.problem_weights.insert(source, 1.0);
                unit.problem_values.insert(source, value);
            }
        }
        Ok(())
    }

    /// Goal condition of `target`: each source should read `value`.
    pub fn add_prediction_pattern(
        &mut self,
        target: UnitId,
        pattern: &[(UnitId, f32)],
    ) -> Result<()> {
        self.require(target)?;
        self.require_all(pattern.iter().map(|&(s, _)| s))?;
        if let Some(unit) = self.units.get_mut(&target) {
            for &(source, value) in pattern {
                unit.goal_weights.insert(source, 1.0);
                unit.goal_values.insert(source, value);
            }
        }
        Ok(())
    }

    fn validate_inputs(&self, inputs: &[(UnitId, f32)]) -> Result<()> {
        for &(id, value) in inputs {
            self.require(id)?;
            if !self.in_fs.contains(&id) {
                return Err(NetworkError::NotAnInput(id));
            }
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(NetworkError::InputOutOfRange { id, value });
            }
        }
        Ok(())
    }

    /// Advance the network by one tick.
    ///
    /// Inputs are validated before any state changes. Input units missing
    /// from `inputs` keep their previous value.
    pub fn step<I>(&mut self, time: Time, inputs: I) -> Result<&ActivationMap>
    where
        I: IntoIterator<Item = (UnitId, f32)>,
    {
        let inputs: Vec<(UnitId, f32)> = inputs.into_iter().collect();
        self.validate_inputs(&inputs)?;

        self.update_working_memory(time);
        self.prev_failed = self.failed_fs.clone();
        for pass in 0..self.cfg.reentry {
            self.update(time, &inputs, pass)?;
        }
        self.learn(time);
        self.now = time;

        debug_assert!(self.check_integrity().is_ok());
        Ok(&self.activation)
    }

    /// One convergence pass: clamp inputs, update goal, hidden and output
    /// units, release units of reached goals, commit and log.
    pub fn update(&mut self, time: Time, inputs: &[(UnitId, f32)], pass: usize) -> Result<()> {
        self.validate_inputs(inputs)?;

        for &(id, value) in inputs {
            if let Some(unit) = self.units.get_mut(&id) {
                unit.set_fs_activation(value);
                unit.was_used = false;
            }
        }

        let goals: Vec<UnitId> = self.goal_fs.iter().copied().collect();
        for &id in &goals {
            self.update_unit(id, time);
        }

        // Hidden and tentative units in one ascending id walk. Later units see
        // the flags of earlier ones as already updated.
        let mut hidden: Vec<UnitId> = self
            .hidden_fs
            .iter()
            .chain(self.working_memory.iter())
            .copied()
            .collect();
        hidden.sort_unstable();
        for id in hidden {
            self.update_unit(id, time);
        }

        self.upd_out(time);

        for &goal in &goals {
            let reached = self
                .units
                .get(&goal)
                .is_some_and(|g| g.mismatch >= g.params.pr_threshold);
            if reached {
                self.reset_used_fs(goal);
            }
        }

        for unit in self.units.values_mut() {
            if !unit.is_input {
                unit.commit();
            }
        }

        self.log_activity(time, pass);
        Ok(())
    }

    /// Read peers that are active and not yet spent in this episode.
    fn read_state(&self, owner: UnitId, weights: &WeightMap) -> WeightMap {
        weights
            .keys()
            .filter_map(|&peer_id| {
                let peer = self.units.get(&peer_id);
                debug_assert!(peer.is_some(), "unit {owner} links to missing unit {peer_id}");
                let peer = peer?;
                (peer.is_active && !peer.was_used).then_some((peer_id, peer.old_activity))
            })
            .collect()
    }

    fn refresh_inputs(&mut self, id: UnitId) {
        let Some(unit) = self.units.get(&id) else {
            return;
        };
        let problem = self.read_state(id, &unit.problem_weights);
        let goal = self.read_state(id, &unit.goal_weights);
        let lateral = self.read_state(id, &unit.lateral_weights);
        let control = self.read_state(id, &unit.control_weights);

        if let Some(unit) = self.units.get_mut(&id) {
            unit.problem_state = problem;
            unit.goal_state = goal;
            unit.lateral_state = lateral;
            unit.control_state = control;
        }
    }

    fn update_unit(&mut self, id: UnitId, time: Time) -> Option<f32> {
        self.refresh_inputs(id);
        let unit = self.units.get_mut(&id)?;
        let (activity, _) = unit.update(time, &mut self.rng);
        Some(activity)
    }

    /// Update outputs, then enforce a single acting output.
    ///
    /// With no output active, one is drawn with probability proportional to
    /// activity (uniformly if all are silent) and forced active. Otherwise
    /// every output but the most active one is silenced.
    fn upd_out(&mut self, time: Time) {
        let outs: Vec<UnitId> = self.out_fs.iter().copied().collect();
        let mut max_out: Option<(UnitId, f32)> = None;
        for &id in &outs {
            if let Some(a) = self.update_unit(id, time) {
                if max_out.map_or(true, |(_, best)| a > best) {
                    max_out = Some((id, a));
                }
            }
        }
        let Some((max_id, _)) = max_out else {
            return;
        };

        let any_active = outs
            .iter()
            .any(|id| self.units.get(id).is_some_and(|u| u.is_active));

        if any_active {
            for id in outs {
                if id != max_id {
                    if let Some(unit) = self.units.get_mut(&id) {
                        unit.is_active = false;
                    }
                }
            }
        } else {
            let candidates: Vec<(UnitId, f32)> = outs
                .iter()
                .filter_map(|id| self.units.get(id).map(|u| (*id, u.activity)))
                .collect();
            let draw = self.rng.next_f32_01();
            if let Some(winner) = prob_sel(&candidates, draw) {
                if let Some(unit) = self.units.get_mut(&winner) {
                    unit.is_active = true;
                }
                trace!(unit = winner, "output drawn");
            }
        }
    }

    /// Rebuild the per-pass id lists and append a history frame.
    pub fn log_activity(&mut self, time: Time, pass: usize) {
        self.activation = self.units.iter().map(|(&id, u)| (id, u.activity)).collect();
        self.mismatch = self.units.iter().map(|(&id, u)| (id, u.mismatch)).collect();

        let ids_where = |pred: fn(&Unit) -> bool| -> Vec<UnitId> {
            self.units
                .iter()
                .filter(|(_, u)| pred(u))
                .map(|(&id, _)| id)
                .collect()
        };
        self.activated_fs = ids_where(|u| u.is_active);
        self.failed_fs = ids_where(|u| u.failed && !u.is_learning);
        self.learning_fs = ids_where(|u| u.is_learning);
        self.used_fs = ids_where(|u| u.was_used);

        let failed = &self.failed_fs;
        self.matched_fs = self
            .prev_failed
            .iter()
            .copied()
            .filter(|id| !failed.contains(id))
            .collect();

        trace!(
            time,
            pass,
            active = self.activated_fs.len(),
            failed = self.failed_fs.len(),
            matched = self.matched_fs.len(),
            "pass logged"
        );

        if self.cfg.record_history {
            let frame_time = time + pass as Time / self.cfg.reentry as Time;
            self.history.push_back(HistoryFrame {
                time: frame_time,
                activation: self.activation.clone(),
                mismatch: self.mismatch.clone(),
            });
            if self.cfg.history_limit > 0 {
                while self.history.len() > self.cfg.history_limit {
                    self.history.pop_front();
                }
            }
        }
    }

    /// Clear all dynamic state and discard working memory. Topology is kept.
    pub fn reset_activity(&mut self) {
        let tentative: Vec<UnitId> = self.working_memory.iter().copied().collect();
        for id in tentative {
            if self.remove_fs(id).is_ok() {
                self.discarded_total += 1;
            }
        }
        for unit in self.units.values_mut() {
            unit.reset_activity();
            unit.was_used = false;
        }
        self.activation.clear();
        self.mismatch.clear();
        self.activated_fs.clear();
        self.failed_fs.clear();
        self.matched_fs.clear();
        self.used_fs.clear();
        self.learning_fs.clear();
        self.prev_failed.clear();
    }

    /// Verify that every weight map, goal list and role partition only names
    /// live units.
    pub fn check_integrity(&self) -> Result<()> {
        for (&owner, unit) in &self.units {
            for missing in unit.linked_ids().chain(unit.goal_ids.iter().copied()) {
                if !self.units.contains_key(&missing) {
                    return Err(NetworkError::DanglingReference { owner, missing });
                }
            }
        }
        for set in [
            &self.in_fs,
            &self.goal_fs,
            &self.hidden_fs,
            &self.out_fs,
            &self.working_memory,
        ] {
            self.require_all(set.iter().copied())?;
        }
        Ok(())
    }

    pub fn time(&self) -> Time {
        self.now
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub fn units(&self) -> &BTreeMap<UnitId, Unit> {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn in_fs(&self) -> &BTreeSet<UnitId> {
        &self.in_fs
    }

    pub fn goal_fs(&self) -> &BTreeSet<UnitId> {
        &self.goal_fs
    }

    pub fn hidden_fs(&self) -> &BTreeSet<UnitId> {
        &self.hidden_fs
    }

    pub fn out_fs(&self) -> &BTreeSet<UnitId> {
        &self.out_fs
    }

    pub fn working_memory(&self) -> &BTreeSet<UnitId> {
        &self.working_memory
    }

    pub fn activation(&self) -> &ActivationMap {
        &self.activation
    }

    pub fn mismatch(&self) -> &ActivationMap {
        &self.mismatch
    }

    pub fn activated_fs(&self) -> &[UnitId] {
        &self.activated_fs
    }

    pub fn failed_fs(&self) -> &[UnitId] {
        &self.failed_fs
    }

    pub fn matched_fs(&self) -> &[UnitId] {
        &self.matched_fs
    }

    pub fn used_fs(&self) -> &[UnitId] {
        &self.used_fs
    }

    pub fn learning_fs(&self) -> &[UnitId] {
        &self.learning_fs
    }

    pub fn history(&self) -> &VecDeque<HistoryFrame> {
        &self.history
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            unit_count: self.units.len(),
            input_count: self.in_fs.len(),
            goal_count: self.goal_fs.len(),
            hidden_count: self.hidden_fs.len(),
            output_count: self.out_fs.len(),
            working_memory: self.working_memory.len(),
            link_count: self.units.values().map(Unit::link_count).sum(),
            active_count: self.units.values().filter(|u| u.is_active).count(),
            spawned_total: self.spawned_total,
            promoted_total: self.promoted_total,
            discarded_total: self.discarded_total,
        }
    }
}
