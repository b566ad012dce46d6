use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::aggregate::{exact_match, radial_basis, sigmoid, weighted_sum};
use crate::prng::RandomSource;

pub type UnitId = usize;

/// Simulated time, in ticks. Reentry passes use fractional values.
pub type Time = f32;

/// `peer id -> scalar`, ordered by id so sums are reproducible.
pub type WeightMap = BTreeMap<UnitId, f32>;

/// Feedback share of the previous tick's activity.
const SELF_FEEDBACK: f32 = 0.2;
/// Share of the problem-recognition signal.
const PROBLEM_GAIN: f32 = 0.8;
/// Share of the top-down control signal.
const CONTROL_GAIN: f32 = 0.5;

/// Dynamical parameters of a functional system.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitParams {
    /// Expected problem -> goal transition time, in ticks.
    pub tau: Time,
    /// Activation cutoff in [0, 1].
    pub threshold: f32,
    /// Amplitude of the uniform perturbation added to the raw input.
    pub noise: f32,
    /// Sigmoid steepness and midpoint for activation. `k = 10, x0 = 0.5`
    /// gives 0.5 for a half-matched input and ~1 for a full match.
    pub k: f32,
    pub x0: f32,

    /// Prediction-side sigmoid. Only `pr_threshold` enters the dynamics: a goal
    /// match at or above it counts as the goal being reached.
    pub pr_k: f32,
    pub pr_x0: f32,
    pub pr_threshold: f32,
}

impl Default for UnitParams {
    fn default() -> Self {
        Self {
            tau: 1.0,
            threshold: 0.95,
            noise: 0.001,
            k: 10.0,
            x0: 0.5,
            pr_k: 10.0,
            pr_x0: 0.5,
            pr_threshold: 0.95,
        }
    }
}

impl UnitParams {
    pub fn with_tau(mut self, tau: Time) -> Self {
        self.tau = tau;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_noise(mut self, noise: f32) -> Self {
        self.noise = noise;
        self
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.tau.is_finite() || self.tau <= 0.0 {
            return Err("tau must be finite and > 0");
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err("threshold must be in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.pr_threshold) {
            return Err("pr_threshold must be in [0, 1]");
        }
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err("noise must be finite and >= 0");
        }
        if !self.k.is_finite() || !self.x0.is_finite() {
            return Err("k and x0 must be finite");
        }
        if !self.pr_k.is_finite() || !self.pr_x0.is_finite() {
            return Err("pr_k and pr_x0 must be finite");
        }
        Ok(())
    }
}

/// Lifecycle state, derived from the unit's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnitState {
    /// Waiting for its problem condition.
    Dormant,
    /// Problem recognized; waiting for the goal within `tau`.
    Active,
    /// Timed out without reaching the goal. Cleared by a later goal match.
    Failed,
    /// Tentative unit held in working memory.
    Learning,
}

/// An elementary functional system (FS).
///
/// A unit activates on its problem condition, deactivates on its goal condition
/// and tracks whether the transition happens within `tau` ticks. Peers are
/// referenced by id only; the network owns every unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unit {
    pub id: UnitId,
    /// The unit this one was spawned or copied from. May no longer exist.
    pub parent_id: Option<UnitId>,
    /// Goal units this unit was spawned to serve.
    pub goal_ids: Vec<UnitId>,

    pub problem_weights: WeightMap,
    pub problem_values: WeightMap,
    pub goal_weights: WeightMap,
    pub goal_values: WeightMap,
    pub lateral_weights: WeightMap,
    pub control_weights: WeightMap,

    // Peer activity as seen this pass, filled in by the network.
    pub problem_state: WeightMap,
    pub goal_state: WeightMap,
    pub lateral_state: WeightMap,
    pub control_state: WeightMap,

    pub params: UnitParams,

    pub activity: f32,
    /// Activity committed at the end of the previous pass; what peers read.
    pub old_activity: f32,
    pub mismatch: f32,
    pub on_time: Time,
    pub start_time: Time,
    /// Active flag at the end of the two previous ticks, oldest first.
    pub was_active: [bool; 2],

    pub is_active: bool,
    pub is_learning: bool,
    pub failed: bool,
    /// Already activated during the current goal-directed episode.
    pub was_used: bool,
    pub is_input: bool,
    pub is_output: bool,
    /// Compare inputs by exact equality with the weights instead of the RBF.
    pub exact_input_match: bool,
}

impl Default for Unit {
    fn default() -> Self {
        Self::new(UnitParams::default())
    }
}

impl Unit {
    pub fn new(params: UnitParams) -> Self {
        Self {
            id: 0,
            parent_id: None,
            goal_ids: Vec::new(),
            problem_weights: WeightMap::new(),
            problem_values: WeightMap::new(),
            goal_weights: WeightMap::new(),
            goal_values: WeightMap::new(),
            lateral_weights: WeightMap::new(),
            control_weights: WeightMap::new(),
            problem_state: WeightMap::new(),
            goal_state: WeightMap::new(),
            lateral_state: WeightMap::new(),
            control_state: WeightMap::new(),
            params,
            activity: 0.0,
            old_activity: 0.0,
            mismatch: 0.0,
            on_time: 0.0,
            start_time: 0.0,
            was_active: [false; 2],
            is_active: false,
            is_learning: false,
            failed: false,
            was_used: false,
            is_input: false,
            is_output: false,
            exact_input_match: false,
        }
    }

    pub fn state(&self) -> UnitState {
        if self.is_learning {
            UnitState::Learning
        } else if self.failed {
            UnitState::Failed
        } else if self.is_active {
            UnitState::Active
        } else {
            UnitState::Dormant
        }
    }

    pub fn calc_problem_activation(&self) -> f32 {
        if self.exact_input_match {
            return exact_match(&self.problem_state, &self.problem_weights);
        }
        radial_basis(&self.problem_state, &self.problem_values, &self.problem_weights)
    }

    /// Goal-match score in [0, 1]; stored in `mismatch`.
    pub fn calc_goal_mismatch(&mut self) -> f32 {
        self.mismatch = if self.goal_state.is_empty() {
            0.0
        } else if self.exact_input_match {
            exact_match(&self.goal_state, &self.goal_weights)
        } else {
            radial_basis(&self.goal_state, &self.goal_values, &self.goal_weights)
        };
        self.mismatch
    }

    pub fn calc_lateral_activation(&self) -> f32 {
        weighted_sum(&self.lateral_state, &self.lateral_weights, false)
    }

    pub fn calc_control_activation(&self) -> f32 {
        weighted_sum(&self.control_state, &self.control_weights, false)
    }

    /// Advance the unit by one pass at `time`. Returns `(activity, mismatch)`.
    ///
    /// Reads only the input-state maps; `old_activity` is left for the caller
    /// to commit once every unit of the pass has been computed.
    pub fn update<R: RandomSource + ?Sized>(&mut self, time: Time, rng: &mut R) -> (f32, f32) {
        self.was_active = [self.was_active[1], self.is_active];
        let was_on = self.is_active;

        if self.is_active {
            self.on_time = time - self.start_time;
        }

        let timed_out = self.is_active
            && self.on_time >= self.params.tau
            && !self.was_used
            && !self.is_output
            && !self.is_learning;

        if timed_out {
            if self.calc_goal_mismatch() >= self.params.pr_threshold {
                // Reached, only detected at the deadline. The unit stays
                // available and its timer restarts.
                self.failed = false;
                self.start_time = time;
                self.on_time = 0.0;
            } else {
                self.failed = true;
                self.was_used = true;
                self.activity = 0.0;
                self.is_active = false;
            }
            return (self.activity, self.mismatch);
        }

        let mut raw = SELF_FEEDBACK * self.old_activity
            + PROBLEM_GAIN * self.calc_problem_activation()
            + self.calc_lateral_activation()
            + CONTROL_GAIN * self.calc_control_activation();
        if self.params.noise > 0.0 {
            raw += (1.0 - 2.0 * rng.next_f32_01()) * self.params.noise;
        }
        if !self.is_output {
            raw -= self.calc_goal_mismatch();
        }

        self.activity = sigmoid(raw, self.params.k, self.params.x0);
        self.is_active = self.activity >= self.params.threshold;

        if self.is_active && !was_on && !self.is_learning {
            self.start_time = time;
            self.on_time = 0.0;
        }
        if !self.is_active {
            self.on_time = 0.0;
        }
        if self.mismatch >= self.params.pr_threshold {
            self.failed = false;
            self.on_time = 0.0;
        }

        (self.activity, self.mismatch)
    }

    /// Clamp an externally driven unit to `value`. No threshold test applies.
    pub fn set_fs_activation(&mut self, value: f32) -> f32 {
        self.was_active = [self.was_active[1], self.is_active];
        self.old_activity = value;
        self.activity = value;
        self.is_active = true;
        self.activity
    }

    /// Publish this pass's activity to peers.
    #[inline]
    pub fn commit(&mut self) {
        self.old_activity = self.activity;
    }

    /// Clear dynamic state. Weights, parameters and roles are kept.
    pub fn reset_activity(&mut self) {
        self.failed = false;
        self.is_active = false;
        self.was_active = [false; 2];
        self.mismatch = 0.0;
        self.on_time = 0.0;
        self.activity = 0.0;
        self.old_activity = 0.0;
    }

    /// Whether any of the four weight maps names `id`.
    pub fn references(&self, id: UnitId) -> bool {
        self.problem_weights.contains_key(&id)
            || self.goal_weights.contains_key(&id)
            || self.lateral_weights.contains_key(&id)
            || self.control_weights.contains_key(&id)
    }

    /// Every peer id named by a weight map, in map order (may repeat).
    pub fn linked_ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.problem_weights
            .keys()
            .chain(self.goal_weights.keys())
            .chain(self.lateral_weights.keys())
            .chain(self.control_weights.keys())
            .copied()
    }

    /// Forget every trace of `id`.
    pub fn purge(&mut self, id: UnitId) {
        for m in [
            &mut self.problem_weights,
            &mut self.problem_values,
            &mut self.goal_weights,
            &mut self.goal_values,
            &mut self.lateral_weights,
            &mut self.control_weights,
            &mut self.problem_state,
            &mut self.goal_state,
            &mut self.lateral_state,
            &mut self.control_state,
        ] {
            m.remove(&id);
        }
        self.goal_ids.retain(|&g| g != id);
    }

    pub fn link_count(&self) -> usize {
        self.problem_weights.len()
            + self.goal_weights.len()
            + self.lateral_weights.len()
            + self.control_weights.len()
    }
}
