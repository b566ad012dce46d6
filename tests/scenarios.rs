//! End-to-end growth scenarios on a two-input world with a single goal.
//!
//! The world has two states: `START = (1, 0)` and `GOAL = (0, 1)`. Unit ids
//! are assigned in creation order: inputs 0 and 1, outputs 2 and 3, goal 4.

use fsnet::prelude::*;
use fsnet::prng::ScriptedSource;

const GOAL_UNIT: UnitId = 4;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn quiet() -> UnitParams {
    UnitParams::default().with_noise(0.0)
}

fn config() -> NetworkConfig {
    NetworkConfig {
        input_params: quiet(),
        output_params: quiet(),
        goal_params: quiet().with_tau(3.0).with_threshold(0.5),
        spawn_params: quiet().with_tau(1000.0).with_threshold(0.5),
        ..NetworkConfig::default().with_seed(2024)
    }
}

fn start(roles: &Roles) -> [(UnitId, f32); 2] {
    [(roles.inputs[0], 1.0), (roles.inputs[1], 0.0)]
}

fn goal(roles: &Roles) -> [(UnitId, f32); 2] {
    [(roles.inputs[0], 0.0), (roles.inputs[1], 1.0)]
}

fn world<R: RandomSource>(net: &mut Network<R>) -> Roles {
    let roles = net.init_ctrl_net(2, 2, 1);
    let g = roles.goals[0];
    assert_eq!(g, GOAL_UNIT);
    net.add_action_pattern(g, &start(&roles)).unwrap();
    net.add_prediction_pattern(g, &goal(&roles)).unwrap();
    roles
}

#[test]
fn unreached_goal_grows_working_memory_every_tick() {
    init_tracing();
    let mut net = Network::new(config()).unwrap();
    let roles = world(&mut net);

    for t in 0..6 {
        net.step(t as Time, start(&roles)).unwrap();
        assert!(net.hidden_fs().is_empty());
        assert_eq!(net.working_memory().len(), t + 1);
    }
    // Goal engaged at tick 0 and timed out at tick 3.
    assert_eq!(net.failed_fs(), &[GOAL_UNIT]);
    assert!(net.unit(GOAL_UNIT).unwrap().was_used);
    assert!(net.check_integrity().is_ok());
}

#[test]
fn reaching_the_goal_promotes_the_episode() {
    init_tracing();
    let mut net = Network::new(config()).unwrap();
    let roles = world(&mut net);

    for t in 0..6 {
        net.step(t as Time, start(&roles)).unwrap();
    }
    let episode: Vec<UnitId> = net.working_memory().iter().copied().collect();
    assert_eq!(episode.len(), 6);

    net.step(6.0, goal(&roles)).unwrap();
    assert_eq!(net.matched_fs(), &[GOAL_UNIT]);
    assert!(net.failed_fs().is_empty());

    let hidden: Vec<UnitId> = net.hidden_fs().iter().copied().collect();
    assert_eq!(hidden, episode);
    // One fresh spawn for the goal-state context.
    assert_eq!(net.working_memory().len(), 1);

    for &id in &episode {
        let unit = net.unit(id).unwrap();
        assert!(!unit.is_learning);
        assert_eq!(unit.params.tau, (6.0 - unit.start_time).max(1.0));
        assert_eq!(unit.goal_values[&roles.inputs[0]], 0.0);
        assert_eq!(unit.goal_values[&roles.inputs[1]], 1.0);
        assert_eq!(unit.goal_ids, vec![GOAL_UNIT]);
    }
    assert_eq!(net.unit(episode[0]).unwrap().params.tau, 6.0);
    assert_eq!(net.unit(episode[5]).unwrap().params.tau, 1.0);
}

#[test]
fn learned_units_recognize_the_start_state_again() {
    init_tracing();
    let mut net = Network::new(config()).unwrap();
    let roles = world(&mut net);

    for t in 0..6 {
        net.step(t as Time, start(&roles)).unwrap();
    }
    let episode: Vec<UnitId> = net.working_memory().iter().copied().collect();
    net.step(6.0, goal(&roles)).unwrap();

    // Still at the goal: the learned units stay silent, one more spawn.
    net.step(7.0, goal(&roles)).unwrap();
    assert!(episode.iter().all(|id| !net.unit(*id).unwrap().is_active));
    let pending: Vec<UnitId> = net.working_memory().iter().copied().collect();
    assert_eq!(pending.len(), 2);

    // Back at the start: the episode fires, explains the context, and the
    // pending units are promoted with succession links from it.
    net.step(8.0, start(&roles)).unwrap();
    assert!(episode.iter().all(|id| net.unit(*id).unwrap().is_active));
    assert!(net.working_memory().is_empty());
    assert_eq!(net.hidden_fs().len(), episode.len() + pending.len());

    for &id in &pending {
        let unit = net.unit(id).unwrap();
        for &h in &episode {
            assert_eq!(unit.lateral_weights.get(&h), Some(&0.1));
        }
    }
    assert_eq!(net.diagnostics().spawned_total, 8);
    assert_eq!(net.diagnostics().promoted_total, 8);
    assert!(net.check_integrity().is_ok());
}

#[test]
fn removing_a_goal_leaves_no_dangling_links() {
    let mut net = Network::new(config()).unwrap();
    let roles = world(&mut net);
    for t in 0..4 {
        net.step(t as Time, start(&roles)).unwrap();
    }

    let goal_unit = net.remove_fs(GOAL_UNIT).unwrap();
    assert_eq!(goal_unit.control_weights.len(), 4);
    assert!(net.goal_fs().is_empty());
    for unit in net.units().values() {
        assert!(!unit.references(GOAL_UNIT));
        assert!(!unit.goal_ids.contains(&GOAL_UNIT));
    }
    assert!(net.check_integrity().is_ok());

    // The network keeps running without its goal.
    net.step(4.0, start(&roles)).unwrap();
    assert!(net.check_integrity().is_ok());
}

#[test]
fn spawned_problem_links_match_active_inputs() {
    let mut net = Network::new(config()).unwrap();
    let roles = world(&mut net);

    net.step(0.0, [(roles.inputs[1], 1.0)]).unwrap();
    let id = *net.working_memory().iter().next().unwrap();
    let keys: Vec<UnitId> = net.unit(id).unwrap().problem_weights.keys().copied().collect();
    assert_eq!(keys, vec![roles.inputs[1]]);

    // Once clamped, an input stays active on later ticks.
    net.step(1.0, [(roles.inputs[0], 0.0)]).unwrap();
    let id = *net.working_memory().iter().last().unwrap();
    let keys: Vec<UnitId> = net.unit(id).unwrap().problem_weights.keys().copied().collect();
    assert_eq!(keys, roles.inputs);
}

#[test]
fn same_seed_replays_the_same_run() {
    let run = |seed: u64| {
        let cfg = NetworkConfig {
            input_params: UnitParams::default(),
            output_params: UnitParams::default().with_noise(0.05),
            ..config()
        }
        .with_seed(seed);
        let mut net = Network::new(cfg).unwrap();
        let roles = world(&mut net);
        let mut trace = Vec::new();
        for t in 0..20 {
            let inputs = if t % 5 == 4 { goal(&roles) } else { start(&roles) };
            net.step(t as Time, inputs).unwrap();
            trace.push((
                net.activated_fs().to_vec(),
                net.working_memory().len(),
                net.hidden_fs().len(),
            ));
        }
        (trace, net.history().back().unwrap().activation.clone())
    };

    assert_eq!(run(9), run(9));
}

#[test]
fn scripted_draws_pick_the_acting_output() {
    let mut net = Network::with_random_source(config(), ScriptedSource::constant(0.9)).unwrap();
    let roles = world(&mut net);
    net.step(0.0, start(&roles)).unwrap();

    // Both outputs are equally silent; 0.9 falls in the second half.
    assert!(!net.unit(roles.outputs[0]).unwrap().is_active);
    assert!(net.unit(roles.outputs[1]).unwrap().is_active);

    let spawned = *net.working_memory().iter().next().unwrap();
    let control = &net.unit(spawned).unwrap().control_weights;
    assert_eq!(control.get(&roles.outputs[1]), Some(&2.0));
    assert!(!control.contains_key(&roles.outputs[0]));
}

#[test]
fn reset_between_episodes_keeps_learned_structure() {
    let mut net = Network::new(config()).unwrap();
    let roles = world(&mut net);
    for t in 0..6 {
        net.step(t as Time, start(&roles)).unwrap();
    }
    net.step(6.0, goal(&roles)).unwrap();
    let hidden = net.hidden_fs().clone();

    net.reset_activity();
    assert!(net.working_memory().is_empty());
    assert_eq!(net.hidden_fs(), &hidden);
    assert!(!net.unit(GOAL_UNIT).unwrap().was_used);

    // A fresh episode: the learned units recognize the start state at once.
    net.step(0.0, start(&roles)).unwrap();
    assert!(hidden.iter().all(|id| net.unit(*id).unwrap().is_active));
    assert!(net.working_memory().is_empty());
}
