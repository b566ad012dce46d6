//! Criterion benchmarks for the network tick.
//!
//! Run with:
//!   cargo bench
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use fsnet::network::{Network, NetworkConfig};
use fsnet::unit::{Unit, UnitParams};

/// Build a network with `hidden` pre-wired hidden units, each recognizing one
/// corner of a `dims`-dimensional binary input space.
fn make_network(dims: usize, hidden: usize, seed: u64) -> (Network, Vec<usize>) {
    let cfg = NetworkConfig {
        record_history: false,
        ..NetworkConfig::default().with_seed(seed)
    };
    let mut net = Network::new(cfg).expect("valid config");
    let roles = net.init_ctrl_net(dims, dims, 1);

    for h in 0..hidden {
        let id = net.add(Unit::new(UnitParams::default().with_tau(5.0).with_threshold(0.5)));
        let pattern: Vec<(usize, f32)> = roles
            .inputs
            .iter()
            .enumerate()
            .map(|(bit, &input)| (input, ((h >> bit) & 1) as f32))
            .collect();
        net.add_action_pattern(id, &pattern).expect("inputs exist");
        let out = roles.outputs[h % dims];
        net.add_action_links(&[(id, out, 1.0)]).expect("units exist");
    }

    (net, roles.inputs)
}

fn corner(inputs: &[usize], t: usize) -> Vec<(usize, f32)> {
    inputs
        .iter()
        .enumerate()
        .map(|(bit, &id)| (id, ((t >> bit) & 1) as f32))
        .collect()
}

/// Benchmark step() with a growing number of hidden units.
fn bench_step_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_hidden");

    for hidden in [16usize, 64, 256].iter() {
        group.throughput(Throughput::Elements(*hidden as u64));

        group.bench_with_input(BenchmarkId::from_parameter(hidden), hidden, |b, &hidden| {
            let (mut net, inputs) = make_network(6, hidden, 42);
            let mut t = 0usize;
            b.iter(|| {
                let state = corner(&inputs, t);
                net.step(t as f32, state).expect("valid inputs");
                // Keep structural growth out of the measurement.
                if t % 32 == 31 {
                    net.reset_activity();
                }
                t += 1;
                black_box(net.activated_fs().len())
            });
        });
    }

    group.finish();
}

/// Benchmark step() across reentry pass counts.
fn bench_reentry(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_reentry");

    for reentry in [1usize, 2, 4].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(reentry), reentry, |b, &reentry| {
            let cfg = NetworkConfig {
                record_history: false,
                ..NetworkConfig::default().with_seed(7).with_reentry(reentry)
            };
            let mut net = Network::new(cfg).expect("valid config");
            let roles = net.init_ctrl_net(4, 4, 1);
            let mut t = 0usize;
            b.iter(|| {
                net.step(t as f32, corner(&roles.inputs, t)).expect("valid inputs");
                if t % 32 == 31 {
                    net.reset_activity();
                }
                t += 1;
                black_box(net.diagnostics().working_memory)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step_sizes, bench_reentry);
criterion_main!(benches);
