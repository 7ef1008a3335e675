//! Benchmarks for the CFR engine on 2x2 Dark Hex.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use treeplex_solver::cfr::{CfrConf, CfrSolver, Traverser};
use treeplex_solver::games::{AbruptDarkHex2, DarkHex2};

fn discovery_benchmark(c: &mut Criterion) {
    c.bench_function("dh2_discovery", |b| {
        b.iter(|| black_box(Traverser::<DarkHex2>::new().unwrap().num_partitions()))
    });
}

fn gradient_benchmark(c: &mut Criterion) {
    let mut traverser = Traverser::<AbruptDarkHex2>::new().unwrap();
    let [s0, s1] = traverser.uniform_strategies();

    c.bench_function("adh2_gradients", |b| {
        b.iter(|| {
            traverser.compute_gradients([&s0, &s1]).unwrap();
            black_box(traverser.gradient(0).unwrap()[0])
        })
    });
}

fn step_benchmark(c: &mut Criterion) {
    let traverser = Traverser::<DarkHex2>::new().unwrap();
    let mut solver = CfrSolver::new(traverser, CfrConf::pcfr_plus()).unwrap();

    c.bench_function("dh2_single_step", |b| {
        b.iter(|| {
            solver.step().unwrap();
            black_box(solver.n_iters())
        })
    });
}

criterion_group!(benches, discovery_benchmark, gradient_benchmark, step_benchmark);
criterion_main!(benches);
