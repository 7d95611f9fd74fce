use core::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};

use drape_core::mesh_importer::{shapes, ImportConfig};
use drape_core::{FrameInteraction, Grab, Solver};
use nalgebra::Vector3;

fn bench_sphere(c: &mut Criterion, subdivisions: u32, step_count: u32) {
    let mut solver = Solver::new();
    let size = solver
        .load_mesh(&shapes::icosphere(subdivisions, 1.0), &ImportConfig::DEFAULT)
        .expect("icosphere import failed");

    let interaction = FrameInteraction {
        grab: Some(Grab {
            vertex: 0,
            target: solver.rest_position(0).unwrap_or_default() * 1.2 + Vector3::new(0.0, 0.0, 0.1),
        }),
        ..Default::default()
    };

    let mut group = c.benchmark_group("stepping");
    group.sample_size(100);
    group.throughput(criterion::Throughput::Elements(
        u64::from(step_count) * u64::from(size.vertices),
    ));
    group.bench_function(
        format!("icosphere_{subdivisions}_{}_vertices_{step_count}_step", size.vertices),
        |b| {
            b.iter(|| {
                for _ in 0..step_count {
                    black_box(solver.step(1.0 / 60.0, &interaction).unwrap());
                }
            })
        },
    );
}

fn stepping_benchmark(c: &mut Criterion) {
    bench_sphere(c, 3, 10);
    bench_sphere(c, 4, 1);
}

criterion_group!(benches, stepping_benchmark);
criterion_main!(benches);
