// benches/retarget_bench.rs
// ============================================================================
// Retarget Benchmark
// ============================================================================

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use take2bob::{
    frame::FrameTable,
    mapping::{shadow_to_bob, JointKind, RetargetConfig},
    quat::{Quat, QuatSeries},
    retarget::retarget,
    take::{NodeMap, TakeMetadata},
};

const CHANNELS: &str = r#"{"channels": ["Lq", "r", "c"]}"#;

fn generate_take(num_frame: usize) -> (NodeMap, FrameTable) {
    let meta: TakeMetadata = serde_json::from_str(CHANNELS).unwrap();
    let nodes: Vec<String> = shadow_to_bob().into_iter().map(|j| j.source).collect();
    let stride = nodes.len() * 11;

    let mut rng = rand::thread_rng();
    let flat: Vec<f32> = (0..stride * num_frame).map(|_| rng.gen_range(-1.0..1.0)).collect();

    let map = NodeMap::build(&meta, &nodes, stride).unwrap();
    let table = FrameTable::reshape(&flat, stride, num_frame).unwrap();
    (map, table)
}

fn pre_rotated_config() -> RetargetConfig {
    let pre = Quat::from_axis_angle([0.0, 0.0, 1.0], std::f64::consts::FRAC_PI_2);
    let joints = shadow_to_bob()
        .into_iter()
        .map(|mut j| {
            if !j.kind.has_translation() {
                j.kind = JointKind::PreRotated(pre);
            }
            j
        })
        .collect();
    RetargetConfig::default().with_joints(joints)
}

fn bench_retarget(c: &mut Criterion) {
    let mut group = c.benchmark_group("retarget");

    for frames in [1_000, 10_000, 100_000].iter() {
        let (map, table) = generate_take(*frames);
        let plain = RetargetConfig::default();
        let rotated = pre_rotated_config();

        group.bench_with_input(BenchmarkId::new("Euler", frames), &table, |b, t| {
            b.iter(|| black_box(retarget(&plain, &map, t, 0.01).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("PreRotated", frames), &table, |b, t| {
            b.iter(|| black_box(retarget(&rotated, &map, t, 0.01).unwrap()))
        });
    }

    group.finish();
}

fn bench_conjugate(c: &mut Criterion) {
    let mut group = c.benchmark_group("quat");
    let pre = Quat::from_axis_angle([1.0, 0.0, 0.0], 0.3);

    for frames in [1_000, 100_000].iter() {
        let series = QuatSeries::splat(Quat::from_axis_angle([0.0, 1.0, 0.0], 0.7), *frames);

        group.bench_with_input(BenchmarkId::new("conjugate_by+euler", frames), &series, |b, s| {
            b.iter(|| black_box(s.conjugate_by(pre).unwrap().to_euler_xyz()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_retarget, bench_conjugate);
criterion_main!(benches);
