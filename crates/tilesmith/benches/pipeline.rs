use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use tilesmith::prelude::{
    hash_seed, HolePuncher, Mulberry32, Pipeline, Preset, Settings, Stage, TileKind, TileMap,
};

const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_secs(1);
const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

fn bench_generic_preset(c: &mut Criterion) {
    let mut pipeline = Pipeline::new();
    pipeline
        .apply_preset(&Preset::generic())
        .expect("builtin stages");

    let (width, height) = (30, 20);
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements((width * height) as u64));
    group.bench_function("generic_preset_30x20", |b| {
        b.iter_batched(
            || TileMap::new(width, height).expect("valid dimensions"),
            |mut map| {
                let report = pipeline.run(&mut map, "bench");
                black_box(report);
                black_box(map);
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_hole_puncher(c: &mut Criterion) {
    let bisected = || {
        let mut map = TileMap::new(24, 24).expect("valid dimensions");
        for y in 1..map.height() - 1 {
            map.set_kind(map.width() / 2, y, TileKind::Wall)
                .expect("in range");
        }
        map
    };

    let stage = HolePuncher;
    let settings = stage
        .schema()
        .resolve(&Settings::new().with_number("punch_rate", 0.2));

    let mut group = c.benchmark_group("hole_puncher");
    group.bench_function("bisected_24x24", |b| {
        b.iter_batched(
            bisected,
            |mut map| {
                let mut rng = Mulberry32::new(hash_seed("bench"));
                stage
                    .execute(&mut map, &settings, &mut rng, &mut ())
                    .expect("stage succeeds");
                black_box(map);
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn benches(c: &mut Criterion) {
    bench_generic_preset(c);
    bench_hole_puncher(c);
}

criterion_group! {
    name = pipeline_benches;
    config = default_criterion();
    targets = benches
}
criterion_main!(pipeline_benches);
