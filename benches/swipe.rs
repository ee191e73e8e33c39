use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sawtooth::{io, track};

fn bench_swipe(c: &mut Criterion) {
    let sr = 16000;
    let signal = io::tone(220.0, sr, 0.5);

    c.bench_function("swipe_500ms_tone", |b| {
        b.iter(|| {
            track::swipe(black_box(&signal), sr, 100.0, 600.0, 0.3, 0.01).unwrap()
        })
    });

    let mut group = c.benchmark_group("stages");
    let grid = sawtooth::strength::CandidateGrid::new(100.0, 600.0);
    group.bench_function("strength_matrix", |b| {
        b.iter(|| sawtooth::strength::strength_matrix(black_box(&signal), sr, black_box(&grid), 0.01))
    });
    group.finish();
}

criterion_group!(benches, bench_swipe);
criterion_main!(benches);
