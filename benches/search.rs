//! Benchmarks for beat search.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use speac_ga::{
    corpus::GenePool,
    evolution::SearchEngine,
    schema::{Beat, Note, SearchConfig, Step},
};

fn pool(size: usize) -> GenePool {
    let beats = (0..size)
        .map(|i| {
            let step = Step::ALL[i % Step::ALL.len()];
            Beat::two_part(
                vec![
                    Note::new(step, 4 + (i % 2) as i32, 12 + (i % 4) as u32 * 6),
                    Note::new(step.shifted(2), 4, 12),
                    Note::new(step.shifted(4), 5, 24),
                ],
                48,
                vec![Note::new(step, 2, 48), Note::new(step.shifted(4), 2, 24)],
            )
        })
        .collect();
    GenePool::from_beats("bench", beats)
}

fn bench_get_beat(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_beat");

    let seed = Beat::from_notes(vec![
        Note::new(Step::C, 3, 96),
        Note::new(Step::E, 3, 96),
    ]);

    for size in [16, 64, 256] {
        let config = SearchConfig {
            random_seed: Some(42),
            ..Default::default()
        };
        let Ok(mut engine) = SearchEngine::new(pool(size), config) else {
            continue;
        };

        // Unreachable threshold: every iteration runs the full generation cap.
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| engine.get_beat(black_box(&seed), -1.0));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_get_beat);
criterion_main!(benches);
