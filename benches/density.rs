use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand::rngs::StdRng;
use vorodensity::DensityStrategy;

fn random_points(count: usize, width: f64) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(123456789);
    (0..count)
        .map(|_| [rng.r#gen::<f64>() * width, rng.r#gen::<f64>() * width])
        .collect()
}

fn benchmark_density(c: &mut Criterion) {
    let width = 100.0;
    let mut group = c.benchmark_group("density");
    group.sample_size(10);

    for &size in &[100, 1000, 10_000] {
        let points = random_points(size, width);
        let strategies = [
            ("voronoi", DensityStrategy::Voronoi),
            ("distance_count", DensityStrategy::DistanceCount { search_radius: 5.0 }),
        ];
        for (name, strategy) in strategies {
            group.bench_with_input(BenchmarkId::new(name, size), &points, |b, points| {
                b.iter(|| strategy.estimate(width, points).unwrap())
            });
        }
    }
    group.finish();
}

criterion_group!(benches, benchmark_density);
criterion_main!(benches);
