use criterion::{criterion_group, criterion_main, Criterion, black_box};

use unbound::geometry::icosphere::{build_icosphere, build_icosphere_with_passes};
use unbound::geometry::grid::{build_grid, GridSpec};
use unbound::terrain::TerrainHeightField;

fn bench_icosphere(c: &mut Criterion) {
    c.bench_function("icosphere_3_passes", |b| {
        b.iter(|| build_icosphere(black_box(3.0), false));
    });

    c.bench_function("icosphere_4_passes", |b| {
        b.iter(|| build_icosphere_with_passes(black_box(8000.0), 4, true));
    });
}

fn bench_terrain_grid(c: &mut Criterion) {
    let size = 257usize;
    let heights: Vec<f32> = (0..size * size)
        .map(|i| ((i % size) as f32 * 0.1).sin() * 20.0 + ((i / size) as f32 * 0.07).cos() * 15.0)
        .collect();
    let spec = GridSpec::new(size, size, 10.0, 1.0);

    c.bench_function("terrain_grid_257", |b| {
        b.iter(|| build_grid(black_box(&spec), black_box(&heights)));
    });
}

fn bench_height_queries(c: &mut Criterion) {
    let size = 257usize;
    let heights: Vec<f32> = (0..size * size)
        .map(|i| ((i % size) as f32 * 0.1).sin() * 20.0)
        .collect();
    let field = TerrainHeightField::from_heights(size, size, 10.0, 1.0, heights).unwrap();

    c.bench_function("height_query_1k", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for i in 0..1000 {
                let x = (i as f32 * 1.37) % 2500.0 - 1250.0;
                let z = (i as f32 * 2.11) % 2500.0 - 1250.0;
                sum += field.height(black_box(x), black_box(z));
            }
            sum
        });
    });

    c.bench_function("slope_query_1k", |b| {
        b.iter(|| {
            let mut steep = 0;
            for i in 0..1000 {
                let x = (i as f32 * 1.37) % 2500.0 - 1250.0;
                let z = (i as f32 * 2.11) % 2500.0 - 1250.0;
                if field.is_steep_incline(black_box(x), black_box(z), 0.7) {
                    steep += 1;
                }
                black_box(field.slope_direction(x, z));
            }
            steep
        });
    });
}

criterion_group!(benches, bench_icosphere, bench_terrain_grid, bench_height_queries);
criterion_main!(benches);
