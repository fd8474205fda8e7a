use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fundus_enhance_rs::enhancement::filters::novel::ace_me;
use fundus_enhance_rs::enhancement::{EvaluationConfig, Evaluator, GrayImageData};

fn generate_mock_fundus(width: usize, height: usize) -> GrayImageData {
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    let radius = width.min(height) as f64 / 2.0;
    GrayImageData::from_fn(width, height, |x, y| {
        let d = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt() / radius;
        let disc = (180.0 * (1.0 - d).max(0.0)) as u8;
        let vessel = if (x + 2 * y) % 37 < 2 { 40 } else { 0 };
        disc.saturating_sub(vessel)
    })
}

fn benchmark_evaluation_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation_by_size");
    group.sample_size(10);

    let sizes = vec![(128, 128, "128x128"), (256, 256, "256x256"), (512, 512, "512x512")];

    for (width, height, label) in sizes {
        let image = generate_mock_fundus(width, height);

        for (parallel, mode) in [(false, "sequential"), (true, "parallel")] {
            group.bench_with_input(
                BenchmarkId::new(mode, label),
                &image,
                |b, image| {
                    let config = EvaluationConfig::builder().parallel(parallel).build();
                    let evaluator = Evaluator::new(config);

                    b.iter(|| {
                        let _ = evaluator.evaluate(black_box(image));
                    });
                },
            );
        }
    }

    group.finish();
}

fn benchmark_ace_me(c: &mut Criterion) {
    let mut group = c.benchmark_group("ace_me");

    for size in [128usize, 256, 512] {
        let image = generate_mock_fundus(size, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &image, |b, image| {
            b.iter(|| {
                let _ = ace_me(black_box(image));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_evaluation_sizes, benchmark_ace_me);
criterion_main!(benches);
