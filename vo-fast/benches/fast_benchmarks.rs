use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vo_fast::{
    DetectorBuilder, FastVariant, GrayscaleConverter, GrayscaleImage, NonMaxSuppressor, PixelBuffer,
};

/// Create benchmark image with realistic corner patterns
fn create_benchmark_image(width: usize, height: usize, complexity: &str) -> Vec<u8> {
    let mut img = vec![128; width * height];

    match complexity {
        "simple" => {
            // One bright square in the middle
            let (cx, cy) = (width / 2, height / 2);
            for y in cy.saturating_sub(2)..(cy + 3).min(height) {
                for x in cx.saturating_sub(2)..(cx + 3).min(width) {
                    img[y * width + x] = 255;
                }
            }
        }
        "complex" => {
            // Checkerboard of 8 px cells with varying contrast
            for y in 0..height {
                for x in 0..width {
                    let cell = (x / 8 + y / 8) % 2;
                    let contrast = ((x / 8) * 13 % 90) as u8;
                    img[y * width + x] = if cell == 0 {
                        60 + contrast
                    } else {
                        190 - contrast
                    };
                }
            }
        }
        "realistic" => {
            // Gradient with noise and scattered blobs
            for y in 0..height {
                for x in 0..width {
                    let gradient = ((x as f32 / width as f32) * 50.0) as u8;
                    let noise = ((x * 7 + y * 13) % 11) as u8;
                    img[y * width + x] = 100 + gradient + noise;
                }
            }
            for i in 0..40 {
                let cx = (i * 37 * width / 40) % width;
                let cy = (i * 23 * height / 40) % height;
                for y in cy.saturating_sub(3)..(cy + 4).min(height) {
                    for x in cx.saturating_sub(3)..(cx + 4).min(width) {
                        img[y * width + x] = if i % 2 == 0 { 30 } else { 230 };
                    }
                }
            }
        }
        _ => {}
    }

    img
}

fn to_rgba(gray: &[u8]) -> Vec<u8> {
    gray.iter().flat_map(|&v| [v, v, v, 255]).collect()
}

/// Benchmark full detection pipeline
fn bench_full_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_detection");

    let sizes = [(64, 64), (320, 240), (640, 480)];
    let complexities = ["simple", "complex", "realistic"];
    let pipeline = DetectorBuilder::new().build().unwrap();

    for &(width, height) in &sizes {
        for complexity in &complexities {
            let img = to_rgba(&create_benchmark_image(width, height, complexity));

            group.bench_with_input(
                BenchmarkId::new(format!("{}x{}", width, height), complexity),
                &img,
                |b, img| {
                    b.iter(|| {
                        let buf = PixelBuffer::new(width, height, 4, img);
                        black_box(pipeline.detect(black_box(&buf)).unwrap())
                    })
                },
            );
        }
    }

    group.finish();
}

/// Benchmark FAST-9 vs FAST-12 on the response map alone
fn bench_fast_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("fast_variants");
    let (width, height) = (640, 480);
    let data = create_benchmark_image(width, height, "realistic");
    let img = GrayscaleImage::from_raw(width, height, data).unwrap();

    for variant in [FastVariant::Fast9, FastVariant::Fast12] {
        let pipeline = DetectorBuilder::new().fast_variant(variant).build().unwrap();
        group.bench_function(format!("{:?}", variant), |b| {
            b.iter(|| black_box(pipeline.response_map(black_box(&img))))
        });
    }

    group.finish();
}

/// Benchmark grayscale conversion per channel layout
fn bench_grayscale(c: &mut Criterion) {
    let mut group = c.benchmark_group("grayscale");
    let (width, height) = (640, 480);
    let gray = create_benchmark_image(width, height, "realistic");
    let rgb: Vec<u8> = gray.iter().flat_map(|&v| [v, v, v]).collect();
    let rgba = to_rgba(&gray);

    for (name, channels, data) in [("gray", 1, &gray), ("rgb", 3, &rgb), ("rgba", 4, &rgba)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let buf = PixelBuffer::new(width, height, channels, data);
                black_box(GrayscaleConverter::convert(black_box(&buf)).unwrap())
            })
        });
    }

    group.finish();
}

/// Benchmark non-maximum suppression window sizes
fn bench_suppression(c: &mut Criterion) {
    let mut group = c.benchmark_group("suppression");
    let (width, height) = (640, 480);
    let data = create_benchmark_image(width, height, "complex");
    let img = GrayscaleImage::from_raw(width, height, data).unwrap();
    let pipeline = DetectorBuilder::new().threshold(10).build().unwrap();
    let map = pipeline.response_map(&img);

    for window in [1usize, 3, 5, 7] {
        group.bench_with_input(BenchmarkId::from_parameter(window), &window, |b, &window| {
            b.iter(|| black_box(NonMaxSuppressor::suppress(black_box(&map), window)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_full_detection,
    bench_fast_variants,
    bench_grayscale,
    bench_suppression
);
criterion_main!(benches);
