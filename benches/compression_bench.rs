use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, RgbImage};
use img_crush::encode::encode_image;
use img_crush::{adaptive_quality, package_for_download, plan_dimensions, BatchItem, EncodePlan, OutputFormat};

fn test_image(width: u32, height: u32) -> DynamicImage {
    let buf = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(buf)
}

fn bench_plan_dimensions(c: &mut Criterion) {
    c.bench_function("plan_dimensions", |b| {
        b.iter(|| {
            plan_dimensions(
                black_box(4032),
                black_box(3024),
                black_box(Some(1920)),
                black_box(Some(1080)),
                black_box(true),
            )
        })
    });
}

fn bench_adaptive_quality(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaptive_quality");
    for size in [40 * 1024u64, 200 * 1024, 2 * 1024 * 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| adaptive_quality(black_box(size), black_box(80)))
        });
    }
    group.finish();
}

fn bench_encode_formats(c: &mut Criterion) {
    let img = test_image(640, 480);
    let plan = EncodePlan {
        width: 640,
        height: 480,
        quality: 70,
        effort: 4,
    };

    let mut group = c.benchmark_group("encode");
    group.sample_size(10);
    for format in [OutputFormat::WebP, OutputFormat::Jpeg, OutputFormat::Png] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format.name()),
            &format,
            |b, &format| b.iter(|| encode_image(black_box(&img), &plan, format).unwrap()),
        );
    }
    group.finish();
}

fn bench_encode_with_resize(c: &mut Criterion) {
    let img = test_image(1920, 1080);
    let plan = EncodePlan {
        width: 640,
        height: 360,
        quality: 70,
        effort: 4,
    };

    let mut group = c.benchmark_group("encode_resized");
    group.sample_size(10);
    group.bench_function("webp_1080p_to_360p", |b| {
        b.iter(|| encode_image(black_box(&img), &plan, OutputFormat::WebP).unwrap())
    });
    group.finish();
}

fn bench_archive_packaging(c: &mut Criterion) {
    c.bench_function("package_16_items", |b| {
        b.iter_batched(
            || {
                (0..16)
                    .map(|i| BatchItem::new(vec![i as u8; 32 * 1024], format!("img_{}.webp", i)))
                    .collect::<Vec<_>>()
            },
            |items| package_for_download(black_box(items)).unwrap(),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_plan_dimensions,
    bench_adaptive_quality,
    bench_encode_formats,
    bench_encode_with_resize,
    bench_archive_packaging
);
criterion_main!(benches);
