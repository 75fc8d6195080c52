use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use tape_targets::detect::{classify, extract, CandidateParams, ColorRange, TapeDetector};

const WIDTH: u32 = 480;
const HEIGHT: u32 = 360;

fn frame(strips: &[[u32; 4]]) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([12, 10, 18]));
    for &[x0, y0, x1, y1] in strips {
        for y in y0..=y1 {
            for x in x0..=x1 {
                img.put_pixel(x, y, Rgb([0, 255, 0]));
            }
        }
    }
    // Speckle so the extractor has small blobs to rank and reject.
    for i in 0..200u32 {
        let (x, y) = ((i * 37) % WIDTH, (i * 91) % HEIGHT);
        img.put_pixel(x, y, Rgb([20, 230, 40]));
    }
    img
}

fn bench_detect(c: &mut Criterion) {
    let detector = TapeDetector::default();
    let whole = frame(&[[100, 100, 140, 200], [265, 100, 305, 200]]);
    let split = frame(&[
        [100, 100, 140, 200],
        [265, 100, 305, 145],
        [265, 156, 305, 200],
    ]);

    c.bench_function("mask_480x360", |b| {
        b.iter(|| classify(black_box(&whole), &ColorRange::default()))
    });

    let mask = classify(&whole, &ColorRange::default());
    c.bench_function("extract_candidates", |b| {
        b.iter(|| extract(black_box(&mask), &CandidateParams::default()))
    });

    c.bench_function("detect_two_strips", |b| {
        b.iter(|| detector.detect(black_box(&whole)))
    });
    c.bench_function("detect_split_strip", |b| {
        b.iter(|| detector.detect(black_box(&split)))
    });
}

criterion_group!(benches, bench_detect);
criterion_main!(benches);
