use criterion::{criterion_group, criterion_main, Criterion};
use irimager::{
    thermal::{celsius_to_sample, to_celsius, TemperatureStats},
    ThermalImage,
};

// Thermal resolutions of the PI and Xi camera families.
const DIMS: [(usize, usize); 4] = [(160, 120), (382, 288), (640, 480), (764, 480)];

fn gradient(width: usize, height: usize) -> ThermalImage {
    ThermalImage::from_shape_fn((height, width), |(y, x)| {
        celsius_to_sample(20.0 + (x + y) as f32 * 0.1)
    })
}

pub fn benchmark_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("celsius");
    for dim in DIMS.iter() {
        let img = gradient(dim.0, dim.1);
        group.bench_with_input(format!("{}x{}", dim.0, dim.1), &img, |b, img| {
            b.iter(|| to_celsius(img.view()))
        });
    }
    group.finish();

    let mut group = c.benchmark_group("stats");
    for dim in DIMS.iter() {
        let img = gradient(dim.0, dim.1);
        group.bench_with_input(format!("{}x{}", dim.0, dim.1), &img, |b, img| {
            b.iter(|| TemperatureStats::of(img.view()))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_convert);
criterion_main!(benches);
