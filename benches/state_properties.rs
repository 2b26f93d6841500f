use criterion::{criterion_group, criterion_main, Criterion};
use iapws95::{EosOptions, Iapws95, InputMode};
use ndarray::Array1;
use std::hint::black_box;

/// Evaluate all properties for given density and temperature.
fn properties_dt(water: &Iapws95, (density, temperature): (f64, f64)) -> f64 {
    water.properties_dt(density, temperature).speed_of_sound
}

/// Evaluate all properties for given pressure and temperature, including the density
/// iteration.
fn properties_pt(water: &Iapws95, (pressure, temperature): (f64, f64)) -> f64 {
    water.properties_pt(pressure, temperature).density
}

fn state_properties(c: &mut Criterion) {
    let water = Iapws95::new(EosOptions::default()).unwrap();

    let mut group = c.benchmark_group("state_properties_dt");
    for (name, point) in [
        ("liquid", (996.556, 300.0)),
        ("vapor", (0.435, 500.0)),
        ("critical", (358.0, 647.0)),
        ("supercritical", (870.769, 900.0)),
    ] {
        group.bench_function(name, |b| b.iter(|| properties_dt(&water, black_box(point))));
    }
    group.finish();

    let mut group = c.benchmark_group("state_properties_pt");
    for (name, point) in [
        ("liquid", (0.1, 300.0)),
        ("vapor", (0.1, 500.0)),
        ("critical", (22.0384756, 647.0)),
        ("low_density", (1e-4, 900.0)),
    ] {
        group.bench_function(name, |b| b.iter(|| properties_pt(&water, black_box(point))));
    }
    group.finish();
}

fn grid(c: &mut Criterion) {
    let water = Iapws95::new(EosOptions::default()).unwrap();
    let pressures = Array1::linspace(0.1, 100.0, 20);
    let temperatures = Array1::linspace(280.0, 1000.0, 20);
    c.bench_function("grid_pt_20x20", |b| {
        b.iter(|| {
            water.evaluate_grid(
                InputMode::PressureTemperature,
                black_box(pressures.view()),
                black_box(temperatures.view()),
            )
        })
    });
}

criterion_group!(bench, state_properties, grid);
criterion_main!(bench);
