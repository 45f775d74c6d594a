//! Benchmarks for the AAA fitter
//!
//! Tests performance of the greedy node selection loop and the pole solve.

use baryfit_core::aaa::Aaa;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_complex::Complex64;

/// Runge-type function sampled uniformly on [-1, 1].
fn runge_samples(n: usize) -> (Vec<Complex64>, Vec<Complex64>) {
    let domain: Vec<Complex64> = (0..n)
        .map(|i| Complex64::new(-1.0 + 2.0 * i as f64 / (n - 1) as f64, 0.0))
        .collect();
    let values: Vec<Complex64> = domain
        .iter()
        .map(|&x| 1.0 / (x * x * 25.0 + 1.0))
        .collect();
    (domain, values)
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("aaa_fit");

    for n in [50, 200, 800] {
        let (domain, values) = runge_samples(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            let mut fitter = Aaa::new();
            fitter.max_degree = Some(16);
            b.iter(|| {
                let result = fitter.fit(black_box(&domain), black_box(&values)).unwrap();
                black_box(result.rational.degree())
            });
        });
    }

    group.finish();
}

fn bench_poles(c: &mut Criterion) {
    let (domain, values) = runge_samples(200);
    let mut fitter = Aaa::new();
    fitter.max_degree = Some(16);
    let rational = fitter.fit(&domain, &values).unwrap().rational;

    c.bench_function("poles_200_samples", |b| {
        b.iter(|| black_box(rational.poles().unwrap().len()))
    });
}

criterion_group!(benches, bench_fit, bench_poles);
criterion_main!(benches);
