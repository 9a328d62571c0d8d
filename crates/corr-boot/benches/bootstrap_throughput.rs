use corr_boot::{bin, bootstrap};
use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::{ArrayD, IxDyn};

fn build_ensemble() -> ArrayD<f64> {
    let values: Vec<f64> = (0..48 * 251).map(|idx| (idx % 97) as f64).collect();
    ArrayD::from_shape_vec(IxDyn(&[48, 251]), values).unwrap()
}

fn bench_bootstrap(c: &mut Criterion) {
    let data = build_ensemble();
    c.bench_function("bootstrap_48x251_b100", |b| {
        b.iter(|| {
            let _ = bootstrap(&data, 100, 1227).unwrap();
        });
    });
    c.bench_function("bin_48x251_size4", |b| {
        b.iter(|| {
            let _ = bin(&data, 4).unwrap();
        });
    });
}

criterion_group!(benches, bench_bootstrap);
criterion_main!(benches);
