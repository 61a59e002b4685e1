use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use math_audio_cg::{CgConfig, CsrBuilder, CsrMatrix, DenseVector, cg};

fn laplacian_1d(n: usize) -> CsrMatrix<f64> {
    let mut a = CsrMatrix::with_capacity(n, n, 3 * n);
    for i in 0..n {
        if i > 0 {
            a.set(i, i - 1, -1.0).unwrap();
        }
        a.set(i, i, 2.0).unwrap();
        if i + 1 < n {
            a.set(i, i + 1, -1.0).unwrap();
        }
    }
    a
}

fn bench_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("csr_multiply");
    for n in [1_000, 10_000, 100_000] {
        let a = laplacian_1d(n);
        let x = DenseVector::from_elem(n, 1.0);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(a.multiply(black_box(&x)).unwrap()))
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let n = 10_000;

    c.bench_function("csr_set_ordered_10k", |b| {
        b.iter(|| black_box(laplacian_1d(n)))
    });

    c.bench_function("csr_builder_reversed_10k", |b| {
        b.iter(|| {
            let mut builder = CsrBuilder::with_capacity(n, n, 3 * n);
            for i in (0..n).rev() {
                if i + 1 < n {
                    builder.push(i, i + 1, -1.0).unwrap();
                }
                builder.push(i, i, 2.0).unwrap();
                if i > 0 {
                    builder.push(i, i - 1, -1.0).unwrap();
                }
            }
            black_box(builder.finish())
        })
    });
}

fn bench_cg(c: &mut Criterion) {
    let mut group = c.benchmark_group("cg_laplacian");
    group.sample_size(20);
    for n in [100, 500] {
        let a = laplacian_1d(n);
        let rhs = a.multiply(&DenseVector::from_elem(n, 1.0)).unwrap();
        let config = CgConfig::new(10 * n, 1e-8);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(cg(&a, black_box(&rhs), &config).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_multiply, bench_build, bench_cg);
criterion_main!(benches);
