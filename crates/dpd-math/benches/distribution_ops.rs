//! Criterion benchmarks for `dpd-math`.
//!
//! Focus on the kernels that sit inside the simulation loop: Beta-Binomial
//! quantiles for threshold resolution and Laplace noise draws per trial.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dpd_math::beta_binomial::{self, BetaBinomial};
use dpd_math::laplace::Laplace;
use dpd_math::{fit_beta_mle, BetaParams};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_beta_binomial(c: &mut Criterion) {
    let mut group = c.benchmark_group("beta_binomial");
    let params = BetaParams {
        alpha: 2.0,
        beta: 198.0,
    };

    for exponent in [4u32, 6, 8] {
        let n = 10u64.pow(exponent);
        group.bench_with_input(BenchmarkId::new("quantile_median", n), &n, |b, &n| {
            b.iter(|| black_box(beta_binomial::quantile(black_box(0.5), n, &params)));
        });
    }

    let dist = BetaBinomial::new(10_000, params);
    if let Some(dist) = dist {
        group.bench_function("sample_1k", |b| {
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| black_box(dist.sample_n(&mut rng, 1_000)));
        });
    }

    group.finish();
}

fn bench_laplace(c: &mut Criterion) {
    let mut group = c.benchmark_group("laplace");
    for epsilon in [0.01, 1.0, 16.0] {
        if let Some(noise) = Laplace::mechanism(1.0, epsilon) {
            group.bench_with_input(BenchmarkId::new("sample_1k", epsilon), &noise, |b, noise| {
                let mut rng = StdRng::seed_from_u64(2);
                b.iter(|| black_box(noise.sample_n(&mut rng, 1_000)));
            });
        }
    }
    group.finish();
}

fn bench_fit(c: &mut Criterion) {
    // Deterministic pseudo-rates spread over (0, 0.1).
    let samples: Vec<f64> = (1..=500)
        .map(|i| 0.001 + 0.098 * ((i as f64 * 0.618_033_988_75).fract()))
        .collect();
    c.bench_function("fit_beta_mle_500", |b| {
        b.iter(|| black_box(fit_beta_mle(black_box(&samples))))
    });
}

criterion_group!(benches, bench_beta_binomial, bench_laplace, bench_fit);
criterion_main!(benches);
