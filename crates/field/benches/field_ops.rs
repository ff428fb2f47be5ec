use criterion::{black_box, criterion_group, criterion_main, Criterion};
use groth16_field::{Fq12, Fq2, Fq6, Fr};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn bench_fr_ops(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(99);
    let a = Fr::random(&mut rng);
    let b = Fr::random(&mut rng);

    c.bench_function("fr_mul", |bench| bench.iter(|| black_box(a) * black_box(b)));
    c.bench_function("fr_square", |bench| bench.iter(|| black_box(a).square()));
    c.bench_function("fr_inverse", |bench| bench.iter(|| black_box(a).inverse()));
}

fn bench_tower_ops(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(100);
    let f2 = Fq2::new(
        groth16_field::Fq::random(&mut rng),
        groth16_field::Fq::random(&mut rng),
    );
    let f6 = Fq6::new(f2, f2.square(), f2.mul_by_nonresidue());
    let f12 = Fq12::new(f6, f6.square());

    c.bench_function("fq2_mul", |bench| {
        bench.iter(|| black_box(f2) * black_box(f2))
    });
    c.bench_function("fq6_mul", |bench| {
        bench.iter(|| black_box(f6) * black_box(f6))
    });
    c.bench_function("fq12_mul", |bench| {
        bench.iter(|| black_box(f12) * black_box(f12))
    });
    c.bench_function("fq12_final_exponentiation", |bench| {
        bench.iter(|| black_box(f12).final_exponentiation())
    });
}

criterion_group!(benches, bench_fr_ops, bench_tower_ops);
criterion_main!(benches);
