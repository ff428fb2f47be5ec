use criterion::{criterion_group, criterion_main, Criterion};
use groth16_core::{prove, setup, verify};
use groth16_field::Fr;
use groth16_qap::r1cs_to_qap;
use groth16_r1cs::R1cs;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// A chain of n squaring constraints: x_{i+1} = x_i^2.
fn squaring_chain(n: usize) -> (R1cs, Vec<Fr>) {
    let mut r1cs = R1cs::new();
    let mut vars = vec![r1cs.allocate_var()];
    for _ in 0..n {
        let next = r1cs.allocate_var();
        let prev = *vars.last().unwrap();
        r1cs.add_mul(prev, prev, next).unwrap();
        vars.push(next);
    }
    r1cs.mark_public(*vars.last().unwrap()).unwrap();
    r1cs.finalize();

    let mut witness = vec![Fr::ONE, Fr::from(3u64)];
    for i in 0..n {
        let prev = witness[i + 1];
        witness.push(prev * prev);
    }
    (r1cs, witness)
}

fn bench_pipeline(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let (r1cs, witness) = squaring_chain(8);
    let crs = setup(&r1cs, &mut rng).unwrap();
    let qap = r1cs_to_qap(&r1cs).unwrap();
    let public = vec![*witness.last().unwrap()];
    let proof = prove(&crs.pk, &qap, &witness, &mut rng).unwrap();

    c.bench_function("setup_8_constraints", |b| {
        b.iter(|| setup(&r1cs, &mut rng).unwrap())
    });
    c.bench_function("prove_8_constraints", |b| {
        b.iter(|| prove(&crs.pk, &qap, &witness, &mut rng).unwrap())
    });
    c.bench_function("verify", |b| {
        b.iter(|| verify(&crs.vk, &public, &proof).unwrap())
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
