//! Reference-string derivation from a constraint system.

use groth16_curve::{G1, G2};
use groth16_field::Fr;
use groth16_qap::r1cs_to_qap;
use groth16_r1cs::R1cs;
use rand::Rng;
use rayon::prelude::*;

use crate::{Crs, Groth16Error, ProvingKey, VerifyingKey};

/// Derives a proving and verifying key for the given constraint system.
///
/// Five uniform nonzero scalars `tau, alpha, beta, gamma, delta` are drawn
/// from `rng`, used to evaluate the QAP basis, and discarded when this
/// function returns; they must never leave this scope.
pub fn setup<R: Rng + ?Sized>(r1cs: &R1cs, rng: &mut R) -> Result<Crs, Groth16Error> {
    let _span = tracing::info_span!(
        "groth16_setup",
        constraints = r1cs.n_cons,
        variables = r1cs.n_vars
    )
    .entered();

    let qap = r1cs_to_qap(r1cs)?;

    // Zero draws are rejected up front; gamma and delta in particular are
    // inverted below and the field maps inverse(0) to 0 silently.
    let tau = sample_nonzero(rng);
    let alpha = sample_nonzero(rng);
    let beta = sample_nonzero(rng);
    let gamma = sample_nonzero(rng);
    let delta = sample_nonzero(rng);

    let a_vals: Vec<Fr> = qap.a_basis.par_iter().map(|p| p.evaluate(&tau)).collect();
    let b_vals: Vec<Fr> = qap.b_basis.par_iter().map(|p| p.evaluate(&tau)).collect();
    let c_vals: Vec<Fr> = qap.c_basis.par_iter().map(|p| p.evaluate(&tau)).collect();
    let z_tau = qap.z.evaluate(&tau);

    let gamma_inv = gamma.inverse();
    let delta_inv = delta.inverse();

    let g1 = G1::generator();
    let g2 = G2::generator();

    let a_query_g1: Vec<G1> = a_vals.par_iter().map(|v| g1 * *v).collect();
    let b_query_g2: Vec<G2> = b_vals.par_iter().map(|v| g2 * *v).collect();
    let b_query_g1: Vec<G1> = b_vals.par_iter().map(|v| g1 * *v).collect();

    let mut public_indices = r1cs.public_indices.clone();
    public_indices.sort_unstable();

    let private_indices: Vec<usize> = (1..qap.n)
        .filter(|i| !public_indices.contains(i))
        .collect();
    let k_query_g1: Vec<G1> = private_indices
        .par_iter()
        .map(|&i| {
            let scalar = (beta * a_vals[i] + alpha * b_vals[i] + c_vals[i]) * delta_inv;
            g1 * scalar
        })
        .collect();

    // tau^k * Z(tau) / delta for k in [0, m).
    let mut h_scalars = Vec::with_capacity(qap.m);
    let mut tau_pow = Fr::ONE;
    for _ in 0..qap.m {
        h_scalars.push(tau_pow * z_tau * delta_inv);
        tau_pow *= tau;
    }
    let h_query_g1: Vec<G1> = h_scalars.par_iter().map(|v| g1 * *v).collect();

    let mut ic_scalars = Vec::with_capacity(public_indices.len() + 1);
    ic_scalars.push((beta * a_vals[0] + alpha * b_vals[0] + c_vals[0]) * gamma_inv);
    for &i in &public_indices {
        ic_scalars.push((beta * a_vals[i] + alpha * b_vals[i] + c_vals[i]) * gamma_inv);
    }
    let ic_g1: Vec<G1> = ic_scalars.par_iter().map(|v| g1 * *v).collect();

    let vk = VerifyingKey {
        alpha_g1: g1 * alpha,
        beta_g2: g2 * beta,
        gamma_g2: g2 * gamma,
        delta_g2: g2 * delta,
        ic_g1,
        num_public: public_indices.len(),
    };

    let pk = ProvingKey {
        alpha_g1: g1 * alpha,
        beta_g1: g1 * beta,
        beta_g2: g2 * beta,
        delta_g1: g1 * delta,
        delta_g2: g2 * delta,
        a_query_g1,
        b_query_g2,
        b_query_g1,
        k_query_g1,
        h_query_g1,
        num_variables: qap.n,
        degree: qap.m,
        public_indices,
    };

    tracing::debug!(
        a_query = pk.a_query_g1.len(),
        k_query = pk.k_query_g1.len(),
        h_query = pk.h_query_g1.len(),
        ic = vk.ic_g1.len(),
        "reference string derived"
    );

    Ok(Crs { pk, vk })
}

fn sample_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Fr {
    loop {
        let v = Fr::random(rng);
        if !v.is_zero() {
            return v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn mul_circuit() -> R1cs {
        let mut r1cs = R1cs::new();
        let x1 = r1cs.allocate_var();
        let x2 = r1cs.allocate_var();
        let x3 = r1cs.allocate_var();
        r1cs.add_mul(x1, x2, x3).unwrap();
        r1cs.mark_public(x3).unwrap();
        r1cs.finalize();
        r1cs
    }

    #[test]
    fn test_key_shapes() {
        let mut rng = ChaCha20Rng::seed_from_u64(80);
        let r1cs = mul_circuit();
        let crs = setup(&r1cs, &mut rng).unwrap();

        assert_eq!(crs.pk.num_variables, 4);
        assert_eq!(crs.pk.degree, 1);
        assert_eq!(crs.pk.a_query_g1.len(), 4);
        assert_eq!(crs.pk.b_query_g2.len(), 4);
        assert_eq!(crs.pk.b_query_g1.len(), 4);
        // Two private variables: x1 and x2.
        assert_eq!(crs.pk.k_query_g1.len(), 2);
        assert_eq!(crs.pk.h_query_g1.len(), 1);
        // Constant slot plus one public input.
        assert_eq!(crs.vk.ic_g1.len(), 2);
        assert_eq!(crs.vk.num_public, 1);
    }

    #[test]
    fn test_setup_points_on_curve() {
        let mut rng = ChaCha20Rng::seed_from_u64(81);
        let crs = setup(&mul_circuit(), &mut rng).unwrap();
        assert!(crs.pk.alpha_g1.is_on_curve());
        assert!(crs.pk.beta_g2.is_on_curve());
        assert!(crs.pk.a_query_g1.iter().all(|p| p.is_on_curve()));
        assert!(crs.pk.b_query_g2.iter().all(|p| p.is_on_curve()));
        assert!(crs.vk.ic_g1.iter().all(|p| p.is_on_curve()));
    }

    #[test]
    fn test_distinct_entropy_distinct_keys() {
        let r1cs = mul_circuit();
        let mut rng1 = ChaCha20Rng::seed_from_u64(1);
        let mut rng2 = ChaCha20Rng::seed_from_u64(2);
        let crs1 = setup(&r1cs, &mut rng1).unwrap();
        let crs2 = setup(&r1cs, &mut rng2).unwrap();
        assert_ne!(crs1.pk.alpha_g1, crs2.pk.alpha_g1);
        // Same entropy reproduces the same keys.
        let mut rng1_again = ChaCha20Rng::seed_from_u64(1);
        let crs1_again = setup(&r1cs, &mut rng1_again).unwrap();
        assert_eq!(crs1.pk.alpha_g1, crs1_again.pk.alpha_g1);
        assert_eq!(crs1.vk.ic_g1[0], crs1_again.vk.ic_g1[0]);
    }
}
