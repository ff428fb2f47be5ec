//! Proof generation.

use groth16_curve::msm::windowed_msm;
use groth16_field::Fr;
use groth16_qap::{compute_h, Qap};
use groth16_r1cs::R1csError;
use rand::Rng;

use crate::{Groth16Error, Proof, ProvingKey};

/// Produces a proof that `witness` satisfies the circuit behind `pk`.
///
/// `witness` is the full assignment `[1, public..., private...]`. The
/// masking scalars `r` and `s` are drawn fresh from `rng` for every proof;
/// reusing them across proofs leaks the witness.
pub fn prove<R: Rng + ?Sized>(
    pk: &ProvingKey,
    qap: &Qap,
    witness: &[Fr],
    rng: &mut R,
) -> Result<Proof, Groth16Error> {
    let _span = tracing::info_span!(
        "groth16_prove",
        variables = pk.num_variables,
        degree = pk.degree
    )
    .entered();

    if witness.len() != pk.num_variables {
        return Err(R1csError::WitnessShapeMismatch(format!(
            "expected {} variables, got {}",
            pk.num_variables,
            witness.len()
        ))
        .into());
    }
    if !witness[0].is_one() {
        return Err(
            R1csError::WitnessShapeMismatch("constant slot x_0 must be one".to_string()).into(),
        );
    }

    let r = Fr::random(rng);
    let s = Fr::random(rng);

    let a_tau = windowed_msm(witness, &pk.a_query_g1)?;
    let b_tau_g2 = windowed_msm(witness, &pk.b_query_g2)?;
    let b_tau_g1 = windowed_msm(witness, &pk.b_query_g1)?;

    // The quotient rejects witnesses that fail any constraint.
    let a_poly = qap.assemble_a(witness)?;
    let b_poly = qap.assemble_b(witness)?;
    let c_poly = qap.assemble_c(witness)?;
    let h_poly = compute_h(&a_poly, &b_poly, &c_poly, &qap.z)?;

    let mut h_coeffs = h_poly.coeffs().to_vec();
    h_coeffs.resize(pk.degree, Fr::ZERO);
    let h_tau = windowed_msm(&h_coeffs, &pk.h_query_g1)?;

    let private_values = pk.private_part(witness);
    let k_contrib = windowed_msm(&private_values, &pk.k_query_g1)?;

    let pi_a = pk.alpha_g1 + a_tau + pk.delta_g1 * r;
    let pi_b = pk.beta_g2 + b_tau_g2 + pk.delta_g2 * s;
    let pi_b_g1 = pk.beta_g1 + b_tau_g1 + pk.delta_g1 * s;
    let pi_c = h_tau + k_contrib + pi_a * s + pi_b_g1 * r - pk.delta_g1 * (r * s);

    tracing::debug!("proof assembled");

    Ok(Proof {
        a: pi_a,
        b: pi_b,
        c: pi_c,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup;
    use groth16_qap::{r1cs_to_qap, QapError};
    use groth16_r1cs::R1cs;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn fr(v: u64) -> Fr {
        Fr::from(v)
    }

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
    fn test_prove_rejects_wrong_shape() {
        let mut rng = ChaCha20Rng::seed_from_u64(90);
        let r1cs = mul_circuit();
        let crs = setup(&r1cs, &mut rng).unwrap();
        let qap = r1cs_to_qap(&r1cs).unwrap();

        let short = vec![Fr::ONE, fr(3)];
        assert!(matches!(
            prove(&crs.pk, &qap, &short, &mut rng),
            Err(Groth16Error::R1cs(R1csError::WitnessShapeMismatch(_)))
        ));

        let bad_constant = vec![fr(2), fr(3), fr(4), fr(12)];
        assert!(matches!(
            prove(&crs.pk, &qap, &bad_constant, &mut rng),
            Err(Groth16Error::R1cs(R1csError::WitnessShapeMismatch(_)))
        ));
    }

    #[test]
    fn test_prove_rejects_unsatisfying_witness() {
        let mut rng = ChaCha20Rng::seed_from_u64(91);
        let r1cs = mul_circuit();
        let crs = setup(&r1cs, &mut rng).unwrap();
        let qap = r1cs_to_qap(&r1cs).unwrap();

        let bad = vec![Fr::ONE, fr(3), fr(4), fr(13)];
        assert!(matches!(
            prove(&crs.pk, &qap, &bad, &mut rng),
            Err(Groth16Error::Qap(QapError::QapNotSatisfied))
        ));
    }

    #[test]
    fn test_proofs_are_randomized() {
        let mut rng = ChaCha20Rng::seed_from_u64(92);
        let r1cs = mul_circuit();
        let crs = setup(&r1cs, &mut rng).unwrap();
        let qap = r1cs_to_qap(&r1cs).unwrap();
        let witness = vec![Fr::ONE, fr(3), fr(4), fr(12)];

        let proof1 = prove(&crs.pk, &qap, &witness, &mut rng).unwrap();
        let proof2 = prove(&crs.pk, &qap, &witness, &mut rng).unwrap();
        // Fresh masking scalars give distinct proofs for the same witness.
        assert_ne!(proof1.a, proof2.a);
        assert!(crate::verify(&crs.vk, &[fr(12)], &proof1).unwrap());
        assert!(crate::verify(&crs.vk, &[fr(12)], &proof2).unwrap());
    }
}
