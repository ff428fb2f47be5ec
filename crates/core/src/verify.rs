//! Proof verification.

use groth16_field::Fr;
use groth16_pairing::pairing_check;

use crate::{Groth16Error, Proof, VerifyingKey};

/// Checks a proof against the public inputs.
///
/// Returns `Ok(false)` for a well-formed but invalid proof; only shape
/// errors are surfaced as `Err`.
pub fn verify(
    vk: &VerifyingKey,
    public_inputs: &[Fr],
    proof: &Proof,
) -> Result<bool, Groth16Error> {
    let _span = tracing::info_span!("groth16_verify", public = public_inputs.len()).entered();

    if public_inputs.len() != vk.num_public {
        return Err(Groth16Error::PublicInputShapeMismatch {
            expected: vk.num_public,
            actual: public_inputs.len(),
        });
    }

    let mut ic = vk.ic_g1[0];
    for (value, point) in public_inputs.iter().zip(&vk.ic_g1[1..]) {
        ic += *point * *value;
    }

    // e(pi_A, pi_B) * e(-alpha, beta) * e(-IC, gamma) * e(-pi_C, delta) = 1
    let accepted = pairing_check(&[
        (proof.a, proof.b),
        (vk.alpha_g1.negate(), vk.beta_g2),
        (ic.negate(), vk.gamma_g2),
        (proof.c.negate(), vk.delta_g2),
    ]);

    tracing::debug!(accepted, "pairing equation evaluated");
    Ok(accepted)
}
