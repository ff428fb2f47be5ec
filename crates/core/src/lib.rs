//! The Groth16 protocol over BN254.
//!
//! Three operations make up the public surface: [`setup`] derives a
//! circuit-specific reference string from a constraint system, [`prove`]
//! produces a three-point proof from a full witness, and [`verify`] checks
//! a proof against the public inputs with four pairings.
//!
//! Entropy is always an explicit [`rand::Rng`] parameter; the crate keeps
//! no global state.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
mod keys;
mod prove;
mod setup;
mod verify;

pub use keys::{Crs, Proof, ProvingKey, VerifyingKey};
pub use prove::prove;
pub use setup::setup;
pub use verify::verify;

pub use groth16_curve;
pub use groth16_field;
pub use groth16_pairing;
pub use groth16_poly;
pub use groth16_qap;
pub use groth16_r1cs;

use groth16_field::Fr;
use groth16_r1cs::R1cs;
use rand::Rng;

/// Errors surfaced by setup, prove and verify.
#[derive(Debug, thiserror::Error)]
pub enum Groth16Error {
    /// Public input vector length differs from the verifying key.
    #[error("public input shape mismatch: expected {expected}, got {actual}")]
    PublicInputShapeMismatch {
        /// Number of public inputs the key was built for.
        expected: usize,
        /// Number of public inputs supplied.
        actual: usize,
    },

    /// Underlying QAP failure, including an unsatisfied witness.
    #[error(transparent)]
    Qap(#[from] groth16_qap::QapError),

    /// Underlying constraint-system failure.
    #[error(transparent)]
    R1cs(#[from] groth16_r1cs::R1csError),

    /// Underlying curve failure.
    #[error(transparent)]
    Curve(#[from] groth16_curve::CurveError),
}

/// End-to-end convenience: runs setup, assembles the full witness from a
/// public/private split, proves, and verifies the resulting proof.
pub fn test_circuit<R: Rng + ?Sized>(
    r1cs: &R1cs,
    public_values: &[Fr],
    private_values: &[Fr],
    rng: &mut R,
) -> Result<bool, Groth16Error> {
    let crs = setup(r1cs, rng)?;
    let qap = groth16_qap::r1cs_to_qap(r1cs)?;
    let witness = r1cs.assemble_witness(public_values, private_values)?;
    let proof = prove(&crs.pk, &qap, &witness, rng)?;
    verify(&crs.vk, public_values, &proof)
}
