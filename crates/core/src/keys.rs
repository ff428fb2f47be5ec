//! Key material produced by the trusted setup.

use groth16_curve::{G1, G2};

/// The proving half of the reference string.
///
/// Query vectors are indexed by variable (`a_query_g1`, `b_query_g2`,
/// `b_query_g1`), by private variable in increasing index order
/// (`k_query_g1`), or by power of the evaluation point (`h_query_g1`).
#[derive(Debug, Clone)]
pub struct ProvingKey {
    /// `[alpha]_1`.
    pub alpha_g1: G1,
    /// `[beta]_1`.
    pub beta_g1: G1,
    /// `[beta]_2`.
    pub beta_g2: G2,
    /// `[delta]_1`.
    pub delta_g1: G1,
    /// `[delta]_2`.
    pub delta_g2: G2,
    /// `[A_i(tau)]_1` for every variable.
    pub a_query_g1: Vec<G1>,
    /// `[B_i(tau)]_2` for every variable.
    pub b_query_g2: Vec<G2>,
    /// `[B_i(tau)]_1` for every variable.
    pub b_query_g1: Vec<G1>,
    /// `[(beta*A_i(tau) + alpha*B_i(tau) + C_i(tau))/delta]_1` for every
    /// private variable, in increasing index order.
    pub k_query_g1: Vec<G1>,
    /// `[tau^k * Z(tau)/delta]_1` for `k` below the degree.
    pub h_query_g1: Vec<G1>,
    /// Total number of variables, including the constant slot.
    pub num_variables: usize,
    /// The QAP degree (number of constraints).
    pub degree: usize,
    /// Indices of public-input variables, sorted ascending.
    pub public_indices: Vec<usize>,
}

impl ProvingKey {
    /// Number of public inputs.
    pub fn num_public(&self) -> usize {
        self.public_indices.len()
    }

    /// The private coordinates of a full assignment, in the order
    /// `k_query_g1` was built.
    pub fn private_part<'a>(&self, witness: &'a [groth16_field::Fr]) -> Vec<groth16_field::Fr> {
        witness
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(i, _)| !self.public_indices.contains(i))
            .map(|(_, v)| *v)
            .collect()
    }
}

/// The verifying half of the reference string.
#[derive(Debug, Clone)]
pub struct VerifyingKey {
    /// `[alpha]_1`.
    pub alpha_g1: G1,
    /// `[beta]_2`.
    pub beta_g2: G2,
    /// `[gamma]_2`.
    pub gamma_g2: G2,
    /// `[delta]_2`.
    pub delta_g2: G2,
    /// `[(beta*A_i(tau) + alpha*B_i(tau) + C_i(tau))/gamma]_1` for the
    /// constant slot followed by each public variable.
    pub ic_g1: Vec<G1>,
    /// Number of public inputs.
    pub num_public: usize,
}

/// The full reference string: both keys.
#[derive(Debug, Clone)]
pub struct Crs {
    /// Proving key.
    pub pk: ProvingKey,
    /// Verifying key.
    pub vk: VerifyingKey,
}

/// A Groth16 proof: three curve points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proof {
    /// `pi_A` in G1.
    pub a: G1,
    /// `pi_B` in G2.
    pub b: G2,
    /// `pi_C` in G1.
    pub c: G1,
}
