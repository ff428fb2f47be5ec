//! The R1CS to QAP reduction.
//!
//! Every variable of a constraint system becomes three basis polynomials
//! interpolated over the domain `{1, 2, ..., m}`, one per constraint
//! matrix; satisfiability turns into divisibility of `A*B - C` by the
//! domain's vanishing polynomial.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use groth16_field::Fr;
use groth16_poly::{PolyError, Polynomial};
use groth16_r1cs::{R1cs, R1csError};
use rayon::prelude::*;

/// Errors produced by the QAP layer.
#[derive(Debug, thiserror::Error)]
pub enum QapError {
    /// `A*B - C` left a nonzero remainder modulo `Z`: the witness does not
    /// satisfy the constraint system.
    #[error("witness does not satisfy the quadratic arithmetic program")]
    QapNotSatisfied,

    /// Underlying polynomial failure.
    #[error(transparent)]
    Poly(#[from] PolyError),

    /// Underlying constraint-system failure.
    #[error(transparent)]
    R1cs(#[from] R1csError),
}

/// A quadratic arithmetic program.
///
/// For every constraint index `k` and variable `i`,
/// `a_basis[i](domain_points[k])` equals the coefficient of variable `i`
/// in row `k` of the A matrix, and likewise for B and C.
#[derive(Debug, Clone)]
pub struct Qap {
    /// Number of constraints, the domain size.
    pub m: usize,
    /// Number of variables, including the constant slot.
    pub n: usize,
    /// Basis polynomials for the A matrix, one per variable.
    pub a_basis: Vec<Polynomial>,
    /// Basis polynomials for the B matrix.
    pub b_basis: Vec<Polynomial>,
    /// Basis polynomials for the C matrix.
    pub c_basis: Vec<Polynomial>,
    /// The vanishing polynomial of the domain, degree `m`.
    pub z: Polynomial,
    /// The evaluation domain `{1, 2, ..., m}`.
    pub domain_points: Vec<Fr>,
}

/// Converts a finalized constraint system into its QAP.
pub fn r1cs_to_qap(r1cs: &R1cs) -> Result<Qap, QapError> {
    let m = r1cs.n_cons;
    let n = r1cs.n_vars;
    let domain_points: Vec<Fr> = (1..=m as u64).map(Fr::from).collect();

    let interpolate_matrix = |matrix: &[groth16_r1cs::LinearCombination]| {
        (0..n)
            .into_par_iter()
            .map(|i| {
                let column = r1cs.column_values(matrix, i);
                Polynomial::interpolate(&domain_points, &column)
            })
            .collect::<Result<Vec<_>, _>>()
    };

    let a_basis = interpolate_matrix(&r1cs.a)?;
    let b_basis = interpolate_matrix(&r1cs.b)?;
    let c_basis = interpolate_matrix(&r1cs.c)?;
    let z = Polynomial::vanishing(&domain_points);

    Ok(Qap {
        m,
        n,
        a_basis,
        b_basis,
        c_basis,
        z,
        domain_points,
    })
}

impl Qap {
    /// Assembles `A(X) = sum x_i * a_basis[i]` for a full assignment.
    pub fn assemble_a(&self, x: &[Fr]) -> Result<Polynomial, QapError> {
        self.assemble(&self.a_basis, x)
    }

    /// Assembles `B(X)`.
    pub fn assemble_b(&self, x: &[Fr]) -> Result<Polynomial, QapError> {
        self.assemble(&self.b_basis, x)
    }

    /// Assembles `C(X)`.
    pub fn assemble_c(&self, x: &[Fr]) -> Result<Polynomial, QapError> {
        self.assemble(&self.c_basis, x)
    }

    /// Whether the assignment satisfies the program: `Z` divides
    /// `A*B - C` exactly.
    pub fn check(&self, x: &[Fr]) -> Result<bool, QapError> {
        let (numerator, z) = self.numerator_and_z(x)?;
        Ok(numerator.divides_exactly(&z)?)
    }

    /// The division inputs `(A*B - C, Z)`, exposed for diagnostics.
    pub fn numerator_and_z(&self, x: &[Fr]) -> Result<(Polynomial, Polynomial), QapError> {
        let a = self.assemble_a(x)?;
        let b = self.assemble_b(x)?;
        let c = self.assemble_c(x)?;
        Ok((&(&a * &b) - &c, self.z.clone()))
    }

    fn assemble(&self, basis: &[Polynomial], x: &[Fr]) -> Result<Polynomial, QapError> {
        if x.len() != self.n {
            return Err(R1csError::WitnessShapeMismatch(format!(
                "expected {} variables, got {}",
                self.n,
                x.len()
            ))
            .into());
        }
        if self.n == 0 || !x[0].is_one() {
            return Err(R1csError::WitnessShapeMismatch(
                "constant slot x_0 must be one".to_string(),
            )
            .into());
        }
        let mut acc = Polynomial::zero();
        for (value, poly) in x.iter().zip(basis) {
            if value.is_zero() {
                continue;
            }
            acc = &acc + &poly.scalar_mul(value);
        }
        Ok(acc)
    }
}

/// The quotient `H = (A*B - C) / Z`, failing if the division is inexact.
pub fn compute_h(
    a: &Polynomial,
    b: &Polynomial,
    c: &Polynomial,
    z: &Polynomial,
) -> Result<Polynomial, QapError> {
    let product = a * b;
    let numerator = &product - c;
    let (quotient, remainder) = numerator.divrem(z)?;
    if !remainder.is_zero() {
        return Err(QapError::QapNotSatisfied);
    }
    Ok(quotient)
}
