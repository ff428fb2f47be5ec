//! Dense univariate polynomials over the BN254 scalar field.
//!
//! Coefficients are stored low degree first and kept normalized: no
//! trailing zero coefficients, so the zero polynomial is the empty vector
//! and has degree -1.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use core::ops::{Add, Mul, Neg, Sub};

use groth16_field::Fr;
use rand::Rng;
use rayon::prelude::*;

/// Errors produced by polynomial operations.
#[derive(Debug, thiserror::Error)]
pub enum PolyError {
    /// Long division was asked to divide by the zero polynomial.
    #[error("polynomial division by zero")]
    DivisionByZero,

    /// Lagrange construction over a domain with a repeated point.
    #[error("duplicate interpolation point")]
    DuplicateInterpolationPoint,

    /// Interpolation inputs of different lengths.
    #[error("interpolation shape mismatch: {points} points against {values} values")]
    InterpolationShapeMismatch {
        /// Number of domain points supplied.
        points: usize,
        /// Number of values supplied.
        values: usize,
    },
}

/// A dense polynomial; `coeffs[i]` is the coefficient of `x^i`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Polynomial {
    coeffs: Vec<Fr>,
}

impl Polynomial {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Polynomial { coeffs: Vec::new() }
    }

    /// The constant polynomial `1`.
    pub fn one() -> Self {
        Polynomial {
            coeffs: vec![Fr::ONE],
        }
    }

    /// Builds a polynomial from coefficients, dropping trailing zeros.
    pub fn from_coeffs(coeffs: Vec<Fr>) -> Self {
        let mut poly = Polynomial { coeffs };
        poly.normalize();
        poly
    }

    /// The coefficient vector, low degree first.
    pub fn coeffs(&self) -> &[Fr] {
        &self.coeffs
    }

    /// The degree; -1 for the zero polynomial.
    pub fn degree(&self) -> isize {
        self.coeffs.len() as isize - 1
    }

    /// Whether this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// The leading coefficient; zero for the zero polynomial.
    pub fn leading_coefficient(&self) -> Fr {
        self.coeffs.last().copied().unwrap_or(Fr::ZERO)
    }

    /// Horner evaluation from the highest coefficient down.
    pub fn evaluate(&self, x: &Fr) -> Fr {
        let mut acc = Fr::ZERO;
        for coeff in self.coeffs.iter().rev() {
            acc = acc * *x + *coeff;
        }
        acc
    }

    /// Evaluates at many points, one Horner pass per point.
    pub fn evaluate_batch(&self, xs: &[Fr]) -> Vec<Fr> {
        xs.par_iter().map(|x| self.evaluate(x)).collect()
    }

    /// Multiplies by a scalar.
    pub fn scalar_mul(&self, k: &Fr) -> Self {
        if k.is_zero() {
            return Self::zero();
        }
        Polynomial {
            coeffs: self.coeffs.iter().map(|c| *c * *k).collect(),
        }
    }

    /// Multiplies by `x^k`, shifting all coefficients up.
    pub fn mul_xk(&self, k: usize) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let mut coeffs = vec![Fr::ZERO; k];
        coeffs.extend_from_slice(&self.coeffs);
        Polynomial { coeffs }
    }

    /// Long division: returns `(q, r)` with `self = q * divisor + r` and
    /// `deg r < deg divisor`.
    pub fn divrem(&self, divisor: &Self) -> Result<(Self, Self), PolyError> {
        if divisor.is_zero() {
            return Err(PolyError::DivisionByZero);
        }
        if self.degree() < divisor.degree() {
            return Ok((Self::zero(), self.clone()));
        }
        let mut remainder = self.coeffs.clone();
        let mut quotient = vec![Fr::ZERO; self.coeffs.len() - divisor.coeffs.len() + 1];
        let lead_inv = divisor.leading_coefficient().inverse();
        while remainder.len() >= divisor.coeffs.len() {
            let shift = remainder.len() - divisor.coeffs.len();
            let factor = remainder[remainder.len() - 1] * lead_inv;
            quotient[shift] = factor;
            for (i, dc) in divisor.coeffs.iter().enumerate() {
                remainder[shift + i] -= factor * *dc;
            }
            while matches!(remainder.last(), Some(c) if c.is_zero()) {
                remainder.pop();
            }
        }
        Ok((
            Polynomial::from_coeffs(quotient),
            Polynomial::from_coeffs(remainder),
        ))
    }

    /// Whether `divisor` divides this polynomial exactly.
    pub fn divides_exactly(&self, divisor: &Self) -> Result<bool, PolyError> {
        let (_, remainder) = self.divrem(divisor)?;
        Ok(remainder.is_zero())
    }

    /// The vanishing polynomial of a set of points, the product of
    /// `(x - s)` over the set; the empty set yields the constant `1`.
    pub fn vanishing(points: &[Fr]) -> Self {
        let mut acc = Self::one();
        for s in points {
            acc = &acc * &Polynomial::from_coeffs(vec![-*s, Fr::ONE]);
        }
        acc
    }

    /// The `j`-th Lagrange basis polynomial over the given points: one at
    /// `points[j]`, zero at every other point.
    pub fn lagrange_basis(points: &[Fr], j: usize) -> Result<Self, PolyError> {
        let xj = points[j];
        let mut acc = Self::one();
        for (i, xi) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let denom = xj - *xi;
            if denom.is_zero() {
                return Err(PolyError::DuplicateInterpolationPoint);
            }
            let denom_inv = denom.inverse();
            // (x - xi) / (xj - xi)
            acc = &acc * &Polynomial::from_coeffs(vec![-*xi * denom_inv, denom_inv]);
        }
        Ok(acc)
    }

    /// The unique polynomial of degree below `points.len()` passing through
    /// all `(points[i], values[i])`.
    pub fn interpolate(points: &[Fr], values: &[Fr]) -> Result<Self, PolyError> {
        if points.len() != values.len() {
            return Err(PolyError::InterpolationShapeMismatch {
                points: points.len(),
                values: values.len(),
            });
        }
        for j in 1..points.len() {
            if points[..j].contains(&points[j]) {
                return Err(PolyError::DuplicateInterpolationPoint);
            }
        }
        let mut acc = Self::zero();
        for (j, value) in values.iter().enumerate() {
            if value.is_zero() {
                continue;
            }
            let basis = Self::lagrange_basis(points, j)?;
            acc = &acc + &basis.scalar_mul(value);
        }
        Ok(acc)
    }

    /// A polynomial with uniformly random coefficients of exactly the given
    /// degree (the leading coefficient is resampled away from zero).
    pub fn random<R: Rng + ?Sized>(degree: usize, rng: &mut R) -> Self {
        let mut coeffs: Vec<Fr> = (0..=degree).map(|_| Fr::random(rng)).collect();
        while coeffs[degree].is_zero() {
            coeffs[degree] = Fr::random(rng);
        }
        Polynomial { coeffs }
    }

    fn normalize(&mut self) {
        while matches!(self.coeffs.last(), Some(c) if c.is_zero()) {
            self.coeffs.pop();
        }
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let (longer, shorter) = if self.coeffs.len() >= rhs.coeffs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let mut coeffs = longer.coeffs.clone();
        for (i, c) in shorter.coeffs.iter().enumerate() {
            coeffs[i] += *c;
        }
        Polynomial::from_coeffs(coeffs)
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        let mut coeffs = self.coeffs.clone();
        coeffs.resize(coeffs.len().max(rhs.coeffs.len()), Fr::ZERO);
        for (i, c) in rhs.coeffs.iter().enumerate() {
            coeffs[i] -= *c;
        }
        Polynomial::from_coeffs(coeffs)
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    /// Schoolbook convolution; the output degree is the sum of the input
    /// degrees, or -1 if either side is zero.
    fn mul(self, rhs: &Polynomial) -> Polynomial {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }
        let mut coeffs = vec![Fr::ZERO; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += *a * *b;
            }
        }
        Polynomial::from_coeffs(coeffs)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial {
            coeffs: self.coeffs.iter().map(|c| -*c).collect(),
        }
    }
}
