//! Sparse linear combinations of constraint-system variables.

use core::fmt;
use core::ops::{Add, Mul, Sub};

use groth16_field::Fr;

/// One term of a linear combination: `coeff * x_{index}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Term {
    /// The variable index.
    pub index: usize,
    /// The coefficient.
    pub coeff: Fr,
}

impl Term {
    /// Builds a term.
    pub fn new(index: usize, coeff: Fr) -> Self {
        Term { index, coeff }
    }
}

/// A sparse linear combination `sum coeff_i * x_{index_i}`.
///
/// Canonical form, established by [`LinearCombination::compress`]: terms
/// sorted by index, no duplicate indices, no zero coefficients. Builders
/// may append freely; the constraint system compresses on insertion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinearCombination {
    /// The terms of the combination.
    pub terms: Vec<Term>,
}

impl LinearCombination {
    /// The empty (zero) combination.
    pub fn new() -> Self {
        LinearCombination { terms: Vec::new() }
    }

    /// A combination from raw terms, left uncompressed.
    pub fn from_terms(terms: Vec<Term>) -> Self {
        LinearCombination { terms }
    }

    /// The combination `coeff * x_index`.
    pub fn variable(index: usize, coeff: Fr) -> Self {
        LinearCombination {
            terms: vec![Term::new(index, coeff)],
        }
    }

    /// The constant combination `c * x_0`.
    pub fn constant(c: Fr) -> Self {
        if c.is_zero() {
            Self::new()
        } else {
            Self::variable(0, c)
        }
    }

    /// Appends a term without compressing.
    pub fn push(&mut self, index: usize, coeff: Fr) {
        self.terms.push(Term::new(index, coeff));
    }

    /// Whether no terms remain.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// The largest variable index referenced, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.terms.iter().map(|t| t.index).max()
    }

    /// Establishes canonical form: merge duplicate indices, drop zero
    /// coefficients, sort by index.
    pub fn compress(&mut self) {
        self.terms.sort_by_key(|t| t.index);
        let mut compressed: Vec<Term> = Vec::with_capacity(self.terms.len());
        for term in self.terms.drain(..) {
            match compressed.last_mut() {
                Some(last) if last.index == term.index => last.coeff += term.coeff,
                _ => compressed.push(term),
            }
        }
        compressed.retain(|t| !t.coeff.is_zero());
        self.terms = compressed;
    }

    /// The inner product with a full assignment vector.
    ///
    /// Out-of-range indices are the caller's responsibility; the constraint
    /// system validates them at insertion time.
    pub fn evaluate(&self, assignment: &[Fr]) -> Fr {
        self.terms
            .iter()
            .map(|t| t.coeff * assignment[t.index])
            .sum()
    }

    /// The coefficient of a variable, zero when absent.
    pub fn coeff_of(&self, index: usize) -> Fr {
        self.terms
            .iter()
            .find(|t| t.index == index)
            .map(|t| t.coeff)
            .unwrap_or(Fr::ZERO)
    }
}

impl Add for LinearCombination {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.terms.extend(rhs.terms);
        self.compress();
        self
    }
}

impl Sub for LinearCombination {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self.terms
            .extend(rhs.terms.into_iter().map(|t| Term::new(t.index, -t.coeff)));
        self.compress();
        self
    }
}

impl Mul<Fr> for LinearCombination {
    type Output = Self;

    fn mul(mut self, scalar: Fr) -> Self {
        if scalar.is_zero() {
            return Self::new();
        }
        for term in &mut self.terms {
            term.coeff *= scalar;
        }
        self
    }
}

impl fmt::Display for LinearCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}*x{}", term.coeff, term.index)?;
        }
        Ok(())
    }
}
