//! Rank-1 constraint systems over the BN254 scalar field.
//!
//! An R1CS holds `n_cons` constraints of the form
//! `<A_k, x> * <B_k, x> = <C_k, x>` over an assignment vector `x` whose
//! slot 0 is pinned to the constant one. Systems are built incrementally
//! (allocate variables, mark some public, add constraints) and frozen with
//! [`R1cs::finalize`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use groth16_field::Fr;

mod linear_combination;

pub use linear_combination::{LinearCombination, Term};

/// Errors produced by constraint-system operations.
#[derive(Debug, thiserror::Error)]
pub enum R1csError {
    /// A constraint referenced a variable index at or beyond `n_vars`.
    #[error("variable index {index} out of range (have {n_vars} variables)")]
    OutOfRangeVariable {
        /// The offending index.
        index: usize,
        /// Number of allocated variables.
        n_vars: usize,
    },

    /// An assignment had the wrong length, or its constant slot was not one.
    #[error("witness shape mismatch: {0}")]
    WitnessShapeMismatch(String),
}

/// Diagnostic result of a verbose satisfiability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFailure {
    /// Index of the first unsatisfied constraint.
    pub row: usize,
    /// Value of `<A_row, x>`.
    pub a: Fr,
    /// Value of `<B_row, x>`.
    pub b: Fr,
    /// Value of `<C_row, x>`.
    pub c: Fr,
}

/// A rank-1 constraint system under construction or frozen.
#[derive(Debug, Clone, Default)]
pub struct R1cs {
    /// Total number of variables, including the constant slot `x_0`.
    pub n_vars: usize,
    /// Number of constraints.
    pub n_cons: usize,
    /// Left constraint rows.
    pub a: Vec<LinearCombination>,
    /// Right constraint rows.
    pub b: Vec<LinearCombination>,
    /// Output constraint rows.
    pub c: Vec<LinearCombination>,
    /// Indices of public-input variables, strictly positive.
    pub public_indices: Vec<usize>,
}

impl R1cs {
    /// A fresh system holding only the constant variable `x_0`.
    pub fn new() -> Self {
        R1cs {
            n_vars: 1,
            n_cons: 0,
            a: Vec::new(),
            b: Vec::new(),
            c: Vec::new(),
            public_indices: Vec::new(),
        }
    }

    /// Allocates a fresh variable and returns its index.
    pub fn allocate_var(&mut self) -> usize {
        let index = self.n_vars;
        self.n_vars += 1;
        index
    }

    /// Marks a variable as part of the public input.
    ///
    /// The constant slot cannot be public; duplicate marks are ignored.
    pub fn mark_public(&mut self, index: usize) -> Result<(), R1csError> {
        if index == 0 || index >= self.n_vars {
            return Err(R1csError::OutOfRangeVariable {
                index,
                n_vars: self.n_vars,
            });
        }
        if !self.public_indices.contains(&index) {
            self.public_indices.push(index);
        }
        Ok(())
    }

    /// Appends the constraint `<a_row, x> * <b_row, x> = <c_row, x>`,
    /// compressing each row and validating all indices.
    pub fn add_constraint(
        &mut self,
        mut a_row: LinearCombination,
        mut b_row: LinearCombination,
        mut c_row: LinearCombination,
    ) -> Result<(), R1csError> {
        a_row.compress();
        b_row.compress();
        c_row.compress();
        for row in [&a_row, &b_row, &c_row] {
            if let Some(max) = row.max_index() {
                if max >= self.n_vars {
                    return Err(R1csError::OutOfRangeVariable {
                        index: max,
                        n_vars: self.n_vars,
                    });
                }
            }
        }
        self.a.push(a_row);
        self.b.push(b_row);
        self.c.push(c_row);
        self.n_cons += 1;
        Ok(())
    }

    /// Convenience builder: `x_a * x_b = x_c`.
    pub fn add_mul(&mut self, a: usize, b: usize, c: usize) -> Result<(), R1csError> {
        self.add_constraint(
            LinearCombination::variable(a, Fr::ONE),
            LinearCombination::variable(b, Fr::ONE),
            LinearCombination::variable(c, Fr::ONE),
        )
    }

    /// Convenience builder: `<left, x> = <right, x>`, encoded as
    /// `(left - right) * 1 = 0`.
    pub fn add_lin_eq(
        &mut self,
        left: LinearCombination,
        right: LinearCombination,
    ) -> Result<(), R1csError> {
        self.add_constraint(
            left - right,
            LinearCombination::constant(Fr::ONE),
            LinearCombination::new(),
        )
    }

    /// Whether the assignment satisfies every constraint.
    pub fn is_satisfied(&self, x: &[Fr]) -> Result<bool, R1csError> {
        self.check_assignment_shape(x)?;
        for k in 0..self.n_cons {
            let a = self.a[k].evaluate(x);
            let b = self.b[k].evaluate(x);
            let c = self.c[k].evaluate(x);
            if a * b != c {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Like [`R1cs::is_satisfied`] but reporting the first failing row and
    /// its three inner products.
    pub fn is_satisfied_verbose(&self, x: &[Fr]) -> Result<Option<RowFailure>, R1csError> {
        self.check_assignment_shape(x)?;
        for k in 0..self.n_cons {
            let a = self.a[k].evaluate(x);
            let b = self.b[k].evaluate(x);
            let c = self.c[k].evaluate(x);
            if a * b != c {
                return Ok(Some(RowFailure { row: k, a, b, c }));
            }
        }
        Ok(None)
    }

    /// The length-`n_cons` column of coefficients of variable `index`
    /// across the rows of one matrix, zero where absent.
    pub fn column_values(&self, matrix: &[LinearCombination], index: usize) -> Vec<Fr> {
        matrix.iter().map(|row| row.coeff_of(index)).collect()
    }

    /// Compresses every row, freezing the canonical form.
    pub fn finalize(&mut self) {
        for row in self
            .a
            .iter_mut()
            .chain(self.b.iter_mut())
            .chain(self.c.iter_mut())
        {
            row.compress();
        }
        self.public_indices.sort_unstable();
    }

    /// Builds the full assignment `[1, values...]` from public and private
    /// values: public values bind to `public_indices` in order, private
    /// values fill the remaining slots in increasing index order.
    pub fn assemble_witness(
        &self,
        public_values: &[Fr],
        private_values: &[Fr],
    ) -> Result<Vec<Fr>, R1csError> {
        if public_values.len() != self.public_indices.len() {
            return Err(R1csError::WitnessShapeMismatch(format!(
                "expected {} public values, got {}",
                self.public_indices.len(),
                public_values.len()
            )));
        }
        let expected_private = self.n_vars - 1 - self.public_indices.len();
        if private_values.len() != expected_private {
            return Err(R1csError::WitnessShapeMismatch(format!(
                "expected {} private values, got {}",
                expected_private,
                private_values.len()
            )));
        }
        let mut x = vec![Fr::ZERO; self.n_vars];
        x[0] = Fr::ONE;
        for (index, value) in self.public_indices.iter().zip(public_values) {
            x[*index] = *value;
        }
        let mut private_iter = private_values.iter();
        for (index, slot) in x.iter_mut().enumerate().skip(1) {
            if !self.public_indices.contains(&index) {
                *slot = *private_iter.next().expect("private count checked above");
            }
        }
        Ok(x)
    }

    fn check_assignment_shape(&self, x: &[Fr]) -> Result<(), R1csError> {
        if x.len() != self.n_vars {
            return Err(R1csError::WitnessShapeMismatch(format!(
                "expected {} variables, got {}",
                self.n_vars,
                x.len()
            )));
        }
        if !x[0].is_one() {
            return Err(R1csError::WitnessShapeMismatch(
                "constant slot x_0 must be one".to_string(),
            ));
        }
        Ok(())
    }
}
