//! The quadratic extension `Fq2 = Fq[u]/(u^2 + 1)`.

use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::{FieldError, Fq};

/// `9` in the base field, the rational part of the Fq6 non-residue `9 + u`.
const NINE: Fq = Fq::from_montgomery([
    0xf60647ce410d7ff7,
    0x2f3d6f4dd31bd011,
    0x2943337e3940c6d1,
    0x1d9598e8a7e39857,
]);

/// An element `c0 + c1*u` of the quadratic extension of the base field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Fq2 {
    /// Rational component.
    pub c0: Fq,
    /// Coefficient of `u`.
    pub c1: Fq,
}

impl Fq2 {
    /// The additive identity.
    pub const ZERO: Self = Fq2 {
        c0: Fq::ZERO,
        c1: Fq::ZERO,
    };
    /// The multiplicative identity.
    pub const ONE: Self = Fq2 {
        c0: Fq::ONE,
        c1: Fq::ZERO,
    };

    /// Builds an element from its two components.
    pub const fn new(c0: Fq, c1: Fq) -> Self {
        Fq2 { c0, c1 }
    }

    /// Whether this element is zero.
    pub fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero()
    }

    /// Whether this element is one.
    pub fn is_one(&self) -> bool {
        self.c0.is_one() && self.c1.is_zero()
    }

    /// Doubles the element.
    pub fn double(&self) -> Self {
        *self + *self
    }

    /// Squares the element: `(a + bu)^2 = (a+b)(a-b) + 2ab*u`.
    pub fn square(&self) -> Self {
        Fq2 {
            c0: (self.c0 + self.c1) * (self.c0 - self.c1),
            c1: self.c0.double() * self.c1,
        }
    }

    /// Scales both components by a base-field element.
    pub fn mul_by_fq(&self, k: Fq) -> Self {
        Fq2 {
            c0: self.c0 * k,
            c1: self.c1 * k,
        }
    }

    /// Multiplies by the Fq6 non-residue `9 + u`:
    /// `(a + bu)(9 + u) = (9a - b) + (9b + a)u`.
    pub fn mul_by_nonresidue(&self) -> Self {
        Fq2 {
            c0: NINE * self.c0 - self.c1,
            c1: NINE * self.c1 + self.c0,
        }
    }

    /// The conjugate `a - bu`.
    pub fn conjugate(&self) -> Self {
        Fq2 {
            c0: self.c0,
            c1: -self.c1,
        }
    }

    /// The Frobenius endomorphism `x -> x^(p^power)`; conjugation for odd
    /// powers, the identity otherwise.
    pub fn frobenius_map(&self, power: u64) -> Self {
        if power % 2 == 1 {
            self.conjugate()
        } else {
            *self
        }
    }

    /// The multiplicative inverse via the norm `a^2 + b^2`; zero maps to
    /// zero like the base field.
    pub fn inverse(&self) -> Self {
        let t = (self.c0.square() + self.c1.square()).inverse();
        Fq2 {
            c0: self.c0 * t,
            c1: -(self.c1 * t),
        }
    }

    /// Encodes as `c0 || c1`, 64 bytes.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.c0.to_bytes());
        out[32..].copy_from_slice(&self.c1.to_bytes());
        out
    }

    /// Decodes from exactly 64 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FieldError> {
        if bytes.len() != 64 {
            return Err(FieldError::InvalidFieldEncoding(format!(
                "expected 64 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Fq2 {
            c0: Fq::from_bytes(&bytes[..32])?,
            c1: Fq::from_bytes(&bytes[32..])?,
        })
    }
}

impl Add for Fq2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Fq2 {
            c0: self.c0 + rhs.c0,
            c1: self.c1 + rhs.c1,
        }
    }
}

impl Sub for Fq2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Fq2 {
            c0: self.c0 - rhs.c0,
            c1: self.c1 - rhs.c1,
        }
    }
}

impl Mul for Fq2 {
    type Output = Self;

    /// `(a + bu)(c + du) = (ac - bd) + (ad + bc)u`.
    fn mul(self, rhs: Self) -> Self {
        Fq2 {
            c0: self.c0 * rhs.c0 - self.c1 * rhs.c1,
            c1: self.c0 * rhs.c1 + self.c1 * rhs.c0,
        }
    }
}

impl Neg for Fq2 {
    type Output = Self;

    fn neg(self) -> Self {
        Fq2 {
            c0: -self.c0,
            c1: -self.c1,
        }
    }
}

impl AddAssign for Fq2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fq2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fq2 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl fmt::Display for Fq2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} + {}*u)", self.c0, self.c1)
    }
}
