//! The degree-12 extension `Fq12 = Fq6[w]/(w^2 - v)`, target group of the
//! pairing.

use core::ops::{Add, Mul, MulAssign, Neg, Sub};

use crate::{Fq, Fq2, Fq6};

/// The absolute value of the BN254 curve parameter `x`.
pub const BN_X: u64 = 0x44e992b44a6909f1;

/// `(9+u)^((p^i - 1)/6)` for `i` in `0..12`, scaling the `w` component
/// under the Frobenius endomorphism.
const FROBENIUS_COEFF_C1: [Fq2; 12] = [
    Fq2::new(
        Fq::from_montgomery([
            0xd35d438dc58f0d9d,
            0x0a78eb28f5c70b3d,
            0x666ea36f7879462c,
            0x0e0a77c19a07df2f,
        ]),
        Fq::ZERO,
    ),
    Fq2::new(
        Fq::from_montgomery([
            0xaf9ba69633144907,
            0xca6b1d7387afb78a,
            0x11bded5ef08a2087,
            0x02f34d751a1f3a7c,
        ]),
        Fq::from_montgomery([
            0xa222ae234c492d72,
            0xd00f02a4565de15b,
            0xdc2ff3a253dfc926,
            0x10a75716b3899551,
        ]),
    ),
    Fq2::new(
        Fq::from_montgomery([
            0xca8d800500fa1bf2,
            0xf0c5d61468b39769,
            0x0e201271ad0d4418,
            0x04290f65bad856e6,
        ]),
        Fq::ZERO,
    ),
    Fq2::new(
        Fq::from_montgomery([
            0x365316184e46d97d,
            0x0af7129ed4c96d9f,
            0x659da72fca1009b5,
            0x08116d8983a20d23,
        ]),
        Fq::from_montgomery([
            0xb1df4af7c39c1939,
            0x3d9f02878a73bf7f,
            0x9b2220928caf0ae0,
            0x26684515eff054a6,
        ]),
    ),
    Fq2::new(
        Fq::from_montgomery([
            0x3350c88e13e80b9c,
            0x7dce557cdb5e56b9,
            0x6001b4b8b615564a,
            0x2682e617020217e0,
        ]),
        Fq::ZERO,
    ),
    Fq2::new(
        Fq::from_montgomery([
            0x86b76f821b329076,
            0x408bf52b4d19b614,
            0x53dfb9d0d985e92d,
            0x051e20146982d2a7,
        ]),
        Fq::from_montgomery([
            0x0fbc9cd47752ebc7,
            0x6d8fffe33415de24,
            0xbef22cf038cf41b9,
            0x15c0edff3c66bf54,
        ]),
    ),
    Fq2::new(
        Fq::from_montgomery([
            0x68c3488912edefaa,
            0x8d087f6872aabf4f,
            0x51e1a24709081231,
            0x2259d6b14729c0fa,
        ]),
        Fq::ZERO,
    ),
    Fq2::new(
        Fq::from_montgomery([
            0x8c84e580a568b440,
            0xcd164d1de0c21302,
            0xa692585790f737d5,
            0x2d7100fdc71265ad,
        ]),
        Fq::from_montgomery([
            0x99fdddf38c33cfd5,
            0xc77267ed1213e931,
            0xdc2052142da18f36,
            0x1fbcf75c2da80ad7,
        ]),
    ),
    Fq2::new(
        Fq::from_montgomery([
            0x71930c11d782e155,
            0xa6bb947cffbe3323,
            0xaa303344d4741444,
            0x2c3b3f0d26594943,
        ]),
        Fq::ZERO,
    ),
    Fq2::new(
        Fq::from_montgomery([
            0x05cd75fe8a3623ca,
            0x8c8a57f293a85cee,
            0x52b29e86b7714ea8,
            0x2852e0e95d8f9306,
        ]),
        Fq::from_montgomery([
            0x8a41411f14e0e40e,
            0x59e26809ddfe0b0d,
            0x1d2e2523f4d24d7d,
            0x09fc095cf1414b83,
        ]),
    ),
    Fq2::new(
        Fq::from_montgomery([
            0x08cfc388c494f1ab,
            0x19b315148d1373d4,
            0x584e90fdcb6c0213,
            0x09e1685bdf2f8849,
        ]),
        Fq::ZERO,
    ),
    Fq2::new(
        Fq::from_montgomery([
            0xb5691c94bd4a6cd1,
            0x56f575661b581478,
            0x64708be5a7fb6f30,
            0x2b462e5e77aecd82,
        ]),
        Fq::from_montgomery([
            0x2c63ef42612a1180,
            0x29f16aae345bec69,
            0xf95e18c648b216a4,
            0x1aa36073a4cae0d4,
        ]),
    ),
];

/// An element `c0 + c1*w` of the full extension tower.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Fq12 {
    /// Constant component.
    pub c0: Fq6,
    /// Coefficient of `w`.
    pub c1: Fq6,
}

impl Fq12 {
    /// The additive identity.
    pub const ZERO: Self = Fq12 {
        c0: Fq6::ZERO,
        c1: Fq6::ZERO,
    };
    /// The multiplicative identity.
    pub const ONE: Self = Fq12 {
        c0: Fq6::ONE,
        c1: Fq6::ZERO,
    };

    /// Builds an element from its two components.
    pub const fn new(c0: Fq6, c1: Fq6) -> Self {
        Fq12 { c0, c1 }
    }

    /// Whether this element is zero.
    pub fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero()
    }

    /// Whether this element is one.
    pub fn is_one(&self) -> bool {
        self.c0.is_one() && self.c1.is_zero()
    }

    /// Squares the element.
    pub fn square(&self) -> Self {
        *self * *self
    }

    /// The conjugate `c0 - c1*w`; on the cyclotomic subgroup this is the
    /// inverse.
    pub fn conjugate(&self) -> Self {
        Fq12 {
            c0: self.c0,
            c1: -self.c1,
        }
    }

    /// The multiplicative inverse; zero maps to zero.
    pub fn inverse(&self) -> Self {
        let t = (self.c0.square() - self.c1.square().mul_by_nonresidue()).inverse();
        Fq12 {
            c0: self.c0 * t,
            c1: -(self.c1 * t),
        }
    }

    /// The Frobenius endomorphism `x -> x^(p^power)`.
    pub fn frobenius_map(&self, power: u64) -> Self {
        let c0 = self.c0.frobenius_map(power);
        let c1 = self.c1.frobenius_map(power);
        Fq12 {
            c0,
            c1: c1.mul_by_fq2(FROBENIUS_COEFF_C1[(power % 12) as usize]),
        }
    }

    /// Sparse multiplication by an element with components 0, 3 and 4 set,
    /// the shape produced by pairing line evaluations.
    pub fn mul_by_034(&self, c0: &Fq2, c3: &Fq2, c4: &Fq2) -> Self {
        let a = self.c0.mul_by_fq2(*c0);
        let b = self.c1.mul_by_01(c3, c4);
        let e = (self.c0 + self.c1).mul_by_01(&(*c0 + *c3), c4);
        Fq12 {
            c0: b.mul_by_nonresidue() + a,
            c1: e - (a + b),
        }
    }

    /// Squaring restricted to the cyclotomic subgroup (Granger-Scott).
    pub fn cyclotomic_square(&self) -> Self {
        let mut z0 = self.c0.c0;
        let mut z4 = self.c0.c1;
        let mut z3 = self.c0.c2;
        let mut z2 = self.c1.c0;
        let mut z1 = self.c1.c1;
        let mut z5 = self.c1.c2;

        let (t0, t1) = fq4_square(z0, z1);
        z0 = (t0 - z0).double() + t0;
        z1 = (t1 + z1).double() + t1;

        let (t0, t1) = fq4_square(z2, z3);
        let (t2, t3) = fq4_square(z4, z5);
        z4 = (t0 - z4).double() + t0;
        z5 = (t1 + z5).double() + t1;

        let t0 = t3.mul_by_nonresidue();
        z2 = (t0 + z2).double() + t0;
        z3 = (t2 - z3).double() + t2;

        Fq12 {
            c0: Fq6::new(z0, z4, z3),
            c1: Fq6::new(z2, z1, z5),
        }
    }

    /// Exponentiation by a machine integer using cyclotomic squarings.
    /// Only valid on the cyclotomic subgroup.
    pub fn cyclotomic_exp(&self, exp: u64) -> Self {
        let mut res = Fq12::ONE;
        let mut found_one = false;
        for i in (0..64).rev() {
            if found_one {
                res = res.cyclotomic_square();
            }
            if (exp >> i) & 1 == 1 {
                res = res * *self;
                found_one = true;
            }
        }
        res
    }

    /// Raises the Miller-loop output to `(p^12 - 1)/r`, landing in the
    /// order-`r` subgroup of the cyclotomic subgroup.
    ///
    /// The easy part is `f^((p^6 - 1)(p^2 + 1))`; the hard part follows the
    /// Fuentes-Castaneda addition chain driven by the curve parameter.
    pub fn final_exponentiation(&self) -> Self {
        // Easy part. Miller outputs are nonzero, so the inverse exists.
        let f1 = self.conjugate();
        let f2 = self.inverse();
        let r = f1 * f2;
        let r = r.frobenius_map(2) * r;

        // Hard part; exp_by_neg_x is conjugation after the exponentiation
        // because x is positive for BN254.
        let y0 = r.cyclotomic_exp(BN_X).conjugate();
        let y1 = y0.cyclotomic_square();
        let y2 = y1.cyclotomic_square();
        let y3 = y2 * y1;
        let y4 = y3.cyclotomic_exp(BN_X).conjugate();
        let y5 = y4.cyclotomic_square();
        let y6 = y5.cyclotomic_exp(BN_X).conjugate();
        let y3 = y3.conjugate();
        let y6 = y6.conjugate();
        let y7 = y6 * y4;
        let y8 = y7 * y3;
        let y9 = y8 * y1;
        let y10 = y8 * y4;
        let y11 = y10 * r;
        let y12 = y9.frobenius_map(1);
        let y13 = y12 * y11;
        let y8 = y8.frobenius_map(2);
        let y14 = y8 * y13;
        let r = r.conjugate();
        let y15 = (r * y9).frobenius_map(3);
        y15 * y14
    }
}

/// Squaring in the intermediate quartic extension over Fq2.
#[inline]
fn fq4_square(c0: Fq2, c1: Fq2) -> (Fq2, Fq2) {
    let t0 = c0.square();
    let t1 = c1.square();
    let out0 = t1.mul_by_nonresidue() + t0;
    let out1 = (c0 + c1).square() - t0 - t1;
    (out0, out1)
}

impl Add for Fq12 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Fq12 {
            c0: self.c0 + rhs.c0,
            c1: self.c1 + rhs.c1,
        }
    }
}

impl Sub for Fq12 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Fq12 {
            c0: self.c0 - rhs.c0,
            c1: self.c1 - rhs.c1,
        }
    }
}

impl Mul for Fq12 {
    type Output = Self;

    /// One-level Karatsuba folded through `w^2 = v`.
    fn mul(self, rhs: Self) -> Self {
        let v0 = self.c0 * rhs.c0;
        let v1 = self.c1 * rhs.c1;
        let c1 = (self.c0 + self.c1) * (rhs.c0 + rhs.c1) - v0 - v1;
        Fq12 {
            c0: v1.mul_by_nonresidue() + v0,
            c1,
        }
    }
}

impl Neg for Fq12 {
    type Output = Self;

    fn neg(self) -> Self {
        Fq12 {
            c0: -self.c0,
            c1: -self.c1,
        }
    }
}

impl MulAssign for Fq12 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
