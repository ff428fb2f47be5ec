//! The sextic extension `Fq6 = Fq2[v]/(v^3 - (9 + u))`.

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::{Fq, Fq2};

/// `(9+u)^((p^i - 1)/3)` for `i` in `0..6`, scaling the `v` component
/// under the Frobenius endomorphism.
const FROBENIUS_COEFF_C1: [Fq2; 6] = [
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
            0xb5773b104563ab30,
            0x347f91c8a9aa6454,
            0x7a007127242e0991,
            0x1956bcd8118214ec,
        ]),
        Fq::from_montgomery([
            0x6e849f1ea0aa4757,
            0xaa1c7b6d89f89141,
            0xb6e713cdfae0ca3a,
            0x26694fbb4e82ebc3,
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
            0xc9af22f716ad6bad,
            0xb311782a4aa662b2,
            0x19eeaf64e248c7f4,
            0x20273e77e3439f82,
        ]),
        Fq::from_montgomery([
            0xacc02860f7ce93ac,
            0x3933d5817ba76b4c,
            0x69e6188b446c8467,
            0x0a46036d4417cc55,
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
            0xf91aba2654e8e3b1,
            0x4771cb2fdc92ce12,
            0xdcb16ae0fc8bdf35,
            0x274aa195cd9d8be4,
        ]),
        Fq::from_montgomery([
            0x5cfc50ae18811f8b,
            0x4bb28433cb43988c,
            0x4fd35f13c3b56219,
            0x301949bd2fc8883a,
        ]),
    ),
];

/// `(9+u)^(2(p^i - 1)/3)` for `i` in `0..6`, scaling the `v^2` component.
const FROBENIUS_COEFF_C2: [Fq2; 6] = [
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
            0x7361d77f843abe92,
            0xa5bb2bd3273411fb,
            0x9c941f314b3e2399,
            0x15df9cddbb9fd3ec,
        ]),
        Fq::from_montgomery([
            0x5dddfd154bd8c949,
            0x62cb29a5a4445b60,
            0x37bc870a0c7dd2b9,
            0x24830a9d3171f0fd,
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
            0x448a93a57b6762df,
            0xbfd62df528fdeadf,
            0xd858f5d00e9bd47a,
            0x06b03d4d3476ec58,
        ]),
        Fq::from_montgomery([
            0x2b19daf4bcc936d1,
            0xa1a54e7a56f4299f,
            0xb533eee05adeaef1,
            0x170c812b84dda0b2,
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
            0x843420f1d8dadbd6,
            0x31f010c9183fcdb2,
            0x436330b527a76049,
            0x13d47447f11adfe4,
        ]),
        Fq::from_montgomery([
            0xef494023a857fa74,
            0x2a925d02d5ab101a,
            0x83b015829ba62f10,
            0x2539111d0c13aea3,
        ]),
    ),
];

/// An element `c0 + c1*v + c2*v^2` of the sextic extension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Fq6 {
    /// Constant component.
    pub c0: Fq2,
    /// Coefficient of `v`.
    pub c1: Fq2,
    /// Coefficient of `v^2`.
    pub c2: Fq2,
}

impl Fq6 {
    /// The additive identity.
    pub const ZERO: Self = Fq6 {
        c0: Fq2::ZERO,
        c1: Fq2::ZERO,
        c2: Fq2::ZERO,
    };
    /// The multiplicative identity.
    pub const ONE: Self = Fq6 {
        c0: Fq2::ONE,
        c1: Fq2::ZERO,
        c2: Fq2::ZERO,
    };

    /// Builds an element from its three components.
    pub const fn new(c0: Fq2, c1: Fq2, c2: Fq2) -> Self {
        Fq6 { c0, c1, c2 }
    }

    /// Whether this element is zero.
    pub fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero() && self.c2.is_zero()
    }

    /// Whether this element is one.
    pub fn is_one(&self) -> bool {
        self.c0.is_one() && self.c1.is_zero() && self.c2.is_zero()
    }

    /// Squares the element.
    pub fn square(&self) -> Self {
        *self * *self
    }

    /// Multiplies by `v`: `(a, b, c) -> ((9+u)c, a, b)`.
    pub fn mul_by_nonresidue(&self) -> Self {
        Fq6 {
            c0: self.c2.mul_by_nonresidue(),
            c1: self.c0,
            c2: self.c1,
        }
    }

    /// Scales all components by an Fq2 element.
    pub fn mul_by_fq2(&self, k: Fq2) -> Self {
        Fq6 {
            c0: self.c0 * k,
            c1: self.c1 * k,
            c2: self.c2 * k,
        }
    }

    /// Sparse multiplication by `b1*v`.
    pub fn mul_by_1(&self, b1: &Fq2) -> Self {
        let b_b = self.c1 * *b1;
        let t1 = (*b1 * (self.c1 + self.c2) - b_b).mul_by_nonresidue();
        let t2 = *b1 * (self.c0 + self.c1) - b_b;
        Fq6 {
            c0: t1,
            c1: t2,
            c2: b_b,
        }
    }

    /// Sparse multiplication by `b0 + b1*v`.
    pub fn mul_by_01(&self, b0: &Fq2, b1: &Fq2) -> Self {
        let a_a = self.c0 * *b0;
        let b_b = self.c1 * *b1;
        let t1 = (*b1 * (self.c1 + self.c2) - b_b).mul_by_nonresidue() + a_a;
        let t2 = (*b0 + *b1) * (self.c0 + self.c1) - a_a - b_b;
        let t3 = *b0 * (self.c0 + self.c2) - a_a + b_b;
        Fq6 {
            c0: t1,
            c1: t2,
            c2: t3,
        }
    }

    /// The Frobenius endomorphism `x -> x^(p^power)`.
    pub fn frobenius_map(&self, power: u64) -> Self {
        let i = (power % 6) as usize;
        Fq6 {
            c0: self.c0.frobenius_map(power),
            c1: self.c1.frobenius_map(power) * FROBENIUS_COEFF_C1[i],
            c2: self.c2.frobenius_map(power) * FROBENIUS_COEFF_C2[i],
        }
    }

    /// The multiplicative inverse; zero maps to zero.
    pub fn inverse(&self) -> Self {
        let c0 = self.c0.square() - (self.c1 * self.c2).mul_by_nonresidue();
        let c1 = self.c2.square().mul_by_nonresidue() - self.c0 * self.c1;
        let c2 = self.c1.square() - self.c0 * self.c2;
        let t = (self.c0 * c0 + (self.c2 * c1 + self.c1 * c2).mul_by_nonresidue()).inverse();
        Fq6 {
            c0: c0 * t,
            c1: c1 * t,
            c2: c2 * t,
        }
    }
}

impl Add for Fq6 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Fq6 {
            c0: self.c0 + rhs.c0,
            c1: self.c1 + rhs.c1,
            c2: self.c2 + rhs.c2,
        }
    }
}

impl Sub for Fq6 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Fq6 {
            c0: self.c0 - rhs.c0,
            c1: self.c1 - rhs.c1,
            c2: self.c2 - rhs.c2,
        }
    }
}

impl Mul for Fq6 {
    type Output = Self;

    /// Karatsuba multiplication folded through `v^3 = 9 + u`.
    fn mul(self, rhs: Self) -> Self {
        let (a, b, c) = (rhs.c0, rhs.c1, rhs.c2);
        let (d, e, f) = (self.c0, self.c1, self.c2);

        let ad = d * a;
        let be = e * b;
        let cf = f * c;

        let x = (e + f) * (b + c) - be - cf;
        let y = (d + e) * (a + b) - ad - be;
        let z = (d + f) * (a + c) - ad + be - cf;

        Fq6 {
            c0: ad + x.mul_by_nonresidue(),
            c1: y + cf.mul_by_nonresidue(),
            c2: z,
        }
    }
}

impl Neg for Fq6 {
    type Output = Self;

    fn neg(self) -> Self {
        Fq6 {
            c0: -self.c0,
            c1: -self.c1,
            c2: -self.c2,
        }
    }
}

impl AddAssign for Fq6 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fq6 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fq6 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn random_fq6(rng: &mut ChaCha20Rng) -> Fq6 {
        Fq6::new(
            Fq2::new(Fq::random(rng), Fq::random(rng)),
            Fq2::new(Fq::random(rng), Fq::random(rng)),
            Fq2::new(Fq::random(rng), Fq::random(rng)),
        )
    }

    #[test]
    fn test_v_cubed_is_nonresidue() {
        let v = Fq6::new(Fq2::ZERO, Fq2::ONE, Fq2::ZERO);
        let xi = Fq6::new(Fq2::new(Fq::from(9u64), Fq::ONE), Fq2::ZERO, Fq2::ZERO);
        assert_eq!(v * v * v, xi);
    }

    #[test]
    fn test_ring_laws() {
        let mut rng = ChaCha20Rng::seed_from_u64(20);
        for _ in 0..8 {
            let a = random_fq6(&mut rng);
            let b = random_fq6(&mut rng);
            let c = random_fq6(&mut rng);
            assert_eq!(a * b, b * a);
            assert_eq!((a * b) * c, a * (b * c));
            assert_eq!(a * (b + c), a * b + a * c);
            assert_eq!(a * Fq6::ONE, a);
        }
    }

    #[test]
    fn test_inverse() {
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        for _ in 0..8 {
            let a = random_fq6(&mut rng);
            if a.is_zero() {
                continue;
            }
            assert_eq!(a * a.inverse(), Fq6::ONE);
        }
    }

    #[test]
    fn test_sparse_mul_matches_dense() {
        let mut rng = ChaCha20Rng::seed_from_u64(22);
        for _ in 0..8 {
            let s = random_fq6(&mut rng);
            let b0 = Fq2::new(Fq::random(&mut rng), Fq::random(&mut rng));
            let b1 = Fq2::new(Fq::random(&mut rng), Fq::random(&mut rng));
            assert_eq!(s.mul_by_01(&b0, &b1), s * Fq6::new(b0, b1, Fq2::ZERO));
            assert_eq!(s.mul_by_1(&b1), s * Fq6::new(Fq2::ZERO, b1, Fq2::ZERO));
        }
    }

    #[test]
    fn test_mul_by_nonresidue_matches_mul_by_v() {
        let mut rng = ChaCha20Rng::seed_from_u64(23);
        let v = Fq6::new(Fq2::ZERO, Fq2::ONE, Fq2::ZERO);
        let a = random_fq6(&mut rng);
        assert_eq!(a.mul_by_nonresidue(), a * v);
    }

    #[test]
    fn test_frobenius_composition() {
        let mut rng = ChaCha20Rng::seed_from_u64(24);
        let a = random_fq6(&mut rng);
        assert_eq!(a.frobenius_map(0), a);
        assert_eq!(a.frobenius_map(1).frobenius_map(1), a.frobenius_map(2));
        assert_eq!(a.frobenius_map(6), a);
    }
}
