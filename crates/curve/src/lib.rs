//! Elliptic-curve groups for BN254.
//!
//! `G1` lives over the base field and `G2` over its quadratic extension;
//! both are short Weierstrass curves `y^2 = x^3 + b` handled by one
//! Jacobian-coordinate implementation. Multi-scalar multiplication lives in
//! [`msm`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use core::fmt;
use core::ops::{Add, AddAssign, Mul, Neg, Sub};

use groth16_field::{Fq, Fq2, Fr};
use rand::Rng;

pub mod msm;

/// Errors produced by the curve layer.
#[derive(Debug, thiserror::Error)]
pub enum CurveError {
    /// A multi-scalar multiplication was given mismatched input lengths.
    #[error("length mismatch: {scalars} scalars against {points} points")]
    LengthMismatch {
        /// Number of scalars supplied.
        scalars: usize,
        /// Number of points supplied.
        points: usize,
    },
}

/// Field operations required of a curve coordinate type.
pub trait CurveField:
    Copy
    + Clone
    + fmt::Debug
    + Default
    + PartialEq
    + Eq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// The additive identity.
    const ZERO: Self;
    /// The multiplicative identity.
    const ONE: Self;
    /// Whether the value is zero.
    fn is_zero(&self) -> bool;
    /// Twice the value.
    fn double(&self) -> Self;
    /// The square of the value.
    fn square(&self) -> Self;
    /// The inverse of the value, with zero mapping to zero.
    fn inverse(&self) -> Self;
}

impl CurveField for Fq {
    const ZERO: Self = Fq::ZERO;
    const ONE: Self = Fq::ONE;

    fn is_zero(&self) -> bool {
        Fq::is_zero(self)
    }

    fn double(&self) -> Self {
        Fq::double(self)
    }

    fn square(&self) -> Self {
        Fq::square(self)
    }

    fn inverse(&self) -> Self {
        Fq::inverse(self)
    }
}

impl CurveField for Fq2 {
    const ZERO: Self = Fq2::ZERO;
    const ONE: Self = Fq2::ONE;

    fn is_zero(&self) -> bool {
        Fq2::is_zero(self)
    }

    fn double(&self) -> Self {
        Fq2::double(self)
    }

    fn square(&self) -> Self {
        Fq2::square(self)
    }

    fn inverse(&self) -> Self {
        Fq2::inverse(self)
    }
}

/// Compile-time description of a short Weierstrass curve `y^2 = x^3 + b`.
pub trait CurveConfig: Copy + Clone + fmt::Debug + PartialEq + Eq + Send + Sync + 'static {
    /// Coordinate field.
    type Base: CurveField;
    /// The constant term of the curve equation.
    const COEFF_B: Self::Base;
    /// x-coordinate of the subgroup generator.
    const GENERATOR_X: Self::Base;
    /// y-coordinate of the subgroup generator.
    const GENERATOR_Y: Self::Base;
}

/// The G1 curve: `y^2 = x^3 + 3` over Fq, generated by `(1, 2)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct G1Config;

impl CurveConfig for G1Config {
    type Base = Fq;
    const COEFF_B: Fq = Fq::from_montgomery([
        0x7a17caa950ad28d7,
        0x1f6ac17ae15521b9,
        0x334bea4e696bd284,
        0x2a1f6744ce179d8e,
    ]);
    const GENERATOR_X: Fq = Fq::ONE;
    const GENERATOR_Y: Fq = Fq::from_montgomery([
        0xa6ba871b8b1e1b3a,
        0x14f1d651eb8e167b,
        0xccdd46def0f28c58,
        0x1c14ef83340fbe5e,
    ]);
}

/// The G2 curve: `y^2 = x^3 + 3/(9+u)` over Fq2 (the sextic twist).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct G2Config;

impl CurveConfig for G2Config {
    type Base = Fq2;
    const COEFF_B: Fq2 = Fq2::new(
        Fq::from_montgomery([
            0x3bf938e377b802a8,
            0x020b1b273633535d,
            0x26b7edf049755260,
            0x2514c6324384a86d,
        ]),
        Fq::from_montgomery([
            0x38e7ecccd1dcff67,
            0x65f0b37d93ce0d3e,
            0xd749d0dd22ac00aa,
            0x0141b9ce4a688d4d,
        ]),
    );
    const GENERATOR_X: Fq2 = Fq2::new(
        Fq::from_montgomery([
            0x8e83b5d102bc2026,
            0xdceb1935497b0172,
            0xfbb8264797811adf,
            0x19573841af96503b,
        ]),
        Fq::from_montgomery([
            0xafb4737da84c6140,
            0x6043dd5a5802d8c4,
            0x09e950fc52a02f86,
            0x14fef0833aea7b6b,
        ]),
    );
    const GENERATOR_Y: Fq2 = Fq2::new(
        Fq::from_montgomery([
            0x619dfa9d886be9f6,
            0xfe7fd297f59e9b78,
            0xff9e1a62231b7dfe,
            0x28fd7eebae9e4206,
        ]),
        Fq::from_montgomery([
            0x64095b56c71856ee,
            0xdc57f922327d3cbb,
            0x55f935be33351076,
            0x0da4a0e693fd6482,
        ]),
    );
}

/// A point of the G1 group.
pub type G1 = Point<G1Config>;

/// A point of the G2 group.
pub type G2 = Point<G2Config>;

/// An affine G1 point.
pub type G1Affine = Affine<G1Config>;

/// An affine G2 point.
pub type G2Affine = Affine<G2Config>;

/// A curve point in Jacobian coordinates `(X, Y, Z)`, with the affine point
/// recovered as `(X/Z^2, Y/Z^3)` and `Z = 0` encoding the identity.
///
/// Points are trusted to be on the curve; equality compares the affine
/// projection by cross-multiplication, never the raw coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Point<C: CurveConfig> {
    /// Jacobian X.
    pub x: C::Base,
    /// Jacobian Y.
    pub y: C::Base,
    /// Jacobian Z; zero for the identity.
    pub z: C::Base,
}

/// A curve point in affine coordinates, with an explicit identity flag
/// standing in for the projective sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Affine<C: CurveConfig> {
    /// Affine x; zero when `infinity` is set.
    pub x: C::Base,
    /// Affine y; zero when `infinity` is set.
    pub y: C::Base,
    /// Whether this is the identity.
    pub infinity: bool,
}

impl<C: CurveConfig> Point<C> {
    /// The group identity.
    pub const IDENTITY: Self = Point {
        x: C::Base::ONE,
        y: C::Base::ONE,
        z: C::Base::ZERO,
    };

    /// The fixed subgroup generator.
    pub fn generator() -> Self {
        Point {
            x: C::GENERATOR_X,
            y: C::GENERATOR_Y,
            z: C::Base::ONE,
        }
    }

    /// Builds a point from affine coordinates assumed to be on the curve.
    pub fn from_affine_coords(x: C::Base, y: C::Base) -> Self {
        Point {
            x,
            y,
            z: C::Base::ONE,
        }
    }

    /// Whether this point is the identity.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    /// A uniformly random point, as a random scalar multiple of the
    /// generator.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::generator() * Fr::random(rng)
    }

    /// Point doubling.
    pub fn double(&self) -> Self {
        if self.is_identity() {
            return *self;
        }
        let xx = self.x.square();
        let yy = self.y.square();
        let s = (self.x * yy).double().double();
        let m = xx.double() + xx;
        let x3 = m.square() - s.double();
        let yyyy = yy.square();
        let y3 = m * (s - x3) - yyyy.double().double().double();
        let z3 = (self.y * self.z).double();
        Point {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Point negation `(X, -Y, Z)`.
    pub fn negate(&self) -> Self {
        Point {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }

    /// Scalar multiplication, double-and-add from the most significant bit
    /// of the scalar's little-endian byte encoding.
    pub fn mul_scalar(&self, scalar: &Fr) -> Self {
        let bytes = scalar.to_bytes();
        let mut acc = Self::IDENTITY;
        for byte in bytes.iter().rev() {
            for bit in (0..8).rev() {
                acc = acc.double();
                if (byte >> bit) & 1 == 1 {
                    acc = acc + *self;
                }
            }
        }
        acc
    }

    /// Projects to affine coordinates; the identity keeps its flag.
    pub fn to_affine(&self) -> Affine<C> {
        if self.is_identity() {
            return Affine {
                x: C::Base::ZERO,
                y: C::Base::ZERO,
                infinity: true,
            };
        }
        let zinv = self.z.inverse();
        let zinv2 = zinv.square();
        Affine {
            x: self.x * zinv2,
            y: self.y * zinv2 * zinv,
            infinity: false,
        }
    }

    /// Whether the point satisfies `Y^2 = X^3 + b*Z^6`.
    pub fn is_on_curve(&self) -> bool {
        if self.is_identity() {
            return true;
        }
        let z2 = self.z.square();
        let z6 = z2.square() * z2;
        self.y.square() == self.x.square() * self.x + C::COEFF_B * z6
    }
}

impl<C: CurveConfig> Add for Point<C> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        if self.is_identity() {
            return rhs;
        }
        if rhs.is_identity() {
            return self;
        }
        let z1z1 = self.z.square();
        let z2z2 = rhs.z.square();
        let u1 = self.x * z2z2;
        let u2 = rhs.x * z1z1;
        let s1 = self.y * z2z2 * rhs.z;
        let s2 = rhs.y * z1z1 * self.z;
        if u1 == u2 {
            if s1 == s2 {
                return self.double();
            }
            return Self::IDENTITY;
        }
        let h = u2 - u1;
        let r = s2 - s1;
        let hh = h.square();
        let hhh = h * hh;
        let v = u1 * hh;
        let x3 = r.square() - hhh - v.double();
        let y3 = r * (v - x3) - s1 * hhh;
        let z3 = h * self.z * rhs.z;
        Point {
            x: x3,
            y: y3,
            z: z3,
        }
    }
}

impl<C: CurveConfig> Sub for Point<C> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + rhs.negate()
    }
}

impl<C: CurveConfig> AddAssign for Point<C> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<C: CurveConfig> Neg for Point<C> {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl<C: CurveConfig> Mul<Fr> for Point<C> {
    type Output = Self;

    fn mul(self, scalar: Fr) -> Self {
        self.mul_scalar(&scalar)
    }
}

impl<C: CurveConfig> PartialEq for Point<C> {
    /// Equality of the affine projections: `X1*Z2^2 = X2*Z1^2` and
    /// `Y1*Z2^3 = Y2*Z1^3`.
    fn eq(&self, other: &Self) -> bool {
        match (self.is_identity(), other.is_identity()) {
            (true, true) => true,
            (true, false) | (false, true) => false,
            (false, false) => {
                let z1z1 = self.z.square();
                let z2z2 = other.z.square();
                self.x * z2z2 == other.x * z1z1
                    && self.y * z2z2 * other.z == other.y * z1z1 * self.z
            }
        }
    }
}

impl<C: CurveConfig> Eq for Point<C> {}

impl<C: CurveConfig> Default for Point<C> {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl<C: CurveConfig> Affine<C> {
    /// The affine identity sentinel.
    pub fn identity() -> Self {
        Affine {
            x: C::Base::ZERO,
            y: C::Base::ZERO,
            infinity: true,
        }
    }

    /// Lifts back to Jacobian coordinates.
    pub fn to_projective(&self) -> Point<C> {
        if self.infinity {
            Point::IDENTITY
        } else {
            Point::from_affine_coords(self.x, self.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_generators_on_curve() {
        assert!(G1::generator().is_on_curve());
        assert!(G2::generator().is_on_curve());
        assert!(G1::IDENTITY.is_on_curve());
    }

    #[test]
    fn test_identity_laws() {
        let g = G1::generator();
        assert_eq!(G1::IDENTITY + g, g);
        assert_eq!(g + G1::IDENTITY, g);
        assert_eq!(g + g.negate(), G1::IDENTITY);
        assert_eq!(g * Fr::ZERO, G1::IDENTITY);
        assert_eq!(G1::IDENTITY * Fr::from(42u64), G1::IDENTITY);
    }

    #[test]
    fn test_double_matches_add() {
        let g = G1::generator();
        assert_eq!(g.double(), g + g);
        let h = G2::generator();
        assert_eq!(h.double(), h + h);
    }

    #[test]
    fn test_small_multiples() {
        let g = G1::generator();
        let two = g * Fr::from(2u64);
        let three = g * Fr::from(3u64);
        assert_eq!(two, g.double());
        assert_eq!(three, g.double() + g);
        assert_eq!(three - g, two);
    }

    #[test]
    fn test_scalar_homomorphism() {
        let mut rng = ChaCha20Rng::seed_from_u64(40);
        let g = G1::generator();
        let k1 = Fr::random(&mut rng);
        let k2 = Fr::random(&mut rng);
        assert_eq!(g * (k1 + k2), g * k1 + g * k2);
        assert_eq!((g * k1) * k2, g * (k1 * k2));

        let h = G2::generator();
        assert_eq!(h * (k1 + k2), h * k1 + h * k2);
        assert_eq!((h * k1) * k2, h * (k1 * k2));
    }

    #[test]
    fn test_closure_under_operations() {
        let mut rng = ChaCha20Rng::seed_from_u64(41);
        let p = G1::random(&mut rng);
        let q = G1::random(&mut rng);
        assert!(p.is_on_curve());
        assert!((p + q).is_on_curve());
        assert!(p.double().is_on_curve());
        assert!((p * Fr::random(&mut rng)).is_on_curve());

        let p2 = G2::random(&mut rng);
        assert!(p2.is_on_curve());
        assert!((p2 + G2::generator()).is_on_curve());
    }

    #[test]
    fn test_subgroup_order_annihilates() {
        // r * G = identity in both groups.
        use groth16_field::{FpConfig, FrConfig};
        let mut r_minus_1 = FrConfig::MODULUS;
        r_minus_1[0] -= 1;
        let r_minus_1 = Fr::from_limbs(r_minus_1);
        // r = (r - 1) + 1 in the exponent.
        let g = G1::generator();
        assert_eq!(g * r_minus_1 + g, G1::IDENTITY);
        let h = G2::generator();
        assert_eq!(h * r_minus_1 + h, G2::IDENTITY);
    }

    #[test]
    fn test_affine_round_trip() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let p = G1::random(&mut rng);
        let a = p.to_affine();
        assert!(!a.infinity);
        assert_eq!(a.to_projective(), p);

        let id = G1::IDENTITY.to_affine();
        assert!(id.infinity);
        assert_eq!(id.to_projective(), G1::IDENTITY);
    }

    #[test]
    fn test_mixed_z_equality() {
        // The same point reached through different coordinate scalings
        // must compare equal.
        let g = G1::generator();
        let p = g.double() + g;
        let q = g + g.double();
        assert_eq!(p, q);
        let doubled_twice = g.double().double();
        let added = g + g + g + g;
        assert_eq!(doubled_twice, added);
    }
}
