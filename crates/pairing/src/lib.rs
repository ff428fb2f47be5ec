//! The optimal Ate pairing `e : G1 x G2 -> Fq12` for BN254.
//!
//! A Miller loop over the signed binary expansion of `6x + 2` accumulates
//! tangent and secant line evaluations, embedded sparsely into Fq12 through
//! the sextic D-twist; two Frobenius correction steps close the loop. The
//! final exponentiation lives on [`Fq12`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use groth16_curve::{CurveConfig, G1, G1Affine, G2, G2Affine, G2Config};
use groth16_field::{Fq, Fq12, Fq2};

/// Signed binary expansion of `6x + 2`, least significant digit first.
const ATE_LOOP_COUNT: [i8; 65] = [
    0, 0, 0, 1, 0, 1, 0, -1, 0, 0, 1, -1, 0, 0, 1, 0, 0, 1, 1, 0, -1, 0, 0, 1, 0, -1, 0, 0, 0, 0,
    1, 1, 1, 0, 0, -1, 0, 0, 1, 0, 0, 0, 0, 0, -1, 0, 0, 1, 1, 0, 0, -1, 0, 0, 0, 1, 1, 0, -1, 0,
    0, 1, 0, 1, 1,
];

/// `1/2` in the base field, used by the tangent-line formulas.
const TWO_INV: Fq = Fq::from_montgomery([
    0x87bee7d24f060572,
    0xd0fd2add2f1c6ae5,
    0x8f5f7492fcfd4f44,
    0x1f37631a3d9cbfac,
]);

/// `(9+u)^((p-1)/3)`, scaling G2 x-coordinates under Frobenius.
const TWIST_MUL_BY_Q_X: Fq2 = Fq2::new(
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
);

/// `(9+u)^((p-1)/2)`, scaling G2 y-coordinates under Frobenius.
const TWIST_MUL_BY_Q_Y: Fq2 = Fq2::new(
    Fq::from_montgomery([
        0xe4bbdd0c2936b629,
        0xbb30f162e133bacb,
        0x31a9d1b6f9645366,
        0x253570bea500f8dd,
    ]),
    Fq::from_montgomery([
        0xa1d77ce45ffe77c7,
        0x07affd117826d1db,
        0x6d16bd27bb7edc6b,
        0x2c87200285defecc,
    ]),
);

/// One line-function evaluation, sparse in the 0/3/4 components of Fq12.
type EllCoeff = (Fq2, Fq2, Fq2);

/// A G2 point in homogeneous projective coordinates, consumed while
/// walking the Miller loop.
#[derive(Clone, Copy, Debug)]
struct G2HomProjective {
    x: Fq2,
    y: Fq2,
    z: Fq2,
}

impl G2HomProjective {
    /// Doubles the point and returns the tangent-line coefficients.
    fn double_in_place(&mut self) -> EllCoeff {
        let a = (self.x * self.y).mul_by_fq(TWO_INV);
        let b = self.y.square();
        let c = self.z.square();
        let e = G2Config::COEFF_B * (c.double() + c);
        let f = e.double() + e;
        let g = (b + f).mul_by_fq(TWO_INV);
        let h = (self.y + self.z).square() - (b + c);
        let i = e - b;
        let j = self.x.square();
        let e_square = e.square();

        self.x = a * (b - f);
        self.y = g.square() - (e_square.double() + e_square);
        self.z = b * h;

        (-h, j.double() + j, i)
    }

    /// Adds an affine point and returns the secant-line coefficients.
    fn add_in_place(&mut self, q: &G2Affine) -> EllCoeff {
        let theta = self.y - q.y * self.z;
        let lambda = self.x - q.x * self.z;
        let c = theta.square();
        let d = lambda.square();
        let e = lambda * d;
        let f = self.z * c;
        let g = self.x * d;
        let h = e + f - g.double();
        self.x = lambda * h;
        self.y = theta * (g - h) - e * self.y;
        self.z = self.z * e;
        let j = theta * q.x - lambda * q.y;

        (lambda, -theta, j)
    }
}

/// A G2 point with its Miller-loop line coefficients precomputed.
#[derive(Clone, Debug)]
pub struct G2Prepared {
    ell_coeffs: Vec<EllCoeff>,
    infinity: bool,
}

impl From<G2Affine> for G2Prepared {
    fn from(q: G2Affine) -> Self {
        if q.infinity {
            return G2Prepared {
                ell_coeffs: Vec::new(),
                infinity: true,
            };
        }

        let mut ell_coeffs = Vec::with_capacity(ATE_LOOP_COUNT.len() + 32);
        let mut r = G2HomProjective {
            x: q.x,
            y: q.y,
            z: Fq2::ONE,
        };
        let neg_q = G2Affine {
            x: q.x,
            y: -q.y,
            infinity: false,
        };

        for bit in ATE_LOOP_COUNT.iter().rev().skip(1) {
            ell_coeffs.push(r.double_in_place());
            match bit {
                1 => ell_coeffs.push(r.add_in_place(&q)),
                -1 => ell_coeffs.push(r.add_in_place(&neg_q)),
                _ => {}
            }
        }

        // Frobenius correction steps for the optimal Ate loop length.
        let q1 = mul_by_char(q);
        let mut q2 = mul_by_char(q1);
        q2.y = -q2.y;
        ell_coeffs.push(r.add_in_place(&q1));
        ell_coeffs.push(r.add_in_place(&q2));

        G2Prepared {
            ell_coeffs,
            infinity: false,
        }
    }
}

impl From<&G2> for G2Prepared {
    fn from(q: &G2) -> Self {
        q.to_affine().into()
    }
}

/// The untwisted Frobenius endomorphism on G2 affine coordinates.
fn mul_by_char(mut q: G2Affine) -> G2Affine {
    q.x = q.x.conjugate() * TWIST_MUL_BY_Q_X;
    q.y = q.y.conjugate() * TWIST_MUL_BY_Q_Y;
    q
}

/// Iterated Frobenius endomorphism on G2; on the r-torsion subgroup one
/// application acts as multiplication by the base-field characteristic.
pub fn g2_frobenius_map(q: &G2, power: u64) -> G2 {
    if q.is_identity() {
        return *q;
    }
    let mut affine = q.to_affine();
    for _ in 0..power % 12 {
        affine = mul_by_char(affine);
    }
    affine.to_projective()
}

/// Folds one line evaluation at `p` into the running Miller value.
fn ell(f: Fq12, coeffs: &EllCoeff, p: &G1Affine) -> Fq12 {
    let c0 = coeffs.0.mul_by_fq(p.y);
    let c1 = coeffs.1.mul_by_fq(p.x);
    f.mul_by_034(&c0, &c1, &coeffs.2)
}

/// The Miller loop over any number of pairs, sharing the accumulator so a
/// product of pairings costs one squaring chain.
///
/// Pairs with an identity on either side contribute the neutral factor 1.
pub fn multi_miller_loop(pairs: &[(G1, G2)]) -> Fq12 {
    let prepared: Vec<(G1Affine, G2Prepared)> = pairs
        .iter()
        .filter(|(p, q)| !p.is_identity() && !q.is_identity())
        .map(|(p, q)| (p.to_affine(), G2Prepared::from(q)))
        .collect();
    multi_miller_loop_prepared(&prepared)
}

/// The Miller loop over points with precomputed line coefficients.
pub fn multi_miller_loop_prepared(pairs: &[(G1Affine, G2Prepared)]) -> Fq12 {
    let mut live: Vec<(G1Affine, &G2Prepared, usize)> = pairs
        .iter()
        .filter(|(p, q)| !p.infinity && !q.infinity)
        .map(|(p, q)| (*p, q, 0usize))
        .collect();

    let mut f = Fq12::ONE;
    let n = ATE_LOOP_COUNT.len();
    for i in (1..n).rev() {
        if i != n - 1 {
            f = f.square();
        }
        for (p, q, idx) in live.iter_mut() {
            f = ell(f, &q.ell_coeffs[*idx], p);
            *idx += 1;
        }
        let bit = ATE_LOOP_COUNT[i - 1];
        if bit == 1 || bit == -1 {
            for (p, q, idx) in live.iter_mut() {
                f = ell(f, &q.ell_coeffs[*idx], p);
                *idx += 1;
            }
        }
    }
    for _ in 0..2 {
        for (p, q, idx) in live.iter_mut() {
            f = ell(f, &q.ell_coeffs[*idx], p);
            *idx += 1;
        }
    }
    f
}

/// The Miller loop for a single pair.
pub fn miller_loop(p: &G1, q: &G2) -> Fq12 {
    multi_miller_loop(&[(*p, *q)])
}

/// The full pairing `e(P, Q)`.
pub fn pairing(p: &G1, q: &G2) -> Fq12 {
    miller_loop(p, q).final_exponentiation()
}

/// The product of pairings, with the final exponentiation shared across
/// all terms.
pub fn multi_pairing(pairs: &[(G1, G2)]) -> Fq12 {
    multi_miller_loop(pairs).final_exponentiation()
}

/// Whether the product of pairings is the identity of Fq12.
pub fn pairing_check(pairs: &[(G1, G2)]) -> bool {
    multi_pairing(pairs).is_one()
}

#[cfg(test)]
mod tests {
    use super::*;
    use groth16_field::{FpConfig, Fr, FrConfig};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn fq12_pow(base: Fq12, exp: &[u64; 4]) -> Fq12 {
        let mut res = Fq12::ONE;
        for i in (0..256).rev() {
            res = res.square();
            if (exp[i / 64] >> (i % 64)) & 1 == 1 {
                res = res * base;
            }
        }
        res
    }

    #[test]
    fn test_nondegeneracy() {
        let e = pairing(&G1::generator(), &G2::generator());
        assert!(!e.is_one());
        assert!(!e.is_zero());
    }

    #[test]
    fn test_pairing_output_has_order_r() {
        let e = pairing(&G1::generator(), &G2::generator());
        assert_eq!(fq12_pow(e, &FrConfig::MODULUS), Fq12::ONE);
    }

    #[test]
    fn test_bilinearity_small_scalars() {
        let p = G1::generator();
        let q = G2::generator();
        let a = Fr::from(3u64);
        let b = Fr::from(5u64);

        let e = pairing(&p, &q);
        let lhs = pairing(&(p * a), &(q * b));
        assert_eq!(lhs, fq12_pow(e, &Fr::from(15u64).to_limbs()));
        assert_eq!(lhs, pairing(&(p * (a * b)), &q));
        assert_eq!(lhs, pairing(&p, &(q * (a * b))));
    }

    #[test]
    fn test_bilinearity_random_scalars() {
        let mut rng = ChaCha20Rng::seed_from_u64(60);
        let p = G1::generator();
        let q = G2::generator();
        let a = Fr::random(&mut rng);
        let b = Fr::random(&mut rng);

        let lhs = pairing(&(p * a), &(q * b));
        let rhs = fq12_pow(pairing(&p, &q), &(a * b).to_limbs());
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_pairing_with_identity_is_one() {
        assert!(pairing(&G1::IDENTITY, &G2::generator()).is_one());
        assert!(pairing(&G1::generator(), &G2::IDENTITY).is_one());
    }

    #[test]
    fn test_inverse_pair_cancels() {
        let p = G1::generator();
        let q = G2::generator();
        assert!(pairing_check(&[(p, q), (p.negate(), q)]));
        assert!(pairing_check(&[(p, q), (p, q.negate())]));
        assert!(!pairing_check(&[(p, q), (p, q)]));
    }

    #[test]
    fn test_multi_pairing_matches_product() {
        let mut rng = ChaCha20Rng::seed_from_u64(61);
        let p1 = G1::random(&mut rng);
        let p2 = G1::random(&mut rng);
        let q1 = G2::random(&mut rng);
        let q2 = G2::random(&mut rng);

        let combined = multi_pairing(&[(p1, q1), (p2, q2)]);
        let separate = pairing(&p1, &q1) * pairing(&p2, &q2);
        assert_eq!(combined, separate);
    }

    #[test]
    fn test_g2_frobenius_acts_as_p() {
        // On the r-torsion, the endomorphism multiplies by the base-field
        // characteristic.
        use groth16_field::FqConfig;
        let q = G2::generator();
        let p_mod_r = Fr::from_limbs(FqConfig::MODULUS);
        assert_eq!(g2_frobenius_map(&q, 1), q * p_mod_r);
        assert_eq!(g2_frobenius_map(&q, 12), q);
        assert_eq!(g2_frobenius_map(&q, 0), q);
    }

    #[test]
    fn test_additivity_in_g1() {
        let mut rng = ChaCha20Rng::seed_from_u64(62);
        let p1 = G1::random(&mut rng);
        let p2 = G1::random(&mut rng);
        let q = G2::generator();
        assert_eq!(pairing(&(p1 + p2), &q), pairing(&p1, &q) * pairing(&p2, &q));
    }
}
