//! Field arithmetic for the BN254 curve family.
//!
//! This crate provides the two 254-bit prime fields (the scalar field `Fr`
//! and the base field `Fq`) together with the extension tower
//! `Fq2 = Fq[u]/(u^2+1)`, `Fq6 = Fq2[v]/(v^3-(9+u))` and
//! `Fq12 = Fq6[w]/(w^2-v)` that hosts pairing values.
//!
//! Elements are stored as four 64-bit limbs in the Montgomery domain and are
//! always reduced to the canonical range `[0, p)`. All encodings are
//! little-endian over the canonical (non-Montgomery) value.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use core::fmt;
use core::iter::Sum;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use rand::Rng;

mod fq12;
mod fq2;
mod fq6;

pub use fq12::Fq12;
pub use fq2::Fq2;
pub use fq6::Fq6;

/// Errors produced by the field layer.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// Byte or hex input of the wrong size, or a value outside `[0, p)`.
    #[error("invalid field encoding: {0}")]
    InvalidFieldEncoding(String),
}

// ---------------------------------------------------------------------------
// Limb helpers
// ---------------------------------------------------------------------------

#[inline(always)]
const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let t = (a as u128) + (b as u128) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

#[inline(always)]
const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let t = (a as u128).wrapping_sub((b as u128) + (borrow as u128));
    (t as u64, (t >> 127) as u64)
}

/// `acc + a * b + carry`, split into low and high words.
#[inline(always)]
const fn mac(acc: u64, a: u64, b: u64, carry: u64) -> (u64, u64) {
    let t = (acc as u128) + (a as u128) * (b as u128) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

#[inline]
fn limbs_add(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let mut out = [0u64; 4];
    let mut carry = 0;
    for i in 0..4 {
        let (lo, c) = adc(a[i], b[i], carry);
        out[i] = lo;
        carry = c;
    }
    (out, carry)
}

#[inline]
fn limbs_sub(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let mut out = [0u64; 4];
    let mut borrow = 0;
    for i in 0..4 {
        let (lo, bw) = sbb(a[i], b[i], borrow);
        out[i] = lo;
        borrow = bw;
    }
    (out, borrow)
}

#[inline]
fn limbs_lt(a: &[u64; 4], b: &[u64; 4]) -> bool {
    for i in (0..4).rev() {
        if a[i] != b[i] {
            return a[i] < b[i];
        }
    }
    false
}

#[inline]
fn limbs_is_zero(a: &[u64; 4]) -> bool {
    a[0] == 0 && a[1] == 0 && a[2] == 0 && a[3] == 0
}

/// Shift right by one bit with an incoming top bit.
#[inline]
fn limbs_shr1(a: &mut [u64; 4], top: u64) {
    a[0] = (a[0] >> 1) | (a[1] << 63);
    a[1] = (a[1] >> 1) | (a[2] << 63);
    a[2] = (a[2] >> 1) | (a[3] << 63);
    a[3] = (a[3] >> 1) | (top << 63);
}

// ---------------------------------------------------------------------------
// Prime-field configuration
// ---------------------------------------------------------------------------

/// Compile-time parameters of a 254-bit prime field.
///
/// Moduli and Montgomery constants live here rather than in mutable globals,
/// so distinct fields are distinct types sharing one implementation.
pub trait FpConfig: Copy + Clone + fmt::Debug + PartialEq + Eq + Send + Sync + 'static {
    /// The field modulus `p`, little-endian limbs.
    const MODULUS: [u64; 4];
    /// `2^256 mod p` (the Montgomery image of one).
    const R: [u64; 4];
    /// `2^512 mod p`, used to enter the Montgomery domain.
    const R2: [u64; 4];
    /// `-p^{-1} mod 2^64`.
    const INV: u64;
}

/// Configuration of the BN254 scalar field (the order of G1 and G2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrConfig;

impl FpConfig for FrConfig {
    const MODULUS: [u64; 4] = [
        0x43e1f593f0000001,
        0x2833e84879b97091,
        0xb85045b68181585d,
        0x30644e72e131a029,
    ];
    const R: [u64; 4] = [
        0xac96341c4ffffffb,
        0x36fc76959f60cd29,
        0x666ea36f7879462e,
        0x0e0a77c19a07df2f,
    ];
    const R2: [u64; 4] = [
        0x1bb8e645ae216da7,
        0x53fe3ab1e35c59e3,
        0x8c49833d53bb8085,
        0x0216d0b17f4e44a5,
    ];
    const INV: u64 = 0xc2e1f593efffffff;
}

/// Configuration of the BN254 base field (the coordinate field of G1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FqConfig;

impl FpConfig for FqConfig {
    const MODULUS: [u64; 4] = [
        0x3c208c16d87cfd47,
        0x97816a916871ca8d,
        0xb85045b68181585d,
        0x30644e72e131a029,
    ];
    const R: [u64; 4] = [
        0xd35d438dc58f0d9d,
        0x0a78eb28f5c70b3d,
        0x666ea36f7879462c,
        0x0e0a77c19a07df2f,
    ];
    const R2: [u64; 4] = [
        0xf32cfc5b538afa89,
        0xb5e71911d44501fb,
        0x47ab1eff0a417ff6,
        0x06d89f71cab8351f,
    ];
    const INV: u64 = 0x87d20782e4866389;
}

/// The BN254 scalar field; witnesses, exponents and polynomial
/// coefficients live here.
pub type Fr = Fp<FrConfig>;

/// The BN254 base field; curve coordinates live here.
pub type Fq = Fp<FqConfig>;

// ---------------------------------------------------------------------------
// Fp
// ---------------------------------------------------------------------------

/// An element of the prime field described by `C`, in Montgomery form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fp<C: FpConfig>([u64; 4], PhantomData<C>);

impl<C: FpConfig> Fp<C> {
    /// The additive identity.
    pub const ZERO: Self = Fp([0; 4], PhantomData);
    /// The multiplicative identity.
    pub const ONE: Self = Fp(C::R, PhantomData);

    /// Builds an element from limbs already in Montgomery form.
    ///
    /// Meant for compile-time constants generated alongside the modulus;
    /// runtime construction goes through [`Fp::from_limbs`].
    pub const fn from_montgomery(limbs: [u64; 4]) -> Self {
        Fp(limbs, PhantomData)
    }

    /// Builds an element from canonical little-endian limbs, reducing
    /// modulo `p` if necessary.
    pub fn from_limbs(mut limbs: [u64; 4]) -> Self {
        while !limbs_lt(&limbs, &C::MODULUS) {
            limbs = limbs_sub(&limbs, &C::MODULUS).0;
        }
        Fp(mont_mul::<C>(&limbs, &C::R2), PhantomData)
    }

    /// The canonical little-endian limbs of this element.
    pub fn to_limbs(&self) -> [u64; 4] {
        mont_reduce::<C>([self.0[0], self.0[1], self.0[2], self.0[3], 0, 0, 0, 0])
    }

    /// Whether this element is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        limbs_is_zero(&self.0)
    }

    /// Whether this element is one.
    #[inline]
    pub fn is_one(&self) -> bool {
        self.0 == C::R
    }

    /// Doubles the element.
    #[inline]
    pub fn double(&self) -> Self {
        *self + *self
    }

    /// Squares the element.
    #[inline]
    pub fn square(&self) -> Self {
        *self * *self
    }

    /// Raises the element to a little-endian multi-limb exponent,
    /// square-and-multiply from the most significant bit down.
    pub fn pow(&self, exp: &[u64]) -> Self {
        let mut res = Self::ONE;
        for i in (0..exp.len() * 64).rev() {
            res = res.square();
            if (exp[i / 64] >> (i % 64)) & 1 == 1 {
                res *= *self;
            }
        }
        res
    }

    /// Raises the element to a machine-integer exponent.
    pub fn pow_u64(&self, exp: u64) -> Self {
        self.pow(&[exp])
    }

    /// Raises the element to the canonical value of another field element.
    pub fn pow_fp<D: FpConfig>(&self, exp: &Fp<D>) -> Self {
        self.pow(&exp.to_limbs())
    }

    /// The multiplicative inverse, computed with the binary extended
    /// Euclidean algorithm over the canonical 256-bit representative.
    ///
    /// By convention `inverse(0) = 0`; callers that divide must rule the
    /// zero case out themselves.
    pub fn inverse(&self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        let one = [1u64, 0, 0, 0];
        let mut u = self.to_limbs();
        let mut v = C::MODULUS;
        let mut b = one;
        let mut c = [0u64; 4];
        while u != one && v != one {
            while u[0] & 1 == 0 {
                limbs_shr1(&mut u, 0);
                if b[0] & 1 == 0 {
                    limbs_shr1(&mut b, 0);
                } else {
                    let (sum, carry) = limbs_add(&b, &C::MODULUS);
                    b = sum;
                    limbs_shr1(&mut b, carry);
                }
            }
            while v[0] & 1 == 0 {
                limbs_shr1(&mut v, 0);
                if c[0] & 1 == 0 {
                    limbs_shr1(&mut c, 0);
                } else {
                    let (sum, carry) = limbs_add(&c, &C::MODULUS);
                    c = sum;
                    limbs_shr1(&mut c, carry);
                }
            }
            if limbs_lt(&v, &u) {
                u = limbs_sub(&u, &v).0;
                b = sub_mod::<C>(&b, &c);
            } else {
                v = limbs_sub(&v, &u).0;
                c = sub_mod::<C>(&c, &b);
            }
        }
        let inv = if u == one { b } else { c };
        Fp(mont_mul::<C>(&inv, &C::R2), PhantomData)
    }

    /// Samples a uniform element of `[0, p)` by masked rejection sampling.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let mut limbs = [
                rng.next_u64(),
                rng.next_u64(),
                rng.next_u64(),
                rng.next_u64(),
            ];
            // Both BN254 moduli are below 2^254.
            limbs[3] &= (1u64 << 62) - 1;
            if limbs_lt(&limbs, &C::MODULUS) {
                return Fp(mont_mul::<C>(&limbs, &C::R2), PhantomData);
            }
        }
    }

    /// Encodes the canonical value as 32 little-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let limbs = self.to_limbs();
        let mut out = [0u8; 32];
        for (i, limb) in limbs.iter().enumerate() {
            out[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_le_bytes());
        }
        out
    }

    /// Decodes an element from at most 32 little-endian bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FieldError> {
        if bytes.len() > 32 {
            return Err(FieldError::InvalidFieldEncoding(format!(
                "expected at most 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut padded = [0u8; 32];
        padded[..bytes.len()].copy_from_slice(bytes);
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&padded[i * 8..(i + 1) * 8]);
            *limb = u64::from_le_bytes(chunk);
        }
        if !limbs_lt(&limbs, &C::MODULUS) {
            return Err(FieldError::InvalidFieldEncoding(
                "value not below the field modulus".to_string(),
            ));
        }
        Ok(Fp(mont_mul::<C>(&limbs, &C::R2), PhantomData))
    }

    /// Encodes the canonical value as 64 lowercase hex digits (big-endian).
    pub fn to_hex(&self) -> String {
        let mut bytes = self.to_bytes();
        bytes.reverse();
        hex::encode(bytes)
    }

    /// Decodes an element from a lowercase hex string, optionally
    /// `0x`-prefixed, of at most 64 digits.
    pub fn from_hex(s: &str) -> Result<Self, FieldError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() > 64 {
            return Err(FieldError::InvalidFieldEncoding(format!(
                "expected at most 64 hex digits, got {}",
                digits.len()
            )));
        }
        let padded = if digits.len() % 2 == 1 {
            format!("0{digits}")
        } else {
            digits.to_string()
        };
        let mut bytes = hex::decode(padded)
            .map_err(|e| FieldError::InvalidFieldEncoding(format!("bad hex: {e}")))?;
        bytes.reverse();
        Self::from_bytes(&bytes)
    }
}

#[inline]
fn sub_mod<C: FpConfig>(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let (diff, borrow) = limbs_sub(a, b);
    if borrow == 1 {
        limbs_add(&diff, &C::MODULUS).0
    } else {
        diff
    }
}

/// Schoolbook 256x256 -> 512-bit product.
fn full_mul(a: &[u64; 4], b: &[u64; 4]) -> [u64; 8] {
    let mut t = [0u64; 8];
    for i in 0..4 {
        let mut carry = 0;
        for j in 0..4 {
            let (lo, hi) = mac(t[i + j], a[i], b[j], carry);
            t[i + j] = lo;
            carry = hi;
        }
        t[i + 4] = carry;
    }
    t
}

/// Montgomery reduction of a 512-bit value: returns `t * 2^-256 mod p`.
fn mont_reduce<C: FpConfig>(mut t: [u64; 8]) -> [u64; 4] {
    let modulus = C::MODULUS;
    let mut carry2 = 0;
    for i in 0..4 {
        let m = t[i].wrapping_mul(C::INV);
        let (_, mut carry) = mac(t[i], m, modulus[0], 0);
        for j in 1..4 {
            let (lo, hi) = mac(t[i + j], m, modulus[j], carry);
            t[i + j] = lo;
            carry = hi;
        }
        let (lo, hi) = adc(t[i + 4], carry, carry2);
        t[i + 4] = lo;
        carry2 = hi;
    }
    let mut out = [t[4], t[5], t[6], t[7]];
    if carry2 == 1 || !limbs_lt(&out, &modulus) {
        out = limbs_sub(&out, &modulus).0;
    }
    out
}

#[inline]
fn mont_mul<C: FpConfig>(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    mont_reduce::<C>(full_mul(a, b))
}

impl<C: FpConfig> Default for Fp<C> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<C: FpConfig> From<u64> for Fp<C> {
    fn from(value: u64) -> Self {
        Fp(mont_mul::<C>(&[value, 0, 0, 0], &C::R2), PhantomData)
    }
}

impl<C: FpConfig> Add for Fp<C> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        let (sum, carry) = limbs_add(&self.0, &rhs.0);
        debug_assert_eq!(carry, 0);
        if limbs_lt(&sum, &C::MODULUS) {
            Fp(sum, PhantomData)
        } else {
            Fp(limbs_sub(&sum, &C::MODULUS).0, PhantomData)
        }
    }
}

impl<C: FpConfig> Sub for Fp<C> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Fp(sub_mod::<C>(&self.0, &rhs.0), PhantomData)
    }
}

impl<C: FpConfig> Mul for Fp<C> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Fp(mont_mul::<C>(&self.0, &rhs.0), PhantomData)
    }
}

impl<C: FpConfig> Div for Fp<C> {
    type Output = Self;

    /// Division via [`Fp::inverse`]; dividing by zero yields zero.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        self * rhs.inverse()
    }
}

impl<C: FpConfig> Neg for Fp<C> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        if self.is_zero() {
            self
        } else {
            Fp(limbs_sub(&C::MODULUS, &self.0).0, PhantomData)
        }
    }
}

impl<C: FpConfig> AddAssign for Fp<C> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<C: FpConfig> SubAssign for Fp<C> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<C: FpConfig> MulAssign for Fp<C> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<C: FpConfig> DivAssign for Fp<C> {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl<C: FpConfig> Sum for Fp<C> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<C: FpConfig> fmt::Debug for Fp<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl<C: FpConfig> fmt::Display for Fp<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_basic_arithmetic() {
        let a = Fr::from(5u64);
        let b = Fr::from(3u64);

        assert_eq!(a + b, Fr::from(8u64));
        assert_eq!(a * b, Fr::from(15u64));
        assert_eq!(a - b, Fr::from(2u64));
        assert_eq!(b - a, -Fr::from(2u64));
        assert_eq!(a.double(), Fr::from(10u64));
        assert_eq!(a.square(), Fr::from(25u64));
        assert!(!a.is_zero());
        assert!(Fr::ZERO.is_zero());
        assert!(Fr::ONE.is_one());
    }

    #[test]
    fn test_field_laws() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for _ in 0..32 {
            let a = Fr::random(&mut rng);
            let b = Fr::random(&mut rng);
            let c = Fr::random(&mut rng);

            assert_eq!(a + b, b + a);
            assert_eq!((a + b) + c, a + (b + c));
            assert_eq!(a * b, b * a);
            assert_eq!((a * b) * c, a * (b * c));
            assert_eq!(a * (b + c), a * b + a * c);
            assert_eq!(a + (-a), Fr::ZERO);
            assert_eq!(a * Fr::ONE, a);
        }
    }

    #[test]
    fn test_inverse() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        for _ in 0..32 {
            let a = Fr::random(&mut rng);
            if a.is_zero() {
                continue;
            }
            assert_eq!(a * a.inverse(), Fr::ONE);
        }
        let a = Fq::random(&mut rng);
        assert_eq!(a * a.inverse(), Fq::ONE);
        assert_eq!(Fr::ONE.inverse(), Fr::ONE);
    }

    #[test]
    fn test_inverse_of_zero_is_zero() {
        assert_eq!(Fr::ZERO.inverse(), Fr::ZERO);
        assert_eq!(Fq::ZERO.inverse(), Fq::ZERO);
        assert_eq!(Fr::from(7u64) / Fr::ZERO, Fr::ZERO);
    }

    #[test]
    fn test_fermat_little_theorem() {
        // a^(p-1) = 1 for a != 0.
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let a = Fr::random(&mut rng);
        let mut exp = FrConfig::MODULUS;
        exp[0] -= 1;
        assert_eq!(a.pow(&exp), Fr::ONE);

        let b = Fq::random(&mut rng);
        let mut exp = FqConfig::MODULUS;
        exp[0] -= 1;
        assert_eq!(b.pow(&exp), Fq::ONE);
    }

    #[test]
    fn test_pow() {
        let a = Fr::from(3u64);
        assert_eq!(a.pow_u64(0), Fr::ONE);
        assert_eq!(a.pow_u64(1), a);
        assert_eq!(a.pow_u64(5), Fr::from(243u64));
        assert_eq!(a.pow_fp(&Fr::from(4u64)), Fr::from(81u64));
    }

    #[test]
    fn test_from_limbs_reduces() {
        // p + 1 must reduce to 1.
        let mut limbs = FrConfig::MODULUS;
        limbs[0] += 1;
        assert_eq!(Fr::from_limbs(limbs), Fr::ONE);
    }

    #[test]
    fn test_byte_round_trip() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        for _ in 0..16 {
            let a = Fr::random(&mut rng);
            assert_eq!(Fr::from_bytes(&a.to_bytes()).unwrap(), a);
            let b = Fq::random(&mut rng);
            assert_eq!(Fq::from_bytes(&b.to_bytes()).unwrap(), b);
        }
    }

    #[test]
    fn test_bad_encodings_rejected() {
        assert!(Fr::from_bytes(&[0u8; 33]).is_err());
        // The modulus itself is out of range.
        let mut bytes = [0u8; 32];
        for (i, limb) in FrConfig::MODULUS.iter().enumerate() {
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_le_bytes());
        }
        assert!(Fr::from_bytes(&bytes).is_err());
        assert!(Fr::from_hex(&"f".repeat(65)).is_err());
        assert!(Fr::from_hex("zz").is_err());
    }

    #[test]
    fn test_hex_round_trip() {
        let a = Fr::from(500u64);
        assert_eq!(Fr::from_hex("0x1f4").unwrap(), a);
        assert_eq!(Fr::from_hex("1f4").unwrap(), a);
        assert_eq!(Fr::from_hex(&a.to_hex()).unwrap(), a);
        assert!(a.to_hex().ends_with("1f4"));
    }

    #[test]
    fn test_random_is_canonical() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        for _ in 0..64 {
            let a = Fr::random(&mut rng);
            assert!(limbs_lt(&a.to_limbs(), &FrConfig::MODULUS));
        }
    }

    proptest::proptest! {
        #[test]
        fn prop_add_sub_round_trip(x in proptest::prelude::any::<u64>(), y in proptest::prelude::any::<u64>()) {
            let a = Fr::from(x);
            let b = Fr::from(y);
            proptest::prop_assert_eq!(a + b - b, a);
        }

        #[test]
        fn prop_mul_matches_u64(x in 0u64..u32::MAX as u64, y in 0u64..u32::MAX as u64) {
            proptest::prop_assert_eq!(Fr::from(x) * Fr::from(y), Fr::from(x * y));
        }
    }
}
