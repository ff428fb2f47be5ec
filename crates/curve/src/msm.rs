//! Multi-scalar multiplication.
//!
//! [`naive_msm`] is the reference loop of scalar multiplications; the
//! windowed bucket variant is observationally identical on every input and
//! spreads its windows across threads.

use groth16_field::Fr;
use rayon::prelude::*;

use crate::{CurveConfig, CurveError, Point};

/// Window width in bits for the bucketed variant.
const WINDOW_BITS: usize = 4;

/// Reference implementation: the sum of per-term scalar multiplications.
pub fn naive_msm<C: CurveConfig>(
    scalars: &[Fr],
    points: &[Point<C>],
) -> Result<Point<C>, CurveError> {
    check_lengths(scalars, points)?;
    let mut acc = Point::IDENTITY;
    for (scalar, point) in scalars.iter().zip(points.iter()) {
        acc += point.mul_scalar(scalar);
    }
    Ok(acc)
}

/// Windowed bucket multi-scalar multiplication.
///
/// Scalars are split into 4-bit windows; each window accumulates points
/// into buckets indexed by digit value and folds them with a running sum.
/// Window sums are combined from the most significant window down.
pub fn windowed_msm<C: CurveConfig>(
    scalars: &[Fr],
    points: &[Point<C>],
) -> Result<Point<C>, CurveError> {
    check_lengths(scalars, points)?;
    if scalars.is_empty() {
        return Ok(Point::IDENTITY);
    }

    let scalar_bytes: Vec<[u8; 32]> = scalars.iter().map(|s| s.to_bytes()).collect();
    let num_windows = 256 / WINDOW_BITS;

    let window_sums: Vec<Point<C>> = (0..num_windows)
        .into_par_iter()
        .map(|w| {
            let mut buckets = vec![Point::<C>::IDENTITY; (1 << WINDOW_BITS) - 1];
            for (bytes, point) in scalar_bytes.iter().zip(points.iter()) {
                let digit = window_digit(bytes, w);
                if digit != 0 {
                    buckets[digit - 1] += *point;
                }
            }
            // Running-sum fold: bucket i contributes (i+1) times.
            let mut running = Point::IDENTITY;
            let mut sum = Point::IDENTITY;
            for bucket in buckets.iter().rev() {
                running += *bucket;
                sum += running;
            }
            sum
        })
        .collect();

    let mut total = Point::IDENTITY;
    for sum in window_sums.iter().rev() {
        for _ in 0..WINDOW_BITS {
            total = total.double();
        }
        total += *sum;
    }
    Ok(total)
}

/// Extracts the `w`-th 4-bit window of a little-endian scalar encoding.
#[inline]
fn window_digit(bytes: &[u8; 32], w: usize) -> usize {
    let byte = bytes[w / 2];
    if w % 2 == 0 {
        (byte & 0x0f) as usize
    } else {
        (byte >> 4) as usize
    }
}

#[inline]
fn check_lengths<C: CurveConfig>(scalars: &[Fr], points: &[Point<C>]) -> Result<(), CurveError> {
    if scalars.len() != points.len() {
        return Err(CurveError::LengthMismatch {
            scalars: scalars.len(),
            points: points.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{G1, G2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_empty_msm_is_identity() {
        assert_eq!(naive_msm::<crate::G1Config>(&[], &[]).unwrap(), G1::IDENTITY);
        assert_eq!(
            windowed_msm::<crate::G1Config>(&[], &[]).unwrap(),
            G1::IDENTITY
        );
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = naive_msm(&[Fr::ONE], &[G1::generator(), G1::generator()]);
        assert!(matches!(err, Err(CurveError::LengthMismatch { .. })));
        let err = windowed_msm(&[Fr::ONE], &[G1::generator(), G1::generator()]);
        assert!(matches!(err, Err(CurveError::LengthMismatch { .. })));
    }

    #[test]
    fn test_windowed_matches_naive_g1() {
        let mut rng = ChaCha20Rng::seed_from_u64(50);
        for n in [1usize, 2, 3, 7, 16] {
            let scalars: Vec<Fr> = (0..n).map(|_| Fr::random(&mut rng)).collect();
            let points: Vec<G1> = (0..n).map(|_| G1::random(&mut rng)).collect();
            assert_eq!(
                windowed_msm(&scalars, &points).unwrap(),
                naive_msm(&scalars, &points).unwrap()
            );
        }
    }

    #[test]
    fn test_windowed_matches_naive_g2() {
        let mut rng = ChaCha20Rng::seed_from_u64(51);
        let scalars: Vec<Fr> = (0..5).map(|_| Fr::random(&mut rng)).collect();
        let points: Vec<G2> = (0..5).map(|_| G2::random(&mut rng)).collect();
        assert_eq!(
            windowed_msm(&scalars, &points).unwrap(),
            naive_msm(&scalars, &points).unwrap()
        );
    }

    #[test]
    fn test_zero_and_one_scalars() {
        let mut rng = ChaCha20Rng::seed_from_u64(52);
        let p = G1::random(&mut rng);
        let q = G1::random(&mut rng);
        let scalars = vec![Fr::ZERO, Fr::ONE];
        let points = vec![p, q];
        assert_eq!(naive_msm(&scalars, &points).unwrap(), q);
        assert_eq!(windowed_msm(&scalars, &points).unwrap(), q);
    }
}
