//! Stable little-endian byte encodings for every exported value.
//!
//! Layouts:
//!
//! - `Fr`/`Fq`: 32 bytes, canonical little-endian.
//! - `G1`: flag byte (0 point, 1 identity) then affine `x || y`, 65 bytes.
//! - `G2`: flag byte then `Fq2(x) || Fq2(y)`, 129 bytes.
//! - `Proof`: `G1(pi_A) || G2(pi_B) || G1(pi_C)`.
//! - Keys and constraint systems: u64 counts and u64-length-prefixed
//!   vectors of the above, as documented on each function.
//!
//! Every decoder checks structure strictly; `decode(encode(x)) == x` holds
//! for all values, and top-level decoders reject trailing bytes.

use groth16_curve::{Affine, CurveConfig, G1, G2};
use groth16_field::{FieldError, Fq2, Fr};
use groth16_r1cs::{LinearCombination, R1cs, Term};

use crate::{Proof, ProvingKey, VerifyingKey};

/// Errors produced while decoding byte payloads.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A field element was malformed.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Input ended before the structure was complete.
    #[error("unexpected end of input: wanted {wanted} more bytes, had {remaining}")]
    UnexpectedEnd {
        /// Bytes the decoder still needed.
        wanted: usize,
        /// Bytes that were left.
        remaining: usize,
    },

    /// Input continued past the end of the structure.
    #[error("trailing bytes after a complete value")]
    TrailingBytes,

    /// A curve-point flag byte was neither 0 nor 1.
    #[error("invalid point flag {0:#04x}")]
    InvalidPointFlag(u8),

    /// A decoded point does not lie on its curve.
    #[error("decoded point is not on the curve")]
    PointNotOnCurve,

    /// A structural invariant failed (counts, index ranges).
    #[error("malformed structure: {0}")]
    Malformed(String),
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let remaining = self.bytes.len() - self.pos;
        if remaining < n {
            return Err(CodecError::UnexpectedEnd {
                wanted: n,
                remaining,
            });
        }
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn u64(&mut self) -> Result<u64, CodecError> {
        let mut chunk = [0u8; 8];
        chunk.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(chunk))
    }

    fn count(&mut self) -> Result<usize, CodecError> {
        let v = self.u64()?;
        usize::try_from(v).map_err(|_| CodecError::Malformed(format!("count {v} too large")))
    }

    fn fr(&mut self) -> Result<Fr, CodecError> {
        Ok(Fr::from_bytes(self.take(32)?)?)
    }

    fn finish(&self) -> Result<(), CodecError> {
        if self.pos != self.bytes.len() {
            return Err(CodecError::TrailingBytes);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

/// Encodes a G1 point: flag byte, then affine coordinates.
pub fn encode_g1(point: &G1) -> [u8; 65] {
    let affine = point.to_affine();
    let mut out = [0u8; 65];
    out[0] = u8::from(affine.infinity);
    out[1..33].copy_from_slice(&affine.x.to_bytes());
    out[33..65].copy_from_slice(&affine.y.to_bytes());
    out
}

/// Encodes a G2 point: flag byte, then `Fq2` coordinates.
pub fn encode_g2(point: &G2) -> [u8; 129] {
    let affine = point.to_affine();
    let mut out = [0u8; 129];
    out[0] = u8::from(affine.infinity);
    out[1..65].copy_from_slice(&affine.x.to_bytes());
    out[65..129].copy_from_slice(&affine.y.to_bytes());
    out
}

fn read_g1(reader: &mut Reader<'_>) -> Result<G1, CodecError> {
    let flag = reader.take(1)?[0];
    let x = groth16_field::Fq::from_bytes(reader.take(32)?)?;
    let y = groth16_field::Fq::from_bytes(reader.take(32)?)?;
    point_from_parts::<groth16_curve::G1Config>(flag, x, y)
}

fn read_g2(reader: &mut Reader<'_>) -> Result<G2, CodecError> {
    let flag = reader.take(1)?[0];
    let x = Fq2::from_bytes(reader.take(64)?)?;
    let y = Fq2::from_bytes(reader.take(64)?)?;
    point_from_parts::<groth16_curve::G2Config>(flag, x, y)
}

fn point_from_parts<C: CurveConfig>(
    flag: u8,
    x: C::Base,
    y: C::Base,
) -> Result<groth16_curve::Point<C>, CodecError> {
    let point = match flag {
        0 => Affine::<C> {
            x,
            y,
            infinity: false,
        }
        .to_projective(),
        1 => groth16_curve::Point::IDENTITY,
        other => return Err(CodecError::InvalidPointFlag(other)),
    };
    if !point.is_on_curve() {
        return Err(CodecError::PointNotOnCurve);
    }
    Ok(point)
}

/// Decodes a G1 point from exactly 65 bytes.
pub fn decode_g1(bytes: &[u8]) -> Result<G1, CodecError> {
    let mut reader = Reader::new(bytes);
    let point = read_g1(&mut reader)?;
    reader.finish()?;
    Ok(point)
}

/// Decodes a G2 point from exactly 129 bytes.
pub fn decode_g2(bytes: &[u8]) -> Result<G2, CodecError> {
    let mut reader = Reader::new(bytes);
    let point = read_g2(&mut reader)?;
    reader.finish()?;
    Ok(point)
}

// ---------------------------------------------------------------------------
// Proof
// ---------------------------------------------------------------------------

/// Encodes a proof as `G1 || G2 || G1`, 259 bytes.
pub fn encode_proof(proof: &Proof) -> Vec<u8> {
    let mut out = Vec::with_capacity(259);
    out.extend_from_slice(&encode_g1(&proof.a));
    out.extend_from_slice(&encode_g2(&proof.b));
    out.extend_from_slice(&encode_g1(&proof.c));
    out
}

/// Decodes a proof.
pub fn decode_proof(bytes: &[u8]) -> Result<Proof, CodecError> {
    let mut reader = Reader::new(bytes);
    let a = read_g1(&mut reader)?;
    let b = read_g2(&mut reader)?;
    let c = read_g1(&mut reader)?;
    reader.finish()?;
    Ok(Proof { a, b, c })
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

fn write_u64(out: &mut Vec<u8>, v: usize) {
    out.extend_from_slice(&(v as u64).to_le_bytes());
}

fn write_g1_vec(out: &mut Vec<u8>, points: &[G1]) {
    write_u64(out, points.len());
    for p in points {
        out.extend_from_slice(&encode_g1(p));
    }
}

fn write_g2_vec(out: &mut Vec<u8>, points: &[G2]) {
    write_u64(out, points.len());
    for p in points {
        out.extend_from_slice(&encode_g2(p));
    }
}

fn read_g1_vec(reader: &mut Reader<'_>) -> Result<Vec<G1>, CodecError> {
    let len = reader.count()?;
    let mut out = Vec::with_capacity(len.min(1 << 20));
    for _ in 0..len {
        out.push(read_g1(reader)?);
    }
    Ok(out)
}

fn read_g2_vec(reader: &mut Reader<'_>) -> Result<Vec<G2>, CodecError> {
    let len = reader.count()?;
    let mut out = Vec::with_capacity(len.min(1 << 20));
    for _ in 0..len {
        out.push(read_g2(reader)?);
    }
    Ok(out)
}

/// Encodes a proving key: the three u64 counts (`num_variables`,
/// `num_public`, `degree`), the u64-prefixed public index list, the five
/// group constants, then the five length-prefixed query vectors.
pub fn encode_proving_key(pk: &ProvingKey) -> Vec<u8> {
    let mut out = Vec::new();
    write_u64(&mut out, pk.num_variables);
    write_u64(&mut out, pk.num_public());
    write_u64(&mut out, pk.degree);
    for index in &pk.public_indices {
        write_u64(&mut out, *index);
    }
    out.extend_from_slice(&encode_g1(&pk.alpha_g1));
    out.extend_from_slice(&encode_g1(&pk.beta_g1));
    out.extend_from_slice(&encode_g2(&pk.beta_g2));
    out.extend_from_slice(&encode_g1(&pk.delta_g1));
    out.extend_from_slice(&encode_g2(&pk.delta_g2));
    write_g1_vec(&mut out, &pk.a_query_g1);
    write_g2_vec(&mut out, &pk.b_query_g2);
    write_g1_vec(&mut out, &pk.b_query_g1);
    write_g1_vec(&mut out, &pk.k_query_g1);
    write_g1_vec(&mut out, &pk.h_query_g1);
    out
}

/// Decodes a proving key.
pub fn decode_proving_key(bytes: &[u8]) -> Result<ProvingKey, CodecError> {
    let mut reader = Reader::new(bytes);
    let num_variables = reader.count()?;
    let num_public = reader.count()?;
    let degree = reader.count()?;
    let mut public_indices = Vec::with_capacity(num_public.min(1 << 20));
    for _ in 0..num_public {
        public_indices.push(reader.count()?);
    }
    let alpha_g1 = read_g1(&mut reader)?;
    let beta_g1 = read_g1(&mut reader)?;
    let beta_g2 = read_g2(&mut reader)?;
    let delta_g1 = read_g1(&mut reader)?;
    let delta_g2 = read_g2(&mut reader)?;
    let a_query_g1 = read_g1_vec(&mut reader)?;
    let b_query_g2 = read_g2_vec(&mut reader)?;
    let b_query_g1 = read_g1_vec(&mut reader)?;
    let k_query_g1 = read_g1_vec(&mut reader)?;
    let h_query_g1 = read_g1_vec(&mut reader)?;
    reader.finish()?;

    if public_indices.iter().any(|&i| i == 0 || i >= num_variables) {
        return Err(CodecError::Malformed(
            "public index out of range".to_string(),
        ));
    }
    if a_query_g1.len() != num_variables
        || b_query_g2.len() != num_variables
        || b_query_g1.len() != num_variables
    {
        return Err(CodecError::Malformed(
            "query vector length disagrees with variable count".to_string(),
        ));
    }
    if k_query_g1.len() + public_indices.len() + 1 != num_variables {
        return Err(CodecError::Malformed(
            "private query length disagrees with public split".to_string(),
        ));
    }
    if h_query_g1.len() != degree {
        return Err(CodecError::Malformed(
            "quotient query length disagrees with degree".to_string(),
        ));
    }

    Ok(ProvingKey {
        alpha_g1,
        beta_g1,
        beta_g2,
        delta_g1,
        delta_g2,
        a_query_g1,
        b_query_g2,
        b_query_g1,
        k_query_g1,
        h_query_g1,
        num_variables,
        degree,
        public_indices,
    })
}

/// Encodes a verifying key: u64 `num_public`, the four group constants,
/// then the length-prefixed IC vector.
pub fn encode_verifying_key(vk: &VerifyingKey) -> Vec<u8> {
    let mut out = Vec::new();
    write_u64(&mut out, vk.num_public);
    out.extend_from_slice(&encode_g1(&vk.alpha_g1));
    out.extend_from_slice(&encode_g2(&vk.beta_g2));
    out.extend_from_slice(&encode_g2(&vk.gamma_g2));
    out.extend_from_slice(&encode_g2(&vk.delta_g2));
    write_g1_vec(&mut out, &vk.ic_g1);
    out
}

/// Decodes a verifying key.
pub fn decode_verifying_key(bytes: &[u8]) -> Result<VerifyingKey, CodecError> {
    let mut reader = Reader::new(bytes);
    let num_public = reader.count()?;
    let alpha_g1 = read_g1(&mut reader)?;
    let beta_g2 = read_g2(&mut reader)?;
    let gamma_g2 = read_g2(&mut reader)?;
    let delta_g2 = read_g2(&mut reader)?;
    let ic_g1 = read_g1_vec(&mut reader)?;
    reader.finish()?;

    if ic_g1.len() != num_public + 1 {
        return Err(CodecError::Malformed(
            "IC length disagrees with public count".to_string(),
        ));
    }

    Ok(VerifyingKey {
        alpha_g1,
        beta_g2,
        gamma_g2,
        delta_g2,
        ic_g1,
        num_public,
    })
}

// ---------------------------------------------------------------------------
// R1CS
// ---------------------------------------------------------------------------

fn write_matrix(out: &mut Vec<u8>, matrix: &[LinearCombination]) {
    write_u64(out, matrix.len());
    for row in matrix {
        write_u64(out, row.terms.len());
        for term in &row.terms {
            write_u64(out, term.index);
            out.extend_from_slice(&term.coeff.to_bytes());
        }
    }
}

fn read_matrix(
    reader: &mut Reader<'_>,
    n_cons: usize,
    n_vars: usize,
) -> Result<Vec<LinearCombination>, CodecError> {
    let n_rows = reader.count()?;
    if n_rows != n_cons {
        return Err(CodecError::Malformed(format!(
            "matrix row count {n_rows} disagrees with constraint count {n_cons}"
        )));
    }
    let mut matrix = Vec::with_capacity(n_rows.min(1 << 20));
    for _ in 0..n_rows {
        let n_terms = reader.count()?;
        let mut terms = Vec::with_capacity(n_terms.min(1 << 20));
        for _ in 0..n_terms {
            let index = reader.count()?;
            if index >= n_vars {
                return Err(CodecError::Malformed(format!(
                    "term index {index} out of range for {n_vars} variables"
                )));
            }
            let coeff = reader.fr()?;
            terms.push(Term::new(index, coeff));
        }
        matrix.push(LinearCombination::from_terms(terms));
    }
    Ok(matrix)
}

/// Encodes a constraint system: `n_vars`, `n_cons`, the three matrices,
/// then the u64-prefixed public index list.
pub fn encode_r1cs(r1cs: &R1cs) -> Vec<u8> {
    let mut out = Vec::new();
    write_u64(&mut out, r1cs.n_vars);
    write_u64(&mut out, r1cs.n_cons);
    write_matrix(&mut out, &r1cs.a);
    write_matrix(&mut out, &r1cs.b);
    write_matrix(&mut out, &r1cs.c);
    write_u64(&mut out, r1cs.public_indices.len());
    for index in &r1cs.public_indices {
        write_u64(&mut out, *index);
    }
    out
}

/// Decodes a constraint system; rows come back in canonical form.
pub fn decode_r1cs(bytes: &[u8]) -> Result<R1cs, CodecError> {
    let mut reader = Reader::new(bytes);
    let n_vars = reader.count()?;
    if n_vars == 0 {
        return Err(CodecError::Malformed(
            "a constraint system has at least the constant variable".to_string(),
        ));
    }
    let n_cons = reader.count()?;
    let a = read_matrix(&mut reader, n_cons, n_vars)?;
    let b = read_matrix(&mut reader, n_cons, n_vars)?;
    let c = read_matrix(&mut reader, n_cons, n_vars)?;
    let n_public = reader.count()?;
    let mut public_indices = Vec::with_capacity(n_public.min(1 << 20));
    for _ in 0..n_public {
        let index = reader.count()?;
        if index == 0 || index >= n_vars {
            return Err(CodecError::Malformed(format!(
                "public index {index} out of range"
            )));
        }
        public_indices.push(index);
    }
    reader.finish()?;

    let mut r1cs = R1cs {
        n_vars,
        n_cons,
        a,
        b,
        c,
        public_indices,
    };
    r1cs.finalize();
    Ok(r1cs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup;
    use groth16_field::Fr;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn fr(v: u64) -> Fr {
        Fr::from(v)
    }

    fn mul_circuit() -> R1cs {
        let mut r1cs = R1cs::new();
        let x1 = r1cs.allocate_var();
        let x2 = r1cs.allocate_var();
        let x3 = r1cs.allocate_var();
        r1cs.add_mul(x1, x2, x3).unwrap();
        r1cs.mark_public(x3).unwrap();
        r1cs.finalize();
        r1cs
    }

    #[test]
    fn test_point_round_trips() {
        let mut rng = ChaCha20Rng::seed_from_u64(110);
        let p = G1::random(&mut rng);
        assert_eq!(decode_g1(&encode_g1(&p)).unwrap(), p);
        assert_eq!(decode_g1(&encode_g1(&G1::IDENTITY)).unwrap(), G1::IDENTITY);

        let q = G2::random(&mut rng);
        assert_eq!(decode_g2(&encode_g2(&q)).unwrap(), q);
        assert_eq!(decode_g2(&encode_g2(&G2::IDENTITY)).unwrap(), G2::IDENTITY);
    }

    #[test]
    fn test_bad_points_rejected() {
        let mut bytes = encode_g1(&G1::generator());
        bytes[0] = 7;
        assert!(matches!(
            decode_g1(&bytes),
            Err(CodecError::InvalidPointFlag(7))
        ));

        // Corrupt the x coordinate: almost surely off-curve.
        let mut bytes = encode_g1(&G1::generator());
        bytes[1] ^= 1;
        assert!(matches!(
            decode_g1(&bytes),
            Err(CodecError::PointNotOnCurve)
        ));

        assert!(matches!(
            decode_g1(&[0u8; 64]),
            Err(CodecError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_proof_round_trip() {
        let mut rng = ChaCha20Rng::seed_from_u64(111);
        let proof = Proof {
            a: G1::random(&mut rng),
            b: G2::random(&mut rng),
            c: G1::random(&mut rng),
        };
        let bytes = encode_proof(&proof);
        assert_eq!(bytes.len(), 259);
        assert_eq!(decode_proof(&bytes).unwrap(), proof);

        let mut extended = bytes.clone();
        extended.push(0);
        assert!(matches!(
            decode_proof(&extended),
            Err(CodecError::TrailingBytes)
        ));
    }

    #[test]
    fn test_key_round_trips() {
        let mut rng = ChaCha20Rng::seed_from_u64(112);
        let crs = setup(&mul_circuit(), &mut rng).unwrap();

        let pk_bytes = encode_proving_key(&crs.pk);
        let pk = decode_proving_key(&pk_bytes).unwrap();
        assert_eq!(pk.num_variables, crs.pk.num_variables);
        assert_eq!(pk.degree, crs.pk.degree);
        assert_eq!(pk.public_indices, crs.pk.public_indices);
        assert_eq!(pk.alpha_g1, crs.pk.alpha_g1);
        assert_eq!(pk.a_query_g1, crs.pk.a_query_g1);
        assert_eq!(pk.k_query_g1, crs.pk.k_query_g1);
        assert_eq!(encode_proving_key(&pk), pk_bytes);

        let vk_bytes = encode_verifying_key(&crs.vk);
        let vk = decode_verifying_key(&vk_bytes).unwrap();
        assert_eq!(vk.num_public, crs.vk.num_public);
        assert_eq!(vk.ic_g1, crs.vk.ic_g1);
        assert_eq!(encode_verifying_key(&vk), vk_bytes);
    }

    #[test]
    fn test_r1cs_round_trip() {
        let r1cs = mul_circuit();
        let bytes = encode_r1cs(&r1cs);
        let decoded = decode_r1cs(&bytes).unwrap();
        assert_eq!(decoded.n_vars, r1cs.n_vars);
        assert_eq!(decoded.n_cons, r1cs.n_cons);
        assert_eq!(decoded.public_indices, r1cs.public_indices);
        assert_eq!(decoded.a, r1cs.a);
        assert_eq!(decoded.b, r1cs.b);
        assert_eq!(decoded.c, r1cs.c);
        // Same satisfiability behavior after the round trip.
        let x = vec![Fr::ONE, fr(3), fr(4), fr(12)];
        assert!(decoded.is_satisfied(&x).unwrap());
    }

    #[test]
    fn test_malformed_r1cs_rejected() {
        let r1cs = mul_circuit();
        let mut bytes = encode_r1cs(&r1cs);
        // Claim a public index beyond n_vars.
        let len = bytes.len();
        bytes[len - 8..].copy_from_slice(&100u64.to_le_bytes());
        assert!(matches!(
            decode_r1cs(&bytes),
            Err(CodecError::Malformed(_))
        ));
        assert!(decode_r1cs(&[]).is_err());
    }
}
