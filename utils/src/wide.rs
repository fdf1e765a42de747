//! Schnorr responses over the integers.
//!
//! The protocol commits to the same secret scalar on two curves whose prime orders
//! differ (the twisted Edwards subgroup on one side, a pairing group on the other).
//! A response `z = blinding + c * witness` reduced in either scalar field is only
//! meaningful in that one group; computed over the integers it acts as a correct
//! exponent in both, since `P * z` reduces `z` modulo the order of `P` implicitly.
//!
//! Responses are therefore carried as fixed-width [`BigInt`] limbs and applied with
//! [`AffineRepr::mul_bigint`], which performs plain double-and-add over the limbs.
//! Widths are chosen so the integer arithmetic cannot overflow: with 256-bit
//! challenges and witnesses below 2^256, `blinding + c * witness` fits 8 limbs, and
//! with product witnesses (below 2^512) it fits 12.

use ark_ff::{BigInt, BigInteger, PrimeField};
use num_bigint::BigUint;

/// A Fiat-Shamir challenge as an unreduced 256-bit integer.
pub type WideChallenge = BigInt<4>;

/// `blinding + challenge * witness` for a field-element witness.
pub type WideResponse = BigInt<8>;

/// `blinding + challenge * witness` for a witness that is itself a product of two
/// field elements.
pub type WideResponseLong = BigInt<12>;

/// The integer value of a field element.
pub fn scalar_to_biguint<F: PrimeField>(f: &F) -> BigUint {
    f.into_bigint().into()
}

/// Pack an arbitrary-precision integer into `N` little-endian limbs.
///
/// Panics if the value needs more than `N` limbs; callers pick `N` from the known bit
/// sizes of their inputs, so hitting the assert is a precondition violation.
pub fn biguint_to_fixed<const N: usize>(x: &BigUint) -> BigInt<N> {
    let digits = x.to_u64_digits();
    assert!(digits.len() <= N, "integer wider than the response type");
    let mut limbs = [0u64; N];
    limbs[..digits.len()].copy_from_slice(&digits);
    BigInt::new(limbs)
}

/// `blinding + challenge * witness` over the integers, for witnesses living in a
/// scalar field.
pub fn schnorr_response<F: PrimeField, const N: usize>(
    blinding: &F,
    challenge: &WideChallenge,
    witness: &F,
) -> BigInt<N> {
    schnorr_response_wide(
        &scalar_to_biguint(blinding),
        challenge,
        &scalar_to_biguint(witness),
    )
}

/// `blinding + challenge * witness` over the integers, for witnesses already held as
/// integers (e.g. products of two scalars).
pub fn schnorr_response_wide<const N: usize>(
    blinding: &BigUint,
    challenge: &WideChallenge,
    witness: &BigUint,
) -> BigInt<N> {
    let c: BigUint = (*challenge).into();
    biguint_to_fixed(&(blinding + c * witness))
}

/// Fixed 32-byte big-endian encoding of a field element, left-zero-padded.
///
/// This width is load-bearing for the XOR masking scheme: both sides of every XOR must
/// be exactly 32 bytes or the masking is semantically wrong.
pub fn scalar_to_fixed_bytes<F: PrimeField>(f: &F) -> [u8; 32] {
    let bytes = f.into_bigint().to_bytes_be();
    assert!(bytes.len() <= 32, "field element wider than 32 bytes");
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}
