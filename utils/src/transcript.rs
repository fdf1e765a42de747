//! Fiat-Shamir transcript for the sigma protocols.
//!
//! Both sigma protocols in this workspace (the dual Pedersen opening proof and the
//! cross-group consistency proof) hash an ordered list of group elements into a single
//! challenge. The ordering is a hard contract between prover and verifier: any deviation
//! silently breaks soundness. Routing every transcript through this one builder keeps
//! the ordering logic in one place.
//!
//! The challenge is kept as a 256-bit integer and never reduced into a scalar field,
//! because the same challenge multiplies secrets that act as exponents in two groups of
//! different prime order. See [`crate::wide`].

use crate::wide::{biguint_to_fixed, WideChallenge};
use ark_serialize::{CanonicalSerialize, SerializationError};
use ark_std::vec::Vec;
use digest::Digest;
use num_bigint::BigUint;

/// Accumulates canonical serializations of transcript elements in append order and
/// hashes them into one challenge.
#[derive(Default, Clone, Debug)]
pub struct ChallengeBuilder {
    bytes: Vec<u8>,
}

impl ChallengeBuilder {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Append one element. `serialize_compressed` is canonical per point, which is what
    /// makes the resulting challenge well-defined across prover and verifier.
    pub fn append<T: CanonicalSerialize>(&mut self, element: &T) -> Result<(), SerializationError> {
        element.serialize_compressed(&mut self.bytes)
    }

    /// Hash the transcript with `D` and interpret (at most) the first 32 bytes of the
    /// digest as a big-endian 256-bit integer.
    pub fn finish<D: Digest>(self) -> WideChallenge {
        let out = D::digest(&self.bytes);
        let take = core::cmp::min(32, out.len());
        biguint_to_fixed(&BigUint::from_bytes_be(&out[..take]))
    }
}
