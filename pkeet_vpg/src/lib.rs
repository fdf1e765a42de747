#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Public-key encryption with equality test, verifiable via proof generation (PKEET-VPG).
//!
//! A sender commits to a secret identity scalar on two algebraically independent groups
//! (a twisted Edwards curve and the G1 of a pairing-friendly curve), encrypts the
//! committed point under a recipient's key with a hash-and-XOR masked ElGamal scheme,
//! and publishes a pairing-testable token that lets an untrusted tester decide whether
//! two ciphertexts hide the same plaintext without learning it. Two proofs tie the
//! published values together:
//!
//! - a Groth16 proof that the ciphertext is well formed ([`circuit`], [`snark`]), and
//! - a cross-group sigma proof that commitment, ciphertext and token all encode the
//!   same hidden scalars ([`consistency`]).
//!
//! The twisted Edwards curve must be defined over the pairing curve's scalar field
//! (e.g. Baby Jubjub over BN254), which is what lets the circuit do native curve
//! arithmetic. [`protocol::PkeetVpg`] sequences the whole flow.

pub mod circuit;
pub mod commitment;
pub mod consistency;
pub mod encryption;
pub mod equality;
pub mod error;
pub mod protocol;
pub mod setup;
pub mod snark;
#[cfg(test)]
pub mod tests;

pub type Result<T> = core::result::Result<T, error::Error>;
