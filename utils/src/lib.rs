#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Common code for the PKEET-VPG crates.
//!
//! - [`transcript`]: an ordered, byte-exact Fiat-Shamir transcript producing wide
//!   (unreduced) challenges usable as exponents in groups of different prime order.
//! - [`wide`]: Schnorr responses computed over the integers, so one response
//!   verifies the same secret in two unrelated groups.
//! - [`hashing_utils`]: deterministic hash-to-curve for deriving setup generators.
//! - [`serde_utils`]: serde adapters for arkworks objects.

pub mod hashing_utils;
pub mod serde_utils;
pub mod transcript;
pub mod wide;
