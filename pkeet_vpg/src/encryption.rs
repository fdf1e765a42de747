//! Masked ElGamal-style encryption of a curve point.
//!
//! For plaintext point `M` and ephemeral scalar `r`, the ciphertext is
//! `U = g * r`, `V = M * r` and three 32-byte blocks `W_i = H_i ⊕ (r, M.x, M.y)` where
//! each mask `H_i` is a Poseidon hash of `(U, V, Y, i * g)` coordinates and `Y = PK * r`.
//! The recipient recomputes `Y` from `U` with the secret key, strips the masks and
//! accepts only if the recovered `(r, M)` reproduce `U` and `V`.
//!
//! `W` is kept as raw bytes: the XOR output is not guaranteed to be a canonical field
//! element, and decryption needs the exact bytes back. The SNARK side reduces the blocks
//! into field elements instead (see [`crate::snark::public_inputs`]).

use crate::{
    error::Error,
    setup::{EncryptionKey, SecretKey},
};
use ark_crypto_primitives::sponge::{
    poseidon::{PoseidonConfig, PoseidonSponge},
    Absorb, CryptographicSponge, FieldBasedCryptographicSponge,
};
use ark_ec::{
    twisted_edwards::{Affine, TECurveConfig},
    AffineRepr, CurveGroup,
};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{fmt, rand::RngCore, vec::Vec, UniformRand};
use num_bigint::BigUint;
use pkeet_utils::{serde_utils::ArkObjectBytes, wide::scalar_to_fixed_bytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The publishable ciphertext.
#[serde_as]
#[derive(Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Ciphertext<P: TECurveConfig> {
    /// `g * r`
    #[serde_as(as = "ArkObjectBytes")]
    pub U: Affine<P>,
    /// `M * r`
    #[serde_as(as = "ArkObjectBytes")]
    pub V: Affine<P>,
    /// Masked `(r, M.x, M.y)`, one 32-byte big-endian block each.
    pub W: [[u8; 32]; 3],
}

impl<P: TECurveConfig> fmt::Debug for Ciphertext<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ciphertext")
            .field("U", &self.U)
            .field("V", &self.V)
            .field("W", &self.W)
            .finish()
    }
}

/// Sender-side result of an encryption. Keeps the plaintext and the ephemeral `r`,
/// which the proofs and the equality token need again.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Encrypted<P: TECurveConfig> {
    #[zeroize(skip)]
    pub M: Affine<P>,
    /// `PK * r`. Published alongside the ciphertext as a SNARK public input.
    #[zeroize(skip)]
    pub Y: Affine<P>,
    pub(crate) r: P::ScalarField,
    #[zeroize(skip)]
    pub ciphertext: Ciphertext<P>,
}

/// The three Poseidon masks for a ciphertext. Block `i` absorbs the coordinates of
/// `U, V, Y` and of the marker point `(i + 1) * g`, in that order; the marker is what
/// separates the three blocks.
fn derive_masks<P: TECurveConfig>(
    poseidon: &PoseidonConfig<P::BaseField>,
    U: &Affine<P>,
    V: &Affine<P>,
    Y: &Affine<P>,
) -> [[u8; 32]; 3]
where
    P::BaseField: PrimeField + Absorb,
{
    let g = Affine::<P>::generator();
    let mut masks = [[0u8; 32]; 3];
    for (i, mask) in masks.iter_mut().enumerate() {
        let marker = g.mul_bigint([i as u64 + 1]).into_affine();
        let mut sponge = PoseidonSponge::new(poseidon);
        for coord in [U.x, U.y, V.x, V.y, Y.x, Y.y, marker.x, marker.y] {
            sponge.absorb(&coord);
        }
        let h: P::BaseField = sponge.squeeze_native_field_elements(1)[0];
        *mask = scalar_to_fixed_bytes(&h);
    }
    masks
}

pub fn encrypt<R: RngCore, P: TECurveConfig>(
    rng: &mut R,
    ek: &EncryptionKey<P>,
    M: &Affine<P>,
    poseidon: &PoseidonConfig<P::BaseField>,
) -> Encrypted<P>
where
    P::BaseField: PrimeField + Absorb,
{
    let r = P::ScalarField::rand(rng);
    let g = Affine::<P>::generator();
    let U = (g * r).into_affine();
    let V = (*M * r).into_affine();
    let Y = (ek.0 * r).into_affine();

    let masks = derive_masks(poseidon, &U, &V, &Y);
    let blocks = [
        scalar_to_fixed_bytes(&r),
        scalar_to_fixed_bytes(&M.x),
        scalar_to_fixed_bytes(&M.y),
    ];
    let mut W = [[0u8; 32]; 3];
    for i in 0..3 {
        for j in 0..32 {
            W[i][j] = masks[i][j] ^ blocks[i][j];
        }
    }

    Encrypted {
        M: *M,
        Y,
        r,
        ciphertext: Ciphertext { U, V, W },
    }
}

impl<P: TECurveConfig> Ciphertext<P>
where
    P::BaseField: PrimeField + Absorb,
{
    /// Strip the masks with the recipient key and re-derive the ciphertext from the
    /// recovered values. A wrong key or a tampered ciphertext fails the re-derivation
    /// and yields [`Error::InvalidDecryption`].
    pub fn decrypt(
        &self,
        sk: &SecretKey<P::ScalarField>,
        poseidon: &PoseidonConfig<P::BaseField>,
    ) -> crate::Result<Affine<P>> {
        let Y = (self.U * sk.0).into_affine();
        let masks = derive_masks(poseidon, &self.U, &self.V, &Y);

        let mut blocks = [[0u8; 32]; 3];
        for i in 0..3 {
            for j in 0..32 {
                blocks[i][j] = masks[i][j] ^ self.W[i][j];
            }
        }
        // r is recovered as an integer, not a field element: it must act as the same
        // exponent the sender used, without reduction surprises
        let r_digits: Vec<u64> = BigUint::from_bytes_be(&blocks[0]).to_u64_digits();
        let x = P::BaseField::from_be_bytes_mod_order(&blocks[1]);
        let y = P::BaseField::from_be_bytes_mod_order(&blocks[2]);
        let M = Affine::<P>::new_unchecked(x, y);

        let g = Affine::<P>::generator();
        if g.mul_bigint(r_digits.as_slice()).into_affine() == self.U
            && M.mul_bigint(r_digits.as_slice()).into_affine() == self.V
        {
            Ok(M)
        } else {
            Err(Error::InvalidDecryption)
        }
    }
}

impl<P: TECurveConfig> Encrypted<P>
where
    P::BaseField: PrimeField + Absorb,
{
    /// Decrypt and additionally check the result against the plaintext this encryption
    /// was built from.
    pub fn decrypt(
        &self,
        sk: &SecretKey<P::ScalarField>,
        poseidon: &PoseidonConfig<P::BaseField>,
    ) -> crate::Result<Affine<P>> {
        let M = self.ciphertext.decrypt(sk, poseidon)?;
        if M == self.M {
            Ok(M)
        } else {
            Err(Error::DecryptedPlaintextMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::{keygen, poseidon_config};
    use ark_ed_on_bn254::{EdwardsAffine, EdwardsConfig, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let mut rng = StdRng::seed_from_u64(200u64);
        let poseidon = poseidon_config();
        let (sk, ek) = keygen::<_, EdwardsConfig>(&mut rng);
        let M = (EdwardsAffine::generator() * Fr::from(42u64)).into_affine();

        let enc = encrypt(&mut rng, &ek, &M, &poseidon);
        assert_eq!(enc.ciphertext.decrypt(&sk, &poseidon).unwrap(), M);
        assert_eq!(enc.decrypt(&sk, &poseidon).unwrap(), M);
    }

    #[test]
    fn wrong_key_fails() {
        let mut rng = StdRng::seed_from_u64(201u64);
        let poseidon = poseidon_config();
        let (sk, ek) = keygen::<_, EdwardsConfig>(&mut rng);
        let M = (EdwardsAffine::generator() * Fr::from(42u64)).into_affine();

        let enc = encrypt(&mut rng, &ek, &M, &poseidon);
        let bad_sk = SecretKey(sk.0 + Fr::from(1u64));
        assert!(matches!(
            enc.ciphertext.decrypt(&bad_sk, &poseidon),
            Err(Error::InvalidDecryption)
        ));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let mut rng = StdRng::seed_from_u64(202u64);
        let poseidon = poseidon_config();
        let (sk, ek) = keygen::<_, EdwardsConfig>(&mut rng);
        let M = (EdwardsAffine::generator() * Fr::from(42u64)).into_affine();

        let enc = encrypt(&mut rng, &ek, &M, &poseidon);
        let mut ct = enc.ciphertext.clone();
        ct.W[0][31] ^= 1;
        assert!(matches!(
            ct.decrypt(&sk, &poseidon),
            Err(Error::InvalidDecryption)
        ));
    }

    #[test]
    fn ciphertexts_of_same_point_differ() {
        let mut rng = StdRng::seed_from_u64(203u64);
        let poseidon = poseidon_config();
        let (_, ek) = keygen::<_, EdwardsConfig>(&mut rng);
        let M = (EdwardsAffine::generator() * Fr::from(42u64)).into_affine();

        let a = encrypt(&mut rng, &ek, &M, &poseidon);
        let b = encrypt(&mut rng, &ek, &M, &poseidon);
        assert_ne!(a.ciphertext, b.ciphertext);
    }
}
