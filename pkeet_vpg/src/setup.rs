//! Keys and public parameters: the recipient key pair, the per-round token generator
//! and the Poseidon sponge configuration shared by the native encryption code and the
//! well-formedness circuit.

use ark_crypto_primitives::sponge::poseidon::{find_poseidon_ark_and_mds, PoseidonConfig};
use ark_ec::{
    pairing::Pairing,
    twisted_edwards::{Affine, TECurveConfig},
    AffineRepr, CurveGroup,
};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, UniformRand};
use digest::Digest;
use pkeet_utils::{hashing_utils::affine_group_elem_from_try_and_incr, serde_utils::ArkObjectBytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Decryption key of the recipient.
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct SecretKey<F: PrimeField>(#[serde_as(as = "ArkObjectBytes")] pub F);

/// Encryption key `PK = g * sk` on the commitment curve.
#[serde_as]
#[derive(Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EncryptionKey<P: TECurveConfig>(#[serde_as(as = "ArkObjectBytes")] pub Affine<P>);

pub fn keygen<R: RngCore, P: TECurveConfig>(
    rng: &mut R,
) -> (SecretKey<P::ScalarField>, EncryptionKey<P>) {
    let sk = P::ScalarField::rand(rng);
    let pk = (Affine::<P>::generator() * sk).into_affine();
    (SecretKey(sk), EncryptionKey(pk))
}

/// Generator `HR` in G2 shared by every equality token of one matching round. Tokens
/// built under different round generators are not comparable.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
pub struct RoundGenerator<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G2Affine);

impl<E: Pairing> RoundGenerator<E> {
    pub fn new_using_rng<R: RngCore>(rng: &mut R) -> Self {
        Self(E::G2::rand(rng).into_affine())
    }

    /// Derive the round generator from a public round label so all participants agree
    /// on it without coordination.
    pub fn new<D: Digest>(label: &[u8]) -> Self {
        Self(affine_group_elem_from_try_and_incr::<E::G2Affine, D>(label))
    }
}

/// Sponge parameters for the three-block masking hash. The same configuration drives
/// the native sponge during encryption/decryption and the in-circuit sponge, so the
/// two derivations agree bit for bit.
pub fn poseidon_config<F: PrimeField>() -> PoseidonConfig<F> {
    let (ark, mds) =
        find_poseidon_ark_and_mds::<F>(F::MODULUS_BIT_SIZE as u64, 2, 8, 56, 0);
    PoseidonConfig {
        full_rounds: 8,
        partial_rounds: 56,
        alpha: 5,
        ark,
        mds,
        rate: 2,
        capacity: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};
    use ark_ed_on_bn254::EdwardsConfig;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;

    #[test]
    fn keygen_produces_matching_pair() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (sk, pk) = keygen::<_, EdwardsConfig>(&mut rng);
        assert_eq!(
            (ark_ed_on_bn254::EdwardsAffine::generator() * sk.0).into_affine(),
            pk.0
        );
    }

    #[test]
    fn round_generator_is_label_deterministic() {
        let a = RoundGenerator::<Bn254>::new::<Blake2b512>(b"epoch-7");
        let b = RoundGenerator::<Bn254>::new::<Blake2b512>(b"epoch-7");
        assert_eq!(a, b);
        assert_ne!(a, RoundGenerator::<Bn254>::new::<Blake2b512>(b"epoch-8"));
    }

    #[test]
    fn poseidon_config_shape() {
        let cfg = poseidon_config::<Fr>();
        assert_eq!(cfg.ark.len(), cfg.full_rounds + cfg.partial_rounds);
        assert_eq!(cfg.mds.len(), cfg.rate + cfg.capacity);
    }
}
