//! Dual-group Pedersen commitment to the identity scalar, with a two-generator Schnorr
//! proof that both commitments open to the same `(uid, k)`.
//!
//! The identity point `M = g * uid` and blinded commitment `B = M + H * k` are published
//! on the commitment curve, and their analogues `M̂ = ĝ * uid`, `B̂ = M̂ + Ĥ * k` on the
//! pairing curve's G1. The two curves have different scalar fields, so the Schnorr
//! responses are computed over the integers (see [`pkeet_utils::wide`]) and apply to
//! either group via unreduced multi-limb scalar multiplication.

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{rand::RngCore, UniformRand};
use digest::Digest;
use pkeet_utils::{
    serde_utils::ArkObjectBytes,
    transcript::ChallengeBuilder,
    wide::{schnorr_response, WideChallenge, WideResponse},
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Proof of knowledge of `(uid, k)` opening `B` and `B̂` simultaneously. Responses are
/// unreduced integers so the same pair verifies on both groups.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
pub struct ContentProof {
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: WideChallenge,
    #[serde_as(as = "ArkObjectBytes")]
    pub z_uid: WideResponse,
    #[serde_as(as = "ArkObjectBytes")]
    pub z_k: WideResponse,
}

/// A sender's committed identity on both groups. `G1` is the commitment (twisted
/// Edwards) curve, `G2` the pairing curve's first group.
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
pub struct Content<G1: AffineRepr, G2: AffineRepr> {
    /// Commitment blinding. Stays with the sender, needed again by the consistency proof.
    #[serde_as(as = "ArkObjectBytes")]
    pub(crate) k: G1::ScalarField,
    /// `g * uid`, the plaintext of the encryption.
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub M: G1,
    /// Pedersen base `g * u` for fresh random `u`.
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub H: G1,
    /// `M + H * k`.
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub B: G1,
    /// `ĝ * uid`, base point of the equality token.
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub M_hat: G2,
    /// `ĝ * u'` for fresh random `u'`.
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub H_hat: G2,
    /// `M̂ + Ĥ * k`.
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub B_hat: G2,
    #[zeroize(skip)]
    pub proof: ContentProof,
}

impl<G1: AffineRepr, G2: AffineRepr> Content<G1, G2> {
    /// Commit to `uid` on both groups and prove the openings agree. `uid` and the
    /// blinding `k` live in the smaller (commitment curve) scalar field so they are
    /// valid exponents on either group.
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        uid: &G1::ScalarField,
    ) -> Result<Self, SerializationError> {
        let g = G1::generator();
        let g_hat = G2::generator();

        let uid_repr = uid.into_bigint();
        let M = g.mul_bigint(uid_repr).into_affine();
        let M_hat = g_hat.mul_bigint(uid_repr).into_affine();

        let u = G1::ScalarField::rand(rng);
        let H = g.mul_bigint(u.into_bigint()).into_affine();
        let u1 = G1::ScalarField::rand(rng);
        let H_hat = g_hat.mul_bigint(u1.into_bigint()).into_affine();

        let k = G1::ScalarField::rand(rng);
        let k_repr = k.into_bigint();
        let B = (H.mul_bigint(k_repr) + M.into_group()).into_affine();
        let B_hat = (H_hat.mul_bigint(k_repr) + M_hat.into_group()).into_affine();

        let r_uid = G1::ScalarField::rand(rng);
        let r_k = G1::ScalarField::rand(rng);
        let t = (g.mul_bigint(r_uid.into_bigint()) + H.mul_bigint(r_k.into_bigint())).into_affine();
        let t_hat = (g_hat.mul_bigint(r_uid.into_bigint()) + H_hat.mul_bigint(r_k.into_bigint()))
            .into_affine();

        let challenge = Self::compute_challenge::<D>(&B, &t, &H, &B_hat, &t_hat, &H_hat)?;
        let z_uid = schnorr_response::<_, 8>(&r_uid, &challenge, uid);
        let z_k = schnorr_response::<_, 8>(&r_k, &challenge, &k);

        Ok(Self {
            k,
            M,
            H,
            B,
            M_hat,
            H_hat,
            B_hat,
            proof: ContentProof {
                challenge,
                z_uid,
                z_k,
            },
        })
    }

    /// Check the Schnorr proof on both groups by recomputing the announcements from the
    /// responses and replaying the transcript.
    pub fn verify_sigma<D: Digest>(&self) -> bool {
        self.recompute_challenge::<D>()
            .map(|c| c == self.proof.challenge)
            .unwrap_or(false)
    }

    fn recompute_challenge<D: Digest>(&self) -> Result<WideChallenge, SerializationError> {
        let g = G1::generator();
        let g_hat = G2::generator();
        let t = (g.mul_bigint(self.proof.z_uid) + self.H.mul_bigint(self.proof.z_k)
            - self.B.mul_bigint(self.proof.challenge))
        .into_affine();
        let t_hat = (g_hat.mul_bigint(self.proof.z_uid) + self.H_hat.mul_bigint(self.proof.z_k)
            - self.B_hat.mul_bigint(self.proof.challenge))
        .into_affine();
        Self::compute_challenge::<D>(&self.B, &t, &self.H, &self.B_hat, &t_hat, &self.H_hat)
    }

    fn compute_challenge<D: Digest>(
        B: &G1,
        t: &G1,
        H: &G1,
        B_hat: &G2,
        t_hat: &G2,
        H_hat: &G2,
    ) -> Result<WideChallenge, SerializationError> {
        let mut builder = ChallengeBuilder::new();
        builder.append(B)?;
        builder.append(t)?;
        builder.append(B_hat)?;
        builder.append(t_hat)?;
        builder.append(&G1::generator())?;
        builder.append(H)?;
        builder.append(&G2::generator())?;
        builder.append(H_hat)?;
        Ok(builder.finish::<D>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::G1Affine;
    use ark_ed_on_bn254::{EdwardsAffine, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;

    type TestContent = Content<EdwardsAffine, G1Affine>;

    #[test]
    fn commitment_structure() {
        let mut rng = StdRng::seed_from_u64(100u64);
        let uid = Fr::from(42u64);
        let content = TestContent::new::<_, Blake2b512>(&mut rng, &uid).unwrap();

        assert_eq!(
            content.M,
            EdwardsAffine::generator()
                .mul_bigint(uid.into_bigint())
                .into_affine()
        );
        assert_eq!(
            content.M_hat,
            G1Affine::generator()
                .mul_bigint(uid.into_bigint())
                .into_affine()
        );
        assert_eq!(
            content.B,
            (content.H.mul_bigint(content.k.into_bigint()) + content.M).into_affine()
        );
        assert_eq!(
            content.B_hat,
            (content.H_hat.mul_bigint(content.k.into_bigint()) + content.M_hat).into_affine()
        );
    }

    #[test]
    fn sigma_proof_verifies() {
        let mut rng = StdRng::seed_from_u64(101u64);
        let uid = Fr::from(42u64);
        let content = TestContent::new::<_, Blake2b512>(&mut rng, &uid).unwrap();
        assert!(content.verify_sigma::<Blake2b512>());
    }

    #[test]
    fn sigma_proof_rejects_tampering() {
        let mut rng = StdRng::seed_from_u64(102u64);
        let uid = Fr::from(42u64);
        let content = TestContent::new::<_, Blake2b512>(&mut rng, &uid).unwrap();

        let mut bad = content.clone();
        bad.B = (bad.B + EdwardsAffine::generator()).into_affine();
        assert!(!bad.verify_sigma::<Blake2b512>());

        let mut bad = content.clone();
        bad.B_hat = (bad.B_hat + G1Affine::generator()).into_affine();
        assert!(!bad.verify_sigma::<Blake2b512>());

        let mut bad = content.clone();
        bad.proof.z_uid = bad.proof.z_k;
        assert!(!bad.verify_sigma::<Blake2b512>());
    }

    #[test]
    fn commitments_to_same_uid_differ() {
        // fresh H and k per commitment, so repeated commitments are unlinkable
        let mut rng = StdRng::seed_from_u64(103u64);
        let uid = Fr::from(42u64);
        let a = TestContent::new::<_, Blake2b512>(&mut rng, &uid).unwrap();
        let b = TestContent::new::<_, Blake2b512>(&mut rng, &uid).unwrap();
        assert_ne!(a.B, b.B);
        assert_ne!(a.B_hat, b.B_hat);
        assert_eq!(a.M, b.M);
    }
}
