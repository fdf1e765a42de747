//! Cross-group consistency proof.
//!
//! Ties the published pieces of one protocol run together: the Pedersen commitments
//! `B`, `B̂`, the ciphertext component `V = M * r`, the token's `V̂ = M̂ * r` and
//! `X̂ = HR * r` all encode the same hidden `(uid, k, r)`. The core identity is
//!
//! ```text
//! B * r = (M + H * k) * r = V + H * (k * r)
//! ```
//!
//! on both curves at once, plus `X̂ = HR * r` with the same `r`, which is what makes a
//! token and a SNARK-checked ciphertext refer to the same plaintext.
//!
//! The proof publishes deterministic announcements `t_B = B * r` and
//! `t_D = g * α - H * β` (with `α = d * r` for a fresh blinding `d`, `β = k * r`), whose
//! sum reconstructs `t_T = V + g * α`; a standard Schnorr layer over fresh randomizers
//! then proves knowledge of `(r, α, β)`. All scalars act as exponents on groups of two
//! different orders, so challenges and responses are unreduced integers throughout
//! (see [`pkeet_utils::wide`]).

use crate::{commitment::Content, equality::EqualityToken};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, Group};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{rand::RngCore, UniformRand};
use digest::Digest;
use pkeet_utils::{
    serde_utils::ArkObjectBytes,
    transcript::ChallengeBuilder,
    wide::{
        scalar_to_biguint, schnorr_response, schnorr_response_wide, WideChallenge, WideResponse,
        WideResponseLong,
    },
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// `G1` is the commitment (twisted Edwards) curve, `E` the pairing curve.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
pub struct ConsistencyProof<G1: AffineRepr, E: Pairing> {
    /// `B * r` on the commitment curve.
    #[serde_as(as = "ArkObjectBytes")]
    pub t_B: G1,
    /// `g * α - H * β` on the commitment curve.
    #[serde_as(as = "ArkObjectBytes")]
    pub t_D: G1,
    /// `B̂ * r` on the pairing curve's G1.
    #[serde_as(as = "ArkObjectBytes")]
    pub t_B_hat: E::G1Affine,
    /// `ĝ * α - Ĥ * β` on the pairing curve's G1.
    #[serde_as(as = "ArkObjectBytes")]
    pub t_D_hat: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: WideChallenge,
    #[serde_as(as = "ArkObjectBytes")]
    pub z_r: WideResponse,
    #[serde_as(as = "ArkObjectBytes")]
    pub z_alpha: WideResponseLong,
    #[serde_as(as = "ArkObjectBytes")]
    pub z_beta: WideResponseLong,
}

impl<G1: AffineRepr, E: Pairing> ConsistencyProof<G1, E> {
    /// `V` is the ciphertext's second component and `r` the ephemeral scalar shared by
    /// the encryption and the token.
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        content: &Content<G1, E::G1Affine>,
        V: &G1,
        token: &EqualityToken<E>,
        r: &G1::ScalarField,
    ) -> Result<Self, SerializationError> {
        let g = G1::generator();
        let g_hat = E::G1Affine::generator();

        let r_int = scalar_to_biguint(r);
        let d = G1::ScalarField::rand(rng);
        let alpha = scalar_to_biguint(&d) * &r_int;
        let beta = scalar_to_biguint(&content.k) * &r_int;
        let alpha_limbs = alpha.to_u64_digits();
        let beta_limbs = beta.to_u64_digits();
        let r_repr = r.into_bigint();

        let t_B = content.B.mul_bigint(r_repr).into_affine();
        let t_D = (g.mul_bigint(alpha_limbs.as_slice())
            - content.H.mul_bigint(beta_limbs.as_slice()))
        .into_affine();
        let t_T = (g.mul_bigint(alpha_limbs.as_slice()) + V.into_group()).into_affine();
        let t_B_hat = content.B_hat.mul_bigint(r_repr).into_affine();
        let t_D_hat = (g_hat.mul_bigint(alpha_limbs.as_slice())
            - content.H_hat.mul_bigint(beta_limbs.as_slice()))
        .into_affine();
        let t_T_hat =
            (g_hat.mul_bigint(alpha_limbs.as_slice()) + token.V_hat.into_group()).into_affine();

        let r_r = G1::ScalarField::rand(rng);
        let r_alpha = G1::ScalarField::rand(rng);
        let r_beta = G1::ScalarField::rand(rng);
        let R_B = content.B.mul_bigint(r_r.into_bigint()).into_affine();
        let R_D = (g.mul_bigint(r_alpha.into_bigint())
            - content.H.mul_bigint(r_beta.into_bigint()))
        .into_affine();
        let R_T = (g.mul_bigint(r_alpha.into_bigint()) + V.into_group()).into_affine();
        let R_B_hat = content.B_hat.mul_bigint(r_r.into_bigint()).into_affine();
        let R_D_hat = (g_hat.mul_bigint(r_alpha.into_bigint())
            - content.H_hat.mul_bigint(r_beta.into_bigint()))
        .into_affine();
        let R_T_hat =
            (g_hat.mul_bigint(r_alpha.into_bigint()) + token.V_hat.into_group()).into_affine();
        let R_X = token.round_gen.mul_bigint(r_r.into_bigint()).into_affine();

        let challenge = Self::compute_challenge::<D>(
            content, V, token, &t_B, &t_D, &t_T, &R_B, &R_D, &R_T, &t_B_hat, &t_D_hat, &t_T_hat,
            &R_B_hat, &R_D_hat, &R_T_hat, &R_X,
        )?;
        let z_r = schnorr_response::<_, 8>(&r_r, &challenge, r);
        let z_alpha = schnorr_response_wide::<12>(&scalar_to_biguint(&r_alpha), &challenge, &alpha);
        let z_beta = schnorr_response_wide::<12>(&scalar_to_biguint(&r_beta), &challenge, &beta);

        Ok(Self {
            t_B,
            t_D,
            t_B_hat,
            t_D_hat,
            challenge,
            z_r,
            z_alpha,
            z_beta,
        })
    }

    /// Rebuild the sum announcements and the Schnorr randomizers from the responses,
    /// replay the transcript and compare challenges.
    pub fn verify<D: Digest>(
        &self,
        content: &Content<G1, E::G1Affine>,
        V: &G1,
        token: &EqualityToken<E>,
    ) -> bool {
        self.recompute_challenge::<D>(content, V, token)
            .map(|c| c == self.challenge)
            .unwrap_or(false)
    }

    fn recompute_challenge<D: Digest>(
        &self,
        content: &Content<G1, E::G1Affine>,
        V: &G1,
        token: &EqualityToken<E>,
    ) -> Result<WideChallenge, SerializationError> {
        let g = G1::generator();
        let g_hat = E::G1Affine::generator();
        let c = self.challenge;

        let t_T = (self.t_B.into_group() + self.t_D.into_group()).into_affine();
        let t_T_hat = (self.t_B_hat.into_group() + self.t_D_hat.into_group()).into_affine();

        let R_B = (content.B.mul_bigint(self.z_r) - self.t_B.mul_bigint(c)).into_affine();
        let R_D = (g.mul_bigint(self.z_alpha)
            - content.H.mul_bigint(self.z_beta)
            - self.t_D.mul_bigint(c))
        .into_affine();
        let R_T = (g.mul_bigint(self.z_alpha) + V.into_group()
            - (t_T.into_group() - V.into_group()).mul_bigint(c))
        .into_affine();
        let R_B_hat =
            (content.B_hat.mul_bigint(self.z_r) - self.t_B_hat.mul_bigint(c)).into_affine();
        let R_D_hat = (g_hat.mul_bigint(self.z_alpha)
            - content.H_hat.mul_bigint(self.z_beta)
            - self.t_D_hat.mul_bigint(c))
        .into_affine();
        let R_T_hat = (g_hat.mul_bigint(self.z_alpha) + token.V_hat.into_group()
            - (t_T_hat.into_group() - token.V_hat.into_group()).mul_bigint(c))
        .into_affine();
        let R_X = (token.round_gen.mul_bigint(self.z_r) - token.X_hat.mul_bigint(c)).into_affine();

        Self::compute_challenge::<D>(
            content, V, token, &self.t_B, &self.t_D, &t_T, &R_B, &R_D, &R_T, &self.t_B_hat,
            &self.t_D_hat, &t_T_hat, &R_B_hat, &R_D_hat, &R_T_hat, &R_X,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn compute_challenge<D: Digest>(
        content: &Content<G1, E::G1Affine>,
        V: &G1,
        token: &EqualityToken<E>,
        t_B: &G1,
        t_D: &G1,
        t_T: &G1,
        R_B: &G1,
        R_D: &G1,
        R_T: &G1,
        t_B_hat: &E::G1Affine,
        t_D_hat: &E::G1Affine,
        t_T_hat: &E::G1Affine,
        R_B_hat: &E::G1Affine,
        R_D_hat: &E::G1Affine,
        R_T_hat: &E::G1Affine,
        R_X: &E::G2Affine,
    ) -> Result<WideChallenge, SerializationError> {
        let mut builder = ChallengeBuilder::new();
        // commitment-curve block
        builder.append(&content.B)?;
        builder.append(V)?;
        builder.append(t_B)?;
        builder.append(t_D)?;
        builder.append(t_T)?;
        builder.append(R_B)?;
        builder.append(R_D)?;
        builder.append(R_T)?;
        // pairing G1 block
        builder.append(&content.B_hat)?;
        builder.append(&token.V_hat)?;
        builder.append(t_B_hat)?;
        builder.append(t_D_hat)?;
        builder.append(t_T_hat)?;
        builder.append(R_B_hat)?;
        builder.append(R_D_hat)?;
        builder.append(R_T_hat)?;
        // pairing G2 block
        builder.append(&token.X_hat)?;
        builder.append(R_X)?;
        // generators
        builder.append(&G1::generator())?;
        builder.append(&content.H)?;
        builder.append(&E::G1Affine::generator())?;
        builder.append(&content.H_hat)?;
        builder.append(&token.round_gen)?;
        Ok(builder.finish::<D>())
    }
}
