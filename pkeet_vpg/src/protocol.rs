//! End-to-end protocol run: commit, encrypt, tokenize, prove.

use crate::{
    circuit::EncryptionCircuit,
    commitment::Content,
    consistency::ConsistencyProof,
    encryption::{encrypt, Encrypted},
    equality::EqualityToken,
    setup::{EncryptionKey, RoundGenerator, SecretKey},
    snark::{public_inputs, SnarkSetup},
};
use ark_crypto_primitives::sponge::{poseidon::PoseidonConfig, Absorb};
use ark_ec::{
    pairing::Pairing,
    twisted_edwards::{Affine, TECurveConfig},
};
use ark_ff::PrimeField;
use ark_groth16::Proof;
use ark_std::{
    end_timer,
    rand::{CryptoRng, RngCore},
    start_timer,
};
use digest::Digest;

/// One sender's complete output: the dual commitment, the ciphertext with its SNARK
/// proof, the equality token and the consistency proof binding them together.
///
/// `P` is the commitment curve's configuration and must be defined over `E`'s scalar
/// field (Baby Jubjub over BN254 in the tests).
#[derive(Clone)]
pub struct PkeetVpg<P, E>
where
    P: TECurveConfig,
    E: Pairing<ScalarField = P::BaseField>,
    P::BaseField: PrimeField + Absorb,
{
    pub content: Content<Affine<P>, E::G1Affine>,
    pub encrypted: Encrypted<P>,
    pub token: EqualityToken<E>,
    pub snark_proof: Proof<E>,
    pub consistency: ConsistencyProof<Affine<P>, E>,
}

impl<P, E> PkeetVpg<P, E>
where
    P: TECurveConfig,
    E: Pairing<ScalarField = P::BaseField>,
    P::BaseField: PrimeField + Absorb,
{
    /// Run the sender side for identity scalar `uid`: commit on both groups, encrypt
    /// `M = g * uid` for `ek`, derive the round's equality token and attach both
    /// proofs. The ephemeral scalar of the encryption is shared with the token and the
    /// consistency proof.
    pub fn new<R: RngCore + CryptoRng, D: Digest>(
        rng: &mut R,
        setup: &SnarkSetup<E>,
        poseidon: &PoseidonConfig<P::BaseField>,
        uid: &P::ScalarField,
        ek: &EncryptionKey<P>,
        round_gen: &RoundGenerator<E>,
    ) -> crate::Result<Self> {
        let commit_timer = start_timer!(|| "dual-group commitment");
        let content = Content::<Affine<P>, E::G1Affine>::new::<_, D>(rng, uid)?;
        end_timer!(commit_timer);

        let enc_timer = start_timer!(|| "encryption and token");
        let encrypted = encrypt(rng, ek, &content.M, poseidon);
        let token = EqualityToken::new(&content.M_hat, &encrypted.r, round_gen);
        end_timer!(enc_timer);

        let snark_timer = start_timer!(|| "well-formedness proof");
        let circuit = EncryptionCircuit::new(poseidon, ek, &encrypted);
        let snark_proof = setup.prove(rng, circuit)?;
        end_timer!(snark_timer);

        let sigma_timer = start_timer!(|| "consistency proof");
        let consistency = ConsistencyProof::new::<_, D>(
            rng,
            &content,
            &encrypted.ciphertext.V,
            &token,
            &encrypted.r,
        )?;
        end_timer!(sigma_timer);

        Ok(Self {
            content,
            encrypted,
            token,
            snark_proof,
            consistency,
        })
    }

    /// Verifier side: the Groth16 proof against the published inputs and the
    /// consistency proof against commitment, ciphertext and token. The commitment's
    /// own opening proof is checked separately with
    /// [`Content::verify_sigma`] when the commitment is first accepted.
    pub fn verify<D: Digest>(&self, setup: &SnarkSetup<E>, ek: &EncryptionKey<P>) -> bool {
        let inputs = public_inputs(ek, &self.encrypted.Y, &self.encrypted.ciphertext);
        setup.verify(&self.snark_proof, &inputs)
            && self.consistency.verify::<D>(
                &self.content,
                &self.encrypted.ciphertext.V,
                &self.token,
            )
    }

    pub fn decrypt(
        &self,
        sk: &SecretKey<P::ScalarField>,
        poseidon: &PoseidonConfig<P::BaseField>,
    ) -> crate::Result<Affine<P>> {
        self.encrypted.decrypt(sk, poseidon)
    }
}
