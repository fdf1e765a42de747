//! Groth16 glue: circuit-specific setup, proving and verification for
//! [`EncryptionCircuit`], plus the assembly of its public input vector.

use crate::{
    circuit::EncryptionCircuit,
    encryption::Ciphertext,
    setup::EncryptionKey,
};
use ark_crypto_primitives::sponge::{poseidon::PoseidonConfig, Absorb};
use ark_ec::{
    pairing::Pairing,
    twisted_edwards::{Affine, TECurveConfig},
};
use ark_ff::PrimeField;
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, ProvingKey, VerifyingKey};
use ark_snark::SNARK;
use ark_std::{
    rand::{CryptoRng, RngCore},
    vec::Vec,
};

/// Proving and verifying keys for one circuit shape. Generated once per deployment and
/// shared by all senders and verifiers.
#[derive(Clone, Debug)]
pub struct SnarkSetup<E: Pairing> {
    pub proving_key: ProvingKey<E>,
    pub verifying_key: VerifyingKey<E>,
    pub prepared_vk: PreparedVerifyingKey<E>,
}

impl<E: Pairing> SnarkSetup<E> {
    pub fn new<P, R>(
        rng: &mut R,
        poseidon: &PoseidonConfig<E::ScalarField>,
    ) -> crate::Result<Self>
    where
        P: TECurveConfig<BaseField = E::ScalarField>,
        E::ScalarField: PrimeField + Absorb,
        R: RngCore + CryptoRng,
    {
        let circuit = EncryptionCircuit::<P>::blank(poseidon);
        let (proving_key, verifying_key) = Groth16::<E>::circuit_specific_setup(circuit, rng)?;
        let prepared_vk = Groth16::<E>::process_vk(&verifying_key)?;
        Ok(Self {
            proving_key,
            verifying_key,
            prepared_vk,
        })
    }

    pub fn prove<P, R>(
        &self,
        rng: &mut R,
        circuit: EncryptionCircuit<P>,
    ) -> crate::Result<Proof<E>>
    where
        P: TECurveConfig<BaseField = E::ScalarField>,
        E::ScalarField: PrimeField + Absorb,
        R: RngCore + CryptoRng,
    {
        Ok(Groth16::<E>::prove(&self.proving_key, circuit, rng)?)
    }

    /// Backend failures (malformed points, wrong input length) count as rejection.
    pub fn verify(&self, proof: &Proof<E>, public_inputs: &[E::ScalarField]) -> bool {
        Groth16::<E>::verify_with_processed_vk(&self.prepared_vk, public_inputs, proof)
            .unwrap_or(false)
    }
}

/// Public inputs in the order the circuit allocates them: the recipient key, the two
/// ciphertext points, `Y = PK * r` and the three masked blocks reduced into the field.
pub fn public_inputs<P: TECurveConfig>(
    ek: &EncryptionKey<P>,
    Y: &Affine<P>,
    ciphertext: &Ciphertext<P>,
) -> Vec<P::BaseField>
where
    P::BaseField: PrimeField,
{
    let mut inputs = Vec::with_capacity(11);
    for p in [&ek.0, &ciphertext.U, &ciphertext.V, Y] {
        inputs.push(p.x);
        inputs.push(p.y);
    }
    for block in &ciphertext.W {
        inputs.push(P::BaseField::from_be_bytes_mod_order(block));
    }
    inputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        encryption::encrypt,
        setup::{keygen, poseidon_config},
    };
    use ark_bn254::Bn254;
    use ark_ec::{AffineRepr, CurveGroup};
    use ark_ed_on_bn254::{EdwardsAffine, EdwardsConfig, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn prove_and_verify() {
        let mut rng = StdRng::seed_from_u64(400u64);
        let poseidon = poseidon_config();
        let setup = SnarkSetup::<Bn254>::new::<EdwardsConfig, _>(&mut rng, &poseidon).unwrap();

        let (_, ek) = keygen::<_, EdwardsConfig>(&mut rng);
        let M = (EdwardsAffine::generator() * Fr::from(42u64)).into_affine();
        let enc = encrypt(&mut rng, &ek, &M, &poseidon);

        let circuit = EncryptionCircuit::new(&poseidon, &ek, &enc);
        let proof = setup.prove(&mut rng, circuit).unwrap();

        let inputs = public_inputs(&ek, &enc.Y, &enc.ciphertext);
        assert!(setup.verify(&proof, &inputs));

        // swapping in another recipient's key must not verify
        let (_, other_ek) = keygen::<_, EdwardsConfig>(&mut rng);
        let bad_inputs = public_inputs(&other_ek, &enc.Y, &enc.ciphertext);
        assert!(!setup.verify(&proof, &bad_inputs));

        // as must a truncated input vector
        assert!(!setup.verify(&proof, &inputs[..10]));
    }
}
