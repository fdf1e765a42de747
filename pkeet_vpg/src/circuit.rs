//! R1CS circuit proving a ciphertext is well formed.
//!
//! Public inputs, in allocation order: `PK.x, PK.y, U.x, U.y, V.x, V.y, Y.x, Y.y,
//! w_0, w_1, w_2`. Witnesses: the ephemeral scalar `r` (embedded into the constraint
//! field) and the plaintext coordinates `M.x, M.y`. The circuit checks
//!
//! - `U = g * r`, `V = M * r`, `Y = PK * r` by native twisted Edwards arithmetic, and
//! - `w_i = bits(H_i) ⊕ bits(block_i)` repacked into a field element, with `H_i` the
//!   same Poseidon mask the native encryption derives.
//!
//! This only works because the commitment curve is defined over the pairing curve's
//! scalar field, so curve and sponge arithmetic are native in the constraint field.

use crate::{encryption::Encrypted, setup::EncryptionKey};
use ark_crypto_primitives::sponge::{
    constraints::CryptographicSpongeVar,
    poseidon::{constraints::PoseidonSpongeVar, PoseidonConfig},
    Absorb,
};
use ark_ec::{
    twisted_edwards::{Affine, TECurveConfig},
    AffineRepr, CurveGroup,
};
use ark_ff::{One, PrimeField};
use ark_r1cs_std::{
    fields::fp::FpVar, groups::curves::twisted_edwards::AffineVar, prelude::*,
};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use ark_std::vec::Vec;
use pkeet_utils::wide::scalar_to_fixed_bytes;

#[derive(Clone)]
pub struct EncryptionCircuit<P: TECurveConfig>
where
    P::BaseField: PrimeField + Absorb,
{
    pub poseidon: PoseidonConfig<P::BaseField>,
    pub pk: Option<Affine<P>>,
    pub u: Option<Affine<P>>,
    pub v: Option<Affine<P>>,
    pub y: Option<Affine<P>>,
    /// Masked blocks reduced into the constraint field.
    pub w: Option<[P::BaseField; 3]>,
    /// Ephemeral scalar, embedded into the (larger) base field.
    pub r: Option<P::BaseField>,
    pub m: Option<Affine<P>>,
}

impl<P: TECurveConfig> EncryptionCircuit<P>
where
    P::BaseField: PrimeField + Absorb,
{
    /// Circuit with no assignment, for parameter generation.
    pub fn blank(poseidon: &PoseidonConfig<P::BaseField>) -> Self {
        Self {
            poseidon: poseidon.clone(),
            pk: None,
            u: None,
            v: None,
            y: None,
            w: None,
            r: None,
            m: None,
        }
    }

    pub fn new(
        poseidon: &PoseidonConfig<P::BaseField>,
        ek: &EncryptionKey<P>,
        enc: &Encrypted<P>,
    ) -> Self {
        let w = enc
            .ciphertext
            .W
            .map(|block| P::BaseField::from_be_bytes_mod_order(&block));
        Self {
            poseidon: poseidon.clone(),
            pk: Some(ek.0),
            u: Some(enc.ciphertext.U),
            v: Some(enc.ciphertext.V),
            y: Some(enc.Y),
            w: Some(w),
            r: Some(P::BaseField::from_be_bytes_mod_order(&scalar_to_fixed_bytes(
                &enc.r,
            ))),
            m: Some(enc.M),
        }
    }
}

impl<P: TECurveConfig> ConstraintSynthesizer<P::BaseField> for EncryptionCircuit<P>
where
    P::BaseField: PrimeField + Absorb,
{
    fn generate_constraints(
        self,
        cs: ConstraintSystemRef<P::BaseField>,
    ) -> Result<(), SynthesisError> {
        let pk = self.pk;
        let u = self.u;
        let v = self.v;
        let y = self.y;
        let w = self.w;

        let pk_x = FpVar::new_input(cs.clone(), || {
            pk.map(|p| p.x).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let pk_y = FpVar::new_input(cs.clone(), || {
            pk.map(|p| p.y).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let u_x = FpVar::new_input(cs.clone(), || {
            u.map(|p| p.x).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let u_y = FpVar::new_input(cs.clone(), || {
            u.map(|p| p.y).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let v_x = FpVar::new_input(cs.clone(), || {
            v.map(|p| p.x).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let v_y = FpVar::new_input(cs.clone(), || {
            v.map(|p| p.y).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let y_x = FpVar::new_input(cs.clone(), || {
            y.map(|p| p.x).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let y_y = FpVar::new_input(cs.clone(), || {
            y.map(|p| p.y).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let mut w_vars = Vec::with_capacity(3);
        for i in 0..3 {
            w_vars.push(FpVar::new_input(cs.clone(), || {
                w.map(|w| w[i]).ok_or(SynthesisError::AssignmentMissing)
            })?);
        }

        let r = FpVar::new_witness(cs.clone(), || {
            self.r.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let m = self.m;
        let m_x = FpVar::new_witness(cs.clone(), || {
            m.map(|p| p.x).ok_or(SynthesisError::AssignmentMissing)
        })?;
        let m_y = FpVar::new_witness(cs.clone(), || {
            m.map(|p| p.y).ok_or(SynthesisError::AssignmentMissing)
        })?;

        let generator = Affine::<P>::generator();
        let g_var = AffineVar::<P, FpVar<P::BaseField>>::new(
            FpVar::constant(generator.x),
            FpVar::constant(generator.y),
        );
        let m_var = AffineVar::<P, FpVar<P::BaseField>>::new(m_x.clone(), m_y.clone());
        let pk_var = AffineVar::<P, FpVar<P::BaseField>>::new(pk_x.clone(), pk_y.clone());

        let r_bits = r.to_bits_le()?;
        let u_calc = g_var.scalar_mul_le(r_bits.iter())?;
        u_calc.x.enforce_equal(&u_x)?;
        u_calc.y.enforce_equal(&u_y)?;
        let v_calc = m_var.scalar_mul_le(r_bits.iter())?;
        v_calc.x.enforce_equal(&v_x)?;
        v_calc.y.enforce_equal(&v_y)?;
        let y_calc = pk_var.scalar_mul_le(r_bits.iter())?;
        y_calc.x.enforce_equal(&y_x)?;
        y_calc.y.enforce_equal(&y_y)?;

        // the three masked blocks; absorb order mirrors the native mask derivation
        let blocks = [r_bits, m_x.to_bits_le()?, m_y.to_bits_le()?];
        for (i, (w_pub, block_bits)) in w_vars.iter().zip(blocks.iter()).enumerate() {
            let marker = generator.mul_bigint([i as u64 + 1]).into_affine();
            let mut sponge = PoseidonSpongeVar::new(cs.clone(), &self.poseidon);
            for coord in [&u_x, &u_y, &v_x, &v_y, &y_x, &y_y] {
                sponge.absorb(coord)?;
            }
            sponge.absorb(&FpVar::constant(marker.x))?;
            sponge.absorb(&FpVar::constant(marker.y))?;
            let h = sponge.squeeze_field_elements(1)?;
            let h_bits = h[0].to_bits_le()?;

            let masked = h_bits
                .iter()
                .zip(block_bits.iter())
                .map(|(a, b)| a.xor(b))
                .collect::<Result<Vec<_>, _>>()?;
            // plain little-endian repack, no in-field range check: the masked integer
            // can exceed the modulus and the public input carries it reduced
            let mut repacked = FpVar::<P::BaseField>::zero();
            let mut coeff = P::BaseField::one();
            for bit in &masked {
                repacked += FpVar::from(bit.clone()) * FpVar::constant(coeff);
                coeff += coeff;
            }
            repacked.enforce_equal(w_pub)?;
        }
        Ok(())
    }
}
