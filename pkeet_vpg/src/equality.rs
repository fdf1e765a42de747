//! Pairing-based equality test tokens.
//!
//! A token carries `V̂ = M̂ * r` in G1 and `X̂ = HR * r` in G2, where `M̂` is the sender's
//! identity point on G1, `r` the encryption's ephemeral scalar and `HR` the round
//! generator. Two tokens hide the same identity exactly when
//! `e(V̂_1, X̂_2) == e(V̂_2, X̂_1)`: both sides equal `e(M̂, HR)^(r_1 * r_2)` if and only
//! if `M̂_1 == M̂_2`. The tester learns nothing beyond the yes/no answer.

use crate::setup::RoundGenerator;
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use pkeet_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[serde_as]
#[derive(Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize)]
pub struct EqualityToken<E: Pairing> {
    /// `M̂ * r`
    #[serde_as(as = "ArkObjectBytes")]
    pub V_hat: E::G1Affine,
    /// The round generator this token was issued under.
    #[serde_as(as = "ArkObjectBytes")]
    pub round_gen: E::G2Affine,
    /// `HR * r`
    #[serde_as(as = "ArkObjectBytes")]
    pub X_hat: E::G2Affine,
}

impl<E: Pairing> EqualityToken<E> {
    /// `r` lives in the commitment curve's scalar field; it is applied here as an
    /// integer so it denotes the same exponent on both curves.
    pub fn new<F: PrimeField>(
        M_hat: &E::G1Affine,
        r: &F,
        round_gen: &RoundGenerator<E>,
    ) -> Self {
        let r_repr = r.into_bigint();
        Self {
            V_hat: M_hat.mul_bigint(r_repr).into_affine(),
            round_gen: round_gen.0,
            X_hat: round_gen.0.mul_bigint(r_repr).into_affine(),
        }
    }

    /// Symmetric equality test. Tokens issued under different round generators are
    /// incomparable and never match.
    pub fn matches(&self, other: &Self) -> bool {
        if self.round_gen != other.round_gen {
            return false;
        }
        E::pairing(self.V_hat, other.X_hat) == E::pairing(other.V_hat, self.X_hat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, G1Affine};
    use ark_ed_on_bn254::Fr;
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use blake2::Blake2b512;

    fn token(uid: u64, r: &Fr, round_gen: &RoundGenerator<Bn254>) -> EqualityToken<Bn254> {
        let m_hat = G1Affine::generator()
            .mul_bigint(ark_bn254::Fr::from(uid).into_bigint())
            .into_affine();
        EqualityToken::new(&m_hat, r, round_gen)
    }

    #[test]
    fn same_identity_matches() {
        let mut rng = StdRng::seed_from_u64(500u64);
        let round_gen = RoundGenerator::new::<Blake2b512>(b"round-1");
        let a = token(42, &Fr::rand(&mut rng), &round_gen);
        let b = token(42, &Fr::rand(&mut rng), &round_gen);
        assert!(a.matches(&b));
        assert!(b.matches(&a));
        // a token also matches itself
        assert!(a.matches(&a));
    }

    #[test]
    fn different_identities_do_not_match() {
        let mut rng = StdRng::seed_from_u64(501u64);
        let round_gen = RoundGenerator::new::<Blake2b512>(b"round-1");
        let a = token(42, &Fr::rand(&mut rng), &round_gen);
        let b = token(43, &Fr::rand(&mut rng), &round_gen);
        assert!(!a.matches(&b));
    }

    #[test]
    fn tokens_from_different_rounds_never_match() {
        let mut rng = StdRng::seed_from_u64(502u64);
        let a = token(
            42,
            &Fr::rand(&mut rng),
            &RoundGenerator::new::<Blake2b512>(b"round-1"),
        );
        let b = token(
            42,
            &Fr::rand(&mut rng),
            &RoundGenerator::new::<Blake2b512>(b"round-2"),
        );
        assert!(!a.matches(&b));
    }
}
