//! End-to-end runs over BN254 with Baby Jubjub as the commitment curve.

use crate::{
    error::Error,
    protocol::PkeetVpg,
    setup::{keygen, poseidon_config, RoundGenerator, SecretKey},
    snark::SnarkSetup,
};
use ark_bn254::Bn254;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ed_on_bn254::{EdwardsAffine, EdwardsConfig, Fr};
use ark_ff::PrimeField;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use blake2::Blake2b512;

type Run = PkeetVpg<EdwardsConfig, Bn254>;

#[test]
fn full_protocol_run() {
    let mut rng = StdRng::seed_from_u64(1000u64);
    let poseidon = poseidon_config();
    let setup = SnarkSetup::<Bn254>::new::<EdwardsConfig, _>(&mut rng, &poseidon).unwrap();
    let round_gen = RoundGenerator::new::<Blake2b512>(b"matching-round-1");
    let (sk, ek) = keygen::<_, EdwardsConfig>(&mut rng);

    let uid = Fr::from(42u64);
    let run = Run::new::<_, Blake2b512>(&mut rng, &setup, &poseidon, &uid, &ek, &round_gen).unwrap();

    assert!(run.content.verify_sigma::<Blake2b512>());
    assert!(run.verify::<Blake2b512>(&setup, &ek));

    let expected = EdwardsAffine::generator()
        .mul_bigint(uid.into_bigint())
        .into_affine();
    assert_eq!(run.decrypt(&sk, &poseidon).unwrap(), expected);

    let bad_sk = SecretKey(sk.0 + Fr::from(1u64));
    assert!(matches!(
        run.decrypt(&bad_sk, &poseidon),
        Err(Error::InvalidDecryption)
    ));
}

#[test]
fn equality_test_across_senders() {
    let mut rng = StdRng::seed_from_u64(1001u64);
    let poseidon = poseidon_config();
    let setup = SnarkSetup::<Bn254>::new::<EdwardsConfig, _>(&mut rng, &poseidon).unwrap();
    let round_gen = RoundGenerator::new::<Blake2b512>(b"matching-round-1");

    // three senders, each with their own recipient key
    let (_, ek1) = keygen::<_, EdwardsConfig>(&mut rng);
    let (_, ek2) = keygen::<_, EdwardsConfig>(&mut rng);
    let (_, ek3) = keygen::<_, EdwardsConfig>(&mut rng);

    let uid = Fr::from(42u64);
    let other_uid = Fr::from(43u64);
    let a = Run::new::<_, Blake2b512>(&mut rng, &setup, &poseidon, &uid, &ek1, &round_gen).unwrap();
    let b = Run::new::<_, Blake2b512>(&mut rng, &setup, &poseidon, &uid, &ek2, &round_gen).unwrap();
    let c =
        Run::new::<_, Blake2b512>(&mut rng, &setup, &poseidon, &other_uid, &ek3, &round_gen)
            .unwrap();

    assert!(a.verify::<Blake2b512>(&setup, &ek1));
    assert!(b.verify::<Blake2b512>(&setup, &ek2));
    assert!(c.verify::<Blake2b512>(&setup, &ek3));

    assert!(a.token.matches(&b.token));
    assert!(!a.token.matches(&c.token));
    assert!(!b.token.matches(&c.token));
}

#[test]
fn verification_rejects_mixed_runs() {
    let mut rng = StdRng::seed_from_u64(1002u64);
    let poseidon = poseidon_config();
    let setup = SnarkSetup::<Bn254>::new::<EdwardsConfig, _>(&mut rng, &poseidon).unwrap();
    let round_gen = RoundGenerator::new::<Blake2b512>(b"matching-round-1");
    let (_, ek) = keygen::<_, EdwardsConfig>(&mut rng);

    let uid = Fr::from(42u64);
    let a = Run::new::<_, Blake2b512>(&mut rng, &setup, &poseidon, &uid, &ek, &round_gen).unwrap();
    let b = Run::new::<_, Blake2b512>(&mut rng, &setup, &poseidon, &uid, &ek, &round_gen).unwrap();

    // a token taken from another run of the same sender must not pass the
    // consistency check, its ephemeral scalar differs
    let mut mixed = a.clone();
    mixed.token = b.token.clone();
    assert!(!mixed.verify::<Blake2b512>(&setup, &ek));

    // a tampered masked block invalidates the well-formedness proof
    let mut tampered = a.clone();
    tampered.encrypted.ciphertext.W[2][0] ^= 1;
    assert!(!tampered.verify::<Blake2b512>(&setup, &ek));
}
