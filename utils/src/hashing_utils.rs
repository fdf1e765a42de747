//! Deterministic hash-to-group, used to derive setup generators (e.g. the per-round
//! token generator) from a label. Try-and-increment is vulnerable to timing attacks
//! and is only used on public inputs.

use ark_ec::AffineRepr;
use ark_std::vec::Vec;
use digest::Digest;

/// Hash bytes to a point of the prime-order subgroup, returned in projective form.
pub fn projective_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(
    bytes: &[u8],
) -> G::Group {
    let mut hash = D::digest(bytes);
    let mut g = G::from_random_bytes(&hash);
    let mut j = 1u64;
    while g.is_none() {
        let mut attempt: Vec<u8> = bytes.to_vec();
        attempt.extend_from_slice(b"-attempt-");
        attempt.extend_from_slice(&j.to_le_bytes());
        hash = D::digest(&attempt);
        g = G::from_random_bytes(&hash);
        j += 1;
    }
    g.unwrap().mul_by_cofactor_to_group()
}

/// Hash bytes to a point of the prime-order subgroup, returned in affine form.
pub fn affine_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(bytes: &[u8]) -> G {
    use ark_ec::CurveGroup;
    projective_group_elem_from_try_and_incr::<G, D>(bytes).into_affine()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::G2Affine;
    use blake2::Blake2b512;

    #[test]
    fn derivation_is_deterministic_and_label_separated() {
        let a = affine_group_elem_from_try_and_incr::<G2Affine, Blake2b512>(b"round-1");
        let b = affine_group_elem_from_try_and_incr::<G2Affine, Blake2b512>(b"round-1");
        let c = affine_group_elem_from_try_and_incr::<G2Affine, Blake2b512>(b"round-2");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_zero());
    }
}
