use ark_relations::r1cs::SynthesisError;
use ark_serialize::SerializationError;

#[derive(Debug)]
pub enum Error {
    /// Decryption re-derivation check failed: the recovered `(r, M)` do not reproduce
    /// the ciphertext. Expected for a wrong key or corrupted ciphertext.
    InvalidDecryption,
    /// The recovered plaintext does not match the point this encryption was built for.
    DecryptedPlaintextMismatch,
    Synthesis(SynthesisError),
    Serialization(SerializationError),
}

impl From<SynthesisError> for Error {
    fn from(e: SynthesisError) -> Self {
        Self::Synthesis(e)
    }
}

impl From<SerializationError> for Error {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
