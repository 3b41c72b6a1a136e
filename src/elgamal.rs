use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use rand::CryptoRng;
use std::fmt;

use crate::pir_internals::error::EllipticPIRError;
use crate::pir_internals::params::{CIPHER_BYTE_LEN, POINT_BYTE_LEN, SCALAR_BYTE_LEN};
use crate::selector;

/// Samples a uniformly random scalar from a caller-supplied cryptographically secure RNG.
///
/// Used for private key generation and for per-cipher encryption randomness. Every call
/// draws independently; no RNG state is shared across calls.
pub fn random_scalar<R: CryptoRng>(rng: &mut R) -> Scalar {
    let mut wide = [0u8; 2 * SCALAR_BYTE_LEN];
    rng.fill_bytes(&mut wide);

    Scalar::from_bytes_mod_order_wide(&wide)
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for byte in bytes {
        write!(f, "{:02x}", byte)?;
    }
    Ok(())
}

/// An EC-ElGamal ciphertext: the randomness mask `C1 = r*G` and the masked message `C2 = m*G + r*P`.
///
/// Both components are always present; a byte buffer of any other length than
/// [`CIPHER_BYTE_LEN`] is a malformed cipher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cipher {
    c1: CompressedEdwardsY,
    c2: CompressedEdwardsY,
}

impl Cipher {
    /// Parses a serialized cipher: `C1` followed by `C2`, each a canonical point encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Cipher, EllipticPIRError> {
        if bytes.len() != CIPHER_BYTE_LEN {
            return Err(EllipticPIRError::InvalidCipherByteLength(bytes.len()));
        }

        let mut c1 = [0u8; POINT_BYTE_LEN];
        let mut c2 = [0u8; POINT_BYTE_LEN];
        c1.copy_from_slice(&bytes[..POINT_BYTE_LEN]);
        c2.copy_from_slice(&bytes[POINT_BYTE_LEN..]);

        Ok(Cipher {
            c1: CompressedEdwardsY(c1),
            c2: CompressedEdwardsY(c2),
        })
    }

    pub fn to_bytes(&self) -> [u8; CIPHER_BYTE_LEN] {
        let mut bytes = [0u8; CIPHER_BYTE_LEN];
        bytes[..POINT_BYTE_LEN].copy_from_slice(self.c1.as_bytes());
        bytes[POINT_BYTE_LEN..].copy_from_slice(self.c2.as_bytes());

        bytes
    }

    pub(crate) fn components(&self) -> (&CompressedEdwardsY, &CompressedEdwardsY) {
        (&self.c1, &self.c2)
    }
}

/// A private key: a scalar modulo the group order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateKey {
    scalar: Scalar,
}

impl PrivateKey {
    pub fn generate<R: CryptoRng>(rng: &mut R) -> PrivateKey {
        PrivateKey { scalar: random_scalar(rng) }
    }

    /// Reconstructs a private key from its byte encoding; the bytes are reduced modulo the group order.
    pub fn from_bytes(bytes: [u8; SCALAR_BYTE_LEN]) -> PrivateKey {
        PrivateKey {
            scalar: Scalar::from_bytes_mod_order(bytes),
        }
    }

    pub fn to_bytes(&self) -> [u8; SCALAR_BYTE_LEN] {
        self.scalar.to_bytes()
    }

    /// Derives the matching public key `sk*G`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            point: EdwardsPoint::mul_base(&self.scalar),
        }
    }

    pub(crate) fn scalar(&self) -> &Scalar {
        &self.scalar
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, self.scalar.as_bytes())
    }
}

/// A public key: the curve point `sk*G`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey {
    point: EdwardsPoint,
}

impl PublicKey {
    /// Decodes a public key from its canonical point encoding.
    pub fn from_bytes(bytes: [u8; POINT_BYTE_LEN]) -> Result<PublicKey, EllipticPIRError> {
        CompressedEdwardsY(bytes)
            .decompress()
            .map(|point| PublicKey { point })
            .ok_or(EllipticPIRError::InvalidPublicKeyPoint)
    }

    pub fn to_bytes(&self) -> [u8; POINT_BYTE_LEN] {
        self.point.compress().to_bytes()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.point.compress().to_bytes())
    }
}

/// The encryption capability, implemented by both halves of a key pair.
///
/// [`PublicKey`] is the standard path any party can run. [`PrivateKey`] is the
/// accelerated path available only to the key owner: knowing `sk` collapses
/// `m*G + r*(sk*G)` into the single basepoint multiplication `(r*sk + m)*G`.
/// Messages are not range-checked here; whether a message is recoverable is
/// decided by the decryption table's coverage.
pub trait Encryptor: Sync {
    /// Encrypts `message` under the given randomness. Deterministic: fixed inputs produce a fixed cipher.
    fn encrypt_with(&self, message: u64, r: &Scalar) -> Cipher;

    /// Encrypts `message` with fresh randomness drawn from `rng`.
    fn encrypt<R: CryptoRng>(&self, message: u64, rng: &mut R) -> Cipher {
        self.encrypt_with(message, &random_scalar(rng))
    }

    /// Builds a serialized PIR selector for `idx` over the query space shaped by `index_counts`,
    /// drawing fresh randomness from `rng` for every cipher.
    ///
    /// The selector concatenates, per dimension, a one-hot encrypted vector of length
    /// `index_counts[dimension]`: the position matching that dimension's digit of `idx`
    /// encrypts `1`, every other position encrypts `0`. See [`crate::selector`] for the
    /// digit decomposition convention.
    fn create_selector<R: CryptoRng>(&self, index_counts: &[u64], idx: u64, rng: &mut R) -> Result<Vec<u8>, EllipticPIRError> {
        let choices = selector::one_hot_choices(index_counts, idx)?;
        let randomness: Vec<Scalar> = (0..choices.len()).map(|_| random_scalar(rng)).collect();

        Ok(selector::assemble(self, &choices, &randomness))
    }

    /// Builds a selector reusing `r` as the randomness of every cipher, making the result
    /// reproducible. Meant for tests and reference vectors; production queries should use
    /// [`Encryptor::create_selector`].
    fn create_selector_with(&self, index_counts: &[u64], idx: u64, r: &Scalar) -> Result<Vec<u8>, EllipticPIRError> {
        let choices = selector::one_hot_choices(index_counts, idx)?;
        let randomness = vec![*r; choices.len()];

        Ok(selector::assemble(self, &choices, &randomness))
    }
}

impl Encryptor for PublicKey {
    fn encrypt_with(&self, message: u64, r: &Scalar) -> Cipher {
        let c1 = EdwardsPoint::mul_base(r);
        let c2 = EdwardsPoint::mul_base(&Scalar::from(message)) + r * self.point;

        Cipher {
            c1: c1.compress(),
            c2: c2.compress(),
        }
    }
}

impl Encryptor for PrivateKey {
    fn encrypt_with(&self, message: u64, r: &Scalar) -> Cipher {
        let masked = r * self.scalar + Scalar::from(message);

        Cipher {
            c1: EdwardsPoint::mul_base(r).compress(),
            c2: EdwardsPoint::mul_base(&masked).compress(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    // Reference vectors carried over from the EllipticPIR test suite.
    const PRIVKEY_BYTES: [u8; SCALAR_BYTE_LEN] = [
        0x7e, 0xf6, 0xad, 0xd2, 0xbe, 0xd5, 0x9a, 0x79, 0xba, 0x6e, 0xdc, 0xfb, 0xa4, 0x8f, 0xde, 0x7a, 0x55, 0x31, 0x75, 0x4a, 0xf5, 0x93, 0x76, 0x34,
        0x6c, 0x8b, 0x52, 0x84, 0xee, 0xf2, 0x52, 0x07,
    ];
    const PUBKEY_BYTES: [u8; POINT_BYTE_LEN] = [
        0x9c, 0x76, 0x82, 0x3d, 0xbd, 0xb9, 0xbf, 0x04, 0x8f, 0xc5, 0xc2, 0xaf, 0x00, 0x0e, 0x28, 0xa1, 0x48, 0xee, 0x02, 0x19, 0x99, 0xfb, 0x7f, 0x21,
        0xca, 0x1f, 0x84, 0xb8, 0xfe, 0x73, 0xd7, 0xe8,
    ];
    const RANDOMNESS_BYTES: [u8; SCALAR_BYTE_LEN] = [
        0x42, 0xff, 0x2d, 0x98, 0x4a, 0xe5, 0xa2, 0x8f, 0x7d, 0x02, 0x69, 0x87, 0xc7, 0x10, 0x9a, 0x7b, 0x3a, 0x1d, 0x36, 0x58, 0x82, 0x5a, 0x09, 0x17,
        0xe1, 0x69, 0x3e, 0x83, 0xa5, 0x71, 0x5d, 0x09,
    ];
    const CIPHER_BYTES: [u8; CIPHER_BYTE_LEN] = [
        0x11, 0xa9, 0x4e, 0xb7, 0x18, 0x53, 0x7e, 0x94, 0x7d, 0x0f, 0xf3, 0x0c, 0xdd, 0xae, 0x16, 0xae, 0xab, 0x42, 0x9e, 0xac, 0x09, 0x2b, 0x22, 0x00,
        0x06, 0xb1, 0x9c, 0xcc, 0xb5, 0x26, 0xb4, 0x30, 0xeb, 0x76, 0x83, 0xc0, 0xdf, 0x90, 0x3a, 0x88, 0xf6, 0xf1, 0x09, 0x52, 0xbc, 0xa4, 0xd6, 0x45,
        0x28, 0x4f, 0xf7, 0xed, 0x95, 0xc6, 0xa4, 0xe9, 0x67, 0xf5, 0xe7, 0xae, 0x22, 0xc9, 0x33, 0xcb,
    ];
    const MESSAGE: u64 = 0x12345678 & ((1 << 24) - 1);

    #[test]
    fn public_key_derivation_matches_reference_vector() {
        let privkey = PrivateKey::from_bytes(PRIVKEY_BYTES);
        assert_eq!(privkey.public_key().to_bytes(), PUBKEY_BYTES);
    }

    #[test]
    fn public_key_round_trips_through_bytes() {
        let pubkey = PublicKey::from_bytes(PUBKEY_BYTES).unwrap();
        assert_eq!(pubkey.to_bytes(), PUBKEY_BYTES);
    }

    #[test]
    fn public_key_rejects_non_curve_bytes() {
        // No curve point has y = 2.
        let mut bytes = [0u8; POINT_BYTE_LEN];
        bytes[0] = 2;

        assert_eq!(PublicKey::from_bytes(bytes), Err(EllipticPIRError::InvalidPublicKeyPoint));
    }

    #[test]
    fn encrypt_with_public_key_matches_reference_vector() {
        let pubkey = PublicKey::from_bytes(PUBKEY_BYTES).unwrap();
        let r = Scalar::from_bytes_mod_order(RANDOMNESS_BYTES);

        let cipher = pubkey.encrypt_with(MESSAGE, &r);
        assert_eq!(cipher.to_bytes(), CIPHER_BYTES);
    }

    #[test]
    fn encrypt_with_private_key_matches_reference_vector() {
        let privkey = PrivateKey::from_bytes(PRIVKEY_BYTES);
        let r = Scalar::from_bytes_mod_order(RANDOMNESS_BYTES);

        let cipher = privkey.encrypt_with(MESSAGE, &r);
        assert_eq!(cipher.to_bytes(), CIPHER_BYTES);
    }

    #[test]
    fn both_encryption_paths_agree_on_fresh_keys() {
        let mut rng = ChaCha8Rng::seed_from_u64(721);

        let privkey = PrivateKey::generate(&mut rng);
        let pubkey = privkey.public_key();
        let r = random_scalar(&mut rng);

        assert_eq!(privkey.encrypt_with(89, &r), pubkey.encrypt_with(89, &r));
    }

    #[test]
    fn cipher_round_trips_through_bytes() {
        let cipher = Cipher::from_bytes(&CIPHER_BYTES).unwrap();
        assert_eq!(cipher.to_bytes(), CIPHER_BYTES);
    }

    #[test]
    fn cipher_rejects_wrong_byte_length() {
        assert_eq!(
            Cipher::from_bytes(&CIPHER_BYTES[..CIPHER_BYTE_LEN - 1]),
            Err(EllipticPIRError::InvalidCipherByteLength(CIPHER_BYTE_LEN - 1))
        );
    }

    #[test]
    fn private_key_renders_as_hex() {
        let privkey = PrivateKey::from_bytes(PRIVKEY_BYTES);
        assert_eq!(privkey.to_string(), "7ef6add2bed59a79ba6edcfba48fde7a5531754af59376346c8b5284eef25207");
    }
}
