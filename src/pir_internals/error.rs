use std::{error::Error, fmt::Display};

/// Errors surfaced by the EC-ElGamal PIR client core. Cryptographic failures are not transient: none of these warrant a retry.
#[derive(Debug, PartialEq, Eq)]
pub enum EllipticPIRError {
    // ElGamal
    InvalidPublicKeyPoint,
    InvalidCipherByteLength(usize),
    CipherNotDecryptable,

    // Decryption table
    InvalidDecryptionTableRange(usize),
    UnalignedDecryptionTableBytes(usize),
    DecryptionTableEntryCountMismatch(usize, usize),
    DecryptionTableNotSorted,

    // Selector
    ZeroSelectorIndexCount,
    SelectorShapeTooLarge,
    SelectorIndexOutOfRange(u64, u64),

    // Reply
    ZeroReplyDimension,
    ZeroReplyPacking,
    UnalignedReplyBytes(usize),
    ReplyRecordNotDecryptable(u8, usize),
}

impl Display for EllipticPIRError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPublicKeyPoint => write!(f, "The public key bytes do not decode to a curve point."),
            Self::InvalidCipherByteLength(len) => write!(f, "A serialized cipher must be exactly two point encodings, got '{}' bytes.", len),
            Self::CipherNotDecryptable => {
                write!(f, "The unmasked cipher point is not covered by the decryption table: message out of range, mismatched private key, or corrupted cipher.")
            }

            Self::InvalidDecryptionTableRange(mmax) => write!(f, "A decryption table must cover between 1 and 2^32 messages, requested '{}'.", mmax),
            Self::UnalignedDecryptionTableBytes(len) => write!(f, "Decryption table artifact of '{}' bytes is not a whole number of fixed-size records.", len),
            Self::DecryptionTableEntryCountMismatch(expected, actual) => {
                write!(f, "Decryption table artifact holds '{}' records, '{}' were requested.", actual, expected)
            }
            Self::DecryptionTableNotSorted => write!(f, "Decryption table records are not in ascending point encoding order."),

            Self::ZeroSelectorIndexCount => write!(f, "Every per-dimension index count of a selector must be positive."),
            Self::SelectorShapeTooLarge => write!(f, "Selector shape arithmetic overflows: the index counts describe an unrepresentable query space."),
            Self::SelectorIndexOutOfRange(idx, elements) => write!(f, "Selector index '{}' exceeds the '{}' addressable elements.", idx, elements),

            Self::ZeroReplyDimension => write!(f, "A server reply carries at least one reduction round, dimension can't be zero."),
            Self::ZeroReplyPacking => write!(f, "Reply packing width can't be zero bytes."),
            Self::UnalignedReplyBytes(len) => write!(f, "Reply of '{}' bytes is not a whole number of fixed-size cipher records.", len),
            Self::ReplyRecordNotDecryptable(round, index) => write!(f, "Cipher record '{}' of reply reduction round '{}' can't be decrypted.", index, round),
        }
    }
}

impl Error for EllipticPIRError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}
