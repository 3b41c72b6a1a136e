/// The byte length of a scalar (a private key, or encryption randomness).
pub const SCALAR_BYTE_LEN: usize = 32;
/// The byte length of a canonical (compressed Edwards) point encoding.
pub const POINT_BYTE_LEN: usize = 32;
/// The byte length of a serialized ciphertext: two canonical point encodings.
pub const CIPHER_BYTE_LEN: usize = 2 * POINT_BYTE_LEN;
/// The byte length of one decryption table record: a canonical point encoding followed by its `u32` little-endian message index.
pub const TABLE_ENTRY_BYTE_LEN: usize = POINT_BYTE_LEN + std::mem::size_of::<u32>();
/// log2 of the default decryption table range.
pub const DEFAULT_MMAX_BITS: usize = 24;
/// Default number of decryption table entries. A protocol-level constant: client and server deployments must agree on it out of band.
pub const DEFAULT_MMAX: usize = 1 << DEFAULT_MMAX_BITS;
