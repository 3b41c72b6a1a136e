use std::cmp::min;

/// Writes the low bytes of `word` into `bytes` in little-endian byte order.
///
/// Writes at most 8 bytes. A shorter destination receives only that many of the
/// least significant bytes; this is what packs a decrypted reply value into a
/// `packing`-byte slot.
#[inline(always)]
pub fn write_le_bytes(word: u64, bytes: &mut [u8]) {
    let writable_num_bytes = min(bytes.len(), std::mem::size_of::<u64>());
    bytes[..writable_num_bytes].copy_from_slice(&word.to_le_bytes()[..writable_num_bytes]);
}

/// Reads a u64 from `bytes` in little-endian byte order.
///
/// Reads at most 8 bytes. A shorter source fills only the least significant
/// bytes, leaving the rest zero. The inverse of [`write_le_bytes`].
#[inline(always)]
pub fn read_le_bytes(bytes: &[u8]) -> u64 {
    let readable_num_bytes = min(bytes.len(), std::mem::size_of::<u64>());

    let mut word = [0u8; std::mem::size_of::<u64>()];
    word[..readable_num_bytes].copy_from_slice(&bytes[..readable_num_bytes]);

    u64::from_le_bytes(word)
}
