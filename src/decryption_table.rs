use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::traits::Identity;
use rayon::prelude::*;

use crate::elgamal::{Cipher, PrivateKey};
use crate::pir_internals::error::EllipticPIRError;
use crate::pir_internals::params::{CIPHER_BYTE_LEN, POINT_BYTE_LEN, TABLE_ENTRY_BYTE_LEN};
use crate::pir_internals::serialization;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TableEntry {
    point: [u8; POINT_BYTE_LEN],
    index: u32,
}

/// The precomputed discrete-log table mapping the canonical encoding of `m*G` back to `m`,
/// for every `m` in `[0, mmax)`.
///
/// Entries are kept sorted ascending by point encoding, which is what makes decryption a
/// binary search instead of a discrete-log computation. The table is immutable once built
/// and safe to share across any number of concurrent decrypt calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecryptionTable {
    entries: Vec<TableEntry>,
}

impl DecryptionTable {
    /// Builds the table covering messages `[0, mmax)`.
    ///
    /// See [`DecryptionTable::generate_with_progress`] for reporting on this long-running
    /// computation.
    pub fn generate(mmax: usize) -> Result<DecryptionTable, EllipticPIRError> {
        Self::generate_with_progress(mmax, |_| {})
    }

    /// Builds the table covering messages `[0, mmax)`, invoking `progress` after every
    /// computed entry with the number of entries computed so far.
    ///
    /// Each `m*G` is the previous point plus `G` — a running sum, not `mmax` scalar
    /// multiplications. Entries are sorted by point encoding only after the accumulation
    /// finishes. The whole computation is sequential; callers decide whether to move it
    /// to a background thread.
    pub fn generate_with_progress<F>(mmax: usize, mut progress: F) -> Result<DecryptionTable, EllipticPIRError>
    where
        F: FnMut(usize),
    {
        if mmax == 0 || mmax.wrapping_sub(1) > u32::MAX as usize {
            return Err(EllipticPIRError::InvalidDecryptionTableRange(mmax));
        }

        let mut entries = Vec::with_capacity(mmax);
        let mut accumulator = EdwardsPoint::identity();

        for index in 0..mmax {
            entries.push(TableEntry {
                point: accumulator.compress().to_bytes(),
                index: index as u32,
            });
            accumulator += ED25519_BASEPOINT_POINT;
            progress(index + 1);
        }

        entries.sort_unstable_by(|a, b| a.point.cmp(&b.point));

        Ok(DecryptionTable { entries })
    }

    /// Parses a persisted table artifact (see [`DecryptionTable::to_bytes`] for the format).
    ///
    /// The byte length must be a whole number of records and yield exactly `mmax` of them,
    /// and records must be in strictly ascending point encoding order — a loaded table
    /// upholds the same sort invariant as a generated one. Any mismatch is a load failure,
    /// never a partial success.
    pub fn from_bytes(bytes: &[u8], mmax: usize) -> Result<DecryptionTable, EllipticPIRError> {
        if mmax == 0 || mmax.wrapping_sub(1) > u32::MAX as usize {
            return Err(EllipticPIRError::InvalidDecryptionTableRange(mmax));
        }
        if bytes.len() % TABLE_ENTRY_BYTE_LEN != 0 {
            return Err(EllipticPIRError::UnalignedDecryptionTableBytes(bytes.len()));
        }

        let record_count = bytes.len() / TABLE_ENTRY_BYTE_LEN;
        if record_count != mmax {
            return Err(EllipticPIRError::DecryptionTableEntryCountMismatch(mmax, record_count));
        }

        let mut entries = Vec::with_capacity(record_count);
        for record in bytes.chunks_exact(TABLE_ENTRY_BYTE_LEN) {
            let mut point = [0u8; POINT_BYTE_LEN];
            point.copy_from_slice(&record[..POINT_BYTE_LEN]);
            let index = serialization::read_le_bytes(&record[POINT_BYTE_LEN..]) as u32;

            if entries.last().is_some_and(|previous: &TableEntry| previous.point >= point) {
                return Err(EllipticPIRError::DecryptionTableNotSorted);
            }
            entries.push(TableEntry { point, index });
        }

        Ok(DecryptionTable { entries })
    }

    /// Serializes the table: `mmax` fixed-size records, each the canonical point encoding
    /// followed by its `u32` little-endian message index, in ascending point encoding order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.entries.len() * TABLE_ENTRY_BYTE_LEN);
        for entry in &self.entries {
            bytes.extend_from_slice(&entry.point);
            bytes.extend_from_slice(&entry.index.to_le_bytes());
        }

        bytes
    }

    /// The number of messages this table covers.
    pub fn mmax(&self) -> usize {
        self.entries.len()
    }

    /// Binary search for the message whose `m*G` has this canonical encoding.
    pub fn lookup(&self, point: &CompressedEdwardsY) -> Option<u32> {
        self.entries
            .binary_search_by(|entry| entry.point.cmp(point.as_bytes()))
            .ok()
            .map(|position| self.entries[position].index)
    }

    /// Decrypts a single cipher: unmasks `M = C2 - sk*C1`, then resolves `M` through the table.
    ///
    /// Fails with [`EllipticPIRError::CipherNotDecryptable`] when a component is not a curve
    /// point or the unmasked point is not covered — a message outside `[0, mmax)`, a
    /// mismatched private key, or a corrupted cipher. Deterministic for fixed inputs.
    pub fn decrypt(&self, privkey: &PrivateKey, cipher: &Cipher) -> Result<u64, EllipticPIRError> {
        let (c1, c2) = cipher.components();
        let c1 = c1.decompress().ok_or(EllipticPIRError::CipherNotDecryptable)?;
        let c2 = c2.decompress().ok_or(EllipticPIRError::CipherNotDecryptable)?;

        let unmasked = c2 - privkey.scalar() * c1;
        self.lookup(&unmasked.compress()).map(u64::from).ok_or(EllipticPIRError::CipherNotDecryptable)
    }

    /// Decrypts and unpacks a server reply into plaintext bytes.
    ///
    /// The reply is a sequence of fixed-size cipher records. Each of the `dimension`
    /// reduction rounds decrypts every record and writes each value as `packing`
    /// little-endian bytes; the packed buffer then becomes the next round's cipher
    /// stream, truncated to a whole number of records. The final round's packed buffer
    /// is the result.
    ///
    /// Any record that fails to decrypt aborts the whole decode with
    /// [`EllipticPIRError::ReplyRecordNotDecryptable`] carrying the round and record
    /// index — no partial data is returned.
    pub fn decrypt_reply(&self, privkey: &PrivateKey, reply: &[u8], dimension: u8, packing: u8) -> Result<Vec<u8>, EllipticPIRError> {
        if dimension == 0 {
            return Err(EllipticPIRError::ZeroReplyDimension);
        }
        if packing == 0 {
            return Err(EllipticPIRError::ZeroReplyPacking);
        }
        if reply.len() % CIPHER_BYTE_LEN != 0 {
            return Err(EllipticPIRError::UnalignedReplyBytes(reply.len()));
        }

        let packing = packing as usize;
        let mut buf = reply.to_vec();
        let mut record_count = buf.len() / CIPHER_BYTE_LEN;

        for round in 0..dimension {
            let decrypted = buf[..record_count * CIPHER_BYTE_LEN]
                .par_chunks_exact(CIPHER_BYTE_LEN)
                .enumerate()
                .map(|(record_idx, record)| {
                    let cipher = Cipher::from_bytes(record)?;
                    self.decrypt(privkey, &cipher)
                        .map_err(|_| EllipticPIRError::ReplyRecordNotDecryptable(round, record_idx))
                })
                .collect::<Result<Vec<u64>, EllipticPIRError>>()?;

            let mut packed = vec![0u8; record_count * packing];
            for (value, slot) in decrypted.iter().zip(packed.chunks_exact_mut(packing)) {
                serialization::write_le_bytes(*value, slot);
            }

            buf = packed;
            if round + 1 < dimension {
                record_count = buf.len() / CIPHER_BYTE_LEN;
            }
        }

        Ok(buf)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::elgamal::Encryptor;
    use curve25519_dalek::scalar::Scalar;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    const MMAX: usize = 128;

    fn message_point(message: u64) -> CompressedEdwardsY {
        EdwardsPoint::mul_base(&Scalar::from(message)).compress()
    }

    #[test]
    fn entries_are_strictly_sorted_after_generation() {
        let table = DecryptionTable::generate(MMAX).unwrap();
        let bytes = table.to_bytes();

        let points: Vec<&[u8]> = bytes.chunks_exact(TABLE_ENTRY_BYTE_LEN).map(|record| &record[..POINT_BYTE_LEN]).collect();
        assert!(points.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn lookup_resolves_every_covered_message() {
        let table = DecryptionTable::generate(MMAX).unwrap();

        for message in 0..MMAX as u64 {
            assert_eq!(table.lookup(&message_point(message)), Some(message as u32));
        }
        assert_eq!(table.lookup(&message_point(MMAX as u64)), None);
    }

    #[test]
    fn progress_is_reported_once_per_entry() {
        let mut reported = Vec::new();
        DecryptionTable::generate_with_progress(16, |computed| reported.push(computed)).unwrap();

        assert_eq!(reported, (1..=16).collect::<Vec<usize>>());
    }

    #[test]
    fn zero_range_is_rejected() {
        assert_eq!(DecryptionTable::generate(0), Err(EllipticPIRError::InvalidDecryptionTableRange(0)));
    }

    #[test]
    fn artifact_round_trips() {
        let table = DecryptionTable::generate(MMAX).unwrap();
        let bytes = table.to_bytes();

        assert_eq!(bytes.len(), MMAX * TABLE_ENTRY_BYTE_LEN);
        assert_eq!(DecryptionTable::from_bytes(&bytes, MMAX).unwrap(), table);
    }

    #[test]
    fn truncated_artifact_is_rejected() {
        let bytes = DecryptionTable::generate(MMAX).unwrap().to_bytes();

        assert_eq!(
            DecryptionTable::from_bytes(&bytes[..bytes.len() - 1], MMAX),
            Err(EllipticPIRError::UnalignedDecryptionTableBytes(MMAX * TABLE_ENTRY_BYTE_LEN - 1))
        );
    }

    #[test]
    fn record_count_mismatch_is_rejected() {
        let bytes = DecryptionTable::generate(MMAX).unwrap().to_bytes();

        assert_eq!(
            DecryptionTable::from_bytes(&bytes, MMAX - 1),
            Err(EllipticPIRError::DecryptionTableEntryCountMismatch(MMAX - 1, MMAX))
        );
    }

    #[test]
    fn unsorted_artifact_is_rejected() {
        let mut bytes = DecryptionTable::generate(MMAX).unwrap().to_bytes();

        let (head, tail) = bytes.split_at_mut(TABLE_ENTRY_BYTE_LEN);
        head.swap_with_slice(&mut tail[..TABLE_ENTRY_BYTE_LEN]);

        assert_eq!(DecryptionTable::from_bytes(&bytes, MMAX), Err(EllipticPIRError::DecryptionTableNotSorted));
    }

    #[test]
    fn decrypt_resolves_messages_under_the_matching_key() {
        let mut rng = ChaCha8Rng::seed_from_u64(907);
        let table = DecryptionTable::generate(MMAX).unwrap();

        let privkey = PrivateKey::generate(&mut rng);
        let pubkey = privkey.public_key();

        let cipher = pubkey.encrypt(42, &mut rng);
        assert_eq!(table.decrypt(&privkey, &cipher), Ok(42));
    }

    #[test]
    fn decrypt_with_unrelated_key_never_silently_succeeds() {
        let mut rng = ChaCha8Rng::seed_from_u64(908);
        let table = DecryptionTable::generate(MMAX).unwrap();

        let privkey = PrivateKey::generate(&mut rng);
        let unrelated = PrivateKey::generate(&mut rng);
        let cipher = privkey.public_key().encrypt(42, &mut rng);

        match table.decrypt(&unrelated, &cipher) {
            Ok(message) => assert_ne!(message, 42),
            Err(e) => assert_eq!(e, EllipticPIRError::CipherNotDecryptable),
        }
    }

    #[test]
    fn out_of_range_message_is_not_decryptable() {
        let mut rng = ChaCha8Rng::seed_from_u64(909);
        let table = DecryptionTable::generate(MMAX).unwrap();

        let privkey = PrivateKey::generate(&mut rng);
        let pubkey = privkey.public_key();

        assert_eq!(table.decrypt(&privkey, &pubkey.encrypt(MMAX as u64 - 1, &mut rng)), Ok(MMAX as u64 - 1));
        assert_eq!(
            table.decrypt(&privkey, &pubkey.encrypt(MMAX as u64, &mut rng)),
            Err(EllipticPIRError::CipherNotDecryptable)
        );
        assert_eq!(table.decrypt(&privkey, &pubkey.encrypt(200, &mut rng)), Err(EllipticPIRError::CipherNotDecryptable));
    }
}
