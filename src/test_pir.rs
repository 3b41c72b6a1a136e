#![cfg(test)]

use crate::pir_internals::serialization;
use crate::{ciphers_count, Cipher, DecryptionTable, EllipticPIRError, Encryptor, PrivateKey, CIPHER_BYTE_LEN};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use test_case::test_case;

/// Stands in for the PIR server's side of the protocol: wraps `data` into `dimension`
/// layers of encrypted cipher records, `packing` plaintext bytes per record, innermost
/// layer first — the shape `decrypt_reply` peels back round by round.
fn build_reply<E: Encryptor>(encryptor: &E, rng: &mut ChaCha8Rng, data: &[u8], dimension: u8, packing: u8) -> Vec<u8> {
    let mut buf = data.to_vec();

    for _ in 0..dimension {
        let mut layer = Vec::with_capacity(buf.len().div_ceil(packing as usize) * CIPHER_BYTE_LEN);
        for chunk in buf.chunks(packing as usize) {
            let value = serialization::read_le_bytes(chunk);
            layer.extend_from_slice(&encryptor.encrypt(value, rng).to_bytes());
        }
        buf = layer;
    }

    buf
}

#[test]
fn encrypt_decrypt_round_trip_under_both_paths() {
    const MMAX: usize = 1 << 12;

    let mut rng = ChaCha8Rng::from_os_rng();
    let table = DecryptionTable::generate(MMAX).unwrap();

    let privkey = PrivateKey::generate(&mut rng);
    let pubkey = privkey.public_key();

    let mut messages = vec![0u64, 1, MMAX as u64 - 1];
    messages.extend((0..16).map(|_| rng.random_range(0..MMAX as u64)));

    for message in messages {
        let standard = pubkey.encrypt(message, &mut rng);
        let fast = privkey.encrypt(message, &mut rng);

        assert_eq!(table.decrypt(&privkey, &standard), Ok(message));
        assert_eq!(table.decrypt(&privkey, &fast), Ok(message));
    }
}

#[test_case(false ; "standard path")]
#[test_case(true ; "fast path")]
fn selector_decrypts_to_one_hot_digits(fast: bool) {
    let mut rng = ChaCha8Rng::from_os_rng();
    // Selector plaintexts are only ever 0 or 1.
    let table = DecryptionTable::generate(2).unwrap();

    let privkey = PrivateKey::generate(&mut rng);
    let index_counts = [4u64, 4];
    let idx = 6; // digits [1, 2]

    let selector = if fast {
        privkey.create_selector(&index_counts, idx, &mut rng).unwrap()
    } else {
        privkey.public_key().create_selector(&index_counts, idx, &mut rng).unwrap()
    };
    assert_eq!(selector.len(), ciphers_count(&index_counts) as usize * CIPHER_BYTE_LEN);

    let decrypted: Vec<u64> = selector
        .chunks_exact(CIPHER_BYTE_LEN)
        .map(|record| table.decrypt(&privkey, &Cipher::from_bytes(record).unwrap()).unwrap())
        .collect();
    assert_eq!(decrypted, [0, 1, 0, 0, 0, 0, 1, 0]);
}

#[test_case(1, 1 ; "one dimension, byte packing")]
#[test_case(1, 2 ; "one dimension, two byte packing")]
#[test_case(2, 1 ; "two dimensions, byte packing")]
#[test_case(2, 2 ; "two dimensions, two byte packing")]
fn reply_decode_round_trip(dimension: u8, packing: u8) {
    const MMAX: usize = 1 << 16;

    let mut rng = ChaCha8Rng::seed_from_u64(3571);
    let table = DecryptionTable::generate(MMAX).unwrap();
    let privkey = PrivateKey::generate(&mut rng);

    let mut data = vec![0u8; 48];
    rng.fill_bytes(&mut data);

    let reply = build_reply(&privkey, &mut rng, &data, dimension, packing);
    let decoded = table.decrypt_reply(&privkey, &reply, dimension, packing).unwrap();
    assert_eq!(decoded, data);

    // Same bytes, same parameters: byte-identical output.
    assert_eq!(table.decrypt_reply(&privkey, &reply, dimension, packing).unwrap(), decoded);
}

#[test]
fn corrupted_reply_record_aborts_the_whole_decode() {
    const MMAX: usize = 256;

    let mut rng = ChaCha8Rng::seed_from_u64(3572);
    let table = DecryptionTable::generate(MMAX).unwrap();
    let privkey = PrivateKey::generate(&mut rng);

    let mut reply = build_reply(&privkey, &mut rng, &[1, 2, 3, 4], 1, 1);
    reply[CIPHER_BYTE_LEN + 40] ^= 0xff; // inside the second record's C2

    assert_eq!(
        table.decrypt_reply(&privkey, &reply, 1, 1),
        Err(EllipticPIRError::ReplyRecordNotDecryptable(0, 1))
    );
}

#[test]
fn reply_parameters_are_validated_before_any_decryption() {
    let mut rng = ChaCha8Rng::from_os_rng();
    let table = DecryptionTable::generate(2).unwrap();
    let privkey = PrivateKey::generate(&mut rng);
    let reply = vec![0u8; CIPHER_BYTE_LEN];

    assert_eq!(table.decrypt_reply(&privkey, &reply, 0, 1), Err(EllipticPIRError::ZeroReplyDimension));
    assert_eq!(table.decrypt_reply(&privkey, &reply, 1, 0), Err(EllipticPIRError::ZeroReplyPacking));
    assert_eq!(
        table.decrypt_reply(&privkey, &reply[..CIPHER_BYTE_LEN - 3], 1, 1),
        Err(EllipticPIRError::UnalignedReplyBytes(CIPHER_BYTE_LEN - 3))
    );
}

#[test]
fn empty_reply_decodes_to_an_empty_buffer() {
    let mut rng = ChaCha8Rng::from_os_rng();
    let table = DecryptionTable::generate(2).unwrap();
    let privkey = PrivateKey::generate(&mut rng);

    assert_eq!(table.decrypt_reply(&privkey, &[], 2, 2), Ok(Vec::new()));
}
