//! Selector shaping and assembly.
//!
//! A PIR query index is decomposed in mixed radix over the per-dimension index
//! counts, most significant digit first, in dimension order: digit `d` is
//! `idx / prod(index_counts[d+1..])`. This convention is shared with the PIR
//! server; both sides must compute [`ciphers_count`] and [`elements_count`]
//! identically or selectors desynchronize from server indexing.

use rayon::prelude::*;

use crate::elgamal::Encryptor;
use crate::pir_internals::error::EllipticPIRError;
use crate::pir_internals::params::CIPHER_BYTE_LEN;
use curve25519_dalek::scalar::Scalar;

/// The number of ciphers in a selector shaped by `index_counts`: one per index of every dimension.
pub fn ciphers_count(index_counts: &[u64]) -> u64 {
    index_counts.iter().sum()
}

/// The number of elements a selector shaped by `index_counts` can address: the product of all dimension sizes.
pub fn elements_count(index_counts: &[u64]) -> u64 {
    index_counts.iter().product()
}

fn checked_ciphers_count(index_counts: &[u64]) -> Option<u64> {
    index_counts.iter().try_fold(0u64, |sum, &count| sum.checked_add(count))
}

fn checked_elements_count(index_counts: &[u64]) -> Option<u64> {
    index_counts.iter().try_fold(1u64, |product, &count| product.checked_mul(count))
}

/// Expands `idx` into the per-cipher plaintext choices of its selector: `1` at each
/// dimension's digit position, `0` everywhere else.
///
/// All shape validation happens here, before any curve work.
pub(crate) fn one_hot_choices(index_counts: &[u64], idx: u64) -> Result<Vec<u64>, EllipticPIRError> {
    if index_counts.iter().any(|&count| count == 0) {
        return Err(EllipticPIRError::ZeroSelectorIndexCount);
    }

    let elements = checked_elements_count(index_counts).ok_or(EllipticPIRError::SelectorShapeTooLarge)?;
    if idx >= elements {
        return Err(EllipticPIRError::SelectorIndexOutOfRange(idx, elements));
    }

    let ciphers = checked_ciphers_count(index_counts)
        .and_then(|count| usize::try_from(count).ok())
        .ok_or(EllipticPIRError::SelectorShapeTooLarge)?;

    let mut choices = Vec::with_capacity(ciphers);
    let mut remaining = idx;
    let mut stride = elements;

    for &count in index_counts {
        stride /= count;
        let digit = remaining / stride;
        remaining %= stride;

        choices.extend((0..count).map(|position| u64::from(position == digit)));
    }

    Ok(choices)
}

/// Encrypts the plaintext choices of a selector, one randomness scalar per cipher,
/// and concatenates the serialized ciphers in dimension order.
pub(crate) fn assemble<E>(encryptor: &E, choices: &[u64], randomness: &[Scalar]) -> Vec<u8>
where
    E: Encryptor + ?Sized,
{
    let ciphers: Vec<[u8; CIPHER_BYTE_LEN]> = choices
        .par_iter()
        .zip(randomness.par_iter())
        .map(|(&message, r)| encryptor.encrypt_with(message, r).to_bytes())
        .collect();

    let mut selector = Vec::with_capacity(ciphers.len() * CIPHER_BYTE_LEN);
    for cipher in &ciphers {
        selector.extend_from_slice(cipher);
    }

    selector
}
