//! EllipticPIR client core: an additively homomorphic EC-ElGamal encryption engine, over the Edwards form of Curve25519, for building and decoding **P**rivate **I**nformation **R**etrieval (PIR) queries.
//!
//! This crate provides the client-side cryptography of an EC-ElGamal based PIR protocol: key generation, encryption of small integer
//! messages into ciphertexts a remote untrusted server can combine homomorphically, construction of the one-hot encrypted selector
//! vectors that encode a query index, and decryption of the server's packed reply — all without revealing which item was requested.
//! Decryption leans on a precomputed `m*G` table that turns discrete-log recovery into a binary search.
//!
//! ## Features
//!
//! * **Two encryption paths:** the standard public-key path, and an accelerated private-key path for the key owner which halves the
//!   scalar multiplications per cipher. Both implement the same [`Encryptor`] trait and are interchangeable everywhere.
//! * **Bounded, fast decryption:** a sorted [`DecryptionTable`] maps `m*G` back to `m` for every `m` below its configured range;
//!   lookups are O(log mmax). The table is built once, optionally persisted as a byte artifact, and shared freely across threads.
//! * **Explicit randomness:** every key generation and encryption draws from a caller-supplied cryptographically secure RNG, so
//!   deterministic test vectors come for free.
//! * **Error handling:** all failure cases — malformed artifacts, undecryptable ciphers, out-of-range query indexes — surface as
//!   [`EllipticPIRError`] values, never as panics or sentinel results.
//!
//! ## Usage
//!
//! This crate covers the cryptographic engine only; pair it with whatever transports your selectors to the PIR server and its
//! replies back. Client and server deployments must agree out of band on the table range (`mmax`, default [`DEFAULT_MMAX`]) and on
//! the reply `dimension` and `packing` parameters.
//!
//! ```rust
//! use elliptic_pir::{ciphers_count, DecryptionTable, Encryptor, PrivateKey, CIPHER_BYTE_LEN};
//! use rand::prelude::*;
//! use rand_chacha::ChaCha8Rng;
//!
//! fn main() {
//!     const MMAX: usize = 1 << 10;
//!
//!     let mut rng = ChaCha8Rng::from_os_rng();
//!     let privkey = PrivateKey::generate(&mut rng);
//!     let pubkey = privkey.public_key();
//!
//!     // Offline: build the m*G decryption table once (or load a persisted artifact).
//!     let table = DecryptionTable::generate(MMAX).expect("table generation failed");
//!
//!     // Online: encrypt with either key half, decrypt with the private key.
//!     let cipher = pubkey.encrypt(42, &mut rng);
//!     assert_eq!(table.decrypt(&privkey, &cipher), Ok(42));
//!
//!     // PIR query: a one-hot selector addressing element 6 of a 4x4 query space.
//!     let selector = pubkey.create_selector(&[4, 4], 6, &mut rng).expect("selector creation failed");
//!     assert_eq!(selector.len(), ciphers_count(&[4, 4]) as usize * CIPHER_BYTE_LEN);
//! }
//! ```
//!
//! ## Modules
//!
//! * `elgamal`: key pairs, ciphers, and the [`Encryptor`] trait with its two implementations.
//! * `selector`: query-space sizing ([`ciphers_count`]/[`elements_count`]) and selector construction, shared contract with the server.
//! * `decryption_table`: the `m*G` table — generation with progress reporting, artifact load/store, cipher and reply decryption.

pub use pir_internals::error::EllipticPIRError;
pub use pir_internals::params::{CIPHER_BYTE_LEN, DEFAULT_MMAX, POINT_BYTE_LEN, SCALAR_BYTE_LEN, TABLE_ENTRY_BYTE_LEN};

pub mod decryption_table;
pub mod elgamal;
pub mod selector;

mod pir_internals;

mod test_pir;

pub use decryption_table::DecryptionTable;
pub use elgamal::{random_scalar, Cipher, Encryptor, PrivateKey, PublicKey};
pub use selector::{ciphers_count, elements_count};
