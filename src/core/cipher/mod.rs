//! Cryptographic operations.
//!
//! GitHub decrypts Actions secrets with libsodium's `crypto_box_seal_open`,
//! so values are sealed client-side with the matching anonymous sealed box:
//! an ephemeral X25519 keypair, XSalsa20-Poly1305, and the ephemeral public
//! key prepended to the ciphertext.

mod sealed;

pub use sealed::{open, Sealer, SEAL_OVERHEAD};
