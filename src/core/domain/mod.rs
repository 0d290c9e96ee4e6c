//! Domain types.

mod env;
mod public_key;
mod secret;
mod target;

pub use env::Env;
pub use public_key::RepoPublicKey;
pub use secret::{EncryptedSecret, SecretEntry};
pub use target::Target;
