//! dotseal - seal local .env secrets into GitHub Actions.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── args          # Go-style flag normalization
//! │   ├── output        # Terminal output helpers
//! │   └── push          # The push workflow
//! └── core/             # Core library components
//!     ├── config        # Resolved run settings
//!     ├── cipher/       # libsodium sealed boxes
//!     ├── domain/       # Target, Env, secrets, public key
//!     ├── github        # REST client for Actions secrets
//!     ├── sync          # Bounded worker pool with cancellation
//!     └── validation    # Secret name rules
//! ```

pub mod cli;
pub mod core;
pub mod error;
