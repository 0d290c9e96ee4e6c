//! Core library components.
//!
//! Dotenv parsing, sealed-box encryption, the GitHub client and the
//! batch uploader. Nothing here prints; the CLI layer owns output.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod github;
pub mod sync;
pub mod validation;
