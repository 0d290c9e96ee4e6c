//! Test support utilities for dotseal integration tests.
//!
//! Provides an isolated working directory plus a mock GitHub API.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crypto_box::aead::OsRng;
use crypto_box::SecretKey;
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Request bodies recorded by a capturing mock.
pub type Captured = Arc<Mutex<Vec<Vec<u8>>>>;

/// Test environment with an isolated project dir and a mock API server.
///
/// Child processes use `.current_dir()` and point `GITHUB_API_URL` at the
/// mock server, so tests can safely run in parallel.
pub struct Test {
    /// Temporary directory the binary runs in
    pub dir: TempDir,
    /// Mock GitHub REST API
    pub server: ServerGuard,
    /// Private half of the repository key served by the mock
    pub secret_key: SecretKey,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let server = Server::new();
        let secret_key = SecretKey::generate(&mut OsRng);

        Self {
            dir,
            server,
            secret_key,
        }
    }

    /// Create a test environment with a .env file.
    pub fn with_env(content: &str) -> Self {
        let t = Self::new();
        t.write_env(".env", content);
        t
    }

    /// Write a dotenv file into the project dir.
    pub fn write_env(&self, name: &str, content: &str) {
        std::fs::write(self.dir.path().join(name), content).expect("failed to write env file");
    }

    /// Base64 public key matching `secret_key`.
    pub fn public_key_b64(&self) -> String {
        STANDARD.encode(self.secret_key.public_key().as_bytes())
    }

    /// Serve the repository public key.
    pub fn mock_public_key(&mut self) -> Mock {
        let body = format!(r#"{{"key_id":"{}","key":"{}"}}"#, KEY_ID, self.public_key_b64());
        self.server
            .mock("GET", public_key_path().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create()
    }

    /// Fail the public key request with `status`.
    pub fn mock_public_key_error(&mut self, status: usize, message: &str) -> Mock {
        self.server
            .mock("GET", public_key_path().as_str())
            .with_status(status)
            .with_body(format!(r#"{{"message":"{}"}}"#, message))
            .create()
    }

    /// Accept an upload of `name`, expecting exactly `hits` calls.
    pub fn mock_put(&mut self, name: &str, hits: usize) -> Mock {
        self.server
            .mock("PUT", secret_path(name).as_str())
            .match_body(Matcher::PartialJson(serde_json::json!({ "key_id": KEY_ID })))
            .with_status(201)
            .expect(hits)
            .create()
    }

    /// Accept an upload of `name` once and record its request body.
    pub fn mock_put_capture(&mut self, name: &str) -> (Mock, Captured) {
        let captured = Captured::default();
        let sink = Arc::clone(&captured);

        let mock = self
            .server
            .mock("PUT", secret_path(name).as_str())
            .with_status(201)
            .with_body_from_request(move |request| {
                if let Ok(body) = request.body() {
                    sink.lock().unwrap().push(body.clone());
                }
                Vec::new()
            })
            .expect(1)
            .create();

        (mock, captured)
    }

    /// Reject an upload of `name` with `status`.
    pub fn mock_put_error(&mut self, name: &str, status: usize) -> Mock {
        self.server
            .mock("PUT", secret_path(name).as_str())
            .with_status(status)
            .with_body(r#"{"message":"Validation Failed"}"#)
            .create()
    }

    /// Catch-all for uploads, expecting exactly `hits` calls in total.
    pub fn mock_any_put(&mut self, hits: usize) -> Mock {
        self.server
            .mock("PUT", Matcher::Regex(format!("^/repos/{}/{}/actions/secrets/", OWNER, REPO)))
            .with_status(201)
            .expect(hits)
            .create()
    }
}
