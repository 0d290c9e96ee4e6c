//! Command helper methods for Test.

use super::{Test, OWNER, REPO, TOKEN};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a dotseal command isolated from the host environment.
    ///
    /// Returns a Command configured with:
    /// - current directory set to the test project directory
    /// - `GITHUB_API_URL` pointing at the mock server
    /// - `GITHUB_TOKEN` set to a test token
    /// - colors disabled
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("dotseal").expect("failed to find dotseal binary");
        cmd.current_dir(self.dir.path());
        cmd.env("GITHUB_API_URL", self.server.url());
        cmd.env("GITHUB_TOKEN", TOKEN);
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("DOTSEAL_ENV_FILE");
        cmd.env_remove("DOTSEAL_WORKERS");
        cmd.env_remove("DOTSEAL_LOG");
        cmd
    }

    /// Shortcut for `dotseal -owner=acme -repo=widgets [extra...]`.
    pub fn push(&self, extra: &[&str]) -> Output {
        self.cmd()
            .arg(format!("-owner={}", OWNER))
            .arg(format!("-repo={}", REPO))
            .args(extra)
            .output()
            .expect("failed to run dotseal")
    }
}
