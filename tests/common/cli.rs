//! Isolated workspace for running the `wss` binary.
//!
//! Every workspace gets its own history database and an empty settings
//! file, so tests never touch the user's real data.

use std::path::PathBuf;

use assert_cmd::Command;
use serde_json::Value;

use super::fixtures::TestDir;

pub struct Workspace {
    pub files: TestDir,
    store: PathBuf,
    config: PathBuf,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        let files = TestDir::new();
        let store = files.join("history.db");
        let config = files.file("config.toml", "");
        Self { files, store, config }
    }

    /// Use `content` as the settings file.
    pub fn with_config(self, content: &str) -> Self {
        std::fs::write(&self.config, content).expect("write config");
        self
    }

    /// History database used by this workspace.
    pub fn store_path(&self) -> &std::path::Path {
        &self.store
    }

    /// `wss` command bound to this workspace.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("wss").expect("wss binary");
        cmd.current_dir(self.files.path())
            .env("WSS_STORE", &self.store)
            .env("WSS_CONFIG", &self.config)
            .env("RUST_LOG", "off")
            .env("NO_COLOR", "1")
            .env_remove("WSS_FORMAT");
        cmd
    }

    /// Run with `--robot`, assert success, parse stdout.
    pub fn robot(&self, args: &[&str]) -> Value {
        let output = self.cmd().arg("--robot").args(args).assert().success().get_output().clone();
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(stdout.trim()).unwrap_or_else(|e| panic!("Failed to parse JSON ({e}):\n{stdout}"))
    }

    /// Run with `--robot`, assert failure, parse the error JSON on stderr.
    pub fn robot_error(&self, args: &[&str]) -> Value {
        let output = self.cmd().arg("--robot").args(args).assert().failure().get_output().clone();
        let stderr = String::from_utf8_lossy(&output.stderr);
        serde_json::from_str(stderr.trim()).unwrap_or_else(|e| panic!("Failed to parse JSON ({e}):\n{stderr}"))
    }
}
