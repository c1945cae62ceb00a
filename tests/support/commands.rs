//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a keyref command with correct environment variables.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test project directory
    /// - No inherited profile or log settings
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("keyref").expect("failed to find keyref binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("KEYREF_PROFILE");
        cmd.env_remove("KEYREF_LOG");
        cmd.env_remove("KEYREF_LOG_FORMAT");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `keyref init`.
    pub fn init_cmd(&self, project: &str) -> Output {
        self.cmd()
            .args(["init", "--project", project, "--name", "tester"])
            .output()
            .expect("failed to run keyref init")
    }

    /// Shortcut for `keyref set`.
    pub fn set(&self, key: &str, val: &str) -> Output {
        self.cmd()
            .args(["set", key, val])
            .output()
            .expect("failed to run keyref set")
    }

    /// Shortcut for `keyref set --backend`.
    pub fn set_in(&self, backend: &str, key: &str, val: &str) -> Output {
        self.cmd()
            .args(["set", key, val, "--backend", backend])
            .output()
            .expect("failed to run keyref set")
    }

    /// Shortcut for `keyref get`.
    pub fn get(&self, key: &str) -> Output {
        self.cmd()
            .args(["get", key])
            .output()
            .expect("failed to run keyref get")
    }

    /// Shortcut for `keyref rm`.
    pub fn rm(&self, key: &str) -> Output {
        self.cmd()
            .args(["rm", key])
            .output()
            .expect("failed to run keyref rm")
    }

    /// Shortcut for `keyref list`.
    pub fn list(&self) -> Output {
        self.cmd()
            .arg("list")
            .output()
            .expect("failed to run keyref list")
    }

    /// Shortcut for `keyref resolve` with extra args.
    pub fn resolve(&self, args: &[&str]) -> Output {
        self.cmd()
            .arg("resolve")
            .args(args)
            .output()
            .expect("failed to run keyref resolve")
    }

    /// Shortcut for `keyref team add`.
    pub fn team_add(&self, name: &str, key: &str) -> Output {
        self.cmd()
            .args(["team", "add", name, key])
            .output()
            .expect("failed to run keyref team add")
    }

    /// Shortcut for `keyref whoami`.
    pub fn whoami(&self) -> Output {
        self.cmd()
            .arg("whoami")
            .output()
            .expect("failed to run keyref whoami")
    }
}
