//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Name of the app file inside each test directory.
pub const APP_FILE: &str = "app.yml";

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the app file. Commands
/// run with that directory as working directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create from a fixture file, copied to `app.yml`.
  pub fn from_fixture(name: &str) -> Self {
    Self::from_content(&fixture_content(name))
  }

  /// Create with `content` as the app file.
  pub fn from_content(content: &str) -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };
    env.write_file(APP_FILE, content);
    env
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// The working directory as the binary sees it.
  pub fn working_dir(&self) -> String {
    let p = self.temp.path().to_path_buf();
    dunce::canonicalize(&p).unwrap_or(p).display().to_string()
  }

  /// Get a pre-configured Command for the containerflight binary.
  ///
  /// Runs in the temp directory with logging and proxy variables cleared.
  pub fn cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("containerflight");
    cmd.current_dir(self.temp.path());
    for var in ["RUST_LOG", "http_proxy", "https_proxy", "no_proxy", "DISPLAY"] {
      cmd.env_remove(var);
    }
    cmd
  }

  /// Run `cmd` and split its stdout back into shell words.
  pub fn words(&self, cmd: &mut Command) -> Vec<String> {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    shlex::split(&String::from_utf8(output.stdout).unwrap()).unwrap()
  }

  /// Run `identity` and return the hash.
  pub fn identity(&self) -> String {
    let output = self.cmd().arg("identity").arg(APP_FILE).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout)
      .unwrap()
      .lines()
      .next()
      .unwrap_or_default()
      .to_string()
  }
}
