//! Identity command integration tests.

use predicates::prelude::*;

use super::common::{APP_FILE, TestEnv, fixture_content};

#[test]
fn identity_is_hex_digest() {
  let env = TestEnv::from_fixture("basic.yml");

  env
    .cmd()
    .args(["identity", APP_FILE])
    .assert()
    .success()
    .stdout(predicate::str::is_match("^[0-9a-f]{64}\n").unwrap())
    .stdout(predicate::str::contains("Image: containerflight_basicapp:1.0"));
}

#[test]
fn identity_is_stable() {
  let env = TestEnv::from_fixture("basic.yml");
  assert_eq!(env.identity(), env.identity());
}

#[test]
fn identity_follows_app_file() {
  let env = TestEnv::from_fixture("basic.yml");
  let before = env.identity();

  env.write_file(APP_FILE, &fixture_content("basic.yml").replace("1.0", "1.1"));
  assert_ne!(before, env.identity());
}

#[test]
fn identity_ignores_context_without_copy() {
  let env = TestEnv::from_fixture("basic.yml");
  env.write_file("payload.txt", "one");
  let before = env.identity();

  env.write_file("payload.txt", "two");
  assert_eq!(before, env.identity());
}

#[test]
fn identity_follows_copied_context() {
  let env = TestEnv::from_fixture("copy.yml");
  env.write_file("payload.txt", "one");
  let before = env.identity();

  env.write_file("payload.txt", "two");
  assert_ne!(before, env.identity());
}

#[test]
fn identity_json() {
  let env = TestEnv::from_fixture("copy.yml");
  env.write_file("payload.txt", "one");

  let output = env
    .cmd()
    .args(["identity", APP_FILE, "--output", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["identity"].as_str().unwrap().len(), 64);
  assert_eq!(json["image"], "containerflight_copier:unknown");
  assert_eq!(json["app_name"], "copier");
}

#[test]
fn identity_follows_renamed_context_file() {
  let env = TestEnv::from_content("console: false\nimage:\n  dockerfile: |\n    COPY . /src\n");
  env.write_file("run.sh", "echo hi");
  let before = env.identity();

  std::fs::rename(env.temp.path().join("run.sh"), env.temp.path().join("other.sh")).unwrap();
  assert_ne!(before, env.identity());
}
