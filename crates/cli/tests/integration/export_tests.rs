//! Export command integration tests.

use predicates::prelude::*;

use super::common::{APP_FILE, TestEnv};

// =============================================================================
// export dockerfile
// =============================================================================

#[test]
fn dockerfile_from_fixture() {
  let env = TestEnv::from_fixture("basic.yml");
  let wd = env.working_dir();

  env
    .cmd()
    .args(["export", "dockerfile", APP_FILE])
    .env("http_proxy", "http://proxy:3128")
    .assert()
    .success()
    .stdout(predicate::str::starts_with("FROM alpine:3.19\n\nENV http_proxy=http://proxy:3128\n"))
    .stdout(predicate::str::contains("apt-get install -y curl git &&"))
    .stdout(predicate::str::contains(format!("WORKDIR {wd}\n")))
    .stdout(predicate::str::contains("<<ERROR!>>").not());
}

#[test]
fn dockerfile_ends_with_user_switch() {
  let env = TestEnv::from_content("console: false\n");
  let user = env.cmd().arg("info").arg("--output").arg("json").output().unwrap();
  let info: serde_json::Value = serde_json::from_slice(&user.stdout).unwrap();
  let name = info["user"]["name"].as_str().unwrap().to_string();

  env
    .cmd()
    .args(["export", "dockerfile", APP_FILE])
    .assert()
    .success()
    .stdout(predicate::str::ends_with(format!("USER {name}\n")));
}

#[test]
fn dockerfile_from_relative_file_reference() {
  let env = TestEnv::from_fixture("file_ref.yml");
  env.write_file("docker/Dockerfile.in", "RUN echo ${APP_FILE_DIR}");
  let wd = env.working_dir();

  env
    .cmd()
    .args(["export", "dockerfile", APP_FILE])
    .assert()
    .success()
    .stdout(predicate::str::contains(format!("\nRUN echo {wd}\n")));
}

#[test]
fn dockerfile_missing_file_reference_fails() {
  let env = TestEnv::from_fixture("file_ref.yml");

  env
    .cmd()
    .args(["export", "dockerfile", APP_FILE])
    .assert()
    .failure()
    .stderr(predicate::str::contains("cannot read file"))
    .stderr(predicate::str::contains("Dockerfile.in"));
}

#[test]
fn dockerfile_add_embeds_file() {
  let env = TestEnv::from_content("image:\n  dockerfile: |\n    ${ADD(motd.txt, /etc/motd)}\n");
  env.write_file("motd.txt", "hello\n");

  env
    .cmd()
    .args(["export", "dockerfile", APP_FILE])
    .assert()
    .success()
    .stdout(predicate::str::contains("RUN echo 'hello\\n\\\n' > \"/etc/motd\"\n"));
}

#[test]
fn dockerfile_unknown_placeholder_is_marked() {
  let env = TestEnv::from_content("image:\n  dockerfile: |\n    RUN ${NOPE}\n");

  env
    .cmd()
    .args(["export", "dockerfile", APP_FILE])
    .assert()
    .success()
    .stdout(predicate::str::contains("RUN <<ERROR!>>\n"))
    .stderr(predicate::str::contains("unresolved placeholder"));
}

// =============================================================================
// export runargs
// =============================================================================

#[test]
fn runargs_text() {
  let env = TestEnv::from_fixture("basic.yml");
  let wd = env.working_dir();

  env
    .cmd()
    .args(["export", "runargs", APP_FILE])
    .assert()
    .success()
    .stdout(predicate::str::diff(format!("-v {wd}:{wd} -e TERM -h flybydocker -w {wd}\n")));
}

#[test]
fn runargs_json() {
  let env = TestEnv::from_content("console: false\nruntime:\n  docker:\n    runargs: [-h, myhost]\n");
  let wd = env.working_dir();

  let output = env
    .cmd()
    .args(["export", "runargs", APP_FILE, "--output", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let args: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
  let volume = format!("{wd}:{wd}");
  assert_eq!(args, vec!["-v", volume.as_str(), "-h", "myhost", "-w", wd.as_str()]);
}

#[test]
fn runargs_gui() {
  let env = TestEnv::from_content("console: false\ngui: true\n");

  let args = env.words(env.cmd().args(["export", "runargs", APP_FILE]).env("DISPLAY", ":1"));
  let at = args.iter().position(|a| a == "DISPLAY=:1").unwrap();
  assert_eq!(args[at - 1], "-e");
  assert_eq!(args[at + 1..at + 3], ["-v", "/tmp/.X11-unix:/tmp/.X11-unix"]);
}

#[test]
fn runargs_console_adds_input_flag() {
  let env = TestEnv::from_content("");

  env
    .cmd()
    .args(["export", "runargs", APP_FILE])
    .write_stdin("piped")
    .assert()
    .success()
    .stdout(predicate::str::contains(" -i -h flybydocker"));
}

#[test]
fn runargs_full() {
  let env = TestEnv::from_fixture("basic.yml");
  let wd = env.working_dir();

  let args = env.words(env.cmd().args(["export", "runargs", APP_FILE, "--full", "--", "arg1", "arg2"]));
  assert_eq!(args[..3], ["--rm", "--label", format!("containerflight_appFile={wd}/app.yml").as_str()]);
  assert!(args.contains(&"containerflight_image=containerflight_basicapp:1.0".to_string()));
  assert!(args.contains(&format!("containerflight_version={}", env!("CARGO_PKG_VERSION"))));
  assert_eq!(args[args.len() - 3..], ["containerflight_basicapp:1.0", "arg1", "arg2"]);
}

#[test]
fn runargs_extra_args_need_full() {
  let env = TestEnv::from_fixture("basic.yml");

  env
    .cmd()
    .args(["export", "runargs", APP_FILE, "--", "arg1"])
    .assert()
    .failure();
}

// =============================================================================
// export buildargs
// =============================================================================

#[test]
fn buildargs() {
  let env = TestEnv::from_fixture("basic.yml");
  let wd = env.working_dir();

  let args = env.words(env.cmd().args(["export", "buildargs", APP_FILE]));
  let app_file_label = format!("containerflight_appFile={wd}/app.yml");
  assert_eq!(
    args[..7],
    [wd.as_str(), "-f", "Dockerfile", "--label", "containerflight=true", "--label", app_file_label.as_str()]
  );
  assert!(args.contains(&"containerflight_description=fixture app".to_string()));
  assert_eq!(args[args.len() - 2..], ["-t", "containerflight_basicapp:1.0"]);
}
