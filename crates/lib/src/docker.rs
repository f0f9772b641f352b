//! Argument vectors for the `docker` CLI.
//!
//! Images and containers carry `containerflight_*` labels so an image built
//! for an app file can be found again by its identity.

use crate::app::ResolvedBuild;
use crate::consts::{APP_NAME, TOOL_VERSION, labels};
use crate::identity::BuildIdentity;

/// Tag for the image of an app: `containerflight_<name>:<version>`.
///
/// The name is lowercased with every non-word character removed; an empty
/// name or version becomes `unknown`.
pub fn image_tag(app_name: &str, app_version: &str) -> String {
  let name: String = app_name
    .chars()
    .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
    .collect::<String>()
    .to_lowercase();
  let name = if name.is_empty() { "unknown" } else { &name };
  let version = if app_version.is_empty() { "unknown" } else { app_version };

  format!("{APP_NAME}_{name}:{version}")
}

fn label(key: &str, value: impl std::fmt::Display) -> [String; 2] {
  ["--label".to_string(), format!("{key}={value}")]
}

/// Arguments for `docker build`, after the subcommand.
///
/// The app file directory is the build context.
pub fn build_command_args(
  dockerfile_path: &str,
  build: &ResolvedBuild,
  identity: &BuildIdentity,
  tag: &str,
) -> Vec<String> {
  let mut args = vec![
    build.app_file_dir.display().to_string(),
    "-f".to_string(),
    dockerfile_path.to_string(),
  ];
  args.extend(label(labels::MARKER, "true"));
  args.extend(label(labels::APP_FILE, build.app_config_file.display()));
  args.extend(label(labels::HASH, identity));
  args.extend(label(labels::BUILD_VERSION, TOOL_VERSION));
  args.extend(label(labels::DESCRIPTION, &build.app_description));
  args.extend(["-t".to_string(), tag.to_string()]);
  args
}

/// Arguments for `docker run`, after the subcommand.
///
/// `image` is the image to start and `extra` the arguments passed on to the
/// app.
pub fn run_command_args(build: &ResolvedBuild, identity: &BuildIdentity, image: &str, extra: &[String]) -> Vec<String> {
  let mut args = vec!["--rm".to_string()];
  args.extend(label(labels::APP_FILE, build.app_config_file.display()));
  args.extend(label(labels::IMAGE, image_tag(&build.app_name, &build.app_version)));
  args.extend(label(labels::HASH, identity));
  args.extend(label(labels::VERSION, TOOL_VERSION));
  args.extend(build.run_args.iter().cloned());
  args.push(image.to_string());
  args.extend(extra.iter().cloned());
  args
}
