//! Implementation of the `containerflight export` commands.

use std::path::Path;

use anyhow::{Context, Result};

use containerflight_lib::docker::{build_command_args, image_tag, run_command_args};

use super::{load_app, resolve_build};
use crate::output::{OutputFormat, print_args};

pub fn cmd_export_dockerfile(app_file: &Path) -> Result<()> {
  let app = load_app(app_file)?;
  let dockerfile = app.dockerfile().context("Failed to generate Dockerfile")?;
  println!("{}", dockerfile);
  Ok(())
}

pub fn cmd_export_runargs(app_file: &Path, full: bool, extra: &[String], format: OutputFormat) -> Result<()> {
  let args = if full {
    let (build, identity) = resolve_build(app_file)?;
    let tag = image_tag(&build.app_name, &build.app_version);
    run_command_args(&build, &identity, &tag, extra)
  } else {
    let app = load_app(app_file)?;
    app.run_args().context("Failed to resolve run arguments")?
  };

  print_args(&args, format)
}

/// The Dockerfile path is shown as `Dockerfile`.
pub fn cmd_export_buildargs(app_file: &Path, format: OutputFormat) -> Result<()> {
  let (build, identity) = resolve_build(app_file)?;
  let tag = image_tag(&build.app_name, &build.app_version);
  let args = build_command_args("Dockerfile", &build, &identity, &tag);

  print_args(&args, format)
}
