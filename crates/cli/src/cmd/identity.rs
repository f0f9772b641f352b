//! Implementation of the `containerflight identity` command.
//!
//! Prints the hash that decides whether an existing image can be reused.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use containerflight_lib::docker::image_tag;

use super::resolve_build;
use crate::output::{OutputFormat, print_json, print_stat};

#[derive(Serialize)]
struct IdentityOutput {
  identity: String,
  image: String,
  app_name: String,
  app_version: String,
  app_file: String,
}

pub fn cmd_identity(app_file: &Path, format: OutputFormat) -> Result<()> {
  let (build, identity) = resolve_build(app_file)?;

  let output = IdentityOutput {
    identity: identity.to_string(),
    image: image_tag(&build.app_name, &build.app_version),
    app_name: build.app_name,
    app_version: build.app_version,
    app_file: build.app_config_file.display().to_string(),
  };

  if format.is_json() {
    print_json(&output)?;
  } else {
    println!("{}", output.identity);
    print_stat("Image", &output.image);
    print_stat("App file", &output.app_file);
  }

  Ok(())
}
