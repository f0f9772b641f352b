mod export;
mod identity;
mod info;

pub use export::{cmd_export_buildargs, cmd_export_dockerfile, cmd_export_runargs};
pub use identity::cmd_identity;
pub use info::cmd_info;

use std::path::Path;

use anyhow::{Context, Result};

use containerflight_lib::app::{AppInfo, ResolvedBuild};
use containerflight_lib::fs::OsFileSystem;
use containerflight_lib::host::Host;
use containerflight_lib::identity::BuildIdentity;

fn load_app(app_file: &Path) -> Result<AppInfo> {
  AppInfo::load(app_file, Host::system()).with_context(|| format!("Failed to load app file: {}", app_file.display()))
}

/// Materialize the app file and compute its identity.
fn resolve_build(app_file: &Path) -> Result<(ResolvedBuild, BuildIdentity)> {
  let app = load_app(app_file)?;
  let build = app.materialize().context("Failed to resolve app file")?;
  let identity = BuildIdentity::of(&build, &OsFileSystem).context("Failed to compute build identity")?;
  Ok((build, identity))
}
