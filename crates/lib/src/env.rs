//! Facts about the invoking user and the app file location.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::platform::paths::{absolutize, clean};
use crate::platform::user::{UserLookupError, current_user};

/// Errors that can occur while detecting the environment.
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
  #[error(transparent)]
  User(#[from] UserLookupError),

  #[error("failed to determine the working directory: {0}")]
  WorkingDir(#[source] std::io::Error),

  #[error("app file path has no parent directory: {0}")]
  NoParent(PathBuf),
}

/// Immutable snapshot of user, group and path facts for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
  pub user_name: String,
  pub user_id: String,
  pub group_name: String,
  pub group_id: String,
  pub home_dir: PathBuf,
  pub working_dir: PathBuf,
  pub app_file_dir: PathBuf,
  pub app_config_file: PathBuf,
}

impl Environment {
  /// Detect the environment for the app file at `app_config_file`.
  ///
  /// The path is made absolute against the process working directory. User
  /// and group come from the system user database.
  pub fn detect(app_config_file: &Path) -> Result<Self, EnvironmentError> {
    let working_dir = std::env::current_dir().map_err(EnvironmentError::WorkingDir)?;
    let app_config_file = absolutize(app_config_file, &working_dir);
    let app_file_dir = app_file_dir(&app_config_file)?;
    let account = current_user()?;

    let env = Self {
      user_name: account.name,
      user_id: account.uid,
      group_name: account.group_name,
      group_id: account.gid,
      home_dir: account.home_dir,
      working_dir,
      app_file_dir,
      app_config_file,
    };
    debug!(user = %env.user_name, app_file = ?env.app_config_file, "detected environment");
    Ok(env)
  }
}

/// Directory containing the (absolute) app file.
pub fn app_file_dir(app_config_file: &Path) -> Result<PathBuf, EnvironmentError> {
  app_config_file
    .parent()
    .map(clean)
    .ok_or_else(|| EnvironmentError::NoParent(app_config_file.to_path_buf()))
}
