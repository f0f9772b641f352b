//! Current user and primary group lookup.

use std::path::PathBuf;

/// Account facts of the invoking user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
  pub name: String,
  pub uid: String,
  pub group_name: String,
  pub gid: String,
  pub home_dir: PathBuf,
}

/// Error during user database lookups.
#[derive(Debug, thiserror::Error)]
pub enum UserLookupError {
  #[error("failed to look up user {uid}: {message}")]
  User { uid: String, message: String },

  #[error("failed to look up group {gid}: {message}")]
  Group { gid: String, message: String },

  #[error("user and group lookup is not supported on this platform")]
  Unsupported,
}

/// Look up the real user of this process and its primary group.
#[cfg(unix)]
pub fn current_user() -> Result<UserAccount, UserLookupError> {
  use nix::unistd::{Group, User, getuid};

  let uid = getuid();
  let user = User::from_uid(uid)
    .map_err(|e| UserLookupError::User {
      uid: uid.to_string(),
      message: e.to_string(),
    })?
    .ok_or_else(|| UserLookupError::User {
      uid: uid.to_string(),
      message: "no passwd entry".to_string(),
    })?;

  let group = Group::from_gid(user.gid)
    .map_err(|e| UserLookupError::Group {
      gid: user.gid.to_string(),
      message: e.to_string(),
    })?
    .ok_or_else(|| UserLookupError::Group {
      gid: user.gid.to_string(),
      message: "no group entry".to_string(),
    })?;

  Ok(UserAccount {
    name: user.name,
    uid: user.uid.to_string(),
    group_name: group.name,
    gid: user.gid.to_string(),
    home_dir: user.dir,
  })
}

#[cfg(not(unix))]
pub fn current_user() -> Result<UserAccount, UserLookupError> {
  Err(UserLookupError::Unsupported)
}
