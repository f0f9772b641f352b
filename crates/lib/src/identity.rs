//! Build identity: the cache key of an image.
//!
//! An image is reused while its identity is unchanged. The identity is a
//! SHA-256 over, in order:
//!
//! 1. the resolved app file (see [`AppInfo::resolved_descriptor`])
//! 2. the tool version
//! 3. one line per build context entry, but only when the Dockerfile copies
//!    files in (`COPY` or `ADD` instructions): `F:<path>:<content hash>` for a
//!    regular file and `L:<path>:<target hash>` for a symbolic link, with
//!    paths relative to the context directory and sorted
//!
//! [`AppInfo::resolved_descriptor`]: crate::app::AppInfo::resolved_descriptor

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

use crate::app::ResolvedBuild;
use crate::consts::TOOL_VERSION;
use crate::fs::{EntryKind, FileSystem};

/// Lowercase hex SHA-256, 64 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BuildIdentity(String);

impl fmt::Display for BuildIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Error while hashing the build context.
#[derive(Debug, Error)]
pub enum IdentityError {
  #[error("failed to walk build context {}: {source}", path.display())]
  Walk {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl BuildIdentity {
  /// Hash the given inputs.
  ///
  /// `context_dir` is only walked when `dockerfile` references the build
  /// context. Any I/O error aborts the whole computation.
  pub fn compute(
    resolved_descriptor: &str,
    dockerfile: &str,
    tool_version: &str,
    context_dir: &Path,
    files: &dyn FileSystem,
  ) -> Result<Self, IdentityError> {
    let mut hasher = Sha256::new();
    hasher.update(resolved_descriptor.as_bytes());
    hasher.update(tool_version.as_bytes());

    if references_build_context(dockerfile) {
      let entries = files.walk(context_dir).map_err(|source| IdentityError::Walk {
        path: context_dir.to_path_buf(),
        source,
      })?;
      info!(context = %context_dir.display(), entries = entries.len(), "hashing build context");

      let mut lines = Vec::with_capacity(entries.len());
      for entry in entries {
        let rel_path = entry
          .path
          .strip_prefix(context_dir)
          .unwrap_or(&entry.path)
          .to_string_lossy()
          .to_string();

        let line = match &entry.kind {
          EntryKind::File => format!("F:{}:{}", rel_path, hash_file(files, &entry.path)?),
          EntryKind::Symlink(target) => {
            format!("L:{}:{}", rel_path, hash_bytes(target.to_string_lossy().as_bytes()))
          }
        };
        lines.push((rel_path, line));
      }

      lines.sort_by(|a, b| a.0.cmp(&b.0));
      for (_, line) in lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
      }
    }

    let identity = Self(format!("{:x}", hasher.finalize()));
    debug!(%identity, tool_version, "computed build identity");
    Ok(identity)
  }

  /// Identity of a materialized app file, with the app file directory as
  /// build context.
  pub fn of(build: &ResolvedBuild, files: &dyn FileSystem) -> Result<Self, IdentityError> {
    Self::compute(
      &build.resolved_descriptor,
      &build.dockerfile,
      TOOL_VERSION,
      &build.app_file_dir,
      files,
    )
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Hex SHA-256 of a file, read through a fixed buffer.
fn hash_file(files: &dyn FileSystem, path: &Path) -> Result<String, IdentityError> {
  let read_error = |source| IdentityError::Read {
    path: path.to_path_buf(),
    source,
  };
  let mut reader = files.open(path).map_err(read_error)?;

  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];
  loop {
    let bytes_read = reader.read(&mut buffer).map_err(read_error)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(format!("{:x}", hasher.finalize()))
}

fn hash_bytes(data: &[u8]) -> String {
  format!("{:x}", Sha256::digest(data))
}

/// Whether any Dockerfile instruction copies files from the build context.
pub fn references_build_context(dockerfile: &str) -> bool {
  dockerfile.lines().any(|line| {
    let line = line.trim_start().to_ascii_uppercase();
    line.starts_with("COPY ") || line.starts_with("ADD ")
  })
}
