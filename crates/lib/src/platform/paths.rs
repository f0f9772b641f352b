//! Lexical path helpers.
//!
//! Volume specs and descriptor paths are made absolute without touching the
//! file system, so the result does not depend on whether a path exists or on
//! symlinks along the way.

use std::path::{Component, Path, PathBuf};

/// Remove `.` components and fold `..` into the preceding component.
///
/// `..` directly below the root is dropped, so `/../a` becomes `/a`. Leading
/// `..` components of a relative path are kept.
pub fn clean(path: &Path) -> PathBuf {
  let mut parts: Vec<Component<'_>> = Vec::new();

  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match parts.last() {
        Some(Component::Normal(_)) => {
          parts.pop();
        }
        Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
        _ => parts.push(component),
      },
      other => parts.push(other),
    }
  }

  if parts.is_empty() {
    return PathBuf::from(".");
  }

  parts.iter().collect()
}

/// Make `path` absolute against `base` and clean it.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
  if path.is_absolute() {
    clean(path)
  } else {
    clean(&base.join(path))
  }
}

/// Final component of `path`, or an empty string.
pub fn base_name(path: &Path) -> String {
  path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default()
}
