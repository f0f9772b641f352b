//! File access used while materializing an app file.
//!
//! Everything that reads files (`file://` Dockerfiles, `${ADD(...)}` sources,
//! build context hashing) goes through [`FileSystem`], so callers can swap the
//! real disk for an in-memory tree.

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::platform::paths::clean;

/// What a walked path is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
  File,
  /// A symbolic link, not followed, with its target as stored.
  Symlink(PathBuf),
}

/// One entry found by [`FileSystem::walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
  pub path: PathBuf,
  pub kind: EntryKind,
}

impl WalkEntry {
  pub fn file(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      kind: EntryKind::File,
    }
  }

  pub fn symlink(path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      kind: EntryKind::Symlink(target.into()),
    }
  }
}

/// Read access to files and directory trees.
pub trait FileSystem {
  /// Read the whole file at `path`.
  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

  /// List every regular file and symbolic link below `root`, recursively.
  /// Directories and special files are skipped; links are not followed.
  ///
  /// The order must be deterministic: entries of a directory sorted by file
  /// name, depth first.
  fn walk(&self, root: &Path) -> io::Result<Vec<WalkEntry>>;

  /// Open the file at `path` for streaming reads.
  fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
    Ok(Box::new(io::Cursor::new(self.read(path)?)))
  }

  /// Read the file at `path` as UTF-8 text.
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    let bytes = self.read(path)?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
  }
}

/// Read `path` as text, trying it as given first and then relative to `base_dir`.
///
/// On failure the error carries the `base_dir`-relative path, which is the
/// one a user editing the app file expects to see.
pub fn read_from_app_dir(files: &dyn FileSystem, base_dir: &Path, path: &str) -> Result<String, (PathBuf, io::Error)> {
  if let Ok(content) = files.read_to_string(Path::new(path)) {
    return Ok(content);
  }

  let relative = base_dir.join(path);
  files.read_to_string(&relative).map_err(|e| (relative, e))
}

/// The host file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    std::fs::read(path)
  }

  fn walk(&self, root: &Path) -> io::Result<Vec<WalkEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
      let entry = entry.map_err(io::Error::from)?;
      let file_type = entry.file_type();
      if file_type.is_file() {
        entries.push(WalkEntry::file(entry.into_path()));
      } else if file_type.is_symlink() {
        let target = std::fs::read_link(entry.path())?;
        entries.push(WalkEntry::symlink(entry.into_path(), target));
      }
    }

    Ok(entries)
  }

  fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
    Ok(Box::new(std::fs::File::open(path)?))
  }
}

/// An in-memory file tree keyed by cleaned absolute paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
  files: BTreeMap<PathBuf, Vec<u8>>,
  links: BTreeMap<PathBuf, PathBuf>,
}

impl MemoryFileSystem {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a file, replacing any previous content.
  pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) -> Self {
    self.insert(path, content);
    self
  }

  /// Add a symbolic link. Links are listed by [`FileSystem::walk`] but never
  /// followed.
  pub fn with_symlink(mut self, path: impl AsRef<Path>, target: impl Into<PathBuf>) -> Self {
    self.links.insert(clean(path.as_ref()), target.into());
    self
  }

  pub fn insert(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
    self.files.insert(clean(path.as_ref()), content.into());
  }
}

impl FileSystem for MemoryFileSystem {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    self.files.get(&clean(path)).cloned().ok_or_else(|| {
      io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file: {}", path.display()),
      )
    })
  }

  fn walk(&self, root: &Path) -> io::Result<Vec<WalkEntry>> {
    let root = clean(root);
    let files = self
      .files
      .keys()
      .filter(|path| path.starts_with(&root))
      .map(|path| WalkEntry::file(path.clone()));
    let links = self
      .links
      .iter()
      .filter(|(path, _)| path.starts_with(&root))
      .map(|(path, target)| WalkEntry::symlink(path.clone(), target.clone()));

    // Path order compares component by component, which is the same
    // depth-first, name-sorted order walkdir produces.
    let mut entries: Vec<_> = files.chain(links).collect();
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
  }
}
