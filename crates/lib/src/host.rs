//! Host capabilities handed to the resolver and the materializer.
//!
//! Nothing in this crate reads process-wide state directly: environment
//! variables, files and the kind of standard input all arrive through a
//! [`Host`].

use crate::fs::{FileSystem, OsFileSystem};
use crate::platform::StdinKind;

/// Source of environment variable values for `${ENV(...)}`.
pub trait VarSource {
  /// Value of `name`, or `None` when it is unset.
  fn var(&self, name: &str) -> Option<String>;
}

/// Variables of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
  fn var(&self, name: &str) -> Option<String> {
    std::env::var(name).ok()
  }
}

impl<F> VarSource for F
where
  F: Fn(&str) -> Option<String>,
{
  fn var(&self, name: &str) -> Option<String> {
    self(name)
  }
}

/// Everything the materializer needs from the outside world.
pub struct Host {
  pub vars: Box<dyn VarSource>,
  pub files: Box<dyn FileSystem>,
  pub stdin: StdinKind,
}

impl Host {
  /// The real process environment, disk and standard input.
  pub fn system() -> Self {
    Self {
      vars: Box::new(ProcessEnv),
      files: Box::new(OsFileSystem),
      stdin: StdinKind::detect(),
    }
  }

  pub fn new(vars: impl VarSource + 'static, files: impl FileSystem + 'static, stdin: StdinKind) -> Self {
    Self {
      vars: Box::new(vars),
      files: Box::new(files),
      stdin,
    }
  }
}

impl std::fmt::Debug for Host {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Host").field("stdin", &self.stdin).finish_non_exhaustive()
  }
}
