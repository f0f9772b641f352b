//! The resolver used for app files: parameter table plus built-in functions.
//!
//! | Function | Arguments | Expands to |
//! |----------|-----------|------------|
//! | `ENV` | `name` | host environment variable, empty when unset |
//! | `APT_INSTALL` | `pkg, ...` | `RUN` instruction installing the packages with apt |
//! | `ADD` | `src, dst` | `RUN` instruction writing the content of `src` to `dst` |

use std::path::Path;

use tracing::trace;

use crate::fs::{FileSystem, read_from_app_dir};
use crate::host::VarSource;
use crate::params::ParameterTable;
use crate::placeholder::{self, PlaceholderError, Resolver};

/// Built-in functions callable as `${NAME(args)}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
  Env,
  AptInstall,
  Add,
}

impl Function {
  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "ENV" => Some(Self::Env),
      "APT_INSTALL" => Some(Self::AptInstall),
      "ADD" => Some(Self::Add),
      _ => None,
    }
  }
}

/// Resolves placeholders against a parameter table and the host.
pub struct TemplateEngine<'a> {
  params: &'a ParameterTable,
  vars: &'a dyn VarSource,
  files: &'a dyn FileSystem,
  base_dir: &'a Path,
}

impl<'a> TemplateEngine<'a> {
  /// `base_dir` is the app file directory; relative `ADD` sources are looked
  /// up there.
  pub fn new(
    params: &'a ParameterTable,
    vars: &'a dyn VarSource,
    files: &'a dyn FileSystem,
    base_dir: &'a Path,
  ) -> Self {
    Self {
      params,
      vars,
      files,
      base_dir,
    }
  }

  /// Resolve `text` to its fixed point.
  pub fn resolve(&self, text: &str) -> Result<String, PlaceholderError> {
    placeholder::resolve(text, self)
  }

  fn add(&self, source: &str, destination: &str) -> Result<String, PlaceholderError> {
    let content = read_from_app_dir(self.files, self.base_dir, source).map_err(|(path, e)| {
      PlaceholderError::ReadSource {
        path: path.display().to_string(),
        message: e.to_string(),
      }
    })?;
    Ok(add_file_snippet(&content, destination))
  }
}

impl Resolver for TemplateEngine<'_> {
  fn resolve_reference(&self, name: &str) -> Option<String> {
    self.params.get(name).map(str::to_string)
  }

  fn resolve_call(&self, name: &str, args: &[String]) -> Result<Option<String>, PlaceholderError> {
    let Some(function) = Function::from_name(name) else {
      return Ok(None);
    };
    trace!(function = name, ?args, "calling function");

    match (function, args) {
      (Function::Env, [var]) => Ok(Some(self.vars.var(var).unwrap_or_default())),
      (Function::AptInstall, packages) if !packages.is_empty() => Ok(Some(apt_install_snippet(packages))),
      (Function::Add, [source, destination]) => self.add(source, destination).map(Some),
      _ => Ok(None),
    }
  }
}

/// `RUN` instruction installing `packages` with apt and clearing the lists.
pub fn apt_install_snippet(packages: &[String]) -> String {
  format!(
    "RUN apt-get update && \\\n    export DEBIAN_FRONTEND=noninteractive && \\\n    apt-get install -y {} && \\\n    rm -rf /var/lib/apt/lists/*",
    packages.join(" ")
  )
}

/// `RUN` instruction that writes `content` to `destination` with `echo`.
///
/// The content is single-quoted; backslashes and quotes are escaped and each
/// newline becomes a `\n` escape followed by a line continuation.
pub fn add_file_snippet(content: &str, destination: &str) -> String {
  let mut escaped = String::with_capacity(content.len());
  for ch in content.chars() {
    match ch {
      '\\' => escaped.push_str("\\\\"),
      '\'' => escaped.push_str("'\\''"),
      '\n' => escaped.push_str("\\n\\\n"),
      c => escaped.push(c),
    }
  }
  format!("RUN echo '{escaped}' > \"{destination}\"")
}
