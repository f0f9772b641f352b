//! Turning an app file into a Dockerfile and `docker run` arguments.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::{DEFAULT_HOSTNAME, DOCKER_IMAGE_PREFIX, FILE_REF_PREFIX, X11_SOCKET_DIR};
use crate::descriptor::{AppDescriptor, DescriptorError};
use crate::env::{Environment, EnvironmentError};
use crate::fs::read_from_app_dir;
use crate::host::Host;
use crate::params::{ParameterTable, names};
use crate::placeholder::PlaceholderError;
use crate::platform::paths::{absolutize, base_name};
use crate::template::TemplateEngine;

/// Errors while loading or materializing an app file.
#[derive(Debug, Error)]
pub enum AppError {
  #[error("cannot read app file \"{}\": {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Environment(#[from] EnvironmentError),

  #[error(transparent)]
  Descriptor(#[from] DescriptorError),

  #[error(transparent)]
  Placeholder(#[from] PlaceholderError),

  #[error("cannot serialize app file: {0}")]
  Serialize(#[source] serde_yaml::Error),
}

/// Everything derived from one app file, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBuild {
  pub app_name: String,
  pub app_version: String,
  pub app_description: String,
  pub app_file_dir: PathBuf,
  pub app_config_file: PathBuf,
  pub dockerfile: String,
  pub run_args: Vec<String>,
  /// The parsed app file written back as YAML with all placeholders resolved.
  pub resolved_descriptor: String,
}

/// A parsed app file bound to its environment and host.
#[derive(Debug)]
pub struct AppInfo {
  descriptor: AppDescriptor,
  env: Environment,
  params: ParameterTable,
  host: Host,
}

impl AppInfo {
  /// Read and validate the app file at `path`.
  pub fn load(path: &Path, host: Host) -> Result<Self, AppError> {
    let env = Environment::detect(path)?;
    let text = host
      .files
      .read_to_string(&env.app_config_file)
      .map_err(|source| AppError::Read {
        path: env.app_config_file.clone(),
        source,
      })?;
    Self::from_text(&text, env, host)
  }

  /// Validate app file `text` for an already known environment.
  pub fn from_text(text: &str, env: Environment, host: Host) -> Result<Self, AppError> {
    let descriptor = AppDescriptor::parse(text)?;
    descriptor.check_compatibility()?;
    let params = ParameterTable::from_environment(&env);

    Ok(Self {
      descriptor,
      env,
      params,
      host,
    })
  }

  /// Expose an extra `${NAME}` parameter to the app file.
  pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.params = self.params.with(name, value);
    self
  }

  pub fn is_console_app(&self) -> bool {
    self.descriptor.console
  }

  pub fn is_gui_app(&self) -> bool {
    self.descriptor.gui
  }

  fn engine(&self) -> TemplateEngine<'_> {
    TemplateEngine::new(
      &self.params,
      self.host.vars.as_ref(),
      self.host.files.as_ref(),
      &self.env.app_file_dir,
    )
  }

  /// Resolve the placeholders in `text`.
  pub fn resolve(&self, text: &str) -> Result<String, PlaceholderError> {
    self.engine().resolve(text)
  }

  /// App name, falling back to the app file name when unset.
  pub fn name(&self) -> Result<String, AppError> {
    let name = self.resolve(&self.descriptor.name)?;
    if name.is_empty() {
      return Ok(base_name(&self.env.app_config_file));
    }
    Ok(name)
  }

  pub fn version(&self) -> Result<String, AppError> {
    Ok(self.resolve(&self.descriptor.version)?)
  }

  pub fn description(&self) -> Result<String, AppError> {
    Ok(self.resolve(&self.descriptor.description)?)
  }

  /// The complete Dockerfile.
  ///
  /// Layout: the base image line and a blank line (if a base is set), proxy
  /// settings, the app file's Dockerfile body, then the user and group setup.
  pub fn dockerfile(&self) -> Result<String, AppError> {
    let mut text = String::new();

    let base = &self.descriptor.image.base;
    if !base.is_empty() {
      match base.strip_prefix(DOCKER_IMAGE_PREFIX) {
        Some(image) => text.push_str(&format!("FROM {image}")),
        None => text.push_str(base),
      }
      text.push_str("\n\n");
    }

    text.push_str(self.params.get(names::SET_PROXY).unwrap_or_default());
    text.push('\n');
    text.push_str(&self.dockerfile_body()?);
    text.push('\n');
    text.push_str(self.params.get(names::USER_CTX).unwrap_or_default());

    let dockerfile = self.resolve(&text)?;
    debug!(%dockerfile, "generated Dockerfile");
    Ok(dockerfile)
  }

  /// The `image.dockerfile` value, or the file it references when it is a
  /// single `file://PATH` line.
  fn dockerfile_body(&self) -> Result<String, AppError> {
    let body = &self.descriptor.image.dockerfile;
    if body.contains('\n') {
      return Ok(body.clone());
    }

    let Some(path) = body.trim().strip_prefix(FILE_REF_PREFIX) else {
      return Ok(body.clone());
    };

    read_from_app_dir(self.host.files.as_ref(), &self.env.app_file_dir, path).map_err(|(path, e)| {
      DescriptorError::FileRef {
        path: path.display().to_string(),
        message: e.to_string(),
      }
      .into()
    })
  }

  /// Arguments for `docker run`, placed before the image name.
  pub fn run_args(&self) -> Result<Vec<String>, AppError> {
    let user_args = &self.descriptor.runtime.docker.runargs;

    let mut defaults = BTreeMap::from([("-h", DEFAULT_HOSTNAME), ("-w", "${PWD}")]);
    for arg in user_args {
      defaults.remove(arg.as_str());
    }

    let mut args = vec!["-v".to_string(), "${PWD}:${PWD}".to_string()];
    args.extend(user_args.iter().cloned());

    if self.is_console_app() {
      args.push(self.host.stdin.docker_flag().to_string());
    }

    if self.is_gui_app() {
      args.extend([
        "-e".to_string(),
        "DISPLAY=${ENV(DISPLAY)}".to_string(),
        "-v".to_string(),
        format!("{X11_SOCKET_DIR}:{X11_SOCKET_DIR}"),
      ]);
    }

    for (flag, value) in defaults {
      args.push(flag.to_string());
      args.push(value.to_string());
    }

    let mut args = args
      .iter()
      .map(|arg| self.resolve(arg))
      .collect::<Result<Vec<_>, _>>()?;

    self.absolutize_volumes(&mut args);

    debug!(?args, "docker run arguments");
    Ok(args)
  }

  /// Make both sides of every `-v host:container` pair absolute so the daemon
  /// sees identical mounts as identical.
  fn absolutize_volumes(&self, args: &mut [String]) {
    let base = &self.env.working_dir;

    for i in 1..args.len() {
      if args[i - 1].trim() != "-v" {
        continue;
      }
      let parts: Vec<&str> = args[i].split(':').collect();
      if let [host, container] = parts.as_slice() {
        let host = absolutize(Path::new(host), base);
        let container = absolutize(Path::new(container), base);
        args[i] = format!("{}:{}", host.display(), container.display());
      }
    }
  }

  /// The parsed app file as YAML, resolved. This is what the build identity
  /// hashes.
  pub fn resolved_descriptor(&self) -> Result<String, AppError> {
    let yaml = serde_yaml::to_string(&self.descriptor).map_err(AppError::Serialize)?;
    Ok(self.resolve(&yaml)?)
  }

  /// Resolve everything at once.
  pub fn materialize(&self) -> Result<ResolvedBuild, AppError> {
    Ok(ResolvedBuild {
      app_name: self.name()?,
      app_version: self.version()?,
      app_description: self.description()?,
      app_file_dir: self.env.app_file_dir.clone(),
      app_config_file: self.env.app_config_file.clone(),
      dockerfile: self.dockerfile()?,
      run_args: self.run_args()?,
      resolved_descriptor: self.resolved_descriptor()?,
    })
  }
}
