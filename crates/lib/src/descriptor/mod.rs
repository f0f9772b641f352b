//! App file parsing and validation.
//!
//! An app file is a small YAML document describing how to build and run one
//! containerized application:
//!
//! ```yaml
//! compatibility: ">=0.3.0"
//! name: editor
//! version: 1.0
//! image:
//!   base: docker://ubuntu:22.04
//!   dockerfile: |
//!     ${APT_INSTALL(vim)}
//! runtime:
//!   docker:
//!     runargs: [-e, TERM]
//! ```

mod compat;
mod types;

pub use compat::{RangeError, VersionRange};
pub use types::*;

use semver::Version;
use thiserror::Error;
use tracing::debug;

use crate::consts::TOOL_VERSION;

/// Errors while reading an app file.
#[derive(Debug, Error)]
pub enum DescriptorError {
  #[error("invalid app file: {0}")]
  Yaml(#[from] serde_yaml::Error),

  #[error("compatibility: {0}")]
  InvalidRange(#[from] RangeError),

  #[error("invalid tool version \"{version}\": {source}")]
  ToolVersion {
    version: String,
    #[source]
    source: semver::Error,
  },

  #[error("app file requires containerflight {range}, but this is version {version}")]
  Incompatible { range: String, version: String },

  #[error("cannot read file \"{path}\": {message}")]
  FileRef { path: String, message: String },
}

impl AppDescriptor {
  /// Parse an app file strictly.
  ///
  /// An empty document is the default descriptor.
  pub fn parse(text: &str) -> Result<Self, DescriptorError> {
    if text.trim().is_empty() {
      return Ok(Self::default());
    }

    let value: serde_yaml::Value = serde_yaml::from_str(text)?;
    if value.is_null() {
      return Ok(Self::default());
    }

    let descriptor: Self = serde_yaml::from_value(value)?;
    debug!(name = %descriptor.name, compatibility = %descriptor.compatibility, "parsed app file");
    Ok(descriptor)
  }

  /// Check `compatibility` against [`TOOL_VERSION`].
  pub fn check_compatibility(&self) -> Result<(), DescriptorError> {
    self.check_compatibility_with(TOOL_VERSION)
  }

  /// Check `compatibility` against `tool_version`. A missing range accepts
  /// every version.
  pub fn check_compatibility_with(&self, tool_version: &str) -> Result<(), DescriptorError> {
    if self.compatibility.trim().is_empty() {
      return Ok(());
    }

    let range: VersionRange = self.compatibility.parse()?;
    let version = Version::parse(tool_version).map_err(|source| DescriptorError::ToolVersion {
      version: tool_version.to_string(),
      source,
    })?;

    if range.matches(&version) {
      Ok(())
    } else {
      Err(DescriptorError::Incompatible {
        range: range.to_string(),
        version: tool_version.to_string(),
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_is_default() {
    for text in ["", "   \n", "\t\n\n"] {
      let d = AppDescriptor::parse(text).unwrap();
      assert_eq!(d, AppDescriptor::default(), "for {text:?}");
      assert!(d.console);
      assert!(!d.gui);
    }
  }

  #[test]
  fn full_document() {
    let d = AppDescriptor::parse(
      r#"
compatibility: ">=0.1.0"
name: editor
version: 0.1
description: A text editor
console: false
gui: true
image:
  base: docker://ubuntu
  dockerfile: |
    RUN true
  storage:
    driver: overlay
runtime:
  driver: docker
  docker:
    runargs:
      - -p
      - 8080
"#,
    )
    .unwrap();

    assert_eq!(d.name, "editor");
    assert_eq!(d.version, "0.1");
    assert!(!d.console);
    assert!(d.gui);
    assert_eq!(d.image.base, "docker://ubuntu");
    assert_eq!(d.image.dockerfile, "RUN true\n");
    assert_eq!(d.image.storage.driver, "overlay");
    assert_eq!(d.runtime.driver, "docker");
    assert_eq!(d.runtime.docker.runargs, vec!["-p", "8080"]);
  }

  #[test]
  fn unknown_top_level_key_is_rejected() {
    let err = AppDescriptor::parse("nmae: typo\n").unwrap_err();
    assert!(err.to_string().contains("nmae"), "{err}");
  }

  #[test]
  fn unknown_nested_key_is_rejected() {
    assert!(AppDescriptor::parse("image:\n  bsae: docker://ubuntu\n").is_err());
    assert!(AppDescriptor::parse("runtime:\n  docker:\n    runarg: []\n").is_err());
  }

  #[test]
  fn malformed_yaml_is_rejected() {
    assert!(matches!(
      AppDescriptor::parse("name: [unclosed"),
      Err(DescriptorError::Yaml(_))
    ));
  }

  #[test]
  fn mapping_where_string_expected_is_rejected() {
    assert!(AppDescriptor::parse("name:\n  first: x\n").is_err());
  }

  #[test]
  fn compatible_range_passes() {
    let d = AppDescriptor {
      compatibility: ">=0.3.0 <1.0.0".to_string(),
      ..Default::default()
    };
    assert!(d.check_compatibility_with("0.3.0").is_ok());
  }

  #[test]
  fn incompatible_range_fails() {
    let d = AppDescriptor {
      compatibility: ">=1.0.0".to_string(),
      ..Default::default()
    };
    assert!(matches!(
      d.check_compatibility_with("0.3.0"),
      Err(DescriptorError::Incompatible { ref version, .. }) if version == "0.3.0"
    ));
  }

  #[test]
  fn bad_range_fails() {
    let d = AppDescriptor {
      compatibility: "sometime soon".to_string(),
      ..Default::default()
    };
    assert!(matches!(
      d.check_compatibility_with("0.3.0"),
      Err(DescriptorError::InvalidRange(_))
    ));
  }

  #[test]
  fn no_range_accepts_anything() {
    assert!(AppDescriptor::default().check_compatibility().is_ok());
  }

  #[test]
  fn own_version_satisfies_exact_range() {
    let d = AppDescriptor {
      compatibility: TOOL_VERSION.to_string(),
      ..Default::default()
    };
    assert!(d.check_compatibility().is_ok());
  }
}
