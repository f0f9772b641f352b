//! App file schema.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

/// A parsed app file.
///
/// Unknown keys are rejected at every level. String fields hold the raw text
/// from the file; placeholders in them are resolved later by the materializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppDescriptor {
  /// Version range of this tool the app file works with.
  #[serde(default, deserialize_with = "scalar_string")]
  pub compatibility: String,

  #[serde(default, deserialize_with = "scalar_string")]
  pub name: String,

  #[serde(default, deserialize_with = "scalar_string")]
  pub version: String,

  #[serde(default, deserialize_with = "scalar_string")]
  pub description: String,

  /// Attach standard input (and a TTY when available) to the container.
  #[serde(default = "default_console")]
  pub console: bool,

  /// Forward the X11 display into the container.
  #[serde(default)]
  pub gui: bool,

  #[serde(default)]
  pub image: ImageSection,

  #[serde(default)]
  pub runtime: RuntimeSection,
}

impl Default for AppDescriptor {
  fn default() -> Self {
    Self {
      compatibility: String::new(),
      name: String::new(),
      version: String::new(),
      description: String::new(),
      console: default_console(),
      gui: false,
      image: ImageSection::default(),
      runtime: RuntimeSection::default(),
    }
  }
}

fn default_console() -> bool {
  true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSection {
  /// `docker://NAME` or a raw base image line.
  #[serde(default, deserialize_with = "scalar_string")]
  pub base: String,

  /// Dockerfile body, or a single `file://PATH` line.
  #[serde(default, deserialize_with = "scalar_string")]
  pub dockerfile: String,

  #[serde(default)]
  pub storage: StorageSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
  #[serde(default, deserialize_with = "scalar_string")]
  pub driver: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeSection {
  #[serde(default, deserialize_with = "scalar_string")]
  pub driver: String,

  #[serde(default)]
  pub docker: DockerSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DockerSection {
  /// Extra `docker run` arguments, one token per entry.
  #[serde(default, deserialize_with = "scalar_strings")]
  pub runargs: Vec<String>,
}

/// Accept any YAML scalar as a string, keeping its textual form.
///
/// `version: 0.1` is the string `"0.1"`, `version:` with no value is empty.
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  let value = Value::deserialize(deserializer)?;
  value_to_string(value).map_err(D::Error::custom)
}

fn scalar_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
  match Value::deserialize(deserializer)? {
    Value::Null => Ok(Vec::new()),
    Value::Sequence(items) => items
      .into_iter()
      .map(value_to_string)
      .collect::<Result<_, _>>()
      .map_err(D::Error::custom),
    other => Err(D::Error::custom(format!(
      "expected a list of arguments, found {}",
      kind_of(&other)
    ))),
  }
}

fn value_to_string(value: Value) -> Result<String, String> {
  match value {
    Value::Null => Ok(String::new()),
    Value::Bool(b) => Ok(b.to_string()),
    Value::Number(n) => Ok(n.to_string()),
    Value::String(s) => Ok(s),
    Value::Tagged(tagged) => value_to_string(tagged.value),
    other => Err(format!("expected a string, found {}", kind_of(&other))),
  }
}

fn kind_of(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Sequence(_) => "a list",
    Value::Mapping(_) => "a mapping",
    Value::Tagged(_) => "a tagged value",
  }
}
