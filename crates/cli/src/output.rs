//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: colored error messages,
//! labelled values, JSON and argument lists.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const ERROR: &str = "✗";
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Print an argument list as one shell-quoted line or as a JSON array.
pub fn print_args(args: &[String], format: OutputFormat) -> anyhow::Result<()> {
  if format.is_json() {
    return print_json(&args);
  }
  println!("{}", shell_join(args)?);
  Ok(())
}

/// Join arguments into a line a POSIX shell splits back into the same words.
pub fn shell_join(args: &[String]) -> anyhow::Result<String> {
  shlex::try_join(args.iter().map(String::as_str)).context("Failed to quote arguments")
}
