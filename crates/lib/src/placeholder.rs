//! Placeholder parsing and fixed-point substitution.
//!
//! App files embed placeholders in their string values. They are parsed into
//! segments, expanded through a [`Resolver`], and the expansion is repeated
//! until the text stops changing, so a value may expand into further
//! placeholders.
//!
//! # Placeholder Formats
//!
//! - `${NAME}` - a named parameter
//! - `${FUNC(arg1, arg2)}` - a function call; arguments are split on `,` and
//!   trimmed
//!
//! `NAME` and `FUNC` consist of word characters (`A-Z`, `a-z`, `0-9`, `_`).
//! The argument list ends at the first `)}` on the same line.
//!
//! # Literal Text
//!
//! Anything that does not match the grammar stays as it is. Shell variables
//! like `$HOME` or `${HOME:-/root}` pass through unchanged, as do unclosed
//! placeholders. Parsing never fails.
//!
//! # Unresolved Placeholders
//!
//! A placeholder the resolver does not know is replaced with
//! [`ERROR_MARKER`](crate::consts::ERROR_MARKER) so the problem shows up in
//! the generated output.
//!
//! # Example
//!
//! ```
//! use containerflight_lib::placeholder::{parse, Placeholder, Segment};
//!
//! let segments = parse("${APT_INSTALL(curl, git)} for ${USERNAME}");
//! assert_eq!(segments, vec![
//!     Segment::Placeholder(Placeholder::Call {
//!         name: "APT_INSTALL".to_string(),
//!         args: vec!["curl".to_string(), "git".to_string()],
//!     }),
//!     Segment::Literal(" for ".to_string()),
//!     Segment::Placeholder(Placeholder::Reference("USERNAME".to_string())),
//! ]);
//! ```

use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::consts::{ERROR_MARKER, MAX_RESOLVE_PASSES};

/// A parsed placeholder reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
  /// `${NAME}` - value of a named parameter
  Reference(String),

  /// `${NAME(args)}` - result of a function
  Call { name: String, args: Vec<String> },
}

impl fmt::Display for Placeholder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Reference(name) => write!(f, "${{{name}}}"),
      Self::Call { name, args } => write!(f, "${{{name}({})}}", args.join(", ")),
    }
  }
}

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text (no placeholders)
  Literal(String),

  /// A placeholder to be resolved
  Placeholder(Placeholder),
}

/// Fatal errors during placeholder resolution.
///
/// Unknown names are not errors; they become the error marker instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
  #[error("cannot read file \"{path}\": {message}")]
  ReadSource { path: String, message: String },

  #[error("placeholders still changing after {passes} passes (cyclic parameter?)")]
  NoFixedPoint { passes: usize },
}

/// Supplies values for placeholders.
pub trait Resolver {
  /// Value of a named parameter, or `None` if the name is unknown.
  fn resolve_reference(&self, name: &str) -> Option<String>;

  /// Result of a function call, or `None` if the function is unknown or the
  /// arguments do not fit it.
  fn resolve_call(&self, name: &str, args: &[String]) -> Result<Option<String>, PlaceholderError>;
}

/// Parse a string into literal and placeholder segments.
///
/// Adjacent literal text is merged into one segment.
pub fn parse(input: &str) -> Vec<Segment> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut rest = input;

  while let Some(start) = rest.find("${") {
    literal.push_str(&rest[..start]);
    let candidate = &rest[start..];

    match parse_placeholder(candidate) {
      Some((placeholder, consumed)) => {
        if !literal.is_empty() {
          segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Placeholder(placeholder));
        rest = &candidate[consumed..];
      }
      None => {
        // Not a placeholder; keep the `$` and rescan from the `{`.
        literal.push('$');
        rest = &candidate[1..];
      }
    }
  }

  literal.push_str(rest);
  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  segments
}

/// Parse a placeholder at the start of `text`, which begins with `${`.
///
/// Returns the placeholder and the number of bytes it spans.
fn parse_placeholder(text: &str) -> Option<(Placeholder, usize)> {
  let body = &text[2..];
  let name_len = body
    .bytes()
    .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
    .count();
  if name_len == 0 {
    return None;
  }

  let name = &body[..name_len];
  let after = &body[name_len..];

  if after.starts_with('}') {
    return Some((Placeholder::Reference(name.to_string()), 2 + name_len + 1));
  }

  let inner = after.strip_prefix('(')?;
  let close = inner.find(")}")?;
  let raw_args = &inner[..close];
  if raw_args.contains('\n') {
    return None;
  }

  let placeholder = Placeholder::Call {
    name: name.to_string(),
    args: split_args(raw_args),
  };
  Some((placeholder, 2 + name_len + 1 + close + 2))
}

fn split_args(raw: &str) -> Vec<String> {
  if raw.trim().is_empty() {
    return Vec::new();
  }
  raw.split(',').map(|arg| arg.trim().to_string()).collect()
}

/// Run one substitution pass over `input`.
///
/// Values inserted by this pass are not scanned again; see [`resolve`].
pub fn substitute(input: &str, resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  substitute_segments(&parse(input), resolver)
}

/// Substitute placeholders in pre-parsed segments.
pub fn substitute_segments(segments: &[Segment], resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  let mut result = String::new();

  for segment in segments {
    match segment {
      Segment::Literal(s) => result.push_str(s),
      Segment::Placeholder(p) => {
        let value = match p {
          Placeholder::Reference(name) => resolver.resolve_reference(name),
          Placeholder::Call { name, args } => resolver.resolve_call(name, args)?,
        };
        match value {
          Some(value) => result.push_str(&value),
          None => {
            warn!(placeholder = %p, "unresolved placeholder");
            result.push_str(ERROR_MARKER);
          }
        }
      }
    }
  }

  Ok(result)
}

/// Substitute repeatedly until the text reaches a fixed point.
///
/// # Errors
///
/// Returns [`PlaceholderError::NoFixedPoint`] if the text is still changing
/// after [`MAX_RESOLVE_PASSES`] passes, which happens when a parameter
/// expands into itself. Errors from the resolver are passed through.
pub fn resolve(input: &str, resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  let mut current = input.to_string();

  for _ in 0..MAX_RESOLVE_PASSES {
    let next = substitute(&current, resolver)?;
    if next == current {
      return Ok(next);
    }
    current = next;
  }

  Err(PlaceholderError::NoFixedPoint {
    passes: MAX_RESOLVE_PASSES,
  })
}
