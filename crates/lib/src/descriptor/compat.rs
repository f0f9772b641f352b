//! Version ranges for the `compatibility` key.
//!
//! A range is a set of alternatives separated by `||`. Each alternative is a
//! list of comparators separated by whitespace or commas, all of which must
//! hold. A comparator is an operator (`=`, `==`, `!=`, `!`, `>`, `>=`, `<`,
//! `<=`), optionally followed by whitespace, and a full `MAJOR.MINOR.PATCH`
//! version; a version without an operator must match exactly.
//!
//! The minor and patch versions may be the wildcard `x` (or `X`, `*`):
//! `1.x` is `>=1.0.0 <2.0.0`, `>1.2.x` is `>=1.3.0`, `!=1.x` excludes every
//! `1.*` version.
//!
//! ```
//! use containerflight_lib::descriptor::VersionRange;
//!
//! let range: VersionRange = ">=0.2.0 <1.0.0 || 2.0.0".parse().unwrap();
//! assert!(range.matches(&"0.3.0".parse().unwrap()));
//! assert!(!range.matches(&"1.5.0".parse().unwrap()));
//! ```

use std::fmt;
use std::str::FromStr;

use semver::Version;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version range \"{range}\": {message}")]
pub struct RangeError {
  pub range: String,
  pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
  Eq,
  Ne,
  Gt,
  Ge,
  Lt,
  Le,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Comparator {
  Compare(Op, Version),
  /// Below `lower` or at least `upper`; the negation of a wildcard.
  Outside { lower: Version, upper: Version },
}

impl Comparator {
  fn matches(&self, version: &Version) -> bool {
    match self {
      Self::Compare(op, bound) => match op {
        Op::Eq => version == bound,
        Op::Ne => version != bound,
        Op::Gt => version > bound,
        Op::Ge => version >= bound,
        Op::Lt => version < bound,
        Op::Le => version <= bound,
      },
      Self::Outside { lower, upper } => version < lower || version >= upper,
    }
  }
}

/// A parsed `compatibility` range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
  source: String,
  alternatives: Vec<Vec<Comparator>>,
}

impl VersionRange {
  pub fn matches(&self, version: &Version) -> bool {
    self
      .alternatives
      .iter()
      .any(|all| all.iter().all(|c| c.matches(version)))
  }
}

impl fmt::Display for VersionRange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.source)
  }
}

impl FromStr for VersionRange {
  type Err = RangeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = |message: String| RangeError {
      range: s.to_string(),
      message,
    };

    let mut alternatives = Vec::new();
    for alternative in s.split("||") {
      let mut comparators = Vec::new();
      for token in tokens(alternative).map_err(invalid)? {
        comparators.extend(parse_comparator(&token).map_err(invalid)?);
      }

      if comparators.is_empty() {
        return Err(invalid("empty alternative".to_string()));
      }
      alternatives.push(comparators);
    }

    Ok(Self {
      source: s.trim().to_string(),
      alternatives,
    })
  }
}

const OPERATOR_CHARS: &[char] = &['<', '>', '=', '!'];

/// Split an alternative into comparator tokens, joining an operator that is
/// separated from its version (`>= 1.0.0`).
fn tokens(alternative: &str) -> Result<Vec<String>, String> {
  let mut tokens = Vec::new();
  let mut pending_op: Option<&str> = None;

  for word in alternative
    .split(|c: char| c.is_whitespace() || c == ',')
    .filter(|word| !word.is_empty())
  {
    if let Some(op) = pending_op.take() {
      tokens.push(format!("{op}{word}"));
    } else if word.chars().all(|c| OPERATOR_CHARS.contains(&c)) {
      pending_op = Some(word);
    } else {
      tokens.push(word.to_string());
    }
  }

  match pending_op {
    Some(op) => Err(format!("operator \"{op}\" without a version")),
    None => Ok(tokens),
  }
}

/// Parse one comparator token. Wildcard versions expand into bounds.
fn parse_comparator(token: &str) -> Result<Vec<Comparator>, String> {
  // Two-character operators first so `>=` is not read as `>`.
  let (op, rest) = [
    ("==", Op::Eq),
    ("!=", Op::Ne),
    (">=", Op::Ge),
    ("<=", Op::Le),
    ("=", Op::Eq),
    ("!", Op::Ne),
    (">", Op::Gt),
    ("<", Op::Lt),
  ]
  .into_iter()
  .find_map(|(prefix, op)| token.strip_prefix(prefix).map(|rest| (op, rest)))
  .unwrap_or((Op::Eq, token));

  if let Some((lower, upper)) = wildcard_bounds(rest).map_err(|e| format!("\"{token}\": {e}"))? {
    return Ok(expand_wildcard(op, lower, upper));
  }

  let version = Version::parse(rest).map_err(|e| format!("\"{token}\": {e}"))?;
  Ok(vec![Comparator::Compare(op, version)])
}

fn is_wildcard(part: &str) -> bool {
  matches!(part, "x" | "X" | "*")
}

/// Bounds `[lower, upper)` of a wildcard version such as `1.x`, `1.2.x` or
/// `1.x.x`, or `None` for a version without wildcards.
fn wildcard_bounds(version: &str) -> Result<Option<(Version, Version)>, String> {
  let parts: Vec<&str> = version.split('.').collect();
  if !parts.iter().any(|part| is_wildcard(part)) {
    return Ok(None);
  }

  let number = |part: &str| {
    part
      .parse::<u64>()
      .map_err(|_| format!("invalid version component \"{part}\""))
  };

  match parts.as_slice() {
    [major, minor] if is_wildcard(minor) => major_bounds(number(*major)?),
    [major, minor, patch] if is_wildcard(minor) && is_wildcard(patch) => major_bounds(number(*major)?),
    [major, minor, patch] if is_wildcard(patch) => {
      let (major, minor) = (number(*major)?, number(*minor)?);
      Ok(Some((Version::new(major, minor, 0), Version::new(major, minor + 1, 0))))
    }
    _ => Err("wildcards are only allowed for the minor and patch versions".to_string()),
  }
}

fn major_bounds(major: u64) -> Result<Option<(Version, Version)>, String> {
  Ok(Some((Version::new(major, 0, 0), Version::new(major + 1, 0, 0))))
}

/// Comparators equivalent to `op` applied to every version in `[lower, upper)`.
fn expand_wildcard(op: Op, lower: Version, upper: Version) -> Vec<Comparator> {
  match op {
    Op::Eq => vec![Comparator::Compare(Op::Ge, lower), Comparator::Compare(Op::Lt, upper)],
    Op::Ne => vec![Comparator::Outside { lower, upper }],
    Op::Gt => vec![Comparator::Compare(Op::Ge, upper)],
    Op::Ge => vec![Comparator::Compare(Op::Ge, lower)],
    Op::Lt => vec![Comparator::Compare(Op::Lt, lower)],
    Op::Le => vec![Comparator::Compare(Op::Lt, upper)],
  }
}
