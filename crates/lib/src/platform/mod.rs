pub mod paths;
pub mod user;

use std::fmt;

/// What standard input is connected to.
///
/// Console apps get `-ti` on a terminal and `-i` when input is piped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StdinKind {
  Terminal,
  Pipe,
}

impl StdinKind {
  /// Inspect the standard input of the current process.
  ///
  /// On Unix a character device counts as a terminal. If the descriptor cannot
  /// be inspected the input is treated as piped.
  #[cfg(unix)]
  pub fn detect() -> Self {
    use std::os::fd::AsFd;
    use std::os::unix::fs::FileTypeExt;

    let is_char_device = std::io::stdin()
      .as_fd()
      .try_clone_to_owned()
      .and_then(|fd| std::fs::File::from(fd).metadata())
      .map(|meta| meta.file_type().is_char_device())
      .unwrap_or(false);

    if is_char_device { Self::Terminal } else { Self::Pipe }
  }

  #[cfg(not(unix))]
  pub fn detect() -> Self {
    use std::io::IsTerminal;

    if std::io::stdin().is_terminal() {
      Self::Terminal
    } else {
      Self::Pipe
    }
  }

  /// The `docker run` flag enabling input for a console app.
  pub fn docker_flag(&self) -> &'static str {
    match self {
      Self::Terminal => "-ti",
      Self::Pipe => "-i",
    }
  }
}

impl fmt::Display for StdinKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Terminal => write!(f, "terminal"),
      Self::Pipe => write!(f, "pipe"),
    }
  }
}
