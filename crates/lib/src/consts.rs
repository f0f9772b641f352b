//! Crate-wide constants.

/// Name used for image tags and labels.
pub const APP_NAME: &str = "containerflight";

/// Version of this tool. Part of every build identity.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Text substituted for a placeholder that cannot be resolved.
pub const ERROR_MARKER: &str = "<<ERROR!>>";

/// Upper bound on resolution passes before a text is considered cyclic.
pub const MAX_RESOLVE_PASSES: usize = 64;

/// Hostname passed to `docker run` unless the app file sets `-h`.
pub const DEFAULT_HOSTNAME: &str = "flybydocker";

/// X11 socket directory shared with GUI apps.
pub const X11_SOCKET_DIR: &str = "/tmp/.X11-unix";

/// Prefix selecting a base image in `image.base`.
pub const DOCKER_IMAGE_PREFIX: &str = "docker://";

/// Prefix turning `image.dockerfile` into a file reference.
pub const FILE_REF_PREFIX: &str = "file://";

/// Image label keys understood by the daemon collaborator.
pub mod labels {
  pub const MARKER: &str = "containerflight";
  pub const APP_FILE: &str = "containerflight_appFile";
  pub const IMAGE: &str = "containerflight_image";
  pub const HASH: &str = "containerflight_hash";
  pub const VERSION: &str = "containerflight_version";
  pub const BUILD_VERSION: &str = "containerflight_cfVersion";
  pub const DESCRIPTION: &str = "containerflight_description";
}
