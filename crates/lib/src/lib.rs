//! containerflight-lib: app files to Docker images
//!
//! An app file describes a containerized application in a few lines of
//! YAML. This crate turns it into everything needed to build and start the
//! container:
//! - `AppInfo`: parses an app file and produces the Dockerfile and the
//!   `docker run` arguments for the invoking user
//! - `TemplateEngine`: resolves `${NAME}` and `${FUNC(args)}` placeholders
//! - `BuildIdentity`: content hash deciding whether an image can be reused
//! - `docker`: label and argument vectors for the `docker` CLI

pub mod app;
pub mod consts;
pub mod descriptor;
pub mod docker;
pub mod env;
pub mod fs;
pub mod host;
pub mod identity;
pub mod params;
pub mod placeholder;
pub mod platform;
pub mod template;
