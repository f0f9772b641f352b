//! Named parameters available to `${NAME}` placeholders.

use std::collections::BTreeMap;

use crate::env::Environment;

/// Proxy settings forwarded from the host into the image build.
pub const SET_PROXY: &str = r#"ENV http_proxy=${ENV(http_proxy)}
ENV https_proxy=${ENV(https_proxy)}
ENV no_proxy=${ENV(no_proxy)}
"#;

/// Creates the invoking user and group inside the image and switches to it.
///
/// Each distribution family gets its own attempt; the first that succeeds wins.
pub const USER_CTX: &str = r#"RUN if ! getent group ${GROUPNAME} > /dev/null 2>&1; then \
        ( \
            # ubuntu\
            addgroup -g ${GROUPID} ${GROUPNAME} || \
            # busybox\
            addgroup --gid ${GROUPID} ${GROUPNAME} || \
            # fedora / arch linux\
            groupadd --gid ${GROUPID} ${GROUPNAME} \
        ) > /dev/null 2>&1 ; \
    fi ; \
    if ! getent passwd ${USERNAME} > /dev/null 2>&1; then \
        ( \
            # fedora\
            adduser --gid ${GROUPNAME} --uid ${USERID} --base-dir "${HOME}" ${USERNAME} || \
            # ubuntu\
            adduser --home "${HOME}" --uid ${USERID} --gecos "" --ingroup ${GROUPNAME} --disabled-password ${USERNAME} || \
            # busybox\
            adduser -h "${HOME}" -u ${USERID} -D -H -G ${GROUPNAME} ${USERNAME} || \
            # arch linux\
            useradd --no-user-group --gid ${GROUPID} --uid ${USERID} --home-dir "${HOME}" --create-home ${USERNAME} \
        ) > /dev/null 2>&1 ; \
    fi ;

USER ${USERNAME}"#;

/// Parameter names filled from the [`Environment`].
pub mod names {
  pub const APP_FILE_DIR: &str = "APP_FILE_DIR";
  pub const USERNAME: &str = "USERNAME";
  pub const USERID: &str = "USERID";
  pub const GROUPNAME: &str = "GROUPNAME";
  pub const GROUPID: &str = "GROUPID";
  pub const HOME: &str = "HOME";
  pub const PWD: &str = "PWD";
  pub const SET_PROXY: &str = "SET_PROXY";
  pub const USER_CTX: &str = "USER_CTX";
}

/// Case-sensitive name to value mapping consulted by the resolver.
///
/// Values may themselves contain placeholders; they are expanded on a later
/// resolution pass, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterTable {
  values: BTreeMap<String, String>,
}

impl ParameterTable {
  /// Build the standard table for `env`.
  pub fn from_environment(env: &Environment) -> Self {
    let mut values = BTreeMap::new();
    let mut set = |name: &str, value: String| {
      values.insert(name.to_string(), value);
    };

    set(names::APP_FILE_DIR, env.app_file_dir.to_string_lossy().into_owned());
    set(names::USERNAME, env.user_name.clone());
    set(names::USERID, env.user_id.clone());
    set(names::GROUPNAME, env.group_name.clone());
    set(names::GROUPID, env.group_id.clone());
    set(names::HOME, env.home_dir.to_string_lossy().into_owned());
    set(names::PWD, env.working_dir.to_string_lossy().into_owned());
    set(names::SET_PROXY, SET_PROXY.to_string());
    set(names::USER_CTX, USER_CTX.to_string());

    Self { values }
  }

  /// Add or replace a parameter.
  ///
  /// Intended for embedding callers that expose extra names to app files.
  pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.values.insert(name.into(), value.into());
    self
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.values.get(name).map(String::as_str)
  }
}
