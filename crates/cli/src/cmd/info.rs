use anyhow::{Context, Result};
use serde_json::json;

use containerflight_lib::consts::TOOL_VERSION;
use containerflight_lib::platform::StdinKind;
use containerflight_lib::platform::user::current_user;

use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_info(format: OutputFormat) -> Result<()> {
  let account = current_user().context("Failed to look up the current user")?;
  let working_dir = std::env::current_dir().context("Failed to determine the working directory")?;
  let stdin = StdinKind::detect();

  if format.is_json() {
    return print_json(&json!({
      "version": TOOL_VERSION,
      "user": { "name": account.name, "uid": account.uid, "home": account.home_dir },
      "group": { "name": account.group_name, "gid": account.gid },
      "working_dir": working_dir,
      "stdin": stdin.to_string(),
    }));
  }

  println!("containerflight {}", TOOL_VERSION);
  print_stat("User", &format!("{} ({})", account.name, account.uid));
  print_stat("Group", &format!("{} ({})", account.group_name, account.gid));
  print_stat("Home", &account.home_dir.display().to_string());
  print_stat("Working dir", &working_dir.display().to_string());
  print_stat("Stdin", &stdin.to_string());

  Ok(())
}
