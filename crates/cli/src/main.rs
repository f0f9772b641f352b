mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use output::{OutputFormat, print_error};

/// containerflight - Run applications in containers described by an app file
#[derive(Parser)]
#[command(name = "containerflight")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Export the container description
  Export {
    #[command(subcommand)]
    what: ExportCommands,
  },

  /// Show the build identity and image tag of an app file
  Identity {
    /// Path to the app file
    app_file: PathBuf,
  },

  /// Show the tool version and the detected environment
  Info,
}

#[derive(Subcommand)]
enum ExportCommands {
  /// Show the processed Dockerfile
  Dockerfile {
    /// Path to the app file
    app_file: PathBuf,
  },

  /// Show the arguments used for "docker run"
  Runargs {
    /// Path to the app file
    app_file: PathBuf,

    /// Show the complete argument list including labels and image
    #[arg(long)]
    full: bool,

    /// Arguments passed on to the app (with --full)
    #[arg(last = true, requires = "full")]
    args: Vec<String>,
  },

  /// Show the arguments used for "docker build"
  Buildargs {
    /// Path to the app file
    app_file: PathBuf,
  },
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Export { what } => match what {
      ExportCommands::Dockerfile { app_file } => cmd::cmd_export_dockerfile(&app_file),
      ExportCommands::Runargs { app_file, full, args } => cmd::cmd_export_runargs(&app_file, full, &args, cli.output),
      ExportCommands::Buildargs { app_file } => cmd::cmd_export_buildargs(&app_file, cli.output),
    },
    Commands::Identity { app_file } => cmd::cmd_identity(&app_file, cli.output),
    Commands::Info => cmd::cmd_info(cli.output),
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}
