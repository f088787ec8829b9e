//! avdloc - command line front end
//!
//! Loads the configuration, builds the resolver over the process
//! environment and prints the requested folder.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use avdloc::commands::{AvdCommand, CheckSdkHomeCommand, HashCommand, HomeCommand, UserHomeCommand};
use avdloc::core::{LocationError, LocatorConfig, APP_NAME, VERSION};
use avdloc::locator::AndroidLocation;

const ENVIRONMENT_HINT: &str =
    "fix the variable (or pass -D NAME=VALUE) and run the command again";

#[derive(Parser)]
#[command(name = "avdloc", version, about = "Locate the Android preference and AVD folders")]
struct Cli {
    /// Set a property, e.g. -D ANDROID_SDK_HOME=/path
    #[arg(short = 'D', value_name = "KEY=VALUE", global = true)]
    define: Vec<String>,

    /// Configuration file to use instead of the default one
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the preference folder (created unless --no-create)
    Home {
        #[arg(long)]
        no_create: bool,
    },
    /// Print the user's home folder
    UserHome,
    /// Fail if ANDROID_SDK_HOME points at an SDK root
    CheckSdkHome,
    /// Print the AVD folder, for an SDK installation when one is known
    Avd {
        /// SDK installation root
        #[arg(long, env = "ANDROID_SDK_ROOT")]
        sdk: Option<PathBuf>,
    },
    /// Print the per-installation AVD folder name for an SDK path
    Hash { sdk: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<LocationError>() {
                Some(location_error) => {
                    eprintln!("error: {}", location_error.user_message());
                    if location_error.is_environment_issue() {
                        eprintln!("hint: {}", ENVIRONMENT_HINT);
                    }
                }
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => LocatorConfig::load_from(path).await,
        None => LocatorConfig::load().await,
    }
    .context("Failed to load configuration")?;
    config.apply_overrides(cli.define.iter().map(String::as_str))?;

    init_tracing(if cli.verbose { "debug" } else { config.log_level.as_str() });
    debug!("{} v{} starting", APP_NAME, VERSION);

    let location = AndroidLocation::from_config(&config);

    match cli.command {
        Commands::Home { no_create } => {
            let path = HomeCommand { create: !no_create }.execute(&location)?;
            println!("{}", path.display());
        }
        Commands::UserHome => {
            let path = UserHomeCommand.execute(&location)?;
            println!("{}", path.display());
        }
        Commands::CheckSdkHome => {
            CheckSdkHomeCommand.execute(&location)?;
            println!("ok");
        }
        Commands::Avd { sdk } => {
            let path = AvdCommand { sdk }.execute(&location)?;
            println!("{}", path.display());
        }
        Commands::Hash { sdk } => {
            println!("{}", HashCommand { sdk }.execute());
        }
    }

    Ok(())
}

/// Install the global tracing subscriber, logging to stderr
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}
