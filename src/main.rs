use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use stormwatch::config::StormwatchConfig;
use stormwatch::models::UserRecord;
use stormwatch::{StormwatchError, runner, store, validate};
use tracing_subscriber::EnvFilter;

/// Automated severe weather alerting service
#[derive(Parser)]
#[command(name = "stormwatch", version, about)]
struct Cli {
    /// Path to a config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one scheduled check over all registered users
    Check,
    /// Send a test notification for a city without registering it
    Test {
        #[arg(long)]
        city: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
    },
    /// Register a user for scheduled checks
    Register {
        #[arg(long)]
        city: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
    },
}

fn init_logging(config: &StormwatchConfig, verbose: bool) {
    let default_level = if verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stormwatch={default_level}")));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(cli: Cli) -> Result<()> {
    // Load a .env file if present, like the production deployment does.
    dotenv::dotenv().ok();

    let config = StormwatchConfig::load_from_path(cli.config.clone())?;
    init_logging(&config, cli.verbose);

    match cli.command {
        Command::Check => {
            let report = runner::run_scheduled_check(&config)?;
            println!(
                "Processed {} user(s), {} alert(s) delivered",
                report.users.len(),
                report.alerts_delivered()
            );
        }
        Command::Test { city, phone, email } => {
            let (message, outcome) = runner::send_test_notification(&config, &city, &phone, &email)?;
            println!("{message}\n");
            println!("Notification status: {} ({})", outcome.channel, outcome.detail);
        }
        Command::Register { city, phone, email } => {
            validate::validate_registration(&city, &phone, &email)?;
            store::append_user(&config.store.path, UserRecord { city, phone, email })?;
            println!("User data saved successfully.");
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Interactive callers get the precise user-facing message.
            match e.downcast_ref::<StormwatchError>() {
                Some(err) => eprintln!("{}", err.user_message()),
                None => eprintln!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
