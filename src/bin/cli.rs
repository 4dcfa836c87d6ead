//! BORA Alert CLI
//!
//! Entry point for scheduled runs (cron, CI schedules).

use std::path::{Path, PathBuf};

use bora_alert::{
    error::Result,
    models::{Config, MailCredentials},
    pipeline,
    services::{FileListing, HttpListing, ListingSource, LogNotifier, Notifier, SmtpNotifier},
    storage::{LocalStorage, ReadOnly, SeenStore},
};
use clap::{Parser, Subcommand};

/// BORA Alert - Boletín Oficial watcher
#[derive(Parser, Debug)]
#[command(
    name = "bora-alert",
    version,
    about = "Emails new notices published in the Boletín Oficial"
)]
struct Cli {
    /// Path to the optional TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the listing once and email anything new (default)
    Run {
        /// Log the digest instead of sending it; never updates the state file
        #[arg(long)]
        dry_run: bool,

        /// Read the listing from a saved HTML file instead of fetching it
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Validate configuration
    Validate,

    /// Show state file info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn load_config(path: &Path) -> Config {
    let mut config = if path.exists() {
        Config::load_or_default(path)
    } else {
        log::debug!("No config file at {}, using defaults", path.display());
        Config::default()
    };
    config.apply_env();
    config
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli.config);
    let command = cli.command.unwrap_or(Command::Run {
        dry_run: false,
        html: None,
    });

    match command {
        Command::Run { dry_run, html } => run(&config, dry_run, html).await?,

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            match MailCredentials::from_env() {
                Ok(credentials) => log::info!("✓ Mail credentials set for {}", credentials.user),
                Err(e) => log::warn!("{}", e),
            }
        }

        Command::Info => {
            let storage = LocalStorage::new(&config.state.seen_file);
            log::info!("Listing: {}", config.source.listing_url);
            log::info!("State file: {}", storage.path().display());

            let seen = storage.load().await?;
            log::info!("Seen ids: {} (capacity {})", seen.len(), config.state.capacity);
            if let Some(last) = seen.iter().last() {
                log::info!("Most recent id: {}", last);
            }
        }
    }

    Ok(())
}

async fn run(config: &Config, dry_run: bool, html: Option<PathBuf>) -> Result<()> {
    config.validate()?;

    let source: Box<dyn ListingSource> = match html {
        Some(path) => Box::new(FileListing::new(path)),
        None => Box::new(HttpListing::new(&config.source)?),
    };
    let local = LocalStorage::new(&config.state.seen_file);

    let report = if dry_run {
        let credentials = MailCredentials::from_env().unwrap_or_else(|e| {
            log::debug!("{}; continuing dry run", e);
            MailCredentials {
                user: "dry-run@localhost".to_string(),
                password: String::new(),
                recipient: "dry-run@localhost".to_string(),
            }
        });
        pipeline::run_check(
            config,
            &credentials,
            source.as_ref(),
            &ReadOnly(local),
            &LogNotifier,
        )
        .await?
    } else {
        let report = pipeline::run_configured(
            config,
            |key| std::env::var(key).ok(),
            source.as_ref(),
            &local,
            |credentials| {
                let notifier = SmtpNotifier::new(&config.mail, credentials)?;
                Ok(Box::new(notifier) as Box<dyn Notifier>)
            },
        )
        .await?;

        match report {
            Some(report) => report,
            None => return Ok(()),
        }
    };

    log::info!(
        "Done: {} scraped, {} new, delivered: {}",
        report.scraped,
        report.novel,
        report.delivered
    );
    Ok(())
}
