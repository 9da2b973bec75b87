use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use averbuch_core::site::Variant;
use averbuch_core::{AppConfig, MotionPreferences};

mod commands;

#[derive(Parser)]
#[command(name = "averbuch")]
#[command(author, version, about = "Terminal preview and form client for the Averbuch Foundation site")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Turn off transitions and smooth scrolling
    #[arg(long, global = true)]
    reduced_motion: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scroll through the page in the terminal (default)
    Preview {
        /// Page variant: animated or static
        #[arg(long, default_value = "animated")]
        variant: Variant,
    },
    /// Scroll the page headlessly and print what the motion engine does
    Simulate {
        #[arg(long, default_value = "animated")]
        variant: Variant,
        /// Viewport width in pixels
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        /// Viewport height in pixels
        #[arg(long, default_value_t = 800.0)]
        height: f64,
        /// Pixels scrolled per frame
        #[arg(long, default_value_t = 100.0)]
        step: f64,
        /// Print one JSON object per frame
        #[arg(long)]
        json: bool,
    },
    /// Send a contact inquiry
    Inquire {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        message: Option<String>,
        /// Print the payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Submit a job application
    Apply {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// outreach, marketing or account-manager
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        cover_letter: Option<String>,
        #[arg(long)]
        experience: Option<String>,
        /// Print the payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the legal notice
    Legal {
        /// Wrap width in columns
        #[arg(long, default_value_t = 78)]
        width: usize,
    },
    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration if none exists
    Init,
    /// Print the configuration file path
    Path,
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if to_file {
        // The preview owns the terminal, so logs go to a file
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Config {
        action: ConfigAction::Path,
    }) = &cli.command
    {
        println!("{}", AppConfig::config_path().display());
        return Ok(());
    }

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    let previewing = matches!(cli.command, Some(Commands::Preview { .. }) | None);
    init_logging(&config, previewing)?;

    let prefs = MotionPreferences::resolve(config.motion.reduced_motion, cli.reduced_motion);

    match cli.command {
        Some(Commands::Preview { variant }) => commands::preview::run(config, prefs, variant).await,
        None => commands::preview::run(config, prefs, Variant::default()).await,
        Some(Commands::Simulate {
            variant,
            width,
            height,
            step,
            json,
        }) => {
            let options = commands::simulate::Options {
                variant,
                width,
                height,
                step,
                json,
            };
            commands::simulate::run(&config, prefs, options).await
        }
        Some(Commands::Inquire {
            name,
            email,
            company,
            message,
            dry_run,
        }) => {
            let fields = commands::inquire::Fields {
                name,
                email,
                company,
                message,
            };
            commands::inquire::run(&config, fields, dry_run).await
        }
        Some(Commands::Apply {
            name,
            email,
            phone,
            position,
            location,
            cover_letter,
            experience,
            dry_run,
        }) => {
            let fields = commands::apply::Fields {
                name,
                email,
                phone,
                position,
                location,
                cover_letter,
                experience,
            };
            commands::apply::run(&config, fields, dry_run).await
        }
        Some(Commands::Legal { width }) => commands::legal::run(width).await,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config).await,
            ConfigAction::Init => commands::config::init().await,
            ConfigAction::Path => Ok(()),
        },
    }
}
