use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

mod applicator;
mod daemon;
mod evaluator;
mod flags;
mod page;
mod platform;
mod schedule;
mod session;
mod settings;
mod store;

use platform::Platform;
use store::SettingsStore;

/// Scheduled Content Restriction Engine
///
/// Decides when content-reduction restrictions (hidden shorts, related
/// videos and comments, grayscale, autoplay suppression) are active for
/// distracting platforms, based on day-of-week and time-of-day windows,
/// and reconciles that decision against a live page representation.
#[derive(Parser, Debug)]
#[command(name = "content-curfew")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Path to the settings file (defaults to the per-user config location)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write built-in default settings to the settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
    /// Show the current restriction decision for every platform
    Status,
    /// Show the effective settings after default-filling
    ShowConfig,
    /// Run the restriction loop in the foreground
    Watch {
        /// Platform to run the loop for
        #[arg(long, value_enum, default_value = "youtube")]
        platform: Platform,

        /// Evaluation tick interval in seconds
        #[arg(long, default_value = "60")]
        tick_interval: u64,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let store = open_store(args.settings)?;

    match args.command {
        Commands::Init { force } => cmd_init(&store, force),
        Commands::Status => cmd_status(&store),
        Commands::ShowConfig => cmd_show_config(&store),
        Commands::Watch {
            platform,
            tick_interval,
        } => cmd_watch(&store, platform, tick_interval),
    }
}

/// Initialize logging
fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn open_store(path: Option<PathBuf>) -> Result<store::JsonFileStore> {
    let path = match path {
        Some(path) => path,
        None => store::default_settings_path()?,
    };
    Ok(store::JsonFileStore::new(path))
}

/// Write built-in defaults to the settings file
fn cmd_init(store: &store::JsonFileStore, force: bool) -> Result<()> {
    if store.path().exists() && !force {
        anyhow::bail!(
            "Settings file already exists: {} (use --force to overwrite)",
            store.path().display()
        );
    }

    store.save(&settings::Settings::default())?;
    println!("✓ Default settings written to: {}", store.path().display());

    Ok(())
}

/// Show the restriction decision for every platform
fn cmd_status(store: &store::JsonFileStore) -> Result<()> {
    let settings = store::load_or_default(store);
    let now = chrono::Local::now().naive_local();

    println!("Content Curfew Status");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Settings file: {}", store.path().display());
    println!("Local time:    {}", now.format("%a %Y-%m-%d %H:%M"));
    println!();

    for platform in Platform::ALL {
        match evaluator::activation(&settings, platform, &now) {
            Ok(Some(activation)) => {
                println!(
                    "  {:<9} RESTRICTED ({})",
                    platform.key(),
                    activation.describe()
                );
            }
            Ok(None) => {
                println!("  {:<9} unrestricted", platform.key());
            }
            Err(e) => {
                println!("  {:<9} MISCONFIGURED: {:#}", platform.key(), e);
                continue;
            }
        }

        if let Ok(Some(at)) = evaluator::next_transition(&settings, platform, &now) {
            println!("            next change: ~{}", at.format("%a %H:%M"));
        }
    }

    Ok(())
}

/// Show the effective settings object
fn cmd_show_config(store: &store::JsonFileStore) -> Result<()> {
    let settings = store::load_or_default(store);

    println!("Effective Settings");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Settings file: {}", store.path().display());
    println!();
    println!("{}", serde_json::to_string_pretty(&settings)?);

    Ok(())
}

/// Run the restriction loop in the foreground
fn cmd_watch(store: &store::JsonFileStore, platform: Platform, tick_interval: u64) -> Result<()> {
    println!(
        "Starting restriction loop for {} (Ctrl+C to stop)",
        platform.key()
    );
    println!("Settings file: {}", store.path().display());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        // Update envelopes arrive on stdin, standing in for the cross-tab
        // notification channel; the store poll covers external file edits.
        let (tx, rx) = tokio::sync::mpsc::channel(16);
        daemon::spawn_envelope_reader(tx.clone());
        let _keepalive = tx; // end of stdin input must not stop the loop

        let mut session = session::Session::new(platform, page::MemoryPage::new());
        let config = daemon::WatchConfig {
            tick_interval: Duration::from_secs(tick_interval),
            ..Default::default()
        };

        daemon::run_watch_loop(&mut session, store, config, rx).await
    })
}
