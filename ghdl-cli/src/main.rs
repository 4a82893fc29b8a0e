//! ghdl CLI - download GitHub files, directories and repositories without cloning

mod commands;

use clap::{Parser, Subcommand};
use ghdl_core::{Config, Secrets};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{DownloadArgs, InspectArgs};

/// ghdl: grab a file, a directory or a whole repository from a GitHub URL
#[derive(Parser, Debug)]
#[command(name = "ghdl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Maximum concurrent file fetches for directories (overrides config and env)
    #[arg(long, global = true, env = "GHDL_MAX_CONCURRENCY")]
    max_concurrency: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Download the target of a GitHub URL
    #[command(visible_alias = "dl")]
    Download(DownloadArgs),

    /// Show how a URL would be downloaded
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),

    /// Show current configuration
    Config,

    /// Create an empty secrets file for the GitHub token
    InitSecrets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = Config::load_with_overrides(cli.max_concurrency)?;

    if cli.verbose {
        tracing::info!(
            api_url = %config.github.api_url,
            max_concurrency = ?config.download.max_concurrency,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("ghdl {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Download(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Inspect(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Config) => {
            println!("ghdl Configuration");
            println!("==================");
            println!();
            println!("GitHub:");
            println!("  api_url: {}", config.github.api_url);
            println!("  raw_url: {}", config.github.raw_url);
            println!("  web_url: {}", config.github.web_url);
            println!("  timeout: {:?}", config.github.timeout);
            println!();
            println!("Download:");
            match config.download.max_concurrency {
                Some(n) => println!("  max_concurrency: {}", n),
                None => println!("  max_concurrency: (unbounded)"),
            }
            println!("  default_branch: {}", config.download.default_branch);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
            let token = Secrets::load()?.credential();
            println!(
                "GitHub token: {}",
                if token.is_some() { "configured" } else { "not set" }
            );
        }
        Some(Commands::InitSecrets) => {
            let path = Secrets::create_template()?;
            println!("Created {}", path.display());
        }
        None => {
            println!("ghdl - download GitHub files, directories and repositories");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
