//! Lander CLI - Main Entry Point
//!
//! Builds the landing page from its product config, audits the build,
//! runs the browser QA harness and serves the site with its checkout proxy.

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{build, qa, serve, tier, validate};

/// Exit code for errors that prevented a verdict
const EXIT_FATAL: i32 = 2;

/// Lander - landing page build, QA and serving
#[derive(Parser)]
#[command(name = "lander")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run browser QA across viewports
    Qa(qa::QaArgs),

    /// Fill template placeholders from product.config
    Build(build::BuildArgs),

    /// Audit the built page without a browser
    Validate(validate::ValidateArgs),

    /// Serve the site and the checkout proxy
    Serve(serve::ServeArgs),

    /// Show the checkout tier a price maps to
    Tier(tier::TierArgs),

    /// Show version information
    Version,
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Qa(args) => qa::execute(args).await,
        Commands::Build(args) => build::execute(args),
        Commands::Validate(args) => validate::execute(args, cli.format),
        Commands::Serve(args) => serve::execute(args).await,
        Commands::Tier(args) => tier::execute(args, cli.format),
        Commands::Version => {
            println!("Lander CLI v{}", lander_common::VERSION);
            Ok(0)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("Fatal error: {:#}", e));
            EXIT_FATAL
        }
    };
    std::process::exit(code);
}
