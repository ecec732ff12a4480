//! CLI entry point for inkpress

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "inkpress")]
#[command(version)]
#[command(about = "Generate a static blog from posts, pages and templates", long_about = None)]
struct Cli {
    /// Destination folder, which must already exist
    #[arg(short, long)]
    destination: PathBuf,

    /// Install static files
    #[arg(short, long)]
    r#static: bool,

    /// Generate static pages
    #[arg(short, long)]
    pages: bool,

    /// Set the site directory (defaults to current directory)
    #[arg(short, long)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(long)]
    debug: bool,

    /// Exit non-zero when any post, page or asset failed
    #[arg(long)]
    strict: bool,
}

fn run(cli: Cli) -> Result<ExitCode> {
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let site = inkpress::Site::new(&base_dir)?;
    let options = inkpress::GenerateOptions {
        destination: cli.destination,
        pages: cli.pages,
        static_assets: cli.r#static,
    };

    let report = inkpress::commands::generate::run(&site, &options)?;

    if !report.is_success() {
        return Ok(ExitCode::from(1));
    }
    if report.is_degraded() {
        tracing::warn!("Some items failed, see the messages above");
        if cli.strict {
            return Ok(ExitCode::from(2));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "inkpress=debug,info"
    } else {
        "inkpress=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}
