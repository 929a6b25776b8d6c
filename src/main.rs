use anyhow::Result;
use clap::Parser;
use planfeat::config::Config;
use planfeat::db::Database;
use planfeat::runner;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "planfeat")]
#[command(about = "Extract per-node cardinality features from profiled PostgreSQL query plans")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "feature_config.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    // The core traversal is synchronous; the runtime only drives the
    // database driver, one blocking call at a time.
    let runtime = tokio::runtime::Runtime::new()?;
    let mut db = Database::connect(runtime.handle().clone(), &config.postgres)?;
    info!(
        "Connected to {}:{}/{}",
        config.postgres.host, config.postgres.port, config.postgres.database
    );

    runner::run(&config, &mut db)?;
    Ok(())
}
